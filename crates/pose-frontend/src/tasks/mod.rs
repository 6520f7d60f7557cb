//! Tasks: exclusive UI modes that own input handling and view side effects
//!
//! Exactly one task is active at a time. Switching is requested from the UI
//! and performed by the [`TaskManager`] at the start of the next tick so a
//! task is never swapped out from under its own event handlers.

mod explore;
mod pose;

pub use explore::ExploreTask;
pub use pose::{pose_delta, PoseMode, PoseTask, POSE_CHROME};

use pose_core::{PointerHub, Session};
use pose_renderer::RenderView;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Collaborators handed to a task on every lifecycle call
pub struct TaskContext<'a> {
    pub session: &'a mut Session,
    pub view: &'a mut RenderView,
    pub pointer: &'a PointerHub,
}

/// Lifecycle of a task
pub trait Task: Send {
    /// Display name
    fn name(&self) -> &'static str;

    /// Called when the task becomes active
    fn activate(&mut self, ctx: &mut TaskContext);

    /// Called when another task takes over (or the view goes away)
    fn deactivate(&mut self, ctx: &mut TaskContext);

    /// Called once per rendered frame while active
    fn tick(&mut self, ctx: &mut TaskContext);
}

/// Available tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TaskKind {
    #[default]
    Explore,
    Pose,
}

impl TaskKind {
    pub const ALL: [TaskKind; 2] = [TaskKind::Explore, TaskKind::Pose];

    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Explore => "Explore",
            TaskKind::Pose => "Pose",
        }
    }
}

/// A value slot exposed by a task, with a revision bumped on every publish
#[derive(Debug, Clone, Default)]
pub struct Property<T> {
    value: T,
    revision: u64,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self { value, revision: 0 }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Store and publish a value
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.revision += 1;
    }

    /// Number of times a value was published
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

/// Owns the tasks and switches between them
pub struct TaskManager {
    explore: ExploreTask,
    pose: PoseTask,
    active: Option<TaskKind>,
    requested: TaskKind,
}

impl TaskManager {
    /// Create a manager; `initial` is activated on the first tick
    pub fn new(initial: TaskKind, explore: ExploreTask) -> Self {
        Self {
            explore,
            pose: PoseTask::new(),
            active: None,
            requested: initial,
        }
    }

    /// Ask for a task switch at the next tick
    pub fn request(&mut self, kind: TaskKind) {
        self.requested = kind;
    }

    /// Currently active task, if any
    pub fn active(&self) -> Option<TaskKind> {
        self.active
    }

    /// Task that will be active after the next tick
    pub fn requested(&self) -> TaskKind {
        self.requested
    }

    pub fn pose(&self) -> &PoseTask {
        &self.pose
    }

    pub fn pose_mut(&mut self) -> &mut PoseTask {
        &mut self.pose
    }

    pub fn explore_mut(&mut self) -> &mut ExploreTask {
        &mut self.explore
    }

    fn task_mut(&mut self, kind: TaskKind) -> &mut dyn Task {
        match kind {
            TaskKind::Explore => &mut self.explore,
            TaskKind::Pose => &mut self.pose,
        }
    }

    /// Perform a pending switch, then tick the active task
    pub fn tick(&mut self, ctx: &mut TaskContext) {
        if self.active != Some(self.requested) {
            if let Some(previous) = self.active.take() {
                debug!("Deactivating task {}", previous.name());
                self.task_mut(previous).deactivate(ctx);
            }
            let next = self.requested;
            debug!("Activating task {}", next.name());
            self.task_mut(next).activate(ctx);
            self.active = Some(next);
        }
        if let Some(active) = self.active {
            self.task_mut(active).tick(ctx);
        }
    }

    /// Deactivate whatever is active; the requested task is re-activated on
    /// the next tick
    pub fn suspend(&mut self, ctx: &mut TaskContext) {
        if let Some(previous) = self.active.take() {
            debug!("Suspending task {}", previous.name());
            self.task_mut(previous).deactivate(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_renderer::{ChromeFlags, ViewLayout};

    #[test]
    fn test_property_revision() {
        let mut property = Property::new(1);
        assert_eq!(property.revision(), 0);
        property.set(1);
        property.set(2);
        assert_eq!(*property.get(), 2);
        assert_eq!(property.revision(), 2);
    }

    #[test]
    fn test_switch_happens_on_tick() {
        let mut session = Session::new();
        let mut view = RenderView::new(800.0, 600.0);
        let pointer = PointerHub::new();
        let mut manager =
            TaskManager::new(TaskKind::Explore, ExploreTask::new(ChromeFlags::default()));

        let mut ctx = TaskContext {
            session: &mut session,
            view: &mut view,
            pointer: &pointer,
        };
        manager.tick(&mut ctx);
        assert_eq!(manager.active(), Some(TaskKind::Explore));

        manager.request(TaskKind::Pose);
        assert_eq!(manager.active(), Some(TaskKind::Explore));
        manager.tick(&mut ctx);
        assert_eq!(manager.active(), Some(TaskKind::Pose));
        assert_eq!(ctx.view.layout(), ViewLayout::Quad);
        assert_eq!(pointer.handler_count(), 1);

        manager.request(TaskKind::Explore);
        manager.tick(&mut ctx);
        assert_eq!(ctx.view.layout(), ViewLayout::Single);
        assert_eq!(pointer.handler_count(), 0);
    }

    #[test]
    fn test_suspend_deactivates() {
        let mut session = Session::new();
        let mut view = RenderView::new(800.0, 600.0);
        let pointer = PointerHub::new();
        let mut manager =
            TaskManager::new(TaskKind::Pose, ExploreTask::new(ChromeFlags::default()));
        let mut ctx = TaskContext {
            session: &mut session,
            view: &mut view,
            pointer: &pointer,
        };
        manager.tick(&mut ctx);
        assert_eq!(pointer.handler_count(), 1);

        manager.suspend(&mut ctx);
        assert_eq!(manager.active(), None);
        assert_eq!(manager.requested(), TaskKind::Pose);
        assert_eq!(pointer.handler_count(), 0);
    }
}
