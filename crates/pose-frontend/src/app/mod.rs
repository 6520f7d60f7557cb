//! Main application module

mod dock;
mod menu;

use std::sync::Arc;

use egui_dock::{DockArea, DockState, Style};
use parking_lot::Mutex;

use crate::actions::{dispatch_action, ActionContext};
use crate::config::{ConfigManager, SharedConfig};
use crate::state::{create_shared_state, SharedAppState, SharedViewportState, ViewportState};
use crate::tasks::TaskContext;

pub use dock::{create_dock_layout, PanelType, PoseTabViewer};
pub use menu::{render_menu_bar, MenuAction};

/// Main application
pub struct PoseEditorApp {
    dock_state: DockState<PanelType>,
    app_state: SharedAppState,
    viewport_state: SharedViewportState,
    config: SharedConfig,
}

impl PoseEditorApp {
    /// Create a new app
    pub fn new(_cc: &eframe::CreationContext<'_>, config: ConfigManager) -> Self {
        let app_config = config.config().clone();
        let app_state = create_shared_state(&app_config);

        let viewport_state = {
            let mut state = app_state.lock();
            if app_config.open_demo_scene {
                state.open_demo_document();
            }
            ViewportState::new(state.pointer_hub.clone(), app_config.view.clone())
        };

        Self {
            dock_state: create_dock_layout(),
            app_state,
            viewport_state: Arc::new(Mutex::new(viewport_state)),
            config: Arc::new(Mutex::new(config)),
        }
    }

    /// Process pending actions
    fn process_actions(&mut self) {
        let actions = self.app_state.lock().take_pending_actions();
        let ctx = ActionContext::new(&self.app_state, &self.viewport_state, &self.config);

        for action in actions {
            dispatch_action(action, &ctx);
        }
    }

    /// Run the active task for this frame
    fn tick_tasks(&mut self) {
        tick_tasks(&self.app_state, &self.viewport_state);
    }
}

/// Tick the task manager against the attached view
fn tick_tasks(app_state: &SharedAppState, viewport_state: &SharedViewportState) {
    let mut app = app_state.lock();
    let mut vp = viewport_state.lock();
    let Some(view) = vp.element.view_mut() else {
        return;
    };
    let app = &mut *app;
    let mut ctx = TaskContext {
        session: &mut app.session,
        view,
        pointer: &app.pointer_hub,
    };
    app.tasks.tick(&mut ctx);
}

/// Deactivate the running task, then detach the viewport element
fn shutdown(app_state: &SharedAppState, viewport_state: &SharedViewportState) {
    let mut app = app_state.lock();
    let mut vp = viewport_state.lock();
    if let Some(view) = vp.element.view_mut() {
        let app = &mut *app;
        let mut ctx = TaskContext {
            session: &mut app.session,
            view,
            pointer: &app.pointer_hub,
        };
        app.tasks.suspend(&mut ctx);
    }
    vp.element.detach();
}

impl eframe::App for PoseEditorApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Process pending actions
        self.process_actions();

        // Task switches and pose edits from last frame's input
        self.tick_tasks();

        // Menu bar
        if let Some(menu_action) = render_menu_bar(ctx, &self.app_state) {
            match menu_action {
                MenuAction::ResetLayout => {
                    self.dock_state = create_dock_layout();
                }
            }
        }

        // Dock area
        DockArea::new(&mut self.dock_state)
            .style(Style::from_egui(ctx.style().as_ref()))
            .show(
                ctx,
                &mut PoseTabViewer {
                    app_state: &self.app_state,
                    viewport_state: &self.viewport_state,
                },
            );
    }

    fn on_exit(&mut self) {
        tracing::info!("Shutting down Pose Editor");
        shutdown(&self.app_state, &self.viewport_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::tasks::TaskKind;

    fn shared_states() -> (SharedAppState, SharedViewportState) {
        let config = AppConfig::default();
        let app_state = create_shared_state(&config);
        let viewport_state = {
            let mut state = app_state.lock();
            state.open_demo_document();
            ViewportState::new(state.pointer_hub.clone(), config.view.clone())
        };
        let viewport_state = Arc::new(Mutex::new(viewport_state));
        viewport_state.lock().element.attach(800.0, 600.0);
        (app_state, viewport_state)
    }

    #[test]
    fn test_shutdown_deactivates_pose_task_and_detaches() {
        let (app_state, viewport_state) = shared_states();
        app_state.lock().tasks.request(TaskKind::Pose);
        tick_tasks(&app_state, &viewport_state);
        assert_eq!(app_state.lock().tasks.active(), Some(TaskKind::Pose));
        assert!(app_state.lock().pointer_hub.handler_count() > 0);

        shutdown(&app_state, &viewport_state);
        assert_eq!(app_state.lock().tasks.active(), None);
        assert_eq!(app_state.lock().pointer_hub.handler_count(), 0);
        assert!(!viewport_state.lock().element.is_attached());
    }

    #[test]
    fn test_shutdown_without_view_is_harmless() {
        let (app_state, viewport_state) = shared_states();
        viewport_state.lock().element.detach();
        shutdown(&app_state, &viewport_state);
        assert!(!viewport_state.lock().element.is_attached());
    }
}
