//! Action handling module
//!
//! Actions are queued in AppState by the UI and processed once per frame,
//! before the active task ticks.

#[cfg(not(target_arch = "wasm32"))]
mod file;
mod scene;
mod task;

use crate::config::SharedConfig;
use crate::state::{AppAction, SharedAppState, SharedViewportState};

#[cfg(not(target_arch = "wasm32"))]
pub use file::handle_file_action;
pub use scene::handle_scene_action;
pub use task::handle_task_action;

/// Context for action handlers
pub struct ActionContext<'a> {
    pub app_state: &'a SharedAppState,
    pub viewport_state: &'a SharedViewportState,
    pub config: &'a SharedConfig,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        app_state: &'a SharedAppState,
        viewport_state: &'a SharedViewportState,
        config: &'a SharedConfig,
    ) -> Self {
        Self {
            app_state,
            viewport_state,
            config,
        }
    }

    /// Fit every camera to the active document's scene
    pub fn fit_view(&self) {
        let bounds = self
            .app_state
            .lock()
            .active_scene()
            .map(|scene| scene.world_bounds());
        if let Some(bounds) = bounds.filter(|b| b.is_valid()) {
            if let Some(view) = self.viewport_state.lock().element.view_mut() {
                view.fit_all(&bounds);
            }
        }
    }
}

/// Dispatch an action to the appropriate handler
pub fn dispatch_action(action: AppAction, ctx: &ActionContext) {
    match action {
        // File actions (native only)
        #[cfg(not(target_arch = "wasm32"))]
        AppAction::OpenDocument(_) | AppAction::SaveDocument(_) | AppAction::ImportModel(_) => {
            handle_file_action(action, ctx);
        }

        // File actions (WASM - ignore)
        #[cfg(target_arch = "wasm32")]
        AppAction::OpenDocument(_) | AppAction::SaveDocument(_) | AppAction::ImportModel(_) => {
            tracing::warn!("File actions are not supported in WASM");
        }

        // Session actions
        AppAction::NewDocument
        | AppAction::SetActiveDocument(_)
        | AppAction::CloseDocument(_)
        | AppAction::SetActiveNode(_)
        | AppAction::CreateBox
        | AppAction::DeleteActiveNode
        | AppAction::SetImportUnit(_) => {
            handle_scene_action(action, ctx);
        }

        // Task and view actions
        AppAction::SetTask(_) | AppAction::SetPoseMode(_) | AppAction::ResetPose => {
            handle_task_action(action, ctx);
        }
        AppAction::FitView => ctx.fit_view(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::config::{AppConfig, ConfigManager};
    use crate::state::{create_shared_state, ViewportState};
    use crate::tasks::{PoseMode, TaskKind};

    struct Harness {
        app_state: SharedAppState,
        viewport_state: SharedViewportState,
        config: SharedConfig,
        _dir: tempfile::TempDir,
    }

    impl Harness {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let config = ConfigManager::load_from(dir.path().join("config.ron"));
            let app_config = AppConfig::default();
            let app_state = create_shared_state(&app_config);
            let pointer_hub = app_state.lock().pointer_hub.clone();
            let mut viewport = ViewportState::new(pointer_hub, app_config.view.clone());
            viewport.element.attach(800.0, 600.0);
            Self {
                app_state,
                viewport_state: Arc::new(Mutex::new(viewport)),
                config: Arc::new(Mutex::new(config)),
                _dir: dir,
            }
        }

        fn run(&self, action: AppAction) {
            let ctx = ActionContext::new(&self.app_state, &self.viewport_state, &self.config);
            dispatch_action(action, &ctx);
        }
    }

    #[test]
    fn test_create_box_activates_its_node() {
        let harness = Harness::new();
        harness.run(AppAction::NewDocument);
        harness.run(AppAction::CreateBox);

        let state = harness.app_state.lock();
        let scene = state.active_scene().unwrap();
        assert_eq!(scene.model_count(), 1);
        let node = state.session.active_node().unwrap();
        assert!(scene.model_for_node(node).is_some());
    }

    #[test]
    fn test_delete_active_node() {
        let harness = Harness::new();
        harness.run(AppAction::NewDocument);
        harness.run(AppAction::CreateBox);
        harness.run(AppAction::DeleteActiveNode);

        let state = harness.app_state.lock();
        assert_eq!(state.active_scene().unwrap().model_count(), 0);
        assert_eq!(state.session.active_node(), None);
    }

    #[test]
    fn test_task_actions() {
        let harness = Harness::new();
        harness.run(AppAction::SetTask(TaskKind::Pose));
        harness.run(AppAction::SetPoseMode(PoseMode::Rotate));

        let state = harness.app_state.lock();
        assert_eq!(state.tasks.requested(), TaskKind::Pose);
        assert_eq!(*state.tasks.pose().mode.get(), PoseMode::Rotate);
    }

    #[test]
    fn test_set_import_unit_updates_config() {
        let harness = Harness::new();
        harness.run(AppAction::SetImportUnit(pose_core::MeshUnit::Inches));
        assert_eq!(harness.app_state.lock().import_unit, pose_core::MeshUnit::Inches);
        assert_eq!(harness.config.lock().config().import_unit, pose_core::MeshUnit::Inches);
    }
}
