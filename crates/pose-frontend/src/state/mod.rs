//! Application state module

mod viewport;

pub use viewport::{SharedViewportState, ViewportState};

use std::path::PathBuf;
use std::sync::Arc;

use glam::{Mat4, Vec3};
use parking_lot::Mutex;

use pose_core::{
    box_mesh, Document, DocumentId, MeshUnit, Model, Node, NodeId, PointerHub, Scene, Session,
};

use crate::config::AppConfig;
use crate::tasks::{ExploreTask, PoseMode, TaskKind, TaskManager};

/// Actions that can be performed on the app state
#[derive(Debug, Clone)]
pub enum AppAction {
    // File actions (path-based, native only)
    /// Start an empty document
    NewDocument,
    /// Open a document
    OpenDocument(PathBuf),
    /// Save the active document (to a new path when given)
    SaveDocument(Option<PathBuf>),
    /// Import an STL/OBJ model into the active document
    ImportModel(PathBuf),

    // Session actions
    /// Make a document active
    SetActiveDocument(DocumentId),
    /// Close a document
    CloseDocument(DocumentId),
    /// Make a node active (or clear with `None`)
    SetActiveNode(Option<NodeId>),
    /// Add a box model to the active document
    CreateBox,
    /// Remove the active node and its subtree
    DeleteActiveNode,

    // Task actions
    /// Switch task at the next tick
    SetTask(TaskKind),
    /// Set the pose task's mode input
    SetPoseMode(PoseMode),
    /// Reset the active model's pose
    ResetPose,

    // View actions
    /// Fit all cameras to the scene
    FitView,
    /// Change the unit used for mesh import
    SetImportUnit(MeshUnit),
}

/// Application state
pub struct AppState {
    /// Open documents and the active document/node
    pub session: Session,
    /// System-wide pointer notifications
    pub pointer_hub: PointerHub,
    /// Explore/Pose tasks
    pub tasks: TaskManager,
    /// Unit applied to imported meshes
    pub import_unit: MeshUnit,
    /// Pending actions
    pending_actions: Vec<AppAction>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&AppConfig::default())
    }
}

impl AppState {
    /// Create a new app state from configuration
    pub fn new(config: &AppConfig) -> Self {
        Self {
            session: Session::new(),
            pointer_hub: PointerHub::new(),
            tasks: TaskManager::new(config.initial_task, ExploreTask::new(config.view.chrome)),
            import_unit: config.import_unit,
            pending_actions: Vec::new(),
        }
    }

    /// Queue an action
    pub fn queue_action(&mut self, action: AppAction) {
        self.pending_actions.push(action);
    }

    /// Take pending actions
    pub fn take_pending_actions(&mut self) -> Vec<AppAction> {
        std::mem::take(&mut self.pending_actions)
    }

    /// Open a document with a few boxes to pose
    pub fn open_demo_document(&mut self) -> DocumentId {
        self.session.open_document(Document::with_scene("Untitled", demo_scene()))
    }

    /// Scene of the active document
    pub fn active_scene(&self) -> Option<&Scene> {
        self.session.active_document().map(|doc| &doc.scene)
    }
}

/// A ground plate with two blocks standing on it
pub fn demo_scene() -> Scene {
    let mut scene = Scene::new();

    let mut plate = Model::from_mesh("Plate", box_mesh(Vec3::new(8.0, 8.0, 0.5)));
    plate.pose = Mat4::from_translation(Vec3::new(0.0, 0.0, -0.25));
    plate.color = [0.45, 0.45, 0.5, 1.0];
    let (plate_node, _) = scene.add_model(plate);

    let blocks = [
        ("Block A", Vec3::new(1.0, 2.0, 3.0), Vec3::new(-2.0, 0.0, 1.5), [0.9, 0.5, 0.3, 1.0]),
        ("Block B", Vec3::new(2.0, 2.0, 2.0), Vec3::new(2.0, 1.0, 1.0), [0.3, 0.6, 0.9, 1.0]),
    ];
    for (name, size, position, color) in blocks {
        let mut node = Node::new(name);
        node.transform = Mat4::from_translation(position);
        if let Ok(node_id) = scene.add_node(node, Some(plate_node)) {
            let mut model = Model::from_mesh(name, box_mesh(size));
            model.color = color;
            if let Err(e) = scene.attach_model(node_id, model) {
                tracing::warn!("Demo scene: {}", e);
            }
        }
    }

    scene
}

pub type SharedAppState = Arc<Mutex<AppState>>;

/// Create a new shared app state
pub fn create_shared_state(config: &AppConfig) -> SharedAppState {
    Arc::new(Mutex::new(AppState::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene() {
        let scene = demo_scene();
        assert_eq!(scene.model_count(), 3);
        assert_eq!(scene.roots().len(), 1);
        assert!(scene.world_bounds().is_valid());
    }

    #[test]
    fn test_actions_are_drained() {
        let mut state = AppState::default();
        state.queue_action(AppAction::FitView);
        state.queue_action(AppAction::ResetPose);
        assert_eq!(state.take_pending_actions().len(), 2);
        assert!(state.take_pending_actions().is_empty());
    }
}
