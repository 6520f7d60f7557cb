//! Scene graph: node hierarchy, models and selection

mod bounds;
mod selection;
mod types;

use std::collections::HashMap;

use glam::Mat4;
use serde::{Deserialize, Serialize};

pub use bounds::BoundingBox;
pub use selection::Selection;
pub use types::{DocumentId, Mesh, Model, ModelId, Node, NodeId, Part};

use crate::events::{EventHub, Propagation};

/// Notifications published by a scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneEvent {
    /// World bounds of a model (or of everything, when `None`) may have changed
    BoundingBoxChanged { model: Option<ModelId> },
    /// The selected model changed
    SelectionChanged { model: Option<ModelId> },
}

impl Propagation for SceneEvent {}

/// Raw scene data for (de)serialization
#[derive(Debug, Clone, Serialize, Deserialize)]
struct SceneData {
    nodes: Vec<Node>,
    models: Vec<Model>,
    roots: Vec<NodeId>,
}

/// Scene graph
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(from = "SceneData", into = "SceneData")]
pub struct Scene {
    nodes: HashMap<NodeId, Node>,
    models: HashMap<ModelId, Model>,
    /// Top-level nodes in display order
    roots: Vec<NodeId>,
    selection: Selection,
    events: EventHub<SceneEvent>,
}

impl Clone for Scene {
    /// Clones content only; the copy gets its own event hub and no selection
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            models: self.models.clone(),
            roots: self.roots.clone(),
            selection: Selection::default(),
            events: EventHub::new(),
        }
    }
}

impl From<SceneData> for Scene {
    fn from(data: SceneData) -> Self {
        Self {
            nodes: data.nodes.into_iter().map(|n| (n.id, n)).collect(),
            models: data.models.into_iter().map(|m| (m.id, m)).collect(),
            roots: data.roots,
            selection: Selection::default(),
            events: EventHub::new(),
        }
    }
}

impl From<Scene> for SceneData {
    fn from(scene: Scene) -> Self {
        let mut nodes = Vec::with_capacity(scene.nodes.len());
        let mut models = Vec::with_capacity(scene.models.len());
        for id in scene.nodes_depth_first() {
            if let Some(node) = scene.nodes.get(&id) {
                if let Some(model) = node.model.and_then(|m| scene.models.get(&m)) {
                    models.push(model.clone());
                }
                nodes.push(node.clone());
            }
        }
        Self {
            nodes,
            models,
            roots: scene.roots,
        }
    }
}

impl Scene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene notification hub
    pub fn events(&self) -> &EventHub<SceneEvent> {
        &self.events
    }

    fn notify_bounds(&self, model: Option<ModelId>) {
        self.events.emit(SceneEvent::BoundingBoxChanged { model });
    }

    // ============== Nodes ==============

    /// Add a node under `parent` (or as a root), returns its ID
    pub fn add_node(
        &mut self,
        mut node: Node,
        parent: Option<NodeId>,
    ) -> Result<NodeId, SceneError> {
        let id = node.id;
        match parent {
            Some(parent_id) => {
                let parent_node = self
                    .nodes
                    .get_mut(&parent_id)
                    .ok_or(SceneError::NodeNotFound(parent_id))?;
                parent_node.children.push(id);
                node.parent = Some(parent_id);
            }
            None => {
                node.parent = None;
                self.roots.push(id);
            }
        }
        self.nodes.insert(id, node);
        Ok(id)
    }

    /// Attach a model to a node; replaces any model the node already carried
    pub fn attach_model(
        &mut self,
        node_id: NodeId,
        mut model: Model,
    ) -> Result<ModelId, SceneError> {
        let node = self
            .nodes
            .get_mut(&node_id)
            .ok_or(SceneError::NodeNotFound(node_id))?;
        let model_id = model.id;
        model.node = node_id;
        if let Some(previous) = node.model.replace(model_id) {
            self.models.remove(&previous);
        }
        self.models.insert(model_id, model);
        self.notify_bounds(Some(model_id));
        Ok(model_id)
    }

    /// Add a root node carrying `model`, named after it
    pub fn add_model(&mut self, model: Model) -> (NodeId, ModelId) {
        let mut node = Node::new(model.name.clone());
        let node_id = node.id;
        let model_id = model.id;
        node.model = Some(model_id);
        self.nodes.insert(node_id, node);
        self.roots.push(node_id);

        let mut model = model;
        model.node = node_id;
        self.models.insert(model_id, model);
        self.notify_bounds(Some(model_id));
        (node_id, model_id)
    }

    /// Remove a node and its whole subtree
    pub fn remove_node(&mut self, id: NodeId) -> Result<(), SceneError> {
        let parent = self.nodes.get(&id).ok_or(SceneError::NodeNotFound(id))?.parent;
        match parent {
            Some(parent) => {
                if let Some(parent) = self.nodes.get_mut(&parent) {
                    parent.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }

        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if let Some(node) = self.nodes.remove(&current) {
                stack.extend(node.children);
                if let Some(model) = node.model {
                    self.models.remove(&model);
                    if self.selection.selected_model() == Some(model) {
                        self.selection.clear();
                    }
                }
            }
        }
        self.notify_bounds(None);
        Ok(())
    }

    /// Remove everything
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.models.clear();
        self.roots.clear();
        self.selection.clear();
        self.notify_bounds(None);
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Iterate over all nodes (unordered)
    pub fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node IDs in depth-first order from the roots
    pub fn nodes_depth_first(&self) -> Vec<NodeId> {
        let mut result = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.get(&id) {
                result.push(id);
                stack.extend(node.children.iter().rev().copied());
            }
        }
        result
    }

    /// Set a node's local transform
    pub fn set_node_transform(&mut self, id: NodeId, transform: Mat4) -> Result<(), SceneError> {
        let node = self.nodes.get_mut(&id).ok_or(SceneError::NodeNotFound(id))?;
        node.transform = transform;
        self.notify_bounds(None);
        Ok(())
    }

    /// Accumulated transform from the scene root down to `id` (inclusive)
    pub fn node_world_transform(&self, id: NodeId) -> Mat4 {
        let mut transform = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(node) = current.and_then(|c| self.nodes.get(&c)) {
            transform = node.transform * transform;
            current = node.parent;
        }
        transform
    }

    // ============== Models ==============

    pub fn model(&self, id: ModelId) -> Option<&Model> {
        self.models.get(&id)
    }

    /// Model carried by a node
    pub fn model_for_node(&self, id: NodeId) -> Option<ModelId> {
        self.nodes.get(&id).and_then(|n| n.model)
    }

    /// Iterate over all models (unordered)
    pub fn models_iter(&self) -> impl Iterator<Item = &Model> {
        self.models.values()
    }

    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Replace a model's local pose matrix
    pub fn set_model_pose(&mut self, id: ModelId, pose: Mat4) -> Result<(), SceneError> {
        let model = self.models.get_mut(&id).ok_or(SceneError::ModelNotFound(id))?;
        model.pose = pose;
        self.notify_bounds(Some(id));
        Ok(())
    }

    /// Matrix taking model space to world space
    pub fn model_world_transform(&self, id: ModelId) -> Option<Mat4> {
        let model = self.models.get(&id)?;
        Some(self.node_world_transform(model.node) * model.pose)
    }

    /// World bounds of a model's full part hierarchy
    pub fn model_world_bounds(&self, id: ModelId) -> Option<BoundingBox> {
        let model = self.models.get(&id)?;
        let world = self.node_world_transform(model.node) * model.pose;
        let mut bbox = BoundingBox::empty();
        model.visit_parts(|part, transform| {
            bbox.expand_by_box(&part.mesh.bounds().transform(&(world * transform)));
        });
        Some(bbox)
    }

    /// World bounds of everything in the scene
    pub fn world_bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        for id in self.models.keys() {
            if let Some(b) = self.model_world_bounds(*id) {
                bbox.expand_by_box(&b);
            }
        }
        bbox
    }

    // ============== Selection ==============

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Select a model (or clear with `None`)
    pub fn select_model(&mut self, id: Option<ModelId>) {
        let id = id.filter(|m| self.models.contains_key(m));
        if self.selection.selected_model() != id {
            self.selection.set(id);
            self.events.emit(SceneEvent::SelectionChanged { model: id });
        }
    }
}

/// Scene-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum SceneError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodeId),
    #[error("Model not found: {0}")]
    ModelNotFound(ModelId),
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use parking_lot::Mutex;
    use std::sync::Arc;

    use crate::primitive::box_mesh;

    fn cube_model(name: &str) -> Model {
        Model::from_mesh(name, box_mesh(Vec3::ONE))
    }

    #[test]
    fn test_add_model_creates_root_node() {
        let mut scene = Scene::new();
        let (node_id, model_id) = scene.add_model(cube_model("cube"));
        assert_eq!(scene.roots(), &[node_id]);
        assert_eq!(scene.model_for_node(node_id), Some(model_id));
        assert_eq!(scene.model(model_id).map(|m| m.node), Some(node_id));
    }

    #[test]
    fn test_world_bounds_follow_node_and_pose() {
        let mut scene = Scene::new();
        let group = scene.add_node(Node::new("group"), None).unwrap();
        scene
            .set_node_transform(group, Mat4::from_translation(Vec3::new(10.0, 0.0, 0.0)))
            .unwrap();
        let child = scene.add_node(Node::new("child"), Some(group)).unwrap();
        let model_id = scene.attach_model(child, cube_model("cube")).unwrap();
        scene
            .set_model_pose(model_id, Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)))
            .unwrap();

        let bounds = scene.model_world_bounds(model_id).unwrap();
        assert!(bounds.center().abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5));
        assert!(bounds.size().abs_diff_eq(Vec3::ONE, 1e-5));
    }

    #[test]
    fn test_pose_change_publishes_bounds_event() {
        let mut scene = Scene::new();
        let (_, model_id) = scene.add_model(cube_model("cube"));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let _sub = scene.events().subscribe(move |e| sink.lock().push(*e));

        scene.set_model_pose(model_id, Mat4::IDENTITY).unwrap();
        assert_eq!(
            seen.lock().as_slice(),
            &[SceneEvent::BoundingBoxChanged {
                model: Some(model_id)
            }]
        );
    }

    #[test]
    fn test_remove_node_removes_subtree_and_selection() {
        let mut scene = Scene::new();
        let root = scene.add_node(Node::new("root"), None).unwrap();
        let child = scene.add_node(Node::new("child"), Some(root)).unwrap();
        let model_id = scene.attach_model(child, cube_model("cube")).unwrap();
        scene.select_model(Some(model_id));

        scene.remove_node(root).unwrap();
        assert_eq!(scene.node_count(), 0);
        assert_eq!(scene.model_count(), 0);
        assert!(scene.selection().selected_model().is_none());
    }

    #[test]
    fn test_depth_first_order() {
        let mut scene = Scene::new();
        let a = scene.add_node(Node::new("a"), None).unwrap();
        let a1 = scene.add_node(Node::new("a1"), Some(a)).unwrap();
        let b = scene.add_node(Node::new("b"), None).unwrap();
        let a2 = scene.add_node(Node::new("a2"), Some(a)).unwrap();
        assert_eq!(scene.nodes_depth_first(), vec![a, a1, a2, b]);
    }

    #[test]
    fn test_select_unknown_model_clears() {
        let mut scene = Scene::new();
        scene.select_model(Some(ModelId::new()));
        assert!(scene.selection().selected_model().is_none());
    }
}
