//! Default task: look around the scene in a single view

use pose_core::NodeId;
use pose_renderer::{ChromeFlags, ViewLayout};

use super::{Task, TaskContext};

/// Navigation-only task; keeps the selection in step with the active node
pub struct ExploreTask {
    chrome: ChromeFlags,
    last_node: Option<NodeId>,
}

impl ExploreTask {
    pub fn new(chrome: ChromeFlags) -> Self {
        Self {
            chrome,
            last_node: None,
        }
    }

    /// Chrome applied while exploring
    pub fn chrome(&self) -> ChromeFlags {
        self.chrome
    }

    pub fn set_chrome(&mut self, chrome: ChromeFlags) {
        self.chrome = chrome;
    }

    fn sync_selection(&mut self, ctx: &mut TaskContext) {
        let node = ctx.session.active_node();
        if node == self.last_node {
            return;
        }
        self.last_node = node;
        if let Some(document) = ctx.session.active_document_mut() {
            let model = node.and_then(|n| document.scene.model_for_node(n));
            document.scene.select_model(model);
        }
    }
}

impl Task for ExploreTask {
    fn name(&self) -> &'static str {
        "Explore"
    }

    fn activate(&mut self, ctx: &mut TaskContext) {
        ctx.view.set_layout(ViewLayout::Single);
        ctx.view.set_chrome(self.chrome);
        self.last_node = None;
        self.sync_selection(ctx);
    }

    fn deactivate(&mut self, _ctx: &mut TaskContext) {}

    fn tick(&mut self, ctx: &mut TaskContext) {
        ctx.view.set_chrome(self.chrome);
        self.sync_selection(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use pose_core::{box_mesh, Document, Model, PointerHub, Scene, Session};
    use pose_renderer::RenderView;

    #[test]
    fn test_selection_follows_active_node() {
        let mut scene = Scene::new();
        let (node, model) = scene.add_model(Model::from_mesh("Box", box_mesh(Vec3::ONE)));
        let mut session = Session::new();
        session.open_document(Document::with_scene("Test", scene));

        let mut view = RenderView::new(640.0, 480.0);
        let pointer = PointerHub::new();
        let mut task = ExploreTask::new(ChromeFlags::default());
        let mut ctx = TaskContext {
            session: &mut session,
            view: &mut view,
            pointer: &pointer,
        };
        task.activate(&mut ctx);
        assert_eq!(ctx.view.layout(), ViewLayout::Single);

        ctx.session.set_active_node(Some(node));
        task.tick(&mut ctx);
        let selected = ctx
            .session
            .active_document()
            .and_then(|doc| doc.scene.selection().selected_model());
        assert_eq!(selected, Some(model));
    }
}
