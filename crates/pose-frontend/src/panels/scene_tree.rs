//! Scene tree panel: document switcher and node hierarchy

use pose_core::{NodeId, Scene};

use crate::panels::Panel;
use crate::state::{AppAction, SharedAppState, SharedViewportState};

/// Scene tree panel
#[derive(Default)]
pub struct SceneTreePanel;

impl SceneTreePanel {
    pub fn new() -> Self {
        Self
    }
}

fn show_node(
    ui: &mut egui::Ui,
    scene: &Scene,
    id: NodeId,
    active: Option<NodeId>,
    actions: &mut Vec<AppAction>,
) {
    let Some(node) = scene.node(id) else {
        return;
    };
    let label = if node.model.is_some() {
        format!("\u{25a3} {}", node.name)
    } else {
        format!("\u{25cb} {}", node.name)
    };

    let mut select = |ui: &mut egui::Ui| {
        if ui.selectable_label(active == Some(id), label.as_str()).clicked() {
            actions.push(AppAction::SetActiveNode(Some(id)));
        }
    };

    if node.children.is_empty() {
        select(ui);
        return;
    }

    let header_id = ui.make_persistent_id(id.0);
    egui::collapsing_header::CollapsingState::load_with_default_open(ui.ctx(), header_id, true)
        .show_header(ui, |ui| select(ui))
        .body(|ui| {
            for child in &node.children {
                show_node(ui, scene, *child, active, actions);
            }
        });
}

impl Panel for SceneTreePanel {
    fn name(&self) -> &str {
        "Scene"
    }

    fn ui(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        _viewport_state: &SharedViewportState,
    ) {
        let mut actions = Vec::new();
        let mut state = app_state.lock();
        let session = &state.session;

        // Document switcher
        ui.horizontal(|ui| {
            let active_name = session
                .active_document()
                .map(|d| if d.modified { format!("{}*", d.name) } else { d.name.clone() })
                .unwrap_or_else(|| "No document".to_string());
            egui::ComboBox::from_id_salt("document_switcher")
                .selected_text(active_name)
                .show_ui(ui, |ui| {
                    for document in session.documents() {
                        let is_active = session.active_document_id() == Some(document.id);
                        if ui.selectable_label(is_active, &document.name).clicked() && !is_active {
                            actions.push(AppAction::SetActiveDocument(document.id));
                        }
                    }
                });
            if let Some(id) = session.active_document_id() {
                if ui.small_button("\u{2716}").on_hover_text("Close document").clicked() {
                    actions.push(AppAction::CloseDocument(id));
                }
            }
        });
        ui.separator();

        // Toolbar
        ui.horizontal(|ui| {
            if ui.button("+ Box").clicked() {
                actions.push(AppAction::CreateBox);
            }
            let has_active = session.active_node().is_some();
            if ui.add_enabled(has_active, egui::Button::new("Delete")).clicked() {
                actions.push(AppAction::DeleteActiveNode);
            }
        });
        ui.separator();

        egui::ScrollArea::vertical().show(ui, |ui| match session.active_document() {
            Some(document) => {
                let active = session.active_node();
                for root in document.scene.roots() {
                    show_node(ui, &document.scene, *root, active, &mut actions);
                }
                if document.scene.roots().is_empty() {
                    ui.weak("Empty scene");
                }
            }
            None => {
                ui.weak("Open or create a document");
            }
        });

        // Clicking empty space clears the active node
        let background = ui.interact(
            ui.available_rect_before_wrap(),
            ui.id().with("scene_tree_background"),
            egui::Sense::click(),
        );
        if background.clicked() && session.active_node().is_some() {
            actions.push(AppAction::SetActiveNode(None));
        }

        for action in actions {
            state.queue_action(action);
        }
    }
}
