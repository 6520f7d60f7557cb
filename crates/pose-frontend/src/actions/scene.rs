//! Session and scene action handlers

use glam::Vec3;

use pose_core::{box_mesh, Document, DocumentId, MeshUnit, Model, NodeId};

use crate::state::AppAction;

use super::ActionContext;

/// Handle session and scene actions
pub fn handle_scene_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::NewDocument => handle_new_document(ctx),
        AppAction::SetActiveDocument(id) => handle_set_active_document(id, ctx),
        AppAction::CloseDocument(id) => handle_close_document(id, ctx),
        AppAction::SetActiveNode(id) => handle_set_active_node(id, ctx),
        AppAction::CreateBox => handle_create_box(ctx),
        AppAction::DeleteActiveNode => handle_delete_active_node(ctx),
        AppAction::SetImportUnit(unit) => handle_set_import_unit(unit, ctx),
        _ => {}
    }
}

fn handle_new_document(ctx: &ActionContext) {
    let mut state = ctx.app_state.lock();
    let name = format!("Untitled {}", state.session.documents().len() + 1);
    tracing::info!("New document: {}", name);
    state.session.open_document(Document::new(name));
}

fn handle_set_active_document(id: DocumentId, ctx: &ActionContext) {
    ctx.app_state.lock().session.set_active_document(Some(id));
    ctx.fit_view();
}

fn handle_close_document(id: DocumentId, ctx: &ActionContext) {
    if let Some(document) = ctx.app_state.lock().session.close_document(id) {
        if document.modified {
            tracing::warn!("Closed document '{}' with unsaved changes", document.name);
        } else {
            tracing::info!("Closed document '{}'", document.name);
        }
    }
}

fn handle_set_active_node(id: Option<NodeId>, ctx: &ActionContext) {
    ctx.app_state.lock().session.set_active_node(id);
}

fn handle_create_box(ctx: &ActionContext) {
    let mut state = ctx.app_state.lock();
    if state.session.active_document().is_none() {
        state.session.open_document(Document::new("Untitled"));
    }
    let Some(document) = state.session.active_document_mut() else {
        return;
    };
    let name = format!("Box {}", document.scene.model_count() + 1);
    let (node, _) = document.scene.add_model(Model::from_mesh(name.clone(), box_mesh(Vec3::ONE)));
    document.modified = true;
    tracing::info!("Created {}", name);
    state.session.set_active_node(Some(node));
}

fn handle_delete_active_node(ctx: &ActionContext) {
    let mut state = ctx.app_state.lock();
    let Some(node) = state.session.active_node() else {
        return;
    };
    state.session.set_active_node(None);
    if let Some(document) = state.session.active_document_mut() {
        match document.scene.remove_node(node) {
            Ok(()) => {
                document.modified = true;
                tracing::info!("Deleted node {}", node);
            }
            Err(e) => tracing::error!("Failed to delete node: {}", e),
        }
    }
}

fn handle_set_import_unit(unit: MeshUnit, ctx: &ActionContext) {
    ctx.app_state.lock().import_unit = unit;
    let mut config = ctx.config.lock();
    config.config_mut().import_unit = unit;
    if let Err(e) = config.save() {
        tracing::warn!("Failed to save configuration: {}", e);
    }
}
