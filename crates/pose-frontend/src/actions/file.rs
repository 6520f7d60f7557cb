//! File I/O action handlers

use std::path::PathBuf;

use pose_core::{load_model, Document};

use crate::state::AppAction;

use super::ActionContext;

/// Handle file-related actions
pub fn handle_file_action(action: AppAction, ctx: &ActionContext) {
    match action {
        AppAction::OpenDocument(path) => handle_open_document(path, ctx),
        AppAction::SaveDocument(path) => handle_save_document(path, ctx),
        AppAction::ImportModel(path) => handle_import_model(path, ctx),
        _ => {}
    }
}

fn handle_open_document(path: PathBuf, ctx: &ActionContext) {
    match Document::load(&path) {
        Ok(document) => {
            tracing::info!(
                "Opened document '{}' ({} nodes, {} models)",
                document.name,
                document.scene.node_count(),
                document.scene.model_count()
            );
            ctx.app_state.lock().session.open_document(document);
            ctx.fit_view();
        }
        Err(e) => {
            tracing::error!("Failed to open {}: {}", path.display(), e);
        }
    }
}

fn handle_save_document(path: Option<PathBuf>, ctx: &ActionContext) {
    let mut state = ctx.app_state.lock();
    let Some(document) = state.session.active_document_mut() else {
        tracing::warn!("No active document to save");
        return;
    };

    let Some(path) = path.or_else(|| document.path.clone()) else {
        tracing::warn!("Document '{}' has no path yet", document.name);
        return;
    };

    match document.save(&path) {
        Ok(()) => tracing::info!("Saved document to {}", path.display()),
        Err(e) => tracing::error!("Failed to save document: {}", e),
    }
}

fn handle_import_model(path: PathBuf, ctx: &ActionContext) {
    let unit = ctx.app_state.lock().import_unit;
    let model = match load_model(&path, unit) {
        Ok(model) => model,
        Err(e) => {
            tracing::error!("Failed to import {}: {}", path.display(), e);
            return;
        }
    };
    tracing::info!(
        "Imported model '{}' ({} parts, unit={})",
        model.name,
        model.part_count(),
        unit.name()
    );

    {
        let mut state = ctx.app_state.lock();
        if state.session.active_document().is_none() {
            state.session.open_document(Document::new("Untitled"));
        }
        let Some(document) = state.session.active_document_mut() else {
            return;
        };
        let (node, _) = document.scene.add_model(model);
        document.modified = true;
        state.session.set_active_node(Some(node));
    }
    ctx.fit_view();
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::actions::{dispatch_action, ActionContext};
    use crate::config::{AppConfig, ConfigManager};
    use crate::state::{create_shared_state, ViewportState};
    use parking_lot::Mutex;
    use std::sync::Arc;

    const OBJ: &str = "o Tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn test_import_then_save_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let obj_path = dir.path().join("tri.obj");
        std::fs::File::create(&obj_path)
            .unwrap()
            .write_all(OBJ.as_bytes())
            .unwrap();

        let app_config = AppConfig::default();
        let app_state = create_shared_state(&app_config);
        let pointer_hub = app_state.lock().pointer_hub.clone();
        let viewport_state = Arc::new(Mutex::new(ViewportState::new(
            pointer_hub,
            app_config.view.clone(),
        )));
        let config = Arc::new(Mutex::new(ConfigManager::load_from(dir.path().join("config.ron"))));
        let ctx = ActionContext::new(&app_state, &viewport_state, &config);

        dispatch_action(AppAction::ImportModel(obj_path), &ctx);
        assert_eq!(app_state.lock().active_scene().map(|s| s.model_count()), Some(1));

        let doc_path = dir.path().join("scene.ron");
        dispatch_action(AppAction::SaveDocument(Some(doc_path.clone())), &ctx);
        assert!(doc_path.exists());

        dispatch_action(AppAction::OpenDocument(doc_path), &ctx);
        let state = app_state.lock();
        assert_eq!(state.session.documents().len(), 2);
        assert_eq!(state.active_scene().map(|s| s.model_count()), Some(1));
    }
}
