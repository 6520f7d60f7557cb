//! Menu bar rendering

use crate::state::{AppAction, SharedAppState};
use crate::tasks::{PoseMode, TaskKind};

/// Document file extension
#[cfg(not(target_arch = "wasm32"))]
const DOCUMENT_FILTER: (&str, &[&str]) = ("Pose Document", &["ron"]);

/// Render the menu bar and return any triggered action
pub fn render_menu_bar(ctx: &egui::Context, app_state: &SharedAppState) -> Option<MenuAction> {
    let mut menu_action = None;

    egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            ui.menu_button("File", |ui| {
                if ui.button("New Document").clicked() {
                    app_state.lock().queue_action(AppAction::NewDocument);
                    ui.close_menu();
                }
                #[cfg(not(target_arch = "wasm32"))]
                file_menu_items(ui, app_state);
                ui.separator();
                if ui.button("Exit").clicked() {
                    ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                }
            });

            ui.menu_button("Edit", |ui| {
                if ui.button("Add Box").clicked() {
                    app_state.lock().queue_action(AppAction::CreateBox);
                    ui.close_menu();
                }
                if ui.button("Delete Selected").clicked() {
                    app_state.lock().queue_action(AppAction::DeleteActiveNode);
                    ui.close_menu();
                }
            });

            ui.menu_button("Task", |ui| {
                for kind in TaskKind::ALL {
                    if ui.button(kind.name()).clicked() {
                        app_state.lock().queue_action(AppAction::SetTask(kind));
                        ui.close_menu();
                    }
                }
                ui.separator();
                for mode in [PoseMode::Translate, PoseMode::Rotate] {
                    if ui.button(format!("Pose: {}", mode.name())).clicked() {
                        let mut state = app_state.lock();
                        state.queue_action(AppAction::SetTask(TaskKind::Pose));
                        state.queue_action(AppAction::SetPoseMode(mode));
                        ui.close_menu();
                    }
                }
            });

            ui.menu_button("View", |ui| {
                if ui.button("Fit View").clicked() {
                    app_state.lock().queue_action(AppAction::FitView);
                    ui.close_menu();
                }
                if ui.button("Reset Layout").clicked() {
                    menu_action = Some(MenuAction::ResetLayout);
                    ui.close_menu();
                }
            });
        });
    });

    menu_action
}

#[cfg(not(target_arch = "wasm32"))]
fn file_menu_items(ui: &mut egui::Ui, app_state: &SharedAppState) {
    let (filter_name, extensions) = DOCUMENT_FILTER;

    if ui.button("Open Document...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(filter_name, extensions)
            .pick_file()
        {
            app_state.lock().queue_action(AppAction::OpenDocument(path));
        }
        ui.close_menu();
    }
    if ui.button("Save Document").clicked() {
        let has_path = app_state
            .lock()
            .session
            .active_document()
            .is_some_and(|doc| doc.path.is_some());
        let path = if has_path {
            None
        } else {
            rfd::FileDialog::new()
                .add_filter(filter_name, extensions)
                .save_file()
        };
        if has_path || path.is_some() {
            app_state.lock().queue_action(AppAction::SaveDocument(path));
        }
        ui.close_menu();
    }
    if ui.button("Save Document As...").clicked() {
        let default_name = app_state
            .lock()
            .session
            .active_document()
            .map(|doc| doc.name.clone())
            .unwrap_or_else(|| "untitled".to_string());
        if let Some(path) = rfd::FileDialog::new()
            .add_filter(filter_name, extensions)
            .set_file_name(format!("{}.ron", default_name))
            .save_file()
        {
            app_state.lock().queue_action(AppAction::SaveDocument(Some(path)));
        }
        ui.close_menu();
    }
    ui.separator();
    if ui.button("Import Model...").clicked() {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Meshes", pose_core::MeshFormat::EXTENSIONS)
            .pick_file()
        {
            app_state.lock().queue_action(AppAction::ImportModel(path));
        }
        ui.close_menu();
    }
}

/// Actions triggered by the menu
pub enum MenuAction {
    ResetLayout,
}
