//! Properties panel: task selection, pose controls and readouts

use glam::EulerRot;

use pose_core::MeshUnit;

use crate::panels::Panel;
use crate::state::{AppAction, AppState, SharedAppState, SharedViewportState};
use crate::tasks::{PoseMode, TaskKind};

/// Properties panel
#[derive(Default)]
pub struct PropertiesPanel;

impl PropertiesPanel {
    pub fn new() -> Self {
        Self
    }

    fn task_section(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<AppAction>) {
        ui.heading("Task");
        let requested = state.tasks.requested();
        ui.horizontal(|ui| {
            for kind in TaskKind::ALL {
                if ui.radio(requested == kind, kind.name()).clicked() && requested != kind {
                    actions.push(AppAction::SetTask(kind));
                }
            }
        });
    }

    fn pose_section(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<AppAction>) {
        let pose = state.tasks.pose();
        let mode = *pose.mode.get();

        ui.label("Mode");
        ui.horizontal(|ui| {
            for candidate in PoseMode::ALL {
                if ui.radio(mode == candidate, candidate.name()).clicked() && mode != candidate {
                    actions.push(AppAction::SetPoseMode(candidate));
                }
            }
        });
        ui.small(
            "Drag with the left button in the Top, Front or Left view. Ctrl: fine, Shift: coarse.",
        );
        ui.separator();

        let model = pose
            .active_model()
            .and_then(|id| state.active_scene().and_then(|s| s.model(id)));
        let Some(model) = model else {
            ui.label("No model selected");
            return;
        };

        ui.strong(&model.name);
        let size = pose.size.get();
        egui::Grid::new("pose_readout").num_columns(4).show(ui, |ui| {
            ui.label("Size");
            ui.label(format!("{:.3}", size.x));
            ui.label(format!("{:.3}", size.y));
            ui.label(format!("{:.3}", size.z));
            ui.end_row();

            let (_, rotation, translation) = model.pose.to_scale_rotation_translation();
            ui.label("Position");
            ui.label(format!("{:.3}", translation.x));
            ui.label(format!("{:.3}", translation.y));
            ui.label(format!("{:.3}", translation.z));
            ui.end_row();

            let (rx, ry, rz) = rotation.to_euler(EulerRot::XYZ);
            ui.label("Rotation");
            ui.label(format!("{:.1}\u{00b0}", rx.to_degrees()));
            ui.label(format!("{:.1}\u{00b0}", ry.to_degrees()));
            ui.label(format!("{:.1}\u{00b0}", rz.to_degrees()));
            ui.end_row();
        });

        if ui.button("Reset Pose").clicked() {
            actions.push(AppAction::ResetPose);
        }
    }

    fn explore_section(ui: &mut egui::Ui, state: &mut AppState) {
        let explore = state.tasks.explore_mut();
        let mut chrome = explore.chrome();
        ui.label("Show");
        ui.checkbox(&mut chrome.grid, "Grid");
        ui.checkbox(&mut chrome.annotations, "Labels");
        ui.checkbox(&mut chrome.interface, "Captions");
        ui.checkbox(&mut chrome.brackets, "Selection brackets");
        if chrome != explore.chrome() {
            explore.set_chrome(chrome);
        }
    }

    fn import_section(ui: &mut egui::Ui, state: &AppState, actions: &mut Vec<AppAction>) {
        ui.heading("Import");
        let current = state.import_unit;
        egui::ComboBox::from_label("Unit")
            .selected_text(current.name())
            .show_ui(ui, |ui| {
                for unit in MeshUnit::ALL {
                    let clicked = ui.selectable_label(*unit == current, unit.name()).clicked();
                    if clicked && *unit != current {
                        actions.push(AppAction::SetImportUnit(*unit));
                    }
                }
            });
    }
}

impl Panel for PropertiesPanel {
    fn name(&self) -> &str {
        "Properties"
    }

    fn ui(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        viewport_state: &SharedViewportState,
    ) {
        let mut actions = Vec::new();
        let mut state = app_state.lock();

        egui::ScrollArea::vertical().show(ui, |ui| {
            Self::task_section(ui, &state, &mut actions);
            ui.separator();

            match state.tasks.requested() {
                TaskKind::Pose => Self::pose_section(ui, &state, &mut actions),
                TaskKind::Explore => Self::explore_section(ui, &mut state),
            }
            ui.separator();

            ui.heading("View");
            if let Some(resized) = viewport_state.lock().last_resize() {
                ui.label(format!("Canvas {} x {}", resized.width, resized.height));
            }
            if ui.button("Fit View").clicked() {
                actions.push(AppAction::FitView);
            }
            ui.separator();

            Self::import_section(ui, &state, &mut actions);
        });

        for action in actions {
            state.queue_action(action);
        }
    }
}
