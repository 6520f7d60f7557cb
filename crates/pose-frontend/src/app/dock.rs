//! Dock layout and tab viewer

use egui_dock::{DockState, NodeIndex, TabViewer};

use crate::panels::{Panel, PropertiesPanel, SceneTreePanel, ViewportPanel};
use crate::state::{SharedAppState, SharedViewportState};

/// Panel types for the dock system
pub enum PanelType {
    Viewport(ViewportPanel),
    SceneTree(SceneTreePanel),
    Properties(PropertiesPanel),
}

impl PanelType {
    fn panel_mut(&mut self) -> &mut dyn Panel {
        match self {
            PanelType::Viewport(p) => p,
            PanelType::SceneTree(p) => p,
            PanelType::Properties(p) => p,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PanelType::Viewport(p) => p.name(),
            PanelType::SceneTree(p) => p.name(),
            PanelType::Properties(p) => p.name(),
        }
    }
}

/// Tab viewer for dock area
pub struct PoseTabViewer<'a> {
    pub app_state: &'a SharedAppState,
    pub viewport_state: &'a SharedViewportState,
}

impl TabViewer for PoseTabViewer<'_> {
    type Tab = PanelType;

    fn title(&mut self, tab: &mut Self::Tab) -> egui::WidgetText {
        tab.name().into()
    }

    fn ui(&mut self, ui: &mut egui::Ui, tab: &mut Self::Tab) {
        tab.panel_mut().ui(ui, self.app_state, self.viewport_state);
    }
}

/// Create the default dock layout
pub fn create_dock_layout() -> DockState<PanelType> {
    let mut dock_state = DockState::new(vec![PanelType::Viewport(ViewportPanel::new())]);

    let surface = dock_state.main_surface_mut();

    // Split right for properties
    let [_viewport, _right] = surface.split_right(
        NodeIndex::root(),
        0.75,
        vec![PanelType::Properties(PropertiesPanel::new())],
    );

    // Split left for the scene tree
    let [_left, _viewport] = surface.split_left(
        NodeIndex::root(),
        0.2,
        vec![PanelType::SceneTree(SceneTreePanel::new())],
    );

    dock_state
}
