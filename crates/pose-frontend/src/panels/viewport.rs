//! Viewport panel: hosts the viewport element and paints its overlay

use glam::Vec2;

use pose_core::{Modifiers, PointerButtons, PointerEvent, PointerEventKind, WheelEvent};
use pose_renderer::ViewLayout;

use crate::element::ViewportElement;
use crate::panels::{color32, Panel};
use crate::state::{SharedAppState, SharedViewportState};

const BUTTONS: [(egui::PointerButton, PointerButtons); 3] = [
    (egui::PointerButton::Primary, PointerButtons::PRIMARY),
    (egui::PointerButton::Secondary, PointerButtons::SECONDARY),
    (egui::PointerButton::Middle, PointerButtons::MIDDLE),
];

/// Physical Ctrl, not the platform command key (Cmd on macOS)
fn pointer_modifiers(m: egui::Modifiers) -> Modifiers {
    Modifiers {
        ctrl: m.ctrl,
        shift: m.shift,
        alt: m.alt,
    }
}

/// Viewport panel
#[derive(Default)]
pub struct ViewportPanel {
    last_size: egui::Vec2,
}

impl ViewportPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the element attached and sized to the panel
    fn sync_element(&mut self, element: &mut ViewportElement, size: egui::Vec2) {
        if !element.is_attached() {
            element.attach(size.x, size.y);
            self.last_size = size;
        } else if size != self.last_size {
            element.on_window_resize(size.x, size.y);
            self.last_size = size;
        }
    }

    /// Translate egui input on `response` into element pointer/wheel events
    fn forward_input(
        &self,
        ui: &egui::Ui,
        response: &egui::Response,
        element: &mut ViewportElement,
    ) -> bool {
        let origin = response.rect.min;
        let Some(pos) = response.interact_pointer_pos().or(response.hover_pos()) else {
            return false;
        };
        let position = Vec2::new(pos.x - origin.x, pos.y - origin.y);
        let (movement, modifiers, scroll) = ui.input(|i| {
            (
                Vec2::new(i.pointer.delta().x, i.pointer.delta().y),
                pointer_modifiers(i.modifiers),
                i.smooth_scroll_delta.y,
            )
        });

        let mut forwarded = false;
        for (button, mask) in BUTTONS {
            if response.drag_started_by(button) {
                let event = PointerEvent::new(
                    PointerEventKind::Down,
                    position,
                    mask).with_modifiers(modifiers,
                );
                element.handle_pointer(event);
                forwarded = true;
            }
        }

        let held = BUTTONS
            .iter()
            .filter(|(button, _)| response.dragged_by(*button))
            .fold(PointerButtons::NONE, |acc, (_, mask)| acc | *mask);
        if movement != Vec2::ZERO {
            let event = PointerEvent::moved(position, movement, held).with_modifiers(modifiers);
            element.handle_pointer(event);
            forwarded = true;
        }

        for (button, mask) in BUTTONS {
            if response.drag_stopped_by(button) {
                let event = PointerEvent::new(
                    PointerEventKind::Up,
                    position,
                    mask).with_modifiers(modifiers,
                );
                element.handle_pointer(event);
                forwarded = true;
            }
        }

        if response.hovered() && scroll != 0.0 {
            let event = WheelEvent {
                modifiers,
                ..WheelEvent::new(position, scroll)
            };
            forwarded |= element.handle_wheel(event);
        }

        // Splitter cursor feedback
        if let (Some(view), Some(splitter)) = (element.view(), element.splitter()) {
            if let Some(hit) = splitter.hit_test(view, position) {
                let icon = match (hit.vertical, hit.horizontal) {
                    (true, true) => egui::CursorIcon::Move,
                    (true, false) => egui::CursorIcon::ResizeHorizontal,
                    _ => egui::CursorIcon::ResizeVertical,
                };
                ui.ctx().set_cursor_icon(icon);
            }
        }

        forwarded
    }

    fn paint(&self, painter: &egui::Painter, rect: egui::Rect, element: &ViewportElement) {
        let config = element.config();
        painter.rect_filled(rect, 0.0, color32(config.background_color));

        let (Some(view), Some(overlay)) = (element.view(), element.overlay()) else {
            return;
        };
        let to_screen = |p: Vec2| rect.min + egui::vec2(p.x, p.y);

        for viewport in overlay.viewports() {
            let r = viewport.rect;
            let pane = egui::Rect::from_min_size(
                to_screen(Vec2::new(r.x, r.y)),
                egui::vec2(r.width, r.height),
            );
            let pane_painter = painter.with_clip_rect(pane.intersect(rect));

            for line in &viewport.lines {
                pane_painter.line_segment(
                    [to_screen(line.start), to_screen(line.end)],
                    egui::Stroke::new(1.0, color32(line.color)),
                );
            }
            for label in &viewport.labels {
                pane_painter.text(
                    to_screen(label.position),
                    egui::Align2::CENTER_BOTTOM,
                    &label.text,
                    egui::FontId::proportional(12.0),
                    color32(label.color),
                );
            }
            if let Some(caption) = viewport.caption {
                pane_painter.text(
                    pane.min + egui::vec2(6.0, 4.0),
                    egui::Align2::LEFT_TOP,
                    caption,
                    egui::FontId::proportional(13.0),
                    egui::Color32::from_gray(200),
                );
            }
        }

        if view.layout() == ViewLayout::Quad {
            let split = view.split_px();
            let stroke = egui::Stroke::new(2.0, egui::Color32::from_gray(70));
            let x = rect.min.x + split.x;
            let y = rect.min.y + split.y;
            painter.line_segment([egui::pos2(x, rect.min.y), egui::pos2(x, rect.max.y)], stroke);
            painter.line_segment([egui::pos2(rect.min.x, y), egui::pos2(rect.max.x, y)], stroke);
        }
    }
}

impl Panel for ViewportPanel {
    fn name(&self) -> &str {
        "Viewport"
    }

    fn ui(
        &mut self,
        ui: &mut egui::Ui,
        app_state: &SharedAppState,
        viewport_state: &SharedViewportState,
    ) {
        let size = ui.available_size();
        if size.x < 1.0 || size.y < 1.0 {
            return;
        }
        let (response, painter) = ui.allocate_painter(size, egui::Sense::click_and_drag());

        let app = app_state.lock();
        let mut vp = viewport_state.lock();
        self.sync_element(&mut vp.element, response.rect.size());

        if self.forward_input(ui, &response, &mut vp.element) {
            ui.ctx().request_repaint();
        }

        vp.element.refresh_overlay(app.active_scene());
        self.paint(&painter, response.rect, &vp.element);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctrl_key_gives_fine_speed() {
        assert_eq!(pointer_modifiers(egui::Modifiers::CTRL).speed_multiplier(), 0.1);
        assert_eq!(pointer_modifiers(egui::Modifiers::SHIFT).speed_multiplier(), 10.0);
    }

    #[test]
    fn test_mac_command_key_is_not_ctrl() {
        let modifiers = pointer_modifiers(egui::Modifiers::MAC_CMD);
        assert!(!modifiers.ctrl);
        assert_eq!(modifiers.speed_multiplier(), 1.0);
    }
}
