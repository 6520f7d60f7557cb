//! Draggable divider between the quad view panes

use glam::Vec2;

use pose_core::{PointerEvent, PointerEventKind, Propagation};
use pose_renderer::{RenderView, ViewLayout};

/// Half-width of the grab area around a split line, in pixels
const GRAB_RADIUS: f32 = 4.0;

/// Which split lines a grab point touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitterHit {
    /// Near the vertical line (moves the horizontal split fraction)
    pub vertical: bool,
    /// Near the horizontal line (moves the vertical split fraction)
    pub horizontal: bool,
}

/// Splitter state
#[derive(Debug, Default)]
pub struct Splitter {
    dragging: Option<SplitterHit>,
}

impl Splitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a split drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.dragging.is_some()
    }

    /// Split lines under `position`, if the view is in quad layout
    pub fn hit_test(&self, view: &RenderView, position: Vec2) -> Option<SplitterHit> {
        if view.layout() != ViewLayout::Quad {
            return None;
        }
        let split = view.split_px();
        let hit = SplitterHit {
            vertical: (position.x - split.x).abs() <= GRAB_RADIUS,
            horizontal: (position.y - split.y).abs() <= GRAB_RADIUS,
        };
        (hit.vertical || hit.horizontal).then_some(hit)
    }

    /// Offer a pointer event to the splitter; returns true when it was claimed
    pub fn handle_pointer(&mut self, event: &mut PointerEvent, view: &mut RenderView) -> bool {
        if view.layout() != ViewLayout::Quad {
            self.dragging = None;
            return false;
        }

        match event.kind {
            PointerEventKind::Down if event.buttons.primary() => {
                self.dragging = self.hit_test(view, event.position);
            }
            PointerEventKind::Move => {
                let Some(hit) = self.dragging else {
                    return false;
                };
                if !event.buttons.primary() {
                    self.dragging = None;
                    return false;
                }
                let size = view.size();
                if size.x > 0.0 && size.y > 0.0 {
                    let mut split = view.split();
                    if hit.vertical {
                        split.x = event.position.x / size.x;
                    }
                    if hit.horizontal {
                        split.y = event.position.y / size.y;
                    }
                    view.set_split(split);
                }
            }
            PointerEventKind::Up => {
                if self.dragging.take().is_none() {
                    return false;
                }
                event.stop_propagation();
                return true;
            }
            _ => {}
        }

        if self.dragging.is_some() {
            event.stop_propagation();
        }
        event.is_consumed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::PointerButtons;

    fn quad_view() -> RenderView {
        let mut view = RenderView::new(1000.0, 800.0);
        view.set_layout(ViewLayout::Quad);
        view
    }

    #[test]
    fn test_drag_moves_vertical_split() {
        let mut view = quad_view();
        let mut splitter = Splitter::new();

        let mut down = PointerEvent::new(
            PointerEventKind::Down,
            Vec2::new(502.0, 100.0),
            PointerButtons::PRIMARY,
        );
        assert!(splitter.handle_pointer(&mut down, &mut view));
        assert!(down.is_consumed());

        let mut drag = PointerEvent::moved(
            Vec2::new(300.0, 100.0),
            Vec2::new(-202.0, 0.0),
            PointerButtons::PRIMARY,
        );
        assert!(splitter.handle_pointer(&mut drag, &mut view));
        assert!((view.split().x - 0.3).abs() < 1e-5);
        assert!((view.split().y - 0.5).abs() < 1e-5);

        let mut up = PointerEvent::new(
            PointerEventKind::Up,
            Vec2::new(300.0, 100.0),
            PointerButtons::PRIMARY,
        );
        assert!(splitter.handle_pointer(&mut up, &mut view));
        assert!(!splitter.is_dragging());
    }

    #[test]
    fn test_ignores_pointer_away_from_lines() {
        let mut view = quad_view();
        let mut splitter = Splitter::new();
        let mut down = PointerEvent::new(
            PointerEventKind::Down,
            Vec2::new(100.0, 100.0),
            PointerButtons::PRIMARY,
        );
        assert!(!splitter.handle_pointer(&mut down, &mut view));
        assert!(!down.is_consumed());
    }

    #[test]
    fn test_single_layout_has_no_splitter() {
        let mut view = RenderView::new(1000.0, 800.0);
        let splitter = Splitter::new();
        assert!(splitter.hit_test(&view, Vec2::new(500.0, 400.0)).is_none());

        let mut splitter = splitter;
        let mut down = PointerEvent::new(
            PointerEventKind::Down,
            Vec2::new(500.0, 400.0),
            PointerButtons::PRIMARY,
        );
        assert!(!splitter.handle_pointer(&mut down, &mut view));
    }
}
