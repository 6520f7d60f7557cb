//! Viewport state shared between the app loop and the viewport panel

use std::sync::Arc;

use parking_lot::Mutex;

use pose_core::{PointerHub, Subscription};
use pose_renderer::ViewConfig;

use crate::element::{ViewportElement, ViewportResized};

/// Viewport state
pub struct ViewportState {
    pub element: ViewportElement,
    last_resize: Arc<Mutex<Option<ViewportResized>>>,
    _resize_subscription: Subscription,
}

impl ViewportState {
    /// Create an unattached viewport publishing pointer input on `pointer_hub`
    pub fn new(pointer_hub: PointerHub, config: ViewConfig) -> Self {
        let element = ViewportElement::new(pointer_hub, config);
        let last_resize = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&last_resize);
        let resize_subscription =
            element
                .resize_events()
                .subscribe(move |event: &mut ViewportResized| {
                    tracing::trace!("Viewport resized to {}x{}", event.width, event.height);
                    *sink.lock() = Some(*event);
                });
        Self {
            element,
            last_resize,
            _resize_subscription: resize_subscription,
        }
    }

    /// Size carried by the most recent resize notification
    pub fn last_resize(&self) -> Option<ViewportResized> {
        *self.last_resize.lock()
    }
}

pub type SharedViewportState = Arc<Mutex<ViewportState>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_resize_notifications() {
        let mut state = ViewportState::new(PointerHub::new(), ViewConfig::default());
        assert!(state.last_resize().is_none());
        state.element.attach(320.0, 240.0);
        state.element.on_window_resize(640.0, 480.0);
        assert_eq!(
            state.last_resize(),
            Some(ViewportResized {
                width: 640.0,
                height: 480.0
            })
        );
    }
}
