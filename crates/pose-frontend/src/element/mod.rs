//! Viewport element: owns the canvas, overlay and splitter of the render view
//! and routes pointer input into it
//!
//! The element is either unattached or attached. Attaching creates the
//! canvas, overlay, splitter, render view and input forwarder; detaching
//! disposes the view and drops the forwarder so later input is ignored.

mod splitter;

pub use splitter::{Splitter, SplitterHit};

use glam::Vec2;
use tracing::debug;

use pose_core::{
    EventHub, PointerEvent, PointerEventKind, PointerHub, Propagation, Scene, WheelEvent,
};
use pose_renderer::{build_overlays, RenderView, ViewConfig, ViewLayout, ViewportOverlay};

/// Published after the canvas was re-measured
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportResized {
    pub width: f32,
    pub height: f32,
}

impl Propagation for ViewportResized {}

/// Drawing surface; sizes are whole client pixels
#[derive(Debug, Clone, Copy, Default)]
pub struct Canvas {
    client_width: f32,
    client_height: f32,
}

impl Canvas {
    fn new(width: f32, height: f32) -> Self {
        let mut canvas = Self::default();
        canvas.measure(width, height);
        canvas
    }

    fn measure(&mut self, width: f32, height: f32) {
        self.client_width = width.max(0.0).floor();
        self.client_height = height.max(0.0).floor();
    }

    pub fn client_width(&self) -> f32 {
        self.client_width
    }

    pub fn client_height(&self) -> f32 {
        self.client_height
    }

    pub fn client_size(&self) -> Vec2 {
        Vec2::new(self.client_width, self.client_height)
    }
}

/// Region above the canvas holding the projected chrome
#[derive(Debug, Default)]
pub struct Overlay {
    viewports: Vec<ViewportOverlay>,
}

impl Overlay {
    /// Re-project scene content for every visible viewport
    pub fn rebuild(&mut self, view: &RenderView, scene: Option<&Scene>, config: &ViewConfig) {
        self.viewports = match scene {
            Some(scene) => build_overlays(view, scene, config),
            None => build_overlays(view, &Scene::new(), config),
        };
    }

    pub fn viewports(&self) -> &[ViewportOverlay] {
        &self.viewports
    }
}

/// Routes element input into the splitter, the system pointer hub and the
/// view's camera navigation
#[derive(Debug)]
struct InputForwarder {
    pointer_hub: PointerHub,
    /// Viewport that received the button press of the current drag
    captured: Option<usize>,
}

impl InputForwarder {
    fn new(pointer_hub: PointerHub) -> Self {
        Self {
            pointer_hub,
            captured: None,
        }
    }

    fn resolve_viewport(&mut self, view: &RenderView, event: &PointerEvent) -> Option<usize> {
        let under_pointer = view.viewport_at(event.position);
        match event.kind {
            PointerEventKind::Down => {
                self.captured = under_pointer;
                under_pointer
            }
            PointerEventKind::Up => self.captured.take().or(under_pointer),
            PointerEventKind::Move if event.buttons.0 != 0 => self.captured.or(under_pointer),
            PointerEventKind::Move => under_pointer,
        }
    }

    fn forward_pointer(
        &mut self,
        mut event: PointerEvent,
        splitter: &mut Splitter,
        view: &mut RenderView,
    ) -> PointerEvent {
        event.viewport = self.resolve_viewport(view, &event);

        if view.layout() == ViewLayout::Quad && splitter.handle_pointer(&mut event, view) {
            return event;
        }

        self.pointer_hub.publish(&mut event);
        if !event.is_consumed() {
            view.navigate_pointer(&event);
        }
        event
    }

    fn forward_wheel(&mut self, mut event: WheelEvent, view: &mut RenderView) -> bool {
        event.viewport = view.viewport_at(event.position);
        view.navigate_wheel(&event)
    }
}

struct Attached {
    canvas: Canvas,
    overlay: Overlay,
    splitter: Splitter,
    view: RenderView,
    forwarder: InputForwarder,
}

enum ElementState {
    Unattached,
    Attached(Box<Attached>),
}

/// Container element hosting the render view
pub struct ViewportElement {
    state: ElementState,
    pointer_hub: PointerHub,
    resized: EventHub<ViewportResized>,
    config: ViewConfig,
}

impl ViewportElement {
    /// Create an unattached element that will publish pointer events on `pointer_hub`
    pub fn new(pointer_hub: PointerHub, config: ViewConfig) -> Self {
        Self {
            state: ElementState::Unattached,
            pointer_hub,
            resized: EventHub::new(),
            config,
        }
    }

    pub fn is_attached(&self) -> bool {
        matches!(self.state, ElementState::Attached(_))
    }

    /// Resize notifications
    pub fn resize_events(&self) -> &EventHub<ViewportResized> {
        &self.resized
    }

    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Create the canvas, overlay, splitter, view and input forwarder
    pub fn attach(&mut self, width: f32, height: f32) {
        if self.is_attached() {
            return;
        }
        let canvas = Canvas::new(width, height);
        let view = RenderView::with_config(
            canvas.client_width(),
            canvas.client_height(),
            &self.config,
        );
        debug!(
            "Viewport element attached ({}x{})",
            canvas.client_width(),
            canvas.client_height()
        );
        self.state = ElementState::Attached(Box::new(Attached {
            canvas,
            overlay: Overlay::default(),
            splitter: Splitter::new(),
            view,
            forwarder: InputForwarder::new(self.pointer_hub.clone()),
        }));
    }

    /// Dispose the view and stop forwarding input
    pub fn detach(&mut self) {
        if let ElementState::Attached(mut attached) =
            std::mem::replace(&mut self.state, ElementState::Unattached)
        {
            attached.view.dispose();
            debug!("Viewport element detached");
        }
    }

    /// Re-measure the canvas after the host window changed size
    pub fn on_window_resize(&mut self, width: f32, height: f32) {
        let ElementState::Attached(attached) = &mut self.state else {
            return;
        };
        attached.canvas.measure(width, height);
        let size = attached.canvas.client_size();
        attached.view.resize(size.x, size.y);
        self.resized.emit(ViewportResized {
            width: size.x,
            height: size.y,
        });
    }

    /// Forward a pointer event; returns it with the source viewport and
    /// consumed state filled in, or `None` while unattached
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<PointerEvent> {
        let ElementState::Attached(attached) = &mut self.state else {
            return None;
        };
        let Attached {
            splitter,
            view,
            forwarder,
            ..
        } = attached.as_mut();
        Some(forwarder.forward_pointer(event, splitter, view))
    }

    /// Forward a wheel event; returns whether a camera moved
    pub fn handle_wheel(&mut self, event: WheelEvent) -> bool {
        match &mut self.state {
            ElementState::Attached(attached) => {
                let Attached { view, forwarder, .. } = attached.as_mut();
                forwarder.forward_wheel(event, view)
            }
            ElementState::Unattached => false,
        }
    }

    pub fn view(&self) -> Option<&RenderView> {
        match &self.state {
            ElementState::Attached(attached) => Some(&attached.view),
            ElementState::Unattached => None,
        }
    }

    pub fn view_mut(&mut self) -> Option<&mut RenderView> {
        match &mut self.state {
            ElementState::Attached(attached) => Some(&mut attached.view),
            ElementState::Unattached => None,
        }
    }

    pub fn canvas(&self) -> Option<&Canvas> {
        match &self.state {
            ElementState::Attached(attached) => Some(&attached.canvas),
            ElementState::Unattached => None,
        }
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        match &self.state {
            ElementState::Attached(attached) => Some(&attached.overlay),
            ElementState::Unattached => None,
        }
    }

    pub fn splitter(&self) -> Option<&Splitter> {
        match &self.state {
            ElementState::Attached(attached) => Some(&attached.splitter),
            ElementState::Unattached => None,
        }
    }

    /// Rebuild the overlay from the current view and scene
    pub fn refresh_overlay(&mut self, scene: Option<&Scene>) {
        if let ElementState::Attached(attached) = &mut self.state {
            let Attached { overlay, view, .. } = attached.as_mut();
            overlay.rebuild(view, scene, &self.config);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;
    use pose_core::PointerButtons;

    use super::*;

    fn attached_element() -> (ViewportElement, PointerHub) {
        let hub = PointerHub::new();
        let mut element = ViewportElement::new(hub.clone(), ViewConfig::default());
        element.attach(800.0, 600.0);
        (element, hub)
    }

    #[test]
    fn test_attach_is_idempotent() {
        let (mut element, _hub) = attached_element();
        assert!(element.is_attached());
        element.attach(10.0, 10.0);
        assert_eq!(element.canvas().map(Canvas::client_size), Some(Vec2::new(800.0, 600.0)));
    }

    #[test]
    fn test_resize_publishes_client_size() {
        let (mut element, _hub) = attached_element();
        let received = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&received);
        let _subscription = element
            .resize_events()
            .subscribe(move |event: &mut ViewportResized| sink.lock().push(*event));

        element.on_window_resize(1024.6, 700.2);
        let canvas = element.canvas().map(Canvas::client_size).expect("canvas");
        assert_eq!(
            received.lock().as_slice(),
            &[ViewportResized {
                width: canvas.x,
                height: canvas.y,
            }]
        );
        assert_eq!(element.view().map(RenderView::size), Some(canvas));
    }

    #[test]
    fn test_resize_ignored_while_unattached() {
        let mut element = ViewportElement::new(PointerHub::new(), ViewConfig::default());
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let _subscription = element
            .resize_events()
            .subscribe(move |_: &mut ViewportResized| *sink.lock() += 1);
        element.on_window_resize(100.0, 100.0);
        assert_eq!(*count.lock(), 0);
    }

    #[test]
    fn test_pointer_published_with_viewport() {
        let (mut element, hub) = attached_element();
        let seen = Arc::new(Mutex::new(None));
        let sink = Arc::clone(&seen);
        let _subscription = hub.subscribe(move |event: &mut PointerEvent| {
            *sink.lock() = event.viewport;
        });

        let event = PointerEvent::moved(Vec2::new(10.0, 10.0), Vec2::ONE, PointerButtons::NONE);
        let routed = element.handle_pointer(event).expect("attached");
        assert_eq!(routed.viewport, Some(0));
        assert_eq!(*seen.lock(), Some(0));
    }

    #[test]
    fn test_consumed_events_skip_navigation() {
        let (mut element, hub) = attached_element();
        let _subscription = hub.subscribe(|event: &mut PointerEvent| event.stop_propagation());

        let before = element.view().map(|v| v.viewports()[0].camera.position);
        let event = PointerEvent::moved(
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 0.0),
            PointerButtons::SECONDARY,
        );
        element.handle_pointer(event);
        assert_eq!(element.view().map(|v| v.viewports()[0].camera.position), before);
    }

    #[test]
    fn test_unconsumed_secondary_drag_orbits() {
        let (mut element, _hub) = attached_element();
        let before = element.view().map(|v| v.viewports()[0].camera.position);
        let event = PointerEvent::moved(
            Vec2::new(10.0, 10.0),
            Vec2::new(30.0, 0.0),
            PointerButtons::SECONDARY,
        );
        element.handle_pointer(event);
        assert_ne!(element.view().map(|v| v.viewports()[0].camera.position), before);
    }

    #[test]
    fn test_drag_stays_in_pressed_viewport() {
        let (mut element, _hub) = attached_element();
        if let Some(view) = element.view_mut() {
            view.set_layout(ViewLayout::Quad);
        }
        let down = PointerEvent::new(
            PointerEventKind::Down,
            Vec2::new(100.0, 100.0),
            PointerButtons::PRIMARY,
        );
        assert_eq!(element.handle_pointer(down).and_then(|e| e.viewport), Some(1));

        // Crossing into the Front pane keeps the Top pane as source
        let drag = PointerEvent::moved(
            Vec2::new(700.0, 100.0),
            Vec2::new(600.0, 0.0),
            PointerButtons::PRIMARY,
        );
        assert_eq!(element.handle_pointer(drag).and_then(|e| e.viewport), Some(1));
    }

    #[test]
    fn test_detach_disposes_and_ignores_input() {
        let (mut element, hub) = attached_element();
        let count = Arc::new(Mutex::new(0));
        let sink = Arc::clone(&count);
        let _subscription = hub.subscribe(move |_: &mut PointerEvent| *sink.lock() += 1);

        element.detach();
        assert!(!element.is_attached());
        assert!(element.view().is_none());
        let event = PointerEvent::moved(Vec2::ZERO, Vec2::ONE, PointerButtons::PRIMARY);
        assert!(element.handle_pointer(event).is_none());
        assert!(!element.handle_wheel(WheelEvent::new(Vec2::ZERO, 1.0)));
        assert_eq!(*count.lock(), 0);
    }
}
