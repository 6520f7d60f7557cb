//! Pose editing task
//!
//! Converts primary-button drags in an orthographic viewport into rotation
//! or translation deltas for the model carried by the active node.

use std::sync::Arc;

use glam::{Mat4, Quat, Vec2, Vec3};
use parking_lot::Mutex;
use tracing::{debug, info};

use pose_core::{
    DocumentId, ModelId, NodeId, PointerEvent, PointerEventKind, SceneEvent, Session,
    SessionEvent, Subscription, ROTATION_RADIANS_PER_PIXEL,
};
use pose_renderer::{ChromeFlags, ViewLayout};

use super::{Property, Task, TaskContext};

/// What a primary drag does to the active model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PoseMode {
    #[default]
    Off,
    Translate,
    Rotate,
}

impl PoseMode {
    pub const ALL: [PoseMode; 3] = [PoseMode::Off, PoseMode::Translate, PoseMode::Rotate];

    pub fn name(&self) -> &'static str {
        match self {
            PoseMode::Off => "Off",
            PoseMode::Translate => "Translate",
            PoseMode::Rotate => "Rotate",
        }
    }
}

/// Chrome shown while posing
pub const POSE_CHROME: ChromeFlags = ChromeFlags {
    grid: true,
    annotations: false,
    interface: false,
    brackets: true,
};

/// Pointer movement collected between ticks
#[derive(Debug, Default)]
struct DragState {
    delta: Vec2,
    source: Option<usize>,
}

/// Notifications queued by handlers and processed on the next tick
#[derive(Debug, Default)]
struct Inbox {
    session: Vec<SessionEvent>,
    bounds_changed: bool,
}

/// Build the transform delta for a drag in an orthographic viewport
///
/// `orientation` is the camera's world orientation, `ortho_size` the world
/// height covered by the view and `viewport_height` its height in pixels.
pub fn pose_delta(
    mode: PoseMode,
    delta: Vec2,
    orientation: Quat,
    ortho_size: f32,
    viewport_height: f32,
) -> Option<Mat4> {
    match mode {
        PoseMode::Off => None,
        PoseMode::Rotate => {
            let angle = (delta.x - delta.y) * ROTATION_RADIANS_PER_PIXEL;
            let axis = (orientation * Vec3::NEG_Z).normalize();
            Some(Mat4::from_axis_angle(axis, angle))
        }
        PoseMode::Translate => {
            if viewport_height <= 0.0 {
                return None;
            }
            let f = ortho_size / viewport_height;
            let vector = orientation * Vec3::new(delta.x * f, -delta.y * f, 0.0);
            Some(Mat4::from_translation(vector))
        }
    }
}

/// Task editing the pose of the active node's model
pub struct PoseTask {
    /// Input: manipulation mode
    pub mode: Property<PoseMode>,
    /// Output: world-space bounding box size of the active model
    pub size: Property<Vec3>,
    drag: Arc<Mutex<DragState>>,
    inbox: Arc<Mutex<Inbox>>,
    active_document: Option<DocumentId>,
    active_model: Option<ModelId>,
    pointer_subscription: Option<Subscription>,
    session_subscription: Option<Subscription>,
    bounds_subscription: Option<Subscription>,
    saved_view: Option<(ViewLayout, ChromeFlags)>,
}

impl Default for PoseTask {
    fn default() -> Self {
        Self::new()
    }
}

impl PoseTask {
    pub fn new() -> Self {
        Self {
            mode: Property::new(PoseMode::Off),
            size: Property::new(Vec3::ZERO),
            drag: Arc::new(Mutex::new(DragState::default())),
            inbox: Arc::new(Mutex::new(Inbox::default())),
            active_document: None,
            active_model: None,
            pointer_subscription: None,
            session_subscription: None,
            bounds_subscription: None,
            saved_view: None,
        }
    }

    /// Whether the task holds its subscriptions
    pub fn is_active(&self) -> bool {
        self.pointer_subscription.is_some()
    }

    /// Model currently being posed
    pub fn active_model(&self) -> Option<ModelId> {
        self.active_model
    }

    /// Pointer movement accumulated since the last tick
    pub fn pending_delta(&self) -> Vec2 {
        self.drag.lock().delta
    }

    /// Put the active model back at its identity pose
    pub fn reset_pose(&mut self, session: &mut Session) {
        let Some(model) = self.active_model else {
            return;
        };
        let Some(document) = session.active_document_mut() else {
            return;
        };
        if document.scene.set_model_pose(model, Mat4::IDENTITY).is_ok() {
            info!("Reset pose of model {}", model);
            document.modified = true;
            self.inbox.lock().bounds_changed = false;
            self.recompute_size(session);
        }
    }

    fn subscribe_pointer(&mut self, ctx: &TaskContext) {
        let drag = Arc::clone(&self.drag);
        self.pointer_subscription = Some(ctx.pointer.subscribe(move |event: &mut PointerEvent| {
            if !event.is_primary_drag() {
                return;
            }
            if event.kind == PointerEventKind::Move {
                let speed = event.modifiers.speed_multiplier();
                let mut state = drag.lock();
                state.delta += event.movement * speed;
                state.source = event.viewport;
            }
            event.stop_propagation();
        }));
    }

    fn subscribe_session(&mut self, ctx: &TaskContext) {
        let inbox = Arc::clone(&self.inbox);
        self.session_subscription = Some(ctx.session.events().subscribe(move |event| {
            inbox.lock().session.push(*event);
        }));
    }

    /// Move the bounding-box listener to the scene of `document`
    fn adopt_document(&mut self, session: &Session, document: Option<DocumentId>) {
        self.bounds_subscription = None;
        self.active_document = document;

        let Some(doc) = document.and_then(|id| session.document(id)) else {
            return;
        };
        let inbox = Arc::clone(&self.inbox);
        self.bounds_subscription = Some(doc.scene.events().subscribe(move |event| {
            if let SceneEvent::BoundingBoxChanged { .. } = event {
                inbox.lock().bounds_changed = true;
            }
        }));
        debug!("Pose task following document {}", doc.id);
    }

    /// Take over the model carried by `node`
    fn adopt_node(&mut self, session: &mut Session, node: Option<NodeId>) {
        self.active_model = session
            .active_document()
            .and_then(|doc| node.and_then(|n| doc.scene.model_for_node(n)));

        if let Some(model) = self.active_model {
            if let Some(document) = session.active_document_mut() {
                document.scene.select_model(Some(model));
            }
            self.recompute_size(session);
        }
    }

    /// World bounds of the whole active model hierarchy, published as `size`
    fn recompute_size(&mut self, session: &Session) {
        let Some(model) = self.active_model else {
            return;
        };
        if let Some(bounds) = session
            .active_document()
            .and_then(|doc| doc.scene.model_world_bounds(model))
        {
            self.size.set(bounds.size());
        }
    }

    fn process_inbox(&mut self, session: &mut Session) {
        let (events, bounds_changed) = {
            let mut inbox = self.inbox.lock();
            (
                std::mem::take(&mut inbox.session),
                std::mem::take(&mut inbox.bounds_changed),
            )
        };

        for event in events {
            match event {
                SessionEvent::ActiveDocumentChanged { current, .. } => {
                    self.adopt_document(session, current);
                }
                SessionEvent::ActiveNodeChanged { current, .. } => {
                    self.adopt_node(session, current);
                }
            }
        }

        if bounds_changed {
            self.recompute_size(session);
        }
    }

    /// Drain the drag delta and apply it to the active model
    fn apply_drag(&mut self, ctx: &mut TaskContext) {
        let (delta, source) = {
            let mut state = self.drag.lock();
            (std::mem::take(&mut state.delta), state.source)
        };

        let mode = *self.mode.get();
        if mode == PoseMode::Off {
            return;
        }
        let Some(model) = self.active_model else {
            return;
        };
        if delta == Vec2::ZERO {
            return;
        }
        let Some(viewport) = source.and_then(|index| ctx.view.viewport(index)) else {
            return;
        };
        let Some(ortho_size) = viewport.camera.orthographic_size() else {
            return;
        };
        let Some(delta_transform) = pose_delta(
            mode,
            delta,
            viewport.camera.orientation(),
            ortho_size,
            viewport.height_px(),
        ) else {
            return;
        };

        let Some(document) = ctx.session.active_document_mut() else {
            return;
        };
        let Some(pose) = document.scene.model(model).map(|m| m.pose) else {
            return;
        };
        if document.scene.set_model_pose(model, delta_transform * pose).is_ok() {
            document.modified = true;
        }
    }
}

impl Task for PoseTask {
    fn name(&self) -> &'static str {
        "Pose"
    }

    fn activate(&mut self, ctx: &mut TaskContext) {
        if self.is_active() {
            return;
        }
        *self.drag.lock() = DragState::default();
        *self.inbox.lock() = Inbox::default();

        self.subscribe_pointer(ctx);
        self.subscribe_session(ctx);

        self.saved_view = Some((ctx.view.layout(), ctx.view.chrome()));
        ctx.view.set_layout(ViewLayout::Quad);
        ctx.view.set_chrome(POSE_CHROME);

        let document = ctx.session.active_document_id();
        self.adopt_document(ctx.session, document);
        let node = ctx.session.active_node();
        self.adopt_node(ctx.session, node);

        debug!("Pose task activated (mode {})", self.mode.get().name());
    }

    fn deactivate(&mut self, ctx: &mut TaskContext) {
        if !self.is_active() {
            return;
        }
        self.pointer_subscription = None;
        self.session_subscription = None;
        self.bounds_subscription = None;
        *self.drag.lock() = DragState::default();
        *self.inbox.lock() = Inbox::default();
        self.active_document = None;
        self.active_model = None;

        let (layout, chrome) = self
            .saved_view
            .take()
            .unwrap_or((ViewLayout::Single, ChromeFlags::default()));
        ctx.view.set_layout(layout);
        ctx.view.set_chrome(chrome);

        debug!("Pose task deactivated");
    }

    fn tick(&mut self, ctx: &mut TaskContext) {
        if !self.is_active() {
            return;
        }
        self.process_inbox(ctx.session);
        self.apply_drag(ctx);
        self.process_inbox(ctx.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pose_core::{
        box_mesh, Document, Model, Modifiers, Node, PointerButtons, PointerHub, Propagation, Scene,
    };
    use pose_renderer::RenderView;

    const TOP: usize = 1;
    const FRONT: usize = 2;

    struct Fixture {
        session: Session,
        view: RenderView,
        pointer: PointerHub,
        empty_node: NodeId,
        model: ModelId,
    }

    impl Fixture {
        fn new() -> Self {
            let mut scene = Scene::new();
            let box_model = Model::from_mesh("Box", box_mesh(Vec3::new(2.0, 4.0, 6.0)));
            let (node, model) = scene.add_model(box_model);
            let empty_node = scene
                .add_node(Node::new("Empty"), None)
                .expect("root node");
            let mut session = Session::new();
            session.open_document(Document::with_scene("Test", scene));
            session.set_active_node(Some(node));

            // Quad layout of 1000x1000 gives 500x500 orthographic panes
            let view = RenderView::new(1000.0, 1000.0);
            Self {
                session,
                view,
                pointer: PointerHub::new(),
                empty_node,
                model,
            }
        }

        fn ctx(&mut self) -> TaskContext<'_> {
            TaskContext {
                session: &mut self.session,
                view: &mut self.view,
                pointer: &self.pointer,
            }
        }

        fn drag(&self, movement: Vec2, viewport: usize, modifiers: Modifiers) -> PointerEvent {
            let mut event = PointerEvent::moved(Vec2::ZERO, movement, PointerButtons::PRIMARY)
                .with_viewport(viewport)
                .with_modifiers(modifiers);
            self.pointer.publish(&mut event);
            event
        }

        fn set_pose(&mut self, pose: Mat4) {
            let model = self.model;
            self.session
                .active_document_mut()
                .expect("document")
                .scene
                .set_model_pose(model, pose)
                .expect("pose");
        }

        fn pose(&self) -> Mat4 {
            self.session
                .active_document()
                .and_then(|doc| doc.scene.model(self.model))
                .map(|m| m.pose)
                .expect("model")
        }
    }

    fn active_task(fixture: &mut Fixture, mode: PoseMode) -> PoseTask {
        let mut task = PoseTask::new();
        task.mode.set(mode);
        task.activate(&mut fixture.ctx());
        task
    }

    #[test]
    fn test_delta_accumulates_with_speed() {
        let mut fixture = Fixture::new();
        let task = active_task(&mut fixture, PoseMode::Translate);

        fixture.drag(Vec2::new(10.0, 5.0), TOP, Modifiers::NONE);
        fixture.drag(Vec2::new(10.0, 0.0), TOP, Modifiers::CTRL);
        fixture.drag(Vec2::new(1.0, -2.0), TOP, Modifiers::SHIFT);

        let expected = Vec2::new(10.0 + 1.0 + 10.0, 5.0 + 0.0 - 20.0);
        assert!(task.pending_delta().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_primary_drag_is_consumed() {
        let mut fixture = Fixture::new();
        let task = active_task(&mut fixture, PoseMode::Translate);

        let mut orbit =
            PointerEvent::moved(Vec2::ZERO, Vec2::ONE, PointerButtons::SECONDARY).with_viewport(0);
        fixture.pointer.publish(&mut orbit);
        assert!(!orbit.is_consumed());
        assert_eq!(task.pending_delta(), Vec2::ZERO);

        let event = fixture.drag(Vec2::ONE, TOP, Modifiers::NONE);
        assert!(event.is_consumed());
        assert_eq!(task.pending_delta(), Vec2::ONE);
    }

    #[test]
    fn test_rotate_about_view_axis() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Rotate);

        fixture.drag(Vec2::new(100.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());

        // Top camera has identity orientation, so the axis is world -Z
        let expected = Mat4::from_axis_angle(Vec3::NEG_Z, 0.2);
        assert!(fixture.pose().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_rotate_delta_matches_axis_angle() {
        let delta = pose_delta(PoseMode::Rotate, Vec2::new(100.0, 0.0), Quat::IDENTITY, 10.0, 500.0)
            .expect("rotation");
        let (_, rotation, translation) = delta.to_scale_rotation_translation();
        let (axis, angle) = rotation.to_axis_angle();
        assert!((angle - 0.2).abs() < 1e-5);
        assert!(axis.abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(translation.abs_diff_eq(Vec3::ZERO, 1e-6));
    }

    #[test]
    fn test_translate_scales_by_ortho_size() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);
        assert_eq!(fixture.view.viewport(TOP).map(|v| v.height_px()), Some(500.0));

        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());

        let translation = fixture.pose().w_axis.truncate();
        assert!(translation.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    }

    #[test]
    fn test_translate_applies_before_existing_rotation() {
        let mut fixture = Fixture::new();
        fixture.set_pose(Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2));
        let mut task = active_task(&mut fixture, PoseMode::Translate);

        // Right in the Top view moves along world +X, not the model's rotated X
        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());

        let translation = fixture.pose().w_axis.truncate();
        assert!(translation.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
        let expected =
            Mat4::from_translation(Vec3::X) * Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        assert!(fixture.pose().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn test_translate_screen_down_in_front_view() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);

        // Dragging down moves along -Z in the front view
        fixture.drag(Vec2::new(0.0, 50.0), FRONT, Modifiers::NONE);
        task.tick(&mut fixture.ctx());

        let translation = fixture.pose().w_axis.truncate();
        assert!(translation.abs_diff_eq(Vec3::new(0.0, 0.0, -1.0), 1e-5));
    }

    #[test]
    fn test_second_tick_without_moves_is_noop() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);

        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        let after_first = fixture.pose();
        assert_eq!(task.pending_delta(), Vec2::ZERO);

        task.tick(&mut fixture.ctx());
        assert_eq!(fixture.pose(), after_first);
    }

    #[test]
    fn test_mode_off_does_nothing() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Off);

        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        assert_eq!(fixture.pose(), Mat4::IDENTITY);
    }

    #[test]
    fn test_perspective_viewport_is_ignored() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);

        fixture.drag(Vec2::new(50.0, 0.0), 0, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        assert_eq!(fixture.pose(), Mat4::IDENTITY);
    }

    #[test]
    fn test_node_without_model_clears_active_model() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);
        assert_eq!(task.active_model(), Some(fixture.model));

        let empty = fixture.empty_node;
        fixture.session.set_active_node(Some(empty));
        task.tick(&mut fixture.ctx());
        assert_eq!(task.active_model(), None);

        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        assert_eq!(fixture.pose(), Mat4::IDENTITY);
    }

    #[test]
    fn test_activation_selects_and_measures_model() {
        let mut fixture = Fixture::new();
        let task = active_task(&mut fixture, PoseMode::Off);

        let selected = fixture
            .session
            .active_document()
            .and_then(|doc| doc.scene.selection().selected_model());
        assert_eq!(selected, Some(fixture.model));
        assert!(task.size.get().abs_diff_eq(Vec3::new(2.0, 4.0, 6.0), 1e-5));
        assert_eq!(task.size.revision(), 1);
    }

    #[test]
    fn test_size_follows_rotation() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Rotate);

        // Quarter turn about Z swaps the X and Y extents
        let pixels = std::f32::consts::FRAC_PI_2 / ROTATION_RADIANS_PER_PIXEL;
        fixture.drag(Vec2::new(pixels, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        assert!(task.size.get().abs_diff_eq(Vec3::new(4.0, 2.0, 6.0), 1e-3));
    }

    #[test]
    fn test_document_switch_moves_bounds_listener() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);
        let first = fixture.session.active_document_id().expect("document");
        let first_listeners = |session: &Session| {
            session
                .document(first)
                .map(|doc| doc.scene.events().handler_count())
        };
        assert_eq!(first_listeners(&fixture.session), Some(1));

        let second = fixture.session.open_document(Document::new("Second"));
        task.tick(&mut fixture.ctx());
        assert_eq!(first_listeners(&fixture.session), Some(0));
        let second_listeners = fixture
            .session
            .document(second)
            .map(|doc| doc.scene.events().handler_count());
        assert_eq!(second_listeners, Some(1));
        assert_eq!(task.active_model(), None);
    }

    #[test]
    fn test_deactivate_restores_view_and_ignores_input() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);
        assert_eq!(fixture.view.layout(), ViewLayout::Quad);
        assert_eq!(fixture.view.chrome(), POSE_CHROME);

        task.deactivate(&mut fixture.ctx());
        assert_eq!(fixture.view.layout(), ViewLayout::Single);
        assert_eq!(fixture.view.chrome(), ChromeFlags::default());
        assert_eq!(fixture.pointer.handler_count(), 0);

        let event = fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        assert!(!event.is_consumed());
        task.tick(&mut fixture.ctx());
        assert_eq!(fixture.pose(), Mat4::IDENTITY);
        assert_eq!(fixture.view.layout(), ViewLayout::Single);
        assert_eq!(task.pending_delta(), Vec2::ZERO);
    }

    #[test]
    fn test_reset_pose() {
        let mut fixture = Fixture::new();
        let mut task = active_task(&mut fixture, PoseMode::Translate);
        fixture.drag(Vec2::new(50.0, 0.0), TOP, Modifiers::NONE);
        task.tick(&mut fixture.ctx());
        assert_ne!(fixture.pose(), Mat4::IDENTITY);

        task.reset_pose(&mut fixture.session);
        assert_eq!(fixture.pose(), Mat4::IDENTITY);
    }
}
