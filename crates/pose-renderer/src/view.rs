//! Render view: four viewports arranged in a single or quad layout
//!
//! Viewport 0 is the main free perspective camera. Viewports 1-3 are
//! orthographic Top, Front and Left cameras. In the quad layout they are
//! arranged as:
//!
//! ```text
//! +-------+-------+
//! |  Top  | Front |
//! +-------+-------+
//! | Left  | Main  |
//! +-------+-------+
//! ```

use glam::Vec2;
use tracing::debug;

use pose_core::{BoundingBox, PointerEvent, PointerEventKind, WheelEvent};

use crate::camera::{Camera, ViewPreset};
use crate::config::{ChromeFlags, ViewConfig};
use crate::constants::view::{MAIN_VIEWPORT, MAX_SPLIT, MIN_SPLIT, VIEWPORT_COUNT};
use crate::viewport::{Viewport, ViewportRect};

/// Arrangement of viewports inside the view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewLayout {
    /// Only the main viewport, filling the view
    #[default]
    Single,
    /// Top, Front, Left and main viewports in a 2x2 grid
    Quad,
}

/// The set of viewports drawn into one canvas
#[derive(Debug, Clone)]
pub struct RenderView {
    viewports: Vec<Viewport>,
    layout: ViewLayout,
    split: Vec2,
    size: Vec2,
    chrome: ChromeFlags,
    orbit_sensitivity: f32,
    disposed: bool,
}

impl RenderView {
    /// Create a view of the given pixel size in single layout
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, &ViewConfig::default())
    }

    /// Create a view using camera and chrome defaults from `config`
    pub fn with_config(width: f32, height: f32, config: &ViewConfig) -> Self {
        let ortho_size = config.camera.ortho_size;
        let mut main = Camera::new(1.0);
        main.set_fov_degrees(config.camera.fov_degrees);

        let viewports = vec![
            Viewport::new(MAIN_VIEWPORT, main),
            Viewport::new(1, Camera::orthographic(ViewPreset::Top, ortho_size, 1.0)),
            Viewport::new(2, Camera::orthographic(ViewPreset::Front, ortho_size, 1.0)),
            Viewport::new(3, Camera::orthographic(ViewPreset::Left, ortho_size, 1.0)),
        ];
        debug_assert_eq!(viewports.len(), VIEWPORT_COUNT);

        let mut view = Self {
            viewports,
            layout: ViewLayout::Single,
            split: Vec2::splat(0.5),
            size: Vec2::ZERO,
            chrome: config.chrome,
            orbit_sensitivity: config.camera.orbit_sensitivity,
            disposed: false,
        };
        view.resize(width, height);
        view
    }

    /// Current layout
    pub fn layout(&self) -> ViewLayout {
        self.layout
    }

    /// Switch layout and recompute viewport rectangles
    pub fn set_layout(&mut self, layout: ViewLayout) {
        if self.layout != layout {
            debug!("View layout {:?} -> {:?}", self.layout, layout);
            self.layout = layout;
            self.update_rects();
        }
    }

    /// Pixel size of the whole view
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Resize the view and recompute viewport rectangles
    pub fn resize(&mut self, width: f32, height: f32) {
        self.size = Vec2::new(width.max(0.0), height.max(0.0));
        self.update_rects();
    }

    /// Split position as fractions of the view size
    pub fn split(&self) -> Vec2 {
        self.split
    }

    /// Move the quad split, clamped so no viewport collapses
    pub fn set_split(&mut self, split: Vec2) {
        self.split = split.clamp(Vec2::splat(MIN_SPLIT), Vec2::splat(MAX_SPLIT));
        self.update_rects();
    }

    /// Split position in view pixels
    pub fn split_px(&self) -> Vec2 {
        self.split * self.size
    }

    fn update_rects(&mut self) {
        let Vec2 { x: w, y: h } = self.size;
        match self.layout {
            ViewLayout::Single => {
                for viewport in &mut self.viewports {
                    let rect = if viewport.index == MAIN_VIEWPORT {
                        ViewportRect::new(0.0, 0.0, w, h)
                    } else {
                        ViewportRect::default()
                    };
                    viewport.set_rect(rect);
                }
            }
            ViewLayout::Quad => {
                let sx = (w * self.split.x).round();
                let sy = (h * self.split.y).round();
                for viewport in &mut self.viewports {
                    let rect = match viewport.index {
                        1 => ViewportRect::new(0.0, 0.0, sx, sy),
                        2 => ViewportRect::new(sx, 0.0, w - sx, sy),
                        3 => ViewportRect::new(0.0, sy, sx, h - sy),
                        _ => ViewportRect::new(sx, sy, w - sx, h - sy),
                    };
                    viewport.set_rect(rect);
                }
            }
        }
    }

    /// All viewports, visible or not
    pub fn viewports(&self) -> &[Viewport] {
        &self.viewports
    }

    /// Viewport by index
    pub fn viewport(&self, index: usize) -> Option<&Viewport> {
        self.viewports.get(index)
    }

    /// Mutable viewport by index
    pub fn viewport_mut(&mut self, index: usize) -> Option<&mut Viewport> {
        self.viewports.get_mut(index)
    }

    /// Index of the visible viewport under a view-space pixel position
    pub fn viewport_at(&self, position: Vec2) -> Option<usize> {
        self.visible_viewports()
            .find(|viewport| viewport.contains(position))
            .map(|viewport| viewport.index)
    }

    /// Viewports that currently occupy part of the view
    pub fn visible_viewports(&self) -> impl Iterator<Item = &Viewport> {
        self.viewports.iter().filter(|viewport| viewport.is_visible())
    }

    /// UI chrome visibility
    pub fn chrome(&self) -> ChromeFlags {
        self.chrome
    }

    /// Replace UI chrome visibility
    pub fn set_chrome(&mut self, chrome: ChromeFlags) {
        self.chrome = chrome;
    }

    /// Camera navigation for a pointer event nobody else handled.
    ///
    /// Secondary drag orbits, middle drag pans. Returns whether a camera moved.
    pub fn navigate_pointer(&mut self, event: &PointerEvent) -> bool {
        if self.disposed || event.kind != PointerEventKind::Move {
            return false;
        }
        let Some(index) = event.viewport else {
            return false;
        };
        let sensitivity = self.orbit_sensitivity;
        let Some(viewport) = self.viewports.get_mut(index) else {
            return false;
        };

        if event.buttons.secondary() {
            if viewport.camera.preset != ViewPreset::Free {
                return false;
            }
            viewport.camera.orbit(
                -event.movement.x * sensitivity,
                event.movement.y * sensitivity,
            );
            true
        } else if event.buttons.middle() {
            let height = viewport.height_px();
            viewport
                .camera
                .pan(event.movement.x, event.movement.y, height);
            true
        } else {
            false
        }
    }

    /// Camera zoom for a wheel event. Returns whether a camera moved.
    pub fn navigate_wheel(&mut self, event: &WheelEvent) -> bool {
        if self.disposed || event.delta == 0.0 {
            return false;
        }
        match event.viewport.and_then(|index| self.viewports.get_mut(index)) {
            Some(viewport) => {
                viewport.camera.zoom(event.delta.signum());
                true
            }
            None => false,
        }
    }

    /// Fit every camera to the given bounds
    pub fn fit_all(&mut self, bounds: &BoundingBox) {
        for viewport in &mut self.viewports {
            viewport.camera.fit_bounds(bounds);
        }
    }

    /// Release the view; navigation is ignored afterwards
    pub fn dispose(&mut self) {
        if !self.disposed {
            debug!("Render view disposed");
            self.disposed = true;
        }
    }

    /// Whether `dispose` was called
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
