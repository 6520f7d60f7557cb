//! A camera bound to a rectangle of the render view

use glam::{Vec2, Vec3};

use crate::camera::Camera;

/// Pixel rectangle relative to the view's top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width in pixels
    pub width: f32,
    /// Height in pixels
    pub height: f32,
}

impl ViewportRect {
    /// Create a rectangle
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether the point lies inside (left/top inclusive)
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.y >= self.y
            && point.x < self.x + self.width
            && point.y < self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width * 0.5, self.y + self.height * 0.5)
    }

    /// Width / height, 1.0 for degenerate rectangles
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 && self.width > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Whether the rectangle has any area
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// One pane of the render view
#[derive(Debug, Clone)]
pub struct Viewport {
    /// Position in the view's viewport list
    pub index: usize,
    /// Camera rendering this pane
    pub camera: Camera,
    /// Pixel rectangle inside the view (empty when hidden)
    pub rect: ViewportRect,
}

impl Viewport {
    /// Create a viewport with an empty rectangle
    pub fn new(index: usize, camera: Camera) -> Self {
        Self {
            index,
            camera,
            rect: ViewportRect::default(),
        }
    }

    /// Height in pixels
    pub fn height_px(&self) -> f32 {
        self.rect.height
    }

    /// Width in pixels
    pub fn width_px(&self) -> f32 {
        self.rect.width
    }

    /// Whether the viewport currently occupies part of the view
    pub fn is_visible(&self) -> bool {
        !self.rect.is_empty()
    }

    /// Whether a view-space pixel position falls inside this viewport
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }

    /// Apply a new rectangle and keep the camera aspect in sync
    pub fn set_rect(&mut self, rect: ViewportRect) {
        self.rect = rect;
        self.camera.update_aspect(rect.aspect());
    }

    /// Project a world point to view-space pixels; `None` when behind the camera
    pub fn project(&self, point: Vec3) -> Option<Vec2> {
        let clip = self.camera.view_projection() * point.extend(1.0);
        if clip.w <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(
            self.rect.x + (ndc.x + 1.0) * 0.5 * self.rect.width,
            self.rect.y + (1.0 - ndc.y) * 0.5 * self.rect.height,
        ))
    }
}
