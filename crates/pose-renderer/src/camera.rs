//! Orbit camera with perspective and orthographic projections

use glam::{Mat4, Quat, Vec3};

use pose_core::BoundingBox;

use crate::constants::camera as constants;

/// Camera projection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection with vertical field of view in radians
    Perspective {
        /// Vertical field of view (radians)
        fov: f32,
    },
    /// Orthographic projection
    Orthographic {
        /// World-space height covered by the view
        size: f32,
    },
}

/// Fixed view directions used by the quad layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewPreset {
    /// Free orbit
    #[default]
    Free,
    /// Looking down -Z
    Top,
    /// Looking along +Y
    Front,
    /// Looking along +X
    Left,
}

impl ViewPreset {
    /// Direction from target to eye, and the up vector
    fn eye_direction_and_up(&self) -> Option<(Vec3, Vec3)> {
        match self {
            ViewPreset::Free => None,
            ViewPreset::Top => Some((Vec3::Z, Vec3::Y)),
            ViewPreset::Front => Some((Vec3::NEG_Y, Vec3::Z)),
            ViewPreset::Left => Some((Vec3::NEG_X, Vec3::Z)),
        }
    }

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            ViewPreset::Free => "Perspective",
            ViewPreset::Top => "Top",
            ViewPreset::Front => "Front",
            ViewPreset::Left => "Left",
        }
    }
}

/// Orbit camera
#[derive(Debug, Clone)]
pub struct Camera {
    /// Eye position
    pub position: Vec3,
    /// Point the camera looks at
    pub target: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Projection
    pub projection: Projection,
    /// Width / height
    pub aspect: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// View direction constraint
    pub preset: ViewPreset,
    // Orbit state
    /// Orbit yaw (radians)
    pub yaw: f32,
    /// Orbit pitch (radians)
    pub pitch: f32,
    /// Distance from eye to target
    pub distance: f32,
}

impl Camera {
    /// Create a free perspective camera with default parameters
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Z,
            projection: Projection::Perspective {
                fov: constants::DEFAULT_FOV_DEGREES.to_radians(),
            },
            aspect,
            near: constants::NEAR,
            far: constants::FAR,
            preset: ViewPreset::Free,
            yaw: 45.0_f32.to_radians(),
            pitch: 30.0_f32.to_radians(),
            distance: constants::DEFAULT_DISTANCE,
        };
        camera.update_position();
        camera
    }

    /// Create an orthographic camera locked to a preset direction
    pub fn orthographic(preset: ViewPreset, size: f32, aspect: f32) -> Self {
        let mut camera = Self {
            projection: Projection::Orthographic { size },
            ..Self::new(aspect)
        };
        camera.set_preset(preset);
        camera
    }

    /// Lock the camera to a view preset (Free restores orbiting)
    pub fn set_preset(&mut self, preset: ViewPreset) {
        self.preset = preset;
        self.update_position();
    }

    /// Update aspect ratio
    pub fn update_aspect(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Whether the projection is orthographic
    pub fn is_orthographic(&self) -> bool {
        matches!(self.projection, Projection::Orthographic { .. })
    }

    /// World-space view height for orthographic cameras
    pub fn orthographic_size(&self) -> Option<f32> {
        match self.projection {
            Projection::Orthographic { size } => Some(size),
            Projection::Perspective { .. } => None,
        }
    }

    /// Orbit the camera around the target (free preset only)
    pub fn orbit(&mut self, delta_yaw: f32, delta_pitch: f32) {
        if self.preset != ViewPreset::Free {
            return;
        }
        self.yaw += delta_yaw;
        self.pitch = (self.pitch + delta_pitch).clamp(
            -constants::MAX_PITCH_DEGREES.to_radians(),
            constants::MAX_PITCH_DEGREES.to_radians(),
        );
        self.update_position();
    }

    /// Pan the camera by a pixel delta in a viewport `viewport_height` pixels tall
    pub fn pan(&mut self, delta_x: f32, delta_y: f32, viewport_height: f32) {
        let orientation = self.orientation();
        let right = orientation * Vec3::X;
        let up = orientation * Vec3::Y;

        let scale = match self.projection {
            Projection::Orthographic { size } => size / viewport_height.max(1.0),
            Projection::Perspective { .. } => self.distance * constants::PAN_SCALE,
        };
        self.target += right * (-delta_x * scale) + up * (delta_y * scale);
        self.update_position();
    }

    /// Zoom the camera; positive `delta` moves closer
    pub fn zoom(&mut self, delta: f32) {
        let factor = 1.0 - delta * constants::ZOOM_STEP;
        match &mut self.projection {
            Projection::Orthographic { size } => {
                *size = (*size * factor)
                    .clamp(constants::MIN_ORTHO_SIZE, constants::MAX_ORTHO_SIZE);
            }
            Projection::Perspective { .. } => {
                self.distance = (self.distance * factor).clamp(0.1, 10000.0);
                self.update_position();
            }
        }
    }

    /// Set field of view in degrees (perspective only)
    pub fn set_fov_degrees(&mut self, fov_degrees: f32) {
        if let Projection::Perspective { fov } = &mut self.projection {
            *fov = fov_degrees.clamp(10.0, 120.0).to_radians();
        }
    }

    /// Fit camera to show the given bounds
    pub fn fit_bounds(&mut self, bounds: &BoundingBox) {
        if !bounds.is_valid() {
            return;
        }
        let radius = bounds.radius().max(0.5);
        self.target = bounds.center();
        match &mut self.projection {
            Projection::Orthographic { size } => {
                *size = (radius * 2.4).clamp(constants::MIN_ORTHO_SIZE, constants::MAX_ORTHO_SIZE);
                self.distance = (radius * 4.0).max(constants::DEFAULT_DISTANCE);
            }
            Projection::Perspective { .. } => {
                self.distance = (radius * 2.5).max(1.0);
            }
        }
        self.update_position();
    }

    fn update_position(&mut self) {
        match self.preset.eye_direction_and_up() {
            Some((direction, up)) => {
                self.position = self.target + direction * self.distance;
                self.up = up;
            }
            None => {
                let x = self.distance * self.pitch.cos() * self.yaw.cos();
                let y = self.distance * self.pitch.cos() * self.yaw.sin();
                let z = self.distance * self.pitch.sin();
                self.position = self.target + Vec3::new(x, y, z);
                self.up = Vec3::Z;
            }
        }
    }

    /// Get view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// Camera-to-world matrix (inverse of the view matrix)
    pub fn world_matrix(&self) -> Mat4 {
        self.view_matrix().inverse()
    }

    /// World orientation of the camera (camera looks along its local -Z)
    pub fn orientation(&self) -> Quat {
        let (_, rotation, _) = self.world_matrix().to_scale_rotation_translation();
        rotation
    }

    /// Get projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective { fov } => {
                Mat4::perspective_rh(fov, self.aspect, self.near, self.far)
            }
            Projection::Orthographic { size } => {
                let half_h = size * 0.5;
                let half_w = half_h * self.aspect;
                Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.near, self.far)
            }
        }
    }

    /// Combined projection * view matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_view_has_identity_orientation() {
        let camera = Camera::orthographic(ViewPreset::Top, 10.0, 1.0);
        let orientation = camera.orientation();
        assert!(orientation.abs_diff_eq(Quat::IDENTITY, 1e-5));
        assert!((orientation * Vec3::NEG_Z).abs_diff_eq(Vec3::NEG_Z, 1e-5));
    }

    #[test]
    fn test_front_view_looks_along_y() {
        let camera = Camera::orthographic(ViewPreset::Front, 10.0, 1.0);
        let forward = camera.orientation() * Vec3::NEG_Z;
        assert!(forward.abs_diff_eq(Vec3::Y, 1e-5));
        let up = camera.orientation() * Vec3::Y;
        assert!(up.abs_diff_eq(Vec3::Z, 1e-5));
    }

    #[test]
    fn test_orbit_ignored_for_presets() {
        let mut camera = Camera::orthographic(ViewPreset::Top, 10.0, 1.0);
        let before = camera.position;
        camera.orbit(0.5, 0.5);
        assert_eq!(camera.position, before);
    }

    #[test]
    fn test_orthographic_zoom_changes_size() {
        let mut camera = Camera::orthographic(ViewPreset::Top, 10.0, 1.0);
        camera.zoom(1.0);
        assert!(camera.orthographic_size().unwrap() < 10.0);
        assert!(Camera::new(1.0).orthographic_size().is_none());
    }

    #[test]
    fn test_orthographic_pan_is_pixel_exact() {
        let mut camera = Camera::orthographic(ViewPreset::Top, 10.0, 1.0);
        camera.pan(-50.0, 0.0, 500.0);
        assert!(camera.target.abs_diff_eq(Vec3::new(1.0, 0.0, 0.0), 1e-5));
    }
}
