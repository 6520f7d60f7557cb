//! Renderer constants

/// Camera defaults
pub mod camera {
    /// Default vertical field of view for perspective cameras
    pub const DEFAULT_FOV_DEGREES: f32 = 40.0;
    /// Near clipping plane
    pub const NEAR: f32 = 0.1;
    /// Far clipping plane
    pub const FAR: f32 = 100000.0;
    /// Initial eye-target distance
    pub const DEFAULT_DISTANCE: f32 = 50.0;
    /// Initial orthographic view height
    pub const DEFAULT_ORTHO_SIZE: f32 = 10.0;
    /// Orthographic size bounds
    pub const MIN_ORTHO_SIZE: f32 = 0.01;
    /// Orthographic size bounds
    pub const MAX_ORTHO_SIZE: f32 = 10000.0;
    /// Pitch clamp for free orbit
    pub const MAX_PITCH_DEGREES: f32 = 89.0;
    /// Perspective pan distance per pixel, relative to eye distance
    pub const PAN_SCALE: f32 = 0.002;
    /// Relative zoom per wheel step
    pub const ZOOM_STEP: f32 = 0.1;
}

/// View layout defaults
pub mod view {
    /// Number of viewports owned by a render view
    pub const VIEWPORT_COUNT: usize = 4;
    /// Index of the main (free perspective) viewport
    pub const MAIN_VIEWPORT: usize = 0;
    /// Smallest split fraction allowed by the splitter
    pub const MIN_SPLIT: f32 = 0.1;
    /// Largest split fraction allowed by the splitter
    pub const MAX_SPLIT: f32 = 0.9;
}

/// Wireframe overlay limits
pub mod wireframe {
    /// Parts with more triangles than this are drawn as boxes
    pub const MAX_TRIANGLES_PER_PART: usize = 4096;
    /// Bracket arm length as a fraction of the box edge
    pub const BRACKET_FRACTION: f32 = 0.25;
}
