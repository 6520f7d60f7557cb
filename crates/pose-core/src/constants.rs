//! Global constants for pose-core

/// Drag speed factor while Ctrl is held
pub const FINE_SPEED_MULTIPLIER: f32 = 0.1;

/// Drag speed factor while Shift is held
pub const COARSE_SPEED_MULTIPLIER: f32 = 10.0;

/// Radians of rotation per pixel of pointer movement
pub const ROTATION_RADIANS_PER_PIXEL: f32 = 0.002;

/// Current document file format version
pub const DOCUMENT_VERSION: u32 = 1;

/// Default color for imported models (gray, RGBA)
pub const DEFAULT_COLOR: [f32; 4] = [0.7, 0.7, 0.7, 1.0];

/// STL vertex comparison precision (multiply by this, then round to int)
pub const STL_VERTEX_PRECISION: f32 = 10000.0;
