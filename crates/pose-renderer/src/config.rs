//! Render view configuration structures
//!
//! This module provides configurable settings for the view that can be
//! serialized and loaded from configuration files.

use serde::{Deserialize, Serialize};

use crate::constants::camera::DEFAULT_ORTHO_SIZE;

/// Visibility of the UI chrome drawn over the scene
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChromeFlags {
    /// Ground grid
    pub grid: bool,
    /// Model name labels
    pub annotations: bool,
    /// Viewport captions and toolbars
    pub interface: bool,
    /// Corner brackets around the selected model
    pub brackets: bool,
}

impl Default for ChromeFlags {
    fn default() -> Self {
        Self {
            grid: true,
            annotations: true,
            interface: true,
            brackets: false,
        }
    }
}

/// Grid rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GridConfig {
    /// Grid extent (half-size in each direction)
    pub size: f32,
    /// Grid line spacing
    pub spacing: f32,
    /// Grid line color (RGB)
    pub line_color: [f32; 3],
    /// X-axis color (RGB)
    pub x_axis_color: [f32; 3],
    /// Y-axis color (RGB)
    pub y_axis_color: [f32; 3],
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            size: 10.0,
            spacing: 1.0,
            line_color: [0.3, 0.3, 0.3],
            x_axis_color: [0.8, 0.2, 0.2],
            y_axis_color: [0.2, 0.8, 0.2],
        }
    }
}

/// Camera default configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CameraConfig {
    /// Field of view in degrees
    pub fov_degrees: f32,
    /// Initial orthographic view height
    pub ortho_size: f32,
    /// Zoom sensitivity multiplier
    pub zoom_sensitivity: f32,
    /// Orbit sensitivity multiplier
    pub orbit_sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 40.0,
            ortho_size: DEFAULT_ORTHO_SIZE,
            zoom_sensitivity: 0.01,
            orbit_sensitivity: 0.005,
        }
    }
}

/// Complete view configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ViewConfig {
    /// Chrome visibility used outside of tasks that override it
    #[serde(default)]
    pub chrome: ChromeFlags,
    /// Grid settings
    #[serde(default)]
    pub grid: GridConfig,
    /// Camera settings
    #[serde(default)]
    pub camera: CameraConfig,
    /// Background clear color (RGBA)
    #[serde(default = "default_background")]
    pub background_color: [f32; 4],
    /// Wireframe color of unselected models (RGBA)
    #[serde(default = "default_model_color")]
    pub model_color: [f32; 4],
    /// Wireframe color of the selected model (RGBA)
    #[serde(default = "default_selection_color")]
    pub selection_color: [f32; 4],
}

fn default_background() -> [f32; 4] {
    [0.15, 0.15, 0.18, 1.0]
}

fn default_model_color() -> [f32; 4] {
    [0.75, 0.75, 0.8, 1.0]
}

fn default_selection_color() -> [f32; 4] {
    [1.0, 0.8, 0.2, 1.0]
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            chrome: ChromeFlags::default(),
            grid: GridConfig::default(),
            camera: CameraConfig::default(),
            background_color: default_background(),
            model_color: default_model_color(),
            selection_color: default_selection_color(),
        }
    }
}

impl ViewConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }
}
