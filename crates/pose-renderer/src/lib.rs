//! Pose Editor view management
//!
//! Cameras, viewports and the render view that arranges them, plus a CPU
//! wireframe overlay that projects scene content into 2D lines.

pub mod camera;
pub mod config;
pub mod constants;
pub mod view;
pub mod viewport;
pub mod wireframe;

pub use camera::{Camera, Projection, ViewPreset};
pub use config::{CameraConfig, ChromeFlags, GridConfig, ViewConfig};
pub use view::{RenderView, ViewLayout};
pub use viewport::{Viewport, ViewportRect};
pub use wireframe::{build_overlays, Label, LineSegment, ViewportOverlay};
