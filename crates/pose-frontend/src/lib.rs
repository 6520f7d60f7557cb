//! Pose Editor Frontend
//!
//! egui-based application for posing 3D models in a scene.

pub mod actions;
pub mod app;
pub mod config;
pub mod element;
pub mod panels;
pub mod state;
pub mod tasks;

// Re-exports for convenience
pub use app::PoseEditorApp;
pub use config::{AppConfig, ConfigManager, SharedConfig};
pub use element::{ViewportElement, ViewportResized};
pub use state::{AppAction, AppState, SharedAppState};
pub use tasks::{PoseMode, PoseTask, TaskKind, TaskManager};
