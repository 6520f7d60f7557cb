//! Application configuration persisted as RON

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use pose_core::MeshUnit;
use pose_renderer::ViewConfig;

use crate::tasks::TaskKind;

/// Environment variable overriding the configuration file path
pub const CONFIG_PATH_ENV: &str = "POSE_EDITOR_CONFIG";

/// Configuration file used when the environment variable is not set
pub const DEFAULT_CONFIG_FILE: &str = "pose-editor.ron";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub import_unit: MeshUnit,
    #[serde(default)]
    pub initial_task: TaskKind,
    #[serde(default = "default_window_size")]
    pub window_size: [f32; 2],
    /// Open the demo scene on startup
    #[serde(default = "default_true")]
    pub open_demo_scene: bool,
}

fn default_window_size() -> [f32; 2] {
    [1400.0, 900.0]
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            view: ViewConfig::default(),
            import_unit: MeshUnit::default(),
            initial_task: TaskKind::default(),
            window_size: default_window_size(),
            open_demo_scene: true,
        }
    }
}

/// Errors while saving configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] ron::Error),
}

/// Loads and saves [`AppConfig`]
#[derive(Debug)]
pub struct ConfigManager {
    path: PathBuf,
    config: AppConfig,
}

impl ConfigManager {
    /// Load from `$POSE_EDITOR_CONFIG`, or `pose-editor.ron` in the working directory
    pub fn load() -> Self {
        let path = std::env::var_os(CONFIG_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load_from(path)
    }

    /// Load from `path`; missing or malformed files fall back to defaults
    pub fn load_from(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let config = match std::fs::read_to_string(&path) {
            Ok(text) => match ron::from_str::<AppConfig>(&text) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid configuration {}: {}; using defaults", path.display(), e);
                    AppConfig::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No configuration at {}; using defaults", path.display());
                AppConfig::default()
            }
            Err(e) => {
                warn!("Failed to read {}: {}; using defaults", path.display(), e);
                AppConfig::default()
            }
        };
        Self { path, config }
    }

    /// Write the current configuration back to its file
    pub fn save(&self) -> Result<(), ConfigError> {
        let text = ron::ser::to_string_pretty(&self.config, ron::ser::PrettyConfig::default())?;
        std::fs::write(&self.path, text)?;
        debug!("Saved configuration to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfig {
        &mut self.config
    }
}

pub type SharedConfig = Arc<Mutex<ConfigManager>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::load_from(dir.path().join("absent.ron"));
        assert_eq!(manager.config(), &AppConfig::default());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");

        let mut manager = ConfigManager::load_from(&path);
        manager.config_mut().import_unit = MeshUnit::Millimeters;
        manager.config_mut().initial_task = TaskKind::Pose;
        manager.config_mut().view.chrome.annotations = false;
        manager.save().unwrap();

        let reloaded = ConfigManager::load_from(&path);
        assert_eq!(reloaded.config().import_unit, MeshUnit::Millimeters);
        assert_eq!(reloaded.config().initial_task, TaskKind::Pose);
        assert!(!reloaded.config().view.chrome.annotations);
    }

    #[test]
    fn test_malformed_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.ron");
        std::fs::write(&path, "(view: [").unwrap();
        let manager = ConfigManager::load_from(&path);
        assert_eq!(manager.config(), &AppConfig::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.ron");
        std::fs::write(&path, "(initial_task: Pose)").unwrap();
        let manager = ConfigManager::load_from(&path);
        assert_eq!(manager.config().initial_task, TaskKind::Pose);
        assert_eq!(manager.config().window_size, [1400.0, 900.0]);
    }
}
