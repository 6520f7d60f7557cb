//! Document file serialization

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::DOCUMENT_VERSION;
use crate::scene::{DocumentId, Scene};

/// Serialization format for backward compatibility
#[derive(Debug, Serialize, Deserialize)]
struct DocumentData {
    version: u32,
    name: String,
    scene: Scene,
}

/// A scene plus its file metadata
#[derive(Debug)]
pub struct Document {
    pub id: DocumentId,
    /// File format version
    pub version: u32,
    /// Document name
    pub name: String,
    /// File the document was loaded from or last saved to
    pub path: Option<PathBuf>,
    /// Scene content
    pub scene: Scene,
    /// Has unsaved changes
    pub modified: bool,
}

impl Default for Document {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

impl Document {
    /// Create a new empty document
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: DocumentId::new(),
            version: DOCUMENT_VERSION,
            name: name.into(),
            path: None,
            scene: Scene::new(),
            modified: false,
        }
    }

    /// Create a document around an existing scene
    pub fn with_scene(name: impl Into<String>, scene: Scene) -> Self {
        Self {
            scene,
            ..Self::new(name)
        }
    }

    /// Save document to a file
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<(), DocumentError> {
        let path = path.as_ref();
        let content = self.to_bytes()?;
        std::fs::write(path, content).map_err(|e| DocumentError::Io(e.to_string()))?;
        self.path = Some(path.to_path_buf());
        self.modified = false;
        Ok(())
    }

    /// Serialize document to bytes (for WASM support)
    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let data = DocumentData {
            version: self.version,
            name: self.name.clone(),
            scene: self.scene.clone(),
        };
        let content = ron::ser::to_string_pretty(&data, ron::ser::PrettyConfig::default())
            .map_err(|e| DocumentError::Serialize(e.to_string()))?;
        Ok(content.into_bytes())
    }

    /// Load document from a file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| DocumentError::Io(e.to_string()))?;
        let mut document = Self::from_ron(&content)?;
        document.path = Some(path.to_path_buf());
        Ok(document)
    }

    /// Load document from bytes (for WASM support)
    pub fn load_from_bytes(data: &[u8]) -> Result<Self, DocumentError> {
        let content =
            std::str::from_utf8(data).map_err(|e| DocumentError::Deserialize(e.to_string()))?;
        Self::from_ron(content)
    }

    fn from_ron(content: &str) -> Result<Self, DocumentError> {
        let data: DocumentData =
            ron::from_str(content).map_err(|e| DocumentError::Deserialize(e.to_string()))?;
        if data.version > DOCUMENT_VERSION {
            return Err(DocumentError::UnsupportedVersion(data.version));
        }
        Ok(Self {
            version: data.version,
            ..Self::with_scene(data.name, data.scene)
        })
    }
}

/// Document-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Serialization error: {0}")]
    Serialize(String),
    #[error("Deserialization error: {0}")]
    Deserialize(String),
    #[error("Unsupported document version: {0}")]
    UnsupportedVersion(u32),
}
