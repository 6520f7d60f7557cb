//! Mesh file loading (STL, OBJ formats)

mod normals;
mod obj;
mod stl;

use std::io::{BufReader, Cursor};
use std::path::Path;

use crate::scene::{Model, Part};

pub use normals::{calculate_face_normals, calculate_triangle_normal};

/// Length unit of the source file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum MeshUnit {
    /// Meters (no scaling)
    #[default]
    Meters,
    /// Millimeters (scale by 0.001)
    Millimeters,
    /// Centimeters (scale by 0.01)
    Centimeters,
    /// Inches (scale by 0.0254)
    Inches,
}

impl MeshUnit {
    pub fn scale_factor(&self) -> f32 {
        match self {
            MeshUnit::Meters => 1.0,
            MeshUnit::Millimeters => 0.001,
            MeshUnit::Centimeters => 0.01,
            MeshUnit::Inches => 0.0254,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MeshUnit::Meters => "Meters",
            MeshUnit::Millimeters => "Millimeters",
            MeshUnit::Centimeters => "Centimeters",
            MeshUnit::Inches => "Inches",
        }
    }

    pub const ALL: &'static [MeshUnit] = &[
        MeshUnit::Meters,
        MeshUnit::Millimeters,
        MeshUnit::Centimeters,
        MeshUnit::Inches,
    ];
}

/// Detect mesh format from file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeshFormat {
    Stl,
    Obj,
    Unknown,
}

impl MeshFormat {
    /// Detect format from file path
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|s| s.to_lowercase())
            .as_deref()
        {
            Some("stl") => MeshFormat::Stl,
            Some("obj") => MeshFormat::Obj,
            _ => MeshFormat::Unknown,
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, MeshFormat::Unknown)
    }

    /// Get format name
    pub fn name(&self) -> &'static str {
        match self {
            MeshFormat::Stl => "STL",
            MeshFormat::Obj => "OBJ",
            MeshFormat::Unknown => "Unknown",
        }
    }

    /// Extensions accepted by file dialogs
    pub const EXTENSIONS: &'static [&'static str] = &["stl", "obj"];
}

/// Load a mesh file as a model named after the file stem
pub fn load_model(path: impl AsRef<Path>, unit: MeshUnit) -> Result<Model, MeshError> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path);
    if !format.is_supported() {
        return Err(MeshError::UnsupportedFormat(
            path.extension()
                .and_then(|e| e.to_str())
                .unwrap_or("unknown")
                .to_string(),
        ));
    }

    let file = std::fs::File::open(path).map_err(|e| MeshError::Io(e.to_string()))?;
    let mut reader = BufReader::new(file);
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");

    let mut model = read_model(name, &mut reader, format, unit)?;
    model.source_path = Some(path.to_string_lossy().to_string());
    tracing::debug!(
        "Loaded {} model '{}' with {} part(s)",
        format.name(),
        model.name,
        model.part_count()
    );
    Ok(model)
}

/// Load a mesh from memory (for drag-and-drop and WASM)
pub fn load_model_from_bytes(
    name: &str,
    data: &[u8],
    format: MeshFormat,
    unit: MeshUnit,
) -> Result<Model, MeshError> {
    let mut cursor = Cursor::new(data);
    read_model(name, &mut cursor, format, unit)
}

fn read_model<R: std::io::BufRead + std::io::Seek>(
    name: &str,
    reader: &mut R,
    format: MeshFormat,
    unit: MeshUnit,
) -> Result<Model, MeshError> {
    let scale = unit.scale_factor();
    match format {
        MeshFormat::Stl => {
            let mesh = stl::read_stl_mesh(reader, scale)?;
            Ok(Model::from_mesh(name, mesh))
        }
        MeshFormat::Obj => {
            let parts = obj::read_obj_parts(reader, scale)?;
            let mut model = Model::new(name);
            model.parts = group_parts(name, parts);
            Ok(model)
        }
        MeshFormat::Unknown => Err(MeshError::UnsupportedFormat(name.to_string())),
    }
}

/// A single part stays as is; several become children of an empty root
fn group_parts(name: &str, mut parts: Vec<Part>) -> Vec<Part> {
    if parts.len() <= 1 {
        return parts;
    }
    let mut root = Part::new(name, Default::default());
    root.children = std::mem::take(&mut parts);
    vec![root]
}

/// Mesh-related errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum MeshError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Empty mesh: no geometry found")]
    EmptyMesh,
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
