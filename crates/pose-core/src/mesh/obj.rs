//! OBJ mesh loading

use std::io::BufRead;

use crate::scene::{Mesh, Part};

use super::MeshError;
use super::normals::calculate_face_normals;

/// Read an OBJ stream; every object/group in the file becomes one part
pub(crate) fn read_obj_parts(
    reader: &mut impl BufRead,
    scale: f32,
) -> Result<Vec<Part>, MeshError> {
    let (models, _materials) = tobj::load_obj_buf(
        reader,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
        |_| Ok(Default::default()),
    )
    .map_err(|e| MeshError::Parse(e.to_string()))?;

    let parts: Vec<Part> = models
        .into_iter()
        .filter(|m| !m.mesh.indices.is_empty())
        .map(|m| {
            let vertices: Vec<[f32; 3]> = m
                .mesh
                .positions
                .chunks_exact(3)
                .map(|c| [c[0] * scale, c[1] * scale, c[2] * scale])
                .collect();
            let indices = m.mesh.indices;
            // OBJ normals are per-vertex; the scene stores face normals
            let normals = calculate_face_normals(&vertices, &indices);
            Part::new(m.name, Mesh::new(vertices, normals, indices))
        })
        .collect();

    if parts.is_empty() {
        return Err(MeshError::EmptyMesh);
    }
    Ok(parts)
}
