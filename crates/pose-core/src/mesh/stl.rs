//! STL mesh loading

use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::constants::STL_VERTEX_PRECISION;
use crate::scene::Mesh;

use super::MeshError;

/// Read an STL stream (ASCII or binary) into an indexed mesh, scaled by `scale`
pub(crate) fn read_stl_mesh<R: Read + Seek>(reader: &mut R, scale: f32) -> Result<Mesh, MeshError> {
    let stl = stl_io::read_stl(reader).map_err(|e| MeshError::Parse(e.to_string()))?;
    if stl.faces.is_empty() {
        return Err(MeshError::EmptyMesh);
    }

    let mut unique_vertices: Vec<[f32; 3]> = Vec::new();
    let mut vertex_map: HashMap<[i32; 3], u32> = HashMap::new();
    let mut indices: Vec<u32> = Vec::with_capacity(stl.faces.len() * 3);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(stl.faces.len());

    for face in &stl.faces {
        normals.push([face.normal[0], face.normal[1], face.normal[2]]);

        for &vertex_idx in &face.vertices {
            let vertex = stl.vertices[vertex_idx];
            let v = [vertex[0] * scale, vertex[1] * scale, vertex[2] * scale];

            // Weld vertices that coincide after quantization
            let key = [
                (v[0] * STL_VERTEX_PRECISION) as i32,
                (v[1] * STL_VERTEX_PRECISION) as i32,
                (v[2] * STL_VERTEX_PRECISION) as i32,
            ];

            let index = *vertex_map.entry(key).or_insert_with(|| {
                unique_vertices.push(v);
                (unique_vertices.len() - 1) as u32
            });
            indices.push(index);
        }
    }

    Ok(Mesh::new(unique_vertices, normals, indices))
}
