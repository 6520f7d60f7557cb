//! Primitive mesh generation

use glam::Vec3;

use crate::scene::Mesh;

/// Generate a box mesh centered on the origin
///
/// `size` is the full extent along x, y and z. Produces 24 vertices
/// (4 per face) and 12 triangles with one face normal per triangle.
pub fn box_mesh(size: Vec3) -> Mesh {
    let h = size * 0.5;

    let mut vertices = Vec::with_capacity(24);
    let mut normals = Vec::with_capacity(12);
    let mut indices = Vec::with_capacity(36);

    let mut add_face = |corners: [[f32; 3]; 4], normal: [f32; 3]| {
        let base = vertices.len() as u32;
        vertices.extend_from_slice(&corners);
        normals.extend_from_slice(&[normal, normal]);
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    };

    // +X
    add_face(
        [[h.x, -h.y, -h.z], [h.x, h.y, -h.z], [h.x, h.y, h.z], [h.x, -h.y, h.z]],
        [1.0, 0.0, 0.0],
    );
    // -X
    add_face(
        [[-h.x, h.y, -h.z], [-h.x, -h.y, -h.z], [-h.x, -h.y, h.z], [-h.x, h.y, h.z]],
        [-1.0, 0.0, 0.0],
    );
    // +Y
    add_face(
        [[h.x, h.y, -h.z], [-h.x, h.y, -h.z], [-h.x, h.y, h.z], [h.x, h.y, h.z]],
        [0.0, 1.0, 0.0],
    );
    // -Y
    add_face(
        [[-h.x, -h.y, -h.z], [h.x, -h.y, -h.z], [h.x, -h.y, h.z], [-h.x, -h.y, h.z]],
        [0.0, -1.0, 0.0],
    );
    // +Z (top)
    add_face(
        [[-h.x, -h.y, h.z], [h.x, -h.y, h.z], [h.x, h.y, h.z], [-h.x, h.y, h.z]],
        [0.0, 0.0, 1.0],
    );
    // -Z (bottom)
    add_face(
        [[-h.x, h.y, -h.z], [h.x, h.y, -h.z], [h.x, -h.y, -h.z], [-h.x, -h.y, -h.z]],
        [0.0, 0.0, -1.0],
    );

    Mesh::new(vertices, normals, indices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mesh() {
        let mesh = box_mesh(Vec3::ONE);
        assert_eq!(mesh.vertices.len(), 24);
        assert_eq!(mesh.normals.len(), 12);
        assert_eq!(mesh.indices.len(), 36);
    }

    #[test]
    fn test_box_dimensions() {
        let mesh = box_mesh(Vec3::new(2.0, 4.0, 6.0));
        assert!(mesh.bounds().size().abs_diff_eq(Vec3::new(2.0, 4.0, 6.0), 1e-4));
        assert!(mesh.bounds().center().abs_diff_eq(Vec3::ZERO, 1e-4));
    }
}
