//! Normal calculation utilities for mesh data

use glam::Vec3;

/// Calculate the unit normal of a single triangle
///
/// Degenerate triangles get +Z.
pub fn calculate_triangle_normal(v0: [f32; 3], v1: [f32; 3], v2: [f32; 3]) -> [f32; 3] {
    let (v0, v1, v2) = (Vec3::from(v0), Vec3::from(v1), Vec3::from(v2));
    let cross = (v1 - v0).cross(v2 - v0);
    cross.try_normalize().unwrap_or(Vec3::Z).to_array()
}

/// Calculate face normals (one per triangle) from vertices and indices
pub fn calculate_face_normals(vertices: &[[f32; 3]], indices: &[u32]) -> Vec<[f32; 3]> {
    indices
        .chunks_exact(3)
        .map(|tri| {
            let v = |i: u32| vertices.get(i as usize).copied().unwrap_or_default();
            calculate_triangle_normal(v(tri[0]), v(tri[1]), v(tri[2]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_clockwise_triangle_points_up() {
        let n = calculate_triangle_normal([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_degenerate_triangle() {
        let n = calculate_triangle_normal([1.0; 3], [1.0; 3], [1.0; 3]);
        assert_eq!(n, [0.0, 0.0, 1.0]);
    }
}
