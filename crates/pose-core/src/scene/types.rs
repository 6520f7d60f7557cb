//! Node, model and mesh types for the scene graph

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::bounds::BoundingBox;
use crate::constants::DEFAULT_COLOR;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }
    };
}

id_type!(
    /// Identifier of a scene node
    NodeId
);
id_type!(
    /// Identifier of a model
    ModelId
);
id_type!(
    /// Identifier of a document
    DocumentId
);

/// Entry in the scene hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// Transform relative to the parent node
    pub transform: Mat4,
    /// Model carried by this node, if any
    pub model: Option<ModelId>,
}

impl Node {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            name: name.into(),
            parent: None,
            children: Vec::new(),
            transform: Mat4::IDENTITY,
            model: None,
        }
    }
}

/// A posable 3D model made of a hierarchy of parts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Model {
    pub id: ModelId,
    pub name: String,
    /// Node this model is attached to
    pub node: NodeId,
    /// Local matrix relative to the owning node
    pub pose: Mat4,
    /// Material color (RGBA)
    pub color: [f32; 4],
    /// Original mesh file path (for reference only)
    pub source_path: Option<String>,
    pub parts: Vec<Part>,
}

impl Model {
    /// Create an empty model; it gets its node when added to a scene
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: ModelId::new(),
            name: name.into(),
            node: NodeId(Uuid::nil()),
            pose: Mat4::IDENTITY,
            color: DEFAULT_COLOR,
            source_path: None,
            parts: Vec::new(),
        }
    }

    /// Create a model with a single part holding `mesh`
    pub fn from_mesh(name: impl Into<String>, mesh: Mesh) -> Self {
        let name = name.into();
        let mut model = Self::new(name.clone());
        model.parts.push(Part::new(name, mesh));
        model
    }

    /// Visit every part in the hierarchy with its transform relative to the model
    pub fn visit_parts(&self, mut f: impl FnMut(&Part, Mat4)) {
        fn walk(part: &Part, parent: Mat4, f: &mut dyn FnMut(&Part, Mat4)) {
            let transform = parent * part.transform;
            f(part, transform);
            for child in &part.children {
                walk(child, transform, f);
            }
        }
        for part in &self.parts {
            walk(part, Mat4::IDENTITY, &mut f);
        }
    }

    /// Bounds of the whole hierarchy in model space (pose not applied)
    pub fn local_bounds(&self) -> BoundingBox {
        let mut bbox = BoundingBox::empty();
        self.visit_parts(|part, transform| {
            bbox.expand_by_box(&part.mesh.bounds().transform(&transform));
        });
        bbox
    }

    /// Number of parts in the hierarchy
    pub fn part_count(&self) -> usize {
        let mut count = 0;
        self.visit_parts(|_, _| count += 1);
        count
    }
}

/// One object in a model's hierarchy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Part {
    pub name: String,
    /// Transform relative to the parent part (or the model)
    pub transform: Mat4,
    pub mesh: Mesh,
    pub children: Vec<Part>,
}

impl Part {
    pub fn new(name: impl Into<String>, mesh: Mesh) -> Self {
        Self {
            name: name.into(),
            transform: Mat4::IDENTITY,
            mesh,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_child(mut self, child: Part) -> Self {
        self.children.push(child);
        self
    }
}

/// Serialized form of a mesh; bounds are recomputed on load
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MeshData {
    vertices: Vec<[f32; 3]>,
    normals: Vec<[f32; 3]>,
    indices: Vec<u32>,
}

/// Indexed triangle mesh
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "MeshData", into = "MeshData")]
pub struct Mesh {
    /// Vertex positions
    pub vertices: Vec<[f32; 3]>,
    /// Face normals (one per triangle)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices
    pub indices: Vec<u32>,
    bounds: BoundingBox,
}

impl From<MeshData> for Mesh {
    fn from(data: MeshData) -> Self {
        Mesh::new(data.vertices, data.normals, data.indices)
    }
}

impl From<Mesh> for MeshData {
    fn from(mesh: Mesh) -> Self {
        Self {
            vertices: mesh.vertices,
            normals: mesh.normals,
            indices: mesh.indices,
        }
    }
}

impl Mesh {
    pub fn new(vertices: Vec<[f32; 3]>, normals: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        let bounds = BoundingBox::from_points(vertices.iter().map(|v| Vec3::from_array(*v)));
        Self {
            vertices,
            normals,
            indices,
            bounds,
        }
    }

    /// Bounds in mesh space
    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Iterate triangles as vertex position triples
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        self.indices.chunks_exact(3).filter_map(|tri| {
            let v = |i: u32| self.vertices.get(i as usize).map(|p| Vec3::from_array(*p));
            Some([v(tri[0])?, v(tri[1])?, v(tri[2])?])
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Mesh {
        Mesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0.0, 0.0, 1.0]],
            vec![0, 1, 2],
        )
    }

    #[test]
    fn test_mesh_bounds() {
        let mesh = unit_triangle();
        assert_eq!(mesh.bounds().min, Vec3::ZERO);
        assert_eq!(mesh.bounds().max, Vec3::new(1.0, 1.0, 0.0));
        assert_eq!(mesh.triangle_count(), 1);
        assert_eq!(mesh.triangles().count(), 1);
    }

    #[test]
    fn test_model_local_bounds_includes_children() {
        let child = Part::new("child", unit_triangle())
            .with_transform(Mat4::from_translation(Vec3::new(0.0, 0.0, 2.0)));
        let root = Part::new("root", unit_triangle()).with_child(child);
        let mut model = Model::new("m");
        model.parts.push(root);

        let bounds = model.local_bounds();
        assert_eq!(model.part_count(), 2);
        assert_eq!(bounds.min, Vec3::ZERO);
        assert_eq!(bounds.max, Vec3::new(1.0, 1.0, 2.0));
    }
}
