//! Mesh data handed over by the external asset loader
//!
//! The loader parses the interchange file and uploads vertex data to the GPU.
//! What reaches the scene core is only what it needs: opaque GPU handles for
//! the renderer and a precomputed local-space bounding box per primitive.

use crate::physics::collision::Aabb;
use crate::scene::SceneError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Stable key of a mesh in the [`MeshStore`]
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeshId(pub String);

impl MeshId {
    /// Create a mesh id from any string-like value
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MeshId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MeshId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MeshId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Element type of a primitive's index buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexType {
    /// 8-bit indices
    U8,
    /// 16-bit indices
    U16,
    /// 32-bit indices
    U32,
}

/// PBR material parameters of a primitive
///
/// Texture fields are opaque renderer handles; `None` means the renderer's
/// default white texture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialDescriptor {
    /// Base colour factor (RGBA)
    pub base_color_factor: [f32; 4],
    /// Metallic factor
    pub metallic_factor: f32,
    /// Roughness factor
    pub roughness_factor: f32,
    /// Emissive factor (RGB)
    pub emissive_factor: [f32; 3],
    /// Base colour texture handle
    pub base_color_texture: Option<u32>,
    /// Metallic/roughness texture handle
    pub metallic_roughness_texture: Option<u32>,
    /// Normal map handle
    pub normal_texture: Option<u32>,
    /// Emissive texture handle
    pub emissive_texture: Option<u32>,
}

impl Default for MaterialDescriptor {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            emissive_factor: [0.0, 0.0, 0.0],
            base_color_texture: None,
            metallic_roughness_texture: None,
            normal_texture: None,
            emissive_texture: None,
        }
    }
}

/// One drawable part of a mesh
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// GPU vertex-array handle
    pub vertex_array: u32,
    /// Number of indices to draw
    pub element_count: u32,
    /// Index element type
    pub index_type: IndexType,
    /// Material
    pub material: MaterialDescriptor,
    /// Local-space bounding box
    pub bounds: Aabb,
}

impl Primitive {
    /// Primitive with default material and only a bounding box, for tests and tools
    pub fn with_bounds(bounds: Aabb) -> Self {
        Self {
            vertex_array: 0,
            element_count: 0,
            index_type: IndexType::U16,
            material: MaterialDescriptor::default(),
            bounds,
        }
    }
}

/// A named mesh made of one or more primitives
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Mesh id
    pub id: MeshId,
    /// Primitives
    pub primitives: Vec<Primitive>,
}

impl Mesh {
    /// Create a mesh
    pub fn new(id: impl Into<MeshId>, primitives: Vec<Primitive>) -> Self {
        Self { id: id.into(), primitives }
    }

    /// Union of all primitive bounds, `None` for a mesh without primitives
    pub fn local_bounds(&self) -> Option<Aabb> {
        self.primitives
            .iter()
            .map(|p| p.bounds)
            .reduce(|acc, b| acc.union(&b))
    }
}

/// Shared store of loaded meshes
///
/// Nodes keep an `Arc` to their mesh, so prefab instances share geometry
/// with their template.
#[derive(Debug, Default, Clone)]
pub struct MeshStore {
    meshes: HashMap<MeshId, Arc<Mesh>>,
}

impl MeshStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a mesh, replacing any previous mesh with the same id
    pub fn insert(&mut self, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        if self.meshes.insert(mesh.id.clone(), Arc::clone(&mesh)).is_some() {
            log::warn!("Mesh '{}' replaced in store", mesh.id);
        }
        mesh
    }

    /// Look a mesh up by id
    pub fn get(&self, id: &MeshId) -> Result<Arc<Mesh>, SceneError> {
        self.meshes
            .get(id)
            .cloned()
            .ok_or_else(|| SceneError::MissingMesh(id.clone()))
    }

    /// Number of meshes in the store
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;

    #[test]
    fn test_missing_mesh_is_configuration_error() {
        let store = MeshStore::new();
        let err = store.get(&MeshId::new("coin")).unwrap_err();
        assert!(matches!(err, SceneError::MissingMesh(id) if id.as_str() == "coin"));
    }

    #[test]
    fn test_store_shares_mesh() {
        let mut store = MeshStore::new();
        let inserted = store.insert(Mesh::new("coin", vec![]));
        let fetched = store.get(&MeshId::new("coin")).unwrap();
        assert!(Arc::ptr_eq(&inserted, &fetched));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_local_bounds_unions_primitives() {
        let mesh = Mesh::new("car", vec![
            Primitive::with_bounds(Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))),
            Primitive::with_bounds(Aabb::new(Vec3::new(-1.0, 0.0, 0.0), Vec3::new(0.0, 2.0, 0.5))),
        ]);
        let bounds = mesh.local_bounds().unwrap();
        assert_eq!(bounds.min, Vec3::new(-1.0, 0.0, 0.0));
        assert_eq!(bounds.max, Vec3::new(1.0, 2.0, 1.0));
        assert!(Mesh::new("empty", vec![]).local_bounds().is_none());
    }
}
