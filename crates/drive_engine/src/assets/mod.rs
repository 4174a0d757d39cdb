//! Asset boundary
//!
//! File parsing and GPU upload happen in an external loader. This module
//! holds what that loader hands over (meshes with per-primitive bounds) and
//! turns a scene description into a populated registry.

pub mod loader;
pub mod mesh;
pub mod scene_description;

pub use loader::{LoadedScene, SceneLoader};
pub use mesh::{IndexType, MaterialDescriptor, Mesh, MeshId, MeshStore, Primitive};
pub use scene_description::{CameraDescription, NodeDescription, NodeRole, SceneDescription};
