//! Render queue for instanced rendering
//!
//! Collects the world matrices of every node in a mesh group into one batch,
//! turning one draw call per node into one draw call per distinct mesh.

use crate::assets::{Mesh, MeshId};
use crate::scene::SceneRegistry;
use crate::scene::SceneNode;
use std::sync::Arc;

/// Column-major 4x4 world matrix as uploaded to the GPU
pub type InstanceTransform = [[f32; 4]; 4];

/// All instances of one mesh
#[derive(Debug, Clone)]
pub struct RenderBatch {
    /// Mesh shared by every instance
    pub mesh: Arc<Mesh>,

    /// World matrix of every instance
    pub instances: Vec<InstanceTransform>,
}

impl RenderBatch {
    /// Create an empty batch for a mesh
    pub fn new(mesh: Arc<Mesh>) -> Self {
        Self {
            mesh,
            instances: Vec::new(),
        }
    }

    /// Number of instances in this batch
    pub fn instance_count(&self) -> usize {
        self.instances.len()
    }

    /// Instance data as raw bytes for buffer upload
    pub fn instance_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Batches and sky meshes for one frame
#[derive(Debug, Default)]
pub struct RenderQueue {
    batches: Vec<RenderBatch>,
    sky: Vec<Arc<Mesh>>,
}

impl RenderQueue {
    /// Create an empty render queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the queue from the registry's mesh groups
    ///
    /// Batches come out in mesh-id order. Empty groups produce no batch.
    pub fn build(registry: &SceneRegistry) -> Self {
        let mut queue = Self::new();

        for (mesh_id, keys) in registry.mesh_groups() {
            let mut batch: Option<RenderBatch> = None;
            for &key in keys {
                let Some(node) = registry.node(key) else {
                    continue;
                };
                let Some(mesh) = node.mesh() else {
                    continue;
                };
                batch
                    .get_or_insert_with(|| RenderBatch::new(Arc::clone(mesh)))
                    .instances
                    .push(node.transform().world_matrix().into());
            }
            match batch {
                Some(batch) => queue.batches.push(batch),
                None => log::warn!("Mesh group '{mesh_id}' has no live nodes"),
            }
        }

        queue.sky = registry
            .iter()
            .filter_map(|(_, _, node)| match node {
                SceneNode::Sky(sky) => Some(Arc::clone(&sky.mesh)),
                _ => None,
            })
            .collect();

        queue
    }

    /// Instanced batches
    pub fn batches(&self) -> &[RenderBatch] {
        &self.batches
    }

    /// Batch for `mesh`, if any node draws it
    pub fn batch(&self, mesh: &MeshId) -> Option<&RenderBatch> {
        self.batches.iter().find(|batch| batch.mesh.id == *mesh)
    }

    /// Sky meshes
    pub fn sky(&self) -> &[Arc<Mesh>] {
        &self.sky
    }

    /// Total number of instances over all batches
    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(RenderBatch::instance_count).sum()
    }

    /// Number of instanced batches
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}
