//! # Rendering boundary
//!
//! The GPU backend lives outside this crate. This module decides *what* to
//! draw each frame and hands it to a [`MeshRenderer`] implementation:
//!
//! - **Sky pass**: every sky node, drawn first
//! - **Instanced pass**: one call per mesh group with all instance matrices
//! - **Debug pass**: world bounding boxes of collidables, when enabled
//!
//! Draw calls are fire-and-forget; a backend that fails a draw reports it
//! through its own channels.

mod render_queue;

pub use render_queue::{InstanceTransform, RenderBatch, RenderQueue};

use crate::assets::Mesh;
use crate::foundation::math::Mat4;
use crate::physics::collision::Aabb;
use crate::scene::{CameraNode, Environment, SceneRegistry};

/// External renderer consuming batched draw submissions
pub trait MeshRenderer {
    /// Draw every instance of `mesh` in one call
    fn draw_instanced(
        &mut self,
        mesh: &Mesh,
        projection: &Mat4,
        view: &Mat4,
        environment: &Environment,
        instances: &[InstanceTransform],
    );

    /// Draw the sky backdrop
    fn draw_sky(&mut self, mesh: &Mesh, projection: &Mat4, view: &Mat4, environment: &Environment);

    /// Draw wireframe boxes
    fn draw_bounding_boxes(&mut self, _projection: &Mat4, _view: &Mat4, _boxes: &[Aabb]) {}
}

/// Per-frame render switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameOptions {
    /// Draw world bounding boxes of collidables
    pub show_bounding_boxes: bool,
}

/// Draw statistics for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Number of draw calls issued
    pub draw_calls: usize,
    /// Number of instances drawn through batches
    pub instances: usize,
}

/// Submit one frame to `renderer`
pub fn submit_frame<R: MeshRenderer + ?Sized>(
    registry: &SceneRegistry,
    camera: &CameraNode,
    environment: &Environment,
    options: FrameOptions,
    renderer: &mut R,
) -> FrameStats {
    let projection = camera.projection_matrix();
    let view = camera.view_matrix();
    let queue = RenderQueue::build(registry);
    let mut stats = FrameStats::default();

    for sky in queue.sky() {
        renderer.draw_sky(sky, &projection, &view, environment);
        stats.draw_calls += 1;
    }

    for batch in queue.batches() {
        renderer.draw_instanced(&batch.mesh, &projection, &view, environment, &batch.instances);
        stats.draw_calls += 1;
        stats.instances += batch.instance_count();
    }

    if options.show_bounding_boxes {
        let boxes: Vec<Aabb> = registry
            .iter()
            .flat_map(|(_, _, node)| node.world_bounding_boxes())
            .collect();
        renderer.draw_bounding_boxes(&projection, &view, &boxes);
        stats.draw_calls += 1;
    }

    log::trace!("Frame submitted: {} draw calls, {} instances", stats.draw_calls, stats.instances);
    stats
}
