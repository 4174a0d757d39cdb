//! Camera node
//!
//! The camera's view matrix inverts `rotation × translation × scale`, with
//! rotation applied before translation, so rotating the camera orbits it
//! around the scene origin.

use crate::foundation::math::{perspective, Mat4};
use crate::scene::node::Placed;
use crate::scene::transform::TransformNode;
use serde::{Deserialize, Serialize};

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    /// Vertical field of view in radians
    pub yfov: f32,
    /// Near plane distance
    pub znear: f32,
    /// Far plane distance
    pub zfar: f32,
    /// Viewport width / height
    pub aspect: f32,
}

impl Projection {
    /// Projection matrix for these parameters
    pub fn matrix(&self) -> Mat4 {
        perspective(self.yfov, self.aspect, self.znear, self.zfar)
    }
}

/// Scene camera
#[derive(Debug, Clone)]
pub struct CameraNode {
    transform: TransformNode,
    projection: Projection,
    projection_matrix: Mat4,
}

impl CameraNode {
    /// Create a camera
    pub fn new(transform: TransformNode, projection: Projection) -> Self {
        Self {
            transform,
            projection,
            projection_matrix: projection.matrix(),
        }
    }

    /// Projection parameters
    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    /// Projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    /// Rebuild the projection for a new viewport shape
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.projection.aspect = aspect;
        self.projection_matrix = self.projection.matrix();
    }

    /// View matrix
    ///
    /// A singular composition has no inverse; that is logged and identity
    /// is used instead.
    pub fn view_matrix(&self) -> Mat4 {
        let t = &self.transform;
        let composed = t.rotation() * t.translation() * t.scale_matrix();
        composed.try_inverse().unwrap_or_else(|| {
            log::warn!("Camera transform is not invertible, using identity view");
            Mat4::identity()
        })
    }
}

impl Placed for CameraNode {
    fn transform(&self) -> &TransformNode {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.transform
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{axis_rotation, non_uniform_scale, translation, Point3, Vec3};
    use approx::assert_relative_eq;

    fn camera() -> CameraNode {
        CameraNode::new(TransformNode::new(), Projection {
            yfov: 0.8,
            znear: 0.1,
            zfar: 100.0,
            aspect: 1.5,
        })
    }

    #[test]
    fn test_view_is_inverse_of_rotation_translation_scale() {
        let mut cam = camera();
        cam.transform_mut().translate(&translation(&Vec3::new(0.0, 0.0, 10.0)));
        cam.transform_mut().rotate(&axis_rotation(&Vec3::y(), 90.0));
        let t = cam.transform();
        let forward = t.rotation() * t.translation() * t.scale_matrix();
        assert_relative_eq!(cam.view_matrix() * forward, Mat4::identity(), epsilon = 1e-5);

        // Rotation applies after translation, so the eye orbits the origin
        let eye = forward.transform_point(&Point3::origin());
        assert_relative_eq!(eye, Point3::new(10.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_singular_transform_falls_back_to_identity() {
        let mut cam = camera();
        cam.transform_mut().scale(&non_uniform_scale(&Vec3::new(0.0, 1.0, 1.0)));
        assert_eq!(cam.view_matrix(), Mat4::identity());
    }

    #[test]
    fn test_set_aspect_ratio_rebuilds_projection() {
        let mut cam = camera();
        let before = cam.projection_matrix();
        cam.set_aspect_ratio(2.0);
        assert_ne!(cam.projection_matrix(), before);
        assert_relative_eq!(cam.projection_matrix(), perspective(0.8, 2.0, 0.1, 100.0));
    }
}
