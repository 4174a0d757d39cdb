//! Math utilities and types
//!
//! Provides the fundamental math types for scene composition. Every placed
//! object stores its translation, rotation and scale as full 4x4 matrices so
//! that all composition is uniform matrix multiplication.

pub use nalgebra::{
    Vector3, Vector4,
    Matrix4,
    Quaternion,
    Unit,
};

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::constants;

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }
}

/// Translation matrix for `offset`
pub fn translation(offset: &Vec3) -> Mat4 {
    Mat4::new_translation(offset)
}

/// Non-uniform scale matrix for `factors`
pub fn non_uniform_scale(factors: &Vec3) -> Mat4 {
    Mat4::new_nonuniform_scaling(factors)
}

/// Rotation matrix of `degrees` around `axis`
///
/// The axis does not need to be normalized. A zero-length axis has no
/// direction to rotate around and yields identity.
pub fn axis_rotation(axis: &Vec3, degrees: f32) -> Mat4 {
    match Unit::try_new(*axis, f32::EPSILON) {
        Some(unit_axis) => Mat4::from_axis_angle(&unit_axis, utils::deg_to_rad(degrees)),
        None => Mat4::identity(),
    }
}

/// Rotation matrix from a quaternion in `[x, y, z, w]` component order
///
/// This is the order asset files store quaternions in. The quaternion is
/// normalized before conversion.
pub fn from_quaternion(xyzw: [f32; 4]) -> Mat4 {
    let [x, y, z, w] = xyzw;
    Quat::from_quaternion(Quaternion::new(w, x, y, z)).to_homogeneous()
}

/// Perspective projection matrix
///
/// Uses the OpenGL clip-space convention (depth mapped to [-1, 1]) expected by
/// the external renderer.
///
/// # Arguments
/// * `yfov` - Vertical field of view in radians
/// * `aspect` - Viewport width / height
/// * `near` - Distance to near clipping plane (must be > 0)
/// * `far` - Distance to far clipping plane (must be > near)
pub fn perspective(yfov: f32, aspect: f32, near: f32, far: f32) -> Mat4 {
    Mat4::new_perspective(aspect, yfov, near, far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_axis_rotation_quarter_turn() {
        let rotation = axis_rotation(&Vec3::new(0.0, 0.0, 2.0), 90.0);
        let rotated = rotation.transform_vector(&Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(rotated, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_zero_axis_is_identity() {
        assert_eq!(axis_rotation(&Vec3::zeros(), 30.0), Mat4::identity());
    }

    #[test]
    fn test_quaternion_matches_axis_rotation() {
        let half = utils::deg_to_rad(45.0);
        let q = from_quaternion([half.sin(), 0.0, 0.0, half.cos()]);
        assert_relative_eq!(q, axis_rotation(&Vec3::x(), 90.0), epsilon = 1e-6);
    }

    #[test]
    fn test_translation_and_scale_compose() {
        let m = translation(&Vec3::new(1.0, 2.0, 3.0)) * non_uniform_scale(&Vec3::new(2.0, 2.0, 2.0));
        let p = m.transform_point(&Point3::new(1.0, 1.0, 1.0));
        assert_relative_eq!(p, Point3::new(3.0, 4.0, 5.0), epsilon = 1e-6);
    }
}
