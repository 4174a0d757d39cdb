//! Primitive collision shapes and intersection algorithms

use crate::foundation::math::{Mat4, Point3, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-Aligned Bounding Box
///
/// Stored in local space by the asset boundary and re-fit into world space
/// on demand. Re-fitting the 8 transformed corners gives a loose bound under
/// rotation, which is acceptable for pickup tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Tightest box around a flat `[x, y, z, x, y, z, ...]` position buffer
    ///
    /// Returns `None` for an empty buffer. A trailing partial triple is ignored.
    pub fn from_points(positions: &[f32]) -> Option<Self> {
        let mut chunks = positions.chunks_exact(3);
        let first = chunks.next()?;
        let start = Vec3::new(first[0], first[1], first[2]);
        let (min, max) = chunks.fold((start, start), |(min, max), p| {
            let point = Vec3::new(p[0], p[1], p[2]);
            (min.inf(&point), max.sup(&point))
        });
        Some(Self { min, max })
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// All 8 corners, every min/max combination per axis
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Transform the box and re-fit an axis-aligned box around the result
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        let corners = self.corners().map(|c| matrix.transform_point(&Point3::from(c)).coords);
        let mut min = corners[0];
        let mut max = corners[0];
        for corner in &corners[1..] {
            min = min.inf(corner);
            max = max.sup(corner);
        }
        Self { min, max }
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Intervals must overlap on all three axes; touching faces count.
    pub fn intersects(&self, other: &Aabb) -> bool {
        self.min.x <= other.max.x && self.max.x >= other.min.x &&
        self.min.y <= other.max.y && self.max.y >= other.min.y &&
        self.min.z <= other.max.z && self.max.z >= other.min.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{axis_rotation, translation};
    use approx::assert_relative_eq;

    fn unit_box() -> Aabb {
        Aabb::new(Vec3::zeros(), Vec3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn test_aabb_intersects() {
        let aabb1 = Aabb::new(Vec3::new(0.0, 0.0, 0.0), Vec3::new(2.0, 2.0, 2.0));
        let aabb2 = Aabb::new(Vec3::new(1.0, 1.0, 1.0), Vec3::new(3.0, 3.0, 3.0));
        let aabb3 = Aabb::new(Vec3::new(5.0, 5.0, 5.0), Vec3::new(7.0, 7.0, 7.0));

        assert!(aabb1.intersects(&aabb2));
        assert!(!aabb1.intersects(&aabb3));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let boxes = [
            unit_box(),
            Aabb::new(Vec3::new(0.5, 0.5, 0.5), Vec3::new(1.5, 1.5, 1.5)),
            Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0)),
            Aabb::new(Vec3::new(0.2, 3.0, 0.2), Vec3::new(0.4, 4.0, 0.4)),
            Aabb::new(Vec3::new(-5.0, -5.0, -5.0), Vec3::new(5.0, 5.0, 5.0)),
            Aabb::new(Vec3::new(0.0, 0.0, 1.01), Vec3::new(1.0, 1.0, 2.0)),
        ];
        for a in &boxes {
            for b in &boxes {
                assert_eq!(a.intersects(b), b.intersects(a), "{a:?} vs {b:?}");
            }
        }
    }

    #[test]
    fn test_touching_faces_overlap() {
        let right = Aabb::new(Vec3::new(1.0, 0.0, 0.0), Vec3::new(2.0, 1.0, 1.0));
        assert!(unit_box().intersects(&right));
    }

    #[test]
    fn test_separated_on_single_axis() {
        let above = Aabb::new(Vec3::new(0.0, 1.5, 0.0), Vec3::new(1.0, 2.5, 1.0));
        assert!(!unit_box().intersects(&above));
    }

    #[test]
    fn test_from_points() {
        let aabb = Aabb::from_points(&[1.0, -2.0, 0.5, -1.0, 4.0, 0.0, 0.0, 0.0, 3.0]).unwrap();
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, 0.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 4.0, 3.0));
        assert!(Aabb::from_points(&[]).is_none());
    }

    #[test]
    fn test_transformed_translation() {
        let moved = unit_box().transformed(&translation(&Vec3::new(2.0, 0.0, -1.0)));
        assert_relative_eq!(moved.min, Vec3::new(2.0, 0.0, -1.0), epsilon = 1e-6);
        assert_relative_eq!(moved.max, Vec3::new(3.0, 1.0, 0.0), epsilon = 1e-6);
    }

    #[test]
    fn test_transformed_rotation_refits_axis_aligned() {
        let rotated = unit_box().transformed(&axis_rotation(&Vec3::z(), 45.0));
        let half_diagonal = std::f32::consts::FRAC_1_SQRT_2;
        assert_relative_eq!(rotated.min.x, -half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.x, half_diagonal, epsilon = 1e-5);
        assert_relative_eq!(rotated.max.y, 2.0 * half_diagonal, epsilon = 1e-5);
        assert!(rotated.min.x <= rotated.max.x && rotated.min.y <= rotated.max.y);
    }

    #[test]
    fn test_union() {
        let far = Aabb::new(Vec3::new(4.0, 4.0, 4.0), Vec3::new(5.0, 5.0, 5.0));
        let both = unit_box().union(&far);
        assert_eq!(both.min, Vec3::zeros());
        assert_eq!(both.max, Vec3::new(5.0, 5.0, 5.0));
        assert!(both.intersects(&far) && both.intersects(&unit_box()));
        assert_relative_eq!(both.center(), Vec3::new(2.5, 2.5, 2.5));
    }
}
