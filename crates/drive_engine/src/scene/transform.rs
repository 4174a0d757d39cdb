//! Transform node with a lazily cached world matrix
//!
//! Translation, rotation and scale are kept as separate 4x4 matrices. The
//! world matrix is composed as
//!
//! ```text
//! world = parent × pivot × translation × rotation × scale
//! ```
//!
//! `parent` is the rigid prefix inherited from the scene hierarchy at load
//! time, `pivot` is an extra rotation that only vehicles accumulate. Both are
//! identity for most nodes.
//!
//! The composed matrix is cached. Any mutation marks the cache dirty and the
//! next [`TransformNode::world_matrix`] call recomposes it. The cache sits in a
//! `Cell` so that read-only passes such as the collision sweep can still
//! refresh it.

use crate::foundation::math::Mat4;
use crate::scene::movement::Movement;
use std::cell::Cell;

/// Placed object in the scene
#[derive(Debug, Clone)]
pub struct TransformNode {
    translation: Mat4,
    rotation: Mat4,
    scale: Mat4,
    parent: Mat4,
    pivot: Mat4,
    cached_world: Cell<Option<Mat4>>,
}

impl Default for TransformNode {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TransformNode {
    fn eq(&self, other: &Self) -> bool {
        self.translation == other.translation
            && self.rotation == other.rotation
            && self.scale == other.scale
            && self.parent == other.parent
            && self.pivot == other.pivot
    }
}

impl TransformNode {
    /// Identity transform
    pub fn new() -> Self {
        Self::from_components(Mat4::identity(), Mat4::identity(), Mat4::identity())
    }

    /// Transform from explicit translation, rotation and scale matrices
    pub fn from_components(translation: Mat4, rotation: Mat4, scale: Mat4) -> Self {
        Self {
            translation,
            rotation,
            scale,
            parent: Mat4::identity(),
            pivot: Mat4::identity(),
            cached_world: Cell::new(None),
        }
    }

    /// Builder pattern: set the inherited parent matrix
    pub fn with_parent(mut self, parent: Mat4) -> Self {
        self.set_parent(parent);
        self
    }

    /// Translation component
    pub fn translation(&self) -> &Mat4 {
        &self.translation
    }

    /// Rotation component
    pub fn rotation(&self) -> &Mat4 {
        &self.rotation
    }

    /// Scale component
    pub fn scale_matrix(&self) -> &Mat4 {
        &self.scale
    }

    /// Inherited parent matrix
    pub fn parent(&self) -> &Mat4 {
        &self.parent
    }

    /// Accumulated pivot rotation
    pub fn pivot(&self) -> &Mat4 {
        &self.pivot
    }

    /// Whether the cached world matrix is stale
    pub fn is_dirty(&self) -> bool {
        self.cached_world.get().is_none()
    }

    fn mark_dirty(&self) {
        self.cached_world.set(None);
    }

    /// Left-multiply the translation by `delta`
    pub fn translate(&mut self, delta: &Mat4) {
        self.translation = delta * self.translation;
        self.mark_dirty();
    }

    /// Left-multiply the rotation by `delta`
    pub fn rotate(&mut self, delta: &Mat4) {
        self.rotation = delta * self.rotation;
        self.mark_dirty();
    }

    /// Left-multiply the scale by `delta`
    pub fn scale(&mut self, delta: &Mat4) {
        self.scale = delta * self.scale;
        self.mark_dirty();
    }

    /// Left-multiply the pivot rotation by `delta`
    pub fn rotate_pivot(&mut self, delta: &Mat4) {
        self.pivot = delta * self.pivot;
        self.mark_dirty();
    }

    /// Replace the inherited parent matrix
    pub fn set_parent(&mut self, parent: Mat4) {
        self.parent = parent;
        self.mark_dirty();
    }

    /// Apply a movement delta
    ///
    /// `None`, and every `None` field inside the movement, leaves the node
    /// untouched. A rotation flagged as pivot goes to the pivot matrix.
    pub fn apply_movement(&mut self, movement: Option<&Movement>) {
        let Some(movement) = movement else {
            return;
        };
        if let Some(delta) = movement.translation_matrix() {
            self.translate(&delta);
        }
        if let Some(rotation) = &movement.rotate {
            let delta = rotation.to_matrix();
            if rotation.pivot {
                self.rotate_pivot(&delta);
            } else {
                self.rotate(&delta);
            }
        }
        if let Some(delta) = movement.scale_matrix() {
            self.scale(&delta);
        }
    }

    /// World matrix, recomposed only when dirty
    pub fn world_matrix(&self) -> Mat4 {
        if let Some(world) = self.cached_world.get() {
            return world;
        }
        let world = self.recompute();
        self.cached_world.set(Some(world));
        world
    }

    /// Compose the world matrix without touching the cache
    pub fn recompute(&self) -> Mat4 {
        self.parent * self.pivot * self.translation * self.rotation * self.scale
    }

    /// Copy with an empty cache, for prefab instantiation
    pub fn fresh_copy(&self) -> Self {
        let copy = self.clone();
        copy.mark_dirty();
        copy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{axis_rotation, non_uniform_scale, translation, Point3, Vec3};
    use crate::scene::movement::Rotation;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_world_matrix() {
        let node = TransformNode::new();
        assert_eq!(node.world_matrix(), Mat4::identity());
        assert!(!node.is_dirty());
    }

    #[test]
    fn test_mutation_marks_dirty() {
        let mut node = TransformNode::new();
        node.world_matrix();
        node.translate(&translation(&Vec3::new(1.0, 0.0, 0.0)));
        assert!(node.is_dirty());
        node.world_matrix();
        assert!(!node.is_dirty());
        node.rotate_pivot(&axis_rotation(&Vec3::z(), 10.0));
        assert!(node.is_dirty());
    }

    #[test]
    fn test_cache_matches_recompute_after_mutation_sequence() {
        let mut node = TransformNode::new().with_parent(translation(&Vec3::new(0.0, 5.0, 0.0)));
        let steps: [Box<dyn Fn(&mut TransformNode)>; 6] = [
            Box::new(|n: &mut TransformNode| n.translate(&translation(&Vec3::new(1.0, 2.0, 3.0)))),
            Box::new(|n: &mut TransformNode| n.rotate(&axis_rotation(&Vec3::x(), 30.0))),
            Box::new(|n: &mut TransformNode| n.scale(&non_uniform_scale(&Vec3::new(2.0, 1.0, 0.5)))),
            Box::new(|n: &mut TransformNode| n.rotate_pivot(&axis_rotation(&Vec3::z(), -15.0))),
            Box::new(|n: &mut TransformNode| n.translate(&translation(&Vec3::new(-0.5, 0.0, 0.0)))),
            Box::new(|n: &mut TransformNode| n.set_parent(Mat4::identity())),
        ];
        for (i, step) in steps.iter().enumerate() {
            step(&mut node);
            if i % 2 == 0 {
                // Read only every other step so some mutations stack up dirty
                node.world_matrix();
            }
        }
        assert_relative_eq!(node.world_matrix(), node.recompute(), epsilon = 1e-6);
    }

    #[test]
    fn test_composition_order() {
        let mut node = TransformNode::new();
        node.scale(&non_uniform_scale(&Vec3::new(2.0, 2.0, 2.0)));
        node.rotate(&axis_rotation(&Vec3::z(), 90.0));
        node.translate(&translation(&Vec3::new(10.0, 0.0, 0.0)));
        // Scale, then rotate, then translate
        let p = node.world_matrix().transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p, Point3::new(10.0, 2.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_apply_movement_absent_is_noop() {
        let mut node = TransformNode::new();
        node.world_matrix();
        node.apply_movement(None);
        node.apply_movement(Some(&Movement::default()));
        assert!(!node.is_dirty());
        assert_eq!(node, TransformNode::new());
    }

    #[test]
    fn test_apply_movement_pivot_rotation() {
        let mut node = TransformNode::new();
        node.apply_movement(Some(&Movement::rotate(Rotation::pivot(Vec3::z(), 20.0))));
        assert_eq!(*node.rotation(), Mat4::identity());
        assert_relative_eq!(*node.pivot(), axis_rotation(&Vec3::z(), 20.0), epsilon = 1e-6);
    }

    #[test]
    fn test_fresh_copy_has_clean_cache() {
        let mut node = TransformNode::new();
        node.translate(&translation(&Vec3::new(3.0, 0.0, 0.0)));
        node.world_matrix();
        let copy = node.fresh_copy();
        assert!(copy.is_dirty());
        assert_eq!(copy, node);
    }
}
