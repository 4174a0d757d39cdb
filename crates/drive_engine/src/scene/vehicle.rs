//! Vehicle actor with guarded steering
//!
//! The vehicle keeps two accumulators: pitch (rotation about local X) and
//! roll (rotation about local Z). A steering delta that would push either
//! accumulator to or past its limit is rejected whole, companion translate
//! included. Pivot rotations bypass the guard and accumulate into the
//! transform's pivot matrix, which carries the vehicle around the circuit.

use crate::assets::Mesh;
use crate::foundation::math::{Mat4, Vec3};
use crate::scene::movement::{Movement, Rotation};
use crate::scene::node::{CollisionClass, Collider, Drawable, Placed, RenderNode};
use crate::scene::transform::TransformNode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Steering limits in degrees
///
/// Accumulators must stay strictly inside `(-limit, limit)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SteeringLimits {
    /// Pitch limit
    pub max_pitch: f32,
    /// Roll limit
    pub max_roll: f32,
}

impl Default for SteeringLimits {
    fn default() -> Self {
        Self { max_pitch: 45.0, max_roll: 45.0 }
    }
}

/// Auto-drive parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoDrive {
    /// Axis of the circuit pivot
    pub pivot_axis: Vec3,
    /// Pivot rotation per auto-drive step, in degrees
    pub degrees_per_step: f32,
    /// Accumulated angle beyond which recentering kicks in
    pub recenter_threshold: f32,
    /// Fraction of the accumulated angle removed per step
    pub recenter_gain: f32,
    /// Lateral offset per degree of roll correction
    pub lateral_per_degree: f32,
}

impl Default for AutoDrive {
    fn default() -> Self {
        Self {
            pivot_axis: Vec3::z(),
            degrees_per_step: 1.0,
            recenter_threshold: 10.0,
            recenter_gain: 0.25,
            lateral_per_degree: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SteeringAxis {
    Pitch(f32),
    Roll(f32),
}

impl SteeringAxis {
    /// Classify a rotation axis, carrying the axis sign
    fn of(axis: &Vec3) -> Option<Self> {
        const ALIGNED: f32 = 1.0 - 1e-4;
        let axis = axis.try_normalize(f32::EPSILON)?;
        if axis.x.abs() >= ALIGNED {
            Some(Self::Pitch(axis.x.signum()))
        } else if axis.z.abs() >= ALIGNED {
            Some(Self::Roll(axis.z.signum()))
        } else {
            None
        }
    }
}

/// The player's vehicle
#[derive(Debug, Clone)]
pub struct VehicleNode {
    body: RenderNode,
    pitch: f32,
    roll: f32,
    limits: SteeringLimits,
    forward: Vec3,
}

impl VehicleNode {
    /// Create a vehicle with level attitude
    pub fn new(transform: TransformNode, mesh: Arc<Mesh>, limits: SteeringLimits) -> Self {
        Self {
            body: RenderNode::new(transform, mesh),
            pitch: 0.0,
            roll: 0.0,
            limits,
            forward: Vec3::x(),
        }
    }

    /// Accumulated pitch in degrees
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Accumulated roll in degrees
    pub fn roll(&self) -> f32 {
        self.roll
    }

    /// Steering limits
    pub fn limits(&self) -> SteeringLimits {
        self.limits
    }

    /// World-space unit forward direction
    pub fn facing(&self) -> Vec3 {
        let world: Mat4 = self.world_matrix();
        world
            .transform_vector(&self.forward)
            .try_normalize(f32::EPSILON)
            .unwrap_or(self.forward)
    }

    /// Movements for one auto-drive step
    ///
    /// Always contains the circuit pivot rotation. When an accumulator is past
    /// the recentre threshold a proportional correction toward level follows;
    /// a roll correction also slides the vehicle back sideways.
    pub fn auto_drive(&self, params: &AutoDrive) -> Vec<Movement> {
        let mut movements = vec![Movement::rotate(Rotation::pivot(params.pivot_axis, params.degrees_per_step))];

        if self.pitch.abs() > params.recenter_threshold {
            let correction = -params.recenter_gain * self.pitch;
            movements.push(Movement::rotate(Rotation::new(Vec3::x(), correction)));
        }

        if self.roll.abs() > params.recenter_threshold {
            let correction = -params.recenter_gain * self.roll;
            movements.push(
                Movement::rotate(Rotation::new(Vec3::z(), correction))
                    .with_translate(Vec3::new(0.0, params.lateral_per_degree * correction, 0.0)),
            );
        }

        movements
    }

    fn within(value: f32, limit: f32) -> bool {
        value > -limit && value < limit
    }
}

impl Placed for VehicleNode {
    fn transform(&self) -> &TransformNode {
        &self.body.transform
    }

    fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.body.transform
    }

    /// Apply a movement unless it would break the steering limits
    ///
    /// Rejected movements leave the vehicle untouched and return `false`.
    fn apply_movement(&mut self, movement: Option<&Movement>) -> bool {
        let Some(movement) = movement else {
            return true;
        };

        let (mut pitch, mut roll) = (self.pitch, self.roll);
        if let Some(rotation) = movement.rotate.as_ref().filter(|r| !r.pivot) {
            match SteeringAxis::of(&rotation.axis) {
                Some(SteeringAxis::Pitch(sign)) => {
                    pitch += sign * rotation.degrees;
                    if !Self::within(pitch, self.limits.max_pitch) {
                        log::trace!("Pitch {pitch:.1} out of range, movement dropped");
                        return false;
                    }
                }
                Some(SteeringAxis::Roll(sign)) => {
                    roll += sign * rotation.degrees;
                    if !Self::within(roll, self.limits.max_roll) {
                        log::trace!("Roll {roll:.1} out of range, movement dropped");
                        return false;
                    }
                }
                None => {
                    log::trace!("Vehicle cannot rotate about {:?}, movement dropped", rotation.axis);
                    return false;
                }
            }
        }

        self.body.transform.apply_movement(Some(movement));
        self.pitch = pitch;
        self.roll = roll;
        true
    }
}

impl Drawable for VehicleNode {
    fn mesh(&self) -> &Arc<Mesh> {
        &self.body.mesh
    }
}

impl Collider for VehicleNode {
    fn collision_class(&self) -> Option<CollisionClass> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::Primitive;
    use crate::foundation::math::{axis_rotation, translation};
    use crate::physics::collision::Aabb;
    use approx::assert_relative_eq;

    fn vehicle() -> VehicleNode {
        let mesh = Arc::new(Mesh::new("car", vec![Primitive::with_bounds(Aabb::new(
            Vec3::zeros(),
            Vec3::new(1.0, 1.0, 1.0),
        ))]));
        VehicleNode::new(TransformNode::new(), mesh, SteeringLimits::default())
    }

    fn pitch(degrees: f32) -> Movement {
        Movement::rotate(Rotation::new(Vec3::x(), degrees))
    }

    #[test]
    fn test_pitch_stops_before_limit() {
        let mut car = vehicle();
        for _ in 0..8 {
            assert!(car.apply_movement(Some(&pitch(-5.0))));
        }
        assert_relative_eq!(car.pitch(), -40.0);
        let before = car.world_matrix();

        // -45 is on the boundary and must be rejected
        assert!(!car.apply_movement(Some(&pitch(-5.0))));
        assert_relative_eq!(car.pitch(), -40.0);
        assert_eq!(car.world_matrix(), before);
    }

    #[test]
    fn test_rejected_delta_drops_companion_translate() {
        let mut car = vehicle();
        let roll = Movement::rotate(Rotation::new(Vec3::z(), 30.0)).with_translate(Vec3::new(0.0, 3.0, 0.0));
        assert!(car.apply_movement(Some(&roll)));
        let before = car.world_matrix();
        assert!(!car.apply_movement(Some(&roll)));
        assert_relative_eq!(car.roll(), 30.0);
        assert_eq!(car.world_matrix(), before);
        assert_relative_eq!(*car.transform().translation(), translation(&Vec3::new(0.0, 3.0, 0.0)));
    }

    #[test]
    fn test_negative_axis_flips_accumulation() {
        let mut car = vehicle();
        car.apply_movement(Some(&Movement::rotate(Rotation::new(-Vec3::x(), 10.0))));
        assert_relative_eq!(car.pitch(), -10.0);
    }

    #[test]
    fn test_pivot_rotation_is_unclamped() {
        let mut car = vehicle();
        let step = Movement::rotate(Rotation::pivot(Vec3::z(), 1.0));
        for _ in 0..100 {
            assert!(car.apply_movement(Some(&step)));
        }
        assert_relative_eq!(car.roll(), 0.0);
        assert_relative_eq!(*car.transform().pivot(), axis_rotation(&Vec3::z(), 100.0), epsilon = 1e-4);
    }

    #[test]
    fn test_off_axis_rotation_rejected() {
        let mut car = vehicle();
        assert!(!car.apply_movement(Some(&Movement::rotate(Rotation::new(Vec3::y(), 5.0)))));
        assert_eq!(*car.transform().rotation(), Mat4::identity());
    }

    #[test]
    fn test_auto_drive_without_tilt_only_pivots() {
        let car = vehicle();
        let movements = car.auto_drive(&AutoDrive::default());
        assert_eq!(movements.len(), 1);
        assert!(movements[0].rotate.unwrap().pivot);
    }

    #[test]
    fn test_auto_drive_recenters_roll() {
        let mut car = vehicle();
        car.apply_movement(Some(&Movement::rotate(Rotation::new(Vec3::z(), 20.0))));
        let params = AutoDrive::default();
        let movements = car.auto_drive(&params);
        assert_eq!(movements.len(), 2);

        let correction = movements[1];
        let rotation = correction.rotate.unwrap();
        assert_relative_eq!(rotation.degrees, -5.0);
        assert_relative_eq!(correction.translate.unwrap().y, -0.5);

        for movement in &movements {
            assert!(car.apply_movement(Some(movement)));
        }
        assert_relative_eq!(car.roll(), 15.0);
    }

    #[test]
    fn test_facing_follows_pivot() {
        let mut car = vehicle();
        assert_relative_eq!(car.facing(), Vec3::x(), epsilon = 1e-6);
        car.apply_movement(Some(&Movement::rotate(Rotation::pivot(Vec3::z(), 90.0))));
        assert_relative_eq!(car.facing(), Vec3::y(), epsilon = 1e-6);
    }
}
