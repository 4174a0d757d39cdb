//! Node variants stored in the scene registry
//!
//! Capabilities are expressed as traits layered on top of each other:
//! [`Placed`] for anything with a transform, [`Drawable`] for placed nodes
//! with a mesh, and [`Collider`] for drawables that take part in the
//! collision sweep. The registry stores the closed [`SceneNode`] enum so that
//! every pass matches exhaustively over the variants.

use crate::assets::Mesh;
use crate::foundation::math::Mat4;
use crate::physics::collision::Aabb;
use crate::scene::camera::CameraNode;
use crate::scene::movement::Movement;
use crate::scene::transform::TransformNode;
use crate::scene::vehicle::VehicleNode;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Anything with a transform that movement deltas can be applied to
pub trait Placed {
    /// Transform of this node
    fn transform(&self) -> &TransformNode;

    /// Mutable transform of this node
    fn transform_mut(&mut self) -> &mut TransformNode;

    /// Apply a movement delta, returning whether it was accepted
    fn apply_movement(&mut self, movement: Option<&Movement>) -> bool {
        self.transform_mut().apply_movement(movement);
        true
    }

    /// Current world matrix
    fn world_matrix(&self) -> Mat4 {
        self.transform().world_matrix()
    }
}

/// Placed node with a mesh
pub trait Drawable: Placed {
    /// Shared mesh
    fn mesh(&self) -> &Arc<Mesh>;
}

/// Drawable node that takes part in collision tests
pub trait Collider: Drawable {
    /// Pickup category, `None` for the actor itself
    fn collision_class(&self) -> Option<CollisionClass>;

    /// World-space bounding box of every primitive
    ///
    /// Each local box is pushed through the world matrix and re-fit, so a
    /// rotated node gets a loose axis-aligned bound.
    fn world_bounding_boxes(&self) -> Vec<Aabb> {
        let world = self.world_matrix();
        self.mesh()
            .primitives
            .iter()
            .map(|primitive| primitive.bounds.transformed(&world))
            .collect()
    }
}

/// How the collision sweep resolves a hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionClass {
    /// Consumed on contact, refuels the vehicle
    Fuel,
    /// Consumed on contact, increments the score
    Currency,
    /// Fatal on contact
    Obstacle,
}

/// Placed node drawn with a mesh
#[derive(Debug, Clone)]
pub struct RenderNode {
    /// Transform
    pub transform: TransformNode,
    /// Shared mesh
    pub mesh: Arc<Mesh>,
}

impl RenderNode {
    /// Create a render node
    pub fn new(transform: TransformNode, mesh: Arc<Mesh>) -> Self {
        Self { transform, mesh }
    }
}

impl Placed for RenderNode {
    fn transform(&self) -> &TransformNode {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.transform
    }
}

impl Drawable for RenderNode {
    fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }
}

/// Render node with world-space bounding boxes
#[derive(Debug, Clone)]
pub struct CollidableNode {
    /// Drawn part
    pub render: RenderNode,
    /// Pickup category
    pub class: CollisionClass,
}

impl CollidableNode {
    /// Create a collidable node
    pub fn new(render: RenderNode, class: CollisionClass) -> Self {
        Self { render, class }
    }

    /// Copy with shared mesh and a clean transform cache
    pub fn instantiate(&self) -> Self {
        Self {
            render: RenderNode::new(self.render.transform.fresh_copy(), Arc::clone(&self.render.mesh)),
            class: self.class,
        }
    }
}

impl Placed for CollidableNode {
    fn transform(&self) -> &TransformNode {
        &self.render.transform
    }

    fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.render.transform
    }
}

impl Drawable for CollidableNode {
    fn mesh(&self) -> &Arc<Mesh> {
        &self.render.mesh
    }
}

impl Collider for CollidableNode {
    fn collision_class(&self) -> Option<CollisionClass> {
        Some(self.class)
    }
}

/// Background sky, drawn in its own pass and never collided with
#[derive(Debug, Clone)]
pub struct SkyNode {
    /// Transform
    pub transform: TransformNode,
    /// Sky mesh
    pub mesh: Arc<Mesh>,
}

impl Placed for SkyNode {
    fn transform(&self) -> &TransformNode {
        &self.transform
    }

    fn transform_mut(&mut self) -> &mut TransformNode {
        &mut self.transform
    }
}

impl Drawable for SkyNode {
    fn mesh(&self) -> &Arc<Mesh> {
        &self.mesh
    }
}

/// Every kind of node the registry stores
#[derive(Debug, Clone)]
pub enum SceneNode {
    /// Static scenery
    Renderable(RenderNode),
    /// Pickup or obstacle
    Collidable(CollidableNode),
    /// The player's vehicle
    Vehicle(VehicleNode),
    /// Camera
    Camera(CameraNode),
    /// Sky backdrop
    Sky(SkyNode),
}

impl SceneNode {
    /// Transform of any variant
    pub fn transform(&self) -> &TransformNode {
        match self {
            Self::Renderable(node) => node.transform(),
            Self::Collidable(node) => node.transform(),
            Self::Vehicle(node) => node.transform(),
            Self::Camera(node) => node.transform(),
            Self::Sky(node) => node.transform(),
        }
    }

    /// Mutable transform of any variant
    pub fn transform_mut(&mut self) -> &mut TransformNode {
        match self {
            Self::Renderable(node) => node.transform_mut(),
            Self::Collidable(node) => node.transform_mut(),
            Self::Vehicle(node) => node.transform_mut(),
            Self::Camera(node) => node.transform_mut(),
            Self::Sky(node) => node.transform_mut(),
        }
    }

    /// Apply a movement through the variant's own rules
    pub fn apply_movement(&mut self, movement: Option<&Movement>) -> bool {
        match self {
            Self::Renderable(node) => node.apply_movement(movement),
            Self::Collidable(node) => node.apply_movement(movement),
            Self::Vehicle(node) => node.apply_movement(movement),
            Self::Camera(node) => node.apply_movement(movement),
            Self::Sky(node) => node.apply_movement(movement),
        }
    }

    /// Mesh of drawable variants
    pub fn mesh(&self) -> Option<&Arc<Mesh>> {
        match self {
            Self::Renderable(node) => Some(node.mesh()),
            Self::Collidable(node) => Some(node.mesh()),
            Self::Vehicle(node) => Some(node.mesh()),
            Self::Sky(node) => Some(node.mesh()),
            Self::Camera(_) => None,
        }
    }

    /// World bounding boxes, empty for variants that never collide
    pub fn world_bounding_boxes(&self) -> Vec<Aabb> {
        match self {
            Self::Collidable(node) => node.world_bounding_boxes(),
            Self::Vehicle(node) => node.world_bounding_boxes(),
            Self::Renderable(_) | Self::Camera(_) | Self::Sky(_) => Vec::new(),
        }
    }

    /// Pickup category of collidable nodes
    pub fn collision_class(&self) -> Option<CollisionClass> {
        match self {
            Self::Collidable(node) => node.collision_class(),
            Self::Vehicle(node) => node.collision_class(),
            Self::Renderable(_) | Self::Camera(_) | Self::Sky(_) => None,
        }
    }

    /// Whether this node takes part in collision tests
    pub fn is_collidable(&self) -> bool {
        matches!(self, Self::Collidable(_) | Self::Vehicle(_))
    }

    /// Whether this node is drawn through mesh-group batching
    pub fn is_batched(&self) -> bool {
        matches!(self, Self::Renderable(_) | Self::Collidable(_) | Self::Vehicle(_))
    }

    /// Downcast to the vehicle variant
    pub fn as_vehicle(&self) -> Option<&VehicleNode> {
        match self {
            Self::Vehicle(node) => Some(node),
            _ => None,
        }
    }

    /// Mutable downcast to the vehicle variant
    pub fn as_vehicle_mut(&mut self) -> Option<&mut VehicleNode> {
        match self {
            Self::Vehicle(node) => Some(node),
            _ => None,
        }
    }

    /// Downcast to the camera variant
    pub fn as_camera(&self) -> Option<&CameraNode> {
        match self {
            Self::Camera(node) => Some(node),
            _ => None,
        }
    }

    /// Downcast to the collidable variant
    pub fn as_collidable(&self) -> Option<&CollidableNode> {
        match self {
            Self::Collidable(node) => Some(node),
            _ => None,
        }
    }
}
