//! Scene management
//!
//! Owns everything that is placed in the world: transform nodes, the node
//! variants built on top of them, the named registry that stores them, and the
//! prefab factory that stamps out new pickups.
//!
//! ## Architecture
//!
//! ```text
//! TransformNode
//!      ↓
//! RenderNode ──→ CollidableNode (pickups, obstacles)
//!      └───────→ VehicleNode (actor, guarded steering)
//!
//! SceneNode ──→ SceneRegistry (name index + mesh groups)
//! ```
//!
//! Every variant is stored as a [`SceneNode`]; code that only cares about one
//! capability goes through the [`Placed`], [`Drawable`] or [`Collider`] traits.

mod camera;
mod environment;
mod movement;
mod node;
mod prefab;
mod registry;
mod transform;
mod vehicle;

pub use camera::{CameraNode, Projection};
pub use environment::{DaylightEntry, DaylightTable, Environment, Fog, Light};
pub use movement::{Movement, Rotation};
pub use node::{CollidableNode, CollisionClass, Collider, Drawable, Placed, RenderNode, SceneNode, SkyNode};
pub use prefab::{PrefabFactory, PrefabInstance};
pub use registry::{ConsistencyError, NodeKey, SceneRegistry};
pub use transform::TransformNode;
pub use vehicle::{AutoDrive, SteeringLimits, VehicleNode};

use crate::assets::MeshId;

/// Scene construction errors
///
/// All of these are configuration problems detected while building a scene;
/// none of them can occur once a tick is running.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SceneError {
    /// A node references a mesh the store does not hold
    #[error("Mesh not found: {0}")]
    MissingMesh(MeshId),

    /// A node name is already taken in the registry
    #[error("Duplicate node name: {0}")]
    DuplicateName(String),

    /// The scene has no camera node
    #[error("Scene has no camera")]
    MissingCamera,

    /// The scene has no vehicle node
    #[error("Scene has no vehicle actor")]
    MissingActor,

    /// The scene has more than one vehicle node
    #[error("Scene has more than one vehicle actor: {0}")]
    MultipleActors(String),

    /// A prefab template name is not in the registry or is not collidable
    #[error("Prefab template not found: {0}")]
    MissingTemplate(String),

    /// A node description is malformed
    #[error("Invalid node '{name}': {reason}")]
    InvalidNode {
        /// Node name
        name: String,
        /// What is wrong with it
        reason: String,
    },
}
