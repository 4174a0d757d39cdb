//! # Drive Engine
//!
//! Scene core for a real-time vehicle simulation.
//!
//! ## Features
//!
//! - **Cached Transforms**: world matrices recomposed only after mutation
//! - **Scene Registry**: named nodes grouped by mesh for instanced drawing
//! - **Collision Sweep**: actor-against-world AABB tests with consume-on-hit pickups
//! - **Prefabs**: uniquely named procedural spawns sharing one mesh
//! - **Renderer Boundary**: one draw call per distinct mesh
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use drive_engine::prelude::*;
//!
//! fn tick(scene: &mut LoadedScene) {
//!     let report = CollisionSweep::run(&mut scene.registry, scene.actor);
//!     for name in &report.consumed {
//!         log::info!("picked up {name}");
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod render;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{LoadedScene, Mesh, MeshId, MeshStore, Primitive, SceneDescription, SceneLoader},
        config::{Config, ConfigError},
        foundation::{
            math::{Mat4, Vec3},
            time::{FixedTimestep, Timer},
        },
        input::{ActorKind, KeyCode, MovementMap},
        physics::{Aabb, CollisionSweep, SweepReport},
        render::{submit_frame, FrameOptions, FrameStats, MeshRenderer},
        scene::{
            CameraNode, CollidableNode, CollisionClass, Environment, Movement, NodeKey, Placed, PrefabFactory,
            SceneError, SceneNode, SceneRegistry, VehicleNode,
        },
    };
}
