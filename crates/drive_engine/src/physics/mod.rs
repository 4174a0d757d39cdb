//! Physics module for collision detection
//!
//! Only what the drive needs: axis-aligned boxes and a per-tick sweep of the
//! actor against every other collidable. There is no response or
//! integration; contacts are resolved by gameplay rules.

pub mod collision;
pub mod collision_system;

pub use collision::Aabb;
pub use collision_system::{CollisionSweep, SweepReport};
