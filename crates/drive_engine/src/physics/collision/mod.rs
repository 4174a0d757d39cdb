//! Collision primitives
//!
//! # Architecture
//!
//! - **Model Space Storage**: bounding boxes are stored per primitive in mesh-local coordinates
//! - **On-Demand Transformation**: boxes are re-fit into world space only when a sweep tests them
//!
//! # Key Types
//!
//! - [`Aabb`] - Axis-aligned bounding box with an inclusive overlap test

pub mod primitives;

pub use primitives::Aabb;
