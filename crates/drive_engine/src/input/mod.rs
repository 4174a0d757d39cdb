//! Input mapping
//!
//! Device polling happens in the host. Each raw key event is looked up once
//! in a [`MovementMap`] to get the movement delta for the camera or the
//! vehicle.

use crate::foundation::math::Vec3;
use crate::scene::{Movement, Rotation};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Keys with a default binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    /// Roll left
    A,
    /// Camera roll
    C,
    /// Roll right
    D,
    /// Camera dolly out
    E,
    /// Camera dolly in
    Q,
    /// Pitch up
    S,
    /// Pitch down
    W,
    /// Camera pitch
    X,
    /// Camera yaw
    Z,
}

/// Which node a key drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    /// The scene camera
    Camera,
    /// The player's vehicle
    Vehicle,
}

/// Key → movement lookup per actor kind
#[derive(Debug, Clone, Default)]
pub struct MovementMap {
    bindings: HashMap<(ActorKind, KeyCode), Movement>,
}

impl MovementMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard driving and camera keys
    ///
    /// Vehicle: `W`/`S` pitch, `A`/`D` roll with a sideways slide.
    /// Camera: `Q`/`E` dolly, `Z`/`X`/`C` rotate about Y, X and Z.
    pub fn defaults() -> Self {
        let mut map = Self::new();

        map.bind(ActorKind::Vehicle, KeyCode::W, Movement::rotate(Rotation::new(Vec3::x(), -5.0)));
        map.bind(ActorKind::Vehicle, KeyCode::S, Movement::rotate(Rotation::new(Vec3::x(), 5.0)));
        map.bind(
            ActorKind::Vehicle,
            KeyCode::A,
            Movement::rotate(Rotation::new(Vec3::z(), 1.0)).with_translate(Vec3::new(0.0, 0.1, 0.0)),
        );
        map.bind(
            ActorKind::Vehicle,
            KeyCode::D,
            Movement::rotate(Rotation::new(Vec3::z(), -1.0)).with_translate(Vec3::new(0.0, -0.1, 0.0)),
        );

        map.bind(ActorKind::Camera, KeyCode::Q, Movement::translate(Vec3::new(0.0, 0.0, 0.1)));
        map.bind(ActorKind::Camera, KeyCode::E, Movement::translate(Vec3::new(0.0, 0.0, -0.1)));
        map.bind(ActorKind::Camera, KeyCode::Z, Movement::rotate(Rotation::new(Vec3::y(), 5.0)));
        map.bind(ActorKind::Camera, KeyCode::X, Movement::rotate(Rotation::new(Vec3::x(), 5.0)));
        map.bind(ActorKind::Camera, KeyCode::C, Movement::rotate(Rotation::new(Vec3::z(), -5.0)));

        map
    }

    /// Bind `key` for `kind`, replacing any previous binding
    pub fn bind(&mut self, kind: ActorKind, key: KeyCode, movement: Movement) {
        self.bindings.insert((kind, key), movement);
    }

    /// Movement bound to `key` for `kind`
    pub fn lookup(&self, kind: ActorKind, key: KeyCode) -> Option<&Movement> {
        self.bindings.get(&(kind, key))
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
