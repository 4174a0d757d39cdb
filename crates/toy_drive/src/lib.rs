//! # Toy Drive
//!
//! A toy car circles a track, collecting fuel tanks and coins while fuel
//! drains and the day turns. Hitting an obstacle or running dry ends the
//! session.
//!
//! The game owns all of its state in one [`Simulation`]. Hosts feed it key
//! events and UI [`Command`]s, call [`Simulation::tick`] at a fixed rate and
//! [`Simulation::render`] once per frame.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::cast_precision_loss)]

pub mod assets;
pub mod config;
pub mod game_state;
pub mod simulation;
pub mod spawner;

pub use config::GameConfig;
pub use game_state::{GameSnapshot, GameState, Phase};
pub use simulation::{Command, Simulation, TickOutcome};
pub use spawner::Spawner;

use drive_engine::config::ConfigError;
use drive_engine::scene::SceneError;
use thiserror::Error;

/// Game setup errors
#[derive(Error, Debug)]
pub enum GameError {
    /// Scene could not be built
    #[error("Scene error: {0}")]
    Scene(#[from] SceneError),

    /// Configuration could not be loaded
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
