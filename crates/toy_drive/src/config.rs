//! Game configuration
//!
//! Every section has defaults, so a config file only needs the values it
//! changes. Files are RON or TOML, chosen by extension.

use drive_engine::config::{Config, ConfigError};
use drive_engine::foundation::math::Vec3;
use drive_engine::scene::{AutoDrive, DaylightTable, SteeringLimits};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tick scheduling
    pub simulation: SimulationConfig,

    /// Fuel economy
    pub fuel: FuelConfig,

    /// Pickup spawning
    pub spawn: SpawnConfig,

    /// Vehicle handling
    pub vehicle: VehicleConfig,

    /// Day/night cycle
    pub environment: EnvironmentConfig,

    /// Graphics settings
    pub graphics: GraphicsConfig,
}

/// Tick scheduling
///
/// Periods are in ticks; an effect with period `n` runs on every `n`th
/// tick spent playing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed simulation rate
    pub ticks_per_second: f32,

    /// Cap on ticks run for one rendered frame
    pub max_ticks_per_frame: u32,

    /// Ticks between auto-drive steps
    pub auto_drive_period: u64,

    /// Ticks between spawns
    pub spawn_period: u64,

    /// Ticks between fuel drains
    pub fuel_drain_period: u64,

    /// Ticks between clock advances
    pub clock_period: u64,

    /// Ticks the headless driver runs before exiting
    pub headless_ticks: u64,
}

/// Fuel economy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuelConfig {
    /// Fuel at session start
    pub starting: f32,

    /// Fuel gained per fuel pickup
    pub pickup_increment: f32,

    /// Fuel lost per drain period
    pub drain: f32,
}

/// Pickup spawning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnConfig {
    /// Probability that a spawn is fuel rather than currency
    pub fuel_weight: f64,

    /// Registry name of the fuel template
    pub fuel_template: String,

    /// Registry name of the currency template
    pub currency_template: String,

    /// Base name of fuel instances
    pub fuel_base_name: String,

    /// Base name of currency instances
    pub currency_base_name: String,

    /// How far ahead of the vehicle along the circuit pickups appear, in degrees
    pub lead_degrees: f32,

    /// Maximum sideways offset from the racing line
    pub lateral_spread: f32,

    /// Spawning pauses while this many pickups are live
    pub max_live_pickups: Option<usize>,

    /// Fixed RNG seed for reproducible sessions
    pub seed: Option<u64>,
}

/// Vehicle handling
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VehicleConfig {
    /// Pitch and roll limits
    pub limits: SteeringLimits,

    /// Auto-drive and recentering
    pub auto_drive: AutoDrive,
}

/// Day/night cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentConfig {
    /// Hour the session starts at
    pub start_hour: u32,

    /// Hours added per clock period
    pub hours_per_advance: u32,

    /// Direction sunlight travels in
    pub sun_direction: Vec3,

    /// Fog and light per hour
    pub daylight: DaylightTable,
}

/// Graphics settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsConfig {
    /// Window width
    pub window_width: u32,

    /// Window height
    pub window_height: u32,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 60.0,
            max_ticks_per_frame: 5,
            auto_drive_period: 1,
            spawn_period: 90,
            fuel_drain_period: 60,
            clock_period: 300,
            headless_ticks: 1800,
        }
    }
}

impl Default for FuelConfig {
    fn default() -> Self {
        Self {
            starting: 100.0,
            pickup_increment: 5.0,
            drain: 2.0,
        }
    }
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            fuel_weight: 0.3,
            fuel_template: "tank_template".to_string(),
            currency_template: "coin_template".to_string(),
            fuel_base_name: "tank".to_string(),
            currency_base_name: "coin".to_string(),
            lead_degrees: 30.0,
            lateral_spread: 1.5,
            max_live_pickups: Some(24),
            seed: None,
        }
    }
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            start_hour: 12,
            hours_per_advance: 1,
            sun_direction: Vec3::new(-1.0, 3.0, 5.0),
            daylight: DaylightTable::default(),
        }
    }
}

impl Default for GraphicsConfig {
    fn default() -> Self {
        Self {
            window_width: 1024,
            window_height: 768,
        }
    }
}

impl GraphicsConfig {
    /// Viewport width / height
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height.max(1) as f32
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| Err(ConfigError::Invalid(reason.to_string()));
        let sim = &self.simulation;

        if !(sim.ticks_per_second > 0.0) {
            return invalid("ticks_per_second must be positive");
        }
        if [sim.auto_drive_period, sim.spawn_period, sim.fuel_drain_period, sim.clock_period].contains(&0) {
            return invalid("tick periods must be at least 1");
        }
        if !(self.fuel.starting > 0.0 && self.fuel.starting <= 100.0) {
            return invalid("starting fuel must be in (0, 100]");
        }
        if self.fuel.pickup_increment < 0.0 || self.fuel.drain < 0.0 {
            return invalid("fuel amounts must not be negative");
        }
        if !(0.0..=1.0).contains(&self.spawn.fuel_weight) {
            return invalid("fuel_weight must be in [0, 1]");
        }
        if !(self.vehicle.auto_drive.recenter_gain > 0.0 && self.vehicle.auto_drive.recenter_gain <= 1.0) {
            return invalid("recenter_gain must be in (0, 1]");
        }
        if self.environment.start_hour >= 24 {
            return invalid("start_hour must be below 24");
        }
        if self.environment.daylight.is_empty() {
            return invalid("daylight table needs at least one entry");
        }
        Ok(())
    }
}
