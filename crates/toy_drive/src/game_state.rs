//! Game state machine
//!
//! ```text
//! Idle ──start──▶ Playing ◀──toggle_pause──▶ Paused
//!                    │                          │
//!                    └──────── Reset ◀──────────┘
//! ```
//!
//! `Reset` is terminal for the session; the host rebuilds the scene and a
//! new state. Fuel exhaustion and fatal collisions both lead there.

use crate::config::GameConfig;
use drive_engine::foundation::math::Vec3;
use drive_engine::physics::SweepReport;
use drive_engine::scene::{DaylightTable, Environment};

/// Fuel upper bound
pub const MAX_FUEL: f32 = 100.0;

/// Fuel lower bound; reaching it ends the session
pub const MIN_FUEL: f32 = 0.0;

/// Hours in one day
pub const HOURS_PER_DAY: u32 = 24;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for start
    Idle,
    /// Ticking
    Playing,
    /// Ticks suspended
    Paused,
    /// Session over, reload required
    Reset,
}

/// Read-only view for the UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameSnapshot {
    /// Fuel level
    pub fuel: f32,
    /// Collected currency
    pub score: u32,
    /// Hour of day
    pub time_of_day: u32,
    /// Whether the game is paused
    pub paused: bool,
    /// Session phase
    pub phase: Phase,
}

/// Fuel, score, clock and phase of one session
#[derive(Debug, Clone)]
pub struct GameState {
    phase: Phase,
    fuel: f32,
    score: u32,
    time_of_day: u32,
    fog_intensity: f32,
    sun_direction: Vec3,
    daylight: DaylightTable,
    environment: Environment,
}

impl GameState {
    /// Fresh session state
    pub fn new(config: &GameConfig) -> Self {
        let mut state = Self {
            phase: Phase::Idle,
            fuel: config.fuel.starting.clamp(MIN_FUEL, MAX_FUEL),
            score: 0,
            time_of_day: config.environment.start_hour % HOURS_PER_DAY,
            fog_intensity: 0.0,
            sun_direction: config.environment.sun_direction,
            daylight: config.environment.daylight.clone(),
            environment: Environment::default(),
        };
        state.refresh_environment();
        state
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether ticks should run
    pub fn is_playing(&self) -> bool {
        self.phase == Phase::Playing
    }

    /// Fuel level
    pub fn fuel(&self) -> f32 {
        self.fuel
    }

    /// Collected currency
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Hour of day
    pub fn time_of_day(&self) -> u32 {
        self.time_of_day
    }

    /// Fog and light for rendering
    pub fn environment(&self) -> &Environment {
        &self.environment
    }

    /// Idle → Playing
    pub fn start(&mut self) -> bool {
        if self.phase != Phase::Idle {
            log::debug!("Ignoring start in {:?}", self.phase);
            return false;
        }
        self.phase = Phase::Playing;
        log::info!("Session started");
        true
    }

    /// Playing ⇄ Paused
    pub fn toggle_pause(&mut self) -> bool {
        self.phase = match self.phase {
            Phase::Playing => Phase::Paused,
            Phase::Paused => Phase::Playing,
            phase => {
                log::debug!("Ignoring pause toggle in {phase:?}");
                return false;
            }
        };
        log::debug!("Now {:?}", self.phase);
        true
    }

    /// Any started phase → Reset
    pub fn reset(&mut self, reason: &str) -> bool {
        match self.phase {
            Phase::Idle | Phase::Reset => false,
            Phase::Playing | Phase::Paused => {
                log::info!("Session over: {reason}");
                self.phase = Phase::Reset;
                true
            }
        }
    }

    /// Add fuel, capped at [`MAX_FUEL`]
    pub fn add_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel + amount).min(MAX_FUEL);
    }

    /// Remove fuel; running dry ends the session
    pub fn drain_fuel(&mut self, amount: f32) {
        self.fuel = (self.fuel - amount).max(MIN_FUEL);
        if self.fuel <= MIN_FUEL {
            self.reset("out of fuel");
        }
    }

    /// Add to the score
    pub fn add_score(&mut self, amount: u32) {
        self.score = self.score.saturating_add(amount);
    }

    /// Move the clock forward, wrapping past midnight
    pub fn advance_clock(&mut self, hours: u32) {
        self.time_of_day = (self.time_of_day + hours % HOURS_PER_DAY) % HOURS_PER_DAY;
        self.refresh_environment();
        log::debug!("Clock at {}:00", self.time_of_day);
    }

    /// Set the UI fog intensity in `[-1, 1]`
    pub fn set_fog_intensity(&mut self, intensity: f32) {
        self.fog_intensity = intensity.clamp(-1.0, 1.0);
        self.refresh_environment();
    }

    /// Fold a collision sweep into the state
    pub fn apply_sweep(&mut self, report: &SweepReport, fuel_increment: f32) {
        for _ in 0..report.fuel_pickups {
            self.add_fuel(fuel_increment);
        }
        self.add_score(report.currency_pickups);
        if let Some(obstacle) = &report.fatal {
            self.reset(&format!("hit {obstacle}"));
        }
    }

    /// UI view
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            fuel: self.fuel,
            score: self.score,
            time_of_day: self.time_of_day,
            paused: self.phase == Phase::Paused,
            phase: self.phase,
        }
    }

    fn refresh_environment(&mut self) {
        match self.daylight.lookup(self.time_of_day) {
            Some(entry) => {
                self.environment = Environment::from_daylight(entry, self.sun_direction, self.fog_intensity);
            }
            None => log::warn!("Empty daylight table, keeping previous environment"),
        }
    }
}
