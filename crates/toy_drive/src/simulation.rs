//! Owned simulation state and the fixed-rate tick
//!
//! One [`Simulation`] holds everything a session touches: the scene, the
//! game state, the spawner and the tick counter. Nothing here is global; the
//! UI talks to it through [`Command`]s and reads [`GameSnapshot`]s back.
//!
//! A tick runs in a fixed order so the collision sweep always sees the
//! finished transforms of that tick:
//!
//! 1. auto-drive movements
//! 2. periodic pickup spawn
//! 3. collision sweep
//! 4. sweep outcome folded into the game state
//! 5. fuel drain and clock advance on their periods
//!
//! The tick counter only moves while playing, so periodic effects resume
//! exactly where they stopped after a pause.

use crate::config::GameConfig;
use crate::game_state::{GameSnapshot, GameState, Phase};
use crate::spawner::Spawner;
use crate::GameError;
use drive_engine::assets::{LoadedScene, MeshStore, SceneDescription, SceneLoader};
use drive_engine::config::Config;
use drive_engine::foundation::math::Point3;
use drive_engine::input::{ActorKind, KeyCode, MovementMap};
use drive_engine::physics::{CollisionSweep, SweepReport};
use drive_engine::render::{submit_frame, FrameOptions, FrameStats, MeshRenderer};
use drive_engine::scene::{Placed, SceneNode};

/// One-way UI intent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Leave the idle screen
    Start,
    /// Pause or resume
    TogglePause,
    /// Fog slider in `[-1, 1]`
    SetFog(f32),
    /// Bounding-box overlay
    ShowBoundingBoxes(bool),
}

/// Result of one tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickOutcome {
    /// Collision sweep result, empty when the tick did not run
    pub report: SweepReport,
    /// Phase after the tick
    pub phase: Phase,
}

/// Complete state of one game session
#[derive(Debug)]
pub struct Simulation {
    description: SceneDescription,
    store: MeshStore,
    config: GameConfig,
    scene: LoadedScene,
    game: GameState,
    spawner: Spawner,
    key_map: MovementMap,
    tick: u64,
    show_bounding_boxes: bool,
}

impl Simulation {
    /// Validate `config` and build the scene
    pub fn new(description: SceneDescription, store: MeshStore, config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let (scene, spawner) = Self::build_scene(&description, &store, &config)?;
        let game = GameState::new(&config);

        log::info!("Simulation ready with {} nodes", scene.registry.len());
        Ok(Self {
            description,
            store,
            config,
            scene,
            game,
            spawner,
            key_map: MovementMap::defaults(),
            tick: 0,
            show_bounding_boxes: false,
        })
    }

    /// Builder pattern: replace the default key bindings
    #[must_use]
    pub fn with_key_map(mut self, key_map: MovementMap) -> Self {
        self.key_map = key_map;
        self
    }

    fn build_scene(
        description: &SceneDescription,
        store: &MeshStore,
        config: &GameConfig,
    ) -> Result<(LoadedScene, Spawner), GameError> {
        let mut scene = SceneLoader::new(store)
            .with_aspect_ratio(config.graphics.aspect_ratio())
            .with_steering_limits(config.vehicle.limits)
            .build(description)?;
        let spawner = Spawner::from_registry(&mut scene.registry, config.spawn.clone())?;
        Ok((scene, spawner))
    }

    /// Rebuild the scene and start a fresh idle session
    pub fn reload(&mut self) -> Result<(), GameError> {
        let (scene, spawner) = Self::build_scene(&self.description, &self.store, &self.config)?;
        self.scene = scene;
        self.spawner = spawner;
        self.game = GameState::new(&self.config);
        self.tick = 0;
        log::info!("Scene reloaded");
        Ok(())
    }

    /// Loaded scene
    pub fn scene(&self) -> &LoadedScene {
        &self.scene
    }

    /// Game state
    pub fn game(&self) -> &GameState {
        &self.game
    }

    /// Active configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Ticks run while playing this session
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Current phase
    pub fn phase(&self) -> Phase {
        self.game.phase()
    }

    /// UI view of the game state
    pub fn snapshot(&self) -> GameSnapshot {
        self.game.snapshot()
    }

    /// Apply the movement bound to `key`
    ///
    /// Vehicle keys only act while playing; camera keys always do. Returns
    /// whether a movement was applied.
    pub fn handle_key(&mut self, kind: ActorKind, key: KeyCode) -> bool {
        let Some(movement) = self.key_map.lookup(kind, key).copied() else {
            return false;
        };

        let target = match kind {
            ActorKind::Vehicle if !self.game.is_playing() => {
                log::trace!("Vehicle key {key:?} ignored in {:?}", self.game.phase());
                return false;
            }
            ActorKind::Vehicle => self.scene.actor,
            ActorKind::Camera => self.scene.camera,
        };

        self.scene
            .registry
            .node_mut(target)
            .is_some_and(|node| node.apply_movement(Some(&movement)))
    }

    /// Apply a UI intent, returning whether it changed anything
    pub fn handle_command(&mut self, command: Command) -> bool {
        log::debug!("Command {command:?}");
        match command {
            Command::Start => self.game.start(),
            Command::TogglePause => self.game.toggle_pause(),
            Command::SetFog(intensity) => {
                self.game.set_fog_intensity(intensity);
                true
            }
            Command::ShowBoundingBoxes(show) => {
                let changed = self.show_bounding_boxes != show;
                self.show_bounding_boxes = show;
                changed
            }
        }
    }

    /// Advance one fixed step
    pub fn tick(&mut self) -> TickOutcome {
        if !self.game.is_playing() {
            return TickOutcome {
                report: SweepReport::default(),
                phase: self.game.phase(),
            };
        }

        self.tick += 1;
        let periods = &self.config.simulation;
        let (drive_due, spawn_due, drain_due, clock_due) = (
            self.tick % periods.auto_drive_period == 0,
            self.tick % periods.spawn_period == 0,
            self.tick % periods.fuel_drain_period == 0,
            self.tick % periods.clock_period == 0,
        );

        if drive_due {
            self.auto_drive();
        }
        if spawn_due {
            self.spawn_pickup();
        }

        let report = CollisionSweep::run(&mut self.scene.registry, self.scene.actor);
        if !report.is_empty() {
            log::debug!("Tick {}: {:?}", self.tick, report);
        }
        self.game.apply_sweep(&report, self.config.fuel.pickup_increment);

        if drain_due && self.game.is_playing() {
            self.game.drain_fuel(self.config.fuel.drain);
        }
        if clock_due && self.game.is_playing() {
            self.game.advance_clock(self.config.environment.hours_per_advance);
        }

        TickOutcome {
            report,
            phase: self.game.phase(),
        }
    }

    /// Submit the current frame
    pub fn render<R: MeshRenderer + ?Sized>(&self, renderer: &mut R) -> FrameStats {
        let Some(camera) = self.scene.camera() else {
            log::warn!("No camera in scene, frame skipped");
            return FrameStats::default();
        };
        let options = FrameOptions {
            show_bounding_boxes: self.show_bounding_boxes,
        };
        submit_frame(&self.scene.registry, camera, self.game.environment(), options, renderer)
    }

    fn auto_drive(&mut self) {
        let Some(vehicle) = self
            .scene
            .registry
            .node_mut(self.scene.actor)
            .and_then(SceneNode::as_vehicle_mut)
        else {
            log::warn!("Auto-drive skipped, no vehicle");
            return;
        };

        for movement in vehicle.auto_drive(&self.config.vehicle.auto_drive) {
            vehicle.apply_movement(Some(&movement));
        }
    }

    fn spawn_pickup(&mut self) {
        let Some((position, facing)) = self.scene.actor().map(|vehicle| {
            let position = vehicle.world_matrix().transform_point(&Point3::origin()).coords;
            (position, vehicle.facing())
        }) else {
            return;
        };

        let target = self
            .spawner
            .placement(position, facing, self.config.vehicle.auto_drive.pivot_axis);
        if let Err(err) = self.spawner.spawn(&mut self.scene.registry, target) {
            log::warn!("Spawn failed: {err}");
        }
    }
}
