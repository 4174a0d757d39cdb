//! Headless Toy Drive driver
//!
//! Runs the demo track with a renderer that only logs what it would draw.
//! Usage: `toy_drive [config.ron|config.toml]`

use drive_engine::assets::Mesh;
use drive_engine::config::Config;
use drive_engine::foundation::logging;
use drive_engine::foundation::math::Mat4;
use drive_engine::foundation::time::{FixedTimestep, Timer};
use drive_engine::input::{ActorKind, KeyCode};
use drive_engine::render::{InstanceTransform, MeshRenderer};
use drive_engine::scene::Environment;
use std::time::Duration;
use toy_drive::assets::{demo_meshes, demo_scene};
use toy_drive::{Command, GameConfig, GameError, Phase, Simulation};

/// Renderer stand-in that traces draw submissions
#[derive(Default)]
struct LogRenderer {
    draw_calls: u64,
}

impl MeshRenderer for LogRenderer {
    fn draw_instanced(
        &mut self,
        mesh: &Mesh,
        _projection: &Mat4,
        _view: &Mat4,
        _environment: &Environment,
        instances: &[InstanceTransform],
    ) {
        self.draw_calls += 1;
        log::trace!("draw {} x{}", mesh.id, instances.len());
    }

    fn draw_sky(&mut self, mesh: &Mesh, _projection: &Mat4, _view: &Mat4, environment: &Environment) {
        self.draw_calls += 1;
        log::trace!("sky {} fog {:?}", mesh.id, environment.fog.color);
    }
}

fn main() {
    logging::init();

    if let Err(err) = run() {
        log::error!("{err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), GameError> {
    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading config from {path}");
            GameConfig::load_from_file(path)?
        }
        None => GameConfig::default(),
    };
    let total_ticks = config.simulation.headless_ticks;
    let mut timestep = FixedTimestep::new(
        config.simulation.ticks_per_second,
        config.simulation.max_ticks_per_frame,
    );

    let mut sim = Simulation::new(demo_scene(), demo_meshes(), config)?;
    sim.handle_command(Command::Start);

    let mut renderer = LogRenderer::default();
    let mut timer = Timer::new();
    let mut ticks_run = 0_u64;
    let mut sessions = 1_u32;
    let mut best_score = 0_u32;

    while ticks_run < total_ticks {
        for _ in 0..timestep.advance(timer.frame()) {
            let outcome = sim.tick();
            ticks_run += 1;

            if outcome.phase == Phase::Reset {
                best_score = best_score.max(sim.snapshot().score);
                sim.reload()?;
                sim.handle_command(Command::Start);
                sessions += 1;
                continue;
            }

            // Scripted weave across the lane
            match ticks_run % 90 {
                0 => {
                    sim.handle_key(ActorKind::Vehicle, KeyCode::A);
                }
                45 => {
                    sim.handle_key(ActorKind::Vehicle, KeyCode::D);
                }
                _ => {}
            }
        }

        sim.render(&mut renderer);
        std::thread::sleep(Duration::from_secs_f32(timestep.step()));
    }

    let snapshot = sim.snapshot();
    best_score = best_score.max(snapshot.score);
    log::info!(
        "Ran {ticks_run} ticks in {:.1}s over {sessions} session(s), {} draw calls over {} frames; best score {best_score}, fuel {:.1}, {}:00",
        timer.elapsed(),
        renderer.draw_calls,
        timer.frames(),
        snapshot.fuel,
        snapshot.time_of_day
    );
    Ok(())
}
