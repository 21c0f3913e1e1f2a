//! Headless runner
//!
//! Plays a seeded run with a simple autopilot at a fixed 60 Hz frame rate,
//! logging as it goes. Can dump the last frame as a PPM image and print a
//! JSON summary of the run.

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use glam::Vec2;

use gladiator_arena::consts::{ATTACK_REACH, ENGAGE_RANGE, MELEE_RANGE, SIM_DT};
use gladiator_arena::sim::{EnemyState, GameState, TickInput};
use gladiator_arena::{Game, Resolution, Settings};

/// Largest simulated mouse move per frame, in pixels
const MAX_MOUSE_PX: f32 = 40.0;

/// Command line arguments for the headless arena runner.
#[derive(Parser, Debug)]
#[command(name = "gladiator-arena")]
#[command(about = "First-person arena combat, run headless with an autopilot")]
#[command(version)]
struct Args {
    /// Random seed for the arena, waves and attack rolls
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Number of frames to run (stops early when the run ends)
    #[arg(short, long, default_value_t = 3600)]
    frames: u64,

    /// Viewport preset, e.g. 1280x720 (overrides the settings file)
    #[arg(short, long)]
    resolution: Option<String>,

    /// Settings JSON to load
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the final frame here as a binary PPM
    #[arg(long)]
    dump: Option<PathBuf>,

    /// Print the run summary as JSON on stdout
    #[arg(long)]
    json: bool,
}

/// Steer toward the nearest living enemy, block its swings, hit back
fn autopilot(state: &GameState, settings: &Settings) -> TickInput {
    let mut input = TickInput::default();
    let eye = state.camera.pos;

    let target = state
        .enemies
        .iter()
        .filter(|e| e.is_alive())
        .min_by(|a, b| {
            a.body
                .pos
                .distance_squared(eye)
                .total_cmp(&b.body.pos.distance_squared(eye))
        });
    let Some(target) = target else {
        return input;
    };

    let to_target = target.body.pos - eye;
    let dist = to_target.length();
    let turn = state.camera.dir.angle_to(to_target.normalize_or(Vec2::X));
    let mouse_px = (turn / settings.mouse_sensitivity).clamp(-MAX_MOUSE_PX, MAX_MOUSE_PX);
    input.look_delta = settings.look_angle(mouse_px);

    let threatened = matches!(target.state, EnemyState::Windup { .. } | EnemyState::Attack { .. });
    if threatened && dist < ATTACK_REACH && state.player.stamina > 10.0 {
        input.block = true;
        return input;
    }

    input.forward = dist > ENGAGE_RANGE * 0.9;
    input.attack = dist < MELEE_RANGE * 0.9 && turn.abs() < 0.5;
    input
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut settings = match &args.settings {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    if let Some(name) = &args.resolution {
        settings.resolution = Resolution::from_str(name)
            .ok_or_else(|| format!("unknown resolution {name:?}"))?;
    }
    let config = settings.render_config()?;
    log::info!(
        "Gladiator Arena starting: seed {}, {}",
        args.seed,
        settings.resolution.as_str()
    );

    let mut game = Game::new(args.seed, config, settings.clone());
    for _ in 0..args.frames {
        game.input = autopilot(&game.state, &settings);
        game.frame(SIM_DT);
        if game.is_over() {
            break;
        }
    }

    if let Some(path) = &args.dump {
        fs::write(path, game.last_frame().to_ppm())?;
        log::info!("Wrote final frame to {}", path.display());
    }

    let summary = game.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        log::info!(
            "Run ended {:?} in wave {} after {} ticks, health {:.0}",
            summary.phase,
            summary.wave,
            summary.ticks,
            summary.health
        );
    }
    Ok(())
}
