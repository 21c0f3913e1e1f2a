//! Gladiator Arena - A first-person arena combat game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (grid, camera, combat AI, particles)
//! - `renderer`: Software raycasting renderer into a flat RGB buffer
//! - `audio`: Event sink and sound-cue catalogue
//! - `settings`: Player preferences and viewport presets
//! - `game`: Fixed timestep loop tying simulation and rendering together

pub mod audio;
pub mod game;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Resolution, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one AI tick per step)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena grid dimensions (cells)
    pub const MAP_WIDTH: usize = 128;
    pub const MAP_HEIGHT: usize = 128;
    /// Ellipse half-axes of the arena floor
    pub const ARENA_HALF_X: f32 = 40.0;
    pub const ARENA_HALF_Y: f32 = 25.0;
    /// Chance that an interior floor cell becomes a spike trap
    pub const TRAP_CHANCE: f64 = 0.02;
    /// Traps only appear where the ellipse ratio is below this
    pub const TRAP_INTERIOR_RATIO: f32 = 0.8;

    /// Camera defaults
    pub const CAMERA_START: (f32, f32) = (64.5, 64.5);
    pub const CAMERA_PLANE: f32 = 0.66;

    /// Player defaults
    pub const PLAYER_MAX_HEALTH: f32 = 200.0;
    pub const PLAYER_MAX_STAMINA: f32 = 100.0;
    pub const STAMINA_REGEN: f32 = 0.2;
    pub const MOVE_SPEED: f32 = 0.08;
    pub const STRAFE_FACTOR: f32 = 0.8;
    /// Clearance kept between the camera and a wall along the motion axis
    pub const COLLISION_MARGIN: f32 = 0.3;
    pub const BLOCK_STAMINA_DRAIN: f32 = 0.3;
    pub const ATTACK_STAMINA_COST: f32 = 15.0;
    pub const ATTACK_COOLDOWN_TICKS: u32 = 20;
    pub const HEAD_BOB_STEP: f32 = 0.15;
    pub const HEAD_BOB_PIXELS: f32 = 10.0;

    /// Spike traps
    pub const TRAP_DAMAGE: f32 = 15.0;
    pub const TRAP_COOLDOWN_TICKS: u32 = 40;
    pub const TRAP_SHAKE: f32 = 15.0;

    /// Damage feedback
    pub const DAMAGE_FLASH_TICKS: u32 = 10;
    pub const HIT_SHAKE: f32 = 10.0;
    pub const SHAKE_DECAY: f32 = 0.9;

    /// Enemy tuning
    pub const ENEMY_MAX_HP: f32 = 100.0;
    pub const ENEMY_SPEED: f32 = 0.04;
    pub const AGGRO_RADIUS: f32 = 20.0;
    pub const ENGAGE_RANGE: f32 = 2.0;
    pub const ATTACK_REACH: f32 = 2.5;
    pub const WINDUP_TICKS: u32 = 30;
    pub const ATTACK_TICKS: u32 = 10;
    /// Attack timer value at which the blow lands
    pub const ATTACK_TRIGGER_TICK: u32 = 5;
    pub const COOLDOWN_TICKS: u32 = 40;
    pub const BLOCKED_STUN_TICKS: u32 = 40;
    pub const DEATH_TICKS: u32 = 100;
    pub const ENEMY_DAMAGE: f32 = 10.0;
    pub const BLOCK_STAMINA_COST: f32 = 10.0;

    /// Player strikes
    pub const MELEE_RANGE: f32 = 3.0;
    /// Dot product threshold for the forward cone (~60 degrees)
    pub const CONE_DOT: f32 = 0.5;
    pub const SLASH_DAMAGE: f32 = 35.0;
    pub const STAB_DAMAGE: f32 = 35.0;
    pub const OVERHEAD_DAMAGE: f32 = 50.0;
    pub const KNOCKBACK: f32 = 1.2;
    pub const HIT_STUN_TICKS: u32 = 25;
    pub const BLOOD_PER_HIT: usize = 10;

    /// Particles
    pub const PARTICLE_LIFETIME: u32 = 20;
    pub const PARTICLE_SPEED: f32 = 0.1;

    /// Waves
    pub const FIRST_WAVE: u32 = 1;
    pub const FIRST_WAVE_SIZE: usize = 3;
    pub const FINAL_WAVE: u32 = 5;
    pub const SPAWN_RADIUS_MIN: f32 = 10.0;
    pub const SPAWN_RADIUS_MAX: f32 = 25.0;
    pub const SPAWN_MINOR_SCALE: f32 = 0.6;
    pub const SPAWN_ATTEMPTS: usize = 16;
}

/// Rotate a vector by `angle` radians
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

/// Unit vector pointing along `angle`
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}
