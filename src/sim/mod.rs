//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only (one call to `tick` is one simulation step)
//! - Seeded RNG only
//! - Stable iteration order (enemy roster order)
//! - No rendering or platform dependencies; events go out through a sink

pub mod camera;
pub mod combat;
pub mod grid;
pub mod particles;
pub mod state;
pub mod tick;

pub use camera::Camera;
pub use combat::{StrikeOutcome, player_attack, strike_damage, update_enemy};
pub use grid::{Cell, GridMap};
pub use particles::{Particle, ParticleSystem};
pub use state::{
    AttackKind, Body, Enemy, EnemyState, GameEvent, GamePhase, GameState, Player,
};
pub use tick::{TickInput, tick};
