//! Fixed timestep simulation tick
//!
//! One call advances the whole game by a single 60 Hz step: player input,
//! movement and traps, combat, enemy AI, particles, then wave progression.

use super::combat::{player_attack, update_enemy};
use super::grid::Cell;
use super::state::{AttackKind, GameEvent, GamePhase, GameState};
use crate::audio::EventSink;
use crate::consts::*;

/// Input snapshot for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub forward: bool,
    pub back: bool,
    pub strafe_left: bool,
    pub strafe_right: bool,
    /// Attack button held
    pub attack: bool,
    /// Block button held
    pub block: bool,
    /// Turn this tick, in radians (positive turns right)
    pub look_delta: f32,
    /// Pause toggle
    pub pause: bool,
}

impl TickInput {
    /// Signed forward axis
    pub fn forward_axis(&self) -> f32 {
        self.forward as i8 as f32 - self.back as i8 as f32
    }

    /// Signed strafe axis, positive to the right
    pub fn strafe_axis(&self) -> f32 {
        self.strafe_right as i8 as f32 - self.strafe_left as i8 as f32
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, sink: &mut impl EventSink) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.phase = GamePhase::Paused;
                log::info!("Paused");
                return;
            }
            GamePhase::Paused => {
                state.phase = GamePhase::Playing;
                log::info!("Resumed");
            }
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    state.time_ticks += 1;

    update_player(state, input, sink);

    // Enemies: run AI, let corpses count down
    let player_pos = state.camera.pos;
    let mut player_hit = false;
    for enemy in &mut state.enemies {
        player_hit |= update_enemy(enemy, &mut state.player, player_pos, &state.grid, sink);
    }
    if player_hit {
        state.flash_damage(HIT_SHAKE);
    }
    // Compact once all enemies have been updated
    state.enemies.retain(|e| !e.is_expired());

    state.particles.update();

    if !state.player.is_alive() {
        state.phase = GamePhase::GameOver;
        sink.emit(GameEvent::Death);
        log::info!(
            "Player fell on wave {} after {} ticks",
            state.wave,
            state.time_ticks
        );
        return;
    }

    advance_wave(state, sink);
}

/// Stamina, blocking, turning, movement, traps and swings
fn update_player(state: &mut GameState, input: &TickInput, sink: &mut impl EventSink) {
    let player = &mut state.player;

    if player.stamina < PLAYER_MAX_STAMINA {
        player.stamina = (player.stamina + STAMINA_REGEN).min(PLAYER_MAX_STAMINA);
    }

    let mut speed = MOVE_SPEED;
    if input.block && player.stamina > 0.0 {
        player.blocking = true;
        speed *= 0.5;
        player.drain_stamina(BLOCK_STAMINA_DRAIN);
    } else {
        player.blocking = false;
    }

    state.camera.rotate(input.look_delta);

    let delta = state
        .camera
        .movement_delta(input.forward_axis(), input.strafe_axis(), speed);
    if delta != glam::Vec2::ZERO {
        state.player.head_bob += HEAD_BOB_STEP;
        state.camera.slide(delta, &state.grid);
    } else {
        state.player.head_bob = 0.0;
    }

    // Spike traps fire once per cooldown window
    let pos = state.camera.pos;
    if state.grid.cell_at(pos.x, pos.y) == Cell::Trap && state.player.trap_ticks == 0 {
        state.player.take_damage(TRAP_DAMAGE);
        state.player.trap_ticks = TRAP_COOLDOWN_TICKS;
        state.flash_damage(TRAP_SHAKE);
        sink.emit(GameEvent::Trap);
        log::debug!("Trap at ({:.1}, {:.1})", pos.x, pos.y);
    }
    state.player.trap_ticks = state.player.trap_ticks.saturating_sub(1);

    state.damage_shake *= SHAKE_DECAY;
    if state.damage_shake < 0.01 {
        state.damage_shake = 0.0;
    }

    let player = &mut state.player;
    if input.attack
        && player.attack_ticks == 0
        && player.stamina > ATTACK_STAMINA_COST
        && !player.blocking
    {
        player.attack_ticks = ATTACK_COOLDOWN_TICKS;
        player.drain_stamina(ATTACK_STAMINA_COST);
        player.attack = AttackKind::roll(&mut state.rng);
        player_attack(state, sink);
    }
    state.player.attack_ticks = state.player.attack_ticks.saturating_sub(1);

    state.damage_flash = state.damage_flash.saturating_sub(1);
}

/// Spawn the next wave once the roster is empty, or declare victory
fn advance_wave(state: &mut GameState, sink: &mut impl EventSink) {
    if state.living_enemies() > 0 || !state.enemies.is_empty() {
        return;
    }

    state.wave += 1;
    if state.wave > FINAL_WAVE {
        state.phase = GamePhase::Victory;
        log::info!("Victory after {} ticks", state.time_ticks);
        return;
    }

    let wanted = state.wave as usize + 2;
    let placed = state.spawn_wave(wanted);
    sink.emit(GameEvent::Horn);
    log::info!("Wave {} begins with {} enemies", state.wave, placed);
}
