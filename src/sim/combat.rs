//! Melee combat and the enemy AI state machine
//!
//! Player swings are resolved instantly against every living enemy in the
//! forward cone. Enemies run a small timed state machine, once per tick.

use glam::Vec2;

use super::grid::GridMap;
use super::state::{AttackKind, Enemy, EnemyState, GameEvent, GameState, Player};
use crate::audio::EventSink;
use crate::consts::*;

/// Below this distance the direction between two points is meaningless
const MIN_DIRECTION_DIST: f32 = 1e-4;

/// What happened to one enemy during a player swing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeOutcome {
    pub enemy_id: u32,
    pub damage: f32,
    pub critical: bool,
    pub killed: bool,
}

/// Damage a single swing deals to one enemy, or `None` if it misses.
///
/// `to_enemy` is the player-to-enemy vector. The enemy must be within
/// `MELEE_RANGE` and inside the forward cone of `facing`. Damage doubles
/// when the enemy faces away along the hit direction.
pub fn strike_damage(
    kind: AttackKind,
    to_enemy: Vec2,
    facing: Vec2,
    enemy_facing: Vec2,
) -> Option<(f32, bool)> {
    let dist = to_enemy.length();
    if dist < MIN_DIRECTION_DIST || dist >= MELEE_RANGE {
        return None;
    }
    let dir = to_enemy / dist;
    if dir.dot(facing) <= CONE_DOT {
        return None;
    }

    let critical = dir.dot(enemy_facing) > CONE_DOT;
    let mut damage = kind.base_damage();
    if critical {
        damage *= 2.0;
    }
    Some((damage, critical))
}

/// Resolve the player's current swing against the roster.
///
/// Emits `Hit`/`Crit` and `Stun` per enemy struck, or a single `Woosh`
/// when nothing was in reach. A killing blow emits no `Stun`: the enemy
/// goes straight to `Death` without passing through `Stunned`.
pub fn player_attack(state: &mut GameState, sink: &mut impl EventSink) -> Vec<StrikeOutcome> {
    let cam = state.camera;
    let kind = state.player.attack;
    let mut outcomes = Vec::new();

    for enemy in state.enemies.iter_mut().filter(|e| e.is_alive()) {
        let to_enemy = enemy.body.pos - cam.pos;
        let Some((damage, critical)) =
            strike_damage(kind, to_enemy, cam.dir, enemy.body.facing_vec())
        else {
            continue;
        };

        sink.emit(if critical { GameEvent::Crit } else { GameEvent::Hit });
        let killed = enemy.take_damage(damage);
        log::debug!(
            "Enemy {} struck by {:?} for {} (crit: {}, killed: {})",
            enemy.id,
            kind,
            damage,
            critical,
            killed
        );

        let knock_dir = to_enemy.normalize_or_zero();
        if !killed {
            enemy.state = EnemyState::Stunned {
                ticks: HIT_STUN_TICKS,
            };
            sink.emit(GameEvent::Stun);
        }
        knock_back(enemy, knock_dir * KNOCKBACK, &state.grid);

        for _ in 0..BLOOD_PER_HIT {
            state.particles.spawn_blood(enemy.body.pos, &mut state.rng);
        }

        outcomes.push(StrikeOutcome {
            enemy_id: enemy.id,
            damage,
            critical,
            killed,
        });
    }

    if outcomes.is_empty() {
        sink.emit(GameEvent::Woosh);
    }
    outcomes
}

/// Shove an enemy, unless that would put it inside a wall
fn knock_back(enemy: &mut Enemy, offset: Vec2, grid: &GridMap) {
    let target = enemy.body.pos + offset;
    if !grid.is_blocked(target.x, target.y) {
        enemy.body.pos = target;
    }
}

/// Count a state timer down, clamped at zero. Returns true once it hits zero.
#[inline]
fn count_down(ticks: &mut u32) -> bool {
    *ticks = ticks.saturating_sub(1);
    *ticks == 0
}

/// Advance one enemy's AI by one tick.
///
/// Returns true if the enemy's blow landed on the player this tick.
pub fn update_enemy(
    enemy: &mut Enemy,
    player: &mut Player,
    player_pos: Vec2,
    grid: &GridMap,
    sink: &mut impl EventSink,
) -> bool {
    let to_player = player_pos - enemy.body.pos;
    let dist = to_player.length();
    let before = enemy.state;
    let mut landed = false;

    // Enemies track the player until they commit to a swing
    let tracking = matches!(
        enemy.state,
        EnemyState::Idle | EnemyState::Chase | EnemyState::Windup { .. }
    );
    if tracking && dist > MIN_DIRECTION_DIST {
        enemy.body.facing = to_player.y.atan2(to_player.x);
    }

    enemy.state = match enemy.state {
        EnemyState::Idle => {
            if dist < AGGRO_RADIUS {
                EnemyState::Chase
            } else {
                EnemyState::Idle
            }
        }
        EnemyState::Chase => {
            if dist <= ENGAGE_RANGE {
                EnemyState::Windup {
                    ticks: WINDUP_TICKS,
                }
            } else {
                let step = to_player / dist * enemy.speed;
                let target = enemy.body.pos + step;
                if !grid.is_blocked(target.x, target.y) {
                    enemy.body.pos = target;
                }
                EnemyState::Chase
            }
        }
        EnemyState::Windup { mut ticks } => {
            if count_down(&mut ticks) {
                sink.emit(GameEvent::Grunt);
                EnemyState::Attack {
                    ticks: ATTACK_TICKS,
                }
            } else {
                EnemyState::Windup { ticks }
            }
        }
        EnemyState::Attack { mut ticks } => {
            let mut next = None;
            if ticks == ATTACK_TRIGGER_TICK && dist < ATTACK_REACH {
                if player.blocking {
                    sink.emit(GameEvent::Clang);
                    player.drain_stamina(BLOCK_STAMINA_COST);
                    next = Some(EnemyState::Stunned {
                        ticks: BLOCKED_STUN_TICKS,
                    });
                } else {
                    player.take_damage(ENEMY_DAMAGE);
                    sink.emit(GameEvent::Hurt);
                    landed = true;
                }
            }
            match next {
                Some(stunned) => stunned,
                None if count_down(&mut ticks) => EnemyState::Cooldown {
                    ticks: COOLDOWN_TICKS,
                },
                None => EnemyState::Attack { ticks },
            }
        }
        EnemyState::Cooldown { mut ticks } => {
            if count_down(&mut ticks) {
                EnemyState::Chase
            } else {
                EnemyState::Cooldown { ticks }
            }
        }
        EnemyState::Stunned { mut ticks } => {
            if count_down(&mut ticks) {
                EnemyState::Chase
            } else {
                EnemyState::Stunned { ticks }
            }
        }
        EnemyState::Death { mut ticks } => {
            count_down(&mut ticks);
            EnemyState::Death { ticks }
        }
    };

    if std::mem::discriminant(&before) != std::mem::discriminant(&enemy.state) {
        log::debug!("Enemy {}: {:?} -> {:?}", enemy.id, before, enemy.state);
    }
    landed
}
