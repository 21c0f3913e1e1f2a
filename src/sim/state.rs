//! Game state and core simulation types
//!
//! Everything the update step mutates lives here. The renderer only reads it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::camera::Camera;
use super::grid::GridMap;
use super::particles::ParticleSystem;
use crate::consts::*;
use crate::heading;
use crate::renderer::TextureId;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation frozen until the pause input is pressed again
    Paused,
    /// Player health reached zero
    GameOver,
    /// Final wave cleared
    Victory,
}

impl GamePhase {
    /// Terminal phases never tick again
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Discrete signals for the presentation layer (audio cues, flashes)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player swing connected with nothing
    Woosh,
    /// Player swing landed
    Hit,
    /// Player swing landed on an enemy facing away (double damage)
    Crit,
    /// Enemy knocked into the stunned state by a player hit
    Stun,
    /// Enemy blow caught on the player's shield
    Clang,
    /// Enemy finished winding up and swings
    Grunt,
    /// Enemy blow landed on the player
    Hurt,
    /// Player died
    Death,
    /// A new wave entered the arena
    Horn,
    /// Player stepped on a spike trap
    Trap,
}

impl GameEvent {
    pub const ALL: [GameEvent; 10] = [
        GameEvent::Woosh,
        GameEvent::Hit,
        GameEvent::Crit,
        GameEvent::Stun,
        GameEvent::Clang,
        GameEvent::Grunt,
        GameEvent::Hurt,
        GameEvent::Death,
        GameEvent::Horn,
        GameEvent::Trap,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameEvent::Woosh => "woosh",
            GameEvent::Hit => "hit",
            GameEvent::Crit => "crit",
            GameEvent::Stun => "stun",
            GameEvent::Clang => "clang",
            GameEvent::Grunt => "grunt",
            GameEvent::Hurt => "hurt",
            GameEvent::Death => "death",
            GameEvent::Horn => "horn",
            GameEvent::Trap => "trap",
        }
    }
}

/// Position and facing shared by every world entity
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    /// Facing angle in radians
    pub facing: f32,
}

impl Body {
    pub fn at(pos: Vec2) -> Self {
        Self { pos, facing: 0.0 }
    }

    /// Unit facing vector
    #[inline]
    pub fn facing_vec(&self) -> Vec2 {
        heading(self.facing)
    }
}

/// Player swing variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AttackKind {
    #[default]
    Slash,
    Stab,
    Overhead,
}

impl AttackKind {
    /// Roll a swing: Slash 33%, Stab 33%, Overhead 34%
    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let r: f32 = rng.random();
        if r < 0.33 {
            AttackKind::Slash
        } else if r < 0.66 {
            AttackKind::Stab
        } else {
            AttackKind::Overhead
        }
    }

    /// Damage before the flank bonus
    pub fn base_damage(self) -> f32 {
        match self {
            AttackKind::Slash => SLASH_DAMAGE,
            AttackKind::Stab => STAB_DAMAGE,
            AttackKind::Overhead => OVERHEAD_DAMAGE,
        }
    }
}

/// The player (viewpoint is the game's camera)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub health: f32,
    pub stamina: f32,
    pub blocking: bool,
    pub attack: AttackKind,
    /// Ticks until the next swing is allowed (also the swing animation)
    pub attack_ticks: u32,
    /// Ticks until traps can hurt again
    pub trap_ticks: u32,
    /// Head-bob phase, advanced while walking
    pub head_bob: f32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            health: PLAYER_MAX_HEALTH,
            stamina: PLAYER_MAX_STAMINA,
            blocking: false,
            attack: AttackKind::Slash,
            attack_ticks: 0,
            trap_ticks: 0,
            head_bob: 0.0,
        }
    }
}

impl Player {
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Vertical view offset from footsteps, in pixels
    pub fn vertical_bob(&self) -> f32 {
        self.head_bob.sin() * HEAD_BOB_PIXELS
    }

    /// Lose health, clamped at zero
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Spend stamina, clamped at zero
    pub fn drain_stamina(&mut self, amount: f32) {
        self.stamina = (self.stamina - amount).max(0.0);
    }

    /// Progress through the current swing (0 = just started, 1 = done)
    pub fn swing_progress(&self) -> Option<f32> {
        (self.attack_ticks > 0)
            .then(|| 1.0 - self.attack_ticks as f32 / ATTACK_COOLDOWN_TICKS as f32)
    }
}

/// Enemy AI states, each carrying its own countdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyState {
    /// Freshly spawned, waiting for the player to come close
    Idle,
    /// Walking toward the player
    Chase,
    /// Raising the weapon
    Windup { ticks: u32 },
    /// Swinging; the blow lands at `ATTACK_TRIGGER_TICK`
    Attack { ticks: u32 },
    /// Recovering after a swing
    Cooldown { ticks: u32 },
    /// Reeling from a hit or a blocked swing
    Stunned { ticks: u32 },
    /// Dead; the corpse lingers until the timer runs out
    Death { ticks: u32 },
}

/// A melee gladiator
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub body: Body,
    pub hp: f32,
    pub speed: f32,
    pub state: EnemyState,
}

impl Enemy {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            body: Body::at(pos),
            hp: ENEMY_MAX_HP,
            speed: ENEMY_SPEED,
            state: EnemyState::Idle,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        !matches!(self.state, EnemyState::Death { .. })
    }

    /// Dead and done playing the death animation
    #[inline]
    pub fn is_expired(&self) -> bool {
        matches!(self.state, EnemyState::Death { ticks: 0 })
    }

    /// Apply damage; returns true if this blow killed the enemy
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.is_alive() {
            return false;
        }
        self.hp = (self.hp - amount).max(0.0);
        if self.hp <= 0.0 {
            self.state = EnemyState::Death { ticks: DEATH_TICKS };
            return true;
        }
        false
    }

    /// Sprite to draw for the current state
    pub fn texture(&self) -> TextureId {
        match self.state {
            EnemyState::Death { .. } => TextureId::Blood,
            EnemyState::Stunned { .. } => TextureId::GladiatorStunned,
            EnemyState::Attack { .. } => TextureId::GladiatorAttack,
            _ => TextureId::Gladiator,
        }
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded random source for spawning and attack rolls
    pub rng: Pcg32,
    pub grid: GridMap,
    pub camera: Camera,
    pub player: Player,
    /// Enemy roster (dead enemies stay until their death timer expires)
    pub enemies: Vec<Enemy>,
    pub particles: ParticleSystem,
    /// Static spectator sprite in the stands
    pub emperor: Body,
    /// Current wave number (starts at 1)
    pub wave: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Red overlay countdown after the player is hurt
    pub damage_flash: u32,
    /// Camera shake intensity in pixels
    pub damage_shake: f32,
    next_id: u32,
}

impl GameState {
    /// Create a new run: generate the arena and spawn the first wave
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let grid = GridMap::arena(&mut rng);
        let mut state = Self::with_grid(seed, rng, grid);
        state.spawn_wave(FIRST_WAVE_SIZE);
        log::info!("New run (seed {seed}), wave {} begins", state.wave);
        state
    }

    /// A run on a prepared grid with an empty roster
    pub fn with_grid(seed: u64, rng: Pcg32, grid: GridMap) -> Self {
        let emperor = Body::at(Vec2::new(grid.width() as f32 / 2.0, 1.5));
        Self {
            seed,
            rng,
            grid,
            camera: Camera::default(),
            player: Player::default(),
            enemies: Vec::new(),
            particles: ParticleSystem::default(),
            emperor,
            wave: FIRST_WAVE,
            phase: GamePhase::Playing,
            time_ticks: 0,
            damage_flash: 0,
            damage_shake: 0.0,
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place up to `count` enemies around the arena; returns how many landed
    pub fn spawn_wave(&mut self, count: usize) -> usize {
        let points = self.grid.spawn_points(count, &mut self.rng);
        let placed = points.len();
        for pos in points {
            let id = self.next_entity_id();
            self.enemies.push(Enemy::new(id, pos));
        }
        placed
    }

    /// Add an enemy at an explicit position (tests and scripted setups)
    pub fn add_enemy(&mut self, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, pos));
        id
    }

    pub fn living_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_alive()).count()
    }

    /// Start the red flash and shake used for every kind of player damage
    pub fn flash_damage(&mut self, shake: f32) {
        self.damage_flash = DAMAGE_FLASH_TICKS;
        self.damage_shake = shake;
    }
}
