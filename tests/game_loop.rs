//! Whole-loop tests driving `Game` frame by frame

use std::f32::consts::PI;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use gladiator_arena::audio::AudioManager;
use gladiator_arena::consts::{FINAL_WAVE, SIM_DT};
use gladiator_arena::renderer::{PatternAtlas, RenderConfig, Renderer, TextureId};
use gladiator_arena::sim::{Camera, Cell, GameEvent, GamePhase, GameState, GridMap, TickInput};
use gladiator_arena::{Game, Settings};

fn config() -> RenderConfig {
    RenderConfig::new(80, 60).unwrap()
}

/// Walled square room with the camera in the middle looking down +x
fn duel_game(size: usize) -> Game {
    let mut cells = vec![Cell::Floor; size * size];
    for y in 0..size {
        for x in 0..size {
            if x == 0 || y == 0 || x == size - 1 || y == size - 1 {
                cells[y * size + x] = Cell::Wall;
            }
        }
    }
    let grid = GridMap::from_cells(size, size, cells);
    let mut state = GameState::with_grid(9, Pcg32::seed_from_u64(9), grid);
    let mid = size as f32 / 2.0 + 0.5;
    state.camera = Camera::new(Vec2::splat(mid), Vec2::X, 0.66);
    state.add_enemy(Vec2::new(mid + 1.5, mid));
    // squaring up to the player, so no flank crits
    state.enemies[0].body.facing = PI;

    Game::with_parts(
        state,
        Renderer::new(config(), PatternAtlas::new(9)),
        AudioManager::default(),
        Settings::default(),
    )
}

fn scripted_input(frame: u64) -> TickInput {
    TickInput {
        forward: frame % 90 < 60,
        strafe_left: frame % 200 > 150,
        attack: frame % 3 == 0,
        block: frame % 120 > 100,
        look_delta: if frame % 50 < 10 { 0.03 } else { 0.0 },
        ..Default::default()
    }
}

#[test]
fn test_same_seed_same_run() {
    let mut a = Game::new(7, config(), Settings::default());
    let mut b = Game::new(7, config(), Settings::default());
    for frame in 0..400 {
        a.input = scripted_input(frame);
        b.input = scripted_input(frame);
        a.frame(SIM_DT);
        b.frame(SIM_DT);
    }
    assert_eq!(a.last_frame(), b.last_frame());
    assert_eq!(
        serde_json::to_string(&a.summary()).unwrap(),
        serde_json::to_string(&b.summary()).unwrap()
    );
}

#[test]
fn test_duel_clears_the_wave() {
    let mut game = duel_game(32);
    for _ in 0..3000 {
        game.input = TickInput {
            attack: true,
            ..Default::default()
        };
        game.frame(SIM_DT);
        if game.state.wave > 1 || game.is_over() {
            break;
        }
    }

    assert_eq!(game.state.phase, GamePhase::Playing);
    assert_eq!(game.state.wave, 2);
    assert!(game.audio().count(GameEvent::Hit) + game.audio().count(GameEvent::Crit) >= 2);
    assert_eq!(game.audio().count(GameEvent::Horn), 1);
    assert!(game.state.player.health > 0.0);
}

#[test]
fn test_hit_enemy_bleeds_and_reels() {
    let mut game = duel_game(32);
    game.input = TickInput {
        attack: true,
        ..Default::default()
    };
    game.frame(SIM_DT);
    assert!(!game.state.particles.is_empty());
    assert_eq!(game.state.enemies[0].texture(), TextureId::GladiatorStunned);

    // knocked back but still in view: the white stunned armour is on screen
    let frame = game.render();
    assert!(frame.pixels().contains(&0xFFFFFF));
}

#[test]
fn test_pause_freezes_the_world() {
    let mut game = duel_game(32);
    game.input.pause = true;
    game.frame(SIM_DT);
    assert_eq!(game.state.phase, GamePhase::Paused);

    let enemy_before = game.state.enemies[0].body.pos;
    for _ in 0..60 {
        game.input.forward = true;
        game.frame(SIM_DT);
    }
    assert_eq!(game.state.enemies[0].body.pos, enemy_before);
    assert_eq!(game.state.time_ticks, 0);
}

#[test]
fn test_final_wave_cleared_is_victory() {
    let mut game = Game::new(3, config(), Settings::default());
    game.state.enemies.clear();
    game.state.wave = FINAL_WAVE;
    game.frame(SIM_DT);
    assert_eq!(game.state.phase, GamePhase::Victory);
    assert!(game.is_over());

    let ticks = game.state.time_ticks;
    for _ in 0..10 {
        game.frame(SIM_DT);
    }
    assert_eq!(game.state.time_ticks, ticks);
    assert_eq!(game.audio().count(GameEvent::Horn), 0);
}

#[test]
fn test_frame_dump_is_full_size() {
    let mut game = Game::new(5, config(), Settings::default());
    let ppm = game.frame(SIM_DT).to_ppm();
    let header = b"P6\n80 60\n255\n";
    assert!(ppm.starts_with(header));
    assert_eq!(ppm.len(), header.len() + 80 * 60 * 3);
}
