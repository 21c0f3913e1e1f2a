//! Frame loop
//!
//! `Game` owns the simulation state and everything that presents it. Each
//! frame consumes wall-clock time in fixed `SIM_DT` steps, then renders once
//! from the last completed step.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::audio::{AudioBackend, AudioManager, LogBackend};
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::renderer::{FrameBuffer, PatternAtlas, RenderConfig, Renderer, TextureSource};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, TickInput, tick};

/// Longest frame time fed to the accumulator
const MAX_FRAME_DT: f32 = 0.25;

/// End-of-run report printed by the binary
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub frames: u64,
    pub wave: u32,
    pub phase: GamePhase,
    pub health: f32,
    pub stamina: f32,
    pub enemies_left: usize,
    pub events: BTreeMap<&'static str, u32>,
}

pub struct Game<T: TextureSource = PatternAtlas, B: AudioBackend = LogBackend> {
    pub state: GameState,
    /// Input to apply on the next tick; one-shot fields clear after use
    pub input: TickInput,
    accumulator: f32,
    renderer: Renderer<T>,
    frame: FrameBuffer,
    audio: AudioManager<B>,
    settings: Settings,
    /// Shake jitter; kept apart from the simulation RNG
    fx_rng: Pcg32,
    last_phase: GamePhase,
    frames: u64,
}

impl Game {
    /// New run with the procedural atlas and a logging audio backend
    pub fn new(seed: u64, config: RenderConfig, settings: Settings) -> Self {
        Self::with_parts(
            GameState::new(seed),
            Renderer::new(config, PatternAtlas::new(seed)),
            AudioManager::default(),
            settings,
        )
    }
}

impl<T: TextureSource, B: AudioBackend> Game<T, B> {
    pub fn with_parts(
        state: GameState,
        renderer: Renderer<T>,
        mut audio: AudioManager<B>,
        settings: Settings,
    ) -> Self {
        audio.apply_settings(&settings);
        let fx_rng = Pcg32::seed_from_u64(state.seed ^ 0x5EED_F00D);
        Self {
            last_phase: state.phase,
            state,
            input: TickInput::default(),
            accumulator: 0.0,
            frame: renderer.new_frame(),
            renderer,
            audio,
            settings,
            fx_rng,
            frames: 0,
        }
    }

    /// Run as many fixed steps as `dt` seconds allow; returns how many ran
    pub fn update(&mut self, dt: f32) -> u32 {
        self.accumulator += dt.clamp(0.0, MAX_FRAME_DT);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input, &mut self.audio);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.look_delta = 0.0;
            self.input.pause = false;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog instead of spiralling
            self.accumulator = self.accumulator.min(SIM_DT);
        }

        let phase = self.state.phase;
        if phase != self.last_phase {
            log::debug!("Phase {:?} -> {:?}", self.last_phase, phase);
            self.last_phase = phase;
        }
        substeps
    }

    /// Vertical pixel offset for this frame: head bob plus shake jitter
    fn view_offset(&mut self) -> f32 {
        let mut bob = self.state.player.vertical_bob();
        if self.settings.effective_screen_shake() && self.state.damage_shake > 0.0 {
            bob += (self.fx_rng.random::<f32>() - 0.5) * self.state.damage_shake;
        }
        bob
    }

    /// Render the current state
    pub fn render(&mut self) -> &FrameBuffer {
        let bob = self.view_offset();
        self.renderer.render(&self.state, bob, &mut self.frame);
        self.frames += 1;
        &self.frame
    }

    /// Update then render one frame
    pub fn frame(&mut self, dt: f32) -> &FrameBuffer {
        self.update(dt);
        self.render()
    }

    pub fn last_frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn audio(&self) -> &AudioManager<B> {
        &self.audio
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn is_over(&self) -> bool {
        self.state.phase.is_terminal()
    }

    pub fn summary(&self) -> RunSummary {
        let events = GameEvent::ALL
            .iter()
            .map(|&e| (e.as_str(), self.audio.count(e)))
            .filter(|&(_, n)| n > 0)
            .collect();
        RunSummary {
            seed: self.state.seed,
            ticks: self.state.time_ticks,
            frames: self.frames,
            wave: self.state.wave,
            phase: self.state.phase,
            health: self.state.player.health,
            stamina: self.state.player.stamina,
            enemies_left: self.state.enemies.len(),
            events,
        }
    }
}
