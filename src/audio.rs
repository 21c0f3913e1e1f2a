//! Event sink and sound cues
//!
//! The simulation only emits `GameEvent`s. Turning them into sound is the
//! job of an `AudioManager`, which looks up a cue for each event, applies
//! volume settings and hands audible cues to a backend. Backends must not
//! block: playback is fire-and-forget.

use std::collections::HashMap;

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Receiver for simulation events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Collect events in order (tests, per-frame buffers)
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

/// Tone shape for a cue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    /// White noise burst
    Noise,
    /// Noise with a fast exponential decay
    Thud,
    /// Sine with a medium decay
    Clang,
    /// Sine with slow vibrato
    Wobble,
    /// FM sine, metallic
    Metal,
    /// Sine with a long ring-out
    Ring,
    /// Plain sine
    Low,
    /// Sawtooth
    Saw,
}

/// Description of a sound to play
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundCue {
    pub frequency_hz: f32,
    pub duration_ms: u32,
    pub waveform: Waveform,
}

impl SoundCue {
    const fn new(frequency_hz: f32, duration_ms: u32, waveform: Waveform) -> Self {
        Self {
            frequency_hz,
            duration_ms,
            waveform,
        }
    }

    /// Cue for a game event
    pub fn for_event(event: GameEvent) -> Self {
        match event {
            GameEvent::Woosh => Self::new(150.0, 100, Waveform::Noise),
            GameEvent::Hit => Self::new(60.0, 100, Waveform::Thud),
            GameEvent::Trap => Self::new(800.0, 200, Waveform::Clang),
            GameEvent::Stun => Self::new(300.0, 300, Waveform::Wobble),
            GameEvent::Clang => Self::new(600.0, 400, Waveform::Metal),
            GameEvent::Grunt => Self::new(100.0, 200, Waveform::Low),
            GameEvent::Hurt => Self::new(200.0, 300, Waveform::Saw),
            GameEvent::Crit => Self::new(800.0, 500, Waveform::Ring),
            GameEvent::Death => Self::new(100.0, 800, Waveform::Low),
            GameEvent::Horn => Self::new(300.0, 1500, Waveform::Saw),
        }
    }
}

/// Something that can actually make noise
pub trait AudioBackend {
    /// Start playing `cue` at `volume` (0-1). Must return immediately.
    fn play(&mut self, cue: SoundCue, volume: f32);
}

/// Backend that only logs what it would play
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::trace!(
            "cue {:?} {} Hz {} ms at {:.2}",
            cue.waveform,
            cue.frequency_hz,
            cue.duration_ms,
            volume
        );
    }
}

/// Audio manager for the game
pub struct AudioManager<B: AudioBackend = LogBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// How many times each event has been heard this run
    counts: HashMap<GameEvent, u32>,
}

impl Default for AudioManager<LogBackend> {
    fn default() -> Self {
        Self::new(LogBackend)
    }
}

impl<B: AudioBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            counts: HashMap::new(),
        }
    }

    /// Pick up volume and mute settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Times `event` has been emitted so far
    pub fn count(&self, event: GameEvent) -> u32 {
        self.counts.get(&event).copied().unwrap_or(0)
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}

impl<B: AudioBackend> EventSink for AudioManager<B> {
    fn emit(&mut self, event: GameEvent) {
        *self.counts.entry(event).or_default() += 1;

        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(SoundCue::for_event(event), vol);
    }
}
