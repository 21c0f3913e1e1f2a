//! Game settings and preferences
//!
//! Persisted as JSON next to the binary (or wherever `--settings` points).

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::renderer::{RenderConfig, RenderConfigError};

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Window resolution presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Resolution {
    #[default]
    R800x600,
    R1024x768,
    R1280x720,
    R1920x1080,
}

impl Resolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Resolution::R800x600 => "800x600",
            Resolution::R1024x768 => "1024x768",
            Resolution::R1280x720 => "1280x720",
            Resolution::R1920x1080 => "1920x1080",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "800x600" => Some(Resolution::R800x600),
            "1024x768" => Some(Resolution::R1024x768),
            "1280x720" | "720p" => Some(Resolution::R1280x720),
            "1920x1080" | "1080p" => Some(Resolution::R1920x1080),
            _ => None,
        }
    }

    pub fn size(&self) -> (usize, usize) {
        match self {
            Resolution::R800x600 => (800, 600),
            Resolution::R1024x768 => (1024, 768),
            Resolution::R1280x720 => (1280, 720),
            Resolution::R1920x1080 => (1920, 1080),
        }
    }

    /// Next preset in the options menu cycle (wraps around)
    pub fn next(&self) -> Self {
        match self {
            Resolution::R800x600 => Resolution::R1024x768,
            Resolution::R1024x768 => Resolution::R1280x720,
            Resolution::R1280x720 => Resolution::R1920x1080,
            Resolution::R1920x1080 => Resolution::R800x600,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Display ===
    pub resolution: Resolution,
    /// Only read by the windowing layer
    pub fullscreen: bool,

    // === Controls ===
    /// Look speed in radians per pixel of mouse motion
    pub mouse_sensitivity: f32,

    // === Visual Effects ===
    /// Screen shake on hits and traps
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            resolution: Resolution::R800x600,
            fullscreen: false,

            mouse_sensitivity: 0.0015,

            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Turn a mouse delta in pixels into a look angle
    pub fn look_angle(&self, mouse_dx: f32) -> f32 {
        mouse_dx * self.mouse_sensitivity
    }

    /// Viewport for the current resolution preset
    pub fn render_config(&self) -> Result<RenderConfig, RenderConfigError> {
        let (w, h) = self.resolution.size();
        RenderConfig::new(w, h)
    }

    /// Load settings from a JSON file; a missing file gives defaults
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let json = fs::read_to_string(path)?;
        let settings = serde_json::from_str(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Save settings as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}
