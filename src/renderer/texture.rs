//! Texture supplier interface
//!
//! The renderer never builds textures itself: it asks a `TextureSource` for
//! a 64x64 texel grid by id. One texel value is reserved as "transparent"
//! and is never written to the frame.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Side length of every texture
pub const TEXTURE_SIZE: usize = 64;
/// Texel value that sprites skip when blitting
pub const TRANSPARENT: u32 = 0xFFFF_FFFF;

/// Indexed texture slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TextureId {
    /// Arena wall (spectators)
    Crowd,
    Gate,
    /// Arena floor
    Sand,
    Emperor,
    Gladiator,
    GladiatorAttack,
    /// Corpses and blood particles
    Blood,
    GladiatorStunned,
    /// Trap floor
    Spikes,
}

impl TextureId {
    pub const ALL: [TextureId; 9] = [
        TextureId::Crowd,
        TextureId::Gate,
        TextureId::Sand,
        TextureId::Emperor,
        TextureId::Gladiator,
        TextureId::GladiatorAttack,
        TextureId::Blood,
        TextureId::GladiatorStunned,
        TextureId::Spikes,
    ];

    /// Slot index in an atlas
    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TextureError {
    #[error("texture needs {expected} texels, got {got}")]
    WrongSize { expected: usize, got: usize },
}

/// A square grid of 0xRRGGBB texels, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    texels: Vec<u32>,
}

impl Texture {
    pub fn from_texels(texels: Vec<u32>) -> Result<Self, TextureError> {
        let expected = TEXTURE_SIZE * TEXTURE_SIZE;
        if texels.len() != expected {
            return Err(TextureError::WrongSize {
                expected,
                got: texels.len(),
            });
        }
        Ok(Self { texels })
    }

    /// Texture filled with one colour
    pub fn solid(color: u32) -> Self {
        Self {
            texels: vec![color; TEXTURE_SIZE * TEXTURE_SIZE],
        }
    }

    /// Build a texture from a per-texel function of (x, y)
    pub fn from_fn(mut f: impl FnMut(usize, usize) -> u32) -> Self {
        let mut texels = Vec::with_capacity(TEXTURE_SIZE * TEXTURE_SIZE);
        for y in 0..TEXTURE_SIZE {
            for x in 0..TEXTURE_SIZE {
                texels.push(f(x, y));
            }
        }
        Self { texels }
    }

    /// Texel at (x, y); coordinates wrap
    #[inline]
    pub fn texel(&self, x: usize, y: usize) -> u32 {
        self.texels[(y % TEXTURE_SIZE) * TEXTURE_SIZE + x % TEXTURE_SIZE]
    }
}

/// Anything that can hand out textures by id
pub trait TextureSource {
    fn texture(&self, id: TextureId) -> &Texture;
}

/// Halve every channel (shaded wall faces, floor grout)
#[inline]
pub fn darken(color: u32) -> u32 {
    (color >> 1) & 0x7F7F7F
}
