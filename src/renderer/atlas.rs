//! Procedural pattern atlas
//!
//! Cheap stand-in artwork so the binary has something to draw. Generation is
//! seeded, so two atlases built from the same seed are identical.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::texture::{TEXTURE_SIZE, TRANSPARENT, Texture, TextureId, TextureSource};

const SAND: u32 = 0xD2B48C;
const SPIKES: u32 = 0x333333;
const EMPEROR: u32 = 0x800080;
const BLOOD: u32 = 0xAA0000;

/// One generated texture per `TextureId`
#[derive(Debug, Clone)]
pub struct PatternAtlas {
    textures: Vec<Texture>,
}

impl PatternAtlas {
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let textures = TextureId::ALL
            .iter()
            .map(|&id| match id {
                TextureId::Crowd => crowd(&mut rng),
                TextureId::Gate => gate(),
                TextureId::Sand => speckled(SAND, &mut rng),
                TextureId::Emperor => block_figure(EMPEROR),
                TextureId::Gladiator => gladiator(false, false),
                TextureId::GladiatorAttack => gladiator(true, false),
                TextureId::Blood => splatter(&mut rng),
                TextureId::GladiatorStunned => gladiator(false, true),
                TextureId::Spikes => speckled(SPIKES, &mut rng),
            })
            .collect();
        Self { textures }
    }
}

impl TextureSource for PatternAtlas {
    fn texture(&self, id: TextureId) -> &Texture {
        &self.textures[id.index()]
    }
}

/// Stone tiers with rows of colourful spectators
fn crowd(rng: &mut Pcg32) -> Texture {
    Texture::from_fn(|x, y| {
        let tier = y % 6;
        if tier == 0 {
            return 0x9A8B7C;
        }
        if tier > 2 && (x + tier * 13) % 4 != 0 {
            return match rng.random_range(0..4) {
                0 => 0xFFCCCC,
                1 => 0xEEEEFF,
                2 => 0xEEDDCC,
                _ => 0xAA9988,
            };
        }
        0xCEC8B4
    })
}

fn gate() -> Texture {
    Texture::from_fn(|x, y| {
        if x % 8 == 0 || y % 16 == 0 {
            0x222222
        } else {
            0x111111
        }
    })
}

/// Flat colour with per-texel darkening noise
fn speckled(base: u32, rng: &mut Pcg32) -> Texture {
    Texture::from_fn(|_, _| {
        let n = rng.random_range(0..20u32);
        let channel = |shift: u32| ((base >> shift) & 0xFF).saturating_sub(n) << shift;
        channel(16) | channel(8) | channel(0)
    })
}

fn block_figure(color: u32) -> Texture {
    Texture::from_fn(|x, y| {
        if (20..44).contains(&x) && (10..54).contains(&y) {
            color
        } else {
            TRANSPARENT
        }
    })
}

fn gladiator(attacking: bool, stunned: bool) -> Texture {
    let (skin, armor) = if stunned {
        (0xFFFFEE, 0xFFFFFF)
    } else {
        (0xD4AF37, 0xC0C0C0)
    };
    let cx = TEXTURE_SIZE as i32 / 2;

    Texture::from_fn(|x, y| {
        let (x, y) = (x as i32, y as i32);
        let mut c = TRANSPARENT;

        if y > 45 && ((x - cx - 6).abs() < 4 || (x - cx + 6).abs() < 4) {
            c = 0x8B4513; // legs
        } else if y > 25 && (x - cx).abs() < 11 {
            c = armor;
        } else if y > 8 && y <= 25 && (x - cx).pow(2) + (y - 18).pow(2) < 64 {
            c = skin;
        }

        // shield with a boss
        let shield = (x - 18).pow(2) + (y - 35).pow(2);
        if shield < 100 {
            c = if shield < 16 { 0xFFFFFF } else { 0x8B0000 };
        }

        let sword = if attacking {
            x > 42 && x < 62 && y > 15 && y < 22
        } else {
            x > 46 && x < 51 && y > 30 && y < 55
        };
        if sword {
            c = 0xEEEEEE;
        }
        c
    })
}

fn splatter(rng: &mut Pcg32) -> Texture {
    Texture::from_fn(|x, y| {
        let (dx, dy) = (x as i32 - 32, y as i32 - 32);
        if dx * dx + dy * dy < 100 && rng.random_bool(0.3) {
            BLOOD
        } else {
            TRANSPARENT
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_atlas() {
        let a = PatternAtlas::new(5);
        let b = PatternAtlas::new(5);
        for id in TextureId::ALL {
            assert_eq!(a.texture(id), b.texture(id));
        }
    }

    #[test]
    fn test_sprites_have_transparent_margins() {
        let atlas = PatternAtlas::new(1);
        for id in [
            TextureId::Emperor,
            TextureId::Gladiator,
            TextureId::GladiatorAttack,
            TextureId::GladiatorStunned,
            TextureId::Blood,
        ] {
            assert_eq!(atlas.texture(id).texel(0, 0), TRANSPARENT, "{id:?}");
        }
    }

    #[test]
    fn test_surfaces_are_opaque() {
        let atlas = PatternAtlas::new(1);
        for id in [TextureId::Crowd, TextureId::Gate, TextureId::Sand, TextureId::Spikes] {
            let tex = atlas.texture(id);
            for y in 0..TEXTURE_SIZE {
                for x in 0..TEXTURE_SIZE {
                    assert_ne!(tex.texel(x, y), TRANSPARENT);
                }
            }
        }
    }

    #[test]
    fn test_attack_pose_differs() {
        let atlas = PatternAtlas::new(1);
        assert_ne!(
            atlas.texture(TextureId::Gladiator),
            atlas.texture(TextureId::GladiatorAttack)
        );
    }
}
