//! Billboard sprites
//!
//! Enemies, corpses, blood and the emperor are drawn as camera-facing
//! squares after the walls, farthest first, each column tested against the
//! wall z-buffer.

use glam::Vec2;

use super::FrameBuffer;
use super::texture::{TEXTURE_SIZE, TRANSPARENT, TextureId, TextureSource};
use crate::sim::{Camera, GameState};

/// Smallest basis determinant the camera may have before sprites are skipped
const MIN_DET: f32 = 1e-6;

/// One thing to billboard this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub pos: Vec2,
    pub texture: TextureId,
}

/// Gather every sprite in the state, sorted back to front from the camera
pub fn collect_sprites(state: &GameState) -> Vec<Sprite> {
    let mut sprites: Vec<Sprite> = state
        .enemies
        .iter()
        .map(|e| Sprite {
            pos: e.body.pos,
            texture: e.texture(),
        })
        .chain(state.particles.iter().map(|p| Sprite {
            pos: p.pos,
            texture: TextureId::Blood,
        }))
        .chain(std::iter::once(Sprite {
            pos: state.emperor.pos,
            texture: TextureId::Emperor,
        }))
        .collect();

    let eye = state.camera.pos;
    sprites.sort_by(|a, b| {
        b.pos
            .distance_squared(eye)
            .total_cmp(&a.pos.distance_squared(eye))
    });
    sprites
}

/// Camera-space position of `pos`: x across the screen, y into it
pub fn to_camera_space(camera: &Camera, pos: Vec2) -> Option<Vec2> {
    let det = camera.plane.x * camera.dir.y - camera.dir.x * camera.plane.y;
    if det.abs() < MIN_DET {
        return None;
    }
    let inv_det = 1.0 / det;
    let rel = pos - camera.pos;
    Some(Vec2::new(
        inv_det * (camera.dir.y * rel.x - camera.dir.x * rel.y),
        inv_det * (-camera.plane.y * rel.x + camera.plane.x * rel.y),
    ))
}

/// Composite `sprites` (already sorted) over the frame
pub fn draw_sprites<T: TextureSource>(
    frame: &mut FrameBuffer,
    sprites: &[Sprite],
    camera: &Camera,
    z_buffer: &[f32],
    textures: &T,
    bob: f32,
) {
    let w = frame.width() as i64;
    let h = frame.height() as i64;
    let bob_px = bob as i64;
    let size = TEXTURE_SIZE as i64;

    for sprite in sprites {
        let Some(t) = to_camera_space(camera, sprite.pos) else {
            continue;
        };
        if t.y <= 0.0 {
            continue;
        }

        let screen_x = ((w / 2) as f32 * (1.0 + t.x / t.y)) as i64;
        // Width and height share one scale, so sprites stay square
        let side = ((h as f32 / t.y).abs() as i64).min(h * 64);
        if side <= 0 {
            continue;
        }

        let start_y = (-side / 2 + h / 2 + bob_px).max(0);
        let end_y = (side / 2 + h / 2 + bob_px).min(h - 1);
        let left = -side / 2 + screen_x;
        let start_x = left.max(0);
        let end_x = (side / 2 + screen_x).min(w - 1);

        let tex = textures.texture(sprite.texture);
        for stripe in start_x..end_x {
            if t.y >= z_buffer[stripe as usize] {
                continue;
            }
            let tx = ((256 * (stripe - left) * size / side) / 256).clamp(0, size - 1) as usize;
            for y in start_y..end_y {
                let d = y * 256 - h * 128 + side * 128 - bob_px * 256;
                let ty = ((d * size / side) / 256).clamp(0, size - 1) as usize;
                let c = tex.texel(tx, ty);
                if c != TRANSPARENT {
                    frame.set(stripe as usize, y as usize, c);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Enemy;

    #[test]
    fn test_point_ahead_has_positive_depth() {
        let camera = Camera::new(Vec2::new(5.0, 5.0), Vec2::X, 0.66);
        let t = to_camera_space(&camera, Vec2::new(8.0, 5.0)).unwrap();
        assert!(t.x.abs() < 1e-5);
        assert!((t.y - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_point_behind_has_negative_depth() {
        let camera = Camera::new(Vec2::new(5.0, 5.0), Vec2::X, 0.66);
        let t = to_camera_space(&camera, Vec2::new(2.0, 5.0)).unwrap();
        assert!(t.y < 0.0);
    }

    #[test]
    fn test_point_to_the_right_projects_right() {
        let camera = Camera::new(Vec2::new(5.0, 5.0), Vec2::X, 0.66);
        // Screen right is +y when looking down +x
        let t = to_camera_space(&camera, Vec2::new(8.0, 6.0)).unwrap();
        assert!(t.x > 0.0);
    }

    #[test]
    fn test_degenerate_camera_is_skipped() {
        let camera = Camera {
            pos: Vec2::ZERO,
            dir: Vec2::X,
            plane: Vec2::X,
        };
        assert!(to_camera_space(&camera, Vec2::ONE).is_none());
    }

    #[test]
    fn test_sprites_sorted_far_to_near() {
        let mut state = GameState::new(1);
        state.enemies.clear();
        let eye = state.camera.pos;
        state.enemies.push(Enemy::new(100, eye + Vec2::new(2.0, 0.0)));
        state.enemies.push(Enemy::new(101, eye + Vec2::new(9.0, 0.0)));
        state.enemies.push(Enemy::new(102, eye + Vec2::new(4.0, 0.0)));

        let sprites = collect_sprites(&state);
        // enemies plus the emperor
        assert_eq!(sprites.len(), 4);
        let dists: Vec<f32> = sprites.iter().map(|s| s.pos.distance(eye)).collect();
        assert!(dists.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn test_particles_use_blood() {
        let mut state = GameState::new(1);
        state.enemies.clear();
        state.particles.spawn(state.camera.pos + Vec2::X, Vec2::ZERO, 5);
        let sprites = collect_sprites(&state);
        assert!(sprites.iter().any(|s| s.texture == TextureId::Blood));
        assert!(sprites.iter().any(|s| s.texture == TextureId::Emperor));
    }
}
