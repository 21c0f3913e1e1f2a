//! Wall and floor casting
//!
//! One ray per screen column walks the grid with DDA until it reaches a wall.
//! The perpendicular hit distance sizes the wall strip and fills the
//! column's z-buffer slot; rows below the strip are floor-cast back toward
//! the camera.

use glam::{IVec2, Vec2};

use super::FrameBuffer;
use super::texture::{TEXTURE_SIZE, TextureId, TextureSource, darken};
use crate::sim::{Camera, Cell, GridMap};

/// Step length used for an axis the ray never crosses
const NEVER: f32 = 1e30;
/// Smallest perpendicular distance reported for a hit
pub const MIN_PERP_DIST: f32 = 1e-4;
/// Floor rows whose projection denominator is at or below this are skipped
const HORIZON_EPSILON: f32 = 1e-3;

/// Which family of grid lines the ray crossed last
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// A vertical line (x changed); drawn at full brightness
    X,
    /// A horizontal line (y changed); drawn darkened
    Y,
}

/// Result of casting one ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Distance along the view direction, not Euclidean
    pub perp_dist: f32,
    pub side: Side,
    /// Wall cell that stopped the ray
    pub cell: IVec2,
    /// Fractional position of the hit along the wall face, in [0, 1)
    pub wall_x: f32,
}

impl RayHit {
    /// Texture column for this hit, mirrored so faces read the same way
    /// from both sides
    pub fn texture_column(&self, ray: Vec2) -> usize {
        let tx = ((self.wall_x * TEXTURE_SIZE as f32) as usize).min(TEXTURE_SIZE - 1);
        let mirrored = match self.side {
            Side::X => ray.x > 0.0,
            Side::Y => ray.y < 0.0,
        };
        if mirrored { TEXTURE_SIZE - 1 - tx } else { tx }
    }
}

/// Ray direction through screen column `x` of a `width` wide view
#[inline]
pub fn column_ray(camera: &Camera, x: usize, width: usize) -> Vec2 {
    let camera_x = 2.0 * x as f32 / width as f32 - 1.0;
    camera.dir + camera.plane * camera_x
}

#[inline]
fn step_length(component: f32) -> f32 {
    if component == 0.0 { NEVER } else { (1.0 / component).abs() }
}

/// Walk the grid from `origin` along `ray` until a wall cell is entered.
///
/// Out-of-bounds cells read as walls, so a ray always stops within
/// `width + height` steps of any in-grid origin.
pub fn cast_ray(grid: &GridMap, origin: Vec2, ray: Vec2) -> RayHit {
    let mut cell = origin.floor().as_ivec2();
    let delta = Vec2::new(step_length(ray.x), step_length(ray.y));

    let (step_x, mut side_x) = if ray.x < 0.0 {
        (-1, (origin.x - cell.x as f32) * delta.x)
    } else {
        (1, (cell.x as f32 + 1.0 - origin.x) * delta.x)
    };
    let (step_y, mut side_y) = if ray.y < 0.0 {
        (-1, (origin.y - cell.y as f32) * delta.y)
    } else {
        (1, (cell.y as f32 + 1.0 - origin.y) * delta.y)
    };

    let max_steps = grid.width() + grid.height() + 2;
    let mut side = Side::X;
    for _ in 0..max_steps {
        if side_x < side_y {
            side_x += delta.x;
            cell.x += step_x;
            side = Side::X;
        } else {
            side_y += delta.y;
            cell.y += step_y;
            side = Side::Y;
        }
        if grid.cell(cell.x, cell.y) == Cell::Wall {
            break;
        }
    }

    let perp_dist = match side {
        Side::X => side_x - delta.x,
        Side::Y => side_y - delta.y,
    }
    .max(MIN_PERP_DIST);

    let along = match side {
        Side::X => origin.y + perp_dist * ray.y,
        Side::Y => origin.x + perp_dist * ray.x,
    };

    RayHit {
        perp_dist,
        side,
        cell,
        wall_x: along - along.floor(),
    }
}

/// Draw the wall strip and the floor beneath it for screen column `x`.
/// Returns the hit so the caller can record its depth.
pub fn draw_column<T: TextureSource>(
    frame: &mut FrameBuffer,
    x: usize,
    camera: &Camera,
    grid: &GridMap,
    textures: &T,
    bob: f32,
) -> RayHit {
    let w = frame.width();
    let h = frame.height() as i64;
    let ray = column_ray(camera, x, w);
    let hit = cast_ray(grid, camera.pos, ray);

    let bob_px = bob as i64;
    let line_height = ((h as f32 / hit.perp_dist) as i64).clamp(1, h * 64);
    let start = (-line_height / 2 + h / 2 + bob_px).max(0);
    let end = (line_height / 2 + h / 2 + bob_px).min(h - 1);

    let wall = textures.texture(TextureId::Crowd);
    let tx = hit.texture_column(ray);
    let max_row = TEXTURE_SIZE as i64 - 1;
    for y in start..end {
        let d = y * 256 - h * 128 + line_height * 128 - bob_px * 256;
        let ty = ((d * TEXTURE_SIZE as i64) / line_height / 256).clamp(0, max_row) as usize;
        let mut c = wall.texel(tx, ty);
        if hit.side == Side::Y {
            c = darken(c);
        }
        frame.set(x, y as usize, c);
    }

    if end >= 0 && end < h - 1 {
        draw_floor(frame, x, end + 1, camera, grid, textures, bob, ray, hit.perp_dist);
    }

    hit
}

/// Floor-cast rows `from..height` of column `x`.
///
/// Each row maps back to a world distance; the sample point slides from the
/// camera toward the wall hit point in proportion to that distance.
#[allow(clippy::too_many_arguments)]
fn draw_floor<T: TextureSource>(
    frame: &mut FrameBuffer,
    x: usize,
    from: i64,
    camera: &Camera,
    grid: &GridMap,
    textures: &T,
    bob: f32,
    ray: Vec2,
    wall_dist: f32,
) {
    let h = frame.height() as f32;
    let wall_point = camera.pos + ray * wall_dist;
    let sand = textures.texture(TextureId::Sand);
    let spikes = textures.texture(TextureId::Spikes);
    let size = TEXTURE_SIZE as i64;

    for y in from..frame.height() as i64 {
        let denom = 2.0 * y as f32 - h - 2.0 * bob;
        if denom <= HORIZON_EPSILON {
            // Too close to the horizon to project; the prefill shows through
            continue;
        }
        let row_dist = h / denom;
        let weight = row_dist / wall_dist;
        let p = camera.pos.lerp(wall_point, weight);

        let ftx = ((p.x * TEXTURE_SIZE as f32) as i64).rem_euclid(size);
        let fty = ((p.y * TEXTURE_SIZE as f32) as i64).rem_euclid(size);

        let color = if grid.cell_at(p.x, p.y) == Cell::Trap {
            if (ftx + fty) % 8 == 0 || (ftx - fty) % 8 == 0 {
                0x111111
            } else {
                spikes.texel(ftx as usize, fty as usize)
            }
        } else {
            let c = sand.texel(ftx as usize, fty as usize);
            if p.x.rem_euclid(5.0) < 0.1 || p.y.rem_euclid(5.0) < 0.1 {
                darken(c)
            } else {
                c
            }
        };
        frame.set(x, y as usize, color);
    }
}
