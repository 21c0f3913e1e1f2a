//! First-person camera and wall-sliding movement
//!
//! The camera is a position plus a direction vector and a perpendicular
//! camera plane. The plane's length sets the field of view; with the
//! grid's y axis pointing down, the plane points to the right of the view.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::grid::GridMap;
use crate::consts::*;
use crate::rotate;

/// Largest per-axis step the slide resolver accepts in one call.
/// Steps plus the collision margin must stay under one cell.
const MAX_AXIS_STEP: f32 = 0.5;

/// Viewpoint for rendering and AI distance queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Position in grid units
    pub pos: Vec2,
    /// Unit view direction
    pub dir: Vec2,
    /// Camera plane, perpendicular to `dir`
    pub plane: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Vec2::new(CAMERA_START.0, CAMERA_START.1),
            Vec2::X,
            CAMERA_PLANE,
        )
    }
}

impl Camera {
    /// Camera at `pos` looking along `dir` with a plane of length `plane_len`
    pub fn new(pos: Vec2, dir: Vec2, plane_len: f32) -> Self {
        let dir = dir.normalize_or(Vec2::X);
        Self {
            pos,
            dir,
            plane: dir.perp() * plane_len,
        }
    }

    /// Turn by `angle` radians (positive turns right).
    ///
    /// Direction and plane rotate together so the field of view is kept.
    pub fn rotate(&mut self, angle: f32) {
        if angle == 0.0 {
            return;
        }
        self.dir = rotate(self.dir, angle);
        self.plane = rotate(self.plane, angle);
    }

    /// Unit vector pointing to the right of the view
    #[inline]
    pub fn right(&self) -> Vec2 {
        self.dir.perp()
    }

    /// Movement delta for one tick.
    ///
    /// `forward` and `strafe` are signed axis inputs (-1, 0, 1), strafe
    /// positive to the right. Strafing is scaled independently from the
    /// forward axis before `speed` is applied.
    pub fn movement_delta(&self, forward: f32, strafe: f32, speed: f32) -> Vec2 {
        (self.dir * forward + self.right() * strafe * STRAFE_FACTOR) * speed
    }

    /// Apply `delta` one axis at a time so the camera slides along walls.
    ///
    /// X is resolved first against the current row, then Y against the
    /// (possibly updated) column. Each test looks `COLLISION_MARGIN` ahead
    /// in the direction of travel. Returns true if the camera moved.
    pub fn slide(&mut self, delta: Vec2, grid: &GridMap) -> bool {
        let delta = delta.clamp(Vec2::splat(-MAX_AXIS_STEP), Vec2::splat(MAX_AXIS_STEP));
        let start = self.pos;

        if delta.x != 0.0 {
            let target_x = self.pos.x + delta.x;
            let probe_x = target_x + COLLISION_MARGIN * delta.x.signum();
            if !grid.is_blocked(probe_x, self.pos.y) {
                self.pos.x = target_x;
            }
        }

        if delta.y != 0.0 {
            let target_y = self.pos.y + delta.y;
            let probe_y = target_y + COLLISION_MARGIN * delta.y.signum();
            if !grid.is_blocked(self.pos.x, probe_y) {
                self.pos.y = target_y;
            }
        }

        self.pos != start
    }
}
