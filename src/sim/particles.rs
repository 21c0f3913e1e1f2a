//! Blood particles
//!
//! Purely visual: particles drift with a constant velocity and vanish when
//! their lifetime runs out. They never touch the grid.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{PARTICLE_LIFETIME, PARTICLE_SPEED};

/// A single particle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Remaining update ticks
    pub life: u32,
}

/// Active particle set
#[derive(Debug, Clone, Default)]
pub struct ParticleSystem {
    particles: Vec<Particle>,
}

impl ParticleSystem {
    /// Spawn one blood droplet at `pos` with a small random drift
    pub fn spawn_blood<R: Rng + ?Sized>(&mut self, pos: Vec2, rng: &mut R) {
        let vel = Vec2::new(
            (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
            (rng.random::<f32>() - 0.5) * PARTICLE_SPEED,
        );
        self.spawn(pos, vel, PARTICLE_LIFETIME);
    }

    /// Spawn a particle with explicit velocity and lifetime.
    /// A zero lifetime particle is never added.
    pub fn spawn(&mut self, pos: Vec2, vel: Vec2, life: u32) {
        if life == 0 {
            return;
        }
        self.particles.push(Particle { pos, vel, life });
    }

    /// Integrate one tick and drop expired particles
    pub fn update(&mut self) {
        for p in &mut self.particles {
            p.pos += p.vel;
            p.life -= 1;
        }
        self.particles.retain(|p| p.life > 0);
    }

    pub fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
