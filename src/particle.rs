use std::ops::Range;

use cgmath::prelude::*;
use rand::Rng;

/// Horizontal drift, per frame.
pub const VELOCITY_X: Range<f32> = -0.5..0.5;
/// Vertical drift, per frame; always upward on screen.
pub const VELOCITY_Y: Range<f32> = -1.0..0.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    pub position: cgmath::Vector2<f32>,
    pub velocity: cgmath::Vector2<f32>,
    pub remaining_life: i32,
}

impl Particle {
    pub fn new(position: cgmath::Vector2<f32>, velocity: cgmath::Vector2<f32>, lifespan: u32) -> Self {
        Self {
            position,
            velocity,
            remaining_life: lifespan.min(i32::MAX as u32) as i32,
        }
    }

    /// Particle at `position` with a random upward-biased drift.
    pub fn spawn<R: Rng>(position: cgmath::Vector2<f32>, lifespan: u32, rng: &mut R) -> Self {
        let velocity = cgmath::vec2(rng.gen_range(VELOCITY_X), rng.gen_range(VELOCITY_Y));
        Self::new(position, velocity, lifespan)
    }

    /// One frame of motion and aging.
    pub fn advance(&mut self) {
        self.position += self.velocity;
        self.remaining_life -= 1;
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_life <= 0
    }

    /// Fraction of `lifespan` already used: 0 at birth, 1 at expiry.
    pub fn render_scale(&self, lifespan: u32) -> f32 {
        if lifespan == 0 {
            return 1.0;
        }
        let lifespan = lifespan as f32;
        ((lifespan - self.remaining_life as f32) / lifespan).clamp(0.0, 1.0)
    }

    pub fn speed(&self) -> f32 {
        self.velocity.magnitude()
    }
}
