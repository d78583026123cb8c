//! Projectiles fired by the player and by enemies

use glam::Vec2;

use crate::consts::BULLET_TTL;

/// A projectile with a lifetime budget
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    /// Game units per second
    pub vel: Vec2,
    /// Seconds left before the bullet dies
    pub ttl: f32,
}

impl Bullet {
    pub fn new(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            ttl: BULLET_TTL,
        }
    }

    /// Bullet with a custom lifetime (long-range sniper shots)
    pub fn with_ttl(pos: Vec2, vel: Vec2, ttl: f32) -> Self {
        Self { pos, vel, ttl }
    }

    /// Advance position and spend lifetime
    pub fn update(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        self.ttl -= dt;
    }

    /// Dead once the budget is spent or it has left the arena
    pub fn is_alive(&self) -> bool {
        self.ttl > 0.0 && self.pos.x.abs() <= 1.0 && self.pos.y.abs() <= 1.0
    }
}
