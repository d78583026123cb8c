//! Projectile advancement and bullet/actor collision resolution
//!
//! Hits use the axis-aligned `within_box` test against the target's size.
//! Dead bullets are culled only after the frame's hit checks, so a bullet
//! can still score on the frame it expires.

use super::actor::{Enemy, EnemyKind, Player};
use super::bullet::Bullet;
use crate::within_box;

/// Outcome of the enemy-bullet pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyFire {
    /// No bullet touched the player
    Missed,
    /// A bullet reached the player; remaining bullets were not processed
    PlayerHit,
}

/// Outcome of the player-bullet pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerFire {
    /// Bullets that struck an enemy (and were consumed)
    pub hits: usize,
    /// Enemies destroyed this frame
    pub destroyed: Vec<EnemyKind>,
}

/// Advance enemy bullets in order and test each against the player.
///
/// Stops at the first hit: later bullets are left exactly as they were, and
/// only the bullets already advanced are culled.
pub fn resolve_enemy_bullets(bullets: &mut Vec<Bullet>, player: &Player, dt: f32) -> EnemyFire {
    let hit_at = bullets.iter_mut().position(|bullet| {
        bullet.update(dt);
        within_box(bullet.pos, player.pos, player.size)
    });

    let processed = hit_at.map_or(bullets.len(), |i| i + 1);
    let mut index = 0;
    bullets.retain(|bullet| {
        let keep = index >= processed || bullet.is_alive();
        index += 1;
        keep
    });

    match hit_at {
        Some(_) => EnemyFire::PlayerHit,
        None => EnemyFire::Missed,
    }
}

/// Advance player bullets, then resolve hits against the roster.
///
/// A bullet hits at most one enemy (the first in roster order) and is
/// consumed by it; the enemy is removed once its hit points run out.
pub fn resolve_player_bullets(
    bullets: &mut Vec<Bullet>,
    enemies: &mut Vec<Enemy>,
    dt: f32,
) -> PlayerFire {
    let mut outcome = PlayerFire::default();

    for bullet in bullets.iter_mut() {
        bullet.update(dt);
    }

    bullets.retain(|bullet| {
        let Some(index) = enemies
            .iter()
            .position(|enemy| within_box(bullet.pos, enemy.pos, enemy.size))
        else {
            return bullet.is_alive();
        };

        outcome.hits += 1;
        if enemies[index].hit() {
            let enemy = enemies.remove(index);
            outcome.destroyed.push(enemy.kind);
        }
        false
    });

    outcome
}
