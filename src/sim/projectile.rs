//! Projectiles: moving points with a fixed heading
//!
//! Projectiles only know which side fired them. Player shots live in the
//! player's list, enemy shots in a shared pool on `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::{heading_vector, in_arena};

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

/// Color tag for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileColor {
    White,
    Blue,
    Purple,
    Red,
}

/// A single shot in flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    /// Heading in degrees (0 = +x, 90 = down)
    pub heading: f32,
    /// Units per second
    pub speed: f32,
    pub damage: f32,
    pub radius: f32,
    pub color: ProjectileColor,
    pub side: Side,
}

impl Projectile {
    /// A standard player bullet
    pub fn player(pos: Vec2, heading: f32, damage: f32) -> Self {
        Self {
            pos,
            heading,
            speed: PLAYER_BULLET_SPEED,
            damage,
            radius: PROJECTILE_RADIUS,
            color: ProjectileColor::White,
            side: Side::Player,
        }
    }

    /// An enemy shot
    pub fn enemy(pos: Vec2, heading: f32, speed: f32, color: ProjectileColor) -> Self {
        Self {
            pos,
            heading,
            speed,
            damage: ENEMY_HIT_DAMAGE,
            radius: PROJECTILE_RADIUS,
            color,
            side: Side::Enemy,
        }
    }

    /// Velocity vector derived from heading and speed
    #[inline]
    pub fn velocity(&self) -> Vec2 {
        heading_vector(self.heading) * self.speed
    }

    /// Advance along the heading
    pub fn advance(&mut self, dt: f32) {
        self.pos += self.velocity() * dt;
    }

    /// True once the center has left the play area
    #[inline]
    pub fn out_of_bounds(&self) -> bool {
        !in_arena(self.pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_follows_heading() {
        let mut p = Projectile::player(Vec2::new(100.0, 100.0), 90.0, 10.0);
        p.advance(SIM_DT);
        // 600 u/s at 60 Hz = 10 units straight down
        assert!((p.pos.x - 100.0).abs() < 1e-3);
        assert!((p.pos.y - 110.0).abs() < 1e-3);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut p = Projectile::enemy(Vec2::new(2.0, 50.0), 180.0, 420.0, ProjectileColor::Blue);
        assert!(!p.out_of_bounds());
        p.advance(SIM_DT);
        assert!(p.out_of_bounds());
    }

    #[test]
    fn test_enemy_shot_uses_fixed_damage() {
        let p = Projectile::enemy(Vec2::ZERO, 0.0, 300.0, ProjectileColor::Purple);
        assert_eq!(p.side, Side::Enemy);
        assert_eq!(p.damage, ENEMY_HIT_DAMAGE);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_projectile_travels_speed_times_dt(
                x in 50.0f32..900.0,
                y in 50.0f32..700.0,
                heading in -180.0f32..180.0,
            ) {
                let start = Vec2::new(x, y);
                let mut p = Projectile::player(start, heading, 10.0);
                p.advance(SIM_DT);
                let travelled = p.pos.distance(start);
                prop_assert!((travelled - PLAYER_BULLET_SPEED * SIM_DT).abs() < 1e-2);
            }
        }
    }
}
