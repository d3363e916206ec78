//! Shape Invaders - a wave-based arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, waves, economies)
//! - `snapshot`: Read-only render contract consumed by an external renderer
//! - `session`: Menu/Playing/GameOver lifecycle around the simulation
//! - `highscores`: High score persistence
//! - `settings`: User configuration

pub mod highscores;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;

pub use highscores::HighScore;
pub use session::Session;
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Simulation rate (one tick per rendered frame)
    pub const TICK_RATE: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / TICK_RATE as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play area dimensions (origin top-left, y grows downward)
    pub const ARENA_WIDTH: f32 = 1024.0;
    pub const ARENA_HEIGHT: f32 = 768.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 20.0;
    pub const PLAYER_BASE_SPEED: f32 = 300.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    /// Distance of the spawn point from the bottom edge
    pub const PLAYER_SPAWN_INSET: f32 = 100.0;

    /// Projectile defaults
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    pub const PLAYER_BULLET_SPEED: f32 = 600.0;
    pub const BULLET_BASE_DAMAGE: f32 = 10.0;
    /// Damage factor for bullets that are not the pattern's center bullet
    pub const OFF_CENTER_DAMAGE_FACTOR: f32 = 0.8;

    /// Damage the player takes from any enemy projectile
    pub const ENEMY_HIT_DAMAGE: f32 = 10.0;
    /// Invulnerability frames granted after a hit
    pub const HIT_IFRAMES: u32 = 60;
}

/// Unit vector for a heading in degrees (0 = +x, 90 = +y)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Heading in degrees from `from` toward `to`
#[inline]
pub fn heading_between(from: Vec2, to: Vec2) -> f32 {
    let offset = to - from;
    offset.y.atan2(offset.x).to_degrees()
}

/// Circle-circle overlap test (strict: touching circles do not overlap)
#[inline]
pub fn circles_overlap(a: Vec2, a_radius: f32, b: Vec2, b_radius: f32) -> bool {
    a.distance(b) < a_radius + b_radius
}

/// Whether a point lies inside the play area (edges inclusive)
#[inline]
pub fn in_arena(pos: Vec2) -> bool {
    (0.0..=consts::ARENA_WIDTH).contains(&pos.x) && (0.0..=consts::ARENA_HEIGHT).contains(&pos.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_vector_axes() {
        let right = heading_vector(0.0);
        assert!((right - Vec2::X).length() < 1e-5);
        let down = heading_vector(90.0);
        assert!((down - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_heading_between() {
        let h = heading_between(Vec2::new(10.0, 10.0), Vec2::new(10.0, 0.0));
        assert!((h - -90.0).abs() < 1e-4);
    }

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
    }

    #[test]
    fn test_in_arena_edges() {
        assert!(in_arena(Vec2::new(0.0, 0.0)));
        assert!(in_arena(Vec2::new(consts::ARENA_WIDTH, consts::ARENA_HEIGHT)));
        assert!(!in_arena(Vec2::new(-0.1, 10.0)));
        assert!(!in_arena(Vec2::new(10.0, consts::ARENA_HEIGHT + 0.1)));
    }
}
