//! Power-up drops and timed effects

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Chance that a killed enemy drops a power-up
pub const POWER_UP_DROP_CHANCE: f64 = 0.1;
/// Pickup radius
pub const POWER_UP_RADIUS: f32 = 15.0;
/// Duration of timed power-ups (5 seconds at 60 Hz)
pub const POWER_UP_DURATION_TICKS: u32 = 300;
/// Shoot cooldown while Rapid is active
pub const RAPID_FIRE_COOLDOWN: u32 = 5;
/// Shield: invulnerability frames and instant heal
pub const SHIELD_IFRAMES: u32 = 300;
pub const SHIELD_HEAL: f32 = 20.0;
/// Multipliers applied while Damage / Speed are active
pub const DAMAGE_BOOST: f32 = 1.5;
pub const SPEED_BOOST: f32 = 1.5;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerUpKind {
    Rapid,
    Spread,
    Shield,
    Damage,
    Speed,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Rapid,
        PowerUpKind::Spread,
        PowerUpKind::Shield,
        PowerUpKind::Damage,
        PowerUpKind::Speed,
    ];

    /// Whether the effect runs on a timer (Shield is instant)
    pub fn is_timed(self) -> bool {
        !matches!(self, PowerUpKind::Shield)
    }

    /// Uniformly random kind
    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// A power-up lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
}

impl PowerUp {
    pub fn new(id: u32, kind: PowerUpKind, pos: Vec2) -> Self {
        Self {
            id,
            kind,
            pos,
            radius: POWER_UP_RADIUS,
        }
    }
}

/// The timed power-up currently affecting the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub remaining_ticks: u32,
}

impl ActivePowerUp {
    pub fn new(kind: PowerUpKind) -> Self {
        Self {
            kind,
            remaining_ticks: POWER_UP_DURATION_TICKS,
        }
    }

    /// Remaining time as a 0-1 gauge
    pub fn fraction(&self) -> f32 {
        self.remaining_ticks as f32 / POWER_UP_DURATION_TICKS as f32
    }
}

/// Roll the drop for one kill. Draws the chance first, then the kind only on success.
pub fn roll_drop(rng: &mut impl Rng) -> Option<PowerUpKind> {
    if rng.random_bool(POWER_UP_DROP_CHANCE) {
        Some(PowerUpKind::random(rng))
    } else {
        None
    }
}
