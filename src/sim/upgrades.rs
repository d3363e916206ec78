//! Score-funded permanent upgrades

use std::fmt;

use serde::{Deserialize, Serialize};

use super::player::{MIN_SHOOT_COOLDOWN, Player};

pub const HEALTH_UPGRADE_AMOUNT: f32 = 25.0;
pub const SPEED_UPGRADE_AMOUNT: f32 = 30.0;
pub const DAMAGE_UPGRADE_AMOUNT: f32 = 0.2;
pub const FIRE_RATE_UPGRADE_TICKS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Health,
    Speed,
    Damage,
    FireRate,
}

impl UpgradeKind {
    pub const ALL: [UpgradeKind; 4] = [
        UpgradeKind::Health,
        UpgradeKind::Speed,
        UpgradeKind::Damage,
        UpgradeKind::FireRate,
    ];

    pub fn initial_cost(self) -> u64 {
        match self {
            UpgradeKind::Health => 500,
            UpgradeKind::Speed => 400,
            UpgradeKind::Damage => 600,
            UpgradeKind::FireRate => 450,
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            UpgradeKind::Health => 5,
            UpgradeKind::Speed => 3,
            UpgradeKind::Damage => 3,
            UpgradeKind::FireRate => 4,
        }
    }

    /// Cost after `level` purchases: floor(initial * 1.5^level), in exact integers
    pub fn cost_at(self, level: u32) -> u64 {
        self.initial_cost() * 3u64.pow(level) / 2u64.pow(level)
    }

    fn index(self) -> usize {
        match self {
            UpgradeKind::Health => 0,
            UpgradeKind::Speed => 1,
            UpgradeKind::Damage => 2,
            UpgradeKind::FireRate => 3,
        }
    }

    fn apply(self, player: &mut Player) {
        match self {
            UpgradeKind::Health => {
                player.max_health += HEALTH_UPGRADE_AMOUNT;
                player.health = player.max_health;
            }
            UpgradeKind::Speed => player.base_speed += SPEED_UPGRADE_AMOUNT,
            UpgradeKind::Damage => player.damage_multiplier += DAMAGE_UPGRADE_AMOUNT,
            UpgradeKind::FireRate => {
                player.base_shoot_cooldown = player
                    .base_shoot_cooldown
                    .saturating_sub(FIRE_RATE_UPGRADE_TICKS)
                    .max(MIN_SHOOT_COOLDOWN);
            }
        }
    }
}

impl fmt::Display for UpgradeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UpgradeKind::Health => "health",
            UpgradeKind::Speed => "speed",
            UpgradeKind::Damage => "damage",
            UpgradeKind::FireRate => "fire rate",
        };
        f.write_str(name)
    }
}

/// Why a purchase was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PurchaseError {
    InsufficientScore { cost: u64, score: u64 },
    MaxLevel { kind: UpgradeKind },
}

impl fmt::Display for PurchaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PurchaseError::InsufficientScore { cost, score } => {
                write!(f, "Upgrade costs {cost} but score is {score}")
            }
            PurchaseError::MaxLevel { kind } => write!(f, "The {kind} upgrade is at max level"),
        }
    }
}

impl std::error::Error for PurchaseError {}

/// Level and price of one upgrade track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeTrack {
    pub kind: UpgradeKind,
    pub level: u32,
    pub cost: u64,
}

impl UpgradeTrack {
    fn new(kind: UpgradeKind) -> Self {
        Self {
            kind,
            level: 0,
            cost: kind.initial_cost(),
        }
    }

    pub fn max_level(&self) -> u32 {
        self.kind.max_level()
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.kind.max_level()
    }
}

/// All upgrade tracks for a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeLedger {
    tracks: [UpgradeTrack; 4],
}

impl Default for UpgradeLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl UpgradeLedger {
    pub fn new() -> Self {
        Self {
            tracks: UpgradeKind::ALL.map(UpgradeTrack::new),
        }
    }

    pub fn track(&self, kind: UpgradeKind) -> &UpgradeTrack {
        &self.tracks[kind.index()]
    }

    pub fn tracks(&self) -> &[UpgradeTrack] {
        &self.tracks
    }

    /// Whether a purchase would currently succeed
    pub fn can_afford(&self, kind: UpgradeKind, score: u64) -> bool {
        let track = self.track(kind);
        !track.is_maxed() && score >= track.cost
    }

    /// Buy one level, paying from the player's score. Mutates nothing on rejection.
    pub fn purchase(&mut self, kind: UpgradeKind, player: &mut Player) -> Result<u64, PurchaseError> {
        let track = &mut self.tracks[kind.index()];
        if track.is_maxed() {
            return Err(PurchaseError::MaxLevel { kind });
        }
        if player.score < track.cost {
            return Err(PurchaseError::InsufficientScore {
                cost: track.cost,
                score: player.score,
            });
        }

        let paid = track.cost;
        player.score -= paid;
        track.level += 1;
        track.cost = kind.cost_at(track.level);
        kind.apply(player);
        log::debug!("Bought {kind} upgrade level {} for {paid}", track.level);
        Ok(paid)
    }
}
