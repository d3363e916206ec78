//! Enemy variants, their stats table and per-tick behavior

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{Projectile, ProjectileColor};
use crate::heading_between;

/// Shooter: volley interval and bullet speed
pub const SHOOTER_COOLDOWN: u32 = 60;
pub const SHOOTER_BULLET_SPEED: f32 = 420.0;

/// Boss: first volley delay, interval per phase
pub const BOSS_INITIAL_COOLDOWN: u32 = 30;
pub const BOSS_COOLDOWN: u32 = 60;
pub const BOSS_DESPERATE_COOLDOWN: u32 = 45;
/// Health fractions below which the boss enters phases 2 and 3
pub const BOSS_PHASE_2_BELOW: f32 = 0.6;
pub const BOSS_PHASE_3_BELOW: f32 = 0.3;

const BOSS_FAN_OFFSETS: [f32; 5] = [-20.0, -10.0, 0.0, 10.0, 20.0];
const BOSS_FAN_SPEED: f32 = 360.0;
const BOSS_RING_BULLETS: u32 = 8;
const BOSS_RING_SPEED: f32 = 300.0;
/// Degrees the ring rotates per volley
const BOSS_RING_ADVANCE: f32 = 20.0;
const BOSS_DESPERATE_STEP: usize = 30;
const BOSS_DESPERATE_SPEED: f32 = 420.0;

/// Enemy class tag, keys the stats table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyClass {
    Basic,
    Fast,
    Shooter,
    Boss,
}

/// Static per-class stats
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyStats {
    /// Units per second
    pub speed: f32,
    pub health: f32,
    /// Collision radius
    pub size: f32,
    /// Base score before the combo multiplier
    pub value: u64,
}

impl EnemyClass {
    pub fn stats(self) -> EnemyStats {
        match self {
            EnemyClass::Basic => EnemyStats {
                speed: 120.0,
                health: 30.0,
                size: 20.0,
                value: 100,
            },
            EnemyClass::Fast => EnemyStats {
                speed: 240.0,
                health: 20.0,
                size: 15.0,
                value: 150,
            },
            EnemyClass::Shooter => EnemyStats {
                speed: 90.0,
                health: 40.0,
                size: 20.0,
                value: 200,
            },
            EnemyClass::Boss => EnemyStats {
                speed: 60.0,
                health: 500.0,
                size: 40.0,
                value: 1000,
            },
        }
    }
}

/// Boss attack phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BossPhase {
    /// Aimed fan
    Fan,
    /// Rotating ring
    Ring,
    /// Full ring, faster cadence
    Desperate,
}

impl BossPhase {
    /// Phase for a health fraction. Exactly 60% is still the fan phase.
    pub fn from_health_fraction(fraction: f32) -> Self {
        if fraction < BOSS_PHASE_3_BELOW {
            BossPhase::Desperate
        } else if fraction < BOSS_PHASE_2_BELOW {
            BossPhase::Ring
        } else {
            BossPhase::Fan
        }
    }

    /// 1-based phase number for display
    pub fn number(self) -> u8 {
        match self {
            BossPhase::Fan => 1,
            BossPhase::Ring => 2,
            BossPhase::Desperate => 3,
        }
    }
}

/// Mutable boss attack state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BossState {
    pub cooldown: u32,
    pub phase: BossPhase,
    /// Ring rotation in degrees
    pub cursor: f32,
}

/// Per-variant behavior data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EnemyKind {
    Basic,
    Fast,
    Shooter { cooldown: u32 },
    Boss(BossState),
}

impl EnemyKind {
    /// Fresh variant data for a class
    pub fn for_class(class: EnemyClass) -> Self {
        match class {
            EnemyClass::Basic => EnemyKind::Basic,
            EnemyClass::Fast => EnemyKind::Fast,
            EnemyClass::Shooter => EnemyKind::Shooter {
                cooldown: SHOOTER_COOLDOWN,
            },
            EnemyClass::Boss => EnemyKind::Boss(BossState {
                cooldown: BOSS_INITIAL_COOLDOWN,
                phase: BossPhase::Fan,
                cursor: 0.0,
            }),
        }
    }

    pub fn class(&self) -> EnemyClass {
        match self {
            EnemyKind::Basic => EnemyClass::Basic,
            EnemyKind::Fast => EnemyClass::Fast,
            EnemyKind::Shooter { .. } => EnemyClass::Shooter,
            EnemyKind::Boss(_) => EnemyClass::Boss,
        }
    }
}

/// A live enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub kind: EnemyKind,
}

impl Enemy {
    pub fn new(id: u32, class: EnemyClass, pos: Vec2) -> Self {
        let stats = class.stats();
        Self {
            id,
            pos,
            health: stats.health,
            max_health: stats.health,
            kind: EnemyKind::for_class(class),
        }
    }

    #[inline]
    pub fn class(&self) -> EnemyClass {
        self.kind.class()
    }

    #[inline]
    pub fn stats(&self) -> EnemyStats {
        self.class().stats()
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.stats().size
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn boss_phase(&self) -> Option<BossPhase> {
        match self.kind {
            EnemyKind::Boss(boss) => Some(boss.phase),
            _ => None,
        }
    }

    /// Pursue the player and fire if the variant's cooldown allows.
    /// New shots are appended to `shots`; returns how many were fired.
    pub fn update(&mut self, player_pos: Vec2, dt: f32, shots: &mut Vec<Projectile>) -> usize {
        let speed = self.stats().speed;
        let offset = player_pos - self.pos;
        let distance = offset.length().max(1.0);
        self.pos += offset / distance * speed * dt;

        let fraction = self.health_fraction();
        let origin = self.pos;
        let aim = heading_between(origin, player_pos);
        let before = shots.len();

        match &mut self.kind {
            EnemyKind::Basic | EnemyKind::Fast => {}
            EnemyKind::Shooter { cooldown } => {
                *cooldown = cooldown.saturating_sub(1);
                if *cooldown == 0 {
                    shots.push(Projectile::enemy(
                        origin,
                        aim,
                        SHOOTER_BULLET_SPEED,
                        ProjectileColor::Blue,
                    ));
                    *cooldown = SHOOTER_COOLDOWN;
                }
            }
            EnemyKind::Boss(boss) => {
                boss.cooldown = boss.cooldown.saturating_sub(1);
                boss.phase = BossPhase::from_health_fraction(fraction);
                if boss.cooldown == 0 {
                    boss.fire(origin, aim, shots);
                }
            }
        }

        shots.len() - before
    }
}

impl BossState {
    fn fire(&mut self, origin: Vec2, aim: f32, shots: &mut Vec<Projectile>) {
        match self.phase {
            BossPhase::Fan => {
                for offset in BOSS_FAN_OFFSETS {
                    shots.push(Projectile::enemy(
                        origin,
                        aim + offset,
                        BOSS_FAN_SPEED,
                        ProjectileColor::Purple,
                    ));
                }
            }
            BossPhase::Ring => {
                let step = 360.0 / BOSS_RING_BULLETS as f32;
                for i in 0..BOSS_RING_BULLETS {
                    let angle = (self.cursor + i as f32 * step) % 360.0;
                    shots.push(Projectile::enemy(
                        origin,
                        angle,
                        BOSS_RING_SPEED,
                        ProjectileColor::Purple,
                    ));
                }
                self.cursor = (self.cursor + BOSS_RING_ADVANCE) % 360.0;
            }
            BossPhase::Desperate => {
                for angle in (0..360).step_by(BOSS_DESPERATE_STEP) {
                    shots.push(Projectile::enemy(
                        origin,
                        angle as f32,
                        BOSS_DESPERATE_SPEED,
                        ProjectileColor::Red,
                    ));
                }
            }
        }

        self.cooldown = match self.phase {
            BossPhase::Desperate => BOSS_DESPERATE_COOLDOWN,
            BossPhase::Fan | BossPhase::Ring => BOSS_COOLDOWN,
        };
    }
}
