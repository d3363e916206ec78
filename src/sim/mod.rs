//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input-device or file dependencies

pub mod collision;
pub mod combo;
pub mod enemy;
pub mod player;
pub mod powerup;
pub mod projectile;
pub mod state;
pub mod tick;
pub mod upgrades;
pub mod wave;

pub use combo::ComboState;
pub use enemy::{BossPhase, Enemy, EnemyClass, EnemyKind};
pub use player::{BulletPattern, Directions, Player, Shape, UltimateEffect};
pub use powerup::{ActivePowerUp, PowerUp, PowerUpKind};
pub use projectile::{Projectile, ProjectileColor, Side};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use upgrades::{PurchaseError, UpgradeKind, UpgradeLedger};
pub use wave::{WavePhase, WaveState};
