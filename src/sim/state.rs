//! Game state and core simulation types
//!
//! Everything a running session mutates lives here. All randomness comes
//! from the one seeded PRNG so two states built from the same seed and fed
//! the same inputs stay identical.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::combo::ComboState;
use super::enemy::{Enemy, EnemyClass};
use super::player::{Player, Shape, UltimateEffect};
use super::powerup::{PowerUp, PowerUpKind};
use super::projectile::Projectile;
use super::upgrades::{PurchaseError, UpgradeKind, UpgradeLedger};
use super::wave::{WavePhase, WaveState};

/// Session-level phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GamePhase {
    /// Title screen, simulation idle
    Menu,
    /// Active gameplay
    Playing,
    /// Player died
    GameOver,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WaveStarted { wave: u32 },
    ShapeUnlocked { shape: Shape },
    EnemySpawned { id: u32, class: EnemyClass },
    PlayerHit { damage: f32, health: f32 },
    PlayerDied { score: u64 },
    EnemyKilled { id: u32, class: EnemyClass, points: u64, pos: Vec2 },
    PowerUpDropped { id: u32, kind: PowerUpKind, pos: Vec2 },
    PowerUpCollected { kind: PowerUpKind },
    PowerUpExpired { kind: PowerUpKind },
    UltimateFired { effect: UltimateEffect },
    UpgradePurchased { kind: UpgradeKind, cost: u64 },
    PurchaseRejected { kind: UpgradeKind, error: PurchaseError },
}

/// Complete world state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the PRNG was built from
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter (gameplay ticks only)
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Upgrade menu open: the world is frozen, only purchases are processed
    pub upgrade_menu_open: bool,
    pub player: Player,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// Shots fired by enemies; they outlive their shooter
    pub enemy_projectiles: Vec<Projectile>,
    /// Power-ups on the ground (sorted by id)
    pub power_ups: Vec<PowerUp>,
    pub combo: ComboState,
    pub waves: WaveState,
    pub upgrades: UpgradeLedger,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a fresh state on the menu screen
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Menu,
            upgrade_menu_open: false,
            player: Player::new(),
            enemies: Vec::new(),
            enemy_projectiles: Vec::new(),
            power_ups: Vec::new(),
            combo: ComboState::default(),
            waves: WaveState::default(),
            upgrades: UpgradeLedger::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Create a fresh state already in play
    pub fn new_playing(seed: u64) -> Self {
        let mut state = Self::new(seed);
        state.phase = GamePhase::Playing;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Place an enemy and return its id
    pub fn spawn_enemy(&mut self, class: EnemyClass, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.enemies.push(Enemy::new(id, class, pos));
        self.events.push(GameEvent::EnemySpawned { id, class });
        id
    }

    /// Drop a power-up and return its id
    pub fn spawn_power_up(&mut self, kind: PowerUpKind, pos: Vec2) -> u32 {
        let id = self.next_entity_id();
        self.power_ups.push(PowerUp::new(id, kind, pos));
        self.events.push(GameEvent::PowerUpDropped { id, kind, pos });
        id
    }

    pub fn wave_phase(&self) -> WavePhase {
        self.waves.phase(self.enemies.len())
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.power_ups.sort_by_key(|p| p.id);
    }
}
