//! Wave director: wave start, enemy spawning and shape unlocks

use glam::Vec2;
use rand::Rng;
use rand::distr::Distribution;
use rand::distr::weighted::WeightedIndex;
use serde::{Deserialize, Serialize};

use super::enemy::EnemyClass;
use super::player::Shape;
use crate::consts::*;

/// Delay before the first spawn of a wave
pub const WAVE_START_DELAY: u32 = 60;
/// Delay between spawns
pub const SPAWN_INTERVAL: u32 = 30;
/// Every Nth wave is a boss wave
pub const BOSS_WAVE_INTERVAL: u32 = 5;
pub const BOSS_SPAWN: Vec2 = Vec2::new(ARENA_WIDTH / 2.0, 50.0);
/// Spawn ring around the player
pub const SPAWN_DISTANCE_MIN: f32 = 300.0;
pub const SPAWN_DISTANCE_MAX: f32 = 400.0;
/// Spawns are clamped this far inside the arena
pub const SPAWN_MARGIN: f32 = 50.0;

const REGULAR_CLASSES: [EnemyClass; 3] = [EnemyClass::Basic, EnemyClass::Fast, EnemyClass::Shooter];
const REGULAR_WEIGHTS: [f32; 3] = [0.6, 0.25, 0.15];

/// Where the director currently is in the wave cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WavePhase {
    /// No wave started yet
    Idle,
    /// Wave active, spawn timer running
    Spawning,
    /// Spawning finished, enemies still alive
    Engaged,
    /// Enemies gone, next wave not started
    Cleared,
}

/// One enemy the director wants placed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnOrder {
    pub class: EnemyClass,
    pub pos: Vec2,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaveState {
    pub wave: u32,
    pub spawn_timer: u32,
    pub in_progress: bool,
    pub boss_spawned: bool,
    /// Regular enemies spawned this wave
    pub spawned: u32,
}

/// Regular enemies spawned over a whole wave
pub fn wave_quota(wave: u32) -> u32 {
    4 + 2 * wave
}

/// Cap on simultaneous live enemies during a regular wave
pub fn live_cap(wave: u32) -> usize {
    2 * wave as usize
}

pub fn is_boss_wave(wave: u32) -> bool {
    wave > 0 && wave % BOSS_WAVE_INTERVAL == 0
}

/// Shape unlocked when the given wave starts
pub fn unlock_for_wave(wave: u32) -> Option<Shape> {
    Shape::ALL
        .into_iter()
        .find(|shape| shape.unlock_wave() > 0 && shape.unlock_wave() == wave)
}

impl WaveState {
    pub fn phase(&self, live_enemies: usize) -> WavePhase {
        if self.in_progress {
            WavePhase::Spawning
        } else if live_enemies > 0 {
            WavePhase::Engaged
        } else if self.wave == 0 {
            WavePhase::Idle
        } else {
            WavePhase::Cleared
        }
    }

    /// Start the next wave if the arena is clear. Returns the new wave number.
    pub fn try_start(&mut self, live_enemies: usize) -> Option<u32> {
        if self.in_progress || live_enemies > 0 {
            return None;
        }
        self.wave += 1;
        self.in_progress = true;
        self.spawn_timer = WAVE_START_DELAY;
        self.boss_spawned = false;
        self.spawned = 0;
        log::info!("Wave {} started", self.wave);
        Some(self.wave)
    }

    /// Run the spawn timer for one tick, returning an enemy to place if one is due
    pub fn spawn_step(
        &mut self,
        live_enemies: usize,
        player_pos: Vec2,
        rng: &mut impl Rng,
    ) -> Option<SpawnOrder> {
        if self.spawn_timer > 0 {
            self.spawn_timer -= 1;
            return None;
        }
        if !self.in_progress {
            return None;
        }
        self.spawn_timer = SPAWN_INTERVAL;

        if is_boss_wave(self.wave) {
            if self.boss_spawned {
                self.in_progress = false;
                return None;
            }
            self.boss_spawned = true;
            self.in_progress = false;
            log::info!("Boss spawned on wave {}", self.wave);
            return Some(SpawnOrder {
                class: EnemyClass::Boss,
                pos: BOSS_SPAWN,
            });
        }

        if live_enemies >= live_cap(self.wave) {
            return None;
        }

        let order = SpawnOrder {
            class: pick_regular_class(rng),
            pos: spawn_point(player_pos, rng),
        };
        self.spawned += 1;
        if self.spawned >= wave_quota(self.wave) {
            self.in_progress = false;
        }
        Some(order)
    }
}

fn spawn_point(player_pos: Vec2, rng: &mut impl Rng) -> Vec2 {
    let angle = rng.random_range(0.0..std::f32::consts::TAU);
    let distance = rng.random_range(SPAWN_DISTANCE_MIN..SPAWN_DISTANCE_MAX);
    let pos = player_pos + Vec2::new(angle.cos(), angle.sin()) * distance;
    Vec2::new(
        pos.x.clamp(SPAWN_MARGIN, ARENA_WIDTH - SPAWN_MARGIN),
        pos.y.clamp(SPAWN_MARGIN, ARENA_HEIGHT - SPAWN_MARGIN),
    )
}

fn pick_regular_class(rng: &mut impl Rng) -> EnemyClass {
    match WeightedIndex::new(REGULAR_WEIGHTS) {
        Ok(dist) => REGULAR_CLASSES[dist.sample(rng)],
        Err(_) => EnemyClass::Basic,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn player_pos() -> Vec2 {
        Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - PLAYER_SPAWN_INSET)
    }

    #[test]
    fn test_start_requires_clear_arena() {
        let mut w = WaveState::default();
        assert_eq!(w.phase(0), WavePhase::Idle);
        assert_eq!(w.try_start(3), None);
        assert_eq!(w.try_start(0), Some(1));
        assert_eq!(w.spawn_timer, WAVE_START_DELAY);
        assert_eq!(w.phase(0), WavePhase::Spawning);
        assert_eq!(w.try_start(0), None);
    }

    #[test]
    fn test_first_spawn_after_delay() {
        let mut w = WaveState::default();
        let mut rng = Pcg32::seed_from_u64(3);
        w.try_start(0);
        for _ in 0..WAVE_START_DELAY {
            assert!(w.spawn_step(0, player_pos(), &mut rng).is_none());
        }
        let order = w.spawn_step(0, player_pos(), &mut rng).expect("spawn due");
        assert_ne!(order.class, EnemyClass::Boss);
        assert_eq!(w.spawn_timer, SPAWN_INTERVAL);
    }

    #[test]
    fn test_live_cap_blocks_spawns() {
        let mut w = WaveState {
            wave: 2,
            in_progress: true,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(3);
        assert!(w.spawn_step(4, player_pos(), &mut rng).is_none());
        assert_eq!(w.spawned, 0);
        assert!(w.in_progress);
    }

    #[test]
    fn test_regular_wave_ends_after_quota() {
        let mut w = WaveState {
            wave: 1,
            in_progress: true,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(9);
        let mut spawned = 0;
        for _ in 0..10_000 {
            if w.spawn_step(0, player_pos(), &mut rng).is_some() {
                spawned += 1;
            }
            if !w.in_progress {
                break;
            }
        }
        assert_eq!(spawned, wave_quota(1));
        assert_eq!(w.phase(1), WavePhase::Engaged);
        assert_eq!(w.phase(0), WavePhase::Cleared);
    }

    #[test]
    fn test_boss_wave_spawns_single_boss() {
        let mut w = WaveState {
            wave: 4,
            ..Default::default()
        };
        let mut rng = Pcg32::seed_from_u64(5);
        assert_eq!(w.try_start(0), Some(5));
        let mut orders = Vec::new();
        for _ in 0..600 {
            if let Some(order) = w.spawn_step(orders.len(), player_pos(), &mut rng) {
                orders.push(order);
            }
        }
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].class, EnemyClass::Boss);
        assert_eq!(orders[0].pos, BOSS_SPAWN);
        assert!(!w.in_progress);
    }

    #[test]
    fn test_spawn_points_stay_in_margin() {
        let mut rng = Pcg32::seed_from_u64(11);
        for _ in 0..1000 {
            let p = spawn_point(Vec2::new(30.0, 30.0), &mut rng);
            assert!((SPAWN_MARGIN..=ARENA_WIDTH - SPAWN_MARGIN).contains(&p.x));
            assert!((SPAWN_MARGIN..=ARENA_HEIGHT - SPAWN_MARGIN).contains(&p.y));
        }
    }

    #[test]
    fn test_class_weights() {
        let mut rng = Pcg32::seed_from_u64(42);
        let mut counts = [0usize; 3];
        for _ in 0..10_000 {
            match pick_regular_class(&mut rng) {
                EnemyClass::Basic => counts[0] += 1,
                EnemyClass::Fast => counts[1] += 1,
                EnemyClass::Shooter => counts[2] += 1,
                EnemyClass::Boss => unreachable!(),
            }
        }
        assert!((5500..6500).contains(&counts[0]), "{counts:?}");
        assert!((2000..3000).contains(&counts[1]), "{counts:?}");
        assert!((1000..2000).contains(&counts[2]), "{counts:?}");
    }

    #[test]
    fn test_unlocks() {
        assert_eq!(unlock_for_wave(1), None);
        assert_eq!(unlock_for_wave(5), Some(Shape::Circle));
        assert_eq!(unlock_for_wave(10), Some(Shape::Square));
        assert_eq!(unlock_for_wave(15), Some(Shape::Pentagon));
        assert_eq!(unlock_for_wave(20), None);
    }
}
