//! Render contract: a read-only view of the world for one frame
//!
//! Building a snapshot never mutates the simulation. The renderer draws
//! from this alone and never touches `GameState`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::enemy::EnemyClass;
use crate::sim::player::Shape;
use crate::sim::powerup::PowerUpKind;
use crate::sim::projectile::{ProjectileColor, Side};
use crate::sim::state::{GamePhase, GameState};
use crate::sim::upgrades::UpgradeKind;
use crate::sim::wave::WavePhase;

/// Ticks per on/off half-cycle of the invulnerability flash
const FLASH_HALF_PERIOD: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerVisual {
    Normal,
    /// Blinking while invulnerable; `flash_on` says whether to draw this frame
    Invulnerable { flash_on: bool },
    PoweredUp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub heading: f32,
    pub size: f32,
    pub shape: Shape,
    pub visual: PlayerVisual,
    pub power_up: Option<PowerUpKind>,
    pub health_fraction: f32,
    pub power_up_fraction: f32,
    pub ultimate_fraction: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub class: EnemyClass,
    pub size: f32,
    pub health_fraction: f32,
    /// 1-3 for bosses
    pub boss_phase: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub color: ProjectileColor,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerUpView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub kind: PowerUpKind,
}

/// One line of the upgrade menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeRow {
    pub kind: UpgradeKind,
    pub level: u32,
    pub max_level: u32,
    pub cost: u64,
    pub affordable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudView {
    pub score: u64,
    pub high_score: u64,
    pub wave: u32,
    pub wave_phase: WavePhase,
    pub health: f32,
    pub max_health: f32,
    pub combo: u32,
    pub multiplier: f32,
    pub unlocked_shapes: Vec<Shape>,
    /// Present while the upgrade menu is open
    pub upgrade_menu: Option<Vec<UpgradeRow>>,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub phase: GamePhase,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    /// Player shots first, then enemy shots
    pub projectiles: Vec<ProjectileView>,
    pub power_ups: Vec<PowerUpView>,
    pub hud: HudView,
}

/// Build a snapshot of the current state
pub fn build_snapshot(state: &GameState, high_score: u64, reduced_flashing: bool) -> RenderSnapshot {
    RenderSnapshot {
        tick: state.time_ticks,
        phase: state.phase,
        player: build_player(state, reduced_flashing),
        enemies: state
            .enemies
            .iter()
            .map(|e| EnemyView {
                id: e.id,
                pos: e.pos,
                class: e.class(),
                size: e.size(),
                health_fraction: e.health_fraction(),
                boss_phase: e.boss_phase().map(|p| p.number()),
            })
            .collect(),
        projectiles: state
            .player
            .projectiles
            .iter()
            .chain(&state.enemy_projectiles)
            .map(|p| ProjectileView {
                pos: p.pos,
                radius: p.radius,
                color: p.color,
                side: p.side,
            })
            .collect(),
        power_ups: state
            .power_ups
            .iter()
            .map(|p| PowerUpView {
                id: p.id,
                pos: p.pos,
                radius: p.radius,
                kind: p.kind,
            })
            .collect(),
        hud: build_hud(state, high_score),
    }
}

fn build_player(state: &GameState, reduced_flashing: bool) -> PlayerView {
    let player = &state.player;
    let visual = if player.iframes > 0 {
        let flash_on = reduced_flashing || (player.iframes / FLASH_HALF_PERIOD) % 2 == 0;
        PlayerVisual::Invulnerable { flash_on }
    } else if player.power_up.is_some() {
        PlayerVisual::PoweredUp
    } else {
        PlayerVisual::Normal
    };

    PlayerView {
        pos: player.pos,
        heading: player.heading,
        size: player.size,
        shape: player.shape,
        visual,
        power_up: player.power_up.map(|p| p.kind),
        health_fraction: player.health_fraction(),
        power_up_fraction: player.power_up_fraction(),
        ultimate_fraction: player.ultimate_fraction(),
    }
}

fn build_hud(state: &GameState, high_score: u64) -> HudView {
    let player = &state.player;
    let upgrade_menu = state.upgrade_menu_open.then(|| {
        state
            .upgrades
            .tracks()
            .iter()
            .map(|track| UpgradeRow {
                kind: track.kind,
                level: track.level,
                max_level: track.max_level(),
                cost: track.cost,
                affordable: state.upgrades.can_afford(track.kind, player.score),
            })
            .collect()
    });

    HudView {
        score: player.score,
        high_score: high_score.max(player.score),
        wave: state.waves.wave,
        wave_phase: state.wave_phase(),
        health: player.health.max(0.0),
        max_health: player.max_health,
        combo: state.combo.count,
        multiplier: state.combo.multiplier(),
        unlocked_shapes: player.unlocked.clone(),
        upgrade_menu,
    }
}
