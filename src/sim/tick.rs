//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;

use super::collision::{resolve_combat, resolve_pickups};
use super::player::{Directions, UltimateEffect};
use super::state::{GameEvent, GamePhase, GameState};
use super::upgrades::{UpgradeKind, UpgradeLedger};
use super::wave::unlock_for_wave;
use crate::consts::*;

/// Enemies closer than this make the autopilot back off
const AUTOPILOT_DANGER_RADIUS: f32 = 160.0;
/// Enemy shots closer than this make the autopilot dodge
const AUTOPILOT_SHOT_RADIUS: f32 = 90.0;
/// Shots this close trigger a dash
const AUTOPILOT_DASH_RADIUS: f32 = 45.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held movement keys
    pub directions: Directions,
    /// Dash modifier held
    pub dash: bool,
    /// Aim point in arena coordinates (mouse)
    pub aim: Option<Vec2>,
    /// Trigger held
    pub shoot: bool,
    /// Fire the ultimate
    pub ultimate: bool,
    /// Equip the shape in this unlocked slot
    pub select_shape: Option<usize>,
    /// Open or close the upgrade menu
    pub toggle_upgrades: bool,
    /// Buy an upgrade (only while the menu is open)
    pub purchase: Option<UpgradeKind>,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Same held state with one-shot commands cleared, for repeated substeps
    pub fn held_only(&self) -> Self {
        Self {
            ultimate: false,
            select_shape: None,
            toggle_upgrades: false,
            purchase: None,
            ..self.clone()
        }
    }
}

/// Advance the game state by one fixed timestep.
///
/// `state.events` is cleared first, so afterwards it holds only this tick's
/// events. Callers that need the full history drain it after every tick.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();
    if state.phase != GamePhase::Playing {
        return;
    }

    let mut input = input.clone();
    if input.idle_mode {
        autopilot(state, &mut input);
    }

    if input.toggle_upgrades {
        state.upgrade_menu_open = !state.upgrade_menu_open;
    }

    // Frozen while shopping
    if state.upgrade_menu_open {
        if let Some(kind) = input.purchase {
            purchase(state, kind);
        }
        return;
    }

    state.time_ticks += 1;

    // Wave director: spawn
    let live = state.enemies.len();
    let player_pos = state.player.pos;
    if let Some(order) = state.waves.spawn_step(live, player_pos, &mut state.rng) {
        state.spawn_enemy(order.class, order.pos);
    }

    update_player(state, &input, dt);

    // Enemies act on the player's new position
    let player_pos = state.player.pos;
    for enemy in &mut state.enemies {
        enemy.update(player_pos, dt, &mut state.enemy_projectiles);
    }
    for shot in &mut state.enemy_projectiles {
        shot.advance(dt);
    }

    resolve_combat(state);
    if state.phase != GamePhase::Playing {
        return;
    }

    state.combo.update();
    resolve_pickups(state);

    // Wave director: next wave once the arena is clear
    if let Some(wave) = state.waves.try_start(state.enemies.len()) {
        state.events.push(GameEvent::WaveStarted { wave });
        if let Some(shape) = unlock_for_wave(wave) {
            if state.player.unlock(shape) {
                log::info!("Unlocked {shape:?}");
                state.events.push(GameEvent::ShapeUnlocked { shape });
            }
        }
    }

    state.normalize_order();
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;

    if let Some(slot) = input.select_shape {
        player.select_shape(slot);
    }
    player.move_by(input.directions, input.dash, dt);
    if let Some(aim) = input.aim {
        player.aim_at(aim);
    }
    if input.ultimate {
        if let Some(effect) = player.try_ultimate() {
            log::debug!("Ultimate {effect:?}");
            state.events.push(GameEvent::UltimateFired { effect });
        }
    }
    if input.shoot {
        player.try_shoot();
    }
    if let Some(kind) = player.update_timers() {
        state.events.push(GameEvent::PowerUpExpired { kind });
    }
    player.advance_projectiles(dt);
}

fn purchase(state: &mut GameState, kind: UpgradeKind) {
    match state.upgrades.purchase(kind, &mut state.player) {
        Ok(cost) => state.events.push(GameEvent::UpgradePurchased { kind, cost }),
        Err(error) => {
            log::debug!("Purchase refused: {error}");
            state.events.push(GameEvent::PurchaseRejected { kind, error });
        }
    }
}

/// Direction keys approximating a desired movement vector
fn directions_toward(v: Vec2) -> Directions {
    const DEADZONE: f32 = 0.3;
    let v = v.normalize_or_zero();
    Directions {
        up: v.y < -DEADZONE,
        down: v.y > DEADZONE,
        left: v.x < -DEADZONE,
        right: v.x > DEADZONE,
    }
}

fn first_affordable(upgrades: &UpgradeLedger, score: u64) -> Option<UpgradeKind> {
    UpgradeKind::ALL
        .into_iter()
        .find(|&kind| upgrades.can_afford(kind, score))
}

/// Demo AI: fight the nearest enemy, keep distance, dodge shots,
/// grab power-ups when it is quiet and spend score on upgrades
fn autopilot(state: &GameState, input: &mut TickInput) {
    let player = &state.player;

    // Shopping first: the menu freezes the world
    let affordable = first_affordable(&state.upgrades, player.score);
    if state.upgrade_menu_open {
        input.purchase = affordable;
        input.toggle_upgrades = affordable.is_none();
        return;
    }
    if affordable.is_some() {
        input.toggle_upgrades = true;
        return;
    }

    let nearest = state.enemies.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .total_cmp(&b.pos.distance_squared(player.pos))
    });

    if let Some(enemy) = nearest {
        input.aim = Some(enemy.pos);
        input.shoot = true;
    }

    // Back away from everything that is too close
    let mut flee = Vec2::ZERO;
    for enemy in &state.enemies {
        let away = player.pos - enemy.pos;
        if away.length() < AUTOPILOT_DANGER_RADIUS + enemy.size() {
            flee += away.normalize_or_zero();
        }
    }
    let mut dash = false;
    for shot in &state.enemy_projectiles {
        let away = player.pos - shot.pos;
        let distance = away.length();
        if distance < AUTOPILOT_SHOT_RADIUS {
            // Sidestep across the shot's path
            let side = shot.velocity().perp().normalize_or_zero();
            let sign = if side.dot(away) >= 0.0 { 1.0 } else { -1.0 };
            flee += side * sign;
            dash |= distance < AUTOPILOT_DASH_RADIUS;
        }
    }

    let movement = if flee != Vec2::ZERO {
        flee
    } else if let Some(power_up) = state.power_ups.iter().min_by(|a, b| {
        a.pos
            .distance_squared(player.pos)
            .total_cmp(&b.pos.distance_squared(player.pos))
    }) {
        power_up.pos - player.pos
    } else {
        // Drift back toward the spawn point to keep room to maneuver
        let home = Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0);
        let offset = home - player.pos;
        if offset.length() > 40.0 { offset } else { Vec2::ZERO }
    };
    input.directions = directions_toward(movement);
    input.dash = dash;

    input.ultimate = player.ultimate_ready() && player.shape.ultimate() != UltimateEffect::Inert;

    // Prefer the shape with the most bullets
    let widest = player
        .unlocked
        .iter()
        .enumerate()
        .max_by_key(|(_, shape)| shape.pattern().bullet_count())
        .map(|(slot, _)| slot);
    if let Some(slot) = widest {
        if player.unlocked[slot] != player.shape {
            input.select_shape = Some(slot);
        }
    }
}
