//! Combat resolution
//!
//! Resolves every pairwise interaction once per tick, after all entities have
//! moved. Collections are rebuilt by filtering so a removed entity is never
//! visited again in the same tick.

use super::enemy::Enemy;
use super::player::ULTIMATE_CHARGE_PER_KILL;
use super::powerup::roll_drop;
use super::state::{GameEvent, GamePhase, GameState};
use crate::circles_overlap;

/// Run culling, hits on the player and hits on enemies, in that order
pub fn resolve_combat(state: &mut GameState) {
    cull_out_of_bounds(state);
    resolve_enemy_shots(state);
    resolve_player_shots(state);
}

/// Drop every projectile whose center left the arena
pub fn cull_out_of_bounds(state: &mut GameState) {
    state.player.projectiles.retain(|p| !p.out_of_bounds());
    state.enemy_projectiles.retain(|p| !p.out_of_bounds());
}

/// Enemy shots against the player. A touching shot is always consumed,
/// whether or not invulnerability absorbed it.
pub fn resolve_enemy_shots(state: &mut GameState) {
    let player = &mut state.player;
    let combo = &mut state.combo;
    let events = &mut state.events;

    state.enemy_projectiles.retain(|shot| {
        if !circles_overlap(shot.pos, shot.radius, player.pos, player.size) {
            return true;
        }
        if player.take_hit(shot.damage) {
            combo.break_chain();
            events.push(GameEvent::PlayerHit {
                damage: shot.damage,
                health: player.health,
            });
        }
        false
    });

    if player.is_dead() && state.phase == GamePhase::Playing {
        state.phase = GamePhase::GameOver;
        log::info!("Player died with score {}", player.score);
        state.events.push(GameEvent::PlayerDied {
            score: player.score,
        });
    }
}

/// Player shots against enemies. Each shot hits at most the first
/// overlapping enemy in id order.
pub fn resolve_player_shots(state: &mut GameState) {
    let shots = std::mem::take(&mut state.player.projectiles);
    let mut survivors = Vec::with_capacity(shots.len());
    let mut killed: Vec<Enemy> = Vec::new();

    for shot in shots {
        let target = state
            .enemies
            .iter()
            .position(|e| circles_overlap(shot.pos, shot.radius, e.pos, e.size()));

        let Some(index) = target else {
            survivors.push(shot);
            continue;
        };

        let enemy = &mut state.enemies[index];
        enemy.health -= shot.damage;
        if enemy.is_dead() {
            // Vec::remove keeps id order for the remaining shots
            killed.push(state.enemies.remove(index));
        }
    }
    state.player.projectiles = survivors;

    for enemy in killed {
        on_enemy_killed(state, enemy);
    }
}

fn on_enemy_killed(state: &mut GameState, enemy: Enemy) {
    let class = enemy.class();
    let points = state.combo.register_kill(class.stats().value);
    state.player.score += points;
    state.player.add_ultimate_charge(ULTIMATE_CHARGE_PER_KILL);
    log::debug!(
        "Killed {class:?} #{} for {points} (combo {})",
        enemy.id,
        state.combo.count
    );
    state.events.push(GameEvent::EnemyKilled {
        id: enemy.id,
        class,
        points,
        pos: enemy.pos,
    });

    if let Some(kind) = roll_drop(&mut state.rng) {
        state.spawn_power_up(kind, enemy.pos);
    }
}

/// Power-ups touching the player are applied and removed
pub fn resolve_pickups(state: &mut GameState) {
    let player = &mut state.player;
    let events = &mut state.events;

    state.power_ups.retain(|power_up| {
        if !circles_overlap(power_up.pos, power_up.radius, player.pos, player.size) {
            return true;
        }
        player.apply_power_up(power_up.kind);
        events.push(GameEvent::PowerUpCollected {
            kind: power_up.kind,
        });
        false
    });
}
