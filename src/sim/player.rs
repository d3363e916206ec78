//! The player avatar: movement, aiming, weapon shapes and the ultimate

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::powerup::{
    ActivePowerUp, DAMAGE_BOOST, PowerUpKind, RAPID_FIRE_COOLDOWN, SHIELD_HEAL, SHIELD_IFRAMES,
    SPEED_BOOST,
};
use super::projectile::Projectile;
use crate::consts::*;
use crate::heading_between;

/// Shoot cooldown at game start (ticks)
pub const BASE_SHOOT_COOLDOWN: u32 = 15;
/// Fire-rate upgrades never go below this
pub const MIN_SHOOT_COOLDOWN: u32 = 5;
/// Dash: cooldown and invulnerability frames granted
pub const DASH_COOLDOWN: u32 = 60;
pub const DASH_IFRAMES: u32 = 15;
/// Outer bullet angle of the fan pattern (degrees)
pub const FAN_SPREAD: f32 = 15.0;

pub const ULTIMATE_MAX_CHARGE: u32 = 100;
pub const ULTIMATE_CHARGE_PER_KILL: u32 = 10;
pub const ULTIMATE_COOLDOWN: u32 = 600;
/// Triangle ultimate: burst window and the cooldown used during it
pub const BURST_FIRE_TICKS: u32 = 180;
pub const BURST_FIRE_COOLDOWN: u32 = 2;
/// Circle ultimate: one bullet every N degrees
pub const RADIAL_VOLLEY_STEP: usize = 10;
pub const RADIAL_VOLLEY_DAMAGE: f32 = 20.0;
/// Square ultimate
pub const FORTRESS_IFRAMES: u32 = 180;
pub const FORTRESS_HEAL: f32 = 50.0;

/// How a volley is laid out around the heading
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BulletPattern {
    /// One bullet straight ahead
    Single,
    /// Straight bullet plus two at +/- spread degrees
    Fan { spread: f32 },
    /// Bullets evenly spaced about the full circle, first one straight ahead
    Ring { bullets: u32 },
}

impl BulletPattern {
    pub fn bullet_count(&self) -> u32 {
        match self {
            BulletPattern::Single => 1,
            BulletPattern::Fan { .. } => 3,
            BulletPattern::Ring { bullets } => *bullets,
        }
    }

    /// Angle offsets from the heading, in degrees
    pub fn offsets(&self) -> Vec<f32> {
        match *self {
            BulletPattern::Single => vec![0.0],
            BulletPattern::Fan { spread } => vec![-spread, 0.0, spread],
            BulletPattern::Ring { bullets } => {
                let step = 360.0 / bullets.max(1) as f32;
                (0..bullets).map(|i| i as f32 * step).collect()
            }
        }
    }
}

/// What the ultimate does for a given shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UltimateEffect {
    BurstFire,
    RadialVolley,
    Fortress,
    /// Charge and cooldown are spent with no effect
    Inert,
}

/// Weapon shapes, unlocked as waves progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shape {
    Triangle,
    Circle,
    Square,
    Pentagon,
}

impl Shape {
    pub const ALL: [Shape; 4] = [Shape::Triangle, Shape::Circle, Shape::Square, Shape::Pentagon];

    pub fn pattern(self) -> BulletPattern {
        match self {
            Shape::Triangle => BulletPattern::Single,
            Shape::Circle => BulletPattern::Fan { spread: FAN_SPREAD },
            Shape::Square => BulletPattern::Ring { bullets: 4 },
            Shape::Pentagon => BulletPattern::Ring { bullets: 5 },
        }
    }

    /// Wave at which the shape becomes available (0 = from the start)
    pub fn unlock_wave(self) -> u32 {
        match self {
            Shape::Triangle => 0,
            Shape::Circle => 5,
            Shape::Square => 10,
            Shape::Pentagon => 15,
        }
    }

    pub fn ultimate(self) -> UltimateEffect {
        match self {
            Shape::Triangle => UltimateEffect::BurstFire,
            Shape::Circle => UltimateEffect::RadialVolley,
            Shape::Square => UltimateEffect::Fortress,
            Shape::Pentagon => UltimateEffect::Inert,
        }
    }
}

/// Held directional keys for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    /// Sum of the held unit directions (not normalized)
    pub fn vector(&self) -> Vec2 {
        let mut v = Vec2::ZERO;
        if self.up {
            v.y -= 1.0;
        }
        if self.down {
            v.y += 1.0;
        }
        if self.left {
            v.x -= 1.0;
        }
        if self.right {
            v.x += 1.0;
        }
        v
    }
}

/// The player's avatar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Heading in degrees, tracks the aim point
    pub heading: f32,
    pub size: f32,
    pub health: f32,
    pub max_health: f32,
    /// Speed before power-up modifiers (units/sec)
    pub base_speed: f32,
    pub base_shoot_cooldown: u32,
    pub shoot_cooldown: u32,
    pub dash_cooldown: u32,
    /// Invulnerability frames remaining
    pub iframes: u32,
    /// Permanent multiplier from upgrades
    pub damage_multiplier: f32,
    pub shape: Shape,
    pub unlocked: Vec<Shape>,
    pub power_up: Option<ActivePowerUp>,
    /// Triangle ultimate window
    pub burst_ticks: u32,
    pub ultimate_charge: u32,
    pub ultimate_cooldown: u32,
    pub score: u64,
    pub projectiles: Vec<Projectile>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT - PLAYER_SPAWN_INSET),
            heading: -90.0, // Facing up
            size: PLAYER_SIZE,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            base_speed: PLAYER_BASE_SPEED,
            base_shoot_cooldown: BASE_SHOOT_COOLDOWN,
            shoot_cooldown: 0,
            dash_cooldown: 0,
            iframes: 0,
            damage_multiplier: 1.0,
            shape: Shape::Triangle,
            unlocked: vec![Shape::Triangle],
            power_up: None,
            burst_ticks: 0,
            ultimate_charge: 0,
            ultimate_cooldown: 0,
            score: 0,
            projectiles: Vec::new(),
        }
    }

    fn power_up_active(&self, kind: PowerUpKind) -> bool {
        self.power_up.is_some_and(|p| p.kind == kind)
    }

    /// Current movement speed including the Speed power-up
    pub fn speed(&self) -> f32 {
        if self.power_up_active(PowerUpKind::Speed) {
            self.base_speed * SPEED_BOOST
        } else {
            self.base_speed
        }
    }

    /// Current damage multiplier including the Damage power-up
    pub fn effective_damage_multiplier(&self) -> f32 {
        if self.power_up_active(PowerUpKind::Damage) {
            self.damage_multiplier * DAMAGE_BOOST
        } else {
            self.damage_multiplier
        }
    }

    /// Cooldown applied after each shot
    pub fn fire_cooldown(&self) -> u32 {
        if self.burst_ticks > 0 {
            BURST_FIRE_COOLDOWN
        } else if self.power_up_active(PowerUpKind::Rapid) {
            RAPID_FIRE_COOLDOWN.min(self.base_shoot_cooldown)
        } else {
            self.base_shoot_cooldown
        }
    }

    /// Pattern fired right now (Spread widens narrow shapes)
    pub fn pattern(&self) -> BulletPattern {
        let pattern = self.shape.pattern();
        if self.power_up_active(PowerUpKind::Spread) && pattern.bullet_count() < 3 {
            Shape::Circle.pattern()
        } else {
            pattern
        }
    }

    /// Apply one tick of directional movement, with optional dash
    pub fn move_by(&mut self, dirs: Directions, dash: bool, dt: f32) {
        let mut speed = self.speed();
        if dash && self.dash_cooldown == 0 {
            speed *= 2.0;
            self.dash_cooldown = DASH_COOLDOWN;
            self.iframes = self.iframes.max(DASH_IFRAMES);
        }

        self.pos += dirs.vector() * speed * dt;
        self.pos.x = self.pos.x.clamp(self.size, ARENA_WIDTH - self.size);
        self.pos.y = self.pos.y.clamp(self.size, ARENA_HEIGHT - self.size);
    }

    /// Turn to face a target point (ignored when the target is our own position)
    pub fn aim_at(&mut self, target: Vec2) {
        if target.distance_squared(self.pos) > f32::EPSILON {
            self.heading = heading_between(self.pos, target);
        }
    }

    /// Fire the current pattern if the cooldown allows. Returns bullets fired.
    pub fn try_shoot(&mut self) -> usize {
        if self.shoot_cooldown > 0 {
            return 0;
        }

        let base_damage = BULLET_BASE_DAMAGE * self.effective_damage_multiplier();
        let offsets = self.pattern().offsets();
        for &offset in &offsets {
            // Only the straight-ahead bullet deals full damage
            let damage = if offset == 0.0 {
                base_damage
            } else {
                base_damage * OFF_CENTER_DAMAGE_FACTOR
            };
            self.projectiles
                .push(Projectile::player(self.pos, self.heading + offset, damage));
        }

        self.shoot_cooldown = self.fire_cooldown();
        offsets.len()
    }

    /// Whether the ultimate can fire this tick
    pub fn ultimate_ready(&self) -> bool {
        self.ultimate_charge >= ULTIMATE_MAX_CHARGE && self.ultimate_cooldown == 0
    }

    /// Trigger the shape's ultimate, consuming the full charge
    pub fn try_ultimate(&mut self) -> Option<UltimateEffect> {
        if !self.ultimate_ready() {
            return None;
        }
        let effect = self.shape.ultimate();

        match effect {
            UltimateEffect::BurstFire => {
                self.burst_ticks = BURST_FIRE_TICKS;
                self.shoot_cooldown = self.shoot_cooldown.min(BURST_FIRE_COOLDOWN);
            }
            UltimateEffect::RadialVolley => {
                let damage = RADIAL_VOLLEY_DAMAGE * self.effective_damage_multiplier();
                for angle in (0..360).step_by(RADIAL_VOLLEY_STEP) {
                    self.projectiles
                        .push(Projectile::player(self.pos, angle as f32, damage));
                }
            }
            UltimateEffect::Fortress => {
                self.iframes = self.iframes.max(FORTRESS_IFRAMES);
                self.heal(FORTRESS_HEAL);
            }
            UltimateEffect::Inert => {}
        }

        self.ultimate_charge = 0;
        self.ultimate_cooldown = ULTIMATE_COOLDOWN;
        Some(effect)
    }

    /// Equip the shape in the given unlocked slot
    pub fn select_shape(&mut self, slot: usize) -> bool {
        match self.unlocked.get(slot) {
            Some(&shape) => {
                self.shape = shape;
                true
            }
            None => false,
        }
    }

    /// Add a shape to the unlocked list. Returns false if already unlocked.
    pub fn unlock(&mut self, shape: Shape) -> bool {
        if self.unlocked.contains(&shape) {
            return false;
        }
        self.unlocked.push(shape);
        true
    }

    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Apply a hit. Returns false if invulnerability absorbed it.
    pub fn take_hit(&mut self, damage: f32) -> bool {
        if self.iframes > 0 {
            return false;
        }
        self.health -= damage;
        self.iframes = HIT_IFRAMES;
        true
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn add_ultimate_charge(&mut self, amount: u32) {
        self.ultimate_charge = (self.ultimate_charge + amount).min(ULTIMATE_MAX_CHARGE);
    }

    /// Apply a collected power-up
    pub fn apply_power_up(&mut self, kind: PowerUpKind) {
        if !kind.is_timed() {
            // Shield
            self.iframes = self.iframes.max(SHIELD_IFRAMES);
            self.heal(SHIELD_HEAL);
            return;
        }
        if kind == PowerUpKind::Rapid {
            self.shoot_cooldown = self.shoot_cooldown.min(RAPID_FIRE_COOLDOWN);
        }
        self.power_up = Some(ActivePowerUp::new(kind));
    }

    /// Count down all per-tick timers. Returns the power-up that expired this tick.
    pub fn update_timers(&mut self) -> Option<PowerUpKind> {
        self.shoot_cooldown = self.shoot_cooldown.saturating_sub(1);
        self.dash_cooldown = self.dash_cooldown.saturating_sub(1);
        self.iframes = self.iframes.saturating_sub(1);
        self.burst_ticks = self.burst_ticks.saturating_sub(1);
        self.ultimate_cooldown = self.ultimate_cooldown.saturating_sub(1);

        let active = self.power_up.as_mut()?;
        active.remaining_ticks = active.remaining_ticks.saturating_sub(1);
        if active.remaining_ticks > 0 {
            return None;
        }

        let expired = active.kind;
        self.power_up = None;
        self.shoot_cooldown = self.base_shoot_cooldown;
        Some(expired)
    }

    /// Move every owned projectile one step
    pub fn advance_projectiles(&mut self, dt: f32) {
        for projectile in &mut self.projectiles {
            projectile.advance(dt);
        }
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health > 0.0 {
            (self.health / self.max_health).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    pub fn ultimate_fraction(&self) -> f32 {
        self.ultimate_charge as f32 / ULTIMATE_MAX_CHARGE as f32
    }

    pub fn power_up_fraction(&self) -> f32 {
        self.power_up.map(|p| p.fraction()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready_player(shape: Shape) -> Player {
        let mut p = Player::new();
        p.unlock(shape);
        p.shape = shape;
        p
    }

    #[test]
    fn test_single_shot() {
        let mut p = Player::new();
        assert_eq!(p.try_shoot(), 1);
        assert_eq!(p.projectiles[0].damage, BULLET_BASE_DAMAGE);
        assert_eq!(p.shoot_cooldown, BASE_SHOOT_COOLDOWN);
        // Rate limited
        assert_eq!(p.try_shoot(), 0);
    }

    #[test]
    fn test_fan_pattern_center_full_damage() {
        let mut p = ready_player(Shape::Circle);
        p.heading = 0.0;
        assert_eq!(p.try_shoot(), 3);
        let headings: Vec<f32> = p.projectiles.iter().map(|b| b.heading).collect();
        assert_eq!(headings, vec![-FAN_SPREAD, 0.0, FAN_SPREAD]);
        assert_eq!(p.projectiles[1].damage, BULLET_BASE_DAMAGE);
        assert!((p.projectiles[0].damage - 8.0).abs() < 1e-5);
        assert!((p.projectiles[2].damage - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_ring_patterns_evenly_spaced() {
        let mut square = ready_player(Shape::Square);
        square.heading = 10.0;
        square.try_shoot();
        let headings: Vec<f32> = square.projectiles.iter().map(|b| b.heading).collect();
        assert_eq!(headings, vec![10.0, 100.0, 190.0, 280.0]);

        let mut pentagon = ready_player(Shape::Pentagon);
        pentagon.heading = 0.0;
        assert_eq!(pentagon.try_shoot(), 5);
        assert!((pentagon.projectiles[1].heading - 72.0).abs() < 1e-4);
        // First ring bullet points straight ahead and keeps full damage
        assert_eq!(pentagon.projectiles[0].damage, BULLET_BASE_DAMAGE);
        assert!((pentagon.projectiles[4].damage - 8.0).abs() < 1e-5);
    }

    #[test]
    fn test_movement_sums_directions_and_clamps() {
        let mut p = Player::new();
        let start = p.pos;
        let dirs = Directions {
            up: true,
            right: true,
            ..Default::default()
        };
        p.move_by(dirs, false, SIM_DT);
        assert!((p.pos.x - (start.x + 5.0)).abs() < 1e-3);
        assert!((p.pos.y - (start.y - 5.0)).abs() < 1e-3);

        // Opposite keys cancel
        let before = p.pos;
        p.move_by(
            Directions {
                left: true,
                right: true,
                ..Default::default()
            },
            false,
            SIM_DT,
        );
        assert_eq!(p.pos, before);

        p.pos = Vec2::new(PLAYER_SIZE + 1.0, 300.0);
        p.move_by(
            Directions {
                left: true,
                ..Default::default()
            },
            false,
            SIM_DT,
        );
        assert_eq!(p.pos.x, PLAYER_SIZE);
    }

    #[test]
    fn test_dash_doubles_speed_and_grants_iframes() {
        let mut p = Player::new();
        let start = p.pos;
        let dirs = Directions {
            right: true,
            ..Default::default()
        };
        p.move_by(dirs, true, SIM_DT);
        assert!((p.pos.x - (start.x + 10.0)).abs() < 1e-3);
        assert_eq!(p.dash_cooldown, DASH_COOLDOWN);
        assert_eq!(p.iframes, DASH_IFRAMES);

        // Dash on cooldown moves at normal speed
        let mid = p.pos;
        p.move_by(dirs, true, SIM_DT);
        assert!((p.pos.x - (mid.x + 5.0)).abs() < 1e-3);
    }

    #[test]
    fn test_aim_tracks_target() {
        let mut p = Player::new();
        p.aim_at(p.pos + Vec2::new(0.0, 50.0));
        assert!((p.heading - 90.0).abs() < 1e-4);
        p.aim_at(p.pos);
        assert!((p.heading - 90.0).abs() < 1e-4);
    }

    #[test]
    fn test_take_hit_respects_iframes() {
        let mut p = Player::new();
        assert!(p.take_hit(10.0));
        assert_eq!(p.health, 90.0);
        assert_eq!(p.iframes, HIT_IFRAMES);
        assert!(!p.take_hit(10.0));
        assert_eq!(p.health, 90.0);
    }

    #[test]
    fn test_ultimate_requires_full_charge_and_cooldown() {
        let mut p = Player::new();
        p.ultimate_charge = 90;
        assert_eq!(p.try_ultimate(), None);

        p.add_ultimate_charge(50);
        assert_eq!(p.ultimate_charge, ULTIMATE_MAX_CHARGE);
        assert_eq!(p.try_ultimate(), Some(UltimateEffect::BurstFire));
        assert_eq!(p.ultimate_charge, 0);
        assert_eq!(p.ultimate_cooldown, ULTIMATE_COOLDOWN);
        assert_eq!(p.fire_cooldown(), BURST_FIRE_COOLDOWN);

        p.ultimate_charge = ULTIMATE_MAX_CHARGE;
        assert_eq!(p.try_ultimate(), None, "cooldown must gate the ultimate");
    }

    #[test]
    fn test_radial_volley() {
        let mut p = ready_player(Shape::Circle);
        p.ultimate_charge = ULTIMATE_MAX_CHARGE;
        assert_eq!(p.try_ultimate(), Some(UltimateEffect::RadialVolley));
        assert_eq!(p.projectiles.len(), 36);
        assert!(p.projectiles.iter().all(|b| b.damage == RADIAL_VOLLEY_DAMAGE));
    }

    #[test]
    fn test_fortress_heals_and_shields() {
        let mut p = ready_player(Shape::Square);
        p.health = 30.0;
        p.ultimate_charge = ULTIMATE_MAX_CHARGE;
        assert_eq!(p.try_ultimate(), Some(UltimateEffect::Fortress));
        assert_eq!(p.health, 80.0);
        assert_eq!(p.iframes, FORTRESS_IFRAMES);
    }

    #[test]
    fn test_pentagon_ultimate_spends_charge() {
        let mut p = ready_player(Shape::Pentagon);
        p.ultimate_charge = ULTIMATE_MAX_CHARGE;
        let health = p.health;
        assert_eq!(p.try_ultimate(), Some(UltimateEffect::Inert));
        assert_eq!(p.ultimate_charge, 0);
        assert_eq!(p.ultimate_cooldown, ULTIMATE_COOLDOWN);
        assert!(p.projectiles.is_empty());
        assert_eq!(p.health, health);
        assert_eq!(p.burst_ticks, 0);
    }

    #[test]
    fn test_select_shape_ignores_locked_slots() {
        let mut p = Player::new();
        assert!(!p.select_shape(1));
        assert_eq!(p.shape, Shape::Triangle);
        p.unlock(Shape::Circle);
        assert!(p.select_shape(1));
        assert_eq!(p.shape, Shape::Circle);
        assert!(!p.unlock(Shape::Circle));
    }

    #[test]
    fn test_power_up_expiry_reverts_to_base() {
        let mut p = Player::new();
        p.apply_power_up(PowerUpKind::Speed);
        assert_eq!(p.speed(), PLAYER_BASE_SPEED * SPEED_BOOST);

        let mut expired = None;
        for _ in 0..crate::sim::powerup::POWER_UP_DURATION_TICKS {
            expired = p.update_timers().or(expired);
        }
        assert_eq!(expired, Some(PowerUpKind::Speed));
        assert!(p.power_up.is_none());
        assert_eq!(p.speed(), PLAYER_BASE_SPEED);
        assert_eq!(p.shoot_cooldown, p.base_shoot_cooldown);
    }

    #[test]
    fn test_rapid_and_spread_modify_firing() {
        let mut p = Player::new();
        p.apply_power_up(PowerUpKind::Rapid);
        assert_eq!(p.fire_cooldown(), RAPID_FIRE_COOLDOWN);

        p.apply_power_up(PowerUpKind::Spread);
        assert_eq!(p.fire_cooldown(), BASE_SHOOT_COOLDOWN);
        assert_eq!(p.try_shoot(), 3);
    }

    #[test]
    fn test_damage_boost_is_temporary() {
        let mut p = Player::new();
        p.apply_power_up(PowerUpKind::Damage);
        p.try_shoot();
        assert!((p.projectiles[0].damage - 15.0).abs() < 1e-5);
        p.power_up = None;
        assert_eq!(p.effective_damage_multiplier(), 1.0);
    }

    #[test]
    fn test_shield_heals_without_timer() {
        let mut p = Player::new();
        p.health = 50.0;
        p.apply_power_up(PowerUpKind::Shield);
        assert_eq!(p.health, 70.0);
        assert_eq!(p.iframes, SHIELD_IFRAMES);
        assert!(p.power_up.is_none());
    }
}
