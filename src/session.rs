//! Session lifecycle around the simulation
//!
//! Owns settings, the persisted high score and the current `GameState`, and
//! converts variable frame times into fixed simulation ticks.

use crate::consts::*;
use crate::highscores::HighScore;
use crate::settings::Settings;
use crate::sim::state::{GameEvent, GamePhase, GameState};
use crate::sim::tick::{TickInput, tick};
use crate::snapshot::{RenderSnapshot, build_snapshot};

/// Longest frame the accumulator accepts (seconds)
const MAX_FRAME_DT: f32 = 0.25;

pub struct Session {
    pub settings: Settings,
    high_score: HighScore,
    state: GameState,
    accumulator: f32,
    /// One-shot commands waiting for the next tick
    pending: TickInput,
}

impl Session {
    /// Open a session on the menu screen, loading the stored high score
    pub fn new(settings: Settings, seed: u64) -> Self {
        let high_score = HighScore::load(&settings.high_score_path);
        Self {
            settings,
            high_score,
            state: GameState::new(seed),
            accumulator: 0.0,
            pending: TickInput::default(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn high_score(&self) -> u64 {
        self.high_score.best
    }

    /// Leave the menu and begin a run
    pub fn start(&mut self, seed: u64) {
        self.state = GameState::new_playing(seed);
        self.accumulator = 0.0;
        self.pending = TickInput::default();
        log::info!("Started new game with seed: {seed}");
    }

    /// Start over after a game over
    pub fn restart(&mut self, seed: u64) {
        self.start(seed);
    }

    /// Back to the title screen with a fresh world
    pub fn return_to_menu(&mut self, seed: u64) {
        self.state = GameState::new(seed);
        self.accumulator = 0.0;
        self.pending = TickInput::default();
    }

    /// Run as many fixed ticks as the elapsed frame time allows.
    ///
    /// One-shot commands in `input` are queued until the next tick runs, which
    /// may be several frames later when frames are shorter than `SIM_DT`. They
    /// apply to that tick only. Returns the events of every tick that ran.
    pub fn advance(&mut self, frame_dt: f32, input: &TickInput) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            self.accumulator = 0.0;
            self.pending = TickInput::default();
            return Vec::new();
        }

        self.accumulator += frame_dt.clamp(0.0, MAX_FRAME_DT);
        self.queue_one_shots(input);
        let held = input.held_only();
        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            if substeps == 0 {
                let first = self.take_pending(&held);
                tick(&mut self.state, &first, SIM_DT);
            } else {
                tick(&mut self.state, &held, SIM_DT);
            }
            events.extend(self.collect_events());
            self.accumulator -= SIM_DT;
            substeps += 1;
            if self.state.phase != GamePhase::Playing {
                self.accumulator = 0.0;
                break;
            }
        }

        events
    }

    /// Run exactly one tick, ignoring wall time
    pub fn step(&mut self, input: &TickInput) -> Vec<GameEvent> {
        tick(&mut self.state, input, SIM_DT);
        self.collect_events()
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        build_snapshot(
            &self.state,
            self.high_score.best,
            self.settings.reduced_flashing,
        )
    }

    fn queue_one_shots(&mut self, input: &TickInput) {
        let pending = &mut self.pending;
        pending.ultimate |= input.ultimate;
        // Two presses before a tick cancel out
        pending.toggle_upgrades ^= input.toggle_upgrades;
        pending.select_shape = input.select_shape.or(pending.select_shape);
        pending.purchase = input.purchase.or(pending.purchase);
    }

    /// Held state from this frame plus every queued one-shot, emptying the queue
    fn take_pending(&mut self, held: &TickInput) -> TickInput {
        let pending = std::mem::take(&mut self.pending);
        TickInput {
            ultimate: pending.ultimate,
            select_shape: pending.select_shape,
            toggle_upgrades: pending.toggle_upgrades,
            purchase: pending.purchase,
            ..held.clone()
        }
    }

    fn collect_events(&mut self) -> Vec<GameEvent> {
        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::PlayerDied { score } = event {
                log::info!("Game over at wave {} with score {score}", self.state.waves.wave);
                self.high_score.record(*score);
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyClass;
    use crate::sim::projectile::{Projectile, ProjectileColor};
    use std::path::PathBuf;

    fn temp_settings(name: &str) -> Settings {
        let dir = std::env::temp_dir().join("shape_invaders_test_session");
        std::fs::create_dir_all(&dir).unwrap();
        let path: PathBuf = dir.join(name);
        let _ = std::fs::remove_file(&path);
        Settings {
            high_score_path: path.to_string_lossy().into_owned(),
            ..Default::default()
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut session = Session::new(temp_settings("lifecycle.txt"), 1);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.advance(1.0, &TickInput::default()).is_empty());

        session.start(2);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.state().seed, 2);

        session.return_to_menu(3);
        assert_eq!(session.phase(), GamePhase::Menu);
    }

    #[test]
    fn test_advance_caps_substeps() {
        let mut session = Session::new(temp_settings("substeps.txt"), 1);
        session.start(1);
        session.advance(MAX_FRAME_DT, &TickInput::default());
        assert_eq!(session.state().time_ticks, MAX_SUBSTEPS as u64);
    }

    #[test]
    fn test_advance_accumulates_partial_frames() {
        let mut session = Session::new(temp_settings("partial.txt"), 1);
        session.start(1);
        session.advance(SIM_DT * 0.6, &TickInput::default());
        assert_eq!(session.state().time_ticks, 0);
        session.advance(SIM_DT * 0.6, &TickInput::default());
        assert_eq!(session.state().time_ticks, 1);
    }

    #[test]
    fn test_one_shot_applies_once() {
        let mut session = Session::new(temp_settings("oneshot.txt"), 1);
        session.start(1);
        let toggle = TickInput {
            toggle_upgrades: true,
            ..Default::default()
        };
        // Three substeps, but the menu toggles only once
        session.advance(SIM_DT * 3.5, &toggle);
        assert!(session.state().upgrade_menu_open);
    }

    #[test]
    fn test_one_shot_survives_short_frames() {
        let mut session = Session::new(temp_settings("shortframes.txt"), 1);
        session.start(1);
        let toggle = TickInput {
            toggle_upgrades: true,
            ..Default::default()
        };
        let frame = 1.0 / 144.0;

        // No tick runs on this frame, so the toggle waits for the next one
        session.advance(frame, &toggle);
        assert_eq!(session.state().time_ticks, 0);
        assert!(!session.state().upgrade_menu_open);

        session.advance(frame, &TickInput::default());
        session.advance(frame, &TickInput::default());
        assert!(session.state().upgrade_menu_open);

        // Consumed by that tick; later frames do not toggle again
        for _ in 0..20 {
            session.advance(frame, &TickInput::default());
        }
        assert!(session.state().upgrade_menu_open);
    }

    #[test]
    fn test_advance_returns_events_from_every_substep() {
        let mut session = Session::new(temp_settings("substep_events.txt"), 1);
        session.start(1);
        let events = session.advance(SIM_DT * 3.5, &TickInput::default());
        assert_eq!(session.state().time_ticks, 3);
        assert!(events.contains(&GameEvent::WaveStarted { wave: 1 }));
    }

    #[test]
    fn test_game_over_saves_beaten_high_score() {
        let settings = temp_settings("gameover.txt");
        let path = PathBuf::from(&settings.high_score_path);
        let mut session = Session::new(settings, 1);
        session.start(1);

        session.state.player.score = 4321;
        session.state.player.health = 10.0;
        let pos = session.state.player.pos;
        session
            .state
            .enemy_projectiles
            .push(Projectile::enemy(pos, 0.0, 1.0, ProjectileColor::Red));
        session.state.spawn_enemy(EnemyClass::Basic, pos + glam::Vec2::new(300.0, 0.0));

        let events = session.step(&TickInput::default());
        assert!(
            events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDied { score: 4321 }))
        );
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.high_score(), 4321);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "4321");

        session.restart(9);
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.high_score(), 4321);
        let _ = std::fs::remove_file(&path);
    }
}
