//! Shape Invaders headless runner
//!
//! Loads settings, opens a session and lets the autopilot play until the run
//! ends or the tick limit is reached. A renderer would draw `Session::snapshot`
//! each frame instead of logging.

#[cfg(not(target_arch = "wasm32"))]
use std::time::{SystemTime, UNIX_EPOCH};

#[cfg(not(target_arch = "wasm32"))]
use shape_invaders::sim::{GameEvent, GamePhase, TickInput};
#[cfg(not(target_arch = "wasm32"))]
use shape_invaders::{Session, Settings};

#[cfg(not(target_arch = "wasm32"))]
fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Shape Invaders (headless) starting...");

    let settings = Settings::load();
    let seed = settings.seed.unwrap_or_else(time_seed);
    let max_ticks = settings.max_demo_ticks;
    let input = TickInput {
        idle_mode: settings.autopilot,
        ..Default::default()
    };

    let mut session = Session::new(settings, seed);
    log::info!("High score: {}", session.high_score());
    session.start(seed);

    let mut kills = 0u64;
    for _ in 0..max_ticks {
        for event in session.step(&input) {
            match event {
                GameEvent::EnemyKilled { .. } => kills += 1,
                GameEvent::ShapeUnlocked { shape } => log::info!("{shape:?} unlocked"),
                GameEvent::UpgradePurchased { kind, cost } => {
                    log::info!("Bought {kind} for {cost}")
                }
                _ => {}
            }
        }
        if session.phase() == GamePhase::GameOver {
            break;
        }
    }

    let snapshot = session.snapshot();
    log::info!(
        "Finished: wave {}, score {}, {} kills, high score {}",
        snapshot.hud.wave,
        snapshot.hud.score,
        kills,
        snapshot.hud.high_score
    );
    match serde_json::to_string_pretty(&snapshot.hud) {
        Ok(json) => println!("{json}"),
        Err(e) => log::warn!("Failed to serialize HUD: {e}"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser front end; the library is driven by the host page
}
