//! Consecutive-kill combo and score multiplier

use serde::{Deserialize, Serialize};

/// Ticks a combo survives without a kill (2 seconds)
pub const COMBO_WINDOW_TICKS: u32 = 120;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    /// Consecutive kills
    pub count: u32,
    /// Ticks until the combo decays
    pub timer: u32,
    /// Multiplier is 1 + 0.1 * step
    pub step: u32,
}

impl ComboState {
    pub fn multiplier(&self) -> f32 {
        1.0 + 0.1 * self.step as f32
    }

    /// Score for a kill worth `value` at the current multiplier (floored)
    pub fn award(&self, value: u64) -> u64 {
        value * (10 + self.step as u64) / 10
    }

    /// Record a kill. Returns the points it was worth.
    pub fn register_kill(&mut self, value: u64) -> u64 {
        let points = self.award(value);
        self.count += 1;
        self.timer = COMBO_WINDOW_TICKS;
        self.step = self.count;
        points
    }

    /// The player was hit: the chain breaks, the multiplier follows on the next update
    pub fn break_chain(&mut self) {
        self.count = 0;
    }

    /// Per-tick decay
    pub fn update(&mut self) {
        if self.timer > 0 {
            self.timer -= 1;
            if self.timer == 0 {
                self.count = 0;
            }
        }
        self.step = self.count;
    }
}
