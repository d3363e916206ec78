//! High score persistence
//!
//! The best score is a single integer stored as plain text. Reads fall back to
//! zero and write failures are logged, so persistence never stops a game.

use std::fs;
use std::path::{Path, PathBuf};

/// Default file name, relative to the working directory
pub const DEFAULT_HIGH_SCORE_FILE: &str = "high_score.txt";

/// Best score seen so far, bound to its backing file
#[derive(Debug, Clone)]
pub struct HighScore {
    pub best: u64,
    path: PathBuf,
}

impl HighScore {
    /// Read the stored score. Any failure yields zero.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match read_score(&path) {
            Ok(score) => {
                log::info!("Loaded high score {score}");
                score
            }
            Err(e) => {
                log::info!("No high score loaded ({e}), starting at 0");
                0
            }
        };
        Self { best, path }
    }

    /// Record a finished run. Writes the file only when the score is beaten.
    pub fn record(&mut self, score: u64) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        log::info!("New high score {score}");
        if let Err(e) = self.save() {
            log::warn!("{e}");
        }
        true
    }

    pub fn save(&self) -> Result<(), String> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| format!("Failed to create high score directory: {e}"))?;
        }
        fs::write(&self.path, self.best.to_string())
            .map_err(|e| format!("Failed to write high score file: {e}"))
    }
}

fn read_score(path: &Path) -> Result<u64, String> {
    let text =
        fs::read_to_string(path).map_err(|e| format!("Failed to read high score file: {e}"))?;
    text.trim()
        .parse()
        .map_err(|e| format!("Failed to parse high score: {e}"))
}
