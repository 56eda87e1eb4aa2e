//! Per-mode high score table
//!
//! Persisted as one JSON envelope, loaded at startup, written through on
//! every improvement. The table is the max score ever observed per mode,
//! across sessions.

use serde::{Deserialize, Serialize};

use crate::game::GameMode;
use crate::platform;

/// High score per game mode
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct HighScores {
    pub classic: u64,
    pub time_attack: u64,
    pub challenge: u64,
}

impl HighScores {
    const STORAGE_KEY: &'static str = "plinko_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, mode: GameMode) -> u64 {
        match mode {
            GameMode::Classic => self.classic,
            GameMode::TimeAttack => self.time_attack,
            GameMode::Challenge => self.challenge,
        }
    }

    /// Record a score; returns true (and persists) if it beats the table
    pub fn submit(&mut self, mode: GameMode, score: u64) -> bool {
        if score <= self.get(mode) {
            return false;
        }
        match mode {
            GameMode::Classic => self.classic = score,
            GameMode::TimeAttack => self.time_attack = score,
            GameMode::Challenge => self.challenge = score,
        }
        self.save();
        true
    }

    /// Load the table from storage; missing or corrupt data starts fresh
    pub fn load() -> Self {
        match platform::read_key(Self::STORAGE_KEY) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(scores) => {
                    log::info!("Loaded high scores");
                    scores
                }
                Err(err) => {
                    log::warn!("Corrupt high score data, starting fresh: {}", err);
                    Self::new()
                }
            },
            None => Self::new(),
        }
    }

    /// Write-through save; failure degrades to in-memory (logged by platform)
    pub fn save(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            platform::write_key(Self::STORAGE_KEY, &json);
        }
    }
}
