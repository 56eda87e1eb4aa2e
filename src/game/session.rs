//! Session state: one play-through in one mode
//!
//! Exactly one session is live at a time. It is created by
//! [`GameStateMachine::start`](super::machine::GameStateMachine::start),
//! mutated by every scoring/power-up event on the logic thread, and becomes
//! read-only once the session ends.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Game mode selected from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum GameMode {
    /// Unconstrained free play
    #[default]
    Classic,
    /// 60 second timer
    TimeAttack,
    /// Fixed budget of 50 balls
    Challenge,
}

impl GameMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Classic => "classic",
            GameMode::TimeAttack => "time attack",
            GameMode::Challenge => "challenge",
        }
    }
}

/// Top-level phase of the state machine: Menu -> Playing -> Ended -> Menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Menu,
    Playing,
    Ended,
}

/// Running counters the achievement rules evaluate against
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SessionStats {
    /// Balls released into the board this session
    pub balls_dropped: u32,
    /// Balls that reached a scoring zone
    pub balls_scored: u32,
    /// Peg contacts this session
    pub pegs_hit: u32,
    /// Power-ups collected this session
    pub powerups_collected: u32,
}

/// Mutable state of the current play-through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub mode: GameMode,
    /// Total score; monotonically non-decreasing while the session runs
    pub score: u64,
    /// Current combo chain length; 0 when idle
    pub combo: u32,
    /// Session clock timestamp of the last scoring event (seconds)
    pub last_score_time: f64,
    /// Session clock, advanced by tick deltas (seconds)
    pub clock: f64,
    /// Remaining time (TimeAttack only)
    pub time_left: Option<f64>,
    /// Remaining ball budget (Challenge only)
    pub balls_left: Option<u32>,
    /// Score multiplier; 1.0 unless a multiplier power-up is active
    pub multiplier: f32,
    /// Set once the per-mode high score has been beaten this session
    /// (gates the notification to fire once)
    pub high_score_beaten: bool,
    pub stats: SessionStats,
}

impl Session {
    /// Fresh session with mode defaults
    pub fn new(mode: GameMode) -> Self {
        Self {
            mode,
            score: 0,
            combo: 0,
            last_score_time: 0.0,
            clock: 0.0,
            time_left: match mode {
                GameMode::TimeAttack => Some(TIME_ATTACK_SECS),
                _ => None,
            },
            balls_left: match mode {
                GameMode::Challenge => Some(CHALLENGE_BALLS),
                _ => None,
            },
            multiplier: 1.0,
            high_score_beaten: false,
            stats: SessionStats::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_defaults() {
        let classic = Session::new(GameMode::Classic);
        assert_eq!(classic.time_left, None);
        assert_eq!(classic.balls_left, None);

        let ta = Session::new(GameMode::TimeAttack);
        assert_eq!(ta.time_left, Some(60.0));

        let ch = Session::new(GameMode::Challenge);
        assert_eq!(ch.balls_left, Some(50));
        assert_eq!(ch.score, 0);
        assert_eq!(ch.combo, 0);
        assert_eq!(ch.multiplier, 1.0);
    }
}
