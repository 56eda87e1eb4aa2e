//! Plinko Pro - deterministic game core for a browser Plinko game
//!
//! Core modules:
//! - `game`: Deterministic game logic (session state machine, scoring,
//!   power-ups, achievements)
//! - `physics`: Narrow interface to the external rigid-body engine
//! - `board`: Static board layout (scoring zones, spawn regions)
//! - `highscores`: Per-mode high score table
//! - `notifications`: Pull-based event queue for the presentation layer
//! - `platform`: Browser/native storage abstraction
//!
//! Rendering, sound and input live outside this crate. The presentation
//! layer feeds physics events in and reads snapshots out.

pub mod board;
pub mod game;
pub mod highscores;
pub mod notifications;
pub mod physics;
pub mod platform;

pub use board::{BoardLayout, ScoringZone, ZoneValue};
pub use game::{GameMode, GamePhase, GameStateMachine, Session};
pub use highscores::HighScores;
pub use physics::{BallSnapshot, BodyRegistry, BodyRole, PhysicsAdapter, PhysicsEvent};

/// Gameplay tuning constants
pub mod consts {
    /// Default board dimensions (presentation may resize)
    pub const BOARD_WIDTH: f32 = 800.0;
    pub const BOARD_HEIGHT: f32 = 700.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 8.0;
    /// Concurrent ball cap (simulation budget)
    pub const MAX_BALLS_IN_FLIGHT: usize = 50;
    /// Below this speed a ball in the zone strip counts as resting
    pub const MIN_BALL_SPEED: f32 = 0.2;
    /// How far past the board edge a ball may drift before despawn
    pub const OFFSCREEN_MARGIN: f32 = 50.0;

    /// Scoring zone multiplier ladder, left to right
    pub const ZONE_MULTIPLIERS: [f32; 7] = [2.0, 3.0, 5.0, 10.0, 5.0, 3.0, 2.0];
    /// Points awarded per unit of zone multiplier
    pub const ZONE_BASE_POINTS: u32 = 100;

    /// Maximum gap between scoring events for a combo to chain (seconds)
    pub const COMBO_WINDOW_SECS: f64 = 1.5;
    /// Flat bonus per combo step in Classic mode
    pub const COMBO_BONUS_UNIT: u64 = 50;

    /// Mode budgets
    pub const TIME_ATTACK_SECS: f64 = 60.0;
    pub const CHALLENGE_BALLS: u32 = 50;

    /// Power-up tuning
    pub const POWERUP_RADIUS: f32 = 20.0;
    pub const MAX_AVAILABLE_POWERUPS: usize = 3;
    /// One spawn roll per this many seconds of session time
    pub const POWERUP_SPAWN_INTERVAL_SECS: f64 = 1.0;
    /// Chance a spawn roll produces a power-up
    pub const POWERUP_SPAWN_CHANCE: f32 = 0.1;
    /// Magnet pull toward the board center, applied per tick
    pub const MAGNET_STRENGTH: f32 = 0.5;
    /// Explosion pairwise repulsion range and magnitude
    pub const EXPLOSION_RADIUS: f32 = 100.0;
    pub const EXPLOSION_STRENGTH: f32 = 0.1;
    /// Rainbow hue cycling rate (degrees of hue per second)
    pub const RAINBOW_HUE_RATE: f32 = 90.0;
    /// Duration factor granted by the extended-duration reward
    pub const REWARD_DURATION_FACTOR: f64 = 1.5;
    /// Extra collection reach granted by the power-up magnet reward
    pub const REWARD_COLLECT_RADIUS_BONUS: f32 = 15.0;
    /// Time scale while slow motion is active
    pub const SLOWMO_TIME_SCALE: f32 = 0.5;
}

/// Squared distance between two points (avoids the sqrt in hot proximity loops)
#[inline]
pub fn dist_sq(a: glam::Vec2, b: glam::Vec2) -> f32 {
    (a - b).length_squared()
}
