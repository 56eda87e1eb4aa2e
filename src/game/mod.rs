//! Deterministic game logic
//!
//! Everything gameplay-visible lives here and must stay deterministic:
//! - Single cooperative clock, advanced only by explicit tick deltas
//! - Seeded RNG only
//! - All state mutation happens synchronously inside tick/event handlers
//! - No rendering or platform dependencies beyond key/value storage

pub mod achievements;
pub mod machine;
pub mod powerups;
pub mod scoring;
pub mod session;

pub use achievements::{Achievement, AchievementCategory, AchievementTracker, RewardTag};
pub use machine::GameStateMachine;
pub use powerups::{ActivePowerup, AvailablePowerup, PowerupKind, PowerupManager};
pub use scoring::{ScoreResult, ScoringEngine};
pub use session::{GameMode, GamePhase, Session, SessionStats};
