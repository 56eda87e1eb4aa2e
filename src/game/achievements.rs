//! Achievement rules, unlock bookkeeping and reward tags
//!
//! Rules are data evaluated against running session stats; the unlocked set
//! is monotonic (never shrinks) and persists write-through across sessions.
//! Rewards are tags handed to a registry on the state machine - gameplay
//! rewards mutate power-up tuning, presentation rewards accumulate in a set
//! the renderer reads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::session::GameMode;
use crate::platform;

/// Achievement rule categories; checks are scoped to one category at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementCategory {
    Scoring,
    Combo,
    Powerups,
    Challenges,
}

/// Snapshot of the stats a rule may inspect
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckStats {
    pub mode: GameMode,
    pub score: u64,
    pub combo: u32,
    pub powerups_collected: u32,
    pub powerups_active: u32,
    pub balls_dropped: u32,
    pub balls_scored: u32,
    pub elapsed_secs: f64,
    /// Set for the final check when a session ends
    pub session_over: bool,
}

/// Unlock predicate, evaluated against [`CheckStats`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    ScoreAtLeast(u64),
    ComboAtLeast(u32),
    PowerupsCollectedAtLeast(u32),
    PowerupsActiveAtLeast(u32),
    /// Every dropped ball scored (Challenge mode, evaluated at session end)
    PerfectRun,
    /// Reach `points` within `secs` of session start
    ScoreWithin { points: u64, secs: f64 },
}

impl Rule {
    pub fn satisfied(&self, stats: &CheckStats) -> bool {
        match *self {
            Rule::ScoreAtLeast(n) => stats.score >= n,
            Rule::ComboAtLeast(n) => stats.combo >= n,
            Rule::PowerupsCollectedAtLeast(n) => stats.powerups_collected >= n,
            Rule::PowerupsActiveAtLeast(n) => stats.powerups_active >= n,
            Rule::PerfectRun => {
                stats.session_over
                    && stats.mode == GameMode::Challenge
                    && stats.balls_dropped > 0
                    && stats.balls_scored >= stats.balls_dropped
            }
            Rule::ScoreWithin { points, secs } => {
                stats.score >= points && stats.elapsed_secs <= secs
            }
        }
    }
}

/// Reward attached to an achievement
///
/// `ExtendedPowerupDuration` and `PowerupMagnet` affect gameplay; the rest
/// are visual tags the presentation layer interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RewardTag {
    RainbowTrail,
    GoldenParticles,
    MasterBadge,
    ComboCounter,
    ParticleTrail,
    Lightning,
    ExtendedPowerupDuration,
    PowerupMagnet,
    GoldenTrail,
    FireTrail,
}

#[derive(Debug, Clone, Copy)]
pub struct Achievement {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub rule: Rule,
    pub reward: RewardTag,
}

/// Full achievement catalog
pub const CATALOG: [Achievement; 10] = [
    Achievement {
        id: "score_1000",
        title: "Beginner's Luck",
        description: "Score 1,000 points in a single game",
        category: AchievementCategory::Scoring,
        rule: Rule::ScoreAtLeast(1_000),
        reward: RewardTag::RainbowTrail,
    },
    Achievement {
        id: "score_10000",
        title: "Professional",
        description: "Score 10,000 points in a single game",
        category: AchievementCategory::Scoring,
        rule: Rule::ScoreAtLeast(10_000),
        reward: RewardTag::GoldenParticles,
    },
    Achievement {
        id: "score_100000",
        title: "Plinko Master",
        description: "Score 100,000 points in a single game",
        category: AchievementCategory::Scoring,
        rule: Rule::ScoreAtLeast(100_000),
        reward: RewardTag::MasterBadge,
    },
    Achievement {
        id: "combo_5",
        title: "Combo Starter",
        description: "Achieve a 5x combo",
        category: AchievementCategory::Combo,
        rule: Rule::ComboAtLeast(5),
        reward: RewardTag::ComboCounter,
    },
    Achievement {
        id: "combo_10",
        title: "Combo Expert",
        description: "Achieve a 10x combo",
        category: AchievementCategory::Combo,
        rule: Rule::ComboAtLeast(10),
        reward: RewardTag::ParticleTrail,
    },
    Achievement {
        id: "combo_20",
        title: "Combo Master",
        description: "Achieve a 20x combo",
        category: AchievementCategory::Combo,
        rule: Rule::ComboAtLeast(20),
        reward: RewardTag::Lightning,
    },
    Achievement {
        id: "powerup_collector",
        title: "Power Player",
        description: "Collect 10 powerups in a single game",
        category: AchievementCategory::Powerups,
        rule: Rule::PowerupsCollectedAtLeast(10),
        reward: RewardTag::ExtendedPowerupDuration,
    },
    Achievement {
        id: "powerup_master",
        title: "Powerup Master",
        description: "Have 3 powerups active simultaneously",
        category: AchievementCategory::Powerups,
        rule: Rule::PowerupsActiveAtLeast(3),
        reward: RewardTag::PowerupMagnet,
    },
    Achievement {
        id: "perfect_run",
        title: "Perfect Run",
        description: "Score points with every particle in Challenge Mode",
        category: AchievementCategory::Challenges,
        rule: Rule::PerfectRun,
        reward: RewardTag::GoldenTrail,
    },
    Achievement {
        id: "speed_demon",
        title: "Speed Demon",
        description: "Score 5000 points in under 30 seconds",
        category: AchievementCategory::Challenges,
        rule: Rule::ScoreWithin {
            points: 5_000,
            secs: 30.0,
        },
        reward: RewardTag::FireTrail,
    },
];

/// Evaluates rules and keeps the persisted unlocked set
#[derive(Debug, Clone, Default)]
pub struct AchievementTracker {
    unlocked: BTreeSet<String>,
}

impl AchievementTracker {
    const STORAGE_KEY: &'static str = "plinko_achievements";

    pub fn new() -> Self {
        Self::default()
    }

    /// Load the unlocked set from storage; corrupt data starts fresh
    pub fn load() -> Self {
        let unlocked = platform::read_key(Self::STORAGE_KEY)
            .and_then(|json| serde_json::from_str::<BTreeSet<String>>(&json).ok())
            .unwrap_or_default();
        if !unlocked.is_empty() {
            log::info!("Loaded {} unlocked achievements", unlocked.len());
        }
        Self { unlocked }
    }

    fn save(&self) {
        if let Ok(json) = serde_json::to_string(&self.unlocked) {
            platform::write_key(Self::STORAGE_KEY, &json);
        }
    }

    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    pub fn unlocked_ids(&self) -> impl Iterator<Item = &str> {
        self.unlocked.iter().map(String::as_str)
    }

    /// Reward tags of everything unlocked so far (re-applied at startup)
    pub fn unlocked_rewards(&self) -> Vec<RewardTag> {
        CATALOG
            .iter()
            .filter(|a| self.unlocked.contains(a.id))
            .map(|a| a.reward)
            .collect()
    }

    /// Evaluate every locked rule in `category` against `stats`.
    ///
    /// Newly satisfied achievements are unlocked (persisted write-through)
    /// and returned; re-satisfying an unlocked rule is a no-op.
    pub fn check(
        &mut self,
        category: AchievementCategory,
        stats: &CheckStats,
    ) -> Vec<&'static Achievement> {
        let mut newly = Vec::new();
        for achievement in CATALOG.iter() {
            if achievement.category != category {
                continue;
            }
            if self.unlocked.contains(achievement.id) {
                continue;
            }
            if achievement.rule.satisfied(stats) {
                self.unlocked.insert(achievement.id.to_string());
                log::info!("achievement unlocked: {}", achievement.id);
                newly.push(achievement);
            }
        }
        if !newly.is_empty() {
            self.save();
        }
        newly
    }
}
