//! Top-level game state machine
//!
//! Owns every gameplay component (session, scoring, power-ups, achievements,
//! high scores, notifications) and is the only mutation entry point. The
//! presentation layer drives it with three calls per frame:
//!
//! 1. `process_events` with whatever the physics step reported
//! 2. `tick` with the frame delta
//! 3. `drain_notifications` / read accessors to render
//!
//! Phases move Menu -> Playing -> Ended -> Menu. Events and ticks arriving
//! outside Playing are silently dropped, so late physics callbacks after a
//! session ends cannot corrupt state.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use std::collections::BTreeSet;

use super::achievements::{
    Achievement, AchievementCategory, AchievementTracker, CheckStats, RewardTag,
};
use super::powerups::PowerupManager;
use super::scoring::ScoringEngine;
use super::session::{GameMode, GamePhase, Session};
use crate::board::BoardLayout;
use crate::consts::*;
use crate::highscores::HighScores;
use crate::notifications::{NotificationKind, NotificationQueue};
use crate::physics::{BodyId, BodyRegistry, BodyRole, PhysicsAdapter, PhysicsEvent};

pub struct GameStateMachine {
    phase: GamePhase,
    session: Session,
    board: BoardLayout,
    scoring: ScoringEngine,
    powerups: PowerupManager,
    achievements: AchievementTracker,
    high_scores: HighScores,
    notifications: NotificationQueue,
    registry: BodyRegistry,
    rng: Pcg32,
    /// Presentation-facing rewards earned so far (trails, badges)
    active_rewards: BTreeSet<RewardTag>,
}

impl GameStateMachine {
    /// Build the machine with persisted achievements/high scores loaded and
    /// previously earned rewards re-applied.
    pub fn new(seed: u64, board_width: f32, board_height: f32) -> Self {
        let achievements = AchievementTracker::load();
        let earned = achievements.unlocked_rewards();

        let mut machine = Self {
            phase: GamePhase::Menu,
            session: Session::new(GameMode::Classic),
            board: BoardLayout::new(board_width, board_height),
            scoring: ScoringEngine::new(),
            powerups: PowerupManager::new(),
            achievements,
            high_scores: HighScores::load(),
            notifications: NotificationQueue::new(),
            registry: BodyRegistry::new(),
            rng: Pcg32::seed_from_u64(seed),
            active_rewards: BTreeSet::new(),
        };
        for reward in earned {
            machine.apply_reward(reward);
        }
        machine
    }

    /// Start a fresh session in `mode`, despawning leftover balls and
    /// reverting any effect still live from the previous session.
    pub fn start(&mut self, mode: GameMode, adapter: &mut dyn PhysicsAdapter) {
        self.powerups.clear(&mut self.session, adapter);
        for ball in adapter.ball_snapshots() {
            adapter.remove_body(ball.id);
            self.registry.unregister(ball.id);
        }
        self.session = Session::new(mode);
        self.phase = GamePhase::Playing;
        log::info!("session started: {}", mode.as_str());
    }

    /// Advance all timed state by `dt` seconds of session time.
    pub fn tick(&mut self, dt: f64, adapter: &mut dyn PhysicsAdapter) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.session.clock += dt;

        let collected = self.powerups.update(
            dt,
            &mut self.session,
            &self.board,
            adapter,
            &mut self.rng,
            &mut self.notifications,
        );
        if !collected.is_empty() {
            self.session.stats.powerups_collected += collected.len() as u32;
            self.run_checks(AchievementCategory::Powerups);
        }

        let now = self.session.clock;
        self.scoring.idle_reset(&mut self.session, now);
        self.despawn_stray_balls(adapter);

        if let Some(time_left) = self.session.time_left {
            let remaining = (time_left - dt).max(0.0);
            self.session.time_left = Some(remaining);
            if remaining <= 0.0 {
                self.end_session(adapter);
                return;
            }
        }

        // Challenge ends once the budget is spent and the board has drained
        if self.session.balls_left == Some(0) && adapter.ball_snapshots().is_empty() {
            self.end_session(adapter);
        }
    }

    /// Feed one physics step's events through the machine, in step order.
    pub fn process_events(&mut self, events: &[PhysicsEvent], adapter: &mut dyn PhysicsAdapter) {
        if self.phase != GamePhase::Playing {
            return;
        }
        for event in events {
            match *event {
                PhysicsEvent::ZoneEnter { ball, zone } => self.on_zone_enter(ball, zone, adapter),
                PhysicsEvent::Collision { a, b, .. } => self.on_collision(a, b),
            }
        }
    }

    fn on_collision(&mut self, a: BodyId, b: BodyId) {
        let roles = (self.registry.role_of(a), self.registry.role_of(b));
        match roles {
            (Some(BodyRole::Ball), Some(BodyRole::Peg))
            | (Some(BodyRole::Peg), Some(BodyRole::Ball)) => {
                self.session.stats.pegs_hit += 1;
            }
            // Zone scoring is driven by ZoneEnter sensors, never contacts
            _ => {}
        }
    }

    fn on_zone_enter(&mut self, ball: BodyId, zone: usize, adapter: &mut dyn PhysicsAdapter) {
        if self.registry.role_of(ball) != Some(BodyRole::Ball) {
            log::warn!("zone enter from unknown body {ball}, skipping");
            return;
        }
        let Some(base_points) = self.board.zone(zone).map(|z| z.value.base_points()) else {
            log::warn!("zone enter for missing zone {zone}, skipping");
            return;
        };

        self.session.stats.balls_scored += 1;
        let high_score = self.high_scores.get(self.session.mode);
        let now = self.session.clock;
        let result = self
            .scoring
            .register(&mut self.session, base_points, now, high_score);
        log::debug!(
            "scored {} in zone {zone} (combo x{})",
            result.points_awarded,
            result.combo_after
        );

        if result.is_new_high_score {
            // Write-through: a restart or abandoned session must not lose
            // the best score seen so far
            self.high_scores.submit(self.session.mode, self.session.score);
            if !self.session.high_score_beaten {
                self.session.high_score_beaten = true;
                self.notifications
                    .push("New High Score!", NotificationKind::HighScore);
            }
        }

        // The ball is spent once it scores
        adapter.remove_body(ball);
        self.registry.unregister(ball);

        self.run_checks(AchievementCategory::Scoring);
        self.run_checks(AchievementCategory::Combo);
        self.run_checks(AchievementCategory::Challenges);
    }

    /// Request a ball drop against the mode budget and the in-flight cap.
    ///
    /// Returns true when the drop is allowed; the caller then creates the
    /// physics body and registers it as [`BodyRole::Ball`].
    pub fn try_drop_ball(&mut self, adapter: &dyn PhysicsAdapter) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        if self.session.balls_left == Some(0) {
            return false;
        }
        if adapter.ball_snapshots().len() >= MAX_BALLS_IN_FLIGHT {
            return false;
        }
        if let Some(left) = self.session.balls_left.as_mut() {
            *left -= 1;
        }
        self.session.stats.balls_dropped += 1;
        true
    }

    /// Despawn balls that left the board or came to rest in the zone strip.
    fn despawn_stray_balls(&mut self, adapter: &mut dyn PhysicsAdapter) {
        for ball in adapter.ball_snapshots() {
            let off_screen = ball.pos.y > self.board.height + OFFSCREEN_MARGIN
                || ball.pos.x < -OFFSCREEN_MARGIN
                || ball.pos.x > self.board.width + OFFSCREEN_MARGIN;
            // Freshly dropped balls are slow too; only the lower half counts
            let resting =
                ball.vel.length() < MIN_BALL_SPEED && ball.pos.y > self.board.height * 0.5;
            if off_screen || resting {
                adapter.remove_body(ball.id);
                self.registry.unregister(ball.id);
            }
        }
    }

    fn end_session(&mut self, adapter: &mut dyn PhysicsAdapter) {
        self.phase = GamePhase::Ended;
        self.powerups.clear(&mut self.session, adapter);

        let mut stats = self.check_stats();
        stats.session_over = true;
        let newly = self.achievements.check(AchievementCategory::Challenges, &stats);
        self.unlock(newly);

        self.notifications.push(
            format!("Game Over! Final Score: {}", self.session.score),
            NotificationKind::Info,
        );
        log::info!(
            "session over: {} scored {}",
            self.session.mode.as_str(),
            self.session.score
        );
    }

    /// Return to the menu once the end screen is dismissed.
    pub fn back_to_menu(&mut self) {
        if self.phase == GamePhase::Ended {
            self.phase = GamePhase::Menu;
        }
    }

    fn check_stats(&self) -> CheckStats {
        CheckStats {
            mode: self.session.mode,
            score: self.session.score,
            combo: self.session.combo,
            powerups_collected: self.session.stats.powerups_collected,
            powerups_active: self.powerups.active().len() as u32,
            balls_dropped: self.session.stats.balls_dropped,
            balls_scored: self.session.stats.balls_scored,
            elapsed_secs: self.session.clock,
            session_over: false,
        }
    }

    fn run_checks(&mut self, category: AchievementCategory) {
        let stats = self.check_stats();
        let newly = self.achievements.check(category, &stats);
        self.unlock(newly);
    }

    fn unlock(&mut self, newly: Vec<&'static Achievement>) {
        for achievement in newly {
            self.notifications.push(
                format!("Achievement Unlocked: {}", achievement.title),
                NotificationKind::Achievement,
            );
            self.apply_reward(achievement.reward);
        }
    }

    fn apply_reward(&mut self, reward: RewardTag) {
        match reward {
            RewardTag::ExtendedPowerupDuration => {
                self.powerups.set_duration_multiplier(REWARD_DURATION_FACTOR);
            }
            RewardTag::PowerupMagnet => {
                self.powerups.add_collect_radius_bonus(REWARD_COLLECT_RADIUS_BONUS);
            }
            // Presentation-only rewards just land in the active set
            _ => {}
        }
        self.active_rewards.insert(reward);
    }

    /// Rebuild the zone layout for new dimensions; static bodies must be
    /// recreated and re-registered by the caller.
    pub fn resize_board(&mut self, width: f32, height: f32) {
        self.board.resize(width, height);
        self.registry.clear_static();
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn board(&self) -> &BoardLayout {
        &self.board
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    pub fn powerups(&self) -> &PowerupManager {
        &self.powerups
    }

    pub fn achievements(&self) -> &AchievementTracker {
        &self.achievements
    }

    pub fn active_rewards(&self) -> &BTreeSet<RewardTag> {
        &self.active_rewards
    }

    /// Body bookkeeping for whoever creates/destroys physics bodies
    pub fn registry_mut(&mut self) -> &mut BodyRegistry {
        &mut self.registry
    }

    pub fn drain_notifications(&mut self) -> Vec<crate::notifications::Notification> {
        self.notifications.drain()
    }

    /// Spawn color hue while the rainbow power-up cycles
    pub fn spawn_hue(&self) -> Option<f32> {
        self.powerups.spawn_hue()
    }
}
