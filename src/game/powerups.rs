//! Power-up lifecycle: Available -> Active -> Expired
//!
//! At most three uncollected power-ups sit on the board; at most one effect
//! per kind is active at a time. Collecting a kind that is already active
//! reverts it first and reactivates with a full timer - refresh, not stack.
//!
//! Effects only ever request forces or a time scale through the
//! [`PhysicsAdapter`]; positions are never touched directly.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::session::Session;
use crate::board::BoardLayout;
use crate::consts::*;
use crate::dist_sq;
use crate::notifications::{NotificationKind, NotificationQueue};
use crate::physics::PhysicsAdapter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerupKind {
    /// Doubles the session score multiplier
    Multiplier,
    /// Halves the simulation time scale
    SlowMo,
    /// Pulls every live ball toward the board center
    Magnet,
    /// Cycles the spawn color hue
    Rainbow,
    /// Repels nearby balls from each other
    Explosion,
}

impl PowerupKind {
    pub const ALL: [PowerupKind; 5] = [
        PowerupKind::Multiplier,
        PowerupKind::SlowMo,
        PowerupKind::Magnet,
        PowerupKind::Rainbow,
        PowerupKind::Explosion,
    ];

    /// Base active duration in seconds
    pub fn duration_secs(&self) -> f64 {
        match self {
            PowerupKind::Multiplier => 10.0,
            PowerupKind::SlowMo => 8.0,
            PowerupKind::Magnet => 12.0,
            PowerupKind::Rainbow => 15.0,
            PowerupKind::Explosion => 5.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PowerupKind::Multiplier => "multiplier",
            PowerupKind::SlowMo => "slowmo",
            PowerupKind::Magnet => "magnet",
            PowerupKind::Rainbow => "rainbow",
            PowerupKind::Explosion => "explosion",
        }
    }
}

/// A spawned, not-yet-collected power-up
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AvailablePowerup {
    pub id: u32,
    pub kind: PowerupKind,
    pub pos: Vec2,
}

/// A collected power-up whose effect is live
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ActivePowerup {
    pub kind: PowerupKind,
    pub time_left: f64,
}

/// Spawns, collects and expires power-ups; owns no physics state
#[derive(Debug, Clone)]
pub struct PowerupManager {
    available: Vec<AvailablePowerup>,
    active: Vec<ActivePowerup>,
    next_id: u32,
    spawn_timer: f64,
    /// Scales future activation durations (achievement reward hook)
    duration_multiplier: f64,
    /// Widens the collection radius (achievement reward hook)
    collect_radius_bonus: f32,
    /// Current spawn color hue in degrees, advanced while Rainbow is active
    spawn_hue: f32,
}

impl Default for PowerupManager {
    fn default() -> Self {
        Self {
            available: Vec::new(),
            active: Vec::new(),
            next_id: 1,
            spawn_timer: 0.0,
            duration_multiplier: 1.0,
            collect_radius_bonus: 0.0,
            spawn_hue: 0.0,
        }
    }
}

impl PowerupManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn available(&self) -> &[AvailablePowerup] {
        &self.available
    }

    pub fn active(&self) -> &[ActivePowerup] {
        &self.active
    }

    pub fn is_active(&self, kind: PowerupKind) -> bool {
        self.active.iter().any(|a| a.kind == kind)
    }

    /// Spawn color hue while Rainbow is cycling
    pub fn spawn_hue(&self) -> Option<f32> {
        self.is_active(PowerupKind::Rainbow).then_some(self.spawn_hue)
    }

    pub fn set_duration_multiplier(&mut self, factor: f64) {
        self.duration_multiplier = factor;
    }

    pub fn add_collect_radius_bonus(&mut self, bonus: f32) {
        self.collect_radius_bonus += bonus;
    }

    /// Place a power-up on the board directly (scripted sessions, tests)
    pub fn spawn_at(&mut self, kind: PowerupKind, pos: Vec2) {
        if self.available.len() >= MAX_AVAILABLE_POWERUPS {
            return;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.available.push(AvailablePowerup { id, kind, pos });
    }

    /// Advance all power-up state by one tick.
    ///
    /// Returns the kinds collected this tick so the caller can update
    /// session stats and run achievement checks.
    pub fn update(
        &mut self,
        dt: f64,
        session: &mut Session,
        board: &BoardLayout,
        adapter: &mut dyn PhysicsAdapter,
        rng: &mut Pcg32,
        notifications: &mut NotificationQueue,
    ) -> Vec<PowerupKind> {
        self.roll_spawns(dt, board, rng);

        let collected = self.collect_touching(session, adapter, notifications);

        // Expire active effects
        let mut expired = Vec::new();
        for powerup in &mut self.active {
            powerup.time_left -= dt;
            if powerup.time_left <= 0.0 {
                expired.push(powerup.kind);
            }
        }
        for kind in expired {
            self.active.retain(|a| a.kind != kind);
            self.revert_effect(kind, session, adapter);
            log::debug!("powerup expired: {}", kind.as_str());
        }

        // Continuous effects
        if self.is_active(PowerupKind::Magnet) {
            let center = board.center();
            for ball in adapter.ball_snapshots() {
                let dir = (center - ball.pos).normalize_or_zero();
                adapter.apply_force(ball.id, dir * MAGNET_STRENGTH);
            }
        }

        if self.is_active(PowerupKind::Explosion) {
            let balls = adapter.ball_snapshots();
            for a in &balls {
                for b in &balls {
                    if a.id == b.id {
                        continue;
                    }
                    if dist_sq(a.pos, b.pos) < EXPLOSION_RADIUS * EXPLOSION_RADIUS {
                        let away = (b.pos - a.pos).normalize_or_zero();
                        adapter.apply_force(b.id, away * EXPLOSION_STRENGTH);
                    }
                }
            }
        }

        if self.is_active(PowerupKind::Rainbow) {
            self.spawn_hue = (self.spawn_hue + RAINBOW_HUE_RATE * dt as f32).rem_euclid(360.0);
        }

        collected
    }

    /// Revert every live effect and forget all board state.
    /// Used on session reset: timers are invalidated, not drained.
    pub fn clear(&mut self, session: &mut Session, adapter: &mut dyn PhysicsAdapter) {
        let kinds: Vec<_> = self.active.iter().map(|a| a.kind).collect();
        for kind in kinds {
            self.revert_effect(kind, session, adapter);
        }
        self.active.clear();
        self.available.clear();
        self.spawn_timer = 0.0;
    }

    fn roll_spawns(&mut self, dt: f64, board: &BoardLayout, rng: &mut Pcg32) {
        self.spawn_timer += dt;
        while self.spawn_timer >= POWERUP_SPAWN_INTERVAL_SECS {
            self.spawn_timer -= POWERUP_SPAWN_INTERVAL_SECS;
            if self.available.len() >= MAX_AVAILABLE_POWERUPS {
                continue;
            }
            if rng.random::<f32>() >= POWERUP_SPAWN_CHANCE {
                continue;
            }
            let kind = PowerupKind::ALL[rng.random_range(0..PowerupKind::ALL.len())];
            let (min, max) = board.powerup_spawn_region();
            let pos = Vec2::new(
                rng.random_range(min.x..max.x),
                rng.random_range(min.y..max.y),
            );
            self.spawn_at(kind, pos);
        }
    }

    fn collect_touching(
        &mut self,
        session: &mut Session,
        adapter: &mut dyn PhysicsAdapter,
        notifications: &mut NotificationQueue,
    ) -> Vec<PowerupKind> {
        let balls = adapter.ball_snapshots();
        let mut collected = Vec::new();

        let mut i = 0;
        while i < self.available.len() {
            let powerup = self.available[i];
            let reach = POWERUP_RADIUS + self.collect_radius_bonus;
            let touched = balls.iter().any(|b| {
                let r = reach + b.radius;
                dist_sq(b.pos, powerup.pos) < r * r
            });
            if touched {
                self.available.remove(i);
                self.activate(powerup.kind, session, adapter, notifications);
                collected.push(powerup.kind);
            } else {
                i += 1;
            }
        }
        collected
    }

    fn activate(
        &mut self,
        kind: PowerupKind,
        session: &mut Session,
        adapter: &mut dyn PhysicsAdapter,
        notifications: &mut NotificationQueue,
    ) {
        // Same kind already active: revert first, then reactivate fresh
        if self.is_active(kind) {
            self.revert_effect(kind, session, adapter);
            self.active.retain(|a| a.kind != kind);
        }

        self.apply_effect(kind, session, adapter);
        self.active.push(ActivePowerup {
            kind,
            time_left: kind.duration_secs() * self.duration_multiplier,
        });
        notifications.push(
            format!("{} activated!", kind.as_str().to_uppercase()),
            NotificationKind::Powerup,
        );
    }

    fn apply_effect(&mut self, kind: PowerupKind, session: &mut Session, adapter: &mut dyn PhysicsAdapter) {
        match kind {
            PowerupKind::Multiplier => session.multiplier = 2.0,
            PowerupKind::SlowMo => adapter.set_time_scale(SLOWMO_TIME_SCALE),
            // Magnet/Explosion forces and Rainbow hue advance run per tick
            // while the kind is in the active set
            PowerupKind::Magnet | PowerupKind::Rainbow | PowerupKind::Explosion => {}
        }
    }

    fn revert_effect(&mut self, kind: PowerupKind, session: &mut Session, adapter: &mut dyn PhysicsAdapter) {
        match kind {
            PowerupKind::Multiplier => session.multiplier = 1.0,
            PowerupKind::SlowMo => adapter.set_time_scale(1.0),
            PowerupKind::Magnet | PowerupKind::Rainbow | PowerupKind::Explosion => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::session::GameMode;
    use crate::physics::testing::MockPhysics;
    use rand::SeedableRng;

    fn setup() -> (Session, BoardLayout, Pcg32, NotificationQueue) {
        (
            Session::new(GameMode::Classic),
            BoardLayout::new(800.0, 700.0),
            Pcg32::seed_from_u64(7),
            NotificationQueue::new(),
        )
    }

    #[test]
    fn test_collect_activates_multiplier() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(100.0, 100.0));
        let mut powerups = PowerupManager::new();
        powerups.spawn_at(PowerupKind::Multiplier, Vec2::new(100.0, 105.0));

        let collected =
            powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);

        assert_eq!(collected, vec![PowerupKind::Multiplier]);
        assert_eq!(session.multiplier, 2.0);
        assert!(powerups.available().is_empty());
        assert_eq!(powerups.active().len(), 1);
        assert_eq!(notes.drain().len(), 1);
    }

    #[test]
    fn test_out_of_reach_not_collected() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(100.0, 100.0));
        let mut powerups = PowerupManager::new();
        // 20 (powerup) + 8 (ball) = 28 reach; place it 40 away
        powerups.spawn_at(PowerupKind::Magnet, Vec2::new(140.0, 100.0));

        let collected =
            powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert!(collected.is_empty());
        assert_eq!(powerups.available().len(), 1);
    }

    #[test]
    fn test_recollect_refreshes_timer_not_stacks() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(100.0, 100.0));
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::Multiplier, Vec2::new(100.0, 100.0));
        powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);

        // Burn 4 seconds, then collect the same kind again
        powerups.update(4.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        powerups.spawn_at(PowerupKind::Multiplier, Vec2::new(100.0, 100.0));
        powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);

        assert_eq!(powerups.active().len(), 1);
        let remaining = powerups.active()[0].time_left;
        assert!(remaining > 9.9, "timer not refreshed: {remaining}");
        assert_eq!(session.multiplier, 2.0);
    }

    #[test]
    fn test_multiplier_expiry_boundary() {
        // Still active at 9.9s, reverted past 10s
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(100.0, 100.0));
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::Multiplier, Vec2::new(100.0, 100.0));
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        physics.balls.clear(); // keep the ball from re-collecting anything

        powerups.update(9.9, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert_eq!(session.multiplier, 2.0);

        powerups.update(0.2, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert_eq!(session.multiplier, 1.0);
        assert!(powerups.active().is_empty());
    }

    #[test]
    fn test_slowmo_sets_and_restores_time_scale() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(50.0, 50.0));
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::SlowMo, Vec2::new(50.0, 50.0));
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert_eq!(physics.time_scale, SLOWMO_TIME_SCALE);

        physics.balls.clear();
        powerups.update(8.1, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert_eq!(physics.time_scale, 1.0);
    }

    #[test]
    fn test_magnet_pulls_toward_center() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(50.0, 50.0));
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::Magnet, Vec2::new(50.0, 50.0));
        powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);

        let (ball, force) = physics.forces.last().copied().expect("no force applied");
        assert_eq!(ball, 1);
        // Center is at (400, 350); ball at (50, 50) should be pulled +x +y
        assert!(force.x > 0.0 && force.y > 0.0);
        assert!((force.length() - MAGNET_STRENGTH).abs() < 1e-5);
    }

    #[test]
    fn test_explosion_repels_only_within_radius() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new()
            .with_ball(1, Vec2::new(100.0, 100.0))
            .with_ball(2, Vec2::new(150.0, 100.0)) // 50 apart: inside radius
            .with_ball(3, Vec2::new(500.0, 100.0)); // far away
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::Explosion, Vec2::new(100.0, 100.0));
        powerups.update(0.016, &mut session, &board, &mut physics, &mut rng, &mut notes);

        // Ball 2 pushed away from ball 1 (+x); ball 3 untouched
        assert!(physics.forces.iter().any(|(id, f)| *id == 2 && f.x > 0.0));
        assert!(physics.forces.iter().any(|(id, f)| *id == 1 && f.x < 0.0));
        assert!(!physics.forces.iter().any(|(id, _)| *id == 3));
    }

    #[test]
    fn test_available_cap() {
        let mut powerups = PowerupManager::new();
        for i in 0..5 {
            powerups.spawn_at(PowerupKind::Rainbow, Vec2::new(i as f32, 0.0));
        }
        assert_eq!(powerups.available().len(), MAX_AVAILABLE_POWERUPS);
    }

    #[test]
    fn test_clear_reverts_everything() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(50.0, 50.0));
        let mut powerups = PowerupManager::new();

        powerups.spawn_at(PowerupKind::Multiplier, Vec2::new(50.0, 50.0));
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        physics.balls.clear();
        powerups.spawn_at(PowerupKind::SlowMo, Vec2::new(50.0, 50.0));
        physics.balls.push(crate::physics::BallSnapshot {
            id: 1,
            pos: Vec2::new(50.0, 50.0),
            vel: Vec2::ZERO,
            radius: BALL_RADIUS,
        });
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert_eq!(physics.time_scale, SLOWMO_TIME_SCALE);

        powerups.clear(&mut session, &mut physics);
        assert_eq!(session.multiplier, 1.0);
        assert_eq!(physics.time_scale, 1.0);
        assert!(powerups.active().is_empty());
        assert!(powerups.available().is_empty());
    }

    #[test]
    fn test_duration_multiplier_extends_activations() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(50.0, 50.0));
        let mut powerups = PowerupManager::new();
        powerups.set_duration_multiplier(1.5);

        powerups.spawn_at(PowerupKind::Explosion, Vec2::new(50.0, 50.0));
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        assert!((powerups.active()[0].time_left - 7.5).abs() < 1e-9);
    }

    #[test]
    fn test_rainbow_hue_cycles_only_while_active() {
        let (mut session, board, mut rng, mut notes) = setup();
        let mut physics = MockPhysics::new().with_ball(1, Vec2::new(50.0, 50.0));
        let mut powerups = PowerupManager::new();
        assert_eq!(powerups.spawn_hue(), None);

        powerups.spawn_at(PowerupKind::Rainbow, Vec2::new(50.0, 50.0));
        powerups.update(0.0, &mut session, &board, &mut physics, &mut rng, &mut notes);
        physics.balls.clear();
        powerups.update(1.0, &mut session, &board, &mut physics, &mut rng, &mut notes);

        let hue = powerups.spawn_hue().expect("rainbow should be active");
        assert!((hue - RAINBOW_HUE_RATE).abs() < 1e-4);
    }
}
