//! Narrow interface to the external rigid-body engine
//!
//! The physics solver (gravity integration, collision resolution) is an
//! external collaborator. The core consumes its events, queries lightweight
//! ball snapshots, and requests forces/time-scale changes back through
//! [`PhysicsAdapter`]. It never owns or mutates body positions directly.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Physics body identifier, assigned by the simulation owner
pub type BodyId = u32;

/// Role assigned to a physics body at creation time
///
/// Game logic branches on this tag instead of parsing body label strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyRole {
    /// A live ball/particle in flight
    Ball,
    /// A static peg
    Peg,
    /// A scoring zone sensor, with its zone index
    Zone(usize),
    /// Boundary wall/ground
    Wall,
}

/// Maps body ids to their gameplay role
///
/// Populated by whoever creates bodies (presentation/simulation layer);
/// read by the core when classifying collision events.
#[derive(Debug, Clone, Default)]
pub struct BodyRegistry {
    roles: HashMap<BodyId, BodyRole>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: BodyId, role: BodyRole) {
        self.roles.insert(id, role);
    }

    /// Forget a body (despawned ball, board rebuild)
    pub fn unregister(&mut self, id: BodyId) {
        self.roles.remove(&id);
    }

    pub fn role_of(&self, id: BodyId) -> Option<BodyRole> {
        self.roles.get(&id).copied()
    }

    /// Drop all zone/peg/wall entries, keeping balls (used on board resize)
    pub fn clear_static(&mut self) {
        self.roles.retain(|_, role| *role == BodyRole::Ball);
    }
}

/// Position/velocity snapshot of one live ball
///
/// The physics engine owns the body; the core holds only this handle.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub id: BodyId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Events the physics step reports to the core, in step order
#[derive(Debug, Clone, Copy)]
pub enum PhysicsEvent {
    /// Contact between two bodies, fired once per pair per step
    Collision { a: BodyId, b: BodyId, pos: Vec2 },
    /// A ball crossed a scoring zone sensor (not a physical bounce)
    ZoneEnter { ball: BodyId, zone: usize },
}

/// Commands the core issues back to the physics engine
///
/// All methods are fire-and-forget: an unknown body id is the engine's
/// problem to ignore, never a core failure.
pub trait PhysicsAdapter {
    /// Apply an additive force to a ball this step (magnet, explosion)
    fn apply_force(&mut self, ball: BodyId, force: Vec2);

    /// Scale simulation time (slow motion); 1.0 is normal speed
    fn set_time_scale(&mut self, factor: f32);

    /// Despawn a ball body (out of bounds, resting)
    fn remove_body(&mut self, ball: BodyId);

    /// Snapshot of every live ball, in a stable order
    fn ball_snapshots(&self) -> Vec<BallSnapshot>;
}

/// In-memory physics stand-in for unit tests: records commands, serves
/// whatever snapshots the test staged.
#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    #[derive(Debug, Default)]
    pub struct MockPhysics {
        pub balls: Vec<BallSnapshot>,
        pub forces: Vec<(BodyId, Vec2)>,
        pub time_scale: f32,
        pub removed: Vec<BodyId>,
    }

    impl MockPhysics {
        pub fn new() -> Self {
            Self {
                balls: Vec::new(),
                forces: Vec::new(),
                time_scale: 1.0,
                removed: Vec::new(),
            }
        }

        pub fn with_ball(mut self, id: BodyId, pos: Vec2) -> Self {
            self.balls.push(BallSnapshot {
                id,
                pos,
                vel: Vec2::ZERO,
                radius: crate::consts::BALL_RADIUS,
            });
            self
        }
    }

    impl PhysicsAdapter for MockPhysics {
        fn apply_force(&mut self, ball: BodyId, force: Vec2) {
            self.forces.push((ball, force));
        }

        fn set_time_scale(&mut self, factor: f32) {
            self.time_scale = factor;
        }

        fn remove_body(&mut self, ball: BodyId) {
            self.balls.retain(|b| b.id != ball);
            self.removed.push(ball);
        }

        fn ball_snapshots(&self) -> Vec<BallSnapshot> {
            self.balls.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_roles() {
        let mut reg = BodyRegistry::new();
        reg.register(1, BodyRole::Ball);
        reg.register(2, BodyRole::Peg);
        reg.register(3, BodyRole::Zone(4));

        assert_eq!(reg.role_of(1), Some(BodyRole::Ball));
        assert_eq!(reg.role_of(3), Some(BodyRole::Zone(4)));
        assert_eq!(reg.role_of(99), None);
    }

    #[test]
    fn test_registry_clear_static_keeps_balls() {
        let mut reg = BodyRegistry::new();
        reg.register(1, BodyRole::Ball);
        reg.register(2, BodyRole::Peg);
        reg.register(3, BodyRole::Wall);

        reg.clear_static();
        assert_eq!(reg.role_of(1), Some(BodyRole::Ball));
        assert_eq!(reg.role_of(2), None);
        assert_eq!(reg.role_of(3), None);
    }
}
