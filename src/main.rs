//! Plinko Pro entry point
//!
//! On wasm this exposes the binding surface the browser shell drives: the
//! JS side owns the physics engine and the canvas, pushes snapshots and
//! events in, and drains buffered physics commands back out each frame.
//! On native it runs a short headless demo session against a toy
//! integrator, mostly useful for eyeballing the log output.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use wasm_bindgen::prelude::*;

    use plinko_pro::game::{GameMode, GamePhase, GameStateMachine};
    use plinko_pro::physics::{BallSnapshot, BodyId, BodyRole, PhysicsAdapter, PhysicsEvent};
    use serde::Serialize;

    /// Physics commands buffered for the JS engine to apply after a tick
    #[derive(Debug, Default, Serialize)]
    struct CommandBuffer {
        forces: Vec<(BodyId, [f32; 2])>,
        removed: Vec<BodyId>,
        time_scale: Option<f32>,
    }

    /// Adapter over the JS-owned physics engine: snapshots are pushed in
    /// before each tick, commands are drained after.
    #[derive(Debug, Default)]
    struct JsPhysics {
        balls: Vec<BallSnapshot>,
        commands: CommandBuffer,
    }

    impl PhysicsAdapter for JsPhysics {
        fn apply_force(&mut self, ball: BodyId, force: glam::Vec2) {
            self.commands.forces.push((ball, [force.x, force.y]));
        }

        fn set_time_scale(&mut self, factor: f32) {
            self.commands.time_scale = Some(factor);
        }

        fn remove_body(&mut self, ball: BodyId) {
            self.balls.retain(|b| b.id != ball);
            self.commands.removed.push(ball);
        }

        fn ball_snapshots(&self) -> Vec<BallSnapshot> {
            self.balls.clone()
        }
    }

    /// One game instance; the shell creates exactly one
    #[wasm_bindgen]
    pub struct PlinkoGame {
        machine: GameStateMachine,
        physics: JsPhysics,
        events: Vec<PhysicsEvent>,
    }

    #[wasm_bindgen]
    impl PlinkoGame {
        #[wasm_bindgen(constructor)]
        pub fn new(width: f32, height: f32) -> Self {
            let seed = js_sys::Date::now() as u64;
            log::info!("game created with seed {seed}");
            Self {
                machine: GameStateMachine::new(seed, width, height),
                physics: JsPhysics::default(),
                events: Vec::new(),
            }
        }

        /// Start a session; `mode` is "classic", "timeattack" or "challenge"
        pub fn start(&mut self, mode: &str) {
            let mode = match mode {
                "timeattack" => GameMode::TimeAttack,
                "challenge" => GameMode::Challenge,
                _ => GameMode::Classic,
            };
            self.machine.start(mode, &mut self.physics);
        }

        pub fn back_to_menu(&mut self) {
            self.machine.back_to_menu();
        }

        /// Replace the ball snapshot set from the JS physics step (JSON
        /// array of `{id, pos: [x, y], vel: [x, y], radius}`)
        pub fn set_ball_snapshots(&mut self, json: &str) {
            match serde_json::from_str(json) {
                Ok(balls) => self.physics.balls = balls,
                Err(err) => log::warn!("bad snapshot payload: {err}"),
            }
        }

        pub fn register_ball(&mut self, id: BodyId) {
            self.machine.registry_mut().register(id, BodyRole::Ball);
        }

        pub fn register_peg(&mut self, id: BodyId) {
            self.machine.registry_mut().register(id, BodyRole::Peg);
        }

        pub fn register_zone(&mut self, id: BodyId, index: usize) {
            self.machine.registry_mut().register(id, BodyRole::Zone(index));
        }

        pub fn register_wall(&mut self, id: BodyId) {
            self.machine.registry_mut().register(id, BodyRole::Wall);
        }

        pub fn on_collision(&mut self, a: BodyId, b: BodyId, x: f32, y: f32) {
            self.events.push(PhysicsEvent::Collision {
                a,
                b,
                pos: glam::Vec2::new(x, y),
            });
        }

        pub fn on_zone_enter(&mut self, ball: BodyId, zone: usize) {
            self.events.push(PhysicsEvent::ZoneEnter { ball, zone });
        }

        /// Process queued events and advance by `dt` seconds
        pub fn tick(&mut self, dt: f64) {
            let events = std::mem::take(&mut self.events);
            self.machine.process_events(&events, &mut self.physics);
            self.machine.tick(dt, &mut self.physics);
        }

        /// Drain buffered physics commands as JSON for the JS engine
        pub fn take_commands(&mut self) -> String {
            let commands = std::mem::take(&mut self.physics.commands);
            serde_json::to_string(&commands).unwrap_or_else(|_| "{}".into())
        }

        pub fn try_drop_ball(&mut self) -> bool {
            self.machine.try_drop_ball(&self.physics)
        }

        pub fn resize(&mut self, width: f32, height: f32) {
            self.machine.resize_board(width, height);
        }

        pub fn phase(&self) -> String {
            match self.machine.phase() {
                GamePhase::Menu => "menu".into(),
                GamePhase::Playing => "playing".into(),
                GamePhase::Ended => "ended".into(),
            }
        }

        pub fn score(&self) -> f64 {
            self.machine.session().score as f64
        }

        pub fn combo(&self) -> u32 {
            self.machine.session().combo
        }

        pub fn multiplier(&self) -> f32 {
            self.machine.session().multiplier
        }

        pub fn time_left(&self) -> Option<f64> {
            self.machine.session().time_left
        }

        pub fn balls_left(&self) -> Option<u32> {
            self.machine.session().balls_left
        }

        pub fn high_score(&self) -> f64 {
            self.machine.high_scores().get(self.machine.session().mode) as f64
        }

        pub fn spawn_hue(&self) -> Option<f32> {
            self.machine.spawn_hue()
        }

        /// Uncollected power-ups on the board, for rendering
        pub fn available_powerups(&self) -> String {
            serde_json::to_string(self.machine.powerups().available())
                .unwrap_or_else(|_| "[]".into())
        }

        /// Active power-up effects with remaining time, for the HUD
        pub fn active_powerups(&self) -> String {
            serde_json::to_string(self.machine.powerups().active())
                .unwrap_or_else(|_| "[]".into())
        }

        /// Everything queued since the last drain, for toasts
        pub fn drain_notifications(&mut self) -> String {
            serde_json::to_string(&self.machine.drain_notifications())
                .unwrap_or_else(|_| "[]".into())
        }

        pub fn unlocked_achievements(&self) -> String {
            let ids: Vec<&str> = self.machine.achievements().unlocked_ids().collect();
            serde_json::to_string(&ids).unwrap_or_else(|_| "[]".into())
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
    log::info!("Plinko Pro core loaded");
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Plinko Pro (native) starting...");
    demo::run();
}

/// Headless demo: a toy integrator stands in for the browser physics
/// engine and a scripted session runs against it.
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use plinko_pro::consts::*;
    use plinko_pro::game::{GameMode, GamePhase, GameStateMachine};
    use plinko_pro::physics::{BallSnapshot, BodyId, BodyRole, PhysicsAdapter, PhysicsEvent};

    const GRAVITY: f32 = 300.0;
    const DT: f64 = 1.0 / 60.0;

    struct DemoBall {
        id: BodyId,
        pos: Vec2,
        vel: Vec2,
    }

    struct DemoPhysics {
        balls: Vec<DemoBall>,
        time_scale: f32,
    }

    impl DemoPhysics {
        fn new() -> Self {
            Self {
                balls: Vec::new(),
                time_scale: 1.0,
            }
        }

        fn spawn(&mut self, id: BodyId, x: f32) {
            self.balls.push(DemoBall {
                id,
                pos: Vec2::new(x, 0.0),
                vel: Vec2::ZERO,
            });
        }

        /// Integrate gravity plus random peg deflections, then report any
        /// ball that reached the zone strip.
        fn step(&mut self, dt: f64, floor_y: f32, rng: &mut Pcg32) -> Vec<(BodyId, f32)> {
            let dt = dt as f32 * self.time_scale;
            let mut landed = Vec::new();
            for ball in &mut self.balls {
                ball.vel.y += GRAVITY * dt;
                ball.vel.x += rng.random_range(-40.0..40.0) * dt;
                ball.pos += ball.vel * dt;
                if ball.pos.y >= floor_y {
                    landed.push((ball.id, ball.pos.x));
                }
            }
            landed
        }
    }

    impl PhysicsAdapter for DemoPhysics {
        fn apply_force(&mut self, ball: BodyId, force: Vec2) {
            if let Some(b) = self.balls.iter_mut().find(|b| b.id == ball) {
                b.vel += force;
            }
        }

        fn set_time_scale(&mut self, factor: f32) {
            self.time_scale = factor;
        }

        fn remove_body(&mut self, ball: BodyId) {
            self.balls.retain(|b| b.id != ball);
        }

        fn ball_snapshots(&self) -> Vec<BallSnapshot> {
            self.balls
                .iter()
                .map(|b| BallSnapshot {
                    id: b.id,
                    pos: b.pos,
                    vel: b.vel,
                    radius: BALL_RADIUS,
                })
                .collect()
        }
    }

    pub fn run() {
        let mut machine = GameStateMachine::new(1234, BOARD_WIDTH, BOARD_HEIGHT);
        let mut physics = DemoPhysics::new();
        let mut rng = Pcg32::seed_from_u64(5678);
        let mut next_id: BodyId = 1;

        machine.start(GameMode::TimeAttack, &mut physics);
        let floor_y = BOARD_HEIGHT - 10.0;

        let mut frame = 0u64;
        while machine.phase() == GamePhase::Playing {
            // Drop a ball every half second
            if frame % 30 == 0 && machine.try_drop_ball(&physics) {
                let x = rng.random_range(BOARD_WIDTH * 0.1..BOARD_WIDTH * 0.9);
                physics.spawn(next_id, x);
                machine.registry_mut().register(next_id, BodyRole::Ball);
                next_id += 1;
            }

            let landed = physics.step(DT, floor_y, &mut rng);
            let events: Vec<PhysicsEvent> = landed
                .into_iter()
                .filter_map(|(ball, x)| {
                    let zone = machine.board().zone_at(x)?.index;
                    Some(PhysicsEvent::ZoneEnter { ball, zone })
                })
                .collect();

            machine.process_events(&events, &mut physics);
            machine.tick(DT, &mut physics);

            for note in machine.drain_notifications() {
                log::info!("[{:?}] {}", note.kind, note.text);
            }
            frame += 1;
        }

        let session = machine.session();
        println!(
            "Demo session over: {} scored {} ({} balls, best combo window {}s)",
            session.mode.as_str(),
            session.score,
            session.stats.balls_dropped,
            COMBO_WINDOW_SECS,
        );
    }
}
