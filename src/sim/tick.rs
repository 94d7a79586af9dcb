//! Simulation clocks
//!
//! Two interleaved fixed-step clocks fed from real frame time:
//! - physics at 60 Hz: bodies, hand colliders, collisions, cosmetic decay
//! - logic at 16 ms: arm easing, chef movement, panic decay, HUD commit
//!
//! The spawn timer is polled after both. Everything runs on the caller's
//! thread, one tick body at a time.

use super::resolver;
use super::spawn;
use super::physics::BodyHandle;
use super::state::{GameSession, RunState};
use crate::consts::*;

/// Control levels sampled every tick (held, not edge-triggered)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub raise_left: bool,
    pub raise_right: bool,
    pub move_left: bool,
    pub move_right: bool,
}

/// Advance physics by one step
///
/// Does nothing at the menu or while paused. After a win or loss the world
/// keeps stepping so leftovers fall away, but hands and meters are frozen.
pub fn physics_tick(session: &mut GameSession, dt: f32) {
    if matches!(session.run_state, RunState::AtMenu | RunState::Paused) {
        return;
    }
    let playing = session.run_state == RunState::Playing;
    let Some(world) = session.world.as_mut() else {
        return;
    };

    let contacts = world.step(dt);

    if playing {
        if let Some(chef) = session.chef.as_mut() {
            chef.wobble += WOBBLE_STEP * dt / PHYSICS_DT;
            session
                .arms
                .sync_hands(world, chef.x, &session.viewport, chef.wobble);
        }
    }

    resolver::resolve(session, &contacts);
    cull_fallen(session);

    // Cosmetics
    session.screen_shake *= SHAKE_DECAY;
    if session.screen_shake < 0.01 {
        session.screen_shake = 0.0;
    }
    for text in session.feedback.iter_mut() {
        text.pos.y -= FEEDBACK_RISE * dt;
        text.life -= FEEDBACK_DECAY * dt;
    }
    session.feedback.retain(|f| f.life > 0.0);
}

/// Anything below the floor line missed, floor collider or not
///
/// A shrinking viewport can leave ingredients outside the rebuilt floor.
fn cull_fallen(session: &mut GameSession) {
    let Some(world) = session.world.as_ref() else {
        return;
    };
    let limit = session.viewport.height + FLOOR_THICKNESS;
    let fallen: Vec<_> = session
        .ingredients
        .iter()
        .filter(|ing| world.get(ing.handle).is_some_and(|b| b.pos.y > limit))
        .map(|ing| ing.handle)
        .collect();

    for handle in fallen {
        log::debug!("{:?} fell past the floor", handle);
        resolver::miss(session, handle);
    }
}

/// Advance game logic by one fixed 16 ms tick
pub fn logic_tick(session: &mut GameSession, input: &TickInput) {
    if session.run_state != RunState::Playing {
        return;
    }

    session.arms.ease(input.raise_left, input.raise_right);
    if let Some(chef) = session.chef.as_mut() {
        chef.steer(input.move_left, input.move_right, &session.viewport);
    }
    session.sync_pot();

    session.decay_panic();
    session.commit_hud();
}

/// What one frame did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub physics_steps: u32,
    pub logic_ticks: u32,
    pub spawned: Option<BodyHandle>,
}

/// Turns variable frame times into fixed physics and logic ticks
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    physics_accumulator: f32,
    logic_accumulator: f32,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one display frame of `elapsed` seconds
    pub fn advance(
        &mut self,
        session: &mut GameSession,
        input: &TickInput,
        elapsed: f32,
    ) -> FrameReport {
        let dt = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        session.clock += dt as f64;

        let mut report = FrameReport::default();

        self.physics_accumulator += dt;
        while self.physics_accumulator >= PHYSICS_DT && report.physics_steps < MAX_SUBSTEPS {
            physics_tick(session, PHYSICS_DT);
            self.physics_accumulator -= PHYSICS_DT;
            report.physics_steps += 1;
        }

        self.logic_accumulator += dt;
        while self.logic_accumulator >= LOGIC_DT && report.logic_ticks < MAX_SUBSTEPS {
            logic_tick(session, input);
            self.logic_accumulator -= LOGIC_DT;
            report.logic_ticks += 1;
        }

        report.spawned = spawn::poll(session);
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::arms::Side;
    use crate::sim::spawn::spawn_ingredient;
    use crate::sim::state::GameEvent;
    use crate::tuning::Difficulty;
    use glam::Vec2;

    fn playing(difficulty: Difficulty) -> GameSession {
        let mut session = GameSession::new(Settings::default(), 2024);
        session.start_run(difficulty);
        session
    }

    #[test]
    fn test_frame_runs_both_clocks() {
        let mut session = playing(Difficulty::Medium);
        let mut frames = FrameScheduler::new();

        let report = frames.advance(&mut session, &TickInput::default(), 0.055);
        assert_eq!(report.physics_steps, 3);
        assert_eq!(report.logic_ticks, 3);
        assert!((session.clock - 0.055).abs() < 1e-6);
    }

    #[test]
    fn test_huge_frame_is_clamped() {
        let mut session = playing(Difficulty::Medium);
        let mut frames = FrameScheduler::new();
        let report = frames.advance(&mut session, &TickInput::default(), 5.0);
        assert!(report.physics_steps <= MAX_SUBSTEPS);
        assert!((session.clock - MAX_FRAME_DT as f64).abs() < 1e-6);

        let report = frames.advance(&mut session, &TickInput::default(), f32::NAN);
        assert_eq!(report.physics_steps, 0);
    }

    #[test]
    fn test_ingredient_falls_to_the_floor_and_raises_panic() {
        let mut session = playing(Difficulty::Hard);
        let mut frames = FrameScheduler::new();
        session.spawner.cancel();

        let ing = spawn_ingredient(&mut session).expect("spawned");
        // Keep it well clear of the pot and the hands
        if let Some(body) = session.world.as_mut().and_then(|w| w.get_mut(ing)) {
            body.pos.x = 40.0;
        }

        for _ in 0..300 {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
            if !session.is_active(ing) {
                break;
            }
        }

        assert!(!session.is_active(ing));
        // One miss minus a little decay
        assert!(session.panic_level > 39.0 && session.panic_level <= 40.0);
        assert_eq!(session.run_state, RunState::Playing);
    }

    #[test]
    fn test_ingredient_dropped_on_pot_is_caught() {
        let mut session = playing(Difficulty::Easy);
        let mut frames = FrameScheduler::new();
        session.spawner.cancel();

        let pot = session.pot_bounds();
        let ing = spawn_ingredient(&mut session).expect("spawned");
        if let Some(body) = session.world.as_mut().and_then(|w| w.get_mut(ing)) {
            body.pos = Vec2::new(pot.center.x, pot.top - 60.0);
        }

        for _ in 0..120 {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
            if !session.is_active(ing) {
                break;
            }
        }

        assert!(!session.is_active(ing));
        assert_eq!(session.soup_quality, 20.0);
        assert_eq!(session.hud.soup_percent, 20);
    }

    #[test]
    fn test_pause_freezes_everything() {
        let mut session = playing(Difficulty::Medium);
        let mut frames = FrameScheduler::new();
        let ing = spawn_ingredient(&mut session).expect("spawned");
        session.panic_level = 50.0;
        session.pause();

        let before = session.world.as_ref().and_then(|w| w.get(ing)).map(|b| b.pos);
        for _ in 0..600 {
            let report = frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
            assert!(report.spawned.is_none());
        }
        let after = session.world.as_ref().and_then(|w| w.get(ing)).map(|b| b.pos);

        assert_eq!(before, after);
        assert_eq!(session.panic_level, 50.0);
        assert_eq!(session.ingredients.len(), 1);

        session.resume();
        assert!(session.spawner.is_armed());
    }

    #[test]
    fn test_spawns_arrive_while_playing() {
        let mut session = playing(Difficulty::Hard);
        let mut frames = FrameScheduler::new();
        let mut spawned = 0;
        // Hard spawns at most every 2.64 s
        for _ in 0..(60 * 3) {
            if frames
                .advance(&mut session, &TickInput::default(), PHYSICS_DT)
                .spawned
                .is_some()
            {
                spawned += 1;
            }
        }
        assert!(spawned >= 1);
        assert!(session.spawner.is_armed());
    }

    #[test]
    fn test_moving_chef_drags_the_pot() {
        let mut session = playing(Difficulty::Medium);
        let input = TickInput {
            move_right: true,
            ..Default::default()
        };
        logic_tick(&mut session, &input);
        assert_eq!(session.chef_x(), 410.0);

        let pot = session.pot_body().expect("pot");
        let pos = session.world.as_ref().and_then(|w| w.get(pot)).expect("pot body").pos;
        assert_eq!(pos.x, 410.0);
    }

    #[test]
    fn test_hands_follow_the_arms() {
        let mut session = playing(Difficulty::Medium);
        let input = TickInput {
            raise_left: true,
            ..Default::default()
        };
        for _ in 0..20 {
            logic_tick(&mut session, &input);
        }
        physics_tick(&mut session, PHYSICS_DT);

        let [left, _] = session.arms.hands().expect("hands");
        let hand = session.world.as_ref().and_then(|w| w.get(left)).expect("hand").pos;
        let chef = session.chef.expect("chef");
        let pose = session.arms.poses(chef.x, &session.viewport, chef.wobble)[0];
        assert_eq!(hand, pose.hand);
        assert_eq!(session.arms.left.angle, ARM_ANGLE_MAX);
    }

    #[test]
    fn test_feedback_text_fades_out() {
        let mut session = playing(Difficulty::Medium);
        session.spawner.cancel();
        session
            .feedback
            .push(crate::sim::state::Feedback::new("Perfect!", Vec2::new(0.0, 100.0), 0));
        physics_tick(&mut session, PHYSICS_DT);
        assert!(session.feedback[0].pos.y < 100.0);
        for _ in 0..60 {
            physics_tick(&mut session, PHYSICS_DT);
        }
        assert!(session.feedback.is_empty());
    }

    #[test]
    fn test_resize_mid_run_keeps_ingredient_in_flight() {
        let mut session = playing(Difficulty::Medium);
        let mut frames = FrameScheduler::new();
        session.spawner.cancel();
        let ing = spawn_ingredient(&mut session).expect("spawned");
        for _ in 0..10 {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
        }
        let before = session.world.as_ref().and_then(|w| w.get(ing)).expect("falling").pos;

        session.resize(1200.0, 800.0);

        let world = session.world.as_ref().expect("world");
        assert_eq!(world.get(ing).expect("still falling").pos, before);
        let pot = world.get(session.pot_body().expect("pot")).expect("pot body").pos;
        assert_eq!(pot.x, session.chef_x());
        assert_eq!(pot.y, 800.0 * POT_TOP + POT_HEIGHT / 2.0);
        assert!(session.is_active(ing));
        assert_eq!(session.run_state, RunState::Playing);
    }

    #[test]
    fn test_shrinking_viewport_still_resolves_ingredient_off_the_floor() {
        let settings = Settings {
            width: 1200.0,
            height: 800.0,
            ..Settings::default()
        };
        let mut session = GameSession::new(settings, 11);
        session.start_run(Difficulty::Medium);
        session.spawner.cancel();
        let mut frames = FrameScheduler::new();

        let ing = spawn_ingredient(&mut session).expect("spawned");
        if let Some(world) = session.world.as_mut() {
            world.set_position(ing, Vec2::new(900.0, 100.0));
        }
        // New floor spans -50..650, well short of x = 900
        session.resize(600.0, 800.0);

        for _ in 0..(60 * 10) {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
            if !session.is_active(ing) {
                break;
            }
        }

        assert!(!session.is_active(ing));
        assert!(!session.world.as_ref().expect("world").contains(ing));
        assert!(session.panic_level > 24.0 && session.panic_level <= 25.0);
        let misses = session
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::Missed { .. }))
            .count();
        assert_eq!(misses, 1);
    }

    #[test]
    fn test_hand_swat_through_physics_step() {
        let mut session = playing(Difficulty::Medium);
        session.spawner.cancel();
        let mut frames = FrameScheduler::new();

        let [left, _] = session.arms.hands().expect("hands");
        let hand = session
            .world
            .as_ref()
            .and_then(|w| w.get(left))
            .expect("left hand")
            .pos;
        let ing = spawn_ingredient(&mut session).expect("spawned");
        let radius = session.ingredient(ing).expect("tracked").radius;
        if let Some(world) = session.world.as_mut() {
            world.set_position(ing, hand - Vec2::new(0.0, radius + HAND_RADIUS + 5.0));
        }

        let mut swatted = false;
        for _ in 0..60 {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
            if session.events.iter().any(|e| {
                matches!(e, GameEvent::Deflected { side: Side::Left, .. })
            }) {
                swatted = true;
                break;
            }
        }

        assert!(swatted);
        assert!(session.is_active(ing));
        let body = session.world.as_ref().and_then(|w| w.get(ing)).expect("alive");
        // Flung toward the pot, which is right of the left hand
        assert!(body.vel.x > 0.0);
    }

    #[test]
    fn test_menu_ticks_are_inert() {
        let mut session = GameSession::new(Settings::default(), 1);
        let mut frames = FrameScheduler::new();
        for _ in 0..10 {
            frames.advance(&mut session, &TickInput::default(), PHYSICS_DT);
        }
        assert!(session.world.is_none());
        assert_eq!(session.run_state, RunState::AtMenu);
    }
}
