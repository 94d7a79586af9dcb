//! Ingredient spawning
//!
//! A one-shot timer that re-arms itself every time it fires. The pending
//! timer is an explicit handle in the session: cancelling clears it, and
//! arming always cancels first, so at most one spawn is ever pending.

use glam::Vec2;
use rand::Rng;

use super::physics::{Body, BodyHandle, BodyRole};
use super::state::{GameSession, Ingredient, IngredientKind, RunState};
use crate::consts::*;
use crate::tuning::DifficultyParams;

/// A pending spawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnTask {
    /// Session clock time (seconds) the spawn fires at
    pub fires_at: f64,
}

/// Holds at most one pending spawn
#[derive(Debug, Clone, Default)]
pub struct SpawnScheduler {
    task: Option<SpawnTask>,
}

impl SpawnScheduler {
    /// Arm a new spawn after a random delay; returns the delay in seconds
    pub fn schedule_next<R: Rng>(
        &mut self,
        now: f64,
        params: &DifficultyParams,
        rng: &mut R,
    ) -> f32 {
        self.cancel();
        let delay = spawn_delay(params, rng);
        self.task = Some(SpawnTask {
            fires_at: now + delay as f64,
        });
        delay
    }

    /// Drop the pending spawn, if any. Safe to call repeatedly.
    pub fn cancel(&mut self) -> bool {
        self.task.take().is_some()
    }

    pub fn is_armed(&self) -> bool {
        self.task.is_some()
    }

    pub fn pending(&self) -> Option<&SpawnTask> {
        self.task.as_ref()
    }

    /// Consume the task if it is due
    fn take_due(&mut self, now: f64) -> bool {
        match self.task {
            Some(task) if now >= task.fires_at => {
                self.task = None;
                true
            }
            _ => false,
        }
    }
}

/// Random spawn delay (seconds) for a difficulty
pub fn spawn_delay<R: Rng>(params: &DifficultyParams, rng: &mut R) -> f32 {
    let ms = rng.random_range(SPAWN_DELAY_MIN_MS..SPAWN_DELAY_MAX_MS);
    ms * params.spawn_delay_mult / 1000.0
}

/// Fire the pending spawn if it is due, then re-arm
///
/// Returns the spawned ingredient's handle.
pub fn poll(session: &mut GameSession) -> Option<BodyHandle> {
    if !session.spawner.take_due(session.clock) {
        return None;
    }

    if session.run_state != RunState::Playing {
        // Transitions cancel the timer, so this only guards against misuse
        log::warn!("Dropping spawn fired while {:?}", session.run_state);
        return None;
    }

    let handle = spawn_ingredient(session);
    session.arm_spawner();
    handle
}

/// Drop one random ingredient in at the top of the play area
pub fn spawn_ingredient(session: &mut GameSession) -> Option<BodyHandle> {
    let (left, right) = session.viewport.spawn_span();
    let kind = IngredientKind::ALL[session.rng.random_range(0..IngredientKind::ALL.len())];
    let x = left + session.rng.random::<f32>() * (right - left);
    let radius = session
        .rng
        .random_range(INGREDIENT_RADIUS_MIN..INGREDIENT_RADIUS_MAX);

    let world = session.world.as_mut()?;
    let handle = world.add_body(
        Body::dynamic_circle(BodyRole::Ingredient, Vec2::new(x, SPAWN_Y), radius)
            .with_material(INGREDIENT_RESTITUTION, INGREDIENT_FRICTION),
    );
    session.track_ingredient(Ingredient {
        handle,
        kind,
        radius,
    });

    log::debug!("Spawned {:?} at x={:.0} (r={:.1})", kind, x, radius);
    Some(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::tuning::Difficulty;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn playing(difficulty: Difficulty) -> GameSession {
        let mut session = GameSession::new(Settings::default(), 7);
        session.start_run(difficulty);
        session
    }

    #[test]
    fn test_delay_range_scales_with_difficulty() {
        let mut rng = Pcg32::seed_from_u64(1);
        for difficulty in Difficulty::ALL {
            let params = difficulty.params();
            for _ in 0..200 {
                let delay = spawn_delay(&params, &mut rng);
                assert!(delay >= 0.5 * params.spawn_delay_mult - 1e-4);
                assert!(delay < 2.2 * params.spawn_delay_mult + 1e-4);
            }
        }
    }

    #[test]
    fn test_rescheduling_replaces_pending_task() {
        let mut rng = Pcg32::seed_from_u64(2);
        let params = Difficulty::Medium.params();
        let mut scheduler = SpawnScheduler::default();

        scheduler.schedule_next(0.0, &params, &mut rng);
        scheduler.schedule_next(100.0, &params, &mut rng);
        let task = scheduler.pending().expect("armed");
        assert!(task.fires_at >= 100.0);

        assert!(scheduler.cancel());
        assert!(!scheduler.cancel());
        assert!(!scheduler.is_armed());
    }

    #[test]
    fn test_poll_fires_only_when_due_and_rearms() {
        let mut session = playing(Difficulty::Hard);
        let fires_at = session.spawner.pending().expect("armed").fires_at;

        session.clock = fires_at - 0.01;
        assert!(poll(&mut session).is_none());
        assert!(session.ingredients.is_empty());

        session.clock = fires_at;
        let handle = poll(&mut session).expect("spawned");
        assert_eq!(session.ingredients.len(), 1);
        assert!(session.is_active(handle));
        let next = session.spawner.pending().expect("re-armed").fires_at;
        assert!(next > fires_at);
    }

    #[test]
    fn test_spawn_lands_in_central_band() {
        let mut session = playing(Difficulty::Easy);
        for _ in 0..50 {
            let handle = spawn_ingredient(&mut session).expect("world exists");
            let body = session
                .world
                .as_ref()
                .and_then(|w| w.get(handle))
                .expect("body exists");
            assert!(body.pos.x >= 160.0 && body.pos.x <= 640.0);
            assert_eq!(body.pos.y, SPAWN_Y);
            assert_eq!(body.vel, Vec2::ZERO);
            let radius = session.ingredient(handle).expect("tracked").radius;
            assert!((INGREDIENT_RADIUS_MIN..INGREDIENT_RADIUS_MAX).contains(&radius));
        }
    }

    #[test]
    fn test_paused_session_never_spawns() {
        let mut session = playing(Difficulty::Medium);
        session.pause();
        session.clock += 1000.0;
        assert!(poll(&mut session).is_none());
        assert!(session.ingredients.is_empty());

        session.resume();
        assert!(session.spawner.is_armed());
    }

    #[test]
    fn test_no_world_no_spawn() {
        let mut session = GameSession::new(Settings::default(), 3);
        assert!(spawn_ingredient(&mut session).is_none());
        assert!(session.ingredients.is_empty());
    }
}
