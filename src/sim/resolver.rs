//! Collision-driven scoring
//!
//! Turns collision starts from the physics step into game effects:
//!
//! | Other body | Effect                                               |
//! |------------|------------------------------------------------------|
//! | Pot        | soup quality up, ingredient removed, may win the run |
//! | Floor      | panic up, screen shake, ingredient removed, may lose |
//! | Hand       | ingredient flung toward the pot, stays alive         |
//!
//! Pot and floor are terminal for an ingredient; hands are not. Every pair is
//! checked against the active set first, so an ingredient referenced by
//! several pairs in one step is only ever resolved once.

use glam::Vec2;
use rand::Rng;

use super::arms::Side;
use super::physics::{BodyHandle, BodyRole, CollisionStart};
use super::state::{Feedback, GameEvent, GameSession, RunState, SoundCue};
use crate::consts::*;

/// Apply every collision start from one physics step, in order
pub fn resolve(session: &mut GameSession, contacts: &[CollisionStart]) {
    for contact in contacts {
        resolve_pair(session, contact);
    }
}

fn resolve_pair(session: &mut GameSession, contact: &CollisionStart) {
    use BodyRole::*;

    let (ingredient, other) = match (contact.a_role, contact.b_role) {
        // Fruit bumping fruit is handled by the physics response alone
        (Ingredient, Ingredient) => return,
        (Ingredient, other) => (contact.a, other),
        (other, Ingredient) => (contact.b, other),
        // Static/kinematic pairs never reach here, nothing to do if they do
        (PotZone | Floor | HandLeft | HandRight, _) => return,
    };

    if !session.is_active(ingredient) {
        log::trace!("Skipping contact for resolved ingredient {:?}", ingredient);
        return;
    }

    match other {
        PotZone => catch(session, ingredient),
        Floor => miss(session, ingredient),
        HandLeft => deflect(session, ingredient, Side::Left),
        HandRight => deflect(session, ingredient, Side::Right),
        Ingredient => {}
    }
}

fn body_pos(session: &GameSession, handle: BodyHandle) -> Option<Vec2> {
    session.world.as_ref()?.get(handle).map(|b| b.pos)
}

/// Ingredient landed in the pot
fn catch(session: &mut GameSession, handle: BodyHandle) {
    let pos = body_pos(session, handle).unwrap_or_else(|| session.pot_bounds().center);
    let Some(ingredient) = session.remove_ingredient(handle) else {
        return;
    };

    if session.run_state != RunState::Playing {
        // Leftovers settling after the run ended
        return;
    }

    log::debug!("Caught {:?}", ingredient.kind);
    session.play_sound(SoundCue::Plop);
    session.play_sound(SoundCue::Splash);
    session.feedback.push(Feedback::new(
        "Perfect!",
        pos - Vec2::new(0.0, FEEDBACK_OFFSET),
        CATCH_COLOR,
    ));
    session.events.push(GameEvent::Caught {
        kind: ingredient.kind,
        pos,
    });
    session.add_soup(session.params.catch_bonus);
}

/// Ingredient hit the floor (or fell past it)
pub(crate) fn miss(session: &mut GameSession, handle: BodyHandle) {
    let pos = body_pos(session, handle).unwrap_or(Vec2::new(
        session.chef_x(),
        session.viewport.height,
    ));
    let Some(ingredient) = session.remove_ingredient(handle) else {
        return;
    };

    if session.run_state != RunState::Playing {
        return;
    }

    log::debug!("Missed {:?} at x={:.0}", ingredient.kind, pos.x);
    session.shake();
    session.feedback.push(Feedback::new(
        "MISS!",
        Vec2::new(pos.x, session.viewport.height - FEEDBACK_OFFSET),
        MISS_COLOR,
    ));
    session.events.push(GameEvent::Missed {
        kind: ingredient.kind,
        pos,
    });
    session.add_panic(session.params.miss_penalty);
}

/// A hand swatted the ingredient; send it toward the pot
///
/// Only the linear velocity is replaced; spin is kept.
fn deflect(session: &mut GameSession, handle: BodyHandle, side: Side) {
    if session.run_state != RunState::Playing {
        return;
    }
    let Some(pos) = body_pos(session, handle) else {
        return;
    };

    let target = session.pot_bounds().center;
    let dir = (target - pos).normalize_or_zero();
    let jitter = session.rng.random_range(-1.0f32..1.0) * DEFLECT_JITTER;
    let vel = dir * DEFLECT_STRENGTH + Vec2::new(jitter, -DEFLECT_LIFT);

    if let Some(world) = session.world.as_mut() {
        world.set_velocity(handle, vel);
    }
    session.events.push(GameEvent::Deflected { side, pos });
    log::trace!("{:?} hand deflected {:?} -> {:?}", side, handle, vel);
}
