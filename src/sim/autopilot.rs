//! Demo-mode input
//!
//! A simple scripted player: walk under the lowest falling ingredient and
//! swat anything about to drop past the pot. Used by the headless runner.

use super::state::{GameSession, RunState};
use super::tick::TickInput;
use crate::consts::HAND_RADIUS;

/// Don't chase targets closer than this (px)
const STEER_DEADZONE: f32 = 6.0;
/// Swat when an ingredient is this close to a hand (px, beyond radii)
const SWAT_REACH: f32 = 60.0;

/// Pick inputs for the next logic tick
pub fn autopilot_input(session: &GameSession) -> TickInput {
    let mut input = TickInput::default();
    if session.run_state != RunState::Playing {
        return input;
    }
    let Some(world) = session.world.as_ref() else {
        return input;
    };

    let pot = session.pot_bounds();
    let chef_x = session.chef_x();

    // Lowest ingredient still above the pot rim
    let target = session
        .ingredients
        .iter()
        .filter_map(|ing| world.get(ing.handle).map(|b| (ing, b.pos)))
        .filter(|(_, pos)| pos.y < pot.top)
        .max_by(|(_, a), (_, b)| a.y.total_cmp(&b.y));

    if let Some((_, pos)) = target {
        let dx = pos.x - chef_x;
        if dx > STEER_DEADZONE {
            input.move_right = true;
        } else if dx < -STEER_DEADZONE {
            input.move_left = true;
        }
    }

    let Some(hands) = session.arms.hands() else {
        return input;
    };
    for ing in &session.ingredients {
        let Some(pos) = world.get(ing.handle).map(|b| b.pos) else {
            continue;
        };
        if pos.x >= pot.left && pos.x <= pot.right {
            continue;
        }
        for (i, hand) in hands.iter().enumerate() {
            let Some(hand_pos) = world.get(*hand).map(|b| b.pos) else {
                continue;
            };
            if pos.distance(hand_pos) < ing.radius + HAND_RADIUS + SWAT_REACH {
                match i {
                    0 => input.raise_left = true,
                    _ => input.raise_right = true,
                }
            }
        }
    }

    input
}
