//! Read-only view of a session for presentation
//!
//! Everything a renderer or HUD needs for one frame, detached from the
//! session so it can be serialized or handed across a boundary.

use glam::Vec2;
use serde::Serialize;

use super::arms::ArmPose;
use super::physics::BodyHandle;
use super::state::{Feedback, GameSession, HudValues, IngredientKind, PotBounds, RunState};

/// One ingredient as drawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct IngredientView {
    pub handle: BodyHandle,
    pub kind: IngredientKind,
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderSnapshot {
    pub run_state: RunState,
    pub chef_x: f32,
    /// Horizontal movement on the last logic tick (for lean/walk animation)
    pub chef_velocity: f32,
    pub chef_base_y: f32,
    /// Left, right
    pub arms: [ArmPose; 2],
    pub pot: PotBounds,
    pub ingredients: Vec<IngredientView>,
    pub soup_quality: f32,
    pub panic_level: f32,
    pub hud: HudValues,
    pub screen_shake: f32,
    pub feedback: Vec<Feedback>,
}

impl GameSession {
    pub fn snapshot(&self) -> RenderSnapshot {
        let chef_x = self.chef_x();
        let wobble = self.chef.map(|c| c.wobble).unwrap_or(0.0);

        let ingredients = match self.world.as_ref() {
            Some(world) => self
                .ingredients
                .iter()
                .filter_map(|ing| {
                    world.get(ing.handle).map(|body| IngredientView {
                        handle: ing.handle,
                        kind: ing.kind,
                        pos: body.pos,
                        angle: body.angle,
                        radius: ing.radius,
                    })
                })
                .collect(),
            None => Vec::new(),
        };

        RenderSnapshot {
            run_state: self.run_state,
            chef_x,
            chef_velocity: self.chef.map(|c| c.velocity).unwrap_or(0.0),
            chef_base_y: self.viewport.chef_base_y(),
            arms: self.arms.poses(chef_x, &self.viewport, wobble),
            pot: self.pot_bounds(),
            ingredients,
            soup_quality: self.soup_quality,
            panic_level: self.panic_level,
            hud: self.hud,
            screen_shake: self.screen_shake,
            feedback: self.feedback.clone(),
        }
    }
}
