//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and platform code:
//! - Fixed timesteps only (60 Hz physics, 16 ms logic)
//! - Seeded RNG per session
//! - Stable iteration order (bodies and ingredients sorted by handle)

pub mod arms;
pub mod autopilot;
pub mod collision;
pub mod physics;
pub mod resolver;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;

pub use arms::{ArmController, ArmPose, ArmState, Side, forward_kinematics};
pub use autopilot::autopilot_input;
pub use collision::{CollisionResult, circle_circle, circle_rect};
pub use physics::{Body, BodyHandle, BodyKind, BodyRole, CollisionStart, PhysicsWorld, Shape};
pub use snapshot::{IngredientView, RenderSnapshot};
pub use spawn::{SpawnScheduler, SpawnTask};
pub use state::{
    Chef, Feedback, GameEvent, GameSession, HudValues, Ingredient, IngredientKind, PotBounds,
    RunState, SoundCue, Viewport,
};
pub use tick::{FrameReport, FrameScheduler, TickInput, logic_tick, physics_tick};
