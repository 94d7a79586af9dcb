//! Noodle Chef - catch falling ingredients with wobbly noodle arms
//!
//! Core modules:
//! - `sim`: Simulation (physics, arms, spawning, collisions, game state)
//! - `settings`: Player preferences and run configuration
//! - `tuning`: Data-driven difficulty presets

pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::{Settings, SettingsError};
pub use tuning::{Difficulty, DifficultyParams};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Physics/render step (display refresh rate)
    pub const PHYSICS_DT: f32 = 1.0 / 60.0;
    /// Logic tick interval (panic decay, arm easing, HUD commit)
    pub const LOGIC_DT: f32 = 0.016;
    /// Maximum substeps per clock per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame we are willing to simulate
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Meter limits
    pub const WIN_SCORE: f32 = 100.0;
    pub const PANIC_MAX: f32 = 100.0;
    /// Panic bleed-off per logic tick
    pub const PANIC_DECAY: f32 = 0.05;
    /// HUD flags the panic bar above this
    pub const PANIC_HIGH: f32 = 70.0;

    /// Spawn delay range before the difficulty multiplier (milliseconds)
    pub const SPAWN_DELAY_MIN_MS: f32 = 500.0;
    pub const SPAWN_DELAY_MAX_MS: f32 = 2200.0;
    /// Fraction of the play width ingredients fall through (centered)
    pub const SPAWN_SPAN: f32 = 0.6;
    /// Spawn height, just above the visible area
    pub const SPAWN_Y: f32 = -30.0;

    /// Ingredient body defaults
    pub const INGREDIENT_RADIUS_MIN: f32 = 18.0;
    pub const INGREDIENT_RADIUS_MAX: f32 = 26.0;
    pub const INGREDIENT_RESTITUTION: f32 = 0.3;
    pub const INGREDIENT_FRICTION: f32 = 0.4;

    /// Difficulty gravity is in engine units; this converts to px/s²
    pub const GRAVITY_SCALE: f32 = 1000.0;
    /// Velocity lost to air per 60 Hz frame
    pub const AIR_FRICTION: f32 = 0.01;

    /// Arm angle bounds and easing (radians, per logic tick)
    pub const ARM_ANGLE_MIN: f32 = -0.5;
    pub const ARM_ANGLE_MAX: f32 = 1.2;
    pub const ARM_RAISE_SPEED: f32 = 0.14;
    pub const ARM_DROP_SPEED: f32 = 0.015;
    /// Forearm angle gain relative to the upper arm
    pub const FOREARM_GAIN: f32 = 1.4;
    /// Hand sprite angle gain (render only)
    pub const HAND_ANGLE_GAIN: f32 = 1.2;

    /// Skeleton proportions at scale 1.0
    pub const SHOULDER_OFFSET_X: f32 = 35.0;
    pub const SHOULDER_HEIGHT: f32 = 90.0;
    pub const UPPER_ARM_LENGTH: f32 = 112.5;
    pub const FOREARM_LENGTH: f32 = 125.0;
    pub const HAND_RADIUS: f32 = 22.0;
    /// Reference viewport size for scale 1.0
    pub const REFERENCE_SIZE: f32 = 800.0;

    /// Chef placement
    pub const CHEF_MARGIN: f32 = 80.0;
    pub const CHEF_BASE: f32 = 0.88;
    /// Wobble phase advance per 60 Hz frame
    pub const WOBBLE_STEP: f32 = 0.08;

    /// Pot geometry (visual bounds; collider is inset by POT_COLLIDER_INSET)
    pub const POT_TOP: f32 = 0.72;
    pub const POT_WIDTH: f32 = 140.0;
    pub const POT_HEIGHT: f32 = 100.0;
    pub const POT_COLLIDER_INSET: f32 = 20.0;

    /// Floor sits just below the visible area
    pub const FLOOR_THICKNESS: f32 = 40.0;
    pub const FLOOR_OVERHANG: f32 = 100.0;

    /// Hand deflection (px/s)
    pub const DEFLECT_STRENGTH: f32 = 480.0;
    pub const DEFLECT_JITTER: f32 = 60.0;
    pub const DEFLECT_LIFT: f32 = 180.0;

    /// Feedback text motion
    pub const FEEDBACK_DECAY: f32 = 1.2;
    pub const FEEDBACK_RISE: f32 = 90.0;
    pub const FEEDBACK_OFFSET: f32 = 40.0;
    pub const CATCH_COLOR: u32 = 0x2ecc71;
    pub const MISS_COLOR: u32 = 0xe74c3c;

    /// Screen shake decay per physics tick
    pub const SHAKE_DECAY: f32 = 0.9;
}

/// Unit vector pointing at `angle` (screen space, +y down)
#[inline]
pub fn direction(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Clamp `x` into `[min, max]`, centering when the range is inverted
#[inline]
pub fn clamp_or_center(x: f32, min: f32, max: f32) -> f32 {
    if min > max {
        (min + max) / 2.0
    } else {
        x.clamp(min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_points_up_at_minus_half_pi() {
        let up = direction(-std::f32::consts::FRAC_PI_2);
        assert!(up.x.abs() < 1e-6);
        assert!((up.y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_or_center_inverted_range() {
        assert_eq!(clamp_or_center(5.0, 80.0, 20.0), 50.0);
        assert_eq!(clamp_or_center(5.0, 20.0, 80.0), 20.0);
        assert_eq!(clamp_or_center(90.0, 20.0, 80.0), 80.0);
    }
}
