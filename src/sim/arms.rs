//! Noodle-arm control and forward kinematics
//!
//! Each arm is a single joint angle eased toward "raised" while its button is
//! held and relaxed back toward rest otherwise. The rest of the arm (elbow,
//! hand) is derived from that angle plus a wobble-driven sway. The sway is
//! part of where the hand really is: the hand colliders are placed at the
//! swayed position, so the wobble changes what the chef can reach.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::{Body, BodyHandle, BodyRole, PhysicsWorld};
use super::state::Viewport;
use crate::consts::*;
use crate::direction;

/// Which arm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Mirror factor: left arm angles open counter-clockwise, right clockwise
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Side::Left => 1.0,
            Side::Right => -1.0,
        }
    }

    pub fn role(self) -> BodyRole {
        match self {
            Side::Left => BodyRole::HandLeft,
            Side::Right => BodyRole::HandRight,
        }
    }
}

/// One arm's joint state
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmState {
    /// Raise angle (radians), within [ARM_ANGLE_MIN, ARM_ANGLE_MAX]
    pub angle: f32,
    /// Whether the raise button was held on the last logic tick
    pub raised: bool,
}

impl Default for ArmState {
    fn default() -> Self {
        Self {
            angle: ARM_ANGLE_MIN,
            raised: false,
        }
    }
}

impl ArmState {
    /// Ease one logic tick: flinch up fast, settle down slowly
    pub fn ease(&mut self, raise: bool) {
        self.raised = raise;
        self.angle = if raise {
            (self.angle + ARM_RAISE_SPEED).min(ARM_ANGLE_MAX)
        } else {
            (self.angle - ARM_DROP_SPEED).max(ARM_ANGLE_MIN)
        };
    }
}

/// World-space joint chain for one arm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    pub shoulder: Vec2,
    pub elbow: Vec2,
    pub hand: Vec2,
    /// Orientation for drawing the open hand
    pub hand_angle: f32,
}

/// Wobble terms shared by both arms for a given phase
#[derive(Debug, Clone, Copy)]
struct Wobble {
    primary: f32,
    secondary: f32,
    elbow_flex: f32,
}

impl Wobble {
    fn at(phase: f32) -> Self {
        Self {
            primary: (phase * 3.0).sin() * 8.0,
            secondary: (phase * 2.3).cos() * 6.0,
            elbow_flex: (phase * 1.7).sin() * 0.15,
        }
    }

    /// Sway offset for one arm; raised arms flail harder
    fn sway(&self, side: Side, raised: bool) -> Vec2 {
        let s = side.sign();
        let amp = if raised { 1.2 } else { 0.5 };
        amp * Vec2::new(
            s * self.primary + self.secondary * 0.5,
            self.secondary - s * self.primary * 0.4,
        )
    }
}

/// Compute the joint chain for one arm
pub fn forward_kinematics(
    side: Side,
    arm: &ArmState,
    chef_x: f32,
    viewport: &Viewport,
    phase: f32,
) -> ArmPose {
    use std::f32::consts::FRAC_PI_2;

    let scale = viewport.scale();
    let s = side.sign();
    let wobble = Wobble::at(phase);
    let sway = wobble.sway(side, arm.raised);
    let flex = wobble.elbow_flex;

    let shoulder = Vec2::new(
        chef_x - s * SHOULDER_OFFSET_X * scale,
        viewport.chef_base_y() - SHOULDER_HEIGHT * scale,
    );
    let elbow = shoulder
        + direction(-FRAC_PI_2 + s * (arm.angle + flex)) * UPPER_ARM_LENGTH * scale
        + sway * 0.3;
    let hand = elbow
        + direction(-FRAC_PI_2 + s * (arm.angle * FOREARM_GAIN + flex)) * FOREARM_LENGTH * scale
        + sway;

    ArmPose {
        shoulder,
        elbow,
        hand,
        hand_angle: -FRAC_PI_2 + s * (arm.angle * HAND_ANGLE_GAIN + flex),
    }
}

/// Owns both arms and their hand colliders
#[derive(Debug, Clone, Default)]
pub struct ArmController {
    pub left: ArmState,
    pub right: ArmState,
    /// Hand colliders (left, right), created on first sync
    hands: Option<[BodyHandle; 2]>,
}

impl ArmController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arm(&self, side: Side) -> &ArmState {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Drop both arms to rest
    pub fn lower(&mut self) {
        self.left = ArmState::default();
        self.right = ArmState::default();
    }

    /// Logic tick easing from the raise buttons
    pub fn ease(&mut self, raise_left: bool, raise_right: bool) {
        self.left.ease(raise_left);
        self.right.ease(raise_right);
    }

    /// Current poses for both arms (left, right)
    pub fn poses(&self, chef_x: f32, viewport: &Viewport, phase: f32) -> [ArmPose; 2] {
        [Side::Left, Side::Right]
            .map(|side| forward_kinematics(side, self.arm(side), chef_x, viewport, phase))
    }

    /// Hand collider handles, if they exist yet
    pub fn hands(&self) -> Option<[BodyHandle; 2]> {
        self.hands
    }

    /// Move the hand colliders to the current hand positions
    ///
    /// Creates the colliders the first time (or if the world lost them).
    pub fn sync_hands(
        &mut self,
        world: &mut PhysicsWorld,
        chef_x: f32,
        viewport: &Viewport,
        phase: f32,
    ) -> [ArmPose; 2] {
        let poses = self.poses(chef_x, viewport, phase);

        let hands = match self.hands {
            Some(hands) if hands.iter().all(|&h| world.contains(h)) => hands,
            stale => {
                if let Some(old) = stale {
                    old.iter().for_each(|&h| {
                        world.remove_body(h);
                    });
                }
                let hands = [Side::Left, Side::Right].map(|side| {
                    let pose = &poses[side as usize];
                    world.add_body(Body::kinematic_circle(side.role(), pose.hand, HAND_RADIUS))
                });
                log::debug!("Created hand colliders {:?}", hands);
                self.hands = Some(hands);
                hands
            }
        };

        for (handle, pose) in hands.iter().zip(&poses) {
            world.set_position(*handle, pose.hand);
        }
        poses
    }
}
