//! 2D rigid-body world
//!
//! Small purpose-built simulation: dynamic circles (ingredients) falling
//! under gravity and bouncing off each other, plus static/kinematic
//! colliders (pot, floor, hands) that never move on their own.
//!
//! `step` reports collision *starts*: pairs that overlap now but did not on
//! the previous step. Pairs are ordered by handle so iteration is stable.

use std::collections::HashSet;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{CollisionResult, circle_circle, circle_rect};
use crate::consts::{AIR_FRICTION, PHYSICS_DT};

/// Stable identifier for a body in the world
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyHandle(pub u32);

/// What a body means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BodyRole {
    Ingredient,
    PotZone,
    Floor,
    HandLeft,
    HandRight,
}

/// How a body moves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyKind {
    /// Integrated under gravity, pushed by contacts
    Dynamic,
    /// Never moves
    Static,
    /// Teleported by game code each tick, never pushed
    Kinematic,
}

/// Collision shape
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Circle { radius: f32 },
    Rect { half_extents: Vec2 },
}

/// A rigid body
#[derive(Debug, Clone)]
pub struct Body {
    pub handle: BodyHandle,
    pub role: BodyRole,
    pub kind: BodyKind,
    pub shape: Shape,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rotation (radians), cosmetic spin picked up from friction
    pub angle: f32,
    pub angular_vel: f32,
    pub restitution: f32,
    pub friction: f32,
}

impl Body {
    /// A dynamic circle at rest
    pub fn dynamic_circle(role: BodyRole, pos: Vec2, radius: f32) -> Self {
        Self {
            handle: BodyHandle(0),
            role,
            kind: BodyKind::Dynamic,
            shape: Shape::Circle { radius },
            pos,
            vel: Vec2::ZERO,
            angle: 0.0,
            angular_vel: 0.0,
            restitution: 0.0,
            friction: 0.1,
        }
    }

    /// A static axis-aligned rectangle
    pub fn static_rect(role: BodyRole, center: Vec2, size: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            shape: Shape::Rect {
                half_extents: size / 2.0,
            },
            ..Self::dynamic_circle(role, center, 0.0)
        }
    }

    /// A kinematic circle
    pub fn kinematic_circle(role: BodyRole, pos: Vec2, radius: f32) -> Self {
        Self {
            kind: BodyKind::Kinematic,
            ..Self::dynamic_circle(role, pos, radius)
        }
    }

    pub fn with_material(mut self, restitution: f32, friction: f32) -> Self {
        self.restitution = restitution;
        self.friction = friction;
        self
    }

    #[inline]
    pub fn is_dynamic(&self) -> bool {
        self.kind == BodyKind::Dynamic
    }

    /// Mass proxy (area); only meaningful for dynamic bodies
    fn inverse_mass(&self) -> f32 {
        match (self.kind, self.shape) {
            (BodyKind::Dynamic, Shape::Circle { radius }) if radius > 0.0 => {
                1.0 / (radius * radius)
            }
            _ => 0.0,
        }
    }

    fn radius(&self) -> f32 {
        match self.shape {
            Shape::Circle { radius } => radius,
            Shape::Rect { half_extents } => half_extents.min_element(),
        }
    }
}

/// A pair of bodies that started touching during a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionStart {
    pub a: BodyHandle,
    pub a_role: BodyRole,
    pub b: BodyHandle,
    pub b_role: BodyRole,
}

/// Contact test between two bodies; normal points toward `a`
fn contact(a: &Body, b: &Body) -> CollisionResult {
    match (a.shape, b.shape) {
        (Shape::Circle { radius: ra }, Shape::Circle { radius: rb }) => {
            circle_circle(a.pos, ra, b.pos, rb)
        }
        (Shape::Circle { radius }, Shape::Rect { half_extents }) => {
            circle_rect(a.pos, radius, b.pos, half_extents)
        }
        (Shape::Rect { half_extents }, Shape::Circle { radius }) => {
            let mut result = circle_rect(b.pos, radius, a.pos, half_extents);
            result.normal = -result.normal;
            result
        }
        // Rectangles are always static
        (Shape::Rect { .. }, Shape::Rect { .. }) => CollisionResult::miss(),
    }
}

/// The physics world
#[derive(Debug, Clone)]
pub struct PhysicsWorld {
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Live bodies, sorted by handle
    bodies: Vec<Body>,
    /// Pairs (lower handle first) touching at the end of the last step
    contacts: HashSet<(BodyHandle, BodyHandle)>,
    next_id: u32,
}

impl PhysicsWorld {
    pub fn new(gravity: f32) -> Self {
        Self {
            gravity,
            bodies: Vec::new(),
            contacts: HashSet::new(),
            next_id: 1,
        }
    }

    /// Insert a body and return its handle
    pub fn add_body(&mut self, mut body: Body) -> BodyHandle {
        let handle = BodyHandle(self.next_id);
        self.next_id += 1;
        body.handle = handle;
        // Handles are monotonic, so pushing keeps the list sorted
        self.bodies.push(body);
        handle
    }

    /// Remove a body; unknown handles are ignored. Returns whether it existed.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        let Ok(idx) = self.index_of(handle) else {
            return false;
        };
        self.bodies.remove(idx);
        self.contacts.retain(|&(a, b)| a != handle && b != handle);
        true
    }

    pub fn get(&self, handle: BodyHandle) -> Option<&Body> {
        self.index_of(handle).ok().map(|i| &self.bodies[i])
    }

    pub fn get_mut(&mut self, handle: BodyHandle) -> Option<&mut Body> {
        match self.index_of(handle) {
            Ok(i) => Some(&mut self.bodies[i]),
            Err(_) => None,
        }
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.index_of(handle).is_ok()
    }

    /// Teleport a body (used for kinematic hands)
    pub fn set_position(&mut self, handle: BodyHandle, pos: Vec2) {
        if let Some(body) = self.get_mut(handle) {
            body.pos = pos;
        }
    }

    pub fn set_velocity(&mut self, handle: BodyHandle, vel: Vec2) {
        if let Some(body) = self.get_mut(handle) {
            body.vel = vel;
        }
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    fn index_of(&self, handle: BodyHandle) -> Result<usize, usize> {
        self.bodies.binary_search_by_key(&handle, |b| b.handle)
    }

    /// Advance the world by `dt` seconds and return new contacts
    pub fn step(&mut self, dt: f32) -> Vec<CollisionStart> {
        self.integrate(dt);

        let mut touching = HashSet::new();
        let mut started = Vec::new();

        // O(n^2) pair test - a handful of ingredients at most
        for i in 0..self.bodies.len() {
            for j in (i + 1)..self.bodies.len() {
                if !self.bodies[i].is_dynamic() && !self.bodies[j].is_dynamic() {
                    continue;
                }

                let result = contact(&self.bodies[i], &self.bodies[j]);
                if !result.hit {
                    continue;
                }

                let (left, right) = self.bodies.split_at_mut(j);
                resolve_contact(&mut left[i], &mut right[0], &result);

                let (a, b) = (&self.bodies[i], &self.bodies[j]);
                let key = (a.handle, b.handle);
                if !self.contacts.contains(&key) {
                    started.push(CollisionStart {
                        a: a.handle,
                        a_role: a.role,
                        b: b.handle,
                        b_role: b.role,
                    });
                }
                touching.insert(key);
            }
        }

        self.contacts = touching;
        started
    }

    fn integrate(&mut self, dt: f32) {
        // Air friction is tuned per 60 Hz frame
        let damping = (1.0 - AIR_FRICTION).powf(dt / PHYSICS_DT);
        let gravity = Vec2::new(0.0, self.gravity);

        for body in self.bodies.iter_mut().filter(|b| b.is_dynamic()) {
            body.vel += gravity * dt;
            body.vel *= damping;
            body.pos += body.vel * dt;
            body.angular_vel *= damping;
            body.angle += body.angular_vel * dt;
        }
    }
}

/// Push overlapping bodies apart and exchange impulse along the normal
fn resolve_contact(a: &mut Body, b: &mut Body, result: &CollisionResult) {
    let inv_a = a.inverse_mass();
    let inv_b = b.inverse_mass();
    let inv_sum = inv_a + inv_b;
    if inv_sum <= 0.0 {
        return;
    }

    let n = result.normal;
    a.pos += n * result.penetration * (inv_a / inv_sum);
    b.pos -= n * result.penetration * (inv_b / inv_sum);

    let rel = a.vel - b.vel;
    let vn = rel.dot(n);
    if vn >= 0.0 {
        // Already separating
        return;
    }

    let restitution = a.restitution.max(b.restitution);
    let jn = -(1.0 + restitution) * vn / inv_sum;
    a.vel += n * jn * inv_a;
    b.vel -= n * jn * inv_b;

    // Coulomb-ish friction on the tangential component, turned into spin
    let tangent = Vec2::new(-n.y, n.x);
    let vt = rel.dot(tangent);
    let friction = (a.friction * b.friction).sqrt();
    let jt = (-vt / inv_sum).clamp(-friction * jn, friction * jn);
    a.vel += tangent * jt * inv_a;
    b.vel -= tangent * jt * inv_b;

    if inv_a > 0.0 {
        a.angular_vel = -(a.vel.dot(tangent)) / a.radius().max(1.0);
    }
    if inv_b > 0.0 {
        b.angular_vel = -(b.vel.dot(tangent)) / b.radius().max(1.0);
    }
}
