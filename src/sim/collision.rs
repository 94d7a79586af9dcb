//! Narrow-phase contact tests
//!
//! Ingredients and hands are circles; pot and floor are axis-aligned
//! rectangles. Every test reports the contact normal pointing from the other
//! shape toward the circle, which is the direction the circle gets pushed.

use glam::Vec2;

/// Result of a contact check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the shapes overlap
    pub hit: bool,
    /// Contact point (if hit)
    pub point: Vec2,
    /// Unit normal pointing toward the first shape
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: Vec2::ZERO,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Check overlap between two circles
///
/// Touching (distance == sum of radii) counts as a miss.
pub fn circle_circle(pos_a: Vec2, radius_a: f32, pos_b: Vec2, radius_b: f32) -> CollisionResult {
    let delta = pos_a - pos_b;
    let dist_sq = delta.length_squared();
    let reach = radius_a + radius_b;

    if dist_sq >= reach * reach {
        return CollisionResult::miss();
    }

    let dist = dist_sq.sqrt();
    // Concentric circles: pick "up" so the result is still usable
    let normal = if dist > 1e-4 { delta / dist } else { Vec2::NEG_Y };

    CollisionResult {
        hit: true,
        point: pos_b + normal * radius_b,
        normal,
        penetration: reach - dist,
    }
}

/// Check overlap between a circle and an axis-aligned rectangle
pub fn circle_rect(
    circle_pos: Vec2,
    radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> CollisionResult {
    let local = circle_pos - rect_center;
    let clamped = local.clamp(-half_extents, half_extents);

    if clamped != local {
        // Center outside the rectangle: closest point is on the boundary
        let delta = local - clamped;
        let dist_sq = delta.length_squared();
        if dist_sq >= radius * radius {
            return CollisionResult::miss();
        }
        let dist = dist_sq.sqrt();
        return CollisionResult {
            hit: true,
            point: rect_center + clamped,
            normal: delta / dist,
            penetration: radius - dist,
        };
    }

    // Center inside (tunneling case): push out through the nearest face
    let to_x_face = half_extents.x - local.x.abs();
    let to_y_face = half_extents.y - local.y.abs();
    let (normal, depth, point) = if to_x_face < to_y_face {
        let sign = if local.x < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(sign, 0.0),
            to_x_face,
            Vec2::new(sign * half_extents.x, local.y),
        )
    } else {
        let sign = if local.y < 0.0 { -1.0 } else { 1.0 };
        (
            Vec2::new(0.0, sign),
            to_y_face,
            Vec2::new(local.x, sign * half_extents.y),
        )
    };

    CollisionResult {
        hit: true,
        point: rect_center + point,
        normal,
        penetration: radius + depth,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_circle_overlap() {
        let result = circle_circle(Vec2::new(30.0, 0.0), 20.0, Vec2::ZERO, 20.0);
        assert!(result.hit);
        assert!((result.penetration - 10.0).abs() < 1e-4);
        // Normal points from b toward a
        assert!((result.normal - Vec2::X).length() < 1e-4);
    }

    #[test]
    fn test_circle_circle_touching_is_miss() {
        let result = circle_circle(Vec2::new(40.0, 0.0), 20.0, Vec2::ZERO, 20.0);
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_circle_concentric() {
        let result = circle_circle(Vec2::ZERO, 10.0, Vec2::ZERO, 5.0);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::NEG_Y);
        assert!((result.penetration - 15.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_lands_on_rect_top() {
        // Rect spans y in [90, 110]; circle of radius 10 centered at y = 85
        let result = circle_rect(
            Vec2::new(0.0, 85.0),
            10.0,
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 10.0),
        );
        assert!(result.hit);
        // +y is down, so the push-out normal points up
        assert!((result.normal - Vec2::NEG_Y).length() < 1e-4);
        assert!((result.penetration - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_circle_misses_rect_corner() {
        let result = circle_rect(
            Vec2::new(58.0, 88.0),
            10.0,
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 10.0),
        );
        // Corner at (50, 90) is sqrt(64 + 4) ≈ 8.2 away
        assert!(result.hit);

        let result = circle_rect(
            Vec2::new(60.0, 80.0),
            10.0,
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 10.0),
        );
        assert!(!result.hit);
    }

    #[test]
    fn test_circle_inside_rect_pushes_out_nearest_face() {
        let result = circle_rect(
            Vec2::new(45.0, 100.0),
            5.0,
            Vec2::new(0.0, 100.0),
            Vec2::new(50.0, 10.0),
        );
        assert!(result.hit);
        assert!((result.normal - Vec2::X).length() < 1e-4);
        assert!((result.penetration - 10.0).abs() < 1e-4);
    }
}
