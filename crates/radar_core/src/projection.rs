//! Polar to screen projection.
//!
//! Pure functions. Screen space has its origin at the radar center, +x to
//! the right and +y down, so north is up and bearings run clockwise.

use std::f64::consts::TAU;

use crate::entity::Entity;

/// Screen-space result of projecting one entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Offset from the radar center (pixels).
    pub x: f64,
    /// Offset from the radar center (pixels, +y down).
    pub y: f64,
    /// False when the entity is beyond radar range and must not be drawn.
    pub in_range: bool,
}

impl Projected {
    /// Returns true if both coordinates are finite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Wraps any finite angle into `[0, 2π)`.
#[inline]
#[must_use]
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Bearing of `angle_radians` as seen when facing `heading_radians`.
#[inline]
#[must_use]
pub fn relative_bearing(angle_radians: f64, heading_radians: f64) -> f64 {
    angle_radians - heading_radians
}

/// Returns true if `distance_meters` is within radar range.
///
/// Meters against meters; never compare against the pixel radius.
#[inline]
#[must_use]
pub fn in_range(distance_meters: f64, max_range_meters: f64) -> bool {
    distance_meters <= max_range_meters
}

/// Projects an entity onto the display.
#[must_use]
pub fn project(
    entity: &Entity,
    heading_radians: f64,
    radius_pixels: f64,
    max_range_meters: f64,
) -> Projected {
    let rel = relative_bearing(entity.angle_radians, heading_radians);
    let scale = radius_pixels / max_range_meters;
    let d = entity.distance_meters;

    Projected {
        x: rel.sin() * d * scale,
        y: -rel.cos() * d * scale,
        in_range: in_range(d, max_range_meters),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_north_is_up() {
        let e = Entity::weapon(1, 50.0, 0.0);
        let p = project(&e, 0.0, 100.0, 100.0);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, -50.0));
        assert!(p.in_range);
    }

    #[test]
    fn test_east_is_right() {
        let e = Entity::weapon(1, 100.0, FRAC_PI_2);
        let p = project(&e, 0.0, 200.0, 100.0);
        assert!(close(p.x, 200.0));
        assert!(close(p.y, 0.0));
    }

    #[test]
    fn test_heading_rotates_world() {
        // Facing east, an entity due east should appear straight ahead.
        let e = Entity::ammo(1, 10.0, FRAC_PI_2);
        let p = project(&e, FRAC_PI_2, 100.0, 100.0);
        assert!(close(p.x, 0.0));
        assert!(close(p.y, -10.0));

        // Facing south, north is behind us.
        let e = Entity::ammo(2, 10.0, 0.0);
        let p = project(&e, PI, 100.0, 100.0);
        assert!(close(p.y, 10.0));
    }

    #[test]
    fn test_range_cull_uses_meters() {
        // A 150 px radius must not make a 120 m contact visible on a 100 m radar.
        let e = Entity::weapon(1, 120.0, 0.0);
        assert!(!project(&e, 0.0, 150.0, 100.0).in_range);

        let edge = Entity::weapon(2, 100.0, 0.0);
        assert!(project(&edge, 0.0, 50.0, 100.0).in_range);
    }

    #[test]
    fn test_normalize_angle() {
        assert!(close(normalize_angle(-FRAC_PI_2), 1.5 * PI));
        assert!(close(normalize_angle(5.0 * TAU + 1.0), 1.0));
        assert!(normalize_angle(TAU) < TAU);
        assert!(normalize_angle(-1e-18) < TAU);
    }
}
