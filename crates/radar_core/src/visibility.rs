//! Contact afterglow.
//!
//! A contact lights up the instant the beam passes its bearing and then
//! fades linearly, like phosphor on a real scope. State is keyed by
//! [`EntityId`] and owned here; callers never touch it.

use std::collections::{HashMap, HashSet};

use crate::entity::{Entity, EntityId};
use crate::projection::{in_range, normalize_angle};
use crate::sweep::SweepState;

/// Fade state of one contact.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisibilityState {
    /// When the beam last passed this contact (ms).
    pub last_illuminated_at: Option<f64>,
    /// Current brightness in `[0, 1]`.
    pub alpha: f64,
}

impl VisibilityState {
    /// A contact that has never been seen.
    pub const DARK: Self = Self {
        last_illuminated_at: None,
        alpha: 0.0,
    };

    /// Returns true if the contact should be drawn.
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Returns true if the beam passed `bearing` during the latest advance.
///
/// `bearing` may be unnormalized. On a wrapping tick this also counts
/// bearings between the previous angle and 2π; a tick covering a full
/// turn counts every bearing.
#[must_use]
pub fn swept_past(sweep: &SweepState, bearing: f64) -> bool {
    if sweep.completed_full_turn() {
        return true;
    }
    let a = normalize_angle(bearing);
    let current = sweep.current_angle;
    let previous = sweep.previous_angle;

    if sweep.wrapped() {
        a <= current || a > previous
    } else {
        current >= a && previous < a
    }
}

/// Linear fade from 1 at illumination to 0 after `fade_ms`.
#[inline]
#[must_use]
pub fn fade_alpha(now_ms: f64, illuminated_at_ms: f64, fade_ms: f64) -> f64 {
    (1.0 - (now_ms - illuminated_at_ms) / fade_ms).clamp(0.0, 1.0)
}

/// Per-contact fade bookkeeping.
///
/// Entities missing from a snapshot keep fading and are dropped once dark.
#[derive(Debug, Clone, Default)]
pub struct ContactVisibilityModel {
    states: HashMap<EntityId, VisibilityState>,
    present: HashSet<EntityId>,
}

impl ContactVisibilityModel {
    /// Creates an empty model.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the fade state of every entity for the current beam.
    pub fn update(
        &mut self,
        entities: &[Entity],
        sweep: &SweepState,
        max_range_meters: f64,
        fade_fraction: f64,
        now_ms: f64,
    ) {
        let fade_ms = sweep.rotation_period_ms * fade_fraction;
        self.present.clear();
        for entity in entities {
            let previous = self.state(entity.id);
            let next = Self::next_state(previous, entity, sweep, max_range_meters, fade_ms, now_ms);
            self.states.insert(entity.id, next);
            self.present.insert(entity.id);
        }

        let present = &self.present;
        self.states.retain(|id, state| {
            if present.contains(id) {
                return true;
            }
            state.alpha = state
                .last_illuminated_at
                .map_or(0.0, |at| fade_alpha(now_ms, at, fade_ms));
            state.is_visible()
        });
    }

    fn next_state(
        previous: VisibilityState,
        entity: &Entity,
        sweep: &SweepState,
        max_range_meters: f64,
        fade_ms: f64,
        now_ms: f64,
    ) -> VisibilityState {
        if !in_range(entity.distance_meters, max_range_meters) {
            return VisibilityState::DARK;
        }

        let last_illuminated_at = if swept_past(sweep, entity.angle_radians) {
            Some(now_ms)
        } else {
            previous.last_illuminated_at
        };

        let alpha = last_illuminated_at.map_or(0.0, |at| fade_alpha(now_ms, at, fade_ms));
        VisibilityState {
            last_illuminated_at,
            alpha,
        }
    }

    /// Fade state for `id`; dark if the entity was never seen.
    #[must_use]
    pub fn state(&self, id: EntityId) -> VisibilityState {
        self.states.get(&id).copied().unwrap_or(VisibilityState::DARK)
    }

    /// Current alpha for `id`.
    #[must_use]
    pub fn alpha(&self, id: EntityId) -> f64 {
        self.state(id).alpha
    }

    /// Drops the state of one entity.
    pub fn forget(&mut self, id: EntityId) -> Option<VisibilityState> {
        self.states.remove(&id)
    }

    /// Drops all state.
    pub fn clear(&mut self) {
        self.states.clear();
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.states.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sweep::SweepAnimator;
    use std::f64::consts::{PI, TAU};

    const PERIOD: f64 = 4500.0;
    const FADE: f64 = 1.0 / 1.5;
    const RANGE: f64 = 100.0;

    fn sweep_state(previous: f64, current: f64) -> SweepState {
        SweepState {
            current_angle: current,
            previous_angle: previous,
            last_delta: (current - previous).rem_euclid(TAU),
            rotation_period_ms: PERIOD,
            last_tick_ms: None,
        }
    }

    #[test]
    fn test_crossing_without_wrap() {
        let s = sweep_state(1.0, 1.2);
        assert!(swept_past(&s, 1.1));
        assert!(swept_past(&s, 1.2));
        assert!(!swept_past(&s, 1.0));
        assert!(!swept_past(&s, 1.3));
    }

    #[test]
    fn test_crossing_through_zero() {
        let s = sweep_state(TAU - 0.1, 0.05);
        assert!(swept_past(&s, 0.0));
        assert!(swept_past(&s, 0.02));
        assert!(swept_past(&s, TAU - 0.05));
        assert!(!swept_past(&s, 0.5));
        assert!(!swept_past(&s, TAU - 0.2));
    }

    #[test]
    fn test_unnormalized_bearing() {
        let s = sweep_state(1.0, 1.2);
        assert!(swept_past(&s, 1.1 + 3.0 * TAU));
        assert!(swept_past(&s, 1.1 - TAU));
    }

    #[test]
    fn test_full_turn_crosses_everything() {
        let mut s = sweep_state(1.0, 1.0);
        s.last_delta = TAU * 2.0;
        assert!(swept_past(&s, 4.0));
    }

    #[test]
    fn test_out_of_range_is_reset() {
        let mut model = ContactVisibilityModel::new();
        let mut e = Entity::weapon(1, 50.0, 1.1);

        model.update(&[e.clone()], &sweep_state(1.0, 1.2), RANGE, FADE, 0.0);
        assert!((model.alpha(e.id) - 1.0).abs() < f64::EPSILON);

        e.distance_meters = RANGE + 1.0;
        model.update(&[e.clone()], &sweep_state(1.0, 1.2), RANGE, FADE, 10.0);
        assert_eq!(model.state(e.id), VisibilityState::DARK);
    }

    #[test]
    fn test_never_illuminated_stays_dark() {
        let mut model = ContactVisibilityModel::new();
        let e = Entity::ammo(1, 20.0, 3.0);
        model.update(&[e.clone()], &sweep_state(0.0, 0.5), RANGE, FADE, 100.0);
        assert_eq!(model.state(e.id), VisibilityState::DARK);
    }

    #[test]
    fn test_fade_is_linear_and_monotone() {
        let mut model = ContactVisibilityModel::new();
        let e = Entity::player(1, 1, 30.0, 1.1);
        let t0 = 1000.0;
        model.update(&[e.clone()], &sweep_state(1.0, 1.2), RANGE, FADE, t0);
        assert!((model.alpha(e.id) - 1.0).abs() < f64::EPSILON);

        let idle = sweep_state(2.0, 2.0);
        let fade_ms = PERIOD * FADE;
        let mut last = 1.0;
        for step in 1..=30 {
            let now = t0 + fade_ms * f64::from(step) / 30.0;
            model.update(&[e.clone()], &idle, RANGE, FADE, now);
            let alpha = model.alpha(e.id);
            assert!(alpha <= last);
            last = alpha;
        }
        assert!(model.alpha(e.id) < 1e-9);

        model.update(&[e.clone()], &idle, RANGE, FADE, t0 + fade_ms + 500.0);
        assert!(model.alpha(e.id).abs() < f64::EPSILON);
        assert_eq!(model.state(e.id).last_illuminated_at, Some(t0));
    }

    #[test]
    fn test_scenario_north_contact_from_three_quarter_turn() {
        let mut sweep = SweepAnimator::new(PERIOD).unwrap().with_start_angle(1.5 * PI);
        let mut model = ContactVisibilityModel::new();
        let e = Entity::weapon(9, 10.0, 0.0);

        let mut now = 0.0;
        let mut crossed_at = None;
        while crossed_at.is_none() {
            now += 16.0;
            sweep.advance(16.0);
            model.update(&[e.clone()], &sweep.state(), RANGE, FADE, now);
            if model.state(e.id).last_illuminated_at.is_some() {
                crossed_at = Some(now);
                assert!((model.alpha(e.id) - 1.0).abs() < f64::EPSILON);
            }
        }
        let t_cross = crossed_at.unwrap();
        // A quarter turn at 4500 ms per turn is 1125 ms.
        assert!((t_cross - 1125.0).abs() <= 16.0);

        while now < t_cross + 3000.0 {
            now += 16.0;
            sweep.advance(16.0);
            model.update(&[e.clone()], &sweep.state(), RANGE, FADE, now);
        }
        assert!(model.alpha(e.id).abs() < f64::EPSILON);
    }

    #[test]
    fn test_absent_entities_fade_then_drop() {
        let mut model = ContactVisibilityModel::new();
        let lit = Entity::weapon(1, 10.0, 1.1);
        let dark = Entity::ammo(2, 10.0, 3.0);
        model.update(&[lit.clone(), dark.clone()], &sweep_state(1.0, 1.2), RANGE, FADE, 0.0);
        assert_eq!(model.tracked(), 2);

        // Both drop out: the dark one goes, the lit one keeps its afterglow.
        let idle = sweep_state(2.0, 2.0);
        model.update(&[], &idle, RANGE, FADE, 100.0);
        assert_eq!(model.tracked(), 1);
        let alpha = model.alpha(lit.id);
        assert!(alpha > 0.0 && alpha < 1.0);

        // Back for a frame, the fade carries on from the same crossing.
        model.update(&[lit.clone()], &idle, RANGE, FADE, 200.0);
        assert_eq!(model.state(lit.id).last_illuminated_at, Some(0.0));
        assert!(model.alpha(lit.id) < alpha);

        model.update(&[], &idle, RANGE, FADE, PERIOD * FADE + 1.0);
        assert_eq!(model.tracked(), 0);
    }

    #[test]
    fn test_one_frame_entities_do_not_accumulate() {
        let mut model = ContactVisibilityModel::new();
        let idle = sweep_state(2.0, 2.0);
        for id in 0..10_000_u64 {
            #[allow(clippy::cast_precision_loss)]
            let now = id as f64 * 16.0;
            let far = Entity::weapon(id, RANGE * 2.0, 0.5);
            model.update(&[far], &idle, RANGE, FADE, now);
            assert!(model.tracked() <= 1);
        }
    }

    #[test]
    fn test_forget_and_clear() {
        let mut model = ContactVisibilityModel::new();
        let a = Entity::weapon(1, 10.0, 1.1);
        let b = Entity::ammo(2, 10.0, 1.1);
        model.update(&[a.clone(), b.clone()], &sweep_state(1.0, 1.2), RANGE, FADE, 0.0);
        assert_eq!(model.tracked(), 2);

        assert!(model.forget(a.id).is_some());
        assert_eq!(model.tracked(), 1);
        model.clear();
        assert_eq!(model.tracked(), 0);
    }
}
