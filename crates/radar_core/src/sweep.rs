//! Sweep beam animation.
//!
//! The beam angle is a pure function of accumulated elapsed time. It wraps
//! into `[0, 2π)` after every advance, however long the stall between
//! frames was.

use std::f64::consts::TAU;

use crate::config::RadarConfig;
use crate::error::{RadarError, RadarResult};
use crate::projection::normalize_angle;

/// Snapshot of the beam.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepState {
    /// Beam angle after the latest advance, in `[0, 2π)`.
    pub current_angle: f64,
    /// Beam angle before the latest advance.
    pub previous_angle: f64,
    /// Unwrapped arc covered by the latest advance (radians, ≥ 0).
    pub last_delta: f64,
    /// Time for one full turn (ms).
    pub rotation_period_ms: f64,
    /// Timestamp passed to the latest [`SweepAnimator::tick`], if any.
    pub last_tick_ms: Option<f64>,
}

impl SweepState {
    /// Returns true if the latest advance passed through angle zero.
    #[must_use]
    pub fn wrapped(&self) -> bool {
        self.current_angle < self.previous_angle
    }

    /// Returns true if the latest advance covered at least one full turn.
    #[must_use]
    pub fn completed_full_turn(&self) -> bool {
        self.last_delta >= TAU
    }
}

/// Advances the beam against elapsed time.
#[derive(Debug, Clone)]
pub struct SweepAnimator {
    state: SweepState,
}

impl SweepAnimator {
    /// Creates an animator with the beam at north.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::InvalidConfig`] if the period is not finite
    /// and positive.
    pub fn new(rotation_period_ms: f64) -> RadarResult<Self> {
        if !(rotation_period_ms.is_finite() && rotation_period_ms > 0.0) {
            return Err(RadarError::InvalidConfig {
                field: "rotation_period_ms",
                value: rotation_period_ms,
                reason: "must be finite and positive",
            });
        }
        Ok(Self {
            state: SweepState {
                current_angle: 0.0,
                previous_angle: 0.0,
                last_delta: 0.0,
                rotation_period_ms,
                last_tick_ms: None,
            },
        })
    }

    /// Creates an animator from a validated config.
    ///
    /// # Errors
    ///
    /// Same as [`SweepAnimator::new`].
    pub fn from_config(config: &RadarConfig) -> RadarResult<Self> {
        Self::new(config.rotation_period_ms)
    }

    /// Places the beam at `angle` (normalized).
    #[must_use]
    pub fn with_start_angle(mut self, angle: f64) -> Self {
        let angle = normalize_angle(angle);
        self.state.current_angle = angle;
        self.state.previous_angle = angle;
        self
    }

    /// Returns a copy of the beam state.
    #[must_use]
    pub fn state(&self) -> SweepState {
        self.state
    }

    /// Returns the current beam angle.
    #[must_use]
    pub fn angle(&self) -> f64 {
        self.state.current_angle
    }

    /// Advances the beam by `elapsed_ms` and returns the new angle.
    ///
    /// Negative elapsed time (clock skew) counts as zero.
    pub fn advance(&mut self, elapsed_ms: f64) -> f64 {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.max(0.0)
        } else {
            0.0
        };
        let delta = elapsed / self.state.rotation_period_ms * TAU;

        if delta >= TAU {
            tracing::debug!(elapsed_ms = elapsed, "sweep advanced a full turn or more");
        }

        self.state.previous_angle = self.state.current_angle;
        self.state.current_angle = normalize_angle(self.state.current_angle + delta);
        self.state.last_delta = delta;
        self.state.current_angle
    }

    /// Advances from the previous tick's timestamp to `now_ms`.
    ///
    /// The first tick only records the timestamp.
    pub fn tick(&mut self, now_ms: f64) -> f64 {
        let elapsed = self.state.last_tick_ms.map_or(0.0, |last| now_ms - last);
        self.state.last_tick_ms = Some(now_ms);
        self.advance(elapsed)
    }
}
