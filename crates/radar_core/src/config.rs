//! Radar configuration.
//!
//! Accepted once at construction. Every engine is built from a validated
//! [`RadarConfig`], so nothing downstream has to re-check these values.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{RadarError, RadarResult};

/// Tunables for the sweep, contact fade and static artwork.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    /// Time for the beam to complete one full turn (ms).
    pub rotation_period_ms: f64,
    /// Fraction of one rotation over which a contact fades from 1 to 0.
    pub fade_fraction: f64,
    /// Radar range; the outer ring of the grid (meters).
    pub max_range_meters: f64,
    /// Number of wedge bands in the sweep afterglow.
    pub band_count: u32,
    /// Number of compass tick marks around the rim.
    pub tick_count: u32,
    /// Angular width of the sweep afterglow wedge (radians).
    pub sweep_width_radians: f64,
}

impl RadarConfig {
    /// Default rotation period.
    pub const DEFAULT_ROTATION_PERIOD_MS: f64 = 4500.0;
    /// Default fade fraction (the contact is gone after two thirds of a turn).
    pub const DEFAULT_FADE_FRACTION: f64 = 1.0 / 1.5;
    /// Default radar range.
    pub const DEFAULT_MAX_RANGE_METERS: f64 = 100.0;
    /// Default afterglow band count.
    pub const DEFAULT_BAND_COUNT: u32 = 20;
    /// Default tick count (one every 5 degrees).
    pub const DEFAULT_TICK_COUNT: u32 = 72;
    /// Default afterglow wedge width.
    pub const DEFAULT_SWEEP_WIDTH_RADIANS: f64 = PI / 4.0;

    /// Parses a configuration from TOML text and validates it.
    ///
    /// Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::ConfigParse`] for malformed TOML and
    /// [`RadarError::InvalidConfig`] for out-of-range values.
    pub fn from_toml_str(text: &str) -> RadarResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| RadarError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the rotation period.
    #[must_use]
    pub fn with_rotation_period_ms(mut self, period: f64) -> Self {
        self.rotation_period_ms = period;
        self
    }

    /// Sets the fade fraction.
    #[must_use]
    pub fn with_fade_fraction(mut self, fraction: f64) -> Self {
        self.fade_fraction = fraction;
        self
    }

    /// Sets the radar range.
    #[must_use]
    pub fn with_max_range_meters(mut self, range: f64) -> Self {
        self.max_range_meters = range;
        self
    }

    /// Sets the afterglow band count.
    #[must_use]
    pub fn with_band_count(mut self, count: u32) -> Self {
        self.band_count = count;
        self
    }

    /// Sets the compass tick count.
    #[must_use]
    pub fn with_tick_count(mut self, count: u32) -> Self {
        self.tick_count = count;
        self
    }

    /// Sets the angular width of the sweep afterglow.
    #[must_use]
    pub fn with_sweep_width_radians(mut self, width: f64) -> Self {
        self.sweep_width_radians = width;
        self
    }

    /// Milliseconds a contact takes to fade out completely.
    #[must_use]
    pub fn fade_duration_ms(&self) -> f64 {
        self.rotation_period_ms * self.fade_fraction
    }

    /// Checks every field.
    ///
    /// # Errors
    ///
    /// Returns [`RadarError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> RadarResult<()> {
        if !(self.rotation_period_ms.is_finite() && self.rotation_period_ms > 0.0) {
            return Err(RadarError::InvalidConfig {
                field: "rotation_period_ms",
                value: self.rotation_period_ms,
                reason: "must be finite and positive",
            });
        }
        if !(self.fade_fraction > 0.0 && self.fade_fraction <= 1.0) {
            return Err(RadarError::InvalidConfig {
                field: "fade_fraction",
                value: self.fade_fraction,
                reason: "must be in (0, 1]",
            });
        }
        if !(self.max_range_meters.is_finite() && self.max_range_meters > 0.0) {
            return Err(RadarError::InvalidConfig {
                field: "max_range_meters",
                value: self.max_range_meters,
                reason: "must be finite and positive",
            });
        }
        if self.band_count == 0 {
            return Err(RadarError::InvalidConfig {
                field: "band_count",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if self.tick_count == 0 {
            return Err(RadarError::InvalidConfig {
                field: "tick_count",
                value: 0.0,
                reason: "must be at least 1",
            });
        }
        if !(self.sweep_width_radians > 0.0 && self.sweep_width_radians <= 2.0 * PI) {
            return Err(RadarError::InvalidConfig {
                field: "sweep_width_radians",
                value: self.sweep_width_radians,
                reason: "must be in (0, 2π]",
            });
        }
        Ok(())
    }
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            rotation_period_ms: Self::DEFAULT_ROTATION_PERIOD_MS,
            fade_fraction: Self::DEFAULT_FADE_FRACTION,
            max_range_meters: Self::DEFAULT_MAX_RANGE_METERS,
            band_count: Self::DEFAULT_BAND_COUNT,
            tick_count: Self::DEFAULT_TICK_COUNT,
            sweep_width_radians: Self::DEFAULT_SWEEP_WIDTH_RADIANS,
        }
    }
}
