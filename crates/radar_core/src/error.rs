//! # Radar Error Types
//!
//! Errors raised while building the radar's state machines.

use thiserror::Error;

/// Errors that can occur in the radar core.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadarError {
    /// A configuration value is outside its legal range.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfig {
        /// Name of the offending field.
        field: &'static str,
        /// The rejected value.
        value: f64,
        /// What the value must satisfy.
        reason: &'static str,
    },

    /// The configuration text could not be parsed.
    #[error("configuration parse error: {0}")]
    ConfigParse(String),
}

/// Result type for radar core operations.
pub type RadarResult<T> = Result<T, RadarError>;
