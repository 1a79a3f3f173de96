//! # HUD Error Types
//!
//! Construction errors are returned to the host. Per-frame errors are
//! caught by the compositor and reported to the diagnostics sink.

use radar_core::{EntityId, RadarError};
use thiserror::Error;

/// Errors that can occur while building or drawing the HUD.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HudError {
    /// Invalid radar configuration.
    #[error(transparent)]
    Core(#[from] RadarError),

    /// The drawing surface has no pixels.
    #[error("invalid surface: {width}x{height}")]
    InvalidSurface {
        /// Surface width.
        width: u32,
        /// Surface height.
        height: u32,
    },

    /// A layer was blitted onto a surface of a different size.
    #[error("layer {layer} is {layer_width}x{layer_height}, surface is {surface_width}x{surface_height}")]
    LayerSizeMismatch {
        /// Layer name.
        layer: &'static str,
        /// Layer width.
        layer_width: u32,
        /// Layer height.
        layer_height: u32,
        /// Surface width.
        surface_width: u32,
        /// Surface height.
        surface_height: u32,
    },

    /// The heading for this frame is NaN or infinite.
    #[error("non-finite heading: {0}")]
    NonFiniteHeading(f64),

    /// The frame timestamp is NaN or infinite.
    #[error("non-finite timestamp: {0}")]
    NonFiniteTimestamp(f64),

    /// An entity projected to a NaN or infinite screen position.
    #[error("entity {id:?} projected to non-finite position ({x}, {y})")]
    NonFiniteProjection {
        /// Offending entity.
        id: EntityId,
        /// Projected x.
        x: f64,
        /// Projected y.
        y: f64,
    },
}

/// Result type for HUD operations.
pub type HudResult<T> = Result<T, HudError>;
