//! Per-frame surface geometry.

/// Share of the half-extent the radar disc occupies; the rest is margin
/// for compass labels.
pub const RADIUS_FACTOR: f64 = 0.85;

/// Size-derived drawing parameters, recomputed every frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    /// Surface width (pixels).
    pub width: u32,
    /// Surface height (pixels).
    pub height: u32,
    /// Radar disc radius (pixels).
    pub radius_pixels: f64,
}

impl SurfaceGeometry {
    /// Derives the geometry of a `width × height` surface.
    #[must_use]
    pub fn from_size(width: u32, height: u32) -> Self {
        let short_side = f64::from(width.min(height));
        Self {
            width,
            height,
            radius_pixels: RADIUS_FACTOR * short_side / 2.0,
        }
    }

    /// Surface center (pixels).
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// The size tag layers are keyed by.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
