//! Frame and cache statistics.

/// How often each static layer has been rasterized.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Sweep layer regenerations.
    pub sweep_renders: u32,
    /// Compass layer regenerations.
    pub compass_renders: u32,
    /// Grid layer regenerations.
    pub grid_renders: u32,
}

impl CacheStats {
    /// Sum over all layers.
    #[must_use]
    pub fn total(&self) -> u32 {
        self.sweep_renders + self.compass_renders + self.grid_renders
    }
}

/// Statistics from one rendered frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameStats {
    /// Sequence number of the frame (1-based).
    pub frame: u64,
    /// Time since the previous frame (ms).
    pub elapsed_ms: f64,
    /// Beam angle used for the frame.
    pub sweep_angle: f64,
    /// Static layers rasterized this frame (0 when the cache was fresh).
    pub layers_regenerated: u32,
    /// Layer blits issued.
    pub blits: u32,
    /// Contacts drawn.
    pub contacts_drawn: u32,
    /// Entities beyond radar range.
    pub contacts_culled: u32,
    /// In-range entities not drawn because their alpha was zero.
    pub contacts_dark: u32,
}

impl FrameStats {
    /// Frames per second implied by the elapsed time.
    #[must_use]
    pub fn fps(&self) -> f64 {
        if self.elapsed_ms > 0.0 {
            1000.0 / self.elapsed_ms
        } else {
            0.0
        }
    }

    /// Returns true if the cache served every layer.
    #[must_use]
    pub fn cache_hit(&self) -> bool {
        self.layers_regenerated == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_from_elapsed() {
        let stats = FrameStats {
            elapsed_ms: 16.0,
            ..FrameStats::default()
        };
        assert!((stats.fps() - 62.5).abs() < f64::EPSILON);
        assert!(FrameStats::default().fps().abs() < f64::EPSILON);
    }

    #[test]
    fn test_cache_totals() {
        let cache = CacheStats {
            sweep_renders: 2,
            compass_renders: 1,
            grid_renders: 1,
        };
        assert_eq!(cache.total(), 4);
        assert!(FrameStats::default().cache_hit());
    }
}
