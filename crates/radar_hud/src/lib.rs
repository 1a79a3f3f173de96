//! # Radar HUD
//!
//! Heads-up radar for a location-based game: a compass rose that turns
//! with the device heading, a sweeping beam with afterglow, a range grid,
//! and nearby players and pickups that light up as the beam passes.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                       FRAME PIPELINE                          │
//! ├──────────────────────────────────────────────────────────────┤
//! │  surface size → SurfaceGeometry → StaticLayerCache (per size)│
//! │  now_ms       → SweepAnimator   → ContactVisibilityModel     │
//! │  heading      → clear → 3 transformed blits → contacts       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Static artwork is rasterized once per surface size. Each frame costs a
//! clear, three blits and one small transform block per visible contact.
//!
//! ## Example
//!
//! ```rust
//! use radar_core::{Entity, RadarConfig};
//! use radar_hud::{RadarDisplay, RecordingSurface};
//!
//! let mut radar = RadarDisplay::new(RadarConfig::default(), RecordingSurface::new(300, 300))?;
//! let contacts = [Entity::weapon(1, 40.0, 0.5), Entity::ammo(2, 80.0, 3.0)];
//!
//! for tick in 0..60 {
//!     radar.render_frame(0.0, &contacts, f64::from(tick) * 16.0);
//! }
//! assert_eq!(radar.cache_stats().total(), 3);
//! # Ok::<(), radar_hud::HudError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod atlas;
pub mod compositor;
pub mod diagnostics;
pub mod error;
pub mod geometry;
pub mod layers;
pub mod stats;
pub mod style;
pub mod surface;

pub use atlas::{Icon, IconAtlas, IconSlot};
pub use compositor::RadarDisplay;
pub use diagnostics::{DiagnosticsSink, MemorySink, TracingSink};
pub use error::{HudError, HudResult};
pub use geometry::SurfaceGeometry;
pub use layers::{StaticLayerCache, StaticLayers};
pub use stats::{CacheStats, FrameStats};
pub use style::{Color, Theme};
pub use surface::{
    DrawCommand, ImageId, Layer, LayerKind, Path, PathOp, RecordingSurface, SavedState, Stroke,
    Surface, TextAlign, TextStyle, Transform,
};
