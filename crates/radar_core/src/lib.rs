//! # Radar Core
//!
//! Surface-independent state for the radar HUD:
//! - Sweep beam timing that wraps cleanly after any stall
//! - Heading-relative polar projection with meter-based range culling
//! - Per-contact afterglow that decays after the beam passes
//!
//! ## Data Flow
//!
//! ```text
//!   now_ms ──> SweepAnimator ──> SweepState ──┐
//!                                             ├──> ContactVisibilityModel ──> alpha per EntityId
//!   &[Entity] ────────────────────────────────┘
//!   &[Entity] + heading ──> project() ──> (x, y, in_range)
//! ```
//!
//! Nothing here draws. See `radar_hud` for layers and compositing.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod entity;
pub mod error;
pub mod projection;
pub mod sweep;
pub mod visibility;

pub use config::RadarConfig;
pub use entity::{DisplayHint, Entity, EntityId, EntityKind};
pub use error::{RadarError, RadarResult};
pub use projection::{in_range, normalize_angle, project, relative_bearing, Projected};
pub use sweep::{SweepAnimator, SweepState};
pub use visibility::{fade_alpha, swept_past, ContactVisibilityModel, VisibilityState};
