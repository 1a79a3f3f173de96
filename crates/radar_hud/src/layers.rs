//! Static artwork and its cache.
//!
//! The sweep wedge, compass rose and range grid depend only on the surface
//! size. They are rasterized into offscreen layers once per size and then
//! blitted every frame; heading and beam rotation are applied as a
//! transform at composite time, never baked in.
//!
//! ## Cache Contract
//!
//! A layer is redrawn if and only if its size tag differs from the current
//! [`SurfaceGeometry`]. Otherwise the same [`Arc<Layer>`] is handed back.

use std::f32::consts::{FRAC_PI_2, PI, TAU};
use std::sync::Arc;

use radar_core::RadarConfig;

use crate::geometry::SurfaceGeometry;
use crate::stats::CacheStats;
use crate::style::Theme;
use crate::surface::{Layer, LayerKind, Path, RecordingSurface, Stroke, Surface, TextAlign, TextStyle};

/// Long compass tick, as a fraction of the radius.
const LONG_TICK: f32 = 0.08;
/// Short compass tick, as a fraction of the radius.
const SHORT_TICK: f32 = 0.04;
/// Cardinal labels sit just outside the rim.
const CARDINAL_RADIUS: f32 = 1.09;
/// Range circles, as fractions of the radius.
const RANGE_RINGS: [f32; 4] = [0.25, 0.5, 0.75, 1.0];
/// Ornament ring radius, as a fraction of the radius.
const ORNAMENT_RADIUS: f32 = 1.025;

/// The three layers for the current size.
#[derive(Debug, Clone)]
pub struct StaticLayers {
    /// Sweep afterglow wedge, leading edge pointing up.
    pub sweep: Arc<Layer>,
    /// Compass rose, north up.
    pub compass: Arc<Layer>,
    /// Range grid.
    pub grid: Arc<Layer>,
}

/// Offscreen layers keyed by surface size.
#[derive(Debug, Clone)]
pub struct StaticLayerCache {
    config: RadarConfig,
    theme: Theme,
    sweep: Option<Arc<Layer>>,
    compass: Option<Arc<Layer>>,
    grid: Option<Arc<Layer>>,
    stats: CacheStats,
}

impl StaticLayerCache {
    /// Creates an empty cache; the first [`ensure_fresh`](Self::ensure_fresh)
    /// renders everything.
    #[must_use]
    pub fn new(config: RadarConfig, theme: Theme) -> Self {
        Self {
            config,
            theme,
            sweep: None,
            compass: None,
            grid: None,
            stats: CacheStats::default(),
        }
    }

    /// Regeneration counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns layers for `geometry`, redrawing only those whose size tag
    /// differs.
    pub fn ensure_fresh(&mut self, geometry: &SurfaceGeometry, heading_radians: f64) -> StaticLayers {
        let config = &self.config;
        let theme = &self.theme;

        let (sweep, sweep_new) = refresh(&mut self.sweep, geometry, LayerKind::Sweep, |s| {
            draw_sweep(s, geometry, config.band_count, config.sweep_width_radians, theme);
        });
        let (compass, compass_new) = refresh(&mut self.compass, geometry, LayerKind::Compass, |s| {
            draw_compass(s, geometry, config.tick_count, theme);
        });
        let (grid, grid_new) = refresh(&mut self.grid, geometry, LayerKind::Grid, |s| {
            draw_grid(s, geometry, config.max_range_meters, theme);
        });

        self.stats.sweep_renders += u32::from(sweep_new);
        self.stats.compass_renders += u32::from(compass_new);
        self.stats.grid_renders += u32::from(grid_new);

        if sweep_new || compass_new || grid_new {
            tracing::debug!(
                width = geometry.width,
                height = geometry.height,
                heading_radians,
                "static layers regenerated"
            );
        }

        StaticLayers {
            sweep,
            compass,
            grid,
        }
    }
}

fn refresh(
    slot: &mut Option<Arc<Layer>>,
    geometry: &SurfaceGeometry,
    kind: LayerKind,
    paint: impl FnOnce(&mut RecordingSurface),
) -> (Arc<Layer>, bool) {
    if let Some(layer) = slot {
        if layer.size() == geometry.size() {
            return (Arc::clone(layer), false);
        }
    }

    let mut canvas = RecordingSurface::new(geometry.width, geometry.height);
    paint(&mut canvas);
    let layer = Arc::new(canvas.into_layer(kind));
    *slot = Some(Arc::clone(&layer));
    (layer, true)
}

#[allow(clippy::cast_possible_truncation)]
fn center_and_radius(geometry: &SurfaceGeometry) -> (f32, f32, f32) {
    let (cx, cy) = geometry.center();
    (cx as f32, cy as f32, geometry.radius_pixels as f32)
}

/// Paints the afterglow wedge: `band_count` bands trailing
/// counter-clockwise from a leading edge at local angle `-π/2`, brightest
/// at the edge.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn draw_sweep<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    band_count: u32,
    width_radians: f64,
    theme: &Theme,
) {
    let (cx, cy, r) = center_and_radius(geometry);
    let n = band_count.max(1) as f32;
    let band = width_radians as f32 / n;
    let leading = -FRAC_PI_2;

    for i in 0..band_count.max(1) {
        let i = i as f32;
        let end = leading - i * band;
        let start = end - band;
        let path = Path::new().move_to(cx, cy).arc(cx, cy, r, start, end).close();
        surface.fill_path(&path, theme.beam.fade(1.0 - i / n));
    }
}

/// Paints the compass rose: rim, alternating long/short ticks and
/// cardinal labels, north up.
#[allow(clippy::cast_precision_loss)]
pub fn draw_compass<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    tick_count: u32,
    theme: &Theme,
) {
    let (cx, cy, r) = center_and_radius(geometry);

    surface.stroke_path(&Path::circle(cx, cy, r), &Stroke::solid(theme.compass, 1.5));

    let step = TAU / tick_count.max(1) as f32;
    let long = Stroke::solid(theme.compass, 2.0);
    let short = Stroke::solid(theme.compass, 1.0);
    for i in 0..tick_count {
        let (sin, cos) = (i as f32 * step).sin_cos();
        let (len, stroke) = if i % 2 == 0 {
            (r * LONG_TICK, &long)
        } else {
            (r * SHORT_TICK, &short)
        };
        let inner = r - len;
        let path = Path::line(cx + sin * r, cy - cos * r, cx + sin * inner, cy - cos * inner);
        surface.stroke_path(&path, stroke);
    }

    let font_size = (r * 0.09).max(10.0);
    let label_r = r * CARDINAL_RADIUS;
    for (label, angle) in [("N", 0.0), ("E", FRAC_PI_2), ("S", PI), ("W", 3.0 * FRAC_PI_2)] {
        let color = if label == "N" { theme.north } else { theme.cardinal };
        let (sin, cos) = f32::sin_cos(angle);
        surface.fill_text(
            label,
            cx + sin * label_r,
            cy - cos * label_r,
            &TextStyle::new(color, font_size, TextAlign::Center),
        );
    }
}

/// Paints the range grid: rings at 25/50/75/100% with meter labels, a
/// crosshair and the outer ornament.
#[allow(clippy::cast_possible_truncation)]
pub fn draw_grid<S: Surface + ?Sized>(
    surface: &mut S,
    geometry: &SurfaceGeometry,
    max_range_meters: f64,
    theme: &Theme,
) {
    let (cx, cy, r) = center_and_radius(geometry);
    let font_size = (r * 0.06).max(9.0);
    let label_style = TextStyle::new(theme.grid_text, font_size, TextAlign::Left);

    for fraction in RANGE_RINGS {
        let ring = r * fraction;
        let stroke = if fraction < 1.0 {
            Stroke::dashed(theme.grid, 1.0, &[4.0, 4.0])
        } else {
            Stroke::solid(theme.grid, 1.5)
        };
        surface.stroke_path(&Path::circle(cx, cy, ring), &stroke);

        let meters = max_range_meters * f64::from(fraction);
        surface.fill_text(
            &format_range(meters),
            cx + 4.0,
            cy - ring + font_size,
            &label_style,
        );
    }

    let crosshair = Path::line(cx - r, cy, cx + r, cy)
        .move_to(cx, cy - r)
        .line_to(cx, cy + r);
    surface.stroke_path(&crosshair, &Stroke::solid(theme.grid, 1.0));

    surface.stroke_path(
        &Path::circle(cx, cy, r * ORNAMENT_RADIUS),
        &Stroke::dashed(theme.ornament, 3.0, &[2.0, 6.0]),
    );
    surface.fill_path(&Path::circle(cx, cy, 2.5), theme.grid);
}

/// Range label text, e.g. `75m` or `1.5km`.
#[must_use]
pub fn format_range(meters: f64) -> String {
    if meters >= 1000.0 {
        format!("{:.1}km", meters / 1000.0)
    } else {
        format!("{meters:.0}m")
    }
}
