//! Frame compositor.
//!
//! One call to [`RadarDisplay::render_frame`] per display tick:
//!
//! ```text
//!   size ──> geometry ──> cache.ensure_fresh ─────────────────────┐
//!   now  ──> sweep.advance ──> visibility.update                  │
//!                                    │                            ▼
//!   clear ──> sweep (rot -heading + beam) ──> compass (rot -heading) ──> grid ──> contacts
//! ```
//!
//! State is advanced before anything is drawn, so a frame that fails
//! half-way through drawing never costs the next frame a sweep crossing.
//! Every transformed block runs inside a [`SavedState`] guard.

use radar_core::{
    project, ContactVisibilityModel, DisplayHint, Entity, EntityId, EntityKind, RadarConfig,
    SweepAnimator, SweepState,
};

use crate::atlas::IconAtlas;
use crate::diagnostics::{DiagnosticsSink, TracingSink};
use crate::error::{HudError, HudResult};
use crate::geometry::SurfaceGeometry;
use crate::layers::{StaticLayerCache, StaticLayers};
use crate::stats::{CacheStats, FrameStats};
use crate::style::{Color, Theme};
use crate::surface::{Layer, Path, SavedState, Surface, TextAlign, TextStyle};

/// Radius of a player dot (pixels).
const PLAYER_DOT_RADIUS: f32 = 4.0;
/// Gap between a contact's mark and its label (pixels).
const LABEL_OFFSET: f32 = 8.0;
/// Contact label font size (pixels).
const LABEL_FONT_SIZE: f32 = 12.0;

/// A contact ready to draw, in surface pixels.
#[derive(Debug, Clone, Copy)]
struct Sprite {
    index: usize,
    x: f32,
    y: f32,
    alpha: f32,
}

/// The radar engine bound to one drawing surface.
pub struct RadarDisplay<S: Surface> {
    config: RadarConfig,
    theme: Theme,
    surface: S,
    sweep: SweepAnimator,
    visibility: ContactVisibilityModel,
    cache: StaticLayerCache,
    atlas: IconAtlas,
    sink: Box<dyn DiagnosticsSink>,
    last_frame_ms: Option<f64>,
    frames: u64,
    skipped_frames: u64,
    sprites: Vec<Sprite>,
}

impl<S: Surface> RadarDisplay<S> {
    /// Binds a new engine to `surface`.
    ///
    /// # Errors
    ///
    /// Returns [`HudError::Core`] for an invalid config and
    /// [`HudError::InvalidSurface`] for a surface with no pixels.
    pub fn new(config: RadarConfig, surface: S) -> HudResult<Self> {
        config.validate()?;
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Err(HudError::InvalidSurface { width, height });
        }

        let theme = Theme::default();
        Ok(Self {
            sweep: SweepAnimator::from_config(&config)?,
            visibility: ContactVisibilityModel::new(),
            cache: StaticLayerCache::new(config, theme.clone()),
            config,
            theme,
            surface,
            atlas: IconAtlas::new(),
            sink: Box::new(TracingSink),
            last_frame_ms: None,
            frames: 0,
            skipped_frames: 0,
            sprites: Vec::with_capacity(64),
        })
    }

    /// Replaces the palette. Layers are rebuilt on the next frame.
    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.cache = StaticLayerCache::new(self.config, theme.clone());
        self.theme = theme;
        self
    }

    /// Uses `atlas` for contact icons.
    #[must_use]
    pub fn with_icon_atlas(mut self, atlas: IconAtlas) -> Self {
        self.atlas = atlas;
        self
    }

    /// Sends skipped-frame reports to `sink` instead of `tracing`.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Starts the beam at `angle` instead of north.
    #[must_use]
    pub fn with_start_angle(mut self, angle: f64) -> Self {
        self.sweep = self.sweep.with_start_angle(angle);
        self
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &RadarConfig {
        &self.config
    }

    /// The bound surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The bound surface, for host-side resizing.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Current beam state.
    #[must_use]
    pub fn sweep_state(&self) -> SweepState {
        self.sweep.state()
    }

    /// Current alpha of a contact.
    #[must_use]
    pub fn contact_alpha(&self, id: EntityId) -> f64 {
        self.visibility.alpha(id)
    }

    /// Drops the fade state of an entity that left the game.
    pub fn forget_entity(&mut self, id: EntityId) {
        self.visibility.forget(id);
    }

    /// Layer regeneration counters.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Frames rendered successfully.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frames skipped because of an error.
    #[must_use]
    pub fn skipped_frames(&self) -> u64 {
        self.skipped_frames
    }

    /// Renders one frame. Errors are reported to the diagnostics sink and
    /// the frame is skipped; returns `None` in that case.
    pub fn render_frame(
        &mut self,
        heading_radians: f64,
        entities: &[Entity],
        now_ms: f64,
    ) -> Option<FrameStats> {
        match self.try_render_frame(heading_radians, entities, now_ms) {
            Ok(stats) => Some(stats),
            Err(err) => {
                self.skipped_frames += 1;
                self.sink.report(&format!("radar frame skipped: {err}"));
                None
            }
        }
    }

    /// Renders one frame, returning any error to the caller.
    ///
    /// # Errors
    ///
    /// [`HudError::InvalidSurface`] if the surface has shrunk to nothing,
    /// [`HudError::NonFiniteHeading`] for a NaN or infinite heading,
    /// [`HudError::NonFiniteTimestamp`] for a NaN or infinite `now_ms`,
    /// [`HudError::NonFiniteProjection`] if a contact lands at a
    /// non-finite position, and any error the surface returns from a blit.
    pub fn try_render_frame(
        &mut self,
        heading_radians: f64,
        entities: &[Entity],
        now_ms: f64,
    ) -> HudResult<FrameStats> {
        if !heading_radians.is_finite() {
            return Err(HudError::NonFiniteHeading(heading_radians));
        }
        if !now_ms.is_finite() {
            return Err(HudError::NonFiniteTimestamp(now_ms));
        }
        let (width, height) = self.surface.size();
        if width == 0 || height == 0 {
            return Err(HudError::InvalidSurface { width, height });
        }

        let geometry = SurfaceGeometry::from_size(width, height);
        let elapsed_ms = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        self.last_frame_ms = Some(now_ms);

        let before = self.cache.stats().total();
        let layers = self.cache.ensure_fresh(&geometry, heading_radians);
        let layers_regenerated = self.cache.stats().total() - before;

        let sweep_angle = self.sweep.advance(elapsed_ms);
        self.visibility.update(
            entities,
            &self.sweep.state(),
            self.config.max_range_meters,
            self.config.fade_fraction,
            now_ms,
        );

        let mut stats = FrameStats {
            frame: self.frames + 1,
            elapsed_ms,
            sweep_angle,
            layers_regenerated,
            ..FrameStats::default()
        };
        self.collect_sprites(entities, heading_radians, &geometry, &mut stats)?;

        self.surface.clear();
        stats.blits = draw_static_layers(
            &mut self.surface,
            &layers,
            &geometry,
            heading_radians,
            sweep_angle,
        )?;
        for sprite in &self.sprites {
            draw_contact(&mut self.surface, &entities[sprite.index], sprite, &self.theme, &self.atlas);
            stats.contacts_drawn += 1;
        }

        self.frames += 1;
        tracing::trace!(
            frame = stats.frame,
            elapsed_ms,
            fps = stats.fps(),
            sweep_angle,
            contacts = stats.contacts_drawn,
            "radar frame"
        );
        Ok(stats)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn collect_sprites(
        &mut self,
        entities: &[Entity],
        heading_radians: f64,
        geometry: &SurfaceGeometry,
        stats: &mut FrameStats,
    ) -> HudResult<()> {
        self.sprites.clear();
        let (cx, cy) = geometry.center();

        for (index, entity) in entities.iter().enumerate() {
            let p = project(
                entity,
                heading_radians,
                geometry.radius_pixels,
                self.config.max_range_meters,
            );
            if !p.is_finite() {
                return Err(HudError::NonFiniteProjection {
                    id: entity.id,
                    x: p.x,
                    y: p.y,
                });
            }
            if !p.in_range {
                stats.contacts_culled += 1;
                continue;
            }
            let state = self.visibility.state(entity.id);
            if !state.is_visible() {
                stats.contacts_dark += 1;
                continue;
            }
            self.sprites.push(Sprite {
                index,
                x: (cx + p.x) as f32,
                y: (cy + p.y) as f32,
                alpha: state.alpha as f32,
            });
        }
        Ok(())
    }
}

/// Blits the three static layers; returns the number of blits.
#[allow(clippy::cast_possible_truncation)]
fn draw_static_layers<S: Surface + ?Sized>(
    surface: &mut S,
    layers: &StaticLayers,
    geometry: &SurfaceGeometry,
    heading_radians: f64,
    sweep_angle: f64,
) -> HudResult<u32> {
    blit_rotated(surface, &layers.sweep, geometry, (sweep_angle - heading_radians) as f32)?;
    blit_rotated(surface, &layers.compass, geometry, (-heading_radians) as f32)?;
    surface.blit(&layers.grid)?;
    Ok(3)
}

/// Blits `layer` rotated by `radians` about the surface center.
#[allow(clippy::cast_possible_truncation)]
fn blit_rotated<S: Surface + ?Sized>(
    surface: &mut S,
    layer: &Layer,
    geometry: &SurfaceGeometry,
    radians: f32,
) -> HudResult<()> {
    let (cx, cy) = geometry.center();
    let (cx, cy) = (cx as f32, cy as f32);
    let mut scope = SavedState::new(surface);
    scope.translate(cx, cy);
    scope.rotate(radians);
    scope.translate(-cx, -cy);
    scope.blit(layer)?;
    Ok(())
}

fn draw_contact<S: Surface + ?Sized>(
    surface: &mut S,
    entity: &Entity,
    sprite: &Sprite,
    theme: &Theme,
    atlas: &IconAtlas,
) {
    let mut scope = SavedState::new(surface);
    scope.translate(sprite.x, sprite.y);

    let label_style = |color: Color| {
        TextStyle::new(color.fade(sprite.alpha), LABEL_FONT_SIZE, TextAlign::Left)
            .with_outline(theme.contact_outline.fade(sprite.alpha))
    };

    match entity.display_hint() {
        DisplayHint::Circle => {
            let color = match &entity.kind {
                EntityKind::Player { rgb, .. } => Color::from_rgb8(*rgb),
                _ => theme.contact,
            };
            scope.fill_path(&Path::circle(0.0, 0.0, PLAYER_DOT_RADIUS), color.fade(sprite.alpha));
            scope.fill_text(&entity.label, LABEL_OFFSET, 0.0, &label_style(color));
        }
        DisplayHint::Label => {
            if let Some(icon) = atlas.icon_for(&entity.kind) {
                scope.draw_image(
                    icon.image,
                    -icon.width / 2.0,
                    -icon.height / 2.0,
                    icon.width,
                    icon.height,
                    sprite.alpha,
                );
            } else {
                let style = TextStyle {
                    align: TextAlign::Center,
                    ..label_style(theme.contact)
                };
                scope.fill_text(&entity.label, 0.0, 0.0, &style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::{Icon, IconSlot};
    use crate::diagnostics::MemorySink;
    use crate::surface::{DrawCommand, ImageId, LayerKind, RecordingSurface};
    use std::f64::consts::{FRAC_PI_2, PI};

    fn display(width: u32, height: u32) -> RadarDisplay<RecordingSurface> {
        RadarDisplay::new(RadarConfig::default(), RecordingSurface::new(width, height)).unwrap()
    }

    #[test]
    fn test_rejects_empty_surface() {
        let err = RadarDisplay::new(RadarConfig::default(), RecordingSurface::new(0, 300))
            .err()
            .unwrap();
        assert_eq!(err, HudError::InvalidSurface { width: 0, height: 300 });
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = RadarConfig::default().with_rotation_period_ms(-1.0);
        let result = RadarDisplay::new(config, RecordingSurface::new(100, 100));
        assert!(matches!(result, Err(HudError::Core(_))));
    }

    #[test]
    fn test_frame_order_and_rotations() {
        let mut radar = display(300, 300).with_start_angle(FRAC_PI_2);
        let heading = 0.3;
        radar.render_frame(heading, &[], 0.0).unwrap();

        let surface = radar.surface();
        assert_eq!(surface.commands()[0], DrawCommand::Clear);

        let blits: Vec<_> = surface.blits().collect();
        let kinds: Vec<_> = blits.iter().map(|(k, _)| *k).collect();
        assert_eq!(kinds, [LayerKind::Sweep, LayerKind::Compass, LayerKind::Grid]);

        // The leading edge (straight up) lands at beam - heading.
        let (x, y) = blits[0].1.apply(150.0, 50.0);
        let expected = FRAC_PI_2 - heading;
        assert!((x - (150.0 + 100.0 * expected.sin() as f32)).abs() < 1e-3);
        assert!((y - (150.0 - 100.0 * expected.cos() as f32)).abs() < 1e-3);

        // North on the compass lands at -heading.
        let (x, _) = blits[1].1.apply(150.0, 50.0);
        assert!((x - (150.0 - 100.0 * heading.sin() as f32)).abs() < 1e-3);

        assert!(blits[2].1.is_identity());
        assert!(surface.transform().is_identity());
        assert_eq!(surface.save_depth(), 0);
    }

    #[test]
    fn test_contact_drawn_with_alpha_at_projection() {
        // Beam just short of east; the contact is due east at half range.
        let mut radar = display(200, 200).with_start_angle(FRAC_PI_2 - 0.01);
        let entity = Entity::ammo(1, 50.0, FRAC_PI_2);

        radar.render_frame(0.0, &[entity.clone()], 0.0).unwrap();
        let stats = radar.render_frame(0.0, &[entity.clone()], 16.0).unwrap();
        assert_eq!(stats.contacts_drawn, 1);
        assert!((radar.contact_alpha(entity.id) - 1.0).abs() < f64::EPSILON);

        let (text, style, transform) = radar.surface().texts().next().unwrap();
        assert_eq!(text, "As");
        assert!((style.color.a - Theme::PHOSPHOR.contact.a).abs() < 1e-6);
        let (x, y) = transform.apply(0.0, 0.0);
        // radius = 0.85 * 100 = 85 px; half range = 42.5 px east of center.
        assert!((x - 142.5).abs() < 1e-3);
        assert!((y - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_player_dot_uses_team_color() {
        let mut radar = display(200, 200).with_start_angle(PI - 0.01);
        let player = Entity::player(5, 2, 10.0, PI).with_label("Richard");

        radar.render_frame(0.0, &[player.clone()], 0.0).unwrap();
        radar.render_frame(0.0, &[player], 16.0).unwrap();

        let dot = radar
            .surface()
            .commands()
            .iter()
            .rev()
            .find_map(|c| match c {
                DrawCommand::Fill { color, .. } => Some(*color),
                _ => None,
            })
            .unwrap();
        assert_eq!(dot, Color::from_rgb8([0x33, 0xFF, 0x4D]));
        assert!(radar.surface().texts().any(|(t, _, _)| t == "Richard"));
    }

    #[test]
    fn test_weapon_uses_atlas_icon() {
        let shotgun = Icon {
            image: ImageId(7),
            width: 16.0,
            height: 16.0,
        };
        let mut radar = display(200, 200)
            .with_start_angle(-0.01)
            .with_icon_atlas(IconAtlas::new().with_icon(IconSlot::Weapon, shotgun));
        let weapon = Entity::weapon(1, 20.0, 0.0);

        radar.render_frame(0.0, &[weapon.clone()], 0.0).unwrap();
        radar.render_frame(0.0, &[weapon], 16.0).unwrap();

        let image = radar.surface().commands().iter().find_map(|c| match c {
            DrawCommand::Image { image, alpha, .. } => Some((*image, *alpha)),
            _ => None,
        });
        assert_eq!(image, Some((ImageId(7), 1.0)));
    }

    #[test]
    fn test_dark_contacts_are_not_drawn() {
        let mut radar = display(200, 200);
        let entity = Entity::weapon(1, 20.0, PI);
        let stats = radar.render_frame(0.0, &[entity], 0.0).unwrap();
        assert_eq!(stats.contacts_dark, 1);
        assert_eq!(stats.contacts_drawn, 0);
        assert_eq!(radar.surface().texts().count(), 0);
    }

    #[test]
    fn test_bad_frame_is_logged_and_skipped() {
        let sink = MemorySink::new();
        let mut radar = display(200, 200).with_diagnostics(sink.clone());

        assert!(radar.render_frame(f64::NAN, &[], 0.0).is_none());
        assert_eq!(radar.skipped_frames(), 1);
        assert_eq!(sink.len(), 1);
        assert!(sink.messages()[0].contains("non-finite heading"));

        assert!(radar.render_frame(0.0, &[], 16.0).is_some());
        assert_eq!(radar.frames(), 1);
        assert!(radar.surface().transform().is_identity());
    }

    #[test]
    fn test_nan_bearing_is_reported_every_frame() {
        let sink = MemorySink::new();
        let mut radar = display(200, 200).with_diagnostics(sink.clone());
        let broken = Entity::weapon(3, 10.0, f64::NAN);

        for frame in 0..600_u32 {
            let now = f64::from(frame) * 16.0;
            assert!(radar.render_frame(0.0, &[broken.clone()], now).is_none());
        }
        assert_eq!(radar.skipped_frames(), 600);
        assert_eq!(sink.len(), 600);
        assert!(sink.messages()[0].contains("non-finite position"));
        assert_eq!(radar.surface().save_depth(), 0);
    }

    #[test]
    fn test_nan_distance_is_reported_not_culled() {
        let mut radar = display(200, 200);
        let broken = Entity::ammo(4, f64::NAN, 1.0);

        let err = radar.try_render_frame(0.0, &[broken], 0.0).unwrap_err();
        assert!(matches!(err, HudError::NonFiniteProjection { id, .. } if id == EntityId(4)));
    }

    #[test]
    fn test_non_finite_timestamp_is_rejected() {
        let sink = MemorySink::new();
        let entity = Entity::weapon(5, 20.0, 0.1);
        let mut radar = display(200, 200)
            .with_diagnostics(sink.clone())
            .with_start_angle(0.0);

        radar.render_frame(0.0, &[entity.clone()], 0.0).unwrap();
        let before = radar.sweep_state();
        assert!(radar.render_frame(0.0, &[entity.clone()], f64::NAN).is_none());
        assert!(radar.render_frame(0.0, &[entity.clone()], f64::INFINITY).is_none());
        assert_eq!(sink.len(), 2);
        assert!(sink.messages()[0].contains("non-finite timestamp"));
        assert_eq!(radar.sweep_state(), before);
        assert!(!radar.contact_alpha(entity.id).is_nan());

        let stats = radar.render_frame(0.0, &[entity], 16.0).unwrap();
        assert!((stats.elapsed_ms - 16.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_shrunk_surface_is_a_frame_error() {
        let sink = MemorySink::new();
        let mut radar = display(200, 200).with_diagnostics(sink.clone());
        radar.surface_mut().resize(0, 0);
        assert!(radar.render_frame(0.0, &[], 0.0).is_none());
        assert!(sink.messages()[0].contains("invalid surface"));

        radar.surface_mut().resize(100, 100);
        assert!(radar.render_frame(0.0, &[], 16.0).is_some());
    }
}
