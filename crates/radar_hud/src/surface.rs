//! The drawing-surface contract.
//!
//! The engine draws through [`Surface`]: paths, text, images, blits of
//! equally-sized layers and a canvas-style transform stack. Hosts back it
//! with whatever rasterizer they have. [`RecordingSurface`] keeps a display
//! list instead of pixels; it renders the offscreen layers and is what the
//! tests inspect.

use std::f32::consts::TAU;
use std::ops::{Deref, DerefMut};

use crate::error::{HudError, HudResult};
use crate::style::Color;

/// 2D affine transform, canvas convention.
///
/// Maps `(x, y)` to `(a·x + c·y + e, b·x + d·y + f)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Row 0, column 0.
    pub a: f32,
    /// Row 1, column 0.
    pub b: f32,
    /// Row 0, column 1.
    pub c: f32,
    /// Row 1, column 1.
    pub d: f32,
    /// X translation.
    pub e: f32,
    /// Y translation.
    pub f: f32,
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Pure translation.
    #[must_use]
    pub const fn translation(x: f32, y: f32) -> Self {
        Self {
            e: x,
            f: y,
            ..Self::IDENTITY
        }
    }

    /// Pure rotation (clockwise on a y-down surface).
    #[must_use]
    pub fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Pure scale.
    #[must_use]
    pub const fn scaling(x: f32, y: f32) -> Self {
        Self {
            a: x,
            d: y,
            ..Self::IDENTITY
        }
    }

    /// Returns `self × other`: `other` is applied first.
    #[must_use]
    pub fn then(self, other: Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// Maps a point.
    #[must_use]
    pub fn apply(self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Returns true if this is (numerically) the identity.
    #[must_use]
    pub fn is_identity(self) -> bool {
        const EPS: f32 = 1e-5;
        (self.a - 1.0).abs() < EPS
            && self.b.abs() < EPS
            && self.c.abs() < EPS
            && (self.d - 1.0).abs() < EPS
            && self.e.abs() < EPS
            && self.f.abs() < EPS
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One path segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathOp {
    /// Start a new subpath.
    MoveTo(f32, f32),
    /// Straight segment.
    LineTo(f32, f32),
    /// Clockwise arc around `(cx, cy)` from `start` to `end` (radians).
    Arc {
        /// Center x.
        cx: f32,
        /// Center y.
        cy: f32,
        /// Radius.
        radius: f32,
        /// Start angle.
        start: f32,
        /// End angle.
        end: f32,
    },
    /// Close the current subpath.
    Close,
}

/// A path under construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    ops: Vec<PathOp>,
}

impl Path {
    /// Creates an empty path.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Full circle.
    #[must_use]
    pub fn circle(cx: f32, cy: f32, radius: f32) -> Self {
        Self::new()
            .move_to(cx + radius, cy)
            .arc(cx, cy, radius, 0.0, TAU)
            .close()
    }

    /// Single straight segment.
    #[must_use]
    pub fn line(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self::new().move_to(x0, y0).line_to(x1, y1)
    }

    /// Appends a move.
    #[must_use]
    pub fn move_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::MoveTo(x, y));
        self
    }

    /// Appends a line.
    #[must_use]
    pub fn line_to(mut self, x: f32, y: f32) -> Self {
        self.ops.push(PathOp::LineTo(x, y));
        self
    }

    /// Appends an arc.
    #[must_use]
    pub fn arc(mut self, cx: f32, cy: f32, radius: f32, start: f32, end: f32) -> Self {
        self.ops.push(PathOp::Arc {
            cx,
            cy,
            radius,
            start,
            end,
        });
        self
    }

    /// Closes the current subpath.
    #[must_use]
    pub fn close(mut self) -> Self {
        self.ops.push(PathOp::Close);
        self
    }

    /// Segments in order.
    #[must_use]
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }
}

/// Stroke parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    /// Line color.
    pub color: Color,
    /// Line width (pixels).
    pub width: f32,
    /// Dash pattern (on, off, ...); empty for solid.
    pub dash: Vec<f32>,
}

impl Stroke {
    /// Solid stroke.
    #[must_use]
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            dash: Vec::new(),
        }
    }

    /// Dashed stroke.
    #[must_use]
    pub fn dashed(color: Color, width: f32, dash: &[f32]) -> Self {
        Self {
            color,
            width,
            dash: dash.to_vec(),
        }
    }
}

/// Horizontal text anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Anchor at the left edge.
    #[default]
    Left,
    /// Anchor at the center.
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Text parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Fill color.
    pub color: Color,
    /// Font size (pixels).
    pub font_size: f32,
    /// Horizontal anchor; text is vertically centered on `y`.
    pub align: TextAlign,
    /// Outline color, if any.
    pub outline: Option<Color>,
}

impl TextStyle {
    /// Plain text.
    #[must_use]
    pub const fn new(color: Color, font_size: f32, align: TextAlign) -> Self {
        Self {
            color,
            font_size,
            align,
            outline: None,
        }
    }

    /// Adds an outline.
    #[must_use]
    pub const fn with_outline(mut self, outline: Color) -> Self {
        self.outline = Some(outline);
        self
    }
}

/// Handle to an image owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ImageId(pub u32);

/// Which static layer a buffer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Sweep afterglow wedge.
    Sweep,
    /// Compass rose.
    Compass,
    /// Range grid.
    Grid,
}

impl LayerKind {
    /// Lower-case name, for logs and errors.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Sweep => "sweep",
            Self::Compass => "compass",
            Self::Grid => "grid",
        }
    }
}

/// A pre-rendered offscreen buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    kind: LayerKind,
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Layer {
    /// What this layer holds.
    #[must_use]
    pub const fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Pixel size the layer was rendered for.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The recorded artwork.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }
}

/// A 2D raster target.
///
/// Transform calls compose onto the current transform. `save`/`restore`
/// push and pop it; a `restore` with nothing saved is ignored.
pub trait Surface {
    /// Current pixel size.
    fn size(&self) -> (u32, u32);
    /// Erases everything.
    fn clear(&mut self);
    /// Pushes the current transform.
    fn save(&mut self);
    /// Pops the last saved transform.
    fn restore(&mut self);
    /// Composes a translation.
    fn translate(&mut self, x: f32, y: f32);
    /// Composes a rotation (radians, clockwise).
    fn rotate(&mut self, radians: f32);
    /// Composes a scale.
    fn scale(&mut self, x: f32, y: f32);
    /// Fills a path.
    fn fill_path(&mut self, path: &Path, color: Color);
    /// Strokes a path.
    fn stroke_path(&mut self, path: &Path, stroke: &Stroke);
    /// Draws text anchored at `(x, y)`.
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
    /// Draws a host image into a rectangle.
    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32, alpha: f32);
    /// Copies an equally-sized layer onto the surface at the origin.
    ///
    /// # Errors
    ///
    /// Returns [`HudError::LayerSizeMismatch`] if the sizes differ.
    fn blit(&mut self, layer: &Layer) -> HudResult<()>;
}

/// Scoped `save`/`restore`.
///
/// Saves on creation and restores on drop, so every exit path, including
/// `?`, leaves the transform as it was.
pub struct SavedState<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
}

impl<'a, S: Surface + ?Sized> SavedState<'a, S> {
    /// Saves `surface` state until the guard drops.
    pub fn new(surface: &'a mut S) -> Self {
        surface.save();
        Self { surface }
    }
}

impl<S: Surface + ?Sized> Deref for SavedState<'_, S> {
    type Target = S;

    fn deref(&self) -> &Self::Target {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedState<'_, S> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedState<'_, S> {
    fn drop(&mut self) {
        self.surface.restore();
    }
}

/// A recorded drawing operation, with the transform in effect.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Surface cleared.
    Clear,
    /// Filled path.
    Fill {
        /// Geometry.
        path: Path,
        /// Fill color.
        color: Color,
        /// Transform in effect.
        transform: Transform,
    },
    /// Stroked path.
    Stroke {
        /// Geometry.
        path: Path,
        /// Stroke parameters.
        stroke: Stroke,
        /// Transform in effect.
        transform: Transform,
    },
    /// Text.
    Text {
        /// Content.
        text: String,
        /// Anchor x.
        x: f32,
        /// Anchor y.
        y: f32,
        /// Text parameters.
        style: TextStyle,
        /// Transform in effect.
        transform: Transform,
    },
    /// Host image.
    Image {
        /// Image handle.
        image: ImageId,
        /// Left edge.
        x: f32,
        /// Top edge.
        y: f32,
        /// Width.
        width: f32,
        /// Height.
        height: f32,
        /// Opacity.
        alpha: f32,
        /// Transform in effect.
        transform: Transform,
    },
    /// Layer blit.
    Blit {
        /// Which layer.
        layer: LayerKind,
        /// Transform in effect.
        transform: Transform,
    },
}

/// Display-list surface.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    width: u32,
    height: u32,
    transform: Transform,
    stack: Vec<Transform>,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    /// Creates an empty surface.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            transform: Transform::IDENTITY,
            stack: Vec::with_capacity(8),
            commands: Vec::with_capacity(256),
        }
    }

    /// Changes the pixel size, as a host window resize would.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    /// Everything drawn since the last clear.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// The transform currently in effect.
    #[must_use]
    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Number of unmatched `save` calls.
    #[must_use]
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Blits recorded since the last clear.
    pub fn blits(&self) -> impl Iterator<Item = (LayerKind, Transform)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Blit { layer, transform } => Some((*layer, *transform)),
            _ => None,
        })
    }

    /// Text drawn since the last clear.
    pub fn texts(&self) -> impl Iterator<Item = (&str, &TextStyle, Transform)> + '_ {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text {
                text,
                style,
                transform,
                ..
            } => Some((text.as_str(), style, *transform)),
            _ => None,
        })
    }

    /// Freezes the recording into a layer.
    #[must_use]
    pub fn into_layer(self, kind: LayerKind) -> Layer {
        Layer {
            kind,
            width: self.width,
            height: self.height,
            commands: self.commands,
        }
    }
}

impl Surface for RecordingSurface {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn save(&mut self) {
        self.stack.push(self.transform);
    }

    fn restore(&mut self) {
        if let Some(saved) = self.stack.pop() {
            self.transform = saved;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.transform = self.transform.then(Transform::translation(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.transform = self.transform.then(Transform::rotation(radians));
    }

    fn scale(&mut self, x: f32, y: f32) {
        self.transform = self.transform.then(Transform::scaling(x, y));
    }

    fn fill_path(&mut self, path: &Path, color: Color) {
        self.commands.push(DrawCommand::Fill {
            path: path.clone(),
            color,
            transform: self.transform,
        });
    }

    fn stroke_path(&mut self, path: &Path, stroke: &Stroke) {
        self.commands.push(DrawCommand::Stroke {
            path: path.clone(),
            stroke: stroke.clone(),
            transform: self.transform,
        });
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        self.commands.push(DrawCommand::Text {
            text: text.to_owned(),
            x,
            y,
            style: *style,
            transform: self.transform,
        });
    }

    fn draw_image(&mut self, image: ImageId, x: f32, y: f32, width: f32, height: f32, alpha: f32) {
        self.commands.push(DrawCommand::Image {
            image,
            x,
            y,
            width,
            height,
            alpha,
            transform: self.transform,
        });
    }

    fn blit(&mut self, layer: &Layer) -> HudResult<()> {
        if layer.size() != self.size() {
            return Err(HudError::LayerSizeMismatch {
                layer: layer.kind().name(),
                layer_width: layer.width,
                layer_height: layer.height,
                surface_width: self.width,
                surface_height: self.height,
            });
        }
        self.commands.push(DrawCommand::Blit {
            layer: layer.kind(),
            transform: self.transform,
        });
        Ok(())
    }
}
