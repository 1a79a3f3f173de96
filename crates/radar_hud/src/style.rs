//! Colors and the phosphor-scope theme.

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);
    /// Phosphor green.
    pub const PHOSPHOR: Self = Self::rgba(0.2, 1.0, 0.3, 1.0);
    /// Warning orange, used for north.
    pub const WARNING: Self = Self::rgba(1.0, 0.6, 0.1, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Creates an opaque color from 8-bit channels.
    #[must_use]
    pub fn from_rgb8(rgb: [u8; 3]) -> Self {
        Self::rgb(
            f32::from(rgb[0]) / 255.0,
            f32::from(rgb[1]) / 255.0,
            f32::from(rgb[2]) / 255.0,
        )
    }

    /// Returns a new color with different alpha.
    #[must_use]
    pub const fn with_alpha(self, a: f32) -> Self {
        Self::rgba(self.r, self.g, self.b, a)
    }

    /// Multiplies the existing alpha by `factor` (clamped to 0-1).
    #[must_use]
    pub fn fade(self, factor: f32) -> Self {
        self.with_alpha((self.a * factor).clamp(0.0, 1.0))
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// Complete palette for the radar.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Leading edge of the sweep afterglow.
    pub beam: Color,
    /// Range circles and crosshair.
    pub grid: Color,
    /// Range labels.
    pub grid_text: Color,
    /// Outer ornament ring.
    pub ornament: Color,
    /// Compass ticks.
    pub compass: Color,
    /// E, S and W labels.
    pub cardinal: Color,
    /// N label.
    pub north: Color,
    /// Item contact labels.
    pub contact: Color,
    /// Outline behind contact labels.
    pub contact_outline: Color,
}

impl Theme {
    /// Green phosphor scope.
    pub const PHOSPHOR: Self = Self {
        beam: Color::rgba(0.2, 1.0, 0.3, 0.35),
        grid: Color::rgba(0.2, 0.8, 0.3, 0.6),
        grid_text: Color::rgba(0.2, 0.8, 0.3, 0.8),
        ornament: Color::rgba(0.15, 0.5, 0.2, 0.8),
        compass: Color::rgba(0.6, 1.0, 0.6, 0.9),
        cardinal: Color::rgba(0.85, 0.9, 0.85, 1.0),
        north: Color::WARNING,
        contact: Color::PHOSPHOR,
        contact_outline: Color::BLACK,
    };
}

impl Default for Theme {
    fn default() -> Self {
        Self::PHOSPHOR
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_rgb8() {
        let color = Color::from_rgb8([255, 0, 51]);
        assert!((color.r - 1.0).abs() < 0.01);
        assert!(color.g.abs() < 0.01);
        assert!((color.b - 0.2).abs() < 0.01);
        assert!((color.a - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fade_multiplies_alpha() {
        let color = Color::rgba(1.0, 1.0, 1.0, 0.5).fade(0.5);
        assert!((color.a - 0.25).abs() < 1e-6);
        assert!((Color::WHITE.fade(3.0).a - 1.0).abs() < f32::EPSILON);
    }
}
