use serde::{Deserialize, Serialize};

/// Index of a view inside a [`ViewTree`](crate::view::ViewTree) arena.
pub type ViewId = usize;

/// Straight-alpha RGBA color with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::new(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::new(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Builds a color from a packed `0xAARRGGBB` value.
    pub fn from_argb(argb: u32) -> Self {
        let channel = |shift: u32| ((argb >> shift) & 0xFF) as f32 / 255.0;
        Self::new(channel(16), channel(8), channel(0), channel(24))
    }

    /// Opaque color from a packed `0xRRGGBB` value.
    pub fn from_rgb(rgb: u32) -> Self {
        Self::from_argb(0xFF00_0000 | (rgb & 0x00FF_FFFF))
    }
}

impl From<Color> for skia_safe::Color4f {
    fn from(c: Color) -> Self {
        skia_safe::Color4f::new(c.r, c.g, c.b, c.a)
    }
}

/// Visibility of a view, following the usual three-state model.
///
/// `Invisible` views keep their layout space but are not drawn; `Gone` views
/// take no space at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Visibility {
    #[default]
    Visible,
    Invisible,
    Gone,
}

#[cfg(test)]
mod tests {
    use super::Color;

    #[test]
    fn from_argb_unpacks_channels() {
        let c = Color::from_argb(0x80FF_0000);
        assert_eq!(c.r, 1.0);
        assert_eq!(c.g, 0.0);
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn from_rgb_is_opaque() {
        assert_eq!(Color::from_rgb(0x000000), Color::BLACK);
    }
}
