//! # Static Mask
//!
//! Rasterizes the silhouette (union of leaf rects) into an Alpha8 surface and
//! blits it tinted with the mask color.

use crate::error::SkeletonError;
use crate::geometry::LeafRect;
use crate::types::Color;
use skia_safe::{
    surfaces, AlphaType, BlendMode, Canvas, CachingHint, Color as SkColor, ColorType, Image,
    ImageInfo, Paint, Surface,
};
use tracing::{debug, warn};

/// Allocates a cleared Alpha8 raster surface. Zero-sized requests yield
/// `Ok(None)` rather than an error.
pub(crate) fn alpha_surface(width: i32, height: i32) -> Result<Option<Surface>, SkeletonError> {
    if width <= 0 || height <= 0 {
        return Ok(None);
    }
    let info = ImageInfo::new((width, height), ColorType::Alpha8, AlphaType::Premul, None);
    let mut surface = surfaces::raster(&info, None, None)
        .ok_or(SkeletonError::SurfaceAllocation { width, height })?;
    surface.canvas().clear(SkColor::TRANSPARENT);
    Ok(Some(surface))
}

/// Draws every rect opaque with `Src` semantics. Rounded rects are
/// anti-aliased; sharp rects land on exact pixel boundaries.
pub(crate) fn draw_silhouette(canvas: &Canvas, rects: &[LeafRect], corner_radius: f32) {
    let mut paint = Paint::default();
    paint.set_color(SkColor::BLACK);
    paint.set_blend_mode(BlendMode::Src);
    paint.set_anti_alias(corner_radius > 0.0);

    for rect in rects {
        if corner_radius > 0.0 {
            canvas.draw_round_rect(rect, corner_radius, corner_radius, &paint);
        } else {
            canvas.draw_rect(rect, &paint);
        }
    }
}

/// Reads an Alpha8 image back into a row-major buffer.
pub(crate) fn read_alpha(image: &Image) -> Vec<u8> {
    let (width, height) = (image.width(), image.height());
    let info = ImageInfo::new((width, height), ColorType::Alpha8, AlphaType::Premul, None);
    let mut pixels = vec![0u8; (width * height) as usize];
    if !image.read_pixels(&info, pixels.as_mut_slice(), width as usize, (0, 0), CachingHint::Allow) {
        warn!("Failed to read back {}x{} alpha image", width, height);
    }
    pixels
}

/// Blits an Alpha8 image at the origin, tinted with `color`.
pub(crate) fn blit_alpha(canvas: &Canvas, image: &Image, color: Color) {
    let mut paint = Paint::default();
    paint.set_anti_alias(true);
    paint.set_color4f(skia_safe::Color4f::from(color), None);
    canvas.draw_image(image, (0, 0), Some(&paint));
}

/// Single-channel raster of the silhouette, sized to the masked root.
#[derive(Clone, Default)]
pub struct StaticMask {
    width: i32,
    height: i32,
    image: Option<Image>,
}

impl std::fmt::Debug for StaticMask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticMask")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("rasterized", &self.image.is_some())
            .finish()
    }
}

impl StaticMask {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Like [`try_rasterize`](Self::try_rasterize) but degrades to an empty
    /// mask when the surface cannot be allocated.
    pub fn rasterize(width: i32, height: i32, rects: &[LeafRect], corner_radius: f32) -> Self {
        Self::try_rasterize(width, height, rects, corner_radius).unwrap_or_else(|e| {
            warn!("Skipping mask: {}", e);
            Self::empty()
        })
    }

    pub fn try_rasterize(
        width: i32,
        height: i32,
        rects: &[LeafRect],
        corner_radius: f32,
    ) -> Result<Self, SkeletonError> {
        let Some(mut surface) = alpha_surface(width, height)? else {
            debug!("Zero-sized mask ({}x{}), nothing to rasterize", width, height);
            return Ok(Self {
                width: width.max(0),
                height: height.max(0),
                image: None,
            });
        };

        draw_silhouette(surface.canvas(), rects, corner_radius);
        debug!("Rasterized {} leaf rects into {}x{} mask", rects.len(), width, height);

        Ok(Self {
            width,
            height,
            image: Some(surface.image_snapshot()),
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// `true` when there is no raster to draw (zero-sized or never built).
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    /// Blits the mask at the root origin. A no-op without a raster.
    pub fn draw(&self, canvas: &Canvas, color: Color) {
        if let Some(image) = &self.image {
            blit_alpha(canvas, image, color);
        }
    }

    /// Row-major alpha values; empty for a zero-sized mask.
    pub fn alpha_pixels(&self) -> Vec<u8> {
        self.image.as_ref().map(read_alpha).unwrap_or_default()
    }

    pub fn alpha_at(&self, x: i32, y: i32) -> u8 {
        if x < 0 || y < 0 || x >= self.width || y >= self.height {
            return 0;
        }
        self.alpha_pixels()
            .get((y * self.width + x) as usize)
            .copied()
            .unwrap_or(0)
    }

    /// Number of fully opaque pixels.
    pub fn opaque_area(&self) -> usize {
        self.alpha_pixels().iter().filter(|&&a| a == u8::MAX).count()
    }
}
