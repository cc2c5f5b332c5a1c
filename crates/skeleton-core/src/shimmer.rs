//! # Shimmer
//!
//! A diagonal light band swept across the silhouette.
//!
//! ## Sweep convention
//! The band is the gradient segment `[start_offset, width]` along x
//! (transparent, opaque, transparent). Over one cycle it is translated from
//! `-width` to `+width` and the result rotated by the sweep angle about the
//! bounds centre. Cycles loop; the phase is the host clock modulo the
//! duration, so every shimmer driven by the same clock moves in lockstep.
//! A zero duration pins the phase at 0 and never schedules frames.

use crate::animation::EasingType;
use crate::config::SkeletonConfig;
use crate::frame::{FrameHost, FrameRequest};
use crate::geometry::LeafRect;
use crate::mask::{alpha_surface, blit_alpha, draw_silhouette, read_alpha};
use crate::types::Color;
use skia_safe::{
    BlendMode, Canvas, Color as SkColor, Image, Matrix, Paint, Point, Shader, Surface, TileMode,
};
use tracing::{debug, warn};

pub struct ShimmerAnimator {
    width: i32,
    height: i32,
    color: Color,
    duration_millis: u64,
    angle: f32,
    start_offset: f32,
    easing: EasingType,
    /// Silhouette the band is clipped to.
    silhouette: Option<Image>,
    surface: Option<Surface>,
    /// Current ShimmerMask frame.
    frame: Option<Image>,
    running: bool,
    pending: Option<FrameRequest>,
}

impl std::fmt::Debug for ShimmerAnimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShimmerAnimator")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("duration_millis", &self.duration_millis)
            .field("angle", &self.angle)
            .field("running", &self.running)
            .field("pending", &self.pending)
            .finish()
    }
}

impl ShimmerAnimator {
    /// Builds the shimmer for one layout. `start_offset` is where the band
    /// begins along the gradient axis, conventionally half the width.
    pub fn new(
        config: &SkeletonConfig,
        width: i32,
        height: i32,
        rects: &[LeafRect],
        start_offset: f32,
    ) -> Self {
        let (silhouette, surface) = match (alpha_surface(width, height), alpha_surface(width, height)) {
            (Ok(Some(mut silhouette)), Ok(Some(surface))) => {
                draw_silhouette(silhouette.canvas(), rects, config.corner_radius);
                (Some(silhouette.image_snapshot()), Some(surface))
            }
            (Err(e), _) | (_, Err(e)) => {
                warn!("Shimmer disabled for this layout: {}", e);
                (None, None)
            }
            _ => (None, None),
        };

        let mut shimmer = Self {
            width: width.max(0),
            height: height.max(0),
            color: config.shimmer_color,
            duration_millis: config.shimmer_duration_millis,
            angle: config.shimmer_angle,
            start_offset,
            easing: config.shimmer_easing,
            silhouette,
            surface,
            frame: None,
            running: false,
            pending: None,
        };
        shimmer.render_phase(0.0);
        shimmer
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn pending_request(&self) -> Option<FrameRequest> {
        self.pending
    }

    pub fn duration_millis(&self) -> u64 {
        self.duration_millis
    }

    /// Starts the sweep. Calling it while running does nothing.
    pub fn start(&mut self, host: &mut dyn FrameHost) {
        if self.running {
            return;
        }
        self.running = true;
        self.render_at(host.now_millis());
        if self.duration_millis > 0 && self.frame.is_some() {
            self.pending = Some(host.request_frame());
        }
        debug!("Shimmer started ({}ms sweep)", self.duration_millis);
    }

    /// Stops the sweep and cancels the outstanding frame request. The last
    /// frame stays as it is.
    pub fn stop(&mut self, host: &mut dyn FrameHost) {
        if let Some(request) = self.pending.take() {
            host.cancel_frame(request);
        }
        if self.running {
            self.running = false;
            debug!("Shimmer stopped");
        }
    }

    /// Frame callback. Renders the current phase and schedules the next
    /// frame. Returns `true` when the overlay needs a redraw.
    pub fn on_frame(&mut self, request: FrameRequest, host: &mut dyn FrameHost) -> bool {
        if self.pending != Some(request) {
            return false;
        }
        self.render_at(host.now_millis());
        self.pending = Some(host.request_frame());
        true
    }

    /// Eased phase in `[0, 1)` at the given clock time.
    pub fn phase_at(&self, now_millis: u64) -> f32 {
        if self.duration_millis == 0 {
            return 0.0;
        }
        let linear = (now_millis % self.duration_millis) as f32 / self.duration_millis as f32;
        self.easing.eval(linear)
    }

    /// Horizontal translation of the band at `phase`, before rotation.
    pub fn band_translation(&self, phase: f32) -> f32 {
        let width = self.width as f32;
        -width + phase * 2.0 * width
    }

    /// Centre of the band in root space at `phase`.
    pub fn band_center(&self, phase: f32) -> Point {
        let x = (self.start_offset + self.width as f32) / 2.0;
        let y = self.height as f32 / 2.0;
        self.band_matrix(phase).map_point((x, y))
    }

    fn band_matrix(&self, phase: f32) -> Matrix {
        let pivot = (self.width as f32 / 2.0, self.height as f32 / 2.0);
        let mut matrix = Matrix::rotate_deg_pivot(self.angle, pivot);
        matrix.pre_translate((self.band_translation(phase), 0.0));
        matrix
    }

    /// Renders the ShimmerMask for the given clock time.
    pub fn render_at(&mut self, now_millis: u64) {
        let phase = self.phase_at(now_millis);
        self.render_phase(phase);
    }

    fn render_phase(&mut self, phase: f32) {
        let shader = self.band_shader(phase);
        let (Some(surface), Some(silhouette)) = (self.surface.as_mut(), self.silhouette.as_ref())
        else {
            return;
        };

        let canvas = surface.canvas();
        canvas.clear(SkColor::TRANSPARENT);
        if let Some(shader) = shader {
            canvas.draw_image(silhouette, (0, 0), None);
            let mut paint = Paint::default();
            paint.set_shader(shader);
            paint.set_blend_mode(BlendMode::DstIn);
            canvas.draw_paint(&paint);
        }
        self.frame = Some(surface.image_snapshot());
    }

    fn band_shader(&self, phase: f32) -> Option<Shader> {
        let colors = [SkColor::TRANSPARENT, SkColor::WHITE, SkColor::TRANSPARENT];
        let matrix = self.band_matrix(phase);
        Shader::linear_gradient(
            ((self.start_offset, 0.0), (self.width as f32, 0.0)),
            &colors[..],
            None,
            TileMode::Clamp,
            None,
            Some(&matrix),
        )
    }

    /// Blits the current frame tinted with the shimmer color.
    pub fn draw(&self, canvas: &Canvas) {
        if let Some(frame) = &self.frame {
            blit_alpha(canvas, frame, self.color);
        }
    }

    pub fn alpha_pixels(&self) -> Vec<u8> {
        self.frame.as_ref().map(read_alpha).unwrap_or_default()
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
}
