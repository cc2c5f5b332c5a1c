//! # Skeleton Configuration
//!
//! The configuration bundle handed to [`MaskCompositor`](crate::MaskCompositor).
//! Every field has a default so partial JSON documents deserialize.

use crate::animation::EasingType;
use crate::error::SkeletonError;
use crate::types::Color;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_MASK_COLOR: u32 = 0xE1E1E1;
pub const DEFAULT_SHIMMER_COLOR: u32 = 0xD5D5D5;
pub const DEFAULT_SHIMMER_DURATION_MILLIS: u64 = 2000;
pub const DEFAULT_SHIMMER_ANGLE: f32 = 20.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkeletonConfig {
    pub mask_color: Color,
    /// Corner radius of every masked rect; `0.0` draws sharp corners.
    pub corner_radius: f32,
    pub show_shimmer: bool,
    pub shimmer_color: Color,
    /// Length of one sweep. `0` renders a static band and never animates.
    pub shimmer_duration_millis: u64,
    /// Sweep angle in degrees.
    pub shimmer_angle: f32,
    pub shimmer_easing: EasingType,
}

impl Default for SkeletonConfig {
    fn default() -> Self {
        Self {
            mask_color: Color::from_rgb(DEFAULT_MASK_COLOR),
            corner_radius: 0.0,
            show_shimmer: true,
            shimmer_color: Color::from_rgb(DEFAULT_SHIMMER_COLOR),
            shimmer_duration_millis: DEFAULT_SHIMMER_DURATION_MILLIS,
            shimmer_angle: DEFAULT_SHIMMER_ANGLE,
            shimmer_easing: EasingType::Linear,
        }
    }
}

impl SkeletonConfig {
    /// Parses a JSON document and sanitizes the result.
    pub fn from_json(json: &str) -> Result<Self, SkeletonError> {
        let config: SkeletonConfig = serde_json::from_str(json)?;
        Ok(config.sanitized())
    }

    /// Clamps geometry that would otherwise produce undefined drawing.
    pub fn sanitized(mut self) -> Self {
        if !self.corner_radius.is_finite() || self.corner_radius < 0.0 {
            warn!(
                "Corner radius {} is not a non-negative number, using 0",
                self.corner_radius
            );
            self.corner_radius = 0.0;
        }
        if !self.shimmer_angle.is_finite() {
            warn!("Shimmer angle {} is not finite, using 0", self.shimmer_angle);
            self.shimmer_angle = 0.0;
        }
        self
    }
}
