//! # Skeleton Core
//!
//! Masking and shimmer compositing for skeleton loading overlays.
//!
//! A [`MaskCompositor`] wraps a view of a [`ViewTree`], hides it, and paints
//! the silhouette of its leaf views as solid blocks. When shimmer is enabled a
//! [`ShimmerAnimator`] sweeps a diagonal light band across the same silhouette,
//! driven by frame callbacks from a [`FrameHost`].
//!
//! ## Modules
//! - `view` / `layout`: arena view tree and Taffy-backed layout pass.
//! - `geometry`: immutable per-layout snapshots and root-space leaf rects.
//! - `mask` / `shimmer`: Alpha8 rasters for the static and animated layers.
//! - `compositor`: lifecycle glue and the per-frame draw step.

pub mod animation;
pub mod compositor;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod layout;
pub mod lifecycle;
pub mod mask;
pub mod shimmer;
pub mod types;
pub mod view;

pub use animation::EasingType;
pub use compositor::MaskCompositor;
pub use config::SkeletonConfig;
pub use error::SkeletonError;
pub use frame::{AnimationClock, FrameHost, FrameQueue, FrameRequest, ManualClock, SystemClock};
pub use geometry::{leaf_rects, LeafRect, ViewShape};
pub use layout::{LayoutChange, LayoutEngine};
pub use lifecycle::{Lifecycle, ShimmerCommand, SurfaceState};
pub use mask::StaticMask;
pub use shimmer::ShimmerAnimator;
pub use types::{Color, ViewId, Visibility};
pub use view::{ViewKind, ViewNode, ViewTree};
