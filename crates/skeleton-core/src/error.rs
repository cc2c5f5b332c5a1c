//! # Errors
//!
//! Failures are narrow here: nothing does I/O except config parsing. Every
//! variant degrades to "no skeleton" at the call sites that log instead of
//! propagating.

use crate::types::ViewId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SkeletonError {
    #[error("missing view to mask")]
    MissingTargetView,

    #[error("view {0} is not part of the tree")]
    UnknownView(ViewId),

    #[error("failed to allocate {width}x{height} alpha surface")]
    SurfaceAllocation { width: i32, height: i32 },

    #[error("invalid skeleton config: {0}")]
    Config(#[from] serde_json::Error),
}
