//! # Mask Compositor
//!
//! Wraps a target view, keeps the skeleton masks in sync with its layout and
//! draws the overlay.
//!
//! ## Responsibilities
//! - **Wrapping**: Slots an overlay container in place of the target, which
//!   stays laid out but invisible until the skeleton is hidden again.
//! - **Observation**: `bind`/`unbind` manage the wrapper's layout observer.
//! - **Masking**: Every observed layout change rebuilds the static mask and
//!   the shimmer from a fresh geometry snapshot.
//! - **Gating**: Attachment and visibility go through [`Lifecycle`]; the
//!   shimmer runs only while attached and visible.
//!
//! The compositor never panics on bad input. A missing target is logged and
//! yields an inert overlay that draws nothing.

use crate::config::SkeletonConfig;
use crate::error::SkeletonError;
use crate::frame::{FrameHost, FrameRequest};
use crate::geometry::{leaf_rects, ViewShape};
use crate::layout::LayoutChange;
use crate::lifecycle::{Lifecycle, ShimmerCommand};
use crate::mask::StaticMask;
use crate::shimmer::ShimmerAnimator;
use crate::types::{ViewId, Visibility};
use crate::view::ViewTree;
use skia_safe::Canvas;
use tracing::{debug, error};

#[derive(Debug, Clone, Copy)]
struct Wrapped {
    wrapper: ViewId,
    prior_visibility: Visibility,
}

#[derive(Debug)]
pub struct MaskCompositor {
    config: SkeletonConfig,
    target: Option<ViewId>,
    wrapped: Option<Wrapped>,
    observing: bool,
    lifecycle: Lifecycle,
    static_mask: StaticMask,
    shimmer: Option<ShimmerAnimator>,
}

impl MaskCompositor {
    /// Wraps `target` and hides it. Failures are logged and produce an inert
    /// compositor.
    pub fn new(tree: &mut ViewTree, target: Option<ViewId>, config: SkeletonConfig) -> Self {
        match Self::try_new(tree, target, config.clone()) {
            Ok(compositor) => compositor,
            Err(e) => {
                error!("Cannot mask view: {}", e);
                Self::inert(config.sanitized())
            }
        }
    }

    pub fn try_new(
        tree: &mut ViewTree,
        target: Option<ViewId>,
        config: SkeletonConfig,
    ) -> Result<Self, SkeletonError> {
        let target = target.ok_or(SkeletonError::MissingTargetView)?;
        let mut compositor = Self::inert(config.sanitized());
        compositor.target = Some(target);
        compositor.mask_target(tree)?;
        Ok(compositor)
    }

    fn inert(config: SkeletonConfig) -> Self {
        Self {
            config,
            target: None,
            wrapped: None,
            observing: false,
            lifecycle: Lifecycle::new(true),
            static_mask: StaticMask::empty(),
            shimmer: None,
        }
    }

    fn mask_target(&mut self, tree: &mut ViewTree) -> Result<(), SkeletonError> {
        let target = self.target.ok_or(SkeletonError::MissingTargetView)?;
        let prior_visibility = tree
            .visibility(target)
            .ok_or(SkeletonError::UnknownView(target))?;
        let wrapper = tree.wrap(target)?;
        tree.set_visibility(target, Visibility::Invisible);
        self.wrapped = Some(Wrapped {
            wrapper,
            prior_visibility,
        });
        debug!("Masking view {} inside overlay {}", target, wrapper);
        Ok(())
    }

    pub fn config(&self) -> &SkeletonConfig {
        &self.config
    }

    /// `true` when construction failed and nothing will ever be drawn.
    pub fn is_inert(&self) -> bool {
        self.target.is_none()
    }

    pub fn target(&self) -> Option<ViewId> {
        self.target
    }

    /// The overlay container currently holding the target.
    pub fn wrapper(&self) -> Option<ViewId> {
        self.wrapped.map(|w| w.wrapper)
    }

    pub fn is_masking(&self) -> bool {
        self.wrapped.is_some()
    }

    pub fn is_bound(&self) -> bool {
        self.observing
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn static_mask(&self) -> &StaticMask {
        &self.static_mask
    }

    pub fn shimmer(&self) -> Option<&ShimmerAnimator> {
        self.shimmer.as_ref()
    }

    pub fn is_shimmering(&self) -> bool {
        self.shimmer.as_ref().is_some_and(|s| s.is_running())
    }

    /// Registers the layout observer on the overlay. Idempotent.
    pub fn bind(&mut self, tree: &mut ViewTree) {
        let Some(wrapper) = self.wrapper() else {
            return;
        };
        if !self.observing {
            tree.observe_layout(wrapper);
            self.observing = true;
        }
    }

    /// Stops the shimmer and releases the layout observer. Safe to call at
    /// any time.
    pub fn unbind(&mut self, tree: &mut ViewTree, host: &mut dyn FrameHost) {
        if let Some(shimmer) = self.shimmer.as_mut() {
            shimmer.stop(host);
        }
        if self.observing {
            if let Some(wrapper) = self.wrapper() {
                tree.unobserve_layout(wrapper);
            }
            self.observing = false;
        }
    }

    pub fn handles(&self, change: &LayoutChange) -> bool {
        self.observing && self.wrapper() == Some(change.view)
    }

    /// Forwards the notifications of a layout pass that concern this overlay.
    pub fn dispatch_layout(
        &mut self,
        tree: &ViewTree,
        changes: &[LayoutChange],
        host: &mut dyn FrameHost,
    ) {
        if changes.iter().any(|c| self.handles(c)) {
            self.on_layout(tree, host);
        }
    }

    /// Layout-change observer: rebuilds both masks from the current layout.
    /// Runs to completion before returning, so a draw never sees a partial
    /// mask.
    pub fn on_layout(&mut self, tree: &ViewTree, host: &mut dyn FrameHost) {
        if !self.observing {
            return;
        }
        let Some(wrapper) = self.wrapper() else {
            return;
        };
        let Some(shape) = ViewShape::snapshot(tree, wrapper) else {
            return;
        };

        let frame = shape.frame();
        let width = frame.width().round() as i32;
        let height = frame.height().round() as i32;
        let rects = leaf_rects(&shape);

        self.static_mask = StaticMask::rasterize(width, height, &rects, self.config.corner_radius);

        if let Some(mut old) = self.shimmer.take() {
            old.stop(host);
        }
        if self.config.show_shimmer {
            self.shimmer = Some(ShimmerAnimator::new(
                &self.config,
                width,
                height,
                &rects,
                width as f32 / 2.0,
            ));
            let command = self.lifecycle.sync();
            self.apply(Some(command), host);
        }
    }

    /// Draw step: static mask, then the shimmer frame, both at the origin.
    /// Reads the current masks only.
    pub fn draw(&self, canvas: &Canvas) {
        if self.wrapped.is_none() || !self.lifecycle.is_visible() {
            return;
        }
        self.static_mask.draw(canvas, self.config.mask_color);
        if let Some(shimmer) = &self.shimmer {
            shimmer.draw(canvas);
        }
    }

    /// Frame callback for a request issued by the shimmer. Returns `true`
    /// when the overlay needs a redraw.
    pub fn on_frame(&mut self, request: FrameRequest, host: &mut dyn FrameHost) -> bool {
        match self.shimmer.as_mut() {
            Some(shimmer) if self.lifecycle.is_live() => shimmer.on_frame(request, host),
            _ => false,
        }
    }

    pub fn set_visibility(
        &mut self,
        tree: &mut ViewTree,
        visibility: Visibility,
        host: &mut dyn FrameHost,
    ) {
        if let Some(wrapper) = self.wrapper() {
            tree.set_visibility(wrapper, visibility);
        }
        let command = self.lifecycle.set_visible(visibility == Visibility::Visible);
        self.apply(command, host);
    }

    pub fn on_attached(&mut self, host: &mut dyn FrameHost) {
        let command = self.lifecycle.attach();
        self.apply(command, host);
    }

    pub fn on_detached(&mut self, host: &mut dyn FrameHost) {
        let command = self.lifecycle.detach();
        self.apply(command, host);
    }

    fn apply(&mut self, command: Option<ShimmerCommand>, host: &mut dyn FrameHost) {
        let Some(shimmer) = self.shimmer.as_mut() else {
            return;
        };
        match command {
            Some(ShimmerCommand::Start) => shimmer.start(host),
            Some(ShimmerCommand::Stop) => shimmer.stop(host),
            None => {}
        }
    }

    /// Masks the target again (if hidden), forces the overlay visible and
    /// binds. The masks are rebuilt on the next layout pass.
    pub fn show_skeleton(&mut self, tree: &mut ViewTree, host: &mut dyn FrameHost) {
        if self.is_inert() {
            return;
        }
        if self.wrapped.is_none() {
            if let Err(e) = self.mask_target(tree) {
                error!("Cannot mask view: {}", e);
                return;
            }
        }
        self.set_visibility(tree, Visibility::Visible, host);
        self.bind(tree);
    }

    /// Unbinds, returns the target to its slot and restores the visibility
    /// it had before it was masked.
    pub fn hide_skeleton(&mut self, tree: &mut ViewTree, host: &mut dyn FrameHost) {
        self.unbind(tree, host);
        self.shimmer = None;
        self.static_mask = StaticMask::empty();

        let (Some(target), Some(wrapped)) = (self.target, self.wrapped.take()) else {
            return;
        };
        tree.unwrap(wrapped.wrapper);
        tree.set_visibility(target, wrapped.prior_visibility);
        debug!("Restored view {} to {:?}", target, wrapped.prior_visibility);
    }

    /// Tears the overlay down and hands the target back to the host.
    pub fn release(mut self, tree: &mut ViewTree, host: &mut dyn FrameHost) -> Option<ViewId> {
        self.hide_skeleton(tree, host);
        self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::{FrameQueue, ManualClock};
    use crate::layout::LayoutEngine;
    use taffy::prelude::{Dimension, Size};
    use taffy::style::Style;

    fn sized(width: f32, height: f32) -> Style {
        let mut style = Style::DEFAULT;
        style.size = Size {
            width: Dimension::length(width),
            height: Dimension::length(height),
        };
        style
    }

    fn card() -> (ViewTree, ViewId) {
        let mut tree = ViewTree::new();
        let root = tree.add_container(sized(100.0, 100.0));
        let card = tree.add_container(sized(80.0, 40.0));
        let line = tree.add_leaf(sized(60.0, 10.0));
        tree.add_child(root, card);
        tree.add_child(card, line);
        tree.set_root(root);
        (tree, card)
    }

    #[test]
    fn missing_target_is_inert() {
        let mut tree = ViewTree::new();
        let mut host = FrameQueue::new(ManualClock::new(0));
        let mut compositor = MaskCompositor::new(&mut tree, None, SkeletonConfig::default());

        assert!(compositor.is_inert());
        compositor.bind(&mut tree);
        compositor.show_skeleton(&mut tree, &mut host);
        assert!(!compositor.is_bound());
        assert!(!compositor.is_masking());
        compositor.unbind(&mut tree, &mut host);
    }

    #[test]
    fn unknown_target_fails_to_construct() {
        let mut tree = ViewTree::new();
        let result = MaskCompositor::try_new(&mut tree, Some(42), SkeletonConfig::default());
        assert!(matches!(result, Err(SkeletonError::UnknownView(42))));
    }

    #[test]
    fn construction_hides_the_target() {
        let (mut tree, card) = card();
        let compositor = MaskCompositor::new(&mut tree, Some(card), SkeletonConfig::default());

        assert_eq!(tree.visibility(card), Some(Visibility::Invisible));
        let wrapper = compositor.wrapper().unwrap();
        assert_eq!(tree.get(card).unwrap().parent, Some(wrapper));
    }

    #[test]
    fn unbound_compositor_ignores_layout() {
        let (mut tree, card) = card();
        let mut host = FrameQueue::new(ManualClock::new(0));
        let mut compositor = MaskCompositor::new(&mut tree, Some(card), SkeletonConfig::default());

        LayoutEngine::new().compute_layout(&mut tree, 100.0, 100.0);
        compositor.on_layout(&tree, &mut host);
        assert!(compositor.static_mask().is_empty());
        assert!(compositor.shimmer().is_none());
    }

    #[test]
    fn detaching_stops_the_shimmer() {
        let (mut tree, card) = card();
        let mut host = FrameQueue::new(ManualClock::new(0));
        let mut engine = LayoutEngine::new();
        let mut compositor = MaskCompositor::new(&mut tree, Some(card), SkeletonConfig::default());

        compositor.bind(&mut tree);
        compositor.on_attached(&mut host);
        let changes = engine.compute_layout(&mut tree, 100.0, 100.0);
        compositor.dispatch_layout(&tree, &changes, &mut host);
        assert!(compositor.is_shimmering());
        assert_eq!(host.pending_count(), 1);

        compositor.on_detached(&mut host);
        assert!(!compositor.is_shimmering());
        assert_eq!(host.pending_count(), 0);

        compositor.on_attached(&mut host);
        assert!(compositor.is_shimmering());
    }
}
