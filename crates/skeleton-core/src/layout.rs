//! # Layout System
//!
//! Runs a Taffy flexbox pass over a [`ViewTree`] and reports which observed
//! views need their layout-change observers notified.

use crate::types::{ViewId, Visibility};
use crate::view::ViewTree;
use skia_safe::Rect;
use std::collections::HashMap;
use taffy::geometry::Size;
use taffy::style::{AvailableSpace, Display};
use taffy::{NodeId, TaffyResult, TaffyTree};
use tracing::warn;

/// Notification for a view whose layout observer must fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChange {
    pub view: ViewId,
}

pub struct LayoutEngine {
    taffy: TaffyTree<()>,
    nodes: HashMap<ViewId, NodeId>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self {
            taffy: TaffyTree::new(),
            nodes: HashMap::new(),
        }
    }

    /// Lays out the tree's root into a `width` x `height` viewport.
    ///
    /// Frames are written relative to the parent. An observed view is reported
    /// when its own frame or any descendant frame changed, or when its observer
    /// was registered since the previous pass.
    pub fn compute_layout(&mut self, tree: &mut ViewTree, width: f32, height: f32) -> Vec<LayoutChange> {
        let Some(root) = tree.root() else {
            return Vec::new();
        };

        self.taffy.clear();
        self.nodes.clear();

        let result = self.build(tree, root).and_then(|root_node| {
            self.taffy.compute_layout(
                root_node,
                Size {
                    width: AvailableSpace::Definite(width),
                    height: AvailableSpace::Definite(height),
                },
            )
        });
        if let Err(e) = result {
            warn!("Layout pass failed: {}", e);
            return Vec::new();
        }

        let mut changes = Vec::new();
        self.apply(tree, root, &mut changes);
        changes
    }

    fn build(&mut self, tree: &ViewTree, id: ViewId) -> TaffyResult<NodeId> {
        let Some(view) = tree.get(id) else {
            return self.taffy.new_leaf(taffy::style::Style::DEFAULT);
        };

        let mut style = view.style.clone();
        if view.visibility == Visibility::Gone {
            style.display = Display::None;
        }

        let children = view.children.clone();
        let mut child_nodes = Vec::with_capacity(children.len());
        for child in children {
            child_nodes.push(self.build(tree, child)?);
        }

        let node = if child_nodes.is_empty() {
            self.taffy.new_leaf(style)?
        } else {
            self.taffy.new_with_children(style, &child_nodes)?
        };
        self.nodes.insert(id, node);
        Ok(node)
    }

    /// Writes frames back and returns whether anything in the subtree moved.
    fn apply(&self, tree: &mut ViewTree, id: ViewId, changes: &mut Vec<LayoutChange>) -> bool {
        let Some(&node) = self.nodes.get(&id) else {
            return false;
        };

        let frame = match self.taffy.layout(node) {
            Ok(layout) => Rect::from_xywh(
                layout.location.x,
                layout.location.y,
                layout.size.width,
                layout.size.height,
            ),
            Err(_) => return false,
        };

        let children = tree.get(id).map(|v| v.children.clone()).unwrap_or_default();
        let mut subtree_changed = false;
        for child in children {
            subtree_changed |= self.apply(tree, child, changes);
        }

        let Some(view) = tree.get_mut(id) else {
            return subtree_changed;
        };
        if view.frame != frame {
            view.frame = frame;
            subtree_changed = true;
        }
        if view.layout_observed && (subtree_changed || view.notify_pending) {
            view.notify_pending = false;
            changes.push(LayoutChange { view: id });
        }
        subtree_changed
    }
}
