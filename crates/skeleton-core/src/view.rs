//! # View Tree
//!
//! Arena-based storage for the view hierarchy being masked.
//!
//! ## Responsibilities
//! - **Node Storage**: `Vec<Option<ViewNode>>` arena with `ViewId` indices.
//! - **Hierarchy**: Parent-child relationships with cycle prevention.
//! - **Re-parenting**: `wrap`/`unwrap` slot a container in place of a view.
//! - **Observation**: A single layout-observer slot per view.

use crate::error::SkeletonError;
use crate::types::{ViewId, Visibility};
use skia_safe::{Rect, Vector};
use taffy::geometry::{Rect as Edges, Size};
use taffy::style::{Dimension, LengthPercentageAuto, Position, Style};

/// Whether a view can hold children or is a leaf visual element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewKind {
    Container,
    Leaf,
}

#[derive(Debug, Clone)]
pub struct ViewNode {
    pub kind: ViewKind,
    pub children: Vec<ViewId>,
    pub parent: Option<ViewId>,
    /// Layout input.
    pub style: Style,
    /// Frame relative to the parent's content origin (set by `LayoutEngine`).
    pub frame: Rect,
    /// Content scroll offset. Shifts children, not the view itself.
    pub scroll: Vector,
    pub visibility: Visibility,
    pub(crate) layout_observed: bool,
    pub(crate) notify_pending: bool,
}

impl ViewNode {
    pub fn new(kind: ViewKind, style: Style) -> Self {
        Self {
            kind,
            children: Vec::new(),
            parent: None,
            style,
            frame: Rect::default(),
            scroll: Vector::default(),
            visibility: Visibility::Visible,
            layout_observed: false,
            notify_pending: false,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ViewTree {
    nodes: Vec<Option<ViewNode>>,
    free_indices: Vec<usize>,
    root: Option<ViewId>,
}

impl ViewTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<ViewId> {
        self.root
    }

    pub fn set_root(&mut self, id: ViewId) {
        if self.get(id).is_some() {
            self.root = Some(id);
        }
    }

    pub fn add_container(&mut self, style: Style) -> ViewId {
        self.add_node(ViewNode::new(ViewKind::Container, style))
    }

    pub fn add_leaf(&mut self, style: Style) -> ViewId {
        self.add_node(ViewNode::new(ViewKind::Leaf, style))
    }

    fn add_node(&mut self, node: ViewNode) -> ViewId {
        if let Some(id) = self.free_indices.pop() {
            self.nodes[id] = Some(node);
            id
        } else {
            self.nodes.push(Some(node));
            self.nodes.len() - 1
        }
    }

    pub fn get(&self, id: ViewId) -> Option<&ViewNode> {
        self.nodes.get(id).and_then(|n| n.as_ref())
    }

    pub fn get_mut(&mut self, id: ViewId) -> Option<&mut ViewNode> {
        self.nodes.get_mut(id).and_then(|n| n.as_mut())
    }

    /// Appends `child` to `parent`. Returns `false` when rejected (missing
    /// nodes, leaf parent, self-parenting or a cycle).
    pub fn add_child(&mut self, parent: ViewId, child: ViewId) -> bool {
        let index = self.get(parent).map_or(0, |p| p.children.len());
        self.insert_child(parent, index, child)
    }

    pub fn insert_child(&mut self, parent: ViewId, index: usize, child: ViewId) -> bool {
        if parent == child || self.get(child).is_none() {
            return false;
        }
        match self.get(parent) {
            Some(p) if p.kind == ViewKind::Container => {}
            _ => return false,
        }

        // `child` must not be an ancestor of `parent`.
        let mut current = Some(parent);
        while let Some(id) = current {
            if id == child {
                return false;
            }
            current = self.get(id).and_then(|n| n.parent);
        }

        if let Some(old_parent) = self.get(child).and_then(|n| n.parent) {
            self.remove_child(old_parent, child);
        }

        if let Some(p) = self.get_mut(parent) {
            let index = index.min(p.children.len());
            p.children.insert(index, child);
        }
        if let Some(c) = self.get_mut(child) {
            c.parent = Some(parent);
        }
        if self.root == Some(child) {
            self.root = None;
        }
        true
    }

    pub fn remove_child(&mut self, parent: ViewId, child: ViewId) {
        if let Some(p) = self.get_mut(parent) {
            p.children.retain(|&c| c != child);
        }
        if let Some(c) = self.get_mut(child) {
            if c.parent == Some(parent) {
                c.parent = None;
            }
        }
    }

    pub fn set_visibility(&mut self, id: ViewId, visibility: Visibility) {
        if let Some(node) = self.get_mut(id) {
            node.visibility = visibility;
        }
    }

    pub fn visibility(&self, id: ViewId) -> Option<Visibility> {
        self.get(id).map(|n| n.visibility)
    }

    pub fn set_scroll(&mut self, id: ViewId, x: f32, y: f32) {
        if let Some(node) = self.get_mut(id) {
            node.scroll = Vector::new(x, y);
        }
    }

    /// Registers the layout observer of `id`. There is a single slot per
    /// view, so repeated calls leave exactly one registration.
    pub fn observe_layout(&mut self, id: ViewId) {
        if let Some(node) = self.get_mut(id) {
            if !node.layout_observed {
                node.layout_observed = true;
                node.notify_pending = true;
            }
        }
    }

    pub fn unobserve_layout(&mut self, id: ViewId) {
        if let Some(node) = self.get_mut(id) {
            node.layout_observed = false;
            node.notify_pending = false;
        }
    }

    pub fn is_layout_observed(&self, id: ViewId) -> bool {
        self.get(id).is_some_and(|n| n.layout_observed)
    }

    /// Puts a new container in `target`'s slot and moves `target` inside it.
    ///
    /// The container takes over `target`'s style (so it occupies the same
    /// space) and `target` is restyled to fill the container.
    pub fn wrap(&mut self, target: ViewId) -> Result<ViewId, SkeletonError> {
        let node = self.get(target).ok_or(SkeletonError::UnknownView(target))?;
        let original_style = node.style.clone();
        let frame = node.frame;
        let parent = node.parent;

        let wrapper = self.add_container(original_style.clone());
        if let Some(w) = self.get_mut(wrapper) {
            w.frame = frame;
        }

        if let Some(parent) = parent {
            let index = self
                .get(parent)
                .and_then(|p| p.children.iter().position(|&c| c == target))
                .unwrap_or(0);
            self.remove_child(parent, target);
            self.insert_child(parent, index, wrapper);
        }
        let was_root = self.root == Some(target);
        self.insert_child(wrapper, 0, target);
        if was_root {
            self.root = Some(wrapper);
        }

        if let Some(t) = self.get_mut(target) {
            t.style = fill_style(&original_style);
            t.frame = Rect::from_wh(frame.width(), frame.height());
        }
        Ok(wrapper)
    }

    /// Reverses [`wrap`](Self::wrap): returns the wrapped view to the
    /// wrapper's slot with its original style and frees the wrapper.
    pub fn unwrap(&mut self, wrapper: ViewId) -> Option<ViewId> {
        let node = self.get(wrapper)?;
        let target = *node.children.first()?;
        let original_style = node.style.clone();
        let frame = node.frame;
        let parent = node.parent;
        let was_root = self.root == Some(wrapper);

        self.remove_child(wrapper, target);
        if let Some(parent) = parent {
            let index = self
                .get(parent)
                .and_then(|p| p.children.iter().position(|&c| c == wrapper))
                .unwrap_or(0);
            self.remove_child(parent, wrapper);
            self.insert_child(parent, index, target);
        }
        if let Some(t) = self.get_mut(target) {
            t.style = original_style;
            t.frame = frame;
        }

        self.nodes[wrapper] = None;
        self.free_indices.push(wrapper);
        if was_root {
            self.root = Some(target);
        }
        Some(target)
    }
}

/// Style for a view living inside a wrapper that inherited its placement.
fn fill_style(original: &Style) -> Style {
    let fill = |d: Dimension| {
        if d == Dimension::auto() {
            d
        } else {
            Dimension::percent(1.0)
        }
    };
    Style {
        position: Position::Relative,
        margin: Edges {
            left: LengthPercentageAuto::length(0.0),
            right: LengthPercentageAuto::length(0.0),
            top: LengthPercentageAuto::length(0.0),
            bottom: LengthPercentageAuto::length(0.0),
        },
        inset: Edges {
            left: LengthPercentageAuto::auto(),
            right: LengthPercentageAuto::auto(),
            top: LengthPercentageAuto::auto(),
            bottom: LengthPercentageAuto::auto(),
        },
        flex_grow: 0.0,
        size: Size {
            width: fill(original.size.width),
            height: fill(original.size.height),
        },
        ..original.clone()
    }
}
