//! # Mask Geometry
//!
//! Per-layout snapshots of the masked subtree and the leaf rectangles derived
//! from them. Everything here is a pure function of the snapshot; the live
//! tree is only read while taking it.

use crate::types::ViewId;
use crate::view::{ViewKind, ViewTree};
use skia_safe::{Rect, Vector};

/// Rectangle of one leaf visual element, in the masked root's coordinates.
pub type LeafRect = Rect;

/// Immutable geometry of a view subtree for one layout pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewShape {
    Container {
        frame: Rect,
        scroll: Vector,
        children: Vec<ViewShape>,
    },
    Leaf {
        frame: Rect,
    },
}

impl ViewShape {
    pub fn snapshot(tree: &ViewTree, id: ViewId) -> Option<Self> {
        let view = tree.get(id)?;
        let shape = match view.kind {
            ViewKind::Leaf => ViewShape::Leaf { frame: view.frame },
            ViewKind::Container => ViewShape::Container {
                frame: view.frame,
                scroll: view.scroll,
                children: view
                    .children
                    .iter()
                    .filter_map(|&child| Self::snapshot(tree, child))
                    .collect(),
            },
        };
        Some(shape)
    }

    pub fn frame(&self) -> Rect {
        match self {
            ViewShape::Container { frame, .. } | ViewShape::Leaf { frame } => *frame,
        }
    }
}

/// Translation carried down the recursion from the masked root.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Offset {
    pub dx: f32,
    pub dy: f32,
}

impl Offset {
    /// Offset of the content of a container with the given frame and scroll.
    pub fn enter(self, frame: &Rect, scroll: Vector) -> Self {
        Self {
            dx: self.dx + frame.left - scroll.x,
            dy: self.dy + frame.top - scroll.y,
        }
    }

    pub fn apply(self, rect: &Rect) -> Rect {
        rect.with_offset((self.dx, self.dy))
    }
}

/// Collects the root-space rectangle of every leaf under `root`.
///
/// The root's own frame and scroll do not apply; a bare leaf root masks its
/// whole bounds.
pub fn leaf_rects(root: &ViewShape) -> Vec<LeafRect> {
    let mut rects = Vec::new();
    match root {
        ViewShape::Leaf { frame } => push_rect(&mut rects, Rect::from_wh(frame.width(), frame.height())),
        ViewShape::Container { children, .. } => {
            for child in children {
                collect(child, Offset::default(), &mut rects);
            }
        }
    }
    rects
}

fn collect(shape: &ViewShape, offset: Offset, rects: &mut Vec<LeafRect>) {
    match shape {
        ViewShape::Leaf { frame } => push_rect(rects, offset.apply(frame)),
        ViewShape::Container {
            frame,
            scroll,
            children,
        } => {
            let inner = offset.enter(frame, *scroll);
            for child in children {
                collect(child, inner, rects);
            }
        }
    }
}

fn push_rect(rects: &mut Vec<LeafRect>, rect: Rect) {
    if !rect.is_empty() {
        rects.push(rect);
    }
}

/// Rectangle of `view` in `root`'s coordinates, composing the frame origins
/// and scroll offsets of every ancestor strictly between the two.
///
/// Returns `None` when `view` is not a descendant of `root`.
pub fn to_root_space(tree: &ViewTree, root: ViewId, view: ViewId) -> Option<Rect> {
    let node = tree.get(view)?;
    if view == root {
        return Some(Rect::from_wh(node.frame.width(), node.frame.height()));
    }

    let mut rect = node.frame;
    let mut current = node.parent?;
    while current != root {
        let ancestor = tree.get(current)?;
        let offset = Offset::default().enter(&ancestor.frame, ancestor.scroll);
        rect = offset.apply(&rect);
        current = ancestor.parent?;
    }
    Some(rect)
}
