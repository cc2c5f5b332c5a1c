//! List-item skeleton used by the renderer: an avatar beside a title and a
//! subtitle line, repeated for each row.

use skeleton_core::{ViewId, ViewTree};
use taffy::prelude::{
    AlignItems, Dimension, FlexDirection, LengthPercentage, LengthPercentageAuto, Rect, Size,
};
use taffy::style::Style;

pub const ROW_HEIGHT: f32 = 72.0;

fn length(width: f32, height: f32) -> Size<Dimension> {
    Size {
        width: Dimension::length(width),
        height: Dimension::length(height),
    }
}

fn padding(all: f32) -> Rect<LengthPercentage> {
    Rect {
        left: LengthPercentage::length(all),
        right: LengthPercentage::length(all),
        top: LengthPercentage::length(all),
        bottom: LengthPercentage::length(all),
    }
}

fn line(width_percent: f32, height: f32) -> Style {
    let mut style = Style::DEFAULT;
    style.size = Size {
        width: Dimension::percent(width_percent),
        height: Dimension::length(height),
    };
    style
}

/// Builds the screen and returns `(tree, list)`, where `list` is the view
/// to mask.
pub fn list_screen(width: f32, rows: usize) -> (ViewTree, ViewId) {
    let mut tree = ViewTree::new();

    let mut screen_style = Style::DEFAULT;
    screen_style.size = length(width, ROW_HEIGHT * rows as f32);
    screen_style.flex_direction = FlexDirection::Column;
    let screen = tree.add_container(screen_style);
    tree.set_root(screen);

    let mut list_style = Style::DEFAULT;
    list_style.size = Size {
        width: Dimension::percent(1.0),
        height: Dimension::auto(),
    };
    list_style.flex_direction = FlexDirection::Column;
    let list = tree.add_container(list_style);
    tree.add_child(screen, list);

    for _ in 0..rows {
        let mut row_style = Style::DEFAULT;
        row_style.size = Size {
            width: Dimension::percent(1.0),
            height: Dimension::length(ROW_HEIGHT),
        };
        row_style.flex_direction = FlexDirection::Row;
        row_style.align_items = Some(AlignItems::Center);
        row_style.padding = padding(16.0);
        row_style.gap = Size {
            width: LengthPercentage::length(16.0),
            height: LengthPercentage::length(0.0),
        };
        let row = tree.add_container(row_style);
        tree.add_child(list, row);

        let mut avatar_style = Style::DEFAULT;
        avatar_style.size = length(40.0, 40.0);
        avatar_style.flex_shrink = 0.0;
        let avatar = tree.add_leaf(avatar_style);
        tree.add_child(row, avatar);

        let mut text_style = Style::DEFAULT;
        text_style.flex_direction = FlexDirection::Column;
        text_style.flex_grow = 1.0;
        text_style.gap = Size {
            width: LengthPercentage::length(0.0),
            height: LengthPercentage::length(8.0),
        };
        text_style.margin.right = LengthPercentageAuto::length(16.0);
        let text = tree.add_container(text_style);
        tree.add_child(row, text);

        let title = tree.add_leaf(line(0.6, 14.0));
        let subtitle = tree.add_leaf(line(0.4, 12.0));
        tree.add_child(text, title);
        tree.add_child(text, subtitle);
    }

    (tree, list)
}
