use skeleton_core::{
    Color, FrameQueue, LayoutEngine, ManualClock, MaskCompositor, SkeletonConfig, StaticMask,
    ViewId, ViewTree, Visibility,
};
use skia_safe::{AlphaType, CachingHint, ColorType, ImageInfo, Rect};
use taffy::prelude::{Dimension, FlexDirection, LengthPercentage, Size};
use taffy::style::Style;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn sized(width: f32, height: f32) -> Style {
    let mut style = Style::DEFAULT;
    style.size = Size {
        width: Dimension::length(width),
        height: Dimension::length(height),
    };
    style
}

/// Column of two 50x20 leaves separated by a 10px gap, the column itself
/// being the tree root.
fn two_rows() -> (ViewTree, ViewId) {
    let mut tree = ViewTree::new();
    let mut column = sized(50.0, 50.0);
    column.flex_direction = FlexDirection::Column;
    column.gap = Size {
        width: LengthPercentage::length(0.0),
        height: LengthPercentage::length(10.0),
    };
    let root = tree.add_container(column);
    for _ in 0..2 {
        let leaf = tree.add_leaf(sized(50.0, 20.0));
        tree.add_child(root, leaf);
    }
    tree.set_root(root);
    (tree, root)
}

fn no_shimmer() -> SkeletonConfig {
    SkeletonConfig {
        mask_color: Color::BLACK,
        corner_radius: 0.0,
        show_shimmer: false,
        ..Default::default()
    }
}

/// Binds, attaches and runs one layout pass.
fn laid_out(
    tree: &mut ViewTree,
    target: ViewId,
    config: SkeletonConfig,
    host: &mut FrameQueue<ManualClock>,
) -> MaskCompositor {
    let mut compositor = MaskCompositor::new(tree, Some(target), config);
    compositor.bind(tree);
    compositor.on_attached(host);
    let changes = LayoutEngine::new().compute_layout(tree, 50.0, 50.0);
    compositor.dispatch_layout(tree, &changes, host);
    compositor
}

fn render_rgba(compositor: &MaskCompositor, width: i32, height: i32) -> Vec<u8> {
    let info = ImageInfo::new((width, height), ColorType::RGBA8888, AlphaType::Premul, None);
    let mut surface = skia_safe::surfaces::raster(&info, None, None).expect("Failed to create Skia surface");
    surface.canvas().clear(skia_safe::Color::TRANSPARENT);
    compositor.draw(surface.canvas());

    let mut pixels = vec![0u8; (width * height * 4) as usize];
    let ok = surface.image_snapshot().read_pixels(
        &info,
        pixels.as_mut_slice(),
        (width * 4) as usize,
        (0, 0),
        CachingHint::Allow,
    );
    assert!(ok, "Failed to read back rendered pixels");
    pixels
}

fn rgba_at(pixels: &[u8], width: i32, x: i32, y: i32) -> [u8; 4] {
    let i = ((y * width + x) * 4) as usize;
    [pixels[i], pixels[i + 1], pixels[i + 2], pixels[i + 3]]
}

#[test]
fn two_siblings_leave_a_transparent_gap() {
    init_tracing();
    let (mut tree, root) = two_rows();
    let mut host = FrameQueue::new(ManualClock::new(0));
    let compositor = laid_out(&mut tree, root, no_shimmer(), &mut host);

    let mask = compositor.static_mask();
    assert_eq!((mask.width(), mask.height()), (50, 50));
    assert_eq!(mask.opaque_area(), 2 * 50 * 20);

    for y in 0..50 {
        let expected = if (20..30).contains(&y) { 0 } else { 255 };
        for x in [0, 25, 49] {
            assert_eq!(mask.alpha_at(x, y), expected, "alpha at ({x}, {y})");
        }
    }

    assert!(compositor.shimmer().is_none());
    assert_eq!(host.pending_count(), 0);

    let pixels = render_rgba(&compositor, 50, 50);
    assert_eq!(rgba_at(&pixels, 50, 10, 10), [0, 0, 0, 255]);
    assert_eq!(rgba_at(&pixels, 50, 10, 25), [0, 0, 0, 0]);
    assert_eq!(rgba_at(&pixels, 50, 10, 40), [0, 0, 0, 255]);
}

#[test]
fn opaque_area_is_the_sum_of_leaf_areas() {
    let rects = [
        Rect::from_xywh(0.0, 0.0, 30.0, 10.0),
        Rect::from_xywh(40.0, 0.0, 20.0, 20.0),
        Rect::from_xywh(0.0, 30.0, 64.0, 5.0),
        Rect::from_xywh(10.0, 50.0, 7.0, 13.0),
    ];
    let expected: usize = rects
        .iter()
        .map(|r| (r.width() * r.height()) as usize)
        .sum();

    let mask = StaticMask::rasterize(64, 64, &rects, 0.0);
    assert_eq!(mask.opaque_area(), expected);
}

#[test]
fn sharp_corners_hit_exact_pixel_edges() {
    let rect = Rect::from_xywh(5.0, 5.0, 40.0, 10.0);
    let mask = StaticMask::rasterize(60, 30, &[rect], 0.0);

    assert_eq!(mask.alpha_at(5, 5), 255);
    assert_eq!(mask.alpha_at(44, 14), 255);
    assert_eq!(mask.alpha_at(45, 14), 0);
    assert_eq!(mask.alpha_at(4, 5), 0);
    assert_eq!(mask.alpha_at(5, 15), 0);
}

#[test]
fn rounded_corners_are_cut() {
    let rect = Rect::from_xywh(5.0, 5.0, 40.0, 20.0);
    let mask = StaticMask::rasterize(60, 30, &[rect], 8.0);

    // Corner pixels sit outside the arc; edges and interior stay opaque.
    assert_eq!(mask.alpha_at(5, 5), 0);
    assert_eq!(mask.alpha_at(44, 5), 0);
    assert_eq!(mask.alpha_at(5, 24), 0);
    assert_eq!(mask.alpha_at(44, 24), 0);
    assert_eq!(mask.alpha_at(25, 5), 255);
    assert_eq!(mask.alpha_at(5, 15), 255);
    assert_eq!(mask.alpha_at(25, 15), 255);
    assert!(mask.opaque_area() < 40 * 20);
}

#[test]
fn scrolled_containers_shift_their_leaves() {
    let mut tree = ViewTree::new();
    let mut column = sized(50.0, 50.0);
    column.flex_direction = FlexDirection::Column;
    let root = tree.add_container(column);
    let header = tree.add_leaf(sized(50.0, 10.0));
    let mut list_style = sized(50.0, 40.0);
    list_style.flex_direction = FlexDirection::Column;
    let list = tree.add_container(list_style);
    let item = tree.add_leaf(sized(50.0, 30.0));
    tree.add_child(root, header);
    tree.add_child(root, list);
    tree.add_child(list, item);
    tree.set_root(root);
    tree.set_scroll(list, 0.0, 15.0);

    let mut host = FrameQueue::new(ManualClock::new(0));
    let compositor = laid_out(&mut tree, root, no_shimmer(), &mut host);
    let mask = compositor.static_mask();

    // header [0,10), item laid out at y=10 but scrolled up to [-5,25).
    assert_eq!(mask.alpha_at(10, 0), 255);
    assert_eq!(mask.alpha_at(10, 24), 255);
    assert_eq!(mask.alpha_at(10, 25), 0);
    assert_eq!(mask.opaque_area(), 50 * 25);
}

#[test]
fn bind_then_unbind_leaves_nothing_running() {
    init_tracing();
    let (mut tree, root) = two_rows();
    let mut host = FrameQueue::new(ManualClock::new(0));
    let mut engine = LayoutEngine::new();
    let mut compositor = laid_out(&mut tree, root, SkeletonConfig::default(), &mut host);
    let wrapper = compositor.wrapper().unwrap();

    assert!(compositor.is_shimmering());
    assert!(tree.is_layout_observed(wrapper));

    compositor.unbind(&mut tree, &mut host);
    compositor.unbind(&mut tree, &mut host);

    assert!(!compositor.is_bound());
    assert!(!compositor.is_shimmering());
    assert!(!tree.is_layout_observed(wrapper));
    assert!(host.take_due().is_empty());

    tree.get_mut(wrapper).unwrap().style = sized(40.0, 40.0);
    assert!(engine.compute_layout(&mut tree, 50.0, 50.0).is_empty());
}

#[test]
fn binding_twice_registers_one_observer() {
    let (mut tree, root) = two_rows();
    let mut host = FrameQueue::new(ManualClock::new(0));
    let mut compositor = MaskCompositor::new(&mut tree, Some(root), SkeletonConfig::default());
    compositor.bind(&mut tree);
    compositor.bind(&mut tree);
    compositor.on_attached(&mut host);

    let changes = LayoutEngine::new().compute_layout(&mut tree, 50.0, 50.0);
    assert_eq!(changes.len(), 1);
    compositor.dispatch_layout(&tree, &changes, &mut host);
    assert_eq!(host.pending_count(), 1);
}

#[test]
fn hide_skeleton_restores_the_original_view() {
    for prior in [Visibility::Visible, Visibility::Invisible, Visibility::Gone] {
        let mut tree = ViewTree::new();
        let screen = tree.add_container(sized(50.0, 50.0));
        let before = tree.add_leaf(sized(10.0, 10.0));
        let content = tree.add_container(sized(50.0, 30.0));
        let leaf = tree.add_leaf(sized(20.0, 20.0));
        tree.add_child(content, leaf);
        tree.add_child(screen, before);
        tree.add_child(screen, content);
        tree.set_root(screen);
        tree.set_visibility(content, prior);
        let original_style = tree.get(content).unwrap().style.clone();

        let mut host = FrameQueue::new(ManualClock::new(0));
        let mut compositor = MaskCompositor::new(&mut tree, Some(content), SkeletonConfig::default());
        compositor.show_skeleton(&mut tree, &mut host);
        assert_eq!(tree.visibility(content), Some(Visibility::Invisible));

        compositor.hide_skeleton(&mut tree, &mut host);
        assert_eq!(tree.visibility(content), Some(prior));
        assert_eq!(tree.get(screen).unwrap().children, vec![before, content]);
        assert_eq!(tree.get(content).unwrap().style, original_style);
        assert!(!compositor.is_masking());

        compositor.show_skeleton(&mut tree, &mut host);
        assert!(compositor.is_masking());
        assert!(compositor.is_bound());
        assert_eq!(tree.visibility(content), Some(Visibility::Invisible));

        assert_eq!(compositor.release(&mut tree, &mut host), Some(content));
        assert_eq!(tree.visibility(content), Some(prior));
    }
}

#[test]
fn missing_target_draws_nothing() {
    init_tracing();
    let mut tree = ViewTree::new();
    let mut host = FrameQueue::new(ManualClock::new(0));
    let mut compositor = MaskCompositor::new(&mut tree, None, SkeletonConfig::default());
    compositor.bind(&mut tree);
    compositor.on_attached(&mut host);

    let pixels = render_rgba(&compositor, 10, 10);
    assert!(pixels.iter().all(|&b| b == 0));
    assert_eq!(host.pending_count(), 0);
}

#[test]
fn zero_sized_overlay_is_a_no_op() {
    let mut tree = ViewTree::new();
    let root = tree.add_container(sized(0.0, 40.0));
    let leaf = tree.add_leaf(sized(0.0, 20.0));
    tree.add_child(root, leaf);
    tree.set_root(root);

    let mut host = FrameQueue::new(ManualClock::new(0));
    let compositor = laid_out(&mut tree, root, SkeletonConfig::default(), &mut host);

    assert!(compositor.static_mask().is_empty());
    assert_eq!(host.pending_count(), 0);
    let pixels = render_rgba(&compositor, 10, 10);
    assert!(pixels.iter().all(|&b| b == 0));
}

#[test]
fn hidden_overlay_draws_nothing() {
    let (mut tree, root) = two_rows();
    let mut host = FrameQueue::new(ManualClock::new(0));
    let mut compositor = laid_out(&mut tree, root, no_shimmer(), &mut host);

    compositor.set_visibility(&mut tree, Visibility::Invisible, &mut host);
    let pixels = render_rgba(&compositor, 50, 50);
    assert!(pixels.iter().all(|&b| b == 0));
}
