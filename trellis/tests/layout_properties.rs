//! Integration tests for the layout protocol and the containers.
//!
//! Each test builds a small tree through the public API only, runs a layout
//! pass and checks the resulting geometry.

use trellis::panels::{advanced_stack, canvas, dock};
use trellis::{
    AdvancedStackPanel, Anchor, DockSide, LayoutTree, Node, NodeId, Panel, Point, Rect, Size, StackPanel,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A tree with one container and fixed-size children.
struct Harness {
    tree: LayoutTree,
    container: NodeId,
    children: Vec<NodeId>,
}

impl Harness {
    fn new(panel: Panel, sizes: &[(f32, f32)]) -> Self {
        init_tracing();
        let mut tree = LayoutTree::new();
        let container = tree.create(Node::new(panel));
        let children = sizes
            .iter()
            .map(|(w, h)| {
                let child = tree.create(Node::leaf().fixed_size(*w, *h));
                tree.add_child(container, child).expect("attach child");
                child
            })
            .collect();
        Self {
            tree,
            container,
            children,
        }
    }

    fn layout(&mut self, bounds: Rect) {
        self.tree.layout(self.container, bounds).expect("layout");
    }

    fn bounds(&self, index: usize) -> Rect {
        self.tree.bounding_box(self.children[index]).expect("child exists")
    }
}

#[test]
fn measure_is_idempotent_until_invalidated() {
    let mut h = Harness::new(Panel::Stack(StackPanel::vertical()), &[(10.0, 10.0), (20.0, 20.0)]);
    let first = h.tree.measure(h.container, Size::new(100.0, 100.0)).unwrap();
    let second = h.tree.measure(h.container, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(first, second);

    h.tree.set_box(h.children[0], |b| b.fixed_height = 50.0).unwrap();
    assert!(!h.tree.is_measure_valid(h.container));
    let third = h.tree.measure(h.container, Size::new(100.0, 100.0)).unwrap();
    assert_eq!(third, Size::new(20.0, 70.0));
}

#[test]
fn stack_measures_heights_plus_spacing() {
    let mut h = Harness::new(
        Panel::Stack(StackPanel::vertical().spacing(5.0)),
        &[(10.0, 10.0), (10.0, 20.0), (10.0, 30.0)],
    );
    let size = h.tree.measure(h.container, Size::new(100.0, 200.0)).unwrap();
    assert_eq!(size.height, 70.0);
}

#[test]
fn dock_fill_is_bounds_minus_docked_extents() {
    let docked = [
        (DockSide::Left, 30.0, 5.0),
        (DockSide::Top, 5.0, 10.0),
        (DockSide::Right, 20.0, 5.0),
        (DockSide::Bottom, 5.0, 15.0),
        (DockSide::Left, 10.0, 5.0),
    ];
    let bounds = Rect::new(10.0, 10.0, 300.0, 200.0);
    let expected = Rect::new(10.0 + 40.0, 10.0 + 10.0, 300.0 - 60.0, 200.0 - 25.0);

    // Rotate the docked children through every starting position.
    for shift in 0..docked.len() {
        let mut order = docked.to_vec();
        order.rotate_left(shift);

        let mut sizes: Vec<(f32, f32)> = order.iter().map(|(_, w, h)| (*w, *h)).collect();
        sizes.push((0.0, 0.0));
        let mut h = Harness::new(Panel::Dock, &sizes);
        for (i, (side, _, _)) in order.iter().enumerate() {
            dock::set_dock(&mut h.tree, h.children[i], *side).unwrap();
        }
        h.layout(bounds);
        assert_eq!(h.bounds(order.len()), expected, "rotation {shift}");
    }
}

#[test]
fn canvas_places_auto_sized_child() {
    let mut h = Harness::new(Panel::Canvas, &[(50.0, 20.0)]);
    let child = h.children[0];
    canvas::set_anchor(&mut h.tree, child, Anchor::TOP_LEFT).unwrap();
    canvas::set_position(&mut h.tree, child, Point::new(10.0, 10.0)).unwrap();
    canvas::set_auto_size(&mut h.tree, child, true).unwrap();

    h.layout(Rect::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(h.tree.desired_size(child), Some(Size::new(50.0, 20.0)));
    assert_eq!(h.bounds(0), Rect::new(10.0, 10.0, 50.0, 20.0));
}

#[test]
fn advanced_stack_fill_gets_remainder() {
    let mut h = Harness::new(Panel::AdvancedStack(AdvancedStackPanel::vertical()), &[(10.0, 30.0)]);
    let fill = h.tree.create(Node::leaf());
    h.tree.add_child(h.container, fill).unwrap();
    advanced_stack::set_fill(&mut h.tree, fill, 1.0).unwrap();

    h.layout(Rect::new(0.0, 0.0, 10.0, 100.0));
    assert_eq!(h.tree.bounding_box(fill).unwrap().height, 70.0);
}

#[test]
fn layout_invisible_node_only_frees_its_own_space() {
    let sizes = [(10.0, 10.0), (10.0, 20.0), (10.0, 30.0)];
    let mut full = Harness::new(Panel::Stack(StackPanel::vertical().spacing(4.0)), &sizes);
    full.layout(Rect::new(0.0, 0.0, 100.0, 200.0));

    let mut h = Harness::new(Panel::Stack(StackPanel::vertical().spacing(4.0)), &sizes);
    h.layout(Rect::new(0.0, 0.0, 100.0, 200.0));
    h.tree.set_layout_visible(h.children[1], false).unwrap();
    h.layout(Rect::new(0.0, 0.0, 100.0, 200.0));

    assert_eq!(h.tree.desired_size(h.children[1]), Some(Size::ZERO));
    assert_eq!(h.bounds(1), Rect::ZERO);
    assert_eq!(h.bounds(0), full.bounds(0));

    // The third child moves up by exactly the hidden child's extent plus its spacing.
    let shift = full.bounds(1).height + 4.0;
    assert_eq!(h.bounds(2).y, full.bounds(2).y - shift);
    assert_eq!(h.bounds(2).size(), full.bounds(2).size());

    // Hit testing skips it as well.
    let probe = Point::new(5.0, full.bounds(1).y + 1.0);
    assert_eq!(full.tree.find_control(full.container, probe), Some(full.children[1]));
    assert_ne!(h.tree.find_control(h.container, probe), Some(h.children[1]));
}

#[test]
fn relayout_after_structure_change() {
    let mut h = Harness::new(Panel::Stack(StackPanel::horizontal()), &[(10.0, 10.0), (20.0, 10.0)]);
    h.layout(Rect::new(0.0, 0.0, 100.0, 10.0));
    assert_eq!(h.bounds(1).x, 10.0);

    h.tree.remove_child(h.container, h.children[0]).unwrap();
    h.layout(Rect::new(0.0, 0.0, 100.0, 10.0));
    assert_eq!(h.bounds(1).x, 0.0);

    h.tree.insert_child(h.container, 1, h.children[0]).unwrap();
    h.layout(Rect::new(0.0, 0.0, 100.0, 10.0));
    assert_eq!(h.bounds(0).x, 20.0);
}
