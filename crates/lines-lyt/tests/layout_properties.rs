#![cfg(feature = "test-utils")]

use lines_lyt::proptest_strategies::*;
use lines_lyt::testing::{dimer, Node};
use lines_lyt::*;
use proptest::prelude::*;
use std::ops::ControlFlow;
use std::rc::Rc;

fn reflowed(shape: &Shape, width: i32, height: i32) -> (Manager, DimerRef) {
    let root = shape.build();
    let mut manager = Manager::new();
    manager.set_root(Rc::clone(&root));
    manager.set_viewport(width, height);
    manager
        .reflow(None)
        .expect("generated trees are fully dimensioned");
    (manager, root)
}

/// What a renderer sees of a node.
fn placement(dim: &Dim) -> (Rect, Rect, (i32, i32), Edges) {
    (dim.printable(), dim.screen(), dim.clip(), dim.margin())
}

fn all_dims(manager: &Manager) -> Vec<Dim> {
    let mut dims = Vec::new();
    manager
        .for_dimer(None, |d| {
            dims.push(d.dim().borrow().clone());
            ControlFlow::Continue(())
        })
        .expect("root is set");
    dims
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_reflow_is_consistent(
        shape in arb_shape(),
        (width, height) in arb_viewport(),
    ) {
        let (manager, _) = reflowed(&shape, width, height);
        prop_assert!(manager.has_consistent_layout());
        prop_assert!(!manager.is_dirty());
    }

    #[test]
    fn prop_margins_never_meet_clip_or_fill(
        shape in arb_shape(),
        (width, height) in arb_viewport(),
    ) {
        let (manager, _) = reflowed(&shape, width, height);
        for dim in all_dims(&manager) {
            let mrg = dim.margin();
            let (clip_w, clip_h) = dim.clip();
            if mrg.left != 0 || mrg.right != 0 {
                prop_assert_eq!(clip_w, 0);
                prop_assert!(!dim.is_filling_width());
            }
            if mrg.top != 0 || mrg.bottom != 0 {
                prop_assert_eq!(clip_h, 0);
                prop_assert!(!dim.is_filling_height());
            }
        }
    }

    #[test]
    fn prop_visible_nodes_stay_inside_root(
        shape in arb_shape(),
        (width, height) in arb_viewport(),
    ) {
        let (manager, _) = reflowed(&shape, width, height);
        let screen = Rect::new(0, 0, width, height);
        for dim in all_dims(&manager) {
            let printable = dim.printable();
            if !printable.is_empty() {
                prop_assert_eq!(screen.intersection(&printable), printable);
            }
        }
    }

    #[test]
    fn prop_reflow_is_idempotent(
        shape in arb_shape(),
        (width, height) in arb_viewport(),
    ) {
        let (mut manager, _) = reflowed(&shape, width, height);
        let placements = |m: &Manager| all_dims(m).iter().map(placement).collect::<Vec<_>>();
        let before = placements(&manager);
        let mut dirty = 0;
        manager.reflow(Some(&mut |_: &DimerRef| dirty += 1)).unwrap();
        prop_assert_eq!(dirty, 0);
        prop_assert_eq!(placements(&manager), before);
    }

    #[test]
    fn prop_update_roundtrip_restores_layout(
        count in 2usize..6,
        pick in 0usize..6,
        delta in 1i32..4,
        height in 20i32..60,
    ) {
        let nodes: Vec<Rc<Node>> = (0..count).map(|_| Node::leaf(Dim::filling(1, 1))).collect();
        let root = Node::stack(Dim::filling(1, 1), nodes.iter().map(dimer));
        let mut manager = Manager::new();
        manager.set_root(dimer(&root));
        manager.set_viewport(40, height);
        manager.reflow(None).unwrap();
        let heights = |nodes: &[Rc<Node>]| -> Vec<i32> {
            nodes.iter().map(|n| n.dim().borrow().printable().height).collect()
        };
        let before = heights(&nodes);

        let target = &nodes[pick % count];
        target.dim().borrow_mut().update_height(delta);
        manager.reflow(None).unwrap();
        prop_assert!(manager.has_consistent_layout());
        target.dim().borrow_mut().update_height(-delta);
        manager.reflow(None).unwrap();

        prop_assert_eq!(heights(&nodes), before);
    }

    #[test]
    fn prop_deferred_resizes_keep_layout_consistent(
        shape in arb_shape(),
        (width, height) in arb_viewport(),
        resizes in arb_resizes(),
    ) {
        let (mut manager, _) = reflowed(&shape, width, height);
        let mut nodes = Vec::new();
        manager
            .for_dimer(None, |d| {
                nodes.push(Rc::clone(d));
                ControlFlow::Continue(())
            })
            .unwrap();

        for resize in &resizes {
            let node = &nodes[resize.node % nodes.len()];
            resize.apply(&mut node.dim().borrow_mut());
        }
        manager.reflow(None).unwrap();
        prop_assert!(manager.has_consistent_layout());
        for dim in all_dims(&manager) {
            prop_assert!(!dim.is_updated());
        }

        manager.reflow(None).unwrap();
        prop_assert!(manager.has_consistent_layout());
    }

    #[test]
    fn prop_layers_lay_out_consistently(
        base in arb_shape(),
        overlays in prop::collection::vec(arb_layer_shape(), 1..4),
        (width, height) in arb_viewport(),
        (to_x, to_y) in (0i32..100, 0i32..40),
    ) {
        let layers: Vec<_> = overlays.iter().map(LayerShape::build).collect();
        let openers: Vec<Rc<Node>> = layers
            .iter()
            .map(|layer| {
                let opener = Node::leaf(Dim::filling(1, 1));
                opener.set_layer(Some(Rc::clone(layer)));
                opener
            })
            .collect();
        let root = Node::stack(
            Dim::filling(1, 1),
            std::iter::once(base.build()).chain(openers.iter().map(dimer)),
        );
        let mut manager = Manager::new();
        manager.set_root(dimer(&root));
        manager.set_viewport(width, height);
        manager.reflow(None).unwrap();

        prop_assert_eq!(manager.layers().len(), layers.len());
        prop_assert!(manager.has_consistent_layout());
        for layer in &layers {
            let rect = layer.pos().rect();
            prop_assert_eq!(layer.root().dim().borrow().printable(), rect);
        }
        let z: Vec<u32> = manager.layers().iter().map(|l| l.z()).collect();
        prop_assert!(z.windows(2).all(|w| w[0] <= w[1]));

        let mut dirty = 0;
        manager.reflow(Some(&mut |_: &DimerRef| dirty += 1)).unwrap();
        prop_assert_eq!(dirty, 0);

        layers[0].move_to(to_x, to_y);
        manager.reflow(None).unwrap();
        prop_assert!(manager.has_consistent_layout());
        prop_assert!(!manager.is_dirty());
        prop_assert_eq!(layers[0].pos().moved_from(), None);
    }
}
