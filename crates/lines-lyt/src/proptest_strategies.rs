//! Proptest strategies for layout property tests
//!
//! Generates dimer trees of mixed sizings, layers, deferred resizes and
//! viewports to reflow them in.

use crate::axis::Axis;
use crate::dim::Dim;
use crate::dimer::DimerRef;
use crate::geometry::{Edges, Rect};
use crate::layer::{Layer, LayerPos};
use crate::testing::{dimer, Node};
use proptest::prelude::*;
use std::rc::Rc;

/// How a generated node sizes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sizing {
    Fixed(i32, i32),
    FillingWidth(i32, i32),
    FillingHeight(i32, i32),
    Filling(i32, i32),
}

impl Sizing {
    pub fn dim(self) -> Dim {
        match self {
            Sizing::Fixed(w, h) => Dim::fixed(w, h),
            Sizing::FillingWidth(fw, h) => Dim::filling_width(fw, h),
            Sizing::FillingHeight(w, fh) => Dim::filling_height(w, fh),
            Sizing::Filling(fw, fh) => Dim::filling(fw, fh),
        }
    }
}

/// Generated tree shape.
#[derive(Debug, Clone)]
pub enum Shape {
    Leaf(Sizing),
    Stack(Sizing, Option<Edges>, Vec<Shape>),
    Chain(Sizing, Option<Edges>, Vec<Shape>),
}

impl Shape {
    /// Builds the tree; returns its root.
    pub fn build(&self) -> DimerRef {
        match self {
            Shape::Leaf(sizing) => dimer(&Node::leaf(sizing.dim())),
            Shape::Stack(sizing, gaps, children) => {
                let node = Node::stack(sizing.dim(), children.iter().map(Shape::build));
                node.set_gaps(*gaps);
                dimer(&node)
            }
            Shape::Chain(sizing, gaps, children) => {
                let node = Node::chain(sizing.dim(), children.iter().map(Shape::build));
                node.set_gaps(*gaps);
                dimer(&node)
            }
        }
    }
}

/// Sizes from a single cell up to wider than most viewports
pub fn arb_sizing() -> impl Strategy<Value = Sizing> {
    let extent = || 1i32..=60;
    prop_oneof![
        3 => (extent(), extent()).prop_map(|(w, h)| Sizing::Fixed(w, h)),
        1 => (extent(), extent()).prop_map(|(fw, h)| Sizing::FillingWidth(fw, h)),
        1 => (extent(), extent()).prop_map(|(w, fh)| Sizing::FillingHeight(w, fh)),
        2 => (1i32..=10, 1i32..=10).prop_map(|(fw, fh)| Sizing::Filling(fw, fh)),
    ]
}

/// Mostly no gaps, sometimes a thin frame
pub fn arb_gaps() -> impl Strategy<Value = Option<Edges>> {
    prop_oneof![
        3 => Just(None),
        1 => (0i32..3, 0i32..3, 0i32..3, 0i32..3)
            .prop_map(|(t, r, b, l)| Some(Edges::new(t, r, b, l))),
    ]
}

/// Trees up to four levels deep
pub fn arb_shape() -> impl Strategy<Value = Shape> {
    arb_sizing().prop_map(Shape::Leaf).prop_recursive(4, 32, 5, |inner| {
        let children = || prop::collection::vec(inner.clone(), 0..5);
        prop_oneof![
            (arb_sizing(), arb_gaps(), children())
                .prop_map(|(sizing, gaps, c)| Shape::Stack(sizing, gaps, c)),
            (arb_sizing(), arb_gaps(), children())
                .prop_map(|(sizing, gaps, c)| Shape::Chain(sizing, gaps, c)),
        ]
    })
}

/// Terminal sizes: tiny (1-5) and normal (6-120 by 6-50)
pub fn arb_viewport() -> impl Strategy<Value = (i32, i32)> {
    prop_oneof![
        1 => (1i32..=5, 1i32..=5),
        4 => (6i32..=120, 6i32..=50),
    ]
}

/// A layer over a generated tree; `pos: None` leaves it to default placement.
#[derive(Debug, Clone)]
pub struct LayerShape {
    pub shape: Shape,
    pub pos: Option<Rect>,
    pub z: u32,
}

impl LayerShape {
    pub fn build(&self) -> Rc<Layer> {
        let pos = self.pos.map_or_else(LayerPos::default, |r| {
            LayerPos::new(r.x, r.y, r.width, r.height)
        });
        Layer::new(self.shape.build(), pos.at_z(self.z))
    }
}

/// Layers placed anywhere around a normal terminal, a few unpositioned
pub fn arb_layer_shape() -> impl Strategy<Value = LayerShape> {
    let pos = prop::option::weighted(
        0.8,
        (0i32..100, 0i32..40, 1i32..40, 1i32..20).prop_map(|(x, y, w, h)| Rect::new(x, y, w, h)),
    );
    (arb_shape(), pos, 0u32..4).prop_map(|(shape, pos, z)| LayerShape { shape, pos, z })
}

/// A deferred size change of the `node`-th node (modulo the node count).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub node: usize,
    pub axis: Axis,
    pub delta: i32,
}

impl Resize {
    pub fn apply(&self, dim: &mut Dim) {
        match self.axis {
            Axis::Horizontal => dim.update_width(self.delta),
            Axis::Vertical => dim.update_height(self.delta),
        }
    }
}

/// One to three grow or shrink requests
pub fn arb_resizes() -> impl Strategy<Value = Vec<Resize>> {
    let axis = prop_oneof![Just(Axis::Horizontal), Just(Axis::Vertical)];
    prop::collection::vec(
        (0usize..64, axis, -6i32..=6).prop_map(|(node, axis, delta)| Resize { node, axis, delta }),
        1..4,
    )
}
