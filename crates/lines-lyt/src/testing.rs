//! Test doubles for building dimer trees
//!
//! [`Node`] plays any role a component can play: leaf, stacker, chainer or
//! both, with optional gaps and an optional layer.

use crate::dim::Dim;
use crate::dimer::{same, Chainer, ChildVisitor, Dimer, DimerRef, Layered, Stacker};
use crate::geometry::Edges;
use crate::layer::Layer;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arrangement {
    Leaf,
    Stack,
    Chain,
    /// Offers both capabilities; laid out as a stack.
    Both,
}

pub struct Node {
    dim: RefCell<Dim>,
    arrangement: Arrangement,
    children: RefCell<Vec<DimerRef>>,
    gaps: Cell<Option<Edges>>,
    layer: RefCell<Option<Rc<Layer>>>,
}

impl Node {
    pub fn new(
        dim: Dim,
        arrangement: Arrangement,
        children: impl IntoIterator<Item = DimerRef>,
    ) -> Rc<Self> {
        Rc::new(Self {
            dim: RefCell::new(dim),
            arrangement,
            children: RefCell::new(children.into_iter().collect()),
            gaps: Cell::new(None),
            layer: RefCell::new(None),
        })
    }

    pub fn leaf(dim: Dim) -> Rc<Self> {
        Self::new(dim, Arrangement::Leaf, Vec::new())
    }

    pub fn stack(dim: Dim, children: impl IntoIterator<Item = DimerRef>) -> Rc<Self> {
        Self::new(dim, Arrangement::Stack, children)
    }

    pub fn chain(dim: Dim, children: impl IntoIterator<Item = DimerRef>) -> Rc<Self> {
        Self::new(dim, Arrangement::Chain, children)
    }

    pub fn both(dim: Dim, children: impl IntoIterator<Item = DimerRef>) -> Rc<Self> {
        Self::new(dim, Arrangement::Both, children)
    }

    pub fn arrangement(&self) -> Arrangement {
        self.arrangement
    }

    pub fn push(&self, child: DimerRef) {
        self.children.borrow_mut().push(child);
    }

    /// Removes `child`; false if it wasn't a child.
    pub fn remove(&self, child: &DimerRef) -> bool {
        let mut children = self.children.borrow_mut();
        let before = children.len();
        children.retain(|c| !same(c, child));
        children.len() != before
    }

    pub fn child(&self, index: usize) -> Option<DimerRef> {
        self.children.borrow().get(index).cloned()
    }

    pub fn set_gaps(&self, gaps: Option<Edges>) {
        self.gaps.set(gaps);
    }

    /// Opens (`Some`) or closes (`None`) the node's layer.
    pub fn set_layer(&self, layer: Option<Rc<Layer>>) {
        *self.layer.borrow_mut() = layer;
    }

    fn visit_children(&self, visit: &mut ChildVisitor<'_>) {
        let children = self.children.borrow().clone();
        for child in &children {
            if visit(child).is_break() {
                break;
            }
        }
    }
}

impl Dimer for Node {
    fn dim(&self) -> &RefCell<Dim> {
        &self.dim
    }

    fn stacker(&self) -> Option<&dyn Stacker> {
        matches!(self.arrangement, Arrangement::Stack | Arrangement::Both)
            .then_some(self as &dyn Stacker)
    }

    fn chainer(&self) -> Option<&dyn Chainer> {
        matches!(self.arrangement, Arrangement::Chain | Arrangement::Both)
            .then_some(self as &dyn Chainer)
    }

    fn layered(&self) -> Option<&dyn Layered> {
        self.layer
            .borrow()
            .is_some()
            .then_some(self as &dyn Layered)
    }

    fn gaps(&self) -> Option<Edges> {
        self.gaps.get()
    }
}

impl Stacker for Node {
    fn for_stacked(&self, visit: &mut ChildVisitor<'_>) {
        self.visit_children(visit);
    }
}

impl Chainer for Node {
    fn for_chained(&self, visit: &mut ChildVisitor<'_>) {
        self.visit_children(visit);
    }
}

impl Layered for Node {
    fn layer(&self) -> Rc<Layer> {
        let layer = self.layer.borrow();
        Rc::clone(layer.as_ref().expect("layered() is only offered with a layer"))
    }
}

/// Type-erases a node into the handle the engine works with.
pub fn dimer<T: Dimer + 'static>(node: &Rc<T>) -> DimerRef {
    Rc::clone(node) as DimerRef
}
