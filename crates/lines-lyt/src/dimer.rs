//! Capabilities components expose to the layout engine
//!
//! Every node is a [`Dimer`]. A node arranging children vertically offers
//! [`Stacker`], one arranging them horizontally offers [`Chainer`], and one
//! contributing a floating overlay offers [`Layered`]. A node offering both
//! stacker and chainer is laid out as a stacker; a node offering neither is
//! a leaf.
//!
//! Components keep their [`Dim`] behind a `RefCell`: the engine borrows it
//! briefly while laying out and never holds on to a component after a pass.

use crate::dim::Dim;
use crate::error::ContainerKind;
use crate::geometry::Edges;
use crate::layer::Layer;
use std::cell::RefCell;
use std::ops::ControlFlow;
use std::rc::Rc;

/// Shared handle to a node of the layout tree.
pub type DimerRef = Rc<dyn Dimer>;

/// Callback receiving children in order; returning `Break` stops the
/// iteration.
pub type ChildVisitor<'a> = dyn FnMut(&DimerRef) -> ControlFlow<()> + 'a;

pub trait Dimer {
    fn dim(&self) -> &RefCell<Dim>;

    fn stacker(&self) -> Option<&dyn Stacker> {
        None
    }

    fn chainer(&self) -> Option<&dyn Chainer> {
        None
    }

    /// The overlay this node currently contributes, if any.
    fn layered(&self) -> Option<&dyn Layered> {
        None
    }

    /// Widths the node reserves inside its printable area for its own
    /// decoration; children are laid out in what remains.
    fn gaps(&self) -> Option<Edges> {
        None
    }
}

/// Arranges children top to bottom.
pub trait Stacker {
    fn for_stacked(&self, visit: &mut ChildVisitor<'_>);
}

/// Arranges children left to right.
pub trait Chainer {
    fn for_chained(&self, visit: &mut ChildVisitor<'_>);
}

/// Contributes a floating layer.
pub trait Layered {
    fn layer(&self) -> Rc<Layer>;
}

/// Compares node identity.
pub fn same(a: &DimerRef, b: &DimerRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// How a node arranges its children.
pub(crate) enum Container<'a> {
    Stack(&'a dyn Stacker),
    Chain(&'a dyn Chainer),
    Leaf,
}

impl<'a> Container<'a> {
    pub fn of(d: &'a dyn Dimer) -> Self {
        if let Some(s) = d.stacker() {
            return Self::Stack(s);
        }
        if let Some(c) = d.chainer() {
            return Self::Chain(c);
        }
        Self::Leaf
    }

    pub fn kind(&self) -> Option<ContainerKind> {
        match self {
            Self::Stack(_) => Some(ContainerKind::Stacker),
            Self::Chain(_) => Some(ContainerKind::Chainer),
            Self::Leaf => None,
        }
    }

    pub fn children(&self) -> Vec<DimerRef> {
        let mut children = Vec::new();
        let mut push = |d: &DimerRef| {
            children.push(Rc::clone(d));
            ControlFlow::Continue(())
        };
        match self {
            Self::Stack(s) => s.for_stacked(&mut push),
            Self::Chain(c) => c.for_chained(&mut push),
            Self::Leaf => {}
        }
        children
    }
}
