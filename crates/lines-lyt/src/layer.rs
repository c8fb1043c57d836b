//! Floating overlay layers
//!
//! A [`Layered`](crate::Layered) node contributes a [`Layer`]: a root dimer
//! laid out in its own rectangle above the base tree, anchored by a
//! [`LayerPos`]. Layers found during a reflow, including layers nested
//! inside other layers, are kept as [`Layers`] ordered by ascending `z`.
//!
//! ```text
//!  NEW ──set_z──▶ NEW/z        NEW ──move_to──▶ MOVED(moved_from = prev)
//!  NEW ──reflow──▶ LIVE        LIVE ──move_to──▶ MOVED
//!  MOVED ──reflow──▶ LIVE (moved_from cleared, covered base nodes dirtied)
//! ```

use crate::dimer::{same, DimerRef};
use crate::geometry::Rect;
use crate::manager::Manager;
use crate::traverse::Walk;
use std::cell::{RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Absolute position of a layer on screen.
///
/// A zero-sized position is unset: the next reflow centers a default-sized
/// layer in the viewport and writes the result back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayerPos {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    z: u32,
    moved_from: Option<Rect>,
    dirty: bool,
}

impl LayerPos {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            ..Self::default()
        }
    }

    pub fn at_z(mut self, z: u32) -> Self {
        self.z = z;
        self
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn z(&self) -> u32 {
        self.z
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn is_zero(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Where the layer was shown before it was moved, until the next
    /// reflow has dirtied what it uncovered.
    pub fn moved_from(&self) -> Option<Rect> {
        self.moved_from
    }

    /// Moved, resized or re-ordered since the last reflow.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn move_to(&mut self, x: i32, y: i32) {
        if (x, y) == (self.x, self.y) {
            return;
        }
        self.remember_rect();
        self.x = x;
        self.y = y;
        self.dirty = true;
    }

    pub fn resize(&mut self, width: i32, height: i32) {
        if width <= 0 || height <= 0 || (width, height) == (self.width, self.height) {
            return;
        }
        self.remember_rect();
        self.width = width;
        self.height = height;
        self.dirty = true;
    }

    pub fn set_z(&mut self, z: u32) {
        if z == self.z {
            return;
        }
        self.z = z;
        self.dirty = true;
    }

    /// Keeps the first on-screen rectangle of a series of moves.
    fn remember_rect(&mut self) {
        if self.moved_from.is_none() && !self.is_zero() {
            self.moved_from = Some(self.rect());
        }
    }

    /// Default placement written by the reflow.
    pub(crate) fn place(&mut self, rect: Rect) {
        self.x = rect.x;
        self.y = rect.y;
        self.width = rect.width;
        self.height = rect.height;
    }

    pub(crate) fn settle(&mut self) {
        self.dirty = false;
        self.moved_from = None;
    }
}

/// A root dimer shown above the base tree at a [`LayerPos`].
pub struct Layer {
    root: DimerRef,
    pos: RefCell<LayerPos>,
    manager: RefCell<Manager>,
}

impl Layer {
    pub fn new(root: DimerRef, pos: LayerPos) -> Rc<Self> {
        let mut manager = Manager::new();
        manager.set_root(Rc::clone(&root));
        Rc::new(Self {
            root,
            pos: RefCell::new(pos),
            manager: RefCell::new(manager),
        })
    }

    pub fn root(&self) -> &DimerRef {
        &self.root
    }

    pub fn pos(&self) -> LayerPos {
        *self.pos.borrow()
    }

    pub fn z(&self) -> u32 {
        self.pos.borrow().z()
    }

    pub fn move_to(&self, x: i32, y: i32) {
        self.pos.borrow_mut().move_to(x, y);
    }

    pub fn resize(&self, width: i32, height: i32) {
        self.pos.borrow_mut().resize(width, height);
    }

    pub fn set_z(&self, z: u32) {
        self.pos.borrow_mut().set_z(z);
    }

    pub(crate) fn pos_mut(&self) -> RefMut<'_, LayerPos> {
        self.pos.borrow_mut()
    }

    /// The manager laying out the layer's subtree inside its rectangle.
    pub(crate) fn manager(&self) -> RefMut<'_, Manager> {
        self.manager.borrow_mut()
    }
}

impl fmt::Debug for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Layer")
            .field("root", &Rc::as_ptr(&self.root))
            .field("pos", &*self.pos.borrow())
            .finish()
    }
}

/// Layers ordered by ascending `z`; equal `z` keeps discovery order.
#[derive(Debug, Clone, Default)]
pub struct Layers(Vec<Rc<Layer>>);

impl Layers {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Bottom-up, the order layers are drawn in.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Rc<Layer>> + '_ {
        self.0.iter()
    }

    /// Top-down, the order layers are hit-tested in.
    pub fn iter_top_down(&self) -> impl Iterator<Item = &Rc<Layer>> + '_ {
        self.0.iter().rev()
    }

    pub fn contains(&self, layer: &Rc<Layer>) -> bool {
        self.0.iter().any(|l| Rc::ptr_eq(l, layer))
    }

    /// A layer with root `d` is part of the set.
    pub fn has_root(&self, d: &DimerRef) -> bool {
        self.0.iter().any(|l| same(l.root(), d))
    }

    /// The topmost layer whose root covers `(x, y)`.
    pub fn encloses(&self, x: i32, y: i32) -> Option<Rc<Layer>> {
        self.iter_top_down()
            .find(|l| l.root().dim().borrow().contains(x, y))
            .cloned()
    }

    /// The topmost layer whose subtree holds `d`.
    pub fn containing(&self, d: &DimerRef) -> Option<Rc<Layer>> {
        self.iter_top_down()
            .find(|l| Walk::all(l.root()).position(d).is_some())
            .cloned()
    }

    /// Current rectangles of all layers, bottom-up.
    pub fn rects(&self) -> Vec<Rect> {
        self.0.iter().map(|l| l.pos().rect()).collect()
    }

    /// Appends `layer` unless it is already present.
    pub(crate) fn push(&mut self, layer: Rc<Layer>) {
        if !self.contains(&layer) {
            self.0.push(layer);
        }
    }

    pub(crate) fn sort_by_z(&mut self) {
        self.0.sort_by_key(|l| l.z());
    }

    /// Same layers regardless of order.
    pub(crate) fn same_set(&self, other: &Layers) -> bool {
        self.len() == other.len() && self.0.iter().all(|l| other.contains(l))
    }

    /// Layers of `self` missing in `other`.
    pub(crate) fn missing_in(&self, other: &Layers) -> Vec<Rc<Layer>> {
        self.0
            .iter()
            .filter(|l| !other.contains(l))
            .cloned()
            .collect()
    }

    /// These layers plus every layer nested inside them, ordered by `z`.
    pub(crate) fn all(&self) -> Layers {
        let mut all = Layers::default();
        let mut index = 0;
        for layer in &self.0 {
            all.push(Rc::clone(layer));
        }
        while index < all.len() {
            let nested = Walk::all(all.0[index].root()).layers;
            for layer in nested.0 {
                all.push(layer);
            }
            index += 1;
        }
        all.sort_by_z();
        all
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim;
    use crate::testing::{dimer, Node};

    fn layer(z: u32) -> Rc<Layer> {
        let root = Node::leaf(Dim::fixed(2, 2));
        Layer::new(dimer(&root), LayerPos::new(0, 0, 2, 2).at_z(z))
    }

    #[test]
    fn move_to_records_first_rectangle() {
        let mut pos = LayerPos::new(25, 8, 30, 8);
        pos.move_to(0, 0);
        pos.move_to(3, 3);
        assert_eq!(pos.moved_from(), Some(Rect::new(25, 8, 30, 8)));
        assert!(pos.is_dirty());
        assert_eq!((pos.x(), pos.y()), (3, 3));

        pos.settle();
        assert_eq!(pos.moved_from(), None);
        assert!(!pos.is_dirty());
    }

    #[test]
    fn moving_an_unset_position_records_nothing() {
        let mut pos = LayerPos::default();
        pos.move_to(4, 4);
        assert_eq!(pos.moved_from(), None);
        assert!(pos.is_dirty());
    }

    #[test]
    fn set_z_only_dirties_on_change() {
        let mut pos = LayerPos::new(0, 0, 1, 1).at_z(2);
        pos.set_z(2);
        assert!(!pos.is_dirty());
        pos.set_z(5);
        assert!(pos.is_dirty());
        assert_eq!(pos.z(), 5);
    }

    #[test]
    fn layers_sort_stably_by_z() {
        let a = layer(3);
        let b = layer(1);
        let c = layer(3);
        let mut layers = Layers::default();
        layers.push(Rc::clone(&a));
        layers.push(Rc::clone(&b));
        layers.push(Rc::clone(&c));
        layers.push(Rc::clone(&a));
        layers.sort_by_z();

        let order: Vec<&Rc<Layer>> = layers.iter().collect();
        assert_eq!(order.len(), 3);
        assert!(Rc::ptr_eq(order[0], &b));
        assert!(Rc::ptr_eq(order[1], &a));
        assert!(Rc::ptr_eq(order[2], &c));
        assert!(Rc::ptr_eq(layers.iter_top_down().next().unwrap(), &c));
    }

    #[test]
    fn missing_layers_are_reported() {
        let a = layer(0);
        let b = layer(0);
        let mut before = Layers::default();
        before.push(Rc::clone(&a));
        before.push(Rc::clone(&b));
        let mut after = Layers::default();
        after.push(Rc::clone(&b));

        let removed = before.missing_in(&after);
        assert_eq!(removed.len(), 1);
        assert!(Rc::ptr_eq(&removed[0], &a));
        assert!(!before.same_set(&after));
    }

    #[test]
    fn all_collects_nested_layers() {
        let inner_root = Node::leaf(Dim::fixed(2, 2));
        let inner = Layer::new(dimer(&inner_root), LayerPos::new(1, 1, 2, 2).at_z(1));
        let opener = Node::leaf(Dim::fixed(1, 1));
        opener.set_layer(Some(Rc::clone(&inner)));
        let outer_root = Node::stack(Dim::filling(1, 1), [dimer(&opener)]);
        let outer = Layer::new(dimer(&outer_root), LayerPos::new(0, 0, 5, 5).at_z(2));

        let mut layers = Layers::default();
        layers.push(Rc::clone(&outer));
        let all = layers.all();
        assert_eq!(all.len(), 2);
        assert!(Rc::ptr_eq(all.iter().next().unwrap(), &inner));
        assert!(all.containing(&dimer(&opener)).is_some());
    }
}
