//! The layout manager
//!
//! A [`Manager`] owns the root of a dimer tree and the layers found in it.
//! [`Manager::reflow`] computes the screen rectangle of every reachable
//! node:
//!
//! ```text
//!   validate root and viewport
//!       │
//!       ▼
//!   snapshot printable areas, apply pending updates
//!       │
//!       ▼
//!   fit root to viewport ──► lay out stackers/chainers breadth-first
//!       │
//!       ▼
//!   collect layers (nested included), order by z, lay out each
//!       │
//!       ▼
//!   report dirty nodes: base, then layers by ascending z,
//!   then base nodes uncovered by moved or removed layers
//! ```

use crate::axis::{self, Axis};
use crate::config::LytConfig;
use crate::dim::Dim;
use crate::dimer::{same, Container, DimerRef};
use crate::error::{ContainerKind, LytError, Result};
use crate::geometry::Rect;
use crate::layer::{Layer, Layers};
use crate::traverse::{self, Walk};
use std::collections::HashSet;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

/// Hands dirty dimers to the reflow callback, each at most once.
struct DirtySink<'a> {
    callback: Option<&'a mut dyn FnMut(&DimerRef)>,
    seen: HashSet<*const ()>,
}

impl<'a> DirtySink<'a> {
    fn new(callback: Option<&'a mut dyn FnMut(&DimerRef)>) -> Self {
        Self {
            callback,
            seen: HashSet::new(),
        }
    }

    /// Reports `d` unless it was reported before.
    fn emit(&mut self, d: &DimerRef) -> bool {
        if !self.seen.insert(Rc::as_ptr(d).cast::<()>()) {
            return false;
        }
        if let Some(callback) = self.callback.as_mut() {
            callback(d);
        }
        true
    }
}

#[derive(Default)]
pub struct Manager {
    root: Option<DimerRef>,
    width: i32,
    height: i32,
    origin: (i32, i32),
    /// Screen area of the last successful reflow.
    laid: Option<Rect>,
    layers: Layers,
    config: LytConfig,
    /// The root takes the whole viewport whatever its sizing; set for the
    /// managers of layers, whose position fixes the root's rectangle.
    stretch_root: bool,
}

impl fmt::Debug for Manager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Manager")
            .field("has_root", &self.root.is_some())
            .field("viewport", &self.area())
            .field("laid", &self.laid)
            .field("layers", &self.layers.len())
            .finish()
    }
}

impl Manager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LytConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &LytConfig {
        &self.config
    }

    /// Installs the root; the next reflow lays it out from scratch.
    pub fn set_root(&mut self, root: DimerRef) {
        self.root = Some(root);
        self.laid = None;
    }

    pub fn root(&self) -> Option<&DimerRef> {
        self.root.as_ref()
    }

    pub fn set_viewport(&mut self, width: i32, height: i32) {
        self.width = width;
        self.height = height;
    }

    pub fn viewport(&self) -> (i32, i32) {
        (self.width, self.height)
    }

    /// Layers of the last reflow ordered by ascending z.
    pub fn layers(&self) -> &Layers {
        &self.layers
    }

    fn area(&self) -> Rect {
        Rect::new(self.origin.0, self.origin.1, self.width, self.height)
    }

    /// Lays out the root, everything it stacks and chains, and every layer.
    ///
    /// `dirty` receives each node whose printable area changed or which was
    /// mutated since the last reflow: base nodes first, then layer nodes by
    /// ascending z, then base nodes a moved or removed layer used to cover.
    ///
    /// An error leaves the tree partially laid out; the frame should be
    /// dropped.
    pub fn reflow(&mut self, dirty: Option<&mut dyn FnMut(&DimerRef)>) -> Result<()> {
        let _span = tracing::trace_span!("reflow", width = self.width, height = self.height)
            .entered();

        let base = self.lay_out()?;
        let layers = base.layers.all();
        let mut passes = Vec::with_capacity(layers.len());
        for layer in layers.iter() {
            passes.push(self.lay_out_layer(layer)?);
        }

        let mut sink = DirtySink::new(dirty);
        settle(&base, &mut sink);
        for (layer, pass) in layers.iter().zip(&passes) {
            settle(pass, &mut sink);
            if layer.pos().is_dirty() {
                sink.emit(layer.root());
            }
        }
        self.dirty_uncovered(&base, &layers, &mut sink);

        for layer in self.layers.missing_in(&layers).iter().chain(layers.iter()) {
            layer.pos_mut().settle();
        }
        self.layers = layers;
        Ok(())
    }

    fn validate(&mut self) -> Result<DimerRef> {
        let Some(root) = self.root.clone() else {
            tracing::debug!("reflow without root");
            return Err(LytError::NoRoot);
        };
        {
            let dim = root.dim().borrow();
            if self.width <= 0 {
                self.width = dim.width();
            }
            if self.height <= 0 {
                self.height = dim.height();
            }
        }
        if self.width <= 0 || self.height <= 0 {
            tracing::debug!(width = self.width, height = self.height, "undetermined viewport");
            return Err(LytError::Viewport {
                width: self.width,
                height: self.height,
            });
        }
        Ok(root)
    }

    /// Lays out the subtree of the root without its layers.
    fn lay_out(&mut self) -> Result<Walk> {
        let root = self.validate()?;
        let walk = Walk::all(&root);
        for d in walk.dimers() {
            d.dim().borrow_mut().prepare_layout();
        }
        self.fit_root(&root);

        for (index, visited) in walk.nodes.iter().enumerate() {
            if visited.layered {
                continue;
            }
            let Some(kind) = Container::of(visited.dimer.as_ref()).kind() else {
                continue;
            };
            let printable = visited.dimer.dim().borrow().printable();
            let inner = visited.dimer.gaps().unwrap_or_default().inset(printable);
            axis::layout(kind, inner, &walk.children(index))?;
        }

        self.laid = Some(self.area());
        Ok(walk)
    }

    /// Fills, clips or centers the root in the viewport (a stretched root
    /// always takes the viewport). A root that is unchanged in an unchanged
    /// viewport is left as it is.
    fn fit_root(&self, root: &DimerRef) {
        let area = self.area();
        let mut dim = root.dim().borrow_mut();
        if self.laid == Some(area) && dim.is_settled() && !dim.is_dirty() && !dim.is_updated() {
            return;
        }
        for direction in [Axis::Horizontal, Axis::Vertical] {
            let (origin, avail) = direction.span(area);
            let mut along = dim.axis_mut(direction);
            *along.origin = origin;
            if self.stretch_root {
                along.set_exact(avail);
                continue;
            }
            if *along.size <= 0 && *along.fills <= 0 {
                *along.fills = 1;
            }
            axis::fit(&mut along, avail);
        }
    }

    fn lay_out_layer(&self, layer: &Layer) -> Result<Walk> {
        let rect = {
            let mut pos = layer.pos_mut();
            if pos.is_zero() {
                let (width, height) = self.config.default_layer_size(self.width, self.height);
                pos.place(Rect::new(
                    self.origin.0 + (self.width - width) / 2,
                    self.origin.1 + (self.height - height) / 2,
                    width,
                    height,
                ));
            }
            pos.rect()
        };
        let mut manager = layer.manager();
        manager.config = self.config;
        manager.stretch_root = true;
        manager.origin = (rect.x, rect.y);
        manager.set_viewport(rect.width, rect.height);
        manager.lay_out()
    }

    /// Reports base nodes under the old area of moved or removed layers.
    fn dirty_uncovered(&self, base: &Walk, layers: &Layers, sink: &mut DirtySink<'_>) {
        let mut bounds = Rect::ZERO;
        for layer in self.layers.missing_in(layers) {
            let pos = layer.pos();
            bounds = bounds.union(&pos.rect());
            if let Some(from) = pos.moved_from() {
                bounds = bounds.union(&from);
            }
        }
        for layer in layers.iter() {
            if let Some(from) = layer.pos().moved_from() {
                bounds = bounds.union(&from);
            }
        }
        if bounds.is_empty() {
            return;
        }

        let mut uncovered = 0;
        for d in base.dimers() {
            let covered = d.dim().borrow().screen().intersects(&bounds);
            if covered && sink.emit(d) {
                uncovered += 1;
            }
        }
        tracing::debug!(?bounds, uncovered, "dirtied nodes under moved layers");
    }

    /// Whether a reflow would change anything: the viewport changed, a node
    /// is dirty or has a pending update, the set of layers changed, or a
    /// layer moved.
    pub fn is_dirty(&self) -> bool {
        let Some(root) = &self.root else {
            return false;
        };
        if self.laid != Some(self.area()) {
            return true;
        }
        let walk = Walk::all(root);
        if has_pending(&walk) {
            return true;
        }
        let layers = walk.layers.all();
        if !layers.same_set(&self.layers) {
            return true;
        }
        for layer in layers.iter() {
            if layer.pos().is_dirty() || has_pending(&Walk::all(layer.root())) {
                return true;
            }
        }
        false
    }

    /// Checks the outcome of the last reflow: roots fill their viewport,
    /// stacked children share the stacker's width and add up to its height,
    /// chained children share the chainer's height and add up to its width,
    /// and no axis has margins together with clipping or filling.
    ///
    /// False before the first successful reflow.
    pub fn has_consistent_layout(&self) -> bool {
        let (Some(root), Some(area)) = (&self.root, self.laid) else {
            return false;
        };
        is_consistent(root, area)
            && self
                .layers
                .iter()
                .all(|l| is_consistent(l.root(), l.pos().rect()))
    }

    /// Path of containers from the root down to the parent of `d`; layers
    /// are searched first and a path found there starts at the layer's
    /// root. Empty if `d` is a root or not in the tree.
    pub fn locate(&self, d: &DimerRef) -> Result<Vec<DimerRef>> {
        let root = self.root.as_ref().ok_or(LytError::NoRoot)?;
        for layer in self.layers.iter_top_down() {
            let walk = Walk::all(layer.root());
            if let Some(index) = walk.position(d) {
                return Ok(walk.ancestors(index));
            }
        }
        let walk = Walk::all(root);
        Ok(walk
            .position(d)
            .map(|index| walk.ancestors(index))
            .unwrap_or_default())
    }

    /// Nodes enclosing `(x, y)` from the topmost layer covering the point
    /// (or the root) down to the innermost one. Empty outside the root.
    pub fn locate_at(&self, x: i32, y: i32) -> Result<Vec<DimerRef>> {
        let root = self.root.as_ref().ok_or(LytError::NoRoot)?;
        let start = match self.layers.encloses(x, y) {
            Some(layer) => Rc::clone(layer.root()),
            None => Rc::clone(root),
        };
        if !start.dim().borrow().contains(x, y) {
            return Ok(Vec::new());
        }

        let mut path = vec![start];
        loop {
            let Some(last) = path.last() else { break };
            if last.layered().is_some() {
                break;
            }
            let next = Container::of(last.as_ref())
                .children()
                .into_iter()
                .find(|c| c.dim().borrow().contains(x, y));
            match next {
                Some(child) => path.push(child),
                None => break,
            }
        }
        Ok(path)
    }

    /// Whether `d` is `within` or below it; `within` defaults to the root.
    /// Layers are not searched, see [`Layers::containing`].
    pub fn has(&self, d: &DimerRef, within: Option<&DimerRef>) -> bool {
        let Some(start) = within.or(self.root.as_ref()) else {
            return false;
        };
        let mut found = false;
        traverse::walk(start, |n| {
            if same(n, d) {
                found = true;
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        found
    }

    /// Visits `start` (default: the root) and its subtree breadth-first
    /// until `visit` breaks; returns the layers met on the way.
    pub fn for_dimer(
        &self,
        start: Option<&DimerRef>,
        visit: impl FnMut(&DimerRef) -> ControlFlow<()>,
    ) -> Result<Layers> {
        let start = match start {
            Some(d) => d,
            None => self.root.as_ref().ok_or(LytError::NoRoot)?,
        };
        Ok(traverse::walk(start, visit).layers)
    }
}

/// Finalizes every walked node and reports the dirty ones.
fn settle(walk: &Walk, sink: &mut DirtySink<'_>) {
    for d in walk.dimers() {
        let dirty = {
            let mut dim = d.dim().borrow_mut();
            let dirty = dim.finalize_layout();
            dim.clean_up();
            dirty
        };
        if dirty {
            sink.emit(d);
        }
    }
}

fn has_pending(walk: &Walk) -> bool {
    walk.dimers().any(|d| {
        let dim = d.dim().borrow();
        dim.is_dirty() || dim.is_updated()
    })
}

fn is_consistent(root: &DimerRef, area: Rect) -> bool {
    {
        let dim = root.dim().borrow();
        if dim.laid_out(Axis::Horizontal) != area.width
            || dim.laid_out(Axis::Vertical) != area.height
        {
            return false;
        }
    }
    let walk = Walk::all(root);
    walk.nodes.iter().enumerate().all(|(index, visited)| {
        let dim = visited.dimer.dim().borrow();
        if !has_valid_axes(&dim) {
            return false;
        }
        if visited.layered {
            return true;
        }
        match Container::of(visited.dimer.as_ref()).kind() {
            Some(kind) => {
                let inner = visited
                    .dimer
                    .gaps()
                    .unwrap_or_default()
                    .inset(dim.printable());
                children_fit(kind, inner, &walk.children(index))
            }
            None => true,
        }
    })
}

fn has_valid_axes(dim: &Dim) -> bool {
    [Axis::Horizontal, Axis::Vertical].into_iter().all(|direction| {
        let (before, after) = dim.margins_in(direction);
        let margined = before != 0 || after != 0;
        let clip = dim.clip_in(direction);
        dim.is_dimensioned(direction)
            && before >= 0
            && after >= 0
            && clip >= 0
            && !(margined && (clip > 0 || dim.fills(direction) > 0))
    })
}

fn children_fit(kind: ContainerKind, inner: Rect, children: &[DimerRef]) -> bool {
    if children.is_empty() {
        return true;
    }
    if inner.is_empty() {
        return children.iter().all(|c| c.dim().borrow().is_off_screen());
    }
    let primary = kind.axis();
    let cross = primary.cross();
    let (_, space) = primary.span(inner);
    let (_, cross_space) = cross.span(inner);

    let mut total: i64 = 0;
    for child in children {
        let dim = child.dim().borrow();
        if dim.is_off_screen() {
            continue;
        }
        if dim.laid_out(cross) != cross_space {
            return false;
        }
        total += i64::from(dim.laid_out(primary));
    }
    total == i64::from(space)
}
