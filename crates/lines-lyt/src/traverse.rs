//! Breadth-first traversal of a dimer subtree
//!
//! The same walk serves layout (containers in discovery order, parents
//! before children), path lookup, membership tests and overlay collection.
//! A [`Layered`](crate::Layered) node is visited and its layer collected,
//! but its own children are not: they belong to the layer.

use crate::dimer::{same, Container, DimerRef};
use crate::layer::Layers;
use std::collections::VecDeque;
use std::ops::ControlFlow;
use std::rc::Rc;

/// A node reached by a [`Walk`].
pub(crate) struct Visited {
    pub dimer: DimerRef,
    pub parent: Option<usize>,
    /// Indices of the node's children in [`Walk::nodes`].
    pub children: Vec<usize>,
    pub layered: bool,
}

pub(crate) struct Walk {
    pub nodes: Vec<Visited>,
    pub layers: Layers,
}

impl Walk {
    /// Walks the whole subtree of `start`.
    pub fn all(start: &DimerRef) -> Self {
        walk(start, |_| ControlFlow::Continue(()))
    }

    pub fn children(&self, index: usize) -> Vec<DimerRef> {
        self.nodes[index]
            .children
            .iter()
            .map(|&i| Rc::clone(&self.nodes[i].dimer))
            .collect()
    }

    pub fn position(&self, d: &DimerRef) -> Option<usize> {
        self.nodes.iter().position(|v| same(&v.dimer, d))
    }

    /// Ancestors of the node at `index`, outermost first.
    pub fn ancestors(&self, index: usize) -> Vec<DimerRef> {
        let mut path = Vec::new();
        let mut parent = self.nodes[index].parent;
        while let Some(p) = parent {
            path.push(Rc::clone(&self.nodes[p].dimer));
            parent = self.nodes[p].parent;
        }
        path.reverse();
        path
    }

    pub fn dimers(&self) -> impl Iterator<Item = &DimerRef> + '_ {
        self.nodes.iter().map(|v| &v.dimer)
    }
}

/// Visits `start` and its descendants breadth-first until `visit` breaks.
pub(crate) fn walk(
    start: &DimerRef,
    mut visit: impl FnMut(&DimerRef) -> ControlFlow<()>,
) -> Walk {
    let mut nodes: Vec<Visited> = Vec::new();
    let mut layers = Layers::default();
    let mut queue = VecDeque::from([(Rc::clone(start), None::<usize>)]);

    while let Some((dimer, parent)) = queue.pop_front() {
        let index = nodes.len();
        if let Some(p) = parent {
            nodes[p].children.push(index);
        }
        let layer = dimer.layered().map(|l| l.layer());
        let layered = layer.is_some();
        nodes.push(Visited {
            dimer: Rc::clone(&dimer),
            parent,
            children: Vec::new(),
            layered,
        });
        if visit(&dimer).is_break() {
            break;
        }
        if let Some(layer) = layer {
            layers.push(layer);
            continue;
        }
        for child in Container::of(dimer.as_ref()).children() {
            queue.push_back((child, Some(index)));
        }
    }

    Walk { nodes, layers }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dim::Dim;
    use crate::layer::{Layer, LayerPos};
    use crate::testing::{dimer, Node};

    #[test]
    fn visits_breadth_first() {
        let a = Node::leaf(Dim::fixed(1, 1));
        let b = Node::leaf(Dim::fixed(1, 1));
        let inner = Node::chain(Dim::filling(1, 1), [dimer(&a)]);
        let root = Node::stack(Dim::filling(1, 1), [dimer(&inner), dimer(&b)]);

        let walk = Walk::all(&dimer(&root));
        let order: Vec<DimerRef> = walk.dimers().cloned().collect();
        assert_eq!(order.len(), 4);
        assert!(same(&order[0], &dimer(&root)));
        assert!(same(&order[1], &dimer(&inner)));
        assert!(same(&order[2], &dimer(&b)));
        assert!(same(&order[3], &dimer(&a)));
        assert_eq!(walk.nodes[0].children, vec![1, 2]);
    }

    #[test]
    fn ancestors_lead_from_root_to_parent() {
        let a = Node::leaf(Dim::fixed(1, 1));
        let inner = Node::chain(Dim::filling(1, 1), [dimer(&a)]);
        let root = Node::stack(Dim::filling(1, 1), [dimer(&inner)]);

        let walk = Walk::all(&dimer(&root));
        let index = walk.position(&dimer(&a)).unwrap();
        let path = walk.ancestors(index);
        assert_eq!(path.len(), 2);
        assert!(same(&path[0], &dimer(&root)));
        assert!(same(&path[1], &dimer(&inner)));
    }

    #[test]
    fn break_stops_the_walk() {
        let a = Node::leaf(Dim::fixed(1, 1));
        let b = Node::leaf(Dim::fixed(1, 1));
        let root = Node::stack(Dim::filling(1, 1), [dimer(&a), dimer(&b)]);

        let mut seen = 0;
        let walk = walk(&dimer(&root), |_| {
            seen += 1;
            if seen == 2 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        assert_eq!(seen, 2);
        assert_eq!(walk.nodes.len(), 2);
    }

    #[test]
    fn layered_node_is_not_descended() {
        let hidden = Node::leaf(Dim::fixed(1, 1));
        let menu = Node::leaf(Dim::fixed(5, 3));
        let button = Node::stack(Dim::fixed(4, 1), [dimer(&hidden)]);
        button.set_layer(Some(Layer::new(dimer(&menu), LayerPos::default())));
        let root = Node::stack(Dim::filling(1, 1), [dimer(&button)]);

        let walk = Walk::all(&dimer(&root));
        assert_eq!(walk.nodes.len(), 2);
        assert!(walk.nodes[1].layered);
        assert_eq!(walk.layers.len(), 1);
        assert!(walk.layers.has_root(&dimer(&menu)));
    }
}
