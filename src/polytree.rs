// Copyright 2025 Lars Brubaker
// License: MIT
//
// Hierarchical clipping result.
//
// Nodes live in one Vec and refer to each other by index. Top-level nodes
// (outer contours and every open path) are the tree's roots; holes are
// children of the outer contour they sit in, islands inside holes are
// children of the hole, and so on.

use crate::geom::{IntPoint, Path};

pub type NodeIdx = usize;

#[derive(Clone, Debug, Default)]
pub struct PolyNode {
    contour: Path,
    children: Vec<NodeIdx>,
    parent: Option<NodeIdx>,
    /// Position among its parent's children (or among the roots).
    index: usize,
    is_open: bool,
}

impl PolyNode {
    pub fn contour(&self) -> &[IntPoint] {
        &self.contour
    }

    pub fn children(&self) -> &[NodeIdx] {
        &self.children
    }

    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    pub fn parent(&self) -> Option<NodeIdx> {
        self.parent
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }
}

#[derive(Clone, Debug, Default)]
pub struct PolyTree {
    nodes: Vec<PolyNode>,
    roots: Vec<NodeIdx>,
}

impl PolyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
        self.roots.clear();
    }

    /// Number of nodes at every depth.
    pub fn total(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn roots(&self) -> &[NodeIdx] {
        &self.roots
    }

    pub fn node(&self, idx: NodeIdx) -> &PolyNode {
        &self.nodes[idx]
    }

    pub fn depth(&self, idx: NodeIdx) -> usize {
        let mut d = 0;
        let mut n = self.nodes[idx].parent;
        while let Some(p) = n {
            d += 1;
            n = self.nodes[p].parent;
        }
        d
    }

    /// Holes sit at odd depths.
    pub fn is_hole(&self, idx: NodeIdx) -> bool {
        self.depth(idx) % 2 == 1
    }

    pub fn first(&self) -> Option<NodeIdx> {
        self.roots.first().copied()
    }

    /// The node after `idx` in depth-first order.
    pub fn next(&self, idx: NodeIdx) -> Option<NodeIdx> {
        if let Some(&c) = self.nodes[idx].children.first() {
            return Some(c);
        }
        let mut n = idx;
        loop {
            let node = &self.nodes[n];
            let siblings = match node.parent {
                Some(p) => &self.nodes[p].children,
                None => &self.roots,
            };
            if let Some(&s) = siblings.get(node.index + 1) {
                return Some(s);
            }
            n = node.parent?;
        }
    }

    /// All nodes in depth-first order.
    pub fn iter(&self) -> impl Iterator<Item = NodeIdx> + '_ {
        std::iter::successors(self.first(), move |&n| self.next(n))
    }

    pub(crate) fn add_node(&mut self, contour: Path, is_open: bool) -> NodeIdx {
        self.nodes.push(PolyNode { contour, is_open, ..PolyNode::default() });
        self.nodes.len() - 1
    }

    /// Appends `child` under `parent`, or as a root when `parent` is None.
    pub(crate) fn attach(&mut self, parent: Option<NodeIdx>, child: NodeIdx) {
        let siblings = match parent {
            Some(p) => &mut self.nodes[p].children,
            None => &mut self.roots,
        };
        let index = siblings.len();
        siblings.push(child);
        let node = &mut self.nodes[child];
        node.parent = parent;
        node.index = index;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::path_from;

    fn sample() -> PolyTree {
        // outer0 { hole1 { island2 } }, outer3, open4
        let mut t = PolyTree::new();
        let outer = t.add_node(path_from(&[(0, 0), (100, 0), (100, 100), (0, 100)]), false);
        let hole = t.add_node(path_from(&[(10, 10), (10, 90), (90, 90), (90, 10)]), false);
        let island = t.add_node(path_from(&[(20, 20), (80, 20), (80, 80), (20, 80)]), false);
        let other = t.add_node(path_from(&[(200, 0), (300, 0), (300, 100)]), false);
        let open = t.add_node(path_from(&[(0, 200), (50, 200)]), true);
        t.attach(None, outer);
        t.attach(Some(outer), hole);
        t.attach(Some(hole), island);
        t.attach(None, other);
        t.attach(None, open);
        t
    }

    #[test]
    fn depth_first_iteration_visits_every_node() {
        let t = sample();
        assert_eq!(t.total(), 5);
        assert_eq!(t.iter().collect::<Vec<_>>(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn holes_alternate_with_depth() {
        let t = sample();
        assert!(!t.is_hole(0));
        assert!(t.is_hole(1));
        assert!(!t.is_hole(2));
        assert!(!t.is_hole(3));
        assert_eq!(t.node(2).parent(), Some(1));
        assert_eq!(t.node(3).index(), 1);
    }

    #[test]
    fn open_nodes_are_roots() {
        let t = sample();
        assert!(t.node(4).is_open());
        assert_eq!(t.node(4).parent(), None);
        assert_eq!(t.roots(), &[0, 3, 4]);
    }

    #[test]
    fn empty_tree() {
        let t = PolyTree::new();
        assert!(t.is_empty());
        assert_eq!(t.first(), None);
        assert_eq!(t.iter().count(), 0);
    }
}
