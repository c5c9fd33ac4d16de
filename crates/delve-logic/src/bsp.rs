//! Binary space partitioning of the map rectangle.
//!
//! The tree lives in an arena (`Vec<PartitionNode>`) addressed by [`NodeId`];
//! node 0 is the root. Traversals use explicit stacks, so very deep trees
//! from small `min_leaf` values cannot overflow the call stack.
//!
//! # Split rule
//!
//! At each unsplit node the orientation starts as a coin flip and is then
//! forced toward the long axis once the aspect ratio reaches
//! [`SPLIT_ASPECT_RATIO`]. With `max = extent - min_leaf` along the chosen
//! axis, a node with `max <= min_leaf` stays a leaf; otherwise it is cut at
//! `uniform_int(min_leaf, min(max_leaf, max))`.

use crate::error::GenError;
use crate::rect::Rect;
use crate::rng::RandomSource;

/// Aspect ratio at which the split orientation stops being a coin flip.
pub const SPLIT_ASPECT_RATIO: f64 = 1.25;

/// Index of a node inside a [`PartitionTree`].
pub type NodeId = usize;

/// One region of the partition.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionNode {
    pub rect: Rect,
    /// `(left, right)` after a split. Left is the top or left half.
    pub children: Option<(NodeId, NodeId)>,
    /// Room carved in this leaf, if any.
    pub room: Option<Rect>,
}

impl PartitionNode {
    fn new(rect: Rect) -> Self {
        Self {
            rect,
            children: None,
            room: None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    pub fn has_room(&self) -> bool {
        self.room.is_some()
    }
}

/// Full binary tree of map regions.
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionTree {
    nodes: Vec<PartitionNode>,
}

impl PartitionTree {
    pub const ROOT: NodeId = 0;

    /// A single-leaf tree covering `root`.
    pub fn new(root: Rect) -> Self {
        Self {
            nodes: vec![PartitionNode::new(root)],
        }
    }

    /// Build a tree over `root`, splitting until no leaf can be cut further.
    pub fn build(
        root: Rect,
        min_leaf: i32,
        max_leaf: i32,
        rng: &mut RandomSource,
    ) -> Result<Self, GenError> {
        let mut tree = Self::new(root);
        tree.split_all(Self::ROOT, min_leaf, max_leaf, rng)?;
        Ok(tree)
    }

    pub fn node(&self, id: NodeId) -> &PartitionNode {
        &self.nodes[id]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut PartitionNode {
        &mut self.nodes[id]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[PartitionNode] {
        &self.nodes
    }

    /// Split `id` and its descendants, in pre-order.
    pub fn split_all(
        &mut self,
        id: NodeId,
        min_leaf: i32,
        max_leaf: i32,
        rng: &mut RandomSource,
    ) -> Result<(), GenError> {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if self.split_node(current, min_leaf, max_leaf, rng)? {
                if let Some((left, right)) = self.nodes[current].children {
                    // left is popped first, so its whole subtree goes before right
                    stack.push(right);
                    stack.push(left);
                }
            }
        }
        Ok(())
    }

    /// Split a single leaf. Returns `Ok(false)` when the node is already
    /// split or too small along the chosen axis.
    pub fn split_node(
        &mut self,
        id: NodeId,
        min_leaf: i32,
        max_leaf: i32,
        rng: &mut RandomSource,
    ) -> Result<bool, GenError> {
        if !self.nodes[id].is_leaf() {
            return Ok(false);
        }
        let rect = self.nodes[id].rect;

        let split_h = choose_orientation(rect, rng);

        let extent = if split_h { rect.h } else { rect.w };
        let max = extent - min_leaf;
        if max <= min_leaf {
            log::trace!("Leaf {:?} too small to split (max {})", rect, max);
            return Ok(false);
        }

        let split = rng.uniform_int(min_leaf, max_leaf.min(max))?;
        let (a, b) = if split_h {
            rect.split_horizontal(split)
        } else {
            rect.split_vertical(split)
        };

        let left = self.nodes.len();
        self.nodes.push(PartitionNode::new(a));
        self.nodes.push(PartitionNode::new(b));
        self.nodes[id].children = Some((left, left + 1));
        Ok(true)
    }

    /// Leaf ids in pre-order (left before right).
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .into_iter()
            .filter(|&id| self.nodes[id].is_leaf())
            .collect()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_leaf()).count()
    }

    /// All node ids, parent before children, left subtree before right.
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some((left, right)) = self.nodes[id].children {
                stack.push(right);
                stack.push(left);
            }
        }
        order
    }

    /// All node ids, children before parent, left subtree before right.
    pub fn postorder(&self) -> Vec<NodeId> {
        // Reverse of a node-right-left pre-order.
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![Self::ROOT];
        while let Some(id) = stack.pop() {
            order.push(id);
            if let Some((left, right)) = self.nodes[id].children {
                stack.push(left);
                stack.push(right);
            }
        }
        order.reverse();
        order
    }

    /// Per node: does its subtree hold at least one room?
    pub fn subtree_has_room(&self) -> Vec<bool> {
        let mut has = vec![false; self.nodes.len()];
        for id in self.postorder() {
            has[id] = match self.nodes[id].children {
                Some((l, r)) => has[l] || has[r],
                None => self.nodes[id].has_room(),
            };
        }
        has
    }

    /// Rooms in leaf pre-order.
    pub fn rooms(&self) -> Vec<Rect> {
        self.leaves()
            .into_iter()
            .filter_map(|id| self.nodes[id].room)
            .collect()
    }

    /// Deepest leaf depth (root = 0).
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(Self::ROOT, 0usize)];
        while let Some((id, d)) = stack.pop() {
            deepest = deepest.max(d);
            if let Some((l, r)) = self.nodes[id].children {
                stack.push((l, d + 1));
                stack.push((r, d + 1));
            }
        }
        deepest
    }
}

/// `true` cuts along the height (top/bottom halves), `false` along the width.
fn choose_orientation(rect: Rect, rng: &mut RandomSource) -> bool {
    let mut split_h = rng.next_bool();
    let (w, h) = (f64::from(rect.w), f64::from(rect.h));
    if w > h && w / h >= SPLIT_ASPECT_RATIO {
        split_h = false;
    } else if h > w && h / w >= SPLIT_ASPECT_RATIO {
        split_h = true;
    }
    split_h
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(w: i32, h: i32, min_leaf: i32, max_leaf: i32, seed: u32) -> PartitionTree {
        let mut rng = RandomSource::new(seed);
        PartitionTree::build(Rect::new(0, 0, w, h), min_leaf, max_leaf, &mut rng).unwrap()
    }

    #[test]
    fn small_root_stays_single_leaf() {
        let tree = build(6, 6, 4, 4, 1);
        assert_eq!(tree.len(), 1);
        assert!(tree.node(PartitionTree::ROOT).is_leaf());
    }

    #[test]
    fn wide_root_is_cut_vertically() {
        // 20/12 >= 1.25 forces a cut along the width
        for seed in 0..20 {
            let tree = build(20, 12, 5, 8, seed);
            let (l, r) = tree.node(PartitionTree::ROOT).children.expect("root should split");
            assert_eq!(tree.node(l).rect.h, 12);
            assert_eq!(tree.node(r).rect.h, 12);
            assert_eq!(tree.node(l).rect.w + tree.node(r).rect.w, 20);
            assert!((5..=8).contains(&tree.node(l).rect.w));
        }
    }

    #[test]
    fn tall_root_is_cut_horizontally() {
        let tree = build(12, 20, 5, 8, 3);
        let (l, r) = tree.node(PartitionTree::ROOT).children.unwrap();
        assert_eq!(tree.node(l).rect.w, 12);
        assert_eq!(tree.node(l).rect.h + tree.node(r).rect.h, 20);
    }

    #[test]
    fn orientation_uses_real_ratio() {
        // 5/4 is exactly the threshold; integer division would give 1.
        let mut rng = RandomSource::new(0);
        for _ in 0..50 {
            assert!(!choose_orientation(Rect::new(0, 0, 5, 4), &mut rng));
            assert!(choose_orientation(Rect::new(0, 0, 4, 5), &mut rng));
        }
    }

    #[test]
    fn tree_is_full_binary() {
        let tree = build(80, 50, 6, 14, 11);
        for node in tree.nodes() {
            if let Some((l, r)) = node.children {
                assert_ne!(l, r);
                assert!(l < tree.len() && r < tree.len());
            }
        }
        // full binary tree: n = 2 * leaves - 1
        assert_eq!(tree.len(), 2 * tree.leaf_count() - 1);
    }

    #[test]
    fn leaves_tile_the_root() {
        let tree = build(64, 48, 8, 20, 5);
        let area: i32 = tree.leaves().iter().map(|&id| tree.node(id).rect.area()).sum();
        assert_eq!(area, 64 * 48);
    }

    #[test]
    fn leaves_respect_min_leaf() {
        let min_leaf = 6;
        let tree = build(100, 70, min_leaf, 12, 8);
        for node in tree.nodes() {
            if let Some((l, r)) = node.children {
                let (a, b) = (tree.node(l).rect, tree.node(r).rect);
                if a.w == node.rect.w {
                    assert!(a.h >= min_leaf && b.h >= min_leaf);
                } else {
                    assert!(a.w >= min_leaf && b.w >= min_leaf);
                }
            }
        }
    }

    #[test]
    fn split_node_is_idempotent() {
        let mut rng = RandomSource::new(4);
        let mut tree = PartitionTree::new(Rect::new(0, 0, 40, 40));
        assert!(tree.split_node(PartitionTree::ROOT, 5, 10, &mut rng).unwrap());
        let before = tree.clone();
        assert!(!tree.split_node(PartitionTree::ROOT, 5, 10, &mut rng).unwrap());
        assert_eq!(tree, before);
    }

    #[test]
    fn traversal_orders() {
        let tree = build(60, 60, 6, 12, 2);
        let pre = tree.preorder();
        let post = tree.postorder();
        assert_eq!(pre[0], PartitionTree::ROOT);
        assert_eq!(*post.last().unwrap(), PartitionTree::ROOT);
        assert_eq!(pre.len(), tree.len());
        assert_eq!(post.len(), tree.len());
        // every child appears after its parent in pre-order, before it in post-order
        fn pos(order: &[NodeId], id: NodeId) -> usize {
            order.iter().position(|&n| n == id).unwrap()
        }
        for (id, node) in tree.nodes().iter().enumerate() {
            if let Some((l, r)) = node.children {
                assert!(pos(&pre, l) > pos(&pre, id));
                assert!(pos(&pre, l) < pos(&pre, r));
                assert!(pos(&post, l) < pos(&post, r));
                assert!(pos(&post, r) < pos(&post, id));
            }
        }
    }
}
