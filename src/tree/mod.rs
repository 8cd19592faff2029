//! Persistent tree operations.
//!
//! This module provides the free functions that navigate and rebind immutable
//! [`Node`] trees, the bottom-up [`subtree_fill_to_contents`] builder, the
//! batched hash scheduler, and [`Tree`], a small owner of a root node that
//! swaps in the new root after each rebinding.
//!
//! # Cost Model
//!
//! | Operation | Cost |
//! |-----------|------|
//! | `get_node_at_depth` | O(D) |
//! | `get_nodes_at_depth(n)` | O(D + n) |
//! | `set_nodes_at_depth(k)` | O(k * D) new branches |
//! | `tree_zero_after_index` | O(D) new branches |
//! | `root` after a rebind | one digest per new branch |
//!
//! Where D is the tree depth.

mod build;
pub(crate) mod hash;
mod nav;

pub use build::{count_to_depth, subtree_fill_to_contents, subtree_fill_to_contents_with};
pub use hash::batch_hash_with;
pub use nav::{
    get_node, get_node_at_depth, get_nodes_at_depth, set_node, set_node_at_depth,
    set_nodes_at_depth, tree_zero_after_index,
};

use crate::{error::Result, proof::create_single_proof, Gindex, HashValue, Node, SingleProof};

/// Owner of a root node.
///
/// Rebinding operations replace the owned root with a new one; every earlier
/// root handed out by [`Tree::root_node`] stays valid and unchanged.
#[derive(Clone, Debug)]
pub struct Tree {
    root: Node,
}

impl Tree {
    /// Wrap an existing root node.
    pub fn new(root: Node) -> Self {
        Self { root }
    }

    /// The current root node.
    pub fn root_node(&self) -> &Node {
        &self.root
    }

    /// Replace the root node.
    pub fn set_root_node(&mut self, root: Node) {
        self.root = root;
    }

    /// Hash-tree-root of the current root node.
    pub fn root(&self) -> HashValue {
        self.root.root()
    }

    /// The node at a generalized index.
    pub fn get_node(&self, gindex: Gindex) -> Result<Node> {
        get_node(&self.root, gindex)
    }

    /// Replace the node at a generalized index.
    pub fn set_node(&mut self, gindex: Gindex, node: Node) -> Result<()> {
        self.root = set_node(&self.root, gindex, node)?;
        Ok(())
    }

    /// Root of the node at a generalized index.
    pub fn get_root(&self, gindex: Gindex) -> Result<HashValue> {
        Ok(self.get_node(gindex)?.root())
    }

    /// Store a leaf holding `value` at a generalized index.
    pub fn set_root(&mut self, gindex: Gindex, value: HashValue) -> Result<()> {
        self.set_node(gindex, Node::leaf(value))
    }

    /// `count` consecutive nodes at `depth`.
    pub fn get_nodes_at_depth(&self, depth: usize, start: usize, count: usize) -> Result<Vec<Node>> {
        get_nodes_at_depth(&self.root, depth, start, count)
    }

    /// Replace nodes at `depth`; `indices` must be strictly increasing.
    pub fn set_nodes_at_depth(&mut self, depth: usize, indices: &[usize], nodes: &[Node]) -> Result<()> {
        self.root = set_nodes_at_depth(&self.root, depth, indices, nodes)?;
        Ok(())
    }

    /// Zero every node at `depth` after `index`.
    pub fn zero_after_index(&mut self, depth: usize, index: usize) -> Result<()> {
        self.root = tree_zero_after_index(&self.root, depth, index)?;
        Ok(())
    }

    /// Merkle branch proving the node at `gindex` against [`Tree::root`].
    pub fn single_proof(&self, gindex: Gindex) -> Result<SingleProof> {
        create_single_proof(&self.root, gindex)
    }
}

impl From<Node> for Tree {
    fn from(root: Node) -> Self {
        Self::new(root)
    }
}
