//! Views over packed arrays, shared by lists and vectors.

use std::collections::BTreeMap;

use tracing::debug;

use crate::{
    error::Result,
    get_node_at_depth, get_nodes_at_depth, set_nodes_at_depth,
    types::{get_packed, set_packed, unpack_chunks, ArrayBasicType},
    HashValue, Node, TreeError,
};

/// Working view over an array of packed basic elements.
///
/// Edits are buffered per chunk and never touch the committed root, which may
/// be shared with other trees and views. Cloning a view shares its committed
/// root and copies its pending edits.
#[derive(Clone, Debug)]
pub struct ArrayBasicViewDU<A: ArrayBasicType> {
    pub(super) ty: A,
    pub(super) root: Node,
    /// Edited chunks by chunk index. Ordered so commit can replay them ascending.
    pub(super) nodes: BTreeMap<usize, Node>,
    pub(super) length: usize,
    pub(super) dirty_length: bool,
}

impl<A: ArrayBasicType> ArrayBasicViewDU<A> {
    /// Wrap `root`, a tree of type `ty`.
    pub fn new(ty: A, root: Node) -> Result<Self> {
        let length = ty.length_of(&root)?;
        Ok(Self {
            ty,
            root,
            nodes: BTreeMap::new(),
            length,
            dirty_length: false,
        })
    }

    /// The type descriptor.
    pub fn ty(&self) -> &A {
        &self.ty
    }

    /// Logical length, including uncommitted pushes.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Whether there are edits not yet folded into the root.
    pub fn has_pending_changes(&self) -> bool {
        !self.nodes.is_empty() || self.dirty_length
    }

    /// Element at `index`.
    pub fn get(&self, index: usize) -> Result<A::Element> {
        self.check_index(index)?;
        let per_chunk = self.ty.items_per_chunk();
        let chunk = self.chunk(index / per_chunk)?;
        get_packed(&chunk, index % per_chunk)
    }

    /// Replace the element at `index`.
    pub fn set(&mut self, index: usize, value: A::Element) -> Result<()> {
        self.check_index(index)?;
        let per_chunk = self.ty.items_per_chunk();
        let chunk_index = index / per_chunk;
        let chunk = set_packed(&self.chunk(chunk_index)?, index % per_chunk, value)?;
        self.nodes.insert(chunk_index, chunk);
        Ok(())
    }

    /// Every element, pending edits included.
    pub fn get_all(&self) -> Result<Vec<A::Element>> {
        let chunk_count = self.length.div_ceil(self.ty.items_per_chunk());
        let mut chunks = get_nodes_at_depth(&self.root, self.ty.depth(), 0, chunk_count)?;
        for (&index, node) in self.nodes.range(..chunk_count) {
            chunks[index] = node.clone();
        }
        unpack_chunks(&chunks, self.length)
    }

    /// Fold pending edits into a new root.
    ///
    /// Without pending edits this is a no-op and the root stays the same node.
    pub fn commit(&mut self) -> Result<()> {
        if !self.has_pending_changes() {
            return Ok(());
        }

        let indices: Vec<usize> = self.nodes.keys().copied().collect();
        let chunks: Vec<Node> = self.nodes.values().cloned().collect();
        let mut root = set_nodes_at_depth(&self.root, self.ty.depth(), &indices, &chunks)?;
        if self.dirty_length {
            let chunks_node = self.ty.chunks_node(&root)?;
            root = self.ty.set_chunks_node(&root, chunks_node, Some(self.length))?;
        }

        debug!(
            target: "pmt::view",
            chunks = indices.len(),
            length = self.length,
            length_changed = self.dirty_length,
            "committed view"
        );
        self.root = root;
        self.nodes.clear();
        self.dirty_length = false;
        Ok(())
    }

    /// Commit and return the root node.
    pub fn node(&mut self) -> Result<Node> {
        self.commit()?;
        Ok(self.root.clone())
    }

    /// The last committed root, ignoring pending edits.
    pub fn committed_node(&self) -> &Node {
        &self.root
    }

    /// Commit and return the hash-tree-root.
    pub fn hash_tree_root(&mut self) -> Result<HashValue> {
        self.commit()?;
        Ok(self.root.root())
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.length {
            return Err(TreeError::IndexOutOfRange {
                index,
                length: self.length,
            });
        }
        Ok(())
    }

    /// Current content of a chunk: the pending edit if any, else the committed one.
    pub(super) fn chunk(&self, chunk_index: usize) -> Result<Node> {
        match self.nodes.get(&chunk_index) {
            Some(node) => Ok(node.clone()),
            None => get_node_at_depth(&self.root, self.ty.depth(), chunk_index),
        }
    }
}
