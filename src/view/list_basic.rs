//! List-only view operations: appending and truncation.

use tracing::debug;

use crate::{
    error::Result,
    get_node_at_depth, set_node_at_depth, tree_zero_after_index,
    types::{chunk_bytes, set_packed, ArrayBasicType, PackedElement},
    zero_node, ListBasicType, Node, TreeError,
};

use super::ArrayBasicViewDU;

/// Working view over a `List[T, limit]`.
pub type ListBasicViewDU<T> = ArrayBasicViewDU<ListBasicType<T>>;

impl<T: PackedElement> ArrayBasicViewDU<ListBasicType<T>> {
    /// Append `value`.
    ///
    /// The first element of a new chunk is written over a zero chunk rather
    /// than whatever the committed tree holds past the old length.
    pub fn push(&mut self, value: T) -> Result<()> {
        let limit = self.ty.limit();
        if self.length >= limit {
            return Err(TreeError::LimitExceeded { limit });
        }

        let index = self.length;
        let per_chunk = self.ty.items_per_chunk();
        let (chunk_index, slot) = (index / per_chunk, index % per_chunk);
        let base = if slot == 0 {
            zero_node(0)
        } else {
            self.chunk(chunk_index)?
        };
        let chunk = set_packed(&base, slot, value)?;

        self.nodes.insert(chunk_index, chunk);
        self.length += 1;
        self.dirty_length = true;
        Ok(())
    }

    /// A new view holding elements `0..=index`.
    ///
    /// Pending edits are committed first. Elements after `index` are zeroed,
    /// both within its chunk and in every later chunk, so the result hashes
    /// the same as a list built directly from the kept elements. Slicing at
    /// or past the last index returns an unchanged copy.
    pub fn slice_to(&mut self, index: usize) -> Result<Self> {
        self.commit()?;
        if index >= self.length.saturating_sub(1) {
            return Ok(self.clone());
        }

        let per_chunk = self.ty.items_per_chunk();
        let (chunk_index, slot) = (index / per_chunk, index % per_chunk);
        let depth = self.ty.chunk_depth();

        let chunks = self.ty.chunks_node(&self.root)?;
        let mut bytes = chunk_bytes(&get_node_at_depth(&chunks, depth, chunk_index)?)?;
        bytes[(slot + 1) * T::BYTE_LEN..].fill(0);
        let chunks = set_node_at_depth(&chunks, depth, chunk_index, Node::leaf_from_bytes(&bytes))?;
        let chunks = tree_zero_after_index(&chunks, depth, chunk_index)?;
        let root = self.ty.set_chunks_node(&self.root, chunks, Some(index + 1))?;

        debug!(target: "pmt::view", from = self.length, to = index + 1, "sliced list view");
        Self::new(self.ty, root)
    }
}
