//! Type descriptors for packed basic arrays.
//!
//! A descriptor tells the tree layer how a value is laid out: how many
//! elements share a chunk, how deep the chunk leaves sit, and where the
//! length (if any) is mixed in. Views and the `value_to_tree` family work
//! only through [`ArrayBasicType`].

mod basic;
mod list;
mod vector;

pub use basic::{items_per_chunk, PackedElement, BYTES_PER_CHUNK};
pub use list::ListBasicType;
pub use vector::VectorBasicType;

pub(crate) use basic::{chunk_bytes, get_packed, set_packed, unpack_chunks};

use crate::{
    error::Result, get_nodes_at_depth, subtree_fill_to_contents, ArrayBasicViewDU, HashValue, Node,
};

use basic::pack_chunks;

/// Layout of an array of packed basic elements.
pub trait ArrayBasicType: Clone + std::fmt::Debug {
    /// Element type.
    type Element: PackedElement;

    /// Depth of the chunk leaves below the type's root node.
    fn depth(&self) -> usize;

    /// Depth of the chunk leaves below the chunks subtree.
    fn chunk_depth(&self) -> usize;

    /// Maximum (list) or exact (vector) element count.
    fn limit(&self) -> usize;

    /// Root node of the default value.
    fn default_node(&self) -> Node;

    /// Logical length stored in (or implied by) `node`.
    fn length_of(&self, node: &Node) -> Result<usize>;

    /// The subtree holding the chunks.
    fn chunks_node(&self, node: &Node) -> Result<Node>;

    /// Rebind `chunks` (and `length`, where the type stores one) into `node`.
    fn set_chunks_node(&self, node: &Node, chunks: Node, length: Option<usize>) -> Result<Node>;

    /// Reject values whose length cannot be represented.
    fn check_length(&self, len: usize) -> Result<()>;

    /// Elements per chunk.
    fn items_per_chunk(&self) -> usize {
        items_per_chunk::<Self::Element>()
    }

    /// Chunks needed for `limit` elements.
    fn max_chunk_count(&self) -> usize {
        self.limit().div_ceil(self.items_per_chunk())
    }

    /// Build the tree for `values`.
    fn value_to_tree(&self, values: &[Self::Element]) -> Result<Node> {
        self.check_length(values.len())?;
        let chunks = subtree_fill_to_contents(&pack_chunks(values), self.chunk_depth())?;
        self.set_chunks_node(&self.default_node(), chunks, Some(values.len()))
    }

    /// Read every element back out of `node`.
    fn tree_to_value(&self, node: &Node) -> Result<Vec<Self::Element>> {
        let len = self.length_of(node)?;
        let chunk_count = len.div_ceil(self.items_per_chunk());
        let chunks = get_nodes_at_depth(node, self.depth(), 0, chunk_count)?;
        unpack_chunks(&chunks, len)
    }

    /// Hash-tree-root of `values`.
    fn hash_tree_root(&self, values: &[Self::Element]) -> Result<HashValue> {
        Ok(self.value_to_tree(values)?.root())
    }

    /// A working view over `node`.
    fn get_view_du(&self, node: Node) -> Result<ArrayBasicViewDU<Self>>
    where
        Self: Sized,
    {
        ArrayBasicViewDU::new(self.clone(), node)
    }

    /// A working view over the default value.
    fn default_view_du(&self) -> Result<ArrayBasicViewDU<Self>>
    where
        Self: Sized,
    {
        self.get_view_du(self.default_node())
    }
}
