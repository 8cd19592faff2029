//! Variable-length lists of packed elements.
//!
//! Tree shape: the root is a branch whose left child is the chunks subtree
//! and whose right child is a leaf holding the length as a little-endian
//! integer (the SSZ length mix-in).

use std::marker::PhantomData;

use crate::{count_to_depth, error::Result, zero_node, Node, TreeError};

use super::{chunk_bytes, items_per_chunk, ArrayBasicType, PackedElement};

/// `List[T, limit]` descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ListBasicType<T> {
    limit: usize,
    chunk_depth: usize,
    _element: PhantomData<T>,
}

impl<T: PackedElement> ListBasicType<T> {
    /// Descriptor for lists of at most `limit` elements.
    pub fn new(limit: usize) -> Self {
        let max_chunks = limit.div_ceil(items_per_chunk::<T>());
        Self {
            limit,
            chunk_depth: count_to_depth(max_chunks),
            _element: PhantomData,
        }
    }

    fn length_node(length: usize) -> Node {
        if length == 0 {
            return zero_node(0);
        }
        let mut bytes = [0u8; 32];
        bytes[..8].copy_from_slice(&(length as u64).to_le_bytes());
        Node::leaf_from_bytes(&bytes)
    }

    fn split_root<'a>(&self, node: &'a Node) -> Result<(&'a Node, &'a Node)> {
        match node.as_branch() {
            Some(branch) => Ok((branch.left(), branch.right())),
            None => Err(TreeError::OutOfBounds { depth: 1, index: 0 }),
        }
    }
}

impl<T: PackedElement> ArrayBasicType for ListBasicType<T> {
    type Element = T;

    fn depth(&self) -> usize {
        self.chunk_depth + 1
    }

    fn chunk_depth(&self) -> usize {
        self.chunk_depth
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn default_node(&self) -> Node {
        Node::branch(zero_node(self.chunk_depth), Self::length_node(0))
    }

    fn length_of(&self, node: &Node) -> Result<usize> {
        let (_, length) = self.split_root(node)?;
        let bytes = chunk_bytes(length)?;
        let mut low = [0u8; 8];
        low.copy_from_slice(&bytes[..8]);
        let length = u64::from_le_bytes(low);
        if bytes[8..].iter().any(|&b| b != 0) || length > self.limit as u64 {
            return Err(TreeError::InvalidArgument(format!(
                "stored length exceeds list limit {}",
                self.limit
            )));
        }
        Ok(length as usize)
    }

    fn chunks_node(&self, node: &Node) -> Result<Node> {
        let (chunks, _) = self.split_root(node)?;
        Ok(chunks.clone())
    }

    fn set_chunks_node(&self, node: &Node, chunks: Node, length: Option<usize>) -> Result<Node> {
        let length = match length {
            Some(length) => {
                self.check_length(length)?;
                Self::length_node(length)
            }
            None => self.split_root(node)?.1.clone(),
        };
        Ok(Node::branch(chunks, length))
    }

    fn check_length(&self, len: usize) -> Result<()> {
        if len > self.limit {
            return Err(TreeError::LimitExceeded { limit: self.limit });
        }
        Ok(())
    }
}
