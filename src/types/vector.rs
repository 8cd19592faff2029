//! Fixed-length vectors of packed elements.
//!
//! The root is the chunks subtree itself; the length is part of the type.

use std::marker::PhantomData;

use crate::{count_to_depth, error::Result, zero_node, Node, TreeError};

use super::{items_per_chunk, ArrayBasicType, PackedElement};

/// `Vector[T, length]` descriptor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorBasicType<T> {
    length: usize,
    chunk_depth: usize,
    _element: PhantomData<T>,
}

impl<T: PackedElement> VectorBasicType<T> {
    /// Descriptor for vectors of exactly `length` elements.
    pub fn new(length: usize) -> Self {
        let chunks = length.div_ceil(items_per_chunk::<T>());
        Self {
            length,
            chunk_depth: count_to_depth(chunks),
            _element: PhantomData,
        }
    }
}

impl<T: PackedElement> ArrayBasicType for VectorBasicType<T> {
    type Element = T;

    fn depth(&self) -> usize {
        self.chunk_depth
    }

    fn chunk_depth(&self) -> usize {
        self.chunk_depth
    }

    fn limit(&self) -> usize {
        self.length
    }

    fn default_node(&self) -> Node {
        zero_node(self.chunk_depth)
    }

    fn length_of(&self, _node: &Node) -> Result<usize> {
        Ok(self.length)
    }

    fn chunks_node(&self, node: &Node) -> Result<Node> {
        Ok(node.clone())
    }

    fn set_chunks_node(&self, _node: &Node, chunks: Node, length: Option<usize>) -> Result<Node> {
        if let Some(length) = length {
            self.check_length(length)?;
        }
        Ok(chunks)
    }

    fn check_length(&self, len: usize) -> Result<()> {
        if len != self.length {
            return Err(TreeError::InvalidArgument(format!(
                "vector of length {} given {len} elements",
                self.length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_zero_subtree() {
        let ty = VectorBasicType::<u16>::new(40);
        assert_eq!(ty.max_chunk_count(), 3);
        assert_eq!(ty.depth(), 2);
        assert!(ty.default_node().is_zero(2));
        assert_eq!(ty.tree_to_value(&ty.default_node()).unwrap(), vec![0u16; 40]);
    }

    #[test]
    fn test_round_trip_value() {
        let ty = VectorBasicType::<u32>::new(9);
        let values: Vec<u32> = (10..19).collect();
        let node = ty.value_to_tree(&values).unwrap();
        assert_eq!(ty.tree_to_value(&node).unwrap(), values);
    }

    #[test]
    fn test_wrong_length_rejected() {
        let ty = VectorBasicType::<u8>::new(4);
        assert!(matches!(
            ty.value_to_tree(&[1, 2, 3]),
            Err(TreeError::InvalidArgument(_))
        ));
    }
}
