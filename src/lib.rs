//! # Persistent Merkle Tree
//!
//! Immutable, structurally shared binary Merkle trees for SSZ hash-tree-roots.
//!
//! Key features:
//!
//! - **Persistent nodes**: every rebinding returns a new root and shares all
//!   untouched subtrees with the old one; old roots stay valid forever
//! - **Memoized hashing**: each branch caches its root once and never hashes
//!   it again
//! - **Batched hashing**: uncached regions are hashed level by level, four
//!   independent pairs per engine call
//! - **Canonical zero subtrees**: one shared instance per depth, so empty
//!   regions are detected by identity
//! - **Working views**: [`ArrayBasicViewDU`] buffers element edits and commits
//!   them in one rebinding pass
//!
//! ## Addressing
//!
//! Nodes are addressed either by `(depth, index)`, where index `0` is the
//! leftmost node at that depth, or by generalized index ([`Gindex`]),
//! `2^depth + index`.
//!
//! ## Hash Function
//!
//! SHA-256 over the 64-byte concatenation of the two child roots, as SSZ
//! requires. Other engines plug in through [`Hasher`] and the `*_with`
//! entry points.
//!
//! ## Example
//!
//! ```
//! use persistent_merkle_tree::{ArrayBasicType, ListBasicType};
//!
//! let ty = ListBasicType::<u64>::new(10);
//! let mut view = ty.default_view_du().unwrap();
//! for v in 0..5 {
//!     view.push(v).unwrap();
//! }
//! view.commit().unwrap();
//!
//! let truncated = view.slice_to(2).unwrap();
//! assert_eq!(truncated.get_all().unwrap(), vec![0, 1, 2]);
//! assert_eq!(
//!     truncated.committed_node().root(),
//!     ty.hash_tree_root(&[0, 1, 2]).unwrap()
//! );
//! ```

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

mod error;
mod gindex;
mod hash;
mod node;
mod proof;
mod tree;
mod types;
mod view;
mod zero;

pub use error::{Result, TreeError};
pub use gindex::{Gindex, GindexPath, MAX_GINDEX_DEPTH};
pub use hash::{HashValue, Hasher, Sha256Hasher, BATCH_WIDTH};
pub use node::{BranchNode, LeafNode, Node, NodeKind};
pub use proof::{create_single_proof, SingleProof};
pub use tree::{
    batch_hash_with, count_to_depth, get_node, get_node_at_depth, get_nodes_at_depth, set_node,
    set_node_at_depth, set_nodes_at_depth, subtree_fill_to_contents,
    subtree_fill_to_contents_with, tree_zero_after_index, Tree,
};
pub use types::{
    items_per_chunk, ArrayBasicType, ListBasicType, PackedElement, VectorBasicType,
    BYTES_PER_CHUNK,
};
pub use view::{ArrayBasicViewDU, ListBasicViewDU};
pub use zero::zero_node;

/// Re-export alloy primitives for convenience
pub use alloy_primitives::B256;
