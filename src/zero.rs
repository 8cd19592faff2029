//! Canonical zero subtrees.
//!
//! `zero_node(0)` is the all-zero leaf and `zero_node(d)` is a branch of two
//! `zero_node(d - 1)`. Exactly one instance per depth is ever built, so
//! "is this region empty" is an O(1) pointer comparison.

use parking_lot::RwLock;

use crate::{HashValue, Node};

static ZERO_NODES: RwLock<Vec<Node>> = parking_lot::const_rwlock(Vec::new());

/// The canonical all-zero subtree of `depth`, built on first use.
pub fn zero_node(depth: usize) -> Node {
    if let Some(node) = ZERO_NODES.read().get(depth) {
        return node.clone();
    }

    let mut nodes = ZERO_NODES.write();
    // Another writer may have extended the table between the two locks.
    if nodes.is_empty() {
        nodes.push(Node::leaf(HashValue::ZERO));
    }
    while nodes.len() <= depth {
        let child = nodes[nodes.len() - 1].clone();
        nodes.push(Node::branch(child.clone(), child));
    }
    nodes[depth].clone()
}
