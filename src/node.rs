//! Tree node types.
//!
//! Two node variants:
//! - `Leaf`: a 32-byte chunk of data, stored as its [`HashValue`]
//! - `Branch`: two shared children plus a write-once cached root
//!
//! A [`Node`] is a cheap reference-counted handle. Nodes are never mutated
//! after construction, except for the branch root cache which is filled at
//! most once. Changing a subtree always means building new branches along the
//! path to the root, so any number of trees can share the same children.

use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::tree::hash::batch_hash_with;
use crate::{zero_node, HashValue, Hasher, Sha256Hasher};

/// Shared handle to an immutable tree node.
#[derive(Clone)]
pub struct Node(Arc<NodeKind>);

/// The two node variants.
pub enum NodeKind {
    /// Terminal 32-byte chunk
    Leaf(LeafNode),
    /// Internal node with two children
    Branch(BranchNode),
}

/// Leaf node holding one 32-byte chunk.
///
/// The chunk is its own root: `root(leaf) = leaf.hash`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct LeafNode {
    hash: HashValue,
}

impl LeafNode {
    /// The chunk stored in this leaf.
    pub const fn hash(&self) -> HashValue {
        self.hash
    }
}

/// Branch node.
///
/// Hash formula:
/// `root = hash(left.root || right.root)`
pub struct BranchNode {
    left: Node,
    right: Node,
    root: OnceLock<HashValue>,
}

impl BranchNode {
    /// Left child.
    pub fn left(&self) -> &Node {
        &self.left
    }

    /// Right child.
    pub fn right(&self) -> &Node {
        &self.right
    }

    /// The memoized root, if it has been computed.
    pub fn cached_root(&self) -> Option<HashValue> {
        self.root.get().copied()
    }

    /// Store a computed root. A second store is ignored; both writers computed
    /// the same value from the same immutable children.
    pub(crate) fn set_root(&self, root: HashValue) {
        let _ = self.root.set(root);
    }

    /// Return the cached root or compute it from the children directly.
    pub(crate) fn root_or_compute<H: Hasher>(&self, hasher: &H) -> HashValue {
        *self.root.get_or_init(|| {
            let left = self.left.root_with(hasher);
            let right = self.right.root_with(hasher);
            hasher.digest_pair(&left, &right)
        })
    }
}

impl Node {
    /// Create a leaf from a hash value.
    pub fn leaf(hash: HashValue) -> Self {
        Self(Arc::new(NodeKind::Leaf(LeafNode { hash })))
    }

    /// Create a leaf from 32 raw bytes.
    pub fn leaf_from_bytes(bytes: &[u8; 32]) -> Self {
        Self::leaf(HashValue::from_bytes(bytes))
    }

    /// Create a branch with an empty root cache.
    pub fn branch(left: Node, right: Node) -> Self {
        Self(Arc::new(NodeKind::Branch(BranchNode {
            left,
            right,
            root: OnceLock::new(),
        })))
    }

    /// The node variant.
    pub fn kind(&self) -> &NodeKind {
        &self.0
    }

    /// Check if this node is a leaf.
    pub fn is_leaf(&self) -> bool {
        matches!(*self.0, NodeKind::Leaf(_))
    }

    /// The branch payload, if this is a branch.
    pub fn as_branch(&self) -> Option<&BranchNode> {
        match &*self.0 {
            NodeKind::Branch(branch) => Some(branch),
            NodeKind::Leaf(_) => None,
        }
    }

    /// Left child of a branch.
    pub fn left(&self) -> Option<&Node> {
        self.as_branch().map(BranchNode::left)
    }

    /// Right child of a branch.
    pub fn right(&self) -> Option<&Node> {
        self.as_branch().map(BranchNode::right)
    }

    /// Identity comparison: true when both handles point at the same node.
    pub fn ptr_eq(a: &Node, b: &Node) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub(crate) fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// The root if already known, without hashing anything.
    pub fn cached_root(&self) -> Option<HashValue> {
        match &*self.0 {
            NodeKind::Leaf(leaf) => Some(leaf.hash),
            NodeKind::Branch(branch) => branch.cached_root(),
        }
    }

    /// Root of this node using SHA-256.
    pub fn root(&self) -> HashValue {
        self.root_with(&Sha256Hasher)
    }

    /// Root of this node using a custom hash engine.
    ///
    /// A missing branch root fills the whole dirty subtree through the batch
    /// scheduler, so every branch is hashed at most once over its lifetime.
    /// Cached roots are bound to the first engine that fills them.
    pub fn root_with<H: Hasher>(&self, hasher: &H) -> HashValue {
        match self.cached_root() {
            Some(root) => root,
            None => batch_hash_with(self, hasher),
        }
    }

    /// Root of this node as bytes.
    pub fn root_bytes(&self) -> [u8; 32] {
        self.root().to_bytes()
    }

    /// Fill every missing root below this node and return the root.
    pub fn batch_hash(&self) -> HashValue {
        batch_hash_with(self, &Sha256Hasher)
    }

    /// Check if this is the canonical zero subtree of `depth`.
    ///
    /// This is an identity check against [`zero_node`]; a tree of zeros built
    /// any other way is not recognized.
    pub fn is_zero(&self, depth: usize) -> bool {
        Node::ptr_eq(self, &zero_node(depth))
    }
}

impl From<LeafNode> for Node {
    fn from(leaf: LeafNode) -> Self {
        Node::leaf(leaf.hash)
    }
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &*self.0 {
            NodeKind::Leaf(leaf) => write!(f, "Leaf({})", leaf.hash),
            NodeKind::Branch(branch) => match branch.cached_root() {
                Some(root) => write!(f, "Branch({root})"),
                None => f.write_str("Branch(<dirty>)"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::testing::CountingHasher;

    fn leaf(byte: u8) -> Node {
        Node::leaf_from_bytes(&[byte; 32])
    }

    #[test]
    fn test_leaf_root_is_its_data() {
        let node = leaf(0x42);
        assert_eq!(node.root().to_bytes(), [0x42; 32]);
        assert!(node.is_leaf());
        assert!(node.left().is_none());
    }

    #[test]
    fn test_branch_root_matches_definition() {
        let branch = Node::branch(leaf(1), leaf(2));
        let expected = Sha256Hasher.digest_pair(&leaf(1).root(), &leaf(2).root());
        assert_eq!(branch.cached_root(), None);
        assert_eq!(branch.root(), expected);
        assert_eq!(branch.cached_root(), Some(expected));
    }

    #[test]
    fn test_root_memoized_once_per_branch() {
        let hasher = CountingHasher::default();
        let tree = Node::branch(
            Node::branch(leaf(1), leaf(2)),
            Node::branch(leaf(3), leaf(4)),
        );

        let first = tree.root_with(&hasher);
        let after_first = hasher.digests();
        let second = tree.root_with(&hasher);

        assert_eq!(first, second);
        assert_eq!(after_first, 3, "one digest per branch");
        assert_eq!(hasher.digests(), after_first, "second call must not hash");
    }

    #[test]
    fn test_shared_child_hashed_once() {
        let hasher = CountingHasher::default();
        let shared = Node::branch(leaf(7), leaf(8));
        let a = Node::branch(shared.clone(), leaf(9));
        let b = Node::branch(leaf(9), shared.clone());

        a.root_with(&hasher);
        assert_eq!(hasher.digests(), 2);
        b.root_with(&hasher);
        assert_eq!(hasher.digests(), 3, "shared child reuses its cached root");
    }

    #[test]
    fn test_ptr_eq_is_identity() {
        let a = leaf(1);
        let b = leaf(1);
        assert!(Node::ptr_eq(&a, &a.clone()));
        assert!(!Node::ptr_eq(&a, &b));
        assert_eq!(a.root(), b.root());
    }

    #[test]
    fn test_is_zero_uses_identity() {
        assert!(zero_node(3).is_zero(3));
        assert!(!zero_node(3).is_zero(2));

        let handmade = Node::branch(zero_node(0), zero_node(0));
        assert_eq!(handmade.root(), zero_node(1).root());
        assert!(!handmade.is_zero(1));
    }

    #[test]
    fn test_debug_shows_dirty_branch() {
        let branch = Node::branch(leaf(1), leaf(2));
        assert_eq!(format!("{branch:?}"), "Branch(<dirty>)");
        branch.root();
        assert!(format!("{branch:?}").starts_with("Branch(0x"));
    }
}
