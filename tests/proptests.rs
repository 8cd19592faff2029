//! Property-based tests for the persistent merkle tree using proptest.

use proptest::prelude::*;
use persistent_merkle_tree::{
    get_node_at_depth, get_nodes_at_depth, set_nodes_at_depth, subtree_fill_to_contents,
    tree_zero_after_index, zero_node, ArrayBasicType, HashValue, Hasher, ListBasicType, Node,
    NodeKind, Sha256Hasher,
};

// ============================================================================
// Strategies for generating random test data
// ============================================================================

fn arb_bytes() -> impl Strategy<Value = [u8; 32]> {
    prop::array::uniform32(any::<u8>())
}

fn arb_leaves(max_len: usize) -> impl Strategy<Value = Vec<Node>> {
    prop::collection::vec(arb_bytes().prop_map(|b| Node::leaf_from_bytes(&b)), 0..max_len)
}

/// Strictly increasing indices below `2^depth` with matching fresh leaves.
fn arb_updates(depth: usize) -> impl Strategy<Value = (Vec<usize>, Vec<Node>)> {
    prop::collection::btree_map(0..(1usize << depth), arb_bytes(), 0..8).prop_map(|updates| {
        updates
            .into_iter()
            .map(|(i, b)| (i, Node::leaf_from_bytes(&b)))
            .unzip()
    })
}

/// Root computed by plain recursion, ignoring every cache.
fn reference_root(node: &Node) -> HashValue {
    match node.kind() {
        NodeKind::Leaf(leaf) => leaf.hash(),
        NodeKind::Branch(branch) => Sha256Hasher.digest_pair(
            &reference_root(branch.left()),
            &reference_root(branch.right()),
        ),
    }
}

// ============================================================================
// Codec
// ============================================================================

proptest! {
    #[test]
    fn prop_hash_value_bytes_round_trip(bytes in arb_bytes()) {
        prop_assert_eq!(HashValue::from_bytes(&bytes).to_bytes(), bytes);
    }

    #[test]
    fn prop_digest_4_pairs_matches_single(inputs in prop::array::uniform8(arb_bytes())) {
        let inputs = inputs.map(|b| HashValue::from_bytes(&b));
        let batched = Sha256Hasher.digest_4_pairs(&inputs);
        for i in 0..4 {
            prop_assert_eq!(
                batched[i],
                Sha256Hasher.digest_pair(&inputs[2 * i], &inputs[2 * i + 1])
            );
        }
    }
}

// ============================================================================
// Tree construction and hashing
// ============================================================================

proptest! {
    #[test]
    fn prop_fill_reads_back_with_zero_padding(leaves in arb_leaves(17)) {
        let root = subtree_fill_to_contents(&leaves, 5).unwrap();
        let read = get_nodes_at_depth(&root, 5, 0, 32).unwrap();
        for (i, node) in read.iter().enumerate() {
            match leaves.get(i) {
                Some(leaf) => prop_assert!(Node::ptr_eq(node, leaf)),
                None => prop_assert!(node.is_zero(0)),
            }
        }
    }

    #[test]
    fn prop_batched_root_matches_reference(leaves in arb_leaves(40)) {
        let root = subtree_fill_to_contents(&leaves, 6).unwrap();
        let expected = reference_root(&root);
        prop_assert_eq!(root.root(), expected);
    }
}

// ============================================================================
// Rebinding
// ============================================================================

proptest! {
    #[test]
    fn prop_set_nodes_changes_only_targets(
        leaves in arb_leaves(16),
        (indices, nodes) in arb_updates(4)
    ) {
        let root = subtree_fill_to_contents(&leaves, 4).unwrap();
        let old_root = root.root();
        let updated = set_nodes_at_depth(&root, 4, &indices, &nodes).unwrap();

        for i in 0..16 {
            let node = get_node_at_depth(&updated, 4, i).unwrap();
            match indices.iter().position(|&j| j == i) {
                Some(p) => prop_assert!(Node::ptr_eq(&node, &nodes[p])),
                None => prop_assert!(Node::ptr_eq(&node, &get_node_at_depth(&root, 4, i).unwrap())),
            }
        }
        prop_assert_eq!(root.root(), old_root);
        prop_assert_eq!(updated.root(), reference_root(&updated));
    }

    #[test]
    fn prop_zero_after_index_matches_rebuild(leaves in arb_leaves(16), index in 0usize..16) {
        let root = subtree_fill_to_contents(&leaves, 4).unwrap();
        let truncated = tree_zero_after_index(&root, 4, index).unwrap();

        let kept = &leaves[..leaves.len().min(index + 1)];
        let rebuilt = subtree_fill_to_contents(kept, 4).unwrap();
        prop_assert_eq!(truncated.root(), rebuilt.root());

        for i in index + 1..16 {
            prop_assert!(get_node_at_depth(&truncated, 4, i).unwrap().is_zero(0));
        }
    }
}

// ============================================================================
// Views
// ============================================================================

proptest! {
    #[test]
    fn prop_view_pushes_match_value_to_tree(values in prop::collection::vec(any::<u32>(), 0..40)) {
        let ty = ListBasicType::<u32>::new(64);
        let mut view = ty.default_view_du().unwrap();
        for &v in &values {
            view.push(v).unwrap();
        }
        prop_assert_eq!(view.hash_tree_root().unwrap(), ty.hash_tree_root(&values).unwrap());
        prop_assert_eq!(view.get_all().unwrap(), values);
    }

    #[test]
    fn prop_slice_to_matches_rebuilt_prefix(
        values in prop::collection::vec(any::<u16>(), 1..60),
        cut in any::<prop::sample::Index>()
    ) {
        let ty = ListBasicType::<u16>::new(64);
        let mut view = ty.get_view_du(ty.value_to_tree(&values).unwrap()).unwrap();
        let index = cut.index(values.len());

        let sliced = view.slice_to(index).unwrap();
        let prefix = &values[..=index];
        prop_assert_eq!(sliced.len(), prefix.len());
        prop_assert_eq!(sliced.committed_node().root(), ty.hash_tree_root(prefix).unwrap());
    }

    /// Slicing at the last index keeps every element, so it changes nothing.
    #[test]
    fn prop_slice_to_last_index_is_identity(values in prop::collection::vec(any::<u64>(), 0..30)) {
        let ty = ListBasicType::<u64>::new(32);
        let mut view = ty.get_view_du(ty.value_to_tree(&values).unwrap()).unwrap();
        let before = view.node().unwrap();

        let sliced = view.slice_to(values.len().saturating_sub(1)).unwrap();
        prop_assert!(Node::ptr_eq(sliced.committed_node(), &before));
        prop_assert_eq!(sliced.get_all().unwrap(), values);
    }

    #[test]
    fn prop_zero_table_is_canonical(depth in 0usize..64) {
        let a = zero_node(depth);
        let b = zero_node(depth);
        prop_assert!(Node::ptr_eq(&a, &b));
        prop_assert!(a.is_zero(depth));
    }
}
