//! Scenario tests for list and vector views.

use persistent_merkle_tree::{
    get_node_at_depth, ArrayBasicType, HashValue, ListBasicType, ListBasicViewDU, Node, TreeError,
    VectorBasicType,
};

fn chunk_words(node: &Node) -> [u64; 4] {
    let bytes = node.root_bytes();
    std::array::from_fn(|i| u64::from_le_bytes(bytes[i * 8..i * 8 + 8].try_into().unwrap()))
}

#[test]
fn test_push_commit_slice_scenario() {
    let ty = ListBasicType::<u64>::new(10);
    assert_eq!(ty.items_per_chunk(), 4);

    let mut view: ListBasicViewDU<u64> = ty.default_view_du().unwrap();
    for v in 0..5u64 {
        view.push(v).unwrap();
    }
    view.commit().unwrap();

    let sliced = view.slice_to(2).unwrap();
    assert_eq!(sliced.len(), 3);

    let root = sliced.committed_node();
    let chunk0 = get_node_at_depth(root, ty.depth(), 0).unwrap();
    assert_eq!(chunk_words(&chunk0), [0, 1, 2, 0]);

    let chunk1 = get_node_at_depth(root, ty.depth(), 1).unwrap();
    assert!(chunk1.is_zero(0));

    assert_eq!(root.root(), ty.hash_tree_root(&[0, 1, 2]).unwrap());
}

#[test]
fn test_old_roots_survive_edits() {
    let ty = ListBasicType::<u64>::new(10);
    let mut view = ty.default_view_du().unwrap();
    for v in [10, 20, 30] {
        view.push(v).unwrap();
    }
    let first = view.node().unwrap();
    let first_root = first.root();

    view.set(1, 99).unwrap();
    view.push(40).unwrap();
    let second = view.node().unwrap();

    assert_eq!(first.root(), first_root);
    assert_eq!(ty.tree_to_value(&first).unwrap(), vec![10, 20, 30]);
    assert_eq!(ty.tree_to_value(&second).unwrap(), vec![10, 99, 30, 40]);
}

#[test]
fn test_view_reusable_after_commit() {
    let ty = ListBasicType::<u8>::new(100);
    let mut view = ty.default_view_du().unwrap();

    for round in 0..3u8 {
        for i in 0..20 {
            view.push(round.wrapping_mul(20).wrapping_add(i)).unwrap();
        }
        view.commit().unwrap();
    }
    let expected: Vec<u8> = (0..60).collect();
    assert_eq!(view.get_all().unwrap(), expected);
    assert_eq!(view.hash_tree_root().unwrap(), ty.hash_tree_root(&expected).unwrap());
}

#[test]
fn test_push_after_slice_reuses_zeroed_chunk() {
    let ty = ListBasicType::<u32>::new(32);
    let mut view = ty
        .get_view_du(ty.value_to_tree(&(1..=20).collect::<Vec<u32>>()).unwrap())
        .unwrap();

    let mut sliced = view.slice_to(9).unwrap();
    sliced.push(500).unwrap();
    sliced.push(501).unwrap();

    let mut expected: Vec<u32> = (1..=10).collect();
    expected.extend([500, 501]);
    assert_eq!(sliced.get_all().unwrap(), expected);
    assert_eq!(sliced.hash_tree_root().unwrap(), ty.hash_tree_root(&expected).unwrap());
}

#[test]
fn test_failed_push_leaves_view_unchanged() {
    let ty = ListBasicType::<bool>::new(3);
    let mut view = ty.default_view_du().unwrap();
    for b in [true, false, true] {
        view.push(b).unwrap();
    }
    let before = view.clone();

    assert_eq!(view.push(true).unwrap_err(), TreeError::LimitExceeded { limit: 3 });
    assert_eq!(view.len(), before.len());
    assert_eq!(view.get_all().unwrap(), before.get_all().unwrap());
}

#[test]
fn test_empty_list_slices_to_itself() {
    let ty = ListBasicType::<u16>::new(16);
    let mut view = ty.default_view_du().unwrap();
    let sliced = view.slice_to(0).unwrap();
    assert!(sliced.is_empty());
    assert!(Node::ptr_eq(sliced.committed_node(), view.committed_node()));
}

#[test]
fn test_vector_view_round_trip() {
    let ty = VectorBasicType::<u128>::new(5);
    let mut view = ty.default_view_du().unwrap();
    assert_eq!(view.hash_tree_root().unwrap(), ty.default_node().root());

    for i in 0..5 {
        view.set(i, u128::MAX - i as u128).unwrap();
    }
    let node = view.node().unwrap();
    let values = ty.tree_to_value(&node).unwrap();
    assert_eq!(values, (0..5).map(|i| u128::MAX - i).collect::<Vec<_>>());
    assert_ne!(node.root(), HashValue::ZERO);
}
