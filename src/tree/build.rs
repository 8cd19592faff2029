//! Tree construction from a flat list of leaves.

use crate::{error::Result, zero_node, Hasher, Node, Sha256Hasher, TreeError};

use super::hash::hash_level_if_batchable;

/// Smallest depth whose tree holds `count` leaves: `ceil(log2(count))`.
pub fn count_to_depth(count: usize) -> usize {
    if count <= 1 {
        return 0;
    }
    (usize::BITS - (count - 1).leading_zeros()) as usize
}

/// Build a perfect tree of `depth` whose leaves, left to right, are `leaves`
/// followed by canonical zero subtrees.
///
/// Levels are built bottom-up; a level with at least four ready branches is
/// hashed through the batched engine path before the next level is built.
pub fn subtree_fill_to_contents(leaves: &[Node], depth: usize) -> Result<Node> {
    subtree_fill_to_contents_with(leaves, depth, &Sha256Hasher)
}

/// [`subtree_fill_to_contents`] with a custom hash engine.
pub fn subtree_fill_to_contents_with<H: Hasher>(
    leaves: &[Node],
    depth: usize,
    hasher: &H,
) -> Result<Node> {
    let fits = depth >= usize::BITS as usize || leaves.len() <= 1usize << depth;
    if !fits {
        return Err(TreeError::InvalidArgument(format!(
            "{} leaves do not fit in a tree of depth {depth}",
            leaves.len()
        )));
    }

    match leaves {
        [] => return Ok(zero_node(depth)),
        [single] if depth == 0 => return Ok(single.clone()),
        _ => {}
    }

    let mut level = leaves.to_vec();
    for d in 0..depth {
        level = level
            .chunks(2)
            .map(|pair| match pair {
                [left, right] => Node::branch(left.clone(), right.clone()),
                [left] => Node::branch(left.clone(), zero_node(d)),
                _ => unreachable!("chunks(2) yields one or two nodes"),
            })
            .collect();
        hash_level_if_batchable(&level, hasher);
    }

    debug_assert_eq!(level.len(), 1);
    Ok(level.swap_remove(0))
}
