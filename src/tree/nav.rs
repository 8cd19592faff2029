//! Navigation and rebinding by `(depth, index)` and by generalized index.
//!
//! All operations are pure: they return new nodes and never touch their inputs.
//! Rebinding rebuilds only the branches on the paths to the replaced nodes;
//! every other subtree is shared by reference with the input tree.

use crate::{error::Result, zero_node, Gindex, Node, TreeError};

const INDEX_BITS: usize = usize::BITS as usize;

/// Bit `bit` of `index`, where bits past the width of `usize` read as zero.
fn bit_at(index: usize, bit: usize) -> bool {
    bit < INDEX_BITS && (index >> bit) & 1 == 1
}

/// Check that `index` addresses a node among the `2^depth` at `depth`.
fn check_index(depth: usize, index: usize) -> Result<()> {
    if depth < INDEX_BITS && index >> depth != 0 {
        return Err(TreeError::OutOfBounds { depth, index });
    }
    Ok(())
}

/// First index of the right half of a subtree of `depth` starting at `offset`.
/// `None` when the right half lies past `usize::MAX`.
fn right_half_start(offset: usize, depth: usize) -> Option<usize> {
    let half = 1usize.checked_shl(u32::try_from(depth - 1).ok()?)?;
    offset.checked_add(half)
}

fn children(node: &Node, depth: usize, index: usize) -> Result<(&Node, &Node)> {
    match node.as_branch() {
        Some(branch) => Ok((branch.left(), branch.right())),
        None => Err(TreeError::OutOfBounds { depth, index }),
    }
}

/// The node at `(depth, index)`.
///
/// Fails with [`TreeError::OutOfBounds`] when `index` does not fit in `depth`
/// bits or when a leaf is reached before `depth` levels.
pub fn get_node_at_depth(root: &Node, depth: usize, index: usize) -> Result<Node> {
    check_index(depth, index)?;
    let mut node = root;
    for bit in (0..depth).rev() {
        let (left, right) = children(node, depth, index)?;
        node = if bit_at(index, bit) { right } else { left };
    }
    Ok(node.clone())
}

/// `count` consecutive nodes at `depth` starting at `start`, left to right.
///
/// Equivalent to `count` calls to [`get_node_at_depth`], in one traversal.
pub fn get_nodes_at_depth(
    root: &Node,
    depth: usize,
    start: usize,
    count: usize,
) -> Result<Vec<Node>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let last = start
        .checked_add(count - 1)
        .ok_or(TreeError::OutOfBounds { depth, index: start })?;
    check_index(depth, last)?;

    let mut out = Vec::with_capacity(count);
    collect_range(root, depth, 0, start, last, depth, &mut out)?;
    Ok(out)
}

/// Push the nodes of `[start, last]` found under `node`, which covers indices
/// from `offset` at `depth` levels above the target depth.
fn collect_range(
    node: &Node,
    depth: usize,
    offset: usize,
    start: usize,
    last: usize,
    target_depth: usize,
    out: &mut Vec<Node>,
) -> Result<()> {
    if depth == 0 {
        out.push(node.clone());
        return Ok(());
    }
    let (left, right) = children(node, target_depth, start.max(offset))?;
    match right_half_start(offset, depth) {
        Some(mid) => {
            if start < mid {
                collect_range(left, depth - 1, offset, start, last, target_depth, out)?;
            }
            if last >= mid {
                collect_range(right, depth - 1, mid, start, last, target_depth, out)?;
            }
        }
        None => collect_range(left, depth - 1, offset, start, last, target_depth, out)?,
    }
    Ok(())
}

/// Replace the node at `(depth, index)`.
pub fn set_node_at_depth(root: &Node, depth: usize, index: usize, node: Node) -> Result<Node> {
    set_nodes_at_depth(root, depth, &[index], &[node])
}

/// Replace the nodes at `(depth, indices[i])` with `nodes[i]`.
///
/// `indices` must be strictly increasing. Only the ancestors of the replaced
/// nodes are rebuilt; all sibling subtrees are shared with `root`.
pub fn set_nodes_at_depth(
    root: &Node,
    depth: usize,
    indices: &[usize],
    nodes: &[Node],
) -> Result<Node> {
    if indices.len() != nodes.len() {
        return Err(TreeError::InvalidArgument(format!(
            "{} indices but {} nodes",
            indices.len(),
            nodes.len()
        )));
    }
    if let Some(pair) = indices.windows(2).find(|pair| pair[0] >= pair[1]) {
        return Err(TreeError::InvalidArgument(format!(
            "indices must be strictly increasing, got {} then {}",
            pair[0], pair[1]
        )));
    }
    let Some(&last) = indices.last() else {
        return Ok(root.clone());
    };
    check_index(depth, last)?;

    rebind(root, depth, 0, indices, nodes, depth)
}

fn rebind(
    node: &Node,
    depth: usize,
    offset: usize,
    indices: &[usize],
    nodes: &[Node],
    target_depth: usize,
) -> Result<Node> {
    if indices.is_empty() {
        return Ok(node.clone());
    }
    if depth == 0 {
        return Ok(nodes[0].clone());
    }

    let (left, right) = children(node, target_depth, indices[0])?;
    let split = match right_half_start(offset, depth) {
        Some(mid) => indices.partition_point(|&i| i < mid),
        None => indices.len(),
    };
    let (left_indices, right_indices) = indices.split_at(split);
    let (left_nodes, right_nodes) = nodes.split_at(split);

    let new_left = rebind(left, depth - 1, offset, left_indices, left_nodes, target_depth)?;
    let new_right = match right_half_start(offset, depth) {
        Some(mid) => rebind(right, depth - 1, mid, right_indices, right_nodes, target_depth)?,
        None => right.clone(),
    };
    Ok(Node::branch(new_left, new_right))
}

/// Replace every node at `(depth, i)` with `i > index` by the canonical zero
/// subtree.
///
/// Regions that already are canonical zero subtrees are detected by identity
/// and left as they are, and a subtree with nothing to zero is returned
/// unchanged, so its cached roots survive.
pub fn tree_zero_after_index(root: &Node, depth: usize, index: usize) -> Result<Node> {
    if check_index(depth, index).is_err() {
        // Nothing lies after an index past the last node.
        return Ok(root.clone());
    }
    zero_after(root, depth, index, depth)
}

fn zero_after(node: &Node, depth: usize, index: usize, target_depth: usize) -> Result<Node> {
    if depth == 0 || node.is_zero(depth) {
        return Ok(node.clone());
    }
    let (left, right) = children(node, target_depth, index)?;

    if bit_at(index, depth - 1) {
        let new_right = zero_after(right, depth - 1, index, target_depth)?;
        if Node::ptr_eq(&new_right, right) {
            return Ok(node.clone());
        }
        return Ok(Node::branch(left.clone(), new_right));
    }

    let zero = zero_node(depth - 1);
    let new_left = zero_after(left, depth - 1, index, target_depth)?;
    if Node::ptr_eq(&new_left, left) && Node::ptr_eq(right, &zero) {
        return Ok(node.clone());
    }
    Ok(Node::branch(new_left, zero))
}

/// The node at a generalized index.
pub fn get_node(root: &Node, gindex: Gindex) -> Result<Node> {
    let mut node = root;
    for right in gindex.path() {
        let (l, r) = children(node, gindex.depth(), gindex.index())?;
        node = if right { r } else { l };
    }
    Ok(node.clone())
}

/// Replace the node at a generalized index.
pub fn set_node(root: &Node, gindex: Gindex, node: Node) -> Result<Node> {
    set_node_at_depth(root, gindex.depth(), gindex.index(), node)
}
