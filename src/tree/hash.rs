//! Batched root computation.
//!
//! A freshly rebound tree usually has a connected region of branches with no
//! cached root. The scheduler walks that region once, buckets its branches by
//! level, then hashes level by level from the bottom up. Within a level the
//! branches are independent, so they are fed to the engine four at a time via
//! [`Hasher::digest_4_pairs`]; the remainder goes through the single-pair path.

use std::collections::HashSet;

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::trace;

use crate::hash::BATCH_WIDTH;
use crate::node::BranchNode;
use crate::{HashValue, Hasher, Node, NodeKind};

/// Levels with at least this many branches are split across threads.
#[cfg(feature = "parallel")]
const PARALLEL_THRESHOLD: usize = 1024;

/// Fill every missing root under `root` and return its root.
pub fn batch_hash_with<H: Hasher>(root: &Node, hasher: &H) -> HashValue {
    let branch = match root.kind() {
        NodeKind::Leaf(leaf) => return leaf.hash(),
        NodeKind::Branch(branch) => branch,
    };
    if let Some(cached) = branch.cached_root() {
        return cached;
    }

    let levels = collect_dirty_levels(root);
    trace!(
        target: "pmt::hash",
        levels = levels.len(),
        branches = levels.iter().map(Vec::len).sum::<usize>(),
        "batch hashing dirty subtree"
    );

    for level in levels.iter().rev() {
        hash_level(level, hasher);
    }

    branch.root_or_compute(hasher)
}

/// Walk the uncached region below `root`, returning its branches grouped by
/// distance from `root`. Each branch is recorded once even when shared.
fn collect_dirty_levels(root: &Node) -> Vec<Vec<Node>> {
    let mut levels: Vec<Vec<Node>> = Vec::new();
    let mut visited = HashSet::new();
    let mut stack = vec![(root.clone(), 0usize)];

    while let Some((node, level)) = stack.pop() {
        let Some(branch) = node.as_branch() else {
            continue;
        };
        if branch.cached_root().is_some() || !visited.insert(node.addr()) {
            continue;
        }

        stack.push((branch.right().clone(), level + 1));
        stack.push((branch.left().clone(), level + 1));

        if levels.len() <= level {
            levels.resize_with(level + 1, Vec::new);
        }
        levels[level].push(node);
    }

    levels
}

/// Hash a set of independent branches, four per engine call where possible.
pub(crate) fn hash_level<H: Hasher>(nodes: &[Node], hasher: &H) {
    let pending: Vec<&BranchNode> = nodes
        .iter()
        .filter_map(Node::as_branch)
        .filter(|branch| branch.cached_root().is_none())
        .collect();

    hash_batches(&pending, hasher);

    let full = pending.len() - pending.len() % BATCH_WIDTH;
    for branch in &pending[full..] {
        branch.root_or_compute(hasher);
    }
}

#[cfg(not(feature = "parallel"))]
fn hash_batches<H: Hasher>(pending: &[&BranchNode], hasher: &H) {
    for batch in pending.chunks_exact(BATCH_WIDTH) {
        hash_batch(batch, hasher);
    }
}

#[cfg(feature = "parallel")]
fn hash_batches<H: Hasher>(pending: &[&BranchNode], hasher: &H) {
    if pending.len() < PARALLEL_THRESHOLD {
        for batch in pending.chunks_exact(BATCH_WIDTH) {
            hash_batch(batch, hasher);
        }
        return;
    }
    pending
        .par_chunks_exact(BATCH_WIDTH)
        .for_each(|batch| hash_batch(batch, hasher));
}

/// Hash the branches of one level if there are enough ready ones to fill a
/// batch. Ready means uncached with both child roots already known.
pub(crate) fn hash_level_if_batchable<H: Hasher>(nodes: &[Node], hasher: &H) {
    let ready = nodes
        .iter()
        .filter_map(Node::as_branch)
        .filter(|branch| branch.cached_root().is_none() && children_resolved(branch))
        .count();
    if ready >= BATCH_WIDTH {
        hash_level(nodes, hasher);
    }
}

fn children_resolved(branch: &BranchNode) -> bool {
    branch.left().cached_root().is_some() && branch.right().cached_root().is_some()
}

fn hash_batch<H: Hasher>(batch: &[&BranchNode], hasher: &H) {
    let mut inputs = [HashValue::ZERO; 2 * BATCH_WIDTH];
    for (i, branch) in batch.iter().enumerate() {
        match (branch.left().cached_root(), branch.right().cached_root()) {
            (Some(left), Some(right)) => {
                inputs[2 * i] = left;
                inputs[2 * i + 1] = right;
            }
            // A child outside the collected region (irregular shapes only):
            // resolve each branch on its own.
            _ => {
                for branch in batch {
                    branch.root_or_compute(hasher);
                }
                return;
            }
        }
    }

    let roots = hasher.digest_4_pairs(&inputs);
    for (branch, root) in batch.iter().zip(roots) {
        branch.set_root(root);
    }
}
