//! Single-node Merkle proofs.
//!
//! A single proof carries the root of the proven node and the roots of its
//! siblings along the path to the tree root. Verification folds the witnesses
//! back up, choosing the side at each level from the generalized index.

use crate::{error::Result, Gindex, HashValue, Hasher, Node, Sha256Hasher, TreeError};

/// Merkle branch for one node of a tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SingleProof {
    /// Address of the proven node
    pub gindex: Gindex,
    /// Root of the proven node
    pub leaf: HashValue,
    /// Sibling roots from the proven node up to the root's children
    pub witnesses: Vec<HashValue>,
}

impl SingleProof {
    /// Recompute the tree root from this proof using SHA-256.
    pub fn compute_root(&self) -> Result<HashValue> {
        self.compute_root_with(&Sha256Hasher)
    }

    /// Recompute the tree root from this proof.
    pub fn compute_root_with<H: Hasher>(&self, hasher: &H) -> Result<HashValue> {
        if self.witnesses.len() != self.gindex.depth() {
            return Err(TreeError::InvalidProof(format!(
                "gindex {} needs {} witnesses, got {}",
                self.gindex,
                self.gindex.depth(),
                self.witnesses.len()
            )));
        }

        let mut current = self.leaf;
        let mut gindex = self.gindex;
        for witness in &self.witnesses {
            current = if gindex.is_left() {
                hasher.digest_pair(&current, witness)
            } else {
                hasher.digest_pair(witness, &current)
            };
            gindex = match gindex.parent() {
                Some(parent) => parent,
                None => break,
            };
        }
        Ok(current)
    }

    /// Verify this proof against an expected root.
    pub fn verify(&self, expected_root: &HashValue) -> Result<bool> {
        Ok(&self.compute_root()? == expected_root)
    }
}

/// Build the proof for the node at `gindex` under `root`.
pub fn create_single_proof(root: &Node, gindex: Gindex) -> Result<SingleProof> {
    let mut witnesses = Vec::with_capacity(gindex.depth());
    let mut node = root;
    for right in gindex.path() {
        let branch = node.as_branch().ok_or(TreeError::OutOfBounds {
            depth: gindex.depth(),
            index: gindex.index(),
        })?;
        let (next, sibling) = if right {
            (branch.right(), branch.left())
        } else {
            (branch.left(), branch.right())
        };
        witnesses.push(sibling.root());
        node = next;
    }
    witnesses.reverse();

    Ok(SingleProof {
        gindex,
        leaf: node.root(),
        witnesses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subtree_fill_to_contents;

    fn sample_tree() -> Node {
        let leaves: Vec<Node> = (1..=6u8).map(|b| Node::leaf_from_bytes(&[b; 32])).collect();
        subtree_fill_to_contents(&leaves, 3).unwrap()
    }

    #[test]
    fn test_proof_round_trip_every_node() {
        let root = sample_tree();
        let expected = root.root();
        for depth in 0..=3 {
            for index in 0..(1usize << depth) {
                let g = Gindex::from_depth(depth, index).unwrap();
                let proof = create_single_proof(&root, g).unwrap();
                assert_eq!(proof.witnesses.len(), depth);
                assert!(proof.verify(&expected).unwrap(), "gindex {g}");
            }
        }
    }

    #[test]
    fn test_tampered_proof_fails() {
        let root = sample_tree();
        let g = Gindex::from_depth(3, 2).unwrap();
        let mut proof = create_single_proof(&root, g).unwrap();
        proof.leaf = HashValue::from_bytes(&[0xFF; 32]);
        assert!(!proof.verify(&root.root()).unwrap());
    }

    #[test]
    fn test_wrong_witness_count() {
        let root = sample_tree();
        let mut proof = create_single_proof(&root, Gindex::from_depth(2, 1).unwrap()).unwrap();
        proof.witnesses.pop();
        assert!(matches!(proof.compute_root(), Err(TreeError::InvalidProof(_))));
    }

    #[test]
    fn test_proof_past_leaf_depth() {
        let root = sample_tree();
        let g = Gindex::from_depth(4, 0).unwrap();
        assert!(matches!(
            create_single_proof(&root, g),
            Err(TreeError::OutOfBounds { depth: 4, .. })
        ));
    }
}
