//! Generalized indices.
//!
//! A generalized index packs a `(depth, index)` address into one integer:
//! `gindex = 2^depth + index`. The root is `1`, its children `2` and `3`. The
//! bits after the leading `1` are the path from the root, most significant
//! first, `0` = left and `1` = right.

use std::fmt;

use crate::{error::Result, TreeError};

/// Deepest address representable in a `u64` generalized index.
pub const MAX_GINDEX_DEPTH: usize = 63;

/// A generalized index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "u64", into = "u64")
)]
pub struct Gindex(u64);

impl Gindex {
    /// The root node.
    pub const ROOT: Self = Self(1);

    /// Wrap a raw generalized index. Zero is not a valid address.
    pub fn new(value: u64) -> Result<Self> {
        if value == 0 {
            return Err(TreeError::InvalidArgument("gindex 0 is invalid".to_string()));
        }
        Ok(Self(value))
    }

    /// Address of node `index` at `depth`.
    pub fn from_depth(depth: usize, index: usize) -> Result<Self> {
        if depth > MAX_GINDEX_DEPTH {
            return Err(TreeError::InvalidArgument(format!(
                "depth {depth} exceeds maximum gindex depth {MAX_GINDEX_DEPTH}"
            )));
        }
        let width = 1u64 << depth;
        if index as u64 >= width {
            return Err(TreeError::OutOfBounds { depth, index });
        }
        Ok(Self(width | index as u64))
    }

    /// The raw value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Number of branch levels between the root and this node.
    pub const fn depth(self) -> usize {
        (63 - self.0.leading_zeros()) as usize
    }

    /// Position among the nodes at this depth.
    pub const fn index(self) -> usize {
        (self.0 ^ (1u64 << self.depth())) as usize
    }

    /// Check if this node is a left child (the root is neither).
    pub const fn is_left(self) -> bool {
        self.0 > 1 && self.0 & 1 == 0
    }

    /// Left child.
    pub fn left(self) -> Result<Self> {
        self.child(false)
    }

    /// Right child.
    pub fn right(self) -> Result<Self> {
        self.child(true)
    }

    fn child(self, right: bool) -> Result<Self> {
        if self.depth() >= MAX_GINDEX_DEPTH {
            return Err(TreeError::InvalidArgument(format!(
                "child of {self} exceeds maximum gindex depth"
            )));
        }
        Ok(Self((self.0 << 1) | right as u64))
    }

    /// Parent node, `None` for the root.
    pub const fn parent(self) -> Option<Self> {
        if self.0 == 1 {
            None
        } else {
            Some(Self(self.0 >> 1))
        }
    }

    /// Sibling node, `None` for the root.
    pub const fn sibling(self) -> Option<Self> {
        if self.0 == 1 {
            None
        } else {
            Some(Self(self.0 ^ 1))
        }
    }

    /// Address of `other` taken relative to the subtree rooted at `self`.
    pub fn concat(self, other: Gindex) -> Result<Self> {
        let depth = self.depth() + other.depth();
        if depth > MAX_GINDEX_DEPTH {
            return Err(TreeError::InvalidArgument(format!(
                "concatenated depth {depth} exceeds maximum gindex depth"
            )));
        }
        Ok(Self((self.0 << other.depth()) | other.index() as u64))
    }

    /// Path bits from the root, `true` = right.
    pub fn path(self) -> GindexPath {
        GindexPath {
            value: self.0,
            remaining: self.depth(),
        }
    }
}

impl fmt::Debug for Gindex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gindex({}; depth={}, index={})", self.0, self.depth(), self.index())
    }
}

impl fmt::Display for Gindex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u64> for Gindex {
    type Error = TreeError;

    fn try_from(value: u64) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Gindex> for u64 {
    fn from(gindex: Gindex) -> Self {
        gindex.0
    }
}

/// Iterator over the path bits of a [`Gindex`], most significant first.
#[derive(Clone, Debug)]
pub struct GindexPath {
    value: u64,
    remaining: usize,
}

impl Iterator for GindexPath {
    type Item = bool;

    fn next(&mut self) -> Option<bool> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some((self.value >> self.remaining) & 1 == 1)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for GindexPath {}
