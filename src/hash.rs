//! Hash values and the hash engine boundary.
//!
//! Tree roots are kept as eight 32-bit words ([`HashValue`]). The byte layout is
//! little-endian per word, so a `HashValue` and the 32-byte digest it came from
//! are bit-identical in memory order.
//!
//! Merkleization only ever hashes 64-byte inputs (two concatenated child roots).
//! The [`Hasher`] trait exposes that as a single-pair entry point and a 4-wide
//! entry point; engines backed by SIMD compression implement the latter natively,
//! the default implementation falls back to four single calls.

use alloy_primitives::B256;
use sha2::{Digest, Sha256};
use std::fmt;

use crate::{error::Result, TreeError};

/// Number of independent pairs the batched entry point hashes at once.
pub const BATCH_WIDTH: usize = 4;

/// A 256-bit digest stored as eight little-endian 32-bit words.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HashValue(pub [u32; 8]);

impl HashValue {
    /// The all-zero digest.
    pub const ZERO: Self = Self([0; 8]);

    /// Wrap raw words.
    pub const fn from_words(words: [u32; 8]) -> Self {
        Self(words)
    }

    /// The raw words.
    pub const fn words(&self) -> &[u32; 8] {
        &self.0
    }

    /// Parse 32 bytes, little-endian per word.
    pub fn from_bytes(bytes: &[u8; 32]) -> Self {
        let mut words = [0u32; 8];
        for (word, chunk) in words.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Self(words)
    }

    /// Parse a slice that must be exactly 32 bytes long.
    pub fn from_slice(slice: &[u8]) -> Result<Self> {
        let bytes: &[u8; 32] = slice.try_into().map_err(|_| {
            TreeError::InvalidArgument(format!("expected 32 bytes, got {}", slice.len()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    /// Serialize to 32 bytes, little-endian per word.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut out = [0u8; 32];
        self.write_into(&mut out);
        out
    }

    /// Write the 32-byte form into the start of `out`.
    ///
    /// # Panics
    ///
    /// Panics if `out` is shorter than 32 bytes.
    pub fn write_into(&self, out: &mut [u8]) {
        for (chunk, word) in out[..32].chunks_exact_mut(4).zip(self.0.iter()) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
    }

    /// Check if every bit is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&w| w == 0)
    }
}

impl From<[u8; 32]> for HashValue {
    fn from(bytes: [u8; 32]) -> Self {
        Self::from_bytes(&bytes)
    }
}

impl From<HashValue> for [u8; 32] {
    fn from(value: HashValue) -> Self {
        value.to_bytes()
    }
}

impl From<B256> for HashValue {
    fn from(value: B256) -> Self {
        Self::from_bytes(&value.0)
    }
}

impl From<HashValue> for B256 {
    fn from(value: HashValue) -> Self {
        B256::new(value.to_bytes())
    }
}

impl fmt::Debug for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashValue(0x{})", hex::encode(self.to_bytes()))
    }
}

impl fmt::Display for HashValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

/// Hash engine used to merkleize the tree.
///
/// Both entry points are pure functions of their inputs. `digest_4_pairs` must
/// return exactly what four `digest_pair` calls would.
///
/// # Thread Safety
///
/// Engines are `Send + Sync` so that the batch scheduler can fan out levels
/// across threads when the `parallel` feature is enabled.
pub trait Hasher: Clone + Default + Send + Sync {
    /// Hash `left || right`.
    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue;

    /// Hash four independent pairs laid out as `[l0, r0, l1, r1, l2, r2, l3, r3]`.
    fn digest_4_pairs(&self, inputs: &[HashValue; 2 * BATCH_WIDTH]) -> [HashValue; BATCH_WIDTH] {
        [
            self.digest_pair(&inputs[0], &inputs[1]),
            self.digest_pair(&inputs[2], &inputs[3]),
            self.digest_pair(&inputs[4], &inputs[5]),
            self.digest_pair(&inputs[6], &inputs[7]),
        ]
    }

    /// Raw hash of arbitrary input.
    fn digest(&self, input: &[u8]) -> HashValue;
}

/// SHA-256 engine, the hash function SSZ merkleization is defined over.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn digest_pair(&self, left: &HashValue, right: &HashValue) -> HashValue {
        let mut hasher = Sha256::new();
        hasher.update(left.to_bytes());
        hasher.update(right.to_bytes());
        let out: [u8; 32] = hasher.finalize().into();
        HashValue::from_bytes(&out)
    }

    fn digest_4_pairs(&self, inputs: &[HashValue; 2 * BATCH_WIDTH]) -> [HashValue; BATCH_WIDTH] {
        // One 256-byte staging buffer, one hasher state reset between lanes.
        let mut block = [0u8; 64 * BATCH_WIDTH];
        for (slot, value) in block.chunks_exact_mut(32).zip(inputs.iter()) {
            value.write_into(slot);
        }

        let mut hasher = Sha256::new();
        let mut out = [HashValue::ZERO; BATCH_WIDTH];
        for (lane, input) in out.iter_mut().zip(block.chunks_exact(64)) {
            hasher.update(input);
            let digest: [u8; 32] = hasher.finalize_reset().into();
            *lane = HashValue::from_bytes(&digest);
        }
        out
    }

    fn digest(&self, input: &[u8]) -> HashValue {
        let out: [u8; 32] = Sha256::digest(input).into();
        HashValue::from_bytes(&out)
    }
}
