//! Fixed-size elements packed into 32-byte chunks.

use std::fmt;

use crate::{error::Result, Node, NodeKind, TreeError};

/// Bytes in one chunk.
pub const BYTES_PER_CHUNK: usize = 32;

/// An element type that packs little-endian into chunks.
///
/// `BYTE_LEN` must divide [`BYTES_PER_CHUNK`].
pub trait PackedElement: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Serialized size in bytes.
    const BYTE_LEN: usize;

    /// Write the little-endian encoding into `out`, which is `BYTE_LEN` long.
    fn write_le(&self, out: &mut [u8]);

    /// Read from a `BYTE_LEN`-long little-endian encoding.
    fn read_le(bytes: &[u8]) -> Self;
}

macro_rules! impl_packed_uint {
    ($($ty:ty),*) => {$(
        impl PackedElement for $ty {
            const BYTE_LEN: usize = std::mem::size_of::<$ty>();

            fn write_le(&self, out: &mut [u8]) {
                out.copy_from_slice(&self.to_le_bytes());
            }

            fn read_le(bytes: &[u8]) -> Self {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                buf.copy_from_slice(bytes);
                <$ty>::from_le_bytes(buf)
            }
        }
    )*};
}

impl_packed_uint!(u8, u16, u32, u64, u128);

impl PackedElement for bool {
    const BYTE_LEN: usize = 1;

    fn write_le(&self, out: &mut [u8]) {
        out[0] = u8::from(*self);
    }

    fn read_le(bytes: &[u8]) -> Self {
        bytes[0] != 0
    }
}

/// Elements that fit in one chunk.
///
/// Fails to compile for an element whose `BYTE_LEN` is zero or does not
/// divide [`BYTES_PER_CHUNK`]:
///
/// ```compile_fail
/// use persistent_merkle_tree::{items_per_chunk, PackedElement};
///
/// #[derive(Clone, Copy, Default, PartialEq, Debug)]
/// struct Wide([u8; 48]);
///
/// impl PackedElement for Wide {
///     const BYTE_LEN: usize = 48;
///     fn write_le(&self, out: &mut [u8]) {
///         out.copy_from_slice(&self.0);
///     }
///     fn read_le(bytes: &[u8]) -> Self {
///         let mut out = [0u8; 48];
///         out.copy_from_slice(bytes);
///         Wide(out)
///     }
/// }
///
/// let _ = items_per_chunk::<Wide>();
/// ```
pub const fn items_per_chunk<T: PackedElement>() -> usize {
    const {
        assert!(
            T::BYTE_LEN > 0 && BYTES_PER_CHUNK % T::BYTE_LEN == 0,
            "PackedElement::BYTE_LEN must be a non-zero divisor of 32"
        );
    }
    BYTES_PER_CHUNK / T::BYTE_LEN
}

/// The 32 data bytes of a chunk leaf.
pub(crate) fn chunk_bytes(node: &Node) -> Result<[u8; 32]> {
    match node.kind() {
        NodeKind::Leaf(leaf) => Ok(leaf.hash().to_bytes()),
        NodeKind::Branch(_) => Err(TreeError::InvalidArgument(
            "expected a chunk leaf, found a branch".to_string(),
        )),
    }
}

/// Read element `slot` of a packed chunk.
pub(crate) fn get_packed<T: PackedElement>(chunk: &Node, slot: usize) -> Result<T> {
    let bytes = chunk_bytes(chunk)?;
    let offset = slot * T::BYTE_LEN;
    Ok(T::read_le(&bytes[offset..offset + T::BYTE_LEN]))
}

/// A new chunk equal to `chunk` with element `slot` replaced.
pub(crate) fn set_packed<T: PackedElement>(chunk: &Node, slot: usize, value: T) -> Result<Node> {
    let mut bytes = chunk_bytes(chunk)?;
    let offset = slot * T::BYTE_LEN;
    value.write_le(&mut bytes[offset..offset + T::BYTE_LEN]);
    Ok(Node::leaf_from_bytes(&bytes))
}

/// Pack `values` into chunk leaves. The last chunk is zero-padded.
pub(crate) fn pack_chunks<T: PackedElement>(values: &[T]) -> Vec<Node> {
    values
        .chunks(items_per_chunk::<T>())
        .map(|items| {
            let mut bytes = [0u8; BYTES_PER_CHUNK];
            for (slot, value) in bytes.chunks_exact_mut(T::BYTE_LEN).zip(items) {
                value.write_le(slot);
            }
            Node::leaf_from_bytes(&bytes)
        })
        .collect()
}

/// Unpack the first `len` elements from a run of chunk leaves.
pub(crate) fn unpack_chunks<T: PackedElement>(chunks: &[Node], len: usize) -> Result<Vec<T>> {
    let mut out = Vec::with_capacity(len);
    for chunk in chunks {
        let bytes = chunk_bytes(chunk)?;
        for slot in bytes.chunks_exact(T::BYTE_LEN) {
            if out.len() == len {
                return Ok(out);
            }
            out.push(T::read_le(slot));
        }
    }
    Ok(out)
}
