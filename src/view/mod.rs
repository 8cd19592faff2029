//! Mutable working views over persistent trees.
//!
//! A view keeps the last committed root plus a sorted map of edited chunks.
//! Reads consult the edits first; [`ArrayBasicViewDU::commit`] replays them
//! into a new root in a single rebinding pass.

mod array_basic;
mod list_basic;

pub use array_basic::ArrayBasicViewDU;
pub use list_basic::ListBasicViewDU;
