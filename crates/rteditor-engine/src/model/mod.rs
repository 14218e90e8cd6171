//! # Document Model
//!
//! The position-addressed document tree the editing engines operate on.
//!
//! Positions follow the ProseMirror scheme: a text node occupies one position
//! per character, an atom leaf occupies one, and every other node occupies
//! its content plus an opening and a closing token. Top-level block `i`
//! therefore starts at the sum of the sizes of blocks `0..i`.

pub mod mark;
pub mod node;
pub mod position;

pub use mark::{Attrs, Mark, MarkKind};
pub use node::{Node, NodeKind};
pub use position::{ResolvedPos, TopLevelBlock, resolve, resolve_top_level_block};
