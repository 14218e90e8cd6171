//! # Block Reordering
//!
//! Moves top-level blocks, either one step at a time from the keyboard
//! (`Mod-Shift-ArrowUp` / `Mod-Shift-ArrowDown`) or by dragging a block's
//! handle to another boundary. Every move is a single delete + insert
//! transaction, so a block is never duplicated or lost.

pub mod commands;
pub mod drag;

pub use commands::{move_block, move_node_down, move_node_up};
pub use drag::{
    DragController, DragHandleOptions, DragPayload, DragState, DropIndicator, HandleDecoration,
    Rect, ViewGeometry, handle_decorations,
};
