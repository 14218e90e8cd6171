/*!
 * # Editing Core
 *
 * Transactional mutation of the document tree.
 *
 * ## Architecture Overview
 *
 * ### 1. Immutable Snapshots
 * - The committed document lives in an **`EditorState`** as an `Arc<Node>`
 * - Readers (exporters, sidebars, drag handles) borrow the snapshot and never mutate it
 * - Every commit produces a new snapshot and bumps the state's `version`
 *
 * ### 2. One Mutation Builder
 * - All edits go through a **`Transaction`**: `delete`, `insert`, `add_mark`,
 *   `remove_mark`, `remove_mark_kind`, `set_selection`
 * - Steps apply to a working copy immediately; later steps address the
 *   document left by earlier ones
 * - A failed step returns a `TransformError`; dropping the transaction
 *   leaves the committed snapshot untouched
 *
 * ### 3. Serialized Dispatch
 * - `Editor::dispatch` commits one transaction at a time
 * - A transaction built against an older version is rejected with
 *   `TransformError::StaleSnapshot`, so a scan computed on one snapshot can
 *   never be applied to another
 *
 * ### 4. Commands
 * - A command is `fn(&EditorState) -> CommandResult`
 * - `Ok(None)` means "does not apply" (an expected no-op), `Ok(Some(tr))` is
 *   the transaction to dispatch
 * - `Editor` wraps each command as a method returning `bool`
 *
 * ## Usage Pattern
 *
 * ```rust
 * use rteditor_engine::editing::{Editor, Selection};
 * use rteditor_engine::marks::CommentAttrs;
 * use rteditor_engine::model::Node;
 *
 * let doc = Node::doc(vec![Node::paragraph(vec![Node::text("Hello World")])]);
 * let mut editor = Editor::new(doc);
 *
 * editor.set_selection(Selection::range(1, 6)).unwrap();
 * assert!(editor.add_comment(&CommentAttrs::new("c1", "t1")).unwrap());
 * assert!(editor.resolve_comment("c1").unwrap());
 * ```
 */

pub mod context;
pub mod editor;
pub mod patch;
pub mod state;
pub mod transaction;

pub use context::{CollaborationProvider, CollaborationUser, EditorContext, Locale, Theme, ThemeMode};
pub use editor::Editor;
pub use patch::Patch;
pub use state::{EditorState, Selection};
pub use transaction::{Step, Transaction, TransformError};

/// Outcome of a command: the transaction to dispatch, or `None` when the
/// command does not apply to the current state.
pub type CommandResult = Result<Option<Transaction>, TransformError>;
