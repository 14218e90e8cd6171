pub mod editing;
pub mod export;
pub mod extensions;
pub mod marks;
pub mod model;
pub mod reorder;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{CommandResult, Editor, EditorContext, EditorState, Patch, Selection, Transaction, TransformError};
pub use export::{ExportError, HeadingStyle, MarkdownOptions, html_to_markdown, serialize, to_html};
pub use extensions::{Extension, ExtensionEntry, safe_load_extensions};
pub use marks::{CommentAttrs, Stamp, StampCategory, default_stamps};
pub use model::{Mark, MarkKind, Node, NodeKind};
pub use reorder::{DragController, DropIndicator, ViewGeometry};
pub use stats::{DocumentStats, count_words};
