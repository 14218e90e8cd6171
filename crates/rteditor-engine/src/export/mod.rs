//! # Export
//!
//! Read-only projections of a committed document: Markdown, HTML and the
//! stored JSON form. None of them mutate the tree, so they can run on any
//! snapshot at any time.

pub mod escape;
pub mod html;
pub mod html_to_markdown;
pub mod json;
pub mod markdown;

pub use html::to_html;
pub use html_to_markdown::html_to_markdown;
pub use json::{DocMark, DocNode, from_json, to_json, validate_json};
pub use markdown::{HeadingStyle, MarkdownOptions, serialize};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}
