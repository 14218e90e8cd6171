use std::ops::Range;

use crate::editing::state::Selection;

/// Result of committing a transaction
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Ranges touched by each step, in the coordinates of the document right after that step
    pub changed: Vec<Range<usize>>,
    pub new_selection: Selection,
    pub version: u64,
}

impl Patch {
    pub fn doc_changed(&self) -> bool {
        !self.changed.is_empty()
    }
}
