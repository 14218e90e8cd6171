use std::sync::Arc;

use crate::model::Node;

/// A text selection. `anchor` stays put while `head` moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    pub fn cursor(pos: usize) -> Self {
        Self {
            anchor: pos,
            head: pos,
        }
    }

    pub fn range(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// Maps both ends through a deletion of `from..to`.
    pub(crate) fn map_delete(self, from: usize, to: usize) -> Self {
        let map = |pos: usize| {
            if pos >= to {
                pos - (to - from)
            } else if pos > from {
                from
            } else {
                pos
            }
        };
        Self::range(map(self.anchor), map(self.head))
    }

    /// Maps both ends through an insertion of `size` positions at `at`.
    pub(crate) fn map_insert(self, at: usize, size: usize) -> Self {
        let map = |pos: usize| if pos >= at { pos + size } else { pos };
        Self::range(map(self.anchor), map(self.head))
    }
}

/// An immutable committed snapshot of the editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub doc: Arc<Node>,
    pub selection: Selection,
    /// Incremented on every commit; transactions remember the version they were built against
    pub version: u64,
}

impl EditorState {
    pub fn new(doc: Node) -> Self {
        let cursor = match doc.child(0) {
            Some(first) if !first.is_leaf() => 1,
            _ => 0,
        };
        Self {
            doc: Arc::new(doc),
            selection: Selection::cursor(cursor),
            version: 0,
        }
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }
}
