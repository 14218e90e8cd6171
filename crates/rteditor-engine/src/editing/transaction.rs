use std::ops::Range;

use crate::editing::state::{EditorState, Selection};
use crate::model::mark::{Mark, MarkKind, add_to_set, remove_from_set, same_set};
use crate::model::node::split_chars;
use crate::model::position::node_at_path_mut;
use crate::model::{Node, resolve};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransformError {
    #[error("Position {pos} is outside the document (content size {size})")]
    OutOfRange { pos: usize, size: usize },
    #[error("Inverted range {from}..{to}")]
    InvertedRange { from: usize, to: usize },
    #[error("Range {from}..{to} crosses node boundaries")]
    CrossesParent { from: usize, to: usize },
    #[error("Transaction built against version {built}, document is at version {current}")]
    StaleSnapshot { built: u64, current: u64 },
}

/// One primitive edit recorded by a transaction
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Delete { from: usize, to: usize },
    Insert { pos: usize, nodes: Vec<Node> },
    AddMark { from: usize, to: usize, mark: Mark },
    RemoveMark { from: usize, to: usize, mark: Mark },
}

/// The single mutation builder.
///
/// Steps apply to a working copy of the snapshot the transaction was created
/// from, so each step addresses the document left by the previous one. The
/// committed snapshot is only replaced when the editor dispatches the whole
/// transaction; dropping it (for example after a failed step) leaves the
/// committed document untouched.
#[derive(Debug, Clone)]
pub struct Transaction {
    doc: Node,
    selection: Selection,
    steps: Vec<Step>,
    changed: Vec<Range<usize>>,
    base_version: u64,
}

impl Transaction {
    pub fn new(state: &EditorState) -> Self {
        Self {
            doc: (*state.doc).clone(),
            selection: state.selection,
            steps: Vec::new(),
            changed: Vec::new(),
            base_version: state.version,
        }
    }

    /// The working document, including every step applied so far
    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn doc_changed(&self) -> bool {
        !self.steps.is_empty()
    }

    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    pub fn delete(&mut self, from: usize, to: usize) -> Result<&mut Self, TransformError> {
        self.check_range(from, to)?;
        if from == to {
            return Ok(self);
        }
        let size = self.doc.content_size();
        let start = resolve(&self.doc, from).ok_or(TransformError::OutOfRange { pos: from, size })?;
        let end = resolve(&self.doc, to).ok_or(TransformError::OutOfRange { pos: to, size })?;
        if !start.same_parent(&end) {
            return Err(TransformError::CrossesParent { from, to });
        }

        let parent = node_at_path_mut(&mut self.doc, &start.path);
        let first = split_at(&mut parent.content, start.parent_offset);
        let last = split_at(&mut parent.content, end.parent_offset);
        parent.content.drain(first..last);
        self.doc.normalize();

        self.selection = self.selection.map_delete(from, to);
        self.steps.push(Step::Delete { from, to });
        self.changed.push(from..from);
        Ok(self)
    }

    pub fn insert(&mut self, pos: usize, nodes: Vec<Node>) -> Result<&mut Self, TransformError> {
        let size = self.doc.content_size();
        let at = resolve(&self.doc, pos).ok_or(TransformError::OutOfRange { pos, size })?;
        let inserted: usize = nodes.iter().map(Node::node_size).sum();
        if inserted == 0 {
            return Ok(self);
        }

        let parent = node_at_path_mut(&mut self.doc, &at.path);
        let index = split_at(&mut parent.content, at.parent_offset);
        let tail = parent.content.split_off(index);
        parent.content.extend(nodes.iter().cloned());
        parent.content.extend(tail);
        self.doc.normalize();

        self.selection = self.selection.map_insert(pos, inserted);
        self.steps.push(Step::Insert { pos, nodes });
        self.changed.push(pos..pos + inserted);
        Ok(self)
    }

    /// Adds `mark` to every inline node in `from..to`, splitting text at the edges.
    pub fn add_mark(&mut self, from: usize, to: usize, mark: Mark) -> Result<&mut Self, TransformError> {
        self.check_range(from, to)?;
        let changed = map_inline_marks(&mut self.doc.content, 0, from, to, &mut |set| {
            add_to_set(set, &mark)
        });
        // Edges are split even when no mark set changes
        self.doc.normalize();
        if changed {
            self.steps.push(Step::AddMark { from, to, mark });
            self.changed.push(from..to);
        }
        Ok(self)
    }

    /// Removes exactly `mark` (kind and attributes) from `from..to`.
    pub fn remove_mark(&mut self, from: usize, to: usize, mark: &Mark) -> Result<&mut Self, TransformError> {
        self.check_range(from, to)?;
        let changed = map_inline_marks(&mut self.doc.content, 0, from, to, &mut |set| {
            remove_from_set(set, mark)
        });
        self.doc.normalize();
        if changed {
            self.steps.push(Step::RemoveMark {
                from,
                to,
                mark: mark.clone(),
            });
            self.changed.push(from..to);
        }
        Ok(self)
    }

    /// Removes every mark of `kind` from `from..to`, whatever its attributes.
    pub fn remove_mark_kind(
        &mut self,
        from: usize,
        to: usize,
        kind: &MarkKind,
    ) -> Result<&mut Self, TransformError> {
        self.check_range(from, to)?;
        let mut removed = Vec::new();
        self.doc.descendants(&mut |node, pos| {
            let end = pos + node.node_size();
            if node.is_inline() && end > from && pos < to {
                for mark in node.marks.iter().filter(|m| &m.kind == kind) {
                    if !removed.contains(mark) {
                        removed.push(mark.clone());
                    }
                }
            }
            true
        });
        for mark in &removed {
            self.remove_mark(from, to, mark)?;
        }
        Ok(self)
    }

    pub fn set_selection(&mut self, selection: Selection) -> Result<&mut Self, TransformError> {
        let size = self.doc.content_size();
        if selection.to() > size {
            return Err(TransformError::OutOfRange {
                pos: selection.to(),
                size,
            });
        }
        self.selection = selection;
        Ok(self)
    }

    pub(crate) fn into_parts(self) -> (Node, Selection, Vec<Step>, Vec<Range<usize>>) {
        (self.doc, self.selection, self.steps, self.changed)
    }

    fn check_range(&self, from: usize, to: usize) -> Result<(), TransformError> {
        if from > to {
            return Err(TransformError::InvertedRange { from, to });
        }
        let size = self.doc.content_size();
        if to > size {
            return Err(TransformError::OutOfRange { pos: to, size });
        }
        Ok(())
    }
}

/// Makes `offset` a child boundary of `content`, splitting a text node when
/// the offset falls inside one. Returns the index of the child starting there.
fn split_at(content: &mut Vec<Node>, offset: usize) -> usize {
    let mut pos = 0;
    for index in 0..content.len() {
        if pos == offset {
            return index;
        }
        let size = content[index].node_size();
        if offset < pos + size {
            let node = &content[index];
            let (head, tail) = split_chars(node.text_str(), offset - pos);
            let mut left = node.clone();
            let mut right = node.clone();
            left.text = Some(head.to_string());
            right.text = Some(tail.to_string());
            content[index] = left;
            content.insert(index + 1, right);
            return index + 1;
        }
        pos += size;
    }
    content.len()
}

/// Rewrites the mark sets of inline nodes overlapping `from..to`.
/// Returns whether any mark set actually changed.
fn map_inline_marks<F>(content: &mut Vec<Node>, base: usize, from: usize, to: usize, f: &mut F) -> bool
where
    F: FnMut(&[Mark]) -> Vec<Mark>,
{
    let mut changed = false;
    let mut out = Vec::with_capacity(content.len());
    let mut pos = base;
    for mut child in std::mem::take(content) {
        let size = child.node_size();
        let end = pos + size;
        if end <= from || pos >= to {
            out.push(child);
        } else if child.is_text() {
            let start = from.saturating_sub(pos);
            let stop = (to - pos).min(size);
            let marks = f(&child.marks);
            changed |= !same_set(&marks, &child.marks);

            let text = child.text.take().unwrap_or_default();
            let (head, rest) = split_chars(&text, start);
            let (middle, tail) = split_chars(rest, stop - start);
            if !head.is_empty() {
                out.push(Node::marked_text(head, child.marks.clone()));
            }
            out.push(Node::marked_text(middle, marks));
            if !tail.is_empty() {
                out.push(Node::marked_text(tail, child.marks.clone()));
            }
        } else if child.is_inline() {
            let marks = f(&child.marks);
            changed |= !same_set(&marks, &child.marks);
            child.marks = marks;
            out.push(child);
        } else {
            changed |= map_inline_marks(&mut child.content, pos + 1, from, to, f);
            out.push(child);
        }
        pos = end;
    }
    *content = out;
    changed
}
