use serde::{Deserialize, Serialize};

use crate::editing::{CommandResult, EditorState, Transaction};
use crate::marks::{MarkRun, collect_mark_runs};
use crate::model::{Mark, MarkKind, Node};

pub const STAMP_CLASS: &str = "rte-stamp";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StampCategory {
    Praise,
    Encouragement,
    Correction,
    Custom,
}

/// A feedback stamp a reviewer can put on a passage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stamp {
    pub id: String,
    pub emoji: String,
    pub label: String,
    pub color: String,
    pub category: StampCategory,
}

impl Stamp {
    pub fn new(id: &str, emoji: &str, label: &str, color: &str, category: StampCategory) -> Self {
        Self {
            id: id.to_string(),
            emoji: emoji.to_string(),
            label: label.to_string(),
            color: color.to_string(),
            category,
        }
    }

    pub fn to_mark(&self) -> Mark {
        Mark::new(MarkKind::Stamp)
            .with_attr("stampId", self.id.as_str())
            .with_attr("emoji", self.emoji.as_str())
            .with_attr("label", self.label.as_str())
            .with_attr("color", self.color.as_str())
    }
}

/// The built-in stamp palette
pub fn default_stamps() -> Vec<Stamp> {
    use StampCategory::*;
    vec![
        Stamp::new("great", "⭐", "Great", "#FFD700", Praise),
        Stamp::new("excellent", "🌟", "Excellent", "#FFA500", Praise),
        Stamp::new("good-effort", "💪", "Good Effort", "#4CAF50", Encouragement),
        Stamp::new("keep-going", "🚀", "Keep Going", "#2196F3", Encouragement),
        Stamp::new("needs-work", "📝", "Needs Work", "#FF9800", Correction),
        Stamp::new("check-again", "🔍", "Check Again", "#9C27B0", Correction),
        Stamp::new("thumbs-up", "👍", "Thumbs Up", "#4CAF50", Praise),
        Stamp::new("love-it", "❤️", "Love It", "#E91E63", Praise),
    ]
}

/// Applies `stamp` to the current selection. Fails on a collapsed selection.
pub fn set_stamp(state: &EditorState, stamp: &Stamp) -> CommandResult {
    let selection = state.selection;
    if selection.is_empty() {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    tr.add_mark(selection.from(), selection.to(), stamp.to_mark())?;
    Ok(Some(tr))
}

/// Removes every stamp overlapping the selection. Fails when there is none.
pub fn remove_stamp(state: &EditorState) -> CommandResult {
    let selection = state.selection;
    if selection.is_empty() {
        return Ok(None);
    }
    let (from, to) = (selection.from(), selection.to());
    let covered = stamp_runs(&state.doc)
        .iter()
        .any(|run| run.to > from && run.from < to);
    if !covered {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    tr.remove_mark_kind(from, to, &MarkKind::Stamp)?;
    Ok(Some(tr))
}

/// Removes every run of the stamp with `stamp_id`, wherever it is.
pub fn remove_stamp_by_id(state: &EditorState, stamp_id: &str) -> CommandResult {
    let runs = collect_mark_runs(&state.doc, |m| {
        m.kind == MarkKind::Stamp && m.attr_str("stampId") == Some(stamp_id)
    });
    if runs.is_empty() {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    for run in &runs {
        tr.remove_mark(run.from, run.to, &run.mark)?;
    }
    Ok(Some(tr))
}

pub fn stamp_runs(doc: &Node) -> Vec<MarkRun> {
    collect_mark_runs(doc, |m| m.kind == MarkKind::Stamp)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::{Editor, Selection};
    use crate::marks::CommentAttrs;
    use crate::tests::{doc, p, t};

    fn great() -> Stamp {
        default_stamps().remove(0)
    }

    fn editor() -> Editor {
        Editor::new(doc(vec![p(vec![t("Nice answer here")])]))
    }

    #[test]
    fn test_default_palette() {
        let stamps = default_stamps();
        assert_eq!(stamps.len(), 8);
        assert_eq!(stamps[0].id, "great");
        assert_eq!(
            stamps
                .iter()
                .filter(|s| s.category == StampCategory::Correction)
                .count(),
            2
        );
    }

    #[test]
    fn test_set_stamp_requires_selection() {
        let mut editor = editor();
        editor.set_selection(Selection::cursor(3)).unwrap();
        assert!(!editor.set_stamp(&great()).unwrap());
        assert!(stamp_runs(editor.doc()).is_empty());
    }

    #[test]
    fn test_stamp_and_comment_share_a_range() {
        let mut editor = editor();
        editor.set_selection(Selection::range(1, 5)).unwrap();
        assert!(editor.add_comment(&CommentAttrs::new("c1", "t1")).unwrap());
        assert!(editor.set_stamp(&great()).unwrap());

        let node = &editor.doc().content[0].content[0];
        assert_eq!(node.text_str(), "Nice");
        assert_eq!(node.marks.len(), 2);
    }

    #[test]
    fn test_two_stamps_overlap() {
        let mut editor = editor();
        editor.set_selection(Selection::range(1, 5)).unwrap();
        editor.set_stamp(&great()).unwrap();
        editor.set_stamp(&default_stamps()[1]).unwrap();
        assert_eq!(stamp_runs(editor.doc()).len(), 2);
    }

    #[test]
    fn test_remove_stamp_over_selection() {
        let mut editor = editor();
        editor.set_selection(Selection::range(1, 5)).unwrap();
        editor.set_stamp(&great()).unwrap();
        editor.set_selection(Selection::range(6, 12)).unwrap();
        assert!(!editor.remove_stamp().unwrap());

        editor.set_selection(Selection::range(2, 3)).unwrap();
        assert!(editor.remove_stamp().unwrap());
        let spans: Vec<_> = stamp_runs(editor.doc())
            .iter()
            .map(|r| (r.from, r.to))
            .collect();
        assert_eq!(spans, vec![(1, 2), (3, 5)]);
    }

    #[test]
    fn test_remove_stamp_by_id() {
        let mut editor = editor();
        editor.set_selection(Selection::range(1, 5)).unwrap();
        editor.set_stamp(&great()).unwrap();
        editor.set_selection(Selection::range(6, 12)).unwrap();
        editor.set_stamp(&great()).unwrap();

        assert!(editor.remove_stamp_by_id("great").unwrap());
        assert!(stamp_runs(editor.doc()).is_empty());
        assert!(!editor.remove_stamp_by_id("great").unwrap());
    }
}
