use serde::{Deserialize, Serialize};

use crate::editing::{CommandResult, EditorState, Selection, Transaction};
use crate::marks::{MarkRun, collect_mark_runs};
use crate::model::{Mark, MarkKind, Node};

pub const COMMENT_CLASS: &str = "rte-comment-highlight";
pub const RESOLVED_CLASS: &str = "rte-comment-highlight--resolved";

/// Attributes of a comment mark
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAttrs {
    pub comment_id: String,
    /// Groups a root comment with its replies
    pub thread_id: String,
    #[serde(default)]
    pub resolved: bool,
}

impl CommentAttrs {
    pub fn new(comment_id: &str, thread_id: &str) -> Self {
        Self {
            comment_id: comment_id.to_string(),
            thread_id: thread_id.to_string(),
            resolved: false,
        }
    }

    /// Attributes for a fresh comment with a generated id
    pub fn generate(thread_id: &str) -> Self {
        Self::new(&uuid::Uuid::new_v4().to_string(), thread_id)
    }

    pub fn to_mark(&self) -> Mark {
        Mark::new(MarkKind::Comment)
            .with_attr("commentId", self.comment_id.as_str())
            .with_attr("threadId", self.thread_id.as_str())
            .with_attr("resolved", self.resolved)
    }

    pub fn from_mark(mark: &Mark) -> Option<Self> {
        if mark.kind != MarkKind::Comment {
            return None;
        }
        Some(Self {
            comment_id: mark.attr_str("commentId")?.to_string(),
            thread_id: mark.attr_str("threadId").unwrap_or_default().to_string(),
            resolved: mark.attr_bool("resolved"),
        })
    }
}

/// One run of a comment, as listed in a comment sidebar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRange {
    pub comment_id: String,
    pub thread_id: String,
    pub resolved: bool,
    pub from: usize,
    pub to: usize,
    pub text: String,
}

fn is_comment(mark: &Mark, comment_id: &str) -> bool {
    mark.kind == MarkKind::Comment && mark.attr_str("commentId") == Some(comment_id)
}

/// Marks the current selection with a new comment. Fails on a collapsed selection.
pub fn add_comment(state: &EditorState, attrs: &CommentAttrs) -> CommandResult {
    let selection = state.selection;
    if selection.is_empty() {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    tr.add_mark(selection.from(), selection.to(), attrs.to_mark())?;
    Ok(Some(tr))
}

/// Removes every run of the comment with `comment_id`, in one transaction.
pub fn remove_comment(state: &EditorState, comment_id: &str) -> CommandResult {
    let runs = collect_mark_runs(&state.doc, |m| is_comment(m, comment_id));
    if runs.is_empty() {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    for run in &runs {
        tr.remove_mark(run.from, run.to, &run.mark)?;
    }
    Ok(Some(tr))
}

pub fn resolve_comment(state: &EditorState, comment_id: &str) -> CommandResult {
    set_resolved(state, comment_id, true)
}

pub fn unresolve_comment(state: &EditorState, comment_id: &str) -> CommandResult {
    set_resolved(state, comment_id, false)
}

/// Swaps each run's mark for an equivalent one carrying the new state.
/// Runs already in the requested state are left alone.
fn set_resolved(state: &EditorState, comment_id: &str, resolved: bool) -> CommandResult {
    let runs = collect_mark_runs(&state.doc, |m| is_comment(m, comment_id));
    if runs.is_empty() {
        return Ok(None);
    }
    let mut tr = Transaction::new(state);
    for run in runs.iter().filter(|r| r.mark.attr_bool("resolved") != resolved) {
        let replacement = run.mark.with_attr("resolved", resolved);
        tr.remove_mark(run.from, run.to, &run.mark)?
            .add_mark(run.from, run.to, replacement)?;
    }
    Ok(Some(tr))
}

/// Every comment run in the document, in document order
pub fn comment_ranges(doc: &Node) -> Vec<CommentRange> {
    collect_mark_runs(doc, |m| m.kind == MarkKind::Comment)
        .into_iter()
        .filter_map(|MarkRun { from, to, mark }| {
            let attrs = CommentAttrs::from_mark(&mark)?;
            Some(CommentRange {
                comment_id: attrs.comment_id,
                thread_id: attrs.thread_id,
                resolved: attrs.resolved,
                from,
                to,
                text: doc.text_between(from, to, "\n"),
            })
        })
        .collect()
}

/// Sorted, de-duplicated start positions of all comment runs
pub fn comment_stops(doc: &Node) -> Vec<usize> {
    let mut stops: Vec<usize> = collect_mark_runs(doc, |m| m.kind == MarkKind::Comment)
        .into_iter()
        .map(|run| run.from)
        .collect();
    stops.sort_unstable();
    stops.dedup();
    stops
}

/// Moves the cursor to the nearest comment start strictly after it.
pub fn jump_to_next_comment(state: &EditorState) -> CommandResult {
    let cursor = state.selection.head;
    let target = comment_stops(&state.doc).into_iter().find(|&pos| pos > cursor);
    jump_to(state, target)
}

/// Moves the cursor to the nearest comment start strictly before it.
pub fn jump_to_previous_comment(state: &EditorState) -> CommandResult {
    let cursor = state.selection.head;
    let target = comment_stops(&state.doc).into_iter().rfind(|&pos| pos < cursor);
    jump_to(state, target)
}

fn jump_to(state: &EditorState, target: Option<usize>) -> CommandResult {
    let Some(pos) = target else {
        return Ok(None);
    };
    let mut tr = Transaction::new(state);
    tr.set_selection(Selection::cursor(pos))?;
    Ok(Some(tr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Editor;
    use crate::tests::{doc, p, t};
    use pretty_assertions::assert_eq;

    fn editor_with(text: &str) -> Editor {
        Editor::new(doc(vec![p(vec![t(text)])]))
    }

    fn comment_on(editor: &mut Editor, from: usize, to: usize, id: &str) {
        editor.set_selection(Selection::range(from, to)).unwrap();
        assert!(editor.add_comment(&CommentAttrs::new(id, "thread")).unwrap());
    }

    #[test]
    fn test_add_comment_requires_selection() {
        let mut editor = editor_with("Hello");
        editor.set_selection(Selection::cursor(2)).unwrap();
        let before = editor.doc().clone();
        assert!(!editor.add_comment(&CommentAttrs::new("c1", "t1")).unwrap());
        assert_eq!(editor.doc(), &before);
    }

    #[test]
    fn test_overlapping_comments_coexist() {
        let mut editor = editor_with("Hello World");
        comment_on(&mut editor, 1, 6, "c1");
        comment_on(&mut editor, 3, 9, "c2");

        let ranges = comment_ranges(editor.doc());
        let summary: Vec<_> = ranges
            .iter()
            .map(|r| (r.comment_id.as_str(), r.from, r.to, r.text.as_str()))
            .collect();
        assert_eq!(summary, vec![("c1", 1, 6, "Hello"), ("c2", 3, 9, "llo Wo")]);
    }

    #[test]
    fn test_remove_comment_clears_every_run() {
        let mut editor = editor_with("one two three");
        comment_on(&mut editor, 1, 14, "c1");
        // Deleting "two" would be the host's job; simulate a split comment by
        // removing the middle of the mark directly.
        let mut tr = editor.transaction();
        let mark = CommentAttrs::new("c1", "thread").to_mark();
        tr.remove_mark(5, 8, &mark).unwrap();
        editor.dispatch(tr).unwrap();
        assert_eq!(comment_ranges(editor.doc()).len(), 2);

        assert!(editor.remove_comment("c1").unwrap());
        assert!(comment_ranges(editor.doc()).is_empty());
        assert_eq!(editor.doc(), &doc(vec![p(vec![t("one two three")])]));
    }

    #[test]
    fn test_remove_unknown_comment_is_noop() {
        let mut editor = editor_with("Hello");
        comment_on(&mut editor, 1, 3, "c1");
        let version = editor.state().version;
        assert!(!editor.remove_comment("missing").unwrap());
        assert!(!editor.resolve_comment("missing").unwrap());
        assert_eq!(editor.state().version, version);
    }

    #[test]
    fn test_resolve_comment_flags_every_run() {
        let mut editor = editor_with("one two three");
        comment_on(&mut editor, 1, 4, "c1");
        comment_on(&mut editor, 9, 14, "c1");

        assert!(editor.resolve_comment("c1").unwrap());
        let ranges = comment_ranges(editor.doc());
        assert_eq!(ranges.len(), 2);
        assert!(ranges.iter().all(|r| r.resolved));
        assert_eq!((ranges[0].from, ranges[0].to), (1, 4));
        assert_eq!((ranges[1].from, ranges[1].to), (9, 14));
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let mut editor = editor_with("Hello World");
        comment_on(&mut editor, 1, 6, "c1");
        assert!(editor.resolve_comment("c1").unwrap());
        let resolved = editor.doc().clone();

        assert!(editor.resolve_comment("c1").unwrap());
        assert_eq!(editor.doc(), &resolved);
    }

    #[test]
    fn test_unresolve_restores_open_state() {
        let mut editor = editor_with("Hello World");
        comment_on(&mut editor, 1, 6, "c1");
        let open = editor.doc().clone();
        editor.resolve_comment("c1").unwrap();
        assert!(editor.unresolve_comment("c1").unwrap());
        assert_eq!(editor.doc(), &open);
    }

    #[test]
    fn test_resolving_one_comment_keeps_overlapping_one_open() {
        let mut editor = editor_with("Hello World");
        comment_on(&mut editor, 1, 6, "c1");
        comment_on(&mut editor, 1, 6, "c2");
        editor.resolve_comment("c1").unwrap();

        let ranges = comment_ranges(editor.doc());
        let mut states: Vec<_> = ranges
            .iter()
            .map(|r| (r.comment_id.as_str(), r.resolved))
            .collect();
        states.sort();
        assert_eq!(states, vec![("c1", true), ("c2", false)]);
    }

    #[test]
    fn test_navigation_between_comment_starts() {
        let mut editor = editor_with("abcdefghijklmnopqrstuvwxyz");
        comment_on(&mut editor, 5, 7, "a");
        comment_on(&mut editor, 12, 14, "b");
        comment_on(&mut editor, 20, 22, "c");
        comment_on(&mut editor, 20, 21, "d");
        assert_eq!(comment_stops(editor.doc()), vec![5, 12, 20]);

        editor.set_selection(Selection::cursor(12)).unwrap();
        assert!(editor.jump_to_next_comment().unwrap());
        assert_eq!(editor.selection(), Selection::cursor(20));

        editor.set_selection(Selection::cursor(12)).unwrap();
        assert!(editor.jump_to_previous_comment().unwrap());
        assert_eq!(editor.selection(), Selection::cursor(5));

        editor.set_selection(Selection::cursor(20)).unwrap();
        assert!(!editor.jump_to_next_comment().unwrap());
        assert_eq!(editor.selection(), Selection::cursor(20));
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = CommentAttrs::generate("t1");
        let b = CommentAttrs::generate("t1");
        assert_ne!(a.comment_id, b.comment_id);
    }

    #[test]
    fn test_attrs_round_trip_through_mark() {
        let attrs = CommentAttrs::new("c9", "t3");
        assert_eq!(CommentAttrs::from_mark(&attrs.to_mark()), Some(attrs));
        assert_eq!(CommentAttrs::from_mark(&Mark::new(MarkKind::Bold)), None);
    }
}
