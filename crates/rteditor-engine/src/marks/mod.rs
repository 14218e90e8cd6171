//! # Annotation Marks
//!
//! Comment and stamp marks: overlapping annotations addressed by text range.
//!
//! A single logical annotation (one `commentId` or `stampId`) may be split
//! into several disjoint runs once intervening text is edited, so every
//! id-based operation works in two phases:
//!
//! 1. **Scan**: [`collect_mark_runs`] walks the committed snapshot and returns a
//!    plain list of `(from, to, mark)` runs without touching the document.
//! 2. **Batch**: one [`Transaction`](crate::editing::Transaction) applies every
//!    removal or replacement, so either all runs change or none do.

pub mod comment;
pub mod stamp;

pub use comment::{
    CommentAttrs, CommentRange, add_comment, comment_ranges, comment_stops, jump_to_next_comment,
    jump_to_previous_comment, remove_comment, resolve_comment, unresolve_comment,
};
pub use stamp::{
    Stamp, StampCategory, default_stamps, remove_stamp, remove_stamp_by_id, set_stamp,
    stamp_runs,
};

use crate::model::{Mark, Node};

/// A maximal contiguous range carrying one mark instance
#[derive(Debug, Clone, PartialEq)]
pub struct MarkRun {
    pub from: usize,
    pub to: usize,
    pub mark: Mark,
}

/// Collects every run of marks matching `predicate`, in document order.
///
/// Adjacent inline nodes carrying the same mark are folded into one run;
/// runs separated by other content or by block boundaries stay apart.
pub fn collect_mark_runs<P>(doc: &Node, predicate: P) -> Vec<MarkRun>
where
    P: Fn(&Mark) -> bool,
{
    let mut runs: Vec<MarkRun> = Vec::new();
    doc.descendants(&mut |node, pos| {
        if !node.is_inline() {
            return true;
        }
        let end = pos + node.node_size();
        for mark in node.marks.iter().filter(|m| predicate(m)) {
            match runs
                .iter_mut()
                .rev()
                .find(|run| run.to == pos && &run.mark == mark)
            {
                Some(run) => run.to = end,
                None => runs.push(MarkRun {
                    from: pos,
                    to: end,
                    mark: mark.clone(),
                }),
            }
        }
        false
    });
    runs.sort_by_key(|run| (run.from, run.to));
    runs
}
