use crate::editing::{CommandResult, EditorState, Selection, Transaction};
use crate::model::{Node, resolve_top_level_block};

/// Swaps the block containing the selection with its previous sibling.
/// The cursor lands at the start of the moved block.
pub fn move_node_up(state: &EditorState) -> CommandResult {
    let doc = &state.doc;
    let Some(block) = resolve_top_level_block(doc, state.selection.from()) else {
        return Ok(None);
    };
    if block.index == 0 {
        return Ok(None);
    }

    let prev_pos = doc.child_offset(block.index - 1);
    let mut tr = Transaction::new(state);
    tr.delete(block.pos, block.end())?
        .insert(prev_pos, vec![block.node.clone()])?
        .set_selection(Selection::cursor(cursor_in(block.node, prev_pos)))?;
    Ok(Some(tr))
}

/// Swaps the block containing the selection with its next sibling.
pub fn move_node_down(state: &EditorState) -> CommandResult {
    let doc = &state.doc;
    let Some(block) = resolve_top_level_block(doc, state.selection.from()) else {
        return Ok(None);
    };
    let Some(next) = doc.child(block.index + 1) else {
        return Ok(None);
    };

    // Insert first, while the offsets still describe the untouched document
    let next_end = doc.child_offset(block.index + 1) + next.node_size();
    let size = block.node.node_size();
    let mut tr = Transaction::new(state);
    tr.insert(next_end, vec![block.node.clone()])?
        .delete(block.pos, block.end())?;
    let new_pos = next_end - size;
    tr.set_selection(Selection::cursor(cursor_in(block.node, new_pos)))?;
    Ok(Some(tr))
}

/// Cursor position for a block starting at `pos`: its interior, or the
/// block itself when it is an atom.
fn cursor_in(node: &Node, pos: usize) -> usize {
    if node.is_leaf() { pos } else { pos + 1 }
}

/// Moves top-level block `from` so it lands before block `to` of the
/// current document (`to == child_count` means the end).
///
/// Dropping a block on its own boundary or on the one right after it is a
/// no-op.
pub fn move_block(state: &EditorState, from: usize, to: usize) -> CommandResult {
    if from == to || from + 1 == to {
        return Ok(None);
    }
    let doc = &state.doc;
    let Some(node) = doc.child(from) else {
        return Ok(None);
    };
    let from_pos = doc.child_offset(from);

    let mut tr = Transaction::new(state);
    tr.delete(from_pos, from_pos + node.node_size())?;

    // Removing the source shifts every later index down by one
    let index = if to > from { to - 1 } else { to };
    let insert_pos = if index >= tr.doc().child_count() {
        tr.doc().content_size()
    } else {
        tr.doc().child_offset(index)
    };
    tr.insert(insert_pos, vec![node.clone()])?;
    Ok(Some(tr))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::Editor;
    use crate::model::NodeKind;
    use crate::tests::{doc, h, p, t};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn blocks() -> Vec<Node> {
        vec![
            h(1, "Title"),
            p(vec![t("one")]),
            p(vec![t("two")]),
            Node::leaf(NodeKind::HorizontalRule),
            p(vec![t("three")]),
        ]
    }

    fn labels(doc: &Node) -> Vec<String> {
        doc.content
            .iter()
            .map(|n| match n.kind {
                NodeKind::HorizontalRule => "---".to_string(),
                _ => n.text_content(),
            })
            .collect()
    }

    fn editor_at_block(index: usize) -> Editor {
        let d = doc(blocks());
        let pos = d.child_offset(index) + usize::from(!d.content[index].is_leaf());
        let mut editor = Editor::new(d);
        editor.set_selection(Selection::cursor(pos)).unwrap();
        editor
    }

    #[test]
    fn test_move_up_swaps_with_previous() {
        let mut editor = editor_at_block(2);
        assert!(editor.move_node_up().unwrap());
        assert_eq!(labels(editor.doc()), vec!["Title", "two", "one", "---", "three"]);
        // Cursor sits inside the moved block
        assert_eq!(editor.selection(), Selection::cursor(8));
    }

    #[test]
    fn test_move_down_swaps_with_next() {
        let mut editor = editor_at_block(1);
        assert!(editor.move_node_down().unwrap());
        assert_eq!(labels(editor.doc()), vec!["Title", "two", "one", "---", "three"]);
        assert_eq!(editor.selection(), Selection::cursor(13));
    }

    #[test]
    fn test_move_up_at_first_block_is_noop() {
        let mut editor = editor_at_block(0);
        let version = editor.state().version;
        assert!(!editor.move_node_up().unwrap());
        assert_eq!(editor.state().version, version);
        assert_eq!(editor.doc(), &doc(blocks()));
    }

    #[test]
    fn test_move_down_at_last_block_is_noop() {
        let mut editor = editor_at_block(4);
        assert!(!editor.move_node_down().unwrap());
        assert_eq!(editor.doc(), &doc(blocks()));
    }

    #[rstest]
    #[case(1)]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn test_move_up_then_down_restores_order(#[case] index: usize) {
        let mut editor = editor_at_block(index);
        assert!(editor.move_node_up().unwrap());
        assert!(editor.move_node_down().unwrap());
        assert_eq!(editor.doc(), &doc(blocks()));
    }

    #[rstest]
    #[case(0, 3, vec!["one", "two", "Title", "---", "three"])]
    #[case(0, 5, vec!["one", "two", "---", "three", "Title"])]
    #[case(4, 0, vec!["three", "Title", "one", "two", "---"])]
    #[case(3, 1, vec!["Title", "---", "one", "two", "three"])]
    fn test_move_block(#[case] from: usize, #[case] to: usize, #[case] expected: Vec<&str>) {
        let state = EditorState::new(doc(blocks()));
        let tr = move_block(&state, from, to).unwrap().unwrap();
        assert_eq!(labels(tr.doc()), expected);
    }

    #[rstest]
    #[case(2, 2)]
    #[case(2, 3)]
    #[case(9, 0)]
    fn test_move_block_without_net_movement(#[case] from: usize, #[case] to: usize) {
        let state = EditorState::new(doc(blocks()));
        assert!(move_block(&state, from, to).unwrap().is_none());
    }
}
