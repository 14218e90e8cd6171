//! A review session driven entirely through the public editor API.

use pretty_assertions::assert_eq;
use rteditor_engine::editing::Selection;
use rteditor_engine::export::{self, MarkdownOptions};
use rteditor_engine::extensions::builtin_extensions;
use rteditor_engine::marks::comment_ranges;
use rteditor_engine::reorder::{DragHandleOptions, DragState, Rect, handle_decorations};
use rteditor_engine::{DragController, Editor, Node, NodeKind, ViewGeometry, default_stamps};

const BLOCK_HEIGHT: f64 = 20.0;

/// Stacks the top-level blocks of a document, one per `BLOCK_HEIGHT` band.
struct Stacked {
    offsets: Vec<usize>,
}

impl Stacked {
    fn of(doc: &Node) -> Self {
        Self {
            offsets: (0..doc.child_count()).map(|i| doc.child_offset(i)).collect(),
        }
    }
}

impl ViewGeometry for Stacked {
    fn pos_at_coords(&self, _x: f64, y: f64) -> Option<usize> {
        let index = (y / BLOCK_HEIGHT) as usize;
        self.offsets.get(index).map(|pos| pos + 1)
    }

    fn block_rect(&self, block_pos: usize) -> Option<Rect> {
        let index = self.offsets.iter().position(|&pos| pos == block_pos)?;
        let top = index as f64 * BLOCK_HEIGHT;
        Some(Rect {
            top,
            bottom: top + BLOCK_HEIGHT,
        })
    }

    fn container_rect(&self) -> Option<Rect> {
        Some(Rect {
            top: 0.0,
            bottom: self.offsets.len() as f64 * BLOCK_HEIGHT,
        })
    }
}

fn load_editor() -> Editor {
    let json = std::fs::read_to_string(format!(
        "{}/tests/fixtures/release_notes.json",
        env!("CARGO_MANIFEST_DIR")
    ))
    .unwrap();
    Editor::new(export::from_json(&json).unwrap()).with_extensions(vec![builtin_extensions()])
}

fn block_kinds(editor: &Editor) -> Vec<NodeKind> {
    editor.doc().content.iter().map(|n| n.kind.clone()).collect()
}

#[test]
fn review_session() {
    // Given the release notes: heading 0..15, paragraph 15..47
    let mut editor = load_editor();
    assert_eq!(editor.extension_names().len(), 5);

    // Stamp "Ships"
    editor.set_selection(Selection::range(16, 21)).unwrap();
    assert!(editor.set_stamp(&default_stamps()[0]).unwrap());
    assert!(editor.to_html().contains(r#"data-stamp-id="great""#));

    // Resolving twice leaves the same document
    assert!(editor.resolve_comment("c1").unwrap());
    let resolved = editor.doc().clone();
    assert!(editor.resolve_comment("c1").unwrap());
    assert_eq!(editor.doc(), &resolved);
    assert!(editor.to_html().contains("rte-comment-highlight--resolved"));
    assert!(!editor.resolve_comment("missing").unwrap());

    // Jump from the start of the paragraph to the comment
    editor.set_selection(Selection::cursor(16)).unwrap();
    assert!(editor.jump_to_next_comment().unwrap());
    assert_eq!(editor.selection(), Selection::cursor(37));

    // Move the heading below the paragraph
    editor.set_selection(Selection::cursor(1)).unwrap();
    assert!(editor.move_node_down().unwrap());
    let markdown = editor.to_markdown(&MarkdownOptions::default());
    assert!(markdown.starts_with("Ships **reordering** and *comments*.\n\n# Release notes"));

    // Remove the comment everywhere, once
    assert!(editor.remove_comment("c1").unwrap());
    assert!(comment_ranges(editor.doc()).is_empty());
    assert!(!editor.remove_comment("c1").unwrap());
}

#[test]
fn drag_code_block_to_top() {
    let mut editor = load_editor();
    let geometry = Stacked::of(editor.doc());
    let mut drag = DragController::default();

    let handles = handle_decorations(
        editor.doc(),
        &DragHandleOptions::default(),
        editor.context().locale,
        editor.is_editable(),
    );
    assert_eq!(handles.len(), 4);
    assert_eq!(handles[3].key, "drag-handle-3");

    let payload = drag.drag_start("rte-drag-handle", Some("3")).unwrap();
    assert_eq!(payload.data, "3");

    // Upper half of the first block targets the boundary before it
    let indicator = drag.drag_over(editor.doc(), &geometry, 10.0, 5.0).unwrap();
    assert_eq!(indicator.index, 0);
    assert_eq!(indicator.top, 0.0);

    assert!(drag.drop(&mut editor).unwrap());
    assert_eq!(drag.state(), DragState::Idle);
    assert!(drag.indicator().is_none());
    assert_eq!(
        block_kinds(&editor),
        vec![
            NodeKind::CodeBlock,
            NodeKind::Heading,
            NodeKind::Paragraph,
            NodeKind::TaskList
        ]
    );
}

#[test]
fn drop_on_own_boundary_is_a_no_op() {
    let mut editor = load_editor();
    let geometry = Stacked::of(editor.doc());
    let before = editor.doc().clone();
    let mut drag = DragController::default();

    drag.drag_start("rte-drag-handle extra", Some("1")).unwrap();
    // Lower half of block 1 targets the boundary after it
    drag.drag_over(editor.doc(), &geometry, 10.0, 35.0).unwrap();

    assert!(!drag.drop(&mut editor).unwrap());
    assert_eq!(editor.doc(), &before);
}

#[test]
fn read_only_editor_has_no_handles() {
    let mut editor = load_editor();
    editor.set_editable(false);
    let handles = handle_decorations(
        editor.doc(),
        &DragHandleOptions::default(),
        editor.context().locale,
        editor.is_editable(),
    );
    assert!(handles.is_empty());
}
