//! Tree builders shared by the unit tests.

use crate::marks::CommentAttrs;
use crate::model::{Mark, MarkKind, Node, NodeKind};

pub fn doc(content: Vec<Node>) -> Node {
    Node::doc(content)
}

pub fn p(content: Vec<Node>) -> Node {
    Node::paragraph(content)
}

pub fn t(text: &str) -> Node {
    Node::text(text)
}

pub fn marked(text: &str, marks: Vec<Mark>) -> Node {
    Node::marked_text(text, marks)
}

pub fn h(level: u8, text: &str) -> Node {
    Node::heading(level, vec![t(text)])
}

pub fn bold() -> Mark {
    Mark::new(MarkKind::Bold)
}

pub fn italic() -> Mark {
    Mark::new(MarkKind::Italic)
}

pub fn comment_mark(comment_id: &str, thread_id: &str) -> Mark {
    CommentAttrs::new(comment_id, thread_id).to_mark()
}

pub fn bullet_list(items: Vec<Node>) -> Node {
    Node::element(NodeKind::BulletList, items)
}

pub fn ordered_list(start: u64, items: Vec<Node>) -> Node {
    Node::element(NodeKind::OrderedList, items).with_attr("start", start)
}

pub fn li(content: Vec<Node>) -> Node {
    Node::element(NodeKind::ListItem, content)
}

pub fn task_list(items: Vec<Node>) -> Node {
    Node::element(NodeKind::TaskList, items)
}

pub fn task_item(checked: bool, content: Vec<Node>) -> Node {
    Node::element(NodeKind::TaskItem, content).with_attr("checked", checked)
}

pub fn blockquote(content: Vec<Node>) -> Node {
    Node::element(NodeKind::Blockquote, content)
}

pub fn code_block(language: &str, code: &str) -> Node {
    Node::element(NodeKind::CodeBlock, vec![t(code)]).with_attr("language", language)
}

pub fn table(rows: Vec<Node>) -> Node {
    Node::element(NodeKind::Table, rows)
}

pub fn row(cells: Vec<Node>) -> Node {
    Node::element(NodeKind::TableRow, cells)
}

pub fn cell(text: &str) -> Node {
    Node::element(NodeKind::TableCell, vec![p(vec![t(text)])])
}
