use serde_json::Value;

use crate::model::mark::{Attrs, Mark, same_set};

/// Known node types. Types registered by outside extensions are `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Doc,
    Paragraph,
    Heading,
    BulletList,
    OrderedList,
    ListItem,
    TaskList,
    TaskItem,
    Blockquote,
    CodeBlock,
    HorizontalRule,
    Image,
    HardBreak,
    Table,
    TableRow,
    TableCell,
    TableHeader,
    Math,
    Text,
    Other(String),
}

impl NodeKind {
    pub fn name(&self) -> &str {
        match self {
            NodeKind::Doc => "doc",
            NodeKind::Paragraph => "paragraph",
            NodeKind::Heading => "heading",
            NodeKind::BulletList => "bulletList",
            NodeKind::OrderedList => "orderedList",
            NodeKind::ListItem => "listItem",
            NodeKind::TaskList => "taskList",
            NodeKind::TaskItem => "taskItem",
            NodeKind::Blockquote => "blockquote",
            NodeKind::CodeBlock => "codeBlock",
            NodeKind::HorizontalRule => "horizontalRule",
            NodeKind::Image => "image",
            NodeKind::HardBreak => "hardBreak",
            NodeKind::Table => "table",
            NodeKind::TableRow => "tableRow",
            NodeKind::TableCell => "tableCell",
            NodeKind::TableHeader => "tableHeader",
            NodeKind::Math => "math",
            NodeKind::Text => "text",
            NodeKind::Other(name) => name,
        }
    }

    pub fn from_name(name: &str) -> Self {
        match name {
            "doc" => NodeKind::Doc,
            "paragraph" => NodeKind::Paragraph,
            "heading" => NodeKind::Heading,
            "bulletList" => NodeKind::BulletList,
            "orderedList" => NodeKind::OrderedList,
            "listItem" => NodeKind::ListItem,
            "taskList" => NodeKind::TaskList,
            "taskItem" => NodeKind::TaskItem,
            "blockquote" => NodeKind::Blockquote,
            "codeBlock" => NodeKind::CodeBlock,
            "horizontalRule" => NodeKind::HorizontalRule,
            "image" => NodeKind::Image,
            "hardBreak" => NodeKind::HardBreak,
            "table" => NodeKind::Table,
            "tableRow" => NodeKind::TableRow,
            "tableCell" => NodeKind::TableCell,
            "tableHeader" => NodeKind::TableHeader,
            "math" => NodeKind::Math,
            "text" => NodeKind::Text,
            other => NodeKind::Other(other.to_string()),
        }
    }

    /// Leaf nodes have no open/close tokens: text counts its characters,
    /// every other leaf (atom) counts as one position.
    pub fn is_leaf(&self) -> bool {
        matches!(
            self,
            NodeKind::Text
                | NodeKind::HorizontalRule
                | NodeKind::Image
                | NodeKind::HardBreak
                | NodeKind::Math
        )
    }

    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::Image | NodeKind::HardBreak | NodeKind::Math
        )
    }
}

/// A node of the document tree.
///
/// Trees are treated as immutable values once committed: editing clones the
/// committed tree into a transaction's working copy.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub attrs: Attrs,
    pub content: Vec<Node>,
    pub marks: Vec<Mark>,
    pub text: Option<String>,
}

impl Node {
    pub fn element(kind: NodeKind, content: Vec<Node>) -> Self {
        Self {
            kind,
            attrs: Attrs::new(),
            content,
            marks: Vec::new(),
            text: None,
        }
    }

    pub fn leaf(kind: NodeKind) -> Self {
        Self::element(kind, Vec::new())
    }

    pub fn doc(content: Vec<Node>) -> Self {
        Self::element(NodeKind::Doc, content)
    }

    pub fn paragraph(content: Vec<Node>) -> Self {
        Self::element(NodeKind::Paragraph, content)
    }

    pub fn heading(level: u8, content: Vec<Node>) -> Self {
        Self::element(NodeKind::Heading, content).with_attr("level", level)
    }

    pub fn text(text: &str) -> Self {
        Self::marked_text(text, Vec::new())
    }

    pub fn marked_text(text: &str, marks: Vec<Mark>) -> Self {
        Self {
            kind: NodeKind::Text,
            attrs: Attrs::new(),
            content: Vec::new(),
            marks,
            text: Some(text.to_string()),
        }
    }

    pub fn with_attr(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.to_string(), value.into());
        self
    }

    pub fn attr(&self, key: &str) -> Option<&Value> {
        self.attrs.get(key)
    }

    pub fn attr_str(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).and_then(Value::as_str)
    }

    pub fn attr_u64(&self, key: &str) -> Option<u64> {
        self.attrs.get(key).and_then(Value::as_u64)
    }

    pub fn attr_bool(&self, key: &str) -> bool {
        self.attrs.get(key).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    pub fn is_leaf(&self) -> bool {
        self.kind.is_leaf()
    }

    pub fn is_inline(&self) -> bool {
        self.kind.is_inline()
    }

    /// Text of a text node, empty for everything else
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Number of positions this node occupies in its parent
    pub fn node_size(&self) -> usize {
        if self.is_text() {
            self.text_str().chars().count()
        } else if self.is_leaf() {
            1
        } else {
            self.content_size() + 2
        }
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    /// Offset of the `index`-th child, relative to this node's content start
    pub fn child_offset(&self, index: usize) -> usize {
        self.content
            .iter()
            .take(index)
            .map(Node::node_size)
            .sum()
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        if self.is_text() {
            return self.text_str().to_string();
        }
        let mut out = String::new();
        for child in &self.content {
            out.push_str(&child.text_content());
        }
        out
    }

    /// Text between two content positions. `block_separator` is inserted
    /// between textblocks, like ProseMirror's `textBetween`.
    pub fn text_between(&self, from: usize, to: usize, block_separator: &str) -> String {
        let mut out = String::new();
        let mut separated = true;
        self.descendants(&mut |node, pos| {
            let end = pos + node.node_size();
            if end <= from || pos >= to {
                return false;
            }
            if node.is_text() {
                let start = from.saturating_sub(pos);
                let stop = (to - pos).min(node.node_size());
                out.extend(node.text_str().chars().skip(start).take(stop - start));
                separated = false;
            } else if !node.is_inline() && !node.is_leaf() && !separated {
                out.push_str(block_separator);
                separated = true;
            }
            true
        });
        out
    }

    /// Visits every descendant with its position relative to this node's
    /// content start. Returning `false` skips the node's children.
    pub fn descendants<F>(&self, f: &mut F)
    where
        F: FnMut(&Node, usize) -> bool,
    {
        self.descendants_from(0, f);
    }

    fn descendants_from<F>(&self, base: usize, f: &mut F)
    where
        F: FnMut(&Node, usize) -> bool,
    {
        let mut pos = base;
        for child in &self.content {
            if f(child, pos) && !child.is_leaf() {
                child.descendants_from(pos + 1, f);
            }
            pos += child.node_size();
        }
    }

    /// Merges adjacent text nodes with equal mark sets and drops empty ones,
    /// throughout the subtree. Keeps runs maximal after edits.
    pub fn normalize(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.content.len());
        for mut child in std::mem::take(&mut self.content) {
            if child.is_text() {
                if child.text_str().is_empty() {
                    continue;
                }
                if let Some(prev) = merged.last_mut()
                    && prev.is_text()
                    && same_set(&prev.marks, &child.marks)
                {
                    let mut text = prev.text.take().unwrap_or_default();
                    text.push_str(child.text_str());
                    prev.text = Some(text);
                    continue;
                }
            } else {
                child.normalize();
            }
            merged.push(child);
        }
        self.content = merged;
    }
}

/// Splits a string after `n` characters.
pub(crate) fn split_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((byte, _)) => s.split_at(byte),
        None => (s, ""),
    }
}
