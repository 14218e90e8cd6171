use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::export::ExportError;
use crate::model::{Attrs, Mark, MarkKind, Node, NodeKind};

/// A mark in the stored JSON form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocMark {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
}

/// A node in the stored JSON form (`{"type": "doc", "content": [...]}`).
///
/// Plain mirror of the tree used at the serialization boundary; unknown node
/// and mark types pass through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocNode {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attrs: Option<Attrs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<DocNode>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub marks: Option<Vec<DocMark>>,
}

/// Checks the `{type: "doc", content: [...]}` envelope of a stored document.
pub fn validate_json(value: &Value) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    object.get("type").and_then(Value::as_str) == Some("doc")
        && object.get("content").is_some_and(Value::is_array)
}

impl Node {
    pub fn to_doc_node(&self) -> DocNode {
        let non_empty = |attrs: &Attrs| (!attrs.is_empty()).then(|| attrs.clone());
        DocNode {
            kind: self.kind.name().to_string(),
            attrs: non_empty(&self.attrs),
            content: (!self.is_leaf()).then(|| self.content.iter().map(Node::to_doc_node).collect()),
            text: self.text.clone(),
            marks: (!self.marks.is_empty()).then(|| {
                self.marks
                    .iter()
                    .map(|mark| DocMark {
                        kind: mark.kind.name().to_string(),
                        attrs: non_empty(&mark.attrs),
                    })
                    .collect()
            }),
        }
    }

    pub fn from_doc_node(node: &DocNode) -> Node {
        let kind = NodeKind::from_name(&node.kind);
        let marks = node
            .marks
            .iter()
            .flatten()
            .map(|mark| Mark::with_attrs(MarkKind::from_name(&mark.kind), mark.attrs.clone().unwrap_or_default()))
            .collect();
        let content = if kind.is_leaf() {
            Vec::new()
        } else {
            node.content.iter().flatten().map(Node::from_doc_node).collect()
        };
        let text = (kind == NodeKind::Text).then(|| node.text.clone().unwrap_or_default());
        Node {
            kind,
            attrs: node.attrs.clone().unwrap_or_default(),
            content,
            marks,
            text,
        }
    }
}

pub fn to_json(doc: &Node) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(&doc.to_doc_node())?)
}

/// Parses a stored document, rejecting anything that is not a `doc` envelope.
pub fn from_json(json: &str) -> Result<Node, ExportError> {
    let value: Value = serde_json::from_str(json)?;
    if !validate_json(&value) {
        return Err(ExportError::InvalidDocument(
            "expected an object with type \"doc\" and a content array".to_string(),
        ));
    }
    let node: DocNode = serde_json::from_value(value)?;
    let mut doc = Node::from_doc_node(&node);
    doc.normalize();
    Ok(doc)
}
