use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::marks::comment::{COMMENT_CLASS, RESOLVED_CLASS};
use crate::marks::stamp::STAMP_CLASS;
use crate::model::{Mark, MarkKind, Node, NodeKind};

/// Renders the document as HTML, the way the editor's `getHTML` does.
///
/// Annotation marks become `<span>`s carrying their ids, so a host can
/// restore highlights after a round trip through HTML.
pub fn to_html(doc: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, doc);
    out
}

fn write_node(out: &mut String, node: &Node) {
    match &node.kind {
        NodeKind::Doc => write_children(out, node),
        NodeKind::Text => write_text(out, node),
        NodeKind::Paragraph => wrap(out, "p", "", node),
        NodeKind::Heading => {
            let level = node.attr_u64("level").unwrap_or(1).clamp(1, 6);
            wrap(out, &format!("h{level}"), "", node);
        }
        NodeKind::BulletList => wrap(out, "ul", "", node),
        NodeKind::OrderedList => {
            let attrs = match node.attr_u64("start") {
                Some(start) if start != 1 => format!(r#" start="{start}""#),
                _ => String::new(),
            };
            wrap(out, "ol", &attrs, node);
        }
        NodeKind::ListItem => wrap(out, "li", "", node),
        NodeKind::TaskList => wrap(out, "ul", r#" data-type="taskList""#, node),
        NodeKind::TaskItem => {
            let attrs = format!(r#" data-type="taskItem" data-checked="{}""#, node.attr_bool("checked"));
            wrap(out, "li", &attrs, node);
        }
        NodeKind::Blockquote => wrap(out, "blockquote", "", node),
        NodeKind::CodeBlock => {
            out.push_str("<pre><code");
            if let Some(language) = node.attr_str("language").filter(|l| !l.is_empty()) {
                out.push_str(&format!(r#" class="language-{}""#, encode_double_quoted_attribute(language)));
            }
            out.push('>');
            out.push_str(&encode_text(&node.text_content()));
            out.push_str("</code></pre>");
        }
        NodeKind::HorizontalRule => out.push_str("<hr>"),
        NodeKind::HardBreak => out.push_str("<br>"),
        NodeKind::Image => {
            out.push_str("<img");
            for key in ["src", "alt", "title"] {
                if let Some(value) = node.attr_str(key) {
                    push_attr(out, key, value);
                }
            }
            out.push('>');
        }
        NodeKind::Math => {
            let latex = node.attr_str("latex").unwrap_or_default();
            out.push_str(r#"<span data-type="math""#);
            push_attr(out, "data-latex", latex);
            if node.attr_bool("display") {
                out.push_str(r#" data-display="true""#);
            }
            out.push('>');
            out.push_str(&encode_text(latex));
            out.push_str("</span>");
        }
        NodeKind::Table => {
            out.push_str("<table><tbody>");
            write_children(out, node);
            out.push_str("</tbody></table>");
        }
        NodeKind::TableRow => wrap(out, "tr", "", node),
        NodeKind::TableCell => wrap(out, "td", "", node),
        NodeKind::TableHeader => wrap(out, "th", "", node),
        NodeKind::Other(name) => {
            if node.content.is_empty() {
                return;
            }
            let tag = if node.content.iter().all(Node::is_inline) { "span" } else { "div" };
            wrap(out, tag, &format!(r#" data-type="{}""#, encode_double_quoted_attribute(name)), node);
        }
    }
}

fn wrap(out: &mut String, tag: &str, attrs: &str, node: &Node) {
    out.push_str(&format!("<{tag}{attrs}>"));
    write_children(out, node);
    out.push_str(&format!("</{tag}>"));
}

fn write_children(out: &mut String, node: &Node) {
    for child in &node.content {
        write_node(out, child);
    }
}

fn push_attr(out: &mut String, key: &str, value: &str) {
    out.push_str(&format!(r#" {key}="{}""#, encode_double_quoted_attribute(value)));
}

/// Annotations outermost, then formatting in the same order as Markdown export.
fn mark_order(mark: &Mark) -> u8 {
    match mark.kind {
        MarkKind::Comment | MarkKind::Stamp => 0,
        MarkKind::Highlight => 1,
        MarkKind::Link => 2,
        MarkKind::Bold => 3,
        MarkKind::Italic => 4,
        MarkKind::Strike => 5,
        MarkKind::Underline => 6,
        MarkKind::Subscript => 7,
        MarkKind::Superscript => 8,
        MarkKind::Code => 9,
        MarkKind::Other(_) => 10,
    }
}

fn write_text(out: &mut String, node: &Node) {
    let mut marks: Vec<&Mark> = node.marks.iter().collect();
    marks.sort_by_key(|m| mark_order(m));

    let mut closing = Vec::with_capacity(marks.len());
    for mark in marks {
        if let Some((open, close)) = mark_tags(mark) {
            out.push_str(&open);
            closing.push(close);
        }
    }
    out.push_str(&encode_text(node.text_str()));
    for close in closing.iter().rev() {
        out.push_str(close);
    }
}

fn mark_tags(mark: &Mark) -> Option<(String, String)> {
    let simple = |tag: &str| Some((format!("<{tag}>"), format!("</{tag}>")));
    match &mark.kind {
        MarkKind::Bold => simple("strong"),
        MarkKind::Italic => simple("em"),
        MarkKind::Strike => simple("s"),
        MarkKind::Underline => simple("u"),
        MarkKind::Code => simple("code"),
        MarkKind::Subscript => simple("sub"),
        MarkKind::Superscript => simple("sup"),
        MarkKind::Highlight => {
            let mut open = "<mark".to_string();
            if let Some(color) = mark.attr_str("color") {
                push_attr(&mut open, "data-color", color);
            }
            open.push('>');
            Some((open, "</mark>".to_string()))
        }
        MarkKind::Link => {
            let mut open = "<a".to_string();
            push_attr(&mut open, "href", mark.attr_str("href").unwrap_or_default());
            if let Some(title) = mark.attr_str("title") {
                push_attr(&mut open, "title", title);
            }
            open.push('>');
            Some((open, "</a>".to_string()))
        }
        MarkKind::Comment => {
            let class = if mark.attr_bool("resolved") {
                format!("{COMMENT_CLASS} {RESOLVED_CLASS}")
            } else {
                COMMENT_CLASS.to_string()
            };
            let mut open = "<span".to_string();
            push_attr(&mut open, "class", &class);
            push_attr(&mut open, "data-comment-id", mark.attr_str("commentId").unwrap_or_default());
            push_attr(&mut open, "data-thread-id", mark.attr_str("threadId").unwrap_or_default());
            open.push('>');
            Some((open, "</span>".to_string()))
        }
        MarkKind::Stamp => {
            let mut open = "<span".to_string();
            push_attr(&mut open, "class", STAMP_CLASS);
            for (key, attr) in [
                ("stampId", "data-stamp-id"),
                ("emoji", "data-stamp-emoji"),
                ("label", "data-stamp-label"),
                ("color", "data-stamp-color"),
            ] {
                push_attr(&mut open, attr, mark.attr_str(key).unwrap_or_default());
            }
            open.push('>');
            Some((open, "</span>".to_string()))
        }
        MarkKind::Other(_) => None,
    }
}
