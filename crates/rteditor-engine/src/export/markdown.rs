use serde::{Deserialize, Serialize};

use crate::export::escape::{
    TextContext, code_block_fence, code_span_fence, escape_inline, escape_line_start, escape_pipes,
};
use crate::model::{Mark, MarkKind, Node, NodeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// `Title` underlined with `=` or `-` (levels 1 and 2 only)
    Setext,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MarkdownOptions {
    /// GitHub-Flavored Markdown: tables and `~~strike~~`
    pub gfm: bool,
    pub heading_style: HeadingStyle,
    /// Backslash-escape text that Markdown would otherwise read as syntax
    pub escape: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            gfm: true,
            heading_style: HeadingStyle::Atx,
            escape: true,
        }
    }
}

/// Serializes a document tree to Markdown.
///
/// Pure function of `(doc, options)`. Unknown node types render their
/// children as blocks, or nothing when they have none.
pub fn serialize(doc: &Node, options: &MarkdownOptions) -> String {
    Serializer { options }.block(doc)
}

/// Nesting rank of formatting marks, outermost first. Code is innermost so
/// the other delimiters stay outside the code span, where they still parse.
fn mark_rank(kind: &MarkKind) -> Option<u8> {
    match kind {
        MarkKind::Link => Some(0),
        MarkKind::Bold => Some(1),
        MarkKind::Italic => Some(2),
        MarkKind::Strike => Some(3),
        MarkKind::Underline => Some(4),
        MarkKind::Subscript => Some(5),
        MarkKind::Superscript => Some(6),
        MarkKind::Code => Some(7),
        _ => None,
    }
}

fn formatting_marks(marks: &[Mark]) -> Vec<Mark> {
    let mut marks: Vec<Mark> = marks
        .iter()
        .filter(|m| mark_rank(&m.kind).is_some())
        .cloned()
        .collect();
    marks.sort_by_key(|m| mark_rank(&m.kind));
    marks
}

/// `- [x] ` or `- [ ] `, written whether or not GFM is on.
fn task_marker(item: &Node) -> String {
    let check = if item.attr_bool("checked") { 'x' } else { ' ' };
    format!("- [{check}] ")
}

/// Splits `text` into leading whitespace, core and trailing whitespace.
fn split_whitespace_edges(text: &str) -> (&str, &str, &str) {
    let trimmed_start = text.trim_start();
    let lead = &text[..text.len() - trimmed_start.len()];
    let core = trimmed_start.trim_end();
    let trail = &trimmed_start[core.len()..];
    (lead, core, trail)
}

/// A stretch of inline output sharing one set of formatting marks
struct Segment {
    text: String,
    /// Pre-rendered output (images, math, breaks) rather than raw text
    atom: bool,
    marks: Vec<Mark>,
}

struct Serializer<'a> {
    options: &'a MarkdownOptions,
}

impl Serializer<'_> {
    fn block(&self, node: &Node) -> String {
        match &node.kind {
            NodeKind::Doc => self.blocks(&node.content),
            NodeKind::Paragraph => self.paragraph(node),
            NodeKind::Heading => self.heading(node),
            NodeKind::BulletList | NodeKind::TaskList => self.list(node, |_| "- ".to_string()),
            NodeKind::OrderedList => {
                let start = node.attr_u64("start").unwrap_or(1);
                self.list(node, |index| format!("{}. ", start + index as u64))
            }
            NodeKind::ListItem => self.list_item(node, "- "),
            NodeKind::TaskItem => self.list_item(node, &task_marker(node)),
            NodeKind::Blockquote => self.blockquote(node),
            NodeKind::CodeBlock => self.code_block(node),
            NodeKind::HorizontalRule => "---".to_string(),
            NodeKind::Image => self.image(node),
            NodeKind::Math => self.math(node),
            NodeKind::Table => self.table(node),
            NodeKind::Text | NodeKind::HardBreak => {
                self.inline(std::slice::from_ref(node), TextContext::Block)
            }
            NodeKind::TableRow | NodeKind::TableCell | NodeKind::TableHeader | NodeKind::Other(_) => {
                self.blocks(&node.content)
            }
        }
    }

    fn blocks(&self, nodes: &[Node]) -> String {
        nodes
            .iter()
            .map(|node| self.block(node))
            .filter(|out| !out.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    fn escape_lines(&self, text: String) -> String {
        if !self.options.escape {
            return text;
        }
        text.split('\n')
            .map(escape_line_start)
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn paragraph(&self, node: &Node) -> String {
        self.escape_lines(self.inline(&node.content, TextContext::Block))
    }

    fn heading(&self, node: &Node) -> String {
        let level = node.attr_u64("level").unwrap_or(1).clamp(1, 6) as usize;
        let text = self.inline(&node.content, TextContext::Block);
        if self.options.heading_style == HeadingStyle::Setext && level <= 2 {
            let underline = if level == 1 { "=" } else { "-" };
            let width = text.chars().count().max(3);
            return format!("{}\n{}", self.escape_lines(text), underline.repeat(width));
        }
        format!("{} {text}", "#".repeat(level))
    }

    fn list(&self, node: &Node, marker: impl Fn(usize) -> String) -> String {
        node.content
            .iter()
            .enumerate()
            .map(|(index, item)| {
                if item.kind == NodeKind::TaskItem {
                    self.list_item(item, &task_marker(item))
                } else {
                    self.list_item(item, &marker(index))
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Renders an item's children under `marker`. Continuation lines are
    /// indented to the content column: the marker width, or two columns for
    /// task items.
    fn list_item(&self, item: &Node, marker: &str) -> String {
        let width = if marker.starts_with("- [") {
            2
        } else {
            marker.chars().count()
        };

        let mut body = String::new();
        for child in &item.content {
            let out = self.block(child);
            if out.is_empty() {
                continue;
            }
            if !body.is_empty() {
                let nested_list = matches!(
                    child.kind,
                    NodeKind::BulletList | NodeKind::OrderedList | NodeKind::TaskList
                );
                body.push_str(if nested_list { "\n" } else { "\n\n" });
            }
            body.push_str(&out);
        }
        if body.is_empty() {
            return marker.trim_end().to_string();
        }

        let indent = " ".repeat(width);
        let mut lines = body.split('\n');
        let mut out = format!("{marker}{}", lines.next().unwrap_or_default());
        for line in lines {
            out.push('\n');
            if !line.is_empty() {
                out.push_str(&indent);
                out.push_str(line);
            }
        }
        out
    }

    fn blockquote(&self, node: &Node) -> String {
        let inner = self.blocks(&node.content);
        if inner.is_empty() {
            return ">".to_string();
        }
        inner
            .split('\n')
            .map(|line| {
                if line.is_empty() {
                    ">".to_string()
                } else {
                    format!("> {line}")
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn code_block(&self, node: &Node) -> String {
        let code = node.text_content();
        let code = code.strip_suffix('\n').unwrap_or(&code);
        let language = node.attr_str("language").unwrap_or_default();
        let fence = code_block_fence(code);
        if code.is_empty() {
            format!("{fence}{language}\n{fence}")
        } else {
            format!("{fence}{language}\n{code}\n{fence}")
        }
    }

    fn image(&self, node: &Node) -> String {
        let src = node.attr_str("src").unwrap_or_default();
        let alt = node.attr_str("alt").unwrap_or_default();
        let alt = if self.options.escape {
            escape_inline(alt, TextContext::Block, false)
        } else {
            alt.to_string()
        };
        let src = if src.contains(char::is_whitespace) {
            format!("<{src}>")
        } else {
            src.to_string()
        };
        match node.attr_str("title").filter(|t| !t.is_empty()) {
            Some(title) => format!("![{alt}]({src} \"{}\")", title.replace('"', "\\\"")),
            None => format!("![{alt}]({src})"),
        }
    }

    fn math(&self, node: &Node) -> String {
        let latex = node.attr_str("latex").unwrap_or_default();
        if node.attr_bool("display") {
            format!("$$\n{latex}\n$$")
        } else {
            format!("${latex}$")
        }
    }

    /// GFM table; the first row is the header. Rows with a different cell
    /// count than the header are written as they are.
    fn table(&self, node: &Node) -> String {
        if !self.options.gfm {
            return String::new();
        }
        let rows: Vec<Vec<String>> = node
            .content
            .iter()
            .filter(|row| row.kind == NodeKind::TableRow)
            .map(|row| row.content.iter().map(|cell| self.table_cell(cell)).collect())
            .collect();
        let Some((header, body)) = rows.split_first() else {
            return String::new();
        };

        let line = |cells: &[String]| format!("| {} |", cells.join(" | "));
        let separator = vec!["---".to_string(); header.len()];
        let mut lines = vec![line(header), line(&separator)];
        lines.extend(body.iter().map(|row| line(row)));
        lines.join("\n")
    }

    fn table_cell(&self, cell: &Node) -> String {
        cell.content
            .iter()
            .map(|block| {
                if block.is_inline() {
                    self.inline(std::slice::from_ref(block), TextContext::TableCell)
                } else {
                    self.inline(&block.content, TextContext::TableCell)
                }
            })
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Renders inline content, keeping marks open across runs that share them.
    ///
    /// Adjacent text with identical formatting is merged first, so each
    /// delimiter pair wraps a maximal run, and whitespace at the edges of a
    /// run is written outside its delimiters.
    fn inline(&self, nodes: &[Node], context: TextContext) -> String {
        let segments = self.segments(nodes, context);

        let mut out = String::new();
        // Open marks, outermost first, with their closing delimiter
        let mut open: Vec<(Mark, String)> = Vec::new();
        let mut pending = String::new();

        for segment in &segments {
            let (lead, core, trail) = if segment.atom {
                ("", segment.text.as_str(), "")
            } else {
                split_whitespace_edges(&segment.text)
            };
            if core.is_empty() {
                pending.push_str(lead);
                continue;
            }

            let keep = open
                .iter()
                .zip(&segment.marks)
                .take_while(|((open_mark, _), mark)| open_mark == *mark)
                .count();
            for (_, close) in open.drain(keep..).rev() {
                out.push_str(&close);
            }
            out.push_str(&pending);
            pending.clear();
            out.push_str(lead);

            for mark in &segment.marks[keep..] {
                let (opening, closing) = self.delimiters(mark, core);
                out.push_str(&opening);
                open.push((mark.clone(), closing));
            }

            let in_code = segment.marks.iter().any(|m| m.kind == MarkKind::Code);
            if segment.atom {
                out.push_str(core);
            } else if in_code {
                match context {
                    TextContext::TableCell => out.push_str(&escape_pipes(core)),
                    TextContext::Block => out.push_str(core),
                }
            } else if self.options.escape {
                out.push_str(&escape_inline(core, context, self.options.gfm));
            } else {
                out.push_str(core);
            }
            pending.push_str(trail);
        }

        for (_, close) in open.drain(..).rev() {
            out.push_str(&close);
        }
        out.push_str(&pending);
        out
    }

    fn segments(&self, nodes: &[Node], context: TextContext) -> Vec<Segment> {
        let mut segments: Vec<Segment> = Vec::new();
        for node in nodes {
            let marks = formatting_marks(&node.marks);
            let (text, atom) = match &node.kind {
                NodeKind::Text => (node.text_str().to_string(), false),
                NodeKind::HardBreak => match context {
                    TextContext::TableCell => ("<br>".to_string(), true),
                    TextContext::Block => ("  \n".to_string(), true),
                },
                NodeKind::Image => (self.image(node), true),
                NodeKind::Math => (self.math(node), true),
                _ if node.content.is_empty() => continue,
                _ => (self.inline(&node.content, context), true),
            };

            if !atom
                && let Some(last) = segments.last_mut()
                && !last.atom
                && last.marks == marks
            {
                last.text.push_str(&text);
                continue;
            }
            segments.push(Segment { text, atom, marks });
        }
        segments
    }

    /// Opening and closing delimiters for `mark` around `core`.
    fn delimiters(&self, mark: &Mark, core: &str) -> (String, String) {
        let pair = |open: &str, close: &str| (open.to_string(), close.to_string());
        match mark.kind {
            MarkKind::Bold => pair("**", "**"),
            MarkKind::Italic => pair("*", "*"),
            MarkKind::Strike if self.options.gfm => pair("~~", "~~"),
            MarkKind::Strike => pair("<del>", "</del>"),
            MarkKind::Underline => pair("<u>", "</u>"),
            MarkKind::Subscript => pair("<sub>", "</sub>"),
            MarkKind::Superscript => pair("<sup>", "</sup>"),
            MarkKind::Code => {
                let fence = code_span_fence(core);
                if core.starts_with('`') || core.ends_with('`') {
                    (format!("{fence} "), format!(" {fence}"))
                } else {
                    (fence.clone(), fence)
                }
            }
            MarkKind::Link => {
                let href = mark.attr_str("href").unwrap_or_default();
                let href = if href.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
                    format!("<{href}>")
                } else {
                    href.to_string()
                };
                match mark.attr_str("title").filter(|t| !t.is_empty()) {
                    Some(title) => pair("[", &format!("]({href} \"{}\")", title.replace('"', "\\\""))),
                    None => pair("[", &format!("]({href})")),
                }
            }
            _ => pair("", ""),
        }
    }
}
