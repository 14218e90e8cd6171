use std::sync::OnceLock;

use regex::Regex;

/// Where inline text ends up, which decides the extra characters to escape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextContext {
    Block,
    TableCell,
}

/// Escapes characters Markdown would read as inline syntax.
pub fn escape_inline(text: &str, context: TextContext, gfm: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let special = matches!(c, '\\' | '`' | '*' | '_' | '[' | ']' | '<' | '>')
            || (c == '|' && context == TextContext::TableCell)
            || (c == '~' && gfm);
        if special {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Inside a GFM table even code spans need their pipes escaped.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Escapes a block marker at the start of a serialized line (`#`, `>`, `-`,
/// `+`, `1.`, `1)`) so the line stays paragraph text.
pub fn escape_line_start(line: &str) -> String {
    static ORDERED_MARKER: OnceLock<Regex> = OnceLock::new();
    let ordered =
        ORDERED_MARKER.get_or_init(|| Regex::new(r"^(\d+)([.)])").expect("Invalid ordered marker regex"));

    if line.starts_with(['#', '>', '-', '+']) {
        format!("\\{line}")
    } else {
        ordered.replace(line, r"${1}\${2}").into_owned()
    }
}

/// Backtick fence for an inline code span: one longer than the longest run
/// of backticks inside `code`.
pub fn code_span_fence(code: &str) -> String {
    "`".repeat(longest_backtick_run(code) + 1)
}

/// Fence for a code block, at least three backticks.
pub fn code_block_fence(code: &str) -> String {
    "`".repeat((longest_backtick_run(code) + 1).max(3))
}

fn longest_backtick_run(text: &str) -> usize {
    text.split(|c| c != '`').map(str::len).max().unwrap_or(0)
}
