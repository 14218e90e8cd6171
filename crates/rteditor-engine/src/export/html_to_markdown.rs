//! Best-effort HTML → Markdown conversion.
//!
//! Substitutes a fixed set of tags (headings, bold, italic, strike, code,
//! links, images, line breaks, paragraphs, rules) and strips everything
//! else. Lossy by design: it is a fallback for pasted HTML, not a parser,
//! and does not round-trip arbitrary markup.

use std::sync::OnceLock;

use regex::{Captures, Regex};

macro_rules! cached_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static RE: OnceLock<Regex> = OnceLock::new();
            RE.get_or_init(|| Regex::new($pattern).expect(concat!("Invalid ", stringify!($name), " regex")))
        }
    };
}

cached_regex!(heading_re, r"(?is)<h([1-6])(?:\s[^>]*)?>(.*?)</h([1-6])>");
cached_regex!(bold_re, r"(?is)<(strong|b)>(.*?)</(strong|b)>");
cached_regex!(italic_re, r"(?is)<(em|i)>(.*?)</(em|i)>");
cached_regex!(strike_re, r"(?is)<(del|s|strike)>(.*?)</(del|s|strike)>");
cached_regex!(code_re, r"(?is)<code(?:\s[^>]*)?>(.*?)</code>");
cached_regex!(link_re, r#"(?is)<a\s[^>]*?href="([^"]*)"[^>]*>(.*?)</a>"#);
cached_regex!(image_re, r"(?i)<img\s[^>]*>");
cached_regex!(src_attr_re, r#"(?i)\ssrc="([^"]*)""#);
cached_regex!(alt_attr_re, r#"(?i)\salt="([^"]*)""#);
cached_regex!(break_re, r"(?i)<br\s*/?>");
cached_regex!(paragraph_re, r"(?is)<p(?:\s[^>]*)?>(.*?)</p>");
cached_regex!(rule_re, r"(?i)<hr(?:\s[^>]*)?/?>");
cached_regex!(tag_re, r"<[^>]+>");
cached_regex!(blank_lines_re, r"\n{3,}");

/// Replaces `<tag>…</tag>` pairs whose opening and closing names match.
/// Mismatched pairs are left for the final tag strip.
fn replace_paired(html: &str, re: &Regex, render: impl Fn(&str) -> String) -> String {
    re.replace_all(html, |caps: &Captures| {
        if caps[1].eq_ignore_ascii_case(&caps[3]) {
            render(&caps[2])
        } else {
            caps[0].to_string()
        }
    })
    .into_owned()
}

pub fn html_to_markdown(html: &str) -> String {
    let md = heading_re().replace_all(html, |caps: &Captures| {
        if caps[1] != caps[3] {
            return caps[0].to_string();
        }
        let level: usize = caps[1].parse().unwrap_or(1);
        format!("{} {}\n\n", "#".repeat(level), tag_re().replace_all(&caps[2], ""))
    });
    let md = replace_paired(&md, bold_re(), |inner| format!("**{inner}**"));
    let md = replace_paired(&md, italic_re(), |inner| format!("*{inner}*"));
    let md = replace_paired(&md, strike_re(), |inner| format!("~~{inner}~~"));
    let md = code_re().replace_all(&md, "`${1}`");
    let md = link_re().replace_all(&md, "[${2}](${1})");
    let md = image_re().replace_all(&md, |caps: &Captures| {
        let tag = &caps[0];
        let src = src_attr_re().captures(tag).map(|c| c[1].to_string()).unwrap_or_default();
        let alt = alt_attr_re().captures(tag).map(|c| c[1].to_string()).unwrap_or_default();
        format!("![{alt}]({src})")
    });
    let md = break_re().replace_all(&md, "  \n");
    let md = paragraph_re().replace_all(&md, "${1}\n\n");
    let md = rule_re().replace_all(&md, "---\n\n");
    let md = tag_re().replace_all(&md, "");
    let md = html_escape::decode_html_entities(&md);
    let md = blank_lines_re().replace_all(&md, "\n\n");
    md.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("<h2 class=\"x\">Title <em>here</em></h2>", "## Title here")]
    #[case("<p><strong>bold</strong> and <b>b</b></p>", "**bold** and **b**")]
    #[case("<p><em>it</em> <i>i</i> <del>gone</del> <s>x</s></p>", "*it* *i* ~~gone~~ ~~x~~")]
    #[case("<p><code>a &lt; b</code></p>", "`a < b`")]
    #[case("<a href=\"https://x.dev\">site</a>", "[site](https://x.dev)")]
    #[case("<img alt=\"cat\" src=\"/cat.png\">", "![cat](/cat.png)")]
    #[case("<hr/>", "---")]
    fn test_supported_tags(#[case] html: &str, #[case] expected: &str) {
        assert_eq!(html_to_markdown(html), expected);
    }

    #[test]
    fn test_heading_starts_its_own_block() {
        let html = "<h1>Title</h1><p>Body</p>";
        assert_eq!(html_to_markdown(html), "# Title\n\nBody");
    }

    #[test]
    fn test_paragraphs_and_breaks() {
        let html = "<p>one<br>two</p><p>three</p>";
        assert_eq!(html_to_markdown(html), "one  \ntwo\n\nthree");
    }

    #[test]
    fn test_unknown_tags_are_stripped() {
        let html = "<div><span class=\"x\">kept</span> text</div><script></script>";
        assert_eq!(html_to_markdown(html), "kept text");
    }

    #[test]
    fn test_mismatched_pairs_are_not_converted() {
        assert_eq!(html_to_markdown("<b>open</strong>"), "open");
    }

    #[test]
    fn test_pre_is_not_a_paragraph() {
        assert_eq!(html_to_markdown("<pre>code</pre>"), "code");
    }
}
