use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::model::Node;

pub const DEFAULT_WORDS_PER_MINUTE: u32 = 200;

fn cjk_regex() -> &'static Regex {
    static CJK_REGEX: OnceLock<Regex> = OnceLock::new();
    CJK_REGEX.get_or_init(|| {
        Regex::new(
            r"[\x{4e00}-\x{9fff}\x{3400}-\x{4dbf}\x{3000}-\x{303f}\x{f900}-\x{faff}\x{2e80}-\x{2eff}\x{3040}-\x{309f}\x{30a0}-\x{30ff}\x{ac00}-\x{d7af}]",
        )
        .expect("Invalid CJK regex")
    })
}

fn sentence_regex() -> &'static Regex {
    static SENTENCE_REGEX: OnceLock<Regex> = OnceLock::new();
    SENTENCE_REGEX.get_or_init(|| Regex::new(r"[.!?。！？]+").expect("Invalid sentence regex"))
}

/// Counts words. Each CJK ideograph, kana or hangul syllable is one word;
/// the rest of the text splits on whitespace.
pub fn count_words(text: &str) -> usize {
    let cjk = cjk_regex().find_iter(text).count();
    let rest = cjk_regex().replace_all(text, " ");
    cjk + rest.split_whitespace().count()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentStats {
    pub words: usize,
    /// Characters excluding whitespace
    pub characters: usize,
    pub characters_with_spaces: usize,
    pub sentences: usize,
    /// Minutes, never less than one
    pub reading_time: usize,
}

impl DocumentStats {
    pub fn from_text(text: &str, words_per_minute: u32) -> Self {
        let words = count_words(text);
        let wpm = words_per_minute.max(1) as usize;
        Self {
            words,
            characters: text.chars().filter(|c| !c.is_whitespace()).count(),
            characters_with_spaces: text.chars().count(),
            sentences: sentence_regex()
                .split(text)
                .filter(|s| !s.trim().is_empty())
                .count(),
            reading_time: words.div_ceil(wpm).max(1),
        }
    }

    pub fn from_doc(doc: &Node, words_per_minute: u32) -> Self {
        Self::from_text(&doc.text_content(), words_per_minute)
    }
}
