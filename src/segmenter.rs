//! Utterance segmentation.
//!
//! Turns the raw transcript text of one utterance into an ordered token list:
//!
//! 1. normalise dash and break-marker spellings
//! 2. collapse every `{...}` annotation span into one unit
//! 3. cut the text at the boundaries of Cyrillic runs, punctuation marks and
//!    annotation spans
//! 4. whitespace-split every slice; a slice holding a single word goes
//!    through clitic splitting
//! 5. flag angle-bracketed tags as hidden

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeSet;
use unicode_normalization::UnicodeNormalization;

use crate::char_categories::SPAN_JOINER;
use crate::clitics::split_clitic;
use crate::token::Token;

/// Break marker spelled as a tag, in any case
static BREAK_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<break>").expect("Invalid regex"));

/// A bracketed annotation span
static CURLY_SPAN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").expect("Invalid regex"));

/// Everything that is certainly a token on its own
static SURE_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[а-яА-ЯёЁ-]+|[.,!?:+]|\{[^}]*\}").expect("Invalid regex"));

/// Canonical spelling of the break marker
pub const BREAK_MARKER: &str = "{BREAK}";

/// Prefix flagging a tag as hidden (not spoken content)
pub const HIDDEN_TAG_PREFIX: &str = "<$";

/// Apply the spelling normalisations: NFC, long dash, break marker
pub fn normalize_text(text: &str) -> String {
    let text: String = text.nfc().collect();
    let text = text.replace('\u{2013}', "-");
    BREAK_TAG.replace_all(&text, BREAK_MARKER).into_owned()
}

/// Replace whitespace inside each `{...}` span with the joiner.
///
/// `{C this is a comment}` becomes `{C_this_is_a_comment}`.
pub fn collapse_spans(text: &str) -> String {
    let joiner = SPAN_JOINER.to_string();
    CURLY_SPAN
        .replace_all(text, |caps: &regex::Captures| {
            let span = &caps[0];
            if span.chars().any(char::is_whitespace) {
                span.split_whitespace()
                    .collect::<Vec<_>>()
                    .join(joiner.as_str())
            } else {
                span.to_string()
            }
        })
        .into_owned()
}

/// Sorted byte offsets at which `text` is cut into slices.
///
/// Always contains `0` and `text.len()`; slicing between consecutive offsets
/// covers the whole text without gaps or overlaps.
pub fn boundary_offsets(text: &str) -> Vec<usize> {
    let mut offsets: BTreeSet<usize> = BTreeSet::new();
    offsets.insert(0);
    offsets.insert(text.len());
    for m in SURE_TOKEN.find_iter(text) {
        offsets.insert(m.start());
        offsets.insert(m.end());
    }
    offsets.into_iter().collect()
}

/// Rewrite `<TAG...` as `<$TAG...` unless the tag is already hidden
pub fn hide_tag(token: &str) -> Option<String> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some('<'), Some(second)) if second != '$' => {
            Some(format!("{HIDDEN_TAG_PREFIX}{}", &token[1..]))
        }
        _ => None,
    }
}

/// Segmenter for utterance text
#[derive(Debug, Clone, Copy, Default)]
pub struct Segmenter {
    /// Whether matching words are split into clitic fragments
    pub split_clitics: bool,
}

impl Segmenter {
    /// Create a segmenter with clitic splitting enabled
    pub fn new() -> Self {
        Segmenter {
            split_clitics: true,
        }
    }

    /// Segment an utterance into token strings
    pub fn segment(&self, text: &str) -> Vec<String> {
        let text = collapse_spans(&normalize_text(text));
        let offsets = boundary_offsets(&text);

        let mut tokens: Vec<String> = Vec::new();
        for window in offsets.windows(2) {
            let parts: Vec<&str> = text[window[0]..window[1]].split_whitespace().collect();
            if parts.len() == 1 && self.split_clitics {
                tokens.extend(split_clitic(parts[0]));
            } else {
                tokens.extend(parts.into_iter().map(str::to_string));
            }
        }

        for token in tokens.iter_mut() {
            if let Some(hidden) = hide_tag(token) {
                *token = hidden;
            }
        }

        tokens
    }

    /// Segment an utterance into classified tokens
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        self.segment(text).into_iter().map(Token::new).collect()
    }
}

/// Segment with the default settings
pub fn tokenize(text: &str) -> Vec<Token> {
    Segmenter::new().tokenize(text)
}
