//! Token representation for transcript text.
//!
//! A Token is one unit of a segmented utterance: a word, a punctuation mark,
//! an annotation span, a clitic fragment or a hidden tag.

use serde::{Deserialize, Serialize};

use crate::char_categories::{is_punctuation, is_russian_letter, CLITIC_MARKER};

/// The kind of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Cyrillic word
    #[default]
    Word,
    /// Punctuation mark
    Punct,
    /// Bracketed annotation span such as `{BREAK}` or `{C_a_comment}`
    Annotation,
    /// Half of a split word, carrying the clitic marker
    Clitic,
    /// Angle-bracketed tag flagged as not spoken, e.g. `<$REP>`
    HiddenTag,
    /// Digits, Latin fragments and other leftovers
    Other,
}

fn is_dash(text: &str) -> bool {
    !text.is_empty() && text.chars().all(|c| c == '-')
}

impl TokenKind {
    /// Classify a token string
    pub fn classify(text: &str) -> Self {
        if text.contains(CLITIC_MARKER) {
            TokenKind::Clitic
        } else if text.starts_with('{') && text.ends_with('}') {
            TokenKind::Annotation
        } else if text.starts_with("<$") {
            TokenKind::HiddenTag
        } else if is_punctuation(text) || is_dash(text) {
            TokenKind::Punct
        } else if text.chars().any(is_russian_letter)
            && text.chars().all(|c| is_russian_letter(c) || c == '-')
        {
            TokenKind::Word
        } else {
            TokenKind::Other
        }
    }

    /// Convert to a string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Word => "WORD",
            TokenKind::Punct => "PUNCT",
            TokenKind::Annotation => "ANNOTATION",
            TokenKind::Clitic => "CLITIC",
            TokenKind::HiddenTag => "HIDDEN",
            TokenKind::Other => "OTHER",
        }
    }
}

/// A single token from segmentation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Token {
    /// The surface text of the token
    pub text: String,
    /// What kind of token this is
    pub kind: TokenKind,
}

impl Token {
    /// Create a token, classifying its text
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let kind = TokenKind::classify(&text);
        Token { text, kind }
    }

    pub fn is_word(&self) -> bool {
        self.kind == TokenKind::Word
    }

    pub fn is_punct(&self) -> bool {
        self.kind == TokenKind::Punct
    }

    pub fn is_clitic(&self) -> bool {
        self.kind == TokenKind::Clitic
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.text)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(TokenKind::classify("мама"), TokenKind::Word);
        assert_eq!(TokenKind::classify("кое-как"), TokenKind::Word);
        assert_eq!(TokenKind::classify(","), TokenKind::Punct);
        assert_eq!(TokenKind::classify("{BREAK}"), TokenKind::Annotation);
        assert_eq!(TokenKind::classify("{_}"), TokenKind::Annotation);
        assert_eq!(TokenKind::classify("что@"), TokenKind::Clitic);
        assert_eq!(TokenKind::classify("<$REP>"), TokenKind::HiddenTag);
        assert_eq!(TokenKind::classify("<$$REP>"), TokenKind::HiddenTag);
        assert_eq!(TokenKind::classify("42"), TokenKind::Other);
        assert_eq!(TokenKind::classify("hello"), TokenKind::Other);
    }

    #[test]
    fn test_bare_dashes_are_punctuation() {
        assert_eq!(TokenKind::classify("-"), TokenKind::Punct);
        assert_eq!(TokenKind::classify("--"), TokenKind::Punct);
        assert_eq!(TokenKind::classify("мам-"), TokenKind::Word);
        assert!(Token::new("-").is_punct());
    }

    #[test]
    fn test_token_display() {
        let token = Token::new("мама");
        assert_eq!(token.kind, TokenKind::Word);
        assert_eq!(format!("{}", token), "мама");
    }
}
