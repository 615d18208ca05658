//! Character classification for transcript text.
//!
//! Transcripts mix Cyrillic words, punctuation, annotation markup and the odd
//! foreign fragment. This module decides which characters belong to which
//! class, and which tokens are worth sending to the morphological analyzer.

/// Marker character left on both halves of a split clitic
pub const CLITIC_MARKER: char = '@';

/// Joiner that replaces whitespace inside a bracketed annotation span
pub const SPAN_JOINER: char = '_';

/// Punctuation marks that always form a token of their own
pub const PUNCTUATION: &[char] = &['.', ',', '!', '?', ':', '+'];

/// Character categories used when classifying tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CharCategory {
    /// Russian letter (either case, including ё)
    Cyrillic,
    /// Plain hyphen
    Hyphen,
    /// The clitic marker
    Marker,
    /// One of the standalone punctuation marks
    Punct,
    /// Whitespace
    Transparent,
    /// ASCII digit
    Digit,
    /// Latin letter
    Latin,
    /// Anything else
    #[default]
    Other,
}

/// Get the category of a character
pub fn get_char_category(c: char) -> CharCategory {
    if is_russian_letter(c) {
        CharCategory::Cyrillic
    } else if c == '-' {
        CharCategory::Hyphen
    } else if c == CLITIC_MARKER {
        CharCategory::Marker
    } else if PUNCTUATION.contains(&c) {
        CharCategory::Punct
    } else if c.is_whitespace() {
        CharCategory::Transparent
    } else if c.is_ascii_digit() {
        CharCategory::Digit
    } else if c.is_ascii_alphabetic() || ('\u{00C0}'..='\u{024F}').contains(&c) {
        CharCategory::Latin
    } else {
        CharCategory::Other
    }
}

/// Whether `c` is one of the 33 letters of the Russian alphabet
pub fn is_russian_letter(c: char) -> bool {
    matches!(c, 'а'..='я' | 'А'..='Я' | 'ё' | 'Ё')
}

/// Whether a token should be analyzed morphologically.
///
/// Only tokens made of Russian letters, hyphens and the clitic marker qualify,
/// and a token ending in a bare hyphen (a cut-off word) never does.
pub fn is_analyzable(token: &str) -> bool {
    if token.is_empty() || token.ends_with('-') {
        return false;
    }
    token.chars().all(|c| {
        matches!(
            get_char_category(c),
            CharCategory::Cyrillic | CharCategory::Hyphen | CharCategory::Marker
        )
    })
}

/// Whether every character of `token` is one of the standalone punctuation marks
pub fn is_punctuation(token: &str) -> bool {
    !token.is_empty() && token.chars().all(|c| PUNCTUATION.contains(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cyrillic_letters() {
        assert_eq!(get_char_category('м'), CharCategory::Cyrillic);
        assert_eq!(get_char_category('Я'), CharCategory::Cyrillic);
        assert_eq!(get_char_category('ё'), CharCategory::Cyrillic);
        assert_eq!(get_char_category('Ё'), CharCategory::Cyrillic);
    }

    #[test]
    fn test_other_categories() {
        assert_eq!(get_char_category('-'), CharCategory::Hyphen);
        assert_eq!(get_char_category('@'), CharCategory::Marker);
        assert_eq!(get_char_category('?'), CharCategory::Punct);
        assert_eq!(get_char_category(' '), CharCategory::Transparent);
        assert_eq!(get_char_category('7'), CharCategory::Digit);
        assert_eq!(get_char_category('q'), CharCategory::Latin);
        assert_eq!(get_char_category('{'), CharCategory::Other);
    }

    #[test]
    fn test_analyzable() {
        assert!(is_analyzable("мама"));
        assert!(is_analyzable("Мама"));
        assert!(is_analyzable("что@"));
        assert!(is_analyzable("@-нибудь"));
        assert!(is_analyzable("кое-@"));
        assert!(is_analyzable("ещё"));
    }

    #[test]
    fn test_not_analyzable() {
        assert!(!is_analyzable(""));
        assert!(!is_analyzable("-"));
        assert!(!is_analyzable("ма-"));
        assert!(!is_analyzable("mama"));
        assert!(!is_analyzable("{BREAK}"));
        assert!(!is_analyzable("3"));
        assert!(!is_analyzable(","));
    }

    #[test]
    fn test_trailing_hyphen_never_analyzable() {
        for token in ["а-", "@-", "кое-", "-", "мама--"] {
            assert!(!is_analyzable(token), "{token}");
        }
    }

    #[test]
    fn test_punctuation() {
        assert!(is_punctuation("?"));
        assert!(is_punctuation(","));
        assert!(!is_punctuation(""));
        assert!(!is_punctuation("а,"));
    }
}
