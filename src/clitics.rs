//! Clitic splitting.
//!
//! Indefinite and negative pronouns are split at their morpheme boundary so
//! each half can be annotated separately:
//!
//! - `что-нибудь` -> `что@` + `@-нибудь`
//! - `кое-как` -> `кое-@` + `@как`
//! - `нигде` -> `ни@` + `@где`
//! - `некогда` -> `не@` + `@когда`
//!
//! Both halves carry the clitic marker at the attachment point. Stripping the
//! markers and concatenating the halves gives back the original word.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::char_categories::CLITIC_MARKER;

/// Stem followed by an enclitic particle
static ENCLITIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([а-яА-ЯёЁ]+)-(то|нибудь|либо)$").expect("Invalid regex"));

/// `кое-`/`кой-` followed by a stem
static KOE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([Кк]о[ей])-([а-яА-ЯёЁ]+)$").expect("Invalid regex"));

/// `ни` followed by an interrogative root
static NI_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^([Нн]и)(где|куда|когда|как|сколько|откуда|кто|кого|кому|кем|что|чего|чему|чем|",
        r"какой|какое|какая|какие|какого|каких|какому|каким|какую|какою|какими|каком|",
        r"чей|чье|чья|чьи|чьего|чьей|чьих|чьему|чьим|чью|чьею|чьими|чьем)$"
    ))
    .expect("Invalid regex")
});

/// `не` followed by an interrogative root
static NE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([Нн]е)(где|куда|когда|откуда|кого|чего|зачем)$").expect("Invalid regex")
});

/// Role of a (lowercased) token with respect to clitic splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliticRole {
    /// Not a clitic fragment
    None,
    /// Detached particle: `@-то`, `@-нибудь`, `кое-@`
    Particle,
    /// Stem the particle attached to: `что@`, `ни@`
    Host,
    /// Root following a detached prefix: `@где`, `@как`
    Tail,
}

/// Determine the clitic role of a token
pub fn clitic_role(token: &str) -> CliticRole {
    let marker_hyphen = format!("{CLITIC_MARKER}-");
    let hyphen_marker = format!("-{CLITIC_MARKER}");
    if token.starts_with(&marker_hyphen) || token.ends_with(&hyphen_marker) {
        CliticRole::Particle
    } else if token.starts_with(CLITIC_MARKER) {
        CliticRole::Tail
    } else if token.contains(CLITIC_MARKER) {
        CliticRole::Host
    } else {
        CliticRole::None
    }
}

/// Split a word into two marked fragments if it matches a clitic pattern.
///
/// Non-matching tokens are returned unchanged as a single-element list.
pub fn split_clitic(token: &str) -> Vec<String> {
    if let Some(caps) = ENCLITIC.captures(token) {
        return vec![
            format!("{}{CLITIC_MARKER}", &caps[1]),
            format!("{CLITIC_MARKER}-{}", &caps[2]),
        ];
    }
    if let Some(caps) = KOE_PREFIX.captures(token) {
        return vec![
            format!("{}-{CLITIC_MARKER}", &caps[1]),
            format!("{CLITIC_MARKER}{}", &caps[2]),
        ];
    }
    for re in [&*NI_PREFIX, &*NE_PREFIX] {
        if let Some(caps) = re.captures(token) {
            return vec![
                format!("{}{CLITIC_MARKER}", &caps[1]),
                format!("{CLITIC_MARKER}{}", &caps[2]),
            ];
        }
    }
    vec![token.to_string()]
}

/// Remove clitic markers from a fragment
pub fn strip_markers(fragment: &str) -> String {
    fragment.replace(CLITIC_MARKER, "")
}

/// Rebuild the surface word from its two fragments
pub fn rejoin(head: &str, tail: &str) -> String {
    let mut word = strip_markers(head);
    word.push_str(&strip_markers(tail));
    word
}

/// Lemma of a detached particle: markers and hyphens removed
pub fn particle_lemma(fragment: &str) -> String {
    fragment
        .chars()
        .filter(|&c| c != CLITIC_MARKER && c != '-')
        .collect()
}

/// Lemma of a host fragment: the stem without its trailing marker
pub fn host_lemma(fragment: &str) -> String {
    fragment.trim_end_matches(CLITIC_MARKER).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_enclitic() {
        assert_eq!(split_clitic("что-нибудь"), vec!["что@", "@-нибудь"]);
        assert_eq!(split_clitic("кто-то"), vec!["кто@", "@-то"]);
        assert_eq!(split_clitic("где-либо"), vec!["где@", "@-либо"]);
    }

    #[test]
    fn test_split_koe() {
        assert_eq!(split_clitic("кое-как"), vec!["кое-@", "@как"]);
        assert_eq!(split_clitic("Кой-что"), vec!["Кой-@", "@что"]);
    }

    #[test]
    fn test_split_negative_prefixes() {
        assert_eq!(split_clitic("нигде"), vec!["ни@", "@где"]);
        assert_eq!(split_clitic("Никого"), vec!["Ни@", "@кого"]);
        assert_eq!(split_clitic("некогда"), vec!["не@", "@когда"]);
        assert_eq!(split_clitic("незачем"), vec!["не@", "@зачем"]);
    }

    #[test]
    fn test_no_split() {
        assert_eq!(split_clitic("мама"), vec!["мама"]);
        // `некто` is not in the closed list for `не`
        assert_eq!(split_clitic("некто"), vec!["некто"]);
        assert_eq!(split_clitic("ниже"), vec!["ниже"]);
        assert_eq!(split_clitic("-то"), vec!["-то"]);
    }

    #[test]
    fn test_round_trip() {
        for word in ["что-нибудь", "кое-как", "нигде", "некуда", "какой-либо", "ничей"] {
            let parts = split_clitic(word);
            assert_eq!(parts.len(), 2, "{word}");
            assert_eq!(rejoin(&parts[0], &parts[1]), word);
        }
    }

    #[test]
    fn test_roles() {
        assert_eq!(clitic_role("@-нибудь"), CliticRole::Particle);
        assert_eq!(clitic_role("кое-@"), CliticRole::Particle);
        assert_eq!(clitic_role("что@"), CliticRole::Host);
        assert_eq!(clitic_role("ни@"), CliticRole::Host);
        assert_eq!(clitic_role("@где"), CliticRole::Tail);
        assert_eq!(clitic_role("мама"), CliticRole::None);
    }

    #[test]
    fn test_lemmas() {
        assert_eq!(particle_lemma("@-нибудь"), "нибудь");
        assert_eq!(particle_lemma("кое-@"), "кое");
        assert_eq!(host_lemma("что@"), "что");
    }
}
