//! Per-token context.
//!
//! The analyzer is queried with a bigram (the token and its successor), which
//! helps it pick the right reading of short ambiguous forms such as `в`
//! (preposition rather than an abbreviation). A few override rules look back
//! at the two preceding tokens.

use crate::char_categories::CLITIC_MARKER;

/// Joiner left between two adjacent clitic fragments in a bigram query
pub const FRAGMENT_JOINER: &str = "@ @";

/// A token in its neighbourhood
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextualQuery<'a> {
    /// The two preceding tokens, furthest first
    pub pre_t: [Option<&'a str>; 2],
    /// The token itself
    pub token: &'a str,
    /// The following token, if any
    pub next: Option<&'a str>,
}

impl<'a> ContextualQuery<'a> {
    /// Build the context of position `i`.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn at<T: AsRef<str>>(tokens: &'a [T], i: usize) -> Self {
        let pre_t = [
            i.checked_sub(2).map(|j| tokens[j].as_ref()),
            i.checked_sub(1).map(|j| tokens[j].as_ref()),
        ];
        ContextualQuery {
            pre_t,
            token: tokens[i].as_ref(),
            next: tokens.get(i + 1).map(|t| t.as_ref()),
        }
    }

    /// The token followed by its successor, space-separated
    pub fn query(&self) -> String {
        match self.next {
            Some(next) => format!("{} {}", self.token, next),
            None => self.token.to_string(),
        }
    }

    /// The query as sent to the analyzer.
    ///
    /// Adjacent fragments are glued back together (`что@ @-нибудь` becomes
    /// `что-нибудь`) and any remaining markers are dropped.
    pub fn oracle_query(&self) -> String {
        self.query()
            .replace(FRAGMENT_JOINER, "")
            .replace(CLITIC_MARKER, "")
    }
}
