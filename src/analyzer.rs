//! The external morphological analyzer and the adapter around it.
//!
//! The analyzer is a black box: given a query string it returns at most one
//! reading (lemma and raw tag) for the first word of the query. Tags come in
//! the analyzer's own notation, e.g. `S,жен,од=им,ед`, and are normalised
//! into a part of speech and a [`FeatureSet`] before any rule sees them.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::annotation::{pos, Analysis};
use crate::error::AnalyzerError;
use crate::features::{FeatureSet, GENITIVE_2, INDECLINABLE, PARTITIVE};

/// Top-ranked reading returned by the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RawAnalysis {
    pub lemma: String,
    /// Tag in the analyzer's notation
    pub tag: String,
}

impl RawAnalysis {
    pub fn new(lemma: impl Into<String>, tag: impl Into<String>) -> Self {
        RawAnalysis {
            lemma: lemma.into(),
            tag: tag.into(),
        }
    }
}

/// A morphological analyzer.
///
/// `Ok(None)` means the analyzer has no reading for the query, which is a
/// normal outcome.
pub trait Analyzer {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError>;
}

impl<A: Analyzer + ?Sized> Analyzer for &A {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        (**self).analyze(query)
    }
}

impl<A: Analyzer + ?Sized> Analyzer for Box<A> {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        (**self).analyze(query)
    }
}

/// In-memory analyzer backed by a lookup table.
///
/// Queries are looked up verbatim first, then by their lowercased first word.
#[derive(Debug, Clone, Default)]
pub struct StaticAnalyzer {
    entries: HashMap<String, RawAnalysis>,
}

impl StaticAnalyzer {
    pub fn new() -> Self {
        StaticAnalyzer::default()
    }

    /// Register a reading for a word or an exact query
    pub fn insert(&mut self, key: &str, lemma: &str, tag: &str) {
        self.entries
            .insert(key.to_lowercase(), RawAnalysis::new(lemma, tag));
    }

    /// Builder-style [`insert`](Self::insert)
    pub fn with(mut self, key: &str, lemma: &str, tag: &str) -> Self {
        self.insert(key, lemma, tag);
        self
    }

    /// Load `key\tlemma\ttag` lines; `#` starts a comment
    pub fn load_tsv(&mut self, tsv_content: &str) {
        for line in tsv_content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parts: Vec<&str> = line.split('\t').collect();
            if let [key, lemma, tag, ..] = parts.as_slice() {
                self.insert(key, lemma, tag);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Analyzer for StaticAnalyzer {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        let query = query.trim().to_lowercase();
        if let Some(found) = self.entries.get(&query) {
            return Ok(Some(found.clone()));
        }
        let first = query.split_whitespace().next().unwrap_or_default();
        Ok(self.entries.get(first).cloned())
    }
}

/// Analyzer backed by a closure
pub struct FnAnalyzer<F>(pub F);

impl<F> Analyzer for FnAnalyzer<F>
where
    F: Fn(&str) -> Result<Option<RawAnalysis>, AnalyzerError>,
{
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        (self.0)(query)
    }
}

/// Query the analyzer, degrading any failure to an empty reading.
///
/// `bare` is the token being analyzed; it only shows up in the logs.
pub fn analyze_raw<A: Analyzer + ?Sized>(analyzer: &A, query: &str, bare: &str) -> RawAnalysis {
    match analyzer.analyze(query) {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            tracing::debug!("no analysis for {:?} (query {:?})", bare, query);
            RawAnalysis::default()
        }
        Err(e) => {
            tracing::warn!("analyzer failed on {:?} (query {:?}): {}", bare, query, e);
            RawAnalysis::default()
        }
    }
}

/// Split a raw tag at the first `,`, `=` or `|` into part of speech and features
pub fn split_tag(tag: &str) -> (&str, &str) {
    let tag = tag.trim();
    match tag.find([',', '=', '|']) {
        Some(i) => (tag[..i].trim(), tag[i + 1..].trim()),
        None => (tag, ""),
    }
}

/// The twelve case/number readings of a word that does not decline
static INDECLINABLE_PARADIGM: Lazy<Vec<[&'static str; 2]>> = Lazy::new(|| {
    ["пр", "вин", "дат", "род", "твор", "им"]
        .iter()
        .flat_map(|case| [[*case, "мн"], [*case, "ед"]])
        .collect()
});

fn is_indeclinable_paradigm(features: &FeatureSet) -> bool {
    let readings: Vec<&[&str]> = INDECLINABLE_PARADIGM.iter().map(|r| &r[..]).collect();
    features.alternatives_equal(&readings)
}

/// Normalise a raw tag into part of speech and features.
///
/// - `S...` becomes `N...`
/// - partitive becomes genitive-2
/// - the full indeclinable case/number disjunction becomes `неиз`
pub fn normalize_tag(tag: &str) -> (String, FeatureSet) {
    let (raw_pos, raw_features) = split_tag(tag);

    let pos = match raw_pos.strip_prefix(pos::SUBSTANTIVE) {
        Some(rest) => format!("{}{}", pos::NOUN, rest),
        None => raw_pos.to_string(),
    };

    let mut features = FeatureSet::parse(raw_features);
    features.replace(PARTITIVE, GENITIVE_2);
    if is_indeclinable_paradigm(&features) {
        features.clear_alternatives();
        features.add(INDECLINABLE);
    }

    (pos, features)
}

/// Turn a raw reading into a working analysis
pub fn normalize(raw: RawAnalysis) -> Analysis {
    let (pos, features) = normalize_tag(&raw.tag);
    Analysis {
        lemma: raw.lemma,
        pos,
        features,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_tag() {
        assert_eq!(split_tag("S,жен,од=им,ед"), ("S", "жен,од=им,ед"));
        assert_eq!(split_tag("A=им,ед,полн,муж"), ("A", "им,ед,полн,муж"));
        assert_eq!(split_tag("CONJ="), ("CONJ", ""));
        assert_eq!(split_tag("PR"), ("PR", ""));
        assert_eq!(split_tag(""), ("", ""));
    }

    #[test]
    fn test_substantive_becomes_noun() {
        assert_eq!(normalize_tag("S,жен,од=им,ед").0, "N");
        assert_eq!(normalize_tag("SPRO,ед,1-л=им").0, "NPRO");
        assert_eq!(normalize_tag("ADV=").0, "ADV");
    }

    #[test]
    fn test_partitive() {
        let (_, features) = normalize_tag("S,муж,неод=парт,ед");
        assert_eq!(features.to_string(), "муж,неод,род2,ед");
    }

    #[test]
    fn test_indeclinable() {
        let tag = "S,сред,неод=(пр,мн|пр,ед|вин,мн|вин,ед|дат,мн|дат,ед|род,мн|род,ед|твор,мн|твор,ед|им,мн|им,ед)";
        let (pos, features) = normalize_tag(tag);
        assert_eq!(pos, "N");
        assert_eq!(features.to_string(), "сред,неод,неиз");
    }

    #[test]
    fn test_partial_paradigm_is_kept() {
        let (_, features) = normalize_tag("S,сред,неод=(пр,мн|пр,ед)");
        assert!(features.has_alternatives());
    }

    #[test]
    fn test_static_analyzer() {
        let analyzer = StaticAnalyzer::new()
            .with("мама", "мама", "S,жен,од=им,ед")
            .with("в комнате", "в", "PR=");
        assert_eq!(
            analyzer.analyze("Мама пришла").unwrap(),
            Some(RawAnalysis::new("мама", "S,жен,од=им,ед"))
        );
        assert_eq!(analyzer.analyze("в комнате").unwrap().unwrap().tag, "PR=");
        assert_eq!(analyzer.analyze("папа").unwrap(), None);
    }

    #[test]
    fn test_static_analyzer_tsv() {
        let mut analyzer = StaticAnalyzer::new();
        analyzer.load_tsv("# comment\nда\tда\tPART=\n\nбыть\tбыть\tV,несов,нп=инф\n");
        assert_eq!(analyzer.len(), 2);
    }

    #[test]
    fn test_failures_degrade() {
        let failing = FnAnalyzer(|_: &str| -> Result<Option<RawAnalysis>, AnalyzerError> {
            Err(AnalyzerError::Protocol("boom".into()))
        });
        assert_eq!(analyze_raw(&failing, "мама", "мама"), RawAnalysis::default());
        let empty = StaticAnalyzer::new();
        assert_eq!(analyze_raw(&empty, "мама", "мама"), RawAnalysis::default());
    }
}
