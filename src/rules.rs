//! Override rules.
//!
//! The analyzer is right most of the time, but child-directed speech is full
//! of interjections, colloquial forms and homographs it gets wrong. The rules
//! here correct it. They come in two ordered cascades:
//!
//! - the pre-oracle cascade resolves closed-form tokens outright, so the
//!   analyzer is never asked about them;
//! - the post-oracle cascade rewrites the analyzer's normalised reading.
//!
//! Within a cascade the first rule that matches fires and the rest are
//! skipped. Which words trigger which rule is data ([`RuleTables`]), loaded
//! from a versioned JSON asset.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::annotation::{pos, Analysis};
use crate::clitics::{clitic_role, particle_lemma, CliticRole};
use crate::error::{Error, Result};
use crate::features::{
    reading_has, FeatureSet, COMMON_GENDER, COORDINATING, FEMININE, IMPERFECTIVE, MASCULINE,
    NEGATION, PERFECTIVE, SUBORDINATING,
};
use crate::normalize::{imperative_choice, resolve_imperative_disjunction};

/// Rule tables shipped with the crate
static DEFAULT_RULES: &str = include_str!("data/rules.json");

static EMBEDDED: Lazy<RuleTables> =
    Lazy::new(|| RuleTables::from_json(DEFAULT_RULES).expect("Invalid embedded rule tables"));

/// A complete reading for a fixed-vocabulary token
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FixedReading {
    pub lemma: String,
    pub pos: String,
    #[serde(default)]
    pub features: String,
}

/// The conjunction that doubles as a pronoun (`что`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Homograph {
    pub lemma: String,
    /// Adverbs that make the following homograph a subordinating conjunction
    pub causal_adverbs: HashSet<String>,
    /// Reading used when no causal adverb precedes
    pub pronoun_pos: String,
    pub pronoun_features: String,
}

/// Which form a reclassification entry is compared with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchOn {
    /// The lowercased token
    #[default]
    Surface,
    /// The analyzer's lemma
    Lemma,
}

/// Part-of-speech remapping for one form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reclassification {
    pub form: String,
    #[serde(default)]
    pub match_on: MatchOn,
    pub from: String,
    pub to: String,
    /// Replacement features; the analyzer's are kept when absent
    #[serde(default)]
    pub features: Option<String>,
}

/// Lexical tables consumed by the override rules
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleTables {
    pub version: String,
    pub interjections: HashSet<String>,
    pub exceptions: HashMap<String, FixedReading>,
    pub coordinating_conjunctions: HashSet<String>,
    pub subordinating_conjunctions: HashSet<String>,
    pub homograph: Homograph,
    pub reclassifications: Vec<Reclassification>,
    pub common_gender_nouns: HashSet<String>,
    pub indeclinable_nouns: HashMap<String, String>,
    pub pronoun_cases: HashMap<String, String>,
    pub negation_particles: HashSet<String>,
    pub auxiliary_aspects: HashMap<String, String>,
    pub diminutive_exceptions: Vec<String>,
}

impl RuleTables {
    /// The tables embedded in the crate
    pub fn embedded() -> Self {
        EMBEDDED.clone()
    }

    /// Parse tables from JSON. Word keys are lowercased, as every lookup is.
    pub fn from_json(json: &str) -> Result<Self> {
        let tables: RuleTables = serde_json::from_str(json)?;
        Ok(tables.lowercased())
    }

    fn lowercased(mut self) -> Self {
        fn set(words: HashSet<String>) -> HashSet<String> {
            words.into_iter().map(|w| w.to_lowercase()).collect()
        }
        fn map<V>(entries: HashMap<String, V>) -> HashMap<String, V> {
            entries
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect()
        }

        self.interjections = set(self.interjections);
        self.exceptions = map(self.exceptions);
        self.coordinating_conjunctions = set(self.coordinating_conjunctions);
        self.subordinating_conjunctions = set(self.subordinating_conjunctions);
        self.homograph.lemma = self.homograph.lemma.to_lowercase();
        self.homograph.causal_adverbs = set(self.homograph.causal_adverbs);
        for entry in &mut self.reclassifications {
            entry.form = entry.form.to_lowercase();
        }
        self.common_gender_nouns = set(self.common_gender_nouns);
        self.indeclinable_nouns = map(self.indeclinable_nouns);
        self.pronoun_cases = map(self.pronoun_cases);
        self.negation_particles = set(self.negation_particles);
        self.auxiliary_aspects = map(self.auxiliary_aspects);
        self
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        let tables = Self::from_json(&content)?;
        tracing::info!(
            "loaded rule tables {} (version {:?})",
            path.display(),
            tables.version
        );
        Ok(tables)
    }

    /// First reclassification entry applying to `input` read as `analysis`
    pub fn reclassification_for(
        &self,
        input: &RuleInput<'_>,
        analysis: &Analysis,
    ) -> Option<&Reclassification> {
        self.reclassifications.iter().find(|entry| {
            let form = match entry.match_on {
                MatchOn::Surface => input.bare_lower,
                MatchOn::Lemma => analysis.lemma.as_str(),
            };
            entry.form == form && entry.from == analysis.pos
        })
    }

    fn is_causal_context(&self, pre_t: &[Option<&str>; 2]) -> bool {
        let is_causal = |t: Option<&str>| {
            t.map_or(false, |t| {
                self.homograph.causal_adverbs.contains(&t.to_lowercase())
            })
        };
        is_causal(pre_t[1]) || (pre_t[1] == Some(",") && is_causal(pre_t[0]))
    }
}

/// What the rules know about the token being annotated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleInput<'a> {
    /// The two preceding raw tokens, furthest first
    pub pre_t: [Option<&'a str>; 2],
    /// The token as segmented
    pub bare: &'a str,
    /// The token lowercased
    pub bare_lower: &'a str,
}

impl<'a> RuleInput<'a> {
    pub fn new(pre_t: [Option<&'a str>; 2], bare: &'a str, bare_lower: &'a str) -> Self {
        RuleInput {
            pre_t,
            bare,
            bare_lower,
        }
    }
}

/// A rule that resolves a token without asking the analyzer
#[derive(Clone, Copy)]
pub struct PreRule {
    pub name: &'static str,
    pub resolve: fn(&RuleTables, &RuleInput<'_>) -> Option<Analysis>,
}

/// A rule that rewrites the analyzer's reading
#[derive(Clone, Copy)]
pub struct PostRule {
    pub name: &'static str,
    pub matches: fn(&RuleTables, &RuleInput<'_>, &Analysis) -> bool,
    pub apply: fn(&RuleTables, &RuleInput<'_>, &mut Analysis),
}

impl std::fmt::Debug for PreRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreRule").field("name", &self.name).finish()
    }
}

impl std::fmt::Debug for PostRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostRule").field("name", &self.name).finish()
    }
}

/// Pre-oracle cascade, in priority order
pub static PRE_ORACLE_RULES: &[PreRule] = &[
    PreRule {
        name: "clitic-particle",
        resolve: clitic_particle,
    },
    PreRule {
        name: "interjection",
        resolve: interjection,
    },
    PreRule {
        name: "fixed-exception",
        resolve: fixed_exception,
    },
];

/// Post-oracle cascade, in priority order
pub static POST_ORACLE_RULES: &[PostRule] = &[
    // conjunctions
    PostRule {
        name: "conjunction-homograph",
        matches: homograph_matches,
        apply: homograph_apply,
    },
    PostRule {
        name: "coordinating-conjunction",
        matches: coordinating_matches,
        apply: coordinating_apply,
    },
    PostRule {
        name: "subordinating-conjunction",
        matches: subordinating_matches,
        apply: subordinating_apply,
    },
    // part of speech
    PostRule {
        name: "reclassification",
        matches: reclassification_matches,
        apply: reclassification_apply,
    },
    // defective and irregular paradigms
    PostRule {
        name: "common-gender-noun",
        matches: common_gender_matches,
        apply: common_gender_apply,
    },
    PostRule {
        name: "indeclinable-noun",
        matches: indeclinable_matches,
        apply: indeclinable_apply,
    },
    PostRule {
        name: "pronoun-case",
        matches: pronoun_case_matches,
        apply: pronoun_case_apply,
    },
    PostRule {
        name: "negation-particle",
        matches: negation_matches,
        apply: negation_apply,
    },
    // verbs
    PostRule {
        name: "imperative-disjunction",
        matches: imperative_matches,
        apply: imperative_apply,
    },
    PostRule {
        name: "auxiliary-aspect",
        matches: auxiliary_matches,
        apply: auxiliary_apply,
    },
];

/// Run the pre-oracle cascade
pub fn short_circuit(tables: &RuleTables, input: &RuleInput<'_>) -> Option<Analysis> {
    PRE_ORACLE_RULES.iter().find_map(|rule| {
        let analysis = (rule.resolve)(tables, input)?;
        tracing::debug!("rule {} resolved {:?}", rule.name, input.bare);
        Some(analysis)
    })
}

/// Run the post-oracle cascade.
///
/// Pure: the same input always yields the same output.
pub fn apply_overrides(
    tables: &RuleTables,
    input: &RuleInput<'_>,
    mut analysis: Analysis,
) -> Analysis {
    if let Some(rule) = POST_ORACLE_RULES
        .iter()
        .find(|rule| (rule.matches)(tables, input, &analysis))
    {
        tracing::debug!("rule {} fired on {:?}", rule.name, input.bare);
        (rule.apply)(tables, input, &mut analysis);
    }
    analysis
}

fn clitic_particle(_: &RuleTables, input: &RuleInput<'_>) -> Option<Analysis> {
    (clitic_role(input.bare_lower) == CliticRole::Particle).then(|| {
        Analysis::new(
            particle_lemma(input.bare_lower),
            pos::PARTICLE,
            FeatureSet::new(),
        )
    })
}

fn interjection(tables: &RuleTables, input: &RuleInput<'_>) -> Option<Analysis> {
    tables
        .interjections
        .contains(input.bare_lower)
        .then(|| Analysis::new(input.bare_lower, pos::INTERJECTION, FeatureSet::new()))
}

fn fixed_exception(tables: &RuleTables, input: &RuleInput<'_>) -> Option<Analysis> {
    tables.exceptions.get(input.bare_lower).map(|fixed| {
        Analysis::new(
            fixed.lemma.as_str(),
            fixed.pos.as_str(),
            FeatureSet::parse(&fixed.features),
        )
    })
}

fn is_conjunction(analysis: &Analysis) -> bool {
    analysis.pos == pos::CONJUNCTION
}

fn homograph_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    is_conjunction(analysis) && analysis.lemma == tables.homograph.lemma
}

fn homograph_apply(tables: &RuleTables, input: &RuleInput<'_>, analysis: &mut Analysis) {
    if tables.is_causal_context(&input.pre_t) {
        analysis.features.add(SUBORDINATING);
    } else {
        analysis.pos = tables.homograph.pronoun_pos.clone();
        analysis.features = FeatureSet::parse(&tables.homograph.pronoun_features);
    }
}

fn coordinating_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    is_conjunction(analysis) && tables.coordinating_conjunctions.contains(&analysis.lemma)
}

fn coordinating_apply(_: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    analysis.features.add(COORDINATING);
}

fn subordinating_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    is_conjunction(analysis) && tables.subordinating_conjunctions.contains(&analysis.lemma)
}

fn subordinating_apply(_: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    analysis.features.add(SUBORDINATING);
}

fn reclassification_matches(
    tables: &RuleTables,
    input: &RuleInput<'_>,
    analysis: &Analysis,
) -> bool {
    tables.reclassification_for(input, analysis).is_some()
}

fn reclassification_apply(tables: &RuleTables, input: &RuleInput<'_>, analysis: &mut Analysis) {
    if let Some(entry) = tables.reclassification_for(input, analysis) {
        let to = entry.to.clone();
        if let Some(features) = &entry.features {
            analysis.features = FeatureSet::parse(features);
        }
        analysis.pos = to;
    }
}

fn common_gender_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    analysis.pos == pos::NOUN && tables.common_gender_nouns.contains(&analysis.lemma)
}

fn common_gender_apply(_: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    let features = &mut analysis.features;
    features.replace(MASCULINE, COMMON_GENDER);
    features.replace(FEMININE, COMMON_GENDER);
    features.add(COMMON_GENDER);
}

fn indeclinable_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    analysis.pos == pos::NOUN && tables.indeclinable_nouns.contains_key(&analysis.lemma)
}

fn indeclinable_apply(tables: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    if let Some(features) = tables.indeclinable_nouns.get(&analysis.lemma) {
        analysis.features = FeatureSet::parse(features);
    }
}

fn pronoun_case_matches(tables: &RuleTables, input: &RuleInput<'_>, analysis: &Analysis) -> bool {
    if !pos::is_pronoun(&analysis.pos) {
        return false;
    }
    let Some(case) = tables.pronoun_cases.get(input.bare_lower) else {
        return false;
    };
    analysis
        .features
        .alternatives()
        .iter()
        .any(|reading| reading_has(reading, case))
}

fn pronoun_case_apply(tables: &RuleTables, input: &RuleInput<'_>, analysis: &mut Analysis) {
    if let Some(case) = tables.pronoun_cases.get(input.bare_lower) {
        analysis.features.resolve(|reading| reading_has(reading, case));
    }
}

fn negation_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    analysis.pos == pos::PARTICLE && tables.negation_particles.contains(&analysis.lemma)
}

fn negation_apply(_: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    analysis.features.add(NEGATION);
}

fn imperative_matches(_: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    analysis.pos == pos::VERB && imperative_choice(&analysis.features).is_some()
}

fn imperative_apply(_: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    resolve_imperative_disjunction(&mut analysis.features);
}

fn auxiliary_matches(tables: &RuleTables, _: &RuleInput<'_>, analysis: &Analysis) -> bool {
    analysis.pos == pos::VERB && tables.auxiliary_aspects.contains_key(&analysis.lemma)
}

fn auxiliary_apply(tables: &RuleTables, _: &RuleInput<'_>, analysis: &mut Analysis) {
    if let Some(aspect) = tables.auxiliary_aspects.get(&analysis.lemma) {
        analysis.features.remove(PERFECTIVE);
        analysis.features.remove(IMPERFECTIVE);
        analysis.features.add(aspect.as_str());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{normalize, RawAnalysis};

    fn analysis(lemma: &str, tag: &str) -> Analysis {
        normalize(RawAnalysis::new(lemma, tag))
    }

    fn post(pre_t: [Option<&str>; 2], bare: &str, lemma: &str, tag: &str) -> Analysis {
        let tables = RuleTables::embedded();
        let lower = bare.to_lowercase();
        let input = RuleInput::new(pre_t, bare, &lower);
        apply_overrides(&tables, &input, analysis(lemma, tag))
    }

    fn pre(bare: &str) -> Option<Analysis> {
        let tables = RuleTables::embedded();
        let lower = bare.to_lowercase();
        short_circuit(&tables, &RuleInput::new([None, None], bare, &lower))
    }

    #[test]
    fn test_embedded_tables_load() {
        let tables = RuleTables::embedded();
        assert!(!tables.version.is_empty());
        assert!(tables.interjections.contains("ой"));
        assert_eq!(tables.homograph.lemma, "что");
    }

    #[test]
    fn test_clitic_particle_short_circuits() {
        let a = pre("@-нибудь").unwrap();
        assert_eq!((a.lemma.as_str(), a.pos.as_str()), ("нибудь", "PART"));
        let a = pre("Кое-@").unwrap();
        assert_eq!(a.lemma, "кое");
    }

    #[test]
    fn test_interjection_short_circuits() {
        let a = pre("Ой").unwrap();
        assert_eq!((a.lemma.as_str(), a.pos.as_str()), ("ой", "INTJ"));
        assert!(a.features.is_empty());
    }

    #[test]
    fn test_fixed_exception() {
        let a = pre("мам").unwrap();
        assert_eq!(a.lemma, "мама");
        assert_eq!(a.features.to_string(), "жен,од,зват,ед");
        assert!(pre("мама").is_none());
    }

    #[test]
    fn test_coordinating() {
        let a = post([None, None], "и", "и", "CONJ=");
        assert_eq!(a.features.to_string(), "соч");
    }

    #[test]
    fn test_subordinating() {
        let a = post([None, None], "чтобы", "чтобы", "CONJ=");
        assert_eq!(a.pos, "CONJ");
        assert_eq!(a.features.to_string(), "подч");
    }

    #[test]
    fn test_homograph_after_causal_adverb() {
        let a = post([None, Some("потому")], "что", "что", "CONJ=");
        assert_eq!(a.pos, "CONJ");
        assert_eq!(a.features.to_string(), "подч");

        let a = post([Some("Потому"), Some(",")], "что", "что", "CONJ=");
        assert_eq!(a.pos, "CONJ");
        assert_eq!(a.features.to_string(), "подч");
    }

    #[test]
    fn test_homograph_without_context() {
        let a = post([None, None], "что", "что", "CONJ=");
        assert_eq!(a.pos, "NPRO");
        assert_eq!(a.features.to_string(), "им,ед,неод,сред");

        // a comma alone is not enough
        let a = post([Some("мама"), Some(",")], "что", "что", "CONJ=");
        assert_eq!(a.pos, "NPRO");
    }

    #[test]
    fn test_reclassification() {
        let a = post([None, None], "да", "да", "PART=");
        assert_eq!(a.pos, "INTJ");
        let a = post([None, None], "Это", "это", "PART=");
        assert_eq!(a.pos, "NPRO");
        assert_eq!(a.features.to_string(), "им,ед,неод,сред");
        // source part of speech must match
        let a = post([None, None], "да", "да", "CONJ=");
        assert_eq!(a.pos, "CONJ");
        assert_eq!(a.features.to_string(), "соч");
    }

    #[test]
    fn test_common_gender() {
        let a = post([None, None], "врач", "врач", "S,муж,од=им,ед");
        assert_eq!(a.features.to_string(), "мж,од,им,ед");
    }

    #[test]
    fn test_indeclinable_noun() {
        let a = post([None, None], "кофе", "кофе", "S,муж,неод=(вин,ед|им,ед)");
        assert_eq!(a.features.to_string(), "муж,неод,неиз");
    }

    #[test]
    fn test_pronoun_case() {
        let a = post([None, None], "меня", "я", "SPRO,ед,1-л=(вин|род)");
        assert_eq!(a.pos, "NPRO");
        assert_eq!(a.features.to_string(), "ед,1-л,вин");
    }

    #[test]
    fn test_negation() {
        let a = post([None, None], "не", "не", "PART=");
        assert_eq!(a.features.to_string(), "отрп");
    }

    #[test]
    fn test_imperative_disjunction() {
        let a = post(
            [None, None],
            "пойдем",
            "пойти",
            "V,сов,нп=(непрош,мн,изъяв,1-л|мн,пов,1-л)",
        );
        assert_eq!(a.features.to_string(), "сов,нп,непрош,мн,изъяв,1-л");
    }

    #[test]
    fn test_auxiliary_aspect() {
        let a = post([None, None], "будем", "быть", "V,сов,нп=непрош,мн,изъяв,1-л");
        assert_eq!(a.features.to_string(), "нп,непрош,мн,изъяв,1-л,несов");
    }

    #[test]
    fn test_no_rule_leaves_reading_untouched() {
        let raw = analysis("мама", "S,жен,од=им,ед");
        let tables = RuleTables::embedded();
        let input = RuleInput::new([None, None], "мама", "мама");
        assert_eq!(apply_overrides(&tables, &input, raw.clone()), raw);
    }

    #[test]
    fn test_overrides_are_deterministic() {
        let tables = RuleTables::embedded();
        let input = RuleInput::new([None, Some("потому")], "что", "что");
        let raw = analysis("что", "CONJ=");
        let first = apply_overrides(&tables, &input, raw.clone());
        let second = apply_overrides(&tables, &input, raw);
        assert_eq!(first, second);
    }

    #[test]
    fn test_partial_tables() {
        let tables = RuleTables::from_json(r#"{"interjections": ["ой"]}"#).unwrap();
        assert!(tables.exceptions.is_empty());
        let input = RuleInput::new([None, None], "и", "и");
        let a = apply_overrides(&tables, &input, analysis("и", "CONJ="));
        assert!(a.features.is_empty());
    }

    #[test]
    fn test_table_keys_are_case_insensitive() {
        let tables = RuleTables::from_json(
            r#"{
                "interjections": ["Ура"],
                "exceptions": {"Бабуль": {"lemma": "бабуля", "pos": "N", "features": "жен,од,зват,ед"}},
                "homograph": {"lemma": "что", "causal_adverbs": ["Потому"], "pronoun_pos": "NPRO"}
            }"#,
        )
        .unwrap();
        assert!(tables.interjections.contains("ура"));
        assert!(tables.exceptions.contains_key("бабуль"));

        let input = RuleInput::new([None, Some("потому")], "что", "что");
        let a = apply_overrides(&tables, &input, analysis("что", "CONJ="));
        assert_eq!(a.pos, "CONJ");
        assert_eq!(a.features.to_string(), "подч");
    }
}
