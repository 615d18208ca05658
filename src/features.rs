//! Morphological feature sets.
//!
//! The analyzer reports features as a string such as `жен,од=им,ед` or
//! `ед,1-л=(вин|род)`, where a parenthesised group lists alternative readings.
//! [`FeatureSet`] keeps the unconditional codes and the alternatives apart so
//! rules can add, remove and resolve codes without string surgery.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const NOMINATIVE: &str = "им";
pub const ACCUSATIVE: &str = "вин";
pub const PARTITIVE: &str = "парт";
pub const GENITIVE_2: &str = "род2";
pub const INDECLINABLE: &str = "неиз";
pub const SINGULAR: &str = "ед";
pub const PLURAL: &str = "мн";
pub const INANIMATE: &str = "неод";
pub const NEUTER: &str = "сред";
pub const MASCULINE: &str = "муж";
pub const FEMININE: &str = "жен";
pub const COMMON_GENDER: &str = "мж";
pub const COORDINATING: &str = "соч";
pub const SUBORDINATING: &str = "подч";
pub const DIMINUTIVE: &str = "ул";
pub const FIRST_PERSON: &str = "1-л";
pub const IMPERATIVE: &str = "пов";
pub const SHORT_FORM: &str = "кр";
pub const PREDICATIVE: &str = "прдк";
pub const PERFECTIVE: &str = "сов";
pub const IMPERFECTIVE: &str = "несов";
pub const NEGATION: &str = "отрп";

/// English mnemonic for every feature code of the annotation vocabulary
pub static FEATURE_CODES: &[(&str, &str)] = &[
    // declinability
    ("nd", "неиз"),
    // gender
    ("m", "муж"),
    ("f", "жен"),
    ("mf", "мж"),
    ("n", "сред"),
    ("mn", "мс"),
    // animacy
    ("anim", "од"),
    ("inan", "неод"),
    // number
    ("sg", "ед"),
    ("pl", "мн"),
    // case
    ("nom", "им"),
    ("gen", "род"),
    ("gen2", "род2"),
    ("dat", "дат"),
    ("acc", "вин"),
    ("acc2", "вин2"),
    ("ins", "твор"),
    ("abl", "пр"),
    ("loc", "местн"),
    ("voc", "зват"),
    ("dim", "ул"),
    // person
    ("1p", "1-л"),
    ("2p", "2-л"),
    ("3p", "3-л"),
    // adjective form
    ("brev", "кр"),
    ("plen", "полн"),
    ("poss", "притяж"),
    // degree
    ("supr", "прев"),
    ("comp", "срав"),
    // aspect
    ("ipf", "несов"),
    ("pf", "сов"),
    // transitivity
    ("tran", "пе"),
    ("intr", "нп"),
    // tense
    ("praes", "наст"),
    ("inpraes", "непрош"),
    ("praet", "прош"),
    // verb form and mood
    ("ger", "деепр"),
    ("inf", "инф"),
    ("partcp", "прич"),
    ("indic", "изъяв"),
    ("imper", "пов"),
    // voice
    ("act", "действ"),
    ("pass", "страд"),
    ("quant", "квант"),
    // conjunction type
    ("coord", "соч"),
    ("subrd", "подч"),
    // other
    ("parenth", "вводн"),
    ("geo", "гео"),
    ("persn", "имя"),
    ("obsc", "обсц"),
    ("patrn", "отч"),
    ("praed", "прдк"),
    ("abbr", "сокр"),
    ("famn", "фам"),
    ("col", "разг"),
    ("sneg", "отрп"),
    ("discr", "дискр"),
    ("anom", "аном"),
    ("posa", "впрл"),
    ("praedic", "предик"),
];

/// English mnemonic of a feature code
pub fn english_code(code: &str) -> Option<&'static str> {
    FEATURE_CODES
        .iter()
        .find(|(_, ru)| *ru == code)
        .map(|(en, _)| *en)
}

/// One reading inside a disjunction
pub type Reading = Vec<String>;

/// An ordered set of feature codes with an optional disjunction of readings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureSet {
    codes: Vec<String>,
    alternatives: Vec<Reading>,
}

fn split_codes(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split([',', '='])
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
}

fn split_readings(s: &str) -> Vec<Reading> {
    s.split('|')
        .map(|reading| split_codes(reading).collect::<Reading>())
        .filter(|reading| !reading.is_empty())
        .collect()
}

impl FeatureSet {
    pub fn new() -> Self {
        FeatureSet::default()
    }

    /// Parse a feature string in the analyzer's notation
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let mut set = FeatureSet::new();

        if let (Some(open), Some(close)) = (raw.find('('), raw.rfind(')')) {
            if open < close {
                set.extend_codes(split_codes(&raw[..open]));
                set.alternatives = split_readings(&raw[open + 1..close]);
                set.extend_codes(split_codes(&raw[close + 1..]));
                return set;
            }
        }

        if raw.contains('|') {
            let (head, tail) = match raw.rfind('=') {
                Some(eq) => (&raw[..eq], &raw[eq + 1..]),
                None => ("", raw),
            };
            set.extend_codes(split_codes(head));
            set.alternatives = split_readings(tail);
        } else {
            set.extend_codes(split_codes(raw));
        }
        set
    }

    /// Build a set from plain codes
    pub fn from_codes<I, S>(codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = FeatureSet::new();
        set.extend_codes(codes);
        set
    }

    fn extend_codes<I, S>(&mut self, codes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for code in codes {
            self.add(code);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.alternatives.is_empty()
    }

    /// Unconditional codes, in order
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    /// Alternative readings of an unresolved disjunction
    pub fn alternatives(&self) -> &[Reading] {
        &self.alternatives
    }

    pub fn has_alternatives(&self) -> bool {
        !self.alternatives.is_empty()
    }

    /// Whether `code` is among the unconditional codes
    pub fn contains(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    /// Append `code` unless already present. Returns whether it was added.
    pub fn add(&mut self, code: impl Into<String>) -> bool {
        let code = code.into();
        if self.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Remove `code`. Returns whether it was present.
    pub fn remove(&mut self, code: &str) -> bool {
        let before = self.codes.len();
        self.codes.retain(|c| c != code);
        before != self.codes.len()
    }

    /// Replace `old` with `new` everywhere, readings included.
    ///
    /// Returns whether anything changed.
    pub fn replace(&mut self, old: &str, new: &str) -> bool {
        let mut changed = false;
        if let Some(pos) = self.codes.iter().position(|c| c == old) {
            if self.contains(new) {
                self.codes.remove(pos);
            } else {
                self.codes[pos] = new.to_string();
            }
            changed = true;
        }
        for reading in self.alternatives.iter_mut() {
            for code in reading.iter_mut().filter(|c| c.as_str() == old) {
                *code = new.to_string();
                changed = true;
            }
        }
        changed
    }

    /// Drop all codes and readings
    pub fn clear(&mut self) {
        self.codes.clear();
        self.alternatives.clear();
    }

    /// Drop the disjunction, leaving the unconditional codes
    pub fn clear_alternatives(&mut self) {
        self.alternatives.clear();
    }

    /// Whether the disjunction is exactly `readings`, in order
    pub fn alternatives_equal(&self, readings: &[&[&str]]) -> bool {
        self.alternatives.len() == readings.len()
            && self
                .alternatives
                .iter()
                .zip(readings)
                .all(|(have, want)| have.len() == want.len() && have.iter().zip(*want).all(|(a, b)| a == b))
    }

    /// Keep the first reading accepted by `pick`, merging it into the codes.
    ///
    /// Returns whether a reading was picked.
    pub fn resolve<F>(&mut self, mut pick: F) -> bool
    where
        F: FnMut(&[String]) -> bool,
    {
        let Some(index) = self.alternatives.iter().position(|r| pick(r)) else {
            return false;
        };
        let reading = self.alternatives.swap_remove(index);
        self.alternatives.clear();
        self.extend_codes(reading);
        true
    }

    /// Render with English mnemonics where one exists
    pub fn to_english(&self) -> String {
        let map = |code: &String| {
            english_code(code)
                .map(str::to_string)
                .unwrap_or_else(|| code.clone())
        };
        render(
            self.codes.iter().map(map).collect(),
            self.alternatives
                .iter()
                .map(|r| r.iter().map(map).collect())
                .collect(),
        )
    }
}

fn render(codes: Vec<String>, alternatives: Vec<Reading>) -> String {
    let mut out = codes.join(",");
    if !alternatives.is_empty() {
        if !out.is_empty() {
            out.push(',');
        }
        let readings: Vec<String> = alternatives.iter().map(|r| r.join(",")).collect();
        out.push('(');
        out.push_str(&readings.join("|"));
        out.push(')');
    }
    out
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self.codes.clone(), self.alternatives.clone()))
    }
}

/// Whether a reading contains `code`
pub fn reading_has(reading: &[String], code: &str) -> bool {
    reading.iter().any(|c| c == code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain() {
        let set = FeatureSet::parse("жен,од=им,ед");
        assert_eq!(set.codes(), ["жен", "од", "им", "ед"]);
        assert!(!set.has_alternatives());
        assert_eq!(set.to_string(), "жен,од,им,ед");
    }

    #[test]
    fn test_parse_disjunction() {
        let set = FeatureSet::parse("ед,1-л=(вин|род)");
        assert_eq!(set.codes(), ["ед", "1-л"]);
        assert_eq!(set.alternatives().len(), 2);
        assert_eq!(set.to_string(), "ед,1-л,(вин|род)");
    }

    #[test]
    fn test_parse_bare_disjunction() {
        let set = FeatureSet::parse("(вин,ед,полн,муж,неод|им,ед,полн,муж)");
        assert!(set.codes().is_empty());
        assert_eq!(set.alternatives()[1], ["им", "ед", "полн", "муж"]);
    }

    #[test]
    fn test_parse_unparenthesised_disjunction() {
        let set = FeatureSet::parse("нп=прош,ед,муж|прош,ед,сред");
        assert_eq!(set.codes(), ["нп"]);
        assert_eq!(set.alternatives().len(), 2);
    }

    #[test]
    fn test_parse_empty() {
        assert!(FeatureSet::parse("").is_empty());
        assert_eq!(FeatureSet::parse("").to_string(), "");
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut set = FeatureSet::parse("ед");
        assert!(set.add("ул"));
        assert!(!set.add("ул"));
        assert_eq!(set.to_string(), "ед,ул");
    }

    #[test]
    fn test_remove_and_replace() {
        let mut set = FeatureSet::parse("муж,од=парт,ед");
        assert!(set.replace("парт", "род2"));
        assert!(set.replace("муж", "мж"));
        assert!(set.remove("од"));
        assert!(!set.remove("од"));
        assert_eq!(set.to_string(), "мж,род2,ед");
    }

    #[test]
    fn test_replace_avoids_duplicates() {
        let mut set = FeatureSet::from_codes(["муж", "мж"]);
        set.replace("муж", "мж");
        assert_eq!(set.codes(), ["мж"]);
    }

    #[test]
    fn test_resolve() {
        let mut set = FeatureSet::parse("ед,1-л=(вин|род)");
        assert!(set.resolve(|r| reading_has(r, "вин")));
        assert_eq!(set.to_string(), "ед,1-л,вин");
        assert!(!set.resolve(|_| true));
    }

    #[test]
    fn test_english() {
        let set = FeatureSet::parse("жен,од=им,ед,ул");
        assert_eq!(set.to_english(), "f,anim,nom,sg,dim");
        assert_eq!(english_code("соч"), Some("coord"));
        assert_eq!(english_code("xyz"), None);
    }

    #[test]
    fn test_vocabulary_size() {
        assert_eq!(FEATURE_CODES.len(), 60);
    }
}
