//! Final feature clean-up by part-of-speech class.
//!
//! Runs after the override rules and the diminutive check. Only adjectival,
//! pronominal and verbal readings are touched.

use crate::annotation::pos;
use crate::features::{
    reading_has, FeatureSet, ACCUSATIVE, FIRST_PERSON, IMPERATIVE, INANIMATE, NOMINATIVE,
    PLURAL, PREDICATIVE, SHORT_FORM,
};

/// Normalise `features` for a reading of part of speech `pos`
pub fn normalize_features(pos: &str, features: &mut FeatureSet) {
    if pos::is_adjectival(pos) || pos::is_pronoun(pos) {
        collapse_nominative_accusative(features);
        if features.contains(SHORT_FORM) {
            features.add(PREDICATIVE);
        }
    } else if pos == pos::VERB {
        resolve_imperative_disjunction(features);
    }
}

fn difference<'a>(a: &'a [String], b: &'a [String]) -> Vec<&'a str> {
    a.iter()
        .filter(|code| !reading_has(b, code))
        .map(String::as_str)
        .collect()
}

fn is_nominative_vs_inanimate_accusative(only_a: &[&str], only_b: &[&str]) -> bool {
    let mut only_b = only_b.to_vec();
    only_b.sort_unstable();
    let mut accusative = [ACCUSATIVE, INANIMATE];
    accusative.sort_unstable();
    only_a == [NOMINATIVE] && only_b == accusative
}

/// Collapse `(им,...|вин,неод,...)` into the shared codes plus `им`.
///
/// An inanimate accusative is indistinguishable from the nominative, so the
/// nominative reading wins. Returns whether the set changed.
pub fn collapse_nominative_accusative(features: &mut FeatureSet) -> bool {
    let [first, second] = features.alternatives() else {
        return false;
    };
    let only_first = difference(first, second);
    let only_second = difference(second, first);
    if !is_nominative_vs_inanimate_accusative(&only_first, &only_second)
        && !is_nominative_vs_inanimate_accusative(&only_second, &only_first)
    {
        return false;
    }

    let shared: Vec<String> = first
        .iter()
        .filter(|code| reading_has(second, code))
        .cloned()
        .collect();
    features.clear_alternatives();
    for code in shared {
        features.add(code);
    }
    features.add(NOMINATIVE);
    true
}

/// Index of the reading to keep in a two-way imperative disjunction.
///
/// Applies only when exactly one of two readings is imperative. An imperative
/// reading that is also first person plural (`пойдём!` vs `пойдём`) loses;
/// any other imperative reading wins.
pub fn imperative_choice(features: &FeatureSet) -> Option<usize> {
    let [first, second] = features.alternatives() else {
        return None;
    };
    let imperative = match (reading_has(first, IMPERATIVE), reading_has(second, IMPERATIVE)) {
        (true, false) => 0,
        (false, true) => 1,
        _ => return None,
    };
    let reading = &features.alternatives()[imperative];
    if reading_has(reading, FIRST_PERSON) && reading_has(reading, PLURAL) {
        Some(1 - imperative)
    } else {
        Some(imperative)
    }
}

/// Resolve the imperative disjunction, if there is one
pub fn resolve_imperative_disjunction(features: &mut FeatureSet) -> bool {
    let Some(keep) = imperative_choice(features) else {
        return false;
    };
    let mut index = 0;
    features.resolve(|_| {
        let hit = index == keep;
        index += 1;
        hit
    })
}
