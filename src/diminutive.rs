//! Diminutive dictionary.
//!
//! Forms are bucketed by their first two characters, so a lookup touches one
//! small set. The dictionary is loaded once and only read afterwards.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::error::{Error, Result};
use crate::features::{FeatureSet, DIMINUTIVE};

/// Word list shipped with the crate
static DEFAULT_DIMINUTIVES: &str = include_str!("data/diminutives.txt");

/// Bucket key of a form: its first two characters
pub fn bucket_key(form: &str) -> String {
    form.chars().take(2).collect()
}

/// Diminutive forms bucketed by two-character prefix
#[derive(Debug, Clone, Default)]
pub struct DiminutiveDictionary {
    buckets: HashMap<String, HashSet<String>>,
    exceptions: HashSet<String>,
    form_count: usize,
}

impl DiminutiveDictionary {
    pub fn new() -> Self {
        DiminutiveDictionary::default()
    }

    /// The word list embedded in the crate
    pub fn embedded() -> Self {
        let mut dictionary = DiminutiveDictionary::new();
        dictionary.load_word_list(DEFAULT_DIMINUTIVES);
        dictionary
    }

    /// Build from the bucketed JSON layout, `{"ма": ["мамочка", ...], ...}`.
    ///
    /// Bucket keys are recomputed from the forms, so a mis-keyed entry is
    /// still found.
    pub fn from_json(json: &str) -> Result<Self> {
        let buckets: HashMap<String, Vec<String>> = serde_json::from_str(json)?;
        let mut dictionary = DiminutiveDictionary::new();
        for form in buckets.into_values().flatten() {
            dictionary.insert(&form);
        }
        Ok(dictionary)
    }

    /// Load a dictionary file: `.json` for the bucketed layout, a word list otherwise
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        let dictionary = if path.extension().map_or(false, |ext| ext == "json") {
            Self::from_json(&content)?
        } else {
            let mut dictionary = DiminutiveDictionary::new();
            dictionary.load_word_list(&content);
            dictionary
        };
        tracing::info!(
            "loaded {} diminutive forms from {}",
            dictionary.len(),
            path.display()
        );
        Ok(dictionary)
    }

    /// Add forms from a word list: one per line, first tab-separated column,
    /// `#` starts a comment
    pub fn load_word_list(&mut self, content: &str) {
        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some(form) = line.split('\t').next() {
                self.insert(form);
            }
        }
    }

    /// Add a form. Returns whether it was new.
    pub fn insert(&mut self, form: &str) -> bool {
        let form = form.trim().to_lowercase();
        if form.is_empty() {
            return false;
        }
        let added = self
            .buckets
            .entry(bucket_key(&form))
            .or_default()
            .insert(form);
        if added {
            self.form_count += 1;
        }
        added
    }

    /// Forms that count as diminutive whatever the dictionary says
    pub fn with_exceptions<I, S>(mut self, exceptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exceptions
            .extend(exceptions.into_iter().map(|e| e.as_ref().to_lowercase()));
        self
    }

    /// Whether `form` (lowercase) is a known diminutive
    pub fn contains(&self, form: &str) -> bool {
        if form.is_empty() {
            return false;
        }
        self.exceptions.contains(form)
            || self
                .buckets
                .get(&bucket_key(form))
                .map_or(false, |bucket| bucket.contains(form))
    }

    /// Append the diminutive code when the token or its lemma is a known
    /// diminutive.
    ///
    /// Never adds the code twice. Returns whether it was added.
    pub fn maybe_mark_diminutive(
        &self,
        bare_lower: &str,
        lemma_lower: &str,
        features: &mut FeatureSet,
    ) -> bool {
        if self.contains(bare_lower) || self.contains(lemma_lower) {
            features.add(DIMINUTIVE)
        } else {
            false
        }
    }

    /// Number of dictionary forms, exceptions excluded
    pub fn len(&self) -> usize {
        self.form_count
    }

    pub fn is_empty(&self) -> bool {
        self.form_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_bucket_key() {
        assert_eq!(bucket_key("мамочка"), "ма");
        assert_eq!(bucket_key("я"), "я");
        assert_eq!(bucket_key(""), "");
    }

    #[test]
    fn test_embedded() {
        let dictionary = DiminutiveDictionary::embedded();
        assert!(!dictionary.is_empty());
        assert!(dictionary.contains("зайчик"));
        assert!(!dictionary.contains("заяц"));
        assert!(!dictionary.contains(""));
    }

    #[test]
    fn test_mark_is_monotonic() {
        let dictionary = DiminutiveDictionary::embedded();
        let mut features = FeatureSet::parse("муж,од=им,ед");
        assert!(dictionary.maybe_mark_diminutive("зайчик", "зайчик", &mut features));
        assert!(!dictionary.maybe_mark_diminutive("зайчик", "зайчик", &mut features));
        assert_eq!(features.to_string(), "муж,од,им,ед,ул");
    }

    #[test]
    fn test_mark_by_lemma() {
        let dictionary = DiminutiveDictionary::new().with_exceptions(["Мамуля"]);
        let mut features = FeatureSet::new();
        assert!(dictionary.maybe_mark_diminutive("мамулей", "мамуля", &mut features));
        assert_eq!(features.to_string(), "ул");
    }

    #[test]
    fn test_unknown_form_untouched() {
        let dictionary = DiminutiveDictionary::embedded();
        let mut features = FeatureSet::parse("жен,од=им,ед");
        assert!(!dictionary.maybe_mark_diminutive("мама", "мама", &mut features));
        assert_eq!(features.to_string(), "жен,од,им,ед");
    }

    #[test]
    fn test_word_list() {
        let mut dictionary = DiminutiveDictionary::new();
        dictionary.load_word_list("# forms\nКотик\tnoun\n\nкотик\nножка\n");
        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.contains("котик"));
    }

    #[test]
    fn test_json_layout() {
        let dictionary =
            DiminutiveDictionary::from_json(r#"{"ко": ["котик", "котёнок"], "xx": ["ножка"]}"#)
                .unwrap();
        assert_eq!(dictionary.len(), 3);
        assert!(dictionary.contains("котёнок"));
        assert!(dictionary.contains("ножка"));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        writeln!(file, "рыбка\nптичка").unwrap();
        let dictionary = DiminutiveDictionary::from_file(file.path()).unwrap();
        assert!(dictionary.contains("птичка"));

        let missing = DiminutiveDictionary::from_file("/nonexistent/diminutives.txt");
        assert!(matches!(missing, Err(Error::Asset { .. })));
    }
}
