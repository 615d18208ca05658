//! Read-only linguistic resources shared by every pipeline of a run.

use std::path::Path;
use std::sync::Arc;

use crate::diminutive::DiminutiveDictionary;
use crate::error::Result;
use crate::rules::RuleTables;

/// Rule tables and diminutive dictionary, immutable once built
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub rules: RuleTables,
    pub diminutives: DiminutiveDictionary,
}

impl Lexicon {
    /// Combine the two assets; the rule tables' diminutive exceptions are
    /// folded into the dictionary
    pub fn new(rules: RuleTables, diminutives: DiminutiveDictionary) -> Self {
        let diminutives = diminutives.with_exceptions(&rules.diminutive_exceptions);
        Lexicon { rules, diminutives }
    }

    /// Resources embedded in the crate
    pub fn embedded() -> Self {
        Lexicon::new(RuleTables::embedded(), DiminutiveDictionary::embedded())
    }

    /// Load from files, falling back to the embedded asset for each path left out
    pub fn load(rules: Option<&Path>, diminutives: Option<&Path>) -> Result<Self> {
        let rules = match rules {
            Some(path) => RuleTables::from_file(path)?,
            None => RuleTables::embedded(),
        };
        let diminutives = match diminutives {
            Some(path) => DiminutiveDictionary::from_file(path)?,
            None => DiminutiveDictionary::embedded(),
        };
        Ok(Lexicon::new(rules, diminutives))
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
