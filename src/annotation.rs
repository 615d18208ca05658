//! Annotation records produced for each token.

use serde::{Deserialize, Serialize};

use crate::features::FeatureSet;

/// Part-of-speech codes
pub mod pos {
    /// The analyzer's own code for nouns
    pub const SUBSTANTIVE: &str = "S";
    pub const NOUN: &str = "N";
    pub const NOUN_PRONOUN: &str = "NPRO";
    pub const ADJECTIVE: &str = "A";
    pub const ADJ_PRONOUN: &str = "APRO";
    pub const ADJ_NUMERAL: &str = "ANUM";
    pub const ADVERB: &str = "ADV";
    pub const ADV_PRONOUN: &str = "ADVPRO";
    pub const VERB: &str = "V";
    pub const PREPOSITION: &str = "PR";
    pub const CONJUNCTION: &str = "CONJ";
    pub const PARTICLE: &str = "PART";
    pub const INTERJECTION: &str = "INTJ";
    pub const NUMERAL: &str = "NUM";

    /// Adjectives and adjectival pronouns/numerals
    pub fn is_adjectival(pos: &str) -> bool {
        matches!(pos, ADJECTIVE | ADJ_PRONOUN | ADJ_NUMERAL)
    }

    pub fn is_pronoun(pos: &str) -> bool {
        matches!(pos, NOUN_PRONOUN | ADJ_PRONOUN)
    }
}

/// Working analysis of one token: lemma, part of speech and features
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Analysis {
    pub lemma: String,
    pub pos: String,
    pub features: FeatureSet,
}

impl Analysis {
    pub fn new(lemma: impl Into<String>, pos: impl Into<String>, features: FeatureSet) -> Self {
        Analysis {
            lemma: lemma.into(),
            pos: pos.into(),
            features,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lemma.is_empty() && self.pos.is_empty() && self.features.is_empty()
    }
}

/// Final annotation triple handed to the document builder.
///
/// Any field may be empty; an all-empty triple marks a token that was not
/// (or could not be) analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MorphAnnotation {
    pub lemma: String,
    pub pos: String,
    /// Comma-joined feature codes
    pub features: String,
}

impl MorphAnnotation {
    pub fn is_empty(&self) -> bool {
        self.lemma.is_empty() && self.pos.is_empty() && self.features.is_empty()
    }

    /// Same annotation with English feature mnemonics
    pub fn from_analysis_english(analysis: &Analysis) -> Self {
        MorphAnnotation {
            lemma: analysis.lemma.clone(),
            pos: analysis.pos.clone(),
            features: analysis.features.to_english(),
        }
    }
}

impl From<Analysis> for MorphAnnotation {
    fn from(analysis: Analysis) -> Self {
        MorphAnnotation {
            features: analysis.features.to_string(),
            lemma: analysis.lemma,
            pos: analysis.pos,
        }
    }
}

impl std::fmt::Display for MorphAnnotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}\t{}\t{}", self.lemma, self.pos, self.features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annotation_from_analysis() {
        let analysis = Analysis::new("мама", pos::NOUN, FeatureSet::parse("жен,од=им,ед"));
        let annotation = MorphAnnotation::from(analysis.clone());
        assert_eq!(annotation.lemma, "мама");
        assert_eq!(annotation.pos, "N");
        assert_eq!(annotation.features, "жен,од,им,ед");
        assert_eq!(
            MorphAnnotation::from_analysis_english(&analysis).features,
            "f,anim,nom,sg"
        );
    }

    #[test]
    fn test_empty() {
        assert!(MorphAnnotation::default().is_empty());
        assert!(Analysis::default().is_empty());
    }

    #[test]
    fn test_pos_classes() {
        assert!(pos::is_adjectival("APRO"));
        assert!(!pos::is_adjectival("ADV"));
        assert!(pos::is_pronoun("NPRO"));
    }
}
