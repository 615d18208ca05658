//! Utterance records exchanged with the transcript reader and the document
//! builder.

use serde::{Deserialize, Serialize};

use crate::annotation::MorphAnnotation;
use crate::token::TokenKind;

/// One timed segment of speech
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Utterance {
    pub id: String,
    /// Speaker (tier) key
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub begin_ms: u64,
    #[serde(default)]
    pub end_ms: u64,
    pub text: String,
}

impl Utterance {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Utterance {
            id: id.into(),
            text: text.into(),
            ..Default::default()
        }
    }

    /// Builder-style speaker and time span
    pub fn spoken_by(mut self, speaker: impl Into<String>, begin_ms: u64, end_ms: u64) -> Self {
        self.speaker = speaker.into();
        self.begin_ms = begin_ms;
        self.end_ms = end_ms;
        self
    }
}

/// Sort utterances of all speakers into one conversation, by begin then end time
pub fn sort_chronologically(utterances: &mut [Utterance]) {
    utterances.sort_by_key(|u| (u.begin_ms, u.end_ms));
}

/// Render milliseconds as `hh:mm:ss.mmm`
pub fn format_timestamp(ms: u64) -> String {
    let millis = ms % 1000;
    let secs = ms / 1000;
    format!(
        "{:02}:{:02}:{:02}.{:03}",
        secs / 3600,
        secs / 60 % 60,
        secs % 60,
        millis
    )
}

/// A token with its annotation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnotatedToken {
    pub text: String,
    pub kind: TokenKind,
    pub annotation: MorphAnnotation,
}

/// An utterance with its annotated tokens, in segmenter order
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnnotatedUtterance {
    pub id: String,
    pub speaker: String,
    pub begin_ms: u64,
    pub end_ms: u64,
    pub tokens: Vec<AnnotatedToken>,
}

impl AnnotatedUtterance {
    /// Token texts in order
    pub fn words(&self) -> Vec<&str> {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    pub fn begin_time(&self) -> String {
        format_timestamp(self.begin_ms)
    }

    pub fn end_time(&self) -> String {
        format_timestamp(self.end_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "00:00:00.000");
        assert_eq!(format_timestamp(61_005), "00:01:01.005");
        assert_eq!(format_timestamp(3_723_456), "01:02:03.456");
    }

    #[test]
    fn test_chronological_order() {
        let mut utterances = vec![
            Utterance::new("a2", "").spoken_by("CHI", 500, 900),
            Utterance::new("a1", "").spoken_by("MOT", 100, 400),
            Utterance::new("a3", "").spoken_by("MOT", 500, 700),
        ];
        sort_chronologically(&mut utterances);
        let ids: Vec<&str> = utterances.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, ["a1", "a3", "a2"]);
    }

    #[test]
    fn test_utterance_json_defaults() {
        let u: Utterance = serde_json::from_str(r#"{"id": "a1", "text": "мама"}"#).unwrap();
        assert_eq!(u, Utterance::new("a1", "мама"));
    }
}
