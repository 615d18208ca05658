//! The annotation pipeline.
//!
//! A [`Pipeline`] owns an analyzer handle and shares a [`Lexicon`]. It is
//! built once per run and then used for every utterance:
//!
//! ```text
//! text -> segment -> for each token:
//!     eligible? -> (pre-oracle rules | analyzer -> normalise tag -> post-oracle rules)
//!               -> diminutive -> feature clean-up
//! ```
//!
//! Annotating a token never fails. A token the analyzer cannot handle ends up
//! with an empty [`MorphAnnotation`].

use std::sync::Arc;

use crate::analyzer::{analyze_raw, normalize, Analyzer};
use crate::annotation::{Analysis, MorphAnnotation};
use crate::char_categories::is_analyzable;
use crate::clitics::{clitic_role, host_lemma, CliticRole};
use crate::context::ContextualQuery;
use crate::lexicon::Lexicon;
use crate::normalize::normalize_features;
use crate::rules::{apply_overrides, short_circuit, RuleInput};
use crate::segmenter::Segmenter;
use crate::token::TokenKind;
use crate::utterance::{sort_chronologically, AnnotatedToken, AnnotatedUtterance, Utterance};

/// Segmenter, analyzer and rules wired together
#[derive(Debug, Clone)]
pub struct Pipeline<A> {
    analyzer: A,
    lexicon: Arc<Lexicon>,
    segmenter: Segmenter,
    english_features: bool,
}

impl<A: Analyzer> Pipeline<A> {
    /// Pipeline over the embedded lexicon
    pub fn new(analyzer: A) -> Self {
        Self::with_lexicon(analyzer, Lexicon::embedded().shared())
    }

    pub fn with_lexicon(analyzer: A, lexicon: Arc<Lexicon>) -> Self {
        Pipeline {
            analyzer,
            lexicon,
            segmenter: Segmenter::new(),
            english_features: false,
        }
    }

    /// Render features with English mnemonics instead of the analyzer's codes
    pub fn english_features(mut self, enable: bool) -> Self {
        self.english_features = enable;
        self
    }

    pub fn segmenter(mut self, segmenter: Segmenter) -> Self {
        self.segmenter = segmenter;
        self
    }

    pub fn analyzer(&self) -> &A {
        &self.analyzer
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    /// Analyse the token at position `i` of a segmented utterance.
    ///
    /// # Panics
    ///
    /// Panics if `i` is out of bounds.
    pub fn analyze_at<T: AsRef<str>>(&self, tokens: &[T], i: usize) -> Analysis {
        let context = ContextualQuery::at(tokens, i);
        let bare = context.token;
        if !is_analyzable(bare) {
            return Analysis::default();
        }

        let bare_lower = bare.to_lowercase();
        let input = RuleInput::new(context.pre_t, bare, &bare_lower);
        let rules = &self.lexicon.rules;
        let role = clitic_role(&bare_lower);

        // pre-oracle resolutions skip only the analyzer
        if let Some(analysis) = short_circuit(rules, &input) {
            return self.finish(role, &bare_lower, analysis);
        }

        let query = context.oracle_query();
        let mut analysis = normalize(analyze_raw(&self.analyzer, &query, bare));

        if role == CliticRole::Host {
            analysis.lemma = host_lemma(&bare_lower);
        }

        let analysis = apply_overrides(rules, &input, analysis);
        self.finish(role, &bare_lower, analysis)
    }

    /// Diminutive check and feature clean-up, shared by both paths
    fn finish(&self, role: CliticRole, bare_lower: &str, mut analysis: Analysis) -> Analysis {
        if role == CliticRole::None {
            let lemma_lower = analysis.lemma.to_lowercase();
            self.lexicon.diminutives.maybe_mark_diminutive(
                bare_lower,
                &lemma_lower,
                &mut analysis.features,
            );
        }
        normalize_features(&analysis.pos, &mut analysis.features);
        analysis
    }

    fn render(&self, analysis: Analysis) -> MorphAnnotation {
        if self.english_features {
            MorphAnnotation::from_analysis_english(&analysis)
        } else {
            MorphAnnotation::from(analysis)
        }
    }

    /// Annotate an already segmented utterance, keeping token order
    pub fn annotate_tokens<T: AsRef<str>>(&self, tokens: &[T]) -> Vec<AnnotatedToken> {
        (0..tokens.len())
            .map(|i| {
                let text = tokens[i].as_ref();
                AnnotatedToken {
                    text: text.to_string(),
                    kind: TokenKind::classify(text),
                    annotation: self.render(self.analyze_at(tokens, i)),
                }
            })
            .collect()
    }

    /// Segment and annotate utterance text
    pub fn annotate_text(&self, text: &str) -> Vec<AnnotatedToken> {
        let tokens = self.segmenter.segment(text);
        tracing::debug!("segmented {:?} into {} tokens", text, tokens.len());
        self.annotate_tokens(&tokens)
    }

    /// Annotate one utterance
    pub fn annotate_utterance(&self, utterance: &Utterance) -> AnnotatedUtterance {
        AnnotatedUtterance {
            id: utterance.id.clone(),
            speaker: utterance.speaker.clone(),
            begin_ms: utterance.begin_ms,
            end_ms: utterance.end_ms,
            tokens: self.annotate_text(&utterance.text),
        }
    }

    /// Merge the utterances of all speakers into one conversation, ordered
    /// by begin then end time, and annotate each.
    pub fn annotate_conversation(
        &self,
        mut utterances: Vec<Utterance>,
    ) -> Vec<AnnotatedUtterance> {
        sort_chronologically(&mut utterances);
        utterances
            .iter()
            .map(|u| self.annotate_utterance(u))
            .collect()
    }
}
