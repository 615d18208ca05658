//! # birch-morph
//!
//! Tokenization and morphological annotation of Russian child-directed
//! speech transcripts.
//!
//! Utterance text is segmented into words, punctuation and annotation spans.
//! Each Cyrillic token is then analysed by an external morphological analyzer
//! (`mystem`), and the analyzer's reading is corrected by ordered override
//! rules tuned for conversational speech.
//!
//! ## Quick Start
//!
//! ```rust
//! use birch_morph::{Pipeline, StaticAnalyzer};
//!
//! // Any `Analyzer` works; `MystemProcess` drives the real analyzer
//! let analyzer = StaticAnalyzer::new().with("мама", "мама", "S,жен,од=им,ед");
//! let pipeline = Pipeline::new(analyzer);
//!
//! let tokens = pipeline.annotate_text("Мама, ой!");
//! assert_eq!(tokens[0].annotation.to_string(), "мама\tN\tжен,од,им,ед");
//! assert_eq!(tokens[2].annotation.pos, "INTJ");
//! ```
//!
//! ## Segmentation Only
//!
//! ```rust
//! use birch_morph::tokenize;
//!
//! let tokens = tokenize("что-нибудь {C laughs}");
//! let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, ["что@", "@-нибудь", "{C_laughs}"]);
//! ```
//!
//! ## Python Bindings
//!
//! Built with the `python` feature, the library is also a Python extension
//! module.

pub mod analyzer;
pub mod annotation;
pub mod char_categories;
pub mod clitics;
pub mod config;
pub mod context;
pub mod diminutive;
pub mod error;
pub mod features;
pub mod lexicon;
pub mod mystem;
pub mod normalize;
pub mod pipeline;
pub mod rules;
pub mod segmenter;
pub mod token;
pub mod utterance;

// Python bindings (only compiled when the "python" feature is enabled)
#[cfg(feature = "python")]
pub mod python;

// Re-export main types for convenience
pub use analyzer::{Analyzer, FnAnalyzer, RawAnalysis, StaticAnalyzer};
pub use annotation::{Analysis, MorphAnnotation};
pub use char_categories::{get_char_category, is_analyzable, CharCategory};
pub use clitics::split_clitic;
pub use config::PipelineConfig;
pub use context::ContextualQuery;
pub use diminutive::DiminutiveDictionary;
pub use error::{AnalyzerError, Error, Result};
pub use features::FeatureSet;
pub use lexicon::Lexicon;
pub use mystem::MystemProcess;
pub use normalize::normalize_features;
pub use pipeline::Pipeline;
pub use rules::{apply_overrides, RuleTables};
pub use segmenter::{boundary_offsets, tokenize, Segmenter};
pub use token::{Token, TokenKind};
pub use utterance::{AnnotatedToken, AnnotatedUtterance, Utterance};

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
