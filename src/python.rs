//! Python bindings for birch-morph using PyO3
//!
//! This module provides Python-compatible wrappers around the segmenter and
//! the annotation pipeline.

use std::path::PathBuf;
use std::sync::Arc;

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::analyzer::{Analyzer, RawAnalysis};
use crate::char_categories;
use crate::config::PipelineConfig;
use crate::error::{AnalyzerError, Error};
use crate::lexicon::Lexicon;
use crate::pipeline::Pipeline;
use crate::segmenter::Segmenter;
use crate::utterance::{AnnotatedToken, Utterance};

fn to_py_err(e: Error) -> PyErr {
    match e {
        Error::Config(_) | Error::Json(_) => PyValueError::new_err(e.to_string()),
        _ => PyRuntimeError::new_err(e.to_string()),
    }
}

/// A Python-compatible Token class
#[pyclass(name = "Token")]
#[derive(Clone)]
pub struct PyToken {
    #[pyo3(get)]
    pub text: String,
    #[pyo3(get)]
    pub kind: String,
    #[pyo3(get)]
    pub lemma: String,
    #[pyo3(get)]
    pub pos: String,
    #[pyo3(get)]
    pub features: String,
}

impl From<AnnotatedToken> for PyToken {
    fn from(t: AnnotatedToken) -> Self {
        PyToken {
            text: t.text,
            kind: t.kind.as_str().to_string(),
            lemma: t.annotation.lemma,
            pos: t.annotation.pos,
            features: t.annotation.features,
        }
    }
}

#[pymethods]
impl PyToken {
    fn __repr__(&self) -> String {
        if self.pos.is_empty() {
            format!("Token('{}', kind='{}')", self.text, self.kind)
        } else {
            format!(
                "Token('{}', lemma='{}', pos='{}', features='{}')",
                self.text, self.lemma, self.pos, self.features
            )
        }
    }

    fn __str__(&self) -> String {
        self.text.clone()
    }

    /// Whether the token got any annotation
    fn is_annotated(&self) -> bool {
        !(self.lemma.is_empty() && self.pos.is_empty() && self.features.is_empty())
    }

    /// Convert to dictionary
    fn to_dict<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let dict = PyDict::new_bound(py);
        dict.set_item("text", &self.text)?;
        dict.set_item("kind", &self.kind)?;
        dict.set_item("lemma", &self.lemma)?;
        dict.set_item("pos", &self.pos)?;
        dict.set_item("features", &self.features)?;
        Ok(dict)
    }
}

/// Analyzer backed by a Python callable.
///
/// The callable takes the query string and returns `(lemma, tag)` or `None`.
struct PyAnalyzer {
    callback: Py<PyAny>,
}

impl Analyzer for PyAnalyzer {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        Python::with_gil(|py| {
            let result = self
                .callback
                .call1(py, (query,))
                .map_err(|e| AnalyzerError::Protocol(e.to_string()))?;
            if result.is_none(py) {
                return Ok(None);
            }
            let (lemma, tag): (String, String) = result
                .extract(py)
                .map_err(|e| AnalyzerError::Protocol(e.to_string()))?;
            Ok(Some(RawAnalysis::new(lemma, tag)))
        })
    }
}

type DynAnalyzer = Box<dyn Analyzer + Send>;

/// Annotator - segments and annotates utterances
///
/// Example:
///     >>> from birch_morph import Annotator
///     >>> def oracle(query):
///     ...     return ("мама", "S,жен,од=им,ед") if query.startswith("мама") else None
///     >>> annotator = Annotator(oracle)
///     >>> for t in annotator.annotate("мама, ой!"):
///     ...     print(t.text, t.lemma, t.pos, t.features)
#[pyclass(name = "Annotator")]
pub struct PyAnnotator {
    pipeline: Pipeline<DynAnalyzer>,
}

fn load_lexicon(rules: Option<&str>, diminutives: Option<&str>) -> PyResult<Arc<Lexicon>> {
    let rules = rules.map(PathBuf::from);
    let diminutives = diminutives.map(PathBuf::from);
    Lexicon::load(rules.as_deref(), diminutives.as_deref())
        .map(Arc::new)
        .map_err(to_py_err)
}

#[pymethods]
impl PyAnnotator {
    /// Create an annotator around a Python oracle.
    ///
    /// Args:
    ///     oracle: Callable taking a query string, returning (lemma, tag) or None
    ///     rules: Path to rule tables replacing the embedded ones (optional)
    ///     diminutives: Path to a diminutive dictionary (optional)
    ///     english: Render features with English mnemonics
    #[new]
    #[pyo3(signature = (oracle, rules=None, diminutives=None, english=false))]
    fn new(
        oracle: Py<PyAny>,
        rules: Option<&str>,
        diminutives: Option<&str>,
        english: bool,
    ) -> PyResult<Self> {
        let lexicon = load_lexicon(rules, diminutives)?;
        let analyzer: DynAnalyzer = Box::new(PyAnalyzer { callback: oracle });
        Ok(PyAnnotator {
            pipeline: Pipeline::with_lexicon(analyzer, lexicon).english_features(english),
        })
    }

    /// Create an annotator driving a `mystem` process.
    ///
    /// Args:
    ///     config: Path to a JSON configuration file (optional)
    ///     english: Render features with English mnemonics
    #[staticmethod]
    #[pyo3(signature = (config=None, english=false))]
    fn with_mystem(config: Option<&str>, english: bool) -> PyResult<Self> {
        let config = match config {
            Some(path) => PipelineConfig::from_file(path).map_err(to_py_err)?,
            None => PipelineConfig::default(),
        };
        let lexicon = config.lexicon().map_err(to_py_err)?;
        let analyzer: DynAnalyzer = Box::new(config.spawn_mystem().map_err(to_py_err)?);
        Ok(PyAnnotator {
            pipeline: Pipeline::with_lexicon(analyzer, Arc::new(lexicon))
                .english_features(english),
        })
    }

    /// Segment and annotate utterance text
    fn annotate(&self, text: &str) -> Vec<PyToken> {
        self.pipeline
            .annotate_text(text)
            .into_iter()
            .map(PyToken::from)
            .collect()
    }

    /// Annotate one timed utterance; returns a dict with the utterance
    /// fields and its tokens
    #[pyo3(signature = (id, text, speaker=String::new(), begin_ms=0, end_ms=0))]
    fn annotate_utterance<'py>(
        &self,
        py: Python<'py>,
        id: String,
        text: String,
        speaker: String,
        begin_ms: u64,
        end_ms: u64,
    ) -> PyResult<Bound<'py, PyDict>> {
        let utterance = Utterance {
            id,
            speaker,
            begin_ms,
            end_ms,
            text,
        };
        let annotated = self.pipeline.annotate_utterance(&utterance);
        let dict = PyDict::new_bound(py);
        dict.set_item("begin_time", annotated.begin_time())?;
        dict.set_item("end_time", annotated.end_time())?;
        dict.set_item("id", annotated.id)?;
        dict.set_item("speaker", annotated.speaker)?;
        let tokens: Vec<PyToken> = annotated.tokens.into_iter().map(PyToken::from).collect();
        dict.set_item("tokens", tokens.into_py(py))?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "Annotator(rules='{}')",
            self.pipeline.lexicon().rules.version
        )
    }
}

/// Segment text into tokens without annotating them
///
/// Args:
///     text: Utterance text
///     split_clitics: Split indefinite and negative pronouns into fragments
///
/// Returns:
///     List of token strings
#[pyfunction]
#[pyo3(signature = (text, split_clitics=true))]
fn tokenize(text: &str, split_clitics: bool) -> Vec<String> {
    Segmenter { split_clitics }.segment(text)
}

/// Whether a token is sent to the morphological analyzer
#[pyfunction]
fn is_analyzable(token: &str) -> bool {
    char_categories::is_analyzable(token)
}

/// Create the Python module
#[pymodule]
fn birch_morph(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyToken>()?;
    m.add_class::<PyAnnotator>()?;
    m.add_function(wrap_pyfunction!(tokenize, m)?)?;
    m.add_function(wrap_pyfunction!(is_analyzable, m)?)?;

    // Add version
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;

    Ok(())
}
