//! Pipeline configuration.
//!
//! A JSON file in which every field is optional:
//!
//! ```json
//! {
//!   "mystem": "/usr/local/bin/mystem",
//!   "mystem_args": ["--format", "json", "-i", "-d"],
//!   "rules": "rules.json",
//!   "diminutives": "diminutives.txt"
//! }
//! ```
//!
//! Relative asset paths are resolved against the directory of the config file.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::lexicon::Lexicon;
use crate::mystem::{MystemProcess, DEFAULT_ARGS};
use crate::pipeline::Pipeline;

fn default_mystem() -> PathBuf {
    PathBuf::from("mystem")
}

fn default_mystem_args() -> Vec<String> {
    DEFAULT_ARGS.iter().map(|a| a.to_string()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// `mystem` binary, looked up on `PATH` when not a path
    #[serde(default = "default_mystem")]
    pub mystem: PathBuf,
    #[serde(default = "default_mystem_args")]
    pub mystem_args: Vec<String>,
    /// Rule tables replacing the embedded ones
    #[serde(default)]
    pub rules: Option<PathBuf>,
    /// Diminutive dictionary replacing the embedded one
    #[serde(default)]
    pub diminutives: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            mystem: default_mystem(),
            mystem_args: default_mystem_args(),
            rules: None,
            diminutives: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config file, resolving asset paths relative to it
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::Asset {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_json(&content)?;
        if let Some(base) = path.parent() {
            config.rules = config.rules.map(|p| base.join(p));
            config.diminutives = config.diminutives.map(|p| base.join(p));
        }
        tracing::debug!("loaded config {}: {:?}", path.display(), config);
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.mystem.as_os_str().is_empty() {
            return Err(Error::Config("`mystem` must not be empty".into()));
        }
        Ok(())
    }

    /// Load the configured lexicon
    pub fn lexicon(&self) -> Result<Lexicon> {
        Lexicon::load(self.rules.as_deref(), self.diminutives.as_deref())
    }

    /// Start the configured analyzer
    pub fn spawn_mystem(&self) -> Result<MystemProcess> {
        Ok(MystemProcess::spawn_with_args(&self.mystem, self.mystem_args.as_slice())?)
    }

    /// Build a pipeline backed by `mystem`
    pub fn build(&self) -> Result<Pipeline<MystemProcess>> {
        let lexicon = Arc::new(self.lexicon()?);
        Ok(Pipeline::with_lexicon(self.spawn_mystem()?, lexicon))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::from_json("{}").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.mystem_args, ["--format", "json", "-i", "-d"]);
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"mystm": "x"}"#),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn test_rejects_empty_binary() {
        assert!(matches!(
            PipelineConfig::from_json(r#"{"mystem": ""}"#),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_paths_relative_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("birch.json");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(file, r#"{{"rules": "rules.json", "mystem": "/opt/mystem"}}"#).unwrap();

        let config = PipelineConfig::from_file(&path).unwrap();
        assert_eq!(config.rules, Some(dir.path().join("rules.json")));
        assert_eq!(config.diminutives, None);
        assert_eq!(config.mystem, PathBuf::from("/opt/mystem"));
    }

    #[test]
    fn test_build_without_binary() {
        let config = PipelineConfig {
            mystem: PathBuf::from("/nonexistent/mystem"),
            ..Default::default()
        };
        assert!(matches!(config.build(), Err(Error::Analyzer(_))));
    }
}
