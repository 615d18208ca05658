//! Analyzer backed by a long-running `mystem` process.
//!
//! Starting the analyzer is expensive, so one child process is spawned per
//! pipeline and fed one query per line. Each input line yields one line of
//! JSON on stdout:
//!
//! ```text
//! [{"analysis":[{"lex":"мама","gr":"S,жен,од=им,ед"}],"text":"мама"},{"analysis":[...],"text":"пришла"}]
//! ```

use serde::Deserialize;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::sync::Mutex;

use crate::analyzer::{Analyzer, RawAnalysis};
use crate::error::AnalyzerError;

/// Arguments used when none are configured: JSON output, grammar info,
/// contextual disambiguation
pub const DEFAULT_ARGS: &[&str] = &["--format", "json", "-i", "-d"];

#[derive(Debug, Deserialize)]
struct WordEntry {
    #[serde(default)]
    analysis: Option<Vec<Candidate>>,
    #[allow(dead_code)]
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    lex: Option<String>,
    #[serde(default)]
    gr: Option<String>,
}

/// Extract the first candidate of the first analyzed word from one output line
pub fn parse_output_line(line: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
    let words: Vec<WordEntry> = serde_json::from_str(line.trim())?;
    let Some(candidates) = words.into_iter().find_map(|w| w.analysis) else {
        return Ok(None);
    };
    Ok(candidates.into_iter().next().map(|c| RawAnalysis {
        lemma: c.lex.unwrap_or_default(),
        tag: c.gr.map(|g| g.trim().to_string()).unwrap_or_default(),
    }))
}

struct MystemIo {
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
}

/// Handle to a running `mystem` process
pub struct MystemProcess {
    path: PathBuf,
    child: Child,
    io: Mutex<MystemIo>,
}

impl MystemProcess {
    /// Spawn `mystem` with the default arguments
    pub fn spawn(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        Self::spawn_with_args(path, DEFAULT_ARGS)
    }

    /// Spawn `mystem` with explicit arguments
    pub fn spawn_with_args<S: AsRef<str>>(
        path: impl AsRef<Path>,
        args: &[S],
    ) -> Result<Self, AnalyzerError> {
        let path = path.as_ref().to_path_buf();
        tracing::info!("starting analyzer {}", path.display());

        let mut child = Command::new(&path)
            .args(args.iter().map(|a| a.as_ref()))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|source| AnalyzerError::Spawn {
                path: path.clone(),
                source,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AnalyzerError::Protocol("analyzer stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AnalyzerError::Protocol("analyzer stdout unavailable".into()))?;

        Ok(MystemProcess {
            path,
            child,
            io: Mutex::new(MystemIo {
                stdin,
                stdout: BufReader::new(stdout),
            }),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Analyzer for MystemProcess {
    fn analyze(&self, query: &str) -> Result<Option<RawAnalysis>, AnalyzerError> {
        // one query per line
        let query = query.replace(['\n', '\r'], " ");
        if query.trim().is_empty() {
            return Ok(None);
        }

        let mut io = self
            .io
            .lock()
            .map_err(|_| AnalyzerError::Protocol("analyzer handle poisoned".into()))?;

        writeln!(io.stdin, "{}", query)?;
        io.stdin.flush()?;

        let mut line = String::new();
        if io.stdout.read_line(&mut line)? == 0 {
            return Err(AnalyzerError::Protocol("analyzer closed its output".into()));
        }
        tracing::trace!("analyzer: {:?} -> {}", query, line.trim_end());
        parse_output_line(&line)
    }
}

impl Drop for MystemProcess {
    fn drop(&mut self) {
        tracing::debug!("stopping analyzer {}", self.path.display());
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_first_candidate() {
        let line = r#"[{"analysis":[{"lex":"мама","wt":1,"gr":"S,жен,од=им,ед"}],"text":"мама"},{"analysis":[{"lex":"прийти","gr":"V,сов,нп=прош,ед,изъяв,жен"}],"text":"пришла"}]"#;
        assert_eq!(
            parse_output_line(line).unwrap(),
            Some(RawAnalysis::new("мама", "S,жен,од=им,ед"))
        );
    }

    #[test]
    fn test_parse_skips_unanalyzed_entries() {
        let line = r#"[{"text":"-"},{"analysis":[{"lex":"нибудь","gr":"PART="}],"text":"нибудь"}]"#;
        assert_eq!(
            parse_output_line(line).unwrap(),
            Some(RawAnalysis::new("нибудь", "PART="))
        );
    }

    #[test]
    fn test_parse_no_analysis() {
        assert_eq!(parse_output_line(r#"[{"analysis":[],"text":"ыыы"}]"#).unwrap(), None);
        assert_eq!(parse_output_line("[]").unwrap(), None);
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            parse_output_line("not json"),
            Err(AnalyzerError::Json(_))
        ));
    }

    #[test]
    fn test_spawn_missing_binary() {
        let result = MystemProcess::spawn("/nonexistent/path/to/mystem");
        assert!(matches!(result, Err(AnalyzerError::Spawn { .. })));
    }
}
