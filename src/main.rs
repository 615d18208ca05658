//! Command-line interface for birch-morph
//!
//! Usage:
//!   birch [OPTIONS] [TEXT]
//!   echo "Мама пришла." | birch
//!   birch --utterances < utterances.jsonl    # printed in time order
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`.

use birch_morph::{
    Analyzer, AnnotatedToken, AnnotatedUtterance, Error, Pipeline, PipelineConfig, Segmenter,
    Token, Utterance,
};
use clap::{Parser, ValueEnum};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum OutputFormat {
    /// One `token<TAB>lemma<TAB>pos<TAB>features` line per token
    Tsv,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "birch", version)]
#[command(about = "Tokenize and morphologically annotate Russian speech transcripts")]
struct Cli {
    /// Text to annotate; lines are read from stdin when omitted
    text: Option<String>,

    /// Configuration file
    #[arg(short, long, env = "BIRCH_CONFIG")]
    config: Option<PathBuf>,

    /// Path to the mystem binary (overrides the config file)
    #[arg(long, env = "BIRCH_MYSTEM")]
    mystem: Option<PathBuf>,

    /// Rule tables (overrides the config file)
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Diminutive dictionary (overrides the config file)
    #[arg(long)]
    diminutives: Option<PathBuf>,

    /// Read JSON-lines utterances (`{"id", "speaker", "begin_ms", "end_ms", "text"}`)
    #[arg(short, long)]
    utterances: bool,

    /// Only segment, without morphological analysis
    #[arg(short, long)]
    segment_only: bool,

    /// Render features with English mnemonics
    #[arg(short, long)]
    english: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tsv")]
    format: OutputFormat,
}

fn load_config(cli: &Cli) -> Result<PipelineConfig, Error> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(mystem) = &cli.mystem {
        config.mystem = mystem.clone();
    }
    if let Some(rules) = &cli.rules {
        config.rules = Some(rules.clone());
    }
    if let Some(diminutives) = &cli.diminutives {
        config.diminutives = Some(diminutives.clone());
    }
    Ok(config)
}

fn input_lines(cli: &Cli) -> Result<Vec<String>, Error> {
    match &cli.text {
        Some(text) => Ok(vec![text.clone()]),
        None => Ok(io::stdin().lock().lines().collect::<Result<_, _>>()?),
    }
}

fn print_segments(cli: &Cli, lines: &[String], out: &mut impl Write) -> Result<(), Error> {
    let segmenter = Segmenter::new();
    for line in lines {
        let tokens: Vec<Token> = segmenter.tokenize(line);
        match cli.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&tokens)?)?,
            OutputFormat::Tsv => {
                for token in &tokens {
                    writeln!(out, "{}\t{}", token.text, token.kind.as_str())?;
                }
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

fn print_tokens(tokens: &[AnnotatedToken], out: &mut impl Write) -> io::Result<()> {
    for token in tokens {
        writeln!(out, "{}\t{}", token.text, token.annotation)?;
    }
    writeln!(out)
}

fn print_utterance(
    cli: &Cli,
    annotated: &AnnotatedUtterance,
    out: &mut impl Write,
) -> Result<(), Error> {
    match cli.format {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(annotated)?)?,
        OutputFormat::Tsv => {
            writeln!(
                out,
                "# {} {} {}-{}",
                annotated.id,
                annotated.speaker,
                annotated.begin_time(),
                annotated.end_time()
            )?;
            print_tokens(&annotated.tokens, out)?;
        }
    }
    Ok(())
}

fn annotate<A: Analyzer>(
    cli: &Cli,
    pipeline: &Pipeline<A>,
    lines: &[String],
    out: &mut impl Write,
) -> Result<(), Error> {
    let lines = lines.iter().filter(|l| !l.trim().is_empty());
    if cli.utterances {
        let utterances = lines
            .map(|line| serde_json::from_str::<Utterance>(line))
            .collect::<Result<Vec<_>, _>>()?;
        for annotated in pipeline.annotate_conversation(utterances) {
            print_utterance(cli, &annotated, out)?;
        }
        return Ok(());
    }

    for line in lines {
        let tokens = pipeline.annotate_text(line);
        match cli.format {
            OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(&tokens)?)?,
            OutputFormat::Tsv => print_tokens(&tokens, out)?,
        }
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Error> {
    let lines = input_lines(cli)?;
    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    if cli.segment_only {
        print_segments(cli, &lines, &mut out)?;
    } else {
        let config = load_config(cli)?;
        let pipeline = config.build()?.english_features(cli.english);
        annotate(cli, &pipeline, &lines, &mut out)?;
    }
    out.flush()?;
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
