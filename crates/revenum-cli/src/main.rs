//! revenum - Generate model scaffolds from enum reverse-mappings
//!
//! This tool reads a compiled JavaScript bundle, recovers the model schema
//! hidden in its `e[e.Member = N]` enum reverse-mappings, and prints Rust
//! struct scaffolds annotated with type discriminants and field indices.

use anyhow::{Context, Result};
use clap::Parser;
use revenum_core::{
    build, read_artifact, EmitterConfig, Extraction, ScaffoldEmitter, Scanner, StatsWriter,
    TokenSource,
};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Generate model scaffolds from enum reverse-mappings in a compiled bundle
#[derive(Parser, Debug)]
#[command(name = "revenum")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Compiled bundle to read
    #[arg(env = "REVENUM_INPUT", default_value = "source/worker.js")]
    input: PathBuf,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Make generated structs and fields `pub`
    #[arg(long = "pub")]
    public: bool,

    /// Extra derive macro for every struct (repeatable)
    #[arg(long = "derive", value_name = "NAME")]
    derives: Vec<String>,

    /// Also emit an enum listing every model
    #[arg(
        long,
        value_name = "NAME",
        num_args = 0..=1,
        default_missing_value = "Models"
    )]
    collection: Option<String>,
}

impl Cli {
    fn emitter_config(&self) -> EmitterConfig {
        let mut config = EmitterConfig::new().public(self.public);
        for derive in &self.derives {
            config = config.derive(derive.as_str());
        }
        if let Some(name) = &self.collection {
            config = config.collection(name.as_str());
        }
        config
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for the generated code
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let output = run(&cli)?;

    let mut stdout = std::io::stdout().lock();
    stdout
        .write_all(output.as_bytes())
        .and_then(|()| stdout.flush())
        .context("Failed to write scaffolds to stdout")?;

    Ok(())
}

/// Read the bundle and render the scaffolds
fn run(cli: &Cli) -> Result<String> {
    let text = read_input(&cli.input)?;

    let extraction = build(Scanner::new().tokens(&text));
    report(&extraction);

    let emitter = ScaffoldEmitter::with_config(cli.emitter_config());

    let mut stats = StatsWriter::default();
    emitter
        .visit(extraction.models(), &mut stats)
        .context("Failed to collect schema statistics")?;
    info!(
        "Extracted {} model(s) with {} field(s) ({} without fields) from {}",
        stats.model_count,
        stats.field_count,
        stats.empty_model_count,
        cli.input.display()
    );

    Ok(emitter.render(extraction.models()))
}

fn read_input(path: &Path) -> Result<String> {
    debug!("Reading {}", path.display());
    read_artifact(path).with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Log why an extraction may be incomplete
fn report(extraction: &Extraction) {
    debug!(
        "Builder ended in {:?} ({:?}) after skipping {} header token(s)",
        extraction.phase(),
        extraction.termination(),
        extraction.skipped()
    );
    for anomaly in extraction.anomalies() {
        warn!("{}", anomaly);
    }
}
