//! CLI binary for htmltomd.
//!
//! A thin shim over the library crate: reads one HTML file, converts it and
//! writes the Markdown next to it (or to the given path).

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use htmltomd::{check_size, Converter, ConverterOptions};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Default input size ceiling, in megabytes
const DEFAULT_MAX_SIZE_MB: u64 = 50;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Write livro.md next to the input
  htmltomd livro.html

  # Choose the output path
  htmltomd livro.html saida/livro.md

  # Allow larger inputs
  htmltomd --max-size-mb 200 grande.html
"#;

/// Convert an HTML file to Markdown with page markers.
#[derive(Parser, Debug)]
#[command(
    name = "htmltomd",
    version,
    about = "Convert an HTML file to Markdown with page markers",
    arg_required_else_help = true,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// HTML file to convert.
    input: PathBuf,

    /// Markdown file to write. Defaults to the input path with a .md extension.
    output: Option<PathBuf>,

    /// Reject inputs larger than this many megabytes.
    #[arg(long, default_value_t = DEFAULT_MAX_SIZE_MB)]
    max_size_mb: u64,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn max_input_bytes(&self) -> u64 {
        self.max_size_mb.saturating_mul(1024 * 1024)
    }

    fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| default_output_path(&self.input))
    }
}

/// `page.html` becomes `page.md`, `notes` becomes `notes.md`
fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("md")
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli) {
        Ok(output) => {
            if !cli.quiet {
                println!("Converted {} -> {}", cli.input.display(), output.display());
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Convert `cli.input` and return the path written
fn run(cli: &Cli) -> Result<PathBuf> {
    let output = cli.output_path();
    if output == cli.input {
        bail!(
            "output path {} is the input file; pass a different output path",
            output.display()
        );
    }

    let limit = cli.max_input_bytes();
    let size = fs::metadata(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?
        .len();
    check_size(size, limit).with_context(|| format!("Refusing {}", cli.input.display()))?;

    let bytes = fs::read(&cli.input)
        .with_context(|| format!("Failed to read {}", cli.input.display()))?;
    debug!(path = %cli.input.display(), bytes = bytes.len(), "read input");

    let converter = Converter::with_options(ConverterOptions {
        max_input_bytes: Some(limit),
    });
    let markdown = converter
        .convert_bytes(&bytes)
        .with_context(|| format!("Failed to convert {}", cli.input.display()))?;

    write_atomically(&output, &markdown)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    info!(path = %output.display(), chars = markdown.len(), "wrote markdown");

    Ok(output)
}

/// Write through a temporary file in the target directory so a failed run
/// never leaves a partial Markdown file behind.
fn write_atomically(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(contents.as_bytes())?;
    tmp.persist(path)?;
    Ok(())
}
