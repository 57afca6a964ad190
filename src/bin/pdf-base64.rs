//! CLI binary for base64-encoding a PDF.
//!
//! Prints the payload to stdout so it can be piped straight into a JSON
//! template or clipboard tool; diagnostics stay on stderr.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_utils::pdf_to_base64;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Payload on stdout
  pdf-base64 document.pdf

  # Straight into a file
  pdf-base64 document.pdf -o payload.txt

  # From a URL
  pdf-base64 https://example.com/report.pdf
"#;

/// Encode a PDF's bytes as a base64 string.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-base64",
    version,
    about = "Encode a PDF's bytes as a base64 string on stdout",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write the payload to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_UTILS_VERBOSE")]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let payload = pdf_to_base64(&cli.input).context("Failed to encode PDF")?;

    match cli.output {
        Some(path) => {
            std::fs::write(&path, &payload)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} bytes of base64 → {}", payload.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(payload.as_bytes())
                .context("Failed to write to stdout")?;
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}
