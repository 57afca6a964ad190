//! CLI binary for combining two PDFs.
//!
//! A thin shim over [`pdf_utils::combine`] that keeps the classic
//! fixed-filename workflow as defaults: running `pdf-combine` with no
//! arguments merges `File1.pdf` and `File2.pdf` into `Combined_Files.pdf`.

use anyhow::{Context, Result};
use clap::Parser;
use pdf_utils::combine::{combine_pdfs, CombineOptions};
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # The classic: File1.pdf + File2.pdf → Combined_Files.pdf
  pdf-combine

  # Named inputs and output
  pdf-combine intro.pdf appendix.pdf -o handout.pdf
"#;

/// Combine two PDF files into one.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-combine",
    version,
    about = "Combine two PDF files into one",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// First input PDF.
    #[arg(default_value = "File1.pdf")]
    first: PathBuf,

    /// Second input PDF.
    #[arg(default_value = "File2.pdf")]
    second: PathBuf,

    /// Output PDF file.
    #[arg(short, long, env = "PDF_UTILS_OUTPUT", default_value = "Combined_Files.pdf")]
    output: PathBuf,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_UTILS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_UTILS_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    if !cli.quiet {
        println!("{}", bold("Combining:"));
        println!("  1. {}", cli.first.display());
        println!("  2. {}", cli.second.display());
        println!();
    }

    let options = CombineOptions {
        input_paths: vec![cli.first.clone(), cli.second.clone()],
        output_path: cli.output.clone(),
    };

    let summary = combine_pdfs(&options).context("Failed to combine PDFs")?;

    if !cli.quiet {
        println!(
            "{} Combined {} pages into: {}",
            green("✔"),
            bold(&summary.page_count.to_string()),
            bold(&cli.output.display().to_string())
        );
        for (path, size) in &summary.inputs {
            println!("  {:<30} {:>12} bytes", path.display(), group_digits(*size));
        }
        println!(
            "  {:<30} {:>12} bytes  {}",
            cli.output.display(),
            group_digits(summary.output_bytes),
            dim("(combined)")
        );
    }

    Ok(())
}

/// Format an integer with thousands separators: 1234567 → "1,234,567".
fn group_digits(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::group_digits;

    #[test]
    fn groups_thousands() {
        assert_eq!(group_digits(0), "0");
        assert_eq!(group_digits(999), "999");
        assert_eq!(group_digits(1_000), "1,000");
        assert_eq!(group_digits(1_234_567), "1,234,567");
    }
}
