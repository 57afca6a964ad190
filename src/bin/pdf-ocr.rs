//! CLI binary for OCR text extraction.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `OcrConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_utils::{
    default_output_path, inspect, ocr, OcrConfig, OcrProgressCallback, PageSelection,
    ProgressCallback,
};
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: renders a live progress bar and per-page log
/// lines using [indicatif].
struct CliProgressCallback {
    /// The single progress bar anchored at the bottom of the terminal.
    bar: ProgressBar,
    /// Per-page wall-clock start times for elapsed reporting.
    start_times: Mutex<HashMap<usize, Instant>>,
    /// Count of pages that errored out.
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Create a callback whose progress-bar length is set dynamically
    /// by `on_document_start` (called before any pages are processed).
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_document_start

        // Initial style: spinner only (no counter until we know the total).
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            start_times: Mutex::new(HashMap::new()),
            errors: AtomicUsize::new(0),
        })
    }

    /// Switch to the full progress-bar style once we know `total`.
    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Recognising");
        self.bar.reset_eta();
    }
}

impl OcrProgressCallback for CliProgressCallback {
    fn on_document_start(&self, total_pages: usize) {
        // Switch from spinner-only style to full progress bar now that we
        // know the actual page count.
        self.activate_bar(total_pages);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Starting OCR of {total_pages} pages…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, _total: usize) {
        self.start_times
            .lock()
            .unwrap()
            .insert(page_num, Instant::now());
        self.bar.set_message(format!("page {page_num}"));
    }

    fn on_page_complete(&self, page_num: usize, total: usize, chars: usize) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&page_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {:<8}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{chars:>5} chars")),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let elapsed_ms = self
            .start_times
            .lock()
            .unwrap()
            .remove(&page_num)
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.errors.fetch_add(1, Ordering::SeqCst);

        // Truncate very long error messages to keep output tidy.
        let msg = if error.len() > 80 {
            format!("{}\u{2026}", &error[..79])
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
        self.bar.inc(1);
    }

    fn on_document_complete(&self, total_pages: usize, success_count: usize) {
        let failed = total_pages.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} pages recognised successfully",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} pages recognised  ({} failed)",
                if failed == total_pages {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_pages,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic extraction (writes Memorandum_OCR.txt)
  pdf-ocr Memorandum.pdf

  # Choose the output file
  pdf-ocr scan.pdf -o scan.txt

  # Specific pages at higher resolution
  pdf-ocr --pages 1-5 --dpi 400 contract.pdf

  # German document
  pdf-ocr --lang deu brief.pdf

  # Extract from a URL
  pdf-ocr https://example.com/minutes.pdf

  # Inspect PDF metadata (no OCR engines needed)
  pdf-ocr --inspect-only document.pdf

  # Structured JSON output on stdout
  pdf-ocr --json document.pdf > result.json

EXTERNAL ENGINES:
  Tesseract performs the character recognition:
    Debian/Ubuntu:  apt install tesseract-ocr
    macOS:          brew install tesseract
    Windows:        https://github.com/UB-Mannheim/tesseract/wiki
  If tesseract is not on your PATH, point --tesseract-cmd at it.

  PDFium (libpdfium) rasterises the pages. Place the platform library next
  to the executable or set PDFIUM_LIB_PATH to an existing copy.
  Prebuilt binaries: https://github.com/bblanchon/pdfium-binaries

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH         Path to an existing libpdfium (file or directory)
  PDF_UTILS_DPI           Default rendering DPI
  PDF_UTILS_LANG          Default tesseract language code
  PDF_UTILS_OUTPUT        Default output file
"#;

/// Extract text from scanned PDFs using OCR.
#[derive(Parser, Debug)]
#[command(
    name = "pdf-ocr",
    version,
    about = "Extract text from a PDF via OCR (pdfium + tesseract)",
    long_about = "Rasterise each page of a PDF at a configurable resolution, run tesseract \
on the page images, and write the concatenated text to a file. Works on scanned documents \
where ordinary text extraction returns nothing.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Write text to this file instead of `<input>_OCR.txt`.
    #[arg(short, long, env = "PDF_UTILS_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI (72–600). Higher is sharper but slower.
    #[arg(long, env = "PDF_UTILS_DPI", default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// Tesseract language code (e.g. eng, deu, eng+fra).
    #[arg(long, env = "PDF_UTILS_LANG", default_value = "eng")]
    lang: String,

    /// Tesseract page segmentation mode (0–13).
    #[arg(long, default_value_t = 1,
          value_parser = clap::value_parser!(u8).range(0..=13))]
    psm: u8,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, default_value = "all")]
    pages: String,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF_UTILS_PASSWORD")]
    password: Option<String>,

    /// Path to the tesseract executable (auto-detected if omitted).
    #[arg(long, env = "PDF_UTILS_TESSERACT_CMD")]
    tesseract_cmd: Option<PathBuf>,

    /// Do not emit `--- Page N ---` headings between pages.
    #[arg(long)]
    no_headings: bool,

    /// Output structured JSON (OcrOutput) on stdout instead of writing a file.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF_UTILS_NO_PROGRESS")]
    no_progress: bool,

    /// Print PDF metadata only, no OCR.
    #[arg(long)]
    inspect_only: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF_UTILS_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF_UTILS_QUIET")]
    quiet: bool,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF_UTILS_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&cli.input).context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            println!("File:         {}", cli.input);
            if let Some(ref t) = meta.title {
                println!("Title:        {}", t);
            }
            if let Some(ref a) = meta.author {
                println!("Author:       {}", a);
            }
            if let Some(ref s) = meta.subject {
                println!("Subject:      {}", s);
            }
            println!("Pages:        {}", meta.page_count);
            println!("PDF Version:  {}", meta.pdf_version);
            if let Some(ref p) = meta.producer {
                println!("Producer:     {}", p);
            }
            if let Some(ref c) = meta.creator {
                println!("Creator:      {}", c);
            }
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn OcrProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let output = ocr(&cli.input, &config).context("OCR extraction failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
        return Ok(());
    }

    let output_path = resolve_output_path(&cli);
    std::fs::write(&output_path, &output.text)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    // Summary line (the callback already printed the per-page log).
    if !cli.quiet {
        let selected =
            output.stats.processed_pages + output.stats.failed_pages + output.stats.skipped_pages;
        eprintln!(
            "{}  {}/{} pages  {} chars  {}ms  →  {}",
            if output.stats.failed_pages == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            output.stats.processed_pages,
            selected,
            output.stats.total_chars,
            output.stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );

        // First 500 characters as a sanity check on what came out.
        let preview: String = output
            .text
            .chars()
            .take(500)
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();
        if !preview.is_empty() {
            eprintln!("   {} {}…", dim("preview:"), preview.trim_end());
        }
    }

    Ok(())
}

/// Map CLI args to `OcrConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<OcrConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = OcrConfig::builder()
        .dpi(cli.dpi)
        .lang(&cli.lang)
        .psm(cli.psm)
        .pages(pages)
        .page_headings(!cli.no_headings)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref cmd) = cli.tesseract_cmd {
        builder = builder.tesseract_cmd(cmd);
    }
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Default output file: next to the input for local paths, the URL's file
/// name in the current directory for downloads.
fn resolve_output_path(cli: &Cli) -> PathBuf {
    if let Some(ref path) = cli.output {
        return path.clone();
    }
    if cli.input.starts_with("http://") || cli.input.starts_with("https://") {
        let name = cli
            .input
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("downloaded.pdf");
        let stem = name.strip_suffix(".pdf").unwrap_or(name);
        return PathBuf::from(format!("{stem}_OCR.txt"));
    }
    default_output_path(Path::new(&cli.input))
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}
