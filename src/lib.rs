//! # pdf-utils
//!
//! Small, independent command-line utilities for everyday PDF chores:
//! combining documents, extracting text from scans via OCR, and emitting
//! base64 payloads.
//!
//! ## The three tools
//!
//! ```text
//! pdf-combine   File1.pdf + File2.pdf ──▶ Combined_Files.pdf   (lopdf)
//! pdf-ocr       scan.pdf ──▶ scan_OCR.txt                      (pdfium + tesseract)
//! pdf-base64    doc.pdf ──▶ base64 payload on stdout           (base64)
//! ```
//!
//! Each binary is a thin shim over one library module; the tools share
//! nothing beyond input resolution and the error type.
//!
//! ## OCR pipeline
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input    resolve local file or download from URL
//!  ├─ 2. Render   rasterise pages via pdfium at the configured DPI
//!  ├─ 3. OCR      tesseract subprocess per page image
//!  ├─ 4. Clean    form feeds, line endings, stray whitespace
//!  └─ 5. Output   assembled text + per-page stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_utils::{ocr, OcrConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OcrConfig::builder().dpi(300).build()?;
//!     let output = ocr("Memorandum.pdf", &config)?;
//!     println!("{}", output.text);
//!     eprintln!("{} chars from {} pages",
//!         output.stats.total_chars,
//!         output.stats.processed_pages);
//!     Ok(())
//! }
//! ```
//!
//! ## External engines
//!
//! The OCR tool needs two native pieces at runtime:
//!
//! | Engine | Used for | How it is found |
//! |--------|----------|-----------------|
//! | PDFium (`libpdfium`) | page rasterisation | `PDFIUM_LIB_PATH`, next to the executable, or the system library path |
//! | Tesseract (`tesseract`) | character recognition | `--tesseract-cmd`, `PATH`, or common Windows install dirs |
//!
//! `pdf-combine` and `pdf-base64` need neither.
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the three binaries (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf-utils = { version = "0.4", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod combine;
pub mod config;
pub mod encode;
pub mod error;
pub mod ocr;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use combine::{combine_pdfs, count_pages, CombineOptions, CombineSummary};
pub use config::{OcrConfig, OcrConfigBuilder, PageSelection};
pub use encode::pdf_to_base64;
pub use error::{PageError, PdfUtilsError};
pub use ocr::{default_output_path, inspect, ocr, ocr_from_bytes, ocr_to_file};
pub use output::{DocumentMetadata, OcrOutput, OcrStats, PageText};
pub use progress::{NoopProgressCallback, OcrProgressCallback, ProgressCallback};
