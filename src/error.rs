//! Error types for the pdf-utils library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`PdfUtilsError`] — **Fatal**: the tool cannot proceed at all (bad input
//!   file, wrong password, tesseract not installed). Returned as
//!   `Err(PdfUtilsError)` from the top-level entry points.
//!
//! * [`PageError`] — **Non-fatal**: a single page failed (render glitch,
//!   recognition failure) but all other pages are fine. Stored inside
//!   [`crate::output::PageText`] so callers can inspect partial success
//!   rather than losing the whole document to one bad page.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! page failure, log and continue, or collect all errors for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-utils library.
///
/// Page-level failures use [`PageError`] and are stored in
/// [`crate::output::PageText`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PdfUtilsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Several input files were missing at once (combine tool reports all of
    /// them in one go rather than stopping at the first).
    #[error("input file(s) not found: {}", .0.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", "))]
    MissingInputs(Vec<PathBuf>),

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// PDF has no pages at all.
    #[error("PDF has no pages: '{}'", .0.display())]
    EmptyPdf(PathBuf),

    /// Selected page numbers exceed the actual page count.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Object-level PDF manipulation failed (combine tool).
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    // ── OCR engine errors ─────────────────────────────────────────────────
    /// The tesseract executable could not be located.
    #[error(
        "Tesseract OCR engine not found.\n\n\
Tesseract is required to extract text from page images.\n\
  • Debian/Ubuntu:  apt install tesseract-ocr\n\
  • macOS:          brew install tesseract\n\
  • Windows:        https://github.com/UB-Mannheim/tesseract/wiki\n\
Alternatively point --tesseract-cmd at an existing tesseract executable.\n\
Searched: {searched}"
    )]
    TesseractNotFound { searched: String },

    /// Every page failed; output would be empty.
    #[error("All {total} pages failed during OCR.\nFirst error: {first_error}")]
    AllPagesFailed { total: usize, first_error: String },

    /// Some pages succeeded but at least one failed.
    ///
    /// Returned by [`crate::output::OcrOutput::into_result`] when the caller
    /// wants to treat any page failure as an error.
    #[error("{failed}/{total} pages failed during OCR")]
    PartialFailure {
        success: usize,
        failed: usize,
        total: usize,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write an output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// General I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
The OCR tool needs the PDFium shared library (libpdfium) to rasterise pages.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Or place the platform library next to the executable.\n\
Prebuilt binaries: https://github.com/bblanchon/pdfium-binaries\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single page.
///
/// Stored alongside [`crate::output::PageText`] when a page fails.
/// The overall run continues unless ALL pages fail.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum PageError {
    /// Page rasterisation failed.
    #[error("Page {page}: rasterisation failed: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// The tesseract invocation for this page failed.
    #[error("Page {page}: OCR failed: {detail}")]
    OcrFailed { page: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_failure_display() {
        let e = PdfUtilsError::PartialFailure {
            success: 9,
            failed: 1,
            total: 10,
        };
        let msg = e.to_string();
        assert!(msg.contains("1/10"), "got: {msg}");
    }

    #[test]
    fn missing_inputs_lists_every_path() {
        let e = PdfUtilsError::MissingInputs(vec![
            PathBuf::from("File1.pdf"),
            PathBuf::from("File2.pdf"),
        ]);
        let msg = e.to_string();
        assert!(msg.contains("File1.pdf"));
        assert!(msg.contains("File2.pdf"));
    }

    #[test]
    fn tesseract_not_found_carries_hint() {
        let e = PdfUtilsError::TesseractNotFound {
            searched: "PATH".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("tesseract-ocr"));
        assert!(msg.contains("--tesseract-cmd"));
    }

    #[test]
    fn page_error_display() {
        let e = PageError::OcrFailed {
            page: 3,
            detail: "exit status 1".into(),
        };
        assert!(e.to_string().contains("Page 3"));
        assert!(e.to_string().contains("exit status 1"));
    }
}
