//! Output types for the OCR tool: per-page results, document metadata, and
//! run statistics.

use crate::error::{PageError, PdfUtilsError};
use serde::{Deserialize, Serialize};

/// The result of an OCR extraction run.
///
/// Returned by [`crate::ocr::ocr`] even when some pages failed; check
/// [`OcrStats::failed_pages`] or call [`OcrOutput::into_result`] to treat any
/// page failure as an error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrOutput {
    /// The assembled text of all successfully recognised pages, in page order.
    pub text: String,
    /// Per-page results, sorted by page number. Failed pages carry an error
    /// and an empty text field.
    pub pages: Vec<PageText>,
    /// Document metadata read from the PDF.
    pub metadata: DocumentMetadata,
    /// Counters and timings for the run.
    pub stats: OcrStats,
}

impl OcrOutput {
    /// Convert into the assembled text, failing if any page failed.
    pub fn into_result(self) -> Result<String, PdfUtilsError> {
        if self.stats.failed_pages > 0 {
            return Err(PdfUtilsError::PartialFailure {
                success: self.stats.processed_pages,
                failed: self.stats.failed_pages,
                total: self.stats.processed_pages + self.stats.failed_pages,
            });
        }
        Ok(self.text)
    }
}

/// Recognised text for a single page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageText {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Cleaned-up recognised text. Empty when `error` is set.
    pub text: String,
    /// Character count of `text`.
    pub chars: usize,
    /// Wall-clock time spent rendering and recognising this page.
    pub duration_ms: u64,
    /// Set when the page failed; the run continues with the other pages.
    pub error: Option<PageError>,
}

/// Document metadata extracted from the PDF information dictionary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub creator: Option<String>,
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub modification_date: Option<String>,
    pub page_count: usize,
    pub pdf_version: String,
    pub is_encrypted: bool,
}

/// Counters and timings for an OCR run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OcrStats {
    /// Total pages in the document (not just the selected ones).
    pub total_pages: usize,
    /// Pages recognised successfully.
    pub processed_pages: usize,
    /// Pages that failed rendering or recognition.
    pub failed_pages: usize,
    /// Selected pages that were skipped (e.g. out of range).
    pub skipped_pages: usize,
    /// Characters across all successful pages.
    pub total_chars: usize,
    /// Time spent rasterising pages.
    pub render_duration_ms: u64,
    /// Time spent inside tesseract.
    pub ocr_duration_ms: u64,
    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_output(failed: usize) -> OcrOutput {
        OcrOutput {
            text: "hello\n".to_string(),
            pages: vec![],
            metadata: DocumentMetadata {
                title: None,
                author: None,
                subject: None,
                creator: None,
                producer: None,
                creation_date: None,
                modification_date: None,
                page_count: 2,
                pdf_version: "1.7".to_string(),
                is_encrypted: false,
            },
            stats: OcrStats {
                total_pages: 2,
                processed_pages: 2 - failed,
                failed_pages: failed,
                ..Default::default()
            },
        }
    }

    #[test]
    fn into_result_ok_when_no_failures() {
        let text = minimal_output(0).into_result().unwrap();
        assert_eq!(text, "hello\n");
    }

    #[test]
    fn into_result_err_on_partial_failure() {
        let err = minimal_output(1).into_result().unwrap_err();
        assert!(matches!(err, PdfUtilsError::PartialFailure { failed: 1, .. }));
    }

    #[test]
    fn output_round_trips_through_json() {
        let out = minimal_output(0);
        let json = serde_json::to_string(&out).unwrap();
        let back: OcrOutput = serde_json::from_str(&json).unwrap();
        assert_eq!(back.stats.total_pages, 2);
        assert_eq!(back.metadata.pdf_version, "1.7");
    }
}
