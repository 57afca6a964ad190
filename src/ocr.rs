//! OCR extraction entry points.
//!
//! ## Why a sequential pipeline?
//!
//! Every stage here is either CPU-bound inside pdfium or a blocking tesseract
//! subprocess, and pages are recognised one at a time. Plain synchronous
//! calls keep the control flow identical to what actually happens at runtime,
//! with no executor in between.

use crate::config::OcrConfig;
use crate::error::PdfUtilsError;
use crate::output::{DocumentMetadata, OcrOutput, OcrStats, PageText};
use crate::pipeline::{input, postprocess, render, tesseract};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Extract text from a PDF file or URL via OCR.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — OCR configuration
///
/// # Returns
/// `Ok(OcrOutput)` on success, even if some pages failed
/// (check `output.stats.failed_pages`).
///
/// # Errors
/// Returns `Err(PdfUtilsError)` only for fatal errors:
/// - File not found / permission denied / not a valid PDF
/// - Tesseract not installed
/// - All pages failed and no output produced
pub fn ocr(input_str: impl AsRef<str>, config: &OcrConfig) -> Result<OcrOutput, PdfUtilsError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting OCR extraction: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs)?;
    let pdf_path = resolved.path().to_path_buf();

    // ── Step 2: Locate the OCR engine before doing any heavy work ────────
    let tesseract_cmd = tesseract::locate_tesseract(config.tesseract_cmd.as_deref())?;

    // ── Step 3: Extract metadata ─────────────────────────────────────────
    let metadata = render::extract_metadata(&pdf_path, config.password.as_deref())?;
    let total_pages = metadata.page_count;
    info!("PDF has {} pages", total_pages);

    // ── Step 4: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(PdfUtilsError::PageOutOfRange {
            page: 0,
            total: total_pages,
        });
    }
    debug!("Selected {} pages for OCR", page_indices.len());

    // Fire on_document_start now that we know how many pages will actually
    // be processed (page_indices.len()), not the full document page count.
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_start(page_indices.len());
    }

    // ── Step 5: Rasterise pages ──────────────────────────────────────────
    let render_start = Instant::now();
    let rendered = render::render_pages(&pdf_path, config, &page_indices)?;
    let render_duration_ms = render_start.elapsed().as_millis() as u64;
    info!(
        "Rendered {} pages in {}ms",
        rendered.len(),
        render_duration_ms
    );

    // ── Step 6: Recognise each page ──────────────────────────────────────
    let image_dir =
        tempfile::tempdir().map_err(|e| PdfUtilsError::Internal(format!("tempdir: {e}")))?;
    let selected = page_indices.len();

    let ocr_start = Instant::now();
    let mut pages: Vec<PageText> = Vec::with_capacity(rendered.len());

    for (idx, image) in &rendered {
        let page_num = idx + 1;
        let page_start = Instant::now();

        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, selected);
        }

        let result = tesseract::write_page_image(image, image_dir.path(), page_num).and_then(
            |image_path| {
                tesseract::recognise_page(
                    &tesseract_cmd,
                    &image_path,
                    &config.lang,
                    config.psm,
                    page_num,
                )
            },
        );

        let page = match result {
            Ok(raw) => {
                let text = postprocess::clean_ocr_text(&raw);
                let chars = text.chars().count();
                debug!("Page {}: {} chars recognised", page_num, chars);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_complete(page_num, selected, chars);
                }
                PageText {
                    page_num,
                    text,
                    chars,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                    error: None,
                }
            }
            Err(e) => {
                warn!("Page {} failed: {}", page_num, e);
                if let Some(ref cb) = config.progress_callback {
                    cb.on_page_error(page_num, selected, &e.to_string());
                }
                PageText {
                    page_num,
                    text: String::new(),
                    chars: 0,
                    duration_ms: page_start.elapsed().as_millis() as u64,
                    error: Some(e),
                }
            }
        };

        pages.push(page);
    }
    let ocr_duration_ms = ocr_start.elapsed().as_millis() as u64;

    // ── Step 7: Assemble the output text ─────────────────────────────────
    let text = assemble_text(&pages, config);

    // ── Step 8: Compute stats ────────────────────────────────────────────
    let processed = pages.iter().filter(|p| p.error.is_none()).count();
    let failed = pages.iter().filter(|p| p.error.is_some()).count();
    let skipped = selected.saturating_sub(pages.len());

    if processed == 0 {
        let first_error = pages
            .iter()
            .find_map(|p| p.error.as_ref())
            .map(|e| format!("{}", e))
            .unwrap_or_else(|| "Unknown error".to_string());

        return Err(PdfUtilsError::AllPagesFailed {
            total: pages.len(),
            first_error,
        });
    }

    let stats = OcrStats {
        total_pages,
        processed_pages: processed,
        failed_pages: failed,
        skipped_pages: skipped,
        total_chars: pages.iter().map(|p| p.chars).sum(),
        render_duration_ms,
        ocr_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "OCR complete: {}/{} pages, {} chars, {}ms total",
        processed, total_pages, stats.total_chars, stats.total_duration_ms
    );

    // Fire on_document_complete with the count of selected pages, not the
    // full PDF page count, to match what on_document_start received.
    if let Some(ref cb) = config.progress_callback {
        cb.on_document_complete(selected, processed);
    }

    Ok(OcrOutput {
        text,
        pages,
        metadata,
        stats,
    })
}

/// Extract text from a PDF and write it directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub fn ocr_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &OcrConfig,
) -> Result<OcrStats, PdfUtilsError> {
    let output = ocr(input_str, config)?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| PdfUtilsError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = path.with_extension("txt.tmp");
    std::fs::write(&tmp_path, &output.text).map_err(|e| PdfUtilsError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    std::fs::rename(&tmp_path, path).map_err(|e| PdfUtilsError::OutputWriteFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(output.stats)
}

/// Extract text from PDF bytes in memory.
///
/// This avoids the need for the caller to create a temporary file.
/// Internally the library writes `bytes` to a managed [`tempfile`] and cleans
/// it up automatically on return or panic.
pub fn ocr_from_bytes(bytes: &[u8], config: &OcrConfig) -> Result<OcrOutput, PdfUtilsError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PdfUtilsError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PdfUtilsError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `ocr` returns
    ocr(&path, config)
}

/// Extract PDF metadata without rendering or recognising anything.
///
/// Does not require tesseract to be installed.
pub fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, PdfUtilsError> {
    let resolved = input::resolve_input(input_str.as_ref(), 120)?;
    let pdf_path = resolved.path().to_path_buf();
    render::extract_metadata(&pdf_path, None)
}

/// Derive the default output path for a PDF: `document.pdf` → `document_OCR.txt`.
pub fn default_output_path(pdf_path: &Path) -> PathBuf {
    let stem = pdf_path
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    pdf_path.with_file_name(format!("{stem}_OCR.txt"))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Assemble the final text document from per-page results.
fn assemble_text(pages: &[PageText], config: &OcrConfig) -> String {
    let successful: Vec<&PageText> = pages.iter().filter(|p| p.error.is_none()).collect();

    let parts: Vec<String> = successful
        .iter()
        .map(|page| {
            if config.page_headings {
                format!("--- Page {} ---\n{}", page.page_num, page.text)
            } else {
                page.text.clone()
            }
        })
        .collect();

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(num: usize, text: &str) -> PageText {
        PageText {
            page_num: num,
            text: text.to_string(),
            chars: text.chars().count(),
            duration_ms: 0,
            error: None,
        }
    }

    #[test]
    fn default_output_path_appends_ocr_suffix() {
        assert_eq!(
            default_output_path(Path::new("Memorandum.pdf")),
            PathBuf::from("Memorandum_OCR.txt")
        );
        assert_eq!(
            default_output_path(Path::new("/docs/scan.v2.pdf")),
            PathBuf::from("/docs/scan.v2_OCR.txt")
        );
    }

    #[test]
    fn assemble_text_with_headings() {
        let config = OcrConfig::default();
        let pages = vec![page(1, "first\n"), page(2, "second\n")];
        let text = assemble_text(&pages, &config);
        assert_eq!(text, "--- Page 1 ---\nfirst\n\n--- Page 2 ---\nsecond\n");
    }

    #[test]
    fn assemble_text_without_headings() {
        let config = OcrConfig::builder().page_headings(false).build().unwrap();
        let pages = vec![page(1, "first\n"), page(2, "second\n")];
        let text = assemble_text(&pages, &config);
        assert_eq!(text, "first\n\nsecond\n");
    }

    #[test]
    fn assemble_text_skips_failed_pages() {
        let config = OcrConfig::default();
        let mut bad = page(2, "");
        bad.error = Some(crate::error::PageError::OcrFailed {
            page: 2,
            detail: "boom".into(),
        });
        let pages = vec![page(1, "first\n"), bad, page(3, "third\n")];
        let text = assemble_text(&pages, &config);
        assert_eq!(text, "--- Page 1 ---\nfirst\n\n--- Page 3 ---\nthird\n");
    }

    #[test]
    fn ocr_missing_file_is_fatal() {
        let config = OcrConfig::default();
        let result = ocr("/definitely/not/a/real/file.pdf", &config);
        assert!(matches!(result, Err(PdfUtilsError::FileNotFound { .. })));
    }
}
