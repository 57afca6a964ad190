//! PDF rasterisation: render selected pages to `DynamicImage` via pdfium.
//!
//! ## Why target width instead of a zoom matrix?
//!
//! pdfium renders to a bitmap of a requested pixel size rather than taking a
//! DPI directly. A page is `width_points / 72` inches wide, so the pixel
//! width for a given DPI is `width_points * dpi / 72`. Computing that per
//! page keeps mixed-size documents (letter + A3 inserts) at a uniform
//! physical resolution.
//!
//! ## Why cap pixels as well?
//!
//! Page sizes vary wildly: an A0 poster at 300 DPI would produce a
//! 10,000 × 14,000 px image. `max_rendered_pixels` caps the longest edge
//! regardless of physical size, keeping memory bounded.

use crate::config::OcrConfig;
use crate::error::PdfUtilsError;
use crate::output::DocumentMetadata;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Rasterise selected pages of a PDF into images.
///
/// # Returns
/// A vector of `(page_index_0based, DynamicImage)` tuples.
pub fn render_pages(
    pdf_path: &Path,
    config: &OcrConfig,
    page_indices: &[usize],
) -> Result<Vec<(usize, DynamicImage)>, PdfUtilsError> {
    let pdfium = bind_pdfium()?;

    let document = load_document(&pdfium, pdf_path, config.password.as_deref())?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    let mut results = Vec::with_capacity(page_indices.len());

    for &idx in page_indices {
        if idx >= total_pages {
            warn!(
                "Skipping page {} (out of range, total={})",
                idx + 1,
                total_pages
            );
            continue;
        }

        let page = pages
            .get(idx as u16)
            .map_err(|e| PdfUtilsError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            })?;

        // width_points * dpi / 72 → pixels, capped by max_rendered_pixels.
        let width_px = (page.width().value * config.dpi as f32 / 72.0).round() as i32;
        let target_width = width_px.min(config.max_rendered_pixels as i32).max(1);

        let render_config = PdfRenderConfig::new()
            .set_target_width(target_width)
            .set_maximum_height(config.max_rendered_pixels as i32);

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            PdfUtilsError::RasterisationFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );

        results.push((idx, image));
    }

    Ok(results)
}

/// Extract document metadata from a PDF without rendering pages.
pub fn extract_metadata(
    pdf_path: &Path,
    password: Option<&str>,
) -> Result<DocumentMetadata, PdfUtilsError> {
    let pdfium = bind_pdfium()?;
    let document = load_document(&pdfium, pdf_path, password)?;

    let metadata = document.metadata();
    let pages = document.pages();

    let get_meta = |tag: PdfDocumentMetadataTagType| -> Option<String> {
        metadata.get(tag).and_then(|t| {
            let v = t.value().to_string();
            if v.is_empty() {
                None
            } else {
                Some(v)
            }
        })
    };

    Ok(DocumentMetadata {
        title: get_meta(PdfDocumentMetadataTagType::Title),
        author: get_meta(PdfDocumentMetadataTagType::Author),
        subject: get_meta(PdfDocumentMetadataTagType::Subject),
        creator: get_meta(PdfDocumentMetadataTagType::Creator),
        producer: get_meta(PdfDocumentMetadataTagType::Producer),
        creation_date: get_meta(PdfDocumentMetadataTagType::CreationDate),
        modification_date: get_meta(PdfDocumentMetadataTagType::ModificationDate),
        page_count: pages.len() as usize,
        pdf_version: format!("{:?}", document.version()),
        is_encrypted: false, // pdfium doesn't readily expose this after opening
    })
}

/// Open a document, mapping password failures to the right error variant.
fn load_document<'a>(
    pdfium: &'a Pdfium,
    pdf_path: &Path,
    password: Option<&'a str>,
) -> Result<PdfDocument<'a>, PdfUtilsError> {
    pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
        let err_str = format!("{:?}", e);
        if err_str.contains("Password") || err_str.contains("password") {
            if password.is_some() {
                PdfUtilsError::WrongPassword {
                    path: pdf_path.to_path_buf(),
                }
            } else {
                PdfUtilsError::PasswordRequired {
                    path: pdf_path.to_path_buf(),
                }
            }
        } else {
            PdfUtilsError::CorruptPdf {
                path: pdf_path.to_path_buf(),
                detail: err_str,
            }
        }
    })
}

/// Bind to the pdfium shared library.
///
/// Resolution order:
/// 1. `PDFIUM_LIB_PATH` — a library file, or a directory containing one.
/// 2. The platform library name next to the current executable / CWD.
/// 3. The system library search path.
fn bind_pdfium() -> Result<Pdfium, PdfUtilsError> {
    if let Some(value) = std::env::var_os("PDFIUM_LIB_PATH") {
        let path = PathBuf::from(&value);
        let lib_path = if path.is_dir() {
            Pdfium::pdfium_platform_library_name_at_path(&path)
        } else {
            path
        };
        return Pdfium::bind_to_library(&lib_path)
            .map(Pdfium::new)
            .map_err(|e| {
                PdfUtilsError::PdfiumBindingFailed(format!(
                    "PDFIUM_LIB_PATH={}: {:?}",
                    lib_path.display(),
                    e
                ))
            });
    }

    match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./")) {
        Ok(bindings) => Ok(Pdfium::new(bindings)),
        Err(primary_err) => match Pdfium::bind_to_system_library() {
            Ok(bindings) => Ok(Pdfium::new(bindings)),
            Err(_) => Err(PdfUtilsError::PdfiumBindingFailed(format!(
                "{:?}",
                primary_err
            ))),
        },
    }
}
