//! Configuration types for the OCR tool.
//!
//! All OCR behaviour is controlled through [`OcrConfig`], built via its
//! [`OcrConfigBuilder`]. Keeping every knob in one struct makes it trivial to
//! share configs, serialise them for logging, and diff two runs to understand
//! why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A ten-field constructor is unreadable and breaks on every new field. The
//! builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::error::PdfUtilsError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for an OCR extraction run.
///
/// Built via [`OcrConfig::builder()`] or using [`OcrConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_utils::OcrConfig;
///
/// let config = OcrConfig::builder()
///     .dpi(300)
///     .lang("eng")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct OcrConfig {
    /// Rendering DPI used when rasterising each PDF page. Range: 72–600. Default: 300.
    ///
    /// 300 DPI is the classic OCR sweet spot: glyph edges are crisp enough for
    /// tesseract to segment reliably without producing enormous bitmaps.
    /// Increase to 400–600 for very small print; decrease to 150 when speed
    /// matters more than accuracy.
    pub dpi: u32,

    /// Maximum rendered image dimension (width or height) in pixels. Default: 5000.
    ///
    /// A safety cap independent of DPI. A 300-DPI render of an A0 poster could
    /// produce a 10 000 × 14 000 px image and exhaust memory. This field caps
    /// either dimension, scaling the other proportionally, so pdfium never
    /// allocates more than roughly `max_rendered_pixels²` bytes of pixels.
    pub max_rendered_pixels: u32,

    /// Tesseract language code, e.g. "eng", "deu", "eng+fra". Default: "eng".
    pub lang: String,

    /// Tesseract page segmentation mode (`--psm`). Default: 1.
    ///
    /// Mode 1 (automatic segmentation with orientation and script detection)
    /// handles rotated scans and mixed layouts; mode 6 ("assume a single
    /// uniform block of text") is sometimes better for clean single-column
    /// documents.
    pub psm: u8,

    /// Explicit path to the tesseract executable.
    /// If None, the executable is auto-detected (PATH, then common install
    /// locations on Windows).
    pub tesseract_cmd: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// Emit a `--- Page N ---` heading before each page's text. Default: true.
    pub page_headings: bool,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Optional per-page progress callback.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            dpi: 300,
            max_rendered_pixels: 5000,
            lang: "eng".to_string(),
            psm: 1,
            tesseract_cmd: None,
            password: None,
            pages: PageSelection::default(),
            page_headings: true,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OcrConfig")
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("lang", &self.lang)
            .field("psm", &self.psm)
            .field("tesseract_cmd", &self.tesseract_cmd)
            .field("pages", &self.pages)
            .field("page_headings", &self.page_headings)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn OcrProgressCallback>"),
            )
            .finish()
    }
}

impl OcrConfig {
    /// Create a new builder for `OcrConfig`.
    pub fn builder() -> OcrConfigBuilder {
        OcrConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`OcrConfig`].
#[derive(Debug)]
pub struct OcrConfigBuilder {
    config: OcrConfig,
}

impl OcrConfigBuilder {
    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(72, 600);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn lang(mut self, lang: impl Into<String>) -> Self {
        self.config.lang = lang.into();
        self
    }

    pub fn psm(mut self, psm: u8) -> Self {
        self.config.psm = psm;
        self
    }

    pub fn tesseract_cmd(mut self, cmd: impl Into<PathBuf>) -> Self {
        self.config.tesseract_cmd = Some(cmd.into());
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn page_headings(mut self, v: bool) -> Self {
        self.config.page_headings = v;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<OcrConfig, PdfUtilsError> {
        let c = &self.config;
        if c.dpi < 72 || c.dpi > 600 {
            return Err(PdfUtilsError::InvalidConfig(format!(
                "DPI must be 72–600, got {}",
                c.dpi
            )));
        }
        if c.lang.is_empty() {
            return Err(PdfUtilsError::InvalidConfig(
                "Language code must not be empty".into(),
            ));
        }
        if c.psm > 13 {
            return Err(PdfUtilsError::InvalidConfig(format!(
                "Page segmentation mode must be 0–13, got {}",
                c.psm
            )));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Specifies which pages of the PDF to process.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub enum PageSelection {
    /// Process all pages (default).
    #[default]
    All,
    /// Process a single page (1-indexed).
    Single(usize),
    /// Process a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Process specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_clamps_dpi() {
        let config = OcrConfig::builder().dpi(10_000).build().unwrap();
        assert_eq!(config.dpi, 600);
        let config = OcrConfig::builder().dpi(10).build().unwrap();
        assert_eq!(config.dpi, 72);
    }

    #[test]
    fn builder_rejects_empty_lang() {
        let result = OcrConfig::builder().lang("").build();
        assert!(matches!(result, Err(PdfUtilsError::InvalidConfig(_))));
    }

    #[test]
    fn builder_rejects_psm_out_of_range() {
        let result = OcrConfig::builder().psm(14).build();
        assert!(matches!(result, Err(PdfUtilsError::InvalidConfig(_))));
    }

    #[test]
    fn defaults_match_documented_values() {
        let config = OcrConfig::default();
        assert_eq!(config.dpi, 300);
        assert_eq!(config.lang, "eng");
        assert_eq!(config.psm, 1);
        assert!(config.page_headings);
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(5), vec![0, 1, 2, 3, 4]);
        assert_eq!(PageSelection::Single(3).to_indices(5), vec![2]);
        assert_eq!(PageSelection::Single(6).to_indices(5), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 4).to_indices(5), vec![1, 2, 3]);
        assert_eq!(
            PageSelection::Set(vec![1, 3, 5]).to_indices(5),
            vec![0, 2, 4]
        );
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3]).to_indices(5),
            vec![0, 2] // deduplicated and sorted
        );
    }
}
