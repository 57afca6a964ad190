//! Tesseract engine discovery and per-image recognition.
//!
//! Tesseract is driven as a subprocess (`tesseract <image> stdout`) rather
//! than through FFI bindings: the CLI is stable across versions, ships with
//! every distro package, and keeps the crate free of a C++ build dependency.
//! Each rendered page is written to a temp directory as PNG — lossless
//! compression preserves glyph edges, and JPEG artefacts measurably hurt
//! recognition accuracy on rendered text.

use crate::error::{PageError, PdfUtilsError};
use image::DynamicImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, warn};

/// Check whether a tesseract executable responds to `--version`.
fn is_runnable(cmd: &Path) -> bool {
    Command::new(cmd)
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

/// Quick probe: is tesseract available on this system at all?
pub fn is_tesseract_available() -> bool {
    locate_tesseract(None).is_ok()
}

/// Locate the tesseract executable.
///
/// Resolution order:
/// 1. An explicit path supplied by the caller (`--tesseract-cmd`).
/// 2. `tesseract` on the `PATH`.
/// 3. Common install locations on Windows, where the installer does not add
///    itself to the `PATH` by default.
pub fn locate_tesseract(explicit: Option<&Path>) -> Result<PathBuf, PdfUtilsError> {
    let mut searched: Vec<String> = Vec::new();

    if let Some(cmd) = explicit {
        if is_runnable(cmd) {
            debug!("Using tesseract at: {}", cmd.display());
            return Ok(cmd.to_path_buf());
        }
        searched.push(cmd.display().to_string());
        return Err(PdfUtilsError::TesseractNotFound {
            searched: searched.join(", "),
        });
    }

    let on_path = PathBuf::from("tesseract");
    if is_runnable(&on_path) {
        return Ok(on_path);
    }
    searched.push("PATH".to_string());

    #[cfg(windows)]
    {
        for candidate in windows_install_candidates() {
            if is_runnable(&candidate) {
                debug!("Found tesseract at: {}", candidate.display());
                return Ok(candidate);
            }
            searched.push(candidate.display().to_string());
        }
    }

    Err(PdfUtilsError::TesseractNotFound {
        searched: searched.join(", "),
    })
}

/// Default install locations used by the UB-Mannheim Windows installer.
#[cfg(windows)]
fn windows_install_candidates() -> Vec<PathBuf> {
    let mut candidates = vec![
        PathBuf::from(r"C:\Program Files\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Program Files (x86)\Tesseract-OCR\tesseract.exe"),
        PathBuf::from(r"C:\Tesseract-OCR\tesseract.exe"),
    ];
    if let Some(home) = std::env::var_os("USERPROFILE") {
        candidates.push(
            PathBuf::from(home)
                .join("AppData")
                .join("Local")
                .join("Tesseract-OCR")
                .join("tesseract.exe"),
        );
    }
    candidates
}

/// Write a rendered page into `dir` as `page-NNNN.png` for tesseract to read.
pub fn write_page_image(
    image: &DynamicImage,
    dir: &Path,
    page_num: usize,
) -> Result<PathBuf, PageError> {
    let path = dir.join(format!("page-{:04}.png", page_num));

    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| PageError::RenderFailed {
            page: page_num,
            detail: format!("PNG encoding failed: {}", e),
        })?;

    std::fs::write(&path, &buf).map_err(|e| PageError::RenderFailed {
        page: page_num,
        detail: format!("Failed to write page image: {}", e),
    })?;

    debug!("Wrote page {} image → {} bytes", page_num, buf.len());
    Ok(path)
}

/// Run tesseract on a single page image and return the recognised text.
pub fn recognise_page(
    tesseract_cmd: &Path,
    image_path: &Path,
    lang: &str,
    psm: u8,
    page_num: usize,
) -> Result<String, PageError> {
    let output = Command::new(tesseract_cmd)
        .arg(image_path)
        .arg("stdout")
        .arg("-l")
        .arg(lang)
        .arg("--psm")
        .arg(psm.to_string())
        .output()
        .map_err(|e| PageError::OcrFailed {
            page: page_num,
            detail: format!("Failed to run tesseract: {}", e),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PageError::OcrFailed {
            page: page_num,
            detail: format!("tesseract {}: {}", output.status, stderr.trim()),
        });
    }

    // Tesseract writes diagnostics (missing language packs, DPI guesses) to
    // stderr even on success; surface them at warn level.
    if !output.stderr.is_empty() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            warn!("tesseract page {}: {}", page_num, stderr);
        }
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn availability_probe_does_not_panic() {
        // Whether tesseract is installed or not, the probe must return cleanly.
        let _ = is_tesseract_available();
    }

    #[test]
    fn explicit_bogus_path_is_reported() {
        let result = locate_tesseract(Some(Path::new("/definitely/not/tesseract")));
        match result {
            Err(PdfUtilsError::TesseractNotFound { searched }) => {
                assert!(searched.contains("/definitely/not/tesseract"));
            }
            other => panic!("expected TesseractNotFound, got {:?}", other.map(|p| p.display().to_string())),
        }
    }

    #[test]
    fn page_image_lands_in_dir_with_padded_name() {
        let dir = tempfile::tempdir().unwrap();
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            10,
            10,
            Rgba([255, 255, 255, 255]),
        ));

        let path = write_page_image(&img, dir.path(), 7).unwrap();
        assert!(path.exists());
        assert_eq!(path.file_name().unwrap(), "page-0007.png");

        // PNG magic bytes
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn recognise_page_reports_spawn_failure() {
        let dir = tempfile::tempdir().unwrap();
        let img_path = dir.path().join("page-0001.png");
        std::fs::write(&img_path, b"not an image").unwrap();

        let result = recognise_page(
            Path::new("/definitely/not/tesseract"),
            &img_path,
            "eng",
            1,
            1,
        );
        assert!(matches!(result, Err(PageError::OcrFailed { page: 1, .. })));
    }
}
