//! Input resolution: normalise a user-supplied path or URL to a local file.
//!
//! ## Why download to a temp file?
//!
//! pdfium and lopdf both want a file-system path. Downloading to a `TempDir`
//! gives us a path the engines can open while ensuring cleanup happens
//! automatically when `ResolvedInput` is dropped, even if the process panics.
//! We validate the PDF magic bytes (`%PDF`) before returning so callers get a
//! meaningful error rather than an engine crash.

use crate::error::PdfUtilsError;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info};

/// The resolved input — either a local path or a downloaded temp file.
pub enum ResolvedInput {
    /// Input was already a local file.
    Local(PathBuf),
    /// Input was a URL; PDF downloaded to a temp directory.
    /// The `TempDir` is kept alive to prevent cleanup until processing completes.
    Downloaded { path: PathBuf, _temp_dir: TempDir },
}

impl ResolvedInput {
    /// Get the path to the PDF file regardless of how it was resolved.
    pub fn path(&self) -> &Path {
        match self {
            ResolvedInput::Local(p) => p,
            ResolvedInput::Downloaded { path, .. } => path,
        }
    }
}

/// Check if the input string looks like a URL.
pub fn is_url(input: &str) -> bool {
    input.starts_with("http://") || input.starts_with("https://")
}

/// Resolve the input string to a local PDF file path.
///
/// If the input is a URL, download it to a temporary directory.
/// If the input is a local file, validate it exists and is readable.
pub fn resolve_input(input: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfUtilsError> {
    if is_url(input) {
        download_url(input, timeout_secs)
    } else {
        resolve_local(input)
    }
}

/// Resolve a local file path, validating existence and PDF magic bytes.
fn resolve_local(path_str: &str) -> Result<ResolvedInput, PdfUtilsError> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(PdfUtilsError::FileNotFound { path });
    }

    // Check read permission by attempting to open
    match std::fs::File::open(&path) {
        Ok(mut f) => {
            // Verify PDF magic bytes
            use std::io::Read;
            let mut magic = [0u8; 4];
            if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
                return Err(PdfUtilsError::NotAPdf { path, magic });
            }
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(PdfUtilsError::PermissionDenied { path });
        }
        Err(_) => {
            return Err(PdfUtilsError::FileNotFound { path });
        }
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(ResolvedInput::Local(path))
}

/// Download a URL to a temporary directory and return the path.
fn download_url(url: &str, timeout_secs: u64) -> Result<ResolvedInput, PdfUtilsError> {
    info!("Downloading PDF from: {}", url);

    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| PdfUtilsError::DownloadFailed {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

    let response = client.get(url).send().map_err(|e| {
        if e.is_timeout() {
            PdfUtilsError::DownloadTimeout {
                url: url.to_string(),
                secs: timeout_secs,
            }
        } else {
            PdfUtilsError::DownloadFailed {
                url: url.to_string(),
                reason: e.to_string(),
            }
        }
    })?;

    if !response.status().is_success() {
        return Err(PdfUtilsError::DownloadFailed {
            url: url.to_string(),
            reason: format!("HTTP {}", response.status()),
        });
    }

    let filename = extract_filename(url);

    let temp_dir = TempDir::new().map_err(|e| PdfUtilsError::Internal(e.to_string()))?;
    let file_path = temp_dir.path().join(&filename);

    let bytes = response.bytes().map_err(|e| PdfUtilsError::DownloadFailed {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // Verify PDF magic bytes before touching disk
    if bytes.len() >= 4 && &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[..4]);
        return Err(PdfUtilsError::NotAPdf {
            path: file_path,
            magic,
        });
    }

    std::fs::write(&file_path, &bytes)
        .map_err(|e| PdfUtilsError::Internal(format!("Failed to write temp file: {}", e)))?;

    info!("Downloaded to: {}", file_path.display());

    Ok(ResolvedInput::Downloaded {
        path: file_path,
        _temp_dir: temp_dir,
    })
}

/// Extract a reasonable filename from the URL path.
fn extract_filename(url: &str) -> String {
    if let Ok(parsed) = reqwest::Url::parse(url) {
        if let Some(mut segments) = parsed.path_segments() {
            if let Some(last) = segments.next_back() {
                if !last.is_empty() && last.contains('.') {
                    return last.to_string();
                }
            }
        }
    }

    "downloaded.pdf".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(is_url("https://example.com/doc.pdf"));
        assert!(is_url("http://example.com/doc.pdf"));
        assert!(!is_url("/tmp/doc.pdf"));
        assert!(!is_url("doc.pdf"));
        assert!(!is_url(""));
    }

    #[test]
    fn test_extract_filename() {
        assert_eq!(
            extract_filename("https://example.com/papers/report.pdf"),
            "report.pdf"
        );
        assert_eq!(extract_filename("https://example.com/"), "downloaded.pdf");
        assert_eq!(extract_filename("not a url"), "downloaded.pdf");
    }

    #[test]
    fn test_resolve_local_missing_file() {
        let result = resolve_input("/definitely/not/a/real/file.pdf", 5);
        assert!(matches!(result, Err(PdfUtilsError::FileNotFound { .. })));
    }

    #[test]
    fn test_resolve_local_rejects_non_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.pdf");
        std::fs::write(&path, b"not a pdf at all").unwrap();

        let result = resolve_input(path.to_str().unwrap(), 5);
        assert!(matches!(result, Err(PdfUtilsError::NotAPdf { .. })));
    }

    #[test]
    fn test_resolve_local_accepts_pdf_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("real.pdf");
        std::fs::write(&path, b"%PDF-1.7\n%stub").unwrap();

        let resolved = resolve_input(path.to_str().unwrap(), 5).unwrap();
        assert_eq!(resolved.path(), path.as_path());
    }
}
