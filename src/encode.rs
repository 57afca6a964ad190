//! Base64 payload encoding: a PDF's bytes as a single printable string.
//!
//! The standard alphabet (RFC 4648, with padding) is used because that is
//! what JSON APIs expecting an embedded document payload almost universally
//! accept. The whole file is read into memory — PDFs that need streaming
//! encoders are not the use case here.

use crate::error::PdfUtilsError;
use crate::pipeline::input;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::debug;

/// Default timeout for URL inputs, matching the OCR tool's default.
const DOWNLOAD_TIMEOUT_SECS: u64 = 120;

/// Read a PDF (local path or URL) and return its bytes as a base64 string.
///
/// The input is validated (existence, readability, `%PDF` magic bytes)
/// before encoding, so a typo'd path fails with a clear error instead of
/// silently encoding the wrong file.
pub fn pdf_to_base64(input_str: impl AsRef<str>) -> Result<String, PdfUtilsError> {
    let resolved = input::resolve_input(input_str.as_ref(), DOWNLOAD_TIMEOUT_SECS)?;

    let bytes = std::fs::read(resolved.path())?;
    let payload = STANDARD.encode(&bytes);
    debug!(
        "Encoded {} bytes → {} bytes base64",
        bytes.len(),
        payload.len()
    );

    Ok(payload)
}
