//! End-to-end integration tests for pdf-utils.
//!
//! The combine and encode tests build their own one-page PDF fixtures with
//! lopdf and always run. The OCR tests additionally need the native engines
//! (libpdfium and tesseract), so they are gated behind the `E2E_ENABLED`
//! environment variable and skip cleanly elsewhere.
//!
//! Run everything with:
//!   E2E_ENABLED=1 cargo test --test e2e -- --nocapture

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};
use pdf_utils::combine::{combine_pdfs, count_pages, CombineOptions};
use pdf_utils::{inspect, ocr, pdf_to_base64, OcrConfig, PageSelection, PdfUtilsError};
use std::path::Path;
use tempfile::TempDir;

// ── Test helpers ─────────────────────────────────────────────────────────────

/// Build a minimal but complete one-page PDF with a line of Helvetica text.
fn write_one_page_pdf(path: &Path, text: &str) {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 36.into()]),
            Operation::new("Td", vec![72.into(), 700.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().expect("encode content stream"),
    ));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
    });

    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    doc.save(path).expect("save fixture PDF");
}

/// Skip an engine-dependent test unless E2E_ENABLED is set.
macro_rules! e2e_skip_unless_enabled {
    () => {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run engine-dependent tests");
            return;
        }
    };
}

// ── Combine tests (lopdf only, always run) ───────────────────────────────────

#[test]
fn combine_two_generated_pdfs() {
    let dir = TempDir::new().expect("tempdir");
    let first = dir.path().join("File1.pdf");
    let second = dir.path().join("File2.pdf");
    let output = dir.path().join("Combined_Files.pdf");

    write_one_page_pdf(&first, "First document");
    write_one_page_pdf(&second, "Second document");

    let options = CombineOptions {
        input_paths: vec![first.clone(), second.clone()],
        output_path: output.clone(),
    };
    let summary = combine_pdfs(&options).expect("combine should succeed");

    assert!(output.exists(), "combined PDF was not created");
    assert_eq!(summary.page_count, 2);
    assert_eq!(summary.inputs.len(), 2);
    assert!(summary.output_bytes > 0);

    // The output must itself be a loadable PDF with both pages.
    assert_eq!(count_pages(&output).expect("count pages"), 2);

    let bytes = std::fs::read(&output).expect("read combined");
    assert_eq!(&bytes[..4], b"%PDF");
}

#[test]
fn combine_is_repeatable_on_its_own_output() {
    let dir = TempDir::new().expect("tempdir");
    let first = dir.path().join("a.pdf");
    let second = dir.path().join("b.pdf");
    let merged = dir.path().join("ab.pdf");
    let doubled = dir.path().join("abab.pdf");

    write_one_page_pdf(&first, "a");
    write_one_page_pdf(&second, "b");

    combine_pdfs(&CombineOptions {
        input_paths: vec![first, second],
        output_path: merged.clone(),
    })
    .expect("first combine");

    // Combining a combined file must still work (object renumbering holds up).
    combine_pdfs(&CombineOptions {
        input_paths: vec![merged.clone(), merged.clone()],
        output_path: doubled.clone(),
    })
    .expect("second combine");

    assert_eq!(count_pages(&doubled).expect("count"), 4);
}

#[test]
fn combine_rejects_missing_inputs_listing_all() {
    let dir = TempDir::new().expect("tempdir");
    let present = dir.path().join("here.pdf");
    write_one_page_pdf(&present, "here");

    let options = CombineOptions {
        input_paths: vec![
            present,
            dir.path().join("gone1.pdf"),
            dir.path().join("gone2.pdf"),
        ],
        output_path: dir.path().join("out.pdf"),
    };

    match combine_pdfs(&options) {
        Err(PdfUtilsError::MissingInputs(paths)) => {
            assert_eq!(paths.len(), 2);
            let msg = PdfUtilsError::MissingInputs(paths).to_string();
            assert!(msg.contains("gone1.pdf") && msg.contains("gone2.pdf"));
        }
        other => panic!("expected MissingInputs, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn count_pages_on_generated_fixture() {
    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("one.pdf");
    write_one_page_pdf(&path, "single page");

    assert_eq!(count_pages(&path).expect("count"), 1);
}

// ── Encode tests (always run) ────────────────────────────────────────────────

#[test]
fn encode_round_trips_generated_pdf() {
    use base64::{engine::general_purpose::STANDARD, Engine as _};

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("doc.pdf");
    write_one_page_pdf(&path, "payload");

    let payload = pdf_to_base64(path.to_str().unwrap()).expect("encode should succeed");

    // Base64 output must decode back to exactly the file's bytes.
    let decoded = STANDARD.decode(&payload).expect("valid base64");
    let original = std::fs::read(&path).expect("read fixture");
    assert_eq!(decoded, original);
    assert_eq!(&decoded[..4], b"%PDF");
}

#[test]
fn encode_rejects_nonexistent_input() {
    let result = pdf_to_base64("/definitely/not/a/real/file.pdf");
    assert!(matches!(result, Err(PdfUtilsError::FileNotFound { .. })));
}

// ── Inspect tests (need libpdfium, gated) ────────────────────────────────────

#[test]
fn inspect_generated_pdf() {
    e2e_skip_unless_enabled!();

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("meta.pdf");
    write_one_page_pdf(&path, "metadata probe");

    let meta = inspect(path.to_str().unwrap()).expect("inspect should succeed");
    assert_eq!(meta.page_count, 1);
    assert!(!meta.pdf_version.is_empty());
}

#[test]
fn inspect_nonexistent_is_an_error() {
    let result = inspect("/definitely/not/a/real/file.pdf");
    assert!(result.is_err(), "inspect() should return Err for nonexistent file");
}

// ── OCR tests (need libpdfium + tesseract, gated) ────────────────────────────

#[test]
fn ocr_recognises_generated_text() {
    e2e_skip_unless_enabled!();
    if !pdf_utils::pipeline::tesseract::is_tesseract_available() {
        println!("SKIP — tesseract not installed");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("hello.pdf");
    write_one_page_pdf(&path, "HELLO WORLD");

    let config = OcrConfig::builder().dpi(300).build().expect("valid config");
    let output = ocr(path.to_str().unwrap(), &config).expect("OCR should succeed");

    assert_eq!(output.stats.processed_pages, 1);
    assert_eq!(output.stats.failed_pages, 0);
    assert!(
        output.text.to_lowercase().contains("hello"),
        "expected recognised text to contain 'hello', got: {:?}",
        output.text
    );
    assert!(output.text.starts_with("--- Page 1 ---"));
}

#[test]
fn ocr_from_bytes_matches_file_input() {
    e2e_skip_unless_enabled!();
    if !pdf_utils::pipeline::tesseract::is_tesseract_available() {
        println!("SKIP — tesseract not installed");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("mem.pdf");
    write_one_page_pdf(&path, "IN MEMORY");
    let bytes = std::fs::read(&path).expect("read fixture");

    let config = OcrConfig::default();
    let output = pdf_utils::ocr_from_bytes(&bytes, &config).expect("OCR from bytes");

    assert_eq!(output.stats.processed_pages, 1);
    assert!(!output.text.trim().is_empty());
}

#[test]
fn ocr_to_file_writes_selected_page() {
    e2e_skip_unless_enabled!();
    if !pdf_utils::pipeline::tesseract::is_tesseract_available() {
        println!("SKIP — tesseract not installed");
        return;
    }

    let dir = TempDir::new().expect("tempdir");
    let path = dir.path().join("hello.pdf");
    let out = dir.path().join("hello_OCR.txt");
    write_one_page_pdf(&path, "HELLO AGAIN");

    let config = OcrConfig::builder()
        .pages(PageSelection::Single(1))
        .page_headings(false)
        .build()
        .expect("valid config");

    let stats = pdf_utils::ocr_to_file(path.to_str().unwrap(), &out, &config)
        .expect("OCR to file should succeed");

    assert_eq!(stats.processed_pages, 1);
    let text = std::fs::read_to_string(&out).expect("read output");
    assert!(!text.trim().is_empty());
    assert!(!text.contains("--- Page"), "headings were disabled");
}
