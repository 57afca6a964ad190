//! PDF merging: concatenate the pages of several documents into one file.
//!
//! lopdf works at the object level, so merging means renumbering every
//! object ID to avoid collisions, gathering the page objects in input order,
//! and building a fresh catalog and page tree that references them. The
//! approach follows lopdf's canonical merge recipe.

use crate::error::PdfUtilsError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Options for combining PDFs.
#[derive(Debug, Clone)]
pub struct CombineOptions {
    /// Input PDF file paths in the order they should be combined.
    pub input_paths: Vec<PathBuf>,
    /// Output PDF file path.
    pub output_path: PathBuf,
}

/// What a combine run produced, for the confirmation printout.
#[derive(Debug, Clone)]
pub struct CombineSummary {
    /// Total pages in the combined document.
    pub page_count: usize,
    /// Each input path with its size in bytes.
    pub inputs: Vec<(PathBuf, u64)>,
    /// Size of the written output file in bytes.
    pub output_bytes: u64,
}

/// Combine multiple PDF files into a single PDF.
///
/// All inputs are checked for existence up front so the error lists every
/// missing file at once instead of stopping at the first.
///
/// # Example
///
/// ```no_run
/// use pdf_utils::combine::{combine_pdfs, CombineOptions};
/// use std::path::PathBuf;
///
/// let options = CombineOptions {
///     input_paths: vec![
///         PathBuf::from("File1.pdf"),
///         PathBuf::from("File2.pdf"),
///     ],
///     output_path: PathBuf::from("Combined_Files.pdf"),
/// };
///
/// let summary = combine_pdfs(&options).expect("Failed to combine PDFs");
/// println!("{} pages", summary.page_count);
/// ```
pub fn combine_pdfs(options: &CombineOptions) -> Result<CombineSummary, PdfUtilsError> {
    if options.input_paths.is_empty() {
        return Err(PdfUtilsError::InvalidConfig(
            "No input files provided".to_string(),
        ));
    }

    let missing: Vec<PathBuf> = options
        .input_paths
        .iter()
        .filter(|p| !p.exists())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(PdfUtilsError::MissingInputs(missing));
    }

    // Load all documents
    let mut documents: Vec<Document> = Vec::new();
    for path in &options.input_paths {
        info!("Loading {}", path.display());
        let doc = Document::load(path)?;

        if doc.get_pages().is_empty() {
            return Err(PdfUtilsError::EmptyPdf(path.clone()));
        }

        documents.push(doc);
    }

    // Renumber every document into one shared ID space and collect the page
    // objects in input order.
    let mut max_id = 1;
    let mut page_ids: Vec<ObjectId> = Vec::new();
    let mut objects: BTreeMap<ObjectId, Object> = BTreeMap::new();

    for mut doc in documents {
        doc.renumber_objects_with(max_id);
        max_id = doc.max_id + 1;

        let pages = doc.get_pages();
        page_ids.extend(pages.into_iter().map(|(_, id)| id));

        objects.extend(doc.objects);
    }
    debug!("Collected {} objects, {} pages", objects.len(), page_ids.len());

    let mut combined = Document::with_version("1.5");
    combined.objects.extend(objects);

    // new_object_id() hands out max_id + 1; without this the catalog and
    // pages objects would collide with IDs we just inserted.
    combined.max_id = max_id - 1;

    let pages_id = combined.new_object_id();

    let kids: Vec<Object> = page_ids.iter().map(|&id| Object::Reference(id)).collect();

    let mut pages_dict = Dictionary::new();
    pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
    pages_dict.set("Count", Object::Integer(page_ids.len() as i64));
    pages_dict.set("Kids", Object::Array(kids));

    let catalog_id = combined.new_object_id();
    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));

    combined
        .objects
        .insert(catalog_id, Object::Dictionary(catalog));
    combined
        .objects
        .insert(pages_id, Object::Dictionary(pages_dict));

    combined.trailer.set("Root", Object::Reference(catalog_id));

    // Every page must point at the new page tree node.
    for &page_id in &page_ids {
        if let Ok(page_object) = combined.get_object_mut(page_id) {
            if let Object::Dictionary(ref mut dict) = page_object {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    combined.compress();
    combined.save(&options.output_path)?;

    let inputs = options
        .input_paths
        .iter()
        .map(|p| Ok((p.clone(), std::fs::metadata(p)?.len())))
        .collect::<Result<Vec<_>, std::io::Error>>()?;
    let output_bytes = std::fs::metadata(&options.output_path)?.len();

    info!(
        "Combined {} files → {} ({} pages, {} bytes)",
        inputs.len(),
        options.output_path.display(),
        page_ids.len(),
        output_bytes
    );

    Ok(CombineSummary {
        page_count: page_ids.len(),
        inputs,
        output_bytes,
    })
}

/// Count the number of pages in a PDF file.
///
/// Reads the `Count` entry of the root page tree node, which also covers
/// nested page trees that `get_pages()` may miscount.
pub fn count_pages(path: &Path) -> Result<usize, PdfUtilsError> {
    if !path.exists() {
        return Err(PdfUtilsError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let doc = Document::load(path)?;
    let count = count_pages_from_catalog(&doc)?;

    if count == 0 {
        return Err(PdfUtilsError::EmptyPdf(path.to_path_buf()));
    }

    Ok(count)
}

/// Walk trailer → catalog → pages and read the `Count` field.
fn count_pages_from_catalog(doc: &Document) -> Result<usize, PdfUtilsError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| PdfUtilsError::Internal("No Root reference in trailer".to_string()))?;

    let catalog = doc
        .get_object(catalog_id)
        .and_then(Object::as_dict)
        .map_err(|_| PdfUtilsError::Internal("Catalog is not a dictionary".to_string()))?;

    let pages_id = catalog
        .get(b"Pages")
        .and_then(Object::as_reference)
        .map_err(|_| PdfUtilsError::Internal("No Pages reference in catalog".to_string()))?;

    let pages = doc
        .get_object(pages_id)
        .and_then(Object::as_dict)
        .map_err(|_| PdfUtilsError::Internal("Pages is not a dictionary".to_string()))?;

    let count = pages
        .get(b"Count")
        .and_then(Object::as_i64)
        .map_err(|_| PdfUtilsError::Internal("Pages has no integer Count".to_string()))?;

    Ok(count as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_list_is_rejected() {
        let options = CombineOptions {
            input_paths: vec![],
            output_path: PathBuf::from("out.pdf"),
        };
        let result = combine_pdfs(&options);
        assert!(matches!(result, Err(PdfUtilsError::InvalidConfig(_))));
    }

    #[test]
    fn all_missing_inputs_are_listed() {
        let options = CombineOptions {
            input_paths: vec![
                PathBuf::from("/no/such/File1.pdf"),
                PathBuf::from("/no/such/File2.pdf"),
            ],
            output_path: PathBuf::from("out.pdf"),
        };
        match combine_pdfs(&options) {
            Err(PdfUtilsError::MissingInputs(paths)) => assert_eq!(paths.len(), 2),
            other => panic!("expected MissingInputs, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn count_pages_nonexistent_file() {
        let result = count_pages(Path::new("nonexistent.pdf"));
        assert!(matches!(result, Err(PdfUtilsError::FileNotFound { .. })));
    }

    // Merge round-trips with generated documents live in tests/e2e.rs.
}
