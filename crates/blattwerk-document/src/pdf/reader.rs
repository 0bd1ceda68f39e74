// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — open, inspect, and split existing PDF documents using the
// `lopdf` crate.

use std::path::Path;

use lopdf::{Dictionary, Document, Object, ObjectId};
use tracing::{debug, info, instrument, warn};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{PageInfo, ProcessedFile, SplitRange};

/// Reads and splits existing PDF files.
///
/// Wraps `lopdf::Document` and provides higher-level operations: page
/// inspection for previews and extraction of named page ranges into
/// standalone documents.
pub struct PdfReader {
    /// The underlying lopdf document.
    document: Document,
    /// Source path, if opened from a file (useful for diagnostics).
    source_path: Option<String>,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Open a PDF from the filesystem.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        info!("Opening PDF: {}", path_ref.display());

        let document = Document::load(path_ref).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to open {}: {}", path_ref.display(), err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded");

        Ok(Self {
            document,
            source_path: Some(path_ref.display().to_string()),
        })
    }

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self {
            document,
            source_path: None,
        })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> u32 {
        self.document.get_pages().len() as u32
    }

    /// Return the source path if the reader was created via [`PdfReader::open`].
    pub fn source_path(&self) -> Option<&str> {
        self.source_path.as_deref()
    }

    /// Borrow the underlying lopdf document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Per-page geometry, in page order.
    ///
    /// The MediaBox may live on the page itself or be inherited from an
    /// ancestor /Pages node; both cases are resolved. Pages without any
    /// resolvable MediaBox fall back to US Letter (612x792) with a warning.
    #[instrument(skip(self))]
    pub fn page_infos(&self) -> Vec<PageInfo> {
        self.document
            .get_pages()
            .iter()
            .map(|(&page_number, &page_id)| {
                let (width, height) = self.media_box(page_id).unwrap_or_else(|| {
                    warn!(page_number, "no MediaBox found, assuming Letter");
                    (612.0, 792.0)
                });
                PageInfo {
                    page_number,
                    width,
                    height,
                }
            })
            .collect()
    }

    // -- Splitting ------------------------------------------------------------

    /// Extract each named range into its own standalone PDF.
    ///
    /// All ranges are validated against the page count before any output is
    /// produced, so a bad range fails the whole operation rather than
    /// yielding partial results.
    #[instrument(skip(self), fields(range_count = ranges.len()))]
    pub fn split_ranges(&self, ranges: &[SplitRange]) -> Result<Vec<ProcessedFile>> {
        if ranges.is_empty() {
            return Err(BlattwerkError::InvalidRange(
                "no split ranges specified".to_string(),
            ));
        }

        let total = self.page_count();
        for range in ranges {
            range.validate(total)?;
        }

        info!(total, ranges = ranges.len(), "Splitting PDF");

        let mut outputs = Vec::with_capacity(ranges.len());
        for range in ranges {
            let bytes = self.extract_page_range(range.start, range.end)?;
            outputs.push(ProcessedFile::new(
                format!("split-{}", range.name),
                format!("{}.pdf", range.name),
                "application/pdf",
                bytes,
            ));
        }

        Ok(outputs)
    }

    /// Extract a contiguous range of pages [start..=end] (1-indexed) into a
    /// new PDF returned as bytes.
    fn extract_page_range(&self, start: u32, end: u32) -> Result<Vec<u8>> {
        let pages = self.document.get_pages();
        let (mut new_doc, pages_id) = empty_document();

        for page_num in start..=end {
            let page_id = *pages.get(&page_num).ok_or_else(|| {
                BlattwerkError::PdfError(format!(
                    "page {} not found during range extraction",
                    page_num
                ))
            })?;
            clone_page_into(&self.document, &mut new_doc, page_id, pages_id)?;
        }

        let mut output = Vec::new();
        new_doc.save_to(&mut output).map_err(|err| {
            BlattwerkError::PdfError(format!("failed to serialise page range: {}", err))
        })?;

        debug!(start, end, output_bytes = output.len(), "Range extracted");
        Ok(output)
    }

    // -- Helpers --------------------------------------------------------------

    /// Resolve a page's MediaBox, walking /Parent links for inherited boxes.
    fn media_box(&self, page_id: ObjectId) -> Option<(f32, f32)> {
        let mut dict = self.object_dict(page_id)?;

        // /Parent chains are short; the bound guards against cycles in
        // malformed files.
        for _ in 0..32 {
            if let Ok(boxed) = dict.get(b"MediaBox") {
                let resolved = match boxed {
                    Object::Reference(id) => self.document.get_object(*id).ok()?,
                    other => other,
                };
                return media_box_dimensions(resolved);
            }
            let parent_id = match dict.get(b"Parent") {
                Ok(Object::Reference(id)) => *id,
                _ => return None,
            };
            dict = self.object_dict(parent_id)?;
        }
        None
    }

    fn object_dict(&self, id: ObjectId) -> Option<&Dictionary> {
        match self.document.get_object(id).ok()? {
            Object::Dictionary(dict) => Some(dict),
            _ => None,
        }
    }
}

/// Read `[x0 y0 x1 y1]` out of a MediaBox array as (width, height).
fn media_box_dimensions(object: &Object) -> Option<(f32, f32)> {
    let Object::Array(values) = object else {
        return None;
    };
    if values.len() != 4 {
        return None;
    }
    let nums: Vec<f32> = values.iter().filter_map(number).collect();
    if nums.len() != 4 {
        return None;
    }
    Some(((nums[2] - nums[0]).abs(), (nums[3] - nums[1]).abs()))
}

fn number(object: &Object) -> Option<f32> {
    match object {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r as f32),
        _ => None,
    }
}

/// A fresh single-tree document: catalog plus an empty /Pages node.
///
/// Returns the document and the /Pages object id so pages can be appended.
fn empty_document() -> (Document, ObjectId) {
    let mut doc = Document::with_version("1.5");

    let pages_id = doc.new_object_id();
    let pages_dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Pages".to_vec())),
        ("Count", Object::Integer(0)),
        ("Kids", Object::Array(Vec::new())),
    ]);
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"Catalog".to_vec())),
        ("Pages", Object::Reference(pages_id)),
    ]);
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));

    (doc, pages_id)
}

/// Clone a single page object (and its referenced resources) from `source`
/// into `target`, appending it under the target's /Pages node.
///
/// Stream data, fonts, and images referenced by the page dictionary are
/// copied as new objects in the target document.
fn clone_page_into(
    source: &Document,
    target: &mut Document,
    page_id: ObjectId,
    pages_id: ObjectId,
) -> Result<()> {
    let page_object = source.get_object(page_id).map_err(|err| {
        BlattwerkError::PdfError(format!("cannot read page object {:?}: {}", page_id, err))
    })?;

    // Deep-clone the page object and all objects it transitively references.
    let cloned = deep_clone_object(source, target, page_object)?;
    let cloned_id = target.add_object(cloned);

    // Add the page reference to the /Kids array and bump /Count.
    if let Ok(Object::Dictionary(pages_dict)) = target.get_object_mut(pages_id) {
        if let Ok(Object::Array(kids)) = pages_dict.get_mut(b"Kids") {
            kids.push(Object::Reference(cloned_id));
        }
        if let Ok(count_obj) = pages_dict.get_mut(b"Count")
            && let Object::Integer(count) = count_obj
        {
            *count += 1;
        }
    }

    // Point the cloned page's /Parent at the target's /Pages node.
    if let Ok(Object::Dictionary(page_dict)) = target.get_object_mut(cloned_id) {
        page_dict.set("Parent", Object::Reference(pages_id));
    }

    Ok(())
}

/// Deep-clone a single lopdf Object, recursively resolving references
/// (except /Parent, which is deliberately skipped to avoid circular cloning
/// and patched by the caller).
fn deep_clone_object(source: &Document, target: &mut Document, object: &Object) -> Result<Object> {
    match object {
        Object::Dictionary(dict) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Dictionary(new_dict))
        }
        Object::Array(arr) => {
            let mut new_arr = Vec::with_capacity(arr.len());
            for item in arr {
                new_arr.push(deep_clone_object(source, target, item)?);
            }
            Ok(Object::Array(new_arr))
        }
        Object::Reference(ref_id) => {
            // Resolve the reference in the source, clone the referent, and
            // return a reference to the new copy in the target.
            match source.get_object(*ref_id) {
                Ok(referenced) => {
                    let cloned = deep_clone_object(source, target, referenced)?;
                    let new_id = target.add_object(cloned);
                    Ok(Object::Reference(new_id))
                }
                Err(err) => {
                    warn!(?ref_id, %err, "Cannot resolve reference, using Null");
                    Ok(Object::Null)
                }
            }
        }
        Object::Stream(stream) => {
            let mut new_dict = Dictionary::new();
            for (key, value) in stream.dict.iter() {
                if key == b"Parent" {
                    continue;
                }
                let cloned_value = deep_clone_object(source, target, value)?;
                new_dict.set(key.clone(), cloned_value);
            }
            Ok(Object::Stream(lopdf::Stream::new(
                new_dict,
                stream.content.clone(),
            )))
        }
        // All other object types (Boolean, Integer, Real, String, Name, Null)
        // are trivially cloneable.
        other => Ok(other.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testutil::sample_pdf;

    #[test]
    fn page_count_and_infos() {
        let reader = PdfReader::from_bytes(&sample_pdf(3)).unwrap();
        assert_eq!(reader.page_count(), 3);

        let infos = reader.page_infos();
        assert_eq!(infos.len(), 3);
        assert_eq!(infos[0].page_number, 1);
        assert_eq!(infos[0].width, 612.0);
        assert_eq!(infos[0].height, 792.0);
    }

    #[test]
    fn split_produces_one_file_per_range() {
        let reader = PdfReader::from_bytes(&sample_pdf(5)).unwrap();
        let ranges = vec![
            SplitRange::new(1, 2, "Part 1"),
            SplitRange::new(3, 5, "Part 2"),
        ];

        let outputs = reader.split_ranges(&ranges).unwrap();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].name, "Part 1.pdf");
        assert_eq!(outputs[1].name, "Part 2.pdf");

        let first = PdfReader::from_bytes(&outputs[0].data).unwrap();
        assert_eq!(first.page_count(), 2);
        let second = PdfReader::from_bytes(&outputs[1].data).unwrap();
        assert_eq!(second.page_count(), 3);
    }

    #[test]
    fn overlapping_ranges_are_allowed() {
        // The same source page may appear in several outputs.
        let reader = PdfReader::from_bytes(&sample_pdf(3)).unwrap();
        let ranges = vec![SplitRange::new(1, 2, "a"), SplitRange::new(2, 3, "b")];
        let outputs = reader.split_ranges(&ranges).unwrap();
        assert_eq!(outputs.len(), 2);
        for output in &outputs {
            assert_eq!(PdfReader::from_bytes(&output.data).unwrap().page_count(), 2);
        }
    }

    #[test]
    fn invalid_range_fails_whole_split() {
        let reader = PdfReader::from_bytes(&sample_pdf(3)).unwrap();
        let ranges = vec![
            SplitRange::new(1, 2, "good"),
            SplitRange::new(2, 9, "too far"),
        ];
        assert!(matches!(
            reader.split_ranges(&ranges),
            Err(BlattwerkError::InvalidRange(_))
        ));
    }

    #[test]
    fn empty_ranges_rejected() {
        let reader = PdfReader::from_bytes(&sample_pdf(1)).unwrap();
        assert!(reader.split_ranges(&[]).is_err());
    }

    #[test]
    fn garbage_bytes_rejected() {
        assert!(matches!(
            PdfReader::from_bytes(b"not a pdf at all"),
            Err(BlattwerkError::PdfError(_))
        ));
    }

    #[test]
    fn open_from_file_records_source_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("three-pages.pdf");
        std::fs::write(&path, sample_pdf(3)).unwrap();

        let reader = PdfReader::open(&path).unwrap();
        assert_eq!(reader.page_count(), 3);
        assert_eq!(reader.source_path(), Some(path.display().to_string().as_str()));
    }

    #[test]
    fn missing_file_rejected() {
        assert!(PdfReader::open("/nonexistent/nope.pdf").is_err());
    }
}
