// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF compression — strip descriptive metadata, drop orphaned objects, and
// flate-compress uncompressed content streams.

use lopdf::{Dictionary, Document, Object};
use tracing::{debug, info, instrument};

use blattwerk_core::error::{BlattwerkError, Result};

/// Compress a PDF.
///
/// Three size-reducing passes: the /Info dictionary is replaced with a
/// minimal one (title, author, subject, and keywords removed; producer and
/// creator set to `producer`), unreferenced objects are pruned, and every
/// stream without a filter is flate-compressed. Output is a complete
/// re-serialization of the document.
#[instrument(skip(data), fields(input_bytes = data.len()))]
pub fn compress_pdf(data: &[u8], producer: &str) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(data).map_err(|err| {
        BlattwerkError::PdfError(format!("failed to load PDF for compression: {}", err))
    })?;

    replace_info(&mut doc, producer);
    doc.prune_objects();
    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        BlattwerkError::PdfError(format!("failed to serialise compressed PDF: {}", err))
    })?;

    info!(
        input_bytes = data.len(),
        output_bytes = output.len(),
        "PDF compressed"
    );
    Ok(output)
}

/// Replace the document's /Info dictionary with a minimal one.
fn replace_info(doc: &mut Document, producer: &str) {
    let info = Dictionary::from_iter(vec![
        ("Producer", Object::string_literal(producer)),
        ("Creator", Object::string_literal(producer)),
    ]);

    let existing = match doc.trailer.get(b"Info") {
        Ok(Object::Reference(id)) => Some(*id),
        _ => None,
    };

    match existing {
        Some(id) => {
            if let Ok(object) = doc.get_object_mut(id) {
                debug!("Replacing existing /Info dictionary");
                *object = Object::Dictionary(info);
            }
        }
        None => {
            let id = doc.add_object(info);
            doc.trailer.set("Info", Object::Reference(id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::testutil::sample_pdf;

    fn info_dict(doc: &Document) -> Dictionary {
        let Ok(Object::Reference(id)) = doc.trailer.get(b"Info") else {
            panic!("no /Info reference in trailer");
        };
        match doc.get_object(*id) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            other => panic!("unexpected /Info object: {:?}", other),
        }
    }

    #[test]
    fn output_is_loadable_with_same_pages() {
        let input = sample_pdf(4);
        let output = compress_pdf(&input, "Blattwerk").unwrap();

        let reader = PdfReader::from_bytes(&output).unwrap();
        assert_eq!(reader.page_count(), 4);
    }

    #[test]
    fn metadata_is_stripped() {
        let input = sample_pdf(1);
        let output = compress_pdf(&input, "Blattwerk").unwrap();

        let doc = Document::load_mem(&output).unwrap();
        let info = info_dict(&doc);
        assert!(info.get(b"Title").is_err());
        assert!(info.get(b"Author").is_err());
        assert_eq!(
            info.get(b"Producer").unwrap(),
            &Object::string_literal("Blattwerk")
        );
    }

    #[test]
    fn content_streams_gain_a_filter() {
        // The sample PDF's content streams are stored raw; compression must
        // leave them flate-encoded.
        let output = compress_pdf(&sample_pdf(1), "Blattwerk").unwrap();
        let doc = Document::load_mem(&output).unwrap();

        let (_, page_id) = doc.get_pages().into_iter().next().unwrap();
        let Ok(Object::Dictionary(page)) = doc.get_object(page_id) else {
            panic!("page is not a dictionary");
        };
        let Ok(Object::Reference(content_id)) = page.get(b"Contents") else {
            panic!("no /Contents reference");
        };
        let Ok(Object::Stream(stream)) = doc.get_object(*content_id) else {
            panic!("content is not a stream");
        };
        assert!(stream.dict.get(b"Filter").is_ok());
    }

    #[test]
    fn garbage_input_rejected() {
        assert!(compress_pdf(b"nope", "Blattwerk").is_err());
    }
}
