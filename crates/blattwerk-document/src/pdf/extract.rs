// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction — pull the text content out of a PDF, page by page.

use lopdf::Document;
use tracing::{debug, instrument};

use blattwerk_core::error::{BlattwerkError, Result};

/// Extract all text from a PDF.
///
/// Each page's text is prefixed with a `Page {n}:` header and pages are
/// separated by a blank line, so the output stays navigable for long
/// documents. Pages whose content cannot be decoded contribute an empty
/// body rather than failing the whole document.
#[instrument(skip(data), fields(bytes_len = data.len()))]
pub fn extract_text(data: &[u8]) -> Result<String> {
    let doc = Document::load_mem(data).map_err(|err| {
        BlattwerkError::PdfError(format!("failed to load PDF for extraction: {}", err))
    })?;

    let mut full_text = String::new();
    let mut undecodable = 0usize;

    for &page_number in doc.get_pages().keys() {
        let page_text = match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(err) => {
                debug!(page_number, %err, "page text not decodable");
                undecodable += 1;
                String::new()
            }
        };
        full_text.push_str(&format!(
            "Page {}:\n{}\n\n",
            page_number,
            page_text.trim_end()
        ));
    }

    debug!(
        pages = doc.get_pages().len(),
        undecodable,
        chars = full_text.len(),
        "Text extracted"
    );
    Ok(full_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::testutil::sample_pdf_with_texts;

    #[test]
    fn extracts_page_prefixed_text() {
        let pdf = sample_pdf_with_texts(&[
            "alpha bravo".to_string(),
            "charlie delta".to_string(),
        ]);
        let text = extract_text(&pdf).unwrap();

        assert!(text.contains("Page 1:"));
        assert!(text.contains("alpha bravo"));
        assert!(text.contains("Page 2:"));
        assert!(text.contains("charlie delta"));
        // Page order is preserved.
        assert!(text.find("alpha").unwrap() < text.find("charlie").unwrap());
    }

    #[test]
    fn garbage_input_rejected() {
        assert!(matches!(
            extract_text(b"not a pdf"),
            Err(BlattwerkError::PdfError(_))
        ));
    }
}
