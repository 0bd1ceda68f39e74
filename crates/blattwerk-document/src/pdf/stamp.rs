// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image stamping — embed a raster image as an XObject on a page of an
// existing PDF at an absolute placement.
//
// JPEG data passes through untouched under DCTDecode; PNG is flattened to
// raw RGB (alpha dropped) and left for the final compression pass to flate.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};
use tracing::{debug, info, instrument};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{ImageKind, ImagePlacement};

use crate::image::processor::ImageProcessor;

/// Draw an image onto one page of an existing PDF.
///
/// The image becomes a new XObject in the page's resources and a content
/// stream appended after the existing page content, so it is painted on top.
/// Placement coordinates are PDF points from the bottom-left page corner.
#[instrument(skip(pdf_data, image_data), fields(pdf_bytes = pdf_data.len(), image_bytes = image_data.len(), page = placement.page))]
pub fn add_image_to_pdf(
    pdf_data: &[u8],
    image_data: &[u8],
    placement: ImagePlacement,
) -> Result<Vec<u8>> {
    let mut doc = Document::load_mem(pdf_data).map_err(|err| {
        BlattwerkError::PdfError(format!("failed to load PDF for stamping: {}", err))
    })?;

    let pages = doc.get_pages();
    let total = pages.len() as u32;
    if placement.page == 0 || placement.page > total {
        return Err(BlattwerkError::PageOutOfRange {
            requested: placement.page,
            available: total,
        });
    }
    let page_id = *pages.get(&placement.page).ok_or_else(|| {
        BlattwerkError::PdfError(format!(
            "page {} not found in page tree",
            placement.page
        ))
    })?;

    let kind = ImageKind::from_magic(image_data).ok_or_else(|| {
        BlattwerkError::UnsupportedDocument(
            "only JPEG and PNG images can be stamped onto a PDF".to_string(),
        )
    })?;
    let decoded = ImageProcessor::from_bytes(image_data)?;

    info!(
        ?kind,
        width = decoded.width(),
        height = decoded.height(),
        "Stamping image onto page"
    );

    let image_id = doc.add_object(image_xobject(&decoded, kind, image_data));

    // Effective resources (own or inherited), with the new XObject entry.
    let mut resources = effective_resources(&doc, page_id);
    let name = register_xobject(&mut resources, image_id);

    let stamp_id = doc.add_object(stamp_content_stream(&name, placement)?);

    let page_dict = match doc.get_object_mut(page_id) {
        Ok(Object::Dictionary(dict)) => dict,
        _ => {
            return Err(BlattwerkError::PdfError(format!(
                "page object {:?} is not a dictionary",
                page_id
            )));
        }
    };
    page_dict.set("Resources", Object::Dictionary(resources));
    append_contents(page_dict, stamp_id);

    doc.prune_objects();
    doc.compress();

    let mut output = Vec::new();
    doc.save_to(&mut output).map_err(|err| {
        BlattwerkError::PdfError(format!("failed to serialise stamped PDF: {}", err))
    })?;

    debug!(output_bytes = output.len(), "Stamp complete");
    Ok(output)
}

/// Build the image XObject stream.
fn image_xobject(decoded: &ImageProcessor, kind: ImageKind, raw_data: &[u8]) -> Stream {
    let mut dict = Dictionary::from_iter(vec![
        ("Type", Object::Name(b"XObject".to_vec())),
        ("Subtype", Object::Name(b"Image".to_vec())),
        ("Width", Object::Integer(i64::from(decoded.width()))),
        ("Height", Object::Integer(i64::from(decoded.height()))),
        ("BitsPerComponent", Object::Integer(8)),
    ]);

    match kind {
        ImageKind::Jpeg => {
            // Pass the JPEG through as-is; pick the colour space to match
            // its channel count.
            let colorspace: &[u8] = if decoded.is_grayscale() {
                b"DeviceGray"
            } else {
                b"DeviceRGB"
            };
            dict.set("ColorSpace", Object::Name(colorspace.to_vec()));
            dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
            Stream::new(dict, raw_data.to_vec())
        }
        ImageKind::Png => {
            dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec()));
            Stream::new(dict, decoded.to_raw_rgb())
        }
    }
}

/// Clone the page's effective /Resources dictionary, walking /Parent links
/// for inherited resources. Returns an empty dictionary when none exists.
fn effective_resources(doc: &Document, page_id: ObjectId) -> Dictionary {
    let mut current = page_id;
    for _ in 0..32 {
        let Ok(Object::Dictionary(dict)) = doc.get_object(current) else {
            break;
        };
        if let Ok(entry) = dict.get(b"Resources") {
            let resolved = match entry {
                Object::Reference(id) => doc.get_object(*id).ok(),
                other => Some(other),
            };
            if let Some(Object::Dictionary(resources)) = resolved {
                return resources.clone();
            }
        }
        match dict.get(b"Parent") {
            Ok(Object::Reference(id)) => current = *id,
            _ => break,
        }
    }
    Dictionary::new()
}

/// Insert `image_id` into the resources' /XObject dictionary under a fresh
/// name, returning that name.
fn register_xobject(resources: &mut Dictionary, image_id: ObjectId) -> String {
    let mut xobjects = match resources.get(b"XObject") {
        Ok(Object::Dictionary(dict)) => dict.clone(),
        _ => Dictionary::new(),
    };

    let mut index = 0usize;
    let name = loop {
        let candidate = format!("Im{index}");
        if xobjects.get(candidate.as_bytes()).is_err() {
            break candidate;
        }
        index += 1;
    };

    xobjects.set(name.as_bytes().to_vec(), Object::Reference(image_id));
    resources.set("XObject", Object::Dictionary(xobjects));
    name
}

/// The q/cm/Do/Q sequence painting the named XObject at the placement.
fn stamp_content_stream(name: &str, placement: ImagePlacement) -> Result<Stream> {
    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    Object::Real(placement.width),
                    Object::Real(0.0),
                    Object::Real(0.0),
                    Object::Real(placement.height),
                    Object::Real(placement.x),
                    Object::Real(placement.y),
                ],
            ),
            Operation::new("Do", vec![Object::Name(name.as_bytes().to_vec())]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content.encode().map_err(|err| {
        BlattwerkError::PdfError(format!("failed to encode stamp content: {}", err))
    })?;
    Ok(Stream::new(Dictionary::new(), encoded))
}

/// Append a content stream reference to the page's /Contents.
fn append_contents(page_dict: &mut Dictionary, stamp_id: ObjectId) {
    enum Existing {
        Single(ObjectId),
        Array,
        Missing,
    }

    let existing = match page_dict.get(b"Contents") {
        Ok(Object::Reference(id)) => Existing::Single(*id),
        Ok(Object::Array(_)) => Existing::Array,
        _ => Existing::Missing,
    };

    match existing {
        Existing::Single(old) => {
            page_dict.set(
                "Contents",
                Object::Array(vec![Object::Reference(old), Object::Reference(stamp_id)]),
            );
        }
        Existing::Array => {
            if let Ok(Object::Array(arr)) = page_dict.get_mut(b"Contents") {
                arr.push(Object::Reference(stamp_id));
            }
        }
        Existing::Missing => {
            page_dict.set("Contents", Object::Reference(stamp_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::testutil::{sample_jpeg, sample_pdf, sample_png};

    fn placement(page: u32) -> ImagePlacement {
        ImagePlacement {
            x: 72.0,
            y: 72.0,
            width: 144.0,
            height: 96.0,
            page,
        }
    }

    fn page_dict(doc: &Document, page_number: u32) -> Dictionary {
        let pages = doc.get_pages();
        match doc.get_object(pages[&page_number]) {
            Ok(Object::Dictionary(dict)) => dict.clone(),
            other => panic!("unexpected page object: {:?}", other),
        }
    }

    #[test]
    fn stamps_png_onto_first_page() {
        let output = add_image_to_pdf(&sample_pdf(2), &sample_png(4, 4), placement(1)).unwrap();

        let reader = PdfReader::from_bytes(&output).unwrap();
        assert_eq!(reader.page_count(), 2);

        let doc = Document::load_mem(&output).unwrap();
        let page = page_dict(&doc, 1);

        // Resources keep the original font and gain an XObject entry.
        let Ok(Object::Dictionary(resources)) = page.get(b"Resources") else {
            panic!("no inline resources");
        };
        assert!(resources.get(b"Font").is_ok());
        let Ok(Object::Dictionary(xobjects)) = resources.get(b"XObject") else {
            panic!("no XObject dictionary");
        };
        assert!(xobjects.get(b"Im0").is_ok());

        // The stamp is appended after the original content.
        let Ok(Object::Array(contents)) = page.get(b"Contents") else {
            panic!("contents not an array");
        };
        assert_eq!(contents.len(), 2);
    }

    #[test]
    fn stamps_jpeg_with_dct_passthrough() {
        let output = add_image_to_pdf(&sample_pdf(1), &sample_jpeg(8, 8), placement(1)).unwrap();

        let doc = Document::load_mem(&output).unwrap();
        let page = page_dict(&doc, 1);
        let Ok(Object::Dictionary(resources)) = page.get(b"Resources") else {
            panic!("no inline resources");
        };
        let Ok(Object::Dictionary(xobjects)) = resources.get(b"XObject") else {
            panic!("no XObject dictionary");
        };
        let Ok(Object::Reference(image_id)) = xobjects.get(b"Im0") else {
            panic!("XObject entry is not a reference");
        };
        let Ok(Object::Stream(stream)) = doc.get_object(*image_id) else {
            panic!("image is not a stream");
        };
        assert_eq!(
            stream.dict.get(b"Filter").unwrap(),
            &Object::Name(b"DCTDecode".to_vec())
        );
    }

    #[test]
    fn untouched_pages_stay_untouched() {
        let output = add_image_to_pdf(&sample_pdf(3), &sample_png(4, 4), placement(2)).unwrap();
        let doc = Document::load_mem(&output).unwrap();

        for untouched in [1u32, 3] {
            let page = page_dict(&doc, untouched);
            let Ok(Object::Dictionary(resources)) = page.get(b"Resources") else {
                panic!("no inline resources");
            };
            assert!(resources.get(b"XObject").is_err());
        }
    }

    #[test]
    fn page_out_of_range() {
        let result = add_image_to_pdf(&sample_pdf(2), &sample_png(4, 4), placement(5));
        assert!(matches!(
            result,
            Err(BlattwerkError::PageOutOfRange {
                requested: 5,
                available: 2
            })
        ));
    }

    #[test]
    fn unsupported_image_rejected() {
        let result = add_image_to_pdf(&sample_pdf(1), b"GIF89a...", placement(1));
        assert!(matches!(
            result,
            Err(BlattwerkError::UnsupportedDocument(_))
        ));
    }
}
