// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF writer — create new PDF documents from text or images using `printpdf`
// 0.8.
//
// printpdf 0.8 uses a data-oriented API: documents are built by constructing
// `PdfPage` structs containing `Vec<Op>` operation lists, then serialised via
// `PdfDocument::save()`. Text placement comes from the blattwerk-layout
// engine; this module only translates placements into ops.

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::{AppConfig, ImageKind, PaperSize};
use blattwerk_layout::{FontRef, HelveticaMetrics, LayoutEngine, LayoutOptions};
use printpdf::{
    BuiltinFont, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Point, Pt, RawImage,
    RawImageData, RawImageFormat, TextItem, XObjectTransform,
};
use tracing::{debug, info, instrument};

/// Creates new PDF documents from text content or raster images.
pub struct PdfWriter {
    /// Paper size for page creation.
    paper_size: PaperSize,
    /// Document title: drawn as a heading by `create_from_text` and embedded
    /// in the PDF /Info dictionary.
    title: Option<String>,
    /// Text metrics and encoder settings.
    config: AppConfig,
}

impl PdfWriter {
    /// Create a new writer targeting the given paper size.
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
            config: AppConfig::default(),
        }
    }

    /// Create a new writer defaulting to A4.
    pub fn a4() -> Self {
        Self::new(PaperSize::A4)
    }

    /// Create a writer from application settings.
    pub fn with_config(config: AppConfig) -> Self {
        Self {
            paper_size: config.default_paper_size,
            title: None,
            config,
        }
    }

    /// Set the paper size.
    pub fn set_paper_size(&mut self, paper_size: PaperSize) {
        self.paper_size = paper_size;
    }

    /// Set the document title.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    /// Paper dimensions in printpdf's Mm units.
    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm), Mm(h_mm))
    }

    // -- Text to PDF ----------------------------------------------------------

    /// Create a PDF from plain text content.
    ///
    /// The title (default "Document") is drawn as a heading on the first
    /// page; the body is word-wrapped and paginated by the layout engine and
    /// rendered in the built-in Helvetica font.
    #[instrument(skip(self, body), fields(body_len = body.len()))]
    pub fn create_from_text(&self, body: &str) -> Result<Vec<u8>> {
        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Document");

        info!(paper = ?self.paper_size, title, "Creating text PDF");

        let (w_pt, h_pt) = self.paper_size.dimensions_pt();
        let mut options = LayoutOptions::with_page(w_pt, h_pt);
        options.margin = self.config.margin;
        options.font_size = self.config.font_size;
        options.title_size = self.config.title_size;

        let engine = LayoutEngine::new(HelveticaMetrics, options);
        let layout = engine.layout(title, body);

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(layout.pages.len());

        for laid_out in &layout.pages {
            let mut ops: Vec<Op> = Vec::new();
            for run in &laid_out.runs {
                let font = builtin_font(run.font);
                ops.push(Op::StartTextSection);
                ops.push(Op::SetTextCursor {
                    pos: Point {
                        x: Pt(run.x),
                        y: Pt(run.y),
                    },
                });
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(run.size),
                    font,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(run.text.clone())],
                    font,
                });
                ops.push(Op::EndTextSection);
            }
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        debug!(
            pages = layout.pages.len(),
            runs = layout.run_count(),
            "Text layout complete"
        );

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }

    // -- Images to PDF --------------------------------------------------------

    /// Create a PDF with one page per input image.
    ///
    /// Each image is scaled to fit within a 20 pt margin on every side,
    /// preserving its aspect ratio, and centred on its page. Only JPEG and
    /// PNG inputs are accepted.
    #[instrument(skip(self, images), fields(image_count = images.len()))]
    pub fn create_from_images(&self, images: &[Vec<u8>]) -> Result<Vec<u8>> {
        if images.is_empty() {
            return Err(BlattwerkError::ImageError(
                "no input images supplied".to_string(),
            ));
        }

        let (page_w, page_h) = self.page_dimensions();
        let title = self.title.as_deref().unwrap_or("Images");

        info!(paper = ?self.paper_size, count = images.len(), "Creating image PDF");

        let mut doc = PdfDocument::new(title);
        let mut pages: Vec<PdfPage> = Vec::with_capacity(images.len());

        for (index, image_bytes) in images.iter().enumerate() {
            let kind = ImageKind::from_magic(image_bytes).ok_or_else(|| {
                BlattwerkError::UnsupportedDocument(format!(
                    "image #{}: only JPEG and PNG can be embedded",
                    index + 1
                ))
            })?;

            let dynamic_image = image::load_from_memory(image_bytes).map_err(|err| {
                BlattwerkError::ImageError(format!(
                    "failed to decode {} image #{}: {}",
                    kind.mime_type(),
                    index + 1,
                    err
                ))
            })?;

            let img_width = dynamic_image.width() as usize;
            let img_height = dynamic_image.height() as usize;

            // Convert to RGB8 for printpdf.
            let rgb_image = dynamic_image.to_rgb8();
            let raw = RawImage {
                pixels: RawImageData::U8(rgb_image.into_raw()),
                width: img_width,
                height: img_height,
                data_format: RawImageFormat::RGB8,
                tag: Vec::new(),
            };
            let xobject_id = doc.add_image(&raw);

            let ops = vec![place_image_op(
                xobject_id,
                img_width as f32,
                img_height as f32,
                page_w.into_pt().0,
                page_h.into_pt().0,
            )];
            pages.push(PdfPage::new(page_w, page_h, ops));
        }

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);

        Ok(output)
    }
}

fn builtin_font(font: FontRef) -> BuiltinFont {
    match font {
        FontRef::Helvetica => BuiltinFont::Helvetica,
        FontRef::HelveticaBold => BuiltinFont::HelveticaBold,
    }
}

/// Build the placement op for one image page: fit inside a 20 pt margin on
/// each side, preserve aspect ratio, centre on the page.
fn place_image_op(
    xobject_id: printpdf::XObjectId,
    img_w_px: f32,
    img_h_px: f32,
    page_w_pt: f32,
    page_h_pt: f32,
) -> Op {
    const MARGIN_PT: f32 = 20.0;

    let image_aspect = img_w_px / img_h_px;
    let page_aspect = page_w_pt / page_h_pt;

    let (rendered_w, rendered_h) = if image_aspect > page_aspect {
        let w = page_w_pt - 2.0 * MARGIN_PT;
        (w, w / image_aspect)
    } else {
        let h = page_h_pt - 2.0 * MARGIN_PT;
        (h * image_aspect, h)
    };

    let x_offset = (page_w_pt - rendered_w) / 2.0;
    let y_offset = (page_h_pt - rendered_h) / 2.0;

    // Image native size at the reference DPI, from which printpdf scales.
    let dpi: f32 = 150.0;
    let img_w_pt = img_w_px / dpi * 72.0;
    let img_h_pt = img_h_px / dpi * 72.0;

    debug!(rendered_w, rendered_h, x_offset, y_offset, "Image placed on page");

    Op::UseXobject {
        id: xobject_id,
        transform: XObjectTransform {
            translate_x: Some(Pt(x_offset)),
            translate_y: Some(Pt(y_offset)),
            scale_x: Some(rendered_w / img_w_pt),
            scale_y: Some(rendered_h / img_h_pt),
            dpi: Some(dpi),
            rotate: None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::reader::PdfReader;
    use crate::pdf::testutil::{sample_jpeg, sample_png};

    #[test]
    fn text_pdf_is_loadable() {
        let writer = PdfWriter::a4();
        let bytes = writer.create_from_text("hello world").unwrap();

        assert!(bytes.starts_with(b"%PDF"));
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 1);
    }

    #[test]
    fn page_count_matches_layout() {
        let writer = PdfWriter::a4();
        let body = vec!["line"; 200].join("\n");

        let (w_pt, h_pt) = PaperSize::A4.dimensions_pt();
        let expected = LayoutEngine::new(HelveticaMetrics, LayoutOptions::with_page(w_pt, h_pt))
            .layout("Document", &body)
            .pages
            .len() as u32;
        assert!(expected > 1);

        let bytes = writer.create_from_text(&body).unwrap();
        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), expected);
    }

    #[test]
    fn custom_title_is_used() {
        let mut writer = PdfWriter::a4();
        writer.set_title("Quarterly Report");
        let bytes = writer.create_from_text("body text").unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn one_page_per_image() {
        let writer = PdfWriter::a4();
        let images = vec![sample_png(8, 8), sample_jpeg(16, 4), sample_png(4, 16)];
        let bytes = writer.create_from_images(&images).unwrap();

        let reader = PdfReader::from_bytes(&bytes).unwrap();
        assert_eq!(reader.page_count(), 3);
    }

    #[test]
    fn non_image_bytes_rejected() {
        let writer = PdfWriter::a4();
        let result = writer.create_from_images(&[b"definitely not an image".to_vec()]);
        assert!(matches!(
            result,
            Err(BlattwerkError::UnsupportedDocument(_))
        ));
    }

    #[test]
    fn empty_image_list_rejected() {
        let writer = PdfWriter::a4();
        assert!(writer.create_from_images(&[]).is_err());
    }
}
