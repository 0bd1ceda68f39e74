// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Rasterization — render PDF pages to bitmaps via `pdfium-render`.
//
// Compiled only with the "raster" feature: pdfium-render needs a PDFium
// shared library on the host, so the dependency stays out of default builds.

use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use blattwerk_core::error::{BlattwerkError, Result};
use blattwerk_core::types::{OutputImageFormat, ProcessedFile};

use crate::image::processor::ImageProcessor;

/// Renders PDF pages to images using the system PDFium library.
pub struct Rasterizer {
    pdfium: Pdfium,
}

impl Rasterizer {
    /// Bind to the system PDFium library.
    pub fn new() -> Result<Self> {
        let bindings = Pdfium::bind_to_system_library().map_err(|err| {
            BlattwerkError::RasterError(format!("cannot bind PDFium library: {}", err))
        })?;
        Ok(Self {
            pdfium: Pdfium::new(bindings),
        })
    }

    /// Render every page at `scale` times its natural point size.
    #[instrument(skip(self, data), fields(bytes_len = data.len(), scale))]
    pub fn render_pages(&self, data: &[u8], scale: f32) -> Result<Vec<image::DynamicImage>> {
        let document = self
            .pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(|err| {
                BlattwerkError::RasterError(format!("PDFium cannot load document: {}", err))
            })?;

        let mut bitmaps = Vec::new();
        for page in document.pages().iter() {
            let target_width = (page.width().value * scale).round().max(1.0) as i32;
            let config = PdfRenderConfig::new().set_target_width(target_width);
            let bitmap = page.render_with_config(&config).map_err(|err| {
                BlattwerkError::RasterError(format!("page render failed: {}", err))
            })?;
            bitmaps.push(bitmap.as_image());
        }

        debug!(pages = bitmaps.len(), "Rasterization complete");
        Ok(bitmaps)
    }

    /// Rasterize every page into an encoded image file.
    ///
    /// Output files are named `{stem}_page_{n}.{ext}`, matching the page
    /// numbering of the source document.
    #[instrument(skip(self, data), fields(stem, ?format, scale))]
    pub fn export_pages(
        &self,
        data: &[u8],
        stem: &str,
        format: OutputImageFormat,
        scale: f32,
        jpeg_quality: u8,
    ) -> Result<Vec<ProcessedFile>> {
        let bitmaps = self.render_pages(data, scale)?;

        info!(pages = bitmaps.len(), "Exporting rasterized pages");

        let mut outputs = Vec::with_capacity(bitmaps.len());
        for (index, bitmap) in bitmaps.into_iter().enumerate() {
            let page_number = index + 1;
            let processor = ImageProcessor::from_dynamic(bitmap);
            let encoded = match format {
                OutputImageFormat::Png => processor.to_png_bytes()?,
                OutputImageFormat::Jpeg => processor.to_jpeg_bytes(jpeg_quality)?,
            };
            outputs.push(ProcessedFile::new(
                format!("page-{page_number}"),
                format!("{stem}_page_{page_number}.{}", format.extension()),
                format.mime_type(),
                encoded,
            ));
        }

        Ok(outputs)
    }
}
