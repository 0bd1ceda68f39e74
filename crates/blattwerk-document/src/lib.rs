// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-document — Document operations for the Blattwerk toolkit.
//
// Provides PDF operations (inspect, split, compress, text extraction, image
// stamping), PDF generation from text and images, image decode/encode, and —
// behind the "raster" feature — page rasterization for image export and
// previews.

pub mod image;
pub mod pdf;

// Re-export the primary entry points so callers can use
// `blattwerk_document::PdfReader` etc.
pub use image::processor::ImageProcessor;
pub use pdf::extract::extract_text;
pub use pdf::optimize::compress_pdf;
pub use pdf::reader::PdfReader;
pub use pdf::stamp::add_image_to_pdf;
pub use pdf::writer::PdfWriter;

#[cfg(feature = "raster")]
pub use pdf::raster::Rasterizer;
