// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module — reading, splitting, compressing, stamping, extracting, and
// creating PDFs.

pub mod extract;
pub mod optimize;
pub mod reader;
pub mod stamp;
pub mod writer;

#[cfg(feature = "raster")]
pub mod raster;

#[cfg(test)]
pub(crate) mod testutil;

pub use extract::extract_text;
pub use optimize::compress_pdf;
pub use reader::PdfReader;
pub use stamp::add_image_to_pdf;
pub use writer::PdfWriter;

#[cfg(feature = "raster")]
pub use raster::Rasterizer;
