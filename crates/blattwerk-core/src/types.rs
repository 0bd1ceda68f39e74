// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Blattwerk document toolkit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{BlattwerkError, Result};

/// Points per millimetre (1 pt = 1/72 inch, 1 inch = 25.4 mm).
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// The eight document tools offered by the toolkit.
///
/// Each variant maps 1:1 to an operation in `blattwerk-document`; the CLI
/// dispatches on this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ToolKind {
    ImageToPdf,
    PdfToImage,
    PdfToText,
    TextToPdf,
    SplitPdf,
    CompressPdf,
    AddImage,
    PreviewPdf,
}

impl ToolKind {
    /// Stable identifier used in CLI output and result file ids.
    pub fn slug(&self) -> &'static str {
        match self {
            Self::ImageToPdf => "image-to-pdf",
            Self::PdfToImage => "pdf-to-image",
            Self::PdfToText => "pdf-to-text",
            Self::TextToPdf => "text-to-pdf",
            Self::SplitPdf => "split-pdf",
            Self::CompressPdf => "compress-pdf",
            Self::AddImage => "add-image",
            Self::PreviewPdf => "preview-pdf",
        }
    }

    /// Human-readable tool name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ImageToPdf => "Image to PDF",
            Self::PdfToImage => "PDF to Images",
            Self::PdfToText => "PDF Text Extractor",
            Self::TextToPdf => "Text to PDF",
            Self::SplitPdf => "Split PDF",
            Self::CompressPdf => "Compress PDF",
            Self::AddImage => "Add Image to PDF",
            Self::PreviewPdf => "Preview PDF",
        }
    }
}

/// Supported input image formats for PDF embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// MIME type string.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }

    /// Infer image kind from a file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// Sniff the image kind from leading magic bytes.
    pub fn from_magic(data: &[u8]) -> Option<Self> {
        if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(Self::Jpeg)
        } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(Self::Png)
        } else {
            None
        }
    }
}

/// Output format for rasterized pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputImageFormat {
    Png,
    Jpeg,
}

impl OutputImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }
}

/// Standard paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Tabloid,
    Custom { width_mm: f32, height_mm: f32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (f32, f32) {
        match self {
            Self::A4 => (210.0, 297.0),
            Self::A3 => (297.0, 420.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
            Self::Tabloid => (279.4, 431.8),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }

    /// Dimensions in PDF points (width, height). Layout runs in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        let (w_mm, h_mm) = self.dimensions_mm();
        (w_mm * PT_PER_MM, h_mm * PT_PER_MM)
    }
}

/// A 1-indexed inclusive page range with an output name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitRange {
    pub start: u32,
    pub end: u32,
    pub name: String,
}

impl SplitRange {
    pub fn new(start: u32, end: u32, name: impl Into<String>) -> Self {
        Self {
            start,
            end,
            name: name.into(),
        }
    }

    /// Check the range against a document's page count.
    pub fn validate(&self, page_count: u32) -> Result<()> {
        if self.start == 0 {
            return Err(BlattwerkError::InvalidRange(format!(
                "range \"{}\": pages are 1-indexed, start cannot be 0",
                self.name
            )));
        }
        if self.start > self.end {
            return Err(BlattwerkError::InvalidRange(format!(
                "range \"{}\": start {} is after end {}",
                self.name, self.start, self.end
            )));
        }
        if self.end > page_count {
            return Err(BlattwerkError::InvalidRange(format!(
                "range \"{}\": end {} exceeds page count {}",
                self.name, self.end, page_count
            )));
        }
        Ok(())
    }
}

/// Absolute placement of an image on an existing PDF page.
///
/// Coordinates are in PDF points with the origin at the bottom-left of the
/// page; `page` is 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImagePlacement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub page: u32,
}

/// Per-page geometry reported by the preview/inspect operation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageInfo {
    /// 1-indexed page number.
    pub page_number: u32,
    /// MediaBox width in points.
    pub width: f32,
    /// MediaBox height in points.
    pub height: f32,
}

/// A produced output file: the result record every tool returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedFile {
    /// Stable identifier, e.g. `page-3` or `split-Part 1`.
    pub id: String,
    /// Suggested output filename.
    pub name: String,
    /// MIME type of `data`.
    pub media_type: String,
    /// Size of `data` in bytes.
    pub size: usize,
    /// SHA-256 hash of `data`, hex-encoded.
    pub sha256: String,
    pub created_at: DateTime<Utc>,
    /// The output bytes themselves.
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl ProcessedFile {
    /// Wrap output bytes, stamping size, content hash, and creation time.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        media_type: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        let sha256 = hex::encode(Sha256::digest(&data));
        Self {
            id: id.into(),
            name: name.into(),
            media_type: media_type.into(),
            size: data.len(),
            sha256,
            created_at: Utc::now(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paper_size_points() {
        let (w, h) = PaperSize::A4.dimensions_pt();
        assert!((w - 595.276).abs() < 0.01);
        assert!((h - 841.89).abs() < 0.01);
    }

    #[test]
    fn split_range_validation() {
        assert!(SplitRange::new(1, 3, "Part 1").validate(5).is_ok());
        assert!(SplitRange::new(0, 3, "zero").validate(5).is_err());
        assert!(SplitRange::new(4, 2, "inverted").validate(5).is_err());
        assert!(SplitRange::new(2, 6, "overlong").validate(5).is_err());
        // A range covering the whole document is fine.
        assert!(SplitRange::new(1, 5, "all").validate(5).is_ok());
    }

    #[test]
    fn image_kind_detection() {
        assert_eq!(ImageKind::from_extension("JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_extension("png"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_extension("webp"), None);

        assert_eq!(
            ImageKind::from_magic(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(
            ImageKind::from_magic(&[0x89, b'P', b'N', b'G', 0x0D]),
            Some(ImageKind::Png)
        );
        assert_eq!(ImageKind::from_magic(b"%PDF-1.7"), None);
    }

    #[test]
    fn processed_file_hashes_content() {
        let file = ProcessedFile::new("id", "out.pdf", "application/pdf", vec![1, 2, 3]);
        assert_eq!(file.size, 3);
        assert_eq!(file.sha256.len(), 64);
    }
}
