// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Blattwerk.

use thiserror::Error;

/// Top-level error type for all Blattwerk operations.
#[derive(Debug, Error)]
pub enum BlattwerkError {
    // -- Document errors --
    #[error("unsupported document type: {0}")]
    UnsupportedDocument(String),

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image processing failed: {0}")]
    ImageError(String),

    #[error("text extraction failed: {0}")]
    ExtractionError(String),

    // -- Operation inputs --
    #[error("invalid page range: {0}")]
    InvalidRange(String),

    #[error("page {requested} out of range (document has {available} pages)")]
    PageOutOfRange { requested: u32, available: u32 },

    // -- Rasterization --
    #[error("rasterization failed: {0}")]
    RasterError(String),

    #[error("rasterization support not compiled in (enable the \"raster\" feature)")]
    RasterUnavailable,

    // -- I/O and serialization --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, BlattwerkError>;
