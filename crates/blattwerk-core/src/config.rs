// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use serde::{Deserialize, Serialize};

/// Persistent application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Default paper size for generated documents.
    pub default_paper_size: crate::PaperSize,
    /// Body font size in points for text-to-PDF.
    pub font_size: f32,
    /// Title font size in points for text-to-PDF.
    pub title_size: f32,
    /// Page margin in points for text-to-PDF.
    pub margin: f32,
    /// Render scale for PDF-to-image export.
    pub export_scale: f32,
    /// Render scale for preview thumbnails.
    pub preview_scale: f32,
    /// JPEG quality (1-100) for rasterized output.
    pub jpeg_quality: u8,
    /// Producer/Creator string written into PDF metadata.
    pub producer: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_paper_size: crate::PaperSize::A4,
            font_size: 12.0,
            title_size: 18.0,
            margin: 50.0,
            export_scale: 2.0,
            preview_scale: 1.5,
            jpeg_quality: 95,
            producer: "Blattwerk".to_string(),
        }
    }
}
