// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Layout output model: placed text runs on fixed-size pages.

use serde::{Deserialize, Serialize};

/// Reference to a font known to the document sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontRef {
    Helvetica,
    HelveticaBold,
}

/// RGB color, each channel in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb {
        r: 0.0,
        g: 0.0,
        b: 0.0,
    };
}

/// A single placed line of text.
///
/// `(x, y)` is the baseline origin in PDF coordinates: origin at the page's
/// bottom-left, y increasing upward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub font: FontRef,
    pub size: f32,
    pub color: Rgb,
    pub x: f32,
    pub y: f32,
}

impl TextRun {
    pub fn new(text: impl Into<String>, font: FontRef, size: f32, x: f32, y: f32) -> Self {
        Self {
            text: text.into(),
            font,
            size,
            color: Rgb::BLACK,
            x,
            y,
        }
    }
}

/// One laid-out page: fixed geometry plus its placed runs, in placement order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LaidOutPage {
    /// Page width in points.
    pub width: f32,
    /// Page height in points.
    pub height: f32,
    pub runs: Vec<TextRun>,
}

impl LaidOutPage {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            runs: Vec::new(),
        }
    }
}

/// The complete result of a layout run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub pages: Vec<LaidOutPage>,
}

impl Layout {
    /// Total number of placed runs across all pages.
    pub fn run_count(&self) -> usize {
        self.pages.iter().map(|p| p.runs.len()).sum()
    }
}
