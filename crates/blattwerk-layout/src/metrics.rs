// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Font metrics providers for the layout engine.

/// Measures rendered text width in the same units as page geometry (points).
///
/// Implementations must be deterministic and side-effect-free so that layout
/// output is reproducible. The greedy wrapping algorithm additionally assumes
/// the measure is monotonic in text length; this is not enforced.
pub trait FontMetrics {
    /// Width of `text` rendered at `size` points.
    fn text_width(&self, text: &str, size: f32) -> f32;
}

/// Any deterministic closure can serve as a metrics provider, which keeps
/// tests and callers with their own font stacks simple.
impl<F> FontMetrics for F
where
    F: Fn(&str, f32) -> f32,
{
    fn text_width(&self, text: &str, size: f32) -> f32 {
        self(text, size)
    }
}

/// Advance widths for Helvetica, ASCII 32..=126, in 1/1000 em units
/// (Adobe AFM data for the base-14 font).
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333,
    278, 278, 556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278,
    584, 584, 584, 556, 1015, 667, 667, 722, 722, 667, 611, 778, 722, 278,
    500, 667, 556, 833, 722, 778, 667, 778, 722, 667, 611, 722, 667, 944,
    667, 667, 611, 278, 278, 278, 469, 556, 333, 556, 556, 500, 556, 556,
    278, 556, 556, 222, 222, 500, 222, 833, 556, 556, 556, 556, 333, 500,
    278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

/// Width of a glyph with no entry in the table (Helvetica's default advance).
const FALLBACK_WIDTH: u16 = 556;

/// Metrics for the built-in Helvetica font used by the PDF writer.
///
/// Uses real per-glyph AFM advance widths for the printable ASCII range;
/// characters outside it fall back to a default advance. Good enough for
/// wrapping — exact shaping is the renderer's concern, not the layout
/// engine's.
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

impl FontMetrics for HelveticaMetrics {
    fn text_width(&self, text: &str, size: f32) -> f32 {
        let millis: u32 = text
            .chars()
            .map(|c| {
                let code = c as u32;
                if (32..=126).contains(&code) {
                    u32::from(HELVETICA_WIDTHS[(code - 32) as usize])
                } else {
                    u32::from(FALLBACK_WIDTH)
                }
            })
            .sum();
        millis as f32 * size / 1000.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_string_has_zero_width() {
        assert_eq!(HelveticaMetrics.text_width("", 12.0), 0.0);
    }

    #[test]
    fn known_glyph_widths() {
        // 'H' = 722/1000 em, so at 10pt it is 7.22pt wide.
        assert!((HelveticaMetrics.text_width("H", 10.0) - 7.22).abs() < 1e-4);
        // space = 278/1000 em.
        assert!((HelveticaMetrics.text_width(" ", 10.0) - 2.78).abs() < 1e-4);
    }

    #[test]
    fn longer_text_is_wider() {
        let m = HelveticaMetrics;
        assert!(m.text_width("hello world", 12.0) > m.text_width("hello", 12.0));
    }

    #[test]
    fn non_ascii_uses_fallback_advance() {
        assert!((HelveticaMetrics.text_width("ä", 10.0) - 5.56).abs() < 1e-4);
    }

    #[test]
    fn closures_are_metrics() {
        let fixed = |s: &str, _size: f32| s.len() as f32 * 7.0;
        assert_eq!(fixed.text_width("abcd", 12.0), 28.0);
    }
}
