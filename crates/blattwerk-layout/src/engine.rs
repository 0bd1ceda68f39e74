// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Greedy line-wrapping layout with pagination.
//
// The cursor (page index + vertical position) is an explicit value threaded
// through the placement helpers, so every step that moves it is visible at
// the call site.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::metrics::FontMetrics;
use crate::model::{FontRef, LaidOutPage, Layout, TextRun};

/// Page geometry and type metrics for a layout run, all in points.
///
/// Callers must supply a positive usable width (`page_width - 2 * margin`)
/// and room for at least one line between the margins. Degenerate geometry is
/// a precondition violation: the engine does not clamp, and a non-positive
/// usable width makes every word overflow (each on its own line) while a
/// non-positive usable height grows a page per line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    /// Body font size; line height is 1.2x this.
    pub font_size: f32,
    /// Title font size (title is placed as-is, never wrapped).
    pub title_size: f32,
    /// Vertical gap between the title baseline and the first body line.
    pub title_gap: f32,
}

impl LayoutOptions {
    /// A4 geometry with the toolkit's standard text metrics.
    pub fn a4() -> Self {
        Self::with_page(595.276, 841.89)
    }

    /// Standard text metrics on an arbitrary page size.
    pub fn with_page(page_width: f32, page_height: f32) -> Self {
        Self {
            page_width,
            page_height,
            margin: 50.0,
            font_size: 12.0,
            title_size: 18.0,
            title_gap: 30.0,
        }
    }

    /// Vertical distance between consecutive baselines.
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    /// Horizontal space available to a line of body text.
    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self::a4()
    }
}

/// Transient layout state: which page we are on and where the next baseline
/// goes. Carried by value through the placement helpers and discarded once
/// layout completes.
#[derive(Debug, Clone, Copy)]
struct LayoutCursor {
    page: usize,
    y: f32,
}

/// Lays out a title and a body of newline-delimited paragraphs into
/// fixed-size pages.
///
/// The algorithm is a greedy word wrap: words accumulate into a candidate
/// line until adding one more would exceed the usable width, at which point
/// the accumulated line is flushed and the word starts the next line. A
/// single word wider than the usable width is placed as-is and allowed to
/// overflow the right margin — it is never split. Paragraph boundaries are
/// hard breaks, and an empty paragraph still consumes one line of vertical
/// space. When the next baseline would fall below the bottom margin, a new
/// page is started.
///
/// Layout is a pure function of its inputs: the same title, body, options,
/// and (deterministic) metrics always produce the same placements.
pub struct LayoutEngine<M: FontMetrics> {
    metrics: M,
    options: LayoutOptions,
}

impl<M: FontMetrics> LayoutEngine<M> {
    pub fn new(metrics: M, options: LayoutOptions) -> Self {
        Self { metrics, options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out `title` and `body`, returning at least one page.
    ///
    /// The title, if non-empty, lands on page 1 only, at the top-of-content
    /// position in the title size; body text follows after the title gap.
    #[instrument(skip_all, fields(title_len = title.len(), body_len = body.len()))]
    pub fn layout(&self, title: &str, body: &str) -> Layout {
        let opts = &self.options;
        let mut pages = vec![LaidOutPage::new(opts.page_width, opts.page_height)];
        let mut cursor = LayoutCursor {
            page: 0,
            y: opts.page_height - opts.margin,
        };

        if !title.is_empty() {
            pages[cursor.page].runs.push(TextRun::new(
                title,
                FontRef::Helvetica,
                opts.title_size,
                opts.margin,
                cursor.y,
            ));
            cursor.y -= opts.title_gap;
        }

        for paragraph in body.split('\n') {
            cursor = self.layout_paragraph(paragraph, cursor, &mut pages);
        }

        debug!(
            pages = pages.len(),
            runs = pages.iter().map(|p| p.runs.len()).sum::<usize>(),
            "layout complete"
        );
        Layout { pages }
    }

    /// Wrap one paragraph, flushing lines as the usable width fills up.
    fn layout_paragraph(
        &self,
        paragraph: &str,
        mut cursor: LayoutCursor,
        pages: &mut Vec<LaidOutPage>,
    ) -> LayoutCursor {
        let usable = self.options.usable_width();
        let mut current = String::new();

        for word in paragraph.split_whitespace() {
            let test = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };

            if self.metrics.text_width(&test, self.options.font_size) > usable
                && !current.is_empty()
            {
                cursor = self.place_line(&current, cursor, pages);
                current.clear();
                current.push_str(word);
            } else {
                current = test;
            }
        }

        if current.is_empty() {
            // Paragraph had no words: a blank line still takes a slot.
            cursor = self.ensure_space(cursor, pages);
            cursor.y -= self.options.line_height();
        } else {
            cursor = self.place_line(&current, cursor, pages);
        }

        cursor
    }

    /// Place one finished line at the left margin and advance the baseline.
    fn place_line(
        &self,
        text: &str,
        cursor: LayoutCursor,
        pages: &mut Vec<LaidOutPage>,
    ) -> LayoutCursor {
        let mut cursor = self.ensure_space(cursor, pages);
        pages[cursor.page].runs.push(TextRun::new(
            text,
            FontRef::Helvetica,
            self.options.font_size,
            self.options.margin,
            cursor.y,
        ));
        cursor.y -= self.options.line_height();
        cursor
    }

    /// Start a new page if the next baseline would fall below the bottom
    /// margin. Strict `<`: a line that exactly fits the remaining space
    /// stays on the current page.
    fn ensure_space(&self, cursor: LayoutCursor, pages: &mut Vec<LaidOutPage>) -> LayoutCursor {
        let opts = &self.options;
        if cursor.y < opts.margin + opts.line_height() {
            pages.push(LaidOutPage::new(opts.page_width, opts.page_height));
            LayoutCursor {
                page: pages.len() - 1,
                y: opts.page_height - opts.margin,
            }
        } else {
            cursor
        }
    }
}
