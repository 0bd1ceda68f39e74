// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// blattwerk-layout — Text layout engine for the Blattwerk document toolkit.
//
// Turns a title and a body of newline-delimited paragraphs into word-wrapped,
// paginated text placements on fixed-size pages. Pure computation: the only
// collaborator is a width-measuring font metrics provider; serialization of
// the resulting pages is the document crate's job.

pub mod engine;
pub mod metrics;
pub mod model;

pub use engine::{LayoutEngine, LayoutOptions};
pub use metrics::{FontMetrics, HelveticaMetrics};
pub use model::{FontRef, LaidOutPage, Layout, Rgb, TextRun};
