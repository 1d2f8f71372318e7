// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF module: text layer reading and page rasterisation.

pub mod reader;
pub mod render;

#[cfg(test)]
pub(crate) mod test_pdf;

pub use reader::PdfReader;
pub use render::{PageRenderer, PdftoppmRenderer};
