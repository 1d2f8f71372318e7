// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Scan cleanup ahead of OCR: skew estimation and the preprocessing chain.

pub mod deskew;
pub mod preprocess;

pub use preprocess::{preprocess, preprocess_or_original};
