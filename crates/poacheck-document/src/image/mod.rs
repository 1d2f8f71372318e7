// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image module: primitive transforms and quality analysis.

pub mod processor;
pub mod quality;

pub use processor::ImageProcessor;
