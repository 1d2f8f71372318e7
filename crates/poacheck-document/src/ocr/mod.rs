// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Optical character recognition: backends and the shared result cache.

pub mod backend;
pub mod cache;
pub mod tesseract;

#[cfg(feature = "ocr")]
pub mod ocrs_backend;

pub use backend::{OcrBackend, OcrOutput};
pub use cache::OcrCache;
pub use tesseract::TesseractBackend;

#[cfg(feature = "ocr")]
pub use ocrs_backend::{OcrsBackend, OcrsConfig};
