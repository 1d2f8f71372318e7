// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// poacheck-document: Turning uploads into text for the poacheck pipeline.
//
// Provides image quality scoring, the OCR preprocessing chain (with deskew),
// PDF text layer reading and page rendering, pluggable OCR backends with a
// shared result cache, and the strategy-chain text extraction engine.

pub mod extract;
pub mod image;
pub mod ocr;
pub mod pdf;
pub mod process;
pub mod scan;

// Re-export the primary structs so callers can use `poacheck_document::TextExtractor` etc.
pub use extract::TextExtractor;
pub use image::processor::ImageProcessor;
pub use image::quality::{analyze as analyze_quality, analyze_image as analyze_quality_of};
pub use ocr::{OcrBackend, OcrCache, OcrOutput, TesseractBackend};
pub use pdf::{PageRenderer, PdfReader, PdftoppmRenderer};
pub use scan::preprocess::{preprocess, preprocess_or_original};

#[cfg(feature = "ocr")]
pub use ocr::{OcrsBackend, OcrsConfig};
