// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR backend abstraction.

use poacheck_core::config::OcrSettings;
use poacheck_core::error::PoaError;

/// Text recognised from one image.
#[derive(Debug, Clone, PartialEq)]
pub struct OcrOutput {
    pub text: String,
    /// Engine-reported confidence (0–100), if the engine reports one.
    pub confidence: Option<f32>,
}

impl OcrOutput {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// A text recogniser. Implementations must be safe to share across threads;
/// the extraction engine calls them from blocking worker tasks.
pub trait OcrBackend: Send + Sync {
    /// Short identifier for logs.
    fn name(&self) -> &'static str;

    /// Whether the backend's dependencies (binary, models) are present.
    fn is_available(&self) -> bool;

    /// Recognise text in an encoded raster image (JPEG, PNG, TIFF, ...).
    fn recognize(&self, image: &[u8], settings: &OcrSettings) -> Result<OcrOutput, PoaError>;
}
