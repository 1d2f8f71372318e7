// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for poacheck.

use thiserror::Error;

/// Top-level error type for all pipeline operations.
#[derive(Debug, Error)]
pub enum PoaError {
    // -- Extraction stage (fatal) --
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    ExtractionFailure(String),

    #[error("no text could be extracted from the document")]
    NoTextExtracted,

    #[error("operation timed out: {0}")]
    Timeout(String),

    // -- Imaging --
    #[error("image could not be decoded: {0}")]
    ImageDecode(String),

    #[error("image preprocessing failed: {0}")]
    Preprocessing(String),

    #[error("PDF operation failed: {0}")]
    Pdf(String),

    #[error("OCR failed: {0}")]
    Ocr(String),

    // -- Validation stage (recoverable) --
    #[error("{check} check could not be completed: {reason}")]
    CheckExecution { check: String, reason: String },

    #[error("external lookup failed: {0}")]
    ExternalLookup(String),

    // -- Plumbing --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PoaError {
    /// Whether this error aborts a validation run.
    ///
    /// Only extraction-stage failures are fatal; everything downstream of
    /// extraction degrades into a worse verdict instead.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            PoaError::UnsupportedFormat(_)
                | PoaError::ExtractionFailure(_)
                | PoaError::NoTextExtracted
                | PoaError::Timeout(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PoaError>;
