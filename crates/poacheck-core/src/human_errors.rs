// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the people uploading documents.
//
// Every pipeline error is mapped to plain English with a clear suggestion.
// The severity drives how the upload handler presents it.

use crate::error::PoaError;

/// Severity of an error from the uploader's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Temporary problem; trying again may work.
    Transient,
    /// The uploader must do something (rescan, pick another file).
    ActionRequired,
    /// Cannot be fixed by retrying; the input itself is unusable.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the uploader should try.
    pub suggestion: String,
    /// Whether resubmitting the same file could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

/// Convert a `PoaError` into something an uploader can act on.
pub fn humanize_error(err: &PoaError) -> HumanError {
    match err {
        // -- Extraction --
        PoaError::UnsupportedFormat(detail) => HumanError {
            message: "This type of file isn't supported.".into(),
            suggestion: format!(
                "Upload the document as a PDF, or as a JPEG, PNG or TIFF photo of each page. (File: {detail})"
            ),
            retriable: false,
            severity: Severity::Permanent,
        },

        PoaError::NoTextExtracted => HumanError {
            message: "We couldn't find any readable text in this document.".into(),
            suggestion: "The page may be blank or too faint. Rescan it at 300 DPI or higher with good lighting.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PoaError::ExtractionFailure(_) => HumanError {
            message: "We couldn't read the text in this document.".into(),
            suggestion: "Try uploading a clearer scan, or a PDF exported directly from the original document.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        PoaError::Timeout(_) => HumanError {
            message: "Reading this document took too long.".into(),
            suggestion: "Large or very detailed scans can be slow. Try again, or upload a smaller image.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Imaging --
        PoaError::ImageDecode(_) | PoaError::Preprocessing(_) => HumanError {
            message: "There's a problem with this image.".into(),
            suggestion: "The image may be damaged or in an unusual format. Try saving it as a JPEG or PNG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PoaError::Pdf(_) => HumanError {
            message: "There's a problem with this PDF file.".into(),
            suggestion: "The file may be damaged. Try opening it on a computer first to check it works, or try a different file.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        PoaError::Ocr(_) => HumanError {
            message: "Text recognition didn't work on this scan.".into(),
            suggestion: "Try scanning the document again with better lighting, making sure the text is clear and in focus.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Validation --
        PoaError::CheckExecution { check, .. } => HumanError {
            message: format!("The {check} check couldn't be completed."),
            suggestion: "The rest of the report is still valid. Have this section reviewed manually.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        PoaError::ExternalLookup(_) => HumanError {
            message: "We couldn't reach the notary registry.".into(),
            suggestion: "Verify the notary's commission manually with the Secretary of State.".into(),
            retriable: true,
            severity: Severity::Transient,
        },

        // -- Plumbing --
        PoaError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "It may have been moved or deleted. Try choosing the file again.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "We don't have permission to read that file.".into(),
                    suggestion: "Check the file permissions, or try copying the file to a different location first.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, the disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        PoaError::Serialization(_) => HumanError {
            message: "We had an internal data problem.".into(),
            suggestion: "Try again. If this keeps happening, please report it.".into(),
            retriable: true,
            severity: Severity::Transient,
        },
    }
}
