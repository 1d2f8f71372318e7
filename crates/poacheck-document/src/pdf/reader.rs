// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader: open existing PDF documents and pull their embedded text layer
// using the `lopdf` crate.

use lopdf::Document;
use poacheck_core::error::PoaError;
use tracing::{debug, instrument, warn};

/// Read-only view of a PDF document.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    // -- Construction ---------------------------------------------------------

    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PoaError> {
        let document = Document::load_mem(data)
            .map_err(|err| PoaError::Pdf(format!("failed to load PDF from memory: {}", err)))?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");
        Ok(Self { document })
    }

    // -- Inspection -----------------------------------------------------------

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Whether the document is encrypted. Encrypted text layers are not read.
    pub fn is_encrypted(&self) -> bool {
        self.document.is_encrypted()
    }

    // -- Text -----------------------------------------------------------------

    /// Concatenate the embedded text of every page, in page order.
    ///
    /// Pages whose text cannot be decoded are skipped with a warning rather
    /// than failing the whole document; scanned pages simply contribute
    /// nothing.
    #[instrument(skip(self), fields(pages = self.page_count()))]
    pub fn extract_text(&self) -> Result<String, PoaError> {
        if self.is_encrypted() {
            return Err(PoaError::Pdf("document is encrypted".into()));
        }

        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let mut text = String::new();
        for page in page_numbers {
            match self.document.extract_text(&[page]) {
                Ok(page_text) => {
                    if !text.is_empty() && !text.ends_with('\n') {
                        text.push('\n');
                    }
                    text.push_str(&page_text);
                }
                Err(err) => warn!(page, error = %err, "Skipping page with unreadable text"),
            }
        }

        debug!(chars = text.len(), "Text layer extracted");
        Ok(text)
    }
}

/// Count of non-whitespace characters, the measure used to decide whether a
/// text layer is substantial enough to skip OCR.
pub fn meaningful_chars(text: &str) -> usize {
    text.chars().filter(|c| !c.is_whitespace()).count()
}
