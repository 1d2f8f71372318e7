// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF page rasterisation for OCR of scanned documents.

use std::process::Command;
use std::time::Duration;

use poacheck_core::error::PoaError;
use tempfile::TempDir;
use tracing::{debug, instrument};

use crate::image::processor::ImageProcessor;
use crate::process::output_within;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Renders a PDF page to an encoded raster image.
pub trait PageRenderer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Render the first page of `pdf` at `dpi`, bounded so neither side
    /// exceeds `max_dim` pixels. Returns PNG bytes.
    fn render_first_page(&self, pdf: &[u8], dpi: u32, max_dim: u32) -> Result<Vec<u8>, PoaError>;
}

/// Renders through poppler's `pdftoppm`. A render that overruns its
/// timeout is killed.
pub struct PdftoppmRenderer {
    binary: String,
    timeout: Duration,
}

impl PdftoppmRenderer {
    pub fn new() -> Self {
        Self::with_binary("pdftoppm")
    }

    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("-v")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

impl Default for PdftoppmRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer for PdftoppmRenderer {
    fn name(&self) -> &'static str {
        "pdftoppm"
    }

    #[instrument(skip(self, pdf), fields(pdf_len = pdf.len()))]
    fn render_first_page(&self, pdf: &[u8], dpi: u32, max_dim: u32) -> Result<Vec<u8>, PoaError> {
        let dir = TempDir::new()?;
        let input = dir.path().join("input.pdf");
        let prefix = dir.path().join("page");
        std::fs::write(&input, pdf)?;

        let mut cmd = Command::new(&self.binary);
        cmd.args(["-png", "-r", &dpi.to_string(), "-f", "1", "-l", "1", "-singlefile"])
            .arg(&input)
            .arg(&prefix);
        let output = output_within(&mut cmd, self.timeout)
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    PoaError::Pdf(format!("{} not found (install poppler-utils)", self.binary))
                }
                _ => PoaError::Io(e),
            })?
            .ok_or_else(|| {
                PoaError::Timeout(format!("page render exceeded {}s", self.timeout.as_secs()))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PoaError::Pdf(format!(
                "pdftoppm failed: {}",
                stderr.trim()
            )));
        }

        let rendered = std::fs::read(prefix.with_extension("png"))?;
        let processor = ImageProcessor::from_bytes(&rendered)?.bound(max_dim);
        debug!(
            width = processor.width(),
            height = processor.height(),
            "Rendered first page"
        );
        processor.to_png_bytes()
    }
}
