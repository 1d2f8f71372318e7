// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Tesseract OCR backend. Runs the system `tesseract` binary with TSV output so
// per-word confidences can be averaged into a document confidence.

use std::io::Write;
use std::process::Command;
use std::time::Duration;

use poacheck_core::config::OcrSettings;
use poacheck_core::error::PoaError;
use tempfile::NamedTempFile;
use tracing::{debug, instrument};

use super::backend::{OcrBackend, OcrOutput};
use crate::process::output_within;

/// Column layout of tesseract's TSV output.
const TSV_LEVEL: usize = 0;
const TSV_BLOCK: usize = 2;
const TSV_PAR: usize = 3;
const TSV_LINE: usize = 4;
const TSV_CONF: usize = 10;
const TSV_TEXT: usize = 11;
/// TSV level for individual words.
const WORD_LEVEL: &str = "5";

/// Tesseract OCR via command line.
pub struct TesseractBackend {
    binary: String,
}

impl TesseractBackend {
    pub fn new() -> Self {
        Self {
            binary: "tesseract".into(),
        }
    }

    /// Use a tesseract binary at a specific path.
    pub fn with_binary(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    fn command(&self, image_path: &std::path::Path, settings: &OcrSettings) -> Command {
        let mut cmd = Command::new(&self.binary);
        cmd.arg(image_path)
            .arg("stdout")
            .args(["-l", &settings.language])
            .args(["--psm", &settings.page_segmentation.psm().to_string()])
            .args(["--oem", &settings.engine_mode.oem().to_string()]);
        if !settings.char_whitelist.is_empty() {
            cmd.arg("-c")
                .arg(format!("tessedit_char_whitelist={}", settings.char_whitelist));
        }
        cmd.arg("tsv");
        cmd
    }
}

impl Default for TesseractBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrBackend for TesseractBackend {
    fn name(&self) -> &'static str {
        "tesseract"
    }

    fn is_available(&self) -> bool {
        Command::new(&self.binary)
            .arg("--version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }

    #[instrument(skip_all, fields(image_len = image.len(), lang = %settings.language))]
    fn recognize(&self, image: &[u8], settings: &OcrSettings) -> Result<OcrOutput, PoaError> {
        let mut file = NamedTempFile::new()?;
        file.write_all(image)?;
        file.flush()?;

        let timeout = Duration::from_secs(settings.timeout_secs);
        let output = match output_within(&mut self.command(file.path(), settings), timeout) {
            Ok(Some(output)) => output,
            Ok(None) => {
                return Err(PoaError::Timeout(format!(
                    "tesseract exceeded {}s",
                    settings.timeout_secs
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(PoaError::Ocr(format!(
                    "{} not found (install tesseract-ocr)",
                    self.binary
                )));
            }
            Err(e) => return Err(PoaError::Io(e)),
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PoaError::Ocr(format!("tesseract failed: {}", stderr.trim())));
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let parsed = parse_tsv(&tsv);
        debug!(
            chars = parsed.text.len(),
            confidence = ?parsed.confidence,
            "Tesseract recognition complete"
        );
        Ok(parsed)
    }
}

/// Rebuild line-structured text from tesseract TSV and average the word
/// confidences. Words with negative confidence (layout rows) are ignored.
pub fn parse_tsv(tsv: &str) -> OcrOutput {
    let mut text = String::new();
    let mut current_line: Option<(&str, &str, &str)> = None;
    let mut confidence_sum = 0.0f32;
    let mut word_count = 0usize;

    for row in tsv.lines().skip(1) {
        let cols: Vec<&str> = row.split('\t').collect();
        if cols.len() <= TSV_TEXT || cols[TSV_LEVEL] != WORD_LEVEL {
            continue;
        }
        let word = cols[TSV_TEXT].trim();
        if word.is_empty() {
            continue;
        }

        let line_key = (cols[TSV_BLOCK], cols[TSV_PAR], cols[TSV_LINE]);
        match current_line {
            Some(key) if key == line_key => text.push(' '),
            Some(_) => text.push('\n'),
            None => {}
        }
        current_line = Some(line_key);
        text.push_str(word);

        if let Ok(conf) = cols[TSV_CONF].trim().parse::<f32>() {
            if conf >= 0.0 {
                confidence_sum += conf;
                word_count += 1;
            }
        }
    }

    let confidence = (word_count > 0).then(|| confidence_sum / word_count as f32);
    OcrOutput { text, confidence }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str =
        "level\tpage_num\tblock_num\tpar_num\tline_num\tword_num\tleft\ttop\twidth\theight\tconf\ttext";

    #[test]
    fn parse_tsv_rebuilds_lines_and_averages_confidence() {
        let tsv = format!(
            "{HEADER}\n\
             1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n\
             5\t1\t1\t1\t1\t1\t0\t0\t10\t10\t90\tDurable\n\
             5\t1\t1\t1\t1\t2\t0\t0\t10\t10\t80\tPower\n\
             5\t1\t1\t1\t2\t1\t0\t0\t10\t10\t70\tWitness:\n"
        );
        let out = parse_tsv(&tsv);
        assert_eq!(out.text, "Durable Power\nWitness:");
        assert_eq!(out.confidence, Some(80.0));
    }

    #[test]
    fn parse_tsv_empty_page() {
        let out = parse_tsv(&format!("{HEADER}\n1\t1\t0\t0\t0\t0\t0\t0\t100\t100\t-1\t\n"));
        assert!(out.is_blank());
        assert_eq!(out.confidence, None);
    }

    #[test]
    fn command_carries_settings() {
        let settings = OcrSettings {
            language: "spa".into(),
            ..Default::default()
        };
        let cmd = TesseractBackend::new().command(std::path::Path::new("/tmp/page.jpg"), &settings);
        let args: Vec<String> = cmd
            .get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect();
        assert!(args.windows(2).any(|w| w == ["-l", "spa"]));
        assert!(args.windows(2).any(|w| w == ["--psm", "3"]));
        assert!(args.windows(2).any(|w| w == ["--oem", "1"]));
        assert!(args.iter().any(|a| a.starts_with("tessedit_char_whitelist=")));
        assert_eq!(args.last().map(String::as_str), Some("tsv"));
    }

    #[test]
    fn missing_binary_is_ocr_error() {
        let backend = TesseractBackend::with_binary("/nonexistent/tesseract-binary");
        assert!(!backend.is_available());
        let err = backend.recognize(b"bytes", &OcrSettings::default()).unwrap_err();
        assert!(matches!(err, PoaError::Ocr(_)));
    }
}
