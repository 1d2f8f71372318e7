// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Characters tesseract is allowed to emit by default: letters, digits and
/// the punctuation that shows up in legal boilerplate.
pub const DEFAULT_CHAR_WHITELIST: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789 .,;:!?'\"()-/&$%#@§_";

/// Complete pipeline settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub ocr: OcrSettings,
    pub extraction: ExtractionSettings,
    pub preprocess: PreprocessOptions,
    pub compliance: ComplianceSettings,
    /// Optional notary-registry endpoint. `None` means not configured.
    pub registry: Option<RegistryConfig>,
}

impl PipelineConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write settings to a JSON file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }
}

/// Tesseract page segmentation modes we expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSegmentation {
    /// Fully automatic page segmentation (PSM 3).
    #[default]
    Auto,
    /// Single column of text of variable sizes (PSM 4).
    SingleColumn,
    /// Single uniform block of text (PSM 6).
    SingleBlock,
    /// Sparse text, no particular order (PSM 11).
    Sparse,
}

impl PageSegmentation {
    pub fn psm(&self) -> u8 {
        match self {
            Self::Auto => 3,
            Self::SingleColumn => 4,
            Self::SingleBlock => 6,
            Self::Sparse => 11,
        }
    }
}

/// OCR engine modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineMode {
    /// Legacy pattern-matching engine (OEM 0).
    Legacy,
    /// LSTM neural net engine (OEM 1).
    #[default]
    NeuralNet,
    /// Legacy + LSTM (OEM 2).
    Combined,
}

impl EngineMode {
    pub fn oem(&self) -> u8 {
        match self {
            Self::Legacy => 0,
            Self::NeuralNet => 1,
            Self::Combined => 2,
        }
    }
}

/// OCR behaviour, including the caller-facing `{language, preprocess}` pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    /// Tesseract language code (ISO 639-2, e.g. `eng`, `spa`).
    pub language: String,
    /// Run the preprocessing chain before recognition.
    pub preprocess: bool,
    pub page_segmentation: PageSegmentation,
    pub engine_mode: EngineMode,
    pub char_whitelist: String,
    /// Upper bound on a single extraction run.
    pub timeout_secs: u64,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            language: "eng".into(),
            preprocess: true,
            page_segmentation: PageSegmentation::Auto,
            engine_mode: EngineMode::NeuralNet,
            char_whitelist: DEFAULT_CHAR_WHITELIST.into(),
            timeout_secs: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionSettings {
    /// Non-whitespace characters a PDF text layer needs before OCR is skipped.
    pub min_direct_text_chars: usize,
    /// Render resolution for PDF pages sent to OCR.
    pub render_dpi: u32,
    /// Rendered pages are bounded to this many pixels on each side.
    pub render_max_dim: u32,
    /// Maximum number of cached OCR results.
    pub cache_capacity: usize,
}

impl Default for ExtractionSettings {
    fn default() -> Self {
        Self {
            min_direct_text_chars: 100,
            render_dpi: 300,
            render_max_dim: 2000,
            cache_capacity: 100,
        }
    }
}

/// Which preprocessing stages run before OCR. Order is fixed:
/// rotate → grayscale → normalize → sharpen → denoise → re-encode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessOptions {
    pub auto_rotate: bool,
    pub grayscale: bool,
    pub normalize: bool,
    pub sharpen: bool,
    pub denoise: bool,
    /// Median filter radius for the denoise stage.
    pub median_radius: u32,
    /// JPEG quality used when re-encoding the processed image.
    pub jpeg_quality: u8,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            auto_rotate: true,
            grayscale: true,
            normalize: true,
            sharpen: true,
            denoise: true,
            median_radius: 3,
            jpeg_quality: 90,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceSettings {
    /// Minimum number of distinct witnesses.
    pub required_witnesses: usize,
}

impl Default for ComplianceSettings {
    fn default() -> Self {
        Self {
            required_witnesses: 1,
        }
    }
}

/// Notary registry endpoint (`GET {url}/verify?commission=&name=`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub url: String,
    /// Bearer token sent with every lookup.
    pub token: Option<String>,
    #[serde(default = "default_registry_timeout")]
    pub timeout_secs: u64,
}

fn default_registry_timeout() -> u64 {
    5
}
