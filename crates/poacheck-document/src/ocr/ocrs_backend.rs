// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pure-Rust OCR backend using the `ocrs` crate, a neural network engine
// executed via `rten`.
//
// # Feature Gate
//
// Only available when the `ocr` feature is enabled:
//
// ```toml
// poacheck-document = { path = "crates/poacheck-document", features = ["ocr"] }
// ```
//
// # Model Setup
//
// The engine needs two model files:
//
// - **Detection model** (`text-detection.rten`) locates text regions.
// - **Recognition model** (`text-recognition.rten`) decodes characters.
//
// Running `ocrs-cli` once downloads both to `$XDG_CACHE_HOME/ocrs`
// (typically `~/.cache/ocrs`), which is where [`OcrsConfig::default`] looks.
//
// `ocrs` recognises Latin script only and reports no confidence, so the
// extraction engine falls back to its per-strategy default confidence.

use std::path::{Path, PathBuf};

use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use poacheck_core::config::OcrSettings;
use poacheck_core::error::PoaError;
use rten::Model;
use tracing::{debug, info, instrument};

use super::backend::{OcrBackend, OcrOutput};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, falling back to `~/.cache/ocrs`.
fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Model locations for [`OcrsBackend`].
#[derive(Debug, Clone)]
pub struct OcrsConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrsConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrsConfig {
    /// Expects `dir` to contain `text-detection.rten` and `text-recognition.rten`.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    pub fn validate(&self) -> Result<(), PoaError> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(PoaError::Ocr(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// OCR through the `ocrs` engine. Model loading is the expensive step, so
/// build one backend and share it.
pub struct OcrsBackend {
    engine: OcrsEngine,
}

impl OcrsBackend {
    /// Load both models and initialise the engine.
    ///
    /// `ocrs` and `rten` are 10-100x slower in debug builds; build release.
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrsConfig) -> Result<Self, PoaError> {
        config.validate()?;

        let load = |path: &Path, kind: &str| {
            Model::load_file(path).map_err(|err| {
                PoaError::Ocr(format!(
                    "failed to load {kind} model from {}: {}",
                    path.display(),
                    err
                ))
            })
        };

        info!("Loading OCR models");
        let detection_model = load(&config.detection_model_path, "detection")?;
        let recognition_model = load(&config.recognition_model_path, "recognition")?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| PoaError::Ocr(format!("failed to initialise OCR engine: {}", err)))?;

        info!("OCR engine initialised");
        Ok(Self { engine })
    }

    pub fn with_defaults() -> Result<Self, PoaError> {
        Self::new(OcrsConfig::default())
    }
}

impl OcrBackend for OcrsBackend {
    fn name(&self) -> &'static str {
        "ocrs"
    }

    fn is_available(&self) -> bool {
        true
    }

    #[instrument(skip_all, fields(image_len = image.len()))]
    fn recognize(&self, image: &[u8], settings: &OcrSettings) -> Result<OcrOutput, PoaError> {
        if settings.language != "eng" {
            debug!(language = %settings.language, "ocrs ignores language; recognising Latin script");
        }

        let decoded = image::load_from_memory(image)
            .map_err(|err| PoaError::ImageDecode(format!("failed to decode image: {}", err)))?;
        let rgb = decoded.to_rgb8();
        let (width, height) = rgb.dimensions();

        let source = ImageSource::from_bytes(rgb.as_raw(), (width, height)).map_err(|err| {
            PoaError::Ocr(format!(
                "failed to create image source ({}x{}): {}",
                width, height, err
            ))
        })?;
        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| PoaError::Ocr(format!("OCR preprocessing failed: {}", err)))?;
        let text = self
            .engine
            .get_text(&input)
            .map_err(|err| PoaError::Ocr(format!("OCR text recognition failed: {}", err)))?;

        debug!(lines = text.lines().count(), chars = text.len(), "ocrs recognition complete");
        Ok(OcrOutput {
            text,
            confidence: None,
        })
    }
}
