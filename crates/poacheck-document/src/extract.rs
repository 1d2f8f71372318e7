// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction engine. Strategies are tried in order, each a fallback for
// the one before:
//
//   PDF:   embedded text layer → OCR of the rendered first page
//   image: preprocess → OCR
//
// OCR results are cached by content fingerprint.

use std::sync::Arc;
use std::time::{Duration, Instant};

use poacheck_core::config::{ExtractionSettings, OcrSettings, PipelineConfig, PreprocessOptions};
use poacheck_core::error::PoaError;
use poacheck_core::types::{DocumentFormat, ExtractedText, ExtractionStrategy};
use tracing::{debug, info, instrument, warn};

use crate::ocr::{OcrBackend, OcrCache, OcrOutput};
use crate::pdf::reader::{PdfReader, meaningful_chars};
use crate::pdf::render::{PageRenderer, PdftoppmRenderer};
use crate::scan::preprocess::preprocess_or_original;

/// Turns uploaded bytes into text. Cheap to share behind an `Arc`; all
/// collaborators are injected.
pub struct TextExtractor {
    backend: Arc<dyn OcrBackend>,
    renderer: Arc<dyn PageRenderer>,
    cache: Arc<OcrCache>,
    settings: ExtractionSettings,
    preprocess: PreprocessOptions,
}

impl TextExtractor {
    pub fn new(
        backend: Arc<dyn OcrBackend>,
        renderer: Arc<dyn PageRenderer>,
        cache: Arc<OcrCache>,
        settings: ExtractionSettings,
        preprocess: PreprocessOptions,
    ) -> Self {
        Self {
            backend,
            renderer,
            cache,
            settings,
            preprocess,
        }
    }

    /// Extractor with `pdftoppm` rendering and a fresh cache sized from config.
    pub fn from_config(backend: Arc<dyn OcrBackend>, config: &PipelineConfig) -> Self {
        Self::new(
            backend,
            Arc::new(
                PdftoppmRenderer::new().with_timeout(Duration::from_secs(config.ocr.timeout_secs)),
            ),
            Arc::new(OcrCache::new(config.extraction.cache_capacity)),
            config.extraction.clone(),
            config.preprocess.clone(),
        )
    }

    pub fn cache(&self) -> &Arc<OcrCache> {
        &self.cache
    }

    /// Extract text from an upload, dispatching on the filename's extension.
    ///
    /// # Errors
    ///
    /// - [`PoaError::UnsupportedFormat`] if the extension is neither PDF nor
    ///   a supported raster format.
    /// - [`PoaError::NoTextExtracted`] if OCR ran but produced only whitespace.
    /// - [`PoaError::ExtractionFailure`] if every strategy errored.
    /// - [`PoaError::Timeout`] if OCR overran `settings.timeout_secs`.
    pub fn extract(
        &self,
        data: &[u8],
        filename: &str,
        settings: &OcrSettings,
    ) -> Result<ExtractedText, PoaError> {
        let deadline = Instant::now() + Duration::from_secs(settings.timeout_secs);
        self.extract_until(data, filename, settings, deadline)
    }

    /// [`extract`](Self::extract) against a caller-supplied deadline. OCR is
    /// not started after the deadline, and a result that arrives late is
    /// dropped rather than cached.
    #[instrument(skip(self, data, settings, deadline), fields(data_len = data.len(), lang = %settings.language))]
    pub fn extract_until(
        &self,
        data: &[u8],
        filename: &str,
        settings: &OcrSettings,
        deadline: Instant,
    ) -> Result<ExtractedText, PoaError> {
        let format = DocumentFormat::from_filename(filename)
            .ok_or_else(|| PoaError::UnsupportedFormat(filename.to_string()))?;

        let extracted = match format {
            DocumentFormat::Pdf => self.extract_pdf(data, settings, deadline)?,
            _ => self.extract_image(data, settings, deadline)?,
        };

        info!(
            strategy = %extracted.source_strategy,
            confidence = extracted.confidence,
            chars = extracted.text.len(),
            "Text extracted"
        );
        Ok(extracted)
    }

    fn extract_pdf(
        &self,
        data: &[u8],
        settings: &OcrSettings,
        deadline: Instant,
    ) -> Result<ExtractedText, PoaError> {
        // Too-short text layers are held back in case OCR comes up empty.
        let mut short_layer = None;

        match PdfReader::from_bytes(data).and_then(|reader| reader.extract_text()) {
            Ok(text) => {
                let chars = meaningful_chars(&text);
                if chars >= self.settings.min_direct_text_chars {
                    return Ok(ExtractedText::new(text, None, ExtractionStrategy::DirectPdf));
                }
                debug!(chars, "Text layer too short; trying OCR");
                if chars > 0 {
                    short_layer = Some(text);
                }
            }
            Err(err) => warn!(error = %err, "Could not read PDF text layer"),
        }

        let ocr = self
            .renderer
            .render_first_page(data, self.settings.render_dpi, self.settings.render_max_dim)
            .and_then(|page| self.recognize(&page, settings, deadline));

        match (ocr, short_layer) {
            (Ok(output), _) if !output.is_blank() => Ok(ExtractedText::new(
                output.text,
                output.confidence,
                ExtractionStrategy::PdfOcr,
            )),
            (_, Some(text)) => {
                warn!("OCR produced nothing; falling back to short text layer");
                Ok(ExtractedText::new(text, None, ExtractionStrategy::DirectPdf))
            }
            (Ok(_), None) => Err(PoaError::NoTextExtracted),
            (Err(err @ PoaError::Timeout(_)), None) => Err(err),
            (Err(err), None) => Err(PoaError::ExtractionFailure(format!(
                "no text layer and page OCR failed: {}",
                err
            ))),
        }
    }

    fn extract_image(
        &self,
        data: &[u8],
        settings: &OcrSettings,
        deadline: Instant,
    ) -> Result<ExtractedText, PoaError> {
        let output = self
            .recognize(data, settings, deadline)
            .map_err(|err| match err {
                PoaError::Timeout(_) => err,
                other => PoaError::ExtractionFailure(format!("image OCR failed: {}", other)),
            })?;
        if output.is_blank() {
            return Err(PoaError::NoTextExtracted);
        }
        Ok(ExtractedText::new(
            output.text,
            output.confidence,
            ExtractionStrategy::ImageOcr,
        ))
    }

    /// OCR an encoded image, consulting the cache first. The cache key is
    /// taken over the bytes as supplied, before preprocessing.
    #[instrument(skip_all, fields(backend = self.backend.name(), image_len = image.len()))]
    pub fn recognize(
        &self,
        image: &[u8],
        settings: &OcrSettings,
        deadline: Instant,
    ) -> Result<OcrOutput, PoaError> {
        let key = OcrCache::key_for(image, settings);
        if let Some(hit) = self.cache.get(&key) {
            debug!(cache_hit = true, "OCR cache hit");
            return Ok(hit);
        }

        let overran = || PoaError::Timeout(format!("OCR exceeded {}s", settings.timeout_secs));
        if Instant::now() >= deadline {
            return Err(overran());
        }

        let output = if settings.preprocess {
            let prepared = preprocess_or_original(image, &self.preprocess);
            self.backend.recognize(&prepared, settings)?
        } else {
            self.backend.recognize(image, settings)?
        };

        if Instant::now() >= deadline {
            warn!("OCR finished after its deadline; discarding result");
            return Err(overran());
        }

        debug!(cache_hit = false, confidence = ?output.confidence, "OCR complete");
        self.cache.insert(key, output.clone());
        Ok(output)
    }
}
