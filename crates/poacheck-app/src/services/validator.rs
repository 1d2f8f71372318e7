// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Validation orchestrator: sequences extraction and compliance checks into a
// single `ValidationResult`.
//
// Extraction is CPU-bound and may shell out to OCR tools, so it runs on the
// blocking pool under the configured OCR timeout. The compliance engine is
// cheap and runs inline. No state is carried between calls apart from the
// shared OCR cache inside the extractor.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Local, NaiveDate};
use poacheck_compliance::ComplianceEngine;
use poacheck_core::config::{OcrSettings, PipelineConfig};
use poacheck_core::error::PoaError;
use poacheck_core::types::{ExtractedText, ValidationResult};
use poacheck_document::{OcrBackend, TextExtractor};
use thiserror::Error;
use tracing::{info, instrument};

/// A run that could not produce a verdict. Only extraction-stage errors end
/// a run; everything after extraction degrades into the verdict instead.
#[derive(Debug, Error)]
#[error("validation failed: {0}")]
pub struct ValidationFailure(#[source] pub PoaError);

impl ValidationFailure {
    pub fn reason(&self) -> &PoaError {
        &self.0
    }
}

impl From<PoaError> for ValidationFailure {
    fn from(err: PoaError) -> Self {
        Self(err)
    }
}

/// Cheaply cloneable; clones share the extractor and its OCR cache.
#[derive(Clone)]
pub struct DocumentValidator {
    extractor: Arc<TextExtractor>,
    compliance: Arc<ComplianceEngine>,
    ocr: OcrSettings,
}

impl DocumentValidator {
    pub fn new(
        extractor: Arc<TextExtractor>,
        compliance: Arc<ComplianceEngine>,
        ocr: OcrSettings,
    ) -> Self {
        Self {
            extractor,
            compliance,
            ocr,
        }
    }

    /// Wire the production collaborators from configuration.
    pub fn from_config(
        config: &PipelineConfig,
        backend: Arc<dyn OcrBackend>,
    ) -> Result<Self, PoaError> {
        Ok(Self::new(
            Arc::new(TextExtractor::from_config(backend, config)),
            Arc::new(ComplianceEngine::from_config(config)?),
            config.ocr.clone(),
        ))
    }

    pub fn ocr_settings(&self) -> &OcrSettings {
        &self.ocr
    }

    pub fn extractor(&self) -> &Arc<TextExtractor> {
        &self.extractor
    }

    /// Validate an upload with the configured OCR settings, judged as of today.
    pub async fn validate(
        &self,
        data: &[u8],
        filename: &str,
    ) -> Result<ValidationResult, ValidationFailure> {
        self.validate_with(data, filename, &self.ocr, Local::now().date_naive())
            .await
    }

    /// Validate with explicit OCR settings and reference date.
    #[instrument(skip(self, data, settings), fields(data_len = data.len()))]
    pub async fn validate_with(
        &self,
        data: &[u8],
        filename: &str,
        settings: &OcrSettings,
        today: NaiveDate,
    ) -> Result<ValidationResult, ValidationFailure> {
        let started = Instant::now();

        let extracted = self.extract(data, filename, settings).await?;
        if extracted.text.trim().is_empty() {
            return Err(PoaError::NoTextExtracted.into());
        }

        let report = self.compliance.validate(&extracted.text, today).await;
        let overall = report.overall();
        let additional_checks = report.additional_checks();

        let processing_time_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);
        info!(
            overall = ?overall,
            strategy = %extracted.source_strategy,
            confidence = extracted.confidence,
            elapsed_ms = processing_time_ms,
            "Validation complete"
        );

        Ok(ValidationResult {
            notary: report.notary,
            witness: report.witness,
            verbiage: report.verbiage,
            additional_checks,
            overall,
            extracted_text: extracted.text,
            ocr_confidence: extracted.confidence,
            source_strategy: extracted.source_strategy,
            processing_time_ms,
        })
    }

    /// Run the extraction engine on the blocking pool, bounded by the OCR
    /// timeout. The same deadline goes to the extractor, which kills overdue
    /// OCR tools and keeps late results out of the cache.
    pub async fn extract(
        &self,
        data: &[u8],
        filename: &str,
        settings: &OcrSettings,
    ) -> Result<ExtractedText, PoaError> {
        let extractor = Arc::clone(&self.extractor);
        let data = data.to_vec();
        let filename = filename.to_string();
        let task_settings = settings.clone();
        let timeout = Duration::from_secs(settings.timeout_secs);
        let deadline = Instant::now() + timeout;

        let task = tokio::task::spawn_blocking(move || {
            extractor.extract_until(&data, &filename, &task_settings, deadline)
        });

        match tokio::time::timeout(timeout, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(join_err)) => Err(PoaError::ExtractionFailure(format!(
                "extraction task aborted: {}",
                join_err
            ))),
            Err(_) => Err(PoaError::Timeout(format!(
                "text extraction exceeded {}s",
                settings.timeout_secs
            ))),
        }
    }
}
