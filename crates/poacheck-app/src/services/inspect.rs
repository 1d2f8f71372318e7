// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Upload inspection: quality analysis and text extraction run concurrently,
// then link detection over the text. A failed branch yields `None` for that
// branch only.

use std::collections::HashSet;

use lazy_static::lazy_static;
use poacheck_core::config::OcrSettings;
use poacheck_core::types::{DocumentFormat, ExtractedText, QualityAnalysis};
use poacheck_document::analyze_quality;
use regex::Regex;
use serde::Serialize;
use tracing::{instrument, warn};

use super::validator::DocumentValidator;

lazy_static! {
    static ref LINK_PATTERN: Regex =
        Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"'()\[\]]+"#).unwrap();
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadInspection {
    /// Image uploads only.
    pub quality: Option<QualityAnalysis>,
    pub text: Option<ExtractedText>,
    pub links: Option<Vec<String>>,
}

#[instrument(skip(validator, data, settings), fields(data_len = data.len()))]
pub async fn inspect_upload(
    validator: &DocumentValidator,
    data: &[u8],
    filename: &str,
    settings: &OcrSettings,
) -> UploadInspection {
    let is_image = DocumentFormat::from_filename(filename).is_some_and(|f| f.is_image());

    let quality = async {
        if !is_image {
            return None;
        }
        let bytes = data.to_vec();
        match tokio::task::spawn_blocking(move || analyze_quality(&bytes)).await {
            Ok(Ok(analysis)) => Some(analysis),
            Ok(Err(err)) => {
                warn!(error = %err, "Quality analysis failed");
                None
            }
            Err(err) => {
                warn!(error = %err, "Quality analysis task aborted");
                None
            }
        }
    };

    let text = async {
        match validator.extract(data, filename, settings).await {
            Ok(extracted) => Some(extracted),
            Err(err) => {
                warn!(error = %err, "Text extraction failed");
                None
            }
        }
    };

    let (quality, text) = tokio::join!(quality, text);
    let links = text.as_ref().map(|t| detect_links(&t.text));

    UploadInspection {
        quality,
        text,
        links,
    }
}

/// URLs mentioned in the text, de-duplicated in order of appearance.
pub fn detect_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    LINK_PATTERN
        .find_iter(text)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':', '!', '?']).to_string())
        .filter(|link| seen.insert(link.to_lowercase()))
        .collect()
}
