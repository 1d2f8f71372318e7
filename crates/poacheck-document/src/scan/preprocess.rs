// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR preprocessing chain. Stages run in a fixed order:
//
//   auto-rotate (EXIF + deskew) → grayscale → normalize → sharpen → denoise
//
// and the result is re-encoded as JPEG at a fixed quality.

use poacheck_core::config::PreprocessOptions;
use poacheck_core::error::PoaError;
use tracing::{debug, info, instrument, warn};

use crate::image::processor::ImageProcessor;
use crate::scan::deskew::{estimate_skew, needs_correction};

/// Run the enabled stages over an encoded image and return re-encoded bytes.
///
/// # Errors
///
/// Every failure, including an undecodable input, is reported as
/// [`PoaError::Preprocessing`].
#[instrument(skip_all, fields(data_len = data.len()))]
pub fn preprocess(data: &[u8], options: &PreprocessOptions) -> Result<Vec<u8>, PoaError> {
    let decoded = if options.auto_rotate {
        ImageProcessor::from_bytes_oriented(data).map(straighten)
    } else {
        ImageProcessor::from_bytes(data)
    };
    let mut processor = decoded.map_err(|err| match err {
        PoaError::ImageDecode(reason) => PoaError::Preprocessing(format!("decode failed: {reason}")),
        other => other,
    })?;

    if options.grayscale {
        processor = processor.grayscale();
    }
    if options.normalize {
        processor = processor.normalize();
    }
    if options.sharpen {
        processor = processor.sharpen();
    }
    if options.denoise {
        processor = processor.denoise(options.median_radius);
    }

    let encoded = processor.to_jpeg_bytes(options.jpeg_quality)?;
    info!(
        width = processor.width(),
        height = processor.height(),
        output_len = encoded.len(),
        "Preprocessing complete"
    );
    Ok(encoded)
}

/// Like [`preprocess`], but any failure falls back to the original bytes.
///
/// Preprocessing only ever improves recognition odds, so a failure here must
/// not stop OCR from being attempted on the untouched upload.
pub fn preprocess_or_original(data: &[u8], options: &PreprocessOptions) -> Vec<u8> {
    match preprocess(data, options) {
        Ok(processed) => processed,
        Err(err) => {
            warn!(error = %err, "Preprocessing failed; using original image");
            data.to_vec()
        }
    }
}

/// Rotate away any detected page skew.
fn straighten(processor: ImageProcessor) -> ImageProcessor {
    let gray = processor.as_dynamic().to_luma8();
    match estimate_skew(&gray) {
        Some(skew) if needs_correction(skew) => {
            info!(skew, "Deskewing page");
            processor.rotate(-skew)
        }
        Some(skew) => {
            debug!(skew, "Skew within tolerance");
            processor
        }
        None => processor,
    }
}
