// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image quality analysis: resolution, sharpness, brightness and contrast
// statistics rolled into an advisory 0–100 score with recommendations.
//
// The score is a heuristic for telling an uploader "rescan this", not a
// calibrated predictor of OCR accuracy.

use image::DynamicImage;
use imageproc::stats::histogram;
use poacheck_core::error::PoaError;
use poacheck_core::types::{QualityAnalysis, Resolution};
use tracing::{debug, instrument};

/// Assumed short edge of a scanned page in inches (US Letter), used to
/// estimate DPI from pixel dimensions.
const PAGE_SHORT_EDGE_INCHES: f64 = 8.5;

const TARGET_DPI: f64 = 300.0;
const LOW_DPI: u32 = 150;
const BLURRY_BELOW: f64 = 0.3;
const LOW_CONTRAST_BELOW: f64 = 0.4;
const LARGE_MEGAPIXELS: f64 = 20.0;

/// Decode `data` and analyse it, estimating DPI from its dimensions.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn analyze(data: &[u8]) -> Result<QualityAnalysis, PoaError> {
    let image = image::load_from_memory(data)
        .map_err(|err| PoaError::ImageDecode(format!("failed to decode image: {}", err)))?;
    Ok(analyze_image(&image, None))
}

/// Analyse a decoded image. `dpi` overrides the dimension-based estimate when
/// the caller knows the scan density.
pub fn analyze_image(image: &DynamicImage, dpi: Option<u32>) -> QualityAnalysis {
    let (width, height) = (image.width(), image.height());
    let megapixels = (width as f64 * height as f64) / 1_000_000.0;
    let dpi = dpi.unwrap_or_else(|| estimate_dpi(width, height));

    let (mean, variance) = luma_statistics(image);

    let sharpness = (variance / 10_000.0).clamp(0.0, 1.0);
    let brightness = mean / 255.0;
    let contrast = (variance.sqrt() / 128.0).clamp(0.0, 1.0);
    let overall_score = score(dpi, sharpness, brightness, contrast);

    let mut recommendations = Vec::new();
    if dpi < LOW_DPI {
        recommendations.push(format!(
            "Resolution is low (~{dpi} DPI); scan at 300dpi+ for reliable text recognition"
        ));
    }
    if sharpness < BLURRY_BELOW {
        recommendations
            .push("Image appears blurry; hold the camera steady or rescan the page".to_string());
    }
    if contrast < LOW_CONTRAST_BELOW {
        recommendations.push(
            "Low contrast between text and background; improve lighting or scanner contrast"
                .to_string(),
        );
    }
    if megapixels > LARGE_MEGAPIXELS {
        recommendations.push(format!(
            "Image is very large ({megapixels:.1} MP); consider downscaling before upload"
        ));
    }

    debug!(
        width,
        height,
        dpi,
        sharpness,
        brightness,
        contrast,
        overall_score,
        "Quality analysis complete"
    );

    QualityAnalysis {
        resolution: Resolution {
            width,
            height,
            megapixels,
            dpi,
        },
        sharpness,
        brightness,
        contrast,
        overall_score,
        recommendations,
    }
}

/// Weighted blend of the four metrics, 0–100.
fn score(dpi: u32, sharpness: f64, brightness: f64, contrast: f64) -> u8 {
    let resolution_term = (dpi as f64 / TARGET_DPI).min(1.0);
    let contrast_term = (contrast * 2.0).min(1.0);
    let exposure_term = 1.0 - 2.0 * (brightness - 0.5).abs();
    let raw = 100.0
        * (0.3 * resolution_term + 0.3 * sharpness + 0.2 * contrast_term + 0.2 * exposure_term);
    raw.round().clamp(0.0, 100.0) as u8
}

/// Treat the short edge as a Letter-width page.
fn estimate_dpi(width: u32, height: u32) -> u32 {
    (width.min(height) as f64 / PAGE_SHORT_EDGE_INCHES).round() as u32
}

/// Mean and population variance of luma intensity, from the histogram.
fn luma_statistics(image: &DynamicImage) -> (f64, f64) {
    let gray = image.to_luma8();
    let counts = histogram(&gray).channels[0];
    let total: f64 = counts.iter().map(|&c| c as f64).sum();
    if total == 0.0 {
        return (0.0, 0.0);
    }

    let mean = counts
        .iter()
        .enumerate()
        .map(|(value, &count)| value as f64 * count as f64)
        .sum::<f64>()
        / total;
    let variance = counts
        .iter()
        .enumerate()
        .map(|(value, &count)| count as f64 * (value as f64 - mean).powi(2))
        .sum::<f64>()
        / total;

    (mean, variance)
}
