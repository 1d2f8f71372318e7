// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Skew estimation for scanned pages. Text baselines and form rules show up as
// long, nearly horizontal edges; the Hough transform finds them and the median
// of their tilt is the page skew.

use image::GrayImage;
use imageproc::edges::canny;
use imageproc::filter::gaussian_blur_f32;
use imageproc::hough::{LineDetectionOptions, PolarLine, detect_lines};
use tracing::{debug, instrument};

/// Skews smaller than this are left alone; rotation would only blur glyphs.
pub const MIN_CORRECTION_DEGREES: f32 = 1.0;
/// Skews larger than this are more likely a misdetection than a real tilt.
pub const MAX_CORRECTION_DEGREES: f32 = 15.0;

/// Fewest near-horizontal lines needed before we trust the estimate.
const MIN_LINES: usize = 3;

/// Estimate page skew in degrees. Positive means the content is tilted
/// clockwise, so rotating by the negated value straightens it.
///
/// Returns `None` when the page has too few straight edges to judge.
#[instrument(skip_all, fields(width = gray.width(), height = gray.height()))]
pub fn estimate_skew(gray: &GrayImage) -> Option<f32> {
    let (width, height) = gray.dimensions();
    if width < 16 || height < 16 {
        return None;
    }

    let blurred = gaussian_blur_f32(gray, 2.0);
    let edges = canny(&blurred, 50.0, 150.0);

    // Vote threshold scales with page width so only lines spanning a good
    // fraction of the page count.
    let vote_threshold = (width as f64 * 0.2).max(50.0) as u32;
    let lines = detect_lines(
        &edges,
        LineDetectionOptions {
            vote_threshold,
            suppression_radius: 8,
        },
    );

    let mut tilts = near_horizontal_tilts(&lines);
    debug!(
        line_count = lines.len(),
        horizontal = tilts.len(),
        vote_threshold,
        "Hough lines detected"
    );
    if tilts.len() < MIN_LINES {
        return None;
    }

    tilts.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Some(tilts[tilts.len() / 2])
}

/// Whether an estimated skew is worth correcting.
pub fn needs_correction(skew: f32) -> bool {
    let magnitude = skew.abs();
    (MIN_CORRECTION_DEGREES..=MAX_CORRECTION_DEGREES).contains(&magnitude)
}

/// Tilt, in degrees, of every line within 15° of horizontal.
///
/// A `PolarLine` stores the angle of the line's normal, so a horizontal line
/// has `angle_in_degrees == 90` and its tilt is the difference from 90.
fn near_horizontal_tilts(lines: &[PolarLine]) -> Vec<f32> {
    lines
        .iter()
        .filter(|line| (75..=105).contains(&line.angle_in_degrees))
        .map(|line| line.angle_in_degrees as f32 - 90.0)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    #[test]
    fn blank_page_has_no_skew_estimate() {
        let blank = GrayImage::from_pixel(200, 300, Luma([240]));
        assert_eq!(estimate_skew(&blank), None);
    }

    #[test]
    fn tiny_image_is_skipped() {
        let tiny = GrayImage::from_pixel(8, 8, Luma([0]));
        assert_eq!(estimate_skew(&tiny), None);
    }

    #[test]
    fn straight_rules_have_negligible_skew() {
        // Thick horizontal bars, like ruled signature lines.
        let page = GrayImage::from_fn(240, 240, |_, y| {
            if (y / 10) % 3 == 1 { Luma([0]) } else { Luma([255]) }
        });
        let skew = estimate_skew(&page).expect("ruled page should yield lines");
        assert!(skew.abs() < MIN_CORRECTION_DEGREES, "skew was {skew}");
    }

    #[test]
    fn tilt_classification_ignores_vertical_lines() {
        let lines = [
            PolarLine { r: 10.0, angle_in_degrees: 92 },
            PolarLine { r: 40.0, angle_in_degrees: 0 },
            PolarLine { r: 80.0, angle_in_degrees: 88 },
        ];
        assert_eq!(near_horizontal_tilts(&lines), vec![2.0, -2.0]);
    }

    #[test]
    fn correction_window() {
        assert!(!needs_correction(0.4));
        assert!(needs_correction(-3.0));
        assert!(needs_correction(15.0));
        assert!(!needs_correction(40.0));
    }
}
