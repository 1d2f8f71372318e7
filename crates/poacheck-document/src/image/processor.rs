// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Image processor: orientation, grayscale, contrast normalisation, sharpening,
// median denoising and bounded resizing. Operates on in-memory images using
// the `image` and `imageproc` crates.

use std::io::Cursor;

use image::{DynamicImage, GrayImage, ImageDecoder, ImageFormat, ImageReader, Luma};
use imageproc::geometric_transformations::{self, Interpolation};
use imageproc::stats::histogram;
use poacheck_core::error::PoaError;
use tracing::{debug, info, instrument};

/// Fraction of pixels ignored at each end of the histogram when stretching
/// contrast, so a few specks of dust don't pin the range.
const NORMALIZE_CLIP: f64 = 0.005;

/// Image processing pipeline operating on a single in-memory image.
///
/// Each method consumes `self` and returns a new `ImageProcessor` wrapping the
/// transformed image, enabling method chaining.
///
/// ```ignore
/// let jpeg = ImageProcessor::from_bytes(&upload)?
///     .grayscale()
///     .normalize()
///     .sharpen()
///     .denoise(3)
///     .to_jpeg_bytes(90)?;
/// ```
pub struct ImageProcessor {
    image: DynamicImage,
}

impl ImageProcessor {
    // -- Construction ---------------------------------------------------------

    /// Decode raw encoded bytes (JPEG, PNG, TIFF, ...).
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self, PoaError> {
        let img = image::load_from_memory(data)
            .map_err(|err| PoaError::ImageDecode(format!("failed to decode image: {}", err)))?;
        debug!(
            width = img.width(),
            height = img.height(),
            "Image decoded from bytes"
        );
        Ok(Self { image: img })
    }

    /// Decode raw bytes and apply the EXIF orientation tag, so photographed
    /// pages come out upright.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn from_bytes_oriented(data: &[u8]) -> Result<Self, PoaError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|err| PoaError::ImageDecode(format!("failed to sniff image format: {}", err)))?;
        let mut decoder = reader
            .into_decoder()
            .map_err(|err| PoaError::ImageDecode(format!("failed to decode image: {}", err)))?;
        let orientation = decoder
            .orientation()
            .map_err(|err| PoaError::ImageDecode(format!("failed to read orientation: {}", err)))?;
        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|err| PoaError::ImageDecode(format!("failed to decode image: {}", err)))?;
        img.apply_orientation(orientation);
        debug!(
            width = img.width(),
            height = img.height(),
            ?orientation,
            "Image decoded with orientation"
        );
        Ok(Self { image: img })
    }

    /// Wrap an already-decoded `DynamicImage`.
    pub fn from_dynamic(image: DynamicImage) -> Self {
        Self { image }
    }

    // -- Accessors ------------------------------------------------------------

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn as_dynamic(&self) -> &DynamicImage {
        &self.image
    }

    pub fn into_dynamic(self) -> DynamicImage {
        self.image
    }

    // -- Transformations (consume self, return new Self) -----------------------

    /// Downscale so neither side exceeds `max_dim`, preserving aspect ratio.
    /// Images already within bounds are left untouched.
    #[instrument(skip(self), fields(max_dim))]
    pub fn bound(self, max_dim: u32) -> Self {
        if self.image.width() <= max_dim && self.image.height() <= max_dim {
            return self;
        }
        info!(
            from_w = self.image.width(),
            from_h = self.image.height(),
            max_dim,
            "Bounding image"
        );
        let resized = self
            .image
            .resize(max_dim, max_dim, image::imageops::FilterType::Lanczos3);
        debug!(new_w = resized.width(), new_h = resized.height(), "Resize complete");
        Self { image: resized }
    }

    /// Rotate by an arbitrary angle in degrees (clockwise). Exact multiples of
    /// 90 are lossless; anything else is interpolated onto a white canvas.
    #[instrument(skip(self), fields(degrees))]
    pub fn rotate(self, degrees: f32) -> Self {
        let normalised = degrees.rem_euclid(360.0);
        if (normalised - 90.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate90(),
            };
        }
        if (normalised - 180.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate180(),
            };
        }
        if (normalised - 270.0).abs() < 0.01 {
            return Self {
                image: self.image.rotate270(),
            };
        }
        if normalised.abs() < 0.01 || (normalised - 360.0).abs() < 0.01 {
            return self;
        }

        let rgba = self.image.to_rgba8();
        let rotated = geometric_transformations::rotate_about_center(
            &rgba,
            degrees.to_radians(),
            Interpolation::Bilinear,
            image::Rgba([255u8, 255, 255, 255]),
        );
        debug!("General rotation applied");
        Self {
            image: DynamicImage::ImageRgba8(rotated),
        }
    }

    /// Convert to single-channel luma.
    #[instrument(skip(self))]
    pub fn grayscale(self) -> Self {
        Self {
            image: DynamicImage::ImageLuma8(self.image.to_luma8()),
        }
    }

    /// Stretch luma contrast so the darkest and brightest pixels (after
    /// clipping a small tail) span the full 0..255 range.
    ///
    /// Colour images are converted to grayscale as a side effect.
    #[instrument(skip(self))]
    pub fn normalize(self) -> Self {
        let gray = self.image.to_luma8();
        let (low, high) = luma_range(&gray, NORMALIZE_CLIP);
        if high <= low {
            debug!(low, high, "Flat histogram; skipping normalisation");
            return Self {
                image: DynamicImage::ImageLuma8(gray),
            };
        }

        let scale = 255.0 / (high - low) as f32;
        let stretched = GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let value = gray.get_pixel(x, y).0[0];
            let mapped = (value.saturating_sub(low) as f32 * scale).clamp(0.0, 255.0);
            Luma([mapped as u8])
        });
        debug!(low, high, "Contrast normalised");
        Self {
            image: DynamicImage::ImageLuma8(stretched),
        }
    }

    /// Unsharp-mask sharpening to crispen glyph edges.
    #[instrument(skip(self))]
    pub fn sharpen(self) -> Self {
        Self {
            image: self.image.unsharpen(1.0, 1),
        }
    }

    /// Median filter with the given radius to remove salt-and-pepper noise.
    #[instrument(skip(self), fields(radius))]
    pub fn denoise(self, radius: u32) -> Self {
        if radius == 0 {
            return self;
        }
        let image = match self.image {
            DynamicImage::ImageLuma8(gray) => {
                DynamicImage::ImageLuma8(imageproc::filter::median_filter(&gray, radius, radius))
            }
            other => {
                let rgb = other.to_rgb8();
                DynamicImage::ImageRgb8(imageproc::filter::median_filter(&rgb, radius, radius))
            }
        };
        Self { image }
    }

    // -- Output ---------------------------------------------------------------

    pub fn to_png_bytes(&self) -> Result<Vec<u8>, PoaError> {
        let mut buffer = Vec::new();
        let mut cursor = Cursor::new(&mut buffer);
        self.image
            .write_to(&mut cursor, ImageFormat::Png)
            .map_err(|err| PoaError::Preprocessing(format!("PNG encoding failed: {}", err)))?;
        Ok(buffer)
    }

    /// Encode as JPEG with the given quality (1-100).
    pub fn to_jpeg_bytes(&self, quality: u8) -> Result<Vec<u8>, PoaError> {
        let mut buffer = Vec::new();
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buffer, quality.clamp(1, 100));
        let result = match &self.image {
            DynamicImage::ImageLuma8(gray) => gray.write_with_encoder(encoder),
            other => other.to_rgb8().write_with_encoder(encoder),
        };
        result.map_err(|err| PoaError::Preprocessing(format!("JPEG encoding failed: {}", err)))?;
        Ok(buffer)
    }
}

/// Luma values at the `clip` and `1 - clip` quantiles of the histogram.
fn luma_range(gray: &GrayImage, clip: f64) -> (u8, u8) {
    let counts = histogram(gray).channels[0];
    let total: u64 = counts.iter().map(|&c| c as u64).sum();
    if total == 0 {
        return (0, 255);
    }
    let cutoff = (total as f64 * clip) as u64;

    let mut seen = 0u64;
    let mut low = 0u8;
    for (value, &count) in counts.iter().enumerate() {
        seen += count as u64;
        if seen > cutoff {
            low = value as u8;
            break;
        }
    }

    seen = 0;
    let mut high = 255u8;
    for (value, &count) in counts.iter().enumerate().rev() {
        seen += count as u64;
        if seen > cutoff {
            high = value as u8;
            break;
        }
    }

    (low, high)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn faded_page() -> DynamicImage {
        // Mid-grey text on a light-grey page: values only span 100..=180.
        let img = GrayImage::from_fn(40, 40, |x, _| if x % 4 == 0 { Luma([100]) } else { Luma([180]) });
        DynamicImage::ImageLuma8(img)
    }

    #[test]
    fn normalize_stretches_to_full_range() {
        let out = ImageProcessor::from_dynamic(faded_page())
            .normalize()
            .into_dynamic()
            .to_luma8();
        let min = out.pixels().map(|p| p.0[0]).min().unwrap();
        let max = out.pixels().map(|p| p.0[0]).max().unwrap();
        assert_eq!(min, 0);
        assert_eq!(max, 255);
    }

    #[test]
    fn normalize_flat_image_is_noop() {
        let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(10, 10, Luma([77])));
        let out = ImageProcessor::from_dynamic(flat).normalize().into_dynamic().to_luma8();
        assert!(out.pixels().all(|p| p.0[0] == 77));
    }

    #[test]
    fn grayscale_produces_luma() {
        let rgb = DynamicImage::ImageRgb8(RgbImage::from_pixel(8, 8, Rgb([200, 10, 10])));
        let out = ImageProcessor::from_dynamic(rgb).grayscale().into_dynamic();
        assert!(matches!(out, DynamicImage::ImageLuma8(_)));
    }

    #[test]
    fn denoise_removes_isolated_speck() {
        let mut img = GrayImage::from_pixel(15, 15, Luma([255]));
        img.put_pixel(7, 7, Luma([0]));
        let out = ImageProcessor::from_dynamic(DynamicImage::ImageLuma8(img))
            .denoise(3)
            .into_dynamic()
            .to_luma8();
        assert_eq!(out.get_pixel(7, 7).0[0], 255);
    }

    #[test]
    fn bound_preserves_aspect_and_skips_small_images() {
        let big = DynamicImage::ImageLuma8(GrayImage::new(4000, 2000));
        let bounded = ImageProcessor::from_dynamic(big).bound(2000);
        assert_eq!((bounded.width(), bounded.height()), (2000, 1000));

        let small = DynamicImage::ImageLuma8(GrayImage::new(300, 200));
        let untouched = ImageProcessor::from_dynamic(small).bound(2000);
        assert_eq!((untouched.width(), untouched.height()), (300, 200));
    }

    #[test]
    fn right_angle_rotation_swaps_dimensions() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(30, 10));
        let rotated = ImageProcessor::from_dynamic(img).rotate(90.0);
        assert_eq!((rotated.width(), rotated.height()), (10, 30));
    }

    #[test]
    fn jpeg_round_trip_decodes() {
        let jpeg = ImageProcessor::from_dynamic(faded_page()).to_jpeg_bytes(90).unwrap();
        let decoded = ImageProcessor::from_bytes_oriented(&jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (40, 40));
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let err = ImageProcessor::from_bytes(b"definitely not an image").err().unwrap();
        assert!(matches!(err, PoaError::ImageDecode(_)));
    }
}
