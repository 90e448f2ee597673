use image::{DynamicImage, GrayImage, ImageBuffer, Luma};
use log::warn;

use crate::utils::MrzEvalError;

/// ImagePreprocessor prepares the cropped MRZ strip for OCR.
/// The pipeline is grayscale conversion followed by Otsu binarization.
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Crop the MRZ strip: the bottom portion of the page with a fixed
    /// left margin discarded. Both values are dataset heuristics and come
    /// from the pipeline configuration.
    pub fn crop_mrz_region(
        image: &DynamicImage,
        bottom_fraction: f32,
        left_margin: u32,
    ) -> Result<DynamicImage, MrzEvalError> {
        let (width, height) = (image.width(), image.height());
        if width == 0 || height == 0 {
            return Err(MrzEvalError::ZeroAreaImage { width, height });
        }

        let fraction = bottom_fraction.clamp(0.05, 1.0);
        let crop_height = (((height as f32) * fraction).round() as u32).clamp(1, height);
        let y0 = height - crop_height;

        let x0 = if left_margin >= width {
            warn!(
                "Left margin {} exceeds image width {}, ignoring it",
                left_margin, width
            );
            0
        } else {
            left_margin
        };

        Ok(image.crop_imm(x0, y0, width - x0, crop_height))
    }

    /// Convert to grayscale using the standard weighted conversion.
    pub fn to_grayscale(image: &DynamicImage) -> GrayImage {
        image.grayscale().to_luma8()
    }

    /// Compute the global Otsu threshold for a grayscale image.
    ///
    /// Sweeps every candidate threshold while maintaining the running
    /// background pixel count and intensity sum, and keeps the candidate
    /// with the highest between-class variance. Only a strictly greater
    /// variance replaces the maximum, so ties keep the lowest threshold.
    pub fn otsu_threshold(gray: &GrayImage) -> Result<u8, MrzEvalError> {
        let (width, height) = gray.dimensions();
        if width == 0 || height == 0 {
            return Err(MrzEvalError::ZeroAreaImage { width, height });
        }

        let mut histogram = [0u64; 256];
        for pixel in gray.pixels() {
            histogram[pixel.0[0] as usize] += 1;
        }

        let total = (width as u64) * (height as u64);
        let total_sum: u64 = histogram
            .iter()
            .enumerate()
            .map(|(value, &count)| value as u64 * count)
            .sum();

        let mut weight_bg = 0u64;
        let mut sum_bg = 0u64;
        let mut best_threshold = 0u8;
        let mut best_variance = -1.0f64;

        for t in 0u32..=255 {
            weight_bg += histogram[t as usize];
            sum_bg += t as u64 * histogram[t as usize];
            if weight_bg == 0 {
                continue;
            }
            let weight_fg = total - weight_bg;
            if weight_fg == 0 {
                break;
            }

            let mean_bg = sum_bg as f64 / weight_bg as f64;
            let mean_fg = (total_sum - sum_bg) as f64 / weight_fg as f64;
            let diff = mean_bg - mean_fg;
            let variance = weight_bg as f64 * weight_fg as f64 * diff * diff;

            if variance > best_variance {
                best_variance = variance;
                best_threshold = t as u8;
            }
        }

        Ok(best_threshold)
    }

    /// Binarize: intensity at or below the threshold becomes ink (0),
    /// everything else background (255). Assumes dark text on a light
    /// background; no inversion fallback is attempted.
    pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
        let (width, height) = gray.dimensions();
        let mut result: GrayImage = ImageBuffer::new(width, height);
        for (x, y, pixel) in gray.enumerate_pixels() {
            let value = if pixel.0[0] <= threshold { 0 } else { 255 };
            result.put_pixel(x, y, Luma([value]));
        }
        result
    }

    /// Full preprocessing of a cropped document region: grayscale, then
    /// Otsu threshold, then binarization. Deterministic for fixed input.
    pub fn preprocess(image: &DynamicImage) -> Result<GrayImage, MrzEvalError> {
        let gray = Self::to_grayscale(image);
        let threshold = Self::otsu_threshold(&gray)?;
        Ok(Self::binarize(&gray, threshold))
    }
}
