//! Compressibility estimates from the intermediate encoding.

use crate::catalog::NormalizedImage;
use std::fmt;

/// Bytes per pixel of an image in the intermediate format.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct CompressionRatio(f64);

impl CompressionRatio {
    /// `pixel_count` must be non-zero; the catalog never admits an image
    /// without pixels.
    pub fn new(encoded_size: u64, pixel_count: u64) -> Self {
        debug_assert!(pixel_count > 0, "compression ratio of an empty image");
        CompressionRatio(encoded_size as f64 / pixel_count as f64)
    }

    pub fn bytes_per_pixel(self) -> f64 {
        self.0
    }

    /// Number of pixels expected to fit in `budget_bytes` at this ratio.
    pub fn pixels_for_budget(self, budget_bytes: u64) -> f64 {
        budget_bytes as f64 / self.0
    }
}

impl fmt::Display for CompressionRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3} B/px", self.0)
    }
}

/// A cataloged image paired with its estimate.
#[derive(Debug, Clone)]
pub struct EstimatedImage {
    pub image: NormalizedImage,
    pub ratio: CompressionRatio,
}

pub fn estimate(image: &NormalizedImage) -> CompressionRatio {
    CompressionRatio::new(image.normalized_size, image.pixel_count())
}

/// Runs the estimate over the complete catalog.
pub fn estimate_all(images: Vec<NormalizedImage>) -> Vec<EstimatedImage> {
    images
        .into_iter()
        .map(|image| {
            let ratio = estimate(&image);
            EstimatedImage { image, ratio }
        })
        .collect()
}
