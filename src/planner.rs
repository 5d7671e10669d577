//! Resize planning and execution.
//!
//! Planning is pure: given an image's size, dimensions, compression ratio and
//! the byte ceiling it decides whether to copy or to resize and to what.
//! Execution turns a decision into an output file and always retires the
//! image's scratch copy.

use crate::catalog::NormalizedImage;
use crate::error::{BudgetError, Result};
use crate::estimate::{CompressionRatio, EstimatedImage};
use crate::formats::{save_image, OutputFormat};
use image::imageops::FilterType;
use std::fmt;
use std::fs;
use std::path::Path;

pub const RESIZE_FILTER: FilterType = FilterType::Lanczos3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeDecision {
    /// The intermediate encoding already fits the ceiling.
    PassThroughCopy,
    /// Too many bytes, but already at or below the ideal pixel count. Emitted
    /// as-is; the output may still exceed the ceiling.
    CopyUnchanged,
    Resize { width: u32, height: u32 },
}

impl ResizeDecision {
    pub fn is_resize(&self) -> bool {
        matches!(self, ResizeDecision::Resize { .. })
    }

    /// Dimensions of the output for an image currently `width` x `height`.
    pub fn output_dimensions(&self, width: u32, height: u32) -> (u32, u32) {
        match *self {
            ResizeDecision::Resize { width, height } => (width, height),
            _ => (width, height),
        }
    }
}

impl fmt::Display for ResizeDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResizeDecision::PassThroughCopy => write!(f, "within budget, copied"),
            ResizeDecision::CopyUnchanged => write!(f, "at or below target pixel count, copied"),
            ResizeDecision::Resize { width, height } => write!(f, "resize to {}x{}", width, height),
        }
    }
}

/// Aspect-preserving dimensions whose product does not exceed
/// `ideal_pixels`. Both sides are truncated, then clamped to one pixel.
///
/// The clamp is the one case where the product can exceed `ideal_pixels`:
/// when a side would truncate to zero (e.g. `ideal_pixels < aspect`), it
/// becomes 1 and the other side keeps its share, so `10_000x10` at `0.5`
/// gives `22x1`.
pub fn scaled_dimensions(width: u32, height: u32, ideal_pixels: f64) -> (u32, u32) {
    let aspect = f64::from(width) / f64::from(height);
    let new_height = (ideal_pixels / aspect).sqrt();
    let new_width = aspect * new_height;

    ((new_width as u32).max(1), (new_height as u32).max(1))
}

/// Decides what to do with one image.
///
/// ```
/// use img_budget::estimate::CompressionRatio;
/// use img_budget::planner::{plan_resize, ResizeDecision};
///
/// let ratio = CompressionRatio::new(12_000_000, 4000 * 3000);
/// let decision = plan_resize(4000, 3000, 12_000_000, ratio, 5_000_000);
/// assert_eq!(decision, ResizeDecision::Resize { width: 2581, height: 1936 });
/// ```
pub fn plan_resize(
    width: u32,
    height: u32,
    normalized_size: u64,
    ratio: CompressionRatio,
    ceiling_bytes: u64,
) -> ResizeDecision {
    if normalized_size <= ceiling_bytes {
        return ResizeDecision::PassThroughCopy;
    }

    let ideal_pixels = ratio.pixels_for_budget(ceiling_bytes);
    let pixels = u64::from(width) * u64::from(height);
    if pixels as f64 <= ideal_pixels.floor() {
        return ResizeDecision::CopyUnchanged;
    }

    let (width, height) = scaled_dimensions(width, height, ideal_pixels);
    ResizeDecision::Resize { width, height }
}

pub fn plan(estimated: &EstimatedImage, ceiling_bytes: u64) -> ResizeDecision {
    let image = &estimated.image;
    plan_resize(
        image.width(),
        image.height(),
        image.normalized_size,
        estimated.ratio,
        ceiling_bytes,
    )
}

fn emit(image: &NormalizedImage, decision: ResizeDecision, output: &Path, format: OutputFormat) -> Result<u64> {
    match decision {
        ResizeDecision::PassThroughCopy | ResizeDecision::CopyUnchanged if format.is_intermediate() => {
            fs::copy(&image.scratch_path, output)?;
        }
        ResizeDecision::PassThroughCopy | ResizeDecision::CopyUnchanged => {
            let img = image::open(&image.scratch_path)?;
            save_image(&img, output, format)?;
        }
        ResizeDecision::Resize { width, height } => {
            let img = image::open(&image.scratch_path)?;
            let resized = img.resize_exact(width, height, RESIZE_FILTER);
            drop(img);
            save_image(&resized, output, format)?;
        }
    }

    Ok(fs::metadata(output)?.len())
}

/// Writes the output for `image` according to `decision` and deletes its
/// scratch copy, whether or not emitting succeeded. Returns the output size.
pub fn apply_decision(
    image: &NormalizedImage,
    decision: ResizeDecision,
    output: &Path,
    format: OutputFormat,
) -> Result<u64> {
    if !image.scratch_path.is_file() {
        return Err(BudgetError::MissingScratchFile(image.scratch_path.clone()));
    }

    let emitted = emit(image, decision, output, format);
    let removed = fs::remove_file(&image.scratch_path);

    let size = emitted?;
    removed?;
    Ok(size)
}
