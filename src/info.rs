use crate::budget::BudgetSpec;
use crate::error::{BudgetError, Result};
use crate::estimate::CompressionRatio;
use crate::formats::{encode_image, INTERMEDIATE_FORMAT};
use crate::info;
use crate::planner::{plan_resize, ResizeDecision};
use crate::utils::{create_progress_spinner, format_file_size};
use image::{ColorType, GenericImageView, ImageFormat, ImageReader};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

/// What `reduce` would learn about a single image during cataloging.
#[derive(Debug, Clone)]
pub struct ImageInfo {
    pub path: PathBuf,
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
    pub color: ColorType,
    pub file_size: u64,
    pub normalized_size: u64,
    pub ratio: CompressionRatio,
}

impl ImageInfo {
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn aspect_ratio(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }
}

pub fn analyze_image(input_path: &Path) -> Result<ImageInfo> {
    if !input_path.exists() {
        return Err(BudgetError::InputNotFound(input_path.to_path_buf()));
    }

    let file_size = fs::metadata(input_path)?.len();
    let reader = ImageReader::open(input_path)?.with_guessed_format()?;
    let format = reader.format();
    let img = reader.decode()?;

    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(BudgetError::UnsupportedFormat(format!(
            "{} has zero width or height",
            input_path.display()
        )));
    }

    let normalized_size = encode_image(&img, INTERMEDIATE_FORMAT)?.len() as u64;
    let color = img.color();
    drop(img);

    Ok(ImageInfo {
        path: input_path.to_path_buf(),
        format,
        width,
        height,
        color,
        file_size,
        normalized_size,
        ratio: CompressionRatio::new(normalized_size, u64::from(width) * u64::from(height)),
    })
}

/// The decision `reduce` would take for this image alone under a per-file
/// budget.
pub fn preview_decision(info: &ImageInfo, per_file_budget_kb: u64) -> Result<ResizeDecision> {
    let ceiling = BudgetSpec::new(0, per_file_budget_kb)?.resolve(NonZeroUsize::MIN);
    Ok(plan_resize(
        info.width,
        info.height,
        info.normalized_size,
        info.ratio,
        ceiling,
    ))
}

pub fn print_image_info(info: &ImageInfo) {
    info!("📋 Basic Information:");
    info!("  📁 File: {:?}", info.path);
    info!("  📏 Dimensions: {}x{} pixels", info.width, info.height);
    info!("  📦 File size: {} ({} bytes)", format_file_size(info.file_size), info.file_size);
    info!("  🎨 Color type: {:?}", info.color);
    match info.format {
        Some(format) => info!("  🎭 Image format: {:?}", format),
        None => info!("  🎭 Image format: unknown"),
    }
    info!("  🔢 Total pixels: {}", info.pixel_count());
    info!("  📐 Aspect ratio: {:.2}:1", info.aspect_ratio());

    info!("\n🧮 Compressibility:");
    info!(
        "  📦 {} size: {} ({} bytes)",
        INTERMEDIATE_FORMAT,
        format_file_size(info.normalized_size),
        info.normalized_size
    );
    info!("  🎯 Compression ratio: {}", info.ratio);
}

pub fn show_image_info(input_path: &Path, per_file_budget_kb: Option<u64>) -> Result<()> {
    info!("📊 Analyzing image: {:?}", input_path);

    let spinner = create_progress_spinner("Decoding and normalizing...");
    let analyzed = analyze_image(input_path);
    spinner.finish_and_clear();
    let image_info = analyzed?;

    print_image_info(&image_info);

    if let Some(kb) = per_file_budget_kb {
        let decision = preview_decision(&image_info, kb)?;
        let (w, h) = decision.output_dimensions(image_info.width, image_info.height);
        info!("\n💡 With a {} KB per-file budget:", kb);
        info!("  ➡️  Decision: {}", decision);
        info!("  📏 Output dimensions: {}x{}", w, h);
        if decision == ResizeDecision::CopyUnchanged {
            info!("  ⚠️  Output may still exceed the budget; it is already at the target pixel count");
        }
    }

    Ok(())
}
