#![allow(dead_code)]

use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use img_budget::formats::{encode_image, OutputFormat};
use img_budget::{plan_resize, CompressionRatio, ResizeDecision};
use std::fs;
use std::path::{Path, PathBuf};

/// Deterministic high-entropy pixels, so encoders cannot squeeze them much.
pub fn noise_image(width: u32, height: u32, seed: u32) -> DynamicImage {
    let mut state = seed.max(1);
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };
    let img = RgbImage::from_fn(width, height, |_, _| {
        let v = next();
        Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
    });
    DynamicImage::ImageRgb8(img)
}

pub fn write_noise_image(dir: &Path, name: &str, width: u32, height: u32, format: ImageFormat) -> PathBuf {
    let path = dir.join(name);
    noise_image(width, height, width ^ (height << 12))
        .save_with_format(&path, format)
        .unwrap();
    path
}

pub fn write_corrupt_file(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"this is not an image").unwrap();
    path
}

pub fn dimensions(path: &Path) -> (u32, u32) {
    image::open(path).unwrap().dimensions()
}

/// The decision `reduce` should take for `path` under `ceiling_bytes`,
/// computed the way the catalog does: decode, encode as PNG, measure.
pub fn expected_decision(path: &Path, ceiling_bytes: u64) -> ResizeDecision {
    let img = image::open(path).unwrap();
    let (width, height) = img.dimensions();
    let normalized = encode_image(&img, OutputFormat::Png).unwrap().len() as u64;
    let ratio = CompressionRatio::new(normalized, u64::from(width) * u64::from(height));
    plan_resize(width, height, normalized, ratio, ceiling_bytes)
}

pub fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}
