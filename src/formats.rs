/// Output format handling and encoding
///
/// Every surviving image is first normalized into the canonical intermediate
/// format (lossless PNG) and then written out in the selected output format.
use crate::error::{BudgetError, Result};
use image::{DynamicImage, ImageFormat};
use std::fmt;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::str::FromStr;

/// Format used for the scratch copies that drive compression estimates.
pub const INTERMEDIATE_FORMAT: OutputFormat = OutputFormat::Png;

/// Supported output image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// PNG, lossless; same as the intermediate format
    #[default]
    Png,
    /// JPEG at the encoder's default quality, alpha dropped
    Jpeg,
    /// WebP, lossless
    WebP,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
            OutputFormat::WebP => "webp",
        }
    }

    pub fn to_image_format(&self) -> ImageFormat {
        match self {
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::WebP => ImageFormat::WebP,
        }
    }

    /// True when an unchanged image can be emitted by copying its scratch file.
    pub fn is_intermediate(&self) -> bool {
        *self == INTERMEDIATE_FORMAT
    }

    pub fn format_names() -> Vec<&'static str> {
        vec!["png", "jpeg", "webp"]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Png => "PNG",
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::WebP => "WebP",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for OutputFormat {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "png" => Ok(OutputFormat::Png),
            "jpeg" | "jpg" => Ok(OutputFormat::Jpeg),
            "webp" => Ok(OutputFormat::WebP),
            _ => Err(BudgetError::UnsupportedFormat(format!(
                "{} (supported: {})",
                s,
                OutputFormat::format_names().join(", ")
            ))),
        }
    }
}

/// Converts the pixel layout to one the target encoder accepts.
fn prepare_for_encoder(img: &DynamicImage, format: OutputFormat) -> Option<DynamicImage> {
    use image::ColorType;

    match format {
        OutputFormat::Jpeg => match img.color() {
            ColorType::L8 | ColorType::Rgb8 => None,
            ColorType::L16 | ColorType::La8 | ColorType::La16 => {
                Some(DynamicImage::ImageLuma8(img.to_luma8()))
            }
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        OutputFormat::WebP => match img.color() {
            ColorType::Rgb8 | ColorType::Rgba8 => None,
            c if c.has_alpha() => Some(DynamicImage::ImageRgba8(img.to_rgba8())),
            _ => Some(DynamicImage::ImageRgb8(img.to_rgb8())),
        },
        OutputFormat::Png => match img.color() {
            ColorType::Rgb32F => Some(DynamicImage::ImageRgb16(img.to_rgb16())),
            ColorType::Rgba32F => Some(DynamicImage::ImageRgba16(img.to_rgba16())),
            _ => None,
        },
    }
}

/// Encodes an image into memory.
pub fn encode_image(img: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
    let converted = prepare_for_encoder(img, format);
    let source = converted.as_ref().unwrap_or(img);

    let mut buffer = Vec::new();
    source.write_to(&mut Cursor::new(&mut buffer), format.to_image_format())?;
    Ok(buffer)
}

/// Encodes an image and writes it to `output`, returning the number of bytes
/// written.
pub fn save_image(img: &DynamicImage, output: &Path, format: OutputFormat) -> Result<u64> {
    let bytes = encode_image(img, format)?;
    fs::write(output, &bytes)?;
    Ok(bytes.len() as u64)
}
