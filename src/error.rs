use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BudgetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),

    #[error("Invalid extension pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("Invalid budget: {0}")]
    InvalidBudget(String),

    #[error("Invalid color bits: {0}. Must be 24 or 32")]
    InvalidColorBits(u8),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Input path not found: {0}")]
    InputNotFound(PathBuf),

    #[error("Input path is not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Failed to create output directory: {0}")]
    DirectoryCreationFailed(PathBuf),

    #[error(
        "Scratch directory {0} already exists with content from a previous run. \
         Inspect and remove it before running again"
    )]
    PreexistingScratchDirectory(PathBuf),

    #[error("Scratch directory {0} still contains files and was not removed")]
    ScratchNotEmpty(PathBuf),

    #[error("Scratch file missing: {0}")]
    MissingScratchFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Why a candidate file was dropped from the batch during cataloging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The file could not be read at all.
    Unreadable(String),
    /// The file could not be decoded as an image.
    UnrecognizedImage(String),
    /// The image decoded to zero width or height.
    ZeroDimensions,
    /// The intermediate encoding came out empty.
    EmptyEncoding,
    /// The intermediate file could not be written.
    ScratchWriteFailed(String),
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Unreadable(e) => write!(f, "unreadable file ({})", e),
            SkipReason::UnrecognizedImage(e) => write!(f, "unrecognized image ({})", e),
            SkipReason::ZeroDimensions => write!(f, "image has zero width or height"),
            SkipReason::EmptyEncoding => write!(f, "intermediate encoding is empty"),
            SkipReason::ScratchWriteFailed(e) => write!(f, "could not write scratch file ({})", e),
        }
    }
}
