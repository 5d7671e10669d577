//! Image catalog: decodes every candidate once, writes its intermediate copy
//! into the scratch directory and records what the later phases need.

use crate::error::SkipReason;
use crate::formats::{save_image, INTERMEDIATE_FORMAT};
use crate::paths::ScratchDir;
use crate::verbose;
use image::{DynamicImage, GenericImageView, ImageReader};
use indicatif::ProgressBar;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A discovered file that decoded successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    /// Size of the original file on disk, in bytes.
    pub original_size: u64,
}

/// The intermediate copy of a [`SourceImage`], living in the scratch directory
/// until the resize phase consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedImage {
    pub source: SourceImage,
    /// Output name: the source basename without extension, made unique.
    pub name: String,
    pub scratch_path: PathBuf,
    pub normalized_size: u64,
}

impl NormalizedImage {
    pub fn width(&self) -> u32 {
        self.source.width
    }

    pub fn height(&self) -> u32 {
        self.source.height
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.source.width) * u64::from(self.source.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogOutcome {
    Cataloged(NormalizedImage),
    Skipped { path: PathBuf, reason: SkipReason },
}

/// Result of cataloging a whole batch.
#[derive(Debug, Default)]
pub struct Catalog {
    pub images: Vec<NormalizedImage>,
    pub skipped: Vec<(PathBuf, SkipReason)>,
}

impl Catalog {
    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}

/// Hands out output names that are unique within one run, ignoring case so
/// that `Photo` and `photo` cannot collide on case-insensitive filesystems.
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `name` as taken without handing it out, e.g. the stem of a
    /// source file that an output of the same name would replace.
    pub fn reserve(&mut self, name: &str) {
        self.used.insert(name.to_lowercase());
    }

    pub fn allocate(&mut self, stem: &str) -> String {
        if self.used.insert(stem.to_lowercase()) {
            return stem.to_string();
        }

        let mut suffix = 1usize;
        loop {
            let candidate = format!("{}-{}", stem, suffix);
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            suffix += 1;
        }
    }
}

/// Basename of `path` with its extension stripped.
pub fn derive_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string())
}

fn decode(path: &Path) -> Result<DynamicImage, SkipReason> {
    let reader = ImageReader::open(path)
        .and_then(|r| r.with_guessed_format())
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?;
    reader
        .decode()
        .map_err(|e| SkipReason::UnrecognizedImage(e.to_string()))
}

fn normalize(
    path: &Path,
    scratch: &ScratchDir,
    names: &mut NameAllocator,
) -> Result<NormalizedImage, SkipReason> {
    let original_size = fs::metadata(path)
        .map_err(|e| SkipReason::Unreadable(e.to_string()))?
        .len();

    let img = decode(path)?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(SkipReason::ZeroDimensions);
    }

    let name = names.allocate(&derive_name(path));
    let scratch_path = scratch.file_for(&name);
    let written = save_image(&img, &scratch_path, INTERMEDIATE_FORMAT);
    drop(img);

    let normalized_size = match written {
        Ok(size) => size,
        Err(e) => {
            let _ = fs::remove_file(&scratch_path);
            return Err(SkipReason::ScratchWriteFailed(e.to_string()));
        }
    };
    if normalized_size == 0 {
        let _ = fs::remove_file(&scratch_path);
        return Err(SkipReason::EmptyEncoding);
    }

    Ok(NormalizedImage {
        source: SourceImage {
            path: path.to_path_buf(),
            width,
            height,
            original_size,
        },
        name,
        scratch_path,
        normalized_size,
    })
}

/// Catalogs one candidate. Failures never propagate: they come back as
/// [`CatalogOutcome::Skipped`] and leave nothing behind in the scratch
/// directory.
pub fn catalog_image(path: &Path, scratch: &ScratchDir, names: &mut NameAllocator) -> CatalogOutcome {
    match normalize(path, scratch, names) {
        Ok(image) => CatalogOutcome::Cataloged(image),
        Err(reason) => CatalogOutcome::Skipped {
            path: path.to_path_buf(),
            reason,
        },
    }
}

/// Catalogs every candidate in order, one image in memory at a time.
pub fn build_catalog(paths: &[PathBuf], scratch: &ScratchDir, progress: &ProgressBar) -> Catalog {
    build_catalog_with_names(paths, scratch, NameAllocator::new(), progress)
}

/// Like [`build_catalog`], but output names are drawn from `names`, which may
/// already hold reserved entries.
pub fn build_catalog_with_names(
    paths: &[PathBuf],
    scratch: &ScratchDir,
    mut names: NameAllocator,
    progress: &ProgressBar,
) -> Catalog {
    let mut catalog = Catalog::default();

    for path in paths {
        progress.set_message(derive_name(path));
        match catalog_image(path, scratch, &mut names) {
            CatalogOutcome::Cataloged(image) => {
                verbose!(
                    "Cataloged {:?}: {}x{}, {} bytes as {}",
                    path,
                    image.width(),
                    image.height(),
                    image.normalized_size,
                    INTERMEDIATE_FORMAT
                );
                catalog.images.push(image);
            }
            CatalogOutcome::Skipped { path, reason } => {
                verbose!("Skipped {:?}: {}", path, reason);
                catalog.skipped.push((path, reason));
            }
        }
        progress.inc(1);
    }

    catalog
}
