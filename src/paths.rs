//! Filesystem glue around a batch run: path normalization, image discovery
//! and the scratch directory lifecycle.

use crate::constants::{SCRATCH_DIR_NAME, SUPPORTED_IMAGE_EXTENSIONS};
use crate::error::{BudgetError, Result};
use crate::formats::INTERMEDIATE_FORMAT;
use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

const EXTENSION_MATCH: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Converts backslashes to forward slashes and guarantees exactly one
/// trailing separator.
///
/// ```
/// use img_budget::paths::normalize_dir_path;
///
/// assert_eq!(normalize_dir_path(r"C:\photos\2024"), "C:/photos/2024/");
/// assert_eq!(normalize_dir_path("out/"), "out/");
/// ```
pub fn normalize_dir_path(path: &str) -> String {
    let forward = path.replace('\\', "/");
    if forward.is_empty() {
        return "./".to_string();
    }

    let trimmed = forward.trim_end_matches('/');
    if trimmed.is_empty() {
        // the filesystem root itself
        return "/".to_string();
    }
    format!("{}/", trimmed)
}

pub fn validate_input_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(BudgetError::InputNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(BudgetError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

fn extension_patterns() -> Result<Vec<Pattern>> {
    SUPPORTED_IMAGE_EXTENSIONS
        .iter()
        .map(|ext| Pattern::new(&format!("*.{}", ext)).map_err(BudgetError::from))
        .collect()
}

/// True when the file name matches one of the supported extension globs.
pub fn is_image_file(path: &Path) -> bool {
    let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
        return false;
    };
    extension_patterns()
        .map(|patterns| patterns.iter().any(|p| p.matches_with(&name, EXTENSION_MATCH)))
        .unwrap_or(false)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn is_excluded_dir(entry: &DirEntry, excluded: Option<&Path>) -> bool {
    match excluded {
        Some(excluded) if entry.file_type().is_dir() => entry
            .path()
            .canonicalize()
            .map(|p| p == excluded)
            .unwrap_or(false),
        _ => false,
    }
}

/// Collects image files under `root`, sorted and deduplicated.
///
/// Only the top level is scanned unless `recursive` is set. Hidden entries and
/// the `exclude` subtree (normally the output directory) are never entered.
pub fn discover_images(root: &Path, recursive: bool, exclude: Option<&Path>) -> Result<Vec<PathBuf>> {
    let patterns = extension_patterns()?;
    let excluded = exclude.and_then(|p| p.canonicalize().ok());
    let max_depth = if recursive { usize::MAX } else { 1 };

    let walker = WalkDir::new(root).max_depth(max_depth).into_iter().filter_entry(|e| {
        e.depth() == 0 || (!is_hidden(e) && !is_excluded_dir(e, excluded.as_deref()))
    });

    let mut found = BTreeSet::new();
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        if patterns.iter().any(|p| p.matches_with(&name, EXTENSION_MATCH)) {
            found.insert(entry.into_path());
        }
    }

    Ok(found.into_iter().collect())
}

/// Creates the output directory if it does not exist yet.
pub fn prepare_output_dir(output: &Path) -> Result<()> {
    fs::create_dir_all(output).map_err(|_| BudgetError::DirectoryCreationFailed(output.to_path_buf()))
}

/// Per-run scratch area holding the intermediate copies.
///
/// No `Drop` cleanup: a scratch directory that still holds files after a
/// run stays on disk and makes [`ScratchDir::remove`] fail.
#[derive(Debug)]
pub struct ScratchDir {
    path: PathBuf,
}

impl ScratchDir {
    pub fn location(output_dir: &Path) -> PathBuf {
        output_dir.join(SCRATCH_DIR_NAME)
    }

    /// Refuses a scratch directory left behind with content by an earlier run.
    /// An existing empty directory is fine.
    pub fn preflight(output_dir: &Path) -> Result<()> {
        let path = Self::location(output_dir);
        if !path.exists() {
            return Ok(());
        }
        if !path.is_dir() || fs::read_dir(&path)?.next().is_some() {
            return Err(BudgetError::PreexistingScratchDirectory(path));
        }
        Ok(())
    }

    pub fn create(output_dir: &Path) -> Result<Self> {
        Self::preflight(output_dir)?;
        let path = Self::location(output_dir);
        fs::create_dir_all(&path).map_err(|_| BudgetError::DirectoryCreationFailed(path.clone()))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Scratch location for the intermediate copy of `name`.
    pub fn file_for(&self, name: &str) -> PathBuf {
        self.path.join(format!("{}.{}", name, INTERMEDIATE_FORMAT.extension()))
    }

    /// Removes the directory. Never removes content: if anything is left
    /// inside, this fails with [`BudgetError::ScratchNotEmpty`].
    pub fn remove(self) -> Result<()> {
        match fs::remove_dir(&self.path) {
            Ok(()) => Ok(()),
            Err(e) => {
                let has_content = fs::read_dir(&self.path)
                    .map(|mut entries| entries.next().is_some())
                    .unwrap_or(false);
                if has_content {
                    Err(BudgetError::ScratchNotEmpty(self.path))
                } else {
                    Err(BudgetError::Io(e))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_dir_path() {
        assert_eq!(normalize_dir_path("images"), "images/");
        assert_eq!(normalize_dir_path("images/"), "images/");
        assert_eq!(normalize_dir_path("images//"), "images/");
        assert_eq!(normalize_dir_path(r"a\b\c\"), "a/b/c/");
        assert_eq!(normalize_dir_path(""), "./");
        assert_eq!(normalize_dir_path("/"), "/");
    }

    #[test]
    fn test_is_image_file_case_insensitive() {
        assert!(is_image_file(Path::new("a.jpg")));
        assert!(is_image_file(Path::new("a.JPEG")));
        assert!(is_image_file(Path::new("a.PnG")));
        assert!(is_image_file(Path::new("dir/a.gif")));

        assert!(!is_image_file(Path::new("a.webp")));
        assert!(!is_image_file(Path::new("a.txt")));
        assert!(!is_image_file(Path::new("jpg")));
    }

    #[test]
    fn test_validate_input_dir() {
        let temp_dir = TempDir::new().unwrap();
        assert!(validate_input_dir(temp_dir.path()).is_ok());

        let missing = temp_dir.path().join("missing");
        assert!(matches!(validate_input_dir(&missing), Err(BudgetError::InputNotFound(_))));

        let file = temp_dir.path().join("file.jpg");
        File::create(&file).unwrap();
        assert!(matches!(validate_input_dir(&file), Err(BudgetError::NotADirectory(_))));
    }

    #[test]
    fn test_discover_images_top_level_only() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        File::create(root.join("b.JPG")).unwrap();
        File::create(root.join("a.png")).unwrap();
        File::create(root.join("notes.txt")).unwrap();
        File::create(root.join(".hidden.png")).unwrap();
        fs::create_dir(root.join("sub")).unwrap();
        File::create(root.join("sub").join("c.gif")).unwrap();

        let files = discover_images(root, false, None).unwrap();
        assert_eq!(files, vec![root.join("a.png"), root.join("b.JPG")]);
    }

    #[test]
    fn test_discover_images_recursive_skips_excluded_subtree() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let output = root.join("out");
        fs::create_dir_all(root.join("sub").join("deeper")).unwrap();
        fs::create_dir(&output).unwrap();
        File::create(root.join("a.jpeg")).unwrap();
        File::create(root.join("sub").join("deeper").join("b.gif")).unwrap();
        File::create(output.join("a.png")).unwrap();

        let files = discover_images(root, true, Some(&output)).unwrap();
        assert_eq!(
            files,
            vec![root.join("a.jpeg"), root.join("sub").join("deeper").join("b.gif")]
        );
    }

    #[test]
    fn test_scratch_preflight_rejects_leftovers() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path();

        assert!(ScratchDir::preflight(output).is_ok());

        let location = ScratchDir::location(output);
        fs::create_dir(&location).unwrap();
        assert!(ScratchDir::preflight(output).is_ok(), "empty scratch dir is reusable");

        File::create(location.join("leftover.png")).unwrap();
        assert!(matches!(
            ScratchDir::preflight(output),
            Err(BudgetError::PreexistingScratchDirectory(_))
        ));
        assert!(matches!(
            ScratchDir::create(output),
            Err(BudgetError::PreexistingScratchDirectory(_))
        ));
    }

    #[test]
    fn test_scratch_remove_fails_loudly_with_content() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(temp_dir.path()).unwrap();
        let leftover = scratch.file_for("photo");
        assert_eq!(leftover.file_name().unwrap(), "photo.png");
        File::create(&leftover).unwrap();

        let location = scratch.path().to_path_buf();
        assert!(matches!(scratch.remove(), Err(BudgetError::ScratchNotEmpty(_))));
        assert!(leftover.exists());
        assert!(location.exists());
    }

    #[test]
    fn test_scratch_remove_empty() {
        let temp_dir = TempDir::new().unwrap();
        let scratch = ScratchDir::create(temp_dir.path()).unwrap();
        let location = scratch.path().to_path_buf();
        scratch.remove().unwrap();
        assert!(!location.exists());
    }
}
