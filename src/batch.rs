use crate::accountant::{ReductionAccountant, RunStatistics};
use crate::catalog::{build_catalog_with_names, derive_name, NameAllocator};
use crate::error::{BudgetError, Result};
use crate::estimate::estimate_all;
use crate::formats::OutputFormat;
use crate::options::ReduceOptions;
use crate::paths::{discover_images, normalize_dir_path, prepare_output_dir, validate_input_dir, ScratchDir};
use crate::planner::{apply_decision, plan};
use crate::utils::{create_progress_bar, format_file_size, format_signed_size};
use crate::{info, verbose, warn};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How a batch run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Completed(BatchReport),
    /// Nothing survived cataloging; no budget was resolved and no output
    /// written.
    NoSurvivingImages { discovered: usize, skipped: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub discovered: usize,
    pub cataloged: usize,
    /// Candidates dropped during cataloging.
    pub skipped: usize,
    /// Cataloged images whose output could not be produced.
    pub failed: usize,
    pub resized: usize,
    pub ceiling_bytes: u64,
    /// `None` only if every cataloged image failed afterwards.
    pub statistics: Option<RunStatistics>,
    pub elapsed: Duration,
}

pub fn output_path_for(output_dir: &Path, name: &str, format: OutputFormat) -> PathBuf {
    output_dir.join(format!("{}.{}", name, format.extension()))
}

/// Stems of sources that sit in `output_dir` under a name an output would
/// take. Outputs must never be written over them.
pub fn source_names_in_output(candidates: &[PathBuf], output_dir: &Path, format: OutputFormat) -> Vec<String> {
    let Ok(output_dir) = output_dir.canonicalize() else {
        return Vec::new();
    };

    candidates
        .iter()
        .filter(|path| {
            path.extension()
                .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(format.extension()))
        })
        .filter(|path| {
            path.parent()
                .and_then(|parent| parent.canonicalize().ok())
                .is_some_and(|parent| parent == output_dir)
        })
        .map(|path| derive_name(path))
        .collect()
}

/// Runs a whole batch: catalog everything, estimate everything, then resolve
/// the budget and plan and write each image.
///
/// A scratch directory left with content by an earlier run aborts before any
/// input is read or any directory is created.
pub fn reduce_batch(input: &str, output: &str, options: &ReduceOptions) -> Result<BatchOutcome> {
    let start_time = Instant::now();
    let input_dir = PathBuf::from(normalize_dir_path(input));
    let output_dir = PathBuf::from(normalize_dir_path(output));

    validate_input_dir(&input_dir)?;
    ScratchDir::preflight(&output_dir)?;

    info!("🚀 Starting batch reduction...");
    info!("📁 Input: {}", input_dir.display());
    info!("📁 Output: {}", output_dir.display());
    info!("🎯 Budget: {} as {}", options.budget, options.format);
    if let Some(bits) = options.color_bits {
        warn!("--colorbits {} has no effect and is ignored", bits);
    }

    prepare_output_dir(&output_dir)?;
    let candidates = discover_images(&input_dir, options.recursive, Some(&output_dir))?;
    info!("📊 Found {} candidate image files", candidates.len());

    let mut names = NameAllocator::new();
    for name in source_names_in_output(&candidates, &output_dir, options.format) {
        verbose!("Keeping source {} out of the output names", name);
        names.reserve(&name);
    }

    let scratch = ScratchDir::create(&output_dir)?;

    let progress = create_progress_bar(candidates.len() as u64, "cataloging");
    let catalog = build_catalog_with_names(&candidates, &scratch, names, &progress);
    progress.finish_with_message("catalog complete");

    let skipped = catalog.skipped.len();
    if skipped > 0 {
        warn!("Skipped {} file(s) that could not be decoded", skipped);
    }

    let Some(file_count) = NonZeroUsize::new(catalog.len()) else {
        scratch.remove()?;
        return Ok(BatchOutcome::NoSurvivingImages {
            discovered: candidates.len(),
            skipped,
        });
    };

    let estimated = estimate_all(catalog.images);
    let ceiling_bytes = options.budget.resolve(file_count);
    info!(
        "📏 Per-file ceiling: {} ({} bytes) across {} image(s)",
        format_file_size(ceiling_bytes),
        ceiling_bytes,
        file_count
    );

    let progress = create_progress_bar(estimated.len() as u64, "resizing");
    let mut accountant = ReductionAccountant::new();
    let mut failed = 0;
    let mut resized = 0;

    for item in &estimated {
        let image = &item.image;
        progress.set_message(image.name.clone());

        let decision = plan(item, ceiling_bytes);
        let output_path = output_path_for(&output_dir, &image.name, options.format);

        match apply_decision(image, decision, &output_path, options.format) {
            Ok(new_size) => {
                verbose!(
                    "{:?}: {} ({}), {} -> {}",
                    image.source.path,
                    decision,
                    item.ratio,
                    format_file_size(image.source.original_size),
                    format_file_size(new_size)
                );
                if decision.is_resize() {
                    resized += 1;
                }
                accountant.record(image.source.original_size, new_size);
            }
            Err(BudgetError::MissingScratchFile(path)) => {
                warn!("Scratch file {:?} is missing, skipping {:?}", path, image.source.path);
                failed += 1;
            }
            Err(e) => {
                warn!("Failed to process {:?}: {}", image.source.path, e);
                let _ = fs::remove_file(&image.scratch_path);
                failed += 1;
            }
        }
        progress.inc(1);
    }
    progress.finish_with_message("✅ Batch reduction complete");

    scratch.remove()?;

    Ok(BatchOutcome::Completed(BatchReport {
        discovered: candidates.len(),
        cataloged: estimated.len(),
        skipped,
        failed,
        resized,
        ceiling_bytes,
        statistics: accountant.finish(),
        elapsed: start_time.elapsed(),
    }))
}

pub fn print_outcome(outcome: &BatchOutcome) {
    match outcome {
        BatchOutcome::NoSurvivingImages { discovered, skipped } => {
            warn!(
                "No images could be processed: {} candidate(s) found, {} skipped. Nothing was written",
                discovered, skipped
            );
        }
        BatchOutcome::Completed(report) => print_summary(report),
    }
}

fn print_summary(report: &BatchReport) {
    info!("\n📊 Batch Reduction Summary:");
    info!("  📁 Files processed: {}", report.statistics.map_or(0, |s| s.files));
    info!("  📐 Files resized: {}", report.resized);
    if report.skipped > 0 {
        info!("  ⏭️  Skipped (undecodable): {}", report.skipped);
    }
    if report.failed > 0 {
        info!("  ⚠️  Failed files: {}", report.failed);
    }

    if let Some(stats) = report.statistics {
        info!("  📊 Total original size: {}", format_file_size(stats.total_old));
        info!("  📈 Total new size: {}", format_file_size(stats.total_new));
        info!(
            "  🎯 Total space saved: {} ({:.1}%)",
            format_signed_size(stats.total_saved),
            stats.reduction_percent
        );
        info!("  📊 Average original size: {}", format_file_size(stats.average_old.round() as u64));
        info!("  📈 Average new size: {}", format_file_size(stats.average_new.round() as u64));
        info!(
            "  🎯 Average reduction per file: {}",
            format_signed_size(stats.average_reduction.round() as i64)
        );
    }
    info!("  ⏱️  Total time: {:.2?}", report.elapsed);
}
