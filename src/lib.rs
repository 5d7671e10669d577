pub mod logger;

pub mod accountant;
pub mod batch;
pub mod budget;
pub mod catalog;
pub mod cli;
pub mod constants;
pub mod error;
pub mod estimate;
pub mod formats;
pub mod info;
pub mod options;
pub mod paths;
pub mod planner;
pub mod utils;

pub use accountant::{ReductionAccountant, RunStatistics};
pub use batch::{reduce_batch, BatchOutcome, BatchReport};
pub use budget::BudgetSpec;
pub use catalog::{build_catalog, catalog_image, Catalog, CatalogOutcome, NormalizedImage, SourceImage};
pub use error::{BudgetError, Result, SkipReason};
pub use estimate::{estimate_all, CompressionRatio, EstimatedImage};
pub use formats::OutputFormat;
pub use options::ReduceOptions;
pub use paths::{discover_images, normalize_dir_path, ScratchDir};
pub use planner::{apply_decision, plan_resize, ResizeDecision};
