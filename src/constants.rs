/// Default total batch budget in KB (50 MB).
pub const DEFAULT_TOTAL_BUDGET_KB: u64 = 50_000;
/// Default per-file budget in KB; 0 means unset.
pub const DEFAULT_PER_FILE_BUDGET_KB: u64 = 0;
/// Budgets are given in decimal kilobytes.
pub const BYTES_PER_KB: u64 = 1000;

/// Extensions picked up by discovery, matched case-insensitively.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif"];

/// Name of the scratch subdirectory created inside the output directory.
pub const SCRATCH_DIR_NAME: &str = ".img-budget-scratch";

pub const DEFAULT_OUTPUT_FORMAT: &str = "png";

/// Accepted (and ignored) values of the legacy color depth flag.
pub const LEGACY_COLOR_BITS: &[u8] = &[24, 32];

pub const PROGRESS_BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
