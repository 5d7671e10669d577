/// Helpers shared by the batch summary and the `info` command.
use crate::constants::{PROGRESS_BAR_TEMPLATE, PROGRESS_SPINNER_TEMPLATE};
use crate::logger;
use indicatif::{ProgressBar, ProgressStyle};

/// Create a progress bar for `len` steps, hidden in quiet mode.
pub fn create_progress_bar(len: u64, message: &str) -> ProgressBar {
    if logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new(len);
    let style = ProgressStyle::default_bar()
        .template(PROGRESS_BAR_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("#>-");
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Create a spinner with consistent styling, hidden in quiet mode.
pub fn create_progress_spinner(message: &str) -> ProgressBar {
    if logger::is_quiet() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template(PROGRESS_SPINNER_TEMPLATE)
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(style);
    pb.set_message(message.to_string());
    pb
}

/// Format a byte count with decimal units, matching the KB used for budgets.
///
/// ```
/// use img_budget::utils::format_file_size;
///
/// assert_eq!(format_file_size(1500), "1.5 KB");
/// ```
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    const THRESHOLD: f64 = 1000.0;

    if bytes == 0 {
        return "0 B".to_string();
    }

    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= THRESHOLD && unit_index < UNITS.len() - 1 {
        size /= THRESHOLD;
        unit_index += 1;
    }

    if unit_index == 0 {
        format!("{} {}", bytes, UNITS[unit_index])
    } else {
        format!("{:.1} {}", size, UNITS[unit_index])
    }
}

/// Format a signed byte delta, e.g. a reduction that may be negative.
pub fn format_signed_size(bytes: i64) -> String {
    if bytes < 0 {
        format!("-{}", format_file_size(bytes.unsigned_abs()))
    } else {
        format_file_size(bytes as u64)
    }
}

/// Reduction as a percentage of the original size. Positive means smaller.
pub fn reduction_percent(original_size: u64, new_size: u64) -> f64 {
    if original_size == 0 {
        return 0.0;
    }
    ((original_size as f64 - new_size as f64) / original_size as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(512), "512 B");
        assert_eq!(format_file_size(1000), "1.0 KB");
        assert_eq!(format_file_size(1500), "1.5 KB");
        assert_eq!(format_file_size(5_000_000), "5.0 MB");
        assert_eq!(format_file_size(2_000_000_000), "2.0 GB");
    }

    #[test]
    fn test_format_signed_size() {
        assert_eq!(format_signed_size(-1500), "-1.5 KB");
        assert_eq!(format_signed_size(999), "999 B");
        assert_eq!(format_signed_size(0), "0 B");
    }

    #[test]
    fn test_reduction_percent() {
        assert_eq!(reduction_percent(1000, 800), 20.0);
        assert_eq!(reduction_percent(1000, 1200), -20.0);
        assert_eq!(reduction_percent(1000, 1000), 0.0);
        assert_eq!(reduction_percent(0, 500), 0.0);
    }
}
