//! Before/after size bookkeeping for one batch run.

use crate::utils::reduction_percent;

/// Accumulates sizes as images are finalized. One accountant per run.
#[derive(Debug, Default)]
pub struct ReductionAccountant {
    files: usize,
    total_old: u64,
    total_new: u64,
    total_reduction: i64,
}

/// Final figures for a run with at least one recorded file.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunStatistics {
    pub files: usize,
    pub total_old: u64,
    pub total_new: u64,
    /// Negative when the outputs are larger than the sources.
    pub total_saved: i64,
    pub average_old: f64,
    pub average_new: f64,
    pub average_reduction: f64,
    pub reduction_percent: f64,
}

impl ReductionAccountant {
    pub fn new() -> Self {
        Self::default()
    }

    /// `old_size` is the original source file, not the intermediate copy.
    pub fn record(&mut self, old_size: u64, new_size: u64) {
        self.files += 1;
        self.total_old = self.total_old.saturating_add(old_size);
        self.total_new = self.total_new.saturating_add(new_size);
        let delta = i128::from(old_size) - i128::from(new_size);
        let delta = i64::try_from(delta).unwrap_or(if delta < 0 { i64::MIN } else { i64::MAX });
        self.total_reduction = self.total_reduction.saturating_add(delta);
    }

    pub fn files(&self) -> usize {
        self.files
    }

    /// `None` when nothing was recorded, so no average divides by zero.
    pub fn finish(self) -> Option<RunStatistics> {
        if self.files == 0 {
            return None;
        }

        let n = self.files as f64;
        Some(RunStatistics {
            files: self.files,
            total_old: self.total_old,
            total_new: self.total_new,
            total_saved: self.total_reduction,
            average_old: self.total_old as f64 / n,
            average_new: self.total_new as f64 / n,
            average_reduction: self.total_reduction as f64 / n,
            reduction_percent: reduction_percent(self.total_old, self.total_new),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_accountant_has_no_statistics() {
        let accountant = ReductionAccountant::new();
        assert_eq!(accountant.files(), 0);
        assert!(accountant.finish().is_none());
    }

    #[test]
    fn test_accumulates_totals_and_averages() {
        let mut accountant = ReductionAccountant::new();
        accountant.record(1_000, 400);
        accountant.record(3_000, 1_600);

        let stats = accountant.finish().unwrap();
        assert_eq!(stats.files, 2);
        assert_eq!(stats.total_old, 4_000);
        assert_eq!(stats.total_new, 2_000);
        assert_eq!(stats.total_saved, 2_000);
        assert_eq!(stats.average_old, 2_000.0);
        assert_eq!(stats.average_new, 1_000.0);
        assert_eq!(stats.average_reduction, 1_000.0);
        assert_eq!(stats.reduction_percent, 50.0);
    }

    #[test]
    fn test_growth_is_negative_reduction() {
        // a small JPEG re-encoded losslessly usually grows
        let mut accountant = ReductionAccountant::new();
        accountant.record(500, 2_000);
        accountant.record(1_000, 1_000);

        let stats = accountant.finish().unwrap();
        assert_eq!(stats.total_saved, -1_500);
        assert_eq!(stats.average_reduction, -750.0);
        assert!(stats.reduction_percent < 0.0);
    }
}
