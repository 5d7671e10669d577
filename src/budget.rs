//! Turns the user's budget parameters into one per-file byte ceiling.

use crate::constants::{BYTES_PER_KB, DEFAULT_PER_FILE_BUDGET_KB, DEFAULT_TOTAL_BUDGET_KB};
use crate::error::{BudgetError, Result};
use std::fmt;
use std::num::NonZeroUsize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetSpec {
    pub total_budget_kb: u64,
    /// 0 means unset.
    pub per_file_budget_kb: u64,
}

impl Default for BudgetSpec {
    fn default() -> Self {
        Self {
            total_budget_kb: DEFAULT_TOTAL_BUDGET_KB,
            per_file_budget_kb: DEFAULT_PER_FILE_BUDGET_KB,
        }
    }
}

impl BudgetSpec {
    pub fn new(total_budget_kb: u64, per_file_budget_kb: u64) -> Result<Self> {
        if per_file_budget_kb == 0 && total_budget_kb == 0 {
            return Err(BudgetError::InvalidBudget(
                "total budget must be greater than 0 KB when no per-file budget is set".to_string(),
            ));
        }

        Ok(Self {
            total_budget_kb,
            per_file_budget_kb,
        })
    }

    pub fn has_per_file_budget(&self) -> bool {
        self.per_file_budget_kb != 0
    }

    /// Effective per-file ceiling in bytes for a batch of `file_count` images.
    ///
    /// A per-file budget wins outright. Otherwise the total is split evenly;
    /// the result is the floor of `total / N * 1000`.
    ///
    /// ```
    /// use img_budget::budget::BudgetSpec;
    /// use std::num::NonZeroUsize;
    ///
    /// let spec = BudgetSpec::new(50_000, 0).unwrap();
    /// assert_eq!(spec.resolve(NonZeroUsize::new(10).unwrap()), 5_000_000);
    /// ```
    pub fn resolve(&self, file_count: NonZeroUsize) -> u64 {
        if self.has_per_file_budget() {
            return self.per_file_budget_kb.saturating_mul(BYTES_PER_KB);
        }

        let files = u64::try_from(file_count.get()).unwrap_or(u64::MAX);
        self.total_budget_kb.saturating_mul(BYTES_PER_KB) / files
    }
}

impl fmt::Display for BudgetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.has_per_file_budget() {
            write!(f, "{} KB per file", self.per_file_budget_kb)
        } else {
            write!(f, "{} KB total", self.total_budget_kb)
        }
    }
}
