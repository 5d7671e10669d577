use crate::budget::BudgetSpec;
use crate::constants::{DEFAULT_PER_FILE_BUDGET_KB, DEFAULT_TOTAL_BUDGET_KB, LEGACY_COLOR_BITS};
use crate::error::{BudgetError, Result};
use crate::formats::OutputFormat;
use std::str::FromStr;

/// Validated settings for one `reduce` run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceOptions {
    pub budget: BudgetSpec,
    pub recursive: bool,
    pub format: OutputFormat,
    /// Legacy color depth flag. Validated, never used.
    pub color_bits: Option<u8>,
}

impl Default for ReduceOptions {
    fn default() -> Self {
        Self {
            budget: BudgetSpec::default(),
            recursive: false,
            format: OutputFormat::default(),
            color_bits: None,
        }
    }
}

impl ReduceOptions {
    pub fn new(
        total_budget_kb: Option<u64>,
        per_file_budget_kb: Option<u64>,
        recursive: bool,
        format: Option<String>,
        color_bits: Option<u8>,
    ) -> Result<Self> {
        let budget = BudgetSpec::new(
            total_budget_kb.unwrap_or(DEFAULT_TOTAL_BUDGET_KB),
            per_file_budget_kb.unwrap_or(DEFAULT_PER_FILE_BUDGET_KB),
        )?;

        let format = match format {
            Some(fmt) => OutputFormat::from_str(&fmt)?,
            None => OutputFormat::default(),
        };

        if let Some(bits) = color_bits {
            if !LEGACY_COLOR_BITS.contains(&bits) {
                return Err(BudgetError::InvalidColorBits(bits));
            }
        }

        Ok(Self {
            budget,
            recursive,
            format,
            color_bits,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reduce_options_defaults() {
        let options = ReduceOptions::new(None, None, false, None, None).unwrap();
        assert_eq!(options, ReduceOptions::default());
        assert_eq!(options.budget.total_budget_kb, 50_000);
        assert_eq!(options.budget.per_file_budget_kb, 0);
        assert_eq!(options.format, OutputFormat::Png);
    }

    #[test]
    fn test_reduce_options_creation() {
        let options =
            ReduceOptions::new(Some(5_000), Some(200), true, Some("webp".to_string()), Some(24)).unwrap();
        assert_eq!(options.budget, BudgetSpec::new(5_000, 200).unwrap());
        assert!(options.recursive);
        assert_eq!(options.format, OutputFormat::WebP);
        assert_eq!(options.color_bits, Some(24));
    }

    #[test]
    fn test_reduce_options_invalid_values() {
        assert!(matches!(
            ReduceOptions::new(Some(0), None, false, None, None),
            Err(BudgetError::InvalidBudget(_))
        ));
        assert!(matches!(
            ReduceOptions::new(None, None, false, Some("tiff".to_string()), None),
            Err(BudgetError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            ReduceOptions::new(None, None, false, None, Some(16)),
            Err(BudgetError::InvalidColorBits(16))
        ));
    }

    #[test]
    fn test_zero_total_allowed_with_per_file_budget() {
        let options = ReduceOptions::new(Some(0), Some(100), false, None, None).unwrap();
        assert!(options.budget.has_per_file_budget());
    }
}
