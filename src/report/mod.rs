//! Reporting utilities: classification tallies and formatted terminal output.

pub mod format;

pub use format::*;

use crate::domain::{ClassificationResult, FittedCurve};

/// How many test points landed on each fitted curve.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationSummary {
    pub total: usize,
    pub matched: usize,
    /// `(training name, ideal name, count)` in fitted-curve order.
    pub per_curve: Vec<(String, String, usize)>,
}

impl ClassificationSummary {
    pub fn unmatched(&self) -> usize {
        self.total - self.matched
    }
}

/// Tally classification results per fitted curve.
pub fn summarize_classification(
    results: &[ClassificationResult<'_>],
    fitted: &[FittedCurve],
) -> ClassificationSummary {
    let per_curve = fitted
        .iter()
        .map(|f| {
            let count = results
                .iter()
                .filter(|r| r.matched_curve().is_some_and(|m| std::ptr::eq(m, f)))
                .count();
            (f.training().name().to_string(), f.name().to_string(), count)
        })
        .collect();

    ClassificationSummary {
        total: results.len(),
        matched: results.iter().filter(|r| r.is_match()).count(),
        per_curve,
    }
}
