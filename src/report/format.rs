//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the selection/classification code stays clean and testable
//! - output changes are localized

use crate::domain::FittedCurve;
use crate::fit::selection::CandidateScore;
use crate::report::ClassificationSummary;

/// Format the selection table: one row per training curve.
///
/// `rankings[i]` holds the ranked candidates for `fitted[i]`; the second entry,
/// when present, is shown as the runner-up.
pub fn format_selection(fitted: &[FittedCurve], rankings: &[Vec<CandidateScore>]) -> String {
    let mut out = String::new();

    out.push_str("=== ideal - best-fit selection ===\n");
    out.push_str(
        format!(
            "{:<10} {:<10} {:>14} {:>10} {:>8} {:>10} {:<20}\n",
            "training", "ideal", "sq_error", "max_dev", "factor", "tolerance", "runner-up"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<10} {:-<10} {:-<14} {:-<10} {:-<8} {:-<10} {:-<20}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for (i, fit) in fitted.iter().enumerate() {
        let runner_up = rankings
            .get(i)
            .and_then(|r| r.get(1))
            .map(|s| format!("{} ({:.4})", truncate(&s.name, 10), s.loss))
            .unwrap_or_default();

        out.push_str(
            format!(
                "{:<10} {:<10} {:>14.4} {:>10.4} {:>8.4} {:>10.4} {:<20}\n",
                truncate(fit.training().name(), 10),
                truncate(fit.name(), 10),
                fit.error(),
                fit.max_deviation(),
                fit.tolerance_factor(),
                fit.tolerance(),
                runner_up,
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format classification tallies.
pub fn format_classification(summary: &ClassificationSummary) -> String {
    let mut out = String::new();

    out.push_str("=== ideal - test point classification ===\n");
    out.push_str(&format!(
        "Points: n={} | matched={} | unmatched={}\n",
        summary.total,
        summary.matched,
        summary.unmatched()
    ));
    for (training, ideal, count) in &summary.per_curve {
        out.push_str(&format!("- {ideal} (for {training}): {count}\n"));
    }

    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
