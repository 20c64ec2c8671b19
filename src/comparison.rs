//! NOI comparison and reconciliation over consolidated period records.

use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::error::{NoiAnalyzerError, Result};
use crate::schema::{ConsolidatedData, NoiComparison, PeriodComparison};

/// Absolute tolerance for the EGI/NOI reconciliation check.
pub const RECONCILIATION_TOLERANCE: f64 = 0.01;

pub struct ComparisonEngine<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> ComparisonEngine<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Computes every available comparison bundle against the current
    /// month.
    ///
    /// A missing current month is a user-input problem surfaced as
    /// [`NoiAnalyzerError::MissingCurrentPeriod`], never a panic. Optional
    /// periods that were not supplied produce no bundle at all.
    pub fn compare(&self, data: &ConsolidatedData) -> Result<NoiComparison> {
        let current = data
            .current_month
            .as_ref()
            .ok_or(NoiAnalyzerError::MissingCurrentPeriod)?;

        let mut comparison = NoiComparison {
            current: current.clone(),
            month_vs_prior: None,
            actual_vs_budget: None,
            year_vs_year: None,
        };

        if let Some(prior) = &data.prior_month {
            comparison.month_vs_prior = Some(PeriodComparison::between(current, prior));
        }
        if let Some(budget) = &data.budget {
            comparison.actual_vs_budget = Some(PeriodComparison::between(current, budget));
        }
        if let Some(prior_year) = &data.prior_year {
            comparison.year_vs_year = Some(PeriodComparison::between(current, prior_year));
        }

        Ok(comparison)
    }

    /// Recomputes EGI and NOI from the current period's components and
    /// warns when the reported totals disagree beyond the tolerance.
    ///
    /// The reported totals stay authoritative for downstream output; this
    /// check only surfaces reconciliation problems for operator
    /// visibility.
    pub fn validate(&self, comparison: &NoiComparison) {
        let current = &comparison.current;

        let expected_egi = current.computed_egi();
        if (expected_egi - current.egi).abs() > RECONCILIATION_TOLERANCE {
            self.diagnostics.warning(&format!(
                "EGI reconciliation mismatch: reported {:.2}, computed {:.2} from components",
                current.egi, expected_egi
            ));
        }

        let expected_noi = expected_egi - current.opex;
        if (expected_noi - current.noi).abs() > RECONCILIATION_TOLERANCE {
            self.diagnostics.warning(&format!(
                "NOI reconciliation mismatch: reported {:.2}, computed {:.2} from components",
                current.noi, expected_noi
            ));
        }
    }
}

/// Convenience wrappers over the default log sink.
pub fn calculate_noi_comparisons(data: &ConsolidatedData) -> Result<NoiComparison> {
    ComparisonEngine::new(&LogDiagnostics).compare(data)
}

pub fn validate_comparison_results(comparison: &NoiComparison) {
    ComparisonEngine::new(&LogDiagnostics).validate(comparison)
}
