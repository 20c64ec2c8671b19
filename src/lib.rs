//! # NOI Analyzer
//!
//! A library for turning loosely structured spreadsheet exports of
//! real-estate financial statements into canonical metric records, and for
//! comparing those records across reporting periods.
//!
//! ## Core Concepts
//!
//! - **Structure detection**: spreadsheet exports carry decorative unnamed
//!   columns and free-text noise; the detector strips artifacts and decides
//!   whether a table is a genuine category/value statement at all.
//! - **Classification**: document type (P&L, rent roll, operating
//!   statement, ...) and period role (current, prior month, budget, prior
//!   year) are derived from filename tokens and content keywords.
//! - **Normalized records**: every period reduces to eight canonical
//!   metrics (GPR through NOI); missing or malformed values become `0.0`
//!   rather than failures, because statements are user-authored.
//! - **Comparison**: the engine computes per-metric deltas and percent
//!   changes for each supplied period role and reconciles reported EGI/NOI
//!   totals against their components, warning on mismatch.
//!
//! ## Example
//!
//! ```rust,ignore
//! use noi_analyzer::*;
//!
//! let current = SourceDocument {
//!     filename: "Operating_Statement_2024-05.xlsx".to_string(),
//!     text_content: None,
//!     table: current_table, // from your spreadsheet reader
//!     period_override: None,
//! };
//! let budget = SourceDocument {
//!     filename: "Budget_2024-05.xlsx".to_string(),
//!     text_content: None,
//!     table: budget_table,
//!     period_override: None,
//! };
//!
//! let comparison = analyze_documents(&[current, budget])?;
//! println!("{}", comparison.to_markdown());
//! ```

pub mod classify;
pub mod comparison;
pub mod diagnostics;
pub mod error;
pub mod extract;
pub mod ingestion;
pub mod report;
pub mod schema;
pub mod table;
pub mod utils;

pub use classify::{
    detect_document_properties, standardize_document_kind, standardize_period_kind,
    DocumentClassifier,
};
pub use comparison::{
    calculate_noi_comparisons, validate_comparison_results, ComparisonEngine,
    RECONCILIATION_TOLERANCE,
};
pub use diagnostics::{Diagnostics, LogDiagnostics, MemoryDiagnostics};
pub use error::{NoiAnalyzerError, Result};
pub use extract::extract_metrics;
pub use ingestion::{consolidate_documents, Consolidator, RecordPayload, SourceDocument};
pub use schema::{
    ConsolidatedData, DocumentKind, DocumentProperties, Metric, MetricDelta, MetricsRecord,
    NoiComparison, PeriodComparison, PeriodKind,
};
pub use table::{
    detect_artifact_columns, drop_artifact_columns, is_financial_statement, Cell, RawTable,
};
pub use utils::{parse_numeric_or_zero, parse_numeric_str, percent_change};

use log::{debug, info};

/// Full pipeline over a set of uploaded documents: classify, filter,
/// extract, consolidate, compare, reconcile.
pub struct Analyzer<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Analyzer<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    pub fn analyze(&self, documents: &[SourceDocument]) -> Result<NoiComparison> {
        info!("Analyzing {} uploaded document(s)", documents.len());

        let consolidated = Consolidator::new(self.diagnostics).consolidate(documents);
        debug!(
            "Consolidated periods: current={} prior_month={} budget={} prior_year={}",
            consolidated.current_month.is_some(),
            consolidated.prior_month.is_some(),
            consolidated.budget.is_some(),
            consolidated.prior_year.is_some()
        );

        let engine = ComparisonEngine::new(self.diagnostics);
        let comparison = engine.compare(&consolidated)?;
        engine.validate(&comparison);

        Ok(comparison)
    }
}

/// Runs the full pipeline with warnings routed to the `log` crate.
pub fn analyze_documents(documents: &[SourceDocument]) -> Result<NoiComparison> {
    Analyzer::new(&LogDiagnostics).analyze(documents)
}
