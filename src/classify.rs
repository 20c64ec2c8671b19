//! Document type, period role, and reporting period detection.
//!
//! All matching is case-insensitive substring lookup against fixed synonym
//! tables, iterated in a pinned order so overlapping synonyms resolve
//! deterministically. Unrecognized document types pass through verbatim;
//! unrecognized period types default to the current period, since most
//! single-document uploads describe the month being analyzed.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::schema::{DocumentKind, DocumentProperties, PeriodKind};
use crate::utils::last_day_of_month;

/// Synonyms per document kind, in tie-break order: the first kind whose
/// synonym appears in the label wins.
const DOCUMENT_SYNONYMS: [(DocumentKind, &[&str]); 6] = [
    (
        DocumentKind::ProfitLoss,
        &[
            "profit_loss",
            "profit and loss",
            "profit & loss",
            "income statement",
            "p&l",
            "pnl",
        ],
    ),
    (DocumentKind::BalanceSheet, &["balance_sheet", "balance sheet"]),
    (DocumentKind::RentRoll, &["rent_roll", "rent roll", "rentroll"]),
    (
        DocumentKind::OperatingStatement,
        &["operating_statement", "operating statement", "op statement"],
    ),
    (
        DocumentKind::Budget,
        &["budget", "proforma", "pro forma", "forecast"],
    ),
    (
        DocumentKind::Trailing12,
        &["trailing_12", "trailing 12", "trailing twelve", "t12", "t-12", "ttm"],
    ),
];

/// Synonyms per period role, in tie-break order.
const PERIOD_SYNONYMS: [(PeriodKind, &[&str]); 4] = [
    (PeriodKind::Current, &["current", "actual", "this month", "mtd"]),
    (
        PeriodKind::PriorMonth,
        &["prior_month", "prior month", "previous month", "last month"],
    ),
    (PeriodKind::Budget, &["budget", "proforma", "pro forma", "forecast"]),
    (
        PeriodKind::PriorYear,
        &["prior_year", "prior year", "previous year", "last year"],
    ),
];

/// Content keywords per document kind, used when the filename names no
/// type. Scanned against the first text block only, in the same tie-break
/// order as the filename synonyms.
const CONTENT_KEYWORDS: [(DocumentKind, &[&str]); 6] = [
    (
        DocumentKind::ProfitLoss,
        &["profit and loss", "income statement", "net income"],
    ),
    (
        DocumentKind::BalanceSheet,
        &["balance sheet", "total assets", "total liabilities"],
    ),
    (
        DocumentKind::RentRoll,
        &["rent roll", "unit", "tenant", "lease", "occupancy"],
    ),
    (
        DocumentKind::OperatingStatement,
        &["operating statement", "net operating income", "operating expenses"],
    ),
    (DocumentKind::Budget, &["budget", "projected", "forecast"]),
    (
        DocumentKind::Trailing12,
        &["trailing 12", "trailing twelve", "t12", "last 12 months"],
    ),
];

// Filename date patterns, tried in this order; the first hit wins.
static YEAR_MONTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(20\d{2})[-_.](\d{1,2})").expect("year-month regex"));
static MONTH_YEAR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{1,2})[-_.](20\d{2})").expect("month-year regex"));
static MONTH_DAY_YEAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d{1,2})[-_.](\d{1,2})[-_.](20\d{2})").expect("month-day-year regex")
});

pub struct DocumentClassifier<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> DocumentClassifier<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Maps a free-form label to a document kind: exact canonical keys
    /// first, then synonym substrings. Unmatched labels are warned about
    /// and passed through unchanged.
    pub fn standardize_document_kind(&self, label: &str) -> DocumentKind {
        let lower = label.trim().to_lowercase();

        for (kind, _) in &DOCUMENT_SYNONYMS {
            if kind.canonical_key() == Some(lower.as_str()) {
                return kind.clone();
            }
        }
        if lower == "unknown" {
            return DocumentKind::Unknown;
        }

        if let Some(kind) = match_document_synonyms(&lower) {
            return kind;
        }

        self.diagnostics.warning(&format!(
            "unrecognized document type '{label}', passing through unchanged"
        ));
        DocumentKind::Other(label.to_string())
    }

    /// Maps a free-form label to a period role. Unmatched or empty labels
    /// default to the current period with a warning.
    pub fn standardize_period_kind(&self, label: &str) -> PeriodKind {
        let lower = label.trim().to_lowercase();

        for (kind, _) in &PERIOD_SYNONYMS {
            if lower == kind.to_string() {
                return *kind;
            }
        }

        if let Some(kind) = match_period_synonyms(&lower) {
            return kind;
        }

        self.diagnostics.warning(&format!(
            "unrecognized period type '{label}', defaulting to current"
        ));
        PeriodKind::Current
    }

    /// Derives document kind, period role, and reporting period from the
    /// filename, falling back to the first block of extracted text for the
    /// document kind when the filename says nothing.
    pub fn detect_document_properties(
        &self,
        filename: &str,
        text_content: Option<&str>,
    ) -> DocumentProperties {
        let lower = filename.to_lowercase();

        let period = detect_period_date(&lower);

        let mut document_kind = match_document_synonyms(&lower);
        if document_kind.is_none() {
            if let Some(text) = text_content {
                document_kind = match_content_keywords(first_text_block(text));
            }
        }
        let document_kind = document_kind.unwrap_or_else(|| {
            self.diagnostics.warning(&format!(
                "could not detect document type for '{filename}'"
            ));
            DocumentKind::Unknown
        });

        let period_kind = match_period_synonyms(&lower).unwrap_or_default();

        DocumentProperties {
            document_kind,
            period_kind,
            period,
        }
    }
}

/// Free-function conveniences over the default log sink.
pub fn standardize_document_kind(label: &str) -> DocumentKind {
    DocumentClassifier::new(&LogDiagnostics).standardize_document_kind(label)
}

pub fn standardize_period_kind(label: &str) -> PeriodKind {
    DocumentClassifier::new(&LogDiagnostics).standardize_period_kind(label)
}

pub fn detect_document_properties(
    filename: &str,
    text_content: Option<&str>,
) -> DocumentProperties {
    DocumentClassifier::new(&LogDiagnostics).detect_document_properties(filename, text_content)
}

fn match_document_synonyms(lower: &str) -> Option<DocumentKind> {
    for (kind, synonyms) in &DOCUMENT_SYNONYMS {
        if synonyms.iter().any(|synonym| lower.contains(synonym)) {
            return Some(kind.clone());
        }
    }
    None
}

fn match_period_synonyms(lower: &str) -> Option<PeriodKind> {
    for (kind, synonyms) in &PERIOD_SYNONYMS {
        if synonyms.iter().any(|synonym| lower.contains(synonym)) {
            return Some(*kind);
        }
    }
    None
}

fn match_content_keywords(block: &str) -> Option<DocumentKind> {
    let lower = block.to_lowercase();
    for (kind, keywords) in &CONTENT_KEYWORDS {
        if keywords.iter().any(|keyword| lower.contains(keyword)) {
            return Some(kind.clone());
        }
    }
    None
}

/// Content before the first blank-line separator.
fn first_text_block(text: &str) -> &str {
    text.split("\n\n").next().unwrap_or(text)
}

/// Reporting period from filename date tokens, normalized to month end.
/// Patterns are tried in a fixed order (`YYYY-MM`, `MM-YYYY`,
/// `MM-DD-YYYY`); a candidate with an out-of-range month is discarded and
/// the next pattern gets its chance.
fn detect_period_date(lower: &str) -> Option<NaiveDate> {
    if let Some(captures) = YEAR_MONTH.captures(lower) {
        let year: i32 = captures[1].parse().ok()?;
        if let Ok(month @ 1..=12) = captures[2].parse::<u32>() {
            return Some(last_day_of_month(year, month));
        }
    }

    if let Some(captures) = MONTH_YEAR.captures(lower) {
        let year: i32 = captures[2].parse().ok()?;
        if let Ok(month @ 1..=12) = captures[1].parse::<u32>() {
            return Some(last_day_of_month(year, month));
        }
    }

    if let Some(captures) = MONTH_DAY_YEAR.captures(lower) {
        let year: i32 = captures[3].parse().ok()?;
        if let Ok(month @ 1..=12) = captures[1].parse::<u32>() {
            return Some(last_day_of_month(year, month));
        }
    }

    None
}
