//! Turns a filtered statement table into a [`MetricsRecord`].
//!
//! Row labels are matched case-insensitively against per-metric synonym
//! lists, iterated in a pinned metric order. The first row claiming a
//! metric wins; rows that match a label but carry no numeric value (section
//! headers) claim nothing.

use crate::schema::{Metric, MetricsRecord};
use crate::table::{is_numeric_like, RawTable};
use crate::utils::parse_numeric_or_zero;

/// Label synonyms per canonical metric, in match order. More specific
/// labels (total other income, effective gross income) sit above the
/// generic totals they would otherwise collide with.
const CATEGORY_SYNONYMS: [(Metric, &[&str]); 8] = [
    (
        Metric::Gpr,
        &[
            "gross potential rent",
            "gross potential income",
            "scheduled rent",
            "potential rent",
            "gpr",
        ],
    ),
    (Metric::VacancyLoss, &["vacancy loss", "vacancy", "credit loss"]),
    (Metric::Concessions, &["concession"]),
    (Metric::BadDebt, &["bad debt", "write-off", "write off"]),
    (
        Metric::OtherIncome,
        &[
            "other income",
            "miscellaneous income",
            "misc income",
            "parking income",
            "laundry income",
            "fee income",
        ],
    ),
    (
        Metric::Egi,
        &["effective gross income", "egi", "total income", "total revenue"],
    ),
    (
        Metric::Opex,
        &[
            "total operating expenses",
            "operating expenses",
            "total expenses",
            "opex",
        ],
    ),
    (Metric::Noi, &["net operating income", "noi"]),
];

fn match_category(label: &str) -> Option<Metric> {
    let lower = label.to_lowercase();
    for (metric, synonyms) in &CATEGORY_SYNONYMS {
        if synonyms.iter().any(|synonym| lower.contains(synonym)) {
            return Some(*metric);
        }
    }
    None
}

/// Extracts the canonical metrics from a statement table whose artifact
/// columns are already dropped.
///
/// Returns `None` when not a single category label matched, which the
/// caller reports as "no extractable financial data". Metrics never
/// mentioned by the statement stay at `0.0`.
pub fn extract_metrics(table: &RawTable) -> Option<MetricsRecord> {
    let mut record = MetricsRecord::default();
    let mut claimed: Vec<Metric> = Vec::new();

    for row in &table.rows {
        let label = match row.first().and_then(|cell| cell.as_text()) {
            Some(label) => label,
            None => continue,
        };

        let metric = match match_category(label) {
            Some(metric) => metric,
            None => continue,
        };
        if claimed.contains(&metric) {
            continue;
        }

        // First numeric-looking cell after the label holds the value;
        // a label row without one is a section header, not a claim.
        let value_cell = row.iter().skip(1).find(|cell| is_numeric_like(cell));
        if let Some(cell) = value_cell {
            record.set(metric, parse_numeric_or_zero(cell));
            claimed.push(metric);
        }
    }

    if claimed.is_empty() {
        None
    } else {
        Some(record)
    }
}
