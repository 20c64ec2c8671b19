//! Raw tabular input and the structure heuristics that decide whether a
//! sheet is worth parsing at all.
//!
//! Spreadsheet exports of operating statements arrive with decorative blank
//! columns, mislabeled headers, and category labels mixed with free text.
//! The detectors here strip export artifacts and classify the survivors as
//! category/value financial statements or noise; the caller reports "no
//! extractable financial data" for rejects instead of guessing.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A single spreadsheet cell as handed over by the tabular-file
/// collaborator. Serialized untagged: numbers stay numbers, text stays
/// text, empty cells are null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) => false,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Rows-by-columns tabular input. Column 0 conventionally holds category
/// labels; subsequent columns hold values or export artifacts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self { headers, rows }
    }

    /// Number of columns: the header row and the widest data row can
    /// disagree in loose exports, so take the max.
    pub fn column_count(&self) -> usize {
        let widest_row = self.rows.iter().map(Vec::len).max().unwrap_or(0);
        self.headers.len().max(widest_row)
    }

    fn column_cells(&self, index: usize) -> impl Iterator<Item = &Cell> {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

/// Fraction of a placeholder column's values that must look numeric for the
/// column to count as real data.
const ARTIFACT_NUMERIC_THRESHOLD: f64 = 0.10;

/// Fraction of the value column that must look numeric for a table to count
/// as a financial statement.
const STATEMENT_NUMERIC_THRESHOLD: f64 = 0.30;

/// Vocabulary that marks a label column as financial-statement content.
const FINANCIAL_TERMS: [&str; 16] = [
    "rent",
    "income",
    "revenue",
    "expense",
    "tax",
    "insurance",
    "maintenance",
    "utilities",
    "management",
    "parking",
    "laundry",
    "fee",
    "noi",
    "egi",
    "operating",
    "total",
];

static NUMERIC_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\$?-?[\d.,]+$").expect("numeric-like regex"));

/// Whether a string value looks like a number: optional currency symbol and
/// sign, then digits with separators or a decimal point. Punctuation-only
/// markers (`--`, `*`) do not qualify.
pub fn is_numeric_like_str(value: &str) -> bool {
    NUMERIC_LIKE.is_match(value.trim())
}

pub fn is_numeric_like(cell: &Cell) -> bool {
    match cell {
        Cell::Number(_) => true,
        Cell::Text(text) => is_numeric_like_str(text),
        Cell::Empty => false,
    }
}

/// Headers spreadsheet tools invent for columns the author never named.
fn is_placeholder_header(header: &str) -> bool {
    let trimmed = header.trim();
    trimmed.is_empty() || trimmed.to_lowercase().starts_with("unnamed")
}

/// Columns introduced by export tooling that carry no financial data.
///
/// A column only qualifies when its header is a placeholder; named columns
/// are never dropped. Among placeholder columns, those whose non-empty
/// values are mostly text are artifacts, while mostly-numeric ones are real
/// data the export tool mislabeled. A placeholder column with no values at
/// all is the canonical artifact.
pub fn detect_artifact_columns(table: &RawTable) -> BTreeSet<usize> {
    let mut artifacts = BTreeSet::new();

    for index in 0..table.column_count() {
        let header = table.headers.get(index).map(String::as_str).unwrap_or("");
        if !is_placeholder_header(header) {
            continue;
        }

        let non_empty: Vec<&Cell> = table
            .column_cells(index)
            .filter(|cell| !cell.is_blank())
            .collect();

        let numeric = non_empty.iter().filter(|cell| is_numeric_like(cell)).count();
        let fraction = if non_empty.is_empty() {
            0.0
        } else {
            numeric as f64 / non_empty.len() as f64
        };

        if fraction < ARTIFACT_NUMERIC_THRESHOLD {
            artifacts.insert(index);
        }
    }

    artifacts
}

/// Copy of `table` with artifact columns removed from both headers and
/// rows. Running [`detect_artifact_columns`] on the result returns the
/// empty set.
pub fn drop_artifact_columns(table: &RawTable) -> RawTable {
    let artifacts = detect_artifact_columns(table);
    if artifacts.is_empty() {
        return table.clone();
    }

    let headers = table
        .headers
        .iter()
        .enumerate()
        .filter(|(index, _)| !artifacts.contains(index))
        .map(|(_, header)| header.clone())
        .collect();

    let rows = table
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .enumerate()
                .filter(|(index, _)| !artifacts.contains(index))
                .map(|(_, cell)| cell.clone())
                .collect()
        })
        .collect();

    RawTable::new(headers, rows)
}

/// Whether the table is a genuine category/value financial statement.
///
/// After dropping artifact columns, all three must hold: the label column
/// contains at least one financial-vocabulary term, there are at least two
/// columns, and at least 30% of the value column's non-empty cells look
/// numeric. An empty table is simply not a statement; no error.
pub fn is_financial_statement(table: &RawTable) -> bool {
    let table = drop_artifact_columns(table);

    if table.rows.is_empty() || table.column_count() < 2 {
        return false;
    }

    let has_financial_term = table
        .column_cells(0)
        .filter_map(Cell::as_text)
        .any(|label| {
            let lower = label.to_lowercase();
            FINANCIAL_TERMS.iter().any(|term| lower.contains(term))
        });
    if !has_financial_term {
        return false;
    }

    let values: Vec<&Cell> = table
        .column_cells(1)
        .filter(|cell| !cell.is_blank())
        .collect();
    if values.is_empty() {
        return false;
    }

    let numeric = values.iter().filter(|cell| is_numeric_like(cell)).count();
    numeric as f64 / values.len() as f64 >= STATEMENT_NUMERIC_THRESHOLD
}
