use chrono::{Datelike, Days, NaiveDate};

use crate::table::Cell;

/// Treated as zero when guarding percent-change denominators.
pub const ZERO_EPSILON: f64 = 0.0001;

/// Parses a user-authored monetary string, defaulting to `0.0` on anything
/// unparseable. Never fails: statement authors leave cells blank or type
/// freehand, and one bad cell must not discard an otherwise-usable document.
///
/// Accepted formats: plain floats (`1234.5`), thousands separators
/// (`1,234.50`), a leading dollar sign (`$2,000`), and accounting-style
/// parenthesized negatives (`(500)`).
pub fn parse_numeric_str(value: &str) -> f64 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0.0;
    }

    let parenthesized = trimmed.starts_with('(') && trimmed.ends_with(')') && trimmed.len() > 2;
    let inner = if parenthesized {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    };

    let cleaned: String = inner
        .chars()
        .filter(|c| *c != '$' && *c != ',' && !c.is_whitespace())
        .collect();

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if parenthesized {
                -value
            } else {
                value
            }
        }
        _ => 0.0,
    }
}

/// Cell-level variant of [`parse_numeric_str`] with the same contract.
pub fn parse_numeric_or_zero(cell: &Cell) -> f64 {
    match cell {
        Cell::Number(value) if value.is_finite() => *value,
        Cell::Number(_) => 0.0,
        Cell::Text(text) => parse_numeric_str(text),
        Cell::Empty => 0.0,
    }
}

/// Percent change from `previous` to `current`.
///
/// A near-zero `previous` is treated as zero to avoid division instability:
/// the change is `0.0` when `current` is also near zero, and exactly `100.0`
/// otherwise (growth from nothing is reported as 100%, the cap downstream
/// reporting expects).
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous.abs() < ZERO_EPSILON {
        if current.abs() < ZERO_EPSILON {
            0.0
        } else {
            100.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

pub fn last_day_of_month(year: i32, month: u32) -> NaiveDate {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap()
        .checked_sub_days(Days::new(1))
        .unwrap()
}

/// Month-end date for the month containing `date`.
pub fn month_end(date: NaiveDate) -> NaiveDate {
    last_day_of_month(date.year(), date.month())
}
