use std::fmt;

use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::utils::percent_change;

/// Classification of an uploaded financial document.
///
/// Labels that match no known type are carried through verbatim in
/// [`DocumentKind::Other`] so the caller keeps whatever the upload said,
/// rather than seeing it coerced to a sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    ProfitLoss,
    BalanceSheet,
    RentRoll,
    OperatingStatement,
    Budget,
    #[serde(rename = "trailing_12")]
    Trailing12,
    Unknown,
    #[serde(untagged)]
    Other(String),
}

impl DocumentKind {
    /// Canonical key for the known document types, `None` for pass-through
    /// and unknown labels.
    pub fn canonical_key(&self) -> Option<&'static str> {
        match self {
            Self::ProfitLoss => Some("profit_loss"),
            Self::BalanceSheet => Some("balance_sheet"),
            Self::RentRoll => Some("rent_roll"),
            Self::OperatingStatement => Some("operating_statement"),
            Self::Budget => Some("budget"),
            Self::Trailing12 => Some("trailing_12"),
            Self::Unknown | Self::Other(_) => None,
        }
    }

    pub fn as_label(&self) -> &str {
        match self {
            Self::Unknown => "unknown",
            Self::Other(label) => label,
            other => other.canonical_key().unwrap_or("unknown"),
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// The comparison slot a document's data occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodKind {
    Current,
    PriorMonth,
    Budget,
    PriorYear,
}

impl Default for PeriodKind {
    fn default() -> Self {
        Self::Current
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Current => "current",
            Self::PriorMonth => "prior_month",
            Self::Budget => "budget",
            Self::PriorYear => "prior_year",
        };
        f.write_str(label)
    }
}

/// The eight canonical metrics every comparison covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Gpr,
    VacancyLoss,
    Concessions,
    BadDebt,
    OtherIncome,
    Egi,
    Opex,
    Noi,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Gpr,
        Metric::VacancyLoss,
        Metric::Concessions,
        Metric::BadDebt,
        Metric::OtherIncome,
        Metric::Egi,
        Metric::Opex,
        Metric::Noi,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Gpr => "gpr",
            Self::VacancyLoss => "vacancy_loss",
            Self::Concessions => "concessions",
            Self::BadDebt => "bad_debt",
            Self::OtherIncome => "other_income",
            Self::Egi => "egi",
            Self::Opex => "opex",
            Self::Noi => "noi",
        }
    }

    /// Human-readable name for report rendering.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Gpr => "Gross Potential Rent",
            Self::VacancyLoss => "Vacancy Loss",
            Self::Concessions => "Concessions",
            Self::BadDebt => "Bad Debt",
            Self::OtherIncome => "Other Income",
            Self::Egi => "Effective Gross Income",
            Self::Opex => "Operating Expenses",
            Self::Noi => "Net Operating Income",
        }
    }
}

/// A single period's normalized financial metrics. Missing or non-numeric
/// source values normalize to `0.0`; every field is a finite float.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricsRecord {
    #[serde(default)]
    #[schemars(description = "Gross potential rent: maximum rental income before vacancy and concessions")]
    pub gpr: f64,

    #[serde(default)]
    #[schemars(description = "Income lost to vacant units and credit loss")]
    pub vacancy_loss: f64,

    #[serde(default)]
    #[schemars(description = "Rent discounts granted to tenants")]
    pub concessions: f64,

    #[serde(default)]
    #[schemars(description = "Uncollectible rent written off")]
    pub bad_debt: f64,

    #[serde(default)]
    #[schemars(description = "Non-rent income: parking, laundry, fees")]
    pub other_income: f64,

    #[serde(default)]
    #[schemars(description = "Effective gross income as reported by the statement")]
    pub egi: f64,

    #[serde(default)]
    #[schemars(description = "Total operating expenses")]
    pub opex: f64,

    #[serde(default)]
    #[schemars(description = "Net operating income as reported by the statement")]
    pub noi: f64,
}

impl MetricsRecord {
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Gpr => self.gpr,
            Metric::VacancyLoss => self.vacancy_loss,
            Metric::Concessions => self.concessions,
            Metric::BadDebt => self.bad_debt,
            Metric::OtherIncome => self.other_income,
            Metric::Egi => self.egi,
            Metric::Opex => self.opex,
            Metric::Noi => self.noi,
        }
    }

    pub fn set(&mut self, metric: Metric, value: f64) {
        match metric {
            Metric::Gpr => self.gpr = value,
            Metric::VacancyLoss => self.vacancy_loss = value,
            Metric::Concessions => self.concessions = value,
            Metric::BadDebt => self.bad_debt = value,
            Metric::OtherIncome => self.other_income = value,
            Metric::Egi => self.egi = value,
            Metric::Opex => self.opex = value,
            Metric::Noi => self.noi = value,
        }
    }

    /// EGI recomputed from the component metrics, independent of the
    /// reported `egi` total.
    pub fn computed_egi(&self) -> f64 {
        self.gpr - self.vacancy_loss - self.concessions - self.bad_debt + self.other_income
    }

    /// NOI recomputed from the component metrics, independent of the
    /// reported `noi` total.
    pub fn computed_noi(&self) -> f64 {
        self.computed_egi() - self.opex
    }
}

/// One analysis request's worth of per-period records, keyed by period
/// role. Built once from the uploaded documents, consumed by the comparison
/// engine, and discarded with the response; nothing here is persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ConsolidatedData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "The reporting period under analysis")]
    pub current_month: Option<MetricsRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "The month immediately before the current period")]
    pub prior_month: Option<MetricsRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Budgeted figures for the current period")]
    pub budget: Option<MetricsRecord>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "The same month one year earlier")]
    pub prior_year: Option<MetricsRecord>,
}

impl ConsolidatedData {
    pub fn slot(&self, period: PeriodKind) -> Option<&MetricsRecord> {
        match period {
            PeriodKind::Current => self.current_month.as_ref(),
            PeriodKind::PriorMonth => self.prior_month.as_ref(),
            PeriodKind::Budget => self.budget.as_ref(),
            PeriodKind::PriorYear => self.prior_year.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, period: PeriodKind) -> &mut Option<MetricsRecord> {
        match period {
            PeriodKind::Current => &mut self.current_month,
            PeriodKind::PriorMonth => &mut self.prior_month,
            PeriodKind::Budget => &mut self.budget,
            PeriodKind::PriorYear => &mut self.prior_year,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.current_month.is_none()
            && self.prior_month.is_none()
            && self.budget.is_none()
            && self.prior_year.is_none()
    }
}

/// Current/compare pair for one metric, with its absolute and percent
/// change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MetricDelta {
    pub current: f64,
    pub compare: f64,
    pub change: f64,
    pub percent_change: f64,
}

impl MetricDelta {
    pub fn between(current: f64, compare: f64) -> Self {
        Self {
            current,
            compare,
            change: current - compare,
            percent_change: percent_change(current, compare),
        }
    }
}

/// All eight metric deltas for one comparison pair (current vs. one other
/// period role).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PeriodComparison {
    pub gpr: MetricDelta,
    pub vacancy_loss: MetricDelta,
    pub concessions: MetricDelta,
    pub bad_debt: MetricDelta,
    pub other_income: MetricDelta,
    pub egi: MetricDelta,
    pub opex: MetricDelta,
    pub noi: MetricDelta,
}

impl PeriodComparison {
    pub fn between(current: &MetricsRecord, compare: &MetricsRecord) -> Self {
        let mut comparison = Self::default();
        for metric in Metric::ALL {
            *comparison.get_mut(metric) =
                MetricDelta::between(current.get(metric), compare.get(metric));
        }
        comparison
    }

    pub fn get(&self, metric: Metric) -> &MetricDelta {
        match metric {
            Metric::Gpr => &self.gpr,
            Metric::VacancyLoss => &self.vacancy_loss,
            Metric::Concessions => &self.concessions,
            Metric::BadDebt => &self.bad_debt,
            Metric::OtherIncome => &self.other_income,
            Metric::Egi => &self.egi,
            Metric::Opex => &self.opex,
            Metric::Noi => &self.noi,
        }
    }

    fn get_mut(&mut self, metric: Metric) -> &mut MetricDelta {
        match metric {
            Metric::Gpr => &mut self.gpr,
            Metric::VacancyLoss => &mut self.vacancy_loss,
            Metric::Concessions => &mut self.concessions,
            Metric::BadDebt => &mut self.bad_debt,
            Metric::OtherIncome => &mut self.other_income,
            Metric::Egi => &mut self.egi,
            Metric::Opex => &mut self.opex,
            Metric::Noi => &mut self.noi,
        }
    }
}

/// Output of the comparison engine. A period role absent from the input
/// produces no bundle here at all; serialization omits the key rather than
/// emitting null.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NoiComparison {
    #[schemars(description = "The current period's normalized record")]
    pub current: MetricsRecord,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Current month vs. prior month, when a prior month document was supplied")]
    pub month_vs_prior: Option<PeriodComparison>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Current month vs. budget, when a budget document was supplied")]
    pub actual_vs_budget: Option<PeriodComparison>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[schemars(description = "Current month vs. the same month last year, when a prior year document was supplied")]
    pub year_vs_year: Option<PeriodComparison>,
}

impl NoiComparison {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(NoiComparison)
    }

    pub fn schema_as_json() -> Result<String, serde_json::Error> {
        let schema = Self::generate_json_schema();
        serde_json::to_string_pretty(&schema)
    }
}

/// What filename and content inspection concluded about a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentProperties {
    pub document_kind: DocumentKind,
    pub period_kind: PeriodKind,
    /// Reporting period normalized to its month-end date, when a date was
    /// recognizable in the filename.
    pub period: Option<NaiveDate>,
}
