//! Assembles uploaded documents into [`ConsolidatedData`].
//!
//! Shape questions are settled here, once, at the edge: a host that already
//! holds extracted records hands them over as [`RecordPayload`] (flat or
//! legacy nested), while raw tables go through classification and
//! extraction. Only canonical [`MetricsRecord`] values flow past this
//! module.

use serde::{Deserialize, Serialize};

use crate::classify::DocumentClassifier;
use crate::diagnostics::{Diagnostics, LogDiagnostics};
use crate::extract::extract_metrics;
use crate::schema::{ConsolidatedData, MetricsRecord, PeriodKind};
use crate::table::{drop_artifact_columns, is_financial_statement, RawTable};

/// A per-period record as hosts submit it: either the flat metrics mapping
/// or the legacy `{"financials": {...}}` wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordPayload {
    Nested { financials: MetricsRecord },
    Flat(MetricsRecord),
}

impl RecordPayload {
    pub fn into_record(self) -> MetricsRecord {
        match self {
            Self::Nested { financials } => financials,
            Self::Flat(record) => record,
        }
    }
}

impl ConsolidatedData {
    /// Builds consolidated data from pre-extracted payloads, unwrapping
    /// each to its canonical record.
    pub fn from_payloads(
        current_month: Option<RecordPayload>,
        prior_month: Option<RecordPayload>,
        budget: Option<RecordPayload>,
        prior_year: Option<RecordPayload>,
    ) -> Self {
        Self {
            current_month: current_month.map(RecordPayload::into_record),
            prior_month: prior_month.map(RecordPayload::into_record),
            budget: budget.map(RecordPayload::into_record),
            prior_year: prior_year.map(RecordPayload::into_record),
        }
    }
}

/// One uploaded document: filename, optional extracted text, and the raw
/// table the tabular-file collaborator produced from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceDocument {
    pub filename: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,

    pub table: RawTable,

    /// Explicit period role, when the host already knows which slot this
    /// document fills. Overrides filename detection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_override: Option<PeriodKind>,
}

pub struct Consolidator<'a> {
    diagnostics: &'a dyn Diagnostics,
}

impl<'a> Consolidator<'a> {
    pub fn new(diagnostics: &'a dyn Diagnostics) -> Self {
        Self { diagnostics }
    }

    /// Classifies, filters, and extracts every document, then files each
    /// record under its period role.
    ///
    /// Documents that fail statement classification or yield no metrics
    /// are skipped with a warning; rejection is a user-input outcome, not
    /// an error. When two documents claim the same role, the later upload
    /// wins its slot and the overwrite is warned.
    pub fn consolidate(&self, documents: &[SourceDocument]) -> ConsolidatedData {
        let classifier = DocumentClassifier::new(self.diagnostics);
        let mut data = ConsolidatedData::default();

        for document in documents {
            let properties = classifier
                .detect_document_properties(&document.filename, document.text_content.as_deref());

            if !is_financial_statement(&document.table) {
                self.diagnostics.warning(&format!(
                    "no extractable financial data in '{}', skipping",
                    document.filename
                ));
                continue;
            }

            let filtered = drop_artifact_columns(&document.table);
            let record = match extract_metrics(&filtered) {
                Some(record) => record,
                None => {
                    self.diagnostics.warning(&format!(
                        "no recognizable metric categories in '{}', skipping",
                        document.filename
                    ));
                    continue;
                }
            };

            let role = document.period_override.unwrap_or(properties.period_kind);
            let slot = data.slot_mut(role);
            if slot.is_some() {
                self.diagnostics.warning(&format!(
                    "duplicate {role} document '{}' replaces the earlier upload",
                    document.filename
                ));
            }
            *slot = Some(record);
        }

        data
    }
}

/// Convenience wrapper over the default log sink.
pub fn consolidate_documents(documents: &[SourceDocument]) -> ConsolidatedData {
    Consolidator::new(&LogDiagnostics).consolidate(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::MemoryDiagnostics;
    use crate::table::Cell;

    fn statement_table(noi: &str) -> RawTable {
        RawTable::new(
            vec!["Category".to_string(), "Amount".to_string()],
            vec![
                vec![Cell::text("Gross Potential Rent"), Cell::text("100,000")],
                vec![Cell::text("Net Operating Income"), Cell::text(noi)],
            ],
        )
    }

    fn document(filename: &str, table: RawTable) -> SourceDocument {
        SourceDocument {
            filename: filename.to_string(),
            text_content: None,
            table,
            period_override: None,
        }
    }

    #[test]
    fn test_record_payload_flat_and_nested() {
        let flat: RecordPayload =
            serde_json::from_str(r#"{"gpr": 1000.0, "noi": 400.0}"#).unwrap();
        assert_eq!(flat.clone().into_record().gpr, 1000.0);

        let nested: RecordPayload =
            serde_json::from_str(r#"{"financials": {"gpr": 1000.0, "noi": 400.0}}"#).unwrap();
        assert_eq!(nested.into_record(), flat.into_record());
    }

    #[test]
    fn test_from_payloads_unwraps_shapes() {
        let data = ConsolidatedData::from_payloads(
            Some(RecordPayload::Flat(MetricsRecord {
                noi: 57_000.0,
                ..Default::default()
            })),
            None,
            Some(RecordPayload::Nested {
                financials: MetricsRecord {
                    noi: 50_000.0,
                    ..Default::default()
                },
            }),
            None,
        );

        assert_eq!(data.current_month.unwrap().noi, 57_000.0);
        assert_eq!(data.budget.unwrap().noi, 50_000.0);
        assert!(data.prior_month.is_none());
        assert!(data.prior_year.is_none());
    }

    #[test]
    fn test_consolidate_files_documents_by_role() {
        let diagnostics = MemoryDiagnostics::new();
        let consolidator = Consolidator::new(&diagnostics);

        let documents = vec![
            document("Operating_Statement_2024-05.xlsx", statement_table("57,000")),
            document("Budget_2024-05.xlsx", statement_table("50,000")),
        ];

        let data = consolidator.consolidate(&documents);
        assert_eq!(data.current_month.unwrap().noi, 57_000.0);
        assert_eq!(data.budget.unwrap().noi, 50_000.0);
        assert!(data.prior_month.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_consolidate_period_override_beats_detection() {
        let diagnostics = MemoryDiagnostics::new();
        let consolidator = Consolidator::new(&diagnostics);

        let mut doc = document("Operating_Statement_2024-04.xlsx", statement_table("55,000"));
        doc.period_override = Some(PeriodKind::PriorMonth);

        let data = consolidator.consolidate(&[doc]);
        assert!(data.current_month.is_none());
        assert_eq!(data.prior_month.unwrap().noi, 55_000.0);
    }

    #[test]
    fn test_consolidate_skips_non_statements_with_warning() {
        let diagnostics = MemoryDiagnostics::new();
        let consolidator = Consolidator::new(&diagnostics);

        let roster = RawTable::new(
            vec!["Name".to_string(), "Desk".to_string()],
            vec![vec![Cell::text("Alice"), Cell::text("4A")]],
        );

        let data = consolidator.consolidate(&[document("roster.xlsx", roster)]);
        assert!(data.is_empty());
        let warnings = diagnostics.warnings();
        assert!(warnings.iter().any(|w| w.contains("roster.xlsx")));
    }

    #[test]
    fn test_consolidate_duplicate_role_later_wins_with_warning() {
        let diagnostics = MemoryDiagnostics::new();
        let consolidator = Consolidator::new(&diagnostics);

        let documents = vec![
            document("Operating_Statement_2024-05.xlsx", statement_table("57,000")),
            document("Operating_Statement_2024-05_v2.xlsx", statement_table("58,000")),
        ];

        let data = consolidator.consolidate(&documents);
        assert_eq!(data.current_month.unwrap().noi, 58_000.0);
        let warnings = diagnostics.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("duplicate"));
    }
}
