use anyhow::Result;
use chrono::NaiveDate;
use noi_analyzer::*;

/// Builds a RawTable from an inline CSV fixture, the way a spreadsheet
/// reader would hand tables to the analyzer.
fn table_from_csv(data: &str) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .has_headers(true)
        .from_reader(data.as_bytes());

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let row: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.trim().is_empty() {
                    Cell::Empty
                } else {
                    Cell::text(field)
                }
            })
            .collect();
        rows.push(row);
    }

    Ok(RawTable::new(headers, rows))
}

fn document(filename: &str, csv_data: &str) -> Result<SourceDocument> {
    Ok(SourceDocument {
        filename: filename.to_string(),
        text_content: None,
        table: table_from_csv(csv_data)?,
        period_override: None,
    })
}

const CURRENT_STATEMENT: &str = "\
Category,May 2024,Unnamed: 2
Gross Potential Rent,\"100,000\",see note 4
Vacancy Loss,\"5,000\",
Concessions,0,
Bad Debt,0,
Other Income,\"2,000\",mostly parking
Effective Gross Income,\"97,000\",
Total Operating Expenses,\"40,000\",
Net Operating Income,\"57,000\",
";

const BUDGET_STATEMENT: &str = "\
Category,Budget
Gross Potential Rent,\"98,000\"
Vacancy Loss,\"4,900\"
Concessions,0
Bad Debt,0
Other Income,\"1,900\"
Effective Gross Income,\"95,000\"
Total Operating Expenses,\"45,000\"
Net Operating Income,\"50,000\"
";

const PRIOR_MONTH_STATEMENT: &str = "\
Category,April 2024
Gross Potential Rent,\"100,000\"
Vacancy Loss,\"6,000\"
Concessions,0
Bad Debt,0
Other Income,\"2,000\"
Effective Gross Income,\"96,000\"
Total Operating Expenses,\"42,000\"
Net Operating Income,\"54,000\"
";

#[test]
fn test_full_pipeline_current_budget_and_prior() -> Result<()> {
    let documents = vec![
        document("Operating_Statement_2024-05.xlsx", CURRENT_STATEMENT)?,
        document("Budget_2024-05.xlsx", BUDGET_STATEMENT)?,
        document("Prior_Month_Operating_Statement_2024-04.xlsx", PRIOR_MONTH_STATEMENT)?,
    ];

    let comparison = analyze_documents(&documents)?;

    assert_eq!(comparison.current.gpr, 100_000.0);
    assert_eq!(comparison.current.noi, 57_000.0);

    let budget = comparison.actual_vs_budget.as_ref().expect("budget bundle");
    assert_eq!(budget.noi.change, 7_000.0);
    assert_eq!(budget.noi.percent_change, 14.0);
    assert_eq!(budget.opex.change, -5_000.0);

    let prior = comparison.month_vs_prior.as_ref().expect("prior bundle");
    assert_eq!(prior.noi.change, 3_000.0);
    assert_eq!(prior.vacancy_loss.change, -1_000.0);

    assert!(comparison.year_vs_year.is_none());
    Ok(())
}

#[test]
fn test_artifact_columns_do_not_pollute_extraction() -> Result<()> {
    let table = table_from_csv(CURRENT_STATEMENT)?;

    // The trailing unnamed note column is an artifact and must be dropped.
    let artifacts = detect_artifact_columns(&table);
    assert_eq!(artifacts.into_iter().collect::<Vec<_>>(), vec![2]);

    let filtered = drop_artifact_columns(&table);
    assert_eq!(filtered.headers, vec!["Category", "May 2024"]);
    assert!(detect_artifact_columns(&filtered).is_empty());

    assert!(is_financial_statement(&table));
    let record = extract_metrics(&filtered).expect("metrics");
    assert_eq!(record.other_income, 2_000.0);
    Ok(())
}

#[test]
fn test_rejected_upload_surfaces_missing_current_period() -> Result<()> {
    // A roster is not a financial statement; with nothing else uploaded
    // the comparison has no current month to stand on.
    let roster = "\
Name,Desk
Alice,4A
Bob,5C
";
    let documents = vec![document("staff_roster_2024-05.xlsx", roster)?];

    let result = analyze_documents(&documents);
    assert!(matches!(result, Err(NoiAnalyzerError::MissingCurrentPeriod)));
    Ok(())
}

#[test]
fn test_detection_and_classification_agree_on_period() -> Result<()> {
    let properties = detect_document_properties("Operating_Statement_2024-05.xlsx", None);
    assert_eq!(properties.document_kind, DocumentKind::OperatingStatement);
    assert_eq!(properties.period_kind, PeriodKind::Current);
    assert_eq!(
        properties.period,
        Some(NaiveDate::from_ymd_opt(2024, 5, 31).unwrap())
    );

    assert_eq!(
        standardize_document_kind("T12M_Statement.xlsx"),
        DocumentKind::Trailing12
    );
    Ok(())
}

#[test]
fn test_payload_shapes_reach_the_same_comparison() -> Result<()> {
    let flat: RecordPayload = serde_json::from_str(
        r#"{"gpr": 100000.0, "vacancy_loss": 5000.0, "other_income": 2000.0,
            "egi": 97000.0, "opex": 40000.0, "noi": 57000.0}"#,
    )?;
    let nested: RecordPayload =
        serde_json::from_str(r#"{"financials": {"noi": 50000.0}}"#)?;

    let data = ConsolidatedData::from_payloads(Some(flat), None, Some(nested), None);
    let comparison = calculate_noi_comparisons(&data)?;

    let budget = comparison.actual_vs_budget.as_ref().expect("budget bundle");
    assert_eq!(budget.noi.change, 7_000.0);
    assert!(comparison.month_vs_prior.is_none());

    let json = comparison.to_json()?;
    assert!(json.contains("actual_vs_budget"));
    assert!(!json.contains("year_vs_year"));
    Ok(())
}

#[test]
fn test_reports_render_from_pipeline_output() -> Result<()> {
    let documents = vec![
        document("Operating_Statement_2024-05.xlsx", CURRENT_STATEMENT)?,
        document("Budget_2024-05.xlsx", BUDGET_STATEMENT)?,
    ];

    let comparison = analyze_documents(&documents)?;

    let markdown = comparison.to_markdown();
    assert!(markdown.contains("## Actual vs Budget"));
    assert!(markdown.contains("Net Operating Income"));

    let csv_output = comparison.to_csv();
    assert!(csv_output.contains("actual_vs_budget,noi,57000.00,50000.00,7000.00,14.00"));
    Ok(())
}
