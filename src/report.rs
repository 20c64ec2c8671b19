//! Plain renderings of a comparison for report generators and dashboards.

use crate::schema::{Metric, MetricsRecord, NoiComparison, PeriodComparison};

impl NoiComparison {
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_csv(&self) -> String {
        let mut output = String::new();
        output.push_str("Comparison,Metric,Current,Compare,Change,Percent Change\n");

        for metric in Metric::ALL {
            output.push_str(&format!(
                "current,{},{:.2},,,\n",
                metric.key(),
                self.current.get(metric)
            ));
        }

        push_csv_bundle(&mut output, "month_vs_prior", self.month_vs_prior.as_ref());
        push_csv_bundle(&mut output, "actual_vs_budget", self.actual_vs_budget.as_ref());
        push_csv_bundle(&mut output, "year_vs_year", self.year_vs_year.as_ref());

        output
    }

    pub fn to_markdown(&self) -> String {
        let mut output = String::new();

        output.push_str("# NOI Comparison\n\n");

        output.push_str("## Current Period\n\n");
        push_markdown_record(&mut output, &self.current);

        push_markdown_bundle(&mut output, "Month vs Prior", self.month_vs_prior.as_ref());
        push_markdown_bundle(&mut output, "Actual vs Budget", self.actual_vs_budget.as_ref());
        push_markdown_bundle(&mut output, "Year vs Year", self.year_vs_year.as_ref());

        output
    }
}

fn push_csv_bundle(output: &mut String, name: &str, bundle: Option<&PeriodComparison>) {
    let bundle = match bundle {
        Some(bundle) => bundle,
        None => return,
    };

    for metric in Metric::ALL {
        let delta = bundle.get(metric);
        output.push_str(&format!(
            "{},{},{:.2},{:.2},{:.2},{:.2}\n",
            name,
            metric.key(),
            delta.current,
            delta.compare,
            delta.change,
            delta.percent_change
        ));
    }
}

fn push_markdown_record(output: &mut String, record: &MetricsRecord) {
    for metric in Metric::ALL {
        output.push_str(&format!(
            "- {}: ${:.2}\n",
            metric.label(),
            record.get(metric)
        ));
    }
    output.push('\n');
}

fn push_markdown_bundle(output: &mut String, title: &str, bundle: Option<&PeriodComparison>) {
    let bundle = match bundle {
        Some(bundle) => bundle,
        None => return,
    };

    output.push_str(&format!("## {title}\n\n"));
    output.push_str("| Metric | Current | Compare | Change | % Change |\n");
    output.push_str("|---|---|---|---|---|\n");

    for metric in Metric::ALL {
        let delta = bundle.get(metric);
        output.push_str(&format!(
            "| {} | {:.2} | {:.2} | {:.2} | {:.1}% |\n",
            metric.label(),
            delta.current,
            delta.compare,
            delta.change,
            delta.percent_change
        ));
    }
    output.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comparison() -> NoiComparison {
        let current = MetricsRecord {
            gpr: 100_000.0,
            vacancy_loss: 5_000.0,
            other_income: 2_000.0,
            egi: 97_000.0,
            opex: 40_000.0,
            noi: 57_000.0,
            ..Default::default()
        };
        let budget = MetricsRecord {
            noi: 50_000.0,
            ..current.clone()
        };

        NoiComparison {
            actual_vs_budget: Some(PeriodComparison::between(&current, &budget)),
            current,
            month_vs_prior: None,
            year_vs_year: None,
        }
    }

    #[test]
    fn test_markdown_contains_headline_figures() {
        let markdown = comparison().to_markdown();
        assert!(markdown.contains("# NOI Comparison"));
        assert!(markdown.contains("Net Operating Income: $57000.00"));
        assert!(markdown.contains("## Actual vs Budget"));
        assert!(markdown.contains("14.0%"));
        assert!(!markdown.contains("Month vs Prior"));
    }

    #[test]
    fn test_csv_rows() {
        let csv = comparison().to_csv();
        assert!(csv.starts_with("Comparison,Metric,Current"));
        assert!(csv.contains("current,noi,57000.00"));
        assert!(csv.contains("actual_vs_budget,noi,57000.00,50000.00,7000.00,14.00"));
        assert!(!csv.contains("month_vs_prior"));
    }

    #[test]
    fn test_json_round_trip() {
        let json = comparison().to_json().unwrap();
        let parsed: NoiComparison = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.current.noi, 57_000.0);
        assert!(parsed.actual_vs_budget.is_some());
        assert!(parsed.month_vs_prior.is_none());
    }
}
