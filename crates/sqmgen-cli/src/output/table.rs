//! Human-readable table output formatting.

use crate::report::{ExpressionReport, SignatureEntry};
use is_terminal::IsTerminal;
use owo_colors::OwoColorize;
use sqmgen_core::FunctionExpression;
use std::fmt::Write;
use tabled::{settings::Style, Table, Tabled};

#[derive(Tabled)]
struct ReportRow {
    #[tabled(rename = "Invocation")]
    input: String,
    #[tabled(rename = "Shape")]
    shape: String,
    #[tabled(rename = "Function")]
    function: String,
    #[tabled(rename = "Result")]
    result_type: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

impl From<&ExpressionReport> for ReportRow {
    fn from(report: &ExpressionReport) -> Self {
        let node = report.node.as_ref();
        Self {
            input: report.input.clone(),
            shape: report
                .shape
                .map(|shape| shape.to_string())
                .unwrap_or_else(|| "-".to_string()),
            function: node
                .map(|node| node.function_name().to_string())
                .unwrap_or_else(|| "-".to_string()),
            result_type: node
                .and_then(FunctionExpression::result_type)
                .map(|sql_type| sql_type.to_string())
                .unwrap_or_else(|| "-".to_string()),
            status: if report.is_error() { "error" } else { "ok" },
        }
    }
}

#[derive(Tabled)]
struct SignatureRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Signature")]
    signature: String,
}

/// Format generation reports as a table followed by the error details.
pub fn format_reports(reports: &[ExpressionReport], quiet: bool, use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_title(&mut out, "Generated Expressions", colored);

    let rows: Vec<ReportRow> = reports.iter().map(ReportRow::from).collect();
    writeln!(out, "{}", Table::new(rows).with(Style::rounded())).unwrap();

    let failed = reports.iter().filter(|report| report.is_error()).count();
    let summary = format!(
        "Summary: {} invocations | {} generated | {} failed",
        reports.len(),
        reports.len() - failed,
        failed
    );
    writeln!(out).unwrap();
    if colored {
        writeln!(out, "{}", summary.cyan()).unwrap();
    } else {
        writeln!(out, "{summary}").unwrap();
    }

    if !quiet && failed > 0 {
        write_errors(&mut out, reports, colored);
    }

    out
}

/// Format function signatures as a table.
pub fn format_signatures(entries: &[SignatureEntry], use_colors: bool) -> String {
    let colored = use_colors && std::io::stdout().is_terminal();
    let mut out = String::new();

    write_title(&mut out, "Functions", colored);

    let rows: Vec<SignatureRow> = entries
        .iter()
        .map(|entry| SignatureRow {
            name: entry.name.clone(),
            kind: entry.kind.to_string(),
            signature: entry.signature.clone(),
        })
        .collect();
    writeln!(out, "{}", Table::new(rows).with(Style::rounded())).unwrap();

    out
}

fn write_title(out: &mut String, title: &str, colored: bool) {
    if colored {
        writeln!(out, "{}", title.bold()).unwrap();
    } else {
        writeln!(out, "{title}").unwrap();
    }
}

fn write_errors(out: &mut String, reports: &[ExpressionReport], colored: bool) {
    writeln!(out).unwrap();
    write_title(out, "Errors", colored);

    for report in reports {
        let Some(error) = &report.error else {
            continue;
        };
        if colored {
            writeln!(out, "  {} {}", report.input.bold(), error.red()).unwrap();
        } else {
            writeln!(out, "  {}: {error}", report.input).unwrap();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{generate_reports, list_signatures, GenerateOptions};
    use sqmgen_core::FunctionKind;

    #[test]
    fn test_format_reports() {
        let reports = generate_reports(
            &["count(*)".to_string(), "lower(1, 2)".to_string()],
            &GenerateOptions::default(),
        );
        let output = format_reports(&reports, false, false);

        assert!(output.starts_with("Generated Expressions\n"));
        assert!(output.contains("count(*)"));
        assert!(output.contains("INTEGER"));
        assert!(output.contains("Summary: 2 invocations | 1 generated | 1 failed"));
        assert!(output.contains("lower(1, 2): function lower() expects exactly 1 argument, got 2"));
    }

    #[test]
    fn test_quiet_omits_error_details() {
        let reports = generate_reports(&["lower(1, 2)".to_string()], &GenerateOptions::default());
        let output = format_reports(&reports, true, false);
        assert!(output.contains("error"));
        assert!(!output.contains("Errors"));
    }

    #[test]
    fn test_format_signatures() {
        let output = format_signatures(&list_signatures(Some(FunctionKind::Window)), false);
        assert!(output.contains("INTEGER row_number()"));
        assert!(output.contains("window"));
        assert!(!output.contains("aggregate"));
    }
}
