//! Runs invocations through the parser and the standard registry.

use serde::Serialize;
use sqmgen_core::{
    parse_invocation, standard_registry, ColumnTypes, Dialect, FunctionExpression, FunctionKind,
    InvocationShape, SqlType, TypeContext,
};

/// Settings shared by every invocation in one run.
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    pub dialect: Dialect,
    pub columns: ColumnTypes,
    pub implied_type: Option<SqlType>,
    pub strict: bool,
}

impl GenerateOptions {
    fn type_context(&self) -> TypeContext {
        let ctx = TypeContext::new(self.dialect);
        if self.strict {
            ctx.strict()
        } else {
            ctx
        }
    }
}

/// Outcome for one invocation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionReport {
    /// The invocation as given.
    pub input: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<InvocationShape>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<FunctionExpression>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExpressionReport {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// One row of `--list` output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureEntry {
    pub name: String,
    pub kind: FunctionKind,
    pub signature: String,
}

pub fn generate_reports(
    expressions: &[String],
    options: &GenerateOptions,
) -> Vec<ExpressionReport> {
    let ctx = options.type_context();
    expressions
        .iter()
        .map(|expression| generate_report(expression, options, &ctx))
        .collect()
}

fn generate_report(input: &str, options: &GenerateOptions, ctx: &TypeContext) -> ExpressionReport {
    let mut report = ExpressionReport {
        input: input.to_string(),
        shape: None,
        signature: None,
        node: None,
        error: None,
    };

    let mut parsed = match parse_invocation(input, options.dialect, &options.columns) {
        Ok(parsed) => parsed,
        Err(err) => {
            report.error = Some(err.to_string());
            return report;
        }
    };
    if let Some(implied_type) = options.implied_type {
        parsed.call_site.implied_type = Some(implied_type);
    }

    let registry = standard_registry();
    report.shape = Some(parsed.shape);
    report.signature = registry.signature(&parsed.name);
    match registry.generate(&parsed.name, parsed.shape, &parsed.call_site, ctx) {
        Ok(node) => report.node = Some(node),
        Err(err) => report.error = Some(err.to_string()),
    }
    report
}

/// Signatures of the standard registry, optionally filtered by kind.
pub fn list_signatures(kind: Option<FunctionKind>) -> Vec<SignatureEntry> {
    standard_registry()
        .iter()
        .filter(|(_, descriptor)| kind.map_or(true, |wanted| wanted == descriptor.kind()))
        .map(|(name, descriptor)| SignatureEntry {
            name: name.to_string(),
            kind: descriptor.kind(),
            signature: descriptor.signature(name),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> GenerateOptions {
        GenerateOptions {
            columns: ColumnTypes::from([("price".to_string(), SqlType::Float)]),
            ..GenerateOptions::default()
        }
    }

    #[test]
    fn test_successful_report() {
        let reports = generate_reports(&["sum(price)".to_string()], &options());
        let report = &reports[0];
        assert!(!report.is_error());
        assert_eq!(report.shape, Some(InvocationShape::Plain));
        assert_eq!(report.signature.as_deref(), Some("sum(NUMERIC arg0)"));
        assert_eq!(
            report.node.as_ref().and_then(|node| node.result_type()),
            Some(SqlType::Float)
        );
    }

    #[test]
    fn test_error_reports() {
        let reports = generate_reports(
            &["lower(price)".to_string(), "1 + 1".to_string()],
            &options(),
        );
        assert_eq!(
            reports[0].error.as_deref(),
            Some("argument 1 of function lower() must be STRING, but has type FLOAT")
        );
        assert!(reports[0].node.is_none());
        assert!(reports[1].is_error());
        assert!(reports[1].shape.is_none());
    }

    #[test]
    fn test_implied_type_and_strict() {
        let mut options = options();
        options.implied_type = Some(SqlType::Float);
        let reports = generate_reports(&["count(*)".to_string()], &options);
        assert_eq!(
            reports[0].node.as_ref().and_then(|node| node.result_type()),
            Some(SqlType::Float)
        );

        options.strict = true;
        let reports = generate_reports(&["count(*)".to_string()], &options);
        assert_eq!(
            reports[0].node.as_ref().and_then(|node| node.result_type()),
            Some(SqlType::Integer)
        );
    }

    #[test]
    fn test_list_signatures_by_kind() {
        let windows = list_signatures(Some(FunctionKind::Window));
        assert!(windows.iter().all(|entry| entry.kind == FunctionKind::Window));
        assert!(windows
            .iter()
            .any(|entry| entry.signature == "INTEGER row_number()"));
        assert!(list_signatures(None).len() > windows.len());
    }
}
