//! Input nodes of a function invocation: typed arguments and shape-specific clauses.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::sql_type::SqlType;

/// An argument expression whose type may or may not be known yet.
///
/// Untyped nodes are parameters, NULL literals and column references the
/// caller could not resolve. Validators let them through and argument-type
/// resolvers may infer a type for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TypedNode {
    /// Source text of the expression.
    pub expression: String,

    /// Known type of the expression.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub sql_type: Option<SqlType>,
}

impl TypedNode {
    pub fn new(expression: impl Into<String>, sql_type: Option<SqlType>) -> Self {
        Self {
            expression: expression.into(),
            sql_type,
        }
    }

    pub fn typed(expression: impl Into<String>, sql_type: SqlType) -> Self {
        Self::new(expression, Some(sql_type))
    }

    pub fn untyped(expression: impl Into<String>) -> Self {
        Self::new(expression, None)
    }
}

/// A boolean condition, e.g. the body of `FILTER (WHERE ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Predicate {
    pub expression: String,
}

impl Predicate {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum NullPrecedence {
    First,
    Last,
}

/// One `expr [ASC|DESC] [NULLS FIRST|LAST]` item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SortSpecification {
    pub expression: TypedNode,
    #[serde(default)]
    pub direction: SortDirection,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<NullPrecedence>,
}

impl SortSpecification {
    pub fn ascending(expression: TypedNode) -> Self {
        Self {
            expression,
            direction: SortDirection::Ascending,
            nulls: None,
        }
    }

    pub fn descending(expression: TypedNode) -> Self {
        Self {
            expression,
            direction: SortDirection::Descending,
            nulls: None,
        }
    }

    pub fn with_nulls(mut self, nulls: NullPrecedence) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// Ordering clause, used for `WITHIN GROUP (ORDER BY ...)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct OrderByClause {
    pub items: Vec<SortSpecification>,
}

impl OrderByClause {
    pub fn new(items: Vec<SortSpecification>) -> Self {
        Self { items }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything the query compiler knows about one function invocation.
///
/// Which of the optional clauses are honoured depends on the entry point used
/// and on the descriptor's generator; the plain entry point ignores all of them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CallSite {
    /// Argument nodes in call order.
    #[serde(default)]
    pub arguments: Vec<TypedNode>,

    /// Result type expected by the surrounding expression, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implied_type: Option<SqlType>,

    /// `FILTER (WHERE ...)` predicate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,

    /// `WITHIN GROUP (ORDER BY ...)` clause.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within_group: Option<OrderByClause>,

    /// `RESPECT NULLS` (true) or `IGNORE NULLS` (false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_nulls: Option<bool>,

    /// `FROM FIRST` (true) or `FROM LAST` (false).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_first: Option<bool>,
}

impl CallSite {
    pub fn new(arguments: Vec<TypedNode>) -> Self {
        Self {
            arguments,
            ..Self::default()
        }
    }

    pub fn with_implied_type(mut self, implied_type: SqlType) -> Self {
        self.implied_type = Some(implied_type);
        self
    }

    pub fn with_filter(mut self, filter: Predicate) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_within_group(mut self, within_group: OrderByClause) -> Self {
        self.within_group = Some(within_group);
        self
    }

    pub fn with_respect_nulls(mut self, respect_nulls: bool) -> Self {
        self.respect_nulls = Some(respect_nulls);
        self
    }

    pub fn with_from_first(mut self, from_first: bool) -> Self {
        self.from_first = Some(from_first);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_site_builder() {
        let site = CallSite::new(vec![TypedNode::typed("price", SqlType::Float)])
            .with_filter(Predicate::new("qty > 1"))
            .with_respect_nulls(false);
        assert_eq!(site.arguments.len(), 1);
        assert_eq!(site.filter.as_ref().map(|p| p.expression.as_str()), Some("qty > 1"));
        assert_eq!(site.respect_nulls, Some(false));
        assert_eq!(site.from_first, None);
        assert!(site.within_group.is_none());
    }

    #[test]
    fn test_typed_node_serialization_skips_unknown_type() {
        let json = serde_json::to_string(&TypedNode::untyped("?")).unwrap();
        assert_eq!(json, r#"{"expression":"?"}"#);

        let json = serde_json::to_string(&TypedNode::typed("1", SqlType::Integer)).unwrap();
        assert_eq!(json, r#"{"expression":"1","type":"integer"}"#);
    }

    #[test]
    fn test_call_site_deserialization_defaults() {
        let site: CallSite = serde_json::from_str("{}").unwrap();
        assert_eq!(site, CallSite::default());
    }
}
