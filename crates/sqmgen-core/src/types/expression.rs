//! Expression nodes produced by function descriptors.
//!
//! Every node wraps a [`FunctionCall`]. The richer shapes add the clauses a
//! generator chose to honour. Converting a plain call into a richer one via
//! `From<FunctionCall>` yields a node with all extras cleared, which is how
//! generators that only know the plain shape degrade.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::node::{OrderByClause, Predicate, TypedNode};
use super::sql_type::SqlType;

/// The four ways a function can be invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub enum InvocationShape {
    #[default]
    Plain,
    Aggregate,
    OrderedSetAggregate,
    Window,
}

impl fmt::Display for InvocationShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvocationShape::Plain => write!(f, "plain"),
            InvocationShape::Aggregate => write!(f, "aggregate"),
            InvocationShape::OrderedSetAggregate => write!(f, "ordered-set aggregate"),
            InvocationShape::Window => write!(f, "window"),
        }
    }
}

/// An argument after type resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedArgument {
    pub expression: TypedNode,

    /// Type inferred for an untyped argument from the function's parameter model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_type: Option<SqlType>,
}

impl ResolvedArgument {
    /// The argument's own type, falling back to the inferred one.
    pub fn effective_type(&self) -> Option<SqlType> {
        self.expression.sql_type.or(self.expected_type)
    }
}

/// A resolved invocation of a named function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FunctionCall {
    /// Name of the descriptor that produced the node.
    pub function: String,
    pub arguments: Vec<ResolvedArgument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_type: Option<SqlType>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregateCall {
    #[serde(flatten)]
    pub call: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
}

impl From<FunctionCall> for AggregateCall {
    fn from(call: FunctionCall) -> Self {
        Self { call, filter: None }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderedSetAggregateCall {
    #[serde(flatten)]
    pub call: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub within_group: Option<OrderByClause>,
}

impl From<FunctionCall> for OrderedSetAggregateCall {
    fn from(call: FunctionCall) -> Self {
        Self {
            call,
            filter: None,
            within_group: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WindowCall {
    #[serde(flatten)]
    pub call: FunctionCall,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Predicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub respect_nulls: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_first: Option<bool>,
}

impl From<FunctionCall> for WindowCall {
    fn from(call: FunctionCall) -> Self {
        Self {
            call,
            filter: None,
            respect_nulls: None,
            from_first: None,
        }
    }
}

/// A generated function expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum FunctionExpression {
    Plain(FunctionCall),
    Aggregate(AggregateCall),
    OrderedSetAggregate(OrderedSetAggregateCall),
    Window(WindowCall),
}

impl FunctionExpression {
    pub fn shape(&self) -> InvocationShape {
        match self {
            Self::Plain(_) => InvocationShape::Plain,
            Self::Aggregate(_) => InvocationShape::Aggregate,
            Self::OrderedSetAggregate(_) => InvocationShape::OrderedSetAggregate,
            Self::Window(_) => InvocationShape::Window,
        }
    }

    /// The underlying call, common to every shape.
    pub fn call(&self) -> &FunctionCall {
        match self {
            Self::Plain(call) => call,
            Self::Aggregate(agg) => &agg.call,
            Self::OrderedSetAggregate(agg) => &agg.call,
            Self::Window(window) => &window.call,
        }
    }

    pub fn function_name(&self) -> &str {
        &self.call().function
    }

    pub fn result_type(&self) -> Option<SqlType> {
        self.call().result_type
    }

    pub fn filter(&self) -> Option<&Predicate> {
        match self {
            Self::Plain(_) => None,
            Self::Aggregate(agg) => agg.filter.as_ref(),
            Self::OrderedSetAggregate(agg) => agg.filter.as_ref(),
            Self::Window(window) => window.filter.as_ref(),
        }
    }

    pub fn within_group(&self) -> Option<&OrderByClause> {
        match self {
            Self::OrderedSetAggregate(agg) => agg.within_group.as_ref(),
            _ => None,
        }
    }

    /// Returns true if the node carries `RESPECT/IGNORE NULLS` or `FROM FIRST/LAST`.
    pub fn has_frame_metadata(&self) -> bool {
        match self {
            Self::Window(window) => window.respect_nulls.is_some() || window.from_first.is_some(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call() -> FunctionCall {
        FunctionCall {
            function: "sum".to_string(),
            arguments: vec![ResolvedArgument {
                expression: TypedNode::typed("price", SqlType::Float),
                expected_type: None,
            }],
            result_type: Some(SqlType::Float),
        }
    }

    #[test]
    fn test_conversions_clear_extras() {
        let window = WindowCall::from(call());
        assert!(window.filter.is_none());
        assert!(window.respect_nulls.is_none());
        assert!(window.from_first.is_none());

        let ordered = OrderedSetAggregateCall::from(call());
        assert!(ordered.within_group.is_none());
        assert_eq!(ordered.call, call());
    }

    #[test]
    fn test_accessors() {
        let expr = FunctionExpression::Aggregate(AggregateCall {
            call: call(),
            filter: Some(Predicate::new("qty > 0")),
        });
        assert_eq!(expr.shape(), InvocationShape::Aggregate);
        assert_eq!(expr.function_name(), "sum");
        assert_eq!(expr.result_type(), Some(SqlType::Float));
        assert!(expr.filter().is_some());
        assert!(expr.within_group().is_none());
        assert!(!expr.has_frame_metadata());
    }

    #[test]
    fn test_serialization_is_tagged_by_shape() {
        let expr = FunctionExpression::Window(WindowCall {
            respect_nulls: Some(false),
            ..WindowCall::from(call())
        });
        let value = serde_json::to_value(&expr).unwrap();
        assert_eq!(value["shape"], "window");
        assert_eq!(value["function"], "sum");
        assert_eq!(value["respectNulls"], false);
        assert!(value.get("fromFirst").is_none());
    }

    #[test]
    fn test_effective_type_falls_back_to_expected() {
        let arg = ResolvedArgument {
            expression: TypedNode::untyped("?"),
            expected_type: Some(SqlType::Text),
        };
        assert_eq!(arg.effective_type(), Some(SqlType::Text));
    }
}
