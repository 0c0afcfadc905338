//! Built-in registry of common ANSI functions.

use std::sync::LazyLock;

use super::descriptor::{FunctionDescriptor, FunctionKind};
use super::registry::FunctionRegistry;
use super::validators::{Arity, ParameterType};
use super::{argument_types, return_types, validators};
use crate::types::SqlType;

static STANDARD_REGISTRY: LazyLock<FunctionRegistry> = LazyLock::new(build_standard_registry);

/// Registry with the aggregate, scalar, window and ordered-set functions most
/// dialects share. Built on first use.
pub fn standard_registry() -> &'static FunctionRegistry {
    &STANDARD_REGISTRY
}

fn build_standard_registry() -> FunctionRegistry {
    use FunctionKind::{Aggregate, OrderedSetAggregate, Window};
    use ParameterType::{Any, Comparable, Integer, Numeric};

    FunctionRegistry::builder()
        // Aggregates
        .register(
            FunctionDescriptor::builder("count")
                .kind(Aggregate)
                .arguments_validator(validators::with_signature(validators::max(1), "(*)"))
                .return_type_resolver(return_types::invariant(SqlType::Integer))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("sum")
                .kind(Aggregate)
                .arguments_validator(validators::typed(Arity::exactly(1), vec![Numeric]))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("avg")
                .kind(Aggregate)
                .arguments_validator(validators::typed(Arity::exactly(1), vec![Numeric]))
                .return_type_resolver(return_types::invariant(SqlType::Float))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("min")
                .kind(Aggregate)
                .arguments_validator(validators::typed(Arity::exactly(1), vec![Comparable]))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("max")
                .kind(Aggregate)
                .arguments_validator(validators::typed(Arity::exactly(1), vec![Comparable]))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("any_value")
                .kind(Aggregate)
                .arguments_validator(validators::exactly(1))
                .build(),
        )
        // Scalars
        .register(
            FunctionDescriptor::builder("coalesce")
                .arguments_validator(validators::min(1))
                .return_type_resolver(return_types::widest_argument_type())
                .argument_type_resolver(argument_types::first_typed())
                .build(),
        )
        .register(
            FunctionDescriptor::builder("nullif")
                .arguments_validator(validators::exactly(2))
                .return_type_resolver(return_types::use_argument_type(0))
                .argument_type_resolver(argument_types::first_typed())
                .build(),
        )
        .register(
            FunctionDescriptor::builder("lower")
                .arguments_validator(validators::typed(
                    Arity::exactly(1),
                    vec![ParameterType::String],
                ))
                .return_type_resolver(return_types::invariant(SqlType::Text))
                .argument_type_resolver(argument_types::invariant(vec![SqlType::Text]))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("upper")
                .arguments_validator(validators::typed(
                    Arity::exactly(1),
                    vec![ParameterType::String],
                ))
                .return_type_resolver(return_types::invariant(SqlType::Text))
                .argument_type_resolver(argument_types::invariant(vec![SqlType::Text]))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("length")
                .arguments_validator(validators::typed(
                    Arity::exactly(1),
                    vec![ParameterType::String],
                ))
                .return_type_resolver(return_types::invariant(SqlType::Integer))
                .argument_type_resolver(argument_types::invariant(vec![SqlType::Text]))
                .build(),
        )
        .register_alias("character_length", "length")
        .register_alias("char_length", "length")
        .register(
            FunctionDescriptor::builder("concat")
                .arguments_validator(validators::min(1))
                .return_type_resolver(return_types::invariant(SqlType::Text))
                .argument_type_resolver(argument_types::invariant(vec![SqlType::Text]))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("substring")
                .arguments_validator(validators::typed(
                    Arity::between(2, 3),
                    vec![ParameterType::String, Integer],
                ))
                .return_type_resolver(return_types::invariant(SqlType::Text))
                .argument_type_resolver(argument_types::invariant(vec![
                    SqlType::Text,
                    SqlType::Integer,
                ]))
                .build(),
        )
        .register_alias("substr", "substring")
        .register(
            FunctionDescriptor::builder("abs")
                .arguments_validator(validators::typed(Arity::exactly(1), vec![Numeric]))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("current_timestamp")
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::invariant(SqlType::Timestamp))
                .optional_parentheses()
                .build(),
        )
        .register(
            FunctionDescriptor::builder("current_date")
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::invariant(SqlType::Date))
                .optional_parentheses()
                .build(),
        )
        // Window functions
        .register(
            FunctionDescriptor::builder("row_number")
                .kind(Window)
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::invariant(SqlType::Integer))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("rank")
                .kind(Window)
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::invariant(SqlType::Integer))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("dense_rank")
                .kind(Window)
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::invariant(SqlType::Integer))
                .build(),
        )
        .register(offset_function("lag"))
        .register(offset_function("lead"))
        .register(
            FunctionDescriptor::builder("first_value")
                .kind(Window)
                .arguments_validator(validators::exactly(1))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("last_value")
                .kind(Window)
                .arguments_validator(validators::exactly(1))
                .return_type_resolver(return_types::use_argument_type(0))
                .build(),
        )
        .register(
            FunctionDescriptor::builder("nth_value")
                .kind(Window)
                .arguments_validator(validators::typed(Arity::exactly(2), vec![Any, Integer]))
                .return_type_resolver(return_types::use_argument_type(0))
                .argument_type_resolver(argument_types::positional(vec![
                    argument_types::none(),
                    argument_types::invariant(vec![SqlType::Integer]),
                ]))
                .build(),
        )
        // Ordered-set aggregates
        .register(percentile(
            "percentile_cont",
            return_types::invariant(SqlType::Float),
        ))
        .register(percentile("percentile_disc", return_types::implied()))
        .register(
            FunctionDescriptor::builder("mode")
                .kind(OrderedSetAggregate)
                .arguments_validator(validators::no_args())
                .return_type_resolver(return_types::implied())
                .build(),
        )
        .register(
            FunctionDescriptor::builder("listagg")
                .kind(OrderedSetAggregate)
                .arguments_validator(validators::typed(
                    Arity::between(1, 2),
                    vec![Any, ParameterType::String],
                ))
                .return_type_resolver(return_types::invariant(SqlType::Text))
                .argument_type_resolver(argument_types::invariant(vec![SqlType::Text]))
                .build(),
        )
        .build()
}

/// `lag`/`lead(value[, offset[, default]])`.
fn offset_function(name: &str) -> FunctionDescriptor {
    FunctionDescriptor::builder(name)
        .kind(FunctionKind::Window)
        .arguments_validator(validators::typed(
            Arity::between(1, 3),
            vec![ParameterType::Any, ParameterType::Integer, ParameterType::Any],
        ))
        .return_type_resolver(return_types::use_argument_type(0))
        .argument_type_resolver(argument_types::positional(vec![
            argument_types::from_argument(2),
            argument_types::invariant(vec![SqlType::Integer]),
            argument_types::from_argument(0),
        ]))
        .build()
}

/// `percentile_cont`/`percentile_disc(fraction) WITHIN GROUP (ORDER BY ...)`.
fn percentile(
    name: &str,
    return_type: std::sync::Arc<dyn return_types::ReturnTypeResolver>,
) -> FunctionDescriptor {
    FunctionDescriptor::builder(name)
        .kind(FunctionKind::OrderedSetAggregate)
        .arguments_validator(validators::typed(
            Arity::exactly(1),
            vec![ParameterType::Numeric],
        ))
        .return_type_resolver(return_type)
        .argument_type_resolver(argument_types::invariant(vec![SqlType::Float]))
        .build()
}
