use rstest::rstest;
use sqmgen_core::{
    parse_invocation, standard_registry, ColumnTypes, Dialect, FunctionError, FunctionKind,
    InvocationShape, ParameterType, SqlType, TypeContext,
};

fn columns() -> ColumnTypes {
    ColumnTypes::from([
        ("price".to_string(), SqlType::Float),
        ("qty".to_string(), SqlType::Integer),
        ("name".to_string(), SqlType::Text),
        ("shipped_on".to_string(), SqlType::Date),
        ("paid".to_string(), SqlType::Boolean),
    ])
}

fn generate(sql: &str) -> Result<sqmgen_core::FunctionExpression, FunctionError> {
    let parsed = parse_invocation(sql, Dialect::Generic, &columns()).unwrap();
    standard_registry().generate(
        &parsed.name,
        parsed.shape,
        &parsed.call_site,
        &TypeContext::default(),
    )
}

#[rstest]
#[case("count(*)", InvocationShape::Plain, Some(SqlType::Integer))]
#[case("COUNT(qty) FILTER (WHERE paid)", InvocationShape::Aggregate, Some(SqlType::Integer))]
#[case("sum(qty)", InvocationShape::Plain, Some(SqlType::Integer))]
#[case("avg(qty)", InvocationShape::Plain, Some(SqlType::Float))]
#[case("max(shipped_on)", InvocationShape::Plain, Some(SqlType::Date))]
#[case("coalesce(qty, price, ?)", InvocationShape::Plain, Some(SqlType::Float))]
#[case("upper(name)", InvocationShape::Plain, Some(SqlType::Text))]
#[case("char_length(name)", InvocationShape::Plain, Some(SqlType::Integer))]
#[case("current_date", InvocationShape::Plain, Some(SqlType::Date))]
#[case("rank() OVER (ORDER BY price)", InvocationShape::Window, Some(SqlType::Integer))]
#[case("lead(price, 1) OVER (ORDER BY shipped_on)", InvocationShape::Window, Some(SqlType::Float))]
#[case(
    "percentile_cont(0.9) WITHIN GROUP (ORDER BY price)",
    InvocationShape::OrderedSetAggregate,
    Some(SqlType::Float)
)]
#[case(
    "mode() WITHIN GROUP (ORDER BY price)",
    InvocationShape::OrderedSetAggregate,
    Some(SqlType::Float)
)]
#[case(
    "percentile_disc(0.5) WITHIN GROUP (ORDER BY shipped_on)",
    InvocationShape::OrderedSetAggregate,
    Some(SqlType::Date)
)]
#[case(
    "listagg(name, ', ') WITHIN GROUP (ORDER BY name)",
    InvocationShape::OrderedSetAggregate,
    Some(SqlType::Text)
)]
fn standard_functions_generate(
    #[case] sql: &str,
    #[case] shape: InvocationShape,
    #[case] result_type: Option<SqlType>,
) {
    let node = generate(sql).unwrap();
    assert_eq!(node.shape(), shape);
    assert_eq!(node.result_type(), result_type);
}

#[rstest]
#[case("lower(name, name)", "function lower() expects exactly 1 argument, got 2")]
#[case("sum(name)", "argument 1 of function sum() must be NUMERIC, but has type TEXT")]
#[case("row_number(qty) OVER ()", "function row_number() expects exactly 0 arguments, got 1")]
#[case(
    "coalesce(shipped_on, paid)",
    "cannot resolve return type of coalesce(): arguments of type DATE and BOOLEAN have no common type"
)]
#[case("no_such_fn(1)", "unknown function 'no_such_fn'")]
fn standard_function_errors(#[case] sql: &str, #[case] message: &str) {
    assert_eq!(generate(sql).unwrap_err().to_string(), message);
}

#[test]
fn aggregate_filter_survives_for_aggregate_functions_only() {
    let count = generate("count(*) FILTER (WHERE paid)").unwrap();
    assert_eq!(count.filter().map(|p| p.expression.as_str()), Some("paid"));

    let upper = generate("upper(name) FILTER (WHERE paid)").unwrap();
    assert_eq!(upper.shape(), InvocationShape::Aggregate);
    assert_eq!(upper.filter(), None);
}

#[test]
fn untyped_arguments_get_expected_types() {
    let node = generate("coalesce(?, price)").unwrap();
    assert_eq!(node.call().arguments[0].expected_type, Some(SqlType::Float));
    assert_eq!(node.call().arguments[0].effective_type(), Some(SqlType::Float));
}

#[test]
fn registry_kinds_cover_every_shape() {
    let kinds: Vec<FunctionKind> = standard_registry()
        .iter()
        .map(|(_, descriptor)| descriptor.kind())
        .collect();
    for kind in [
        FunctionKind::Scalar,
        FunctionKind::Aggregate,
        FunctionKind::OrderedSetAggregate,
        FunctionKind::Window,
    ] {
        assert!(kinds.contains(&kind), "no {kind} function registered");
    }
}

#[test]
fn type_context_schema_is_camel_case() {
    let schema = serde_json::to_value(schemars::schema_for!(TypeContext)).unwrap();
    let properties = schema["properties"].as_object().unwrap();
    assert!(properties.contains_key("dialect"));
    assert!(properties.contains_key("implicitCasts"));
}

#[rstest]
#[case(Dialect::Postgres, false)]
#[case(Dialect::Generic, false)]
#[case(Dialect::Mysql, true)]
#[case(Dialect::Sqlite, true)]
fn boolean_integer_arguments_follow_dialect(#[case] dialect: Dialect, #[case] accepted: bool) {
    let parsed = parse_invocation("substring(name, paid)", dialect, &columns()).unwrap();
    let result = standard_registry().generate(
        &parsed.name,
        parsed.shape,
        &parsed.call_site,
        &TypeContext::new(dialect),
    );

    if accepted {
        assert_eq!(result.unwrap().result_type(), Some(SqlType::Text));
    } else {
        assert_eq!(
            result.unwrap_err(),
            FunctionError::ArgumentType {
                function: "substring".to_string(),
                position: 1,
                expected: ParameterType::Integer,
                actual: SqlType::Boolean,
            }
        );
    }
}
