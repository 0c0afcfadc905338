use rstest::rstest;
use sqmgen_core::function::{return_types, validators};
use sqmgen_core::{standard_registry, Arity, FunctionDescriptor, ParameterType, SqlType};

#[test]
fn count_with_star_signature() {
    let count = FunctionDescriptor::builder("count")
        .arguments_validator(validators::with_signature(validators::between(0, 1), "(*)"))
        .build();
    assert_eq!(count.signature("count"), "count(*)");
}

#[rstest]
#[case::empty("()", "")]
#[case::pair("(a, b)", "[a, b]")]
#[case::single("(x)", "[x]")]
fn optional_parentheses_rewrite_argument_list(#[case] raw: &str, #[case] expected: &str) {
    let descriptor = FunctionDescriptor::builder("f")
        .arguments_validator(validators::with_signature(validators::none(), raw))
        .optional_parentheses()
        .build();
    assert_eq!(descriptor.argument_list_signature(), expected);
    assert_eq!(descriptor.signature("f"), format!("f{expected}"));
}

#[rstest]
#[case::empty("()")]
#[case::pair("(a, b)")]
fn mandatory_parentheses_render_as_is(#[case] raw: &str) {
    let descriptor = FunctionDescriptor::builder("f")
        .arguments_validator(validators::with_signature(validators::none(), raw))
        .build();
    assert_eq!(descriptor.argument_list_signature(), raw);
}

#[rstest]
#[case::invariant_return(
    FunctionDescriptor::builder("avg")
        .arguments_validator(validators::typed(Arity::exactly(1), vec![ParameterType::Numeric]))
        .return_type_resolver(return_types::invariant(SqlType::Float))
        .build(),
    "FLOAT avg(NUMERIC arg0)"
)]
#[case::argument_dependent_return(
    FunctionDescriptor::builder("coalesce")
        .arguments_validator(validators::min(1))
        .return_type_resolver(return_types::widest_argument_type())
        .build(),
    "coalesce(arg0[, ...])"
)]
#[case::defaults(FunctionDescriptor::new("anything"), "anything([arg0[, ...]])")]
#[case::optional_no_args(
    FunctionDescriptor::builder("current_date")
        .arguments_validator(validators::no_args())
        .return_type_resolver(return_types::invariant(SqlType::Date))
        .optional_parentheses()
        .build(),
    "DATE current_date"
)]
fn signature_combines_return_name_and_arguments(
    #[case] descriptor: FunctionDescriptor,
    #[case] expected: &str,
) {
    assert_eq!(descriptor.signature(descriptor.name()), expected);
}

#[test]
fn every_standard_function_renders_a_signature() {
    for (name, descriptor) in standard_registry().iter() {
        let signature = descriptor.signature(name);
        assert!(
            signature.contains(name),
            "signature '{signature}' does not mention '{name}'"
        );
        assert_eq!(signature, descriptor.signature(name));
    }
}
