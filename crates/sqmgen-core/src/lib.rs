pub mod error;
pub mod function;
pub mod parser;
pub mod types;

// Re-export main types and functions
pub use error::{FunctionError, ParseError, ParseErrorKind, Position};
pub use function::{
    standard_registry, ArgumentTypeResolver, ArgumentsValidator, Arity, ExpressionGenerator,
    FunctionDescriptor, FunctionDescriptorBuilder, FunctionKind, FunctionRegistry,
    FunctionRegistryBuilder, ParameterType, ReturnTypeResolver, StandardFunctionGenerator,
};
pub use parser::{parse_invocation, ColumnTypes, ParsedInvocation};

pub use types::{
    can_implicitly_cast,
    normalize_type_name,
    // Generated nodes
    AggregateCall,
    // Inputs
    CallSite,
    Dialect,
    FunctionCall,
    FunctionExpression,
    InvocationShape,
    NullPrecedence,
    OrderByClause,
    OrderedSetAggregateCall,
    Predicate,
    ResolvedArgument,
    SortDirection,
    SortSpecification,
    SqlType,
    TypeContext,
    TypedNode,
    WindowCall,
};
