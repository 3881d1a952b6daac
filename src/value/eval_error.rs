use crate::ast;
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub EvalError

    IdentifierNotFound{name: String} = "identifier not found: {name}",
    AlreadyDeclared{name: String} = "identifier already declared: {name}",
    NotAnObject{key: String, type_name: &'static str} = "cannot read property `{key}` of {type_name}",
    MissingKey{key: String} = "object has no property `{key}`",
    NotIndexable{type_name: &'static str, index_type: &'static str} = "cannot index {type_name} with {index_type}",
    InvalidNegation{type_name: &'static str} = "cannot negate a non-boolean value: {type_name}",
    UnsupportedPrefix{operator: ast::ArithmeticOperator, type_name: &'static str} = "unsupported prefix operator: {operator}{type_name}",
    InvalidArithmetic{left: &'static str, operator: ast::ArithmeticOperator, right: &'static str} = "invalid binary expression: {left} {operator} {right}",
    InvalidComparison{left: &'static str, operator: ast::ComparisonOperator, right: &'static str} = "cannot compare {left} {operator} {right}",
    NotAContainer{type_name: &'static str} = "membership test needs an array or a string, got {type_name}",
    NotAFunction{type_name: &'static str} = "not a function: {type_name}",
    Host{message: String} = "{message}",
}

impl EvalError {
    /// Error raised from inside a host function.
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host {
            message: message.into(),
        }
    }
}
