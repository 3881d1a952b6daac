//! An embeddable expression language: tokenize and parse a one-line
//! expression, then either evaluate it against host data or render it as
//! JavaScript.

pub mod ast;
pub mod environment;
pub mod evaluator;
pub mod generator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;
pub mod value;

pub use ast::Expression;
pub use environment::Environment;
pub use generator::Generator;
pub use lexer::{LexError, Lexer};
pub use parser::{ParseError, Parser, MAX_DEPTH};
pub use token::{Token, TokenKind};
pub use value::{ConversionError, EvalError, HostFunction, ObjectMap, Value};

use custom_error::custom_error;
use serde::Serialize;
use tracing::debug;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub Error

    Parse{source: ParseError} = "parse error: {source}",
    Eval{source: EvalError} = "evaluation error: {source}",
    Conversion{source: ConversionError} = "{source}",
}

pub type Result<T> = std::result::Result<T, Error>;

pub fn tokenize(source: &str) -> std::result::Result<Vec<Token>, LexError> {
    lexer::tokenize(source)
}

pub fn parse(source: &str) -> std::result::Result<Expression, ParseError> {
    parser::parse(source)
}

/// Parses `source` and renders it as JavaScript.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source))]
pub fn compile(source: &str) -> std::result::Result<String, ParseError> {
    let code = generator::generate(&parser::parse(source)?);
    debug!(%code, "compiled");
    Ok(code)
}

/// Evaluates `source` with only the global bindings.
pub fn evaluate(source: &str) -> Result<Value> {
    evaluate_in(source, &Environment::global())
}

/// Evaluates `source` with each `(name, value)` pair bound in the global
/// scope. Values go through [`Value::from_host`].
#[tracing::instrument(level = "debug", skip_all, fields(source = %source))]
pub fn evaluate_with<I, K, V>(source: &str, bindings: I) -> Result<Value>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Serialize,
{
    let expression = parser::parse(source)?;

    let mut env = Environment::global();
    for (name, value) in bindings {
        let name = name.into();
        let value = Value::from_host(&name, &value)?;
        env.declare(name, value)?;
    }

    let value = evaluator::eval(&expression, &env)?;
    debug!(%value, "evaluated");
    Ok(value)
}

/// Evaluates `source` against a caller-built environment, typically one
/// holding host functions. Start from [`Environment::global`] to keep
/// `true`, `false` and `null` bound.
#[tracing::instrument(level = "debug", skip_all, fields(source = %source))]
pub fn evaluate_in(source: &str, env: &Environment) -> Result<Value> {
    let expression = parser::parse(source)?;
    let value = evaluator::eval(&expression, env)?;
    debug!(%value, "evaluated");
    Ok(value)
}
