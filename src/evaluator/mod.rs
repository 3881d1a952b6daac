use crate::ast::{self, Expression, LogicalOperator};
use crate::environment::Environment;
use crate::value::{EvalError, Result, Value};
use tracing::trace;

mod operators;
pub use operators::loose_equals;
use operators::{eval_arithmetic_expression, eval_comparison_expression, eval_prefix_expression};

pub fn eval(expression: &Expression, env: &Environment) -> Result<Value> {
    trace!(kind = expression.kind_name(), "eval");

    match expression {
        Expression::Number(n) => Ok(Value::Number(*n)),
        Expression::String(s) => Ok(Value::String(s.value.clone())),
        Expression::Boolean(b) => Ok(Value::Boolean(*b)),
        Expression::Identifier(ident) => env.resolve(&ident.name).cloned(),
        Expression::Array(array) => eval_expressions(&array.elements, env).map(Value::Array),
        Expression::Member(member) => eval_member_expression(member, env),
        Expression::Index(index) => match eval_reference(&index.array, env) {
            Some(array) => {
                let array = array?;
                eval_index_expression(array, eval(&index.index, env)?)
            }
            None => {
                let array = eval(&index.array, env)?;
                eval_index_expression(&array, eval(&index.index, env)?)
            }
        },
        Expression::Not(not) => match eval(&not.operand, env)? {
            Value::Boolean(b) => Ok(Value::Boolean(!b)),
            other => Err(EvalError::InvalidNegation {
                type_name: other.type_name(),
            }),
        },
        Expression::Unary(unary) => {
            let operand = eval(&unary.operand, env)?;
            eval_prefix_expression(unary.operator, operand)
        }
        Expression::Binary(binary) => {
            let left = eval(&binary.left, env)?;
            let right = eval(&binary.right, env)?;
            eval_arithmetic_expression(binary.operator, left, right)
        }
        Expression::Comparison(comparison) => {
            let left = eval(&comparison.left, env)?;
            let right = eval(&comparison.right, env)?;
            eval_comparison_expression(comparison.operator, left, right)
        }
        Expression::Logical(logical) => eval_logical_expression(logical, env),
        Expression::Call(call) => eval_call_expression(call, env),
    }
}

fn eval_expressions(expressions: &[Expression], env: &Environment) -> Result<Vec<Value>> {
    expressions.iter().map(|e| eval(e, env)).collect()
}

/// Borrows the value an identifier or a member chain on one names straight
/// out of the environment, so that reading `user.id` leaves `user` in place.
/// `None` for any other expression.
fn eval_reference<'e>(
    expression: &Expression,
    env: &'e Environment,
) -> Option<Result<&'e Value>> {
    match expression {
        Expression::Identifier(ident) => Some(env.resolve(&ident.name)),
        Expression::Member(member) => Some(
            eval_reference(&member.object, env)?
                .and_then(|object| property(object, &member.property.name)),
        ),
        _ => None,
    }
}

fn property<'v>(object: &'v Value, key: &str) -> Result<&'v Value> {
    match object {
        Value::Object(map) => map.get(key).ok_or_else(|| EvalError::MissingKey {
            key: key.to_owned(),
        }),
        other => Err(EvalError::NotAnObject {
            key: key.to_owned(),
            type_name: other.type_name(),
        }),
    }
}

fn eval_member_expression(member: &ast::MemberExpression, env: &Environment) -> Result<Value> {
    let key = &member.property.name;
    match eval_reference(&member.object, env) {
        Some(object) => property(object?, key).cloned(),
        None => property(&eval(&member.object, env)?, key).cloned(),
    }
}

// Position of a numeric index inside a sequence of `len` items, if any.
fn position(index: f64, len: usize) -> Option<usize> {
    if index.fract() == 0.0 && index >= 0.0 && index < len as f64 {
        Some(index as usize)
    } else {
        None
    }
}

fn eval_index_expression(array: &Value, index: Value) -> Result<Value> {
    match (array, index) {
        (Value::Array(elements), Value::Number(i)) => Ok(position(i, elements.len())
            .and_then(|i| elements.get(i))
            .cloned()
            .unwrap_or_default()),
        (Value::String(s), Value::Number(i)) => Ok(position(i, s.chars().count())
            .and_then(|i| s.chars().nth(i))
            .map(|c| Value::String(c.to_string()))
            .unwrap_or_default()),
        (Value::Object(map), Value::String(key)) => map
            .get(&key)
            .cloned()
            .ok_or(EvalError::MissingKey { key }),
        (array, index) => Err(EvalError::NotIndexable {
            type_name: array.type_name(),
            index_type: index.type_name(),
        }),
    }
}

fn eval_logical_expression(logical: &ast::LogicalExpression, env: &Environment) -> Result<Value> {
    let left = eval(&logical.left, env)?;
    let short_circuits = match logical.operator {
        LogicalOperator::And => !left.truth_value(),
        LogicalOperator::Or => left.truth_value(),
        LogicalOperator::Nullish => !left.is_null(),
    };

    if short_circuits {
        Ok(left)
    } else {
        eval(&logical.right, env)
    }
}

fn eval_call_expression(call: &ast::CallExpression, env: &Environment) -> Result<Value> {
    let function = match eval(&call.callee, env)? {
        Value::Function(function) => function,
        other => {
            return Err(EvalError::NotAFunction {
                type_name: other.type_name(),
            })
        }
    };
    let arguments = eval_expressions(&call.arguments, env)?;

    function.call(arguments, env)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::parser::parse;
    use crate::value::ObjectMap;
    use std::cell::Cell;
    use std::rc::Rc;

    fn test_eval(input: &str) -> Result<Value> {
        let env = Environment::global();
        eval(&parse(input).expect("Parse errors found"), &env)
    }

    fn test_eval_in(input: &str, env: &Environment) -> Result<Value> {
        eval(&parse(input).expect("Parse errors found"), env)
    }

    fn user_env() -> Environment<'static> {
        let mut address = ObjectMap::new();
        address.insert("city".to_owned(), Value::from("Lyon"));

        let mut user = ObjectMap::new();
        user.insert("id".to_owned(), Value::from("1"));
        user.insert("address".to_owned(), Value::from(address));
        user.insert(
            "roles".to_owned(),
            Value::from(vec![Value::from("admin"), Value::from("dev")]),
        );

        let mut env = Environment::global();
        env.declare("user", Value::from(user)).unwrap();
        env
    }

    #[test]
    fn test_eval_number_expression() {
        let cases = vec![
            ("5", 5.0),
            ("-5", -5.0),
            ("1.5 + 1", 2.5),
            ("5 + 5 + 5 + 5 - 10", 10.0),
            ("2 * 2 * 2 * 2 * 2", 32.0),
            ("-50 + 100 + -50", 0.0),
            ("5 + 2 * 10", 25.0),
            ("20 + 2 * -10", 0.0),
            ("50 / 2 * 2 + 10", 60.0),
            ("2 * (5 + 10)", 30.0),
            ("(5 + 10 * 2 + 15 / 3) * 2 + -10", 50.0),
            ("7 % 4", 3.0),
            ("1 / 4", 0.25),
            ("true + false", 1.0),
            ("true + true", 2.0),
            ("+'3' * 2", 6.0),
            ("'6' / 2", 3.0),
            ("null + 1", 1.0),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval(input), Ok(Value::Number(expected)), "{}", input);
        }
    }

    #[test]
    fn test_eval_string_expression() {
        let cases = vec![
            ("'to' + 'to'", "toto"),
            ("1 + '1'", "11"),
            ("'a' + true", "atrue"),
            ("\"x\" + null", "xnull"),
            ("'a' + 1 + 2", "a12"),
            ("1 + 2 + 'a'", "3a"),
            ("'a' + 0.0000001", "a1e-7"),
            ("'' + 100000000000000000000000", "1e+23"),
            ("'' + 0.5", "0.5"),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval(input), Ok(Value::from(expected)), "{}", input);
        }
    }

    #[test]
    fn test_eval_boolean_expression() {
        let cases = vec![
            ("true", true),
            ("1 < 2", true),
            ("1 > 2", false),
            ("1 <= 1", true),
            ("2 >= 3", false),
            ("1 == 1", true),
            ("1 != 1", false),
            ("1 == '1'", true),
            ("1 === '1'", false),
            ("1 !== '1'", true),
            ("true == 1", true),
            ("null == false", false),
            ("null == null", true),
            ("'b' > 'a'", true),
            ("(1 < 2) == true", true),
            ("[1, 2] contains 1", true),
            ("3 not in [1]", true),
            ("3 in [1, 2, 3]", true),
            ("'1' in [1]", false),
            ("'ti' in 'titi'", true),
            ("'titi' not contains 'ta'", true),
            ("[1, [2]] == [1, [2]]", true),
            ("!true", false),
            ("!!false", false),
            ("not (1 > 2)", true),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval(input), Ok(Value::Boolean(expected)), "{}", input);
        }
    }

    #[test]
    fn test_eval_logical_expression() {
        let cases = vec![
            ("true and false", Value::from(false)),
            ("1 && 'a'", Value::from("a")),
            ("0 && 'a'", Value::from(0.0)),
            ("'' || 'b'", Value::from("b")),
            ("1 or 2", Value::from(1.0)),
            ("null ?? 2", Value::from(2.0)),
            ("0 ?? 2", Value::from(0.0)),
            ("false ?? 2", Value::from(false)),
            ("1 > 2 or 3 in [3]", Value::from(true)),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval(input), Ok(expected), "{}", input);
        }
    }

    #[test]
    fn test_short_circuit_skips_right_operand() {
        let cases = vec![
            "false and missing",
            "true or missing",
            "1 ?? missing",
        ];

        for input in cases.into_iter() {
            assert!(test_eval(input).is_ok(), "{}", input);
        }

        assert_eq!(
            test_eval("true and missing"),
            Err(EvalError::IdentifierNotFound {
                name: "missing".to_owned()
            })
        );
    }

    #[test]
    fn test_member_expression() {
        let env = user_env();
        let cases = vec![
            ("user.id", Value::from("1")),
            ("user.address.city", Value::from("Lyon")),
            ("user.id == 1", Value::from(true)),
            ("user.id === 1", Value::from(false)),
            ("'admin' in user.roles", Value::from(true)),
            ("user.roles[1]", Value::from("dev")),
            ("user['address']['city']", Value::from("Lyon")),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval_in(input, &env), Ok(expected), "{}", input);
        }
    }

    #[test]
    fn test_member_chain_borrows_from_environment() {
        let env = user_env();
        let address = match env.get("user") {
            Some(Value::Object(user)) => user.get("address"),
            _ => None,
        };

        let expression = parse("user.address").unwrap();
        let borrowed = eval_reference(&expression, &env).unwrap().unwrap();
        assert!(std::ptr::eq(borrowed, address.unwrap()));

        let expression = parse("user.address.zip").unwrap();
        assert_eq!(
            eval_reference(&expression, &env),
            Some(Err(EvalError::MissingKey {
                key: "zip".to_owned()
            }))
        );
        assert_eq!(eval_reference(&parse("[1][0]").unwrap(), &env), None);
    }

    #[test]
    fn test_index_expression() {
        let cases = vec![
            ("[1, 2, 3][0]", Value::from(1.0)),
            ("[1, 2, 3][2]", Value::from(3.0)),
            ("[1, 2, 3][3]", Value::Null),
            ("[1, 2, 3][-1]", Value::Null),
            ("[1, 2, 3][0.5]", Value::Null),
            ("'héllo'[1]", Value::from("é")),
            ("'abc'[5]", Value::Null),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval(input), Ok(expected), "{}", input);
        }
    }

    #[test]
    fn test_call_expression() {
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);

        let mut env = Environment::global();
        env.declare(
            "sum",
            Value::function(move |args, _| {
                counter.set(counter.get() + 1);
                let mut total = 0.0;
                for arg in args.iter() {
                    total += arg.to_number().ok_or_else(|| EvalError::host("not a number"))?;
                }
                Ok(Value::Number(total))
            }),
        )
        .unwrap();
        env.declare(
            "lookup",
            Value::function(|args, env| match args.first() {
                Some(Value::String(name)) => env.resolve(name).cloned(),
                _ => Err(EvalError::host("lookup needs a name")),
            }),
        )
        .unwrap();
        env.declare("two", Value::from(2.0)).unwrap();

        assert_eq!(test_eval_in("sum(1, two, 3)", &env), Ok(Value::from(6.0)));
        assert_eq!(test_eval_in("sum()", &env), Ok(Value::from(0.0)));
        assert_eq!(test_eval_in("lookup('two')", &env), Ok(Value::from(2.0)));
        assert_eq!(
            test_eval_in("sum([1])", &env),
            Err(EvalError::host("not a number"))
        );
        assert_eq!(calls.get(), 3);
    }

    #[test]
    fn test_shadowing() {
        let mut parent = Environment::global();
        parent.declare("x", Value::from(1.0)).unwrap();

        let mut child = Environment::with_enclosed(&parent);
        child.declare("x", Value::from(2.0)).unwrap();

        assert_eq!(test_eval_in("x", &child), Ok(Value::from(2.0)));
        assert_eq!(test_eval_in("x", &parent), Ok(Value::from(1.0)));
    }

    #[test]
    fn test_error_handling() {
        let env = user_env();
        let cases = vec![
            (
                "nonexistent",
                EvalError::IdentifierNotFound {
                    name: "nonexistent".to_owned(),
                },
            ),
            (
                "user.name",
                EvalError::MissingKey {
                    key: "name".to_owned(),
                },
            ),
            (
                "user.id.value",
                EvalError::NotAnObject {
                    key: "value".to_owned(),
                    type_name: "string",
                },
            ),
            (
                "!1",
                EvalError::InvalidNegation {
                    type_name: "number",
                },
            ),
            (
                "*1",
                EvalError::UnsupportedPrefix {
                    operator: ast::ArithmeticOperator::Asterisk,
                    type_name: "number",
                },
            ),
            (
                "-user",
                EvalError::UnsupportedPrefix {
                    operator: ast::ArithmeticOperator::Minus,
                    type_name: "object",
                },
            ),
            (
                "'a' - 'b'",
                EvalError::InvalidArithmetic {
                    left: "string",
                    operator: ast::ArithmeticOperator::Minus,
                    right: "string",
                },
            ),
            (
                "user.roles > 1",
                EvalError::InvalidComparison {
                    left: "array",
                    operator: ast::ComparisonOperator::GT,
                    right: "number",
                },
            ),
            (
                "1 in 1",
                EvalError::NotAContainer {
                    type_name: "number",
                },
            ),
            (
                "user.id(1)",
                EvalError::NotAFunction {
                    type_name: "string",
                },
            ),
            (
                "true[0]",
                EvalError::NotIndexable {
                    type_name: "boolean",
                    index_type: "number",
                },
            ),
            (
                "user[0]",
                EvalError::NotIndexable {
                    type_name: "object",
                    index_type: "number",
                },
            ),
        ];

        for (input, expected) in cases.into_iter() {
            assert_eq!(test_eval_in(input, &env), Err(expected), "{}", input);
        }
    }
}
