use jsexpr::{
    compile, evaluate, evaluate_in, evaluate_with, parse, tokenize, Environment, Error,
    EvalError, ParseError, TokenKind, Value, MAX_DEPTH,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::collections::HashMap;

fn no_bindings() -> Vec<(&'static str, serde_json::Value)> {
    Vec::new()
}

#[test]
fn test_boolean_arithmetic() {
    assert_eq!(evaluate("true + false"), Ok(Value::Number(1.0)));
    assert_eq!(evaluate_with("true + false", no_bindings()), Ok(Value::Number(1.0)));
}

#[test]
fn test_loose_and_strict_equality_on_bindings() {
    let cases = vec![
        ("user.id == 1", json!({"id": "1"}), true),
        ("user.id === 1", json!({"id": 1}), true),
        ("user.id === 1", json!({"id": "1"}), false),
        ("user.id !== '1'", json!({"id": "1"}), false),
        ("user.address.city == 'Lyon'", json!({"address": {"city": "Lyon"}}), true),
    ];

    for (input, user, expected) in cases.into_iter() {
        assert_eq!(
            evaluate_with(input, vec![("user", user)]),
            Ok(Value::Boolean(expected)),
            "{}",
            input
        );
    }

    assert_eq!(
        evaluate_with("user.manager ?? 'none'", vec![("user", json!({"manager": null}))]),
        Ok(Value::from("none"))
    );
}

#[test]
fn test_membership() {
    assert_eq!(evaluate("[1,2] contains 1"), Ok(Value::Boolean(true)));
    assert_eq!(evaluate("3 not in [1]"), Ok(Value::Boolean(true)));
    assert_eq!(
        evaluate_with("'admin' in user.roles", vec![("user", json!({"roles": ["admin"]}))]),
        Ok(Value::Boolean(true))
    );
    assert_eq!(
        evaluate_with("name contains 'oto'", vec![("name", "toto")]),
        Ok(Value::Boolean(true))
    );
}

#[test]
fn test_compile() {
    assert_eq!(compile("5 in [1, 2]"), Ok("[1,2].includes(5)".to_owned()));
    assert_eq!(
        compile("user.id == 1 and not (user.age < 18)"),
        Ok("user.id==1&&!(user.age<18)".to_owned())
    );
}

#[test]
fn test_parse_errors() {
    assert!(matches!(parse("1 +"), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(
        parse("1 not 1"),
        Err(ParseError::MalformedNegation { .. })
    ));
    assert!(matches!(compile("1 +"), Err(ParseError::UnexpectedEof { .. })));
    assert!(matches!(
        evaluate("1 # 2"),
        Err(Error::Parse {
            source: ParseError::Lex { .. }
        })
    ));
}

#[test]
fn test_deep_nesting() {
    let nested = format!("{}1{}", "(".repeat(1000), ")".repeat(1000));
    assert!(matches!(
        evaluate(&nested),
        Err(Error::Parse {
            source: ParseError::TooDeep { .. }
        })
    ));
    assert!(matches!(
        compile(&format!("{}true", "!".repeat(1000))),
        Err(ParseError::TooDeep { .. })
    ));

    let deepest = format!("{}true", "!".repeat(MAX_DEPTH - 1));
    assert_eq!(evaluate(&deepest), Ok(Value::Boolean(false)));
    assert!(compile(&deepest).is_ok());

    let chain = format!("1{}", " + 1".repeat(MAX_DEPTH - 1));
    assert_eq!(evaluate(&chain), Ok(Value::Number(MAX_DEPTH as f64)));
}

#[test]
fn test_eval_errors() {
    assert_eq!(
        evaluate("nonexistent"),
        Err(Error::Eval {
            source: EvalError::IdentifierNotFound {
                name: "nonexistent".to_owned()
            }
        })
    );
    assert_eq!(
        evaluate_with("null", vec![("null", 1)]),
        Err(Error::Eval {
            source: EvalError::AlreadyDeclared {
                name: "null".to_owned()
            }
        })
    );
    assert_eq!(
        evaluate("nonexistent").unwrap_err().to_string(),
        "evaluation error: identifier not found: nonexistent"
    );
}

#[test]
fn test_conversion_errors() {
    let mut pairs = HashMap::new();
    pairs.insert((1, 2), "pair");

    assert!(matches!(
        evaluate_with("pairs", vec![("pairs", pairs)]),
        Err(Error::Conversion { .. })
    ));
}

#[test]
fn test_shadowing() {
    let mut parent = Environment::global();
    parent.declare("x", Value::from("parent")).unwrap();

    let mut child = Environment::with_enclosed(&parent);
    child.declare("x", Value::from("child")).unwrap();

    assert_eq!(evaluate_in("x", &child), Ok(Value::from("child")));
    assert_eq!(evaluate_in("x + '!'", &parent), Ok(Value::from("parent!")));
}

#[test]
fn test_host_functions() {
    let mut env = Environment::global();
    env.declare(
        "upper",
        Value::function(|args, _| match args.as_slice() {
            [Value::String(s)] => Ok(Value::from(s.to_uppercase())),
            _ => Err(EvalError::host("upper takes one string")),
        }),
    )
    .unwrap();
    env.declare("name", Value::from("toto")).unwrap();

    assert_eq!(evaluate_in("upper(name) == 'TOTO'", &env), Ok(Value::Boolean(true)));
    assert_eq!(
        evaluate_in("upper(1)", &env),
        Err(Error::Eval {
            source: EvalError::host("upper takes one string")
        })
    );
    assert_eq!(
        evaluate_in("name(1)", &env),
        Err(Error::Eval {
            source: EvalError::NotAFunction {
                type_name: "string"
            }
        })
    );
}

#[test]
fn test_tokenize() {
    let kinds: Vec<TokenKind> = tokenize("a.b not in [1]")
        .unwrap()
        .into_iter()
        .map(|token| token.kind)
        .collect();

    assert_eq!(
        kinds,
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Not,
            TokenKind::In,
            TokenKind::LBracket,
            TokenKind::Number,
            TokenKind::RBracket,
        ]
    );
}
