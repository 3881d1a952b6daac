use crate::environment::Environment;
use std::collections::BTreeMap;
use std::fmt::{self, Debug, Display, Formatter};
use std::rc::Rc;

mod eval_error;
pub use eval_error::EvalError;

mod convert;
pub use convert::ConversionError;

pub type Result<T> = std::result::Result<T, EvalError>;

pub type ObjectMap = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(ObjectMap),
    Function(HostFunction),
}

type Callable = dyn Fn(Vec<Value>, &Environment<'_>) -> Result<Value>;

/// A callable injected by the embedding host.
///
/// Two handles are equal only when they share the same closure.
#[derive(Clone)]
pub struct HostFunction(Rc<Callable>);

impl HostFunction {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(Vec<Value>, &Environment<'_>) -> Result<Value> + 'static,
    {
        Self(Rc::new(function))
    }

    pub fn call(&self, args: Vec<Value>, env: &Environment<'_>) -> Result<Value> {
        (self.0)(args, env)
    }
}

impl PartialEq for HostFunction {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for HostFunction {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "HostFunction")
    }
}

/// Spells a number the way JavaScript converts it to a string: plain
/// notation for magnitudes in `[1e-6, 1e21)`, exponent notation outside.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n == 0.0 {
        return "0".to_owned();
    }

    let sign = if n < 0.0 { "-" } else { "" };
    if n.is_infinite() {
        return format!("{}Infinity", sign);
    }

    // `{:e}` yields the shortest digits that read back as `n`
    let scientific = format!("{:e}", n.abs());
    match scientific.split_once('e') {
        Some((mantissa, exponent)) => match exponent.parse::<i32>() {
            Ok(exponent) => {
                let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
                format!("{}{}", sign, place_decimal_point(&digits, exponent + 1))
            }
            Err(_) => n.to_string(),
        },
        None => n.to_string(),
    }
}

// `digits` with the decimal point `point` places from its start.
fn place_decimal_point(digits: &str, point: i32) -> String {
    let len = digits.len() as i32;
    if len <= point && point <= 21 {
        format!("{}{}", digits, "0".repeat((point - len) as usize))
    } else if 0 < point && point <= 21 {
        let (integer, fraction) = digits.split_at(point as usize);
        format!("{}.{}", integer, fraction)
    } else if -6 < point && point <= 0 {
        format!("0.{}{}", "0".repeat(-point as usize), digits)
    } else {
        let exponent = point - 1;
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{}e{}{}", first, exponent_sign, exponent.abs())
        } else {
            format!("{}.{}e{}{}", first, rest, exponent_sign, exponent.abs())
        }
    }
}

// Numeric reading of a string: blank is 0, anything that is not a plain
// decimal literal is NaN.
fn string_to_number(s: &str) -> f64 {
    let trimmed = s.trim();
    match trimmed {
        "" => 0.0,
        "Infinity" | "+Infinity" => f64::INFINITY,
        "-Infinity" => f64::NEG_INFINITY,
        _ if trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-')) =>
        {
            trimmed.parse().unwrap_or(f64::NAN)
        }
        _ => f64::NAN,
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", format_number(*n)),
            Self::String(s) => write!(f, "{}", s),
            Self::Array(elements) => {
                let elements: Vec<String> = elements.iter().map(Value::to_string).collect();

                write!(f, "[{}]", elements.join(", "))
            }
            Self::Object(map) => {
                let pairs: Vec<String> = map
                    .iter()
                    .map(|(key, value)| format!("{}: {}", key, value))
                    .collect();

                write!(f, "{{{}}}", pairs.join(", "))
            }
            Self::Function(_) => write!(f, "function"),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::Null
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        s.to_owned().into()
    }
}

impl From<Vec<Value>> for Value {
    fn from(elements: Vec<Value>) -> Self {
        Self::Array(elements)
    }
}

impl From<ObjectMap> for Value {
    fn from(map: ObjectMap) -> Self {
        Self::Object(map)
    }
}

impl From<HostFunction> for Value {
    fn from(function: HostFunction) -> Self {
        Self::Function(function)
    }
}

impl Value {
    pub fn function<F>(function: F) -> Self
    where
        F: Fn(Vec<Value>, &Environment<'_>) -> Result<Value> + 'static,
    {
        HostFunction::new(function).into()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Function(_) => "function",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Numbers and booleans: the operands arithmetic accepts on their own.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Number(_) | Self::Boolean(_))
    }

    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Null | Self::Boolean(_) | Self::Number(_) | Self::String(_)
        )
    }

    pub fn truth_value(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Boolean(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::String(s) => !s.is_empty(),
            Self::Array(_) | Self::Object(_) | Self::Function(_) => true,
        }
    }

    /// Numeric coercion; compound values have none.
    pub fn to_number(&self) -> Option<f64> {
        match self {
            Self::Null => Some(0.0),
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Number(n) => Some(*n),
            Self::String(s) => Some(string_to_number(s)),
            Self::Array(_) | Self::Object(_) | Self::Function(_) => None,
        }
    }
}
