use super::Identifier;
use crate::token::TokenKind;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Number(f64),
    String(StringLiteral),
    Boolean(bool),
    Identifier(Identifier),
    Member(MemberExpression),
    Index(IndexExpression),
    Array(ArrayLiteral),
    Unary(UnaryExpression),
    Not(NotExpression),
    Binary(BinaryExpression),
    Comparison(ComparisonExpression),
    Logical(LogicalExpression),
    Call(CallExpression),
}

impl Display for Expression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{}", s),
            Self::Boolean(b) => write!(f, "{}", b),
            Self::Identifier(ident) => write!(f, "{}", ident),
            Self::Member(expr) => write!(f, "{}", expr),
            Self::Index(expr) => write!(f, "{}", expr),
            Self::Array(expr) => write!(f, "{}", expr),
            Self::Unary(expr) => write!(f, "{}", expr),
            Self::Not(expr) => write!(f, "{}", expr),
            Self::Binary(expr) => write!(f, "{}", expr),
            Self::Comparison(expr) => write!(f, "{}", expr),
            Self::Logical(expr) => write!(f, "{}", expr),
            Self::Call(expr) => write!(f, "{}", expr),
        }
    }
}

impl Expression {
    pub fn not(operand: Expression) -> Self {
        Self::Not(NotExpression {
            operand: Box::new(operand),
        })
    }

    /// Name of the node kind, for logs and diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Boolean(_) => "boolean",
            Self::Identifier(_) => "identifier",
            Self::Member(_) => "member",
            Self::Index(_) => "index",
            Self::Array(_) => "array",
            Self::Unary(_) => "unary",
            Self::Not(_) => "not",
            Self::Binary(_) => "binary",
            Self::Comparison(_) => "comparison",
            Self::Logical(_) => "logical",
            Self::Call(_) => "call",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ArithmeticOperator {
    #[strum(to_string = "+")]
    Plus,
    #[strum(to_string = "-")]
    Minus,
    #[strum(to_string = "*")]
    Asterisk,
    #[strum(to_string = "/")]
    Slash,
    #[strum(to_string = "%")]
    Percent,
}

impl ArithmeticOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Plus => Some(Self::Plus),
            TokenKind::Minus => Some(Self::Minus),
            TokenKind::Asterisk => Some(Self::Asterisk),
            TokenKind::Slash => Some(Self::Slash),
            TokenKind::Percent => Some(Self::Percent),
            _ => None,
        }
    }

    pub fn is_additive(self) -> bool {
        matches!(self, Self::Plus | Self::Minus)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum ComparisonOperator {
    #[strum(to_string = "==")]
    Eq,
    #[strum(to_string = "===")]
    StrictEq,
    #[strum(to_string = "!=")]
    NotEq,
    #[strum(to_string = "!==")]
    StrictNotEq,
    #[strum(to_string = ">")]
    GT,
    #[strum(to_string = ">=")]
    GTE,
    #[strum(to_string = "<")]
    LT,
    #[strum(to_string = "<=")]
    LTE,
    #[strum(to_string = "in")]
    In,
    #[strum(to_string = "contains")]
    Contains,
}

impl ComparisonOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::Eq => Some(Self::Eq),
            TokenKind::StrictEq => Some(Self::StrictEq),
            TokenKind::NotEq => Some(Self::NotEq),
            TokenKind::StrictNotEq => Some(Self::StrictNotEq),
            TokenKind::GT => Some(Self::GT),
            TokenKind::GTE => Some(Self::GTE),
            TokenKind::LT => Some(Self::LT),
            TokenKind::LTE => Some(Self::LTE),
            TokenKind::In => Some(Self::In),
            TokenKind::Contains => Some(Self::Contains),
            _ => None,
        }
    }

    pub fn is_membership(self) -> bool {
        matches!(self, Self::In | Self::Contains)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LogicalOperator {
    #[strum(to_string = "&&")]
    And,
    #[strum(to_string = "||")]
    Or,
    #[strum(to_string = "??")]
    Nullish,
}

impl LogicalOperator {
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::And => Some(Self::And),
            TokenKind::Or => Some(Self::Or),
            TokenKind::Nullish => Some(Self::Nullish),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quote {
    Single,
    Double,
}

impl Quote {
    pub fn as_char(self) -> char {
        match self {
            Self::Single => '\'',
            Self::Double => '"',
        }
    }

    /// Reads the quote style off a raw string lexeme.
    pub fn of_raw(raw: &str) -> Self {
        if raw.starts_with('\'') {
            Self::Single
        } else {
            Self::Double
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringLiteral {
    pub value: String,
    pub quote: Quote,
}

impl Display for StringLiteral {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let quote = self.quote.as_char();
        write!(f, "{}{}{}", quote, self.value, quote)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberExpression {
    pub object: Box<Expression>,
    pub property: Identifier,
}

impl Display for MemberExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "{}.{}", self.object, self.property)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexExpression {
    pub array: Box<Expression>,
    pub index: Box<Expression>,
}

impl Display for IndexExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}[{}])", self.array, self.index)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayLiteral {
    pub elements: Vec<Expression>,
}

impl Display for ArrayLiteral {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let elements: Vec<String> = self.elements.iter().map(Expression::to_string).collect();

        write!(f, "[{}]", elements.join(", "))
    }
}

impl From<Vec<Expression>> for ArrayLiteral {
    fn from(elements: Vec<Expression>) -> Self {
        Self { elements }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub operator: ArithmeticOperator,
    pub operand: Box<Expression>,
}

impl Display for UnaryExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({}{})", self.operator, self.operand)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotExpression {
    pub operand: Box<Expression>,
}

impl Display for NotExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "(not {})", self.operand)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub left: Box<Expression>,
    pub operator: ArithmeticOperator,
    pub right: Box<Expression>,
}

impl Display for BinaryExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpression {
    pub left: Box<Expression>,
    pub operator: ComparisonOperator,
    pub right: Box<Expression>,
}

impl Display for ComparisonExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpression {
    pub left: Box<Expression>,
    pub operator: LogicalOperator,
    pub right: Box<Expression>,
}

impl Display for LogicalExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "({} {} {})", self.left, self.operator, self.right)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub callee: Box<Expression>,
    pub arguments: Vec<Expression>,
}

impl Display for CallExpression {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        let arguments: Vec<String> = self.arguments.iter().map(Expression::to_string).collect();

        write!(f, "{}({})", self.callee, arguments.join(", "))
    }
}
