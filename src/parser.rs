use crate::ast::{
    ArithmeticOperator, BinaryExpression, CallExpression, ComparisonExpression, ComparisonOperator,
    Expression, IndexExpression, LogicalExpression, LogicalOperator, MemberExpression, Quote,
    StringLiteral, UnaryExpression,
};
use crate::lexer::{self, LexError};
use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use std::iter::Peekable;
use std::vec::IntoIter;
use tracing::trace;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub ParseError

    Lex{source: LexError} = "{source}",
    UnexpectedToken{expected: String, found: String} = "expected {expected}, found {found}",
    UnexpectedEof{expected: String} = "expected {expected}, found end of input",
    MalformedNegation{found: String} = "expected `in` or `contains` after `not`, found {found}",
    EmptyArray = "array literals need at least one element",
    TooDeep{limit: usize} = "expression nests deeper than {limit} levels",
}

/// Deepest nesting the parser accepts, counted both as open groups and
/// prefixes while parsing and as the height of the resulting tree.
pub const MAX_DEPTH: usize = 64;

pub type Result<T> = std::result::Result<T, ParseError>;

fn describe(token: &Token) -> String {
    match token.kind {
        TokenKind::Identifier | TokenKind::Number | TokenKind::String | TokenKind::Boolean => {
            format!("{} `{}`", token.kind, token.raw)
        }
        kind => kind.to_string(),
    }
}

fn unexpected(expected: impl Into<String>, token: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.into(),
        found: describe(token),
    }
}

/// Recursive-descent parser for a single expression.
///
/// Grammar levels, loosest binding first: `or`/`??`, `and`, comparison
/// (right-associative, with `not in`/`not contains`), additive,
/// multiplicative, prefix operators, postfix chains (`.`, `[]`, `()`), and
/// primaries.
pub struct Parser {
    tokens: Peekable<IntoIter<Token>>,
    // nested calls to `parse_expression`, prefix operands and chained
    // comparisons currently open
    depth: usize,
    // height of the tree last returned by a `parse_*` method
    height: usize,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into_iter().peekable(),
            depth: 0,
            height: 0,
        }
    }

    /// Parses the whole token stream as one expression.
    pub fn parse_expression_root(mut self) -> Result<Expression> {
        let expression = self.parse_expression()?;

        match self.tokens.next() {
            Some(token) => Err(unexpected("end of input", &token)),
            None => Ok(expression),
        }
    }

    fn parse_expression(&mut self) -> Result<Expression> {
        self.descend()?;
        let expression = self.parse_or()?;
        self.depth -= 1;
        Ok(expression)
    }

    fn parse_or(&mut self) -> Result<Expression> {
        let mut left = self.parse_and()?;

        while let Some(operator) = self.peek_logical(&[LogicalOperator::Or, LogicalOperator::Nullish])
        {
            self.tokens.next();
            let left_height = self.height;
            let right = self.parse_and()?;
            self.grow(left_height.max(self.height))?;
            left = Expression::Logical(LogicalExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expression> {
        let mut left = self.parse_comparison()?;

        while let Some(operator) = self.peek_logical(&[LogicalOperator::And]) {
            self.tokens.next();
            let left_height = self.height;
            let right = self.parse_comparison()?;
            self.grow(left_height.max(self.height))?;
            left = Expression::Logical(LogicalExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let left = self.parse_additive()?;
        let left_height = self.height;

        let negated = self.peek_is(TokenKind::Not);
        if negated {
            self.tokens.next();
        }

        let operator = match self.peek_kind().and_then(ComparisonOperator::from_token) {
            Some(operator) if !negated || operator.is_membership() => operator,
            _ if negated => {
                let found = self
                    .tokens
                    .peek()
                    .map_or_else(|| "end of input".to_owned(), describe);
                return Err(ParseError::MalformedNegation { found });
            }
            _ => return Ok(left),
        };
        self.tokens.next();
        trace!(%operator, negated, "comparison");

        self.descend()?;
        let right = self.parse_comparison()?;
        self.depth -= 1;
        self.grow(left_height.max(self.height))?;

        let comparison = Expression::Comparison(ComparisonExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        });
        if !negated {
            return Ok(comparison);
        }

        self.grow(self.height)?;
        Ok(Expression::not(comparison))
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;

        while let Some(operator) = self.peek_arithmetic(true) {
            self.tokens.next();
            let left_height = self.height;
            let right = self.parse_multiplicative()?;
            self.grow(left_height.max(self.height))?;
            left = Expression::Binary(BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_prefix()?;

        while let Some(operator) = self.peek_arithmetic(false) {
            self.tokens.next();
            let left_height = self.height;
            let right = self.parse_prefix()?;
            self.grow(left_height.max(self.height))?;
            left = Expression::Binary(BinaryExpression {
                left: Box::new(left),
                operator,
                right: Box::new(right),
            });
        }

        Ok(left)
    }

    fn parse_prefix(&mut self) -> Result<Expression> {
        match self.peek_kind() {
            Some(TokenKind::Bang) | Some(TokenKind::Not) => {
                self.tokens.next();
                Ok(Expression::not(self.parse_prefix_operand()?))
            }
            Some(kind) => match ArithmeticOperator::from_token(kind) {
                Some(operator) => {
                    self.tokens.next();
                    Ok(Expression::Unary(UnaryExpression {
                        operator,
                        operand: Box::new(self.parse_prefix_operand()?),
                    }))
                }
                None => self.parse_postfix(),
            },
            None => self.parse_postfix(),
        }
    }

    fn parse_prefix_operand(&mut self) -> Result<Expression> {
        self.descend()?;
        let operand = self.parse_prefix()?;
        self.depth -= 1;
        self.grow(self.height)?;
        Ok(operand)
    }

    fn parse_postfix(&mut self) -> Result<Expression> {
        let mut expression = self.parse_primary()?;

        loop {
            let object_height = self.height;
            expression = match self.peek_kind() {
                Some(TokenKind::Dot) => {
                    self.tokens.next();
                    let property = self.expect(TokenKind::Identifier)?;
                    self.grow(object_height)?;
                    Expression::Member(MemberExpression {
                        object: Box::new(expression),
                        property: property.into(),
                    })
                }
                Some(TokenKind::LBracket) => {
                    self.tokens.next();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::RBracket)?;
                    self.grow(object_height.max(self.height))?;
                    Expression::Index(IndexExpression {
                        array: Box::new(expression),
                        index: Box::new(index),
                    })
                }
                Some(TokenKind::LParen) => {
                    self.tokens.next();
                    let arguments = if self.peek_is(TokenKind::RParen) {
                        self.tokens.next();
                        vec![]
                    } else {
                        self.parse_expression_list(TokenKind::RParen)?
                    };
                    self.grow(object_height.max(self.height))?;
                    Expression::Call(CallExpression {
                        callee: Box::new(expression),
                        arguments,
                    })
                }
                _ => return Ok(expression),
            };
        }
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        let token = self.next_token("an expression")?;
        self.height = 1;

        match token.kind {
            TokenKind::Identifier => Ok(Expression::Identifier(token.into())),
            TokenKind::Number => token
                .literal
                .parse()
                .map(Expression::Number)
                .map_err(|_| unexpected("a number", &token)),
            TokenKind::String => Ok(Expression::String(StringLiteral {
                quote: Quote::of_raw(&token.raw),
                value: token.literal,
            })),
            TokenKind::Boolean => Ok(Expression::Boolean(token.literal == "true")),
            TokenKind::LBracket => {
                if self.peek_is(TokenKind::RBracket) {
                    return Err(ParseError::EmptyArray);
                }
                let elements = self.parse_expression_list(TokenKind::RBracket)?;
                self.grow(self.height)?;
                Ok(Expression::Array(elements.into()))
            }
            TokenKind::LParen => {
                let expression = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(expression)
            }
            _ => Err(unexpected("an expression", &token)),
        }
    }

    /// Comma-separated expressions up to and including `end`. Leaves the
    /// tallest element's height behind.
    fn parse_expression_list(&mut self, end: TokenKind) -> Result<Vec<Expression>> {
        let mut list = vec![self.parse_expression()?];
        let mut height = self.height;

        loop {
            let expected = format!("{} or {}", TokenKind::Comma, end);
            let token = self.next_token(&expected)?;
            match token.kind {
                TokenKind::Comma => {
                    list.push(self.parse_expression()?);
                    height = height.max(self.height);
                }
                kind if kind == end => {
                    self.height = height;
                    return Ok(list);
                }
                _ => return Err(unexpected(expected, &token)),
            }
        }
    }

    fn descend(&mut self) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        self.depth += 1;
        Ok(())
    }

    /// Records a new node above children at most `children` high.
    fn grow(&mut self, children: usize) -> Result<()> {
        self.height = children + 1;
        if self.height > MAX_DEPTH {
            return Err(ParseError::TooDeep { limit: MAX_DEPTH });
        }
        Ok(())
    }

    fn peek_kind(&mut self) -> Option<TokenKind> {
        self.tokens.peek().map(|token| token.kind)
    }

    fn peek_is(&mut self, kind: TokenKind) -> bool {
        self.peek_kind() == Some(kind)
    }

    fn peek_logical(&mut self, accepted: &[LogicalOperator]) -> Option<LogicalOperator> {
        self.peek_kind()
            .and_then(LogicalOperator::from_token)
            .filter(|operator| accepted.contains(operator))
    }

    fn peek_arithmetic(&mut self, additive: bool) -> Option<ArithmeticOperator> {
        self.peek_kind()
            .and_then(ArithmeticOperator::from_token)
            .filter(|operator| operator.is_additive() == additive)
    }

    fn next_token(&mut self, expected: &str) -> Result<Token> {
        self.tokens.next().ok_or_else(|| ParseError::UnexpectedEof {
            expected: expected.to_owned(),
        })
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        let token = self.next_token(&kind.to_string())?;
        if token.is(kind) {
            Ok(token)
        } else {
            Err(unexpected(kind.to_string(), &token))
        }
    }
}

/// Tokenizes and parses `source` into a single expression tree.
pub fn parse(source: &str) -> Result<Expression> {
    let tokens = lexer::tokenize(source)?;
    Parser::new(tokens).parse_expression_root()
}
