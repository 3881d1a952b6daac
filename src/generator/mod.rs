
use crate::ast::{
    ArithmeticOperator, ComparisonOperator, Expression, LogicalOperator, StringLiteral,
};

/// JavaScript binding strength of a rendered expression, loosest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Nullish,
    And,
    Equality,
    Relational,
    Additive,
    Multiplicative,
    Prefix,
    Postfix,
    Primary,
}

impl Precedence {
    fn of(expression: &Expression) -> Self {
        match expression {
            Expression::Number(_)
            | Expression::String(_)
            | Expression::Boolean(_)
            | Expression::Identifier(_)
            | Expression::Array(_) => Self::Primary,
            Expression::Member(_) | Expression::Index(_) | Expression::Call(_) => Self::Postfix,
            Expression::Unary(_) | Expression::Not(_) => Self::Prefix,
            Expression::Binary(binary) => Self::of_arithmetic(binary.operator),
            Expression::Comparison(comparison) => Self::of_comparison(comparison.operator),
            Expression::Logical(logical) => Self::of_logical(logical.operator),
        }
    }

    fn of_arithmetic(operator: ArithmeticOperator) -> Self {
        if operator.is_additive() {
            Self::Additive
        } else {
            Self::Multiplicative
        }
    }

    fn of_comparison(operator: ComparisonOperator) -> Self {
        match operator {
            ComparisonOperator::Eq
            | ComparisonOperator::StrictEq
            | ComparisonOperator::NotEq
            | ComparisonOperator::StrictNotEq => Self::Equality,
            ComparisonOperator::GT
            | ComparisonOperator::GTE
            | ComparisonOperator::LT
            | ComparisonOperator::LTE => Self::Relational,
            // rendered as an `.includes(...)` call
            ComparisonOperator::In | ComparisonOperator::Contains => Self::Postfix,
        }
    }

    fn of_logical(operator: LogicalOperator) -> Self {
        match operator {
            LogicalOperator::And => Self::And,
            LogicalOperator::Or | LogicalOperator::Nullish => Self::Nullish,
        }
    }

    // The next tighter level, required of right operands.
    fn tighter(self) -> Self {
        match self {
            Self::Lowest => Self::Nullish,
            Self::Nullish => Self::And,
            Self::And => Self::Equality,
            Self::Equality => Self::Relational,
            Self::Relational => Self::Additive,
            Self::Additive => Self::Multiplicative,
            Self::Multiplicative => Self::Prefix,
            Self::Prefix => Self::Postfix,
            Self::Postfix | Self::Primary => Self::Primary,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generator {
    output: String,
}

impl Generator {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn generate(mut self, expression: &Expression) -> String {
        self.emit(expression, Precedence::Lowest);
        self.output
    }

    /// Writes `expression`, parenthesized unless it binds at least as tightly
    /// as `min`.
    fn emit(&mut self, expression: &Expression, min: Precedence) {
        if Precedence::of(expression) < min {
            self.output.push('(');
            self.emit_bare(expression);
            self.output.push(')');
        } else {
            self.emit_bare(expression);
        }
    }

    fn emit_bare(&mut self, expression: &Expression) {
        match expression {
            Expression::Number(n) => self.emit_number(*n),
            Expression::String(s) => self.emit_string(s),
            Expression::Boolean(b) => self.output.push_str(if *b { "true" } else { "false" }),
            Expression::Identifier(ident) => self.output.push_str(&ident.name),
            Expression::Array(array) => {
                self.output.push('[');
                self.emit_list(&array.elements);
                self.output.push(']');
            }
            Expression::Member(member) => {
                self.emit_receiver(&member.object);
                self.output.push('.');
                self.output.push_str(&member.property.name);
            }
            Expression::Index(index) => {
                self.emit(&index.array, Precedence::Postfix);
                self.output.push('[');
                self.emit(&index.index, Precedence::Lowest);
                self.output.push(']');
            }
            Expression::Call(call) => {
                self.emit(&call.callee, Precedence::Postfix);
                self.output.push('(');
                self.emit_list(&call.arguments);
                self.output.push(')');
            }
            Expression::Not(not) => {
                self.output.push_str("!(");
                self.emit(&not.operand, Precedence::Lowest);
                self.output.push(')');
            }
            Expression::Unary(unary) => {
                let symbol = unary.operator.to_string();
                // `+ +x` must not collapse into `++x`, nor `/ *x` open a
                // comment as `/*x`
                let collides = self.output.ends_with(symbol.as_str())
                    || (self.output.ends_with('/') && symbol == "*");
                if collides {
                    self.output.push('(');
                    self.output.push_str(&symbol);
                    self.emit(&unary.operand, Precedence::Prefix);
                    self.output.push(')');
                } else {
                    self.output.push_str(&symbol);
                    self.emit(&unary.operand, Precedence::Prefix);
                }
            }
            Expression::Binary(binary) => {
                let precedence = Precedence::of_arithmetic(binary.operator);
                self.emit(&binary.left, precedence);
                self.output.push_str(&binary.operator.to_string());
                self.emit(&binary.right, precedence.tighter());
            }
            Expression::Comparison(comparison) => match comparison.operator {
                ComparisonOperator::In => self.emit_includes(&comparison.right, &comparison.left),
                ComparisonOperator::Contains => {
                    self.emit_includes(&comparison.left, &comparison.right)
                }
                // comparisons chain to the right here but to the left in
                // JavaScript, so a nested comparison is always grouped
                operator => {
                    self.emit(&comparison.left, Precedence::Additive);
                    self.output.push_str(&operator.to_string());
                    self.emit(&comparison.right, Precedence::Additive);
                }
            },
            Expression::Logical(logical) => {
                let precedence = Precedence::of_logical(logical.operator);
                self.emit_logical_operand(&logical.left, logical.operator, precedence);
                self.output.push_str(&logical.operator.to_string());
                self.emit_logical_operand(&logical.right, logical.operator, precedence.tighter());
            }
        }
    }

    fn emit_number(&mut self, n: f64) {
        if n.is_infinite() {
            self.output.push_str("Infinity");
        } else {
            self.output.push_str(&n.to_string());
        }
    }

    fn emit_string(&mut self, s: &StringLiteral) {
        let quote = s.quote.as_char();
        self.output.push(quote);
        for c in s.value.chars() {
            match c {
                '\\' => self.output.push_str("\\\\"),
                '\n' => self.output.push_str("\\n"),
                '\r' => self.output.push_str("\\r"),
                '\t' => self.output.push_str("\\t"),
                c if c.is_control() => self.output.push_str(&format!("\\x{:02x}", c as u32)),
                c if c == quote => {
                    self.output.push('\\');
                    self.output.push(c);
                }
                c => self.output.push(c),
            }
        }
        self.output.push(quote);
    }

    fn emit_list(&mut self, expressions: &[Expression]) {
        for (i, expression) in expressions.iter().enumerate() {
            if i > 0 {
                self.output.push(',');
            }
            self.emit(expression, Precedence::Lowest);
        }
    }

    // Object of a `.` access: `1.x` would read as a decimal literal.
    fn emit_receiver(&mut self, object: &Expression) {
        if let Expression::Number(_) = object {
            self.output.push('(');
            self.emit_bare(object);
            self.output.push(')');
        } else {
            self.emit(object, Precedence::Postfix);
        }
    }

    fn emit_includes(&mut self, container: &Expression, item: &Expression) {
        self.emit_receiver(container);
        self.output.push_str(".includes(");
        self.emit(item, Precedence::Lowest);
        self.output.push(')');
    }

    // `??` cannot share an unparenthesized chain with `&&` or `||`.
    fn emit_logical_operand(
        &mut self,
        operand: &Expression,
        operator: LogicalOperator,
        min: Precedence,
    ) {
        let mixes_nullish = match operand {
            Expression::Logical(inner) => {
                (operator == LogicalOperator::Nullish) != (inner.operator == LogicalOperator::Nullish)
            }
            _ => false,
        };

        if mixes_nullish {
            self.output.push('(');
            self.emit_bare(operand);
            self.output.push(')');
        } else {
            self.emit(operand, min);
        }
    }
}

/// Renders `expression` as JavaScript source.
pub fn generate(expression: &Expression) -> String {
    Generator::new().generate(expression)
}
