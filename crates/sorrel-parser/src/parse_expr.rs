//! Expression parsing with full operator precedence.
//!
//! Precedence (lowest → highest):
//! 10. `=`, `+=`, `-=`, `*=`, `/=`, `%=` (right-assoc)
//! 9. `||`
//! 8. `&&`
//! 7. `==`, `!=`
//! 6. `<`, `>`, `<=`, `>=`
//! 5. `+`, `-`
//! 4. `*`, `/`, `%`
//! 3. `**` (right-assoc)
//! 2. unary `!`, `-`
//! 1. postfix `++`, `--`, calls, `.member`, `[index]`

use sorrel_lexer::token::TokenKind;
use sorrel_types::ast::{Expr, ExprKind, Property};
use sorrel_types::{DataType, ErrorCode, Operator, Span};

use crate::parser::Parser;

impl<'src> Parser<'src> {
    /// Parse an expression.
    pub(crate) fn parse_expression(&mut self) -> Option<Expr> {
        self.expr_depth += 1;
        if self.expr_depth > 16 {
            self.error_at_current(
                ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                format!(
                    "maximum expression nesting depth is 16, got {}",
                    self.expr_depth
                ),
            );
            self.expr_depth -= 1;
            return None;
        }
        let result = self.parse_assignment();
        self.expr_depth -= 1;
        result
    }

    /// `AssignExpr = OrExpr [ ("=" | "+=" | "-=" | "*=" | "/=" | "%=") AssignExpr ]`
    ///
    /// Plain `=` builds an assignment node. The compound forms build a
    /// binary expression carrying the compound operator; the evaluator
    /// gives that operator its store-back behavior.
    fn parse_assignment(&mut self) -> Option<Expr> {
        let left = self.parse_or()?;

        if self.eat(&TokenKind::Eq) {
            let value = self.parse_expression()?;
            let span = left.span.merge(value.span);
            return Some(Expr::new(
                ExprKind::Assignment {
                    assignee: Box::new(left),
                    value: Box::new(value),
                },
                span,
            ));
        }

        let op = match self.peek_kind() {
            TokenKind::PlusEq => Some(Operator::AddAssignment),
            TokenKind::MinusEq => Some(Operator::SubtractAssignment),
            TokenKind::StarEq => Some(Operator::MultiplyAssignment),
            TokenKind::SlashEq => Some(Operator::DivideAssignment),
            TokenKind::PercentEq => Some(Operator::ModuloAssignment),
            _ => None,
        };
        if let Some(op) = op {
            self.advance();
            let right = self.parse_expression()?;
            return Some(Expr::binary(left, op, right));
        }

        Some(left)
    }

    /// `OrExpr = AndExpr { "||" AndExpr }`
    fn parse_or(&mut self) -> Option<Expr> {
        let mut left = self.parse_and()?;
        while self.check_exact(&TokenKind::PipePipe) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_and()?;
            left = self.resolve_binary(left, "||", right, op_span)?;
        }
        Some(left)
    }

    /// `AndExpr = EqExpr { "&&" EqExpr }`
    fn parse_and(&mut self) -> Option<Expr> {
        let mut left = self.parse_equality()?;
        while self.check_exact(&TokenKind::AmpAmp) {
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_equality()?;
            left = self.resolve_binary(left, "&&", right, op_span)?;
        }
        Some(left)
    }

    /// `EqExpr = RelExpr { ("==" | "!=") RelExpr }`
    fn parse_equality(&mut self) -> Option<Expr> {
        let mut left = self.parse_relational()?;
        loop {
            let symbol = match self.peek_kind() {
                TokenKind::EqEq => "==",
                TokenKind::BangEq => "!=",
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_relational()?;
            left = self.resolve_binary(left, symbol, right, op_span)?;
        }
        Some(left)
    }

    /// `RelExpr = AddExpr { ("<" | ">" | "<=" | ">=") AddExpr }`
    fn parse_relational(&mut self) -> Option<Expr> {
        let mut left = self.parse_additive()?;
        loop {
            let symbol = match self.peek_kind() {
                TokenKind::Less => "<",
                TokenKind::Greater => ">",
                TokenKind::LessEq => "<=",
                TokenKind::GreaterEq => ">=",
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_additive()?;
            left = self.resolve_binary(left, symbol, right, op_span)?;
        }
        Some(left)
    }

    /// `AddExpr = MulExpr { ("+" | "-") MulExpr }`
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut left = self.parse_multiplicative()?;
        loop {
            let symbol = match self.peek_kind() {
                TokenKind::Plus => "+",
                TokenKind::Minus => "-",
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_multiplicative()?;
            left = self.resolve_binary(left, symbol, right, op_span)?;
        }
        Some(left)
    }

    /// `MulExpr = ExpExpr { ("*" | "/" | "%") ExpExpr }`
    fn parse_multiplicative(&mut self) -> Option<Expr> {
        let mut left = self.parse_exponent()?;
        loop {
            let symbol = match self.peek_kind() {
                TokenKind::Star => "*",
                TokenKind::Slash => "/",
                TokenKind::Percent => "%",
                _ => break,
            };
            let op_span = self.current_span();
            self.advance();
            let right = self.parse_exponent()?;
            left = self.resolve_binary(left, symbol, right, op_span)?;
        }
        Some(left)
    }

    /// `ExpExpr = UnaryExpr [ "**" ExpExpr ]` (right-associative)
    fn parse_exponent(&mut self) -> Option<Expr> {
        let left = self.parse_unary()?;
        if self.check_exact(&TokenKind::StarStar) {
            self.advance();
            self.expr_depth += 1;
            if self.expr_depth > 16 {
                self.error_at_current(
                    ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                    format!(
                        "maximum expression nesting depth is 16, got {}",
                        self.expr_depth
                    ),
                );
                self.expr_depth -= 1;
                return None;
            }
            let right = self.parse_exponent();
            self.expr_depth -= 1;
            let right = right?;
            return Some(Expr::binary(left, Operator::Exponentiate, right));
        }
        Some(left)
    }

    /// `UnaryExpr = ("!" | "-") UnaryExpr | PostfixExpr`
    fn parse_unary(&mut self) -> Option<Expr> {
        let start = self.current_span();
        let op = match self.peek_kind() {
            TokenKind::Bang => Some(Operator::LogicalNot),
            TokenKind::Minus => Some(Operator::Subtract),
            _ => None,
        };

        if let Some(op) = op {
            self.advance();
            self.expr_depth += 1;
            if self.expr_depth > 16 {
                self.error_at_current(
                    ErrorCode::STRUCTURAL_LIMIT_EXCEEDED,
                    format!(
                        "maximum expression nesting depth is 16, got {}",
                        self.expr_depth
                    ),
                );
                self.expr_depth -= 1;
                return None;
            }
            let operand = self.parse_unary();
            self.expr_depth -= 1;
            let operand = operand?;
            let span = start.merge(operand.span);
            return Some(Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            ));
        }

        self.parse_postfix()
    }

    /// `PostfixExpr = PrimaryExpr { "++" | "--" | "(" args ")" | "." ident | "[" expr "]" }`
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            match self.peek_kind() {
                TokenKind::PlusPlus => {
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Unary {
                            op: Operator::Increment,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Unary {
                            op: Operator::Decrement,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::LParen => {
                    self.advance();
                    let args = self.parse_arg_list()?;
                    self.expect(&TokenKind::RParen)?;
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            callee: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::Dot => {
                    self.advance();
                    let (name, name_span) = self.expect_identifier()?;
                    let property = Expr::new(ExprKind::Identifier(name), name_span);
                    let span = expr.span.merge(name_span);
                    expr = Expr::new(
                        ExprKind::Member {
                            object: Box::new(expr),
                            property: Box::new(property),
                            computed: false,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    self.advance();
                    let inner = self.parse_expression()?;
                    self.expect(&TokenKind::RBracket)?;
                    let span = expr.span.merge(self.previous_span());
                    // A quoted key selects a property; anything else is a
                    // positional index
                    expr = if matches!(inner.kind, ExprKind::StringLiteral(_)) {
                        Expr::new(
                            ExprKind::Member {
                                object: Box::new(expr),
                                property: Box::new(inner),
                                computed: true,
                            },
                            span,
                        )
                    } else {
                        Expr::new(
                            ExprKind::Index {
                                array: Box::new(expr),
                                index: Box::new(inner),
                            },
                            span,
                        )
                    };
                }
                _ => break,
            }
        }

        Some(expr)
    }

    /// Parse a primary expression: literals, identifiers, grouping,
    /// array literals, object literals.
    fn parse_primary(&mut self) -> Option<Expr> {
        match self.peek_kind().clone() {
            TokenKind::IntLit(value) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::IntLiteral(value), span))
            }
            TokenKind::FloatLit(value) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::FloatLiteral(value), span))
            }
            TokenKind::StringLit(value) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::StringLiteral(value), span))
            }
            TokenKind::CharLit(value) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::CharLiteral(value), span))
            }
            TokenKind::True => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::BoolLiteral(true), span))
            }
            TokenKind::False => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::BoolLiteral(false), span))
            }
            TokenKind::Null => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::NullLiteral, span))
            }
            TokenKind::Identifier(name) => {
                let span = self.advance().span;
                Some(Expr::new(ExprKind::Identifier(name), span))
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expression()?;
                self.expect(&TokenKind::RParen)?;
                Some(inner)
            }
            TokenKind::LBracket => self.parse_array_literal(),
            TokenKind::LBrace => self.parse_object_literal(),
            _ => {
                self.error_at_current(
                    ErrorCode::UNEXPECTED_TOKEN,
                    format!("expected expression, got '{}'", self.peek_kind()),
                );
                None
            }
        }
    }

    /// Parse `[expr, ...]`. Trailing commas are allowed.
    fn parse_array_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.advance(); // eat `[`

        let mut elements = Vec::new();
        if !self.check_exact(&TokenKind::RBracket) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.check_exact(&TokenKind::RBracket) {
                    break; // trailing comma
                }
            }
        }
        self.expect(&TokenKind::RBracket)?;

        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ArrayLiteral(elements), span))
    }

    /// Parse `{ key: type = value, ... }` or `{}`. Trailing commas are allowed.
    fn parse_object_literal(&mut self) -> Option<Expr> {
        let start = self.current_span();
        self.advance(); // eat `{`

        let mut properties = Vec::new();
        if !self.check_exact(&TokenKind::RBrace) {
            loop {
                properties.push(self.parse_property()?);
                if !self.eat(&TokenKind::Comma) {
                    break;
                }
                if self.check_exact(&TokenKind::RBrace) {
                    break; // trailing comma
                }
            }
        }
        self.expect(&TokenKind::RBrace)?;

        let span = start.merge(self.previous_span());
        Some(Expr::new(ExprKind::ObjectLiteral(properties), span))
    }

    /// Parse one `key: type = value` property entry.
    fn parse_property(&mut self) -> Option<Property> {
        let start = self.current_span();
        let (key, _) = self.expect_identifier()?;
        self.expect(&TokenKind::Colon)?;

        // `type[]` resolves directly; single words go through the label
        // resolver so a typo is caught here, not at run time
        let type_span = self.current_span();
        let mut array_type = false;
        let label: String = if let Some(label) = self.peek_kind().type_label() {
            self.advance();
            if self.eat(&TokenKind::LBracket) {
                self.expect(&TokenKind::RBracket)?;
                array_type = true;
            }
            label.to_string()
        } else if let TokenKind::Identifier(word) = self.peek_kind().clone() {
            self.advance();
            word
        } else {
            self.error_at_current(
                ErrorCode::UNEXPECTED_TOKEN,
                format!("expected a type name, got '{}'", self.peek_kind()),
            );
            return None;
        };

        self.expect(&TokenKind::Eq)?;
        let value = self.parse_expression()?;
        let span = start.merge(self.previous_span());

        if array_type {
            return Some(Property::with_type(key, value, DataType::Array, span));
        }
        match Property::new(key, value, &label, span) {
            Ok(property) => Some(property),
            Err(err) => {
                self.error_at(err.code(), err.to_string(), type_span);
                None
            }
        }
    }

    /// Parse a comma-separated argument list, stopping before `)`.
    /// Trailing commas are allowed.
    fn parse_arg_list(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();
        if self.check_exact(&TokenKind::RParen) {
            return Some(args);
        }

        loop {
            args.push(self.parse_expression()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            if self.check_exact(&TokenKind::RParen) {
                break; // trailing comma
            }
        }
        Some(args)
    }

    /// Combine two operands through the textual operator resolver. A failed
    /// resolution becomes a diagnostic at the operator's span.
    fn resolve_binary(
        &mut self,
        left: Expr,
        symbol: &str,
        right: Expr,
        op_span: Span,
    ) -> Option<Expr> {
        match Expr::binary_from_symbol(left, symbol, right) {
            Ok(expr) => Some(expr),
            Err(err) => {
                self.error_at(err.code(), err.to_string(), op_span);
                None
            }
        }
    }
}
