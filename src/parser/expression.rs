//! Expression parser for MiniJava.
//! Precedence climbing from `&&` (loosest) down to postfix access.

use super::{BinaryOp, Expr, ExprKind, Ident, Parser, Span};
use crate::diagnostics::{codes, Diagnostic};
use crate::lexer::TokenKind;

/// Trait extension for expression parsing
pub trait ExpressionParser {
    fn expression(&mut self) -> Option<Expr>;
}

impl<'a> ExpressionParser for Parser<'a> {
    fn expression(&mut self) -> Option<Expr> {
        self.parse_and()
    }
}

impl<'a> Parser<'a> {
    /// Parse logical AND: a && b
    fn parse_and(&mut self) -> Option<Expr> {
        let mut expr = self.parse_compare()?;

        while self.match_token(TokenKind::AmpersandAmpersand) {
            let right = self.parse_compare()?;
            expr = binary(expr, BinaryOp::And, right);
        }

        Some(expr)
    }

    /// Parse comparison: a < b
    fn parse_compare(&mut self) -> Option<Expr> {
        let mut expr = self.parse_additive()?;

        while self.match_token(TokenKind::Less) {
            let right = self.parse_additive()?;
            expr = binary(expr, BinaryOp::Less, right);
        }

        Some(expr)
    }

    /// Parse addition and subtraction: a + b, a - b
    fn parse_additive(&mut self) -> Option<Expr> {
        let mut expr = self.parse_term()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            expr = binary(expr, op, right);
        }

        Some(expr)
    }

    /// Parse multiplication: a * b
    fn parse_term(&mut self) -> Option<Expr> {
        let mut expr = self.parse_unary()?;

        while self.match_token(TokenKind::Star) {
            let right = self.parse_unary()?;
            expr = binary(expr, BinaryOp::Mul, right);
        }

        Some(expr)
    }

    /// Parse prefix `!`
    fn parse_unary(&mut self) -> Option<Expr> {
        if self.match_token(TokenKind::Bang) {
            let bang = self.previous_span();
            let operand = self.parse_unary()?;
            let span = bang.merge(&operand.span);
            return Some(Expr::new(ExprKind::Not(Box::new(operand)), span));
        }

        self.parse_postfix()
    }

    /// Parse postfix: indexing, `.length` and method calls
    fn parse_postfix(&mut self) -> Option<Expr> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.match_token(TokenKind::LeftBracket) {
                let index = self.expression()?;
                self.expect(TokenKind::RightBracket, "expected ']' after index")?;
                let span = expr.span.merge(&self.previous_span());
                expr = Expr::new(
                    ExprKind::Index {
                        array: Box::new(expr),
                        index: Box::new(index),
                    },
                    span,
                );
            } else if self.match_token(TokenKind::Dot) {
                if self.match_token(TokenKind::Length) {
                    let span = expr.span.merge(&self.previous_span());
                    expr = Expr::new(ExprKind::Length(Box::new(expr)), span);
                    continue;
                }

                let method = self.expect_identifier("expected method name or 'length' after '.'")?;
                self.expect(TokenKind::LeftParen, "expected '(' after method name")?;
                let args = self.parse_call_args()?;
                let span = expr.span.merge(&self.previous_span());
                expr = Expr::new(
                    ExprKind::Call {
                        receiver: Box::new(expr),
                        method,
                        args,
                    },
                    span,
                );
            } else {
                break;
            }
        }

        Some(expr)
    }

    /// Parse call arguments after the opening parenthesis
    fn parse_call_args(&mut self) -> Option<Vec<Expr>> {
        let mut args = Vec::new();

        if !self.check(TokenKind::RightParen) {
            loop {
                args.push(self.expression()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "expected ')' after arguments")?;
        Some(args)
    }

    /// Parse primary expressions: literals, identifiers, allocations, parenthesized
    fn parse_primary(&mut self) -> Option<Expr> {
        let token = self.peek().clone();
        let start = self.current_span();

        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                match token.lexeme.parse::<i32>() {
                    Ok(value) => Some(Expr::new(ExprKind::IntLiteral(value), start)),
                    Err(_) => {
                        self.reporter.report(
                            Diagnostic::error(
                                codes::INTEGER_OUT_OF_RANGE,
                                format!("integer literal '{}' does not fit in an int", token.lexeme),
                            ),
                            token.offset,
                            token.length,
                        );
                        None
                    }
                }
            }

            TokenKind::True => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLiteral(true), start))
            }

            TokenKind::False => {
                self.advance();
                Some(Expr::new(ExprKind::BoolLiteral(false), start))
            }

            TokenKind::Identifier => {
                self.advance();
                Some(Expr::new(ExprKind::Identifier(token.lexeme), start))
            }

            TokenKind::This => {
                self.advance();
                Some(Expr::new(ExprKind::This, start))
            }

            TokenKind::New => {
                self.advance();
                self.parse_allocation(start)
            }

            TokenKind::LeftParen => {
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RightParen, "expected ')' after expression")?;
                let span = start.merge(&self.previous_span());
                Some(Expr::new(ExprKind::Paren(Box::new(inner)), span))
            }

            _ => {
                self.error_at_current(
                    codes::EXPECTED_EXPRESSION,
                    &format!("expected expression, found '{}'", token.lexeme),
                );
                None
            }
        }
    }

    /// Parse `new int[size]` or `new Name()` after the `new` keyword
    fn parse_allocation(&mut self, start: Span) -> Option<Expr> {
        if self.match_token(TokenKind::Int) {
            self.expect(TokenKind::LeftBracket, "expected '[' after 'new int'")?;
            let size = self.expression()?;
            self.expect(TokenKind::RightBracket, "expected ']' after array size")?;
            let span = start.merge(&self.previous_span());
            return Some(Expr::new(ExprKind::NewArray(Box::new(size)), span));
        }

        let class: Ident = self.expect_identifier("expected class name or 'int' after 'new'")?;
        self.expect(TokenKind::LeftParen, "expected '(' after class name")?;
        self.expect(TokenKind::RightParen, "expected ')' in object allocation")?;
        let span = start.merge(&self.previous_span());
        Some(Expr::new(ExprKind::NewObject(class), span))
    }
}

fn binary(left: Expr, op: BinaryOp, right: Expr) -> Expr {
    let span = left.span.merge(&right.span);
    Expr::new(
        ExprKind::Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        },
        span,
    )
}
