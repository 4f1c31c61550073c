//! Statement parser for MiniJava.

use super::expression::ExpressionParser;
use super::{Parser, Stmt};
use crate::diagnostics::codes;
use crate::lexer::TokenKind;

/// Trait extension for statement parsing
pub trait StatementParser {
    fn statement(&mut self) -> Option<Stmt>;
}

impl<'a> StatementParser for Parser<'a> {
    fn statement(&mut self) -> Option<Stmt> {
        self.parse_statement()
    }
}

impl<'a> Parser<'a> {
    pub(crate) fn parse_statement(&mut self) -> Option<Stmt> {
        match self.peek().kind {
            TokenKind::LeftBrace => self.block_statement(),
            TokenKind::If => self.if_statement(),
            TokenKind::While => self.while_statement(),
            TokenKind::Print => self.print_statement(),
            TokenKind::Identifier => self.assignment_statement(),
            _ => {
                let found = self.peek().lexeme.clone();
                self.error_at_current(
                    codes::EXPECTED_STATEMENT,
                    &format!("expected statement, found '{}'", found),
                );
                None
            }
        }
    }

    /// `{ Stmt* }`
    fn block_statement(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::LeftBrace, "expected '{'")?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenKind::RightBrace, "expected '}' after block")?;
        Some(Stmt::Block(statements))
    }

    /// `x = e;` or `x[i] = e;`
    fn assignment_statement(&mut self) -> Option<Stmt> {
        let target = self.expect_identifier("expected variable name")?;

        if self.match_token(TokenKind::LeftBracket) {
            let index = self.expression()?;
            self.expect(TokenKind::RightBracket, "expected ']' after index")?;
            self.expect(TokenKind::Equal, "expected '=' in array assignment")?;
            let value = self.expression()?;
            self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
            return Some(Stmt::ArrayAssign { target, index, value });
        }

        self.expect(TokenKind::Equal, "expected '=' after variable name")?;
        let value = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after assignment")?;
        Some(Stmt::Assign { target, value })
    }

    /// `if (cond) stmt else stmt`; MiniJava always requires the else branch
    fn if_statement(&mut self) -> Option<Stmt> {
        self.advance(); // consume 'if'
        self.expect(TokenKind::LeftParen, "expected '(' after 'if'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParen, "expected ')' after if condition")?;
        let then_branch = self.parse_statement()?;
        self.expect(TokenKind::Else, "expected 'else' after if branch")?;
        let else_branch = self.parse_statement()?;

        Some(Stmt::If {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: Box::new(else_branch),
        })
    }

    /// `while (cond) stmt`
    fn while_statement(&mut self) -> Option<Stmt> {
        self.advance(); // consume 'while'
        self.expect(TokenKind::LeftParen, "expected '(' after 'while'")?;
        let condition = self.expression()?;
        self.expect(TokenKind::RightParen, "expected ')' after while condition")?;
        let body = self.parse_statement()?;

        Some(Stmt::While {
            condition,
            body: Box::new(body),
        })
    }

    /// `System.out.println(e);`
    fn print_statement(&mut self) -> Option<Stmt> {
        self.advance(); // consume 'System.out.println'
        self.expect(TokenKind::LeftParen, "expected '(' after 'System.out.println'")?;
        let value = self.expression()?;
        self.expect(TokenKind::RightParen, "expected ')' after print argument")?;
        self.expect(TokenKind::Semicolon, "expected ';' after print statement")?;
        Some(Stmt::Print(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticReporter;
    use crate::lexer::Scanner;
    use crate::parser::ExprKind;

    fn parse_stmt(source: &str) -> (Option<Stmt>, DiagnosticReporter) {
        let mut reporter = DiagnosticReporter::new("stmt.java", source);
        let tokens = Scanner::new(source, &mut reporter).scan_tokens();
        let stmt = Parser::new(tokens, &mut reporter).statement();
        (stmt, reporter)
    }

    #[test]
    fn array_assignment() {
        let (stmt, _) = parse_stmt("xs[i + 1] = 3;");
        match stmt.unwrap() {
            Stmt::ArrayAssign { target, index, value } => {
                assert_eq!(target.name, "xs");
                assert!(matches!(index.kind, ExprKind::Binary { .. }));
                assert!(matches!(value.kind, ExprKind::IntLiteral(3)));
            }
            other => panic!("unexpected statement: {:?}", other),
        }
    }

    #[test]
    fn nested_control_flow() {
        let (stmt, reporter) = parse_stmt(
            "while (i < 10) { if (b) System.out.println(i); else { i = i + 1; } }",
        );
        assert!(!reporter.has_errors());
        let Some(Stmt::While { body, .. }) = stmt else {
            panic!("expected while");
        };
        let Stmt::Block(ref inner) = *body else {
            panic!("expected block body");
        };
        assert!(matches!(inner[0], Stmt::If { .. }));
    }

    #[test]
    fn if_without_else_is_rejected() {
        let (stmt, reporter) = parse_stmt("if (b) x = 1;");
        assert!(stmt.is_none());
        assert_eq!(reporter.diagnostics()[0].code, codes::EXPECTED_TOKEN);
    }

    #[test]
    fn return_is_not_a_statement() {
        let (stmt, reporter) = parse_stmt("return 1;");
        assert!(stmt.is_none());
        assert_eq!(reporter.diagnostics()[0].code, codes::EXPECTED_STATEMENT);
    }
}
