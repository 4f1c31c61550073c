//! Parser module for building the MiniJava AST from tokens.

mod ast;
mod expression;
mod statement;

pub use ast::*;
pub use expression::ExpressionParser;
pub use statement::StatementParser;

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::{Token, TokenKind};

/// Recursive descent parser for MiniJava
pub struct Parser<'a> {
    tokens: Vec<Token>,
    current: usize,
    reporter: &'a mut DiagnosticReporter,
    panic_mode: bool,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, reporter: &'a mut DiagnosticReporter) -> Self {
        let mut tokens = tokens;
        if tokens.last().map_or(true, |t| t.kind != TokenKind::Eof) {
            let end = tokens.last().map_or(0, |t| t.offset + t.length);
            tokens.push(Token::eof(end));
        }

        Self {
            tokens,
            current: 0,
            reporter,
            panic_mode: false,
        }
    }

    /// Parse the entire program.
    ///
    /// A class that fails to parse is skipped so that later classes are still
    /// checked for syntax errors; `None` is returned only when the main class
    /// itself could not be parsed.
    pub fn parse(&mut self) -> Option<Program> {
        let main_class = self.main_class();
        if main_class.is_none() {
            self.synchronize();
        }

        let mut classes = Vec::new();
        while !self.is_at_end() {
            if !self.check(TokenKind::Class) {
                self.error_at_current(codes::EXPECTED_TOKEN, "expected 'class'");
                self.synchronize();
                continue;
            }

            match self.class_declaration() {
                Some(class) => classes.push(class),
                None => self.synchronize(),
            }
        }

        Some(Program {
            main_class: main_class?,
            classes,
        })
    }

    /// `class Name { public static void main(String[] args) { ... } }`
    fn main_class(&mut self) -> Option<MainClass> {
        self.expect(TokenKind::Class, "expected 'class' to begin the main class")?;
        let name = self.expect_identifier("expected main class name")?;
        self.expect(TokenKind::LeftBrace, "expected '{' after class name")?;

        self.expect(TokenKind::Public, "expected 'public static void main'")?;
        self.expect(TokenKind::Static, "expected 'static' after 'public'")?;
        self.expect(TokenKind::Void, "expected 'void' after 'static'")?;
        self.expect(TokenKind::Main, "expected 'main'")?;
        self.expect(TokenKind::LeftParen, "expected '(' after 'main'")?;
        self.expect(TokenKind::String, "expected 'String'")?;
        self.expect(TokenKind::LeftBracket, "expected '[' after 'String'")?;
        self.expect(TokenKind::RightBracket, "expected ']'")?;
        let args = self.expect_identifier("expected parameter name")?;
        self.expect(TokenKind::RightParen, "expected ')' after parameter")?;
        self.expect(TokenKind::LeftBrace, "expected '{' to begin main")?;

        let locals = self.var_declarations()?;

        let mut body = Vec::new();
        while !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }

        self.expect(TokenKind::RightBrace, "expected '}' to close main")?;
        self.expect(TokenKind::RightBrace, "expected '}' to close the main class")?;

        Some(MainClass {
            name,
            args,
            locals,
            body,
        })
    }

    /// `class Name [extends Parent] { VarDecl* MethodDecl* }`
    fn class_declaration(&mut self) -> Option<ClassDecl> {
        self.expect(TokenKind::Class, "expected 'class'")?;
        let name = self.expect_identifier("expected class name")?;

        let superclass = if self.match_token(TokenKind::Extends) {
            Some(self.expect_identifier("expected superclass name after 'extends'")?)
        } else {
            None
        };

        self.expect(TokenKind::LeftBrace, "expected '{' for class body")?;

        let fields = self.var_declarations()?;

        let mut methods = Vec::new();
        while self.check(TokenKind::Public) {
            methods.push(self.method_declaration()?);
        }

        self.expect(TokenKind::RightBrace, "expected '}' after class body")?;

        Some(ClassDecl {
            name,
            superclass,
            fields,
            methods,
        })
    }

    /// `public Type name(Type a, ...) { VarDecl* Stmt* return Expr; }`
    fn method_declaration(&mut self) -> Option<MethodDecl> {
        self.expect(TokenKind::Public, "expected 'public'")?;
        let return_type = self.parse_type()?;
        let name = self.expect_identifier("expected method name")?;
        self.expect(TokenKind::LeftParen, "expected '(' after method name")?;

        let mut params = Vec::new();
        if !self.check(TokenKind::RightParen) {
            loop {
                let type_spec = self.parse_type()?;
                let name = self.expect_identifier("expected parameter name")?;
                params.push(VarDecl { type_spec, name });

                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenKind::RightParen, "expected ')' after parameters")?;
        self.expect(TokenKind::LeftBrace, "expected '{' for method body")?;

        let locals = self.var_declarations()?;

        let mut body = Vec::new();
        while !self.check(TokenKind::Return) && !self.check(TokenKind::RightBrace) && !self.is_at_end() {
            body.push(self.statement()?);
        }

        self.expect(TokenKind::Return, "expected 'return' at the end of the method")?;
        let return_expr = self.expression()?;
        self.expect(TokenKind::Semicolon, "expected ';' after return expression")?;
        self.expect(TokenKind::RightBrace, "expected '}' after method body")?;

        Some(MethodDecl {
            return_type,
            name,
            params,
            locals,
            body,
            return_expr,
        })
    }

    /// Parse `Type name;` declarations until something else starts
    fn var_declarations(&mut self) -> Option<Vec<VarDecl>> {
        let mut decls = Vec::new();

        while self.is_var_decl_start() {
            let type_spec = self.parse_type()?;
            let name = self.expect_identifier("expected variable name")?;
            self.expect(TokenKind::Semicolon, "expected ';' after variable declaration")?;
            decls.push(VarDecl { type_spec, name });
        }

        Some(decls)
    }

    /// `int x;`, `boolean b;` or `Name x;` (an identifier followed by another)
    fn is_var_decl_start(&self) -> bool {
        match self.peek().kind {
            TokenKind::Int | TokenKind::Boolean => true,
            TokenKind::Identifier => self.peek_next().kind == TokenKind::Identifier,
            _ => false,
        }
    }

    /// Parse a type: `int[]`, `int`, `boolean` or a class name
    fn parse_type(&mut self) -> Option<TypeSpec> {
        let token = self.peek().clone();
        let start = Span::new(token.offset, token.length);

        let kind = match token.kind {
            TokenKind::Int => {
                self.advance();
                if self.match_token(TokenKind::LeftBracket) {
                    self.expect(TokenKind::RightBracket, "expected ']' in 'int[]'")?;
                    let end = self.previous();
                    let span = start.merge(&Span::new(end.offset, end.length));
                    return Some(TypeSpec {
                        kind: TypeSpecKind::IntArray,
                        span,
                    });
                }
                TypeSpecKind::Int
            }
            TokenKind::Boolean => {
                self.advance();
                TypeSpecKind::Boolean
            }
            TokenKind::Identifier => {
                self.advance();
                TypeSpecKind::Named(token.lexeme.clone())
            }
            _ => {
                self.error_at_current(
                    codes::EXPECTED_TYPE,
                    &format!("expected type, found '{}'", token.lexeme),
                );
                return None;
            }
        };

        Some(TypeSpec { kind, span: start })
    }

    // === Helper methods ===

    fn peek(&self) -> &Token {
        &self.tokens[self.current]
    }

    fn peek_next(&self) -> &Token {
        let index = (self.current + 1).min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn previous(&self) -> &Token {
        &self.tokens[self.current.saturating_sub(1)]
    }

    fn is_at_end(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.current += 1;
        }
        self.previous()
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, message: &str) -> Option<&Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            self.error_at_current(codes::EXPECTED_TOKEN, message);
            None
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Option<Ident> {
        if self.check(TokenKind::Identifier) {
            let token = self.advance();
            Some(Ident::new(token.lexeme.clone(), Span::new(token.offset, token.length)))
        } else {
            self.error_at_current(codes::EXPECTED_IDENTIFIER, message);
            None
        }
    }

    fn current_span(&self) -> Span {
        let token = self.peek();
        Span::new(token.offset, token.length)
    }

    fn previous_span(&self) -> Span {
        let token = self.previous();
        Span::new(token.offset, token.length)
    }

    fn error_at_current(&mut self, code: &str, message: &str) {
        if self.panic_mode {
            return;
        }
        self.panic_mode = true;

        let token = self.peek();
        let (offset, length) = (token.offset, token.length);
        let found = if token.kind == TokenKind::Eof {
            "end of file".to_string()
        } else {
            format!("'{}'", token.lexeme)
        };

        self.reporter.report_with_label(
            Diagnostic::error(code, message),
            offset,
            length,
            &format!("found {}", found),
        );
    }

    /// Error recovery: skip to the next `class` keyword
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while !self.is_at_end() && !self.check(TokenKind::Class) {
            self.advance();
        }
    }
}
