//! Scanner for MiniJava source code tokenization.

use log::trace;
use unicode_xid::UnicodeXID;

use super::token::{lookup_keyword, Token, TokenKind};
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};

/// The print statement keyword, scanned as a single token
const PRINT_KEYWORD: &str = "System.out.println";

/// Scanner that turns source text into tokens.
///
/// Errors are reported and the offending text dropped, so every lexical
/// error of a file shows up in one run.
pub struct Scanner<'a> {
    source: &'a str,
    /// Byte offset of the next unread character
    pos: usize,
    /// Byte offset where the current token began
    start: usize,
    reporter: &'a mut DiagnosticReporter,
}

impl<'a> Scanner<'a> {
    pub fn new(source: &'a str, reporter: &'a mut DiagnosticReporter) -> Self {
        Self {
            source,
            pos: 0,
            start: 0,
            reporter,
        }
    }

    /// Tokenize the whole source; the last token is always `Eof`
    pub fn scan_tokens(mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        while let Some(token) = self.next_token() {
            tokens.push(token);
        }
        tokens.push(Token::eof(self.source.len()));

        trace!("scanned {} tokens", tokens.len());
        tokens
    }

    /// Next valid token, or `None` at end of input
    fn next_token(&mut self) -> Option<Token> {
        loop {
            self.skip_trivia();
            self.start = self.pos;

            let c = self.bump()?;
            let kind = match c {
                '&' if self.eat('&') => Some(TokenKind::AmpersandAmpersand),
                '0'..='9' => self.number(),
                c if is_ident_start(c) => Some(self.word()),
                c => punctuation(c),
            };

            match kind {
                Some(kind) => return Some(self.token(kind)),
                None if self.pos - self.start == c.len_utf8() => self.unexpected(c),
                // Malformed literal, already reported
                None => {}
            }
        }
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        let matched = self.peek() == Some(expected);
        if matched {
            self.pos += expected.len_utf8();
        }
        matched
    }

    fn eat_while(&mut self, predicate: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.pos]
    }

    fn token(&self, kind: TokenKind) -> Token {
        Token::new(kind, self.lexeme(), self.start, self.pos - self.start)
    }

    /// Skip whitespace, `// line` and `/* block */` comments
    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(char::is_whitespace);
            let rest = self.rest();

            if rest.starts_with("//") {
                self.eat_while(|c| c != '\n');
            } else if rest.starts_with("/*") {
                match rest[2..].find("*/") {
                    Some(end) => self.pos += end + 4,
                    None => {
                        self.reporter.report(
                            Diagnostic::error(codes::UNTERMINATED_COMMENT, "unterminated block comment")
                                .with_help("add a closing '*/'"),
                            self.pos,
                            2,
                        );
                        self.pos = self.source.len();
                    }
                }
            } else {
                return;
            }
        }
    }

    /// Identifier, keyword or the `System.out.println` keyword
    fn word(&mut self) -> TokenKind {
        // `start` is the first character of the word
        let tail = &self.source[self.start..];
        if tail.starts_with(PRINT_KEYWORD) && !tail[PRINT_KEYWORD.len()..].starts_with(is_ident_continue) {
            self.pos = self.start + PRINT_KEYWORD.len();
            return TokenKind::Print;
        }

        self.eat_while(is_ident_continue);
        lookup_keyword(self.lexeme()).unwrap_or(TokenKind::Identifier)
    }

    /// Decimal literal; digits running into letters are rejected
    fn number(&mut self) -> Option<TokenKind> {
        self.eat_while(|c| c.is_ascii_digit());

        if !self.peek().is_some_and(is_ident_continue) {
            return Some(TokenKind::IntLiteral);
        }

        self.eat_while(is_ident_continue);
        self.reporter.report(
            Diagnostic::error(
                codes::INVALID_NUMBER,
                format!("invalid integer literal '{}'", self.lexeme()),
            ),
            self.start,
            self.pos - self.start,
        );
        None
    }

    fn unexpected(&mut self, c: char) {
        self.reporter.report(
            Diagnostic::error(codes::UNEXPECTED_CHARACTER, format!("unexpected character '{}'", c)),
            self.start,
            c.len_utf8(),
        );
    }
}

fn punctuation(c: char) -> Option<TokenKind> {
    let kind = match c {
        '(' => TokenKind::LeftParen,
        ')' => TokenKind::RightParen,
        '{' => TokenKind::LeftBrace,
        '}' => TokenKind::RightBrace,
        '[' => TokenKind::LeftBracket,
        ']' => TokenKind::RightBracket,
        ',' => TokenKind::Comma,
        ';' => TokenKind::Semicolon,
        '.' => TokenKind::Dot,
        '<' => TokenKind::Less,
        '+' => TokenKind::Plus,
        '-' => TokenKind::Minus,
        '*' => TokenKind::Star,
        '!' => TokenKind::Bang,
        '=' => TokenKind::Equal,
        _ => return None,
    };
    Some(kind)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_xid_start()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_xid_continue()
}
