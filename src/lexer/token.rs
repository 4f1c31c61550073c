//! Token definitions for the MiniJava lexer.

use std::fmt;

/// A token with its kind, lexeme, and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub offset: usize,
    pub length: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, offset: usize, length: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            offset,
            length,
        }
    }

    pub fn eof(offset: usize) -> Self {
        Self::new(TokenKind::Eof, "", offset, 0)
    }
}

/// One line of `--dump-tokens` output
impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>5}  {:<18} {}", self.offset, format!("{:?}", self.kind), self.lexeme)
    }
}

/// All token kinds in MiniJava
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    IntLiteral,

    Identifier,

    // Type keywords
    Int,
    Boolean,
    Void,
    String,

    // Declaration keywords
    Class,
    Public,
    Static,
    Main,
    Extends,

    // Statement keywords
    If,
    Else,
    While,
    Return,
    /// `System.out.println`, scanned as one token
    Print,

    // Expression keywords
    True,
    False,
    This,
    New,
    Length,

    // Operators
    AmpersandAmpersand, // &&
    Less,               // <
    Plus,               // +
    Minus,              // -
    Star,               // *
    Bang,               // !
    Equal,              // =
    Dot,                // .
    Comma,              // ,
    Semicolon,          // ;

    // Delimiters
    LeftParen,    // (
    RightParen,   // )
    LeftBrace,    // {
    RightBrace,   // }
    LeftBracket,  // [
    RightBracket, // ]

    Eof,
}

/// Map string to keyword token kind
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    match ident {
        "int" => Some(TokenKind::Int),
        "boolean" => Some(TokenKind::Boolean),
        "void" => Some(TokenKind::Void),
        "String" => Some(TokenKind::String),

        "class" => Some(TokenKind::Class),
        "public" => Some(TokenKind::Public),
        "static" => Some(TokenKind::Static),
        "main" => Some(TokenKind::Main),
        "extends" => Some(TokenKind::Extends),

        "if" => Some(TokenKind::If),
        "else" => Some(TokenKind::Else),
        "while" => Some(TokenKind::While),
        "return" => Some(TokenKind::Return),

        "true" => Some(TokenKind::True),
        "false" => Some(TokenKind::False),
        "this" => Some(TokenKind::This),
        "new" => Some(TokenKind::New),
        "length" => Some(TokenKind::Length),

        _ => None,
    }
}
