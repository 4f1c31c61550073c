//! Lexer module for tokenizing MiniJava source code.

mod token;
mod scanner;

pub use token::{Token, TokenKind};
pub use scanner::Scanner;
