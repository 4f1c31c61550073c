//! MiniJava - semantic analysis for a small single-inheritance object language
//!
//! Source files are lexed and parsed into an AST, then checked in three
//! passes that build a symbol table. The finished table carries field
//! offsets and method slots and can be printed as a per-class report.

pub mod diagnostics;
pub mod driver;
pub mod lexer;
pub mod parser;
pub mod semantic;

// Re-export commonly used types
pub use diagnostics::{Diagnostic, DiagnosticLevel, SourceLocation};
pub use driver::Driver;
pub use semantic::{analyze, SemanticError, SemanticErrorKind, SymbolTable};
