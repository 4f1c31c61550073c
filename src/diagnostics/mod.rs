//! Diagnostic reporting for lexical, syntax and semantic errors.

mod reporter;

pub use reporter::DiagnosticReporter;

use colored::Colorize;
use std::fmt;

/// Position of a diagnostic: 1-based line and column, length in bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: String,
    pub line: usize,
    pub column: usize,
    pub length: usize,
}

impl SourceLocation {
    pub fn new(file: &str, line: usize, column: usize, length: usize) -> Self {
        Self {
            file: file.to_string(),
            line,
            column,
            length,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticLevel {
    Error,
    Note,
}

impl fmt::Display for DiagnosticLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DiagnosticLevel::Error => "error".red().bold(),
            DiagnosticLevel::Note => "note".cyan().bold(),
        };
        write!(f, "{}", text)
    }
}

/// Underline under part of the source line, with an optional message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    pub column: usize,
    pub length: usize,
    pub message: String,
}

/// A diagnostic with optional source context.
///
/// Lexer and parser problems are collected several per file; a semantic
/// error always arrives alone, followed by an `N001` note.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub level: DiagnosticLevel,
    pub code: String,
    pub message: String,
    pub location: Option<SourceLocation>,
    pub source_line: Option<String>,
    pub labels: Vec<Label>,
    pub help: Option<String>,
}

impl Diagnostic {
    fn with_level(level: DiagnosticLevel, code: &str, message: impl Into<String>) -> Self {
        Self {
            level,
            code: code.to_string(),
            message: message.into(),
            location: None,
            source_line: None,
            labels: Vec::new(),
            help: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Error, code, message)
    }

    pub fn note(code: &str, message: impl Into<String>) -> Self {
        Self::with_level(DiagnosticLevel::Note, code, message)
    }

    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_source_line(mut self, line: impl Into<String>) -> Self {
        self.source_line = Some(line.into());
        self
    }

    pub fn with_label(mut self, column: usize, length: usize, message: impl Into<String>) -> Self {
        self.labels.push(Label {
            column,
            length,
            message: message.into(),
        });
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.level == DiagnosticLevel::Error
    }

    /// Source excerpt with underlines, rustc style
    fn render_snippet(&self, f: &mut fmt::Formatter<'_>, loc: &SourceLocation) -> fmt::Result {
        let gutter = loc.line.to_string();
        let pad = " ".repeat(gutter.len());
        let bar = "|".blue();

        writeln!(f, "{}--> {}", pad, loc.to_string().blue())?;
        writeln!(f, "{} {}", pad, bar)?;

        if let Some(source) = &self.source_line {
            writeln!(f, "{} {} {}", gutter.blue().bold(), bar, source)?;
            for label in &self.labels {
                writeln!(f, "{} {} {}", pad, bar, self.underline(label))?;
            }
        }

        writeln!(f, "{} {}", pad, bar)
    }

    fn underline(&self, label: &Label) -> String {
        let indent = " ".repeat(label.column.saturating_sub(1));
        let carets = "^".repeat(label.length.max(1));
        let text = format!("{} {}", carets, label.message);
        let text = text.trim_end();

        match self.level {
            DiagnosticLevel::Error => format!("{}{}", indent, text.red().bold()),
            DiagnosticLevel::Note => format!("{}{}", indent, text.cyan()),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // error[E300]: unknown name 'x'
        writeln!(f, "{}[{}]: {}", self.level, self.code.cyan(), self.message)?;

        if let Some(loc) = &self.location {
            self.render_snippet(f, loc)?;
        }

        if let Some(help) = &self.help {
            writeln!(f, "   {} {}: {}", "=".blue(), "help".green().bold(), help)?;
        }

        Ok(())
    }
}

/// Error codes for MiniJava diagnostics
pub mod codes {
    // Lexer errors (E0xx)
    pub const UNEXPECTED_CHARACTER: &str = "E001";
    pub const UNTERMINATED_COMMENT: &str = "E002";
    pub const INVALID_NUMBER: &str = "E003";

    // Parser errors (E1xx)
    pub const EXPECTED_TOKEN: &str = "E100";
    pub const EXPECTED_EXPRESSION: &str = "E101";
    pub const EXPECTED_STATEMENT: &str = "E102";
    pub const EXPECTED_TYPE: &str = "E103";
    pub const EXPECTED_IDENTIFIER: &str = "E104";
    pub const INTEGER_OUT_OF_RANGE: &str = "E105";

    // Class and member declarations (E2xx)
    pub const DUPLICATE_CLASS: &str = "E200";
    pub const UNKNOWN_SUPERCLASS: &str = "E201";
    pub const SELF_INHERITANCE: &str = "E202";
    pub const UNKNOWN_TYPE: &str = "E203";
    pub const DUPLICATE_FIELD: &str = "E204";
    pub const DUPLICATE_METHOD: &str = "E205";
    pub const METHOD_NAMED_LIKE_CLASS: &str = "E206";
    pub const DUPLICATE_PARAMETER: &str = "E207";
    pub const DUPLICATE_LOCAL: &str = "E208";
    pub const RETURN_TYPE_MISMATCH: &str = "E209";
    pub const ARITY_MISMATCH: &str = "E210";
    pub const PARAMETER_TYPE_MISMATCH: &str = "E211";

    // Statements and expressions (E3xx)
    pub const UNKNOWN_NAME: &str = "E300";
    pub const INCOMPATIBLE_TYPES: &str = "E301";
    pub const INVALID_ARRAY_TYPE: &str = "E302";
    pub const INVALID_INDEX_TYPE: &str = "E303";
    pub const INVALID_CONDITION_TYPE: &str = "E304";
    pub const TYPE_MISMATCH: &str = "E305";
    pub const UNKNOWN_CLASS: &str = "E306";
    pub const UNKNOWN_METHOD: &str = "E307";
    pub const NO_PARAMETERS_EXPECTED: &str = "E308";
    pub const ARGUMENT_TYPE_MISMATCH: &str = "E309";
    pub const INCOMPATIBLE_RETURN_TYPE: &str = "E310";

    // Driver notes (N0xx)
    pub const ANALYSIS_ABORTED: &str = "N001";
}
