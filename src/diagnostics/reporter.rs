//! Diagnostic reporter that collects diagnostics for one source file.

use super::{Diagnostic, SourceLocation};

/// Collects diagnostics for a single file and attaches source context
#[derive(Debug, Default)]
pub struct DiagnosticReporter {
    diagnostics: Vec<Diagnostic>,
    source: String,
    file: String,
    /// Byte offset where each line begins
    line_starts: Vec<usize>,
}

impl DiagnosticReporter {
    pub fn new(file: &str, source: &str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();

        Self {
            diagnostics: Vec::new(),
            source: source.to_string(),
            file: file.to_string(),
            line_starts,
        }
    }

    /// Line and column of a byte offset
    pub fn locate(&self, offset: usize, length: usize) -> SourceLocation {
        let index = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let column = offset.saturating_sub(self.line_starts[index]) + 1;

        SourceLocation::new(&self.file, index + 1, column, length)
    }

    /// Text of a 1-based line, without its terminator
    pub fn line_text(&self, line: usize) -> &str {
        let Some(&start) = line.checked_sub(1).and_then(|i| self.line_starts.get(i)) else {
            return "";
        };
        let end = self
            .line_starts
            .get(line)
            .map_or(self.source.len(), |&next| next - 1);

        self.source[start..end].trim_end_matches('\r')
    }

    /// Report a diagnostic at `offset`, underlining `length` bytes
    pub fn report(&mut self, diagnostic: Diagnostic, offset: usize, length: usize) {
        self.report_with_label(diagnostic, offset, length, "");
    }

    /// Like `report`, with a message next to the underline
    pub fn report_with_label(&mut self, diagnostic: Diagnostic, offset: usize, length: usize, label: &str) {
        let location = self.locate(offset, length);
        let line = self.line_text(location.line).to_string();
        let column = location.column;

        self.add(
            diagnostic
                .with_location(location)
                .with_source_line(line)
                .with_label(column, length, label),
        );
    }

    /// Add a diagnostic without source context
    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn take_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}
