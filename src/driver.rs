//! Driver that runs one source file through the analysis pipeline.

use log::info;

use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::lexer::Scanner;
use crate::parser::{Parser, Program};
use crate::semantic::{self, SymbolTable};

/// The per-file analysis driver
pub struct Driver {
    file: String,
    source: String,
    dump_ast: bool,
    dump_tokens: bool,
}

impl Driver {
    pub fn new(file: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            source: source.into(),
            dump_ast: false,
            dump_tokens: false,
        }
    }

    pub fn set_dump_ast(&mut self, enabled: bool) {
        self.dump_ast = enabled;
    }

    pub fn set_dump_tokens(&mut self, enabled: bool) {
        self.dump_tokens = enabled;
    }

    /// Lex and parse the source file
    pub fn parse(&self) -> Result<Program, Vec<Diagnostic>> {
        let mut reporter = DiagnosticReporter::new(&self.file, &self.source);

        // === Lexical Analysis ===
        let tokens = Scanner::new(&self.source, &mut reporter).scan_tokens();

        if self.dump_tokens {
            eprintln!("=== Tokens ===");
            for token in &tokens {
                eprintln!("{}", token);
            }
            eprintln!();
        }

        if reporter.has_errors() {
            return Err(reporter.take_diagnostics());
        }

        // === Parsing ===
        let program = Parser::new(tokens, &mut reporter).parse();

        if self.dump_ast {
            eprintln!("=== AST ===");
            eprintln!("{:#?}", program);
            eprintln!();
        }

        match program {
            Some(program) if !reporter.has_errors() => {
                info!("{}: parsed {} classes", self.file, program.classes.len() + 1);
                Ok(program)
            }
            _ => Err(reporter.take_diagnostics()),
        }
    }

    /// Parse, then build and check the symbol table
    pub fn analyze(&self) -> Result<SymbolTable, Vec<Diagnostic>> {
        let program = self.parse()?;

        // === Semantic Analysis ===
        semantic::analyze(&program).map_err(|error| {
            info!("{}: semantic analysis failed with {}", self.file, error.code());

            let mut reporter = DiagnosticReporter::new(&self.file, &self.source);
            error.report(&mut reporter);
            reporter.add(Diagnostic::note(
                codes::ANALYSIS_ABORTED,
                "analysis stops at the first semantic error",
            ));
            reporter.take_diagnostics()
        })
    }

    /// Run the whole pipeline and render the symbol-table report
    pub fn compile(&self) -> Result<String, Vec<Diagnostic>> {
        let table = self.analyze()?;
        info!("{}: analysis succeeded", self.file);
        Ok(table.report().to_string())
    }
}
