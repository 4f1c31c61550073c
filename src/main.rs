//! MiniJava semantic analyzer CLI
//!
//! Usage: mjc <FILES>...

use clap::Parser;
use colored::Colorize;
use log::LevelFilter;
use minijava::{Diagnostic, Driver};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "mjc")]
#[command(version = "0.1.0")]
#[command(about = "MiniJava semantic analyzer - checks programs and prints field and method offsets", long_about = None)]
struct Args {
    /// MiniJava source files, analyzed independently in order
    #[arg(value_name = "FILES", required = true)]
    inputs: Vec<PathBuf>,

    /// Print the AST for debugging
    #[arg(long, default_value_t = false)]
    dump_ast: bool,

    /// Print tokens for debugging
    #[arg(long, default_value_t = false)]
    dump_tokens: bool,

    /// Log pass progress (same as RUST_LOG=debug)
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let mut logger = env_logger::Builder::from_default_env();
    if args.verbose {
        logger.filter_level(LevelFilter::Debug);
    }
    logger.init();

    let mut failed = 0;
    for input in &args.inputs {
        if !analyze_file(input, &args) {
            failed += 1;
        }
    }

    if failed > 0 {
        eprintln!(
            "\n{}",
            format!(
                "{} of {} file{} failed",
                failed,
                args.inputs.len(),
                if args.inputs.len() == 1 { "" } else { "s" }
            )
            .red()
            .bold()
        );
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

/// Analyze one file, printing its report or its diagnostics
fn analyze_file(input: &Path, args: &Args) -> bool {
    let source = match std::fs::read_to_string(input) {
        Ok(s) => s,
        Err(e) => {
            eprintln!(
                "{}: could not read file '{}': {}",
                "error".red().bold(),
                input.display(),
                e
            );
            return false;
        }
    };

    let mut driver = Driver::new(input.to_string_lossy(), source);
    driver.set_dump_ast(args.dump_ast);
    driver.set_dump_tokens(args.dump_tokens);

    match driver.compile() {
        Ok(report) => {
            print!("{}", report);
            true
        }
        Err(diagnostics) => {
            print_diagnostics(&diagnostics);
            false
        }
    }
}

fn print_diagnostics(diagnostics: &[Diagnostic]) {
    for diag in diagnostics {
        eprintln!("{}", diag);
    }

    let error_count = diagnostics.iter().filter(|d| d.is_error()).count();
    eprintln!(
        "{} generated",
        format!("{} error{}", error_count, if error_count == 1 { "" } else { "s" })
            .red()
            .bold()
    );
}
