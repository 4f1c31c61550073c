//! Semantic analysis: symbol table construction, type checking and layout.
//!
//! Analysis runs as a sequence of passes, each taking the table built so far
//! and handing it on. The first violation ends the analysis of the program.

mod collect;
mod error;
mod layout;
mod members;
mod report;
mod resolve;
mod symbol_table;
mod type_checker;
mod types;

pub use collect::declare_classes;
pub use error::{SemanticError, SemanticErrorKind};
pub use layout::{assign_offsets, field_size, METHOD_SLOT_SIZE};
pub use members::{declare_members, MAIN_METHOD};
pub use report::Report;
pub use resolve::{Resolved, Resolver, Scope, VarLocation, RESOLUTION_ORDER};
pub use symbol_table::{Ancestors, ClassDescriptor, FieldDescriptor, MethodDescriptor, SymbolTable};
pub use type_checker::TypeChecker;
pub use types::Type;

use log::debug;

use crate::parser::Program;

/// Run every pass over `program` and return the laid-out symbol table
pub fn analyze(program: &Program) -> Result<SymbolTable, SemanticError> {
    let table = declare_classes(program)?;
    let table = declare_members(program, table)?;
    let table = TypeChecker::new(table).check(program)?;
    let table = assign_offsets(table);

    debug!("analysis finished for main class '{}'", program.main_class.name);
    Ok(table)
}
