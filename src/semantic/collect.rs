//! Pass 1: register every class and validate inheritance.

use log::debug;

use super::{ClassDescriptor, SemanticError, SemanticErrorKind, SymbolTable};
use crate::parser::{Ident, Program};

/// Build a table holding every class of `program` in declaration order.
///
/// A superclass must be declared before the classes extending it, so a
/// forward reference is reported as an unknown superclass.
pub fn declare_classes(program: &Program) -> Result<SymbolTable, SemanticError> {
    let mut table = SymbolTable::new();

    declare_class(&mut table, &program.main_class.name, None)?;
    for class in &program.classes {
        declare_class(&mut table, &class.name, class.superclass.as_ref())?;
    }

    debug!("declared {} classes", table.class_names().len());
    Ok(table)
}

fn declare_class(
    table: &mut SymbolTable,
    name: &Ident,
    superclass: Option<&Ident>,
) -> Result<(), SemanticError> {
    if table.contains_class(&name.name) {
        return Err(SemanticError::new(
            SemanticErrorKind::DuplicateClass {
                name: name.name.clone(),
            },
            name.span,
        ));
    }

    if let Some(parent) = superclass {
        if parent.name == name.name {
            return Err(SemanticError::new(
                SemanticErrorKind::SelfInheritance {
                    class: name.name.clone(),
                },
                parent.span,
            ));
        }
        if !table.contains_class(&parent.name) {
            return Err(SemanticError::new(
                SemanticErrorKind::UnknownSuperclass {
                    class: name.name.clone(),
                    parent: parent.name.clone(),
                },
                parent.span,
            ));
        }
    }

    debug!("registered class '{}'", name);
    table.insert_class(ClassDescriptor::new(
        name.name.clone(),
        superclass.map(|p| p.name.clone()),
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::test_support::{parse, with_main};

    fn declare(classes: &str) -> Result<SymbolTable, SemanticError> {
        declare_classes(&parse(&with_main(classes)))
    }

    #[test]
    fn registers_classes_in_order() {
        let table = declare("class A { } class B extends A { }").unwrap();
        assert_eq!(table.class_names(), ["Main", "A", "B"]);
        assert_eq!(table.class("B").unwrap().parent.as_deref(), Some("A"));
    }

    #[test]
    fn duplicate_class_is_rejected() {
        let err = declare("class A { } class A { }").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::DuplicateClass { name: "A".into() });
    }

    #[test]
    fn class_may_not_reuse_the_main_class_name() {
        let err = declare("class Main { }").unwrap_err();
        assert!(matches!(err.kind, SemanticErrorKind::DuplicateClass { .. }));
    }

    #[test]
    fn superclass_must_be_declared_first() {
        let err = declare("class B extends A { } class A { }").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::UnknownSuperclass {
                class: "B".into(),
                parent: "A".into()
            }
        );
    }

    #[test]
    fn class_cannot_extend_itself() {
        let err = declare("class A extends A { }").unwrap_err();
        assert_eq!(err.kind, SemanticErrorKind::SelfInheritance { class: "A".into() });
    }
}
