//! Text rendering of a laid-out symbol table.

use std::fmt;

use super::SymbolTable;

/// Offsets of every class except the main class, in declaration order.
///
/// Methods that override an ancestor's method are listed under the ancestor
/// only.
pub struct Report<'t> {
    table: &'t SymbolTable,
}

impl SymbolTable {
    pub fn report(&self) -> Report<'_> {
        Report { table: self }
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in self.table.classes().skip(1) {
            writeln!(f, "-----------Class {}-----------", class.name)?;

            writeln!(f, "---Variables---")?;
            for field in &class.fields {
                writeln!(f, "{}.{} : {}", class.name, field.name, field.offset)?;
            }

            writeln!(f, "---Methods---")?;
            let fresh = class
                .methods
                .iter()
                .filter(|m| self.table.find_inherited_method(&class.name, &m.name).is_none());
            for method in fresh {
                writeln!(f, "{}.{} : {}", method.owner, method.name, method.offset)?;
            }

            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::semantic::test_support::{analyze_source, with_main};

    fn report(classes: &str) -> String {
        analyze_source(&with_main(classes)).unwrap().report().to_string()
    }

    #[test]
    fn main_class_alone_prints_nothing() {
        assert_eq!(report(""), "");
    }

    #[test]
    fn empty_class_prints_headers() {
        assert_eq!(
            report("class A { }"),
            "-----------Class A-----------\n---Variables---\n---Methods---\n\n"
        );
    }

    #[test]
    fn overrides_are_listed_under_the_ancestor_only() {
        let text = report(
            "class A { int x; public int f() { return x; } }
             class B extends A { boolean y; public int g() { return 3; } public int f() { return 2; } }",
        );
        assert_eq!(
            text,
            "-----------Class A-----------\n\
             ---Variables---\n\
             A.x : 0\n\
             ---Methods---\n\
             A.f : 0\n\
             \n\
             -----------Class B-----------\n\
             ---Variables---\n\
             B.y : 4\n\
             ---Methods---\n\
             B.g : 8\n\
             \n"
        );
    }

    #[test]
    fn grandparent_overrides_are_omitted() {
        let text = report(
            "class A { public int f() { return 0; } }
             class B extends A { public int g() { return 0; } }
             class C extends B { public int f() { return 1; } public int h() { return 0; } }",
        );
        assert!(text.contains("A.f : 0\n"));
        assert!(text.contains("B.g : 8\n"));
        assert!(text.ends_with(
            "-----------Class C-----------\n---Variables---\n---Methods---\nC.h : 24\n\n"
        ));
        assert!(!text.contains("C.f"));
    }
}
