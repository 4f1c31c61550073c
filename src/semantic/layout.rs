//! Field offsets and method slots.
//!
//! Fields are laid out after the parent's fields; a parent's cursor is picked
//! up at the subclass's first field, so a subclass without fields keeps a
//! cursor of zero. Methods take fixed-size slots. A method whose name appears
//! in the immediate parent takes that parent method's slot.

use std::collections::HashMap;

use log::debug;

use super::{SymbolTable, Type};

/// Bytes per method-table slot
pub const METHOD_SLOT_SIZE: usize = 8;

/// Bytes a field of type `ty` occupies
pub fn field_size(ty: &Type) -> usize {
    match ty {
        Type::Int => 4,
        Type::Boolean => 1,
        Type::IntArray => 8,
        _ => 8,
    }
}

/// What a class's layout needs from its parent, once the parent is laid out
struct ParentLayout {
    field_offset: usize,
    method_offset: usize,
    slots: HashMap<String, usize>,
}

/// Assign offsets to every class in declaration order. Parents are always
/// declared before their subclasses, so a parent is final when read.
pub fn assign_offsets(mut table: SymbolTable) -> SymbolTable {
    let names = table.class_names().to_vec();
    for name in &names {
        layout_class(&mut table, name);
    }

    debug!("assigned offsets for {} classes", names.len());
    table
}

fn layout_class(table: &mut SymbolTable, name: &str) {
    let parent = table
        .class(name)
        .and_then(|c| c.parent.as_deref())
        .and_then(|parent| table.class(parent))
        .map(|parent| ParentLayout {
            field_offset: parent.field_offset,
            method_offset: parent.method_offset,
            slots: parent
                .methods
                .iter()
                .map(|m| (m.name.clone(), m.offset))
                .collect(),
        });

    let Some(class) = table.class_mut(name) else {
        return;
    };

    for (index, field) in class.fields.iter_mut().enumerate() {
        if index == 0 {
            if let Some(parent) = &parent {
                class.field_offset = parent.field_offset;
            }
        }
        field.offset = class.field_offset;
        class.field_offset += field_size(&field.ty);
    }

    for (index, method) in class.methods.iter_mut().enumerate() {
        if let Some(parent) = &parent {
            if let Some(&slot) = parent.slots.get(&method.name) {
                method.offset = slot;
                continue;
            }
            if index == 0 {
                class.method_offset = parent.method_offset;
            }
        }
        method.offset = class.method_offset;
        class.method_offset += METHOD_SLOT_SIZE;
    }

    debug!(
        "laid out class '{}': field cursor {}, method cursor {}",
        class.name, class.field_offset, class.method_offset
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::test_support::{analyze_source, with_main};

    fn offsets(table: &SymbolTable, class: &str) -> (Vec<usize>, Vec<usize>) {
        let class = table.class(class).unwrap();
        (
            class.fields.iter().map(|f| f.offset).collect(),
            class.methods.iter().map(|m| m.offset).collect(),
        )
    }

    fn layout(classes: &str) -> SymbolTable {
        analyze_source(&with_main(classes)).unwrap()
    }

    #[test]
    fn fields_advance_by_type_size() {
        let table = layout("class A { boolean b; int i; int[] xs; A next; int last; }");
        assert_eq!(offsets(&table, "A").0, [0, 1, 5, 13, 21]);
        assert_eq!(table.class("A").unwrap().field_offset, 25);
    }

    #[test]
    fn subclass_fields_follow_parent_fields() {
        let table = layout("class A { int a; boolean b; } class B extends A { int c; int d; }");
        assert_eq!(offsets(&table, "B").0, [5, 9]);
    }

    #[test]
    fn methods_take_consecutive_slots() {
        let table = layout(
            "class A { public int f() { return 0; } public int g() { return 0; } }",
        );
        assert_eq!(offsets(&table, "A").1, [0, 8]);
        assert_eq!(table.class("A").unwrap().method_offset, 16);
    }

    #[test]
    fn new_methods_follow_parent_slots() {
        let table = layout(
            "class A { public int f() { return 0; } public int g() { return 0; } }
             class B extends A { public int h() { return 0; } public int f() { return 1; } }",
        );
        assert_eq!(offsets(&table, "B").1, [16, 0]);
    }

    #[test]
    fn leading_override_does_not_seed_the_method_cursor() {
        let table = layout(
            "class A { public int f() { return 0; } }
             class B extends A { public int f() { return 1; } public int g() { return 0; } }",
        );
        assert_eq!(offsets(&table, "B").1, [0, 0]);
    }

    #[test]
    fn fieldless_subclass_does_not_carry_the_parent_cursor() {
        let table = layout(
            "class A { int a; } class B extends A { } class C extends B { int c; }",
        );
        assert_eq!(table.class("B").unwrap().field_offset, 0);
        assert_eq!(offsets(&table, "C").0, [0]);
    }

    #[test]
    fn override_of_a_grandparent_method_takes_a_fresh_slot() {
        let table = layout(
            "class A { public int f() { return 0; } }
             class B extends A { public int g() { return 0; } }
             class C extends B { public int f() { return 1; } public int h() { return 0; } }",
        );
        assert_eq!(offsets(&table, "B").1, [8]);
        assert_eq!(offsets(&table, "C").1, [16, 24]);
    }

    #[test]
    fn main_method_has_slot_zero() {
        let table = layout("");
        let main = table.main_class().unwrap();
        assert_eq!(main.methods[0].offset, 0);
        assert_eq!(main.method_offset, METHOD_SLOT_SIZE);
    }
}
