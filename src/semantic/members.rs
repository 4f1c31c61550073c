//! Pass 2: register fields, methods, parameters and locals, and check that
//! every override repeats its ancestor's signature exactly.

use log::debug;

use super::{
    ClassDescriptor, FieldDescriptor, MethodDescriptor, SemanticError, SemanticErrorKind,
    SymbolTable, Type,
};
use crate::parser::{ClassDecl, MainClass, MethodDecl, Program, TypeSpec, VarDecl};

/// Name of the implicit entry-point method of the main class
pub const MAIN_METHOD: &str = "main";

pub fn declare_members(program: &Program, mut table: SymbolTable) -> Result<SymbolTable, SemanticError> {
    declare_main_method(&mut table, &program.main_class)?;

    for class in &program.classes {
        declare_class_members(&mut table, class)?;
    }

    debug!("declared members of {} classes", table.class_names().len());
    Ok(table)
}

fn declare_main_method(table: &mut SymbolTable, main: &MainClass) -> Result<(), SemanticError> {
    let mut owner = ClassDescriptor::new(main.name.name.clone(), None);

    let mut method = MethodDescriptor::new(MAIN_METHOD, owner.name.clone(), Type::Void);
    method.add_param(FieldDescriptor::new(
        main.args.name.clone(),
        Type::StringArray,
        true,
    ));
    declare_locals(table, &mut method, &main.locals)?;
    owner.methods.push(method);

    table.replace_class(owner);
    Ok(())
}

fn declare_class_members(table: &mut SymbolTable, class: &ClassDecl) -> Result<(), SemanticError> {
    let mut owner = ClassDescriptor::new(
        class.name.name.clone(),
        class.superclass.as_ref().map(|parent| parent.name.clone()),
    );

    // Fields of an extending class start out initialized
    let initialized = owner.parent.is_some();

    for decl in &class.fields {
        let ty = known_type(table, decl)?;
        if owner.field(&decl.name.name).is_some() {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateField {
                    class: owner.name.clone(),
                    field: decl.name.name.clone(),
                },
                decl.name.span,
            ));
        }
        owner
            .fields
            .push(FieldDescriptor::new(decl.name.name.clone(), ty, initialized));
    }

    for decl in &class.methods {
        declare_method(table, &mut owner, decl)?;
    }

    table.replace_class(owner);
    Ok(())
}

/// Declare `decl` on `owner`. The table still holds `owner` without members,
/// which is all the ancestor lookups of the override check need.
fn declare_method(
    table: &SymbolTable,
    owner: &mut ClassDescriptor,
    decl: &MethodDecl,
) -> Result<(), SemanticError> {
    let method_name = &decl.name.name;

    let return_type = type_of(table, &decl.return_type, method_name)?;

    if owner.method(method_name).is_some() {
        return Err(SemanticError::new(
            SemanticErrorKind::DuplicateMethod {
                class: owner.name.clone(),
                method: method_name.clone(),
            },
            decl.name.span,
        ));
    }
    if *method_name == owner.name {
        return Err(SemanticError::new(
            SemanticErrorKind::MethodNameCollidesWithClass {
                class: owner.name.clone(),
            },
            decl.name.span,
        ));
    }

    let mut method = MethodDescriptor::new(method_name.clone(), owner.name.clone(), return_type);

    for param in &decl.params {
        let ty = known_type(table, param)?;
        if method.has_param(&param.name.name) {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateParameter {
                    method: method_name.clone(),
                    param: param.name.name.clone(),
                },
                param.name.span,
            ));
        }
        method.add_param(FieldDescriptor::new(param.name.name.clone(), ty, true));
    }

    check_override(table, &method, decl)?;
    declare_locals(table, &mut method, &decl.locals)?;

    owner.methods.push(method);
    Ok(())
}

/// An override must match the nearest ancestor method of the same name in
/// return type, parameter count and every parameter type.
fn check_override(
    table: &SymbolTable,
    method: &MethodDescriptor,
    decl: &MethodDecl,
) -> Result<(), SemanticError> {
    let Some(inherited) = table.find_inherited_method(&method.owner, &method.name) else {
        return Ok(());
    };

    if inherited.return_type != method.return_type {
        return Err(SemanticError::new(
            SemanticErrorKind::ReturnTypeMismatch {
                method: method.name.clone(),
                superclass: inherited.owner.clone(),
                expected: inherited.return_type.clone(),
                found: method.return_type.clone(),
            },
            decl.return_type.span,
        ));
    }

    if inherited.params.len() != method.params.len() {
        return Err(SemanticError::new(
            SemanticErrorKind::ArityMismatch {
                method: method.name.clone(),
                expected: inherited.params.len(),
                found: method.params.len(),
            },
            decl.name.span,
        ));
    }

    let mismatch = inherited
        .params
        .iter()
        .zip(&method.params)
        .zip(&decl.params)
        .enumerate()
        .find(|(_, ((expected, found), _))| expected.ty != found.ty);
    if let Some((index, ((expected, found), param))) = mismatch {
        return Err(SemanticError::new(
            SemanticErrorKind::ParameterTypeMismatch {
                method: method.name.clone(),
                superclass: inherited.owner.clone(),
                position: index + 1,
                expected: expected.ty.clone(),
                found: found.ty.clone(),
            },
            param.type_spec.span,
        ));
    }

    Ok(())
}

fn declare_locals(
    table: &SymbolTable,
    method: &mut MethodDescriptor,
    locals: &[VarDecl],
) -> Result<(), SemanticError> {
    for decl in locals {
        let ty = known_type(table, decl)?;
        if method.has_variable(&decl.name.name) {
            return Err(SemanticError::new(
                SemanticErrorKind::DuplicateLocal {
                    method: method.name.clone(),
                    name: decl.name.name.clone(),
                },
                decl.name.span,
            ));
        }
        method.add_local(FieldDescriptor::new(decl.name.name.clone(), ty, false));
    }
    Ok(())
}

fn known_type(table: &SymbolTable, decl: &VarDecl) -> Result<Type, SemanticError> {
    type_of(table, &decl.type_spec, &decl.name.name)
}

fn type_of(table: &SymbolTable, spec: &TypeSpec, name: &str) -> Result<Type, SemanticError> {
    let ty = Type::from(&spec.kind);
    if table.is_known_type(&ty) {
        Ok(ty)
    } else {
        Err(SemanticError::new(
            SemanticErrorKind::UnknownType {
                ty: ty.to_string(),
                name: name.to_string(),
            },
            spec.span,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::collect::declare_classes;
    use crate::semantic::test_support::{parse, with_main};

    fn declare(source: &str) -> Result<SymbolTable, SemanticError> {
        let program = parse(source);
        declare_members(&program, declare_classes(&program)?)
    }

    fn declare_classes_src(classes: &str) -> Result<SymbolTable, SemanticError> {
        declare(&with_main(classes))
    }

    #[test]
    fn main_method_is_implicit() {
        let table = declare(
            "class Main { public static void main(String[] argv) { int i; i = 0; } }",
        )
        .unwrap();
        let main = table.main_class().unwrap().method(MAIN_METHOD).unwrap();

        assert_eq!(main.return_type, Type::Void);
        assert_eq!(main.params[0].name, "argv");
        assert_eq!(main.params[0].ty, Type::StringArray);
        assert!(main.params[0].initialized);
        assert_eq!(main.locals[0].name, "i");
    }

    #[test]
    fn fields_keep_order_and_initialization() {
        let table = declare_classes_src(
            "class A { int a; boolean b; } class B extends A { A link; int[] xs; }",
        )
        .unwrap();

        let a = table.class("A").unwrap();
        assert_eq!(a.fields.iter().map(|f| f.name.as_str()).collect::<Vec<_>>(), ["a", "b"]);
        assert!(!a.fields[0].initialized);

        let b = table.class("B").unwrap();
        assert_eq!(b.fields[0].ty, Type::class("A"));
        assert!(b.fields.iter().all(|f| f.initialized));
    }

    #[test]
    fn field_of_undeclared_class_type_is_rejected() {
        let err = declare_classes_src("class A { Missing m; }").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::UnknownType {
                ty: "Missing".into(),
                name: "m".into()
            }
        );
    }

    #[test]
    fn method_signature_types_must_be_declared() {
        assert_eq!(
            declare_classes_src("class A { public Missing f() { return 0; } }")
                .unwrap_err()
                .kind,
            SemanticErrorKind::UnknownType {
                ty: "Missing".into(),
                name: "f".into()
            }
        );
        assert_eq!(
            declare_classes_src("class A { public int f(Missing m) { return 0; } }")
                .unwrap_err()
                .kind,
            SemanticErrorKind::UnknownType {
                ty: "Missing".into(),
                name: "m".into()
            }
        );
    }

    #[test]
    fn sibling_classes_may_reference_each_other() {
        declare_classes_src("class A { B b; } class B { A a; }").unwrap();
    }

    #[test]
    fn duplicate_field_is_rejected_but_shadowing_is_not() {
        let err = declare_classes_src("class A { int x; boolean x; }").unwrap_err();
        assert!(matches!(err.kind, SemanticErrorKind::DuplicateField { .. }));

        declare_classes_src("class A { int x; } class B extends A { boolean x; }").unwrap();
    }

    #[test]
    fn duplicate_method_is_rejected() {
        let err = declare_classes_src(
            "class A { public int f() { return 1; } public int f() { return 2; } }",
        )
        .unwrap_err();
        assert!(matches!(err.kind, SemanticErrorKind::DuplicateMethod { .. }));
    }

    #[test]
    fn method_named_like_its_class_is_rejected() {
        let err = declare_classes_src("class A { public int A() { return 1; } }").unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::MethodNameCollidesWithClass { class: "A".into() }
        );
    }

    #[test]
    fn duplicate_parameter_is_rejected() {
        let err = declare_classes_src("class A { public int f(int a, boolean a) { return 1; } }")
            .unwrap_err();
        assert!(matches!(err.kind, SemanticErrorKind::DuplicateParameter { .. }));
    }

    #[test]
    fn local_may_not_shadow_a_parameter() {
        let err = declare_classes_src("class A { public int f(int a) { int a; return a; } }")
            .unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::DuplicateLocal {
                method: "f".into(),
                name: "a".into()
            }
        );
    }

    #[test]
    fn override_with_other_return_type_is_rejected() {
        let err = declare_classes_src(
            "class A { public int f() { return 1; } }
             class B extends A { public boolean f() { return true; } }",
        )
        .unwrap_err();
        assert!(matches!(
            err.kind,
            SemanticErrorKind::ReturnTypeMismatch { expected: Type::Int, found: Type::Boolean, .. }
        ));
    }

    #[test]
    fn override_with_other_arity_is_rejected() {
        let err = declare_classes_src(
            "class A { public int f(int a) { return a; } }
             class B extends A { }
             class C extends B { public int f() { return 1; } }",
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::ArityMismatch {
                method: "f".into(),
                expected: 1,
                found: 0
            }
        );
    }

    #[test]
    fn override_parameters_are_invariant() {
        let err = declare_classes_src(
            "class A { public int f(int a, A other) { return a; } }
             class B extends A { public int f(int a, B other) { return a; } }",
        )
        .unwrap_err();
        assert_eq!(
            err.kind,
            SemanticErrorKind::ParameterTypeMismatch {
                method: "f".into(),
                superclass: "A".into(),
                position: 2,
                expected: Type::class("A"),
                found: Type::class("B"),
            }
        );
    }

    #[test]
    fn declared_members_keep_the_inheritance_link() {
        let table = declare_classes_src(
            "class A { public int f() { return 1; } }
             class B extends A { int x; public int g() { return 2; } }",
        )
        .unwrap();

        let b = table.class("B").unwrap();
        assert_eq!(b.parent.as_deref(), Some("A"));
        assert_eq!(b.fields.len(), 1);
        assert_eq!(b.methods[0].owner, "B");
        assert_eq!(table.find_method("B", "f").unwrap().owner, "A");
        assert_eq!(table.class_names(), ["Main", "A", "B"]);
    }

    #[test]
    fn exact_override_is_accepted() {
        let table = declare_classes_src(
            "class A { public int f(int a) { return a; } }
             class B extends A { public int f(int b) { return b; } }",
        )
        .unwrap();
        assert_eq!(table.find_inherited_method("B", "f").unwrap().owner, "A");
    }
}
