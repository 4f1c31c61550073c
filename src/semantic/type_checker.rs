//! Pass 3: type check every statement and expression.

use log::{debug, trace};

use super::members::MAIN_METHOD;
use super::resolve::{Resolved, Resolver};
use super::{MethodDescriptor, SemanticError, SemanticErrorKind, SymbolTable, Type};
use crate::parser::{BinaryOp, Expr, ExprKind, Ident, MethodDecl, Program, Span, Stmt};

/// The method whose body is being checked
struct Context<'p> {
    class: &'p str,
    method: &'p str,
}

/// Type checker over a fully declared symbol table
pub struct TypeChecker {
    table: SymbolTable,
}

impl TypeChecker {
    pub fn new(table: SymbolTable) -> Self {
        Self { table }
    }

    /// Check all method bodies of `program`, handing the table back on success
    pub fn check(mut self, program: &Program) -> Result<SymbolTable, SemanticError> {
        let main = Context {
            class: &program.main_class.name.name,
            method: MAIN_METHOD,
        };
        self.check_block(&main, &program.main_class.body)?;

        for class in &program.classes {
            for method in &class.methods {
                let cx = Context {
                    class: &class.name.name,
                    method: &method.name.name,
                };
                self.check_method(&cx, method)?;
            }
        }

        debug!("type checked {} classes", program.classes.len() + 1);
        Ok(self.table)
    }

    fn check_method(&mut self, cx: &Context, method: &MethodDecl) -> Result<(), SemanticError> {
        trace!("checking {}.{}", cx.class, cx.method);
        self.check_block(cx, &method.body)?;

        // Pass 2 accepted this return type as written
        let expected = Type::from(&method.return_type.kind);
        let found = self.type_of(cx, &method.return_expr)?.resolve_self(cx.class);

        if !self.table.is_assignable(&expected, &found) {
            return Err(SemanticError::new(
                SemanticErrorKind::IncompatibleReturnType {
                    method: cx.method.to_string(),
                    expected,
                    found,
                },
                method.return_expr.span,
            ));
        }
        Ok(())
    }

    fn check_block(&mut self, cx: &Context, stmts: &[Stmt]) -> Result<(), SemanticError> {
        for stmt in stmts {
            self.check_stmt(cx, stmt)?;
        }
        Ok(())
    }

    fn check_stmt(&mut self, cx: &Context, stmt: &Stmt) -> Result<(), SemanticError> {
        match stmt {
            Stmt::Block(stmts) => self.check_block(cx, stmts),

            Stmt::Assign { target, value } => {
                let resolved = self.resolve_target(cx, target)?;
                let found = self.type_of(cx, value)?.resolve_self(cx.class);

                if !self.table.is_assignable(&resolved.ty, &found) {
                    return Err(SemanticError::new(
                        SemanticErrorKind::IncompatibleTypes {
                            expected: resolved.ty,
                            found,
                        },
                        value.span,
                    ));
                }

                self.table.mark_initialized(&resolved.location, &target.name);
                Ok(())
            }

            Stmt::ArrayAssign {
                target,
                index,
                value,
            } => {
                let resolved = self.resolve_target(cx, target)?;
                if resolved.ty != Type::IntArray {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidArrayType { found: resolved.ty },
                        target.span,
                    ));
                }

                let index_ty = self.type_of(cx, index)?;
                if index_ty != Type::Int {
                    return Err(SemanticError::new(
                        SemanticErrorKind::InvalidIndexType { found: index_ty },
                        index.span,
                    ));
                }

                let found = self.type_of(cx, value)?;
                if found != Type::Int {
                    return Err(SemanticError::new(
                        SemanticErrorKind::IncompatibleTypes {
                            expected: Type::Int,
                            found,
                        },
                        value.span,
                    ));
                }
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.check_condition(cx, "if", condition)?;
                self.check_stmt(cx, then_branch)?;
                self.check_stmt(cx, else_branch)
            }

            Stmt::While { condition, body } => {
                self.check_condition(cx, "while", condition)?;
                self.check_stmt(cx, body)
            }

            Stmt::Print(value) => self.type_of(cx, value).map(|_| ()),
        }
    }

    fn check_condition(
        &self,
        cx: &Context,
        statement: &'static str,
        condition: &Expr,
    ) -> Result<(), SemanticError> {
        let found = self.type_of(cx, condition)?;
        if found != Type::Boolean {
            return Err(SemanticError::new(
                SemanticErrorKind::InvalidConditionType { statement, found },
                condition.span,
            ));
        }
        Ok(())
    }

    fn resolve_target(&self, cx: &Context, target: &Ident) -> Result<Resolved, SemanticError> {
        Resolver::new(&self.table, cx.class, cx.method)
            .resolve(&target.name)
            .ok_or_else(|| {
                SemanticError::new(
                    SemanticErrorKind::UnknownName {
                        name: target.name.clone(),
                    },
                    target.span,
                )
            })
    }

    /// Type of `expr`. `this` yields `Type::SelfRef`; callers that compare
    /// types resolve it first.
    fn type_of(&self, cx: &Context, expr: &Expr) -> Result<Type, SemanticError> {
        match &expr.kind {
            ExprKind::IntLiteral(_) => Ok(Type::Int),
            ExprKind::BoolLiteral(_) => Ok(Type::Boolean),

            // An unresolved name flows on as a type name
            ExprKind::Identifier(name) => Ok(Resolver::new(&self.table, cx.class, cx.method)
                .resolve(name)
                .map(|resolved| resolved.ty)
                .unwrap_or_else(|| Type::Class(name.clone()))),

            ExprKind::This => Ok(Type::SelfRef),

            ExprKind::Paren(inner) => self.type_of(cx, inner),

            ExprKind::Binary { left, op, right } => {
                let left = self.type_of(cx, left)?;
                let right = self.type_of(cx, right)?;
                let (operand, result) = match op {
                    BinaryOp::And => (Type::Boolean, Type::Boolean),
                    BinaryOp::Less => (Type::Int, Type::Boolean),
                    BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul => (Type::Int, Type::Int),
                };

                if left == operand && right == operand {
                    Ok(result)
                } else {
                    Err(mismatch(op.symbol(), left, Some(right), expr.span))
                }
            }

            ExprKind::Not(operand) => {
                let ty = self.type_of(cx, operand)?;
                if ty == Type::Boolean {
                    Ok(Type::Boolean)
                } else {
                    Err(mismatch("!", ty, None, expr.span))
                }
            }

            ExprKind::Length(array) => {
                let ty = self.type_of(cx, array)?;
                if ty == Type::IntArray {
                    Ok(Type::Int)
                } else {
                    Err(mismatch(".length", ty, None, expr.span))
                }
            }

            ExprKind::Index { array, index } => {
                let array = self.type_of(cx, array)?;
                let index = self.type_of(cx, index)?;
                if array == Type::IntArray && index == Type::Int {
                    Ok(Type::Int)
                } else {
                    Err(mismatch("[]", array, Some(index), expr.span))
                }
            }

            ExprKind::NewArray(size) => {
                let ty = self.type_of(cx, size)?;
                if ty == Type::Int {
                    Ok(Type::IntArray)
                } else {
                    Err(mismatch("new int[]", ty, None, expr.span))
                }
            }

            ExprKind::NewObject(class) => {
                if self.table.contains_class(&class.name) {
                    Ok(Type::Class(class.name.clone()))
                } else {
                    Err(SemanticError::new(
                        SemanticErrorKind::UnknownClass {
                            name: class.name.clone(),
                        },
                        class.span,
                    ))
                }
            }

            ExprKind::Call {
                receiver,
                method,
                args,
            } => self.type_of_call(cx, receiver, method, args, expr.span),
        }
    }

    fn type_of_call(
        &self,
        cx: &Context,
        receiver: &Expr,
        method: &Ident,
        args: &[Expr],
        span: Span,
    ) -> Result<Type, SemanticError> {
        let receiver_ty = self.type_of(cx, receiver)?.resolve_self(cx.class);
        let class = match &receiver_ty {
            Type::Class(name) if self.table.contains_class(name) => name,
            other => {
                return Err(SemanticError::new(
                    SemanticErrorKind::UnknownClass {
                        name: other.to_string(),
                    },
                    receiver.span,
                ))
            }
        };

        let target = self.table.find_method(class, &method.name).ok_or_else(|| {
            SemanticError::new(
                SemanticErrorKind::UnknownMethod {
                    class: class.clone(),
                    method: method.name.clone(),
                },
                method.span,
            )
        })?;

        if !args.is_empty() {
            self.check_arguments(cx, target, args, span)?;
        }

        Ok(target.return_type.clone())
    }

    fn check_arguments(
        &self,
        cx: &Context,
        target: &MethodDescriptor,
        args: &[Expr],
        span: Span,
    ) -> Result<(), SemanticError> {
        if target.params.is_empty() {
            return Err(SemanticError::new(
                SemanticErrorKind::NoParametersExpected {
                    method: target.name.clone(),
                },
                span,
            ));
        }

        let arg_types = args
            .iter()
            .map(|arg| Ok(self.type_of(cx, arg)?.resolve_self(cx.class)))
            .collect::<Result<Vec<_>, SemanticError>>()?;

        if arg_types.len() != target.params.len() {
            return Err(SemanticError::new(
                SemanticErrorKind::ArityMismatch {
                    method: target.name.clone(),
                    expected: target.params.len(),
                    found: arg_types.len(),
                },
                span,
            ));
        }

        for ((param, found), arg) in target.params.iter().zip(arg_types).zip(args) {
            if !self.table.is_assignable(&param.ty, &found) {
                return Err(SemanticError::new(
                    SemanticErrorKind::ArgumentTypeMismatch {
                        method: target.name.clone(),
                        param: param.name.clone(),
                        expected: param.ty.clone(),
                        found,
                    },
                    arg.span,
                ));
            }
        }

        Ok(())
    }
}

fn mismatch(op: &'static str, left: Type, right: Option<Type>, span: Span) -> SemanticError {
    SemanticError::new(SemanticErrorKind::TypeMismatch { op, left, right }, span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::semantic::test_support::{analyze_source, with_main};

    fn check(classes: &str) -> Result<SymbolTable, SemanticError> {
        analyze_source(&with_main(classes))
    }

    fn check_err(classes: &str) -> SemanticErrorKind {
        check(classes).unwrap_err().kind
    }

    /// Wrap statements into `A.run()` with the given locals
    fn body(locals: &str, stmts: &str) -> String {
        format!(
            "class A {{ int[] xs; public int run() {{ {} {} return 0; }} }}",
            locals, stmts
        )
    }

    #[test]
    fn well_typed_method_passes() {
        check(&body(
            "int i; boolean b;",
            "xs = new int[10]; i = 0; b = true;
             while (i < xs.length && b) { xs[i] = i * 2; i = i + 1; }
             if (!b) System.out.println(xs[0]); else System.out.println(i);",
        ))
        .unwrap();
    }

    #[test]
    fn assignment_marks_local_initialized() {
        let table = check(&body("int i; int j;", "i = 1;")).unwrap();
        let run = table.class("A").unwrap().method("run").unwrap();
        assert!(run.variable("i").unwrap().initialized);
        assert!(!run.variable("j").unwrap().initialized);
    }

    #[test]
    fn assignment_to_unknown_name_fails() {
        assert_eq!(
            check_err(&body("", "y = 1;")),
            SemanticErrorKind::UnknownName { name: "y".into() }
        );
    }

    #[test]
    fn assignment_needs_matching_types() {
        assert_eq!(
            check_err(&body("int i;", "i = true;")),
            SemanticErrorKind::IncompatibleTypes {
                expected: Type::Int,
                found: Type::Boolean
            }
        );
    }

    #[test]
    fn upcast_is_allowed_and_downcast_is_not() {
        let classes = "class B { } class D extends B { }
             class E { public int run() { B b; D d; b = new D(); return 0; } }";
        check(classes).unwrap();

        let err = check_err(
            "class B { } class D extends B { }
             class E { public int run() { D d; d = new B(); return 0; } }",
        );
        assert!(matches!(err, SemanticErrorKind::IncompatibleTypes { .. }));
    }

    #[test]
    fn unrelated_class_is_incompatible() {
        let err = check_err(
            "class B { } class C { }
             class E { public int run() { B b; b = new C(); return 0; } }",
        );
        assert_eq!(
            err,
            SemanticErrorKind::IncompatibleTypes {
                expected: Type::class("B"),
                found: Type::class("C")
            }
        );
    }

    #[test]
    fn this_is_assignable_to_its_own_class() {
        check("class A { A self; public int run() { self = this; return 0; } }").unwrap();
    }

    #[test]
    fn array_assignment_rules() {
        assert_eq!(
            check_err(&body("int i;", "i[0] = 1;")),
            SemanticErrorKind::InvalidArrayType { found: Type::Int }
        );
        assert_eq!(
            check_err(&body("", "xs[true] = 1;")),
            SemanticErrorKind::InvalidIndexType {
                found: Type::Boolean
            }
        );
        assert!(matches!(
            check_err(&body("", "xs[0] = false;")),
            SemanticErrorKind::IncompatibleTypes { .. }
        ));
    }

    #[test]
    fn conditions_must_be_boolean() {
        assert_eq!(
            check_err(&body("", "while (1) { }")),
            SemanticErrorKind::InvalidConditionType {
                statement: "while",
                found: Type::Int
            }
        );
        assert!(matches!(
            check_err(&body("", "if (xs) { } else { }")),
            SemanticErrorKind::InvalidConditionType { statement: "if", .. }
        ));
    }

    #[test]
    fn operators_report_their_operands() {
        assert_eq!(
            check_err(&body("", "System.out.println(1 + true);")),
            SemanticErrorKind::TypeMismatch {
                op: "+",
                left: Type::Int,
                right: Some(Type::Boolean)
            }
        );
        assert_eq!(
            check_err(&body("", "System.out.println(!1);")),
            SemanticErrorKind::TypeMismatch {
                op: "!",
                left: Type::Int,
                right: None
            }
        );
        assert!(matches!(
            check_err(&body("boolean b;", "b = 1 < false;")),
            SemanticErrorKind::TypeMismatch { op: "<", .. }
        ));
        assert!(matches!(
            check_err(&body("int i;", "i = i.length;")),
            SemanticErrorKind::TypeMismatch { op: ".length", .. }
        ));
        assert!(matches!(
            check_err(&body("", "xs = new int[true];")),
            SemanticErrorKind::TypeMismatch { op: "new int[]", .. }
        ));
    }

    #[test]
    fn logical_and_and_indexing_report_their_operands() {
        assert_eq!(
            check_err(&body("", "System.out.println(this && true);")),
            SemanticErrorKind::TypeMismatch {
                op: "&&",
                left: Type::SelfRef,
                right: Some(Type::Boolean)
            }
        );
        assert_eq!(
            check_err(&body("", "System.out.println(xs[true]);")),
            SemanticErrorKind::TypeMismatch {
                op: "[]",
                left: Type::IntArray,
                right: Some(Type::Boolean)
            }
        );
    }

    #[test]
    fn class_name_used_as_receiver_types_as_that_class() {
        check("class A { public int f() { return A.f(); } }").unwrap();
    }

    #[test]
    fn allocating_an_unknown_class_fails() {
        assert_eq!(
            check_err(&body("", "System.out.println(new Nope());")),
            SemanticErrorKind::UnknownClass {
                name: "Nope".into()
            }
        );
    }

    #[test]
    fn inherited_fields_resolve() {
        check(
            "class B { int count; }
             class D extends B { public int bump() { count = count + 1; return count; } }",
        )
        .unwrap();
    }

    #[test]
    fn calls_resolve_through_ancestors() {
        check(
            "class B { public int get() { return 1; } }
             class D extends B { public int twice() { return this.get() + this.get(); } }",
        )
        .unwrap();
    }

    #[test]
    fn call_on_non_class_fails() {
        assert_eq!(
            check_err(&body("int i;", "i = i.run();")),
            SemanticErrorKind::UnknownClass { name: "int".into() }
        );
    }

    #[test]
    fn call_to_missing_method_fails() {
        assert_eq!(
            check_err(&body("int i;", "i = this.walk();")),
            SemanticErrorKind::UnknownMethod {
                class: "A".into(),
                method: "walk".into()
            }
        );
    }

    #[test]
    fn arguments_to_parameterless_method_fail() {
        assert_eq!(
            check_err(&body("int i;", "i = this.run(1);")),
            SemanticErrorKind::NoParametersExpected {
                method: "run".into()
            }
        );
    }

    #[test]
    fn empty_argument_list_skips_parameter_checks() {
        check(
            "class A { public int f(int x) { return x; }
                       public int g() { return this.f(); } }",
        )
        .unwrap();
    }

    #[test]
    fn argument_count_must_match() {
        let err = check_err(
            "class A { public int f(int a, int b) { return a; }
                       public int g() { return this.f(1); } }",
        );
        assert_eq!(
            err,
            SemanticErrorKind::ArityMismatch {
                method: "f".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn arguments_accept_subclasses() {
        check(
            "class B { public int take(B b) { return 1; } }
             class D extends B { public int give() { return this.take(this); } }",
        )
        .unwrap();

        let err = check_err(
            "class B { public int take(B b) { return 1; } }
             class C { public int give() { B b; b = new B(); return b.take(this); } }",
        );
        assert_eq!(
            err,
            SemanticErrorKind::ArgumentTypeMismatch {
                method: "take".into(),
                param: "b".into(),
                expected: Type::class("B"),
                found: Type::class("C")
            }
        );
    }

    #[test]
    fn return_expression_must_match_declared_type() {
        assert_eq!(
            check_err("class A { public int f() { return true; } }"),
            SemanticErrorKind::IncompatibleReturnType {
                method: "f".into(),
                expected: Type::Int,
                found: Type::Boolean
            }
        );
        check("class B { } class D extends B { public B f() { return this; } }").unwrap();
    }

    #[test]
    fn main_body_is_checked() {
        let err = analyze_source(
            "class Main { public static void main(String[] a) { int x; x = false; } }",
        )
        .unwrap_err();
        assert!(matches!(err.kind, SemanticErrorKind::IncompatibleTypes { .. }));

        analyze_source(
            "class Main { public static void main(String[] a) { System.out.println(new A().f()); } }
             class A { public int f() { return 1; } }",
        )
        .unwrap();
    }
}
