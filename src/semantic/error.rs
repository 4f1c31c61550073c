//! Semantic errors. Every kind is fatal to the analysis of the current program.

use thiserror::Error;

use super::Type;
use crate::diagnostics::{codes, Diagnostic, DiagnosticReporter};
use crate::parser::Span;

/// The first semantic violation found in a program, with where it occurred
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub span: Span,
}

impl SemanticError {
    pub fn new(kind: SemanticErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Report this error through `reporter`, pointing at its span
    pub fn report(&self, reporter: &mut DiagnosticReporter) {
        let mut diagnostic = Diagnostic::error(self.code(), self.to_string());
        if let Some(help) = self.kind.help() {
            diagnostic = diagnostic.with_help(help);
        }
        reporter.report(diagnostic, self.span.offset, self.span.length);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticErrorKind {
    #[error("class '{name}' is already defined")]
    DuplicateClass { name: String },

    #[error("superclass '{parent}' of class '{class}' does not exist")]
    UnknownSuperclass { class: String, parent: String },

    #[error("class '{class}' cannot extend itself")]
    SelfInheritance { class: String },

    #[error("invalid type '{ty}' for '{name}'")]
    UnknownType { ty: String, name: String },

    #[error("field '{field}' is already defined in class '{class}'")]
    DuplicateField { class: String, field: String },

    #[error("method '{method}' is already defined in class '{class}'")]
    DuplicateMethod { class: String, method: String },

    #[error("method '{class}' cannot have the same name as its class")]
    MethodNameCollidesWithClass { class: String },

    #[error("parameter '{param}' is already defined in method '{method}'")]
    DuplicateParameter { method: String, param: String },

    #[error("variable '{name}' is already defined in method '{method}'")]
    DuplicateLocal { method: String, name: String },

    #[error(
        "method '{method}' returns '{found}' but overrides a method of '{superclass}' returning '{expected}'"
    )]
    ReturnTypeMismatch {
        method: String,
        superclass: String,
        expected: Type,
        found: Type,
    },

    #[error("method '{method}' takes {expected} argument(s) but {found} were given")]
    ArityMismatch {
        method: String,
        expected: usize,
        found: usize,
    },

    #[error(
        "parameter {position} of method '{method}' is '{found}' but the overridden method in '{superclass}' takes '{expected}'"
    )]
    ParameterTypeMismatch {
        method: String,
        superclass: String,
        position: usize,
        expected: Type,
        found: Type,
    },

    #[error("unknown name '{name}'")]
    UnknownName { name: String },

    #[error("incompatible types: expected '{expected}', found '{found}'")]
    IncompatibleTypes { expected: Type, found: Type },

    #[error("invalid array type '{found}'")]
    InvalidArrayType { found: Type },

    #[error("invalid index type '{found}'")]
    InvalidIndexType { found: Type },

    #[error("invalid condition type '{found}' in {statement} statement")]
    InvalidConditionType { statement: &'static str, found: Type },

    #[error("bad operand types for '{op}': {}", operands(.left, .right))]
    TypeMismatch {
        op: &'static str,
        left: Type,
        right: Option<Type>,
    },

    #[error("'{name}' is not a declared class")]
    UnknownClass { name: String },

    #[error("method '{method}' does not exist in class '{class}' or its superclasses")]
    UnknownMethod { class: String, method: String },

    #[error("method '{method}' does not take arguments")]
    NoParametersExpected { method: String },

    #[error("invalid type for argument '{param}' of method '{method}': expected '{expected}', found '{found}'")]
    ArgumentTypeMismatch {
        method: String,
        param: String,
        expected: Type,
        found: Type,
    },

    #[error("incompatible return type '{found}' for method '{method}', expected '{expected}'")]
    IncompatibleReturnType {
        method: String,
        expected: Type,
        found: Type,
    },
}

fn operands(left: &Type, right: &Option<Type>) -> String {
    match right {
        Some(right) => format!("'{}' and '{}'", left, right),
        None => format!("'{}'", left),
    }
}

impl SemanticErrorKind {
    pub fn code(&self) -> &'static str {
        use SemanticErrorKind::*;

        match self {
            DuplicateClass { .. } => codes::DUPLICATE_CLASS,
            UnknownSuperclass { .. } => codes::UNKNOWN_SUPERCLASS,
            SelfInheritance { .. } => codes::SELF_INHERITANCE,
            UnknownType { .. } => codes::UNKNOWN_TYPE,
            DuplicateField { .. } => codes::DUPLICATE_FIELD,
            DuplicateMethod { .. } => codes::DUPLICATE_METHOD,
            MethodNameCollidesWithClass { .. } => codes::METHOD_NAMED_LIKE_CLASS,
            DuplicateParameter { .. } => codes::DUPLICATE_PARAMETER,
            DuplicateLocal { .. } => codes::DUPLICATE_LOCAL,
            ReturnTypeMismatch { .. } => codes::RETURN_TYPE_MISMATCH,
            ArityMismatch { .. } => codes::ARITY_MISMATCH,
            ParameterTypeMismatch { .. } => codes::PARAMETER_TYPE_MISMATCH,
            UnknownName { .. } => codes::UNKNOWN_NAME,
            IncompatibleTypes { .. } => codes::INCOMPATIBLE_TYPES,
            InvalidArrayType { .. } => codes::INVALID_ARRAY_TYPE,
            InvalidIndexType { .. } => codes::INVALID_INDEX_TYPE,
            InvalidConditionType { .. } => codes::INVALID_CONDITION_TYPE,
            TypeMismatch { .. } => codes::TYPE_MISMATCH,
            UnknownClass { .. } => codes::UNKNOWN_CLASS,
            UnknownMethod { .. } => codes::UNKNOWN_METHOD,
            NoParametersExpected { .. } => codes::NO_PARAMETERS_EXPECTED,
            ArgumentTypeMismatch { .. } => codes::ARGUMENT_TYPE_MISMATCH,
            IncompatibleReturnType { .. } => codes::INCOMPATIBLE_RETURN_TYPE,
        }
    }

    fn help(&self) -> Option<String> {
        use SemanticErrorKind::*;

        match self {
            UnknownSuperclass { parent, .. } => Some(format!(
                "declare class '{}' before any class that extends it",
                parent
            )),
            ReturnTypeMismatch { .. } | ParameterTypeMismatch { .. } => {
                Some("an overriding method must repeat the overridden signature exactly".into())
            }
            IncompatibleTypes { expected, .. } if expected.class_name().is_some() => Some(format!(
                "only '{}' or one of its subclasses can be assigned here",
                expected
            )),
            UnknownName { name } => Some(format!(
                "declare '{}' as a local variable, a parameter or a field",
                name
            )),
            _ => None,
        }
    }
}
