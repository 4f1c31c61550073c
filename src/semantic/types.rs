//! Semantic types.

use std::fmt;

use crate::parser::TypeSpecKind;

/// A MiniJava type as seen by the analyzer.
///
/// `Class` holds any other name: a declared class, or an identifier that did
/// not resolve to a variable and flows on as a bare type name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Int,
    Boolean,
    IntArray,
    Class(String),
    /// Result of evaluating `this`; replaced by the enclosing class before any
    /// compatibility check.
    SelfRef,
    /// Return type of the implicit `main` method
    Void,
    /// Parameter type of the implicit `main` method
    StringArray,
}

impl Type {
    pub fn class(name: impl Into<String>) -> Self {
        Type::Class(name.into())
    }

    /// Replace `SelfRef` with the enclosing class
    pub fn resolve_self(self, enclosing_class: &str) -> Type {
        match self {
            Type::SelfRef => Type::Class(enclosing_class.to_string()),
            other => other,
        }
    }

    pub fn class_name(&self) -> Option<&str> {
        match self {
            Type::Class(name) => Some(name),
            _ => None,
        }
    }
}

impl From<&TypeSpecKind> for Type {
    fn from(spec: &TypeSpecKind) -> Self {
        match spec {
            TypeSpecKind::Int => Type::Int,
            TypeSpecKind::Boolean => Type::Boolean,
            TypeSpecKind::IntArray => Type::IntArray,
            TypeSpecKind::Named(name) => Type::Class(name.clone()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Int => f.write_str("int"),
            Type::Boolean => f.write_str("boolean"),
            Type::IntArray => f.write_str("int[]"),
            Type::Class(name) => f.write_str(name),
            Type::SelfRef => f.write_str("this"),
            Type::Void => f.write_str("void"),
            Type::StringArray => f.write_str("String[]"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_resolves_to_enclosing_class_only() {
        assert_eq!(Type::SelfRef.resolve_self("A"), Type::class("A"));
        assert_eq!(Type::Int.resolve_self("A"), Type::Int);
        assert_eq!(Type::class("B").resolve_self("A"), Type::class("B"));
    }

    #[test]
    fn displays_source_spelling() {
        assert_eq!(Type::IntArray.to_string(), "int[]");
        assert_eq!(Type::from(&TypeSpecKind::Named("Tree".into())).to_string(), "Tree");
    }
}
