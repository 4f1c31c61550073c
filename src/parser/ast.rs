//! Abstract Syntax Tree definitions for MiniJava.

use std::fmt;

/// Source span for tracking positions in error messages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    /// Byte offset from start of source
    pub offset: usize,
    /// Length in bytes
    pub length: usize,
}

impl Span {
    pub fn new(offset: usize, length: usize) -> Self {
        Self { offset, length }
    }

    /// Create a span that covers both self and other
    pub fn merge(&self, other: &Span) -> Span {
        let start = self.offset.min(other.offset);
        let end = (self.offset + self.length).max(other.offset + other.length);
        Span::new(start, end - start)
    }
}

/// An identifier together with where it was written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// The root of the AST - a complete program
#[derive(Debug, Clone)]
pub struct Program {
    pub main_class: MainClass,
    /// Further classes, in source order
    pub classes: Vec<ClassDecl>,
}

/// The class holding `public static void main(String[] args)`
#[derive(Debug, Clone)]
pub struct MainClass {
    pub name: Ident,
    /// Name of the `String[]` parameter
    pub args: Ident,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
}

/// `class Name [extends Parent] { fields methods }`
#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub name: Ident,
    pub superclass: Option<Ident>,
    pub fields: Vec<VarDecl>,
    pub methods: Vec<MethodDecl>,
}

/// `public Type name(params) { locals body return expr; }`
#[derive(Debug, Clone)]
pub struct MethodDecl {
    pub return_type: TypeSpec,
    pub name: Ident,
    pub params: Vec<VarDecl>,
    pub locals: Vec<VarDecl>,
    pub body: Vec<Stmt>,
    pub return_expr: Expr,
}

/// A `Type name` pair: field, parameter or local variable
#[derive(Debug, Clone)]
pub struct VarDecl {
    pub type_spec: TypeSpec,
    pub name: Ident,
}

/// A type as written in the source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSpec {
    pub kind: TypeSpecKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSpecKind {
    Int,
    Boolean,
    IntArray,
    Named(String),
}

impl fmt::Display for TypeSpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSpecKind::Int => f.write_str("int"),
            TypeSpecKind::Boolean => f.write_str("boolean"),
            TypeSpecKind::IntArray => f.write_str("int[]"),
            TypeSpecKind::Named(name) => f.write_str(name),
        }
    }
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    /// `{ stmts }`
    Block(Vec<Stmt>),

    /// `target = value;`
    Assign { target: Ident, value: Expr },

    /// `target[index] = value;`
    ArrayAssign { target: Ident, index: Expr, value: Expr },

    /// `if (condition) then_branch else else_branch`
    If {
        condition: Expr,
        then_branch: Box<Stmt>,
        else_branch: Box<Stmt>,
    },

    /// `while (condition) body`
    While { condition: Expr, body: Box<Stmt> },

    /// `System.out.println(expr);`
    Print(Expr),
}

/// An expression with its source span
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    IntLiteral(i32),
    BoolLiteral(bool),
    Identifier(String),
    This,

    Binary {
        left: Box<Expr>,
        op: BinaryOp,
        right: Box<Expr>,
    },

    /// `!operand`
    Not(Box<Expr>),

    /// `array[index]`
    Index { array: Box<Expr>, index: Box<Expr> },

    /// `array.length`
    Length(Box<Expr>),

    /// `receiver.method(args)`
    Call {
        receiver: Box<Expr>,
        method: Ident,
        args: Vec<Expr>,
    },

    /// `new int[size]`
    NewArray(Box<Expr>),

    /// `new Class()`
    NewObject(Ident),

    /// `(inner)`
    Paren(Box<Expr>),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Less,
    Add,
    Sub,
    Mul,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Less => "<",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
