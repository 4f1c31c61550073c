//! Symbol table: every class, field, method, parameter and local variable of a
//! program, plus the set of known type names.

use std::collections::HashMap;

use super::Type;

/// Whole-program symbol table
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Known types: the three primitives followed by every class in
    /// declaration order
    types: Vec<Type>,
    /// Class names in declaration order; the main class comes first
    order: Vec<String>,
    classes: HashMap<String, ClassDescriptor>,
}

/// A declared class
#[derive(Debug, Clone)]
pub struct ClassDescriptor {
    pub name: String,
    /// Name of the superclass, always a class declared earlier
    pub parent: Option<String>,
    pub fields: Vec<FieldDescriptor>,
    pub methods: Vec<MethodDescriptor>,
    /// Next free field offset once layout has run
    pub field_offset: usize,
    /// Next free method slot once layout has run
    pub method_offset: usize,
}

/// A field, parameter or local variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub ty: Type,
    pub initialized: bool,
    /// Byte offset; meaningful for fields only
    pub offset: usize,
}

/// A declared method
#[derive(Debug, Clone)]
pub struct MethodDescriptor {
    pub name: String,
    /// Declaring class
    pub owner: String,
    pub return_type: Type,
    pub params: Vec<FieldDescriptor>,
    pub locals: Vec<FieldDescriptor>,
    /// Parameters and locals by name
    variables: HashMap<String, VarSlot>,
    pub offset: usize,
}

#[derive(Debug, Clone, Copy)]
enum VarSlot {
    Param(usize),
    Local(usize),
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, ty: Type, initialized: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            initialized,
            offset: 0,
        }
    }
}

impl MethodDescriptor {
    pub fn new(name: impl Into<String>, owner: impl Into<String>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            owner: owner.into(),
            return_type,
            params: Vec::new(),
            locals: Vec::new(),
            variables: HashMap::new(),
            offset: 0,
        }
    }

    pub fn has_param(&self, name: &str) -> bool {
        matches!(self.variables.get(name), Some(VarSlot::Param(_)))
    }

    /// True for any parameter or local named `name`
    pub fn has_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Append a parameter. Callers reject duplicates first.
    pub fn add_param(&mut self, param: FieldDescriptor) {
        self.variables
            .insert(param.name.clone(), VarSlot::Param(self.params.len()));
        self.params.push(param);
    }

    /// Append a local variable. Callers reject duplicates first.
    pub fn add_local(&mut self, local: FieldDescriptor) {
        self.variables
            .insert(local.name.clone(), VarSlot::Local(self.locals.len()));
        self.locals.push(local);
    }

    pub fn variable(&self, name: &str) -> Option<&FieldDescriptor> {
        match *self.variables.get(name)? {
            VarSlot::Param(index) => self.params.get(index),
            VarSlot::Local(index) => self.locals.get(index),
        }
    }

    pub fn variable_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
        match *self.variables.get(name)? {
            VarSlot::Param(index) => self.params.get_mut(index),
            VarSlot::Local(index) => self.locals.get_mut(index),
        }
    }
}

impl ClassDescriptor {
    pub fn new(name: impl Into<String>, parent: Option<String>) -> Self {
        Self {
            name: name.into(),
            parent,
            fields: Vec::new(),
            methods: Vec::new(),
            field_offset: 0,
            method_offset: 0,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn field_mut(&mut self, name: &str) -> Option<&mut FieldDescriptor> {
        self.fields.iter_mut().find(|f| f.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_mut(&mut self, name: &str) -> Option<&mut MethodDescriptor> {
        self.methods.iter_mut().find(|m| m.name == name)
    }
}

/// Iterator over the strict ancestors of a class, nearest first
pub struct Ancestors<'t> {
    table: &'t SymbolTable,
    next: Option<&'t str>,
}

impl<'t> Iterator for Ancestors<'t> {
    type Item = &'t ClassDescriptor;

    fn next(&mut self) -> Option<Self::Item> {
        let class = self.table.class(self.next?)?;
        self.next = class.parent.as_deref();
        Some(class)
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            types: vec![Type::Int, Type::Boolean, Type::IntArray],
            order: Vec::new(),
            classes: HashMap::new(),
        }
    }

    /// Register a class and its type name. Callers reject duplicates first.
    pub fn insert_class(&mut self, class: ClassDescriptor) {
        self.types.push(Type::Class(class.name.clone()));
        self.order.push(class.name.clone());
        self.classes.insert(class.name.clone(), class);
    }

    /// Swap in the member-complete descriptor of a registered class
    pub fn replace_class(&mut self, class: ClassDescriptor) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn contains_class(&self, name: &str) -> bool {
        self.classes.contains_key(name)
    }

    /// True if `ty` is a primitive or a registered class
    pub fn is_known_type(&self, ty: &Type) -> bool {
        self.types.contains(ty)
    }

    pub fn types(&self) -> &[Type] {
        &self.types
    }

    pub fn class(&self, name: &str) -> Option<&ClassDescriptor> {
        self.classes.get(name)
    }

    pub fn class_mut(&mut self, name: &str) -> Option<&mut ClassDescriptor> {
        self.classes.get_mut(name)
    }

    /// Class names in declaration order
    pub fn class_names(&self) -> &[String] {
        &self.order
    }

    /// Classes in declaration order
    pub fn classes(&self) -> impl Iterator<Item = &ClassDescriptor> {
        self.order.iter().filter_map(move |name| self.classes.get(name))
    }

    pub fn main_class(&self) -> Option<&ClassDescriptor> {
        self.order.first().and_then(|name| self.classes.get(name))
    }

    pub fn ancestors<'t>(&'t self, class: &str) -> Ancestors<'t> {
        Ancestors {
            table: self,
            next: self.class(class).and_then(|c| c.parent.as_deref()),
        }
    }

    /// Look `method` up in `class` first, then in its ancestors
    pub fn find_method(&self, class: &str, method: &str) -> Option<&MethodDescriptor> {
        self.class(class)?
            .method(method)
            .or_else(|| self.find_inherited_method(class, method))
    }

    /// Look `method` up in the ancestors of `class` only
    pub fn find_inherited_method(&self, class: &str, method: &str) -> Option<&MethodDescriptor> {
        self.ancestors(class).find_map(|c| c.method(method))
    }

    /// True if `ancestor` is a strict ancestor of `class`
    pub fn is_subclass_of(&self, class: &str, ancestor: &str) -> bool {
        self.ancestors(class).any(|c| c.name == ancestor)
    }

    /// Whether a value of type `value` may be stored where `target` is
    /// expected: same type, or `value` is a class extending `target`.
    pub fn is_assignable(&self, target: &Type, value: &Type) -> bool {
        if target == value {
            return true;
        }

        match (target, value) {
            (Type::Class(target), Type::Class(value)) => self.is_subclass_of(value, target),
            _ => false,
        }
    }
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}
