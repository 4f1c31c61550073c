//! Name resolution for identifiers inside a method body.
//!
//! A name is looked up in the current method (parameters and locals), then in
//! the fields of the enclosing class, then in the fields of each ancestor,
//! nearest first. The first hit wins.

use log::trace;

use super::{FieldDescriptor, SymbolTable, Type};

/// Where a name can live, in lookup order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Method,
    OwnFields,
    InheritedFields,
}

pub const RESOLUTION_ORDER: [Scope; 3] = [Scope::Method, Scope::OwnFields, Scope::InheritedFields];

/// Owned address of a resolved variable, usable after the table borrow ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VarLocation {
    Local { class: String, method: String },
    Field { class: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub scope: Scope,
    pub location: VarLocation,
    pub ty: Type,
    pub initialized: bool,
}

/// Resolves names as seen from one method
pub struct Resolver<'t> {
    table: &'t SymbolTable,
    class: &'t str,
    method: &'t str,
}

impl<'t> Resolver<'t> {
    pub fn new(table: &'t SymbolTable, class: &'t str, method: &'t str) -> Self {
        Self {
            table,
            class,
            method,
        }
    }

    pub fn resolve(&self, name: &str) -> Option<Resolved> {
        let resolved = RESOLUTION_ORDER
            .iter()
            .find_map(|&scope| self.lookup(scope, name));
        trace!(
            "resolve '{}' in {}.{} -> {:?}",
            name,
            self.class,
            self.method,
            resolved.as_ref().map(|r| &r.location)
        );
        resolved
    }

    fn lookup(&self, scope: Scope, name: &str) -> Option<Resolved> {
        let (location, var) = match scope {
            Scope::Method => {
                let var = self
                    .table
                    .class(self.class)?
                    .method(self.method)?
                    .variable(name)?;
                let location = VarLocation::Local {
                    class: self.class.to_string(),
                    method: self.method.to_string(),
                };
                (location, var)
            }
            Scope::OwnFields => {
                let var = self.table.class(self.class)?.field(name)?;
                let location = VarLocation::Field {
                    class: self.class.to_string(),
                };
                (location, var)
            }
            Scope::InheritedFields => {
                let (owner, var) = self
                    .table
                    .ancestors(self.class)
                    .find_map(|c| c.field(name).map(|var| (c.name.as_str(), var)))?;
                let location = VarLocation::Field {
                    class: owner.to_string(),
                };
                (location, var)
            }
        };

        Some(Resolved {
            scope,
            location,
            ty: var.ty.clone(),
            initialized: var.initialized,
        })
    }
}

impl SymbolTable {
    /// Mutable access to the variable `name` stored at `location`
    pub fn variable_mut(&mut self, location: &VarLocation, name: &str) -> Option<&mut FieldDescriptor> {
        match location {
            VarLocation::Local { class, method } => {
                self.class_mut(class)?.method_mut(method)?.variable_mut(name)
            }
            VarLocation::Field { class } => self.class_mut(class)?.field_mut(name),
        }
    }

    /// Record that `name` at `location` has been assigned
    pub fn mark_initialized(&mut self, location: &VarLocation, name: &str) {
        if let Some(var) = self.variable_mut(location, name) {
            var.initialized = true;
        }
    }
}
