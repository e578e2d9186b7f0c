//! Scoped binding environment for the Sorrel interpreter.

use crate::value::Value;
use sorrel_types::DataType;
use std::collections::BTreeMap;

/// A named slot: the stored value plus the declaration facts that
/// assignments are checked against.
#[derive(Debug, Clone)]
pub struct Binding {
    pub value: Value,
    pub constant: bool,
    pub declared: DataType,
}

/// A single scope level.
#[derive(Debug, Clone)]
struct Scope {
    bindings: BTreeMap<String, Binding>,
}

impl Scope {
    fn new() -> Self {
        Self {
            bindings: BTreeMap::new(),
        }
    }
}

/// Scopes detached from the stack while a function body runs.
///
/// Function bodies see the globals plus their own fresh scope; the caller's
/// local scopes are parked here and restored after the call.
#[derive(Debug)]
pub struct ParkedScopes(Vec<Scope>);

/// Scoped binding environment with push/pop semantics.
///
/// Bindings are looked up from innermost scope outward.
/// `define` always creates in the current (innermost) scope.
/// `set_value` updates the first scope where the binding exists.
#[derive(Debug, Clone)]
pub struct Environment {
    scopes: Vec<Scope>,
}

impl Environment {
    /// Create a new environment with one global scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::new()],
        }
    }

    /// Push a new scope (for loop iterations, if arms, etc.).
    pub fn push_scope(&mut self) {
        self.scopes.push(Scope::new());
    }

    /// Pop the innermost scope.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Define a binding in the current (innermost) scope.
    pub fn define(&mut self, name: &str, binding: Binding) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.bindings.insert(name.to_string(), binding);
        }
    }

    /// True if the current (innermost) scope already defines `name`.
    pub fn declared_in_current(&self, name: &str) -> bool {
        self.scopes
            .last()
            .map_or(false, |scope| scope.bindings.contains_key(name))
    }

    /// Look up a binding, searching from innermost to outermost scope.
    pub fn get(&self, name: &str) -> Option<&Binding> {
        for scope in self.scopes.iter().rev() {
            if let Some(b) = scope.bindings.get(name) {
                return Some(b);
            }
        }
        None
    }

    /// Update a binding's value in the first scope where it exists.
    /// Returns `true` if found and updated, `false` if not found.
    pub fn set_value(&mut self, name: &str, value: Value) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(binding) = scope.bindings.get_mut(name) {
                binding.value = value;
                return true;
            }
        }
        false
    }

    /// Park every scope above the globals and push one fresh scope for a
    /// function body. Writes to global bindings go straight through.
    pub fn enter_call(&mut self) -> ParkedScopes {
        let parked = self.scopes.split_off(1);
        self.scopes.push(Scope::new());
        ParkedScopes(parked)
    }

    /// Restore the caller's scopes after a function body finishes,
    /// discarding whatever the body left on the stack.
    pub fn exit_call(&mut self, parked: ParkedScopes) {
        self.scopes.truncate(1);
        self.scopes.extend(parked.0);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
