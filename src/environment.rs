use crate::source::Span;
use crate::types::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EnvError {
    // Variable name, span where the lookup happened
    #[error("Undefined variable: '{0}'")]
    UndefinedVariable(String, Span),
}

/// The global variable store for one program run. The language has a single
/// flat namespace, so there is no enclosing-scope chain; callers construct a
/// fresh Environment per run to keep runs independent.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Environment {
    bindings: HashMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            bindings: HashMap::new(),
        }
    }

    /// Binds `name` to `value`, replacing any existing binding. Rebinding
    /// with a different Value variant is legal; the entry is simply replaced.
    pub fn define(&mut self, name: String, value: Value) {
        self.bindings.insert(name, value);
    }

    /// Looks up a variable's value.
    /// `lookup_span` is the location of the reference, used for error reporting.
    pub fn get(&self, name: &str, lookup_span: Span) -> Result<Value, EnvError> {
        self.bindings
            .get(name)
            .cloned()
            .ok_or_else(|| EnvError::UndefinedVariable(name.to_string(), lookup_span))
    }

    /// All currently bound names, for REPL completion.
    pub fn identifiers(&self) -> HashSet<String> {
        self.bindings.keys().cloned().collect()
    }
}
