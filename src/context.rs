use crate::value::Value;
use std::collections::{HashMap, HashSet};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ContextError {
    #[error("Cannot redeclare built-in '{0}'")]
    Locked(String),
}

/// Variable bindings for a run or a whole REPL session. `if` and `while`
/// bodies share the enclosing context, so declarations made inside a block
/// stay visible after it.
#[derive(Debug, Clone)]
pub struct Context {
    bindings: HashMap<String, Value>,
    locked: HashSet<String>,
}

impl Context {
    pub fn new() -> Self {
        let mut context = Self {
            bindings: HashMap::new(),
            locked: HashSet::new(),
        };

        context.seed("null", Value::Null);
        context.seed("true", Value::Boolean(true));
        context.seed("false", Value::Boolean(false));

        context
    }

    fn seed(&mut self, name: &str, value: Value) {
        self.bindings.insert(name.to_string(), value);
        self.locked.insert(name.to_string());
    }

    /// Bind `name`, replacing any previous binding. Locked names are refused.
    pub fn declare(&mut self, name: &str, value: Value, locked: bool) -> Result<(), ContextError> {
        if self.locked.contains(name) {
            return Err(ContextError::Locked(name.to_string()));
        }

        debug!(name, %value, locked, "declare");
        self.bindings.remove(name);
        self.bindings.insert(name.to_string(), value);
        if locked {
            self.locked.insert(name.to_string());
        }
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.bindings.get(name).copied()
    }

    pub fn is_locked(&self, name: &str) -> bool {
        self.locked.contains(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
