use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::parser::Node;

/// Environment for variable scoping
#[derive(Debug, Clone)]
pub struct Environment {
    /// Arena of nested scopes; index 0 is the global scope
    scopes: Vec<Scope>,
}

/// Single scope in the environment
#[derive(Debug, Clone, Default)]
struct Scope {
    /// Variables defined in this scope
    variables: HashMap<String, Node>,
    /// Index of parent scope (None for global scope)
    parent: Option<usize>,
}

impl Environment {
    /// Creates a new environment with a global scope
    pub fn new() -> Self {
        Environment {
            scopes: vec![Scope::default()],
        }
    }

    /// Enters a new nested scope
    pub fn enter_scope(&mut self) {
        let parent_idx = self.scopes.len() - 1;
        self.scopes.push(Scope {
            variables: HashMap::new(),
            parent: Some(parent_idx),
        });
        tracing::trace!(depth = self.scopes.len(), "entered scope");
    }

    /// Exits the current scope and returns to parent scope.
    /// The global scope is never popped.
    pub fn exit_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
            tracing::trace!(depth = self.scopes.len(), "exited scope");
        }
    }

    /// Defines a variable in the current scope, replacing any binding
    /// of the same name in that scope only
    pub fn define(&mut self, name: String, value: Node) {
        tracing::trace!(%name, depth = self.scopes.len(), "bind");
        let current = self.scopes.len() - 1;
        self.scopes[current].variables.insert(name, value);
    }

    /// Gets the value of a variable, searching innermost to outermost
    pub fn get(&self, name: &str) -> Result<Node> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| Error::UndefinedVariable {
                name: name.to_string(),
            })
    }

    /// Checks if a variable exists in any visible scope
    pub fn exists(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Returns the current scope depth (1 for global scope)
    pub fn scope_depth(&self) -> usize {
        self.scopes.len()
    }

    fn lookup(&self, name: &str) -> Option<&Node> {
        let mut scope_idx = Some(self.scopes.len() - 1);
        while let Some(idx) = scope_idx {
            let scope = &self.scopes[idx];
            if let Some(val) = scope.variables.get(name) {
                return Some(val);
            }
            scope_idx = scope.parent;
        }
        None
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn string(s: &str) -> Node {
        Node::StringLiteral(s.to_string())
    }

    #[test]
    fn test_basic_define_and_get() {
        let mut env = Environment::new();
        env.define("x".to_string(), Node::BooleanLiteral(true));

        assert_eq!(env.get("x").unwrap(), Node::BooleanLiteral(true));
    }

    #[test]
    fn test_undefined_variable() {
        let env = Environment::new();
        let err = env.get("undefined").unwrap_err();
        assert_eq!(err.to_string(), "no such variable: undefined");
    }

    #[test]
    fn test_redefine_in_same_scope_keeps_latest() {
        let mut env = Environment::new();
        env.define("x".to_string(), string("first"));
        env.define("x".to_string(), string("second"));

        assert_eq!(env.get("x").unwrap(), string("second"));
    }

    #[test]
    fn test_variable_shadowing() {
        let mut env = Environment::new();
        env.define("x".to_string(), string("outer"));

        env.enter_scope();
        assert_eq!(env.get("x").unwrap(), string("outer"));
        env.define("x".to_string(), string("inner"));
        assert_eq!(env.get("x").unwrap(), string("inner"));

        env.exit_scope();
        assert_eq!(env.get("x").unwrap(), string("outer"));
    }

    #[test]
    fn test_nested_scopes() {
        let mut env = Environment::new();
        env.define("x".to_string(), string("1"));

        env.enter_scope();
        env.define("y".to_string(), string("2"));

        env.enter_scope();
        env.define("z".to_string(), string("3"));

        assert!(env.exists("x"));
        assert!(env.exists("y"));
        assert!(env.exists("z"));

        env.exit_scope();
        assert!(!env.exists("z"));

        env.exit_scope();
        assert!(!env.exists("y"));
        assert!(env.exists("x"));
    }

    #[test]
    fn test_global_scope_is_never_popped() {
        let mut env = Environment::new();
        env.define("x".to_string(), Node::BooleanLiteral(false));
        assert_eq!(env.scope_depth(), 1);

        env.enter_scope();
        assert_eq!(env.scope_depth(), 2);

        env.exit_scope();
        env.exit_scope();
        assert_eq!(env.scope_depth(), 1);
        assert!(env.exists("x"));
    }
}
