//! User-defined functions.
//!
//! A user function pairs a parameter list with a single command-string
//! body (`def double x = multiply $x 2`). The body is opaque text here;
//! the engine tokenizes and executes it at call time.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::error::{Error, Result};

/// A runtime-defined operation: name, ordered parameters, command body.
#[derive(Debug, Clone, PartialEq)]
pub struct UserFunction {
    pub name: String,
    pub params: Vec<String>,
    pub body: String,
    pub description: Option<String>,
}

impl fmt::Display for UserFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "def {}({}) = {}", self.name, self.params.join(", "), self.body)
    }
}

/// Whether a name is usable as a function or parameter identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

/// Registry of user-defined functions, keyed by name in a namespace
/// independent of built-in operations.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, UserFunction>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a function, replacing any previous definition of the name.
    pub fn define(
        &mut self,
        name: &str,
        params: Vec<String>,
        body: &str,
        description: Option<String>,
    ) -> Result<()> {
        if !is_valid_identifier(name) {
            return Err(Error::InvalidName(name.to_string()));
        }
        self.functions.insert(
            name.to_string(),
            UserFunction {
                name: name.to_string(),
                params,
                body: body.to_string(),
                description,
            },
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&UserFunction> {
        self.functions.get(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Delete a function; errors if it was never defined.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        self.functions
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| Error::UndefinedFunction(name.to_string()))
    }

    /// All functions, sorted by name.
    pub fn list_all(&self) -> BTreeMap<String, UserFunction> {
        self.functions
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn clear_all(&mut self) {
        self.functions.clear();
    }
}
