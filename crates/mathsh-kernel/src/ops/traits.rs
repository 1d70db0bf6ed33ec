//! Core operation trait and descriptor types.

use crate::error::Result;
use crate::ops::context::OpContext;
use crate::value::Value;

/// Descriptor for one callable operation: name, ordered parameter names
/// (empty for variadic), help text, and category. Immutable once
/// registered.
#[derive(Debug, Clone, PartialEq)]
pub struct OpSchema {
    /// Operation name (used for lookup).
    pub name: String,
    /// Ordered parameter names. Empty when `variadic` is set.
    pub params: Vec<String>,
    /// Whether the operation accepts any number of arguments.
    pub variadic: bool,
    /// One-line help text.
    pub help: String,
    /// Category for help grouping.
    pub category: String,
}

impl OpSchema {
    /// Create a schema with no parameters in the default category.
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            variadic: false,
            help: help.into(),
            category: "general".to_string(),
        }
    }

    /// Append a named parameter.
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.params.push(name.into());
        self
    }

    /// Mark the operation variadic (parameter list stays empty).
    pub fn variadic(mut self) -> Self {
        self.variadic = true;
        self
    }

    /// Set the help category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Render the usage line (`name x y`).
    pub fn usage(&self) -> String {
        if self.variadic {
            format!("{} <args…>", self.name)
        } else if self.params.is_empty() {
            self.name.clone()
        } else {
            format!("{} {}", self.name, self.params.join(" "))
        }
    }
}

/// A callable capability. Built-ins implement this directly; plugin
/// operations are scripted and run through the engine instead.
///
/// Implementations validate their own argument types and raise domain
/// errors with display-safe messages on invalid input.
pub trait Operation: Send + Sync {
    /// The operation's name (must match the registry key).
    fn name(&self) -> &str;

    /// The operation's descriptor.
    fn schema(&self) -> OpSchema;

    /// Execute with already-substituted arguments.
    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value>;
}
