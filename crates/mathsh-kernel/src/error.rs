//! Error taxonomy for the mathsh kernel.
//!
//! Expected user errors (unknown operation, arity mismatch, undefined
//! variable) carry display-safe messages and are returned, never panicked.
//! Plugin load failures never appear here at all: discovery logs and skips
//! broken files instead of failing.

use thiserror::Error;

/// Errors produced by the registry, variable store, engine, and scripts.
#[derive(Debug, Error)]
pub enum Error {
    /// The named operation is neither a built-in nor a user function.
    #[error("Unknown operation: {0}")]
    UnknownOperation(String),

    /// Wrong number of arguments for an operation or user function.
    #[error("'{name}' expects {expected} argument(s), got {got}")]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    /// Variable lookup failed in every tier.
    #[error("Variable '${0}' is not defined")]
    UndefinedVariable(String),

    /// User-function lookup or deletion on an undefined name.
    #[error("Function '{0}' is not defined")]
    UndefinedFunction(String),

    /// A function or variable name is empty or not a valid identifier.
    #[error("Invalid name: '{0}'")]
    InvalidName(String),

    /// Malformed registration (empty operation name).
    #[error("{0}")]
    DuplicateOrInvalid(String),

    /// A chain of nested function calls exceeded the configured depth.
    #[error("Recursion limit of {limit} exceeded")]
    RecursionLimitExceeded { limit: usize },

    /// A domain error raised by an operation implementation.
    #[error("{0}")]
    Domain(String),

    /// A script line failed; wraps the underlying error with location.
    #[error("Error on line {line}: {text}\n  {source}")]
    Script {
        line: usize,
        text: String,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
