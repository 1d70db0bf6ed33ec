//! mathsh-kernel: the embeddable command-execution engine behind mathsh.
//!
//! The kernel is synchronous and self-contained: an [`Engine`] owns an
//! operation registry (built-ins plus discovered plugin manifests), a
//! scope-stacked [`VariableStore`] with optional JSON persistence, and a
//! [`FunctionRegistry`] of runtime-defined functions.
//!
//! - [`value`] — the dynamic value type and literal parsing
//! - [`vars`] — scoped variables and persistence
//! - [`funcs`] — user-defined functions
//! - [`ops`] — the operation trait, registry, built-ins, and plugins
//! - [`engine`] — substitution, dispatch, and recursion
//! - [`script`] — line-oriented script execution
//! - [`paths`] — XDG data locations

pub mod engine;
pub mod error;
pub mod funcs;
pub mod ops;
pub mod paths;
pub mod script;
pub mod value;
pub mod vars;

pub use engine::{Engine, EngineConfig, DEFAULT_MAX_DEPTH};
pub use error::{Error, Result};
pub use funcs::{FunctionRegistry, UserFunction};
pub use ops::{OpContext, OpEntry, OpSchema, Operation, OperationRegistry, ScriptedOp};
pub use script::{parse_line, ScriptReport, ScriptRunner};
pub use value::{format_value, parse_literal, Value};
pub use vars::VariableStore;
