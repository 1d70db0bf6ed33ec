//! Operations: the trait, the registry, built-ins, and plugin discovery.

pub mod builtin;
pub mod context;
pub mod plugins;
pub mod registry;
pub mod traits;

pub use context::OpContext;
pub use registry::{OpEntry, OperationRegistry, ScriptedOp};
pub use traits::{OpSchema, Operation};
