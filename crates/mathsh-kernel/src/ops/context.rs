//! Execution context for operations.

use crate::funcs::FunctionRegistry;
use crate::ops::traits::OpSchema;
use crate::vars::VariableStore;

/// Context passed to every operation execution.
///
/// Scripting operations (`set`, `def`, …) mutate the variable store and
/// function registry through this; introspection operations read the
/// descriptor snapshot for help output.
pub struct OpContext<'a> {
    /// The shared variable environment.
    pub vars: &'a mut VariableStore,
    /// The user-function registry.
    pub functions: &'a mut FunctionRegistry,
    /// Descriptor snapshot of every registered operation, sorted by name.
    pub op_schemas: &'a [OpSchema],
}
