//! Built-in operations, always available.
//!
//! The arithmetic set keeps the engine useful on its own; the scripting
//! set (`set`, `def`, …) is how commands reach the variable store and
//! function registry.

mod arith;
mod functions;
mod introspect;
mod power;
mod reduce;
mod variables;

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::value::{format_value, Value};

use super::registry::OperationRegistry;

/// Register every built-in operation with the registry.
pub fn register_builtins(registry: &mut OperationRegistry) {
    let builtins: Vec<Arc<dyn super::Operation>> = vec![
        Arc::new(arith::Add),
        Arc::new(arith::Subtract),
        Arc::new(arith::Multiply),
        Arc::new(arith::Divide),
        Arc::new(power::Power),
        Arc::new(power::Sqrt),
        Arc::new(power::Factorial),
        Arc::new(reduce::Sum),
        Arc::new(reduce::Avg),
        Arc::new(variables::SetVar),
        Arc::new(variables::PersistVar),
        Arc::new(variables::GetVar),
        Arc::new(variables::DelVar),
        Arc::new(variables::Vars),
        Arc::new(variables::ClearVars),
        Arc::new(functions::Def),
        Arc::new(functions::Undef),
        Arc::new(functions::Funcs),
        Arc::new(introspect::Ops),
    ];
    for op in builtins {
        // Built-in names are static and non-empty
        registry
            .register(op)
            .expect("built-in operation must have a name");
    }
}

/// Extract a numeric argument, raising a display-safe domain error.
pub(crate) fn expect_number(op: &str, param: &str, value: &Value) -> Result<f64> {
    value.as_number().ok_or_else(|| {
        Error::Domain(format!(
            "{op}: expected a number for '{param}', got {}",
            format_value(value)
        ))
    })
}

/// Extract a string-ish argument (names are tokens, so any scalar works).
pub(crate) fn expect_name(op: &str, param: &str, value: &Value) -> Result<String> {
    match value {
        Value::List(_) | Value::Map(_) => Err(Error::Domain(format!(
            "{op}: expected a name for '{param}', got {}",
            format_value(value)
        ))),
        other => Ok(other.to_string()),
    }
}
