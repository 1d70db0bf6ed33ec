//! Variable management operations.
//!
//! These are the command-line surface of [`crate::vars::VariableStore`]:
//! `set`, `persist`, `get`, `del`, `vars`, and `clearvars`.

use crate::error::Result;
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::{format_value, Value};

use super::expect_name;

pub struct SetVar;

impl Operation for SetVar {
    fn name(&self) -> &str {
        "set"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("set", "Set a session variable")
            .param("name")
            .param("value")
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let name = expect_name("set", "name", &args[0])?;
        ctx.vars.set(&name, args[1].clone())?;
        Ok(Value::String(format!("✓ Set {name} = {}", args[1])))
    }
}

pub struct PersistVar;

impl Operation for PersistVar {
    fn name(&self) -> &str {
        "persist"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("persist", "Set a variable that survives restarts")
            .param("name")
            .param("value")
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let name = expect_name("persist", "name", &args[0])?;
        ctx.vars.set_persistent(&name, args[1].clone())?;
        Ok(Value::String(format!("✓ Persisted {name} = {}", args[1])))
    }
}

pub struct GetVar;

impl Operation for GetVar {
    fn name(&self) -> &str {
        "get"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("get", "Look up a variable by name")
            .param("name")
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let name = expect_name("get", "name", &args[0])?;
        ctx.vars.get(&name)
    }
}

pub struct DelVar;

impl Operation for DelVar {
    fn name(&self) -> &str {
        "del"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("del", "Delete a variable")
            .param("name")
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let name = expect_name("del", "name", &args[0])?;
        ctx.vars.delete(&name)?;
        Ok(Value::String(format!("✓ Deleted {name}")))
    }
}

pub struct Vars;

impl Operation for Vars {
    fn name(&self) -> &str {
        "vars"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("vars", "List all visible variables").category("scripting")
    }

    fn execute(&self, _args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let all = ctx.vars.list_all();
        if all.is_empty() {
            return Ok(Value::String("No variables defined".to_string()));
        }
        let mut lines = vec!["Variables:".to_string()];
        for (name, value) in all {
            lines.push(format!("  {name} = {}", format_value(&value)));
        }
        Ok(Value::String(lines.join("\n")))
    }
}

pub struct ClearVars;

impl Operation for ClearVars {
    fn name(&self) -> &str {
        "clearvars"
    }

    fn schema(&self) -> OpSchema {
        // Accepts an optional `all` to clear persistent variables too
        OpSchema::new("clearvars", "Clear session variables (pass 'all' to include persistent)")
            .variadic()
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let include_persistent = matches!(args.first(), Some(Value::String(s)) if s == "all");
        ctx.vars.clear_all(include_persistent);
        let what = if include_persistent {
            "all variables"
        } else {
            "session variables"
        };
        Ok(Value::String(format!("✓ Cleared {what}")))
    }
}
