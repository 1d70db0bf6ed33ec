//! User-function management: `def`, `undef`, `funcs`.

use tracing::warn;

use crate::error::{Error, Result};
use crate::funcs::is_valid_identifier;
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::Value;

use super::expect_name;

const DEF_USAGE: &str = "Usage: def name param1 param2 ... = body";

pub struct Def;

impl Operation for Def {
    fn name(&self) -> &str {
        "def"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("def", "Define a function: def name params... = body")
            .variadic()
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        // The signature and the body are separated by a bare `=` token.
        let eq = args
            .iter()
            .position(|v| matches!(v, Value::String(s) if s == "="))
            .ok_or_else(|| Error::Domain(DEF_USAGE.to_string()))?;
        if eq == 0 {
            return Err(Error::Domain(DEF_USAGE.to_string()));
        }
        if eq + 1 == args.len() {
            return Err(Error::Domain(format!(
                "Function body cannot be empty. {DEF_USAGE}"
            )));
        }

        let name = expect_name("def", "name", &args[0])?;
        let mut params = Vec::with_capacity(eq - 1);
        for arg in &args[1..eq] {
            let param = expect_name("def", "param", arg)?;
            if !is_valid_identifier(&param) {
                return Err(Error::InvalidName(param));
            }
            params.push(param);
        }
        // Tokens render raw here, so `$x` survives into the stored body
        let body = args[eq + 1..]
            .iter()
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join(" ");

        if ctx.op_schemas.iter().any(|s| s.name == name) {
            warn!("function '{name}' shadows a registered operation");
        }

        ctx.functions.define(&name, params, &body, None)?;
        // define() validated the name, so the lookup cannot miss
        let display = ctx
            .functions
            .get(&name)
            .map(|f| f.to_string())
            .unwrap_or_default();
        Ok(Value::String(format!("✓ Defined function: {display}")))
    }
}

pub struct Undef;

impl Operation for Undef {
    fn name(&self) -> &str {
        "undef"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("undef", "Remove a user-defined function")
            .param("name")
            .category("scripting")
    }

    fn execute(&self, args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let name = expect_name("undef", "name", &args[0])?;
        ctx.functions.delete(&name)?;
        Ok(Value::String(format!("✓ Undefined function: {name}")))
    }
}

pub struct Funcs;

impl Operation for Funcs {
    fn name(&self) -> &str {
        "funcs"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("funcs", "List user-defined functions").category("scripting")
    }

    fn execute(&self, _args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        let all = ctx.functions.list_all();
        if all.is_empty() {
            return Ok(Value::String("No functions defined".to_string()));
        }
        let mut lines = vec!["Functions:".to_string()];
        for func in all.values() {
            lines.push(format!("  {func}"));
        }
        Ok(Value::String(lines.join("\n")))
    }
}
