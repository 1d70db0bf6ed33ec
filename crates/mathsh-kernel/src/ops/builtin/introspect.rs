//! Introspection: the `ops` listing.

use std::collections::BTreeMap;

use crate::error::Result;
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::Value;

pub struct Ops;

impl Operation for Ops {
    fn name(&self) -> &str {
        "ops"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("ops", "List available operations").category("scripting")
    }

    fn execute(&self, _args: &[Value], ctx: &mut OpContext<'_>) -> Result<Value> {
        // Group by category, alphabetical within each
        let mut by_category: BTreeMap<&str, Vec<&OpSchema>> = BTreeMap::new();
        for schema in ctx.op_schemas {
            by_category.entry(&schema.category).or_default().push(schema);
        }

        let mut lines = Vec::new();
        for (category, schemas) in by_category {
            lines.push(format!("{category}:"));
            for schema in schemas {
                lines.push(format!("  {:<28} {}", schema.usage(), schema.help));
            }
        }
        Ok(Value::String(lines.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::FunctionRegistry;
    use crate::vars::VariableStore;

    #[test]
    fn listing_groups_by_category() {
        let schemas = vec![
            OpSchema::new("add", "Add").param("x").param("y").category("arithmetic"),
            OpSchema::new("set", "Set").param("name").param("value").category("scripting"),
        ];
        let mut vars = VariableStore::new();
        let mut functions = FunctionRegistry::new();
        let mut ctx = OpContext {
            vars: &mut vars,
            functions: &mut functions,
            op_schemas: &schemas,
        };
        let out = Ops.execute(&[], &mut ctx).unwrap().to_string();
        assert!(out.contains("arithmetic:"));
        assert!(out.contains("scripting:"));
        assert!(out.find("arithmetic:").unwrap() < out.find("add").unwrap());
    }
}
