//! Variadic reductions over a list of numbers.

use crate::error::{Error, Result};
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::Value;

use super::expect_number;

pub struct Sum;

impl Operation for Sum {
    fn name(&self) -> &str {
        "sum"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("sum", "Sum of any number of values")
            .variadic()
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        // All-integer input keeps an integer result
        let mut int_acc: Option<i64> = Some(0);
        for arg in args {
            int_acc = match (int_acc, arg) {
                (Some(acc), Value::Int(n)) => acc.checked_add(*n),
                _ => None,
            };
        }
        if let Some(total) = int_acc {
            return Ok(Value::Int(total));
        }
        let mut total = 0.0;
        for arg in args {
            total += expect_number("sum", "value", arg)?;
        }
        Ok(Value::Float(total))
    }
}

pub struct Avg;

impl Operation for Avg {
    fn name(&self) -> &str {
        "avg"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("avg", "Average of any number of values")
            .variadic()
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        if args.is_empty() {
            return Err(Error::Domain("avg: requires at least one value".to_string()));
        }
        let mut total = 0.0;
        for arg in args {
            total += expect_number("avg", "value", arg)?;
        }
        Ok(Value::Float(total / args.len() as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::FunctionRegistry;
    use crate::vars::VariableStore;

    fn run(op: &dyn Operation, args: &[Value]) -> Result<Value> {
        let mut vars = VariableStore::new();
        let mut functions = FunctionRegistry::new();
        let mut ctx = OpContext {
            vars: &mut vars,
            functions: &mut functions,
            op_schemas: &[],
        };
        op.execute(args, &mut ctx)
    }

    #[test]
    fn sum_of_nothing_is_zero() {
        assert_eq!(run(&Sum, &[]).unwrap(), Value::Int(0));
    }

    #[test]
    fn sum_keeps_integers() {
        assert_eq!(
            run(&Sum, &[Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Int(6)
        );
        assert_eq!(
            run(&Sum, &[Value::Int(1), Value::Float(0.5)]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn avg_requires_values() {
        assert!(matches!(run(&Avg, &[]), Err(Error::Domain(_))));
        assert_eq!(
            run(&Avg, &[Value::Int(1), Value::Int(2), Value::Int(3)]).unwrap(),
            Value::Float(2.0)
        );
    }
}
