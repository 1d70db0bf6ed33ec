//! Basic arithmetic: add, subtract, multiply, divide.

use crate::error::{Error, Result};
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::Value;

use super::expect_number;

/// Integer views of both operands, when both are integers.
fn int_pair(a: &Value, b: &Value) -> Option<(i64, i64)> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some((*a, *b)),
        _ => None,
    }
}

pub struct Add;

impl Operation for Add {
    fn name(&self) -> &str {
        "add"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("add", "Add two numbers")
            .param("x")
            .param("y")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        // Integer inputs stay integers unless the sum overflows
        if let Some((a, b)) = int_pair(&args[0], &args[1]) {
            if let Some(sum) = a.checked_add(b) {
                return Ok(Value::Int(sum));
            }
        }
        let x = expect_number("add", "x", &args[0])?;
        let y = expect_number("add", "y", &args[1])?;
        Ok(Value::Float(x + y))
    }
}

pub struct Subtract;

impl Operation for Subtract {
    fn name(&self) -> &str {
        "subtract"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("subtract", "Subtract y from x")
            .param("x")
            .param("y")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        if let Some((a, b)) = int_pair(&args[0], &args[1]) {
            if let Some(diff) = a.checked_sub(b) {
                return Ok(Value::Int(diff));
            }
        }
        let x = expect_number("subtract", "x", &args[0])?;
        let y = expect_number("subtract", "y", &args[1])?;
        Ok(Value::Float(x - y))
    }
}

pub struct Multiply;

impl Operation for Multiply {
    fn name(&self) -> &str {
        "multiply"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("multiply", "Multiply two numbers")
            .param("x")
            .param("y")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        if let Some((a, b)) = int_pair(&args[0], &args[1]) {
            if let Some(product) = a.checked_mul(b) {
                return Ok(Value::Int(product));
            }
        }
        let x = expect_number("multiply", "x", &args[0])?;
        let y = expect_number("multiply", "y", &args[1])?;
        Ok(Value::Float(x * y))
    }
}

pub struct Divide;

impl Operation for Divide {
    fn name(&self) -> &str {
        "divide"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("divide", "Divide x by y")
            .param("x")
            .param("y")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        let x = expect_number("divide", "x", &args[0])?;
        let y = expect_number("divide", "y", &args[1])?;
        if y == 0.0 {
            return Err(Error::Domain("divide: division by zero".to_string()));
        }
        Ok(Value::Float(x / y))
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
    fn integers_stay_integers() {
        assert_eq!(run(&Add, &[Value::Int(3), Value::Int(4)]).unwrap(), Value::Int(7));
        assert_eq!(
            run(&Multiply, &[Value::Int(3), Value::Int(4)]).unwrap(),
            Value::Int(12)
        );
        assert_eq!(
            run(&Subtract, &[Value::Int(10), Value::Int(4)]).unwrap(),
            Value::Int(6)
        );
    }

    #[test]
    fn mixed_operands_promote_to_float() {
        assert_eq!(
            run(&Add, &[Value::Int(1), Value::Float(0.5)]).unwrap(),
            Value::Float(1.5)
        );
    }

    #[test]
    fn overflow_promotes_to_float() {
        let result = run(&Add, &[Value::Int(i64::MAX), Value::Int(1)]).unwrap();
        assert!(matches!(result, Value::Float(_)));
    }

    #[test]
    fn divide_always_floats() {
        assert_eq!(
            run(&Divide, &[Value::Int(7), Value::Int(2)]).unwrap(),
            Value::Float(3.5)
        );
        assert_eq!(
            run(&Divide, &[Value::Int(8), Value::Int(2)]).unwrap(),
            Value::Float(4.0)
        );
    }

    #[test]
    fn divide_by_zero() {
        assert!(matches!(
            run(&Divide, &[Value::Int(1), Value::Int(0)]),
            Err(Error::Domain(_))
        ));
    }

    #[test]
    fn non_numeric_argument() {
        let err = run(&Add, &[Value::String("x".into()), Value::Int(1)]).unwrap_err();
        assert!(err.to_string().contains("expected a number"));
    }
}
