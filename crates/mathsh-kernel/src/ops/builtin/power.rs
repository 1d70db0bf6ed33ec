//! Exponentiation and friends.

use crate::error::{Error, Result};
use crate::ops::{OpContext, OpSchema, Operation};
use crate::value::{format_value, Value};

use super::expect_number;

pub struct Power;

impl Operation for Power {
    fn name(&self) -> &str {
        "power"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("power", "Raise x to the power y")
            .param("x")
            .param("y")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        let x = expect_number("power", "x", &args[0])?;
        let y = expect_number("power", "y", &args[1])?;
        Ok(Value::Float(x.powf(y)))
    }
}

pub struct Sqrt;

impl Operation for Sqrt {
    fn name(&self) -> &str {
        "sqrt"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("sqrt", "Square root of x")
            .param("x")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        let x = expect_number("sqrt", "x", &args[0])?;
        if x < 0.0 {
            return Err(Error::Domain(format!(
                "sqrt: cannot take the square root of {x}"
            )));
        }
        Ok(Value::Float(x.sqrt()))
    }
}

pub struct Factorial;

impl Operation for Factorial {
    fn name(&self) -> &str {
        "factorial"
    }

    fn schema(&self) -> OpSchema {
        OpSchema::new("factorial", "Factorial of a non-negative integer")
            .param("n")
            .category("arithmetic")
    }

    fn execute(&self, args: &[Value], _ctx: &mut OpContext<'_>) -> Result<Value> {
        let n = args[0].as_int().ok_or_else(|| {
            Error::Domain(format!(
                "factorial: expected an integer, got {}",
                format_value(&args[0])
            ))
        })?;
        if n < 0 {
            return Err(Error::Domain(format!(
                "factorial: not defined for negative {n}"
            )));
        }
        let mut acc: i64 = 1;
        for k in 2..=n {
            acc = acc
                .checked_mul(k)
                .ok_or_else(|| Error::Domain(format!("factorial: {n}! overflows")))?;
        }
        Ok(Value::Int(acc))
    }
}
