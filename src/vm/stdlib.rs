use super::value::NatFn;
use super::{ExecutionError, Value};

pub(super) static STDLIB: &[(&str, NatFn)] = &[("+", add), ("-", sub), ("*", mul)];

fn number(value: &Value, name: &str) -> Result<i64, ExecutionError> {
    match *value {
        Value::Number(n) => Ok(n),
        ref other => Err(ExecutionError::BadArgument(format!(
            "{}: expected a number, got {}",
            name, other
        ))),
    }
}

fn add(values: Vec<Value>) -> Result<Value, ExecutionError> {
    let mut sum: i64 = 0;
    for value in values.iter() {
        sum = sum
            .checked_add(number(value, "+")?)
            .ok_or(ExecutionError::Overflow)?;
    }
    Ok(Value::Number(sum))
}

// (- a) is negation, (- a b c) is a - b - c
fn sub(values: Vec<Value>) -> Result<Value, ExecutionError> {
    let (first, rest) = values
        .split_first()
        .ok_or(ExecutionError::NotEnoughArguments("-"))?;
    let first = number(first, "-")?;

    if rest.is_empty() {
        return first
            .checked_neg()
            .map(Value::Number)
            .ok_or(ExecutionError::Overflow);
    }

    let mut result = first;
    for value in rest {
        result = result
            .checked_sub(number(value, "-")?)
            .ok_or(ExecutionError::Overflow)?;
    }
    Ok(Value::Number(result))
}

fn mul(values: Vec<Value>) -> Result<Value, ExecutionError> {
    let mut product: i64 = 1;
    for value in values.iter() {
        product = product
            .checked_mul(number(value, "*")?)
            .ok_or(ExecutionError::Overflow)?;
    }
    Ok(Value::Number(product))
}
