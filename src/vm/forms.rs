//! Special forms: they get the unevaluated cdr of the call
use gc::Gc;

use super::value::FormFn;
use super::{Closure, Environment, ExecutionError, GcShared, Interpreter, Value};

type FormResult = Result<Option<Value>, ExecutionError>;

pub(super) static FORMS: &[(&str, FormFn)] = &[
    ("define", define),
    ("if", if_form),
    ("lambda", lambda),
    ("quote", quote),
];

fn arguments<'a>(
    args: &'a Value,
    name: &'static str,
    min: usize,
    max: Option<usize>,
) -> Result<Vec<&'a Value>, ExecutionError> {
    let args: Vec<&Value> = args.iter().collect();

    if args.len() < min {
        return Err(ExecutionError::NotEnoughArguments(name));
    }
    match max {
        Some(max) if args.len() > max => Err(ExecutionError::TooManyArguments(name)),
        _ => Ok(args),
    }
}

fn quote(_: &Interpreter, _: &GcShared<Environment>, args: &Value) -> FormResult {
    let args = arguments(args, "quote", 1, Some(1))?;
    ok_some!(args[0].clone())
}

fn define(vm: &Interpreter, env: &GcShared<Environment>, args: &Value) -> FormResult {
    let args = arguments(args, "define", 2, Some(2))?;
    let name = match *args[0] {
        Value::Identifier(ref name) => name.clone(),
        ref other => {
            return Err(ExecutionError::BadArgument(format!(
                "define: first argument must be an identifier, got {}",
                other
            )))
        }
    };

    // bindings always hold a value
    let value = vm.eval_value(args[1], env)?;
    trace!("define {} = {}", name, value);
    env.borrow_mut().define(name, value);
    Ok(None)
}

fn if_form(vm: &Interpreter, env: &GcShared<Environment>, args: &Value) -> FormResult {
    let args = arguments(args, "if", 2, Some(3))?;
    // "no value" isn't #f, so it counts as true
    let test: bool = match vm.eval(args[0], env)? {
        Some(ref value) => value.into(),
        None => true,
    };

    if test {
        vm.eval(args[1], env)
    } else {
        match args.get(2) {
            Some(alternate) => vm.eval(alternate, env),
            None => Ok(None),
        }
    }
}

// Only the second argument is the body; anything after it is ignored
fn lambda(_: &Interpreter, env: &GcShared<Environment>, args: &Value) -> FormResult {
    let args = arguments(args, "lambda", 2, None)?;
    check_params(args[0])?;

    ok_some!(Value::Closure(Gc::new(Closure {
        params: args[0].clone(),
        body: args[1].clone(),
        environment: env.clone(),
    })))
}

// (a b c), (a b . rest) or just rest
fn check_params(params: &Value) -> Result<(), ExecutionError> {
    let mut names = params.iter();

    if let Some(bad) = names.by_ref().find(|name| !name.is_identifier()) {
        return Err(ExecutionError::BadArgument(format!(
            "lambda: parameter {} is not an identifier",
            bad
        )));
    }

    match *names.tail() {
        Value::EmptyList | Value::Identifier(_) => Ok(()),
        ref tail => Err(ExecutionError::BadArgument(format!(
            "lambda: bad parameter list ending in {}",
            tail
        ))),
    }
}
