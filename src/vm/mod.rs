//! The environment model and the tree-walking evaluator
use std::cell::Cell;
use std::error::Error;
use std::fmt;

use crate::config::{ArityPolicy, Config, Scoping};

pub use self::environment::{shared, GcShared};
pub use self::value::{
    Closure, Environment, ListIter, NativeProcedure, NativeSpecialForm, Pair, Value,
};

mod environment;
mod forms;
mod stdlib;
mod value;

#[cfg(test)]
mod test;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    NotEnoughArguments(&'static str),
    TooManyArguments(&'static str),
    BadArgument(String),
    NotCallable(String),
    ImproperListCall,
    UnknownIdentifier(String),
    ArityMismatch { expected: usize, given: usize },
    NoValue,
    Overflow,
    StackOverflow,
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        use self::ExecutionError::*;

        match *self {
            NotEnoughArguments(name) => write!(fmt, "{}: not enough arguments", name),
            TooManyArguments(name) => write!(fmt, "{}: too many arguments", name),
            BadArgument(ref msg) => fmt.write_str(msg),
            NotCallable(ref what) => write!(fmt, "not a procedure or special form: {}", what),
            ImproperListCall => fmt.write_str("call with an improper argument list"),
            UnknownIdentifier(ref name) => write!(fmt, "unknown identifier: {}", name),
            ArityMismatch { expected, given } => write!(
                fmt,
                "wrong number of arguments: expected {}, given {}",
                expected, given
            ),
            NoValue => fmt.write_str("expression has no value"),
            Overflow => fmt.write_str("integer overflow"),
            StackOverflow => fmt.write_str("maximum recursion depth exceeded"),
        }
    }
}

impl Error for ExecutionError {}

/// Root frame with the primitive procedures and special forms
pub fn default_env() -> GcShared<Environment> {
    let mut env = Environment::default();

    for &(name, fun) in stdlib::STDLIB.iter() {
        env.define(
            name.into(),
            Value::NativeProcedure(NativeProcedure { name, fun }),
        );
    }
    for &(name, fun) in forms::FORMS.iter() {
        env.define(
            name.into(),
            Value::NativeSpecialForm(NativeSpecialForm { name, fun }),
        );
    }

    shared(env)
}

/// An evaluation session: one root frame that lives across `run` calls
pub struct Interpreter {
    root: GcShared<Environment>,
    config: Config,
    depth: Cell<usize>,
}

struct DepthGuard<'a>(&'a Cell<usize>);

impl<'a> Drop for DepthGuard<'a> {
    fn drop(&mut self) {
        self.0.set(self.0.get() - 1);
    }
}

impl Default for Interpreter {
    fn default() -> Interpreter {
        Interpreter::new()
    }
}

impl Interpreter {
    pub fn new() -> Interpreter {
        Interpreter::with_config(Config::default())
    }

    pub fn with_config(config: Config) -> Interpreter {
        Interpreter {
            root: default_env(),
            config,
            depth: Cell::new(0),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn root(&self) -> &GcShared<Environment> {
        &self.root
    }

    /// Evaluates every form in order, one result per form
    pub fn run(&self, forms: &[Value]) -> Result<Vec<Option<Value>>, ExecutionError> {
        forms.iter().map(|form| self.eval_one(form)).collect()
    }

    /// Evaluates a top-level form; `None` means "no value"
    pub fn eval_one(&self, expr: &Value) -> Result<Option<Value>, ExecutionError> {
        debug!("eval_one: {}", expr);
        let root = self.root.clone();
        self.eval(expr, &root)
    }

    pub fn eval(
        &self,
        expr: &Value,
        env: &GcShared<Environment>,
    ) -> Result<Option<Value>, ExecutionError> {
        trace!("eval: {}", expr);

        match *expr {
            Value::Pair(ref call) => {
                if !call.cdr.is_list() {
                    return Err(ExecutionError::ImproperListCall);
                }
                let _depth = self.enter()?;

                match self.eval_value(&call.car, env)? {
                    Value::NativeProcedure(procedure) => {
                        let args = self.eval_args(&call.cdr, env)?;
                        (procedure.fun)(args).map(Some)
                    }
                    Value::NativeSpecialForm(form) => (form.fun)(self, env, &call.cdr),
                    Value::Closure(closure) => {
                        let args = self.eval_args(&call.cdr, env)?;
                        self.apply(&closure, args)
                    }
                    other => Err(ExecutionError::NotCallable(other.to_string())),
                }
            }
            Value::EmptyList => Err(ExecutionError::NotCallable("()".to_owned())),
            Value::Identifier(ref name) => env
                .borrow()
                .get(name)
                .map(Some)
                .ok_or_else(|| ExecutionError::UnknownIdentifier(name.clone())),
            ref atom => Ok(Some(atom.clone())),
        }
    }

    /// Like `eval`, for positions where "no value" is an error
    fn eval_value(
        &self,
        expr: &Value,
        env: &GcShared<Environment>,
    ) -> Result<Value, ExecutionError> {
        self.eval(expr, env)?.ok_or(ExecutionError::NoValue)
    }

    // Left to right
    fn eval_args(
        &self,
        args: &Value,
        env: &GcShared<Environment>,
    ) -> Result<Vec<Value>, ExecutionError> {
        args.iter().map(|arg| self.eval_value(arg, env)).collect()
    }

    fn enter(&self) -> Result<DepthGuard, ExecutionError> {
        let depth = self.depth.get();
        if depth >= self.config.max_depth {
            return Err(ExecutionError::StackOverflow);
        }
        self.depth.set(depth + 1);
        Ok(DepthGuard(&self.depth))
    }

    fn apply(&self, closure: &Closure, args: Vec<Value>) -> Result<Option<Value>, ExecutionError> {
        debug!("apply: {} to {} argument(s)", closure.params, args.len());

        let frame = match self.config.scoping {
            Scoping::Lexical => shared(Environment::child(&closure.environment)),
            Scoping::Flat => closure.environment.clone(),
        };
        self.bind(&closure.params, args, &frame)?;
        self.eval(&closure.body, &frame)
    }

    fn bind(
        &self,
        params: &Value,
        args: Vec<Value>,
        frame: &GcShared<Environment>,
    ) -> Result<(), ExecutionError> {
        let mut names = params.iter();
        let expected = names.by_ref().count();
        let rest = match *names.tail() {
            Value::Identifier(ref rest) => Some(rest.clone()),
            _ => None,
        };
        let given = args.len();

        if self.config.arity == ArityPolicy::Strict
            && (given < expected || (rest.is_none() && given > expected))
        {
            return Err(ExecutionError::ArityMismatch { expected, given });
        }

        let mut frame = frame.borrow_mut();
        let mut args = args.into_iter();
        for name in params.iter() {
            let name = match *name {
                Value::Identifier(ref name) => name,
                ref other => {
                    return Err(ExecutionError::BadArgument(format!(
                        "parameter {} is not an identifier",
                        other
                    )))
                }
            };
            match args.next() {
                Some(arg) => {
                    trace!("bind {} = {}", name, arg);
                    frame.define(name.clone(), arg);
                }
                None => trace!("{} left unbound", name),
            }
        }

        let leftover: Vec<Value> = args.collect();
        match rest {
            Some(rest) => frame.define(rest, Value::list(leftover)),
            None if !leftover.is_empty() => {
                trace!("dropping {} extra argument(s)", leftover.len())
            }
            None => {}
        }
        Ok(())
    }
}
