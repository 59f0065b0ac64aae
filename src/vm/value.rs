use std::fmt;
use std::mem;

use super::environment::{Environment as GenericEnvironment, GcShared};
use super::{ExecutionError, Interpreter};
use gc::{Finalize, Gc, Trace};

pub type Environment = GenericEnvironment<Value>;

/// Scheme values
#[derive(Debug, Clone)]
pub enum Value {
    /// A 64-bit integer
    Number(i64),
    /// A string literal, already unescaped
    String(String),
    /// An identifier (`foo`, `+`)
    Identifier(String),
    /// `#t` or `#f`
    Boolean(bool),
    /// A cons cell (`(1 . 2)`)
    Pair(Box<Pair>),
    /// The empty list `()`
    EmptyList,
    /// A natively implemented procedure; gets its arguments evaluated
    NativeProcedure(NativeProcedure),
    /// A natively implemented special form; gets its arguments as written
    NativeSpecialForm(NativeSpecialForm),
    /// A `lambda`
    Closure(Gc<Closure>),
}

#[derive(Debug)]
pub struct Pair {
    pub car: Value,
    pub cdr: Value,
}

// Everything that follows the cdr chain walks it in a loop, so the length
// of a list never turns into recursion depth.

impl Drop for Pair {
    fn drop(&mut self) {
        let mut next = mem::replace(&mut self.cdr, Value::EmptyList);
        while let Value::Pair(mut pair) = next {
            next = mem::replace(&mut pair.cdr, Value::EmptyList);
        }
    }
}

impl Clone for Pair {
    fn clone(&self) -> Pair {
        let mut rest = self.cdr.iter();
        let cars: Vec<Value> = rest.by_ref().cloned().collect();
        Pair {
            car: self.car.clone(),
            cdr: Value::improper_list(cars, rest.tail().clone()),
        }
    }
}

impl PartialEq for Pair {
    fn eq(&self, other: &Pair) -> bool {
        let (mut left, mut right) = (self, other);
        loop {
            if left.car != right.car {
                return false;
            }
            match (&left.cdr, &right.cdr) {
                (&Value::Pair(ref l), &Value::Pair(ref r)) => {
                    left = l;
                    right = r;
                }
                (l, r) => return l == r,
            }
        }
    }
}

impl Finalize for Pair {}
unsafe impl Trace for Pair {
    custom_trace!(this, {
        mark(&this.car);
        let mut next = &this.cdr;
        while let Value::Pair(ref pair) = *next {
            mark(&pair.car);
            next = &pair.cdr;
        }
        mark(next);
    });
}

pub type NatFn = fn(Vec<Value>) -> Result<Value, ExecutionError>;
pub type FormFn =
    fn(&Interpreter, &GcShared<Environment>, &Value) -> Result<Option<Value>, ExecutionError>;

#[derive(Clone, Copy)]
pub struct NativeProcedure {
    pub(super) name: &'static str,
    pub(super) fun: NatFn,
}

#[derive(Clone, Copy)]
pub struct NativeSpecialForm {
    pub(super) name: &'static str,
    pub(super) fun: FormFn,
}

impl NativeProcedure {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl NativeSpecialForm {
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Debug for NativeProcedure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NativeProcedure({})", self.name)
    }
}

impl fmt::Debug for NativeSpecialForm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NativeSpecialForm({})", self.name)
    }
}

/// A user-defined procedure and the frame it was created in
pub struct Closure {
    pub(super) params: Value,
    pub(super) body: Value,
    pub(super) environment: GcShared<Environment>,
}

impl Closure {
    pub fn params(&self) -> &Value {
        &self.params
    }

    pub fn body(&self) -> &Value {
        &self.body
    }
}

// The environment is left out: it usually contains the closure itself
impl fmt::Debug for Closure {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Closure")
            .field("params", &self.params)
            .field("body", &self.body)
            .finish()
    }
}

impl Finalize for Closure {}
unsafe impl Trace for Closure {
    custom_trace!(this, {
        mark(&this.params);
        mark(&this.body);
        mark(&this.environment);
    });
}

impl Finalize for Value {}
unsafe impl Trace for Value {
    custom_trace!(this, {
        match *this {
            Value::Pair(ref pair) => mark(pair),
            Value::Closure(ref closure) => mark(closure),
            Value::Number(_)
            | Value::String(_)
            | Value::Identifier(_)
            | Value::Boolean(_)
            | Value::EmptyList
            | Value::NativeProcedure(_)
            | Value::NativeSpecialForm(_) => {}
        }
    });
}

// Structural for data, identity for closures
impl PartialEq<Value> for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (&Value::Number(n), &Value::Number(m)) => n == m,
            (&Value::String(ref x), &Value::String(ref y)) => x == y,
            (&Value::Identifier(ref x), &Value::Identifier(ref y)) => x == y,
            (&Value::Boolean(x), &Value::Boolean(y)) => x == y,
            (&Value::Pair(ref pair), &Value::Pair(ref pair2)) => pair == pair2,
            (&Value::EmptyList, &Value::EmptyList) => true,
            (&Value::NativeProcedure(ref p), &Value::NativeProcedure(ref q)) => p.name == q.name,
            (&Value::NativeSpecialForm(ref f), &Value::NativeSpecialForm(ref g)) => {
                f.name == g.name
            }
            (&Value::Closure(ref c), &Value::Closure(ref d)) => {
                &**c as *const Closure == &**d as *const Closure
            }
            _ => false,
        }
    }
}

/// Scheme truthiness: only `#f` is false
impl<'a> From<&'a Value> for bool {
    fn from(v: &Value) -> bool {
        match *v {
            Value::Boolean(false) => false,
            _ => true,
        }
    }
}

macro_rules! simple_type {
    ($name:ident, $var:pat) => (
        pub fn $name(&self) -> bool {
            match *self {
                $var => true,
                _ => false
            }
        }
    );
}

impl Value {
    pub fn cons(car: Value, cdr: Value) -> Value {
        Value::Pair(Box::new(Pair { car, cdr }))
    }

    /// Builds a proper list
    pub fn list(values: Vec<Value>) -> Value {
        Value::improper_list(values, Value::EmptyList)
    }

    /// Builds a chain of pairs ending in `tail`
    pub fn improper_list(values: Vec<Value>, tail: Value) -> Value {
        values
            .into_iter()
            .rev()
            .fold(tail, |cdr, car| Value::cons(car, cdr))
    }

    pub fn is_list(&self) -> bool {
        let mut iter = self.iter();
        while iter.next().is_some() {}
        iter.tail().is_null()
    }

    /// Iterates over the cars of a chain of pairs
    pub fn iter(&self) -> ListIter {
        ListIter { next: self }
    }

    simple_type!(is_null, Value::EmptyList);
    simple_type!(is_identifier, Value::Identifier(..));
}

#[derive(Debug, Clone)]
pub struct ListIter<'a> {
    next: &'a Value,
}

impl<'a> ListIter<'a> {
    /// What is left of the chain: `()` once a proper list is exhausted
    pub fn tail(&self) -> &'a Value {
        self.next
    }
}

impl<'a> Iterator for ListIter<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        match *self.next {
            Value::Pair(ref pair) => {
                self.next = &pair.cdr;
                Some(&pair.car)
            }
            _ => None,
        }
    }
}

fn escape(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            c => vec![c],
        })
        .collect()
}

impl fmt::Display for Value {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Value::Number(n) => write!(fmt, "{}", n),
            Value::String(ref s) => write!(fmt, "\"{}\"", escape(s)),
            Value::Identifier(ref s) => fmt.write_str(s),
            Value::Boolean(b) => fmt.write_str(if b { "#t" } else { "#f" }),
            Value::Pair(ref pair) => {
                write!(fmt, "({} . ", pair.car)?;
                let mut rest = pair.cdr.iter();
                let mut open = 1;
                for car in rest.by_ref() {
                    write!(fmt, "({} . ", car)?;
                    open += 1;
                }
                write!(fmt, "{}", rest.tail())?;
                for _ in 0..open {
                    fmt.write_str(")")?;
                }
                Ok(())
            }
            Value::EmptyList => fmt.write_str("()"),
            Value::NativeProcedure(ref p) => write!(fmt, "<procedure {}>", p.name),
            Value::NativeSpecialForm(ref f) => write!(fmt, "<special form {}>", f.name),
            Value::Closure(_) => fmt.write_str("<closure>"),
        }
    }
}
