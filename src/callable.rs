//! Callable runtime values: host‑provided natives and user closures.

use std::fmt;
use std::rc::Rc;

use chrono::Utc;
use log::debug;

use crate::ast::FunctionDecl;
use crate::environment::{EnvRef, Environment};
use crate::error::RuntimeError;
use crate::interpreter::{Flow, Interpreter};
use crate::value::Value;

/// Signature of a host function exposed to scripts.
pub type NativeFn = fn(&[Value]) -> Result<Value, String>;

/// Anything a script can call with `(...)`.
#[derive(Debug, Clone)]
pub enum Callable {
    Native(NativeFunction),
    Function(Rc<Function>),
}

impl Callable {
    pub fn arity(&self) -> usize {
        match self {
            Callable::Native(native) => native.arity,
            Callable::Function(function) => function.declaration.params.len(),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Callable::Native(native) => native.name,
            Callable::Function(function) => function.declaration.name.lexeme.as_str(),
        }
    }

    /// Invoke with already evaluated arguments.  The caller checks arity.
    pub fn call(
        &self,
        interpreter: &mut Interpreter,
        arguments: Vec<Value>,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        match self {
            Callable::Native(native) => {
                debug!("Calling native function '{}'", native.name);
                (native.func)(&arguments).map_err(|msg| RuntimeError::new(line, msg))
            }
            Callable::Function(function) => function.call(interpreter, arguments),
        }
    }
}

impl PartialEq for Callable {
    /// Callables compare by identity.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Native(a), Callable::Native(b)) => a.name == b.name,
            (Callable::Function(a), Callable::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Callable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Callable::Native(native) => write!(f, "<native fn {}>", native.name),
            Callable::Function(function) => write!(f, "<fn {}>", function.declaration.name.lexeme),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NativeFunction {
    pub name: &'static str,
    pub arity: usize,
    pub func: NativeFn,
}

/// `clock()`: wall‑clock seconds since the Unix epoch.
pub fn clock() -> NativeFunction {
    NativeFunction {
        name: "clock",
        arity: 0,
        func: |_args: &[Value]| {
            let micros: i64 = Utc::now().timestamp_micros();
            Ok(Value::Number(micros as f64 / 1_000_000.0))
        },
    }
}

/// A user function paired with the environment it was declared in.
///
/// The environment is held by reference, so later writes to captured
/// variables are visible to the closure and vice versa.
pub struct Function {
    declaration: Rc<FunctionDecl>,
    closure: EnvRef,
}

impl Function {
    pub fn new(declaration: Rc<FunctionDecl>, closure: EnvRef) -> Self {
        Function {
            declaration,
            closure,
        }
    }

    fn call(&self, interpreter: &mut Interpreter, arguments: Vec<Value>) -> Result<Value, RuntimeError> {
        debug!("Calling user-defined function '{}'", self.declaration.name.lexeme);

        let mut frame = Environment::with_enclosing(Rc::clone(&self.closure));

        for (param, argument) in self.declaration.params.iter().zip(arguments) {
            debug!("Binding parameter '{}' to {}", param.lexeme, argument);
            frame.define(&param.lexeme, argument);
        }

        match interpreter.execute_block(&self.declaration.body, frame)? {
            Flow::Return(value) => Ok(value),
            Flow::Normal => Ok(Value::Nil),
        }
    }
}

impl fmt::Debug for Function {
    // The closure may (indirectly) contain this function again.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.declaration.name.lexeme)
            .field("arity", &self.declaration.params.len())
            .finish_non_exhaustive()
    }
}
