use crate::error::RuntimeError;
use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Shared handle to an environment.  Closures and active call frames each
/// hold one; the environment lives as long as the longest holder.
pub type EnvRef = Rc<RefCell<Environment>>;

/// One link of the scope chain: a name → value table plus the enclosing link.
/// The enclosing link is fixed at construction.
#[derive(Debug, Default)]
pub struct Environment {
    values: HashMap<String, Value>,
    enclosing: Option<EnvRef>,
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: None,
        }
    }

    pub fn with_enclosing(enclosing: EnvRef) -> Self {
        Environment {
            values: HashMap::new(),
            enclosing: Some(enclosing),
        }
    }

    pub fn into_ref(self) -> EnvRef {
        Rc::new(RefCell::new(self))
    }

    /// Bind `name` in this environment, replacing any previous binding.
    pub fn define(&mut self, name: &str, value: Value) {
        self.values.insert(name.to_string(), value);
    }

    /// Read `name` from this environment or, failing that, its ancestors.
    pub fn get(&self, name: &str, line: usize) -> Result<Value, RuntimeError> {
        if let Some(value) = self.values.get(name) {
            Ok(value.clone())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow().get(name, line)
        } else {
            Err(undefined(name, line))
        }
    }

    /// Overwrite an existing binding of `name`, searching outwards.
    pub fn assign(&mut self, name: &str, value: Value, line: usize) -> Result<(), RuntimeError> {
        if let Some(slot) = self.values.get_mut(name) {
            *slot = value;
            Ok(())
        } else if let Some(enclosing) = &self.enclosing {
            enclosing.borrow_mut().assign(name, value, line)
        } else {
            Err(undefined(name, line))
        }
    }

    /// Read `name` from exactly the environment `distance` links out.
    pub fn get_at(
        env: &EnvRef,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<Value, RuntimeError> {
        let target: EnvRef = Self::ancestor(env, distance, name, line)?;
        let value = target.borrow().values.get(name).cloned();

        value.ok_or_else(|| undefined(name, line))
    }

    /// Write `name` into exactly the environment `distance` links out.
    pub fn assign_at(
        env: &EnvRef,
        distance: usize,
        name: &str,
        value: Value,
        line: usize,
    ) -> Result<(), RuntimeError> {
        let target: EnvRef = Self::ancestor(env, distance, name, line)?;
        target.borrow_mut().define(name, value);

        Ok(())
    }

    fn ancestor(
        env: &EnvRef,
        distance: usize,
        name: &str,
        line: usize,
    ) -> Result<EnvRef, RuntimeError> {
        let mut current: EnvRef = Rc::clone(env);

        for _ in 0..distance {
            let next: EnvRef = current
                .borrow()
                .enclosing
                .clone()
                .ok_or_else(|| undefined(name, line))?;
            current = next;
        }

        Ok(current)
    }
}

fn undefined(name: &str, line: usize) -> RuntimeError {
    RuntimeError::new(line, format!("Undefined variable '{}'.", name))
}
