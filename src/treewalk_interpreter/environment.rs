use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use super::errors::{InterpreterError, OpResult};
use super::object::Object;

/// One lexical scope. Clones share the same underlying bindings, so a
/// closure sees later writes to the variables it captured.
#[derive(Clone)]
pub struct Environment {
    env_ptr: Rc<RefCell<EnvironmentData>>,
}

struct EnvironmentData {
    values: HashMap<String, Object>,
    enclosing: Option<Environment>,
}

impl Environment {
    pub fn new() -> Self {
        Self::from_data(None)
    }

    pub fn with_enclosing(env: &Environment) -> Self {
        Self::from_data(Some(env.clone()))
    }

    fn from_data(enclosing: Option<Environment>) -> Self {
        let env_data = EnvironmentData {
            values: HashMap::new(),
            enclosing,
        };
        Environment {
            env_ptr: Rc::new(RefCell::new(env_data)),
        }
    }

    /// Add or replace a binding in this scope.
    pub fn define(&self, name: &str, value: Object) {
        self.env_ptr
            .borrow_mut()
            .values
            .insert(name.to_owned(), value);
    }

    /// Looks the name up here, then outwards through the enclosing scopes.
    pub fn get(&self, name: &str) -> OpResult<Object> {
        let data = self.env_ptr.borrow();
        match data.values.get(name) {
            Some(obj) => Ok(obj.clone()),
            None => match &data.enclosing {
                Some(enclosing) => enclosing.get(name),
                None => Err(InterpreterError::UndefinedVariable(name.to_owned())),
            },
        }
    }

    /// Overwrites the nearest existing binding of `name`.
    pub fn assign(&self, name: &str, value: Object) -> OpResult<()> {
        let mut data = self.env_ptr.borrow_mut();
        if let Some(slot) = data.values.get_mut(name) {
            *slot = value;
            return Ok(());
        }

        match &data.enclosing {
            Some(enclosing) => enclosing.assign(name, value),
            None => Err(InterpreterError::UndefinedVariable(name.to_owned())),
        }
    }

    fn ancestor(&self, env_hops: usize) -> Option<Environment> {
        let mut env = self.clone();
        for _ in 0..env_hops {
            let enclosing = env.env_ptr.borrow().enclosing.clone()?;
            env = enclosing;
        }
        Some(env)
    }

    /// Reads `name` from exactly `env_hops` scopes out.
    pub fn get_at(&self, env_hops: usize, name: &str) -> OpResult<Object> {
        let value = match self.ancestor(env_hops) {
            Some(env) => {
                let data = env.env_ptr.borrow();
                data.values.get(name).cloned()
            }
            None => None,
        };
        value.ok_or_else(|| InterpreterError::UndefinedVariable(name.to_owned()))
    }

    /// Writes `name` in exactly `env_hops` scopes out.
    pub fn assign_at(&self, env_hops: usize, name: &str, value: Object) -> OpResult<()> {
        let env = self
            .ancestor(env_hops)
            .ok_or_else(|| InterpreterError::UndefinedVariable(name.to_owned()))?;
        let mut data = env.env_ptr.borrow_mut();

        match data.values.get_mut(name) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(InterpreterError::UndefinedVariable(name.to_owned())),
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
