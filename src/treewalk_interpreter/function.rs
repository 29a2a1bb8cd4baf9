use super::environment::Environment;
use super::errors::{InterpreterError, RuntimeError, RuntimeResult, Signal, WithSpan};
use super::interpreter::Interpreter;
use super::object::Object;
use crate::lox_frontend::constants::THIS_STR;
use crate::lox_frontend::grammar::FuncInfo;

use std::fmt;
use std::io::Write;
use std::rc::Rc;

/// What a function was declared as. Decides how it may be called and
/// what it returns.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum FnKind {
    Function,
    Method,
    StaticMethod,
    Initializer,
}

pub struct LoxFnData {
    func_info: Rc<FuncInfo>,
    closure: Environment,
    kind: FnKind,
}

#[derive(Clone)]
pub struct LoxFn(Rc<LoxFnData>);

impl LoxFn {
    pub fn new(func_info: Rc<FuncInfo>, closure: Environment, kind: FnKind) -> Self {
        let data = LoxFnData {
            func_info,
            closure,
            kind,
        };
        LoxFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        self.0.func_info.name()
    }

    pub fn arity(&self) -> usize {
        self.0.func_info.params.len()
    }

    /// Getters are methods declared without a parameter list. They run on
    /// property access.
    pub fn is_getter(&self) -> bool {
        self.0.kind != FnKind::Function && self.0.func_info.is_getter
    }

    /// A new closure over a scope that defines `this` as `instance`.
    pub fn bind(&self, instance: Object) -> LoxFn {
        let env = Environment::with_enclosing(&self.0.closure);
        env.define(THIS_STR, instance);
        LoxFn::new(self.0.func_info.clone(), env, self.0.kind)
    }

    /// Arity is checked by the caller.
    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        tracing::trace!(name = self.name(), args = args.len(), "calling function");

        // Create a new environment pointing to surrounding closure
        let env = Environment::with_enclosing(&self.0.closure);

        for (param, arg) in self.0.func_info.params.iter().zip(args.into_iter()) {
            env.define(&param.name, arg);
        }

        let value = match interpreter.execute_block(&self.0.func_info.body, env)? {
            Signal::Return(value) => value,
            _ => Object::Nil,
        };

        // Initializers hand back the instance even after a bare `return;`.
        if self.0.kind == FnKind::Initializer {
            return self
                .0
                .closure
                .get_at(0, THIS_STR)
                .at(self.0.func_info.span);
        }

        Ok(value)
    }

    /// Runs a getter on property access. Its body must contain a `return`.
    pub fn execute_getter<W: Write>(
        &self,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        let func_info = &self.0.func_info;
        let error = if func_info.body.is_empty() {
            InterpreterError::EmptyGetter
        } else if !func_info.has_top_level_return() {
            InterpreterError::GetterWithoutReturn
        } else {
            return self.execute(vec![], interpreter);
        };

        Err(RuntimeError {
            span: func_info.ident.span,
            error,
        })
    }
}

impl fmt::Display for LoxFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<fn {}>", self.name())
    }
}

impl fmt::Debug for LoxFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<function {}>", self.name())
    }
}

impl PartialEq<LoxFn> for LoxFn {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LoxFn {}
