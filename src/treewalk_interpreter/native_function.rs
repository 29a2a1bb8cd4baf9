use super::array::LoxArray;
use super::errors::{InterpreterError, OpResult};
use super::object::Object;

use std::fmt;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

type FnType = fn(Vec<Object>) -> OpResult<Object>;

pub struct NativeFnData {
    pub func: FnType,
    pub arity: usize,
    pub name: String,
}

#[derive(Clone)]
pub struct NativeFn(Rc<NativeFnData>);

impl NativeFn {
    fn new(name: &str, func: FnType, arity: usize) -> Self {
        let name = name.to_owned();
        let data = NativeFnData { func, arity, name };
        NativeFn(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn arity(&self) -> usize {
        self.0.arity
    }

    /// Arity is checked by the caller.
    pub fn execute(&self, args: Vec<Object>) -> OpResult<Object> {
        (self.0.func)(args)
    }
}

impl fmt::Debug for NativeFn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<native-func {}>", self.0.name)
    }
}

impl PartialEq<NativeFn> for NativeFn {
    // Function pointers have no reliable identity, compare the Rcs.
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NativeFn {}

pub fn get_native_funcs() -> Vec<NativeFn> {
    vec![
        NativeFn::new("clock", clock, 0),
        NativeFn::new("str", stringify, 1),
        NativeFn::new("append", append, 2),
        NativeFn::new("len", len, 1),
    ]
}

fn clock(_args: Vec<Object>) -> OpResult<Object> {
    // A clock set before the epoch reads as zero.
    let seconds = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs_f64())
        .unwrap_or_default();

    Ok(Object::Number(seconds))
}

fn stringify(args: Vec<Object>) -> OpResult<Object> {
    Ok(Object::String(args[0].to_string()))
}

fn append(mut args: Vec<Object>) -> OpResult<Object> {
    let value = args.pop().unwrap_or(Object::Nil);
    let array = expect_array(args.pop())?;
    array.append(value);

    Ok(Object::Array(array))
}

fn len(mut args: Vec<Object>) -> OpResult<Object> {
    let array = expect_array(args.pop())?;
    Ok(Object::Number(array.len() as f64))
}

fn expect_array(arg: Option<Object>) -> OpResult<LoxArray> {
    match arg {
        Some(Object::Array(array)) => Ok(array),
        _ => Err(InterpreterError::ExpectedArray),
    }
}
