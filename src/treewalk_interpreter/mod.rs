mod array;
mod class;
mod environment;
mod errors;
mod function;
mod interpreter;
mod lox_trait;
mod native_function;
mod object;
mod resolver;

pub use errors::{InterpreterError, RuntimeError};
pub use interpreter::Interpreter;
pub use object::Object;
pub use resolver::{Resolution, Resolver, ResolverError, ResolverErrorType, ResolverWarning};
