use super::object::Object;
use crate::lox_frontend::grammar::{InfixOperator, PrefixOperator};
use crate::lox_frontend::span::Span;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum InterpreterError {
    #[error("Both operands should be numbers.")]
    IllegalInfixOperation(InfixOperator),
    #[error("Both operands should be numbers or strings.")]
    IllegalAddition,
    #[error("Operand must be a number.")]
    IllegalPrefixOperation(PrefixOperator),
    #[error("Division by zero is prohibited.")]
    DivideByZero,
    #[error("Undefined variable '{0}'.")]
    UndefinedVariable(String),
    #[error("Undefined property '{0}'.")]
    UndefinedProperty(String),
    #[error("Only instances have properties.")]
    NotAnInstance,
    #[error("Non callable object, can only call functions and classes.")]
    NotCallable,
    #[error("Expected {0} arguments, but got {1}.")]
    WrongArity(usize, usize),
    #[error("Superclass must be a class.")]
    NotAClass,
    #[error("'{0}' is not a trait.")]
    NotATrait(String),
    #[error("Class getters should not have empty bodies.")]
    EmptyGetter,
    #[error("Class getters should return value explicitly.")]
    GetterWithoutReturn,
    #[error("Only arrays can be indexed.")]
    NotAnArray,
    #[error("Array indices should be an integer.")]
    NonIntegerIndex,
    #[error("Array indices should be positive.")]
    NegativeIndex,
    #[error("Array index is out of bounds.")]
    IndexOutOfBounds,
    #[error("Expected an array argument.")]
    ExpectedArray,
    #[error("Failed to write output: {0}")]
    Output(String),
}

/// A runtime failure located at the node that raised it.
#[derive(Debug, Error, PartialEq, Clone)]
#[error("[line {}] {error}", .span.line())]
pub struct RuntimeError {
    pub span: Span,
    pub error: InterpreterError,
}

pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// Result of operations that know nothing about source locations.
pub type OpResult<T> = Result<T, InterpreterError>;

/// Outcome of executing a statement. Loop control and `return` unwind
/// through these instead of through errors.
#[derive(Debug, PartialEq, Clone)]
pub enum Signal {
    Next,
    Break,
    Continue,
    Return(Object),
}

pub type ExecResult = RuntimeResult<Signal>;

pub trait WithSpan<T> {
    fn at(self, span: Span) -> RuntimeResult<T>;
}

impl<T> WithSpan<T> for OpResult<T> {
    fn at(self, span: Span) -> RuntimeResult<T> {
        self.map_err(|error| RuntimeError { span, error })
    }
}
