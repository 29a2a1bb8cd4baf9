use super::array::LoxArray;
use super::class::{LoxClassDataPtr, LoxInstanceDataPtr};
use super::errors::{InterpreterError, OpResult, RuntimeResult, WithSpan};
use super::function::LoxFn;
use super::interpreter::Interpreter;
use super::lox_trait::LoxTraitDataPtr;
use super::native_function::NativeFn;
use crate::lox_frontend::grammar::{InfixOperator, PrefixOperator};
use crate::lox_frontend::span::Span;

use std::fmt;
use std::io::Write;

#[derive(Debug, PartialEq, Clone)]
pub enum Object {
    Number(f64),
    Boolean(bool),
    String(String),
    Nil,
    Array(LoxArray),
    NativeFunc(NativeFn),
    LoxFunc(LoxFn),
    LoxClass(LoxClassDataPtr),
    LoxInstance(LoxInstanceDataPtr),
    LoxTrait(LoxTraitDataPtr),
}

impl Object {
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Object::Nil | Object::Boolean(false))
    }

    pub fn arity(&self) -> OpResult<usize> {
        match self {
            Object::NativeFunc(f) => Ok(f.arity()),
            Object::LoxFunc(f) => Ok(f.arity()),
            Object::LoxClass(class) => Ok(class.arity()),
            _ => Err(InterpreterError::NotCallable),
        }
    }

    /// Calls the object. Errors that happen before the callee's body runs
    /// are reported at `call_span`.
    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
        call_span: Span,
    ) -> RuntimeResult<Object> {
        let arity = self.arity().at(call_span)?;
        if arity != args.len() {
            return Err(InterpreterError::WrongArity(arity, args.len())).at(call_span);
        }

        match self {
            Object::NativeFunc(f) => f.execute(args).at(call_span),
            Object::LoxFunc(f) => f.execute(args, interpreter),
            Object::LoxClass(class) => class.execute(args, interpreter),
            _ => Err(InterpreterError::NotCallable).at(call_span),
        }
    }

    pub fn apply_infix_op(op: InfixOperator, lhs: Object, rhs: Object) -> OpResult<Object> {
        match op {
            InfixOperator::Add => match (lhs, rhs) {
                (Object::Number(a), Object::Number(b)) => Ok(Object::Number(a + b)),
                (Object::String(a), Object::String(b)) => Ok(Object::String(a + &b)),
                _ => Err(InterpreterError::IllegalAddition),
            },
            InfixOperator::Subtract => numerical_binop(op, lhs, rhs, |a, b| Object::Number(a - b)),
            InfixOperator::Multiply => numerical_binop(op, lhs, rhs, |a, b| Object::Number(a * b)),
            InfixOperator::Divide => match (lhs, rhs) {
                (Object::Number(a), Object::Number(b)) => {
                    if b != 0.0 {
                        Ok(Object::Number(a / b))
                    } else {
                        Err(InterpreterError::DivideByZero)
                    }
                }
                _ => Err(InterpreterError::IllegalInfixOperation(op)),
            },
            // Same as C fmod: the result takes the sign of the dividend.
            InfixOperator::Modulo => numerical_binop(op, lhs, rhs, |a, b| Object::Number(a % b)),
            InfixOperator::EqualTo => Ok(Object::Boolean(lhs == rhs)),
            InfixOperator::NotEqualTo => Ok(Object::Boolean(lhs != rhs)),
            InfixOperator::GreaterEq => {
                numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a >= b))
            }
            InfixOperator::GreaterThan => {
                numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a > b))
            }
            InfixOperator::LessEq => numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a <= b)),
            InfixOperator::LessThan => numerical_binop(op, lhs, rhs, |a, b| Object::Boolean(a < b)),
        }
    }

    pub fn apply_prefix_op(op: PrefixOperator, value: Object) -> OpResult<Object> {
        match op {
            PrefixOperator::Negate => match value {
                Object::Number(n) => Ok(Object::Number(-n)),
                _ => Err(InterpreterError::IllegalPrefixOperation(op)),
            },
            PrefixOperator::LogicalNot => Ok(Object::Boolean(!value.is_truthy())),
        }
    }
}

fn numerical_binop<F>(op: InfixOperator, lhs: Object, rhs: Object, func: F) -> OpResult<Object>
where
    F: Fn(f64, f64) -> Object,
{
    match (lhs, rhs) {
        (Object::Number(a), Object::Number(b)) => Ok(func(a, b)),
        _ => Err(InterpreterError::IllegalInfixOperation(op)),
    }
}

/// Shortest representation that reads back as the same number. Very large
/// and very small magnitudes switch to exponent form.
fn format_number(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_owned();
    }
    if n.is_infinite() {
        return if n > 0.0 { "+Inf" } else { "-Inf" }.to_owned();
    }

    let scientific = format!("{:e}", n);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some((mantissa, exponent)) => (mantissa, exponent.parse::<i32>().unwrap_or(0)),
        None => return scientific,
    };

    if n != 0.0 && !(-4..21).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        n.to_string()
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Object::Number(n) => f.write_str(&format_number(*n)),
            Object::Boolean(b) => write!(f, "{}", b),
            Object::String(s) => f.write_str(s),
            Object::Nil => f.write_str("nil"),
            Object::Array(array) => write!(f, "{}", array),
            Object::NativeFunc(_) => f.write_str("<native fn>"),
            Object::LoxFunc(func) => write!(f, "{}", func),
            Object::LoxClass(class) => write!(f, "{}", class),
            Object::LoxInstance(instance) => write!(f, "{}", instance),
            Object::LoxTrait(lox_trait) => write!(f, "{}", lox_trait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_formatting() {
        let cases = [
            (1.0, "1"),
            (-2.5, "-2.5"),
            (0.1 + 0.2, "0.30000000000000004"),
            (100.0, "100"),
            (0.0001, "0.0001"),
            (0.00001, "1e-05"),
            (1e20, "100000000000000000000"),
            (1e21, "1e+21"),
            (1.5e300, "1.5e+300"),
            (0.0, "0"),
            (f64::INFINITY, "+Inf"),
            (f64::NEG_INFINITY, "-Inf"),
            (f64::NAN, "NaN"),
        ];

        for (n, expected) in cases {
            assert_eq!(Object::Number(n).to_string(), expected);
        }
    }

    #[test]
    fn test_truthiness() {
        assert!(!Object::Nil.is_truthy());
        assert!(!Object::Boolean(false).is_truthy());
        assert!(Object::Boolean(true).is_truthy());
        assert!(Object::Number(0.0).is_truthy());
        assert!(Object::String(String::new()).is_truthy());
    }

    #[test]
    fn test_arithmetic() {
        let num = Object::Number;
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Add, num(1.0), num(2.0)),
            Ok(num(3.0))
        );
        assert_eq!(
            Object::apply_infix_op(
                InfixOperator::Add,
                Object::String("ab".to_owned()),
                Object::String("c".to_owned())
            ),
            Ok(Object::String("abc".to_owned()))
        );
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Add, num(1.0), Object::String("c".to_owned())),
            Err(InterpreterError::IllegalAddition)
        );
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Modulo, num(-7.0), num(3.0)),
            Ok(num(-1.0))
        );
        assert_eq!(
            Object::apply_infix_op(InfixOperator::Divide, num(1.0), num(0.0)),
            Err(InterpreterError::DivideByZero)
        );
        assert_eq!(
            Object::apply_infix_op(InfixOperator::LessThan, num(1.0), Object::Nil),
            Err(InterpreterError::IllegalInfixOperation(InfixOperator::LessThan))
        );
        assert_eq!(
            Object::apply_prefix_op(PrefixOperator::Negate, Object::Boolean(true)),
            Err(InterpreterError::IllegalPrefixOperation(PrefixOperator::Negate))
        );
    }

    #[test]
    fn test_modulo_by_zero_is_nan() {
        match Object::apply_infix_op(InfixOperator::Modulo, Object::Number(1.0), Object::Number(0.0)) {
            Ok(Object::Number(n)) => assert!(n.is_nan()),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_equality() {
        let nan = Object::Number(f64::NAN);
        assert_ne!(nan, nan.clone());
        assert_eq!(Object::Nil, Object::Nil);
        assert_ne!(Object::Nil, Object::Boolean(false));
        assert_eq!(
            Object::String("a".to_owned()),
            Object::String("a".to_owned())
        );
        assert_ne!(Object::Number(1.0), Object::String("1".to_owned()));
    }
}
