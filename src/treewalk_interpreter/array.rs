use super::errors::{InterpreterError, OpResult};
use super::object::Object;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Growable array shared by reference: every copy of the value sees the
/// same elements.
#[derive(Clone)]
pub struct LoxArray(Rc<RefCell<Vec<Object>>>);

impl LoxArray {
    pub fn new(elements: Vec<Object>) -> Self {
        LoxArray(Rc::new(RefCell::new(elements)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn get(&self, index: &Object) -> OpResult<Object> {
        let index = self.validate(index)?;
        Ok(self.0.borrow()[index].clone())
    }

    pub fn set(&self, index: &Object, value: Object) -> OpResult<Object> {
        let index = self.validate(index)?;
        self.0.borrow_mut()[index] = value.clone();
        Ok(value)
    }

    pub fn append(&self, value: Object) {
        self.0.borrow_mut().push(value);
    }

    /// Checks that `index` is a whole, non-negative number inside the array.
    fn validate(&self, index: &Object) -> OpResult<usize> {
        let index = match index {
            Object::Number(n) if n.fract() == 0.0 => *n,
            _ => return Err(InterpreterError::NonIntegerIndex),
        };

        if index < 0.0 {
            return Err(InterpreterError::NegativeIndex);
        }

        if index >= self.len() as f64 {
            return Err(InterpreterError::IndexOutOfBounds);
        }

        Ok(index as usize)
    }
}

impl PartialEq<LoxArray> for LoxArray {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl LoxArray {
    /// Writes the elements, printing an array that is already being written
    /// further up as `[...]`.
    fn render(
        &self,
        f: &mut fmt::Formatter,
        in_progress: &mut Vec<*const RefCell<Vec<Object>>>,
    ) -> fmt::Result {
        let ptr = Rc::as_ptr(&self.0);
        if in_progress.contains(&ptr) {
            return f.write_str("[...]");
        }

        in_progress.push(ptr);
        f.write_str("[")?;
        for (i, element) in self.0.borrow().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match element {
                Object::Array(inner) => inner.render(f, in_progress)?,
                other => write!(f, "{}", other)?,
            }
        }
        in_progress.pop();
        f.write_str("]")
    }
}

impl fmt::Display for LoxArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.render(f, &mut Vec::new())
    }
}

impl fmt::Debug for LoxArray {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<array of {}>", self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbers(values: &[f64]) -> LoxArray {
        LoxArray::new(values.iter().map(|n| Object::Number(*n)).collect())
    }

    #[test]
    fn test_index_validation() {
        let array = numbers(&[1.0, 2.0, 3.0]);

        assert_eq!(array.get(&Object::Number(2.0)), Ok(Object::Number(3.0)));
        assert_eq!(
            array.get(&Object::Number(1.5)),
            Err(InterpreterError::NonIntegerIndex)
        );
        assert_eq!(
            array.get(&Object::String("1".to_owned())),
            Err(InterpreterError::NonIntegerIndex)
        );
        assert_eq!(
            array.get(&Object::Number(-1.0)),
            Err(InterpreterError::NegativeIndex)
        );
        assert_eq!(
            array.get(&Object::Number(3.0)),
            Err(InterpreterError::IndexOutOfBounds)
        );
        assert_eq!(
            array.get(&Object::Number(f64::NAN)),
            Err(InterpreterError::NonIntegerIndex)
        );
    }

    #[test]
    fn test_mutation_is_shared() {
        let array = numbers(&[1.0]);
        let alias = array.clone();

        alias.append(Object::Nil);
        array.set(&Object::Number(0.0), Object::Boolean(true)).unwrap();

        assert_eq!(array.len(), 2);
        assert_eq!(alias.get(&Object::Number(0.0)), Ok(Object::Boolean(true)));
        assert_eq!(array, alias);
        assert_ne!(array, numbers(&[1.0]));
    }

    #[test]
    fn test_display_is_recursive() {
        let inner = numbers(&[2.0, 3.5]);
        let outer = LoxArray::new(vec![
            Object::Number(1.0),
            Object::Array(inner),
            Object::Nil,
            Object::String("s".to_owned()),
        ]);

        assert_eq!(outer.to_string(), "[1, [2, 3.5], nil, s]");
        assert_eq!(LoxArray::new(vec![]).to_string(), "[]");
    }

    #[test]
    fn test_display_of_self_containing_array() {
        let array = numbers(&[1.0]);
        array.append(Object::Array(array.clone()));
        assert_eq!(array.to_string(), "[1, [...]]");

        // A repeated but non-cyclic element prints in full each time.
        let shared = numbers(&[2.0]);
        let outer = LoxArray::new(vec![
            Object::Array(shared.clone()),
            Object::Array(shared),
        ]);
        assert_eq!(outer.to_string(), "[[2], [2]]");

        let wrapper = LoxArray::new(vec![Object::Array(array)]);
        assert_eq!(wrapper.to_string(), "[[1, [...]]]");
    }
}
