use super::errors::{InterpreterError, OpResult, RuntimeResult};
use super::function::LoxFn;
use super::interpreter::Interpreter;
use super::object::Object;
use crate::lox_frontend::constants::INIT_STR;

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;
use std::rc::Rc;

struct LoxClassData {
    name: String,
    superclass: Option<LoxClassDataPtr>,
    methods: HashMap<String, LoxFn>,
    static_methods: HashMap<String, LoxFn>,
    static_fields: RefCell<HashMap<String, Object>>,
}

#[derive(Clone)]
pub struct LoxClassDataPtr(Rc<LoxClassData>);

pub struct LoxInstanceData {
    class: LoxClassDataPtr,
    properties: RefCell<HashMap<String, Object>>,
}

#[derive(Clone)]
pub struct LoxInstanceDataPtr(Rc<LoxInstanceData>);

impl LoxClassDataPtr {
    pub fn new(
        name: String,
        superclass: Option<LoxClassDataPtr>,
        methods: HashMap<String, LoxFn>,
        static_methods: HashMap<String, LoxFn>,
    ) -> Self {
        let data = LoxClassData {
            name,
            superclass,
            methods,
            static_methods,
            static_fields: RefCell::new(HashMap::new()),
        };
        LoxClassDataPtr(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Instance method lookup, continuing up the superclass chain.
    pub fn find_method(&self, name: &str) -> Option<LoxFn> {
        let method = self.0.methods.get(name).cloned();
        match &self.0.superclass {
            Some(superclass) => method.or_else(|| superclass.find_method(name)),
            None => method,
        }
    }

    /// Static access: static fields first, then static methods, then the
    /// superclass.
    pub fn get(&self, name: &str) -> OpResult<Object> {
        if let Some(field) = self.0.static_fields.borrow().get(name) {
            return Ok(field.clone());
        }

        if let Some(method) = self.0.static_methods.get(name) {
            return Ok(Object::LoxFunc(method.clone()));
        }

        match &self.0.superclass {
            Some(superclass) => superclass.get(name),
            None => Err(InterpreterError::UndefinedProperty(name.to_owned())),
        }
    }

    pub fn set(&self, name: &str, value: Object) {
        self.0
            .static_fields
            .borrow_mut()
            .insert(name.to_owned(), value);
    }

    /// Arity is checked by the caller.
    pub fn execute<W: Write>(
        &self,
        args: Vec<Object>,
        interpreter: &mut Interpreter<W>,
    ) -> RuntimeResult<Object> {
        let instance = Object::LoxInstance(LoxInstanceDataPtr::new(self));
        if let Some(init) = self.find_method(INIT_STR) {
            init.bind(instance.clone()).execute(args, interpreter)?;
        }

        Ok(instance)
    }

    pub fn arity(&self) -> usize {
        match self.find_method(INIT_STR) {
            Some(init) => init.arity(),
            None => 0,
        }
    }
}

impl LoxInstanceDataPtr {
    pub fn new(class: &LoxClassDataPtr) -> Self {
        let data = LoxInstanceData {
            class: class.clone(),
            properties: RefCell::new(HashMap::new()),
        };
        LoxInstanceDataPtr(Rc::new(data))
    }

    pub fn class(&self) -> &LoxClassDataPtr {
        &self.0.class
    }

    /// Fields shadow methods. Methods come back bound to this instance.
    pub fn get(&self, name: &str) -> OpResult<Object> {
        if let Some(obj) = self.find_property(name) {
            return Ok(obj);
        }
        if let Some(method) = self.0.class.find_method(name) {
            let bound_method = method.bind(Object::LoxInstance(self.clone()));
            return Ok(Object::LoxFunc(bound_method));
        }

        Err(InterpreterError::UndefinedProperty(name.to_owned()))
    }

    pub fn set(&self, property: &str, value: Object) {
        self.0
            .properties
            .borrow_mut()
            .insert(property.to_owned(), value);
    }

    fn find_property(&self, name: &str) -> Option<Object> {
        self.0.properties.borrow().get(name).cloned()
    }
}

impl PartialEq<LoxClassDataPtr> for LoxClassDataPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq<LoxInstanceDataPtr> for LoxInstanceDataPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LoxClassDataPtr {}

impl Eq for LoxInstanceDataPtr {}

impl fmt::Display for LoxClassDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<class {}>", self.0.name)
    }
}

impl fmt::Display for LoxInstanceDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<{} instance>", self.class().name())
    }
}

impl fmt::Debug for LoxClassDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<class {}>", self.0.name)
    }
}

impl fmt::Debug for LoxInstanceDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<instance of {}>", self.class().name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(name: &str, superclass: Option<LoxClassDataPtr>) -> LoxClassDataPtr {
        LoxClassDataPtr::new(name.to_owned(), superclass, HashMap::new(), HashMap::new())
    }

    #[test]
    fn test_static_fields_are_inherited() {
        let base = class("Base", None);
        let derived = class("Derived", Some(base.clone()));

        base.set("count", Object::Number(1.0));
        assert_eq!(derived.get("count"), Ok(Object::Number(1.0)));

        derived.set("count", Object::Number(2.0));
        assert_eq!(derived.get("count"), Ok(Object::Number(2.0)));
        assert_eq!(base.get("count"), Ok(Object::Number(1.0)));

        assert_eq!(
            derived.get("missing"),
            Err(InterpreterError::UndefinedProperty("missing".to_owned()))
        );
    }

    #[test]
    fn test_instance_fields() {
        let point = class("Point", None);
        let instance = LoxInstanceDataPtr::new(&point);

        instance.set("x", Object::Number(3.0));
        assert_eq!(instance.get("x"), Ok(Object::Number(3.0)));
        assert!(instance.get("y").is_err());
        assert_eq!(instance.class(), &point);
        assert_eq!(point.arity(), 0);
    }

    #[test]
    fn test_display() {
        let point = class("Point", None);
        let instance = LoxInstanceDataPtr::new(&point);

        assert_eq!(point.to_string(), "<class Point>");
        assert_eq!(instance.to_string(), "<Point instance>");
    }
}
