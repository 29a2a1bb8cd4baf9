use super::function::LoxFn;

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

struct LoxTraitData {
    name: String,
    methods: HashMap<String, LoxFn>,
    static_methods: HashMap<String, LoxFn>,
}

/// A bundle of methods copied into every class that composes it.
#[derive(Clone)]
pub struct LoxTraitDataPtr(Rc<LoxTraitData>);

impl LoxTraitDataPtr {
    pub fn new(
        name: String,
        methods: HashMap<String, LoxFn>,
        static_methods: HashMap<String, LoxFn>,
    ) -> Self {
        let data = LoxTraitData {
            name,
            methods,
            static_methods,
        };
        LoxTraitDataPtr(Rc::new(data))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn methods(&self) -> impl Iterator<Item = (&String, &LoxFn)> {
        self.0.methods.iter()
    }

    pub fn static_methods(&self) -> impl Iterator<Item = (&String, &LoxFn)> {
        self.0.static_methods.iter()
    }
}

impl PartialEq<LoxTraitDataPtr> for LoxTraitDataPtr {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for LoxTraitDataPtr {}

impl fmt::Display for LoxTraitDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<trait {}>", self.name())
    }
}

impl fmt::Debug for LoxTraitDataPtr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<trait {}>", self.name())
    }
}
