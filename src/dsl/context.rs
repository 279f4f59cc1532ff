//! Argument values and the context handed to DSL handlers

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A parsed DSL argument
#[derive(Clone)]
pub enum ArgValue {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Any other value produced by a custom parser, e.g. a host object
    /// looked up by name
    Custom(Arc<dyn Any + Send + Sync>),
}

impl fmt::Debug for ArgValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgValue::Text(s) => f.debug_tuple("Text").field(s).finish(),
            ArgValue::Int(n) => f.debug_tuple("Int").field(n).finish(),
            ArgValue::Float(n) => f.debug_tuple("Float").field(n).finish(),
            ArgValue::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            ArgValue::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl PartialEq for ArgValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ArgValue::Text(a), ArgValue::Text(b)) => a == b,
            (ArgValue::Int(a), ArgValue::Int(b)) => a == b,
            (ArgValue::Float(a), ArgValue::Float(b)) => a == b,
            (ArgValue::Bool(a), ArgValue::Bool(b)) => a == b,
            (ArgValue::Custom(a), ArgValue::Custom(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

/// Arguments bound along the path from the root to the firing handler
pub type Arguments = HashMap<String, ArgValue>;

/// What a DSL handler sees: the binding and the arguments bound so far
///
/// Typed accessors return `None` when the argument is absent or holds a
/// different kind of value.
pub struct DslContext<'a, T> {
    binder: &'a T,
    arguments: &'a Arguments,
}

impl<'a, T> DslContext<'a, T> {
    pub fn new(binder: &'a T, arguments: &'a Arguments) -> Self {
        Self { binder, arguments }
    }

    pub fn binder(&self) -> &'a T {
        self.binder
    }

    pub fn arguments(&self) -> &'a Arguments {
        self.arguments
    }

    pub fn get(&self, id: &str) -> Option<&'a ArgValue> {
        self.arguments.get(id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.arguments.contains_key(id)
    }

    pub fn string(&self, id: &str) -> Option<&'a str> {
        match self.get(id)? {
            ArgValue::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn int(&self, id: &str) -> Option<i64> {
        match self.get(id)? {
            ArgValue::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Float argument; integer arguments are widened
    pub fn float(&self, id: &str) -> Option<f64> {
        match self.get(id)? {
            ArgValue::Float(n) => Some(*n),
            ArgValue::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn bool(&self, id: &str) -> Option<bool> {
        match self.get(id)? {
            ArgValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Value produced by a custom parser, if it has type `R`
    pub fn custom<R: Any>(&self, id: &str) -> Option<&'a R> {
        match self.get(id)? {
            ArgValue::Custom(value) => value.downcast_ref::<R>(),
            _ => None,
        }
    }
}
