use std::fmt;

use serde::ser::Serialize;
use serde_json::value::{to_value, Map, Value};

use crate::errors::{Error, Result};

/// The data a template is rendered against.
///
/// The root of a context is always a mapping; values inside it can be any
/// JSON value. Dot paths in templates (`user.name`) walk into nested
/// mappings.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Context {
    data: Map<String, Value>,
}

impl Context {
    /// Initializes an empty context
    pub fn new() -> Self {
        Context { data: Map::new() }
    }

    /// Converts the `val` parameter to `Value` and inserts it into the context.
    ///
    /// Panics if the serialization fails, see [`Context::try_insert`] for a
    /// fallible version.
    ///
    /// ```rust
    /// # use stencil::Context;
    /// let mut context = Context::new();
    /// context.insert("number_users", &42);
    /// ```
    pub fn insert<T: Serialize + ?Sized, S: Into<String>>(&mut self, key: S, val: &T) {
        self.data.insert(key.into(), to_value(val).unwrap());
    }

    /// Converts the `val` parameter to `Value` and inserts it into the
    /// context, returning an error if the serialization fails.
    pub fn try_insert<T: Serialize + ?Sized, S: Into<String>>(
        &mut self,
        key: S,
        val: &T,
    ) -> Result<()> {
        self.data.insert(key.into(), to_value(val).map_err(Error::json)?);
        Ok(())
    }

    /// Takes a serializable object and returns a context built from it.
    /// Errors if the object is not serializable or does not serialize to a
    /// JSON object.
    pub fn from_serialize(value: impl Serialize) -> Result<Self> {
        let obj = to_value(value).map_err(Error::json)?;
        Context::from_value(obj)
    }

    /// Takes a `Value` and returns a context built from it.
    /// Errors if the value is not a JSON object.
    pub fn from_value(obj: Value) -> Result<Self> {
        match obj {
            Value::Object(data) => Ok(Context { data }),
            _ => Err(Error::msg(
                "creating a Context from a Value/Serialize requires it being a JSON object",
            )),
        }
    }

    /// Returns the value at a given key, or `None` if there isn't one
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Takes the context and returns its data as a `Value`
    pub fn into_json(self) -> Value {
        Value::Object(self.data)
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&Value::Object(self.data.clone()), f)
    }
}

/// Resolves a dot-separated path against a value tree.
///
/// Absence is a first-class result, never an error: the walk stops and
/// returns `None` as soon as a key is missing, an intermediate value is not a
/// mapping, or the value found is `null`.
pub fn dotted_pointer<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;
    for part in path.split('.') {
        match current {
            Value::Object(map) => match map.get(part) {
                Some(found) => current = found,
                None => return None,
            },
            _ => return None,
        }
    }

    if current.is_null() {
        None
    } else {
        Some(current)
    }
}

/// Turns a value into the text inserted for a placeholder.
pub trait JsonRender {
    /// The textual representation of the value, inserted verbatim
    fn render(&self) -> String;
}

impl JsonRender for Value {
    fn render(&self) -> String {
        match self {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Null => String::new(),
            Value::Array(values) => {
                let rendered: Vec<String> = values.iter().map(JsonRender::render).collect();
                rendered.join(",")
            }
            Value::Object(_) => self.to_string(),
        }
    }
}

/// Literal truthiness for conditionals.
pub trait JsonTruthy {
    /// Whether an `{{#if}}` keeps its body for this value.
    ///
    /// `false`, `0`, the empty string and `null` are falsy; sequences and
    /// mappings are truthy even when empty.
    fn is_truthy(&self) -> bool;
}

impl JsonTruthy for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().map_or(false, |n| n != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }
}
