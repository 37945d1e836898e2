//! Value types for errwire
//!
//! This module defines:
//! - Value: Unified enum for every value a host error graph can hold
//!
//! ## Value Model
//!
//! - JSON-representable leaves: `Null`, `Bool`, `Int`, `Float`, `String`
//! - Leaves a JSON encoder rejects: `Undefined`, `BigInt`, `Symbol`,
//!   `Function`, `Class`, and non-finite floats
//! - Shared handles with identity: `Array`, `Object`, `Error`
//!
//! Handles alias: `Value::same` is identity, `==` is structural for arrays and
//! objects and identity for errors, functions, classes and symbols. Structural
//! equality does not terminate on cyclic graphs.

use crate::instance::{ErrorClass, ErrorRef};
use crate::object::{Array, Function, Object, PropertyKey, Slot, Symbol};
use serde::ser::{Error as _, Serialize, Serializer};
use std::fmt;

/// A host value
#[derive(Clone)]
pub enum Value {
    /// Absence of a value
    Undefined,
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point (IEEE-754)
    Float(f64),
    /// UTF-8 string
    String(String),
    /// Arbitrary-precision integer (not JSON-representable)
    BigInt(i128),
    /// Unique symbol
    Symbol(Symbol),
    /// Callable
    Function(Function),
    /// Error constructor
    Class(ErrorClass),
    /// Ordered sequence
    Array(Array),
    /// Keyed object
    Object(Object),
    /// Live error instance
    Error(ErrorRef),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Undefined, Value::Undefined) => true,
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            // IEEE-754: NaN != NaN, -0.0 == 0.0
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::BigInt(a), Value::BigInt(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Undefined => f.write_str("undefined"),
            Value::Null => f.write_str("null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::BigInt(i) => write!(f, "{}n", i),
            Value::Symbol(s) => write!(f, "{:?}", s),
            Value::Function(func) => write!(f, "{:?}", func),
            Value::Class(class) => write!(f, "{:?}", class),
            Value::Array(array) => write!(f, "{:?}", array),
            Value::Object(object) => write!(f, "{:?}", object),
            Value::Error(error) => write!(f, "{:?}", error),
        }
    }
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::String(_) => "String",
            Value::BigInt(_) => "BigInt",
            Value::Symbol(_) => "Symbol",
            Value::Function(_) => "Function",
            Value::Class(_) => "Class",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
            Value::Error(_) => "Error",
        }
    }

    /// Check if this is `Undefined`
    pub fn is_undefined(&self) -> bool {
        matches!(self, Value::Undefined)
    }

    /// Check if this is an error instance
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_))
    }

    /// Check if this is an untagged object
    pub fn is_plain_object(&self) -> bool {
        matches!(self, Value::Object(object) if object.is_plain())
    }

    /// Check if this is a leaf a JSON encoder would reject
    pub fn is_json_unsafe_leaf(&self) -> bool {
        match self {
            Value::Undefined
            | Value::BigInt(_)
            | Value::Symbol(_)
            | Value::Function(_)
            | Value::Class(_) => true,
            Value::Float(f) => !f.is_finite(),
            _ => false,
        }
    }

    /// Get as bool if this is a Bool value
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get as &str if this is a String value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the array handle if this is an Array value
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    /// Get the object handle if this is an Object value
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Get the error handle if this is an Error value
    pub fn as_error(&self) -> Option<&ErrorRef> {
        match self {
            Value::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Identity of shared handles, `None` for leaves
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.id()),
            Value::Object(o) => Some(o.id()),
            Value::Error(e) => Some(e.id()),
            _ => None,
        }
    }

    /// Strict equality: identity for handles, value equality for leaves
    pub fn same(&self, other: &Value) -> bool {
        match (self.identity(), other.identity()) {
            (Some(a), Some(b)) => a == b,
            (None, None) => self == other,
            _ => false,
        }
    }

    /// Read a string-named property of an object or error instance.
    /// Other values have no properties and read as `Undefined`.
    pub fn get(&self, name: &str) -> crate::Result<Value> {
        match self {
            Value::Object(object) => object.get(name),
            Value::Error(error) => error.get(name),
            _ => Ok(Value::Undefined),
        }
    }

    /// String conversion, as `String(value)` would produce
    pub fn to_js_string(&self) -> String {
        match self {
            Value::Undefined => "undefined".to_string(),
            Value::Null => "null".to_string(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => float_to_string(*f),
            Value::String(s) => s.clone(),
            Value::BigInt(i) => i.to_string(),
            Value::Symbol(s) => format!("Symbol({})", s.description()),
            Value::Function(func) => format!("function {}() {{ [native code] }}", func.name()),
            Value::Class(class) => format!("class {}", class.name()),
            Value::Array(array) => array
                .to_vec()
                .iter()
                .map(|item| match item {
                    Value::Undefined | Value::Null => String::new(),
                    Value::Array(_) => "[array]".to_string(),
                    other => other.to_js_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Value::Object(_) => "[object Object]".to_string(),
            Value::Error(error) => {
                let message = error.message();
                if message.is_empty() {
                    error.name()
                } else {
                    format!("{}: {}", error.name(), message)
                }
            }
        }
    }

    /// Convert to a `serde_json::Value`.
    ///
    /// Returns `None` if the graph contains anything a JSON encoder rejects:
    /// unsafe leaves, error instances, throwing getters, revoked objects or
    /// reference cycles.
    pub fn to_json(&self) -> Option<serde_json::Value> {
        to_json_inner(self, &mut Vec::new())
    }

    /// Plain object from enumerable data properties
    pub fn object<K, I>(entries: I) -> Value
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        Value::Object(Object::from_entries(entries))
    }

    /// Array from items
    pub fn array(items: Vec<Value>) -> Value {
        Value::Array(Array::from_vec(items))
    }
}

fn float_to_string(f: f64) -> String {
    if f.is_nan() {
        "NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 { "Infinity" } else { "-Infinity" }.to_string()
    } else if f == 0.0 {
        "0".to_string()
    } else {
        f.to_string()
    }
}

fn to_json_inner(value: &Value, parents: &mut Vec<usize>) -> Option<serde_json::Value> {
    if let Some(id) = value.identity() {
        if parents.contains(&id) {
            return None;
        }
        parents.push(id);
    }
    let json = match value {
        Value::Null => Some(serde_json::Value::Null),
        Value::Bool(b) => Some(serde_json::Value::Bool(*b)),
        Value::Int(i) => Some(serde_json::Value::Number((*i).into())),
        Value::Float(f) => serde_json::Number::from_f64(*f).map(serde_json::Value::Number),
        Value::String(s) => Some(serde_json::Value::String(s.clone())),
        Value::Array(array) => array
            .to_vec()
            .iter()
            .map(|item| to_json_inner(item, parents))
            .collect::<Option<Vec<_>>>()
            .map(serde_json::Value::Array),
        Value::Object(object) => {
            let mut map = serde_json::Map::new();
            let mut complete = true;
            for (key, prop) in object.properties().iter() {
                let (PropertyKey::Name(name), true) = (key, prop.enumerable) else {
                    continue;
                };
                let item = match &prop.slot {
                    Slot::Data(item) => Some(item.clone()),
                    Slot::Getter(getter) => getter().ok(),
                };
                match item.and_then(|item| to_json_inner(&item, parents)) {
                    Some(json) => {
                        map.insert(name.clone(), json);
                    }
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if object.tag().is_some() || object.own_keys().is_err() {
                complete = false;
            }
            complete.then_some(serde_json::Value::Object(map))
        }
        _ => None,
    };
    if value.identity().is_some() {
        parents.pop();
    }
    json
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.to_json() {
            Some(json) => json.serialize(serializer),
            None => Err(S::Error::custom(format!(
                "{} value is not JSON-representable",
                self.type_name()
            ))),
        }
    }
}

// ============================================================================
// From implementations for ergonomic API usage
// ============================================================================

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(items))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<ErrorRef> for Value {
    fn from(e: ErrorRef) -> Self {
        Value::Error(e)
    }
}

impl From<ErrorClass> for Value {
    fn from(c: ErrorClass) -> Self {
        Value::Class(c)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl From<Symbol> for Value {
    fn from(s: Symbol) -> Self {
        Value::Symbol(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Null
    }
}

// ============================================================================
// serde_json interop for ergonomic JSON construction
// ============================================================================

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    // u64 beyond i64::MAX and true floats
                    Value::Float(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(Array::from_vec(arr.into_iter().map(Value::from).collect()))
            }
            serde_json::Value::Object(obj) => {
                Value::Object(Object::from_entries(obj.into_iter().map(|(k, v)| (k, Value::from(v)))))
            }
        }
    }
}
