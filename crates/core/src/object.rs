//! Shared, identity-bearing containers of the host value model
//!
//! - [`Object`]: ordered property bag with optional tag (plain when untagged)
//! - [`Array`]: ordered sequence of values
//! - [`Function`]: native callable
//! - [`Symbol`]: unique, identity-compared key or value
//!
//! Every container is a handle around `Arc<RwLock<..>>`. Cloning a handle
//! aliases the same node, which is how cyclic graphs are expressed. Locks are
//! never held while user code (getters, functions) runs.

use crate::error::{Result, Thrown};
use crate::value::Value;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

// ============================================================================
// Keys and properties
// ============================================================================

/// A unique symbol. Two symbols are equal only if they are the same symbol.
#[derive(Clone)]
pub struct Symbol(Arc<str>);

impl Symbol {
    /// Create a new, unique symbol with a description
    pub fn new(description: &str) -> Self {
        Symbol(Arc::from(description))
    }

    /// The symbol description
    pub fn description(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Symbol {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.0)
    }
}

/// Property key: a string name or a symbol
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKey {
    /// String-named property
    Name(String),
    /// Symbol-keyed property
    Symbol(Symbol),
}

impl PropertyKey {
    /// The key name, if this is not a symbol key
    pub fn as_name(&self) -> Option<&str> {
        match self {
            PropertyKey::Name(name) => Some(name),
            PropertyKey::Symbol(_) => None,
        }
    }

    fn matches(&self, name: &str) -> bool {
        self.as_name() == Some(name)
    }
}

impl From<&str> for PropertyKey {
    fn from(name: &str) -> Self {
        PropertyKey::Name(name.to_string())
    }
}

impl From<String> for PropertyKey {
    fn from(name: String) -> Self {
        PropertyKey::Name(name)
    }
}

impl From<Symbol> for PropertyKey {
    fn from(symbol: Symbol) -> Self {
        PropertyKey::Symbol(symbol)
    }
}

/// Getter closure backing an accessor property
pub type GetterFn = dyn Fn() -> Result<Value> + Send + Sync;

/// Storage of a single property
#[derive(Clone)]
pub enum Slot {
    /// Plain data value
    Data(Value),
    /// Accessor evaluated on every read; may throw
    Getter(Arc<GetterFn>),
}

impl Slot {
    /// Read the slot, running the getter if there is one
    pub fn read(&self) -> Result<Value> {
        match self {
            Slot::Data(value) => Ok(value.clone()),
            Slot::Getter(getter) => getter(),
        }
    }
}

impl PartialEq for Slot {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Slot::Data(a), Slot::Data(b)) => a == b,
            (Slot::Getter(a), Slot::Getter(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Data(value) => write!(f, "{:?}", value),
            Slot::Getter(_) => f.write_str("[Getter]"),
        }
    }
}

/// A property: its slot plus the enumerable attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    /// Value or accessor
    pub slot: Slot,
    /// Whether the property shows up in key listings
    pub enumerable: bool,
}

impl Property {
    /// Enumerable data property
    pub fn data(value: impl Into<Value>) -> Self {
        Property {
            slot: Slot::Data(value.into()),
            enumerable: true,
        }
    }

    /// Non-enumerable data property
    pub fn hidden(value: impl Into<Value>) -> Self {
        Property {
            slot: Slot::Data(value.into()),
            enumerable: false,
        }
    }

    /// Enumerable accessor property
    pub fn getter<F>(getter: F) -> Self
    where
        F: Fn() -> Result<Value> + Send + Sync + 'static,
    {
        Property {
            slot: Slot::Getter(Arc::new(getter)),
            enumerable: true,
        }
    }
}

/// Ordered own properties of an object or error instance
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties {
    entries: Vec<(PropertyKey, Property)>,
}

impl Properties {
    /// Empty property list
    pub fn new() -> Self {
        Self::default()
    }

    /// Find an own property
    pub fn find(&self, key: &PropertyKey) -> Option<&Property> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, p)| p)
    }

    /// Find an own string-named property
    pub fn find_name(&self, name: &str) -> Option<&Property> {
        self.entries
            .iter()
            .find(|(k, _)| k.matches(name))
            .map(|(_, p)| p)
    }

    /// Define or redefine a property, keeping its position if it exists
    pub fn define(&mut self, key: PropertyKey, property: Property) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = property,
            None => self.entries.push((key, property)),
        }
    }

    /// Assign a value. Existing properties keep their enumerable attribute;
    /// an accessor is replaced by a data slot.
    pub fn assign(&mut self, key: PropertyKey, value: Value) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => existing.slot = Slot::Data(value),
            None => self.entries.push((key, Property::data(value))),
        }
    }

    /// Remove a property
    pub fn remove(&mut self, key: &PropertyKey) -> Option<Property> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    /// Own keys with their enumerable attribute, in insertion order
    pub fn keys(&self) -> Vec<(PropertyKey, bool)> {
        self.entries
            .iter()
            .map(|(k, p)| (k.clone(), p.enumerable))
            .collect()
    }

    /// Iterate own properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(PropertyKey, Property)> {
        self.entries.iter()
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no own properties
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// Object
// ============================================================================

#[derive(Default)]
struct ObjectData {
    tag: Option<String>,
    props: Properties,
    revoked: bool,
}

/// Shared handle to a keyed object
///
/// An untagged object is a plain object. A tag (e.g. `"Set"`, `"Arguments"`)
/// marks an exotic object that traversals treat as opaque.
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<ObjectData>>);

impl Object {
    /// New empty plain object
    pub fn new() -> Self {
        Self::default()
    }

    /// New empty exotic object with the given tag
    pub fn with_tag(tag: impl Into<String>) -> Self {
        Object(Arc::new(RwLock::new(ObjectData {
            tag: Some(tag.into()),
            ..ObjectData::default()
        })))
    }

    /// Plain object from enumerable data properties
    pub fn from_entries<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let object = Object::new();
        {
            let mut data = object.0.write();
            for (key, value) in entries {
                data.props.assign(PropertyKey::Name(key.into()), value);
            }
        }
        object
    }

    /// The exotic tag, `None` for plain objects
    pub fn tag(&self) -> Option<String> {
        self.0.read().tag.clone()
    }

    /// Whether this is a plain object
    pub fn is_plain(&self) -> bool {
        self.0.read().tag.is_none()
    }

    /// Revoke the object: every later access throws
    pub fn revoke(&self) {
        self.0.write().revoked = true;
    }

    fn check_revoked(&self) -> Result<()> {
        if self.0.read().revoked {
            return Err(Thrown::type_error(
                "Cannot perform operation on a revoked proxy",
            ));
        }
        Ok(())
    }

    /// Read a string-named property. Missing properties read as `Undefined`.
    pub fn get(&self, name: &str) -> Result<Value> {
        self.check_revoked()?;
        let slot = self.0.read().props.find_name(name).map(|p| p.slot.clone());
        match slot {
            Some(slot) => slot.read(),
            None => Ok(Value::Undefined),
        }
    }

    /// Read a property by key
    pub fn get_key(&self, key: &PropertyKey) -> Result<Value> {
        self.check_revoked()?;
        let slot = self.0.read().props.find(key).map(|p| p.slot.clone());
        match slot {
            Some(slot) => slot.read(),
            None => Ok(Value::Undefined),
        }
    }

    /// Whether a string-named own property exists
    pub fn has_own(&self, name: &str) -> Result<bool> {
        self.check_revoked()?;
        Ok(self.0.read().props.find_name(name).is_some())
    }

    /// Own keys with their enumerable attribute
    pub fn own_keys(&self) -> Result<Vec<(PropertyKey, bool)>> {
        self.check_revoked()?;
        Ok(self.0.read().props.keys())
    }

    /// Assign a property (`object[key] = value`)
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) -> Result<()> {
        self.check_revoked()?;
        self.0.write().props.assign(key.into(), value.into());
        Ok(())
    }

    /// Define a property with explicit attributes
    pub fn define(&self, key: impl Into<PropertyKey>, property: Property) -> Result<()> {
        self.check_revoked()?;
        self.0.write().props.define(key.into(), property);
        Ok(())
    }

    /// Delete an own property, returning whether it existed
    pub fn delete(&self, key: impl Into<PropertyKey>) -> Result<bool> {
        self.check_revoked()?;
        Ok(self.0.write().props.remove(&key.into()).is_some())
    }

    /// Number of own properties
    pub fn len(&self) -> usize {
        self.0.read().props.len()
    }

    /// Whether there are no own properties
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of the own properties
    pub fn properties(&self) -> Properties {
        self.0.read().props.clone()
    }

    /// Identity comparison
    pub fn same(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the underlying node
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        if self.same(other) {
            return true;
        }
        let (a, b) = (self.0.read(), other.0.read());
        a.tag == b.tag
            && a.props.len() == b.props.len()
            && a.props
                .iter()
                .all(|(key, prop)| b.props.find(key) == Some(prop))
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.0.read();
        if let Some(tag) = &data.tag {
            write!(f, "{} ", tag)?;
        }
        let mut map = f.debug_map();
        for (key, prop) in data.props.iter() {
            match key {
                PropertyKey::Name(name) => map.entry(name, &Shallow(&prop.slot)),
                PropertyKey::Symbol(symbol) => map.entry(symbol, &Shallow(&prop.slot)),
            };
        }
        map.finish()
    }
}

// ============================================================================
// Array
// ============================================================================

/// Shared handle to an ordered sequence
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    /// New empty array
    pub fn new() -> Self {
        Self::default()
    }

    /// Array owning the given items
    pub fn from_vec(items: Vec<Value>) -> Self {
        Array(Arc::new(RwLock::new(items)))
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    /// Whether the array is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Item at `index`, `Undefined` when out of bounds
    pub fn get(&self, index: usize) -> Value {
        self.0.read().get(index).cloned().unwrap_or(Value::Undefined)
    }

    /// Set item at `index`, padding with `Undefined` when out of bounds
    pub fn set(&self, index: usize, value: impl Into<Value>) {
        let mut items = self.0.write();
        if index >= items.len() {
            items.resize(index + 1, Value::Undefined);
        }
        items[index] = value.into();
    }

    /// Append an item
    pub fn push(&self, value: impl Into<Value>) {
        self.0.write().push(value.into());
    }

    /// Snapshot of the items
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    /// Identity comparison
    pub fn same(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the underlying node
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for Array {
    fn eq(&self, other: &Self) -> bool {
        self.same(other) || *self.0.read() == *other.0.read()
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.0.read().iter().map(Shallow))
            .finish()
    }
}

// ============================================================================
// Function
// ============================================================================

/// Native function body
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value> + Send + Sync;

/// Shared handle to a callable
#[derive(Clone)]
pub struct Function {
    name: Arc<str>,
    body: Arc<NativeFn>,
}

impl Function {
    /// Wrap a closure as a named function
    pub fn new<F>(name: &str, body: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Function {
            name: Arc::from(name),
            body: Arc::new(body),
        }
    }

    /// Function name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the function
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        (self.body)(args)
    }

    /// Identity comparison
    pub fn same(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.body, &other.body)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name)
    }
}

// Prints nested containers as placeholders so Debug terminates on cycles.
struct Shallow<'a, T>(&'a T);

impl fmt::Debug for Shallow<'_, Slot> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Slot::Data(value) => fmt::Debug::fmt(&Shallow(value), f),
            Slot::Getter(_) => f.write_str("[Getter]"),
        }
    }
}

impl fmt::Debug for Shallow<'_, Value> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Value::Array(_) => f.write_str("[Array]"),
            Value::Object(_) => f.write_str("[Object]"),
            Value::Error(error) => write!(f, "[{}]", error.name()),
            other => fmt::Debug::fmt(other, f),
        }
    }
}
