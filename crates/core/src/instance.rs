//! Error instances and error classes
//!
//! An [`ErrorRef`] is a live exception: a type tag ([`ErrorClass`]) plus own
//! properties. `name` is inherited from the class unless an own `name`
//! property shadows it. Core attributes set by construction (`message`,
//! `stack`, `cause`, `errors`) are non-enumerable.
//!
//! ## Classes
//!
//! A class is either one of the [`Builtin`] classes or a custom subclass of
//! another class. Constructing a custom class runs the parent's construction
//! first and then the subclass initializer, which may throw.

use crate::error::{Result, Thrown};
use crate::object::{Array, Properties, Property, PropertyKey};
use crate::value::Value;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Built-in error classes provided by this runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Builtin {
    /// Generic base error
    Error,
    /// Invalid reference
    ReferenceError,
    /// Value of the wrong type
    TypeError,
    /// Malformed source
    SyntaxError,
    /// Value out of range
    RangeError,
    /// Malformed URI
    UriError,
    /// Error from `eval`
    EvalError,
    /// Error carrying several sub-errors
    AggregateError,
}

impl Builtin {
    /// Every built-in class
    pub const ALL: [Builtin; 8] = [
        Builtin::Error,
        Builtin::ReferenceError,
        Builtin::TypeError,
        Builtin::SyntaxError,
        Builtin::RangeError,
        Builtin::UriError,
        Builtin::EvalError,
        Builtin::AggregateError,
    ];

    /// Class name as exposed through `error.name`
    pub fn name(self) -> &'static str {
        match self {
            Builtin::Error => "Error",
            Builtin::ReferenceError => "ReferenceError",
            Builtin::TypeError => "TypeError",
            Builtin::SyntaxError => "SyntaxError",
            Builtin::RangeError => "RangeError",
            Builtin::UriError => "URIError",
            Builtin::EvalError => "EvalError",
            Builtin::AggregateError => "AggregateError",
        }
    }

    /// Look a built-in up by class name
    pub fn from_name(name: &str) -> Option<Builtin> {
        Builtin::ALL.into_iter().find(|b| b.name() == name)
    }

    /// The singleton class for this built-in
    pub fn class(self) -> ErrorClass {
        BUILTIN_CLASSES[self as usize].clone()
    }
}

static BUILTIN_CLASSES: Lazy<Vec<ErrorClass>> = Lazy::new(|| {
    let base = ErrorClass(Arc::new(ClassData {
        name: Builtin::Error.name().to_string(),
        kind: ClassKind::Builtin(Builtin::Error),
        parent: None,
    }));
    Builtin::ALL
        .into_iter()
        .map(|builtin| match builtin {
            Builtin::Error => base.clone(),
            other => ErrorClass(Arc::new(ClassData {
                name: other.name().to_string(),
                kind: ClassKind::Builtin(other),
                parent: Some(base.clone()),
            })),
        })
        .collect()
});

/// Subclass construction logic, run after the parent's
pub type Initializer = dyn Fn(&ErrorRef, &[Value]) -> Result<()> + Send + Sync;

enum ClassKind {
    Builtin(Builtin),
    Custom(Option<Arc<Initializer>>),
}

struct ClassData {
    name: String,
    kind: ClassKind,
    parent: Option<ErrorClass>,
}

/// Shared handle to an error class (constructor)
#[derive(Clone)]
pub struct ErrorClass(Arc<ClassData>);

impl ErrorClass {
    /// The generic base `Error` class
    pub fn base() -> ErrorClass {
        Builtin::Error.class()
    }

    /// Subclass of `parent` that only changes the name
    pub fn extend(name: impl Into<String>, parent: &ErrorClass) -> ErrorClass {
        ErrorClass(Arc::new(ClassData {
            name: name.into(),
            kind: ClassKind::Custom(None),
            parent: Some(parent.clone()),
        }))
    }

    /// Subclass of `parent` with an initializer run after the parent's
    /// construction, receiving the new instance and the constructor arguments
    pub fn with_initializer<F>(name: impl Into<String>, parent: &ErrorClass, init: F) -> ErrorClass
    where
        F: Fn(&ErrorRef, &[Value]) -> Result<()> + Send + Sync + 'static,
    {
        ErrorClass(Arc::new(ClassData {
            name: name.into(),
            kind: ClassKind::Custom(Some(Arc::new(init))),
            parent: Some(parent.clone()),
        }))
    }

    /// Class name
    pub fn name(&self) -> &str {
        &self.0.name
    }

    /// Parent class, `None` for the base `Error` class
    pub fn parent(&self) -> Option<&ErrorClass> {
        self.0.parent.as_ref()
    }

    /// The built-in this class is, if any
    pub fn builtin(&self) -> Option<Builtin> {
        match self.0.kind {
            ClassKind::Builtin(builtin) => Some(builtin),
            ClassKind::Custom(_) => None,
        }
    }

    /// Whether this class is `other` or inherits from it
    pub fn is_subclass_of(&self, other: &ErrorClass) -> bool {
        let mut current = Some(self);
        while let Some(class) = current {
            if class.same(other) {
                return true;
            }
            current = class.parent();
        }
        false
    }

    /// Identity comparison
    pub fn same(&self, other: &ErrorClass) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// `new Class(...args)`
    pub fn construct(&self, args: &[Value]) -> Result<ErrorRef> {
        let error = ErrorRef::bare(self);
        self.initialize(&error, args)?;
        Ok(error)
    }

    fn initialize(&self, error: &ErrorRef, args: &[Value]) -> Result<()> {
        match &self.0.kind {
            ClassKind::Builtin(Builtin::AggregateError) => {
                let errors = match args.first() {
                    Some(Value::Array(items)) => Array::from_vec(items.to_vec()),
                    Some(other) => {
                        return Err(Thrown::type_error(format!(
                            "{} is not iterable",
                            other.to_js_string()
                        )))
                    }
                    None => {
                        return Err(Thrown::type_error("undefined is not iterable"));
                    }
                };
                init_base(error, args.get(1), args.get(2))?;
                error.define("errors", Property::hidden(Value::Array(errors)));
                Ok(())
            }
            ClassKind::Builtin(_) => init_base(error, args.first(), args.get(1)),
            ClassKind::Custom(init) => {
                if let Some(parent) = self.parent() {
                    parent.initialize(error, args)?;
                }
                match init {
                    Some(init) => init(error, args),
                    None => Ok(()),
                }
            }
        }
    }
}

// `Error(message, { cause })`
fn init_base(error: &ErrorRef, message: Option<&Value>, options: Option<&Value>) -> Result<()> {
    let message = match message {
        None | Some(Value::Undefined) => String::new(),
        Some(value) => value.to_js_string(),
    };
    error.define("message", Property::hidden(message.clone()));
    if let Some(Value::Object(options)) = options {
        if options.has_own("cause")? {
            error.define("cause", Property::hidden(options.get("cause")?));
        }
    }
    let stack = default_stack(&error.name(), &message);
    error.define("stack", Property::hidden(stack));
    Ok(())
}

/// Stack trace text captured at construction
pub fn default_stack(name: &str, message: &str) -> String {
    if message.is_empty() {
        format!("{}\n    at <anonymous>", name)
    } else {
        format!("{}: {}\n    at <anonymous>", name, message)
    }
}

impl PartialEq for ErrorClass {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[class {}]", self.0.name)
    }
}

// ============================================================================
// ErrorRef
// ============================================================================

struct ErrorData {
    class: ErrorClass,
    props: Properties,
}

/// Shared handle to a live error instance
#[derive(Clone)]
pub struct ErrorRef(Arc<RwLock<ErrorData>>);

impl ErrorRef {
    /// Instance of `class` with no own properties, as seen before any
    /// constructor logic runs
    pub fn bare(class: &ErrorClass) -> Self {
        ErrorRef(Arc::new(RwLock::new(ErrorData {
            class: class.clone(),
            props: Properties::new(),
        })))
    }

    /// `new Error(message)`
    pub fn new(message: impl Into<String>) -> Self {
        Self::with_class(&ErrorClass::base(), message)
    }

    /// Instance of `class` initialized like the base `Error` constructor,
    /// without running any subclass initializer
    pub fn with_class(class: &ErrorClass, message: impl Into<String>) -> Self {
        let error = Self::bare(class);
        let message = message.into();
        let stack = default_stack(class.name(), &message);
        error.define("message", Property::hidden(message));
        error.define("stack", Property::hidden(stack));
        error
    }

    /// The type tag
    pub fn class(&self) -> ErrorClass {
        self.0.read().class.clone()
    }

    /// Replace the type tag without running any constructor
    pub fn set_class(&self, class: &ErrorClass) {
        self.0.write().class = class.clone();
    }

    /// `instanceof`
    pub fn is_instance_of(&self, class: &ErrorClass) -> bool {
        self.class().is_subclass_of(class)
    }

    /// Read a string-named property, falling back to the inherited `name`
    pub fn get(&self, name: &str) -> Result<Value> {
        let (slot, class) = {
            let data = self.0.read();
            (
                data.props.find_name(name).map(|p| p.slot.clone()),
                data.class.clone(),
            )
        };
        match slot {
            Some(slot) => slot.read(),
            None if name == "name" => Ok(Value::String(class.name().to_string())),
            None => Ok(Value::Undefined),
        }
    }

    /// Read a property by key
    pub fn get_key(&self, key: &PropertyKey) -> Result<Value> {
        match key {
            PropertyKey::Name(name) => self.get(name),
            PropertyKey::Symbol(_) => {
                let slot = self.0.read().props.find(key).map(|p| p.slot.clone());
                slot.map_or(Ok(Value::Undefined), |slot| slot.read())
            }
        }
    }

    /// Whether a string-named own property exists
    pub fn has_own(&self, name: &str) -> bool {
        self.0.read().props.find_name(name).is_some()
    }

    /// Own keys with their enumerable attribute
    pub fn own_keys(&self) -> Vec<(PropertyKey, bool)> {
        self.0.read().props.keys()
    }

    /// Assign a property (`error[key] = value`)
    pub fn set(&self, key: impl Into<PropertyKey>, value: impl Into<Value>) {
        self.0.write().props.assign(key.into(), value.into());
    }

    /// Define a property with explicit attributes
    pub fn define(&self, key: impl Into<PropertyKey>, property: Property) {
        self.0.write().props.define(key.into(), property);
    }

    /// Delete an own property, returning whether it existed
    pub fn delete(&self, key: impl Into<PropertyKey>) -> bool {
        self.0.write().props.remove(&key.into()).is_some()
    }

    /// Display name: a non-empty own string `name`, else the class name
    pub fn name(&self) -> String {
        match self.get("name") {
            Ok(Value::String(name)) if !name.is_empty() => name,
            _ => self.class().name().to_string(),
        }
    }

    /// The message if it is a readable string, else `""`
    pub fn message(&self) -> String {
        match self.get("message") {
            Ok(Value::String(message)) => message,
            _ => String::new(),
        }
    }

    /// Snapshot of the own properties
    pub fn properties(&self) -> Properties {
        self.0.read().props.clone()
    }

    /// Identity comparison
    pub fn same(&self, other: &ErrorRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the underlying node
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl PartialEq for ErrorRef {
    fn eq(&self, other: &Self) -> bool {
        self.same(other)
    }
}

impl fmt::Debug for ErrorRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = self.message();
        if message.is_empty() {
            write!(f, "[{}]", self.name())
        } else {
            write!(f, "[{}: {}]", self.name(), message)
        }
    }
}
