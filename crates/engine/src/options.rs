//! Per-call options
//!
//! [`Options`] is built once at the top of a `serialize`/`parse` call and is
//! read-only afterwards. It can be built two ways:
//! - [`Options::builder`]: typed setters and typed hook closures
//! - [`Options::from_value`]: validation of a dynamic options mapping, the
//!   only place the engine reports an error to the caller

use crate::config::SerializerConfig;
use crate::error::{OptionsError, Result};
use crate::hooks::{Hook, Hooks};
use crate::registry::ClassMap;
use errwire_core::{safe, Array, ErrorClass, ErrorRef, Function, Object, PropertyKey, Value};
use tracing::debug;

/// Validated options for one `serialize` or `parse` call
#[derive(Debug, Clone, Default)]
pub struct Options {
    /// Stop at the first error boundary instead of walking nested values
    pub shallow: bool,
    /// Pass non-conforming input through instead of coercing it
    pub loose: bool,
    /// Properties to keep (`message` is always kept)
    pub include: Option<Vec<String>>,
    /// Properties to drop (`message` cannot be dropped)
    pub exclude: Option<Vec<String>>,
    /// Name to class registry used by `parse`
    pub classes: ClassMap,
    /// Lifecycle hooks
    pub hooks: Hooks,
}

impl Options {
    /// Start building options with the defaults
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::default()
    }

    /// Validate a dynamic options mapping.
    ///
    /// `Undefined` yields the defaults. Unknown keys are rejected.
    pub fn from_value(value: &Value) -> Result<Options> {
        from_value(value).map_err(|err| {
            debug!(target: "errwire::options", error = %err, "Rejected options");
            err
        })
    }

    /// Options with the data-only settings of a config file
    pub fn from_config(config: &SerializerConfig) -> Options {
        Options::builder().config(config).build()
    }
}

/// Validate options without keeping them
pub fn validate_options(value: &Value) -> Result<()> {
    Options::from_value(value).map(|_| ())
}

// ============================================================================
// Dynamic validation
// ============================================================================

fn from_value(value: &Value) -> Result<Options> {
    let object = match value {
        Value::Undefined => return Ok(Options::default()),
        Value::Object(object) if object.is_plain() => object,
        other => return Err(OptionsError::NotAnObject(other.to_js_string())),
    };
    let keys = object
        .own_keys()
        .map_err(|_| OptionsError::NotAnObject(value.to_js_string()))?;

    let mut options = Options::default();
    let mut loose = None;
    let mut normalize = None;
    let mut classes = None;
    let mut types = None;

    for (key, enumerable) in keys {
        let PropertyKey::Name(name) = key else {
            continue;
        };
        if !enumerable {
            continue;
        }
        let option = safe::get(value, &name).unwrap_or(Value::Undefined);
        if option.is_undefined() {
            continue;
        }
        match name.as_str() {
            "shallow" => options.shallow = boolean(&name, &option)?,
            "loose" => loose = Some(boolean(&name, &option)?),
            "normalize" => normalize = Some(boolean(&name, &option)?),
            "include" => options.include = Some(list(&name, &option)?),
            "exclude" => options.exclude = Some(list(&name, &option)?),
            "classes" => classes = Some(class_map(&name, &option)?),
            "types" => types = Some(class_map(&name, &option)?),
            other => match Hook::from_name(other) {
                Some(hook) => options.hooks.set(hook, function(&name, &option)?),
                None => return Err(OptionsError::Unknown(other.to_string())),
            },
        }
    }

    options.loose = match (loose, normalize) {
        (Some(_), Some(_)) => return Err(OptionsError::Conflict("loose", "normalize")),
        (Some(loose), None) => loose,
        (None, Some(normalize)) => !normalize,
        (None, None) => false,
    };
    options.classes = match (classes, types) {
        (Some(_), Some(_)) => return Err(OptionsError::Conflict("classes", "types")),
        (Some(map), None) | (None, Some(map)) => map,
        (None, None) => ClassMap::new(),
    };
    Ok(options)
}

fn boolean(name: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| OptionsError::NotABoolean {
        name: name.to_string(),
        value: value.to_js_string(),
    })
}

fn list(name: &str, value: &Value) -> Result<Vec<String>> {
    let items = value.as_array().ok_or_else(|| OptionsError::NotAList {
        name: name.to_string(),
        value: value.to_js_string(),
    })?;
    items
        .to_vec()
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(s),
            other => Err(OptionsError::NonStringItem {
                name: name.to_string(),
                value: other.to_js_string(),
            }),
        })
        .collect()
}

fn function(name: &str, value: &Value) -> Result<Function> {
    match value {
        Value::Function(function) => Ok(function.clone()),
        other => Err(OptionsError::NotAFunction {
            name: name.to_string(),
            value: other.to_js_string(),
        }),
    }
}

fn class_map(name: &str, value: &Value) -> Result<ClassMap> {
    if !value.is_plain_object() {
        return Err(OptionsError::NotAClassMap {
            name: name.to_string(),
            value: value.to_js_string(),
        });
    }
    let mut classes = ClassMap::new();
    for class in safe::list_keys(value) {
        match safe::get(value, &class).unwrap_or(Value::Undefined) {
            Value::Undefined => {}
            Value::Class(error_class) => {
                classes.insert(class, error_class);
            }
            Value::Function(function) => {
                return Err(OptionsError::NotAnErrorClass {
                    name: name.to_string(),
                    class,
                    value: Value::Function(function).to_js_string(),
                })
            }
            other => {
                return Err(OptionsError::ClassNotCallable {
                    name: name.to_string(),
                    class,
                    value: other.to_js_string(),
                })
            }
        }
    }
    Ok(classes)
}

// ============================================================================
// Builder
// ============================================================================

/// Typed builder for [`Options`]
///
/// Hook closures receive typed arguments and may throw by returning
/// `Err(Thrown)`; the throw is swallowed like any hook failure.
#[derive(Debug, Default)]
pub struct OptionsBuilder {
    options: Options,
}

macro_rules! arg {
    ($args:expr, $index:expr, $variant:ident) => {
        match $args.get($index) {
            Some(Value::$variant(inner)) => inner,
            _ => return Ok(Value::Undefined),
        }
    };
}

impl OptionsBuilder {
    /// Stop at the first error boundary
    pub fn shallow(mut self, shallow: bool) -> Self {
        self.options.shallow = shallow;
        self
    }

    /// Pass non-conforming input through untouched
    pub fn loose(mut self, loose: bool) -> Self {
        self.options.loose = loose;
        self
    }

    /// Properties to keep
    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Properties to drop
    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.exclude = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Register `class` under `name` for `parse`
    pub fn class(mut self, name: impl Into<String>, class: &ErrorClass) -> Self {
        self.options.classes.insert(name.into(), class.clone());
        self
    }

    /// Register `class` under its own name
    pub fn register(self, class: &ErrorClass) -> Self {
        let name = class.name().to_string();
        self.class(name, class)
    }

    /// Apply the data-only settings of a config file
    pub fn config(mut self, config: &SerializerConfig) -> Self {
        self.options.shallow = config.shallow;
        self.options.loose = config.loose;
        self.options.include = config.include.clone();
        self.options.exclude = config.exclude.clone();
        self
    }

    /// Register a raw hook function
    pub fn hook(mut self, hook: Hook, function: Function) -> Self {
        self.options.hooks.set(hook, function);
        self
    }

    /// `beforeSerialize(instance)`
    pub fn before_serialize<F>(self, f: F) -> Self
    where
        F: Fn(&ErrorRef) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::BeforeSerialize,
            Function::new(Hook::BeforeSerialize.name(), move |args| {
                f(arg!(args, 0, Error))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `afterSerialize(instance, object)`
    pub fn after_serialize<F>(self, f: F) -> Self
    where
        F: Fn(&ErrorRef, &Object) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::AfterSerialize,
            Function::new(Hook::AfterSerialize.name(), move |args| {
                f(arg!(args, 0, Error), arg!(args, 1, Object))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `transformObject(object, instance)`
    pub fn transform_object<F>(self, f: F) -> Self
    where
        F: Fn(&Object, &ErrorRef) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::TransformObject,
            Function::new(Hook::TransformObject.name(), move |args| {
                f(arg!(args, 0, Object), arg!(args, 1, Error))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `beforeParse(object)`
    pub fn before_parse<F>(self, f: F) -> Self
    where
        F: Fn(&Object) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::BeforeParse,
            Function::new(Hook::BeforeParse.name(), move |args| {
                f(arg!(args, 0, Object))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `afterParse(object, instance)`
    pub fn after_parse<F>(self, f: F) -> Self
    where
        F: Fn(&Object, &ErrorRef) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::AfterParse,
            Function::new(Hook::AfterParse.name(), move |args| {
                f(arg!(args, 0, Object), arg!(args, 1, Error))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `transformInstance(instance, object)`
    pub fn transform_instance<F>(self, f: F) -> Self
    where
        F: Fn(&ErrorRef, &Object) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::TransformInstance,
            Function::new(Hook::TransformInstance.name(), move |args| {
                f(arg!(args, 0, Error), arg!(args, 1, Object))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// `transformArgs(args, object, class)`. Mutate `args` in place to change
    /// what the constructor receives.
    pub fn transform_args<F>(self, f: F) -> Self
    where
        F: Fn(&Array, &Object, &ErrorClass) -> errwire_core::Result<()> + Send + Sync + 'static,
    {
        self.hook(
            Hook::TransformArgs,
            Function::new(Hook::TransformArgs.name(), move |args| {
                f(arg!(args, 0, Array), arg!(args, 1, Object), arg!(args, 2, Class))?;
                Ok(Value::Undefined)
            }),
        )
    }

    /// Finish building
    pub fn build(self) -> Options {
        self.options
    }
}
