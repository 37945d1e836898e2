//! Parse Tests
//!
//! Error object to error instance:
//! - class resolution (registered, built-in, default)
//! - core properties and extra attributes
//! - causes, aggregated errors and containers
//! - coercion of malformed input

use crate::*;
use errwire::{is_error_object, parse, Builtin, Object, PropertyKey};
use serde_json::json;

fn enumerable(error: &ErrorRef, name: &str) -> Option<bool> {
    error
        .own_keys()
        .into_iter()
        .find(|(key, _)| *key == PropertyKey::from(name))
        .map(|(_, enumerable)| enumerable)
}

// =============================================================================
// CLASS RESOLUTION
// =============================================================================

#[test]
fn test_parse_message_only() {
    let error = parse_error(&from_json(json!({"message": "m"})), &deep());
    assert_eq!(error.name(), "Error");
    assert_eq!(error.message(), "m");
    assert!(error.class().same(&ErrorClass::base()));
}

#[test]
fn test_parse_every_builtin() {
    for builtin in Builtin::ALL {
        let value = from_json(json!({"name": builtin.name(), "message": "m", "stack": "s"}));
        let error = parse_error(&value, &deep());
        assert!(error.class().same(&builtin.class()), "{}", builtin.name());
        assert_eq!(error.name(), builtin.name());
    }
}

#[test]
fn test_parse_dom_exception_defaults_to_error() {
    let value = from_json(json!({"name": "DOMException", "message": "m"}));
    let error = parse_error(&value, &deep());
    assert_eq!(error.name(), "Error");
}

#[test]
fn test_parse_registered_class() {
    let custom = ErrorClass::extend("DatabaseError", &ErrorClass::base());
    let options = Options::builder().register(&custom).build();
    let value = from_json(json!({"name": "DatabaseError", "message": "m", "stack": "s"}));
    let error = parse_error(&value, &options);
    assert!(error.is_instance_of(&custom));
    assert!(error.is_instance_of(&ErrorClass::base()));
    assert_eq!(error.name(), "DatabaseError");
}

#[test]
fn test_parse_registered_under_other_name() {
    let custom = ErrorClass::extend("LocalError", &ErrorClass::base());
    let options = Options::builder().class("RemoteError", &custom).build();
    let value = from_json(json!({"name": "RemoteError", "message": "m"}));
    let error = parse_error(&value, &options);
    assert!(error.class().same(&custom));
    assert_eq!(error.name(), "LocalError");
}

#[test]
fn test_parse_registry_overrides_builtin() {
    let custom = ErrorClass::extend("TypeError", &Builtin::TypeError.class());
    let options = Options::builder().register(&custom).build();
    let value = from_json(json!({"name": "TypeError", "message": "m"}));
    let error = parse_error(&value, &options);
    assert!(error.class().same(&custom));
}

#[test]
fn test_parse_unregistered_name_defaults() {
    let value = from_json(json!({"name": "DatabaseError", "message": "m"}));
    let error = parse_error(&value, &deep());
    assert_eq!(error.name(), "Error");
}

// =============================================================================
// PROPERTIES
// =============================================================================

#[test]
fn test_parse_core_properties() {
    let value = from_json(json!({
        "name": "TypeError",
        "message": "m",
        "stack": "TypeError: m\n    at remote",
        "lineNumber": 1,
        "column": 2,
    }));
    let error = parse_error(&value, &deep());
    assert_eq!(error.get("stack").unwrap(), Value::from("TypeError: m\n    at remote"));
    assert_eq!(error.get("lineNumber").unwrap(), Value::Int(1));
    assert_eq!(enumerable(&error, "stack"), Some(false));
    assert_eq!(enumerable(&error, "message"), Some(false));
    assert_eq!(enumerable(&error, "column"), Some(false));
}

#[test]
fn test_parse_extra_attributes_are_enumerable() {
    let value = from_json(json!({"message": "m", "code": "E1", "meta": {"a": 1}}));
    let error = parse_error(&value, &deep());
    assert_eq!(error.get("code").unwrap(), Value::from("E1"));
    assert_eq!(enumerable(&error, "code"), Some(true));
    assert_eq!(
        error.get("meta").unwrap().to_json(),
        Some(json!({"a": 1}))
    );
}

#[test]
fn test_parse_does_not_copy_constructor_args() {
    let value = from_json(json!({"message": "m", "constructorArgs": ["m", 1]}));
    let error = parse_error(&value, &deep());
    assert!(!error.has_own("constructorArgs"));
}

#[test]
fn test_parse_missing_stack_is_generated() {
    let error = parse_error(&from_json(json!({"name": "RangeError", "message": "m"})), &deep());
    assert_eq!(
        error.get("stack").unwrap(),
        Value::from("RangeError: m\n    at <anonymous>")
    );
}

// =============================================================================
// NESTED VALUES
// =============================================================================

#[test]
fn test_parse_cause_chain() {
    let value = from_json(json!({
        "message": "top",
        "cause": {"name": "TypeError", "message": "middle", "cause": {"message": "root"}},
    }));
    let error = parse_error(&value, &deep());
    let middle = error.get("cause").unwrap();
    let middle = middle.as_error().unwrap();
    assert_eq!(middle.name(), "TypeError");
    let root = middle.get("cause").unwrap();
    assert_eq!(root.as_error().unwrap().message(), "root");
    assert_eq!(enumerable(&error, "cause"), Some(false));
}

#[test]
fn test_parse_aggregate_errors() {
    let value = from_json(json!({
        "name": "AggregateError",
        "message": "many",
        "errors": [{"message": "one"}, {"name": "URIError", "message": "two"}],
    }));
    let error = parse_error(&value, &deep());
    assert!(error.is_instance_of(&Builtin::AggregateError.class()));
    let errors = error.get("errors").unwrap().as_array().unwrap().to_vec();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors[1].as_error().unwrap().name(), "URIError");
}

#[test]
fn test_parse_malformed_cause_is_normalized() {
    let value = from_json(json!({"message": "m", "cause": "not an object"}));
    let error = parse_error(&value, &deep());
    let cause = error.get("cause").unwrap();
    assert_eq!(cause.as_error().unwrap().message(), "not an object");
}

#[test]
fn test_parse_malformed_errors_are_removed() {
    let value = from_json(json!({"message": "m", "errors": "nope"}));
    let error = parse_error(&value, &deep());
    assert!(!error.has_own("errors"));
}

#[test]
fn test_parse_deep_containers() {
    let value = from_json(json!({
        "message": "m",
        "list": [{"message": "in list"}],
        "map": {"nested": {"message": "in map"}},
    }));
    let error = parse_error(&value, &deep());
    let list = error.get("list").unwrap();
    assert!(list.as_array().unwrap().get(0).is_error());
    let map = error.get("map").unwrap();
    assert!(map.get("nested").unwrap().is_error());
}

#[test]
fn test_parse_loose_container_input() {
    let value = from_json(json!([{"message": "a"}, 1, "text"]));
    let output = parse(&value, &loose());
    let items = output.as_array().unwrap().to_vec();
    assert!(items[0].is_error());
    assert_eq!(items[1], Value::Int(1));
    assert_eq!(items[2], Value::from("text"));
}

#[test]
fn test_parse_shallow_keeps_container_objects() {
    let value = from_json(json!({"message": "m", "list": [{"message": "in list"}]}));
    let error = parse_error(&value, &shallow());
    let list = error.get("list").unwrap();
    assert!(list.as_array().unwrap().get(0).is_plain_object());
}

// =============================================================================
// COERCION
// =============================================================================

#[test]
fn test_is_error_object() {
    assert!(is_error_object(&from_json(json!({"message": "m"}))));
    assert!(!is_error_object(&from_json(json!({"message": 1}))));
    assert!(!is_error_object(&from_json(json!(["m"]))));
    assert!(!is_error_object(&Value::Object(Object::with_tag("Map"))));
}

#[test]
fn test_parse_coerces_primitives() {
    assert_eq!(parse_error(&Value::from("boom"), &deep()).message(), "boom");
    assert_eq!(parse_error(&Value::Null, &deep()).message(), "null");
    assert_eq!(parse_error(&Value::Bool(true), &deep()).message(), "true");
}

#[test]
fn test_parse_coerces_large_numbers_exactly() {
    let error = parse_error(&Value::Float(1e20), &deep());
    assert_eq!(error.message(), "100000000000000000000");
    let error = parse_error(&from_json(json!({"message": 1e20})), &deep());
    assert_eq!(error.message(), "100000000000000000000");
}

#[test]
fn test_parse_coerces_malformed_objects() {
    let error = parse_error(&from_json(json!({"name": "TypeError"})), &deep());
    assert_eq!(error.name(), "TypeError");
    assert_eq!(error.message(), "");
}

#[test]
fn test_parse_loose_passes_malformed_through() {
    let value = from_json(json!({"name": "TypeError"}));
    let output = parse(&value, &loose());
    assert!(output.is_plain_object());
}

#[test]
fn test_parse_existing_error_is_kept() {
    let error = ErrorRef::new("m");
    let output = parse(&Value::Error(error.clone()), &deep());
    assert!(output.as_error().unwrap().same(&error));
}
