//! constructorArgs Tests
//!
//! Packing on serialize, replay on parse, and the `transformArgs` hook.

use crate::*;
use errwire::{parse, Builtin};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// `HttpError(message, status)` storing the status as a hidden property
fn http_error_class() -> ErrorClass {
    ErrorClass::with_initializer("HttpError", &ErrorClass::base(), |error, args| {
        let status = args.get(1).cloned().unwrap_or(Value::Undefined);
        error.define("status", Property::hidden(status));
        Ok(())
    })
}

fn with_args(error: &ErrorRef, args: Vec<Value>) -> Value {
    error.set("constructorArgs", Value::array(args));
    Value::Error(error.clone())
}

// =============================================================================
// PACKING
// =============================================================================

#[test]
fn test_message_argument_becomes_null() {
    let class = http_error_class();
    let error = class.construct(&[Value::from("not found"), Value::Int(404)]).unwrap();
    let value = with_args(&error, vec![Value::from("not found"), Value::Int(404)]);
    let object = serialize_json(&value, &deep());
    assert_eq!(object["constructorArgs"], json!([null, 404]));
}

#[test]
fn test_default_arguments_are_omitted() {
    let error = ErrorRef::new("m");
    let object = serialize_json(&with_args(&error, vec![Value::from("m")]), &deep());
    assert!(object.get("constructorArgs").is_none());

    let empty_options = Value::object(Vec::<(&str, Value)>::new());
    let object = serialize_json(
        &with_args(&error, vec![Value::from("m"), empty_options]),
        &deep(),
    );
    assert!(object.get("constructorArgs").is_none());
}

#[test]
fn test_other_first_argument_is_kept() {
    let error = ErrorRef::new("m");
    let value = with_args(&error, vec![Value::from("template"), Value::Int(1)]);
    let object = serialize_json(&value, &deep());
    assert_eq!(object["constructorArgs"], json!(["template", 1]));
}

#[test]
fn test_non_array_arguments_are_ignored() {
    let error = ErrorRef::new("m");
    error.set("constructorArgs", "not a list");
    let object = serialize_json(&Value::Error(error), &deep());
    assert!(object.get("constructorArgs").is_none());
}

#[test]
fn test_unsafe_arguments_are_filtered() {
    let error = ErrorRef::new("m");
    let value = with_args(&error, vec![Value::from("m"), Value::Int(1), Value::Undefined]);
    let object = serialize_json(&value, &deep());
    assert_eq!(object["constructorArgs"], json!([null, 1]));
}

// =============================================================================
// REPLAY
// =============================================================================

#[test]
fn test_constructor_is_replayed() {
    let class = http_error_class();
    let options = Options::builder().register(&class).build();
    let value = from_json(json!({
        "name": "HttpError",
        "message": "not found",
        "constructorArgs": [null, 404],
    }));
    let error = parse_error(&value, &options);
    assert!(error.is_instance_of(&class));
    assert_eq!(error.message(), "not found");
    assert_eq!(error.get("status").unwrap(), Value::Int(404));
}

#[test]
fn test_round_trip_replays_constructor() {
    let class = http_error_class();
    let options = Options::builder().register(&class).build();
    let error = class.construct(&[Value::from("gone"), Value::Int(410)]).unwrap();
    let value = with_args(&error, vec![Value::from("gone"), Value::Int(410)]);

    let object = errwire::serialize(&value, &options);
    let parsed = parse(&object, &options);
    let parsed = parsed.as_error().unwrap();
    assert_eq!(parsed.get("status").unwrap(), Value::Int(410));
    assert!(!parsed.has_own("constructorArgs"));
}

#[test]
fn test_without_arguments_constructor_is_not_run() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let class = ErrorClass::with_initializer("CountedError", &ErrorClass::base(), move |_, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Ok(())
    });
    let options = Options::builder().register(&class).build();
    let error = parse_error(&from_json(json!({"name": "CountedError", "message": "m"})), &options);
    assert!(error.is_instance_of(&class));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_throwing_constructor_falls_back_to_error() {
    let class = ErrorClass::with_initializer("StrictError", &ErrorClass::base(), |_, _| {
        Err(Thrown::type_error("bad arguments"))
    });
    let options = Options::builder().register(&class).build();
    let value = from_json(json!({
        "name": "StrictError",
        "message": "m",
        "constructorArgs": [null, true],
        "code": 1,
    }));
    let error = parse_error(&value, &options);
    assert!(!error.is_instance_of(&class));
    assert_eq!(error.message(), "m");
    assert_eq!(error.get("code").unwrap(), Value::Int(1));
}

#[test]
fn test_panicking_constructor_falls_back_to_error() {
    init_tracing();
    let class = ErrorClass::with_initializer("PanickyError", &ErrorClass::base(), |_, _| {
        panic!("constructor bug")
    });
    let options = Options::builder().register(&class).build();
    let value = from_json(json!({"name": "PanickyError", "message": "m", "constructorArgs": [null, 1]}));
    let error = parse_error(&value, &options);
    assert_eq!(error.name(), "Error");
    assert_eq!(error.message(), "m");
}

#[test]
fn test_malformed_aggregate_arguments_fall_back() {
    let value = from_json(json!({
        "name": "AggregateError",
        "message": "m",
        "constructorArgs": ["not iterable", "m"],
    }));
    let error = parse_error(&value, &deep());
    assert_eq!(error.name(), "Error");
}

// =============================================================================
// transformArgs
// =============================================================================

#[test]
fn test_transform_args_rewrites_arguments() {
    let class = http_error_class();
    let options = Options::builder()
        .register(&class)
        .transform_args(|args, object, class| {
            assert_eq!(class.name(), "HttpError");
            let status = object.get("statusText")?;
            args.set(1, if status == Value::from("Teapot") { Value::Int(418) } else { Value::Int(500) });
            Ok(())
        })
        .build();
    let value = from_json(json!({"name": "HttpError", "message": "m", "statusText": "Teapot"}));
    let error = parse_error(&value, &options);
    assert_eq!(error.get("status").unwrap(), Value::Int(418));
}

#[test]
fn test_transform_args_defaults_for_aggregate() {
    let seen = Arc::new(AtomicUsize::new(usize::MAX));
    let len = Arc::clone(&seen);
    let options = Options::builder()
        .transform_args(move |args, _, _| {
            len.store(args.len(), Ordering::SeqCst);
            Ok(())
        })
        .build();
    let value = from_json(json!({"name": "AggregateError", "message": "m"}));
    let error = parse_error(&value, &options);
    assert_eq!(seen.load(Ordering::SeqCst), 2);
    assert!(error.is_instance_of(&Builtin::AggregateError.class()));
    assert_eq!(error.get("errors").unwrap().as_array().unwrap().len(), 0);
}

#[test]
fn test_throwing_transform_args_is_ignored() {
    let class = http_error_class();
    let options = Options::builder()
        .register(&class)
        .transform_args(|_, _, _| Err(Thrown::error("hook failed")))
        .build();
    let value = from_json(json!({"name": "HttpError", "message": "m", "constructorArgs": [null, 404]}));
    let error = parse_error(&value, &options);
    assert!(error.is_instance_of(&class));
    assert_eq!(error.get("status").unwrap(), Value::Int(404));
}
