//! Serialize Tests
//!
//! Error instance to error object:
//! - core properties and extra attributes
//! - causes, aggregated errors and containers
//! - include / exclude
//! - JSON safety of the output

use crate::*;
use errwire::{serialize, Builtin, Function, Object, Symbol};
use serde_json::json;

// =============================================================================
// CORE PROPERTIES
// =============================================================================

#[test]
fn test_serialize_core_properties() {
    let error = error_of(&Builtin::RangeError.class(), "out of range");
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(
        object,
        json!({
            "name": "RangeError",
            "message": "out of range",
            "stack": "RangeError: out of range\n    at <anonymous>",
        })
    );
}

#[test]
fn test_serialize_custom_class_name() {
    let custom = ErrorClass::extend("DatabaseError", &ErrorClass::base());
    let error = custom.construct(&[Value::from("lost connection")]).unwrap();
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["name"], json!("DatabaseError"));
    assert_eq!(object["message"], json!("lost connection"));
}

#[test]
fn test_serialize_own_name_overrides_class_name() {
    let error = ErrorRef::new("m");
    error.set("name", "Renamed");
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["name"], json!("Renamed"));
}

#[test]
fn test_serialize_location_properties() {
    let error = ErrorRef::new("m");
    error.define("lineNumber", Property::hidden(10));
    error.define("columnNumber", Property::hidden(4));
    error.define("fileName", Property::hidden("main.js"));
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["lineNumber"], json!(10));
    assert_eq!(object["columnNumber"], json!(4));
    assert_eq!(object["fileName"], json!("main.js"));
}

#[test]
fn test_serialize_extra_attributes() {
    let error = ErrorRef::new("m");
    error.set("code", "E_CONN");
    error.set("retries", 3);
    error.set("details", from_json(json!({"host": "db", "ports": [5432]})));
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["code"], json!("E_CONN"));
    assert_eq!(object["retries"], json!(3));
    assert_eq!(object["details"], json!({"host": "db", "ports": [5432]}));
}

#[test]
fn test_serialize_skips_non_enumerable_and_symbol_extras() {
    let error = ErrorRef::new("m");
    error.define("hidden", Property::hidden("secret"));
    error.set(Symbol::new("key"), "symbol keyed");
    let object = serialize_json(&Value::Error(error), &deep());
    assert!(object.get("hidden").is_none());
    assert_eq!(object.as_object().unwrap().len(), 3);
}

#[test]
fn test_serialize_ignores_to_json_method() {
    let error = ErrorRef::new("m");
    error.set(
        "toJSON",
        Function::new("toJSON", |_| Ok(Value::from("replaced"))),
    );
    let object = serialize_json(&Value::Error(error), &deep());
    assert!(object.get("toJSON").is_none());
    assert_eq!(object["message"], json!("m"));
}

#[test]
fn test_serialize_does_not_mutate_input() {
    let error = ErrorRef::new("m");
    error.set("prop", from_json(json!({"nested": true})));
    let before = error.get("prop").unwrap();
    serialize(&Value::Error(error.clone()), &deep());
    assert!(error.get("prop").unwrap().same(&before));
}

// =============================================================================
// NON-ERROR INPUT
// =============================================================================

#[test]
fn test_serialize_string_is_normalized() {
    let object = serialize_json(&Value::from("boom"), &deep());
    assert_eq!(object["name"], json!("Error"));
    assert_eq!(object["message"], json!("boom"));
}

#[test]
fn test_serialize_plain_object_is_normalized() {
    let input = from_json(json!({"name": "TypeError", "message": "m", "prop": 1}));
    let object = serialize_json(&input, &deep());
    assert_eq!(object["name"], json!("TypeError"));
    assert_eq!(object["message"], json!("m"));
    assert_eq!(object["prop"], json!(1));
}

#[test]
fn test_serialize_loose_passes_values_through() {
    for value in [Value::Null, Value::Int(1), Value::from("text")] {
        assert_eq!(serialize(&value, &loose()), value);
    }
}

#[test]
fn test_serialize_loose_walks_containers() {
    let input = Value::array(vec![
        Value::Error(ErrorRef::new("first")),
        Value::object([("second", Value::Error(ErrorRef::new("second")))]),
    ]);
    let output = to_json(&serialize(&input, &loose()));
    assert_eq!(output[0]["message"], json!("first"));
    assert_eq!(output[1]["second"]["message"], json!("second"));
}

// =============================================================================
// CAUSES AND AGGREGATED ERRORS
// =============================================================================

#[test]
fn test_serialize_cause_chain() {
    let root = ErrorRef::new("root");
    let middle = Builtin::TypeError
        .class()
        .construct(&[
            Value::from("middle"),
            Value::object([("cause", Value::Error(root))]),
        ])
        .unwrap();
    let top = ErrorRef::new("top");
    top.define("cause", Property::hidden(middle));

    let object = serialize_json(&Value::Error(top), &deep());
    assert_eq!(object["cause"]["name"], json!("TypeError"));
    assert_eq!(object["cause"]["cause"]["message"], json!("root"));
}

#[test]
fn test_serialize_aggregate_errors() {
    let aggregate = Builtin::AggregateError
        .class()
        .construct(&[
            Value::array(vec![
                Value::Error(ErrorRef::new("one")),
                Value::Error(error_of(&Builtin::SyntaxError.class(), "two")),
            ]),
            Value::from("many"),
        ])
        .unwrap();
    let object = serialize_json(&Value::Error(aggregate), &deep());
    assert_eq!(object["name"], json!("AggregateError"));
    assert_eq!(object["message"], json!("many"));
    assert_eq!(object["errors"][0]["message"], json!("one"));
    assert_eq!(object["errors"][1]["name"], json!("SyntaxError"));
}

#[test]
fn test_serialize_non_error_cause_is_converted() {
    let error = ErrorRef::new("m");
    error.set("cause", "plain cause");
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["cause"]["message"], json!("plain cause"));
}

#[test]
fn test_shallow_serializes_cause_but_not_extras() {
    let error = ErrorRef::new("m");
    error.define("cause", Property::hidden(ErrorRef::new("inner")));
    let extra = ErrorRef::new("extra");
    error.set("related", Value::Error(extra.clone()));

    let output = serialize(&Value::Error(error), &shallow());
    let object = output.as_object().unwrap();
    let cause = object.get("cause").unwrap();
    assert_eq!(cause.get("message").unwrap(), Value::from("inner"));
    assert!(object.get("related").unwrap().as_error().unwrap().same(&extra));
}

#[test]
fn test_shallow_does_not_walk_containers() {
    let input = Value::array(vec![Value::Error(ErrorRef::new("m"))]);
    let output = serialize(&input, &Options::builder().shallow(true).loose(true).build());
    assert!(output.as_array().unwrap().get(0).is_error());
}

// =============================================================================
// INCLUDE / EXCLUDE
// =============================================================================

fn error_with_extras() -> Value {
    let error = ErrorRef::new("m");
    error.set("code", "E1");
    error.set("status", 500);
    Value::Error(error)
}

#[test]
fn test_include_keeps_message() {
    let options = Options::builder().include(["name"]).build();
    let object = serialize_json(&error_with_extras(), &options);
    assert_eq!(object, json!({"name": "Error", "message": "m"}));
}

#[test]
fn test_exclude_cannot_remove_message() {
    let options = Options::builder().exclude(["message", "stack", "code"]).build();
    let object = serialize_json(&error_with_extras(), &options);
    assert_eq!(object, json!({"name": "Error", "message": "m", "status": 500}));
}

#[test]
fn test_include_then_exclude() {
    let options = Options::builder()
        .include(["name", "code", "status"])
        .exclude(["status"])
        .build();
    let object = serialize_json(&error_with_extras(), &options);
    assert_eq!(object, json!({"name": "Error", "message": "m", "code": "E1"}));
}

#[test]
fn test_include_applies_to_nested_errors() {
    let error = ErrorRef::new("outer");
    error.define("cause", Property::hidden(ErrorRef::new("inner")));
    let options = Options::builder().include(["cause"]).build();
    let object = serialize_json(&Value::Error(error), &options);
    assert_eq!(object, json!({"message": "outer", "cause": {"message": "inner"}}));
}

// =============================================================================
// JSON SAFETY
// =============================================================================

#[test]
fn test_unsafe_values_are_removed() {
    let error = ErrorRef::new("m");
    error.set("undef", Value::Undefined);
    error.set("big", Value::BigInt(10));
    error.set("inf", Value::Float(f64::INFINITY));
    error.set("symbol", Symbol::new("s"));
    error.set("func", Function::new("f", |_| Ok(Value::Undefined)));
    error.set("class", ErrorClass::base());
    error.set(
        "nested",
        Value::array(vec![Value::Int(1), Value::Undefined, Value::Float(f64::NAN)]),
    );
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object.as_object().unwrap().len(), 4);
    assert_eq!(object["nested"], json!([1]));
}

#[test]
fn test_exotic_objects_become_plain() {
    let set = Object::with_tag("Set");
    let error = ErrorRef::new("m");
    error.set("set", Value::Object(set));
    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["set"], json!({}));
}

#[test]
fn test_extra_with_to_json_method_is_resolved() {
    let date = Object::with_tag("Date");
    date.set(
        "toJSON",
        Function::new("toJSON", |_| Ok(Value::from("2026-10-18T00:00:00.000Z"))),
    )
    .unwrap();
    let error = ErrorRef::new("m");
    error.set("when", Value::Object(date.clone()));
    error.set("list", Value::array(vec![Value::Bool(true), Value::Object(date)]));

    let object = serialize_json(&Value::Error(error), &deep());
    assert_eq!(object["when"], json!("2026-10-18T00:00:00.000Z"));
    assert_eq!(object["list"], json!([true, "2026-10-18T00:00:00.000Z"]));
}

#[test]
fn test_output_is_serde_serializable() {
    let error = ErrorRef::new("m");
    error.set("code", 1);
    let output = serialize(&Value::Error(error), &deep());
    let text = serde_json::to_string(&output).unwrap();
    let reparsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(reparsed["code"], json!(1));
}
