//! `constructorArgs` packing
//!
//! An error can carry the arguments its constructor was called with, so that
//! `parse` can replay the constructor. The arguments are compressed on the
//! way out:
//! - a first argument equal to the message becomes `null`
//! - `[message]` and `[message, {}]` are the parse defaults, so they are
//!   omitted entirely

use errwire_core::{safe, Value};

/// Pack `args` for the error object, or `None` if nothing needs to be emitted.
///
/// Only genuine arrays are accepted; array-likes such as an `arguments`
/// object are ignored.
pub fn pack(args: &Value, message: &str) -> Option<Value> {
    let items = args.as_array()?.to_vec();
    if items.first().and_then(Value::as_str) != Some(message) {
        return Some(Value::array(items));
    }
    if is_default(&items) {
        return None;
    }
    let mut packed = Vec::with_capacity(items.len());
    packed.push(Value::Null);
    packed.extend(items.into_iter().skip(1));
    Some(Value::array(packed))
}

/// Reverse of [`pack`]: substitute `message` back for a leading `null`.
///
/// `None` if `packed` is not an array.
pub fn unpack(packed: &Value, message: &str) -> Option<Vec<Value>> {
    let mut items = packed.as_array()?.to_vec();
    if matches!(items.first(), Some(Value::Null)) {
        items[0] = Value::from(message);
    }
    Some(items)
}

fn is_default(items: &[Value]) -> bool {
    match items {
        [_] => true,
        [_, options] => is_empty_object(options),
        _ => false,
    }
}

fn is_empty_object(value: &Value) -> bool {
    match value {
        Value::Object(_) | Value::Error(_) => safe::list_keys(value).is_empty(),
        Value::Array(array) => array.is_empty(),
        _ => false,
    }
}
