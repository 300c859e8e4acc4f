//! Dot-path lookup and deep merge over JSON values

use serde_json::{Map, Value};

use crate::errors::{type_error, ErrorCauseObject, UtilError};

/// Look up `path` (`"a.b.0.c"`) inside an object or array
///
/// Missing keys and `null` along the way both yield `None`.
pub fn get<'a>(value: &'a Value, path: &str) -> Result<Option<&'a Value>, UtilError> {
    if !(value.is_object() || value.is_array()) {
        return Err(type_error(
            "To extract value you have to provide object.",
            Some(ErrorCauseObject::received(value.clone()).into()),
        ));
    }

    let mut current = value;
    for key in path.split('.') {
        let next = match current {
            Value::Null => break,
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        };
        match next {
            Some(next) => current = next,
            None => return Ok(None),
        }
    }

    Ok(Some(current).filter(|found| !found.is_null()))
}

/// Deep-merge JSON objects left to right
///
/// Later inputs win. Nested objects are merged recursively, every other value
/// is copied. Inputs that are not objects are skipped.
pub fn merge<'a, I>(inputs: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut merged = Map::new();
    for input in inputs {
        let Value::Object(fields) = input else {
            continue;
        };
        for (key, value) in fields {
            let combined = if value.is_object() {
                match merged.get(key) {
                    Some(existing) => merge([existing, value]),
                    None => merge([value]),
                }
            } else {
                value.clone()
            };
            merged.insert(key.clone(), combined);
        }
    }
    Value::Object(merged)
}
