//! JSON pointer edits and merge patch for config documents.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Set the value at `pointer`, creating intermediate objects.
pub fn set_json_pointer(root: &mut Value, pointer: &str, new_value: Value) -> Result<()> {
    let tokens = tokens(pointer)?;
    let Some((last, parents)) = tokens.split_last() else {
        *root = new_value;
        return Ok(());
    };

    let mut current = root;
    for token in parents {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(token.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            other => {
                return Err(Error::config_invalid_value(
                    pointer,
                    Some(type_name(other).to_string()),
                    "Expected an object along the pointer path",
                ))
            }
        };
    }

    match current {
        Value::Object(map) => {
            map.insert(last.clone(), new_value);
            Ok(())
        }
        other => Err(Error::config_invalid_value(
            pointer,
            Some(type_name(other).to_string()),
            "Expected an object at the parent of the pointer",
        )),
    }
}

/// Remove the key at `pointer`. Missing keys are an error.
pub fn remove_json_pointer(root: &mut Value, pointer: &str) -> Result<()> {
    let tokens = tokens(pointer)?;
    let Some((last, parents)) = tokens.split_last() else {
        return Err(Error::validation_invalid_argument(
            "pointer",
            "Cannot remove the root JSON value",
            None,
            None,
        ));
    };

    let mut current = root;
    for token in parents {
        current = current.get_mut(token.as_str()).ok_or_else(|| not_found(pointer))?;
    }

    match current {
        Value::Object(map) => map.remove(last).map(|_| ()).ok_or_else(|| not_found(pointer)),
        _ => Err(not_found(pointer)),
    }
}

/// RFC 7396 merge patch: objects merge key by key, `null` deletes, anything else replaces.
pub fn json_merge_patch(target: &mut Value, source: Value) {
    let Value::Object(source_map) = source else {
        *target = source;
        return;
    };
    if !target.is_object() {
        *target = Value::Object(Map::new());
    }
    if let Value::Object(target_map) = target {
        for (key, value) in source_map {
            if value.is_null() {
                target_map.remove(&key);
            } else {
                let entry = target_map.entry(key).or_insert(Value::Null);
                json_merge_patch(entry, value);
            }
        }
    }
}

fn tokens(pointer: &str) -> Result<Vec<String>> {
    if pointer.is_empty() {
        return Ok(Vec::new());
    }
    if pointer == "/" || !pointer.starts_with('/') {
        return Err(Error::validation_invalid_argument(
            "pointer",
            format!("Invalid JSON pointer '{}'", pointer),
            None,
            None,
        ));
    }
    Ok(pointer
        .split('/')
        .skip(1)
        .map(|t| t.replace("~1", "/").replace("~0", "~"))
        .collect())
}

fn not_found(pointer: &str) -> Error {
    Error::validation_invalid_argument(
        "pointer",
        format!("Nothing to remove at '{}'", pointer),
        None,
        None,
    )
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
