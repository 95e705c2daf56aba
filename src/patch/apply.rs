use super::pointer;
use super::{JsonPatch, PatchError, PatchOperation};
use serde_json::Value;

/// Apply `patch` to `doc`.
///
/// Operations run against a working copy; `doc` is only replaced once every
/// operation succeeded, so a failing patch leaves it untouched.
pub fn apply(doc: &mut Value, patch: &JsonPatch) -> Result<(), PatchError> {
    let mut working = doc.clone();
    for operation in patch {
        apply_operation(&mut working, operation)?;
    }
    *doc = working;
    Ok(())
}

fn apply_operation(doc: &mut Value, operation: &PatchOperation) -> Result<(), PatchError> {
    match operation {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path),
        PatchOperation::Replace { path, value } => {
            let target = doc
                .pointer_mut(path)
                .ok_or_else(|| PatchError::PathNotFound { path: path.clone() })?;
            *target = value.clone();
            Ok(())
        }
        PatchOperation::Test { path, value } => match doc.pointer(path) {
            Some(current) if current == value => Ok(()),
            _ => Err(PatchError::TestFailed { path: path.clone() }),
        },
    }
}

fn add(doc: &mut Value, path: &str, value: Value) -> Result<(), PatchError> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent_path, token) = pointer::split_parent(path)?;
    let parent = doc
        .pointer_mut(parent_path)
        .ok_or_else(|| PatchError::PathNotFound {
            path: parent_path.to_string(),
        })?;
    match parent {
        Value::Object(map) => {
            map.insert(token, value);
            Ok(())
        }
        Value::Array(items) => {
            if token == "-" {
                items.push(value);
            } else {
                let index = pointer::parse_index(path, &token, items.len(), true)?;
                items.insert(index, value);
            }
            Ok(())
        }
        _ => Err(PatchError::PathNotFound {
            path: path.to_string(),
        }),
    }
}

fn remove(doc: &mut Value, path: &str) -> Result<(), PatchError> {
    let (parent_path, token) = pointer::split_parent(path)?;
    let not_found = || PatchError::PathNotFound {
        path: path.to_string(),
    };
    let parent = doc.pointer_mut(parent_path).ok_or_else(not_found)?;
    match parent {
        Value::Object(map) => map.remove(&token).map(|_| ()).ok_or_else(not_found),
        Value::Array(items) => {
            let index = pointer::parse_index(path, &token, items.len(), false)?;
            items.remove(index);
            Ok(())
        }
        _ => Err(not_found()),
    }
}
