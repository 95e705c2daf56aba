use super::pointer;
use super::{JsonPatch, PatchOperation};
use serde::Serialize;
use serde_json::{Map, Value};

/// Compute the patch that turns `left` into `right`.
///
/// Objects are compared key by key and arrays index by index, so unchanged
/// subtrees never show up in the result. Equal documents give an empty patch.
pub fn diff(left: &Value, right: &Value) -> JsonPatch {
    let mut operations = Vec::new();
    diff_values("", left, right, &mut operations);
    JsonPatch::new(operations)
}

/// Serialize both snapshots and diff them
pub fn diff_snapshots<T: Serialize + ?Sized>(
    before: &T,
    after: &T,
) -> Result<JsonPatch, serde_json::Error> {
    let before = serde_json::to_value(before)?;
    let after = serde_json::to_value(after)?;
    Ok(diff(&before, &after))
}

fn diff_values(path: &str, left: &Value, right: &Value, ops: &mut Vec<PatchOperation>) {
    match (left, right) {
        (Value::Object(l), Value::Object(r)) => diff_objects(path, l, r, ops),
        (Value::Array(l), Value::Array(r)) => diff_arrays(path, l, r, ops),
        (l, r) if l == r => {}
        (_, r) => ops.push(PatchOperation::Replace {
            path: path.to_string(),
            value: r.clone(),
        }),
    }
}

fn diff_objects(
    path: &str,
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    ops: &mut Vec<PatchOperation>,
) {
    for (key, lv) in left {
        let child = pointer::join(path, key);
        match right.get(key) {
            Some(rv) => diff_values(&child, lv, rv, ops),
            None => ops.push(PatchOperation::Remove { path: child }),
        }
    }
    for (key, rv) in right {
        if !left.contains_key(key) {
            ops.push(PatchOperation::Add {
                path: pointer::join(path, key),
                value: rv.clone(),
            });
        }
    }
}

fn diff_arrays(path: &str, left: &[Value], right: &[Value], ops: &mut Vec<PatchOperation>) {
    let common = left.len().min(right.len());
    for i in 0..common {
        diff_values(&format!("{path}/{i}"), &left[i], &right[i], ops);
    }
    // Appends go in ascending order so each index equals the length at that point
    for (i, value) in right.iter().enumerate().skip(common) {
        ops.push(PatchOperation::Add {
            path: format!("{path}/{i}"),
            value: value.clone(),
        });
    }
    // Removals go from the tail so earlier indices stay valid
    for i in (common..left.len()).rev() {
        ops.push(PatchOperation::Remove {
            path: format!("{path}/{i}"),
        });
    }
}
