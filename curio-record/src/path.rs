//! Path-addressable access to record data.
//!
//! Paths are non-empty sequences of string segments. A purely numeric
//! segment indexes into a repeating field's instance list — but because
//! the wire format also delivers single instances "bare", the segment
//! `0` addresses a non-sequence value as itself, and writing through a
//! numeric segment promotes a singular value into a one-element
//! sequence. Missing intermediate nodes are materialized, so writes and
//! deletes never fail on absent structure.

use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised by record path operations.
///
/// An invalid path is a caller bug, not bad data, so it is reported
/// immediately rather than degraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("record path must contain at least one segment")]
    Empty,
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|byte| byte.is_ascii_digit())
}

/// Reads the value at `path`.
///
/// Returns `None` when any node along the path is absent. The first
/// segment `0` addresses a non-sequence node as itself (list-of-one
/// transparency); the same applies at every level of the recursion.
pub fn deep_get<'a, S: AsRef<str>>(
    data: Option<&'a Value>,
    path: &[S],
) -> Result<Option<&'a Value>, PathError> {
    let (first, rest) = path.split_first().ok_or(PathError::Empty)?;
    Ok(get_in(data, first.as_ref(), rest))
}

fn get_in<'a, S: AsRef<str>>(data: Option<&'a Value>, key: &str, rest: &[S]) -> Option<&'a Value> {
    let node = data?;

    let value = if key == "0" && !node.is_array() {
        // A singular value stands in for its own one-element list.
        Some(node)
    } else {
        match node {
            Value::Object(map) => map.get(key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|index| items.get(index)),
            _ => None,
        }
    };

    match rest.split_first() {
        None => value,
        Some((next, remaining)) => get_in(value, next.as_ref(), remaining),
    }
}

/// Writes `value` at `path`, returning the new data.
///
/// Missing nodes along the path are materialized — as a sequence when
/// the next segment is numeric, as a keyed map otherwise — and a
/// singular value written through a numeric segment is first promoted
/// into a one-element sequence holding the original value at index 0.
pub fn deep_set<S: AsRef<str>>(
    data: Option<Value>,
    path: &[S],
    value: Value,
) -> Result<Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(update_in(data, path, LeafOp::Set(value)))
}

/// Removes the value at `path`, returning the new data.
///
/// The walk performs the same materialization and promotion as a write,
/// then removes the leaf key, so deleting a missing path yields the
/// normalized structure minus the leaf.
pub fn deep_delete<S: AsRef<str>>(data: Option<Value>, path: &[S]) -> Result<Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    Ok(update_in(data, path, LeafOp::Delete))
}

enum LeafOp {
    Set(Value),
    Delete,
}

fn update_in<S: AsRef<str>>(data: Option<Value>, path: &[S], op: LeafOp) -> Value {
    let key = path[0].as_ref();
    let rest = &path[1..];

    let mut node = normalize_node(data, key);

    if rest.is_empty() {
        match op {
            LeafOp::Set(value) => set_child(&mut node, key, value),
            LeafOp::Delete => remove_child(&mut node, key),
        }
    } else {
        let child = take_child(&mut node, key);
        let updated = update_in(child, rest, op);
        set_child(&mut node, key, updated);
    }

    node
}

/// Prepares a node to be written through `key`: absent (or null) nodes
/// materialize as a sequence or map depending on the segment, and a
/// singular value under a numeric segment is promoted.
fn normalize_node(data: Option<Value>, key: &str) -> Value {
    match data {
        None | Some(Value::Null) => {
            if is_numeric(key) {
                Value::Array(Vec::new())
            } else {
                Value::Object(Map::new())
            }
        }
        Some(value) => {
            if is_numeric(key) && !value.is_array() {
                Value::Array(vec![value])
            } else {
                value
            }
        }
    }
}

fn take_child(node: &mut Value, key: &str) -> Option<Value> {
    match node {
        Value::Object(map) => map.get_mut(key).map(std::mem::take),
        Value::Array(items) => key
            .parse::<usize>()
            .ok()
            .and_then(|index| items.get_mut(index))
            .map(std::mem::take),
        _ => None,
    }
}

fn set_child(node: &mut Value, key: &str, value: Value) {
    match node {
        Value::Object(map) => {
            map.insert(key.to_owned(), value);
        }
        Value::Array(items) => {
            if let Ok(index) = key.parse::<usize>() {
                if index < items.len() {
                    items[index] = value;
                } else {
                    items.resize(index, Value::Null);
                    items.push(value);
                }
            }
        }
        _ => {}
    }
}

fn remove_child(node: &mut Value, key: &str) {
    match node {
        Value::Object(map) => {
            map.shift_remove(key);
        }
        Value::Array(items) => {
            if let Ok(index) = key.parse::<usize>() {
                if index < items.len() {
                    items.remove(index);
                }
            }
        }
        _ => {}
    }
}
