//! Descriptor-driven default values.
//!
//! Defaults are spread into record data along field-descriptor paths
//! (paths with no numeric segments). A default lands only where nothing
//! is defined yet: an existing value — including an explicit `null` or
//! an empty string — always wins.

use curio_config::FieldDescriptor;
use serde_json::{Map, Value};

/// Spreads `value` into `data` at every location addressed by the
/// field-descriptor path.
///
/// When the child along a segment is a sequence, the default is spread
/// into *every* element; a missing child materializes as a keyed map,
/// so a repeating group with no instances ends up with exactly one
/// instance holding the default. The value at the terminal path is set
/// only if it is currently undefined. Returns new data at every level
/// touched; the input is consumed, never mutated in place.
pub fn spread_default_value<S: AsRef<str>>(
    value: &Value,
    path: &[S],
    data: Option<Value>,
) -> Value {
    let Some((first, rest)) = path.split_first() else {
        return data.unwrap_or_else(|| value.clone());
    };
    let key = first.as_ref();

    match data {
        None => {
            let mut map = Map::new();
            map.insert(key.to_owned(), spread_default_value(value, rest, None));
            Value::Object(map)
        }
        Some(Value::Object(mut map)) => {
            // An explicit null child is defined, and must be kept
            // distinct from an absent one.
            let child = if map.contains_key(key) {
                map.get_mut(key).map(std::mem::take)
            } else {
                None
            };

            let updated = match child {
                Some(Value::Array(items)) => Value::Array(
                    items
                        .into_iter()
                        .map(|item| spread_default_value(value, rest, Some(item)))
                        .collect(),
                ),
                other => spread_default_value(value, rest, other),
            };

            map.insert(key.to_owned(), updated);
            Value::Object(map)
        }
        Some(Value::Array(items)) => Value::Array(
            items
                .into_iter()
                .map(|item| spread_default_value(value, path, Some(item)))
                .collect(),
        ),
        Some(other) => other,
    }
}

/// Applies every default configured in the descriptor subtree to `data`,
/// in descriptor tree order.
///
/// A later default can never clobber a value set by an earlier one: the
/// spreader only fills locations that are still undefined.
pub fn apply_defaults(descriptor: &FieldDescriptor, data: Value) -> Value {
    descriptor.defaults().iter().fold(data, |data, spec| {
        spread_default_value(&spec.value, &spec.path, Some(data))
    })
}
