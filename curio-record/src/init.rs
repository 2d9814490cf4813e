//! Record construction and clone sanitization.

use curio_config::{FieldDescriptor, RecordTypeConfig, DOCUMENT_KEY};
use serde_json::{Map, Value};

use crate::defaults::apply_defaults;
use crate::payload::{ACCOUNT_PERMISSION_PART, CORE_PART, DOCUMENT_NAME_KEY};

/// Resets fields that must not carry over into a cloned record.
///
/// A node whose descriptor marks it `cloneable: false` is replaced by
/// its configured default value — or cleared entirely when it has none —
/// without descending further. Cloneable maps and sequences are rebuilt
/// with the same shape, recursing in lock-step with the descriptor tree;
/// data with no matching descriptor passes through unchanged.
pub fn clear_uncloneable(
    descriptor: Option<&FieldDescriptor>,
    data: Option<Value>,
) -> Option<Value> {
    let Some(descriptor) = descriptor else {
        return data;
    };

    if !descriptor.is_cloneable() {
        return descriptor.metadata.default_value.clone();
    }

    match data {
        Some(Value::Object(map)) => {
            let mut rebuilt = Map::new();
            for (name, child) in map {
                if let Some(updated) = clear_uncloneable(descriptor.child(&name), Some(child)) {
                    rebuilt.insert(name, updated);
                }
            }
            Some(Value::Object(rebuilt))
        }
        Some(Value::Array(items)) => Some(Value::Array(
            items
                .into_iter()
                .map(|item| {
                    clear_uncloneable(Some(descriptor), Some(item)).unwrap_or(Value::Null)
                })
                .collect(),
        )),
        other => other,
    }
}

/// Produces a new record's initial data from an existing record.
///
/// Returns `None` for `None` input. The administrative core and account
/// permission parts never carry over; the rest of the document is passed
/// through [`clear_uncloneable`] under the record type's descriptors.
pub fn clone_record_data(record_type: &RecordTypeConfig, data: Option<&Value>) -> Option<Value> {
    let mut data = data?.clone();

    if let Some(Value::Object(document)) = data.get_mut(DOCUMENT_KEY) {
        document.shift_remove(CORE_PART);
        document.shift_remove(ACCOUNT_PERMISSION_PART);
    }

    clear_uncloneable(Some(&record_type.fields), Some(data))
}

/// Namespace-declaration attribute key for a document part
/// (`ns2:objects_common` → `@xmlns:ns2`).
pub fn namespace_attribute(part_name: &str) -> String {
    match part_name.split_once(':') {
        Some((prefix, _)) => format!("@xmlns:{prefix}"),
        None => "@xmlns".to_owned(),
    }
}

/// Builds the minimal document shell for a new record: the document name
/// attribute plus, for each part that declares a namespace, the part's
/// map holding its namespace-declaration attribute.
pub fn create_blank_record(record_type: &RecordTypeConfig) -> Value {
    let mut document = Map::new();

    if let Some(document_name) = &record_type.service_config.document_name {
        document.insert(
            DOCUMENT_NAME_KEY.to_owned(),
            Value::String(document_name.clone()),
        );
    }

    if let Some(parts) = record_type.fields.child(DOCUMENT_KEY) {
        for (part_name, part) in &parts.children {
            let Some(ns) = part
                .metadata
                .service
                .as_ref()
                .and_then(|service| service.ns.as_ref())
            else {
                continue;
            };
            let mut part_map = Map::new();
            part_map.insert(namespace_attribute(part_name), Value::String(ns.clone()));
            document.insert(part_name.clone(), Value::Object(part_map));
        }
    }

    let mut root = Map::new();
    root.insert(DOCUMENT_KEY.to_owned(), Value::Object(document));
    Value::Object(root)
}

/// Initial data for a brand-new record: a blank document shell with
/// every configured default applied.
pub fn create_record_data(record_type: &RecordTypeConfig) -> Value {
    apply_defaults(&record_type.fields, create_blank_record(record_type))
}
