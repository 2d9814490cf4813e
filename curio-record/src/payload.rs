//! Outbound payload preparation and document accessors.
//!
//! Documents travel with a fixed namespace-prefix convention: parts are
//! named `<prefix>:<partName>`, and keys beginning with the attribute
//! marker serialize as attributes of the part. The transport layer
//! requires attributes ahead of ordinary keys, no administrative parts,
//! and no half-specified relations.

use curio_config::DOCUMENT_KEY;
use serde_json::{Map, Value};

use crate::path::deep_get;

/// Keys beginning with this character serialize as attributes.
pub const ATTRIBUTE_MARKER: char = '@';

/// Document attribute carrying the record type's document name.
pub const DOCUMENT_NAME_KEY: &str = "@name";

/// Administrative part holding server-managed record metadata.
pub const CORE_PART: &str = "ns2:curio_core";

/// Administrative part holding account permission data.
pub const ACCOUNT_PERMISSION_PART: &str = "ns2:account_permission";

/// Document part listing the record's relations.
pub const RELATIONS_PART: &str = "rel:relations_common_list";

/// Key within the relations part holding relation entries.
pub const RELATION_ITEM_KEY: &str = "relation_item";

/// The record's document map.
pub fn document(data: &Value) -> Option<&Value> {
    data.get(DOCUMENT_KEY)
}

/// A named part of the record's document.
pub fn part<'a>(data: &'a Value, part_name: &str) -> Option<&'a Value> {
    document(data)?.get(part_name)
}

/// Reads a field of the administrative core part.
pub fn core_field_value<'a>(data: &'a Value, field_name: &str) -> Option<&'a Value> {
    deep_get(Some(data), &[DOCUMENT_KEY, CORE_PART, field_name])
        .ok()
        .flatten()
}

/// Normalizes record data for the transport layer.
///
/// Removes the administrative core and account permission parts,
/// stably reorders each remaining part's attribute keys ahead of its
/// ordinary keys, and drops relation entries that lack a subject or
/// object reference.
pub fn prepare_for_sending(data: &Value) -> Value {
    let mut data = data.clone();

    if let Some(Value::Object(document)) = data.get_mut(DOCUMENT_KEY) {
        document.shift_remove(CORE_PART);
        document.shift_remove(ACCOUNT_PERMISSION_PART);

        for part in document.values_mut() {
            if let Value::Object(part_map) = part {
                *part_map = sort_attributes_first(std::mem::take(part_map));
            }
        }

        if let Some(Value::Object(relations)) = document.get_mut(RELATIONS_PART) {
            let remove = match relations.get_mut(RELATION_ITEM_KEY) {
                Some(Value::Array(entries)) => {
                    entries.retain(has_relation_references);
                    false
                }
                Some(single) => !has_relation_references(single),
                None => false,
            };
            if remove {
                relations.shift_remove(RELATION_ITEM_KEY);
            }
        }
    }

    data
}

/// Moves attribute keys ahead of ordinary keys, preserving the relative
/// order within each group.
fn sort_attributes_first(part: Map<String, Value>) -> Map<String, Value> {
    let (attributes, ordinary): (Vec<_>, Vec<_>) = part
        .into_iter()
        .partition(|(key, _)| key.starts_with(ATTRIBUTE_MARKER));
    attributes.into_iter().chain(ordinary).collect()
}

fn reference_id<'a>(item: &'a Value, role: &str) -> Option<&'a Value> {
    item.get(role)?.get("id").filter(|id| !id.is_null())
}

fn has_relation_references(item: &Value) -> bool {
    reference_id(item, "subject").is_some() && reference_id(item, "object").is_some()
}
