//! The recursive validation engine.

use std::sync::OnceLock;

use curio_config::{DataType, FieldDescriptor, RecordTypeConfig};
use regex_lite::Regex;
use serde_json::Value;

use crate::tree::{ErrorCode, ErrorTree, FieldError};

/// Validates a whole record against its record type's descriptors.
pub fn validate_record_data(
    record_type: &RecordTypeConfig,
    data: Option<&Value>,
) -> Option<ErrorTree> {
    validate_field(&record_type.fields, data, true)
}

/// Validates one field's value against its descriptor.
///
/// Returns `None` when there is nothing to report. With
/// `expand_repeating`, a repeating field's data is normalized to a
/// sequence (a singular value counts as its own one-element list) and
/// every instance is validated independently, with per-index results
/// keyed by index. Required flags are evaluated against the record data
/// passed here, so predicates see the whole value under validation.
///
/// A descriptor's `custom_validator` hook is reserved and not invoked.
pub fn validate_field(
    descriptor: &FieldDescriptor,
    data: Option<&Value>,
    expand_repeating: bool,
) -> Option<ErrorTree> {
    validate(descriptor, data, data, expand_repeating)
}

fn validate(
    descriptor: &FieldDescriptor,
    data: Option<&Value>,
    record_data: Option<&Value>,
    expand_repeating: bool,
) -> Option<ErrorTree> {
    let mut tree = ErrorTree::default();

    if descriptor.is_repeating() && expand_repeating {
        match data {
            Some(Value::Array(items)) => {
                for (index, item) in items.iter().enumerate() {
                    if let Some(errors) = validate(descriptor, Some(item), record_data, false) {
                        tree.children.insert(index.to_string(), errors);
                    }
                }
            }
            single => {
                if let Some(errors) = validate(descriptor, single, record_data, false) {
                    tree.children.insert("0".to_owned(), errors);
                }
            }
        }
        return (!tree.is_empty()).then_some(tree);
    }

    if descriptor.data_type() == DataType::Map {
        if let Some(Value::Object(map)) = data {
            for (name, child_descriptor) in &descriptor.children {
                if let Some(errors) = validate(child_descriptor, map.get(name), record_data, true)
                {
                    tree.children.insert(name.clone(), errors);
                }
            }
        }
    }

    if is_blank(data) {
        if descriptor.is_required(record_data) {
            tree.error = Some(FieldError {
                code: ErrorCode::MissingRequiredField,
                data_type: None,
                value: None,
            });
        }
    } else if let Some(value) = data {
        let data_type = descriptor.data_type();
        if !matches_data_type(data_type, value) {
            tree.error = Some(FieldError {
                code: ErrorCode::DataTypeMismatch,
                data_type: Some(data_type),
                value: Some(value.clone()),
            });
        }
    }

    (!tree.is_empty()).then_some(tree)
}

/// Undefined, null, and the empty string all count as "no value" for
/// the required check. (The default spreader deliberately disagrees:
/// there, an explicit null blocks defaulting.)
fn is_blank(data: Option<&Value>) -> bool {
    match data {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        _ => false,
    }
}

fn matches_data_type(data_type: DataType, value: &Value) -> bool {
    match data_type {
        DataType::String => true,
        DataType::Int => match value {
            Value::String(text) => int_pattern().is_match(text),
            Value::Number(number) => number.is_i64() || number.is_u64(),
            _ => false,
        },
        DataType::Float => match value {
            Value::String(text) => float_pattern().is_match(text),
            Value::Number(_) => true,
            _ => false,
        },
        DataType::Bool => value.is_boolean(),
        DataType::Date => {
            matches!(value, Value::String(text) if date_pattern().is_match(text))
        }
        DataType::DateTime => {
            matches!(value, Value::String(text) if datetime_pattern().is_match(text))
        }
        DataType::Map => value.is_object(),
    }
}

fn int_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+$").expect("int pattern compiles"))
}

fn float_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("float pattern compiles"))
}

fn date_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}(T00:00:00\.000Z)?$").expect("date pattern compiles")
    })
}

fn datetime_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}\.\d{3}Z$")
            .expect("datetime pattern compiles")
    })
}
