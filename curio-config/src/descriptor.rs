//! Field descriptor trees.
//!
//! A record type's fields are described by a tree of descriptors whose
//! nodes are named after document field names. Metadata and children are
//! kept in separate slots of a tagged record, so a field can never
//! collide with the metadata of its parent.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Data types a field value may be validated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataType {
    /// Free text. Any value is acceptable.
    #[default]
    String,
    Int,
    Float,
    Bool,
    Date,
    DateTime,
    /// A keyed map of child fields.
    Map,
}

/// Whether a field must carry a value.
///
/// Configuration expresses the static flag; hosts may replace it with a
/// predicate evaluated against the record being validated.
#[derive(Clone)]
pub enum Required {
    /// Fixed flag from configuration.
    Value(bool),
    /// Computed from the current record data.
    Computed(Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>),
}

impl Required {
    /// Evaluates the flag against the record under validation.
    pub fn evaluate(&self, record_data: Option<&Value>) -> bool {
        match self {
            Required::Value(required) => *required,
            Required::Computed(predicate) => predicate(record_data),
        }
    }

    /// Wraps a closure as a computed required flag.
    pub fn computed(
        predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Required::Computed(Arc::new(predicate))
    }
}

impl Default for Required {
    fn default() -> Self {
        Required::Value(false)
    }
}

impl From<bool> for Required {
    fn from(required: bool) -> Self {
        Required::Value(required)
    }
}

impl fmt::Debug for Required {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Required::Value(required) => f.debug_tuple("Value").field(required).finish(),
            Required::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

impl<'de> Deserialize<'de> for Required {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        bool::deserialize(deserializer).map(Required::Value)
    }
}

/// Record-type-specific validation hook.
///
/// Reserved: configuration may attach one, but the validation engine does
/// not invoke it yet.
#[derive(Clone)]
pub struct CustomValidator(pub Arc<dyn Fn(Option<&Value>) -> Option<Value> + Send + Sync>);

impl fmt::Debug for CustomValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomValidator(..)")
    }
}

/// Service-layer binding for a document part.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceBinding {
    /// Namespace URI declared on the part's root element.
    pub ns: Option<String>,
}

/// Metadata carried by a single field descriptor node.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldMetadata {
    /// Data type of the field's value. [`DataType::String`] when unset.
    pub data_type: Option<DataType>,
    /// Whether the field must carry a value.
    pub required: Required,
    /// Whether the field may have multiple instances.
    pub repeating: bool,
    /// Whether the value carries over when a record is cloned. `true`
    /// when unset.
    pub cloneable: Option<bool>,
    /// Value applied to new records (and to cloned records for fields
    /// that are not cloneable). Already in record-data representation.
    pub default_value: Option<Value>,
    /// Service binding for document parts.
    pub service: Option<ServiceBinding>,
    /// Reserved validation hook; never invoked by current logic.
    #[serde(skip)]
    pub custom_validator: Option<CustomValidator>,
}

/// A default value and the descriptor-relative path it applies to.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultSpec {
    pub path: Vec<String>,
    pub value: Value,
}

/// One node of a field descriptor tree.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FieldDescriptor {
    /// This field's own metadata.
    pub metadata: FieldMetadata,
    /// Child fields, keyed by document field name, in declaration order.
    pub children: IndexMap<String, FieldDescriptor>,
}

impl FieldDescriptor {
    /// The immediate child descriptor named `name`.
    pub fn child(&self, name: &str) -> Option<&FieldDescriptor> {
        self.children.get(name)
    }

    /// Depth-first search for the first descendant named `name`.
    ///
    /// Each child is compared before its own subtree is searched; the
    /// first match in declaration order wins.
    pub fn find_field(&self, name: &str) -> Option<&FieldDescriptor> {
        for (child_name, child) in &self.children {
            if child_name == name {
                return Some(child);
            }
            if let Some(found) = child.find_field(name) {
                return Some(found);
            }
        }
        None
    }

    /// Collects every configured default value in this subtree, with
    /// paths relative to the subtree root, in descriptor tree order.
    pub fn defaults(&self) -> Vec<DefaultSpec> {
        let mut defaults = Vec::new();
        self.collect_defaults(&mut Vec::new(), &mut defaults);
        defaults
    }

    fn collect_defaults(&self, path: &mut Vec<String>, defaults: &mut Vec<DefaultSpec>) {
        if let Some(value) = &self.metadata.default_value {
            defaults.push(DefaultSpec {
                path: path.clone(),
                value: value.clone(),
            });
        }
        for (name, child) in &self.children {
            path.push(name.clone());
            child.collect_defaults(path, defaults);
            path.pop();
        }
    }

    /// The field's data type.
    ///
    /// When no type is declared, a field with children is a
    /// [`DataType::Map`] and a leaf is a [`DataType::String`].
    pub fn data_type(&self) -> DataType {
        self.metadata.data_type.unwrap_or_else(|| {
            if self.children.is_empty() {
                DataType::String
            } else {
                DataType::Map
            }
        })
    }

    /// Whether the field may have multiple instances.
    pub fn is_repeating(&self) -> bool {
        self.metadata.repeating
    }

    /// Whether the value carries over when a record is cloned.
    pub fn is_cloneable(&self) -> bool {
        self.metadata.cloneable.unwrap_or(true)
    }

    /// Whether the field must carry a value, evaluated against the
    /// record under validation.
    pub fn is_required(&self, record_data: Option<&Value>) -> bool {
        self.metadata.required.evaluate(record_data)
    }
}
