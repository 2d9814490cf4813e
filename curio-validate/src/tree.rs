//! Validation error trees.

use curio_config::DataType;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Machine-readable validation error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    MissingRequiredField,
    DataTypeMismatch,
}

/// A validation failure at a single node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub code: ErrorCode,
    /// Expected data type, for mismatch errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_type: Option<DataType>,
    /// The offending value, for mismatch errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

/// Validation errors mirroring the shape of the record data they
/// describe.
///
/// A node carries an error for its own value and/or error subtrees for
/// its children — child fields by name, repeating instances by index.
/// Absence of a child key means there is no error below it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ErrorTree {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FieldError>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub children: IndexMap<String, ErrorTree>,
}

impl ErrorTree {
    /// Whether this tree reports nothing at all.
    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.children.is_empty()
    }

    /// The error subtree under a child key.
    pub fn child(&self, name: &str) -> Option<&ErrorTree> {
        self.children.get(name)
    }

    /// The error recorded at a nested path, if any.
    pub fn error_at<S: AsRef<str>>(&self, path: &[S]) -> Option<&FieldError> {
        let mut node = self;
        for segment in path {
            node = node.children.get(segment.as_ref())?;
        }
        node.error.as_ref()
    }
}
