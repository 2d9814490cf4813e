//! Record data operations for Curio.
//!
//! A record's data is a `serde_json::Value` tree: keyed maps (insertion
//! order preserved), ordered sequences for repeating field instances, and
//! scalar leaves. The wire representation conflates "one value" and "list
//! of one value", so every operation here tolerates and normalizes that
//! ambiguity. "Undefined" is the *absence* of a value and is distinct
//! from an explicit `null`.
//!
//! - [`deep_get`] / [`deep_set`] / [`deep_delete`] — path-addressable
//!   access with list-of-one transparency, materialization of missing
//!   intermediates, and promotion of singular values written through a
//!   numeric segment
//! - [`spread_default_value`] / [`apply_defaults`] — descriptor-driven
//!   defaulting that never overwrites a defined value
//! - [`clear_uncloneable`] / [`clone_record_data`] — clone sanitization
//! - [`create_blank_record`] / [`create_record_data`] — new-record
//!   construction from a record type's descriptors
//! - [`prepare_for_sending`] — outbound payload normalization
//!
//! All operations are pure: they take record data snapshots and return
//! new values, never mutating shared state.

mod defaults;
mod init;
mod path;
mod payload;

pub use curio_config::DOCUMENT_KEY;
pub use defaults::{apply_defaults, spread_default_value};
pub use init::{
    clear_uncloneable, clone_record_data, create_blank_record, create_record_data,
    namespace_attribute,
};
pub use path::{deep_delete, deep_get, deep_set, PathError};
pub use payload::{
    core_field_value, document, part, prepare_for_sending, ACCOUNT_PERMISSION_PART,
    ATTRIBUTE_MARKER, CORE_PART, DOCUMENT_NAME_KEY, RELATIONS_PART, RELATION_ITEM_KEY,
};
