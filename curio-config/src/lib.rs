//! Declarative record-type configuration for Curio.
//!
//! Everything a Curio application knows about the shape of its records is
//! data, not code: independent configuration contributions are deep-merged
//! into one tree, and the per-record-type portion of that tree is parsed
//! into a typed field descriptor structure that the record data engine
//! consumes. This crate provides:
//!
//! - [`merge_config`] / [`init_config`] — the contribution merge engine,
//!   including nested plugin contributions resolved against a shared
//!   [`PluginContext`]
//! - [`FieldDescriptor`] / [`FieldMetadata`] — the per-field metadata tree
//!   (data type, required/repeating/cloneable flags, default values,
//!   service namespace bindings)
//! - [`ConfigCatalog`] — parsed record types and vocabularies with memoized
//!   reverse lookups by service object name, service path, and vocabulary
//!   short id
//!
//! Merging happens once at application startup; the resulting catalog is
//! immutable for the session apart from lazily built lookup indices, which
//! are idempotent to rebuild and therefore safe under concurrent first
//! access.

mod catalog;
mod descriptor;
mod merge;

pub use catalog::{
    ConfigCatalog, RecordTypeConfig, ServiceConfig, VocabularyConfig, DOCUMENT_KEY,
    RECORD_TYPES_KEY, VOCABULARIES_KEY,
};
pub use descriptor::{
    CustomValidator, DataType, DefaultSpec, FieldDescriptor, FieldMetadata, Required,
    ServiceBinding,
};
pub use merge::{init_config, merge_config, Contribution, Plugin, PluginContext, PLUGINS_KEY};
