//! Descriptor-driven record validation for Curio.
//!
//! Validation walks record data in lock-step with a field descriptor
//! tree and reports problems as a value — an [`ErrorTree`] mirroring the
//! shape of the data it describes — rather than failing. The caller (a
//! UI layer, typically) decides how errors are surfaced.
//!
//! - [`validate_field`] — validates one field's value against its
//!   descriptor, expanding repeating instances
//! - [`validate_record_data`] — validates a whole record against its
//!   record type's descriptors

mod tree;
mod validate;

pub use tree::{ErrorCode, ErrorTree, FieldError};
pub use validate::{validate_field, validate_record_data};
