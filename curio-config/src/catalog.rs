//! Record type catalog and lookup helpers.
//!
//! A merged configuration is parsed once into a [`ConfigCatalog`]:
//! typed record type and vocabulary entries plus memoized reverse
//! indices for the identifiers the rest of the application looks
//! records up by. Parsing is tolerant — an entry that does not parse is
//! skipped with a warning so a partially loaded configuration degrades
//! to "record type not available" rather than failing startup.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::descriptor::FieldDescriptor;

/// Configuration key holding the record type map.
pub const RECORD_TYPES_KEY: &str = "record_types";

/// Configuration key holding the vocabulary map.
pub const VOCABULARIES_KEY: &str = "vocabularies";

/// Name of the descriptor child (and record data key) under which a
/// record's document parts live.
pub const DOCUMENT_KEY: &str = "document";

/// Service-layer identifiers for a record type.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Path of the service that owns records of this type.
    pub service_path: Option<String>,
    /// Name of the service's document object.
    pub object_name: Option<String>,
    /// Document name used when constructing payloads.
    pub document_name: Option<String>,
}

/// Part name → field name → descriptor path from the part root.
type FieldIndex = HashMap<String, HashMap<String, Vec<String>>>;

/// Configuration for one record type.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecordTypeConfig {
    /// Name of the record type (its key in the configuration).
    #[serde(skip)]
    pub name: String,
    /// Service-layer identifiers.
    pub service_config: ServiceConfig,
    /// Root of the field descriptor tree. Its single child is
    /// [`DOCUMENT_KEY`], whose children are the document parts.
    pub fields: FieldDescriptor,
    #[serde(skip)]
    field_index: OnceLock<FieldIndex>,
}

impl RecordTypeConfig {
    /// The descriptor of a named document part.
    pub fn part(&self, part_name: &str) -> Option<&FieldDescriptor> {
        self.fields.child(DOCUMENT_KEY)?.child(part_name)
    }

    /// Resolves a field's descriptor within a document part.
    ///
    /// Direct children of the part win; otherwise the first depth-first
    /// match anywhere in the part's subtree is used. Results — including
    /// "not found" — come from an index built lazily on first call, so
    /// repeated lookups cost one hash probe.
    pub fn field_in_part(&self, part_name: &str, field_name: &str) -> Option<&FieldDescriptor> {
        let index = self
            .field_index
            .get_or_init(|| build_field_index(&self.fields));

        let Some(path) = index
            .get(part_name)
            .and_then(|fields| fields.get(field_name))
        else {
            warn!(
                record_type = %self.name,
                part = part_name,
                field = field_name,
                "no descriptor found for field"
            );
            return None;
        };

        let mut descriptor = self.part(part_name)?;
        for segment in path {
            descriptor = descriptor.child(segment)?;
        }
        Some(descriptor)
    }
}

fn build_field_index(fields: &FieldDescriptor) -> FieldIndex {
    let mut index = FieldIndex::new();

    let Some(document) = fields.child(DOCUMENT_KEY) else {
        return index;
    };

    for (part_name, part) in &document.children {
        let entry = index.entry(part_name.clone()).or_default();
        // Direct children take priority over deeper matches.
        for field_name in part.children.keys() {
            entry.insert(field_name.clone(), vec![field_name.clone()]);
        }
        collect_field_paths(part, &mut Vec::new(), entry);
    }

    index
}

fn collect_field_paths(
    descriptor: &FieldDescriptor,
    path: &mut Vec<String>,
    index: &mut HashMap<String, Vec<String>>,
) {
    for (name, child) in &descriptor.children {
        path.push(name.clone());
        if !index.contains_key(name) {
            index.insert(name.clone(), path.clone());
        }
        collect_field_paths(child, path, index);
        path.pop();
    }
}

/// Configuration for one controlled vocabulary.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    /// Name of the vocabulary (its key in the configuration).
    #[serde(skip)]
    pub name: String,
    /// Short identifier used in vocabulary references.
    pub short_id: Option<String>,
    /// Service-layer identifiers.
    pub service_config: ServiceConfig,
}

/// Parsed record types and vocabularies from a merged configuration.
///
/// The reverse lookup indices are built on first use and cached for the
/// life of the catalog; rebuilding one is idempotent, so a race between
/// two first-time lookups only costs redundant work.
#[derive(Debug, Default)]
pub struct ConfigCatalog {
    record_types: IndexMap<String, RecordTypeConfig>,
    vocabularies: IndexMap<String, VocabularyConfig>,
    by_object_name: OnceLock<HashMap<String, String>>,
    by_service_path: OnceLock<HashMap<String, String>>,
    vocabulary_by_short_id: OnceLock<HashMap<String, String>>,
}

impl ConfigCatalog {
    /// Parses a merged configuration into a catalog.
    pub fn from_config(config: &Value) -> Self {
        let mut catalog = ConfigCatalog::default();

        if let Some(Value::Object(entries)) = config.get(RECORD_TYPES_KEY) {
            for (name, entry) in entries {
                match serde_json::from_value::<RecordTypeConfig>(entry.clone()) {
                    Ok(mut record_type) => {
                        record_type.name = name.clone();
                        catalog.record_types.insert(name.clone(), record_type);
                    }
                    Err(error) => {
                        warn!(record_type = %name, %error, "skipping unparseable record type");
                    }
                }
            }
        }

        if let Some(Value::Object(entries)) = config.get(VOCABULARIES_KEY) {
            for (name, entry) in entries {
                match serde_json::from_value::<VocabularyConfig>(entry.clone()) {
                    Ok(mut vocabulary) => {
                        vocabulary.name = name.clone();
                        catalog.vocabularies.insert(name.clone(), vocabulary);
                    }
                    Err(error) => {
                        warn!(vocabulary = %name, %error, "skipping unparseable vocabulary");
                    }
                }
            }
        }

        catalog
    }

    /// All configured record types, in configuration order.
    pub fn record_types(&self) -> &IndexMap<String, RecordTypeConfig> {
        &self.record_types
    }

    /// All configured vocabularies, in configuration order.
    pub fn vocabularies(&self) -> &IndexMap<String, VocabularyConfig> {
        &self.vocabularies
    }

    /// The record type configuration named `name`.
    pub fn record_type(&self, name: &str) -> Option<&RecordTypeConfig> {
        self.record_types.get(name)
    }

    /// Looks a record type up by its service object name.
    pub fn record_type_by_service_object_name(
        &self,
        object_name: &str,
    ) -> Option<&RecordTypeConfig> {
        let index = self.by_object_name.get_or_init(|| {
            self.record_types
                .iter()
                .filter_map(|(name, record_type)| {
                    record_type
                        .service_config
                        .object_name
                        .clone()
                        .map(|object_name| (object_name, name.clone()))
                })
                .collect()
        });

        let Some(name) = index.get(object_name) else {
            warn!(object_name, "no record type configured for service object name");
            return None;
        };
        self.record_types.get(name)
    }

    /// Looks a record type up by its service path.
    pub fn record_type_by_service_path(&self, service_path: &str) -> Option<&RecordTypeConfig> {
        let index = self.by_service_path.get_or_init(|| {
            self.record_types
                .iter()
                .filter_map(|(name, record_type)| {
                    record_type
                        .service_config
                        .service_path
                        .clone()
                        .map(|service_path| (service_path, name.clone()))
                })
                .collect()
        });

        let Some(name) = index.get(service_path) else {
            warn!(service_path, "no record type configured for service path");
            return None;
        };
        self.record_types.get(name)
    }

    /// Looks a vocabulary up by its short identifier.
    pub fn vocabulary_by_short_id(&self, short_id: &str) -> Option<&VocabularyConfig> {
        let index = self.vocabulary_by_short_id.get_or_init(|| {
            self.vocabularies
                .iter()
                .filter_map(|(name, vocabulary)| {
                    vocabulary
                        .short_id
                        .clone()
                        .map(|short_id| (short_id, name.clone()))
                })
                .collect()
        });

        let Some(name) = index.get(short_id) else {
            warn!(short_id, "no vocabulary configured for short id");
            return None;
        };
        self.vocabularies.get(name)
    }
}
