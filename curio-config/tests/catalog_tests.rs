use curio_config::{ConfigCatalog, DataType};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn merged_config() -> Value {
    json!({
        "record_types": {
            "object": {
                "service_config": {
                    "service_path": "collectionobjects",
                    "object_name": "CollectionObject",
                    "document_name": "collectionobjects",
                },
                "fields": {
                    "children": {
                        "document": {
                            "metadata": {"data_type": "map"},
                            "children": {
                                "ns2:objects_common": {
                                    "metadata": {"data_type": "map"},
                                    "children": {
                                        "object_number": {
                                            "metadata": {"data_type": "string"},
                                        },
                                        "title_group_list": {
                                            "metadata": {"data_type": "map"},
                                            "children": {
                                                "title_group": {
                                                    "metadata": {
                                                        "data_type": "map",
                                                        "repeating": true,
                                                    },
                                                    "children": {
                                                        "title": {},
                                                        "title_language": {},
                                                    },
                                                },
                                            },
                                        },
                                    },
                                },
                            },
                        },
                    },
                },
            },
            "person": {
                "service_config": {
                    "service_path": "persons",
                    "object_name": "Person",
                },
            },
        },
        "vocabularies": {
            "languages": {"short_id": "languages"},
            "behrensmeyer": {"short_id": "behrensmeyer"},
        },
    })
}

// ── Parsing ──────────────────────────────────────────────────────

#[test]
fn record_types_parse_with_their_names() {
    let catalog = ConfigCatalog::from_config(&merged_config());

    assert_eq!(catalog.record_types().len(), 2);
    let object = catalog.record_type("object").unwrap();
    assert_eq!(object.name, "object");
    assert_eq!(
        object.service_config.service_path.as_deref(),
        Some("collectionobjects")
    );
}

#[test]
fn vocabularies_parse_with_their_names() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    assert_eq!(catalog.vocabularies().len(), 2);
    assert_eq!(catalog.vocabularies()["languages"].name, "languages");
}

#[test]
fn unparseable_record_type_is_skipped() {
    let config = json!({
        "record_types": {
            "object": {"fields": "not-a-descriptor-tree"},
            "person": {"service_config": {"object_name": "Person"}},
        },
    });

    let catalog = ConfigCatalog::from_config(&config);
    assert!(catalog.record_type("object").is_none());
    assert!(catalog.record_type("person").is_some());
}

#[test]
fn a_config_without_record_types_yields_an_empty_catalog() {
    let catalog = ConfigCatalog::from_config(&json!({}));
    assert!(catalog.record_types().is_empty());
    assert!(catalog.vocabularies().is_empty());
}

// ── Reverse lookups ──────────────────────────────────────────────

#[test]
fn record_type_resolves_by_service_object_name() {
    let catalog = ConfigCatalog::from_config(&merged_config());

    let found = catalog
        .record_type_by_service_object_name("CollectionObject")
        .unwrap();
    assert_eq!(found.name, "object");

    assert!(catalog
        .record_type_by_service_object_name("NoSuchObject")
        .is_none());
}

#[test]
fn record_type_resolves_by_service_path() {
    let catalog = ConfigCatalog::from_config(&merged_config());

    let found = catalog.record_type_by_service_path("persons").unwrap();
    assert_eq!(found.name, "person");
}

#[test]
fn vocabulary_resolves_by_short_id() {
    let catalog = ConfigCatalog::from_config(&merged_config());

    let found = catalog.vocabulary_by_short_id("behrensmeyer").unwrap();
    assert_eq!(found.name, "behrensmeyer");

    assert!(catalog.vocabulary_by_short_id("nope").is_none());
}

#[test]
fn repeated_lookups_return_the_same_entry() {
    let catalog = ConfigCatalog::from_config(&merged_config());

    let first = catalog.record_type_by_service_path("collectionobjects");
    let second = catalog.record_type_by_service_path("collectionobjects");
    assert_eq!(first.unwrap().name, second.unwrap().name);
}

// ── Field lookup within a part ───────────────────────────────────

#[test]
fn field_in_part_finds_a_direct_child() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    let object = catalog.record_type("object").unwrap();

    let field = object
        .field_in_part("ns2:objects_common", "object_number")
        .unwrap();
    assert_eq!(field.data_type(), DataType::String);
}

#[test]
fn field_in_part_searches_the_whole_part_subtree() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    let object = catalog.record_type("object").unwrap();

    let field = object
        .field_in_part("ns2:objects_common", "title_group")
        .unwrap();
    assert!(field.is_repeating());
}

#[test]
fn field_in_part_misses_are_memoized_not_fatal() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    let object = catalog.record_type("object").unwrap();

    assert!(object
        .field_in_part("ns2:objects_common", "no_such_field")
        .is_none());
    // A second lookup hits the negative memo and still returns None.
    assert!(object
        .field_in_part("ns2:objects_common", "no_such_field")
        .is_none());
}

#[test]
fn field_in_part_returns_none_for_unknown_parts() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    let object = catalog.record_type("object").unwrap();

    assert!(object.field_in_part("ns2:nonexistent", "title").is_none());
}

#[test]
fn part_returns_the_part_descriptor() {
    let catalog = ConfigCatalog::from_config(&merged_config());
    let object = catalog.record_type("object").unwrap();

    let part = object.part("ns2:objects_common").unwrap();
    assert_eq!(part.data_type(), DataType::Map);
}
