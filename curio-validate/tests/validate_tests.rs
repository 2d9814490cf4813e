use curio_config::{DataType, FieldDescriptor, RecordTypeConfig, Required};
use curio_validate::{validate_field, validate_record_data, ErrorCode};
use pretty_assertions::assert_eq;
use serde_json::json;

fn descriptor(metadata: serde_json::Value) -> FieldDescriptor {
    serde_json::from_value(json!({"metadata": metadata})).expect("fixture parses")
}

// ── Required fields ──────────────────────────────────────────────

#[test]
fn a_missing_required_value_is_reported() {
    let field = descriptor(json!({"required": true}));

    for blank in [None, Some(json!(null)), Some(json!(""))] {
        let errors = validate_field(&field, blank.as_ref(), true).unwrap();
        assert_eq!(
            errors.error.as_ref().unwrap().code,
            ErrorCode::MissingRequiredField
        );
    }
}

#[test]
fn a_present_value_satisfies_required() {
    let field = descriptor(json!({"required": true}));
    let value = json!("anything");
    assert_eq!(validate_field(&field, Some(&value), true), None);
}

#[test]
fn zero_is_not_treated_as_empty() {
    let field = descriptor(json!({"required": true, "data_type": "int"}));
    let value = json!("0");
    assert_eq!(validate_field(&field, Some(&value), true), None);
}

#[test]
fn an_optional_blank_value_is_fine() {
    let field = descriptor(json!({}));
    assert_eq!(validate_field(&field, None, true), None);
    let null = json!(null);
    assert_eq!(validate_field(&field, Some(&null), true), None);
}

#[test]
fn a_computed_required_flag_sees_the_record_data() {
    let mut part: FieldDescriptor = serde_json::from_value(json!({
        "metadata": {"data_type": "map"},
        "children": {
            "loan_number": {},
            "borrower": {},
        },
    }))
    .unwrap();

    // A borrower is required only when a loan number is present.
    part.children["borrower"].metadata.required = Required::computed(|record_data| {
        record_data
            .and_then(|data| data.get("loan_number"))
            .is_some()
    });

    let with_loan = json!({"loan_number": "L-1"});
    let errors = validate_field(&part, Some(&with_loan), true).unwrap();
    assert_eq!(
        errors.error_at(&["borrower"]).unwrap().code,
        ErrorCode::MissingRequiredField
    );

    let without_loan = json!({});
    assert_eq!(validate_field(&part, Some(&without_loan), true), None);
}

// ── Data types ───────────────────────────────────────────────────

#[test]
fn int_values_must_be_whole_numbers() {
    let field = descriptor(json!({"data_type": "int"}));

    let bad = json!("24w");
    let errors = validate_field(&field, Some(&bad), true).unwrap();
    let error = errors.error.as_ref().unwrap();
    assert_eq!(error.code, ErrorCode::DataTypeMismatch);
    assert_eq!(error.data_type, Some(DataType::Int));
    assert_eq!(error.value, Some(json!("24w")));

    for good in ["-1", "0", "12345"] {
        let value = json!(good);
        assert_eq!(validate_field(&field, Some(&value), true), None);
    }
}

#[test]
fn float_values_allow_a_decimal_part() {
    let field = descriptor(json!({"data_type": "float"}));

    for good in ["1", "-1.5", "0.25"] {
        let value = json!(good);
        assert_eq!(validate_field(&field, Some(&value), true), None);
    }

    for bad in ["1.", ".5", "1.5.5", "abc"] {
        let value = json!(bad);
        let errors = validate_field(&field, Some(&value), true).unwrap();
        assert_eq!(errors.error.as_ref().unwrap().code, ErrorCode::DataTypeMismatch);
    }
}

#[test]
fn bool_values_must_be_actual_booleans() {
    let field = descriptor(json!({"data_type": "bool"}));

    let yes = json!(true);
    assert_eq!(validate_field(&field, Some(&yes), true), None);

    let stringly = json!("true");
    let errors = validate_field(&field, Some(&stringly), true).unwrap();
    assert_eq!(errors.error.as_ref().unwrap().code, ErrorCode::DataTypeMismatch);
}

#[test]
fn date_values_allow_a_midnight_timestamp_suffix() {
    let field = descriptor(json!({"data_type": "date"}));

    for good in ["2024-06-01", "2024-06-01T00:00:00.000Z"] {
        let value = json!(good);
        assert_eq!(validate_field(&field, Some(&value), true), None);
    }

    for bad in ["2024-6-1", "2024-06-01T12:00:00.000Z", "June 1, 2024"] {
        let value = json!(bad);
        assert!(validate_field(&field, Some(&value), true).is_some());
    }
}

#[test]
fn datetime_values_require_the_full_timestamp() {
    let field = descriptor(json!({"data_type": "date_time"}));

    let good = json!("2024-06-01T12:34:56.789Z");
    assert_eq!(validate_field(&field, Some(&good), true), None);

    for bad in ["2024-06-01", "2024-06-01T12:34:56Z"] {
        let value = json!(bad);
        assert!(validate_field(&field, Some(&value), true).is_some());
    }
}

#[test]
fn string_fields_accept_anything_present() {
    let field = descriptor(json!({}));
    for value in [json!("text"), json!(42), json!(true)] {
        assert_eq!(validate_field(&field, Some(&value), true), None);
    }
}

#[test]
fn map_fields_reject_scalar_values() {
    let field = descriptor(json!({"data_type": "map"}));

    let scalar = json!("not a map");
    let errors = validate_field(&field, Some(&scalar), true).unwrap();
    let error = errors.error.as_ref().unwrap();
    assert_eq!(error.code, ErrorCode::DataTypeMismatch);
    assert_eq!(error.data_type, Some(DataType::Map));
}

// ── Repeating fields ─────────────────────────────────────────────

#[test]
fn each_instance_is_validated_independently() {
    let field = descriptor(json!({"data_type": "int", "repeating": true}));

    let values = json!(["a", "32", "c"]);
    let errors = validate_field(&field, Some(&values), true).unwrap();

    assert!(errors.child("0").is_some());
    assert!(errors.child("1").is_none());
    assert!(errors.child("2").is_some());
    assert_eq!(
        errors.error_at(&["0"]).unwrap().code,
        ErrorCode::DataTypeMismatch
    );
}

#[test]
fn a_fully_valid_sequence_reports_nothing() {
    let field = descriptor(json!({"data_type": "int", "repeating": true}));
    let values = json!(["1", "2"]);
    assert_eq!(validate_field(&field, Some(&values), true), None);
}

#[test]
fn a_singular_value_validates_as_instance_zero() {
    let field = descriptor(json!({"data_type": "int", "repeating": true}));

    let value = json!("not a number");
    let errors = validate_field(&field, Some(&value), true).unwrap();
    assert_eq!(
        errors.error_at(&["0"]).unwrap().code,
        ErrorCode::DataTypeMismatch
    );
}

#[test]
fn a_missing_required_repeating_field_reports_at_instance_zero() {
    let field = descriptor(json!({"required": true, "repeating": true}));
    let errors = validate_field(&field, None, true).unwrap();
    assert_eq!(
        errors.error_at(&["0"]).unwrap().code,
        ErrorCode::MissingRequiredField
    );
}

#[test]
fn expansion_can_be_disabled_for_a_single_instance() {
    let field = descriptor(json!({"data_type": "int", "repeating": true}));

    let value = json!("17");
    assert_eq!(validate_field(&field, Some(&value), false), None);

    let bad = json!("x");
    let errors = validate_field(&field, Some(&bad), false).unwrap();
    // No index wrapping: the error sits on the node itself.
    assert_eq!(errors.error.as_ref().unwrap().code, ErrorCode::DataTypeMismatch);
}

// ── Map recursion ────────────────────────────────────────────────

fn common_part() -> FieldDescriptor {
    serde_json::from_value(json!({
        "metadata": {"data_type": "map"},
        "children": {
            "object_number": {"metadata": {"required": true}},
            "count": {"metadata": {"data_type": "int"}},
            "title": {},
        },
    }))
    .expect("fixture parses")
}

#[test]
fn child_errors_are_keyed_by_field_name() {
    let part = common_part();
    let data = json!({"count": "many", "title": "Amphora"});

    let errors = validate_field(&part, Some(&data), true).unwrap();

    assert_eq!(
        errors.error_at(&["object_number"]).unwrap().code,
        ErrorCode::MissingRequiredField
    );
    assert_eq!(
        errors.error_at(&["count"]).unwrap().code,
        ErrorCode::DataTypeMismatch
    );
    assert!(errors.child("title").is_none());
}

#[test]
fn a_valid_map_reports_nothing() {
    let part = common_part();
    let data = json!({"object_number": "2024.1.1", "count": "2"});
    assert_eq!(validate_field(&part, Some(&data), true), None);
}

#[test]
fn nested_repeating_groups_mirror_the_data_shape() {
    let part: FieldDescriptor = serde_json::from_value(json!({
        "metadata": {"data_type": "map"},
        "children": {
            "title_group": {
                "metadata": {"data_type": "map", "repeating": true},
                "children": {
                    "title": {"metadata": {"required": true}},
                },
            },
        },
    }))
    .unwrap();

    let data = json!({
        "title_group": [
            {"title": "Amphora"},
            {"title": ""},
        ],
    });

    let errors = validate_field(&part, Some(&data), true).unwrap();
    assert_eq!(
        errors.error_at(&["title_group", "1", "title"]).unwrap().code,
        ErrorCode::MissingRequiredField
    );
    assert!(errors.child("title_group").unwrap().child("0").is_none());
}

// ── validate_record_data ─────────────────────────────────────────

fn object_record_type() -> RecordTypeConfig {
    serde_json::from_value(json!({
        "fields": {
            "metadata": {"data_type": "map"},
            "children": {
                "document": {
                    "metadata": {"data_type": "map"},
                    "children": {
                        "ns2:objects_common": {
                            "metadata": {"data_type": "map"},
                            "children": {
                                "object_number": {"metadata": {"required": true}},
                            },
                        },
                    },
                },
            },
        },
    }))
    .expect("fixture parses")
}

#[test]
fn whole_records_validate_through_their_descriptor_tree() {
    let record_type = object_record_type();
    let data = json!({"document": {"ns2:objects_common": {}}});

    let errors = validate_record_data(&record_type, Some(&data)).unwrap();
    assert_eq!(
        errors
            .error_at(&["document", "ns2:objects_common", "object_number"])
            .unwrap()
            .code,
        ErrorCode::MissingRequiredField
    );
}

#[test]
fn a_complete_record_validates_clean() {
    let record_type = object_record_type();
    let data = json!({"document": {"ns2:objects_common": {"object_number": "2024.1.1"}}});
    assert_eq!(validate_record_data(&record_type, Some(&data)), None);
}
