//! Metadata validation against a category schema.

use serde_json::Value as JsonValue;

use crate::schema::{FieldDef, FieldType, MetadataRecord, MetadataSchema};

/// Validate a candidate metadata record against a category's schema.
///
/// Returns **every** violation, not just the first, so callers can report all
/// problems at once. An empty result means the record is valid; an empty
/// schema accepts any record. Fields present in the record but absent from
/// the schema are tolerated.
pub fn validate_metadata(schema: &MetadataSchema, metadata: &MetadataRecord) -> Vec<String> {
    let mut violations = Vec::new();

    for (name, def) in schema.iter() {
        // JSON null counts as absent.
        let value = metadata.get(name).filter(|v| !v.is_null());

        let Some(value) = value else {
            if def.required {
                violations.push(format!("field '{name}' is required"));
            }
            continue;
        };

        check_field(name, def, value, &mut violations);
    }

    violations
}

fn check_field(name: &str, def: &FieldDef, value: &JsonValue, violations: &mut Vec<String>) {
    match def.field_type {
        FieldType::String => {
            let Some(s) = value.as_str() else {
                violations.push(format!("field '{name}' must be a string"));
                return;
            };
            let len = s.chars().count();
            if let Some(min) = def.min_length {
                if len < min {
                    violations.push(format!("field '{name}' must have at least {min} characters"));
                }
            }
            if let Some(max) = def.max_length {
                if len > max {
                    violations.push(format!("field '{name}' must have at most {max} characters"));
                }
            }
        }
        FieldType::Number => {
            let Some(n) = value.as_f64() else {
                violations.push(format!("field '{name}' must be a number"));
                return;
            };
            if let Some(min) = def.min {
                if n < min {
                    violations.push(format!("field '{name}' must be at least {min}"));
                }
            }
            if let Some(max) = def.max {
                if n > max {
                    violations.push(format!("field '{name}' must be at most {max}"));
                }
            }
        }
        FieldType::Boolean => {
            if !value.is_boolean() {
                violations.push(format!("field '{name}' must be a boolean"));
            }
        }
    }

    if let Some(allowed) = &def.allowed {
        if !allowed.contains(value) {
            violations.push(format!("field '{name}' has a value outside the allowed set"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rope_schema() -> MetadataSchema {
        MetadataSchema::new()
            .with_field(
                "length",
                FieldDef {
                    field_type: FieldType::Number,
                    required: true,
                    min: Some(0.0),
                    max: Some(200.0),
                    ..Default::default()
                },
            )
            .with_field(
                "diameter",
                FieldDef {
                    field_type: FieldType::String,
                    min_length: Some(2),
                    max_length: Some(10),
                    ..Default::default()
                },
            )
            .with_field(
                "dynamic",
                FieldDef {
                    field_type: FieldType::Boolean,
                    ..Default::default()
                },
            )
    }

    fn record(pairs: &[(&str, JsonValue)]) -> MetadataRecord {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn empty_schema_accepts_anything() {
        let schema = MetadataSchema::new();
        let md = record(&[("whatever", json!("value")), ("n", json!(3))]);
        assert!(validate_metadata(&schema, &md).is_empty());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let violations = validate_metadata(&rope_schema(), &record(&[]));
        assert_eq!(violations, vec!["field 'length' is required".to_string()]);
    }

    #[test]
    fn null_counts_as_absent() {
        let md = record(&[("length", JsonValue::Null)]);
        let violations = validate_metadata(&rope_schema(), &md);
        assert_eq!(violations, vec!["field 'length' is required".to_string()]);
    }

    #[test]
    fn type_mismatches_are_reported_per_field() {
        let md = record(&[
            ("length", json!("fifty")),
            ("diameter", json!(9.8)),
            ("dynamic", json!("yes")),
        ]);
        let violations = validate_metadata(&rope_schema(), &md);
        assert_eq!(violations.len(), 3);
        assert!(violations.iter().any(|v| v.contains("'length' must be a number")));
        assert!(violations.iter().any(|v| v.contains("'diameter' must be a string")));
        assert!(violations.iter().any(|v| v.contains("'dynamic' must be a boolean")));
    }

    #[test]
    fn numeric_bounds_are_inclusive() {
        let ok = record(&[("length", json!(200.0))]);
        assert!(validate_metadata(&rope_schema(), &ok).is_empty());

        let too_big = record(&[("length", json!(200.5))]);
        let violations = validate_metadata(&rope_schema(), &too_big);
        assert_eq!(violations, vec!["field 'length' must be at most 200".to_string()]);
    }

    #[test]
    fn string_length_bounds_are_enforced() {
        let md = record(&[("length", json!(50)), ("diameter", json!("9"))]);
        let violations = validate_metadata(&rope_schema(), &md);
        assert_eq!(
            violations,
            vec!["field 'diameter' must have at least 2 characters".to_string()]
        );
    }

    #[test]
    fn allowed_set_is_a_closed_enumeration() {
        let schema = MetadataSchema::new().with_field(
            "condition",
            FieldDef {
                field_type: FieldType::String,
                allowed: Some(vec![json!("new"), json!("worn")]),
                ..Default::default()
            },
        );
        let md = record(&[("condition", json!("destroyed"))]);
        let violations = validate_metadata(&schema, &md);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].contains("allowed set"));
    }

    #[test]
    fn extra_fields_outside_the_schema_are_tolerated() {
        let md = record(&[("length", json!(50)), ("color", json!("red"))]);
        assert!(validate_metadata(&rope_schema(), &md).is_empty());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: a number inside the declared bounds never violates.
            #[test]
            fn in_range_numbers_are_accepted(value in 0.0f64..=200.0) {
                let md = record(&[("length", json!(value))]);
                prop_assert!(validate_metadata(&rope_schema(), &md).is_empty());
            }

            /// Property: a number above the max always violates exactly once.
            #[test]
            fn out_of_range_numbers_are_rejected(value in 201.0f64..=10_000.0) {
                let md = record(&[("length", json!(value))]);
                let violations = validate_metadata(&rope_schema(), &md);
                prop_assert_eq!(violations.len(), 1);
            }
        }
    }
}
