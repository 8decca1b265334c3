use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};

use seqsub_schema::{
    FieldDefinition, FieldSchema, FieldValue, IssueKind, Origin, ValidationResult,
};

use crate::parse::{new_field, unknown_field};

/// Field name given the special object treatment: its object value must
/// carry an `alias` key and is stored as one opaque JSON-text occurrence.
const SAMPLE_FIELD: &str = "SAMPLE";

/// Parse a JSON manifest: one object whose keys are matched like key/value
/// names. Unknown keys and malformed values are recorded and parsing
/// continues with the rest of the document.
pub(crate) fn parse_json(
    schema: &FieldSchema,
    content: &str,
    source: &Path,
    input_dir: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    let document: Value = match serde_json::from_str(content) {
        Ok(document) => document,
        Err(err) => {
            result.error(
                IssueKind::MalformedJson {
                    detail: err.to_string(),
                },
                Some(Origin::json(source, "/")),
            );
            return;
        }
    };
    let Some(object) = document.as_object() else {
        result.error(
            IssueKind::MalformedJson {
                detail: "top-level value is not an object".to_string(),
            },
            Some(Origin::json(source, "/")),
        );
        return;
    };

    for (key, entry) in object {
        let pointer = format!("/{key}");
        let Some(definition) = schema.find(key) else {
            unknown_field(schema, key, Origin::json(source, pointer), result);
            continue;
        };

        match entry {
            Value::Array(items) => {
                for (idx, item) in items.iter().enumerate() {
                    let item_pointer = format!("{pointer}/{idx}");
                    match item {
                        Value::Object(map) => add_attributed(
                            definition,
                            map,
                            &item_pointer,
                            source,
                            input_dir,
                            fields,
                            result,
                        ),
                        other => {
                            add_scalar(definition, other, &item_pointer, source, input_dir, fields, result)
                        }
                    }
                }
            }
            Value::Object(map) => {
                if definition.matches(SAMPLE_FIELD) {
                    add_sample(definition, entry, map, &pointer, source, fields, result);
                } else {
                    add_attributed(definition, map, &pointer, source, input_dir, fields, result);
                }
            }
            other => add_scalar(definition, other, &pointer, source, input_dir, fields, result),
        }
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

fn add_scalar(
    definition: &Arc<FieldDefinition>,
    value: &Value,
    pointer: &str,
    source: &Path,
    input_dir: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    let origin = Origin::json(source, pointer);
    match scalar_text(value) {
        Some(text) => fields.push(new_field(definition, &text, origin, input_dir, result)),
        None => result.error(
            IssueKind::InvalidJsonValue {
                field: definition.name().to_string(),
                detail: "expected a scalar value".to_string(),
            },
            Some(origin),
        ),
    }
}

/// A `{"value": ..., "attributes": {...}}` object: the scalar under `value`
/// becomes the occurrence, each attribute key is matched against the
/// definition's nested attribute definitions.
fn add_attributed(
    definition: &Arc<FieldDefinition>,
    map: &Map<String, Value>,
    pointer: &str,
    source: &Path,
    input_dir: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    let origin = Origin::json(source, pointer);
    let Some(raw_value) = map.get("value") else {
        result.error(
            IssueKind::InvalidJsonValue {
                field: definition.name().to_string(),
                detail: "object is missing a 'value' key".to_string(),
            },
            Some(origin),
        );
        return;
    };
    let Some(text) = scalar_text(raw_value) else {
        result.error(
            IssueKind::InvalidJsonValue {
                field: definition.name().to_string(),
                detail: "'value' must be a scalar".to_string(),
            },
            Some(origin),
        );
        return;
    };

    let mut field = new_field(definition, &text, origin, input_dir, result);

    if let Some(attributes) = map.get("attributes") {
        let attributes_pointer = format!("{pointer}/attributes");
        match attributes.as_object() {
            Some(entries) => {
                for (key, value) in entries {
                    add_attribute(
                        definition,
                        &mut field,
                        key,
                        value,
                        &format!("{attributes_pointer}/{key}"),
                        source,
                        result,
                    );
                }
            }
            None => result.error(
                IssueKind::InvalidJsonValue {
                    field: definition.name().to_string(),
                    detail: "'attributes' must be an object".to_string(),
                },
                Some(Origin::json(source, attributes_pointer)),
            ),
        }
    }

    fields.push(field);
}

fn add_attribute(
    definition: &Arc<FieldDefinition>,
    field: &mut FieldValue,
    key: &str,
    value: &Value,
    pointer: &str,
    source: &Path,
    result: &mut ValidationResult,
) {
    let Some(attribute_definition) = definition
        .attributes()
        .iter()
        .find(|attribute| attribute.matches(key))
    else {
        result.error(
            IssueKind::UnknownAttribute {
                field: definition.name().to_string(),
                name: key.to_string(),
            },
            Some(Origin::json(source, pointer)),
        );
        return;
    };

    let mut push_scalar = |value: &Value, pointer: String, result: &mut ValidationResult| {
        let origin = Origin::json(source, pointer);
        match scalar_text(value) {
            Some(text) => field.push_attribute(FieldValue::new(
                attribute_definition.clone(),
                text,
                origin,
            )),
            None => result.error(
                IssueKind::InvalidJsonValue {
                    field: attribute_definition.name().to_string(),
                    detail: "expected a scalar value".to_string(),
                },
                Some(origin),
            ),
        }
    };

    match value {
        Value::Array(items) => {
            for (idx, item) in items.iter().enumerate() {
                push_scalar(item, format!("{pointer}/{idx}"), result);
            }
        }
        other => push_scalar(other, pointer.to_string(), result),
    }
}

/// The `sample` object special case: require an `alias` key, then keep the
/// whole object as one opaque JSON-text occurrence for downstream lookup.
fn add_sample(
    definition: &Arc<FieldDefinition>,
    entry: &Value,
    map: &Map<String, Value>,
    pointer: &str,
    source: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    let origin = Origin::json(source, pointer);
    if !map.contains_key("alias") {
        result.error(IssueKind::MissingSampleAlias, Some(origin));
        return;
    }
    fields.push(FieldValue::new(
        definition.clone(),
        entry.to_string(),
        origin,
    ));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FieldSchema {
        FieldSchema::builder()
            .field(
                FieldDefinition::meta("NAME")
                    .description("Unique name")
                    .required()
                    .build(),
            )
            .field(
                FieldDefinition::meta("SAMPLE")
                    .description("Sample reference or object")
                    .optional()
                    .build(),
            )
            .field(
                FieldDefinition::meta("AUTHORS")
                    .description("Author list")
                    .optional_many(10)
                    .attributes([FieldDefinition::attribute("ORCID")
                        .description("Author identifier")
                        .optional()
                        .build()])
                    .build(),
            )
            .build()
    }

    fn parse(content: &str) -> (Vec<FieldValue>, ValidationResult) {
        let schema = schema();
        let mut fields = Vec::new();
        let mut result = ValidationResult::default();
        parse_json(
            &schema,
            content,
            Path::new("manifest.json"),
            Path::new("."),
            &mut fields,
            &mut result,
        );
        (fields, result)
    }

    #[test]
    fn scalars_arrays_and_numbers_become_occurrences() {
        let (fields, result) =
            parse(r#"{"name": "asm1", "authors": ["a", "b"], "sample": 42}"#);
        assert!(result.is_valid());
        let values: Vec<_> = fields.iter().map(|f| (f.name(), f.value())).collect();
        assert_eq!(
            values,
            vec![
                ("NAME", "asm1"),
                ("AUTHORS", "a"),
                ("AUTHORS", "b"),
                ("SAMPLE", "42")
            ]
        );
        assert_eq!(
            fields[2].origin(),
            &Origin::json(Path::new("manifest.json"), "/authors/1")
        );
    }

    #[test]
    fn attributed_objects_carry_nested_values() {
        let (fields, result) = parse(
            r#"{"authors": [{"value": "Doe J", "attributes": {"orcid": "0000-0001"}}]}"#,
        );
        assert!(result.is_valid());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value(), "Doe J");
        assert_eq!(fields[0].attributes().len(), 1);
        assert_eq!(fields[0].attributes()[0].name(), "ORCID");
        assert_eq!(fields[0].attributes()[0].value(), "0000-0001");
    }

    #[test]
    fn unknown_attribute_is_recorded_but_field_is_kept() {
        let (fields, result) =
            parse(r#"{"authors": {"value": "Doe J", "attributes": {"email": "x"}}}"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.issues()[0].code(), "unknown-attribute");
    }

    #[test]
    fn sample_object_requires_alias() {
        let (fields, result) = parse(r#"{"sample": {"taxon_id": 9606}}"#);
        assert!(fields.is_empty());
        assert_eq!(result.issues()[0].code(), "missing-sample-alias");

        let (fields, result) = parse(r#"{"sample": {"alias": "s1", "taxon_id": 9606}}"#);
        assert!(result.is_valid());
        assert_eq!(fields.len(), 1);
        assert!(fields[0].value().contains("\"alias\""));
    }

    #[test]
    fn malformed_document_and_unknown_keys_are_reported() {
        let (_, result) = parse("{not json");
        assert_eq!(result.issues()[0].code(), "malformed-json");

        let (fields, result) = parse(r#"{"name": "asm1", "bogus": 1, "sample": null}"#);
        assert_eq!(fields.len(), 1);
        assert_eq!(result.error_count(), 2);
        let codes: Vec<_> = result.issues().iter().map(|issue| issue.code()).collect();
        assert!(codes.contains(&"unknown-field"));
        assert!(codes.contains(&"invalid-json-value"));
    }
}
