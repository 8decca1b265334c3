use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use regex::Regex;
use seqsub_schema::{
    FieldDefinition, FieldSchema, FieldType, FieldValue, IssueKind, Origin, ValidationResult,
};
use strsim::normalized_levenshtein;

use crate::json;

/// Serialization a manifest was written in.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Format {
    KeyValue,
    Json,
}

/// Detect the format by sniffing the first non-blank character: `{` means a
/// JSON document, anything else a key/value file.
pub fn detect_format(content: &str) -> Format {
    match content.chars().find(|ch| !ch.is_whitespace()) {
        Some('{') => Format::Json,
        _ => Format::KeyValue,
    }
}

/// Parse manifest text into field occurrences against `schema`, appending
/// findings to `result`. The caller owns reading the text and choosing
/// `source` for provenance.
pub(crate) fn parse_content(
    schema: &FieldSchema,
    content: &str,
    source: &Path,
    input_dir: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    match detect_format(content) {
        Format::Json => json::parse_json(schema, content, source, input_dir, fields, result),
        Format::KeyValue => parse_key_value(schema, content, source, input_dir, fields, result),
    }
}

fn parse_key_value(
    schema: &FieldSchema,
    content: &str,
    source: &Path,
    input_dir: &Path,
    fields: &mut Vec<FieldValue>,
    result: &mut ValidationResult,
) {
    let comment = Regex::new(r"^\s*(#|;|//)").expect("static pattern compiles");

    for (idx, raw_line) in content.lines().enumerate() {
        let line_number = idx + 1;
        let line = raw_line.trim();
        if line.is_empty() || comment.is_match(raw_line) {
            continue;
        }

        let (raw_name, rest) = match line.find(char::is_whitespace) {
            Some(pos) => (&line[..pos], line[pos..].trim()),
            None => (line, ""),
        };
        let name = raw_name.trim_end_matches(':').trim().to_uppercase();
        let origin = Origin::line(source, line_number);

        let Some(definition) = schema.find(&name) else {
            unknown_field(schema, &name, origin, result);
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let field = new_field(definition, rest, origin, input_dir, result);
        fields.push(field);
    }
}

/// Construct an occurrence; data-file fields are path-checked immediately,
/// tried as given and then against the manifest's input directory, and the
/// value is rewritten to the resolved path.
pub(crate) fn new_field(
    definition: &Arc<FieldDefinition>,
    value: &str,
    origin: Origin,
    input_dir: &Path,
    result: &mut ValidationResult,
) -> FieldValue {
    let mut field = FieldValue::new(definition.clone(), value, origin);
    if definition.field_type() == FieldType::File {
        match resolve_data_file(value, input_dir) {
            Some(resolved) => field.set_value(resolved.to_string_lossy().into_owned()),
            None => {
                result.error(
                    IssueKind::InvalidFilePath {
                        name: definition.name().to_string(),
                        value: value.to_string(),
                    },
                    Some(field.origin().clone()),
                );
                field.mark_invalid();
            }
        }
    }
    field
}

fn resolve_data_file(value: &str, input_dir: &Path) -> Option<PathBuf> {
    let given = PathBuf::from(value);
    for candidate in [given.clone(), input_dir.join(&given)] {
        if candidate.is_file() && File::open(&candidate).is_ok() {
            return Some(candidate);
        }
    }
    None
}

/// Record an unknown-field error, suggesting the closest declared field
/// when the similarity clears a threshold.
pub(crate) fn unknown_field(
    schema: &FieldSchema,
    name: &str,
    origin: Origin,
    result: &mut ValidationResult,
) {
    let suggestion = schema
        .fields()
        .iter()
        .map(|field| {
            (
                field.name(),
                normalized_levenshtein(&name.to_uppercase(), field.name()),
            )
        })
        .filter(|(_, score)| *score > 0.6)
        .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(candidate, _)| candidate.to_string());

    result.error(
        IssueKind::UnknownField {
            name: name.to_string(),
            suggestion,
        },
        Some(origin),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsub_schema::Severity;

    fn schema() -> FieldSchema {
        FieldSchema::builder()
            .field(
                FieldDefinition::meta("NAME")
                    .description("Unique name")
                    .required()
                    .build(),
            )
            .field(
                FieldDefinition::meta("STUDY")
                    .description("Study accession")
                    .required()
                    .build(),
            )
            .build()
    }

    fn parse(content: &str) -> (Vec<FieldValue>, ValidationResult) {
        let schema = schema();
        let mut fields = Vec::new();
        let mut result = ValidationResult::default();
        parse_content(
            &schema,
            content,
            Path::new("manifest.txt"),
            Path::new("."),
            &mut fields,
            &mut result,
        );
        (fields, result)
    }

    #[test]
    fn detects_json_by_first_non_blank_character() {
        assert_eq!(detect_format("  \n {\"a\": 1}"), Format::Json);
        assert_eq!(detect_format("NAME foo"), Format::KeyValue);
        assert_eq!(detect_format(""), Format::KeyValue);
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let (fields, result) = parse("\n# comment\n  ; another\n// third\nNAME foo\n");
        assert!(result.is_valid());
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].value(), "foo");
        assert_eq!(fields[0].origin(), &Origin::line("manifest.txt", 5));
    }

    #[test]
    fn strips_trailing_colon_and_splits_on_first_whitespace_run() {
        let (fields, result) = parse("name:\tSpur ostrea  edulis\n");
        assert!(result.is_valid());
        assert_eq!(fields[0].name(), "NAME");
        assert_eq!(fields[0].value(), "Spur ostrea  edulis");
    }

    #[test]
    fn value_less_line_produces_no_occurrence() {
        let (fields, result) = parse("NAME\n");
        assert!(fields.is_empty());
        assert!(result.is_valid());
    }

    #[test]
    fn unknown_field_reports_with_suggestion() {
        let (fields, result) = parse("STUDDY S1\n");
        assert!(fields.is_empty());
        assert_eq!(result.error_count(), 1);
        let issue = &result.issues()[0];
        assert_eq!(issue.severity, Severity::Error);
        assert_eq!(issue.code(), "unknown-field");
        assert!(issue.to_string().contains("Did you mean 'STUDY'?"));
    }
}
