//! Plain and JSON renderers for validation reports and field listings.

use seqsub_manifest::ManifestReaderResult;
use seqsub_readers::SubmissionKind;
use seqsub_schema::{FieldDefinition, FieldType, Origin};
use serde_json::json;

pub(crate) fn render_plain(
    result: &ManifestReaderResult,
    summary: Option<&str>,
    quiet: bool,
) -> String {
    let mut lines: Vec<String> = result
        .validation()
        .issues()
        .iter()
        .map(ToString::to_string)
        .collect();

    if !quiet {
        if result.is_valid() {
            match summary {
                Some(summary) => lines.push(format!("manifest is valid: {summary}")),
                None => lines.push("manifest is valid".to_string()),
            }
        } else {
            lines.push(format!(
                "manifest is invalid: {} error(s), {} warning(s)",
                result.validation().error_count(),
                result.validation().warning_count()
            ));
        }
    }

    lines.join("\n")
}

pub(crate) fn render_json(result: &ManifestReaderResult, summary: Option<&str>) -> String {
    let issues: Vec<_> = result
        .validation()
        .issues()
        .iter()
        .map(|issue| {
            json!({
                "severity": issue.severity.to_string(),
                "code": issue.code(),
                "message": issue.kind.to_string(),
                "origin": issue.origin.as_ref().map(origin_json),
            })
        })
        .collect();

    let report = json!({
        "valid": result.is_valid(),
        "matched_group": result.matched_group(),
        "summary": summary,
        "issues": issues,
    });
    serde_json::to_string_pretty(&report).unwrap_or_else(|_| report.to_string())
}

fn origin_json(origin: &Origin) -> serde_json::Value {
    match origin {
        Origin::Line { file, line } => json!({
            "file": file.display().to_string(),
            "line": line,
        }),
        Origin::JsonPath { file, pointer } => json!({
            "file": file.display().to_string(),
            "pointer": pointer,
        }),
    }
}

/// Field listing for one submission type: every visible field with its
/// accepted cardinality, plus the declared data-file combinations.
pub(crate) fn render_fields(kind: SubmissionKind) -> String {
    let schema = kind.schema();
    let visible: Vec<_> = schema
        .fields()
        .iter()
        .filter(|field| field.recommended_max() != Some(0))
        .collect();

    let name_width = visible
        .iter()
        .map(|field| field.name().len())
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("{kind} manifest fields:")];
    for field in &visible {
        lines.push(format!(
            "  {:<name_width$}  {:<5}  {}{}",
            field.name(),
            cardinality(field),
            field.description(),
            annotations(field),
        ));
    }

    if !schema.groups().is_empty() {
        lines.push(String::new());
        lines.push("data file combinations (exactly one must be supplied):".to_string());
        for group in schema.groups() {
            lines.push(format!("  {group}"));
        }
    }

    lines.join("\n")
}

fn cardinality(field: &FieldDefinition) -> String {
    match field.max_count() {
        Some(max) => format!("{}..{}", field.min_count(), max),
        None => format!("{}..*", field.min_count()),
    }
}

fn annotations(field: &FieldDefinition) -> String {
    let mut notes = Vec::new();
    if field.field_type() == FieldType::File {
        notes.push("file".to_string());
    }
    if field.recommended_min() > 0 && field.min_count() == 0 {
        notes.push("recommended".to_string());
    }
    if let Some(synonym) = field.synonym() {
        notes.push(format!("synonym: {synonym}"));
    }
    if notes.is_empty() {
        String::new()
    } else {
        format!(" [{}]", notes.join(", "))
    }
}
