use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use std::sync::Arc;

use seqsub_schema::{
    render_expected, FieldDefinition, FieldSchema, FieldType, FieldValue, IssueKind,
    ValidationResult,
};

/// Run the validation passes in their fixed order: minimum counts, maximum
/// counts, recommended-field warnings, the processor pipeline, file-group
/// matching and the unique-filename check. Every pass appends to `result`;
/// none stops the ones after it. Returns the name of the matched file
/// group, if any.
pub(crate) fn validate(
    schema: &FieldSchema,
    fields: &mut [FieldValue],
    result: &mut ValidationResult,
) -> Option<String> {
    check_minimum_counts(schema, fields, result);
    check_maximum_counts(schema, fields, result);
    check_recommended_fields(schema, fields, result);
    run_processors(schema, fields, result);
    let matched = check_file_groups(schema, fields, result);
    check_unique_file_names(fields, result);
    matched
}

fn occurrences(fields: &[FieldValue], definition: &Arc<FieldDefinition>) -> usize {
    fields
        .iter()
        .filter(|field| Arc::ptr_eq(field.definition(), definition))
        .count()
}

fn check_minimum_counts(
    schema: &FieldSchema,
    fields: &[FieldValue],
    result: &mut ValidationResult,
) {
    for definition in schema.fields() {
        if definition.min_count() > 0
            && occurrences(fields, definition) < definition.min_count() as usize
        {
            result.error(
                IssueKind::MissingField {
                    name: definition.name().to_string(),
                },
                None,
            );
        }
    }
}

fn check_maximum_counts(
    schema: &FieldSchema,
    fields: &[FieldValue],
    result: &mut ValidationResult,
) {
    for definition in schema.fields() {
        let Some(max) = definition.max_count() else {
            continue;
        };
        let count = occurrences(fields, definition);
        if count > max as usize {
            result.error(
                IssueKind::TooManyFields {
                    name: definition.name().to_string(),
                    max,
                    count,
                },
                None,
            );
        }
    }
}

fn check_recommended_fields(
    schema: &FieldSchema,
    fields: &[FieldValue],
    result: &mut ValidationResult,
) {
    for definition in schema.fields() {
        if definition.recommended_min() > 0
            && definition.min_count() == 0
            && occurrences(fields, definition) == 0
        {
            result.warning(
                IssueKind::MissingRecommendedField {
                    name: definition.name().to_string(),
                },
                None,
            );
        }
    }
}

fn run_processors(schema: &FieldSchema, fields: &mut [FieldValue], result: &mut ValidationResult) {
    for definition in schema.fields() {
        for field in fields
            .iter_mut()
            .filter(|field| Arc::ptr_eq(field.definition(), definition))
        {
            apply_processors(definition, field, result);
        }
    }
}

fn apply_processors(
    definition: &Arc<FieldDefinition>,
    field: &mut FieldValue,
    result: &mut ValidationResult,
) {
    for processor in definition.processors() {
        processor.process(result, field);
    }
    for attribute_definition in definition.attributes() {
        for attribute in field
            .attributes_mut()
            .iter_mut()
            .filter(|attribute| Arc::ptr_eq(attribute.definition(), attribute_definition))
        {
            apply_processors(attribute_definition, attribute, result);
        }
    }
}

fn check_file_groups(
    schema: &FieldSchema,
    fields: &[FieldValue],
    result: &mut ValidationResult,
) -> Option<String> {
    if schema.groups().is_empty() {
        return None;
    }

    let mut present: BTreeMap<String, usize> = BTreeMap::new();
    for field in fields {
        if field.definition().field_type() == FieldType::File {
            *present.entry(field.name().to_string()).or_default() += 1;
        }
    }

    if present.is_empty() {
        result.error(
            IssueKind::NoDataFiles {
                expected: render_expected(schema.groups()),
            },
            None,
        );
        return None;
    }

    // First declared group that matches wins.
    match schema.groups().iter().find(|group| group.matches(&present)) {
        Some(group) => Some(group.name().to_string()),
        None => {
            result.error(
                IssueKind::InvalidFileGroup {
                    expected: render_expected(schema.groups()),
                },
                None,
            );
            None
        }
    }
}

fn check_unique_file_names(fields: &[FieldValue], result: &mut ValidationResult) {
    let mut seen = HashSet::new();
    for field in fields {
        if field.definition().field_type() != FieldType::File {
            continue;
        }
        let Some(base) = Path::new(field.value()).file_name() else {
            continue;
        };
        let base = base.to_string_lossy().into_owned();
        if !seen.insert(base.clone()) {
            // One error for the whole manifest, not one per duplicate.
            result.error(IssueKind::DuplicateFileName { name: base }, None);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsub_schema::{FileCount, FileGroup, Origin};

    fn schema() -> FieldSchema {
        FieldSchema::builder()
            .field(
                FieldDefinition::meta("NAME")
                    .description("Unique name")
                    .required()
                    .build(),
            )
            .field(
                FieldDefinition::meta("PLATFORM")
                    .description("Sequencing platform")
                    .optional()
                    .recommended()
                    .build(),
            )
            .field(
                FieldDefinition::file("FASTQ")
                    .description("Fastq file")
                    .optional_many(2)
                    .build(),
            )
            .field(
                FieldDefinition::file("BAM")
                    .description("Bam file")
                    .optional()
                    .build(),
            )
            .field(
                FieldDefinition::file("CRAM")
                    .description("Cram file")
                    .optional()
                    .build(),
            )
            .group(FileGroup::new("fastq").with(FileCount::between("FASTQ", 1, 2)))
            .group(FileGroup::new("cram").with(FileCount::exactly("CRAM", 1)))
            .group(FileGroup::new("bam").with(FileCount::exactly("BAM", 1)))
            .build()
    }

    fn occurrence(schema: &FieldSchema, name: &str, value: &str, line: usize) -> FieldValue {
        FieldValue::new(
            schema.find(name).expect("declared field").clone(),
            value,
            Origin::line("manifest.txt", line),
        )
    }

    fn errors_with_code(result: &ValidationResult, code: &str) -> usize {
        result
            .issues()
            .iter()
            .filter(|issue| issue.code() == code)
            .count()
    }

    #[test]
    fn missing_mandatory_field_yields_exactly_one_error() {
        let schema = schema();
        let mut fields = vec![occurrence(&schema, "FASTQ", "a.fastq.gz", 1)];
        let mut result = ValidationResult::default();
        validate(&schema, &mut fields, &mut result);
        assert_eq!(errors_with_code(&result, "missing-field"), 1);
    }

    #[test]
    fn too_many_occurrences_yield_exactly_one_error() {
        let schema = schema();
        let mut fields = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "NAME", "b", 2),
            occurrence(&schema, "NAME", "c", 3),
            occurrence(&schema, "FASTQ", "a.fastq.gz", 4),
        ];
        let mut result = ValidationResult::default();
        validate(&schema, &mut fields, &mut result);
        assert_eq!(errors_with_code(&result, "too-many-fields"), 1);
        assert_eq!(errors_with_code(&result, "missing-field"), 0);
    }

    #[test]
    fn absent_recommended_field_warns_without_failing() {
        let schema = schema();
        let mut fields = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "FASTQ", "a.fastq.gz", 2),
        ];
        let mut result = ValidationResult::default();
        validate(&schema, &mut fields, &mut result);
        assert!(result.is_valid());
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn file_group_matching_follows_declaration_order() {
        let schema = schema();

        let mut two_fastq = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "FASTQ", "a.fastq.gz", 2),
            occurrence(&schema, "FASTQ", "b.fastq.gz", 3),
        ];
        let mut result = ValidationResult::default();
        let matched = validate(&schema, &mut two_fastq, &mut result);
        assert!(result.is_valid());
        assert_eq!(matched.as_deref(), Some("fastq"));

        let mut one_cram = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "CRAM", "a.cram", 2),
        ];
        let mut result = ValidationResult::default();
        let matched = validate(&schema, &mut one_cram, &mut result);
        assert_eq!(matched.as_deref(), Some("cram"));

        let mut mixed = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "FASTQ", "a.fastq.gz", 2),
            occurrence(&schema, "BAM", "a.bam", 3),
        ];
        let mut result = ValidationResult::default();
        let matched = validate(&schema, &mut mixed, &mut result);
        assert!(matched.is_none());
        assert_eq!(errors_with_code(&result, "invalid-file-group"), 1);
        assert!(result.issues().iter().any(|issue| issue
            .to_string()
            .contains("[1-2 \"FASTQ\" file(s)] or [1 \"CRAM\" file(s)] or [1 \"BAM\" file(s)]")));
    }

    #[test]
    fn absent_data_files_report_expected_groups() {
        let schema = schema();
        let mut fields = vec![occurrence(&schema, "NAME", "a", 1)];
        let mut result = ValidationResult::default();
        validate(&schema, &mut fields, &mut result);
        assert_eq!(errors_with_code(&result, "no-data-files"), 1);
        assert!(result.issues().iter().any(|issue| issue
            .to_string()
            .contains("no data files supplied, expected one of:")));
    }

    #[test]
    fn duplicate_base_names_yield_one_error_across_definitions() {
        let schema = schema();
        let mut fields = vec![
            occurrence(&schema, "NAME", "a", 1),
            occurrence(&schema, "FASTQ", "dir1/reads.fastq.gz", 2),
            occurrence(&schema, "FASTQ", "dir2/reads.fastq.gz", 3),
            occurrence(&schema, "BAM", "dir3/reads.fastq.gz", 4),
        ];
        let mut result = ValidationResult::default();
        validate(&schema, &mut fields, &mut result);
        assert_eq!(errors_with_code(&result, "duplicate-file-name"), 1);
    }
}
