use std::path::Path;

use regex::Regex;
use seqsub_schema::{CvList, FieldProcessor, FieldValue, IssueKind, ValidationResult};

/// Parse the manifest boolean convention: `yes`/`true`/`y` and
/// `no`/`false`/`n`, case-insensitively.
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "y" => Some(true),
        "no" | "false" | "n" => Some(false),
        _ => None,
    }
}

/// Checks a value against a controlled vocabulary and rewrites it to the
/// canonical key casing. Applying it to an already-canonical value is a
/// no-op.
pub struct CvProcessor {
    cv: CvList,
}

impl CvProcessor {
    pub fn new(cv: CvList) -> Self {
        CvProcessor { cv }
    }
}

impl FieldProcessor for CvProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        match self.cv.key(field.value()) {
            Some(key) => {
                if key != field.value() {
                    let canonical = key.to_string();
                    field.set_value(canonical);
                }
            }
            None => {
                result.error(
                    IssueKind::InvalidCvValue {
                        name: field.name().to_string(),
                        value: field.value().to_string(),
                        allowed: self.cv.keys().collect::<Vec<_>>().join(", "),
                    },
                    Some(field.origin().clone()),
                );
                field.mark_invalid();
            }
        }
    }
}

/// Checks a data-file value against an allow-list of suffixes,
/// case-insensitively.
pub struct FileSuffixProcessor {
    suffixes: Vec<String>,
}

impl FileSuffixProcessor {
    pub fn new(suffixes: &[&str]) -> Self {
        FileSuffixProcessor {
            suffixes: suffixes
                .iter()
                .map(|suffix| suffix.to_ascii_lowercase())
                .collect(),
        }
    }
}

impl FieldProcessor for FileSuffixProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        let value = field.value().to_ascii_lowercase();
        if !self.suffixes.iter().any(|suffix| value.ends_with(suffix)) {
            result.error(
                IssueKind::InvalidFileSuffix {
                    name: field.name().to_string(),
                    value: field.value().to_string(),
                    allowed: self.suffixes.join(", "),
                },
                Some(field.origin().clone()),
            );
            field.mark_invalid();
        }
    }
}

/// Restricts the base file name to printable ASCII.
pub struct AsciiFileNameProcessor {
    pattern: Regex,
}

impl AsciiFileNameProcessor {
    pub fn new() -> Self {
        AsciiFileNameProcessor {
            pattern: Regex::new(r"^[\x20-\x7E]+$").expect("static pattern compiles"),
        }
    }
}

impl Default for AsciiFileNameProcessor {
    fn default() -> Self {
        AsciiFileNameProcessor::new()
    }
}

impl FieldProcessor for AsciiFileNameProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        let base = Path::new(field.value())
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| field.value().to_string());
        if !self.pattern.is_match(&base) {
            result.error(
                IssueKind::InvalidFileName { value: base },
                Some(field.origin().clone()),
            );
            field.mark_invalid();
        }
    }
}

/// Requires the value to parse as an integer greater than zero.
pub struct PositiveIntegerProcessor;

impl FieldProcessor for PositiveIntegerProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        match field.value().trim().parse::<u64>() {
            Ok(parsed) if parsed > 0 => {}
            _ => {
                result.error(
                    IssueKind::InvalidPositiveInteger {
                        name: field.name().to_string(),
                        value: field.value().to_string(),
                    },
                    Some(field.origin().clone()),
                );
                field.mark_invalid();
            }
        }
    }
}

/// Requires the value to parse as a finite number greater than zero.
pub struct PositiveFloatProcessor;

impl FieldProcessor for PositiveFloatProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        match field.value().trim().parse::<f64>() {
            Ok(parsed) if parsed.is_finite() && parsed > 0.0 => {}
            _ => {
                result.error(
                    IssueKind::InvalidPositiveFloat {
                        name: field.name().to_string(),
                        value: field.value().to_string(),
                    },
                    Some(field.origin().clone()),
                );
                field.mark_invalid();
            }
        }
    }
}

/// Parses the boolean convention and rewrites the value to `true`/`false`.
pub struct BooleanProcessor;

impl FieldProcessor for BooleanProcessor {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue) {
        match parse_bool(field.value()) {
            Some(parsed) => field.set_value(if parsed { "true" } else { "false" }),
            None => {
                result.error(
                    IssueKind::InvalidBoolean {
                        name: field.name().to_string(),
                        value: field.value().to_string(),
                    },
                    Some(field.origin().clone()),
                );
                field.mark_invalid();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seqsub_schema::{FieldDefinition, Origin};
    use std::sync::Arc;

    fn field(name: &str, value: &str) -> FieldValue {
        let definition = Arc::new(
            FieldDefinition::meta(name)
                .description("test field")
                .optional()
                .build(),
        );
        FieldValue::new(definition, value, Origin::line("manifest.txt", 1))
    }

    #[test]
    fn cv_processor_canonicalizes_and_is_idempotent() {
        let processor = CvProcessor::new(CvList::from_values(["PacBio SMRT", "ILLUMINA"]));
        let mut result = ValidationResult::default();
        let mut occurrence = field("PLATFORM", "pacbio_smrt");

        processor.process(&mut result, &mut occurrence);
        assert_eq!(occurrence.value(), "PacBio SMRT");
        assert!(result.is_valid());

        processor.process(&mut result, &mut occurrence);
        assert_eq!(occurrence.value(), "PacBio SMRT");
        assert!(result.is_valid());
        assert!(occurrence.is_valid());
    }

    #[test]
    fn cv_processor_rejects_unknown_terms() {
        let processor = CvProcessor::new(CvList::from_values(["ILLUMINA"]));
        let mut result = ValidationResult::default();
        let mut occurrence = field("PLATFORM", "solid");

        processor.process(&mut result, &mut occurrence);
        assert!(!occurrence.is_valid());
        assert_eq!(result.issues()[0].code(), "invalid-cv-value");
    }

    #[test]
    fn suffix_processor_is_case_insensitive() {
        let processor = FileSuffixProcessor::new(&[".fastq.gz", ".fastq.bz2"]);
        let mut result = ValidationResult::default();

        let mut ok = field("FASTQ", "reads/sample.FASTQ.GZ");
        processor.process(&mut result, &mut ok);
        assert!(ok.is_valid());

        let mut bad = field("FASTQ", "reads/sample.fq");
        processor.process(&mut result, &mut bad);
        assert!(!bad.is_valid());
        assert_eq!(result.error_count(), 1);
    }

    #[test]
    fn ascii_processor_checks_the_base_name_only() {
        let processor = AsciiFileNameProcessor::new();
        let mut result = ValidationResult::default();

        let mut ok = field("FASTA", "dir-β/assembly.fasta.gz");
        processor.process(&mut result, &mut ok);
        assert!(ok.is_valid());

        let mut bad = field("FASTA", "dir/assembly-β.fasta.gz");
        processor.process(&mut result, &mut bad);
        assert!(!bad.is_valid());
        assert_eq!(result.issues()[0].code(), "invalid-file-name");
    }

    #[test]
    fn numeric_processors_enforce_positive_values() {
        let mut result = ValidationResult::default();

        let mut zero = field("MINGAPLENGTH", "0");
        PositiveIntegerProcessor.process(&mut result, &mut zero);
        assert!(!zero.is_valid());

        let mut coverage = field("COVERAGE", "12.5");
        PositiveFloatProcessor.process(&mut result, &mut coverage);
        assert!(coverage.is_valid());

        let mut negative = field("COVERAGE", "-1");
        PositiveFloatProcessor.process(&mut result, &mut negative);
        assert!(!negative.is_valid());
    }

    #[test]
    fn boolean_processor_normalizes_accepted_spellings() {
        let mut result = ValidationResult::default();

        let mut yes = field("TPA", "Y");
        BooleanProcessor.process(&mut result, &mut yes);
        assert_eq!(yes.value(), "true");

        let mut no = field("TPA", "no");
        BooleanProcessor.process(&mut result, &mut no);
        assert_eq!(no.value(), "false");

        let mut bad = field("TPA", "maybe");
        BooleanProcessor.process(&mut result, &mut bad);
        assert!(!bad.is_valid());
        assert_eq!(result.issues()[0].code(), "invalid-boolean");
    }
}
