use std::path::Path;

use seqsub_manifest::{FileSuffixProcessor, ManifestReader};
use seqsub_schema::{
    FieldDefinition, FieldSchema, FieldValue, FileCount, FileGroup, Origin, Severity,
};
use seqsub_test_support::{data_file, demo_schema, write_file};
use tempfile::TempDir;

fn read(dir: &TempDir, manifest: &Path) -> seqsub_manifest::ManifestReaderResult {
    ManifestReader::new(demo_schema()).read(dir.path(), manifest)
}

#[test]
fn end_to_end_key_value_manifest() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.fastq.gz");
    data_file(dir.path(), "b.fastq.gz");
    let manifest = write_file(
        dir.path(),
        "manifest.txt",
        "NAME\tfoo\nSTUDY\tS1\nFASTQ\ta.fastq.gz\nFASTQ\tb.fastq.gz\n",
    );

    let schema = FieldSchema::builder()
        .field(
            FieldDefinition::meta("NAME")
                .description("Unique submission name")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::meta("STUDY")
                .description("Study accession")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::file("FASTQ")
                .description("Fastq file")
                .optional_many(2)
                .processor(FileSuffixProcessor::new(&[".fastq.gz", ".fastq.bz2"]))
                .build(),
        )
        .group(FileGroup::new("fastq").with(FileCount::between("FASTQ", 1, 2)))
        .build();

    let result = ManifestReader::new(schema).read(dir.path(), &manifest);

    assert!(
        result.is_valid(),
        "unexpected findings: {:?}",
        result.validation().issues()
    );
    assert_eq!(result.value_of("NAME"), Some("foo"));
    assert_eq!(result.values_of("FASTQ").len(), 2);
    assert_eq!(result.matched_group(), Some("fastq"));

    // Data-file values are rewritten to their resolved locations.
    for path in result.files_of("FASTQ") {
        assert!(path.is_file(), "expected resolved path, got {}", path.display());
    }
}

#[test]
fn info_file_fields_merge_with_reset_line_numbers() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.fastq.gz");
    write_file(dir.path(), "common.txt", "STUDY\tS1\n");
    let manifest = write_file(
        dir.path(),
        "manifest.txt",
        "NAME\tfoo\nINFO\tcommon.txt\nFASTQ\ta.fastq.gz\n",
    );

    let result = read(&dir, &manifest);

    assert!(
        result.is_valid(),
        "unexpected findings: {:?}",
        result.validation().issues()
    );
    assert!(
        result.fields().iter().all(|field| field.name() != "INFO"),
        "INFO occurrences must be stripped after expansion"
    );
    let names: Vec<_> = result.fields().iter().map(FieldValue::name).collect();
    assert_eq!(names, vec!["NAME", "FASTQ", "STUDY"]);

    let study = result.field("STUDY").expect("merged field");
    match study.origin() {
        Origin::Line { file, line } => {
            assert!(file.ends_with("common.txt"));
            assert_eq!(*line, 1);
        }
        other => panic!("unexpected origin {other:?}"),
    }
}

#[test]
fn nested_info_files_merge_once_and_cycles_stop() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.cram");
    let outer = dir.path().join("outer.txt");
    let inner = dir.path().join("inner.txt");
    write_file(
        dir.path(),
        "outer.txt",
        &format!("STUDY\tS1\nINFO\t{}\n", inner.display()),
    );
    write_file(
        dir.path(),
        "inner.txt",
        &format!("NAME\tfoo\nINFO\t{}\n", outer.display()),
    );
    let manifest = write_file(
        dir.path(),
        "manifest.txt",
        &format!("CRAM\ta.cram\nINFO\t{}\n", outer.display()),
    );

    let result = read(&dir, &manifest);

    assert!(
        result.is_valid(),
        "unexpected findings: {:?}",
        result.validation().issues()
    );
    assert_eq!(result.value_of("NAME"), Some("foo"));
    assert_eq!(result.value_of("STUDY"), Some("S1"));
}

#[test]
fn unreadable_manifest_reports_once_and_skips_validation() {
    let dir = TempDir::new().expect("tempdir");
    let result = read(&dir, &dir.path().join("absent.txt"));

    assert_eq!(result.validation().issues().len(), 1);
    let issue = &result.validation().issues()[0];
    assert_eq!(issue.code(), "unreadable-file");
    assert_eq!(issue.severity, Severity::Error);
    assert!(result.fields().is_empty());
}

#[test]
fn unreadable_info_file_reports_but_validation_continues() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.bam");
    data_file(dir.path(), "missing-info.txt");
    let manifest = write_file(
        dir.path(),
        "manifest.txt",
        "NAME\tfoo\nSTUDY\tS1\nBAM\ta.bam\nINFO\tmissing-info.txt\n",
    );
    // Remove the info file after the manifest referenced it, so the path
    // resolves at parse time but fails to read.
    std::fs::remove_file(dir.path().join("missing-info.txt")).expect("remove info file");

    let result = read(&dir, &manifest);

    assert!(!result.is_valid());
    assert!(result
        .validation()
        .issues()
        .iter()
        .any(|issue| issue.code() == "invalid-file-path" || issue.code() == "unreadable-file"));
    // The remaining fields still validated.
    assert_eq!(result.value_of("NAME"), Some("foo"));
    assert_eq!(result.matched_group(), Some("bam"));
}

#[test]
fn missing_data_file_is_reported_at_parse_time() {
    let dir = TempDir::new().expect("tempdir");
    let manifest = write_file(
        dir.path(),
        "manifest.txt",
        "NAME\tfoo\nSTUDY\tS1\nFASTQ\tnot-there.fastq.gz\n",
    );

    let result = read(&dir, &manifest);

    assert!(!result.is_valid());
    assert!(result
        .validation()
        .issues()
        .iter()
        .any(|issue| issue.code() == "invalid-file-path"));
    // The occurrence is kept, marked invalid, so typed access skips it.
    assert_eq!(result.fields().iter().filter(|f| f.name() == "FASTQ").count(), 1);
    assert!(result.files_of("FASTQ").is_empty());
}

#[test]
fn json_manifest_flows_through_the_same_engine() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.cram");
    let manifest = write_file(
        dir.path(),
        "manifest.json",
        r#"{
            "name": "foo",
            "study": "S1",
            "cram": "a.cram"
        }"#,
    );

    let result = read(&dir, &manifest);

    assert!(
        result.is_valid(),
        "unexpected findings: {:?}",
        result.validation().issues()
    );
    assert_eq!(result.value_of("NAME"), Some("foo"));
    assert_eq!(result.matched_group(), Some("cram"));
}

#[test]
fn key_value_info_file_can_extend_a_json_manifest() {
    let dir = TempDir::new().expect("tempdir");
    data_file(dir.path(), "a.bam");
    write_file(dir.path(), "common.txt", "STUDY\tS1\n");
    let manifest = write_file(
        dir.path(),
        "manifest.json",
        r#"{"name": "foo", "bam": "a.bam", "info": "common.txt"}"#,
    );

    let result = read(&dir, &manifest);

    assert!(
        result.is_valid(),
        "unexpected findings: {:?}",
        result.validation().issues()
    );
    assert_eq!(result.value_of("STUDY"), Some("S1"));
}
