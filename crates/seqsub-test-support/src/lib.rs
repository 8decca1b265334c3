//! Shared test fixtures for seqsub crates.

use std::fs;
use std::path::{Path, PathBuf};

use seqsub_schema::{FieldDefinition, FieldSchema, FileCount, FileGroup};

/// A small raw-reads style schema used by engine integration tests:
/// NAME and STUDY are mandatory, data files are FASTQ (up to two), BAM or
/// CRAM, one group each.
pub fn demo_schema() -> FieldSchema {
    FieldSchema::builder()
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

/// Write `contents` to `name` under `dir` and return the full path.
pub fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture file");
    path
}

/// Create an empty data file `name` under `dir` and return the full path.
pub fn data_file(dir: &Path, name: &str) -> PathBuf {
    write_file(dir, name, "")
}
