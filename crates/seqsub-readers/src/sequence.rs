use std::fmt;
use std::path::PathBuf;

use seqsub_manifest::{
    AsciiFileNameProcessor, FileSuffixProcessor, ManifestReader, ManifestReaderResult,
    SubmissionReader,
};
use seqsub_schema::{FieldDefinition, FieldSchema, FileCount, FileGroup};

const TAB_SUFFIXES: &[&str] = &[".tsv.gz", ".tab.gz", ".tsv", ".tab"];
const FLATFILE_SUFFIXES: &[&str] = &[".embl.gz", ".embl", ".dat.gz", ".dat"];

/// Reader for annotated sequence set submissions.
pub struct SequenceReader {
    reader: ManifestReader,
}

impl SequenceReader {
    pub fn new() -> Self {
        SequenceReader {
            reader: ManifestReader::new(schema()),
        }
    }
}

impl Default for SequenceReader {
    fn default() -> Self {
        SequenceReader::new()
    }
}

pub(crate) fn schema() -> FieldSchema {
    FieldSchema::builder()
        .field(
            FieldDefinition::meta("NAME")
                .description("Unique sequence set name")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::meta("STUDY")
                .description("Study accession or name")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::meta("DESCRIPTION")
                .description("Free-text description of the sequence set")
                .optional()
                .build(),
        )
        .field(
            FieldDefinition::file("TAB")
                .description("Tabulated file with sequences and annotations")
                .optional()
                .processor(FileSuffixProcessor::new(TAB_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("FLATFILE")
                .description("Annotated flat file with the sequences")
                .optional()
                .processor(FileSuffixProcessor::new(FLATFILE_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .group(FileGroup::new("tab").with(FileCount::exactly("TAB", 1)))
        .group(FileGroup::new("flatfile").with(FileCount::exactly("FLATFILE", 1)))
        .build()
}

/// Typed sequence set manifest, produced only from a valid result.
#[derive(Debug)]
pub struct SequenceManifest {
    pub name: String,
    pub study: String,
    pub description: Option<String>,
    pub tab: Option<PathBuf>,
    pub flatfile: Option<PathBuf>,
}

impl fmt::Display for SequenceManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sequence set '{}' (study {})", self.name, self.study)
    }
}

impl SubmissionReader for SequenceReader {
    type Manifest = SequenceManifest;

    fn reader(&self) -> &ManifestReader {
        &self.reader
    }

    fn process(&self, result: &ManifestReaderResult) -> SequenceManifest {
        SequenceManifest {
            name: result.value_of("NAME").unwrap_or_default().to_string(),
            study: result.value_of("STUDY").unwrap_or_default().to_string(),
            description: result.value_of("DESCRIPTION").map(str::to_string),
            tab: result.file_of("TAB"),
            flatfile: result.file_of("FLATFILE"),
        }
    }
}
