use std::fmt;
use std::path::PathBuf;

use seqsub_manifest::{
    AsciiFileNameProcessor, BooleanProcessor, CvProcessor, FileSuffixProcessor, ManifestReader,
    ManifestReaderResult, SubmissionReader,
};
use seqsub_schema::{FieldDefinition, FieldSchema, FileCount, FileGroup};

use crate::vocab;

const FASTA_SUFFIXES: &[&str] = &[".fasta.gz", ".fa.gz", ".fasta", ".fa"];
const FLATFILE_SUFFIXES: &[&str] = &[".embl.gz", ".embl", ".dat.gz", ".dat"];

/// Reader for transcriptome assembly submissions.
pub struct TranscriptomeReader {
    reader: ManifestReader,
}

impl TranscriptomeReader {
    pub fn new() -> Self {
        TranscriptomeReader {
            reader: ManifestReader::new(schema()),
        }
    }
}

impl Default for TranscriptomeReader {
    fn default() -> Self {
        TranscriptomeReader::new()
    }
}

pub(crate) fn schema() -> FieldSchema {
    FieldSchema::builder()
        .field(
            FieldDefinition::meta("NAME")
                .synonym("ASSEMBLYNAME")
                .description("Unique assembly name")
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
            FieldDefinition::meta("SAMPLE")
                .description("Sample accession or object")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::meta("DESCRIPTION")
                .description("Free-text assembly description")
                .optional()
                .build(),
        )
        .field(
            FieldDefinition::meta("PROGRAM")
                .description("Assembly program")
                .required()
                .build(),
        )
        .field(
            FieldDefinition::meta("PLATFORM")
                .description("Sequencing platform the reads came from")
                .required()
                .processor(CvProcessor::new(vocab::platforms()))
                .build(),
        )
        .field(
            FieldDefinition::meta("TPA")
                .description("Whether this is a third-party annotated assembly")
                .optional()
                .processor(BooleanProcessor)
                .build(),
        )
        .field(
            FieldDefinition::file("FASTA")
                .description("Fasta file with the assembled transcripts")
                .optional()
                .processor(FileSuffixProcessor::new(FASTA_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("FLATFILE")
                .description("Annotated flat file with the assembled transcripts")
                .optional()
                .processor(FileSuffixProcessor::new(FLATFILE_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .group(FileGroup::new("fasta").with(FileCount::exactly("FASTA", 1)))
        .group(FileGroup::new("flatfile").with(FileCount::exactly("FLATFILE", 1)))
        .build()
}

/// Typed transcriptome assembly manifest, produced only from a valid result.
#[derive(Debug)]
pub struct TranscriptomeManifest {
    pub name: String,
    pub study: String,
    pub sample: String,
    pub description: Option<String>,
    pub program: String,
    pub platform: String,
    pub tpa: bool,
    pub fasta: Option<PathBuf>,
    pub flatfile: Option<PathBuf>,
}

impl fmt::Display for TranscriptomeManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "transcriptome assembly '{}' (study {}, sample {})",
            self.name, self.study, self.sample
        )
    }
}

impl SubmissionReader for TranscriptomeReader {
    type Manifest = TranscriptomeManifest;

    fn reader(&self) -> &ManifestReader {
        &self.reader
    }

    fn process(&self, result: &ManifestReaderResult) -> TranscriptomeManifest {
        TranscriptomeManifest {
            name: result.value_of("NAME").unwrap_or_default().to_string(),
            study: result.value_of("STUDY").unwrap_or_default().to_string(),
            sample: result.value_of("SAMPLE").unwrap_or_default().to_string(),
            description: result.value_of("DESCRIPTION").map(str::to_string),
            program: result.value_of("PROGRAM").unwrap_or_default().to_string(),
            platform: result.value_of("PLATFORM").unwrap_or_default().to_string(),
            tpa: result.bool_of("TPA").unwrap_or(false),
            fasta: result.file_of("FASTA"),
            flatfile: result.file_of("FLATFILE"),
        }
    }
}
