use std::fmt;
use std::path::Path;
use std::str::FromStr;

use seqsub_manifest::{ManifestReaderResult, SubmissionReader};
use seqsub_schema::FieldSchema;

use crate::{GenomeReader, ReadsReader, SequenceReader, TranscriptomeReader};

/// The submission types the tool knows how to read.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum SubmissionKind {
    Genome,
    Transcriptome,
    Sequence,
    Reads,
}

impl SubmissionKind {
    pub const ALL: &'static [SubmissionKind] = &[
        SubmissionKind::Genome,
        SubmissionKind::Transcriptome,
        SubmissionKind::Sequence,
        SubmissionKind::Reads,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SubmissionKind::Genome => "genome",
            SubmissionKind::Transcriptome => "transcriptome",
            SubmissionKind::Sequence => "sequence",
            SubmissionKind::Reads => "reads",
        }
    }

    /// Field schema for this submission type, used for field listings.
    pub fn schema(self) -> FieldSchema {
        match self {
            SubmissionKind::Genome => crate::genome::schema(),
            SubmissionKind::Transcriptome => crate::transcriptome::schema(),
            SubmissionKind::Sequence => crate::sequence::schema(),
            SubmissionKind::Reads => crate::reads::schema(),
        }
    }

    /// Read and validate a manifest of this type. Returns the accumulated
    /// result plus a one-line summary of the typed manifest when valid.
    pub fn read(
        self,
        input_dir: &Path,
        manifest: &Path,
    ) -> (ManifestReaderResult, Option<String>) {
        match self {
            SubmissionKind::Genome => summarize(GenomeReader::new(), input_dir, manifest),
            SubmissionKind::Transcriptome => {
                summarize(TranscriptomeReader::new(), input_dir, manifest)
            }
            SubmissionKind::Sequence => summarize(SequenceReader::new(), input_dir, manifest),
            SubmissionKind::Reads => summarize(ReadsReader::new(), input_dir, manifest),
        }
    }
}

fn summarize<R>(reader: R, input_dir: &Path, manifest: &Path) -> (ManifestReaderResult, Option<String>)
where
    R: SubmissionReader,
    R::Manifest: fmt::Display,
{
    let (result, typed) = reader.read_manifest(input_dir, manifest);
    let summary = typed.map(|manifest| manifest.to_string());
    (result, summary)
}

impl fmt::Display for SubmissionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SubmissionKind {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "genome" => Ok(SubmissionKind::Genome),
            "transcriptome" => Ok(SubmissionKind::Transcriptome),
            "sequence" => Ok(SubmissionKind::Sequence),
            "reads" => Ok(SubmissionKind::Reads),
            _ => Err(()),
        }
    }
}
