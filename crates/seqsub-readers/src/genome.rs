use std::fmt;
use std::path::PathBuf;

use seqsub_manifest::{
    AsciiFileNameProcessor, BooleanProcessor, CvProcessor, FileSuffixProcessor, ManifestReader,
    ManifestReaderResult, PositiveFloatProcessor, PositiveIntegerProcessor, SubmissionReader,
};
use seqsub_schema::{FieldDefinition, FieldSchema, FileCount, FileGroup};

use crate::vocab;

const FASTA_SUFFIXES: &[&str] = &[".fasta.gz", ".fa.gz", ".fasta", ".fa"];
const FLATFILE_SUFFIXES: &[&str] = &[".embl.gz", ".embl", ".dat.gz", ".dat"];
const AGP_SUFFIXES: &[&str] = &[".agp.gz", ".agp"];
const LIST_SUFFIXES: &[&str] = &[".txt.gz", ".tsv.gz"];

/// Reader for genome assembly submissions.
pub struct GenomeReader {
    reader: ManifestReader,
}

impl GenomeReader {
    pub fn new() -> Self {
        GenomeReader {
            reader: ManifestReader::new(schema()),
        }
    }
}

impl Default for GenomeReader {
    fn default() -> Self {
        GenomeReader::new()
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
            FieldDefinition::meta("COVERAGE")
                .description("Sequencing coverage of the assembly")
                .required()
                .processor(PositiveFloatProcessor)
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
                .build(),
        )
        .field(
            FieldDefinition::meta("MINGAPLENGTH")
                .description("Minimum gap length in the assembly")
                .optional()
                .processor(PositiveIntegerProcessor)
                .build(),
        )
        .field(
            FieldDefinition::meta("MOLECULETYPE")
                .description("Molecule type of the assembled sequence")
                .optional()
                .processor(CvProcessor::new(vocab::molecule_types()))
                .build(),
        )
        .field(
            FieldDefinition::meta("ASSEMBLY_TYPE")
                .description("Assembly type")
                .optional()
                .recommended()
                .processor(CvProcessor::new(vocab::assembly_types()))
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
                .description("Fasta file with the assembled sequences")
                .optional_unbounded()
                .processor(FileSuffixProcessor::new(FASTA_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("FLATFILE")
                .description("Annotated flat file with the assembled sequences")
                .optional_unbounded()
                .processor(FileSuffixProcessor::new(FLATFILE_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("AGP")
                .description("AGP file describing the assembly scaffolding")
                .optional_unbounded()
                .processor(FileSuffixProcessor::new(AGP_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("CHROMOSOME_LIST")
                .description("List of assembled chromosomes")
                .optional()
                .processor(FileSuffixProcessor::new(LIST_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("UNLOCALISED_LIST")
                .description("List of unlocalised sequences per chromosome")
                .optional()
                .processor(FileSuffixProcessor::new(LIST_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .group(
            FileGroup::new("fasta")
                .with(FileCount::at_least("FASTA", 1))
                .with(FileCount::between("AGP", 0, 1)),
        )
        .group(
            FileGroup::new("fasta+chromosomes")
                .with(FileCount::at_least("FASTA", 1))
                .with(FileCount::exactly("CHROMOSOME_LIST", 1))
                .with(FileCount::between("UNLOCALISED_LIST", 0, 1))
                .with(FileCount::between("AGP", 0, 1)),
        )
        .group(
            FileGroup::new("flatfile")
                .with(FileCount::at_least("FLATFILE", 1))
                .with(FileCount::between("AGP", 0, 1)),
        )
        .group(
            FileGroup::new("flatfile+chromosomes")
                .with(FileCount::at_least("FLATFILE", 1))
                .with(FileCount::exactly("CHROMOSOME_LIST", 1))
                .with(FileCount::between("UNLOCALISED_LIST", 0, 1))
                .with(FileCount::between("AGP", 0, 1)),
        )
        .build()
}

/// Typed genome assembly manifest, produced only from a valid result.
#[derive(Debug)]
pub struct GenomeManifest {
    pub name: String,
    pub study: String,
    pub sample: String,
    pub description: Option<String>,
    pub coverage: f64,
    pub program: String,
    pub platform: String,
    pub min_gap_length: Option<u64>,
    pub molecule_type: Option<String>,
    pub assembly_type: Option<String>,
    pub tpa: bool,
    pub fasta: Vec<PathBuf>,
    pub flatfile: Vec<PathBuf>,
    pub agp: Vec<PathBuf>,
    pub chromosome_list: Option<PathBuf>,
    pub unlocalised_list: Option<PathBuf>,
}

impl GenomeManifest {
    pub fn data_files(&self) -> usize {
        self.fasta.len()
            + self.flatfile.len()
            + self.agp.len()
            + usize::from(self.chromosome_list.is_some())
            + usize::from(self.unlocalised_list.is_some())
    }
}

impl fmt::Display for GenomeManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "genome assembly '{}' (study {}, sample {}), {} data file(s)",
            self.name,
            self.study,
            self.sample,
            self.data_files()
        )
    }
}

impl SubmissionReader for GenomeReader {
    type Manifest = GenomeManifest;

    fn reader(&self) -> &ManifestReader {
        &self.reader
    }

    fn process(&self, result: &ManifestReaderResult) -> GenomeManifest {
        GenomeManifest {
            name: result.value_of("NAME").unwrap_or_default().to_string(),
            study: result.value_of("STUDY").unwrap_or_default().to_string(),
            sample: result.value_of("SAMPLE").unwrap_or_default().to_string(),
            description: result.value_of("DESCRIPTION").map(str::to_string),
            coverage: result.float_of("COVERAGE").unwrap_or_default(),
            program: result.value_of("PROGRAM").unwrap_or_default().to_string(),
            platform: result.value_of("PLATFORM").unwrap_or_default().to_string(),
            min_gap_length: result.uint_of("MINGAPLENGTH"),
            molecule_type: result.value_of("MOLECULETYPE").map(str::to_string),
            assembly_type: result.value_of("ASSEMBLY_TYPE").map(str::to_string),
            tpa: result.bool_of("TPA").unwrap_or(false),
            fasta: result.files_of("FASTA"),
            flatfile: result.files_of("FLATFILE"),
            agp: result.files_of("AGP"),
            chromosome_list: result.file_of("CHROMOSOME_LIST"),
            unlocalised_list: result.file_of("UNLOCALISED_LIST"),
        }
    }
}
