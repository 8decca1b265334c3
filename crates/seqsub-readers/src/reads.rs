use std::fmt;
use std::path::PathBuf;

use seqsub_manifest::{
    AsciiFileNameProcessor, CvProcessor, FileSuffixProcessor, ManifestReader,
    ManifestReaderResult, PositiveIntegerProcessor, SubmissionReader,
};
use seqsub_schema::{CvList, FieldDefinition, FieldSchema, FileCount, FileGroup};

use crate::vocab;

const FASTQ_SUFFIXES: &[&str] = &[".fastq.gz", ".fq.gz", ".fastq.bz2", ".fq.bz2"];
const BAM_SUFFIXES: &[&str] = &[".bam"];
const CRAM_SUFFIXES: &[&str] = &[".cram"];

/// Reader for raw sequencing read submissions.
pub struct ReadsReader {
    reader: ManifestReader,
    instruments: CvList,
}

impl ReadsReader {
    pub fn new() -> Self {
        ReadsReader {
            reader: ManifestReader::new(schema()),
            instruments: vocab::instruments(),
        }
    }
}

impl Default for ReadsReader {
    fn default() -> Self {
        ReadsReader::new()
    }
}

pub(crate) fn schema() -> FieldSchema {
    FieldSchema::builder()
        .field(
            FieldDefinition::meta("NAME")
                .description("Unique experiment name")
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
                .description("Free-text experiment description")
                .optional()
                .build(),
        )
        .field(
            FieldDefinition::meta("PLATFORM")
                .description("Sequencing platform")
                .optional()
                .recommended()
                .processor(CvProcessor::new(vocab::platforms()))
                .build(),
        )
        .field(
            FieldDefinition::meta("INSTRUMENT")
                .description("Sequencing instrument model")
                .optional()
                .recommended()
                .processor(CvProcessor::new(vocab::instruments()))
                .build(),
        )
        .field(
            FieldDefinition::meta("INSERT_SIZE")
                .description("Insert size for paired reads")
                .optional()
                .processor(PositiveIntegerProcessor)
                .build(),
        )
        .field(
            FieldDefinition::meta("LIBRARY_NAME")
                .description("Library name")
                .optional()
                .build(),
        )
        .field(
            FieldDefinition::meta("LIBRARY_SOURCE")
                .description("Source material of the library")
                .required()
                .processor(CvProcessor::new(vocab::library_sources()))
                .build(),
        )
        .field(
            FieldDefinition::meta("LIBRARY_SELECTION")
                .description("Method used to enrich or select the library")
                .required()
                .processor(CvProcessor::new(vocab::library_selections()))
                .build(),
        )
        .field(
            FieldDefinition::meta("LIBRARY_STRATEGY")
                .description("Overall sequencing strategy of the library")
                .required()
                .processor(CvProcessor::new(vocab::library_strategies()))
                .build(),
        )
        .field(
            FieldDefinition::file("FASTQ")
                .description("Fastq file with the reads")
                .optional_many(2)
                .processor(FileSuffixProcessor::new(FASTQ_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .attributes([FieldDefinition::attribute("READ_TYPE")
                    .description("Role of the reads in this file")
                    .optional_many(2)
                    .processor(CvProcessor::new(vocab::read_types()))
                    .build()])
                .build(),
        )
        .field(
            FieldDefinition::file("BAM")
                .description("Bam file with the reads")
                .optional()
                .processor(FileSuffixProcessor::new(BAM_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .field(
            FieldDefinition::file("CRAM")
                .description("Cram file with the reads")
                .optional()
                .processor(FileSuffixProcessor::new(CRAM_SUFFIXES))
                .processor(AsciiFileNameProcessor::new())
                .build(),
        )
        .group(FileGroup::new("fastq").with(FileCount::between("FASTQ", 1, 2)))
        .group(FileGroup::new("bam").with(FileCount::exactly("BAM", 1)))
        .group(FileGroup::new("cram").with(FileCount::exactly("CRAM", 1)))
        .build()
}

/// Typed raw-reads manifest, produced only from a valid result.
#[derive(Debug)]
pub struct ReadsManifest {
    pub name: String,
    pub study: String,
    pub sample: String,
    pub description: Option<String>,
    /// Declared platform, or the platform implied by the instrument model.
    pub platform: Option<String>,
    pub instrument: Option<String>,
    pub insert_size: Option<u64>,
    pub library_name: Option<String>,
    pub library_source: String,
    pub library_selection: String,
    pub library_strategy: String,
    pub fastq: Vec<PathBuf>,
    pub bam: Option<PathBuf>,
    pub cram: Option<PathBuf>,
}

impl ReadsManifest {
    pub fn data_files(&self) -> usize {
        self.fastq.len() + usize::from(self.bam.is_some()) + usize::from(self.cram.is_some())
    }
}

impl fmt::Display for ReadsManifest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sequencing reads '{}' (study {}, sample {}), {} data file(s)",
            self.name,
            self.study,
            self.sample,
            self.data_files()
        )
    }
}

impl SubmissionReader for ReadsReader {
    type Manifest = ReadsManifest;

    fn reader(&self) -> &ManifestReader {
        &self.reader
    }

    fn process(&self, result: &ManifestReaderResult) -> ReadsManifest {
        let instrument = result.value_of("INSTRUMENT").map(str::to_string);
        let platform = result
            .value_of("PLATFORM")
            .map(str::to_string)
            .or_else(|| {
                instrument
                    .as_deref()
                    .and_then(|model| self.instruments.value(model))
                    .map(str::to_string)
            });

        ReadsManifest {
            name: result.value_of("NAME").unwrap_or_default().to_string(),
            study: result.value_of("STUDY").unwrap_or_default().to_string(),
            sample: result.value_of("SAMPLE").unwrap_or_default().to_string(),
            description: result.value_of("DESCRIPTION").map(str::to_string),
            platform,
            instrument,
            insert_size: result.uint_of("INSERT_SIZE"),
            library_name: result.value_of("LIBRARY_NAME").map(str::to_string),
            library_source: result
                .value_of("LIBRARY_SOURCE")
                .unwrap_or_default()
                .to_string(),
            library_selection: result
                .value_of("LIBRARY_SELECTION")
                .unwrap_or_default()
                .to_string(),
            library_strategy: result
                .value_of("LIBRARY_STRATEGY")
                .unwrap_or_default()
                .to_string(),
            fastq: result.files_of("FASTQ"),
            bam: result.file_of("BAM"),
            cram: result.file_of("CRAM"),
        }
    }
}
