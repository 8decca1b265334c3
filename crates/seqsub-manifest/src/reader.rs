use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use seqsub_schema::{
    FieldSchema, FieldValue, IssueKind, ValidationResult, INFO_FIELD,
};

use crate::parse;
use crate::processors::parse_bool;
use crate::validate;

/// Explicit stack of parse contexts. Each manifest or info file being parsed
/// pushes a frame; a path is only ever entered once, which also stops
/// info-file cycles.
#[derive(Debug, Default)]
struct SourceStack {
    frames: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl SourceStack {
    /// Push a frame for `path`. Returns the frame's path, or `None` when the
    /// path was already parsed during this read.
    fn enter(&mut self, path: &Path) -> Option<PathBuf> {
        if !self.visited.insert(path.to_path_buf()) {
            return None;
        }
        self.frames.push(path.to_path_buf());
        Some(path.to_path_buf())
    }

    fn leave(&mut self) {
        self.frames.pop();
    }

    fn current(&self) -> Option<&Path> {
        self.frames.last().map(PathBuf::as_path)
    }
}

/// Shared manifest-reading engine: owns a schema and drives
/// parse → info-file expansion → validation for one manifest at a time.
///
/// The whole sequence is synchronous and deterministic; the schema is
/// read-only and may be reused across sequential reads.
pub struct ManifestReader {
    schema: FieldSchema,
}

impl ManifestReader {
    pub fn new(schema: FieldSchema) -> Self {
        ManifestReader { schema }
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    /// Read and validate one manifest. Data-file values resolve against
    /// `input_dir` when they do not resolve as given. Never fails: every
    /// problem is accumulated in the returned result, and only an unreadable
    /// manifest skips the remaining work.
    pub fn read(&self, input_dir: &Path, manifest: &Path) -> ManifestReaderResult {
        let mut fields = Vec::new();
        let mut validation = ValidationResult::default();
        let mut sources = SourceStack::default();

        let Some(content) = read_source(manifest, &mut validation) else {
            return ManifestReaderResult {
                fields,
                validation,
                matched_group: None,
            };
        };
        if sources.enter(manifest).is_some() {
            parse::parse_content(
                &self.schema,
                &content,
                manifest,
                input_dir,
                &mut fields,
                &mut validation,
            );
            sources.leave();
        }

        self.expand_info_files(input_dir, &mut fields, &mut validation, &mut sources);

        let matched_group = validate::validate(&self.schema, &mut fields, &mut validation);

        ManifestReaderResult {
            fields,
            validation,
            matched_group,
        }
    }

    /// Replace every `INFO` occurrence with the parsed contents of the file
    /// it references. Info files may themselves reference further info
    /// files; each path is merged at most once.
    fn expand_info_files(
        &self,
        input_dir: &Path,
        fields: &mut Vec<FieldValue>,
        validation: &mut ValidationResult,
        sources: &mut SourceStack,
    ) {
        while let Some(position) = fields.iter().position(|field| field.name() == INFO_FIELD) {
            let info = fields.remove(position);
            if !info.is_valid() {
                // The parse-time file check already reported the bad path.
                continue;
            }
            let Some(path) = sources.enter(Path::new(info.value())) else {
                continue;
            };
            debug_assert_eq!(sources.current(), Some(path.as_path()));
            if let Some(content) = read_source(&path, validation) {
                parse::parse_content(&self.schema, &content, &path, input_dir, fields, validation);
            }
            sources.leave();
        }
    }
}

fn read_source(path: &Path, validation: &mut ValidationResult) -> Option<String> {
    match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(err) => {
            validation.error(
                IssueKind::UnreadableFile {
                    path: path.to_path_buf(),
                    detail: err.to_string(),
                },
                None,
            );
            None
        }
    }
}

/// Accumulated outcome of one [`ManifestReader::read`] call: the parsed
/// field occurrences plus every validation finding.
#[derive(Debug)]
pub struct ManifestReaderResult {
    fields: Vec<FieldValue>,
    validation: ValidationResult,
    matched_group: Option<String>,
}

impl ManifestReaderResult {
    pub fn is_valid(&self) -> bool {
        self.validation.is_valid()
    }

    pub fn validation(&self) -> &ValidationResult {
        &self.validation
    }

    /// Parsed occurrences in document order, info files merged in.
    pub fn fields(&self) -> &[FieldValue] {
        &self.fields
    }

    /// Name of the data-file group the manifest satisfied, if any.
    pub fn matched_group(&self) -> Option<&str> {
        self.matched_group.as_deref()
    }

    /// First valid occurrence of `name` (by definition name or synonym).
    /// Occurrences a processor rejected are treated as absent, so `process`
    /// steps see typed values or nothing.
    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|field| field.is_valid() && field.definition().matches(name))
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.field(name).map(FieldValue::value)
    }

    pub fn values_of(&self, name: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|field| field.is_valid() && field.definition().matches(name))
            .map(FieldValue::value)
            .collect()
    }

    pub fn file_of(&self, name: &str) -> Option<PathBuf> {
        self.value_of(name).map(PathBuf::from)
    }

    pub fn files_of(&self, name: &str) -> Vec<PathBuf> {
        self.values_of(name).into_iter().map(PathBuf::from).collect()
    }

    /// Boolean accessor honouring the `yes`/`no` manifest convention.
    pub fn bool_of(&self, name: &str) -> Option<bool> {
        self.value_of(name).and_then(parse_bool)
    }

    pub fn uint_of(&self, name: &str) -> Option<u64> {
        self.value_of(name).and_then(|value| value.trim().parse().ok())
    }

    pub fn float_of(&self, name: &str) -> Option<f64> {
        self.value_of(name).and_then(|value| value.trim().parse().ok())
    }
}

/// A concrete submission type: a manifest reader plus a projection of the
/// validated result into a typed manifest. The projection only runs when
/// the manifest-level result is valid.
pub trait SubmissionReader {
    type Manifest;

    fn reader(&self) -> &ManifestReader;

    fn process(&self, result: &ManifestReaderResult) -> Self::Manifest;

    fn read_manifest(
        &self,
        input_dir: &Path,
        manifest: &Path,
    ) -> (ManifestReaderResult, Option<Self::Manifest>) {
        let result = self.reader().read(input_dir, manifest);
        let typed = result.is_valid().then(|| self.process(&result));
        (result, typed)
    }
}
