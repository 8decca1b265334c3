use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::definition::FieldDefinition;

/// Provenance of a parsed field occurrence.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Origin {
    /// A line of a key/value manifest or info file.
    Line { file: PathBuf, line: usize },
    /// A JSON-pointer location inside a JSON manifest.
    JsonPath { file: PathBuf, pointer: String },
}

impl Origin {
    pub fn line(file: impl Into<PathBuf>, line: usize) -> Self {
        Origin::Line {
            file: file.into(),
            line,
        }
    }

    pub fn json(file: impl Into<PathBuf>, pointer: impl Into<String>) -> Self {
        Origin::JsonPath {
            file: file.into(),
            pointer: pointer.into(),
        }
    }

    /// Source file the occurrence came from.
    pub fn file(&self) -> &Path {
        match self {
            Origin::Line { file, .. } | Origin::JsonPath { file, .. } => file,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Line { file, line } => write!(f, "{}, line {}", file.display(), line),
            Origin::JsonPath { file, pointer } => write!(f, "{}, {}", file.display(), pointer),
        }
    }
}

/// One parsed occurrence of a schema field.
///
/// The value is mutable because processors may rewrite it (canonicalizing a
/// vocabulary term, resolving a file path); occurrences are never deleted,
/// only marked invalid.
#[derive(Clone, Debug)]
pub struct FieldValue {
    definition: Arc<FieldDefinition>,
    value: String,
    attributes: Vec<FieldValue>,
    origin: Origin,
    valid: bool,
}

impl FieldValue {
    pub fn new(definition: Arc<FieldDefinition>, value: impl Into<String>, origin: Origin) -> Self {
        FieldValue {
            definition,
            value: value.into(),
            attributes: Vec::new(),
            origin,
            valid: true,
        }
    }

    pub fn definition(&self) -> &Arc<FieldDefinition> {
        &self.definition
    }

    /// Canonical name of the field this occurrence belongs to.
    pub fn name(&self) -> &str {
        self.definition.name()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn attributes(&self) -> &[FieldValue] {
        &self.attributes
    }

    pub fn attributes_mut(&mut self) -> &mut [FieldValue] {
        &mut self.attributes
    }

    pub fn push_attribute(&mut self, attribute: FieldValue) {
        self.attributes.push(attribute);
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// False once any processor or the parse-time file check has failed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn mark_invalid(&mut self) {
        self.valid = false;
    }
}
