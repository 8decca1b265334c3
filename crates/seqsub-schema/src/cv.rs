use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error surfaced while loading a vocabulary resource from disk.
#[derive(Debug, Error)]
pub enum CvError {
    #[error("failed to read vocabulary resource {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// A controlled vocabulary: a fixed set of canonical keys, each with an
/// associated value, looked up case- and punctuation-insensitively.
///
/// Lookups never fail for unknown input; they return `None`.
#[derive(Clone, Debug, Default)]
pub struct CvList {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl CvList {
    /// Build a vocabulary from literal values; each value is its own key.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut list = CvList::default();
        for value in values {
            let key = value.into();
            let entry = key.clone();
            list.insert(key, entry);
        }
        list
    }

    /// Parse a `key=value` resource, one entry per line. Blank lines and
    /// lines starting with `#` are skipped; a line without `=` maps the key
    /// to itself.
    pub fn parse(resource: &str) -> Self {
        let mut list = CvList::default();
        for line in resource.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            match trimmed.split_once('=') {
                Some((key, value)) => list.insert(key.trim().to_string(), value.trim().to_string()),
                None => list.insert(trimmed.to_string(), trimmed.to_string()),
            }
        }
        list
    }

    /// Load a `key=value` resource from disk.
    pub fn load(path: &Path) -> Result<Self, CvError> {
        let contents = fs::read_to_string(path).map_err(|source| CvError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(CvList::parse(&contents))
    }

    fn insert(&mut self, key: String, value: String) {
        let normalized = normalize_term(&key);
        if self.index.contains_key(&normalized) {
            return;
        }
        self.index.insert(normalized, self.entries.len());
        self.entries.push((key, value));
    }

    pub fn contains(&self, candidate: &str) -> bool {
        self.index.contains_key(&normalize_term(candidate))
    }

    /// Canonical key for `candidate`, if the vocabulary contains it.
    pub fn key(&self, candidate: &str) -> Option<&str> {
        self.index
            .get(&normalize_term(candidate))
            .map(|&idx| self.entries[idx].0.as_str())
    }

    /// Value associated with `candidate`, if the vocabulary contains it.
    pub fn value(&self, candidate: &str) -> Option<&str> {
        self.index
            .get(&normalize_term(candidate))
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// Canonical keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Lower-cases and collapses every run of space, `_` and `-` into a single
/// `_`, so `PacBio SMRT`, `pacbio_smrt` and `pacbio-smrt` compare equal
/// while staying distinct from `pacbiosmrt`.
fn normalize_term(term: &str) -> String {
    let mut normalized = String::with_capacity(term.len());
    let mut pending_separator = false;
    for ch in term.trim().chars() {
        if ch == '_' || ch == '-' || ch.is_whitespace() {
            pending_separator = !normalized.is_empty();
            continue;
        }
        if pending_separator {
            normalized.push('_');
            pending_separator = false;
        }
        normalized.extend(ch.to_lowercase());
    }
    normalized
}
