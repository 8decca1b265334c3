use std::fmt;
use std::path::PathBuf;

use crate::value::Origin;

/// Severity of a validation finding. A result stays valid as long as it
/// carries no [`Severity::Error`] finding.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(label)
    }
}

/// Structured kind of a validation finding, carrying its parameters.
#[derive(Clone, Debug)]
pub enum IssueKind {
    UnreadableFile {
        path: PathBuf,
        detail: String,
    },
    UnknownField {
        name: String,
        suggestion: Option<String>,
    },
    MalformedJson {
        detail: String,
    },
    MissingSampleAlias,
    UnknownAttribute {
        field: String,
        name: String,
    },
    InvalidJsonValue {
        field: String,
        detail: String,
    },
    MissingField {
        name: String,
    },
    TooManyFields {
        name: String,
        max: u32,
        count: usize,
    },
    MissingRecommendedField {
        name: String,
    },
    InvalidCvValue {
        name: String,
        value: String,
        allowed: String,
    },
    InvalidFileSuffix {
        name: String,
        value: String,
        allowed: String,
    },
    InvalidFileName {
        value: String,
    },
    InvalidPositiveInteger {
        name: String,
        value: String,
    },
    InvalidPositiveFloat {
        name: String,
        value: String,
    },
    InvalidBoolean {
        name: String,
        value: String,
    },
    InvalidFilePath {
        name: String,
        value: String,
    },
    NoDataFiles {
        expected: String,
    },
    InvalidFileGroup {
        expected: String,
    },
    DuplicateFileName {
        name: String,
    },
}

impl IssueKind {
    /// Stable machine-readable code for the finding.
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::UnreadableFile { .. } => "unreadable-file",
            IssueKind::UnknownField { .. } => "unknown-field",
            IssueKind::MalformedJson { .. } => "malformed-json",
            IssueKind::MissingSampleAlias => "missing-sample-alias",
            IssueKind::UnknownAttribute { .. } => "unknown-attribute",
            IssueKind::InvalidJsonValue { .. } => "invalid-json-value",
            IssueKind::MissingField { .. } => "missing-field",
            IssueKind::TooManyFields { .. } => "too-many-fields",
            IssueKind::MissingRecommendedField { .. } => "missing-recommended-field",
            IssueKind::InvalidCvValue { .. } => "invalid-cv-value",
            IssueKind::InvalidFileSuffix { .. } => "invalid-file-suffix",
            IssueKind::InvalidFileName { .. } => "invalid-file-name",
            IssueKind::InvalidPositiveInteger { .. } => "invalid-positive-integer",
            IssueKind::InvalidPositiveFloat { .. } => "invalid-positive-float",
            IssueKind::InvalidBoolean { .. } => "invalid-boolean",
            IssueKind::InvalidFilePath { .. } => "invalid-file-path",
            IssueKind::NoDataFiles { .. } => "no-data-files",
            IssueKind::InvalidFileGroup { .. } => "invalid-file-group",
            IssueKind::DuplicateFileName { .. } => "duplicate-file-name",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::UnreadableFile { path, detail } => {
                write!(f, "failed to read manifest file '{}': {}", path.display(), detail)
            }
            IssueKind::UnknownField { name, suggestion } => {
                write!(f, "unknown field '{name}'")?;
                if let Some(suggestion) = suggestion {
                    write!(f, ". Did you mean '{suggestion}'?")?;
                }
                Ok(())
            }
            IssueKind::MalformedJson { detail } => write!(f, "invalid JSON manifest: {detail}"),
            IssueKind::MissingSampleAlias => {
                write!(f, "sample object requires an 'alias' key")
            }
            IssueKind::UnknownAttribute { field, name } => {
                write!(f, "unknown attribute '{name}' for field '{field}'")
            }
            IssueKind::InvalidJsonValue { field, detail } => {
                write!(f, "invalid value for field '{field}': {detail}")
            }
            IssueKind::MissingField { name } => write!(f, "missing mandatory field '{name}'"),
            IssueKind::TooManyFields { name, max, count } => write!(
                f,
                "too many occurrences of field '{name}': found {count}, maximum {max}"
            ),
            IssueKind::MissingRecommendedField { name } => {
                write!(f, "recommended field '{name}' is not set")
            }
            IssueKind::InvalidCvValue {
                name,
                value,
                allowed,
            } => write!(
                f,
                "invalid value '{value}' for field '{name}', expected one of: {allowed}"
            ),
            IssueKind::InvalidFileSuffix {
                name,
                value,
                allowed,
            } => write!(
                f,
                "invalid suffix for file '{value}' in field '{name}', expected one of: {allowed}"
            ),
            IssueKind::InvalidFileName { value } => {
                write!(f, "invalid characters in file name '{value}'")
            }
            IssueKind::InvalidPositiveInteger { name, value } => write!(
                f,
                "invalid value '{value}' for field '{name}', expected a positive integer"
            ),
            IssueKind::InvalidPositiveFloat { name, value } => write!(
                f,
                "invalid value '{value}' for field '{name}', expected a positive number"
            ),
            IssueKind::InvalidBoolean { name, value } => write!(
                f,
                "invalid value '{value}' for field '{name}', expected yes or no"
            ),
            IssueKind::InvalidFilePath { name, value } => write!(
                f,
                "cannot locate data file '{value}' for field '{name}'"
            ),
            IssueKind::NoDataFiles { expected } => {
                write!(f, "no data files supplied, expected one of: {expected}")
            }
            IssueKind::InvalidFileGroup { expected } => {
                write!(f, "invalid set of data files, expected one of: {expected}")
            }
            IssueKind::DuplicateFileName { name } => {
                write!(f, "data file names must be unique, duplicate file name '{name}'")
            }
        }
    }
}

/// One severity-tagged validation finding with optional provenance.
#[derive(Clone, Debug)]
pub struct Issue {
    pub severity: Severity,
    pub kind: IssueKind,
    pub origin: Option<Origin>,
}

impl Issue {
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity, self.kind)?;
        if let Some(origin) = &self.origin {
            write!(f, " ({origin})")?;
        }
        Ok(())
    }
}

/// Accumulator for one manifest read. Findings are appended, never thrown,
/// so a single run surfaces as many independent problems as possible.
#[derive(Debug, Default)]
pub struct ValidationResult {
    issues: Vec<Issue>,
}

impl ValidationResult {
    pub fn error(&mut self, kind: IssueKind, origin: Option<Origin>) {
        self.issues.push(Issue {
            severity: Severity::Error,
            kind,
            origin,
        });
    }

    pub fn warning(&mut self, kind: IssueKind, origin: Option<Origin>) {
        self.issues.push(Issue {
            severity: Severity::Warning,
            kind,
            origin,
        });
    }

    pub fn info(&mut self, kind: IssueKind, origin: Option<Origin>) {
        self.issues.push(Issue {
            severity: Severity::Info,
            kind,
            origin,
        });
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// True while no error-severity finding has been recorded.
    pub fn is_valid(&self) -> bool {
        !self
            .issues
            .iter()
            .any(|issue| issue.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validity_tracks_error_severity_only() {
        let mut result = ValidationResult::default();
        assert!(result.is_valid());

        result.warning(
            IssueKind::MissingRecommendedField {
                name: "PLATFORM".into(),
            },
            None,
        );
        assert!(result.is_valid());

        result.error(IssueKind::MissingField { name: "NAME".into() }, None);
        assert!(!result.is_valid());
        assert_eq!(result.error_count(), 1);
        assert_eq!(result.warning_count(), 1);
    }

    #[test]
    fn issue_rendering_includes_origin() {
        let issue = Issue {
            severity: Severity::Error,
            kind: IssueKind::UnknownField {
                name: "NOPE".into(),
                suggestion: Some("NAME".into()),
            },
            origin: Some(Origin::line("manifest.txt", 3)),
        };
        assert_eq!(
            issue.to_string(),
            "error: unknown field 'NOPE'. Did you mean 'NAME'? (manifest.txt, line 3)"
        );
        assert_eq!(issue.code(), "unknown-field");
    }
}
