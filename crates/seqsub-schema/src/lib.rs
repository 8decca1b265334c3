//! Declarative field model for submission manifests.
//!
//! A submission type declares the fields its manifests may carry as an
//! ordered [`FieldSchema`]: per-field cardinality bounds, controlled
//! vocabularies, file groups and attached processors. Schemas are immutable
//! after construction and shared by reference across every parsed occurrence
//! of a field, so one schema can serve any number of sequential reads.

mod cv;
mod definition;
mod groups;
mod processor;
mod result;
mod schema;
mod value;

pub use cv::{CvError, CvList};
pub use definition::{normalize_field_name, FieldBuilder, FieldDefinition, FieldType, INFO_FIELD};
pub use groups::{render_expected, FileCount, FileGroup};
pub use processor::FieldProcessor;
pub use result::{Issue, IssueKind, Severity, ValidationResult};
pub use schema::{FieldSchema, FieldSchemaBuilder};
pub use value::{FieldValue, Origin};
