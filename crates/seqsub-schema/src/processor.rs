use crate::result::ValidationResult;
use crate::value::FieldValue;

/// A pluggable validate/normalize step bound to a field definition.
///
/// Invoked once per matching occurrence during validation. A processor may
/// rewrite the value (canonicalize a vocabulary term, resolve a path) and
/// must mark the occurrence invalid, appending an error, on failure.
/// Processors are stateless per call and shared behind `Arc` with the
/// schema that owns them.
pub trait FieldProcessor: Send + Sync {
    fn process(&self, result: &mut ValidationResult, field: &mut FieldValue);
}
