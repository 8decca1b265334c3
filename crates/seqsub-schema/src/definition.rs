use std::fmt;
use std::sync::Arc;

use crate::processor::FieldProcessor;

/// Reserved field name whose occurrences reference a secondary manifest file
/// merged into the result before validation.
pub const INFO_FIELD: &str = "INFO";

/// Kind of datum a field carries.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FieldType {
    /// Plain metadata value.
    Meta,
    /// Reference to a data file on disk.
    File,
    /// Nested sub-field of a structured value (JSON manifests only).
    Attribute,
}

/// Canonical form used for field-name matching: upper-cased with `_`, `-`
/// and whitespace removed, so `assembly_name`, `ASSEMBLY-NAME` and
/// `Assembly Name` all refer to the same definition.
pub fn normalize_field_name(name: &str) -> String {
    name.chars()
        .filter(|ch| !matches!(ch, '_' | '-') && !ch.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}

/// One schema entry: a named field a manifest may carry.
///
/// Immutable after [`FieldBuilder::build`]; owned by exactly one schema and
/// shared by reference with every parsed occurrence of the field.
pub struct FieldDefinition {
    name: String,
    normalized_name: String,
    synonym: Option<String>,
    normalized_synonym: Option<String>,
    description: String,
    field_type: FieldType,
    min_count: u32,
    max_count: Option<u32>,
    recommended_min: u32,
    recommended_max: Option<u32>,
    processors: Vec<Arc<dyn FieldProcessor>>,
    attributes: Vec<Arc<FieldDefinition>>,
}

impl FieldDefinition {
    /// Start building a metadata field.
    pub fn meta(name: &str) -> FieldBuilder {
        FieldBuilder::new(FieldType::Meta, name)
    }

    /// Start building a data-file field.
    pub fn file(name: &str) -> FieldBuilder {
        FieldBuilder::new(FieldType::File, name)
    }

    /// Start building a nested attribute field.
    pub fn attribute(name: &str) -> FieldBuilder {
        FieldBuilder::new(FieldType::Attribute, name)
    }

    /// Canonical upper-cased field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn synonym(&self) -> Option<&str> {
        self.synonym.as_deref()
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }

    pub fn min_count(&self) -> u32 {
        self.min_count
    }

    /// Upper occurrence bound; `None` means unbounded.
    pub fn max_count(&self) -> Option<u32> {
        self.max_count
    }

    /// Soft lower bound used for warnings and field listings.
    pub fn recommended_min(&self) -> u32 {
        self.recommended_min
    }

    /// Soft upper bound used for warnings and field listings.
    pub fn recommended_max(&self) -> Option<u32> {
        self.recommended_max
    }

    pub fn processors(&self) -> &[Arc<dyn FieldProcessor>] {
        &self.processors
    }

    /// Nested attribute definitions (JSON manifests only).
    pub fn attributes(&self) -> &[Arc<FieldDefinition>] {
        &self.attributes
    }

    /// Whether `candidate` names this field, under the punctuation- and
    /// case-insensitive matching rules, either by name or by synonym.
    pub fn matches(&self, candidate: &str) -> bool {
        let wanted = normalize_field_name(candidate);
        wanted == self.normalized_name
            || self
                .normalized_synonym
                .as_deref()
                .map_or(false, |synonym| wanted == synonym)
    }
}

impl fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("name", &self.name)
            .field("type", &self.field_type)
            .field("min_count", &self.min_count)
            .field("max_count", &self.max_count)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Copy)]
enum SoftBounds {
    Recommended,
    Hidden,
}

/// Fluent builder for a single [`FieldDefinition`].
///
/// A missing name or description is a programming mistake in a reader's
/// schema, not bad user input, and panics immediately.
pub struct FieldBuilder {
    name: String,
    synonym: Option<String>,
    description: String,
    field_type: FieldType,
    min_count: u32,
    max_count: Option<u32>,
    soft: Option<SoftBounds>,
    processors: Vec<Arc<dyn FieldProcessor>>,
    attributes: Vec<Arc<FieldDefinition>>,
}

impl FieldBuilder {
    fn new(field_type: FieldType, name: &str) -> Self {
        FieldBuilder {
            name: name.trim().to_uppercase(),
            synonym: None,
            description: String::new(),
            field_type,
            min_count: 0,
            max_count: Some(1),
            soft: None,
            processors: Vec::new(),
            attributes: Vec::new(),
        }
    }

    /// Alternative name the field also matches under.
    pub fn synonym(mut self, synonym: &str) -> Self {
        self.synonym = Some(synonym.trim().to_uppercase());
        self
    }

    pub fn description(mut self, text: &str) -> Self {
        self.description = text.to_string();
        self
    }

    /// Exactly one occurrence.
    pub fn required(mut self) -> Self {
        self.min_count = 1;
        self.max_count = Some(1);
        self
    }

    /// Zero or one occurrence.
    pub fn optional(mut self) -> Self {
        self.min_count = 0;
        self.max_count = Some(1);
        self
    }

    /// Zero up to `max` occurrences.
    pub fn optional_many(mut self, max: u32) -> Self {
        assert!(max > 0, "field '{}': maximum count must be positive", self.name);
        self.min_count = 0;
        self.max_count = Some(max);
        self
    }

    /// Any number of occurrences, including none.
    pub fn optional_unbounded(mut self) -> Self {
        self.min_count = 0;
        self.max_count = None;
        self
    }

    /// Mark the field recommended: absent occurrences warn but never fail.
    pub fn recommended(mut self) -> Self {
        self.soft = Some(SoftBounds::Recommended);
        self
    }

    /// Hide the field from listings and soft-bound warnings.
    pub fn hidden(mut self) -> Self {
        self.soft = Some(SoftBounds::Hidden);
        self
    }

    /// Attach a processor; processors run in attachment order.
    pub fn processor(mut self, processor: impl FieldProcessor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Attach nested attribute definitions (JSON manifests only).
    pub fn attributes<I>(mut self, definitions: I) -> Self
    where
        I: IntoIterator<Item = FieldDefinition>,
    {
        for definition in definitions {
            assert!(
                definition.field_type == FieldType::Attribute,
                "field '{}': nested definition '{}' must be an attribute",
                self.name,
                definition.name
            );
            self.attributes.push(Arc::new(definition));
        }
        self
    }

    pub fn build(self) -> FieldDefinition {
        assert!(!self.name.is_empty(), "field definition requires a name");
        assert!(
            !self.description.is_empty(),
            "field '{}' requires a description",
            self.name
        );
        if let Some(max) = self.max_count {
            assert!(
                max >= self.min_count,
                "field '{}': maximum count {} is below minimum count {}",
                self.name,
                max,
                self.min_count
            );
        }

        let (recommended_min, recommended_max) = match self.soft {
            None => (self.min_count, self.max_count),
            Some(SoftBounds::Recommended) => (1, self.max_count.map(|max| max.max(1))),
            Some(SoftBounds::Hidden) => (0, Some(0)),
        };

        FieldDefinition {
            normalized_name: normalize_field_name(&self.name),
            normalized_synonym: self.synonym.as_deref().map(normalize_field_name),
            name: self.name,
            synonym: self.synonym,
            description: self.description,
            field_type: self.field_type,
            min_count: self.min_count,
            max_count: self.max_count,
            recommended_min,
            recommended_max,
            processors: self.processors,
            attributes: self.attributes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_is_case_and_punctuation_insensitive() {
        let definition = FieldDefinition::meta("NAME")
            .synonym("ASSEMBLYNAME")
            .description("Unique assembly name")
            .required()
            .build();

        for candidate in ["NAME", "name", "n_ame", "N-AME", "n a m e"] {
            assert!(definition.matches(candidate), "expected match for {candidate}");
        }
        for candidate in ["assembly_name", "Assembly-Name", "ASSEMBLY NAME"] {
            assert!(definition.matches(candidate), "expected synonym match for {candidate}");
        }
        assert!(!definition.matches("NAMES"));
    }

    #[test]
    fn cardinality_helpers_set_expected_bounds() {
        let required = FieldDefinition::meta("A").description("a").required().build();
        assert_eq!((required.min_count(), required.max_count()), (1, Some(1)));

        let optional = FieldDefinition::meta("B").description("b").optional().build();
        assert_eq!((optional.min_count(), optional.max_count()), (0, Some(1)));

        let many = FieldDefinition::file("C").description("c").optional_many(4).build();
        assert_eq!((many.min_count(), many.max_count()), (0, Some(4)));

        let unbounded = FieldDefinition::file("D")
            .description("d")
            .optional_unbounded()
            .build();
        assert_eq!((unbounded.min_count(), unbounded.max_count()), (0, None));
    }

    #[test]
    fn soft_bounds_derive_from_modifiers() {
        let plain = FieldDefinition::meta("A").description("a").optional().build();
        assert_eq!((plain.recommended_min(), plain.recommended_max()), (0, Some(1)));

        let recommended = FieldDefinition::meta("B")
            .description("b")
            .optional()
            .recommended()
            .build();
        assert_eq!(
            (recommended.recommended_min(), recommended.recommended_max()),
            (1, Some(1))
        );

        let hidden = FieldDefinition::meta("C")
            .description("c")
            .optional()
            .hidden()
            .build();
        assert_eq!((hidden.recommended_min(), hidden.recommended_max()), (0, Some(0)));
    }

    #[test]
    #[should_panic(expected = "requires a description")]
    fn missing_description_panics() {
        let _ = FieldDefinition::meta("NAME").required().build();
    }
}
