use std::sync::Arc;

use crate::definition::{FieldDefinition, INFO_FIELD};
use crate::groups::FileGroup;

/// Ordered, immutable field schema for one submission type: the accepted
/// field definitions plus the declared data-file groups.
///
/// Every schema implicitly accepts the reserved `INFO` field referencing a
/// secondary manifest file; the builder appends it unless a definition with
/// that name was declared explicitly.
#[derive(Debug)]
pub struct FieldSchema {
    fields: Vec<Arc<FieldDefinition>>,
    groups: Vec<FileGroup>,
}

impl FieldSchema {
    pub fn builder() -> FieldSchemaBuilder {
        FieldSchemaBuilder {
            fields: Vec::new(),
            groups: Vec::new(),
        }
    }

    /// Declared field definitions, in declaration order.
    pub fn fields(&self) -> &[Arc<FieldDefinition>] {
        &self.fields
    }

    /// Declared file groups, in declaration order.
    pub fn groups(&self) -> &[FileGroup] {
        &self.groups
    }

    /// Find the definition a raw manifest key refers to, by name or synonym.
    pub fn find(&self, candidate: &str) -> Option<&Arc<FieldDefinition>> {
        self.fields.iter().find(|field| field.matches(candidate))
    }
}

/// Value-returning builder for a [`FieldSchema`]. Duplicate field names are
/// programming mistakes and panic at `build()`.
pub struct FieldSchemaBuilder {
    fields: Vec<Arc<FieldDefinition>>,
    groups: Vec<FileGroup>,
}

impl FieldSchemaBuilder {
    pub fn field(mut self, definition: FieldDefinition) -> Self {
        self.fields.push(Arc::new(definition));
        self
    }

    pub fn group(mut self, group: FileGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn build(mut self) -> FieldSchema {
        for (idx, field) in self.fields.iter().enumerate() {
            for other in &self.fields[idx + 1..] {
                assert!(
                    !other.matches(field.name()),
                    "duplicate field definition '{}'",
                    field.name()
                );
            }
        }

        if self.fields.iter().all(|field| !field.matches(INFO_FIELD)) {
            self.fields.push(Arc::new(
                FieldDefinition::file(INFO_FIELD)
                    .description("Info file with additional manifest fields")
                    .optional_unbounded()
                    .hidden()
                    .build(),
            ));
        }

        FieldSchema {
            fields: self.fields,
            groups: self.groups,
        }
    }
}
