//! # Model Schemas
//!
//! A [`SplitterSchema`] is the explicit, per-model description of which fields
//! a record has and which of them are split attributes. Schemas are built once
//! at startup through [`SchemaBuilder`] and shared read-only afterwards:
//!
//! ```rust
//! use attr_splitter::schema::SplitterSchema;
//!
//! # fn main() -> attr_splitter::error::Result<()> {
//! let user = SplitterSchema::builder("user")
//!     .prefixes("phone_number", ["first", "second", "third"])?
//!     .suffixes("home_phone", ["area_code", "first_three", "last_four"])?
//!     .field("email")?
//!     .build();
//!
//! assert!(user.has_field("first_phone_number"));
//! assert!(user.has_field("home_phone_last_four"));
//! # Ok(())
//! # }
//! ```
//!
//! Declaring a split attribute adds the logical attribute and every physical
//! segment field to the schema. A segment field whose name is already taken is
//! a configuration error returned by the declaring call.

use crate::error::{Result, SplitterError};
use crate::model::{SegmentMode, SplitAttributeSpec};
use indexmap::{IndexMap, IndexSet};
use std::sync::Arc;

/// What a schema field is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A regular field with no split behavior.
    Plain,
    /// The combined value of the split attribute at this index.
    Logical(usize),
    /// One segment of a split attribute.
    Segment { split: usize, position: usize },
}

/// Field layout and split attributes of one model type.
#[derive(Debug)]
pub struct SplitterSchema {
    name: String,
    fields: IndexMap<String, FieldKind>,
    splits: Vec<SplitAttributeSpec>,
}

impl SplitterSchema {
    pub fn builder(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            fields: IndexMap::new(),
            reserved: IndexSet::new(),
            splits: Vec::new(),
        }
    }

    /// Model name, also the default form object name (e.g. `user`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All field names in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn field_kind(&self, field: &str) -> Option<FieldKind> {
        self.fields.get(field).copied()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// Split attributes in declaration order.
    pub fn splits(&self) -> &[SplitAttributeSpec] {
        &self.splits
    }

    /// Looks up a split attribute by its logical name.
    pub fn split(&self, attribute: &str) -> Option<&SplitAttributeSpec> {
        self.split_index(attribute).map(|i| &self.splits[i])
    }

    pub(crate) fn split_index(&self, attribute: &str) -> Option<usize> {
        match self.fields.get(attribute) {
            Some(FieldKind::Logical(index)) => Some(*index),
            _ => None,
        }
    }
}

/// Collects field and split declarations for a [`SplitterSchema`].
#[derive(Debug)]
pub struct SchemaBuilder {
    name: String,
    fields: IndexMap<String, FieldKind>,
    reserved: IndexSet<String>,
    splits: Vec<SplitAttributeSpec>,
}

impl SchemaBuilder {
    /// Declares a plain field.
    ///
    /// Declaring a plain or logical field again is a no-op, so the logical
    /// attribute may be listed before or after its split declaration.
    pub fn field(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        match self.fields.get(&name).copied() {
            Some(FieldKind::Plain) | Some(FieldKind::Logical(_)) => Ok(self),
            Some(FieldKind::Segment { .. }) => Err(self.duplicate(name)),
            None if self.reserved.contains(&name) => Err(self.duplicate(name)),
            None => {
                self.fields.insert(name, FieldKind::Plain);
                Ok(self)
            }
        }
    }

    /// Declares `attribute` as split into prefixed segments
    /// (`{segment}_{attribute}`).
    pub fn prefixes<I, S>(self, attribute: impl Into<String>, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(attribute, SegmentMode::Prefix, segments)
    }

    /// Declares `attribute` as split into suffixed segments
    /// (`{attribute}_{segment}`).
    pub fn suffixes<I, S>(self, attribute: impl Into<String>, segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declare(attribute, SegmentMode::Suffix, segments)
    }

    /// Declares a split attribute composed of `segments` in the given order.
    pub fn declare<I, S>(
        mut self,
        attribute: impl Into<String>,
        mode: SegmentMode,
        segments: I,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attribute = attribute.into();
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(SplitterError::EmptySegments(attribute));
        }

        let spec = SplitAttributeSpec::new(attribute.clone(), mode, segments);
        let index = self.splits.len();

        match self.fields.get(&attribute).copied() {
            None if !self.reserved.contains(&attribute) => {}
            Some(FieldKind::Plain) => {}
            _ => return Err(self.duplicate(attribute)),
        }

        let dirty_name = spec.dirty_field_name();
        if self.fields.contains_key(&dirty_name) || self.reserved.contains(&dirty_name) {
            return Err(self.duplicate(dirty_name));
        }

        let mut segment_fields = Vec::with_capacity(spec.segments().len());
        for field in spec.field_names() {
            let taken = field == attribute
                || field == dirty_name
                || self.fields.contains_key(&field)
                || self.reserved.contains(&field)
                || segment_fields.contains(&field);
            if taken {
                return Err(self.duplicate(field));
            }
            segment_fields.push(field);
        }

        tracing::debug!(
            model = %self.name,
            attribute = %attribute,
            mode = ?mode,
            segments = spec.segments().len(),
            "Declared split attribute"
        );

        self.fields.insert(attribute, FieldKind::Logical(index));
        for (position, field) in segment_fields.into_iter().enumerate() {
            self.fields.insert(
                field,
                FieldKind::Segment {
                    split: index,
                    position,
                },
            );
        }
        self.reserved.insert(dirty_name);
        self.splits.push(spec);
        Ok(self)
    }

    /// Finishes the schema. The result is immutable and cheap to share.
    pub fn build(self) -> Arc<SplitterSchema> {
        Arc::new(SplitterSchema {
            name: self.name,
            fields: self.fields,
            splits: self.splits,
        })
    }

    fn duplicate(&self, field: String) -> SplitterError {
        SplitterError::DuplicateField {
            model: self.name.clone(),
            field,
        }
    }
}

/// Schemas by model name.
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: IndexMap<String, Arc<SplitterSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a schema, replacing any earlier schema with the same name.
    pub fn register(&mut self, schema: Arc<SplitterSchema>) {
        if self.schemas.contains_key(schema.name()) {
            tracing::warn!(model = %schema.name(), "Replacing existing schema");
        }
        self.schemas.insert(schema.name().to_string(), schema);
    }

    pub fn with(mut self, schema: Arc<SplitterSchema>) -> Self {
        self.register(schema);
        self
    }

    pub fn get(&self, model: &str) -> Result<&Arc<SplitterSchema>> {
        self.schemas
            .get(model)
            .ok_or_else(|| SplitterError::UnknownModel(model.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<SplitterSchema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_schema() -> Arc<SplitterSchema> {
        SplitterSchema::builder("user")
            .prefixes("phone_number", ["first", "second", "third"])
            .unwrap()
            .suffixes("home_phone", ["area_code", "first_three", "last_four"])
            .unwrap()
            .field("phone_number")
            .unwrap()
            .field("home_phone")
            .unwrap()
            .build()
    }

    #[test]
    fn declares_logical_and_segment_fields() {
        let schema = user_schema();
        assert_eq!(schema.field_kind("phone_number"), Some(FieldKind::Logical(0)));
        assert_eq!(
            schema.field_kind("second_phone_number"),
            Some(FieldKind::Segment {
                split: 0,
                position: 1
            })
        );
        assert_eq!(
            schema.field_kind("home_phone_last_four"),
            Some(FieldKind::Segment {
                split: 1,
                position: 2
            })
        );
        assert_eq!(schema.splits().len(), 2);
    }

    #[test]
    fn fields_keep_declaration_order() {
        let schema = SplitterSchema::builder("user")
            .field("email")
            .unwrap()
            .prefixes("zip", ["head", "tail"])
            .unwrap()
            .build();
        let fields: Vec<_> = schema.fields().collect();
        assert_eq!(fields, vec!["email", "zip", "head_zip", "tail_zip"]);
    }

    #[test]
    fn logical_attribute_may_be_plain_field_first() {
        let schema = SplitterSchema::builder("user")
            .field("phone_number")
            .unwrap()
            .prefixes("phone_number", ["first", "second"])
            .unwrap()
            .build();
        assert!(schema.split("phone_number").is_some());
    }

    #[test]
    fn segment_colliding_with_plain_field_is_rejected() {
        let result = SplitterSchema::builder("user")
            .field("first_phone_number")
            .unwrap()
            .prefixes("phone_number", ["first", "second"]);
        match result {
            Err(SplitterError::DuplicateField { model, field }) => {
                assert_eq!(model, "user");
                assert_eq!(field, "first_phone_number");
            }
            other => panic!("Expected DuplicateField, got {:?}", other),
        }
    }

    #[test]
    fn plain_field_colliding_with_segment_is_rejected() {
        let result = SplitterSchema::builder("user")
            .prefixes("phone_number", ["first"])
            .unwrap()
            .field("first_phone_number");
        assert!(matches!(result, Err(SplitterError::DuplicateField { .. })));
    }

    #[test]
    fn repeated_segment_is_rejected() {
        let result = SplitterSchema::builder("user").suffixes("code", ["a", "a"]);
        assert!(matches!(
            result,
            Err(SplitterError::DuplicateField { field, .. }) if field == "code_a"
        ));
    }

    #[test]
    fn attribute_declared_twice_is_rejected() {
        let result = SplitterSchema::builder("user")
            .prefixes("phone_number", ["first"])
            .unwrap()
            .suffixes("phone_number", ["area"]);
        assert!(matches!(result, Err(SplitterError::DuplicateField { .. })));
    }

    #[test]
    fn dirty_accessor_name_is_reserved() {
        let result = SplitterSchema::builder("user")
            .prefixes("phone", ["home"])
            .unwrap()
            .field("phone_dirty");
        assert!(matches!(result, Err(SplitterError::DuplicateField { .. })));
    }

    #[test]
    fn segment_named_dirty_is_rejected() {
        let result = SplitterSchema::builder("user").suffixes("phone", ["dirty"]);
        assert!(matches!(
            result,
            Err(SplitterError::DuplicateField { field, .. }) if field == "phone_dirty"
        ));
    }

    #[test]
    fn empty_segments_are_rejected() {
        let result = SplitterSchema::builder("user").prefixes("phone", Vec::<String>::new());
        assert!(matches!(result, Err(SplitterError::EmptySegments(attr)) if attr == "phone"));
    }

    #[test]
    fn registry_lookup() {
        let registry = SchemaRegistry::new().with(user_schema());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("user").unwrap().name(), "user");
        assert!(matches!(
            registry.get("account"),
            Err(SplitterError::UnknownModel(name)) if name == "account"
        ));
    }
}
