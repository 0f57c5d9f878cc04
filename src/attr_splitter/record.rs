//! # Records
//!
//! A [`Record`] is one model instance: an id, timestamps, the values of the
//! fields its [`SplitterSchema`] declares, and the bookkeeping needed to
//! recombine split attributes.
//!
//! ## Combination
//!
//! Segment fields are ordinary settable fields. When the record is persisted
//! ([`Record::save`]), every split attribute whose segments changed since the
//! last combination gets its logical value rebuilt by concatenating the
//! segment values in declared order. Unset segments count as the empty string.
//! Split attributes whose segments did not change are left alone, so saving a
//! record after editing unrelated fields never overwrites a combined value.
//!
//! ## Dirty Flag
//!
//! [`Record::is_dirty`] reports, per split attribute, whether a recombination
//! is pending or was applied and not yet persisted. It turns true as soon as a
//! segment is assigned a new value and is reset by a successful save.

use crate::error::{Result, SplitterError};
use crate::schema::SplitterSchema;
use crate::store::{DataStore, StoredRecord};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

/// Coerces a field value to the string used when concatenating segments.
///
/// Strings are used as-is, `null` becomes empty, numbers and booleans use their
/// display form and anything else its JSON text.
pub fn coerce_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone)]
struct SplitState {
    /// Segment values at the last combination (or load), in declared order.
    snapshot: Vec<Option<Value>>,
    /// Set when a combination ran and the result has not been persisted yet.
    combined: bool,
}

#[derive(Debug, Clone)]
pub struct Record {
    id: Uuid,
    schema: Arc<SplitterSchema>,
    values: IndexMap<String, Value>,
    splits: Vec<SplitState>,
    persisted: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Record {
    /// Creates an unsaved record with every field unset.
    pub fn new(schema: Arc<SplitterSchema>) -> Self {
        let splits = schema
            .splits()
            .iter()
            .map(|spec| SplitState {
                snapshot: vec![None; spec.segments().len()],
                combined: false,
            })
            .collect();
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            schema,
            values: IndexMap::new(),
            splits,
            persisted: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuilds a record from its persisted form.
    ///
    /// The stored segment values become the combination snapshot, so a freshly
    /// loaded record is not dirty.
    pub fn from_stored(schema: Arc<SplitterSchema>, stored: StoredRecord) -> Result<Self> {
        if stored.model != schema.name() {
            return Err(SplitterError::UnknownModel(stored.model));
        }

        let mut record = Self::new(schema);
        record.id = stored.id;
        record.created_at = stored.created_at;
        record.updated_at = stored.updated_at;
        record.persisted = true;
        for (field, value) in stored.values {
            record.set(field, value)?;
        }
        for index in 0..record.splits.len() {
            record.splits[index].snapshot = record.segment_values(index);
        }
        Ok(record)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn schema(&self) -> &Arc<SplitterSchema> {
        &self.schema
    }

    /// True once the record has been saved to (or loaded from) a store.
    pub fn is_persisted(&self) -> bool {
        self.persisted
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns a field's value, or `None` when unset or not part of the schema.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns a field's value coerced to a string, or `None` when unset.
    pub fn get_string(&self, field: &str) -> Option<String> {
        self.get(field).map(coerce_to_string)
    }

    /// Sets a field. Assigning `null` unsets it.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<Value>) -> Result<()> {
        let field = field.into();
        if !self.schema.has_field(&field) {
            return Err(SplitterError::UnknownField {
                model: self.schema.name().to_string(),
                field,
            });
        }

        match value.into() {
            Value::Null => {
                self.values.shift_remove(&field);
            }
            value => {
                self.values.insert(field, value);
            }
        }
        Ok(())
    }

    /// Sets several fields at once, stopping at the first unknown field.
    pub fn assign<I, K, V>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (field, value) in values {
            self.set(field, value)?;
        }
        Ok(())
    }

    /// Whether the split attribute has a recombination pending or applied but
    /// not yet persisted.
    pub fn is_dirty(&self, attribute: &str) -> Result<bool> {
        let index = self.split_index(attribute)?;
        Ok(self.splits[index].combined || self.segments_changed(index))
    }

    /// Recombines every split attribute whose segments changed since the last
    /// combination. Returns the names of the attributes that were rebuilt.
    ///
    /// [`Record::save`] calls this; calling it directly is only needed to read
    /// combined values without persisting.
    pub fn combine(&mut self) -> Vec<String> {
        let mut combined = Vec::new();
        for index in 0..self.splits.len() {
            let current = self.segment_values(index);
            if current == self.splits[index].snapshot {
                continue;
            }

            let joined: String = current
                .iter()
                .map(|value| value.as_ref().map(coerce_to_string).unwrap_or_default())
                .collect();
            let attribute = self.schema.splits()[index].attribute().to_string();
            tracing::debug!(
                model = %self.schema.name(),
                attribute = %attribute,
                record = %self.id,
                "Combined split attribute"
            );

            self.values.insert(attribute.clone(), Value::String(joined));
            let state = &mut self.splits[index];
            state.snapshot = current;
            state.combined = true;
            combined.push(attribute);
        }
        combined
    }

    /// Combines changed split attributes and writes the record to the store.
    ///
    /// Dirty flags are reset only when the store accepts the write; store
    /// errors are returned unchanged.
    pub fn save<S: DataStore>(&mut self, store: &mut S) -> Result<()> {
        self.combine();

        let now = Utc::now();
        let mut stored = self.to_stored();
        stored.updated_at = now;
        if !self.persisted {
            stored.created_at = now;
        }
        store.save_record(&stored)?;

        tracing::debug!(
            model = %self.schema.name(),
            record = %self.id,
            created = !self.persisted,
            "Saved record"
        );
        self.created_at = stored.created_at;
        self.updated_at = now;
        self.persisted = true;
        for state in &mut self.splits {
            state.combined = false;
        }
        Ok(())
    }

    /// The persisted form of the record's current values.
    pub fn to_stored(&self) -> StoredRecord {
        StoredRecord {
            id: self.id,
            model: self.schema.name().to_string(),
            created_at: self.created_at,
            updated_at: self.updated_at,
            values: self.values.clone(),
        }
    }

    fn split_index(&self, attribute: &str) -> Result<usize> {
        self.schema
            .split_index(attribute)
            .ok_or_else(|| SplitterError::UnknownAttribute {
                model: self.schema.name().to_string(),
                attribute: attribute.to_string(),
            })
    }

    fn segment_values(&self, index: usize) -> Vec<Option<Value>> {
        self.schema.splits()[index]
            .field_names()
            .map(|field| self.values.get(&field).cloned())
            .collect()
    }

    fn segments_changed(&self, index: usize) -> bool {
        self.segment_values(index) != self.splits[index].snapshot
    }
}
