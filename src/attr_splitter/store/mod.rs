//! # Storage Layer
//!
//! Persistence is owned by the host application. This module defines the one
//! contract the splitter needs from it: the [`DataStore`] trait, which saves
//! and loads [`StoredRecord`]s keyed by model name and id.
//!
//! ## Implementations
//!
//! - [`memory::InMemoryStore`]: In-memory storage for tests and the CLI
//!   - No persistence
//!   - Can simulate write failures
//!
//! Combination happens in [`crate::record::Record::save`] before the store is
//! called, so stores only ever see already-combined values.

use crate::error::Result;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

pub mod memory;

/// The persisted form of a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: Uuid,
    pub model: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set fields only, in schema assignment order.
    #[serde(default)]
    pub values: IndexMap<String, Value>,
}

/// Abstract interface for record storage.
pub trait DataStore {
    /// Save a record (create or update)
    fn save_record(&mut self, record: &StoredRecord) -> Result<()>;

    /// Get a record by model and id
    fn get_record(&self, model: &str, id: &Uuid) -> Result<StoredRecord>;

    /// List all records of a model
    fn list_records(&self, model: &str) -> Result<Vec<StoredRecord>>;

    /// Permanently remove a record
    fn delete_record(&mut self, model: &str, id: &Uuid) -> Result<()>;
}
