use super::{DataStore, StoredRecord};
use crate::error::{Result, SplitterError};
use std::collections::HashMap;
use uuid::Uuid;

/// In-memory storage for testing and development.
/// Does NOT persist data.
#[derive(Default)]
pub struct InMemoryStore {
    records: HashMap<(String, Uuid), StoredRecord>,
    simulate_write_error: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&mut self, simulate: bool) {
        self.simulate_write_error = simulate;
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DataStore for InMemoryStore {
    fn save_record(&mut self, record: &StoredRecord) -> Result<()> {
        if self.simulate_write_error {
            return Err(SplitterError::Store("Simulated write error".to_string()));
        }
        self.records
            .insert((record.model.clone(), record.id), record.clone());
        Ok(())
    }

    fn get_record(&self, model: &str, id: &Uuid) -> Result<StoredRecord> {
        self.records
            .get(&(model.to_string(), *id))
            .cloned()
            .ok_or(SplitterError::RecordNotFound(*id))
    }

    fn list_records(&self, model: &str) -> Result<Vec<StoredRecord>> {
        let mut records: Vec<StoredRecord> = self
            .records
            .iter()
            .filter(|((m, _), _)| m == model)
            .map(|(_, r)| r.clone())
            .collect();
        records.sort_by_key(|r| r.created_at);
        Ok(records)
    }

    fn delete_record(&mut self, model: &str, id: &Uuid) -> Result<()> {
        if self.records.remove(&(model.to_string(), *id)).is_none() {
            return Err(SplitterError::RecordNotFound(*id));
        }
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::record::Record;
    use crate::schema::SplitterSchema;
    use std::sync::Arc;

    pub struct StoreFixture {
        pub store: InMemoryStore,
        pub schema: Arc<SplitterSchema>,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        /// A store for the `user` model with a prefixed `phone_number` and a
        /// suffixed `home_phone`.
        pub fn new() -> Self {
            let schema = SplitterSchema::builder("user")
                .prefixes("phone_number", ["first", "second", "third"])
                .and_then(|b| b.suffixes("home_phone", ["area_code", "first_three", "last_four"]))
                .and_then(|b| b.field("email"))
                .expect("fixture schema is valid")
                .build();
            Self {
                store: InMemoryStore::new(),
                schema,
            }
        }

        /// Saves a user whose phone number segments are set.
        pub fn with_phone(mut self, first: &str, second: &str, third: &str) -> Self {
            let mut record = Record::new(self.schema.clone());
            record
                .assign([
                    ("first_phone_number", first),
                    ("second_phone_number", second),
                    ("third_phone_number", third),
                ])
                .unwrap();
            record.save(&mut self.store).unwrap();
            self
        }

        /// Saves `count` users without any split values.
        pub fn with_blank_users(mut self, count: usize) -> Self {
            for i in 0..count {
                let mut record = Record::new(self.schema.clone());
                record
                    .set("email", format!("user{}@example.com", i + 1))
                    .unwrap();
                record.save(&mut self.store).unwrap();
            }
            self
        }
    }
}
