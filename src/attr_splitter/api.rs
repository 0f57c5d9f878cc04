//! # API Facade
//!
//! [`SplitterApi`] is the single entry point for applications that want the
//! whole flow: look up a model schema, create or update records so split
//! attributes are recombined, and render the segment inputs for a record.
//!
//! It holds no logic of its own. Combination lives in [`crate::record`],
//! markup in [`crate::form`], and persistence behind [`DataStore`].
//!
//! Applications that keep their models in [`SplitterConfig`] build the API
//! with [`SplitterApi::from_config`], which also makes the configured segment
//! lengths available to [`SplitterApi::render_declared`].
//!
//! ## Generic Over DataStore
//!
//! `SplitterApi<S: DataStore>` is generic over the storage backend, so the
//! host application plugs in its own persistence and tests use
//! [`crate::store::memory::InMemoryStore`].

use crate::config::{RenderDefaults, SplitterConfig};
use crate::error::Result;
use crate::form::{FormBuilder, RenderOptions};
use crate::record::Record;
use crate::schema::SchemaRegistry;
use crate::store::DataStore;
use serde_json::Value;
use uuid::Uuid;

pub struct SplitterApi<S: DataStore> {
    registry: SchemaRegistry,
    config: SplitterConfig,
    store: S,
}

impl<S: DataStore> SplitterApi<S> {
    /// Creates an API over hand-built schemas. No split has configured
    /// lengths, so only [`Self::render_fields`] can render.
    pub fn new(registry: SchemaRegistry, store: S) -> Self {
        Self {
            registry,
            config: SplitterConfig::default(),
            store,
        }
    }

    /// Creates an API whose schemas and render lengths come from `config`.
    pub fn from_config(config: SplitterConfig, store: S) -> Result<Self> {
        Ok(Self {
            registry: config.registry()?,
            config,
            store,
        })
    }

    pub fn config(&self) -> &SplitterConfig {
        &self.config
    }

    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Creates and saves a record from field values.
    pub fn create<I, K, V>(&mut self, model: &str, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let schema = self.registry.get(model)?.clone();
        let mut record = Record::new(schema);
        record.assign(values)?;
        record.save(&mut self.store)?;
        Ok(record)
    }

    /// Loads a record, applies field values and saves it.
    pub fn update<I, K, V>(&mut self, model: &str, id: Uuid, values: I) -> Result<Record>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let mut record = self.find(model, id)?;
        record.assign(values)?;
        record.save(&mut self.store)?;
        Ok(record)
    }

    pub fn find(&self, model: &str, id: Uuid) -> Result<Record> {
        let schema = self.registry.get(model)?.clone();
        let stored = self.store.get_record(model, &id)?;
        Record::from_stored(schema, stored)
    }

    pub fn list(&self, model: &str) -> Result<Vec<Record>> {
        let schema = self.registry.get(model)?;
        self.store
            .list_records(model)?
            .into_iter()
            .map(|stored| Record::from_stored(schema.clone(), stored))
            .collect()
    }

    /// Renders segment inputs for a stored record, or a blank form when `id`
    /// is `None`.
    pub fn render_fields(
        &self,
        model: &str,
        id: Option<Uuid>,
        attribute: &str,
        options: &RenderOptions,
    ) -> Result<String> {
        match id {
            Some(id) => {
                let record = self.find(model, id)?;
                let form = FormBuilder::for_record(&record);
                form.multi_text_field(attribute, options)
            }
            None => {
                let schema = self.registry.get(model)?;
                FormBuilder::new(schema.name()).multi_text_field(attribute, options)
            }
        }
    }

    /// Like [`Self::render_fields`], with the segment lengths of the
    /// configured split. A behavior is on when `flags` or the config's render
    /// defaults enable it.
    pub fn render_declared(
        &self,
        model: &str,
        id: Option<Uuid>,
        attribute: &str,
        flags: RenderDefaults,
    ) -> Result<String> {
        let options = self.config.render_options(model, attribute, flags)?;
        self.render_fields(model, id, attribute, &options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SplitterError;
    use crate::store::memory::fixtures::StoreFixture;
    use crate::store::memory::InMemoryStore;

    fn api() -> SplitterApi<InMemoryStore> {
        let fixture = StoreFixture::new();
        SplitterApi::new(SchemaRegistry::new().with(fixture.schema), fixture.store)
    }

    #[test]
    fn create_combines_and_persists() {
        let mut api = api();
        let record = api
            .create(
                "user",
                [
                    ("first_phone_number", "415"),
                    ("second_phone_number", "555"),
                    ("third_phone_number", "9999"),
                ],
            )
            .unwrap();

        let found = api.find("user", record.id()).unwrap();
        assert_eq!(found.get_string("phone_number").unwrap(), "4155559999");
    }

    #[test]
    fn update_recombines_changed_split_only() {
        let mut api = api();
        let record = api
            .create("user", [("first_phone_number", "415"), ("third_phone_number", "9999")])
            .unwrap();

        let updated = api
            .update("user", record.id(), [("home_phone_area_code", "222")])
            .unwrap();

        assert_eq!(updated.get_string("phone_number").unwrap(), "4159999");
        assert_eq!(updated.get_string("home_phone").unwrap(), "222");
        assert!(!updated.is_dirty("home_phone").unwrap());
    }

    #[test]
    fn create_unknown_model_fails() {
        let mut api = api();
        let result = api.create("account", Vec::<(String, String)>::new());
        assert!(matches!(result, Err(SplitterError::UnknownModel(_))));
    }

    #[test]
    fn create_unknown_field_saves_nothing() {
        let mut api = api();
        let result = api.create("user", [("fax", "1")]);
        assert!(matches!(result, Err(SplitterError::UnknownField { .. })));
        assert!(api.store().is_empty());
    }

    #[test]
    fn list_returns_records() {
        let mut api = api();
        api.create("user", [("email", "a@example.com")]).unwrap();
        api.create("user", [("email", "b@example.com")]).unwrap();
        assert_eq!(api.list("user").unwrap().len(), 2);
    }

    #[test]
    fn render_fields_uses_record_values() {
        let mut api = api();
        let record = api
            .create("user", [("home_phone_area_code", "415")])
            .unwrap();

        let html = api
            .render_fields(
                "user",
                Some(record.id()),
                "home_phone",
                &RenderOptions::suffixed([("area_code", 3), ("first_three", 3)]),
            )
            .unwrap();

        assert!(html.contains(r#"id="user_home_phone_area_code""#));
        assert!(html.contains(r#"value="415""#));
        assert!(!html.contains(r#"value="""#));
    }

    fn configured_api() -> SplitterApi<InMemoryStore> {
        let config: SplitterConfig = serde_json::from_str(
            r#"{"models": [{"name": "card", "fields": ["holder"], "splits": [
                {"attribute": "pin", "suffixes": {"a": 2, "b": 4}}
            ]}], "render": {"include_jump": true}}"#,
        )
        .unwrap();
        SplitterApi::from_config(config, InMemoryStore::new()).unwrap()
    }

    #[test]
    fn render_declared_uses_configured_lengths() {
        let mut api = configured_api();
        let record = api.create("card", [("pin_a", "12")]).unwrap();

        let html = api
            .render_declared(
                "card",
                Some(record.id()),
                "pin",
                RenderDefaults {
                    include_jump: false,
                    obscure_text: true,
                },
            )
            .unwrap();

        assert_eq!(html.matches("<input").count(), 2);
        assert!(html.contains(r#"id="card_pin_a" maxlength="2""#));
        assert!(html.contains(r#"id="card_pin_b" maxlength="4""#));
        assert!(html.contains(r#"value="12""#));
        // jump from the config, obscuring from the flags
        assert_eq!(html.matches("onkeyup=").count(), 1);
        assert_eq!(html.matches("onblur=").count(), 2);
    }

    #[test]
    fn render_declared_unknown_split_fails() {
        let api = configured_api();
        let result = api.render_declared("card", None, "holder", RenderDefaults::default());
        assert!(matches!(
            result,
            Err(SplitterError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn render_declared_without_config_fails() {
        let api = api();
        let result = api.render_declared("user", None, "phone_number", RenderDefaults::default());
        assert!(matches!(result, Err(SplitterError::UnknownModel(_))));
    }

    #[test]
    fn render_fields_without_record() {
        let api = api();
        let html = api
            .render_fields(
                "user",
                None,
                "phone_number",
                &RenderOptions::prefixed([("first", 3)]),
            )
            .unwrap();
        assert!(!html.contains("value="));
    }
}
