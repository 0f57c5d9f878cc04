use crate::error::{Result, SplitterError};
use crate::form::{RenderOptions, RenderSpec};
use crate::schema::{SchemaRegistry, SplitterSchema};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

pub const CONFIG_FILENAME: &str = "attr_splitter.json";

/// Model declarations and render defaults, stored in `attr_splitter.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitterConfig {
    #[serde(default)]
    pub models: Vec<ModelConfig>,

    /// Behaviors applied when rendering from configuration
    #[serde(default)]
    pub render: RenderDefaults,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModelConfig {
    pub name: String,

    /// Plain fields besides the split attributes
    #[serde(default)]
    pub fields: Vec<String>,

    #[serde(default)]
    pub splits: Vec<SplitConfig>,
}

/// One split attribute: segment names and lengths, in order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SplitConfig {
    pub attribute: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<IndexMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<IndexMap<String, u32>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenderDefaults {
    #[serde(default)]
    pub include_jump: bool,
    #[serde(default)]
    pub obscure_text: bool,
}

impl SplitConfig {
    /// Render options for this split with the given behaviors.
    pub fn render_options(&self, defaults: RenderDefaults) -> RenderOptions {
        RenderOptions {
            prefixes: self.prefixes.clone(),
            suffixes: self.suffixes.clone(),
            include_jump: defaults.include_jump,
            obscure_text: defaults.obscure_text,
        }
    }
}

impl ModelConfig {
    /// Builds the schema, reporting the first invalid declaration.
    pub fn to_schema(&self) -> Result<Arc<SplitterSchema>> {
        let mut builder = SplitterSchema::builder(self.name.as_str());
        for field in &self.fields {
            builder = builder.field(field.as_str())?;
        }
        for split in &self.splits {
            let spec = RenderSpec::from_options(
                &split.attribute,
                &split.render_options(RenderDefaults::default()),
            )?;
            let segments = spec.segments().iter().map(|(segment, _)| segment.clone());
            builder = builder.declare(split.attribute.as_str(), spec.mode(), segments)?;
        }
        Ok(builder.build())
    }

    pub fn split(&self, attribute: &str) -> Result<&SplitConfig> {
        self.splits
            .iter()
            .find(|split| split.attribute == attribute)
            .ok_or_else(|| SplitterError::UnknownAttribute {
                model: self.name.clone(),
                attribute: attribute.to_string(),
            })
    }
}

impl SplitterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        Self::load_file(config_path)
    }

    /// Load config from an explicit file path
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Loading config");
        let content = fs::read_to_string(path)?;
        let config: SplitterConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_path, content)?;
        Ok(())
    }

    pub fn model(&self, name: &str) -> Result<&ModelConfig> {
        self.models
            .iter()
            .find(|model| model.name == name)
            .ok_or_else(|| SplitterError::UnknownModel(name.to_string()))
    }

    /// Render options for a configured split attribute.
    ///
    /// A behavior is on when either the config defaults or `overrides` enable it.
    pub fn render_options(
        &self,
        model: &str,
        attribute: &str,
        overrides: RenderDefaults,
    ) -> Result<RenderOptions> {
        let split = self.model(model)?.split(attribute)?;
        Ok(split.render_options(RenderDefaults {
            include_jump: self.render.include_jump || overrides.include_jump,
            obscure_text: self.render.obscure_text || overrides.obscure_text,
        }))
    }

    /// Builds a schema for every configured model.
    pub fn registry(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for model in &self.models {
            registry.register(model.to_schema()?);
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SegmentMode;

    const USER_CONFIG: &str = r#"{
        "models": [
            {
                "name": "user",
                "fields": ["email"],
                "splits": [
                    {"attribute": "phone_number", "prefixes": {"first": 3, "second": 3, "third": 4}},
                    {"attribute": "home_phone", "suffixes": {"area_code": 3, "first_three": 3, "last_four": 4}}
                ]
            }
        ],
        "render": {"include_jump": true}
    }"#;

    fn user_config() -> SplitterConfig {
        serde_json::from_str(USER_CONFIG).unwrap()
    }

    #[test]
    fn test_default_config_is_empty() {
        let config = SplitterConfig::default();
        assert!(config.models.is_empty());
        assert!(!config.render.include_jump);
        assert!(!config.render.obscure_text);
    }

    #[test]
    fn test_parse_keeps_segment_order() {
        let config = user_config();
        let split = config.model("user").unwrap().split("home_phone").unwrap();
        let segments: Vec<_> = split.suffixes.as_ref().unwrap().keys().cloned().collect();
        assert_eq!(segments, vec!["area_code", "first_three", "last_four"]);
        assert!(config.render.include_jump);
    }

    #[test]
    fn test_registry_builds_schemas() {
        let registry = user_config().registry().unwrap();
        let schema = registry.get("user").unwrap();
        assert!(schema.has_field("email"));
        assert_eq!(
            schema.split("phone_number").unwrap().mode(),
            SegmentMode::Prefix
        );
        assert_eq!(
            schema.split("home_phone").unwrap().segments(),
            &["area_code", "first_three", "last_four"]
        );
    }

    #[test]
    fn test_split_with_both_layouts_fails() {
        let config: SplitterConfig = serde_json::from_str(
            r#"{"models": [{"name": "user", "splits": [
                {"attribute": "pin", "prefixes": {"a": 1}, "suffixes": {"b": 1}}
            ]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.registry(),
            Err(SplitterError::ConflictingLayout(attr)) if attr == "pin"
        ));
    }

    #[test]
    fn test_colliding_field_fails() {
        let config: SplitterConfig = serde_json::from_str(
            r#"{"models": [{"name": "user", "fields": ["pin_a"], "splits": [
                {"attribute": "pin", "suffixes": {"a": 1}}
            ]}]}"#,
        )
        .unwrap();
        assert!(matches!(
            config.registry(),
            Err(SplitterError::DuplicateField { .. })
        ));
    }

    #[test]
    fn test_unknown_model_and_attribute() {
        let config = user_config();
        assert!(matches!(
            config.model("account"),
            Err(SplitterError::UnknownModel(_))
        ));
        assert!(matches!(
            config.model("user").unwrap().split("fax"),
            Err(SplitterError::UnknownAttribute { .. })
        ));
    }

    #[test]
    fn test_render_options_merge_flags() {
        let config: SplitterConfig = serde_json::from_str(
            r#"{"models": [{"name": "user", "splits": [
                {"attribute": "pin", "suffixes": {"a": 2, "b": 2}}
            ]}], "render": {"obscure_text": true}}"#,
        )
        .unwrap();

        let options = config
            .render_options(
                "user",
                "pin",
                RenderDefaults {
                    include_jump: true,
                    obscure_text: false,
                },
            )
            .unwrap();

        assert!(options.include_jump);
        assert!(options.obscure_text);
        assert_eq!(options.suffixes.unwrap().len(), 2);
        assert!(options.prefixes.is_none());
    }

    #[test]
    fn test_load_missing_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config = SplitterConfig::load(temp_dir.path()).unwrap();
        assert_eq!(config, SplitterConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = tempfile::tempdir().unwrap();
        let dir = temp_dir.path().join("nested");

        let config = user_config();
        config.save(&dir).unwrap();

        let loaded = SplitterConfig::load(&dir).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join(CONFIG_FILENAME);
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            SplitterConfig::load_file(&path),
            Err(SplitterError::Serialization(_))
        ));
    }
}
