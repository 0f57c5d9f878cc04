//! # Multi-Field Renderer
//!
//! [`FormBuilder::multi_text_field`] renders one `<input>` per segment of a
//! split attribute. It works purely from the length map it is given and does
//! not need a matching schema declaration:
//!
//! ```rust
//! use attr_splitter::form::{FormBuilder, RenderOptions};
//!
//! let form = FormBuilder::new("user");
//! let options = RenderOptions::prefixed([("first", 3), ("second", 3), ("third", 4)]);
//! let html = form.multi_text_field("phone_number", &options).unwrap();
//!
//! assert!(html.starts_with(
//!     r#"<input id="user_first_phone_number" maxlength="3" name="user[first_phone_number]" style="width: 1.875em; margin-right: 5px;" type="text" />"#
//! ));
//! ```
//!
//! ## Markup
//!
//! Attributes are emitted in the order `id`, `maxlength`, `name`, `onblur`,
//! `onfocus`, `onkeyup`, `style`, `type`, `value`, skipping the ones that do
//! not apply. Inputs are concatenated without separators.
//!
//! ## Behaviors
//!
//! - **Jump** (`include_jump`): every segment except the last moves focus to
//!   the next segment once it holds `maxlength` characters.
//! - **Obscure** (`obscure_text`): a full segment switches to `type="password"`
//!   when it loses focus and back to `text` when it regains it.

use crate::error::{Result, SplitterError};
use crate::model::SegmentMode;
use crate::naming::{NamingConvention, RailsNaming};
use crate::record::Record;
use formtags::{Element, TagRenderer};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::BuildHasher;

/// Width of one character slot, in `em`.
const EM_PER_CHAR: f64 = 0.625;

const SEGMENT_MARGIN: &str = "margin-right: 5px;";

/// Read access to the current values of a form object.
pub trait FieldSource {
    fn field_value(&self, field: &str) -> Option<String>;
}

impl FieldSource for Record {
    fn field_value(&self, field: &str) -> Option<String> {
        self.get_string(field)
    }
}

impl<S: BuildHasher> FieldSource for HashMap<String, String, S> {
    fn field_value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

impl FieldSource for IndexMap<String, String> {
    fn field_value(&self, field: &str) -> Option<String> {
        self.get(field).cloned()
    }
}

/// Options accepted by [`FormBuilder::multi_text_field`].
///
/// Exactly one of `prefixes` and `suffixes` must be given. Each maps segment
/// names to their maximum length, in render order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefixes: Option<IndexMap<String, u32>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffixes: Option<IndexMap<String, u32>>,
    #[serde(default)]
    pub include_jump: bool,
    #[serde(default)]
    pub obscure_text: bool,
}

impl RenderOptions {
    /// Options for prefixed segment fields (`{segment}_{attribute}`).
    pub fn prefixed<I, S>(lengths: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            prefixes: Some(collect_lengths(lengths)),
            ..Self::default()
        }
    }

    /// Options for suffixed segment fields (`{attribute}_{segment}`).
    pub fn suffixed<I, S>(lengths: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            suffixes: Some(collect_lengths(lengths)),
            ..Self::default()
        }
    }

    pub fn with_jump(mut self) -> Self {
        self.include_jump = true;
        self
    }

    pub fn with_obscured_text(mut self) -> Self {
        self.obscure_text = true;
        self
    }
}

fn collect_lengths<I, S>(lengths: I) -> IndexMap<String, u32>
where
    I: IntoIterator<Item = (S, u32)>,
    S: Into<String>,
{
    lengths
        .into_iter()
        .map(|(segment, length)| (segment.into(), length))
        .collect()
}

/// Validated render options for one call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSpec {
    mode: SegmentMode,
    segments: Vec<(String, u32)>,
    include_jump: bool,
    obscure_text: bool,
}

impl RenderSpec {
    /// Checks that exactly one layout is given and every length is positive.
    pub fn from_options(attribute: &str, options: &RenderOptions) -> Result<Self> {
        let (mode, lengths) = match (&options.prefixes, &options.suffixes) {
            (Some(lengths), None) => (SegmentMode::Prefix, lengths),
            (None, Some(lengths)) => (SegmentMode::Suffix, lengths),
            (Some(_), Some(_)) => {
                return Err(SplitterError::ConflictingLayout(attribute.to_string()))
            }
            (None, None) => return Err(SplitterError::MissingLayout(attribute.to_string())),
        };

        if lengths.is_empty() {
            return Err(SplitterError::EmptySegments(attribute.to_string()));
        }
        if let Some((segment, length)) = lengths.iter().find(|(_, length)| **length == 0) {
            return Err(SplitterError::InvalidLength {
                segment: segment.clone(),
                length: *length,
            });
        }

        Ok(Self {
            mode,
            segments: lengths
                .iter()
                .map(|(segment, length)| (segment.clone(), *length))
                .collect(),
            include_jump: options.include_jump,
            obscure_text: options.obscure_text,
        })
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    pub fn segments(&self) -> &[(String, u32)] {
        &self.segments
    }

    pub fn include_jump(&self) -> bool {
        self.include_jump
    }

    pub fn obscure_text(&self) -> bool {
        self.obscure_text
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    Text,
    Password,
}

impl InputType {
    pub fn as_str(self) -> &'static str {
        match self {
            InputType::Text => "text",
            InputType::Password => "password",
        }
    }
}

/// One rendered segment input, before markup generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentInput {
    pub segment: String,
    pub field: String,
    pub id: String,
    pub name: String,
    pub maxlength: u32,
    pub style: String,
    pub onblur: Option<String>,
    pub onfocus: Option<String>,
    pub onkeyup: Option<String>,
    pub input_type: InputType,
    pub value: Option<String>,
}

impl SegmentInput {
    pub fn to_element(&self) -> Element {
        Element::new("input")
            .attr("id", self.id.as_str())
            .attr("maxlength", self.maxlength.to_string())
            .attr("name", self.name.as_str())
            .attr_opt("onblur", self.onblur.as_deref())
            .attr_opt("onfocus", self.onfocus.as_deref())
            .attr_opt("onkeyup", self.onkeyup.as_deref())
            .attr("style", self.style.as_str())
            .attr("type", self.input_type.as_str())
            .attr_opt("value", self.value.as_deref())
    }
}

/// Inline style for a segment holding `length` characters.
pub fn segment_style(length: u32) -> String {
    format!("width: {}em; {}", format_em(length), SEGMENT_MARGIN)
}

/// `length * 0.625`, always with at least one decimal (`2.5`, `5.0`).
fn format_em(length: u32) -> String {
    let width = f64::from(length) * EM_PER_CHAR;
    if width.fract() == 0.0 {
        format!("{:.1}", width)
    } else {
        format!("{}", width)
    }
}

fn jump_script(next_id: &str) -> String {
    format!(
        "if(this.value.length == this.maxLength){{ document.getElementById('{}').focus();}}",
        next_id
    )
}

const OBSCURE_ON_BLUR: &str = "if(this.value.length == this.maxLength){ this.type = 'password'; }";
const REVEAL_ON_FOCUS: &str = "this.type = 'text';";

/// Renders form inputs for one form object.
pub struct FormBuilder<'a, N: NamingConvention = RailsNaming> {
    object_name: String,
    object: Option<&'a dyn FieldSource>,
    naming: N,
    tags: Option<&'a TagRenderer>,
}

impl<'a> FormBuilder<'a, RailsNaming> {
    /// A builder for `object_name` with Rails-style ids and names and no bound
    /// object.
    pub fn new(object_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            object: None,
            naming: RailsNaming,
            tags: None,
        }
    }

    /// A builder bound to a record, named after its model.
    pub fn for_record(record: &'a Record) -> Self {
        Self::new(record.schema().name()).with_object(record)
    }
}

impl<'a, N: NamingConvention> FormBuilder<'a, N> {
    /// Replaces the naming convention.
    pub fn with_naming<M: NamingConvention>(self, naming: M) -> FormBuilder<'a, M> {
        FormBuilder {
            object_name: self.object_name,
            object: self.object,
            naming,
            tags: self.tags,
        }
    }

    /// Binds the object whose current values fill the inputs.
    pub fn with_object(mut self, object: &'a dyn FieldSource) -> Self {
        self.object = Some(object);
        self
    }

    /// Renders through the given renderer instead of the shared default.
    pub fn with_renderer(mut self, tags: &'a TagRenderer) -> Self {
        self.tags = Some(tags);
        self
    }

    pub fn object_name(&self) -> &str {
        &self.object_name
    }

    /// Builds the per-segment inputs without generating markup.
    pub fn multi_text_inputs(
        &self,
        attribute: &str,
        options: &RenderOptions,
    ) -> Result<Vec<SegmentInput>> {
        let spec = RenderSpec::from_options(attribute, options)?;
        let ids: Vec<String> = spec
            .segments()
            .iter()
            .map(|(segment, _)| {
                let field = spec.mode().field_name(attribute, segment);
                self.naming.field_id(&self.object_name, &field)
            })
            .collect();

        let inputs = spec
            .segments()
            .iter()
            .enumerate()
            .map(|(position, (segment, length))| {
                let field = spec.mode().field_name(attribute, segment);
                let onkeyup = match ids.get(position + 1) {
                    Some(next_id) if spec.include_jump() => Some(jump_script(next_id)),
                    _ => None,
                };
                let (onblur, onfocus) = if spec.obscure_text() {
                    (
                        Some(OBSCURE_ON_BLUR.to_string()),
                        Some(REVEAL_ON_FOCUS.to_string()),
                    )
                } else {
                    (None, None)
                };
                tracing::trace!(field = %field, length = *length, "Building segment input");

                SegmentInput {
                    segment: segment.clone(),
                    id: ids[position].clone(),
                    name: self.naming.field_name(&self.object_name, &field),
                    maxlength: *length,
                    style: segment_style(*length),
                    onblur,
                    onfocus,
                    onkeyup,
                    input_type: InputType::Text,
                    value: self.object.and_then(|object| object.field_value(&field)),
                    field,
                }
            })
            .collect();
        Ok(inputs)
    }

    /// Renders one `<input>` per segment, in the order of the length map.
    pub fn multi_text_field(&self, attribute: &str, options: &RenderOptions) -> Result<String> {
        let inputs = self.multi_text_inputs(attribute, options)?;
        let elements: Vec<Element> = inputs.iter().map(SegmentInput::to_element).collect();
        let html = match self.tags {
            Some(tags) => tags.render_all(&elements)?,
            None => formtags::render_all(&elements)?,
        };

        tracing::debug!(
            object = %self.object_name,
            attribute = %attribute,
            segments = inputs.len(),
            jump = options.include_jump,
            obscure = options.obscure_text,
            "Rendered multi text field"
        );
        Ok(html)
    }
}
