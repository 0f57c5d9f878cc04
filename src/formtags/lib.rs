//! # Formtags - Escaped HTML Element Rendering
//!
//! A small layer for emitting HTML form elements through templates, with
//! attribute ordering under the caller's control and escaping handled by the
//! template engine rather than by hand.
//!
//! ## The Problem
//!
//! Form helpers need to produce markup that existing templates and tests
//! compare byte for byte:
//! - Attribute order must be stable (not hash-map order)
//! - Values must be double-quoted and HTML-escaped (`'` becomes `&#x27;`)
//! - Void elements such as `<input>` are self-closed (` />`)
//!
//! ## The Solution
//!
//! - **Elements** are plain data: a tag name and an ordered attribute list
//! - **Templates** define the markup using Jinja2 syntax (via minijinja)
//! - **Escaping** comes from minijinja's HTML auto-escape, enabled for every
//!   template whose name ends in `.html`. Strings are escaped for attribute
//!   values only (`& < > " '`); `/` is left alone
//!
//! ## Quick Example
//!
//! ```rust
//! use formtags::{render_element, Element};
//!
//! let input = Element::new("input")
//!     .attr("id", "user_email")
//!     .attr("name", "user[email]")
//!     .attr("type", "text");
//!
//! let html = render_element(&input).unwrap();
//! assert_eq!(html, r#"<input id="user_email" name="user[email]" type="text" />"#);
//! ```
//!
//! ## Renderer for Custom Templates
//!
//! [`TagRenderer`] owns a minijinja environment preloaded with the built-in
//! element template. Applications can register more templates on it:
//!
//! ```rust
//! use formtags::TagRenderer;
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Label { target: String, text: String }
//!
//! let mut renderer = TagRenderer::new();
//! renderer
//!     .add_template("label.html", r#"<label for="{{ target }}">{{ text }}</label>"#)
//!     .unwrap();
//!
//! let html = renderer
//!     .render("label.html", &Label { target: "user_email".into(), text: "Email".into() })
//!     .unwrap();
//! assert_eq!(html, r#"<label for="user_email">Email</label>"#);
//! ```

use minijinja::{escape_formatter, AutoEscape, Environment, Output, State, Value};
use std::fmt::Write;
use once_cell::sync::Lazy;
use serde::Serialize;

pub use minijinja::Error;

/// Name of the built-in template used by [`TagRenderer::render_element`].
pub const VOID_ELEMENT_TEMPLATE: &str = "void.html";

const VOID_ELEMENT_SOURCE: &str =
    r#"<{{ tag }}{% for attr in attributes %} {{ attr.name }}="{{ attr.value }}"{% endfor %} />"#;

/// Escapes the characters that can end or alter a quoted attribute value.
pub fn escape_attribute(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}

// minijinja's HTML escaping also rewrites `/`, which form markup keeps as is.
fn attribute_formatter(out: &mut Output, state: &State, value: &Value) -> Result<(), Error> {
    match (state.auto_escape(), value.as_str()) {
        (AutoEscape::Html, Some(s)) if !value.is_safe() => {
            out.write_str(&escape_attribute(s)).map_err(Error::from)
        }
        _ => escape_formatter(out, state, value),
    }
}

static DEFAULT_RENDERER: Lazy<TagRenderer> = Lazy::new(TagRenderer::new);

/// A single `name="value"` pair on an element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// An HTML element with attributes kept in insertion order.
///
/// Elements are rendered as void tags (`<tag ... />`). Setting an attribute
/// that already exists replaces its value but keeps its original position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Element {
    tag: String,
    attributes: Vec<Attribute>,
}

impl Element {
    /// Creates an element without attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
        }
    }

    /// Sets an attribute, returning the element for chaining.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets an attribute only when a value is present.
    pub fn attr_opt<V: Into<String>>(self, name: impl Into<String>, value: Option<V>) -> Self {
        match value {
            Some(value) => self.attr(name, value),
            None => self,
        }
    }

    /// Sets an attribute in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value,
            None => self.attributes.push(Attribute { name, value }),
        }
    }

    /// Returns the tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value of an attribute, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Returns the attributes in render order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}

/// A renderer with the built-in element template and any number of
/// application templates.
///
/// The environment is read-only once templates are registered, so a renderer
/// can be shared between threads.
pub struct TagRenderer {
    env: Environment<'static>,
}

impl TagRenderer {
    /// Creates a renderer with the built-in `void.html` template registered.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_formatter(attribute_formatter);
        env.add_template(VOID_ELEMENT_TEMPLATE, VOID_ELEMENT_SOURCE)
            .expect("built-in element template must compile");
        Self { env }
    }

    /// Registers a named template.
    ///
    /// The template is compiled immediately; errors are returned if syntax is
    /// invalid. Names ending in `.html` get HTML auto-escaping.
    pub fn add_template(&mut self, name: &str, source: &str) -> Result<(), Error> {
        self.env
            .add_template_owned(name.to_string(), source.to_string())
    }

    /// Renders a registered template with the given data.
    ///
    /// # Errors
    ///
    /// Returns an error if the template name is not found or rendering fails.
    pub fn render<T: Serialize>(&self, name: &str, data: &T) -> Result<String, Error> {
        let tmpl = self.env.get_template(name)?;
        tmpl.render(data)
    }

    /// Renders an element as a self-closed tag.
    pub fn render_element(&self, element: &Element) -> Result<String, Error> {
        self.render(VOID_ELEMENT_TEMPLATE, element)
    }

    /// Renders several elements and concatenates the results.
    pub fn render_all<'a, I>(&self, elements: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = &'a Element>,
    {
        elements
            .into_iter()
            .map(|element| self.render_element(element))
            .collect()
    }
}

impl Default for TagRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders an element with the shared default renderer.
pub fn render_element(element: &Element) -> Result<String, Error> {
    DEFAULT_RENDERER.render_element(element)
}

/// Renders several elements with the shared default renderer.
pub fn render_all<'a, I>(elements: I) -> Result<String, Error>
where
    I: IntoIterator<Item = &'a Element>,
{
    DEFAULT_RENDERER.render_all(elements)
}
