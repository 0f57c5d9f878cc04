//! Split attribute specifications.
//!
//! A split attribute is one logical value (a phone number) stored as several
//! physical segment fields (area code, prefix, line number). This module holds
//! the schema-level description of one such attribute; the per-record values
//! live in [`crate::record`].

use serde::{Deserialize, Serialize};

/// Where the segment name goes in a physical field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentMode {
    /// `{segment}_{attribute}`, e.g. `first_phone_number`
    Prefix,
    /// `{attribute}_{segment}`, e.g. `home_phone_area_code`
    Suffix,
}

impl SegmentMode {
    /// Builds the physical field name for one segment of an attribute.
    pub fn field_name(self, attribute: &str, segment: &str) -> String {
        match self {
            SegmentMode::Prefix => format!("{}_{}", segment, attribute),
            SegmentMode::Suffix => format!("{}_{}", attribute, segment),
        }
    }
}

/// Schema entry for one logical attribute split across ordered segments.
///
/// Segment order is the concatenation order used when the attribute is
/// recombined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAttributeSpec {
    attribute: String,
    mode: SegmentMode,
    segments: Vec<String>,
}

impl SplitAttributeSpec {
    pub(crate) fn new(attribute: String, mode: SegmentMode, segments: Vec<String>) -> Self {
        Self {
            attribute,
            mode,
            segments,
        }
    }

    /// The logical attribute name (e.g. `phone_number`).
    pub fn attribute(&self) -> &str {
        &self.attribute
    }

    pub fn mode(&self) -> SegmentMode {
        self.mode
    }

    /// Segment names in declared order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Physical field name for a segment.
    pub fn field_name(&self, segment: &str) -> String {
        self.mode.field_name(&self.attribute, segment)
    }

    /// Physical field names for all segments, in declared order.
    pub fn field_names(&self) -> impl Iterator<Item = String> + '_ {
        self.segments.iter().map(|segment| self.field_name(segment))
    }

    /// Name of the dirty accessor reserved for this attribute.
    pub fn dirty_field_name(&self) -> String {
        format!("{}_dirty", self.attribute)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phone_spec(mode: SegmentMode) -> SplitAttributeSpec {
        SplitAttributeSpec::new(
            "phone_number".into(),
            mode,
            vec!["first".into(), "second".into(), "third".into()],
        )
    }

    #[test]
    fn prefix_mode_puts_segment_first() {
        assert_eq!(
            SegmentMode::Prefix.field_name("phone_number", "first"),
            "first_phone_number"
        );
    }

    #[test]
    fn suffix_mode_puts_segment_last() {
        assert_eq!(
            SegmentMode::Suffix.field_name("home_phone", "area_code"),
            "home_phone_area_code"
        );
    }

    #[test]
    fn field_names_follow_declared_order() {
        let names: Vec<_> = phone_spec(SegmentMode::Prefix).field_names().collect();
        assert_eq!(
            names,
            vec!["first_phone_number", "second_phone_number", "third_phone_number"]
        );
    }

    #[test]
    fn dirty_field_name_uses_attribute() {
        assert_eq!(
            phone_spec(SegmentMode::Suffix).dirty_field_name(),
            "phone_number_dirty"
        );
    }

    #[test]
    fn mode_deserializes_lowercase() {
        let mode: SegmentMode = serde_json::from_str("\"suffix\"").unwrap();
        assert_eq!(mode, SegmentMode::Suffix);
    }
}
