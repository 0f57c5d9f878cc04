//! Element id and name conventions.
//!
//! Form frameworks derive an input's `id` and `name` from the form object name
//! and the field name. The renderer goes through [`NamingConvention`] so it is
//! not tied to one framework's rules; [`RailsNaming`] is the default.

/// Builds `id` and `name` attribute values for a form field.
pub trait NamingConvention {
    /// The element id, e.g. `user_first_phone_number`.
    fn field_id(&self, object_name: &str, field: &str) -> String;

    /// The submitted parameter name, e.g. `user[first_phone_number]`.
    fn field_name(&self, object_name: &str, field: &str) -> String;
}

/// `record_field` ids and `record[field]` names.
///
/// Nested object names such as `user[address]` are flattened for ids
/// (`user_address_street`) and kept as-is for names
/// (`user[address][street]`).
#[derive(Debug, Clone, Copy, Default)]
pub struct RailsNaming;

impl RailsNaming {
    fn sanitize_object_name(object_name: &str) -> String {
        let replaced = object_name.replace("][", "_");
        let mut sanitized: String = replaced
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | ':' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        if sanitized.ends_with('_') {
            sanitized.pop();
        }
        sanitized
    }
}

impl NamingConvention for RailsNaming {
    fn field_id(&self, object_name: &str, field: &str) -> String {
        let field = field.strip_suffix('?').unwrap_or(field);
        format!("{}_{}", Self::sanitize_object_name(object_name), field)
    }

    fn field_name(&self, object_name: &str, field: &str) -> String {
        format!("{}[{}]", object_name, field)
    }
}

/// Uses the bare field name for both `id` and `name`.
///
/// For forms that are not bound to an object namespace.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatNaming;

impl NamingConvention for FlatNaming {
    fn field_id(&self, _object_name: &str, field: &str) -> String {
        field.to_string()
    }

    fn field_name(&self, _object_name: &str, field: &str) -> String {
        field.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rails_id_and_name() {
        let naming = RailsNaming;
        assert_eq!(
            naming.field_id("user", "first_phone_number"),
            "user_first_phone_number"
        );
        assert_eq!(
            naming.field_name("user", "first_phone_number"),
            "user[first_phone_number]"
        );
    }

    #[test]
    fn rails_nested_object_name() {
        let naming = RailsNaming;
        assert_eq!(
            naming.field_id("user[address]", "zip_head"),
            "user_address_zip_head"
        );
        assert_eq!(
            naming.field_id("order[lines][0]", "code"),
            "order_lines_0_code"
        );
        assert_eq!(
            naming.field_name("user[address]", "zip_head"),
            "user[address][zip_head]"
        );
    }

    #[test]
    fn rails_keeps_allowed_punctuation() {
        assert_eq!(
            RailsNaming.field_id("admin:user.v2", "pin"),
            "admin:user.v2_pin"
        );
    }

    #[test]
    fn flat_naming_ignores_object() {
        assert_eq!(FlatNaming.field_id("user", "pin_a"), "pin_a");
        assert_eq!(FlatNaming.field_name("user", "pin_a"), "pin_a");
    }
}
