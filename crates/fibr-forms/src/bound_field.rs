//! Bound fields: a field paired with its render state and current value.
//!
//! A [`BoundField`] is what a [`FieldRenderer`](crate::registry::FieldRenderer)
//! receives. It borrows the descriptor from the blueprint and the value from
//! the session's form state.

use crate::fields::FieldDescriptor;
use crate::resolver::{resolve_render_state, RenderState};
use crate::value::Value;

/// A field bound to a render state and value.
#[derive(Debug, Clone)]
pub struct BoundField<'a> {
    /// The field key (HTML `name` attribute).
    pub key: &'a str,
    /// The field's descriptor.
    pub field: &'a FieldDescriptor,
    /// The resolved render state.
    pub state: RenderState,
    /// The current value, if any.
    pub value: Option<&'a Value>,
    /// The HTML `id` attribute.
    pub html_id: String,
}

impl<'a> BoundField<'a> {
    /// Binds `field` under `key` to `value`, resolving its render state.
    pub fn new(
        key: &'a str,
        field: &'a FieldDescriptor,
        value: Option<&'a Value>,
        id_prefix: &str,
    ) -> Self {
        Self {
            key,
            field,
            state: resolve_render_state(field, value),
            value,
            html_id: format!("{id_prefix}{key}"),
        }
    }

    /// The display label: the configured one, or the key with underscores
    /// replaced by spaces.
    pub fn label(&self) -> String {
        self.field
            .label
            .clone()
            .unwrap_or_else(|| self.key.replace('_', " "))
    }

    /// The description, if any.
    pub fn description(&self) -> Option<&str> {
        self.field.description.as_deref()
    }

    /// Returns `true` if the field is read-only.
    pub const fn is_read_only(&self) -> bool {
        self.state.is_read_only()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldConfig};

    #[test]
    fn test_bound_field_basics() {
        let field = fields::boolean(FieldConfig::new().label("Switch").read_only(true)).unwrap();
        let value = Value::Bool(true);
        let bound = BoundField::new("check_button", &field, Some(&value), "id_");

        assert_eq!(bound.key, "check_button");
        assert_eq!(bound.html_id, "id_check_button");
        assert_eq!(bound.label(), "Switch");
        assert!(bound.is_read_only());
        assert_eq!(bound.value, Some(&Value::Bool(true)));
    }

    #[test]
    fn test_label_falls_back_to_key() {
        let field = fields::string(FieldConfig::new()).unwrap();
        let bound = BoundField::new("first_name", &field, None, "");
        assert_eq!(bound.label(), "first name");
        assert_eq!(bound.html_id, "first_name");
        assert!(bound.description().is_none());
    }
}
