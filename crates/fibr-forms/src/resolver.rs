//! Render-state resolution.
//!
//! Given a field descriptor, [`resolve_render_state`] determines three
//! orthogonal states: whether the field is visible, whether it accepts edits,
//! and which layout it renders with. The result depends only on the
//! descriptor.
//!
//! A hidden field is removed from the rendered tree entirely rather than
//! rendered invisibly, so it never takes up layout space. Its value is still
//! part of the form state and of submissions.

use crate::fields::FieldDescriptor;
use crate::options::Layout;
use crate::value::Value;

/// Whether a field appears in the rendered tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    /// Rendered.
    Visible,
    /// Left out of the rendered tree.
    Hidden,
}

/// Whether a field accepts user edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    /// Accepts edits.
    Editable,
    /// Rendered, but rejects edits.
    ReadOnly,
}

/// The resolved render state of one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderState {
    /// Visible or hidden.
    pub visibility: Visibility,
    /// Editable or read-only.
    pub interaction: Interaction,
    /// The layout supplied in the field's options. Renderers apply the
    /// kind's default when this is `None`.
    pub layout: Option<Layout>,
}

impl RenderState {
    /// Returns `true` if the field is rendered.
    pub const fn is_visible(self) -> bool {
        matches!(self.visibility, Visibility::Visible)
    }

    /// Returns `true` if the field is flagged read-only.
    pub const fn is_read_only(self) -> bool {
        matches!(self.interaction, Interaction::ReadOnly)
    }

    /// Returns `true` if a user can change the value: visible and editable.
    ///
    /// Hidden takes precedence, so a hidden read-only field is simply not
    /// interactive.
    pub const fn accepts_input(self) -> bool {
        self.is_visible() && !self.is_read_only()
    }
}

/// Resolves the render state of a field.
///
/// The current value is part of the rendering contract but does not influence
/// the result.
///
/// # Examples
///
/// ```
/// use fibr_forms::{fields, resolve_render_state, FieldConfig, Interaction, Layout, Visibility};
///
/// let field = fields::boolean(FieldConfig::new().layout(Layout::Switch).read_only(true)).unwrap();
/// let state = resolve_render_state(&field, None);
/// assert_eq!(state.visibility, Visibility::Visible);
/// assert_eq!(state.interaction, Interaction::ReadOnly);
/// assert_eq!(state.layout, Some(Layout::Switch));
/// ```
pub fn resolve_render_state(field: &FieldDescriptor, _value: Option<&Value>) -> RenderState {
    RenderState {
        visibility: if field.hidden {
            Visibility::Hidden
        } else {
            Visibility::Visible
        },
        interaction: if field.read_only {
            Interaction::ReadOnly
        } else {
            Interaction::Editable
        },
        layout: field.options.layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldConfig, FieldKind};
    use crate::options::OptionEntry;

    fn list() -> Vec<OptionEntry> {
        vec![
            OptionEntry::scalar("Node JS", 1),
            OptionEntry::group("Python", vec![OptionEntry::scalar("Python 3.10", 12)]),
        ]
    }

    #[test]
    fn test_flags_and_layout_round_trip() {
        let cases = [
            (FieldKind::Boolean, Some(Layout::Switch)),
            (FieldKind::Boolean, Some(Layout::Checkbox)),
            (FieldKind::Number, Some(Layout::Radio)),
            (FieldKind::Number, Some(Layout::Checkbox)),
            (FieldKind::Number, Some(Layout::Combobox)),
            (FieldKind::Number, Some(Layout::Select)),
            (FieldKind::Number, Some(Layout::Multi)),
            (FieldKind::Boolean, None),
            (FieldKind::Number, None),
            (FieldKind::String, None),
            (FieldKind::Custom, None),
        ];

        for (kind, layout) in cases {
            for hidden in [false, true] {
                for read_only in [false, true] {
                    let mut config = FieldConfig::new().hidden(hidden).read_only(read_only);
                    if kind == FieldKind::Custom {
                        config = config.custom_type("sample_type");
                    }
                    if let Some(layout) = layout {
                        config = config.layout(layout).list(list());
                    }
                    let field = fields::build_field(kind, config).unwrap();
                    let state = resolve_render_state(&field, None);

                    assert_eq!(!state.is_visible(), hidden);
                    assert_eq!(state.is_read_only(), read_only);
                    assert_eq!(state.layout, layout, "{kind} {layout:?}");
                }
            }
        }
    }

    #[test]
    fn test_boolean_without_layout_keeps_none() {
        let field = fields::boolean(FieldConfig::new()).unwrap();
        assert_eq!(resolve_render_state(&field, None).layout, None);
        assert_eq!(field.effective_layout(), Some(Layout::Checkbox));
    }

    #[test]
    fn test_custom_has_no_layout() {
        let field = fields::custom("sample_type", FieldConfig::new()).unwrap();
        assert_eq!(resolve_render_state(&field, None).layout, None);
    }

    #[test]
    fn test_hidden_wins_over_read_only() {
        let field = fields::number(FieldConfig::new().hidden(true).read_only(true)).unwrap();
        let state = resolve_render_state(&field, Some(&Value::Int(3)));
        assert_eq!(state.visibility, Visibility::Hidden);
        assert_eq!(state.interaction, Interaction::ReadOnly);
        assert!(!state.accepts_input());
    }

    #[test]
    fn test_value_does_not_change_state() {
        let field = fields::boolean(FieldConfig::new().layout(Layout::Switch)).unwrap();
        assert_eq!(
            resolve_render_state(&field, None),
            resolve_render_state(&field, Some(&Value::Bool(true)))
        );
    }

    #[test]
    fn test_editable_visible_accepts_input() {
        let field = fields::string(FieldConfig::new()).unwrap();
        assert!(resolve_render_state(&field, None).accepts_input());
    }
}
