//! Built-in HTML renderers.
//!
//! One renderer per built-in kind, each registered by
//! [`Plugin::builtin`](crate::registry::Plugin::builtin). Every field renders
//! inside the same wrapper:
//!
//! ```text
//! <div class="fibr-field" data-key="..."><label for="...">...</label>CONTROL<p class="fibr-description">...</p></div>
//! ```
//!
//! The control depends on the kind and layout. Read-only fields render with
//! `disabled` on choice widgets and `readonly` on text-like inputs.

use fibr_core::FibrResult;

use crate::bound_field::BoundField;
use crate::options::{flatten, Layout, OptionEntry, OptionValue};
use crate::registry::FieldRenderer;
use crate::value::{Scalar, Value};

/// Escapes the five HTML special characters.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Wraps a rendered control with the field's label and description.
pub fn wrap_field(field: &BoundField<'_>, control: &str) -> String {
    let description = field
        .description()
        .map(|text| format!(r#"<p class="fibr-description">{}</p>"#, escape_html(text)))
        .unwrap_or_default();
    format!(
        r#"<div class="fibr-field" data-key="{key}"><label for="{id}">{label}</label>{control}{description}</div>"#,
        key = escape_html(field.key),
        id = escape_html(&field.html_id),
        label = escape_html(&field.label()),
    )
}

const fn disabled_attr(field: &BoundField<'_>) -> &'static str {
    if field.is_read_only() {
        " disabled"
    } else {
        ""
    }
}

const fn readonly_attr(field: &BoundField<'_>) -> &'static str {
    if field.is_read_only() {
        " readonly"
    } else {
        ""
    }
}

fn value_attr(value: Option<&Value>) -> String {
    value.map(|v| escape_html(&v.to_string())).unwrap_or_default()
}

fn is_selected(value: Option<&Value>, scalar: &Scalar) -> bool {
    value.is_some_and(|v| v.selects(scalar))
}

// ---------------------------------------------------------------------------
// Boolean
// ---------------------------------------------------------------------------

/// Renders boolean fields as a checkbox or a switch.
#[derive(Debug, Clone, Copy, Default)]
pub struct BooleanRenderer;

impl FieldRenderer for BooleanRenderer {
    fn render(&self, field: &BoundField<'_>) -> FibrResult<String> {
        let layout = field.state.layout.or_else(|| field.field.kind.default_layout());
        let role = if layout == Some(Layout::Switch) {
            r#" role="switch""#
        } else {
            ""
        };
        let checked = if field.value.and_then(Value::as_bool) == Some(true) {
            " checked"
        } else {
            ""
        };
        let control = format!(
            r#"<input type="checkbox" name="{name}" id="{id}"{role}{checked}{disabled} />"#,
            name = escape_html(field.key),
            id = escape_html(&field.html_id),
            disabled = disabled_attr(field),
        );
        Ok(wrap_field(field, &control))
    }
}

// ---------------------------------------------------------------------------
// Number
// ---------------------------------------------------------------------------

/// Renders number fields: a plain input, or one of the list layouts.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumberRenderer;

impl FieldRenderer for NumberRenderer {
    fn render(&self, field: &BoundField<'_>) -> FibrResult<String> {
        let list = field.field.list();
        let control = match field.state.layout {
            // Switch is rejected for numbers when the descriptor is validated.
            None | Some(Layout::Switch) => format!(
                r#"<input type="number" name="{name}" id="{id}" value="{value}"{readonly} />"#,
                name = escape_html(field.key),
                id = escape_html(&field.html_id),
                value = value_attr(field.value),
                readonly = readonly_attr(field),
            ),
            Some(Layout::Radio) => choice_set(field, "radio", list),
            Some(Layout::Checkbox) => choice_set(field, "checkbox", list),
            Some(Layout::Select) => select(field, list, false),
            Some(Layout::Multi) => select(field, list, true),
            Some(Layout::Combobox) => combobox(field, list),
        };
        Ok(wrap_field(field, &control))
    }
}

/// A `<fieldset>` of radio or checkbox inputs. Groups become nested
/// fieldsets with a legend.
fn choice_set(field: &BoundField<'_>, input_type: &str, entries: &[OptionEntry]) -> String {
    let mut html = format!(r#"<fieldset id="{}">"#, escape_html(&field.html_id));
    let mut index = 0;
    push_choices(field, input_type, entries, &mut index, &mut html);
    html.push_str("</fieldset>");
    html
}

fn push_choices(
    field: &BoundField<'_>,
    input_type: &str,
    entries: &[OptionEntry],
    index: &mut usize,
    html: &mut String,
) {
    let name = escape_html(field.key);
    for entry in entries {
        match &entry.value {
            OptionValue::Scalar(scalar) => {
                let option_id = format!("{}_{index}", escape_html(&field.html_id));
                let checked = if is_selected(field.value, scalar) {
                    " checked"
                } else {
                    ""
                };
                html.push_str(&format!(
                    r#"<div><input type="{input_type}" name="{name}" value="{value}" id="{option_id}"{checked}{disabled} />"#,
                    value = escape_html(&scalar.to_string()),
                    disabled = disabled_attr(field),
                ));
                html.push_str(&format!(
                    r#" <label for="{option_id}">{}</label></div>"#,
                    escape_html(&entry.label)
                ));
                *index += 1;
            }
            OptionValue::Group(children) => {
                html.push_str(&format!(
                    "<fieldset><legend>{}</legend>",
                    escape_html(&entry.label)
                ));
                push_choices(field, input_type, children, index, html);
                html.push_str("</fieldset>");
            }
        }
    }
}

/// A `<select>` (or `<select multiple>`). Groups become `<optgroup>`.
fn select(field: &BoundField<'_>, entries: &[OptionEntry], multiple: bool) -> String {
    let mut html = format!(
        r#"<select name="{name}" id="{id}"{multiple}{disabled}>"#,
        name = escape_html(field.key),
        id = escape_html(&field.html_id),
        multiple = if multiple { " multiple" } else { "" },
        disabled = disabled_attr(field),
    );
    push_options(field, entries, &mut html);
    html.push_str("</select>");
    html
}

fn push_options(field: &BoundField<'_>, entries: &[OptionEntry], html: &mut String) {
    for entry in entries {
        match &entry.value {
            OptionValue::Scalar(scalar) => {
                let selected = if is_selected(field.value, scalar) {
                    " selected"
                } else {
                    ""
                };
                html.push_str(&format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    escape_html(&scalar.to_string()),
                    escape_html(&entry.label)
                ));
            }
            OptionValue::Group(children) => {
                html.push_str(&format!(
                    r#"<optgroup label="{}">"#,
                    escape_html(&entry.label)
                ));
                push_options(field, children, html);
                html.push_str("</optgroup>");
            }
        }
    }
}

/// An input with a `<datalist>` of suggestions. Groups are flattened.
fn combobox(field: &BoundField<'_>, entries: &[OptionEntry]) -> String {
    let id = escape_html(&field.html_id);
    let mut html = format!(
        r#"<input type="number" name="{name}" id="{id}" list="{id}_list" value="{value}"{readonly} /><datalist id="{id}_list">"#,
        name = escape_html(field.key),
        value = value_attr(field.value),
        readonly = readonly_attr(field),
    );
    for (label, scalar) in flatten(entries) {
        html.push_str(&format!(
            r#"<option value="{}">{}</option>"#,
            escape_html(&scalar.to_string()),
            escape_html(label)
        ));
    }
    html.push_str("</datalist>");
    html
}

// ---------------------------------------------------------------------------
// String
// ---------------------------------------------------------------------------

/// Renders string fields as a text input.
#[derive(Debug, Clone, Copy, Default)]
pub struct StringRenderer;

impl FieldRenderer for StringRenderer {
    fn render(&self, field: &BoundField<'_>) -> FibrResult<String> {
        let control = format!(
            r#"<input type="text" name="{name}" id="{id}" value="{value}"{readonly} />"#,
            name = escape_html(field.key),
            id = escape_html(&field.html_id),
            value = value_attr(field.value),
            readonly = readonly_attr(field),
        );
        Ok(wrap_field(field, &control))
    }
}
