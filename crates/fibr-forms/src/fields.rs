//! Field kinds, field descriptors, and the field builder.
//!
//! A [`FieldDescriptor`] describes one entry of a form blueprint: the kind of
//! value it edits, display strings, the `hidden` / `read_only` flags, and
//! kind-specific [`FieldOptions`]. Descriptors are produced by [`build_field`]
//! (or the [`boolean`], [`number`], [`string`] and [`custom`] shorthands),
//! which validate the configuration eagerly.

use std::fmt;
use std::str::FromStr;

use fibr_core::{FibrError, FibrResult};
use serde::{Deserialize, Serialize};

use crate::options::{self, FieldOptions, Layout, OptionEntry};
use crate::value::Value;

/// The kind of value a field edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// A true/false value.
    Boolean,
    /// A numeric value (or a list of numbers for multi-valued layouts).
    Number,
    /// A text value.
    String,
    /// A value edited by a renderer registered under the field's custom type tag.
    Custom,
}

impl FieldKind {
    /// The registry tag of the kind's built-in renderer.
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Custom => "custom",
        }
    }

    /// Returns `true` if `layout` may be used with this kind.
    pub const fn allows_layout(self, layout: Layout) -> bool {
        match self {
            Self::Boolean => matches!(layout, Layout::Switch | Layout::Checkbox),
            Self::Number => !matches!(layout, Layout::Switch),
            Self::String | Self::Custom => false,
        }
    }

    /// The layout used when a field does not choose one.
    pub const fn default_layout(self) -> Option<Layout> {
        match self {
            Self::Boolean => Some(Layout::Checkbox),
            Self::Number | Self::String | Self::Custom => None,
        }
    }

    /// Returns `true` if `layout` needs an option list on this kind.
    pub const fn layout_requires_list(self, layout: Layout) -> bool {
        match layout {
            Layout::Radio | Layout::Select | Layout::Combobox | Layout::Multi => true,
            Layout::Checkbox => matches!(self, Self::Number),
            Layout::Switch => false,
        }
    }

    /// Returns `true` if `layout` holds a list of values on this kind.
    pub const fn layout_is_multi_valued(self, layout: Layout) -> bool {
        match layout {
            Layout::Multi => true,
            Layout::Checkbox => matches!(self, Self::Number),
            _ => false,
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for FieldKind {
    type Err = FibrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "boolean" => Ok(Self::Boolean),
            "number" => Ok(Self::Number),
            "string" => Ok(Self::String),
            "custom" => Ok(Self::Custom),
            other => Err(FibrError::InvalidKind(format!("unknown field kind '{other}'"))),
        }
    }
}

/// Caller-supplied configuration for [`build_field`].
///
/// # Examples
///
/// ```
/// use fibr_forms::{FieldConfig, Layout, OptionEntry};
///
/// let config = FieldConfig::new()
///     .label("Language")
///     .layout(Layout::Radio)
///     .list(vec![OptionEntry::scalar("Node JS", 1)])
///     .read_only(true);
/// assert!(config.read_only);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldConfig {
    /// Display label.
    pub label: Option<String>,
    /// Help text shown with the field.
    pub description: Option<String>,
    /// Excluded from the rendered tree.
    pub hidden: bool,
    /// Rendered, but rejects user edits.
    pub read_only: bool,
    /// Kind-specific rendering options.
    pub options: FieldOptions,
    /// Registry tag for custom fields.
    pub custom_type: Option<String>,
}

impl FieldConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the label.
    #[must_use]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `hidden` flag.
    #[must_use]
    pub const fn hidden(mut self, hidden: bool) -> Self {
        self.hidden = hidden;
        self
    }

    /// Sets the `read_only` flag.
    #[must_use]
    pub const fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }

    /// Sets the layout variant.
    #[must_use]
    pub const fn layout(mut self, layout: Layout) -> Self {
        self.options.layout = Some(layout);
        self
    }

    /// Sets the option list.
    #[must_use]
    pub fn list(mut self, list: Vec<OptionEntry>) -> Self {
        self.options.list = Some(list);
        self
    }

    /// Sets the custom type tag.
    #[must_use]
    pub fn custom_type(mut self, tag: impl Into<String>) -> Self {
        self.custom_type = Some(tag.into());
        self
    }
}

/// A validated description of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// The kind of value the field edits.
    pub kind: FieldKind,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Help text shown with the field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Excluded from the rendered tree; the value still takes part in submission.
    #[serde(default)]
    pub hidden: bool,
    /// Rendered, but rejects user edits.
    #[serde(default, alias = "readOnly")]
    pub read_only: bool,
    /// Kind-specific rendering options.
    #[serde(default)]
    pub options: FieldOptions,
    /// Registry tag for custom fields.
    #[serde(default, alias = "customType", skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl FieldDescriptor {
    /// The tag this field's renderer is registered under.
    ///
    /// Custom fields use their custom type; built-in kinds use the kind tag.
    pub fn registry_tag(&self) -> &str {
        match (&self.kind, &self.custom_type) {
            (FieldKind::Custom, Some(tag)) => tag.as_str(),
            (kind, _) => kind.tag(),
        }
    }

    /// The layout to render with: the configured one, else the kind's default.
    pub fn effective_layout(&self) -> Option<Layout> {
        self.options.layout.or_else(|| self.kind.default_layout())
    }

    /// Returns `true` if the field holds a list of values.
    pub fn is_multi_valued(&self) -> bool {
        self.options
            .layout
            .is_some_and(|layout| self.kind.layout_is_multi_valued(layout))
    }

    /// The option list, or an empty slice.
    pub fn list(&self) -> &[OptionEntry] {
        self.options.list.as_deref().unwrap_or_default()
    }

    /// Returns `true` if `value` has a type this field can hold.
    ///
    /// `Null` is always accepted; custom fields accept anything.
    pub fn accepts_value(&self, value: &Value) -> bool {
        if value.is_null() {
            return true;
        }
        match self.kind {
            FieldKind::Boolean => value.as_bool().is_some(),
            FieldKind::Number if self.is_multi_valued() => value
                .as_list()
                .is_some_and(|items| items.iter().all(Value::is_number)),
            FieldKind::Number => value.is_number(),
            FieldKind::String => matches!(value, Value::String(_)),
            FieldKind::Custom => true,
        }
    }

    /// Checks the descriptor's invariants.
    ///
    /// - `InvalidKind`: a custom field without a type tag, or a built-in kind
    ///   carrying one.
    /// - `InvalidConfig`: a layout the kind does not support, a layout that
    ///   needs a list without a non-empty one, or a malformed list.
    pub fn validate(&self) -> FibrResult<()> {
        match (self.kind, self.custom_type.as_deref()) {
            (FieldKind::Custom, None) => {
                return Err(FibrError::InvalidKind(
                    "custom field requires a custom type".to_string(),
                ));
            }
            (FieldKind::Custom, Some(tag)) if tag.trim().is_empty() => {
                return Err(FibrError::InvalidKind(
                    "custom type must not be empty".to_string(),
                ));
            }
            (FieldKind::Custom, Some(_)) | (_, None) => {}
            (kind, Some(tag)) => {
                return Err(FibrError::InvalidKind(format!(
                    "{kind} field cannot carry custom type '{tag}'"
                )));
            }
        }

        if let Some(layout) = self.options.layout {
            if !self.kind.allows_layout(layout) {
                return Err(FibrError::InvalidConfig(format!(
                    "layout '{layout}' is not supported by {} fields",
                    self.kind
                )));
            }
            if self.kind.layout_requires_list(layout)
                && self.options.list.as_ref().map_or(true, Vec::is_empty)
            {
                return Err(FibrError::InvalidConfig(format!(
                    "layout '{layout}' requires options.list"
                )));
            }
        }

        if let Some(list) = &self.options.list {
            options::validate_list(list)?;
        }
        Ok(())
    }
}

/// Builds and validates a field descriptor.
///
/// # Examples
///
/// ```
/// use fibr_forms::{build_field, FieldConfig, FieldKind, Layout};
///
/// let err = build_field(FieldKind::Number, FieldConfig::new().layout(Layout::Select));
/// assert!(err.is_err());
/// ```
pub fn build_field(kind: FieldKind, config: FieldConfig) -> FibrResult<FieldDescriptor> {
    let descriptor = FieldDescriptor {
        kind,
        label: config.label,
        description: config.description,
        hidden: config.hidden,
        read_only: config.read_only,
        options: config.options,
        custom_type: config.custom_type,
    };
    descriptor.validate()?;
    Ok(descriptor)
}

/// Builds a boolean field.
pub fn boolean(config: FieldConfig) -> FibrResult<FieldDescriptor> {
    build_field(FieldKind::Boolean, config)
}

/// Builds a number field.
pub fn number(config: FieldConfig) -> FibrResult<FieldDescriptor> {
    build_field(FieldKind::Number, config)
}

/// Builds a string field.
pub fn string(config: FieldConfig) -> FibrResult<FieldDescriptor> {
    build_field(FieldKind::String, config)
}

/// Builds a custom field rendered by whatever is registered under `tag`.
pub fn custom(tag: impl Into<String>, config: FieldConfig) -> FibrResult<FieldDescriptor> {
    build_field(FieldKind::Custom, config.custom_type(tag))
}
