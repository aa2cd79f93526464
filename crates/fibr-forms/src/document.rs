//! Blueprint documents.
//!
//! A blueprint can be authored as a JSON or TOML document instead of through
//! the builder API:
//!
//! ```toml
//! name = "languages"
//!
//! [[fields]]
//! key = "selector"
//! kind = "number"
//! label = "Language"
//!
//! [fields.options]
//! layout = "select"
//! list = [
//!     { label = "Node JS", value = 1 },
//!     { label = "Python", value = [{ label = "Python 3.10", value = 12 }] },
//! ]
//!
//! [default_values]
//! selector = 12
//!
//! [validation]
//! selector = "number"
//! ```
//!
//! Documents go through exactly the same validation as builder-made forms.
//! The `validation` table maps keys to [`Rule`] strings and becomes a
//! [`ShapeValidator`].

use std::collections::BTreeMap;
use std::path::Path;

use fibr_core::{FibrError, FibrResult, Settings, SETTINGS};
use serde::{Deserialize, Serialize};

use crate::blueprint::{build_form_with_settings, FormBlueprint, FormSpec};
use crate::fields::{FieldDescriptor, FieldKind};
use crate::options::FieldOptions;
use crate::validation::{Rule, ShapeValidator};
use crate::value::Value;

/// One field of a [`BlueprintDocument`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDocument {
    /// The field key.
    pub key: String,
    /// The field kind.
    pub kind: FieldKind,
    /// Display label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Help text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Excluded from the rendered tree.
    #[serde(default)]
    pub hidden: bool,
    /// Rejects user edits.
    #[serde(default, alias = "readOnly")]
    pub read_only: bool,
    /// Layout and option list.
    #[serde(default)]
    pub options: FieldOptions,
    /// Registry tag for custom fields.
    #[serde(default, alias = "customType", skip_serializing_if = "Option::is_none")]
    pub custom_type: Option<String>,
}

impl FieldDocument {
    fn into_entry(self) -> (String, FieldDescriptor) {
        let descriptor = FieldDescriptor {
            kind: self.kind,
            label: self.label,
            description: self.description,
            hidden: self.hidden,
            read_only: self.read_only,
            options: self.options,
            custom_type: self.custom_type,
        };
        (self.key, descriptor)
    }
}

/// A serialized form blueprint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BlueprintDocument {
    /// Optional form name, used in log spans.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The fields, in declaration order.
    #[serde(default)]
    pub fields: Vec<FieldDocument>,
    /// Initial values keyed by field key.
    #[serde(default, alias = "defaultValues")]
    pub default_values: BTreeMap<String, Value>,
    /// Validation rules keyed by field key (`"number"`, `"string?"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<BTreeMap<String, String>>,
}

impl BlueprintDocument {
    /// Parses a JSON document.
    pub fn parse_json(input: &str) -> FibrResult<Self> {
        serde_json::from_str(input).map_err(|e| {
            FibrError::SerializationError(format!("Failed to parse blueprint JSON: {e}"))
        })
    }

    /// Parses a TOML document.
    pub fn parse_toml(input: &str) -> FibrResult<Self> {
        toml::from_str(input).map_err(|e| {
            FibrError::SerializationError(format!("Failed to parse blueprint TOML: {e}"))
        })
    }

    /// Converts the document into a [`FormSpec`].
    ///
    /// Fails with `InvalidConfig` on an unknown validation rule.
    pub fn into_spec(self) -> FibrResult<FormSpec> {
        let mut spec = FormSpec::new();
        if let Some(name) = self.name {
            spec = spec.name(name);
        }
        for field in self.fields {
            let (key, descriptor) = field.into_entry();
            spec = spec.field(key, descriptor);
        }
        spec = spec.default_values(self.default_values);

        if let Some(rules) = self.validation {
            let mut validator = ShapeValidator::new();
            for (key, rule) in rules {
                let rule: Rule = rule.parse().map_err(|e| match e {
                    FibrError::InvalidConfig(msg) => {
                        FibrError::InvalidConfig(format!("validation for '{key}': {msg}"))
                    }
                    other => other,
                })?;
                validator = validator.rule(key, rule);
            }
            spec = spec.validation(validator);
        }
        Ok(spec)
    }

    /// Builds the blueprint using the global settings.
    pub fn build(self) -> FibrResult<FormBlueprint> {
        self.build_with_settings(SETTINGS.get_or_default())
    }

    /// Builds the blueprint using explicit settings.
    pub fn build_with_settings(self, settings: &Settings) -> FibrResult<FormBlueprint> {
        build_form_with_settings(self.into_spec()?, settings)
    }
}

/// Builds a blueprint from a JSON string.
pub fn from_json_str(input: &str) -> FibrResult<FormBlueprint> {
    BlueprintDocument::parse_json(input)?.build()
}

/// Builds a blueprint from a TOML string.
pub fn from_toml_str(input: &str) -> FibrResult<FormBlueprint> {
    BlueprintDocument::parse_toml(input)?.build()
}

/// Builds a blueprint from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> FibrResult<FormBlueprint> {
    from_json_str(&read_document(path.as_ref(), "JSON")?)
}

/// Builds a blueprint from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> FibrResult<FormBlueprint> {
    from_toml_str(&read_document(path.as_ref(), "TOML")?)
}

/// Builds a blueprint from a file, reading `.toml` files as TOML and anything
/// else as JSON.
pub fn from_path(path: impl AsRef<Path>) -> FibrResult<FormBlueprint> {
    let path = path.as_ref();
    if is_toml(path) {
        from_toml_file(path)
    } else {
        from_json_file(path)
    }
}

/// Parses a document from a file without building it.
pub fn load_document(path: impl AsRef<Path>) -> FibrResult<BlueprintDocument> {
    let path = path.as_ref();
    if is_toml(path) {
        BlueprintDocument::parse_toml(&read_document(path, "TOML")?)
    } else {
        BlueprintDocument::parse_json(&read_document(path, "JSON")?)
    }
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"))
}

fn read_document(path: &Path, format: &str) -> FibrResult<String> {
    std::fs::read_to_string(path).map_err(|e| {
        FibrError::ConfigurationError(format!(
            "Failed to read {format} blueprint '{}': {e}",
            path.display()
        ))
    })
}
