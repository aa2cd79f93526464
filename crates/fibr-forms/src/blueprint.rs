//! Form specs and blueprints.
//!
//! A [`FormSpec`] is the caller-authored description of a form: fields in
//! declaration order, default values, and an optional validator. [`build_form`]
//! validates it and produces an immutable [`FormBlueprint`].
//!
//! Construction fails fast, before anything is rendered:
//!
//! - `InvalidConfig` for malformed or duplicate keys, malformed fields, and
//!   (with strict defaults) default values of the wrong type
//! - `InvalidKind` for custom fields without a type tag
//! - `UnknownFieldKey` for default values naming a key that is not a field

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use fibr_core::{FibrError, FibrResult, Settings, SETTINGS};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::fields::FieldDescriptor;
use crate::options;
use crate::validation::Validator;
use crate::value::Value;

static KEY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("field key pattern is a valid regex")
});

/// A field together with the key it is declared under.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldEntry {
    /// The field key (unique within the form).
    pub key: String,
    /// The field's descriptor.
    pub field: FieldDescriptor,
}

/// The caller-authored description of a form.
///
/// # Examples
///
/// ```
/// use fibr_forms::{build_form, fields, FieldConfig, FormSpec};
///
/// let spec = FormSpec::new()
///     .name("switches")
///     .field("name", fields::boolean(FieldConfig::new()).unwrap())
///     .default_value("age", 1);
///
/// let err = build_form(spec).unwrap_err();
/// assert_eq!(err.code(), "unknown_field_key");
/// ```
#[derive(Default)]
pub struct FormSpec {
    name: Option<String>,
    fields: Vec<FieldEntry>,
    default_values: Vec<(String, Value)>,
    validation: Option<Arc<dyn Validator>>,
}

impl FormSpec {
    /// Creates an empty spec.
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the form (used in logs and render output).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Declares a field. Declaration order is rendering order.
    #[must_use]
    pub fn field(mut self, key: impl Into<String>, field: FieldDescriptor) -> Self {
        self.fields.push(FieldEntry {
            key: key.into(),
            field,
        });
        self
    }

    /// Sets the default value for a key. A later call for the same key wins.
    #[must_use]
    pub fn default_value(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.default_values.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.default_values.push((key, value));
        }
        self
    }

    /// Sets several default values.
    #[must_use]
    pub fn default_values<I, K, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        values
            .into_iter()
            .fold(self, |spec, (key, value)| spec.default_value(key, value))
    }

    /// Sets the validator invoked on submit.
    #[must_use]
    pub fn validation(self, validator: impl Validator + 'static) -> Self {
        self.validation_arc(Arc::new(validator))
    }

    /// Sets a shared validator invoked on submit.
    #[must_use]
    pub fn validation_arc(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validation = Some(validator);
        self
    }
}

impl fmt::Debug for FormSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormSpec")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("default_values", &self.default_values)
            .field("validation", &self.validation.is_some())
            .finish()
    }
}

/// A validated, immutable form blueprint.
///
/// Cheap to clone; the validator is shared.
#[derive(Clone)]
pub struct FormBlueprint {
    name: Option<String>,
    fields: Vec<FieldEntry>,
    index: HashMap<String, usize>,
    default_values: HashMap<String, Value>,
    validator: Option<Arc<dyn Validator>>,
}

impl FormBlueprint {
    /// The form name, if one was given.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The fields in declaration order.
    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    /// The field keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|entry| entry.key.as_str())
    }

    /// Looks up a field by key.
    pub fn field(&self, key: &str) -> Option<&FieldDescriptor> {
        self.index.get(key).map(|&idx| &self.fields[idx].field)
    }

    /// Returns `true` if `key` names a field.
    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the form has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// All default values.
    pub fn default_values(&self) -> &HashMap<String, Value> {
        &self.default_values
    }

    /// The default value of one field.
    pub fn default_value(&self, key: &str) -> Option<&Value> {
        self.default_values.get(key)
    }

    /// The validator invoked on submit.
    pub fn validator(&self) -> Option<&dyn Validator> {
        self.validator.as_deref()
    }
}

impl fmt::Debug for FormBlueprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormBlueprint")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .field("default_values", &self.default_values)
            .field("validator", &self.validator.is_some())
            .finish_non_exhaustive()
    }
}

/// Builds a blueprint using the global settings (defaults if unconfigured).
pub fn build_form(spec: FormSpec) -> FibrResult<FormBlueprint> {
    build_form_with_settings(spec, SETTINGS.get_or_default())
}

/// Builds a blueprint using explicit settings.
pub fn build_form_with_settings(spec: FormSpec, settings: &Settings) -> FibrResult<FormBlueprint> {
    let FormSpec {
        name,
        fields,
        default_values,
        validation,
    } = spec;

    let mut index = HashMap::with_capacity(fields.len());
    for (idx, entry) in fields.iter().enumerate() {
        if !KEY_PATTERN.is_match(&entry.key) {
            return Err(FibrError::InvalidConfig(format!(
                "invalid field key '{}'",
                entry.key
            )));
        }
        if index.insert(entry.key.clone(), idx).is_some() {
            return Err(FibrError::InvalidConfig(format!(
                "duplicate field key '{}'",
                entry.key
            )));
        }
        entry.field.validate().map_err(|e| in_field(&entry.key, e))?;
    }

    let mut unknown: Vec<&str> = default_values
        .iter()
        .map(|(key, _)| key.as_str())
        .filter(|key| !index.contains_key(*key))
        .collect();
    unknown.sort_unstable();
    if let Some(key) = unknown.first() {
        return Err(FibrError::UnknownFieldKey((*key).to_string()));
    }

    for (key, value) in &default_values {
        let field = &fields[index[key]].field;
        check_default(key, field, value, settings.strict_defaults)?;
    }

    tracing::debug!(
        form = name.as_deref().unwrap_or_default(),
        fields = fields.len(),
        defaults = default_values.len(),
        "built form blueprint"
    );

    Ok(FormBlueprint {
        name,
        fields,
        index,
        default_values: default_values.into_iter().collect(),
        validator: validation,
    })
}

fn check_default(key: &str, field: &FieldDescriptor, value: &Value, strict: bool) -> FibrResult<()> {
    if !field.accepts_value(value) {
        let message = format!(
            "default value for '{key}' is a {}, expected a {} value",
            value.type_name(),
            field.kind
        );
        if strict {
            return Err(FibrError::InvalidConfig(message));
        }
        tracing::warn!(field = key, "{message}");
        return Ok(());
    }

    if let Some(list) = &field.options.list {
        if !value.is_null() && !options::contains_value(list, value) {
            tracing::warn!(field = key, value = %value, "default value is not one of the options");
        }
    }
    Ok(())
}

fn in_field(key: &str, err: FibrError) -> FibrError {
    match err {
        FibrError::InvalidConfig(msg) => FibrError::InvalidConfig(format!("field '{key}': {msg}")),
        FibrError::InvalidKind(msg) => FibrError::InvalidKind(format!("field '{key}': {msg}")),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{self, FieldConfig, FieldKind};
    use crate::options::{Layout, OptionEntry};
    use crate::validation::ShapeValidator;

    fn lenient() -> Settings {
        Settings {
            strict_defaults: false,
            ..Settings::default()
        }
    }

    fn strict() -> Settings {
        Settings::default()
    }

    #[test]
    fn test_single_boolean_with_default() {
        let blueprint = build_form_with_settings(
            FormSpec::new()
                .field("name", fields::boolean(FieldConfig::new()).unwrap())
                .default_value("name", true),
            &strict(),
        )
        .unwrap();

        assert_eq!(blueprint.len(), 1);
        assert_eq!(blueprint.default_value("name"), Some(&Value::Bool(true)));
        assert_eq!(blueprint.field("name").unwrap().kind, FieldKind::Boolean);
    }

    #[test]
    fn test_unknown_default_key() {
        let err = build_form_with_settings(
            FormSpec::new()
                .field("name", fields::boolean(FieldConfig::new()).unwrap())
                .default_value("age", 1),
            &strict(),
        )
        .unwrap_err();

        assert!(matches!(err, FibrError::UnknownFieldKey(ref key) if key == "age"));
    }

    #[test]
    fn test_unknown_default_key_reported_deterministically() {
        let err = build_form_with_settings(
            FormSpec::new()
                .field("name", fields::boolean(FieldConfig::new()).unwrap())
                .default_value("zeta", 1)
                .default_value("alpha", 2),
            &strict(),
        )
        .unwrap_err();

        assert!(matches!(err, FibrError::UnknownFieldKey(ref key) if key == "alpha"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let keys = ["zulu", "alpha", "mike", "bravo"];
        let spec = keys.iter().fold(FormSpec::new(), |spec, key| {
            spec.field(*key, fields::string(FieldConfig::new()).unwrap())
        });
        let blueprint = build_form_with_settings(spec, &strict()).unwrap();
        assert_eq!(blueprint.keys().collect::<Vec<_>>(), keys);
    }

    #[test]
    fn test_duplicate_key() {
        let err = build_form_with_settings(
            FormSpec::new()
                .field("name", fields::string(FieldConfig::new()).unwrap())
                .field("name", fields::number(FieldConfig::new()).unwrap()),
            &strict(),
        )
        .unwrap_err();
        assert!(matches!(err, FibrError::InvalidConfig(_)));
        assert!(err.to_string().contains("duplicate field key 'name'"));
    }

    #[test]
    fn test_invalid_key() {
        for key in ["", "first name", "9lives", "a-b"] {
            let result = build_form_with_settings(
                FormSpec::new().field(key, fields::string(FieldConfig::new()).unwrap()),
                &strict(),
            );
            assert!(matches!(result, Err(FibrError::InvalidConfig(_))), "{key:?}");
        }
    }

    #[test]
    fn test_custom_without_type_is_invalid_kind() {
        let descriptor = FieldDescriptor {
            kind: FieldKind::Custom,
            label: None,
            description: None,
            hidden: false,
            read_only: false,
            options: options::FieldOptions::default(),
            custom_type: None,
        };
        let err = build_form_with_settings(
            FormSpec::new().field("first_name", descriptor),
            &strict(),
        )
        .unwrap_err();
        assert!(matches!(err, FibrError::InvalidKind(_)));
        assert!(err.to_string().contains("field 'first_name'"));
    }

    #[test]
    fn test_descriptor_revalidated() {
        let mut descriptor = fields::number(FieldConfig::new()).unwrap();
        descriptor.options.layout = Some(Layout::Select);
        let err = build_form_with_settings(FormSpec::new().field("n", descriptor), &strict())
            .unwrap_err();
        assert!(matches!(err, FibrError::InvalidConfig(_)));
    }

    #[test]
    fn test_strict_default_type_mismatch() {
        let err = build_form_with_settings(
            FormSpec::new()
                .field("read_only", fields::number(FieldConfig::new()).unwrap())
                .default_value("read_only", "Lorem ipsum nothing else"),
            &strict(),
        )
        .unwrap_err();
        assert!(matches!(err, FibrError::InvalidConfig(_)));
    }

    #[test]
    fn test_lenient_default_type_mismatch() {
        let blueprint = build_form_with_settings(
            FormSpec::new()
                .field("read_only", fields::number(FieldConfig::new()).unwrap())
                .default_value("read_only", "Lorem ipsum nothing else"),
            &lenient(),
        )
        .unwrap();
        assert_eq!(
            blueprint.default_value("read_only"),
            Some(&Value::String("Lorem ipsum nothing else".into()))
        );
    }

    #[test]
    fn test_default_outside_option_list_is_accepted() {
        let list = vec![OptionEntry::scalar("Node JS", 99)];
        let blueprint = build_form_with_settings(
            FormSpec::new()
                .field(
                    "read_only",
                    fields::number(FieldConfig::new().layout(Layout::Select).list(list)).unwrap(),
                )
                .default_value("read_only", 29229),
            &strict(),
        )
        .unwrap();
        assert_eq!(blueprint.default_value("read_only"), Some(&Value::Int(29229)));
    }

    #[test]
    fn test_multi_default_must_be_list() {
        let list = vec![OptionEntry::scalar("Node JS", 10)];
        let field = fields::number(FieldConfig::new().layout(Layout::Multi).list(list)).unwrap();

        let err = build_form_with_settings(
            FormSpec::new()
                .field("change_item", field.clone())
                .default_value("change_item", 15),
            &strict(),
        )
        .unwrap_err();
        assert!(matches!(err, FibrError::InvalidConfig(_)));

        let ok = build_form_with_settings(
            FormSpec::new()
                .field("change_item", field)
                .default_value("change_item", vec![Value::Int(10)]),
            &strict(),
        );
        assert!(ok.is_ok());
    }

    #[test]
    fn test_default_value_last_wins() {
        let blueprint = build_form_with_settings(
            FormSpec::new()
                .field("n", fields::number(FieldConfig::new()).unwrap())
                .default_values([("n", 1), ("n", 2)]),
            &strict(),
        )
        .unwrap();
        assert_eq!(blueprint.default_value("n"), Some(&Value::Int(2)));
    }

    #[test]
    fn test_validator_attached() {
        let blueprint = build_form_with_settings(
            FormSpec::new()
                .field("n", fields::number(FieldConfig::new()).unwrap())
                .validation(ShapeValidator::new()),
            &strict(),
        )
        .unwrap();
        assert!(blueprint.validator().is_some());
    }

    #[test]
    fn test_empty_form() {
        let blueprint = build_form_with_settings(FormSpec::new().name("empty"), &strict()).unwrap();
        assert!(blueprint.is_empty());
        assert_eq!(blueprint.name(), Some("empty"));
    }
}
