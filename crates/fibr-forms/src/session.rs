//! Render sessions.
//!
//! A [`RenderSession`] pairs an immutable [`FormBlueprint`] with a
//! [`PluginRegistry`] and owns the mutable [`FormState`] of one rendering. The
//! state is seeded from the blueprint's default values, changed through
//! [`RenderSession::edit`], and handed to the blueprint's validator on
//! [`RenderSession::submit`].
//!
//! Rendering resolves every visible field's renderer before producing any
//! markup, so a missing custom renderer fails the whole render instead of
//! yielding a partial form.

use std::collections::HashMap;
use std::sync::Arc;

use fibr_core::logging::form_span;
use fibr_core::{FibrError, FibrResult, Settings, SETTINGS};

use crate::blueprint::FormBlueprint;
use crate::bound_field::BoundField;
use crate::registry::{FieldRenderer, PluginRegistry};
use crate::validation::{ValidationContext, ValidationOutcome};
use crate::value::Value;

/// The result of submitting a form.
pub type Submission = ValidationOutcome;

/// The current values of a form, keyed by field key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: HashMap<String, Value>,
}

impl FormState {
    /// Seeds a state from the blueprint's default values.
    pub fn from_defaults(blueprint: &FormBlueprint) -> Self {
        Self {
            values: blueprint.default_values().clone(),
        }
    }

    /// The current value of one field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Sets the value of one field, returning the previous value.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// All current values.
    pub const fn values(&self) -> &HashMap<String, Value> {
        &self.values
    }

    /// Consumes the state, returning its values.
    pub fn into_values(self) -> HashMap<String, Value> {
        self.values
    }
}

/// One rendered field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedField {
    /// The field key.
    pub key: String,
    /// The rendered markup.
    pub html: String,
}

/// The rendered visible fields of a form, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedForm {
    /// The rendered fields.
    pub fields: Vec<RenderedField>,
}

impl RenderedForm {
    /// Concatenates the markup of every field, one per line.
    pub fn to_html(&self) -> String {
        self.fields
            .iter()
            .map(|field| field.html.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The keys of the rendered fields.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|field| field.key.as_str())
    }

    /// The markup of one field, if it was rendered.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.key == key)
            .map(|field| field.html.as_str())
    }
}

/// One rendering of a blueprint.
///
/// # Examples
///
/// ```
/// use fibr_forms::{build_form, fields, FieldConfig, FormSpec, PluginRegistry, RenderSession};
///
/// let blueprint = build_form(
///     FormSpec::new()
///         .field("name", fields::boolean(FieldConfig::new()).unwrap())
///         .field("secret", fields::string(FieldConfig::new().hidden(true)).unwrap())
///         .default_value("name", true),
/// )
/// .unwrap();
/// let registry = PluginRegistry::with_builtins();
/// let session = RenderSession::new(&blueprint, &registry);
///
/// let rendered = session.render().unwrap();
/// assert_eq!(rendered.keys().collect::<Vec<_>>(), vec!["name"]);
/// ```
#[derive(Debug)]
pub struct RenderSession<'a> {
    blueprint: &'a FormBlueprint,
    registry: &'a PluginRegistry,
    state: FormState,
    id_prefix: String,
}

impl<'a> RenderSession<'a> {
    /// Starts a session using the global settings (defaults if unconfigured).
    pub fn new(blueprint: &'a FormBlueprint, registry: &'a PluginRegistry) -> Self {
        Self::with_settings(blueprint, registry, SETTINGS.get_or_default())
    }

    /// Starts a session using explicit settings.
    pub fn with_settings(
        blueprint: &'a FormBlueprint,
        registry: &'a PluginRegistry,
        settings: &Settings,
    ) -> Self {
        Self {
            blueprint,
            registry,
            state: FormState::from_defaults(blueprint),
            id_prefix: settings.id_prefix.clone(),
        }
    }

    /// The blueprint being rendered.
    pub const fn blueprint(&self) -> &'a FormBlueprint {
        self.blueprint
    }

    /// The current form state.
    pub const fn state(&self) -> &FormState {
        &self.state
    }

    /// All current values, hidden fields included.
    pub const fn values(&self) -> &HashMap<String, Value> {
        self.state.values()
    }

    /// The current value of one field.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Applies a user edit.
    ///
    /// Fails with `UnknownFieldKey` for a key the blueprint does not declare,
    /// with `FieldNotEditable` for hidden or read-only fields, and with
    /// `InvalidValue` when the field cannot hold the value's type.
    pub fn edit(&mut self, key: &str, value: impl Into<Value>) -> FibrResult<()> {
        let field = self
            .blueprint
            .field(key)
            .ok_or_else(|| FibrError::UnknownFieldKey(key.to_string()))?;
        let bound = BoundField::new(key, field, None, &self.id_prefix);
        if !bound.state.accepts_input() {
            return Err(FibrError::FieldNotEditable(key.to_string()));
        }
        let value = value.into();
        if !field.accepts_value(&value) {
            return Err(FibrError::InvalidValue(format!(
                "'{key}' is a {} field and cannot hold a {}",
                field.kind,
                value.type_name()
            )));
        }
        tracing::debug!(field = key, value = %value, "field edited");
        self.state.set(key, value);
        Ok(())
    }

    /// Restores every value to the blueprint's defaults.
    pub fn reset(&mut self) {
        self.state = FormState::from_defaults(self.blueprint);
    }

    /// The visible fields, in declaration order, bound to their current values.
    pub fn bound_fields(&self) -> Vec<BoundField<'_>> {
        self.blueprint
            .fields()
            .iter()
            .map(|entry| {
                BoundField::new(
                    &entry.key,
                    &entry.field,
                    self.state.get(&entry.key),
                    &self.id_prefix,
                )
            })
            .filter(|bound| bound.state.is_visible())
            .collect()
    }

    /// Resolves the renderer of every visible field.
    ///
    /// Fails with `UnregisteredFieldType` on the first field whose tag has no
    /// registered renderer.
    pub fn resolve_renderers(&self) -> FibrResult<Vec<(BoundField<'_>, Arc<dyn FieldRenderer>)>> {
        self.bound_fields()
            .into_iter()
            .map(|bound| {
                let renderer = self.registry.resolve_field(bound.field)?;
                Ok((bound, renderer))
            })
            .collect()
    }

    /// Renders the visible fields.
    pub fn render(&self) -> FibrResult<RenderedForm> {
        let span = form_span(self.blueprint.name().unwrap_or_default());
        let _guard = span.enter();

        let resolved = self.resolve_renderers()?;
        let fields = resolved
            .iter()
            .map(|(bound, renderer)| {
                Ok(RenderedField {
                    key: bound.key.to_string(),
                    html: renderer.render(bound)?,
                })
            })
            .collect::<FibrResult<Vec<_>>>()?;

        tracing::debug!(
            rendered = fields.len(),
            declared = self.blueprint.len(),
            "form rendered"
        );
        Ok(RenderedForm { fields })
    }

    /// Submits the current values, hidden fields included, to the blueprint's
    /// validator. Without a validator the values pass through unchanged.
    pub async fn submit(&self) -> Submission {
        let values = self.state.values();
        let Some(validator) = self.blueprint.validator() else {
            return Submission::valid(values.clone());
        };

        let context = ValidationContext {
            blueprint: self.blueprint,
        };
        let outcome = validator.validate(values, &context).await;
        if outcome.is_valid() {
            tracing::debug!(values = outcome.values.len(), "submission accepted");
        } else {
            tracing::debug!(errors = outcome.errors.len(), "submission rejected");
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blueprint::{build_form, FormSpec};
    use crate::fields::{self, FieldConfig};
    use crate::options::{Layout, OptionEntry};
    use crate::registry::Plugin;
    use crate::validation::{Rule, ShapeValidator};

    fn blueprint() -> FormBlueprint {
        build_form(
            FormSpec::new()
                .name("profile")
                .field("name", fields::string(FieldConfig::new().label("Name")).unwrap())
                .field(
                    "read_example",
                    fields::boolean(FieldConfig::new().layout(Layout::Switch).read_only(true))
                        .unwrap(),
                )
                .field(
                    "token",
                    fields::string(FieldConfig::new().hidden(true)).unwrap(),
                )
                .field(
                    "selector",
                    fields::number(
                        FieldConfig::new()
                            .layout(Layout::Select)
                            .list(vec![OptionEntry::scalar("One", 1), OptionEntry::scalar("Two", 2)]),
                    )
                    .unwrap(),
                )
                .default_value("read_example", true)
                .default_value("token", "abc")
                .default_value("selector", 2)
                .validation(
                    ShapeValidator::new()
                        .rule("name", Rule::string())
                        .rule("token", Rule::string()),
                ),
        )
        .unwrap()
    }

    #[test]
    fn test_state_seeded_from_defaults() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);
        assert_eq!(session.value("selector"), Some(&Value::Int(2)));
        assert_eq!(session.value("name"), None);
        assert_eq!(session.values().len(), 3);
    }

    #[test]
    fn test_render_skips_hidden_and_keeps_order() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);
        let rendered = session.render().unwrap();
        assert_eq!(
            rendered.keys().collect::<Vec<_>>(),
            vec!["name", "read_example", "selector"]
        );
        assert!(!rendered.to_html().contains("token"));
        assert!(rendered.get("selector").unwrap().contains(r#"<option value="2" selected>"#));
    }

    #[test]
    fn test_id_prefix_from_settings() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let settings = Settings {
            id_prefix: "profile-".to_string(),
            ..Settings::default()
        };
        let session = RenderSession::with_settings(&blueprint, &registry, &settings);
        let html = session.render().unwrap().to_html();
        assert!(html.contains(r#"id="profile-name""#));
    }

    #[test]
    fn test_edit_rules() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::new(&blueprint, &registry);

        session.edit("name", "Ada").unwrap();
        assert_eq!(session.value("name"), Some(&Value::String("Ada".into())));

        assert!(matches!(
            session.edit("age", 1),
            Err(FibrError::UnknownFieldKey(ref key)) if key == "age"
        ));
        assert!(matches!(
            session.edit("read_example", false),
            Err(FibrError::FieldNotEditable(_))
        ));
        assert!(matches!(
            session.edit("token", "other"),
            Err(FibrError::FieldNotEditable(_))
        ));
        assert_eq!(session.value("read_example"), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_edit_rejects_wrong_type() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::new(&blueprint, &registry);

        assert!(matches!(
            session.edit("name", Value::List(vec![Value::Int(1)])),
            Err(FibrError::InvalidValue(_))
        ));
        let err = session.edit("selector", "two").unwrap_err();
        assert_eq!(err.code(), "invalid_value");
        assert_eq!(session.value("selector"), Some(&Value::Int(2)));
        assert_eq!(session.value("name"), None);

        session.edit("selector", 1).unwrap();
        session.edit("name", Value::Null).unwrap();
        assert_eq!(session.value("selector"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_reset_restores_defaults() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::new(&blueprint, &registry);
        session.edit("selector", 1).unwrap();
        session.reset();
        assert_eq!(session.value("selector"), Some(&Value::Int(2)));
        assert_eq!(session.state(), &FormState::from_defaults(&blueprint));
    }

    #[test]
    fn test_unregistered_renderer_fails_whole_render() {
        let blueprint = build_form(
            FormSpec::new()
                .field("first", fields::string(FieldConfig::new()).unwrap())
                .field(
                    "slider",
                    fields::custom("sample_type", FieldConfig::new()).unwrap(),
                ),
        )
        .unwrap();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);
        assert!(matches!(
            session.render(),
            Err(FibrError::UnregisteredFieldType(ref tag)) if tag == "sample_type"
        ));
    }

    #[test]
    fn test_hidden_unregistered_custom_is_not_resolved() {
        let blueprint = build_form(FormSpec::new().field(
            "slider",
            fields::custom("sample_type", FieldConfig::new().hidden(true)).unwrap(),
        ))
        .unwrap();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);
        assert!(session.render().unwrap().fields.is_empty());
    }

    #[test]
    fn test_plugin_override_used_by_render() {
        let blueprint = blueprint();
        let mut registry = PluginRegistry::with_builtins();
        registry.register_plugin(Plugin::new("plain").renderer(
            "string",
            crate::registry::FnRenderer::new(|field: &BoundField<'_>| Ok(format!("[{}]", field.key))),
        ));
        let session = RenderSession::new(&blueprint, &registry);
        assert_eq!(session.render().unwrap().get("name"), Some("[name]"));
    }

    #[tokio::test]
    async fn test_submit_includes_hidden_values() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::new(&blueprint, &registry);
        session.edit("name", "Ada").unwrap();

        let submission = session.submit().await;
        assert!(submission.is_valid());
        assert_eq!(submission.values.get("token"), Some(&Value::String("abc".into())));
    }

    #[tokio::test]
    async fn test_submit_reports_errors() {
        let blueprint = blueprint();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);

        let submission = session.submit().await;
        assert!(!submission.is_valid());
        assert_eq!(submission.field_errors("name"), ["Required".to_string()]);
        assert!(submission.values.is_empty());
    }

    #[tokio::test]
    async fn test_submit_without_validator_passes_through() {
        let blueprint = build_form(
            FormSpec::new()
                .field("flag", fields::boolean(FieldConfig::new()).unwrap())
                .default_value("flag", false),
        )
        .unwrap();
        let registry = PluginRegistry::with_builtins();
        let session = RenderSession::new(&blueprint, &registry);
        let submission = session.submit().await;
        assert!(submission.is_valid());
        assert_eq!(submission.values.get("flag"), Some(&Value::Bool(false)));
    }
}
