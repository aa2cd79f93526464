//! Smoke tests for the meta-crate re-exports.

use fibr::prelude::*;

#[tokio::test]
async fn prelude_covers_build_render_submit() {
    let blueprint = build_form(
        FormSpec::new()
            .field(
                "check_button",
                fields::boolean(FieldConfig::new().label("Switch").layout(Layout::Switch)).unwrap(),
            )
            .default_value("check_button", true)
            .validation(ShapeValidator::new().rule("check_button", Rule::boolean())),
    )
    .unwrap();

    let registry = PluginRegistry::with_builtins();
    let session = RenderSession::new(&blueprint, &registry);
    assert!(session.render().unwrap().to_html().contains(r#"role="switch""#));
    assert!(session.submit().await.is_valid());
}

#[test]
fn error_codes_are_reachable() {
    let err = build_form(FormSpec::new().default_value("age", 1)).unwrap_err();
    assert!(matches!(err, FibrError::UnknownFieldKey(_)));
    assert_eq!(err.code(), "unknown_field_key");
}

#[test]
fn cli_is_reexported() {
    let mut registry = fibr::cli::CommandRegistry::new();
    fibr::cli::commands::register_builtin_commands(&mut registry);
    assert_eq!(registry.len(), 3);
}
