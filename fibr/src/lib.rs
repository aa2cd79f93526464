//! # fibr
//!
//! Declarative form blueprints for Rust.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient
//! access. Depend on `fibr` to get everything, or on individual crates for
//! finer-grained control.
//!
//! ```
//! use fibr::forms::fields::{self, FieldConfig};
//! use fibr::forms::{build_form, FormSpec, PluginRegistry, RenderSession};
//!
//! let blueprint = build_form(
//!     FormSpec::new().field("name", fields::string(FieldConfig::new().label("Name")).unwrap()),
//! )
//! .unwrap();
//! let registry = PluginRegistry::with_builtins();
//! let html = RenderSession::new(&blueprint, &registry).render().unwrap().to_html();
//! assert!(html.contains(r#"<label for="id_name">Name</label>"#));
//! ```

/// Settings, logging, and error types.
pub use fibr_core as core;

/// Field builder, blueprints, plugin registry, rendering, and validation.
#[cfg(feature = "forms")]
pub use fibr_forms as forms;

/// The preview CLI command framework.
#[cfg(feature = "cli")]
pub use fibr_cli as cli;

/// Third-party crates re-exported for user convenience.
pub use async_trait;
pub use serde;
pub use serde_json;
pub use tracing;

/// The most commonly used types.
pub mod prelude {
    pub use fibr_core::{FibrError, FibrResult, Settings, SETTINGS};

    #[cfg(feature = "forms")]
    pub use fibr_forms::{
        build_field, build_form, fields, FieldConfig, FieldKind, FieldRenderer, FormBlueprint,
        FormSpec, Layout, OptionEntry, Plugin, PluginRegistry, RenderSession, Rule,
        ShapeValidator, Validator, Value,
    };
}
