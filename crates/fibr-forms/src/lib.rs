//! # fibr-forms
//!
//! Declarative form blueprints. A blueprint is an ordered set of typed fields
//! (boolean, number, string, or a custom type) with presentation metadata,
//! visibility/interaction flags, and layout-specific option lists, plus default
//! values and an optional validator.
//!
//! ## Modules
//!
//! - [`value`] - Dynamically typed form values and option scalars
//! - [`options`] - Layout variants and (grouped) option lists
//! - [`fields`] - Field kinds, descriptors, and the field builder
//! - [`blueprint`] - Form specs and the validated, immutable [`FormBlueprint`]
//! - [`registry`] - The extension registry mapping type tags to renderers
//! - [`resolver`] - Visibility / interaction / layout resolution
//! - [`bound_field`] - A field paired with its render state and current value
//! - [`widgets`] - Built-in HTML renderers for the boolean, number and string kinds
//! - [`session`] - Render sessions holding the mutable form state
//! - [`validation`] - The async validator interface and a shape validator
//! - [`document`] - Loading blueprints from JSON or TOML documents
//!
//! ## Example
//!
//! ```
//! use fibr_forms::{build_form, fields, FieldConfig, FormSpec, Value};
//!
//! let blueprint = build_form(
//!     FormSpec::new()
//!         .field("name", fields::boolean(FieldConfig::new().label("Name")).unwrap())
//!         .default_value("name", true),
//! )
//! .unwrap();
//!
//! assert_eq!(blueprint.len(), 1);
//! assert_eq!(blueprint.default_value("name"), Some(&Value::Bool(true)));
//! ```

pub mod blueprint;
pub mod bound_field;
pub mod document;
pub mod fields;
pub mod options;
pub mod registry;
pub mod resolver;
pub mod session;
pub mod validation;
pub mod value;
pub mod widgets;

pub use blueprint::{build_form, build_form_with_settings, FieldEntry, FormBlueprint, FormSpec};
pub use bound_field::BoundField;
pub use document::BlueprintDocument;
pub use fields::{build_field, FieldConfig, FieldDescriptor, FieldKind};
pub use options::{FieldOptions, Layout, OptionEntry, OptionValue, MAX_OPTION_DEPTH};
pub use registry::{FieldRenderer, FnRenderer, Plugin, PluginRegistry};
pub use resolver::{resolve_render_state, Interaction, RenderState, Visibility};
pub use session::{FormState, RenderSession, RenderedField, RenderedForm, Submission};
pub use validation::{
    FnValidator, Rule, ShapeValidator, ValidationContext, ValidationOutcome, Validator,
};
pub use value::{Scalar, Value};
