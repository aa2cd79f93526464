//! Built-in commands.
//!
//! Each command implements the [`Command`](crate::command::Command) trait and
//! operates on one blueprint document given as a positional argument.

pub mod check;
pub mod render;
pub mod submit;

pub use check::CheckCommand;
pub use render::RenderCommand;
pub use submit::SubmitCommand;

use std::collections::BTreeMap;
use std::path::Path;

use fibr_core::{FibrError, FibrResult, Settings};
use fibr_forms::{document, FormBlueprint, RenderSession, Value};

use crate::command::CommandRegistry;

/// Registers all built-in commands into the given registry.
pub fn register_builtin_commands(registry: &mut CommandRegistry) {
    registry.register(Box::new(CheckCommand));
    registry.register(Box::new(RenderCommand));
    registry.register(Box::new(SubmitCommand));
}

/// The positional blueprint file argument shared by every command.
pub(crate) fn file_arg() -> clap::Arg {
    clap::Arg::new("file")
        .required(true)
        .value_name("FILE")
        .help("Blueprint document (.toml, anything else is read as JSON)")
}

/// The `--values` option shared by `render` and `submit`.
pub(crate) fn values_arg() -> clap::Arg {
    clap::Arg::new("values")
        .long("values")
        .value_name("JSON")
        .help("JSON object of field edits applied before running")
}

/// Loads and builds the blueprint named by the `file` argument.
pub(crate) fn load_blueprint(
    matches: &clap::ArgMatches,
    settings: &Settings,
) -> FibrResult<FormBlueprint> {
    let path = matches
        .get_one::<String>("file")
        .ok_or_else(|| FibrError::ConfigurationError("No blueprint file given".to_string()))?;
    load_blueprint_file(Path::new(path), settings)
}

/// Loads and builds a blueprint document with explicit settings.
pub fn load_blueprint_file(path: &Path, settings: &Settings) -> FibrResult<FormBlueprint> {
    let blueprint = document::load_document(path)?.build_with_settings(settings)?;
    tracing::info!(
        file = %path.display(),
        fields = blueprint.len(),
        "blueprint loaded"
    );
    Ok(blueprint)
}

/// Parses a `--values` JSON object.
pub fn parse_values(input: &str) -> FibrResult<BTreeMap<String, Value>> {
    serde_json::from_str(input).map_err(|e| {
        FibrError::SerializationError(format!("--values must be a JSON object of field values: {e}"))
    })
}

/// Applies the `--values` edits, if given, to `session` in key order.
pub(crate) fn apply_values(
    session: &mut RenderSession<'_>,
    matches: &clap::ArgMatches,
) -> FibrResult<()> {
    let Some(input) = matches.get_one::<String>("values") else {
        return Ok(());
    };
    for (key, value) in parse_values(input)? {
        session.edit(&key, value)?;
    }
    Ok(())
}
