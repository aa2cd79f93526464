//! The `render` command.
//!
//! Renders the visible fields of a blueprint with the built-in renderers and
//! prints the markup to stdout.

use async_trait::async_trait;
use fibr_core::{FibrResult, Settings};
use fibr_forms::{PluginRegistry, RenderSession};

use super::{apply_values, file_arg, load_blueprint, values_arg};
use crate::command::Command;

/// Renders a blueprint document to HTML.
pub struct RenderCommand;

#[async_trait]
impl Command for RenderCommand {
    fn name(&self) -> &'static str {
        "render"
    }

    fn help(&self) -> &'static str {
        "Render a blueprint document to HTML"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(file_arg()).arg(values_arg())
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FibrResult<()> {
        let blueprint = load_blueprint(matches, settings)?;
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::with_settings(&blueprint, &registry, settings);
        apply_values(&mut session, matches)?;

        let rendered = session.render()?;
        tracing::info!(fields = rendered.fields.len(), "rendered");
        println!("{}", rendered.to_html());
        Ok(())
    }
}
