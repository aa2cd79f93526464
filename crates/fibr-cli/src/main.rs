//! The `fibr` binary.
//!
//! ```bash
//! fibr check form.toml
//! fibr render form.json --values '{"name": true}'
//! fibr --settings fibr.toml submit form.toml
//! ```

use std::path::Path;
use std::process::ExitCode;

use fibr_cli::commands::register_builtin_commands;
use fibr_cli::{load_settings, CommandRegistry};
use fibr_core::logging::setup_logging;
use fibr_core::SETTINGS;

#[tokio::main]
async fn main() -> ExitCode {
    let mut registry = CommandRegistry::new();
    register_builtin_commands(&mut registry);
    let matches = registry.build_cli().get_matches();

    let settings_path = matches.get_one::<String>("settings").map(Path::new);
    let settings = match load_settings(settings_path) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&settings);
    SETTINGS.configure(settings);

    match registry.execute(&matches, SETTINGS.get()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(code = e.code(), "{e}");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
