//! Command framework for the fibr CLI.
//!
//! This module provides the [`Command`] trait for defining CLI subcommands and
//! [`CommandRegistry`] for registering and dispatching them.
//!
//! ## Defining a Custom Command
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use fibr_cli::command::Command;
//! use fibr_core::{FibrResult, Settings};
//!
//! struct GreetCommand;
//!
//! #[async_trait]
//! impl Command for GreetCommand {
//!     fn name(&self) -> &str { "greet" }
//!     fn help(&self) -> &str { "Say hello" }
//!
//!     async fn handle(
//!         &self,
//!         _matches: &clap::ArgMatches,
//!         _settings: &Settings,
//!     ) -> FibrResult<()> {
//!         println!("Hello from fibr!");
//!         Ok(())
//!     }
//! }
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use fibr_core::{FibrError, FibrResult, Settings};

/// A subcommand that can be registered and invoked through the CLI.
///
/// All commands must be `Send + Sync` so the registry can be driven from any
/// tokio worker.
#[async_trait]
pub trait Command: Send + Sync {
    /// Returns the name of this command (used to invoke it from the CLI).
    fn name(&self) -> &str;

    /// Returns a short help description for this command.
    fn help(&self) -> &str;

    /// Adds custom arguments to the clap command.
    ///
    /// The default implementation returns the command unchanged.
    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd
    }

    /// Executes the command with the given argument matches and settings.
    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FibrResult<()>;
}

/// A registry of CLI commands, keyed by name.
pub struct CommandRegistry {
    commands: HashMap<String, Box<dyn Command>>,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRegistry {
    /// Creates a new empty command registry.
    pub fn new() -> Self {
        Self {
            commands: HashMap::new(),
        }
    }

    /// Registers a command. A command with the same name is replaced.
    pub fn register(&mut self, command: Box<dyn Command>) {
        let name = command.name().to_string();
        if self.commands.insert(name.clone(), command).is_some() {
            tracing::debug!(command = %name, "command replaced");
        }
    }

    /// Returns the command with the given name, if registered.
    pub fn get(&self, name: &str) -> Option<&dyn Command> {
        self.commands.get(name).map(AsRef::as_ref)
    }

    /// Returns a sorted list of all registered command names.
    pub fn list_commands(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Returns the number of registered commands.
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Returns `true` if no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Builds the top-level clap `Command` with every registered subcommand
    /// and the global `--settings` option.
    pub fn build_cli(&self) -> clap::Command {
        let mut app = clap::Command::new("fibr")
            .about("Check, render, and submit fibr form blueprints")
            .subcommand_required(true)
            .arg(
                clap::Arg::new("settings")
                    .long("settings")
                    .global(true)
                    .value_name("FILE")
                    .help("Settings file (.toml or .json)"),
            );

        let mut entries: Vec<_> = self.commands.iter().collect();
        entries.sort_by_key(|(name, _)| (*name).clone());

        for (name, cmd) in entries {
            // clap needs &'static str names; commands are registered once at startup.
            let static_name: &'static str = Box::leak(name.clone().into_boxed_str());
            let subcmd = clap::Command::new(static_name).about(cmd.help().to_string());
            app = app.subcommand(cmd.add_arguments(subcmd));
        }

        app
    }

    /// Dispatches to the subcommand named in `matches`.
    pub async fn execute(&self, matches: &clap::ArgMatches, settings: &Settings) -> FibrResult<()> {
        let (name, sub_matches) = matches
            .subcommand()
            .ok_or_else(|| FibrError::ConfigurationError("No subcommand specified".to_string()))?;

        let cmd = self
            .get(name)
            .ok_or_else(|| FibrError::ConfigurationError(format!("Unknown command: {name}")))?;

        tracing::debug!(command = name, "executing command");
        cmd.handle(sub_matches, settings).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCommand {
        cmd_name: String,
    }

    impl TestCommand {
        fn new(name: &str) -> Self {
            Self {
                cmd_name: name.to_string(),
            }
        }
    }

    #[async_trait]
    impl Command for TestCommand {
        fn name(&self) -> &str {
            &self.cmd_name
        }

        fn help(&self) -> &'static str {
            "A test command"
        }

        fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
            cmd.arg(
                clap::Arg::new("verbose")
                    .long("verbose")
                    .action(clap::ArgAction::SetTrue),
            )
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _settings: &Settings) -> FibrResult<()> {
            Ok(())
        }
    }

    struct FailingCommand;

    #[async_trait]
    impl Command for FailingCommand {
        fn name(&self) -> &'static str {
            "fail"
        }

        fn help(&self) -> &'static str {
            "Always fails"
        }

        async fn handle(&self, _matches: &clap::ArgMatches, _settings: &Settings) -> FibrResult<()> {
            Err(FibrError::ConfigurationError("boom".to_string()))
        }
    }

    #[test]
    fn test_registry_basics() {
        let mut registry = CommandRegistry::new();
        assert!(registry.is_empty());
        registry.register(Box::new(TestCommand::new("b")));
        registry.register(Box::new(TestCommand::new("a")));
        registry.register(Box::new(TestCommand::new("a")));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.list_commands(), vec!["a", "b"]);
        assert!(registry.get("a").is_some());
        assert!(registry.get("c").is_none());
    }

    #[test]
    fn test_build_cli_parses_arguments() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("test")));

        let matches = registry
            .build_cli()
            .try_get_matches_from(["fibr", "--settings", "fibr.toml", "test", "--verbose"])
            .unwrap();
        assert_eq!(
            matches.get_one::<String>("settings").map(String::as_str),
            Some("fibr.toml")
        );
        let (name, sub_matches) = matches.subcommand().unwrap();
        assert_eq!(name, "test");
        assert!(sub_matches.get_flag("verbose"));
    }

    #[test]
    fn test_subcommand_required() {
        let registry = CommandRegistry::new();
        assert!(registry.build_cli().try_get_matches_from(["fibr"]).is_err());
    }

    #[tokio::test]
    async fn test_execute_success() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(TestCommand::new("test")));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["fibr", "test"])
            .unwrap();
        assert!(registry.execute(&matches, &Settings::default()).await.is_ok());
    }

    #[tokio::test]
    async fn test_execute_failing_command() {
        let mut registry = CommandRegistry::new();
        registry.register(Box::new(FailingCommand));
        let matches = registry
            .build_cli()
            .try_get_matches_from(["fibr", "fail"])
            .unwrap();
        let result = registry.execute(&matches, &Settings::default()).await;
        assert!(matches!(result, Err(FibrError::ConfigurationError(_))));
    }
}
