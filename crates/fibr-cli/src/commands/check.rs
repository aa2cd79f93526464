//! The `check` command.
//!
//! Loads a blueprint document, builds it, and inspects the result for
//! problems that construction accepts but rendering or submission would trip
//! over.

use async_trait::async_trait;
use fibr_core::{FibrError, FibrResult, Settings};
use fibr_forms::options::contains_value;
use fibr_forms::{FormBlueprint, PluginRegistry};

use super::{file_arg, load_blueprint};
use crate::command::Command;

/// Checks a blueprint document.
pub struct CheckCommand;

/// The result of a single blueprint check.
#[derive(Debug, Clone)]
pub struct CheckMessage {
    /// The severity level of this check result.
    pub level: CheckLevel,
    /// A human-readable description of the issue.
    pub msg: String,
    /// An optional hint for how to resolve the issue.
    pub hint: Option<String>,
    /// A unique identifier for this check (e.g. "fields.E001").
    pub id: String,
}

/// Severity levels for check results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckLevel {
    /// Informational message.
    Info,
    /// A warning that may indicate a problem.
    Warning,
    /// An error that makes the blueprint unusable.
    Error,
}

impl std::fmt::Display for CheckLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARNING"),
            Self::Error => write!(f, "ERROR"),
        }
    }
}

/// Runs the blueprint checks against `registry`.
pub fn run_checks(blueprint: &FormBlueprint, registry: &PluginRegistry) -> Vec<CheckMessage> {
    let mut messages = Vec::new();

    for entry in blueprint.fields() {
        let key = &entry.key;
        let field = &entry.field;
        let tag = field.registry_tag();

        // A visible field without a renderer fails every render.
        if !registry.contains(tag) {
            let (level, id) = if field.hidden {
                (CheckLevel::Warning, "fields.W001")
            } else {
                (CheckLevel::Error, "fields.E001")
            };
            messages.push(CheckMessage {
                level,
                msg: format!("Field '{key}' uses type '{tag}' which has no registered renderer"),
                hint: Some(format!("Register a plugin providing '{tag}'")),
                id: id.to_string(),
            });
        }

        if field.hidden && field.read_only {
            messages.push(CheckMessage {
                level: CheckLevel::Info,
                msg: format!("Field '{key}' is both hidden and read-only"),
                hint: Some("Hidden takes precedence; read_only has no effect".to_string()),
                id: "fields.I001".to_string(),
            });
        }

        let Some(default) = blueprint.default_value(key) else {
            continue;
        };

        if !field.accepts_value(default) {
            messages.push(CheckMessage {
                level: CheckLevel::Warning,
                msg: format!(
                    "Default for '{key}' is a {} but the field is {}",
                    default.type_name(),
                    field.kind
                ),
                hint: Some("Enable strict_defaults to reject mismatched defaults".to_string()),
                id: "defaults.W001".to_string(),
            });
        } else if field.options.list.is_some()
            && !default.is_null()
            && !contains_value(field.list(), default)
        {
            messages.push(CheckMessage {
                level: CheckLevel::Warning,
                msg: format!("Default for '{key}' ({default}) is not one of its options"),
                hint: None,
                id: "defaults.W002".to_string(),
            });
        }
    }

    if !blueprint.is_empty() && blueprint.fields().iter().all(|entry| entry.field.hidden) {
        messages.push(CheckMessage {
            level: CheckLevel::Warning,
            msg: "Every field is hidden; the form renders empty".to_string(),
            hint: None,
            id: "form.W001".to_string(),
        });
    }

    messages
}

#[async_trait]
impl Command for CheckCommand {
    fn name(&self) -> &'static str {
        "check"
    }

    fn help(&self) -> &'static str {
        "Validate a blueprint document"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(file_arg())
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FibrResult<()> {
        let blueprint = load_blueprint(matches, settings)?;
        let registry = PluginRegistry::with_builtins();
        let messages = run_checks(&blueprint, &registry);

        if messages.is_empty() {
            tracing::info!(fields = blueprint.len(), "Blueprint check identified no issues");
            return Ok(());
        }

        let errors = messages.iter().filter(|m| m.level >= CheckLevel::Error).count();
        let warnings = messages.iter().filter(|m| m.level == CheckLevel::Warning).count();

        for msg in &messages {
            let hint_text = msg
                .hint
                .as_ref()
                .map_or(String::new(), |h| format!("\n\tHINT: {h}"));
            tracing::warn!("{} ({}): {}{}", msg.level, msg.id, msg.msg, hint_text);
        }

        tracing::info!(
            "Blueprint check identified {} issue(s) ({} error(s), {} warning(s))",
            messages.len(),
            errors,
            warnings
        );

        if errors > 0 {
            return Err(FibrError::ConfigurationError(format!(
                "Blueprint check found {errors} error(s)"
            )));
        }

        Ok(())
    }
}
