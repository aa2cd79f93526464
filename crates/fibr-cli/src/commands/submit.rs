//! The `submit` command.
//!
//! Applies optional edits to a blueprint's default values, runs the
//! blueprint's validator, and prints the outcome as JSON.

use std::collections::BTreeMap;

use async_trait::async_trait;
use fibr_core::{FibrError, FibrResult, Settings};
use fibr_forms::{PluginRegistry, RenderSession, Submission};

use super::{apply_values, file_arg, load_blueprint, values_arg};
use crate::command::Command;

/// Submits a blueprint document's values to its validator.
pub struct SubmitCommand;

/// Converts a submission into a JSON report with sorted keys.
pub fn submission_json(submission: &Submission) -> FibrResult<serde_json::Value> {
    let values: BTreeMap<_, _> = submission.values.iter().collect();
    let errors: BTreeMap<_, _> = submission.errors.iter().collect();
    let values = serde_json::to_value(values)
        .map_err(|e| FibrError::SerializationError(format!("Failed to serialize values: {e}")))?;
    Ok(serde_json::json!({
        "valid": submission.is_valid(),
        "values": values,
        "errors": errors,
    }))
}

#[async_trait]
impl Command for SubmitCommand {
    fn name(&self) -> &'static str {
        "submit"
    }

    fn help(&self) -> &'static str {
        "Validate a blueprint document's values and print the submission"
    }

    fn add_arguments(&self, cmd: clap::Command) -> clap::Command {
        cmd.arg(file_arg()).arg(values_arg())
    }

    async fn handle(&self, matches: &clap::ArgMatches, settings: &Settings) -> FibrResult<()> {
        let blueprint = load_blueprint(matches, settings)?;
        let registry = PluginRegistry::with_builtins();
        let mut session = RenderSession::with_settings(&blueprint, &registry, settings);
        apply_values(&mut session, matches)?;

        let submission = session.submit().await;
        if submission.is_valid() {
            tracing::info!(values = submission.values.len(), "submission valid");
        } else {
            tracing::warn!(errors = submission.errors.len(), "submission invalid");
        }

        let report = submission_json(&submission)?;
        let text = serde_json::to_string_pretty(&report)
            .map_err(|e| FibrError::SerializationError(e.to_string()))?;
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandRegistry;
    use fibr_forms::Value;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_submission_json_valid() {
        let submission = Submission::valid(HashMap::from([
            ("b".to_string(), Value::Int(2)),
            ("a".to_string(), Value::Bool(true)),
        ]));
        let report = submission_json(&submission).unwrap();
        assert_eq!(
            report,
            serde_json::json!({"valid": true, "values": {"a": true, "b": 2}, "errors": {}})
        );
    }

    #[test]
    fn test_submission_json_invalid() {
        let submission = Submission::invalid(HashMap::from([(
            "first_name".to_string(),
            vec!["Required".to_string()],
        )]));
        let report = submission_json(&submission).unwrap();
        assert_eq!(report["valid"], serde_json::json!(false));
        assert_eq!(report["errors"]["first_name"][0], "Required");
    }

    #[tokio::test]
    async fn test_submit_toml_document() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(
            br#"
[[fields]]
key = "first_name"
kind = "string"

[validation]
first_name = "string"
"#,
        )
        .unwrap();

        let mut registry = CommandRegistry::new();
        registry.register(Box::new(SubmitCommand));
        let matches = registry
            .build_cli()
            .try_get_matches_from([
                "fibr",
                "submit",
                file.path().to_str().unwrap(),
                "--values",
                r#"{"first_name": "Ada"}"#,
            ])
            .unwrap();
        assert!(registry.execute(&matches, &Settings::default()).await.is_ok());
    }
}
