//! Submission validation.
//!
//! A [`Validator`] is invoked with the full value mapping of a form when it is
//! submitted, hidden fields included, and returns a [`ValidationOutcome`]
//! holding the accepted values and per-field error messages. Validation is
//! async so implementations are free to do I/O.
//!
//! [`ShapeValidator`] is a declarative validator checking that each key holds
//! a value of the expected type, and [`FnValidator`] adapts a closure.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use fibr_core::FibrError;

use crate::blueprint::FormBlueprint;
use crate::value::Value;

/// Context handed to a validator alongside the values.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    /// The blueprint being submitted.
    pub blueprint: &'a FormBlueprint,
}

/// The result of validating a submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationOutcome {
    /// The accepted values. Empty when there are errors.
    pub values: HashMap<String, Value>,
    /// Error messages keyed by field key.
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationOutcome {
    /// An outcome accepting `values` without errors.
    pub fn valid(values: HashMap<String, Value>) -> Self {
        Self {
            values,
            errors: HashMap::new(),
        }
    }

    /// An outcome rejecting the submission with the given errors.
    pub fn invalid(errors: HashMap<String, Vec<String>>) -> Self {
        Self {
            values: HashMap::new(),
            errors,
        }
    }

    /// Returns `true` if there are no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors for one field.
    pub fn field_errors(&self, key: &str) -> &[String] {
        self.errors.get(key).map_or(&[], Vec::as_slice)
    }
}

/// Validates the values of a submitted form.
#[async_trait]
pub trait Validator: Send + Sync {
    /// Validates `values`. Errors are reported in the outcome, not raised.
    async fn validate(
        &self,
        values: &HashMap<String, Value>,
        context: &ValidationContext<'_>,
    ) -> ValidationOutcome;
}

// ---------------------------------------------------------------------------
// Shape validation
// ---------------------------------------------------------------------------

/// The type a [`Rule`] expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// A boolean.
    Boolean,
    /// An integer or float.
    Number,
    /// A string.
    String,
    /// Any non-null value.
    Any,
}

impl RuleKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Any => "any",
        }
    }

    const fn matches(self, value: &Value) -> bool {
        match self {
            Self::Boolean => matches!(value, Value::Bool(_)),
            Self::Number => value.is_number(),
            Self::String => matches!(value, Value::String(_)),
            Self::Any => true,
        }
    }
}

/// The expectation for one key of a [`ShapeValidator`].
///
/// Rules parse from `"boolean"`, `"number"`, `"string"` or `"any"`, with a
/// trailing `?` marking the key optional.
///
/// # Examples
///
/// ```
/// use fibr_forms::validation::Rule;
///
/// let rule: Rule = "number?".parse().unwrap();
/// assert_eq!(rule, Rule::number().optional());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    kind: RuleKind,
    optional: bool,
}

impl Rule {
    /// A required boolean.
    pub const fn boolean() -> Self {
        Self::required(RuleKind::Boolean)
    }

    /// A required number.
    pub const fn number() -> Self {
        Self::required(RuleKind::Number)
    }

    /// A required string.
    pub const fn string() -> Self {
        Self::required(RuleKind::String)
    }

    /// Any required value.
    pub const fn any() -> Self {
        Self::required(RuleKind::Any)
    }

    const fn required(kind: RuleKind) -> Self {
        Self {
            kind,
            optional: false,
        }
    }

    /// Makes the key optional (missing or null is accepted).
    #[must_use]
    pub const fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// The expected type.
    pub const fn kind(self) -> RuleKind {
        self.kind
    }

    /// Returns `true` if the key may be missing or null.
    pub const fn is_optional(self) -> bool {
        self.optional
    }

    fn check(self, value: Option<&Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) if self.optional => None,
            None | Some(Value::Null) => Some("Required".to_string()),
            Some(v) if self.kind.matches(v) => None,
            Some(v) => Some(format!(
                "Expected {}, received {}",
                self.kind.as_str(),
                v.type_name()
            )),
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind.as_str())?;
        if self.optional {
            f.write_str("?")?;
        }
        Ok(())
    }
}

impl FromStr for Rule {
    type Err = FibrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (name, optional) = trimmed
            .strip_suffix('?')
            .map_or((trimmed, false), |name| (name, true));
        let rule = match name {
            "boolean" => Self::boolean(),
            "number" => Self::number(),
            "string" => Self::string(),
            "any" => Self::any(),
            other => {
                return Err(FibrError::InvalidConfig(format!(
                    "unknown validation rule '{other}'"
                )));
            }
        };
        Ok(if optional { rule.optional() } else { rule })
    }
}

/// Validates the type of each listed key.
///
/// Keys without a rule pass through untouched. On any error the outcome
/// carries no values.
///
/// # Examples
///
/// ```
/// use fibr_forms::validation::{Rule, ShapeValidator};
///
/// let validator = ShapeValidator::new()
///     .rule("name", Rule::string())
///     .rule("read_example", Rule::boolean());
/// assert_eq!(validator.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ShapeValidator {
    rules: Vec<(String, Rule)>,
}

impl ShapeValidator {
    /// Creates a validator with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) the rule for `key`.
    #[must_use]
    pub fn rule(mut self, key: impl Into<String>, rule: Rule) -> Self {
        let key = key.into();
        if let Some(entry) = self.rules.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = rule;
        } else {
            self.rules.push((key, rule));
        }
        self
    }

    /// Returns the number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Checks `values` synchronously.
    pub fn check(&self, values: &HashMap<String, Value>) -> ValidationOutcome {
        let mut errors: HashMap<String, Vec<String>> = HashMap::new();
        for (key, rule) in &self.rules {
            if let Some(message) = rule.check(values.get(key)) {
                errors.entry(key.clone()).or_default().push(message);
            }
        }

        if errors.is_empty() {
            ValidationOutcome::valid(values.clone())
        } else {
            ValidationOutcome::invalid(errors)
        }
    }
}

#[async_trait]
impl Validator for ShapeValidator {
    async fn validate(
        &self,
        values: &HashMap<String, Value>,
        _context: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        self.check(values)
    }
}

/// Adapts a closure into a [`Validator`].
pub struct FnValidator<F> {
    func: F,
}

impl<F> FnValidator<F>
where
    F: Fn(&HashMap<String, Value>, &ValidationContext<'_>) -> ValidationOutcome + Send + Sync,
{
    /// Wraps `func`.
    pub const fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> fmt::Debug for FnValidator<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnValidator").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&HashMap<String, Value>, &ValidationContext<'_>) -> ValidationOutcome + Send + Sync,
{
    async fn validate(
        &self,
        values: &HashMap<String, Value>,
        context: &ValidationContext<'_>,
    ) -> ValidationOutcome {
        (self.func)(values, context)
    }
}
