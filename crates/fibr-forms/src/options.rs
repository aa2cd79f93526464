//! Layout variants and option lists.
//!
//! An option list is an ordered sequence of [`OptionEntry`] values. Each entry
//! either carries a selectable [`Scalar`] or groups a sub-list of scalar entries
//! under a label. Groups nest at most [`MAX_OPTION_DEPTH`] level deep.

use std::fmt;
use std::str::FromStr;

use fibr_core::{FibrError, FibrResult};
use serde::{Deserialize, Serialize};

use crate::value::{Scalar, Value};

/// How deep option groups may nest below the top-level list.
pub const MAX_OPTION_DEPTH: usize = 1;

/// The interaction widget used for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Layout {
    /// A toggle switch (boolean).
    Switch,
    /// A single checkbox (boolean) or a checkbox group (number).
    Checkbox,
    /// A radio group.
    Radio,
    /// A text input with suggestions.
    Combobox,
    /// A drop-down list.
    Select,
    /// A multi-select list.
    Multi,
}

impl Layout {
    /// All layout variants, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::Switch,
        Self::Checkbox,
        Self::Radio,
        Self::Combobox,
        Self::Select,
        Self::Multi,
    ];

    /// The lowercase tag used in blueprint documents.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Switch => "switch",
            Self::Checkbox => "checkbox",
            Self::Radio => "radio",
            Self::Combobox => "combobox",
            Self::Select => "select",
            Self::Multi => "multi",
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Layout {
    type Err = FibrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|layout| layout.as_str() == s)
            .ok_or_else(|| FibrError::InvalidConfig(format!("unknown layout '{s}'")))
    }
}

/// The value of an option entry: a scalar, or a group of scalar entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// A directly selectable value.
    Scalar(Scalar),
    /// A labelled group of entries.
    Group(Vec<OptionEntry>),
}

/// One entry in an option list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionEntry {
    /// Display label.
    pub label: String,
    /// The selectable value or the grouped sub-list.
    pub value: OptionValue,
}

impl OptionEntry {
    /// Creates a selectable entry.
    pub fn scalar(label: impl Into<String>, value: impl Into<Scalar>) -> Self {
        Self {
            label: label.into(),
            value: OptionValue::Scalar(value.into()),
        }
    }

    /// Creates a group entry.
    pub fn group(label: impl Into<String>, entries: Vec<Self>) -> Self {
        Self {
            label: label.into(),
            value: OptionValue::Group(entries),
        }
    }

    /// Returns `true` if this entry groups a sub-list.
    pub const fn is_group(&self) -> bool {
        matches!(self.value, OptionValue::Group(_))
    }
}

/// Kind-specific rendering options of a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldOptions {
    /// The layout variant; `None` selects the kind's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Layout>,
    /// Selectable options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<Vec<OptionEntry>>,
}

/// Validates an option list.
///
/// Fails with `InvalidConfig` on duplicate values within one level, on groups
/// nested deeper than [`MAX_OPTION_DEPTH`], and on empty groups.
pub fn validate_list(entries: &[OptionEntry]) -> FibrResult<()> {
    validate_level(entries, 0)
}

fn validate_level(entries: &[OptionEntry], depth: usize) -> FibrResult<()> {
    let mut seen: Vec<&Scalar> = Vec::with_capacity(entries.len());
    for entry in entries {
        match &entry.value {
            OptionValue::Scalar(scalar) => {
                if matches!(scalar, Scalar::Float(v) if !v.is_finite()) {
                    return Err(FibrError::InvalidConfig(format!(
                        "option '{}' has a non-finite value '{scalar}'",
                        entry.label
                    )));
                }
                if seen.iter().any(|prev| prev.same_value(scalar)) {
                    return Err(FibrError::InvalidConfig(format!(
                        "duplicate option value '{scalar}' (label '{}')",
                        entry.label
                    )));
                }
                seen.push(scalar);
            }
            OptionValue::Group(children) => {
                if depth >= MAX_OPTION_DEPTH {
                    return Err(FibrError::InvalidConfig(format!(
                        "option group '{}' nests deeper than {MAX_OPTION_DEPTH} level",
                        entry.label
                    )));
                }
                if children.is_empty() {
                    return Err(FibrError::InvalidConfig(format!(
                        "option group '{}' is empty",
                        entry.label
                    )));
                }
                validate_level(children, depth + 1)?;
            }
        }
    }
    Ok(())
}

/// Returns every selectable `(label, value)` pair, groups flattened in order.
pub fn flatten(entries: &[OptionEntry]) -> Vec<(&str, &Scalar)> {
    let mut out = Vec::new();
    for entry in entries {
        match &entry.value {
            OptionValue::Scalar(scalar) => out.push((entry.label.as_str(), scalar)),
            OptionValue::Group(children) => out.extend(flatten(children)),
        }
    }
    out
}

/// Returns `true` if `value` (or every item of a list value) is one of the
/// selectable values in `entries`.
pub fn contains_value(entries: &[OptionEntry], value: &Value) -> bool {
    let choices = flatten(entries);
    let known = |v: &Value| {
        v.to_scalar()
            .is_some_and(|s| choices.iter().any(|(_, c)| c.same_value(&s)))
    };
    match value {
        Value::List(items) => items.iter().all(known),
        other => known(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn languages() -> Vec<OptionEntry> {
        vec![
            OptionEntry::scalar("Node JS", 1),
            OptionEntry::group(
                "Python",
                vec![
                    OptionEntry::scalar("Python 3.10", 12),
                    OptionEntry::scalar("Python 3.9", 20),
                ],
            ),
        ]
    }

    #[test]
    fn test_layout_round_trips_through_str() {
        for layout in Layout::ALL {
            assert_eq!(layout.as_str().parse::<Layout>().unwrap(), layout);
        }
        assert!(matches!(
            "slider".parse::<Layout>(),
            Err(FibrError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_nested_list() {
        assert!(validate_list(&languages()).is_ok());
    }

    #[test]
    fn test_non_finite_values_rejected() {
        let nans = vec![
            OptionEntry::scalar("A", f64::NAN),
            OptionEntry::scalar("B", f64::NAN),
        ];
        let err = validate_list(&nans).unwrap_err();
        assert!(matches!(err, FibrError::InvalidConfig(_)));
        assert!(err.to_string().contains("non-finite"));

        let nested = vec![OptionEntry::group(
            "Limits",
            vec![OptionEntry::scalar("Max", f64::INFINITY)],
        )];
        assert!(validate_list(&nested).is_err());
        assert!(validate_list(&[OptionEntry::scalar("Half", 0.5)]).is_ok());
    }

    #[test]
    fn test_duplicate_values_at_same_level() {
        let list = vec![OptionEntry::scalar("A", 1), OptionEntry::scalar("B", 1)];
        let err = validate_list(&list).unwrap_err();
        assert!(err.to_string().contains("duplicate option value '1'"));
    }

    #[test]
    fn test_duplicate_values_across_levels_allowed() {
        let list = vec![
            OptionEntry::scalar("A", 1),
            OptionEntry::group("G", vec![OptionEntry::scalar("A again", 1)]),
        ];
        assert!(validate_list(&list).is_ok());
    }

    #[test]
    fn test_duplicate_inside_group() {
        let list = vec![OptionEntry::group(
            "G",
            vec![OptionEntry::scalar("x", 2), OptionEntry::scalar("y", 2.0)],
        )];
        assert!(matches!(validate_list(&list), Err(FibrError::InvalidConfig(_))));
    }

    #[test]
    fn test_nesting_too_deep() {
        let list = vec![OptionEntry::group(
            "outer",
            vec![OptionEntry::group("inner", vec![OptionEntry::scalar("x", 1)])],
        )];
        let err = validate_list(&list).unwrap_err();
        assert!(err.to_string().contains("nests deeper"));
    }

    #[test]
    fn test_empty_group() {
        let list = vec![OptionEntry::group("empty", vec![])];
        assert!(matches!(validate_list(&list), Err(FibrError::InvalidConfig(_))));
    }

    #[test]
    fn test_flatten_preserves_order() {
        let list = languages();
        let flat = flatten(&list);
        let labels: Vec<&str> = flat.iter().map(|(label, _)| *label).collect();
        assert_eq!(labels, vec!["Node JS", "Python 3.10", "Python 3.9"]);
    }

    #[test]
    fn test_contains_value() {
        let list = languages();
        assert!(contains_value(&list, &Value::Int(12)));
        assert!(!contains_value(&list, &Value::Int(29229)));
        assert!(contains_value(&list, &Value::List(vec![Value::Int(1), Value::Int(20)])));
        assert!(!contains_value(&list, &Value::List(vec![Value::Int(1), Value::Int(2)])));
    }

    #[test]
    fn test_option_entry_deserialize() {
        let json = r#"[
            {"label": "Node JS", "value": 1},
            {"label": "Python", "value": [{"label": "Python 3.10", "value": 12}]}
        ]"#;
        let list: Vec<OptionEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(list.len(), 2);
        assert!(!list[0].is_group());
        assert!(list[1].is_group());
    }
}
