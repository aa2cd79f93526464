//! Core error types for fibr.
//!
//! [`FibrError`] covers blueprint construction errors, extension registry
//! resolution errors, form-state errors, and the configuration, serialization
//! and IO errors raised while loading settings or blueprint documents.
//!
//! Construction and resolution errors are detected eagerly, before anything is
//! rendered, and are terminal for the call that raised them.

use thiserror::Error;

/// The primary error type for fibr.
///
/// Each variant has a stable machine-readable code, see [`FibrError::code`].
#[derive(Error, Debug)]
pub enum FibrError {
    // ── Blueprint construction ───────────────────────────────────────

    /// A field or form configuration is malformed (missing option list,
    /// duplicate option values, layout not applicable to the kind, ...).
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// `default_values` (or an edit) references a key that is not a field.
    #[error("Unknown field key: {0}")]
    UnknownFieldKey(String),

    /// A custom field has no type tag, or a built-in kind carries one.
    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    // ── Extension registry ───────────────────────────────────────────

    /// No renderer is registered for the requested field type tag.
    #[error("Unregistered field type: {0}")]
    UnregisteredFieldType(String),

    // ── Form state ───────────────────────────────────────────────────

    /// A user edit targeted a hidden or read-only field.
    #[error("Field is not editable: {0}")]
    FieldNotEditable(String),

    /// A user edit supplied a value of the wrong type for its field.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    // ── Configuration ────────────────────────────────────────────────

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    // ── Serialization ────────────────────────────────────────────────

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl FibrError {
    /// Returns a short, stable code identifying the error category.
    ///
    /// - `InvalidConfig` -> `"invalid_config"`
    /// - `UnknownFieldKey` -> `"unknown_field_key"`
    /// - `InvalidKind` -> `"invalid_kind"`
    /// - `UnregisteredFieldType` -> `"unregistered_field_type"`
    /// - `FieldNotEditable` -> `"field_not_editable"`
    /// - `InvalidValue` -> `"invalid_value"`
    /// - `ConfigurationError` -> `"configuration"`
    /// - `SerializationError` -> `"serialization"`
    /// - `IoError` -> `"io"`
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "invalid_config",
            Self::UnknownFieldKey(_) => "unknown_field_key",
            Self::InvalidKind(_) => "invalid_kind",
            Self::UnregisteredFieldType(_) => "unregistered_field_type",
            Self::FieldNotEditable(_) => "field_not_editable",
            Self::InvalidValue(_) => "invalid_value",
            Self::ConfigurationError(_) => "configuration",
            Self::SerializationError(_) => "serialization",
            Self::IoError(_) => "io",
        }
    }

    /// Returns `true` for errors raised while building a blueprint.
    pub const fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig(_) | Self::UnknownFieldKey(_) | Self::InvalidKind(_)
        )
    }
}

/// A convenience type alias for `Result<T, FibrError>`.
pub type FibrResult<T> = Result<T, FibrError>;
