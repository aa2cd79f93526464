//! # fibr-core
//!
//! Core types, settings, and error types for the fibr form-blueprint library.
//! This crate has no fibr dependencies and provides the foundation for all other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - Library settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML/JSON files and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{FibrError, FibrResult};
pub use settings::{Settings, SETTINGS};
