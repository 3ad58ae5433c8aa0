//! Core error types for rotaboard-core.
//!
//! This module defines the error hierarchy using thiserror. Coverage
//! warnings are report values, not errors.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for rotaboard-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Template store or staff directory errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors.
///
/// Raised at the boundary, before layout or coverage analysis runs.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Business or template window where the close time is not after the open time
    #[error("Invalid time window: close ({close}) must be after open ({open})")]
    InvalidWindow { open: f64, close: f64 },

    /// An enabled weekday points at a template that does not exist
    #[error("Weekday {weekday} is assigned to unknown template '{template}'")]
    UnknownTemplate { weekday: String, template: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Errors from the template store and staff directory.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read/write store file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse store TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize store TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No data stored for team '{team}'")]
    NotFound { team: String },

    /// The payload failed boundary validation and was not written
    #[error("Refusing to save invalid data: {0}")]
    Invalid(#[from] ConfigError),

    #[error("Failed to access data directory: {0}")]
    DataDir(String),
}

/// Validation errors for template-set edits.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A template with this name already exists
    #[error("Template '{0}' already exists")]
    DuplicateTemplate(String),

    /// Template name not present in the set
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),

    /// The only remaining template cannot be deleted
    #[error("Cannot delete '{0}': it is the last day template")]
    LastTemplate(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
