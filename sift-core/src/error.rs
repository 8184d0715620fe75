//! Structured errors
//!
//! `PluginError` is what a predicate can fail with while evaluating a file.
//! `DescriptorError` is what a plugin descriptor can fail validation with.

use thiserror::Error;

/// Result type for predicate evaluation
pub type Result<T> = std::result::Result<T, PluginError>;

/// Failure while evaluating a single file against a selected option
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PluginError {
    #[error("option --{option} requires a value")]
    MissingValue { option: String },

    #[error("invalid value '{value}' for --{option}: {reason}")]
    InvalidValue {
        option: String,
        value: String,
        reason: String,
    },

    #[error("plugin '{plugin}' does not handle option --{option}")]
    UnknownOption { plugin: String, option: String },

    #[error("plugin '{plugin}' failed on --{option}")]
    Failed { plugin: String, option: String },

    #[error("plugin '{plugin}' returned non-boolean verdict {value} for --{option}")]
    NonBoolean {
        plugin: String,
        option: String,
        value: i32,
    },

    #[error("{0}")]
    Other(String),
}

impl PluginError {
    pub fn missing_value(option: &str) -> Self {
        Self::MissingValue { option: option.to_string() }
    }

    pub fn invalid_value(option: &str, value: &str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            option: option.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unknown_option(plugin: &str, option: &str) -> Self {
        Self::UnknownOption {
            plugin: plugin.to_string(),
            option: option.to_string(),
        }
    }
}

/// Descriptor validation errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    #[error("plugin info pointer is null")]
    NullInfo,

    #[error("missing required field: {0}")]
    MissingField(String),

    #[error("invalid UTF-8 in field '{0}'")]
    InvalidUtf8(String),

    #[error("invalid option count: {0}")]
    InvalidOptionCount(i64),

    #[error("invalid option name '{0}'")]
    InvalidOptionName(String),

    #[error("duplicate option --{0}")]
    DuplicateOption(String),
}
