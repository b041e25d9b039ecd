//! Error types with fix suggestions
//!
//! Two families:
//! - `ProcessorError`: internal failure of a processor step. Never reaches
//!   callers of `Replacer::replace`; the fail-soft wrapper turns it into
//!   "keep the original value".
//! - `ReplacerError`: config and replacement-map loading, CLI input.

use std::path::PathBuf;

use thiserror::Error;

/// Trait for errors that provide fix suggestions
pub trait FixSuggestion {
    fn fix_suggestion(&self) -> Option<&str>;
}

/// Failure inside a processor. Swallowed by the fail-soft wrapper.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorError {
    #[error("'{value}' is not a recognised date/time")]
    InvalidDate { value: String },

    #[error("invalid date pattern '{pattern}'")]
    InvalidDatePattern { pattern: String },

    #[error("'{value}' is not a number")]
    InvalidNumber { value: String },

    #[error("invalid argument '{arg}' for {param}")]
    InvalidArgument { param: &'static str, arg: String },

    #[error("unknown locale '{locale}'")]
    UnknownLocale { locale: String },

    #[error("malformed currency code '{code}'")]
    InvalidCurrencyCode { code: String },

    #[error("formatting failed: {0}")]
    Format(String),
}

#[derive(Error, Debug)]
pub enum ReplacerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Cannot read '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid config: {field}: {details}")]
    InvalidConfig { field: &'static str, details: String },

    #[error("Replacement map must be an object of name/value pairs, got {found}")]
    InvalidReplacementMap { found: String },

    #[error("Invalid assignment '{0}' (expected NAME=VALUE)")]
    InvalidAssignment(String),
}

impl FixSuggestion for ReplacerError {
    fn fix_suggestion(&self) -> Option<&str> {
        match self {
            ReplacerError::Io(_) => Some("Check file path and permissions"),
            ReplacerError::YamlParse(_) => Some("Check YAML syntax: indentation and quoting"),
            ReplacerError::JsonParse(_) => Some("Check JSON syntax (try parsing with jq)"),
            ReplacerError::ReadFile { .. } => Some("Check file path and permissions"),
            ReplacerError::InvalidConfig { .. } => {
                Some("Fix the config value or remove it to use the default")
            }
            ReplacerError::InvalidReplacementMap { .. } => {
                Some("Use a top-level object, e.g. {\"name\": \"value\"}")
            }
            ReplacerError::InvalidAssignment(_) => Some("Use --set name=value"),
        }
    }
}
