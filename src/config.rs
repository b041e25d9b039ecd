//! Engine configuration
//!
//! Every field has a default, so an empty YAML document is a valid config
//! and default config reproduces the documented processor defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ReplacerError;
use crate::processor::{builtin, locale};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReplacerConfig {
    pub date: DateDefaults,
    pub currency: CurrencyDefaults,
    pub number: NumberDefaults,
    pub cache: CacheConfig,
}

/// Defaults for the `date` processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DateDefaults {
    /// strftime pattern used when the tag gives none
    pub format: String,
}

impl Default for DateDefaults {
    fn default() -> Self {
        Self {
            format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

/// Defaults for the `currency` processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CurrencyDefaults {
    pub locale: String,
    pub code: String,
}

impl Default for CurrencyDefaults {
    fn default() -> Self {
        Self {
            locale: "en_US".to_string(),
            code: "USD".to_string(),
        }
    }
}

/// Defaults for the `number` processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NumberDefaults {
    pub decimals: usize,
    pub decimal_separator: String,
    pub thousands_separator: String,
}

impl Default for NumberDefaults {
    fn default() -> Self {
        Self {
            decimals: 0,
            decimal_separator: ",".to_string(),
            thousands_separator: " ".to_string(),
        }
    }
}

/// Parsed-template cache
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Cache is cleared once it holds this many templates
    pub capacity: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            capacity: 1024,
        }
    }
}

impl ReplacerConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ReplacerError> {
        // An empty document deserializes to unit, not to an empty mapping
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ReplacerError> {
        let path = path.as_ref();
        let yaml = fs::read_to_string(path).map_err(|source| ReplacerError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> Result<(), ReplacerError> {
        if self.date.format.is_empty() {
            return Err(ReplacerError::InvalidConfig {
                field: "date.format",
                details: "must not be empty".to_string(),
            });
        }
        if !builtin::is_valid_date_pattern(&self.date.format) {
            return Err(ReplacerError::InvalidConfig {
                field: "date.format",
                details: format!("'{}' is not a valid strftime pattern", self.date.format),
            });
        }
        if locale::lookup_locale(&self.currency.locale).is_none() {
            return Err(ReplacerError::InvalidConfig {
                field: "currency.locale",
                details: format!("unknown locale '{}'", self.currency.locale),
            });
        }
        if !locale::is_currency_code(&self.currency.code) {
            return Err(ReplacerError::InvalidConfig {
                field: "currency.code",
                details: format!("'{}' is not a 3-letter ISO 4217 code", self.currency.code),
            });
        }
        if self.number.decimals > builtin::MAX_DECIMALS {
            return Err(ReplacerError::InvalidConfig {
                field: "number.decimals",
                details: format!("must be at most {}", builtin::MAX_DECIMALS),
            });
        }
        if self.cache.enabled && self.cache.capacity == 0 {
            return Err(ReplacerError::InvalidConfig {
                field: "cache.capacity",
                details: "must be greater than 0 when the cache is enabled".to_string(),
            });
        }
        Ok(())
    }
}
