//! Culture context configuration.
//!
//! # Environment Variables
//!
//! | Variable | Field | Format |
//! |----------|-------|--------|
//! | `RELOCALE_CULTURE` | `culture` | culture code |
//! | `RELOCALE_FALLBACK` | `fallback` | culture code |
//! | `RELOCALE_ALLOWED` | `allowed` | comma-separated codes; empty = unrestricted |
//! | `RELOCALE_MATCHING` | `matching` | `root` or `exact` |

use std::collections::BTreeMap;
use std::env;
use std::fmt;

use thiserror::Error;

use crate::culture::CultureMatching;

pub const ENV_CULTURE: &str = "RELOCALE_CULTURE";
pub const ENV_FALLBACK: &str = "RELOCALE_FALLBACK";
pub const ENV_ALLOWED: &str = "RELOCALE_ALLOWED";
pub const ENV_MATCHING: &str = "RELOCALE_MATCHING";

/// Default fallback culture.
pub const DEFAULT_FALLBACK: &str = "en";

/// Settings for a [`CultureContext`](crate::CultureContext).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureConfig {
    /// Initial culture. `None` starts on the fallback.
    pub culture: Option<String>,
    /// Culture used when an entry lacks the current one.
    pub fallback: String,
    /// Cultures `set_culture` accepts. Empty means unrestricted.
    pub allowed: Vec<String>,
    pub matching: CultureMatching,
    /// Native display names by culture code, for language pickers.
    pub display_names: BTreeMap<String, String>,
}

impl Default for CultureConfig {
    fn default() -> Self {
        Self {
            culture: None,
            fallback: DEFAULT_FALLBACK.to_string(),
            allowed: Vec::new(),
            matching: CultureMatching::default(),
            display_names: BTreeMap::new(),
        }
    }
}

/// Configuration parse diagnostics (env + validation).
#[derive(Debug, Clone)]
pub struct CultureConfigParse {
    pub config: CultureConfig,
    pub errors: Vec<ConfigError>,
}

/// Configuration error with field context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}={value} ({message})")]
pub struct ConfigError {
    pub field: &'static str,
    pub value: String,
    pub message: String,
}

impl ConfigError {
    fn new(field: &'static str, value: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            message: message.into(),
        }
    }
}

impl CultureConfig {
    #[must_use]
    pub fn new(fallback: impl Into<String>) -> Self {
        Self {
            fallback: fallback.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_culture(mut self, culture: impl Into<String>) -> Self {
        self.culture = Some(culture.into());
        self
    }

    #[must_use]
    pub fn with_allowed<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed = allowed.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_matching(mut self, matching: CultureMatching) -> Self {
        self.matching = matching;
        self
    }

    #[must_use]
    pub fn with_display_name(mut self, culture: impl Into<String>, name: impl Into<String>) -> Self {
        self.display_names.insert(culture.into(), name.into());
        self
    }

    /// Parse config from environment variables.
    #[must_use]
    pub fn from_env() -> CultureConfig {
        Self::from_env_with_diagnostics().config
    }

    /// Parse config from environment variables and return diagnostics.
    #[must_use]
    pub fn from_env_with_diagnostics() -> CultureConfigParse {
        Self::from_env_with(|key| env::var(key).ok())
    }

    /// Parse config through a custom variable lookup.
    ///
    /// Invalid values are reported and leave the field at its default.
    pub fn from_env_with<F>(mut get: F) -> CultureConfigParse
    where
        F: FnMut(&str) -> Option<String>,
    {
        let mut config = CultureConfig::default();
        let mut errors = Vec::new();

        if let Some(value) = get(ENV_CULTURE) {
            if value.trim().is_empty() {
                errors.push(ConfigError::new("culture", value, "expected culture code"));
            } else {
                config.culture = Some(value.trim().to_string());
            }
        }

        if let Some(value) = get(ENV_FALLBACK) {
            if value.trim().is_empty() {
                errors.push(ConfigError::new("fallback", value, "expected culture code"));
            } else {
                config.fallback = value.trim().to_string();
            }
        }

        if let Some(value) = get(ENV_ALLOWED) {
            config.allowed = value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect();
        }

        if let Some(value) = get(ENV_MATCHING) {
            match value.parse::<CultureMatching>() {
                Ok(parsed) => config.matching = parsed,
                Err(_) => errors.push(ConfigError::new("matching", value, "expected root|exact")),
            }
        }

        if let Err(mut invalid) = config.validate() {
            errors.append(&mut invalid);
        }

        CultureConfigParse { config, errors }
    }

    /// Validate config constraints and return all violations.
    pub fn validate(&self) -> Result<(), Vec<ConfigError>> {
        let mut errors = Vec::new();
        if self.matching.normalize(&self.fallback).is_none() {
            errors.push(ConfigError::new(
                "fallback",
                self.fallback.clone(),
                "must be a non-empty culture code",
            ));
        }
        if let Some(culture) = &self.culture
            && self.matching.normalize(culture).is_none()
        {
            errors.push(ConfigError::new(
                "culture",
                culture.clone(),
                "must be a non-empty culture code",
            ));
        }
        for allowed in &self.allowed {
            if self.matching.normalize(allowed).is_none() {
                errors.push(ConfigError::new(
                    "allowed",
                    allowed.clone(),
                    "entries must be non-empty culture codes",
                ));
            }
        }
        for (culture, name) in &self.display_names {
            if self.matching.normalize(culture).is_none() || name.trim().is_empty() {
                errors.push(ConfigError::new(
                    "display_names",
                    format!("{culture}={name}"),
                    "entries need a culture code and a non-empty name",
                ));
            }
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl fmt::Display for CultureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let allowed = if self.allowed.is_empty() {
            "*".to_string()
        } else {
            self.allowed.join(",")
        };
        write!(
            f,
            "culture={} fallback={} allowed={allowed} matching={}",
            self.culture.as_deref().unwrap_or(&self.fallback),
            self.fallback,
            self.matching
        )
    }
}
