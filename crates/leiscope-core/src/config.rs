//! Environment-driven configuration.
//!
//! | Variable | Default | Purpose |
//! |----------|---------|---------|
//! | `GEMINI_API_KEY` | none | Credential for the verifier, required for verification |
//! | `LEISCOPE_GEMINI_MODEL` | `gemini-2.5-flash` | Model used for verification |
//! | `LEISCOPE_GEMINI_BASE_URL` | `https://generativelanguage.googleapis.com/v1beta` | Verifier endpoint |
//! | `LEISCOPE_GEMINI_TIMEOUT_MS` | `60000` | Per-attempt verifier timeout |
//! | `LEISCOPE_GLEIF_BASE_URL` | `https://api.gleif.org/api/v1` | Registry endpoint |
//! | `LEISCOPE_GLEIF_TIMEOUT_MS` | `15000` | Registry request timeout |
//! | `LEISCOPE_PAGE_SIZE` | `10` | Candidates requested per search |

use std::fmt::{Debug, Formatter};

use thiserror::Error;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
pub const GEMINI_MODEL_VAR: &str = "LEISCOPE_GEMINI_MODEL";
pub const GEMINI_BASE_URL_VAR: &str = "LEISCOPE_GEMINI_BASE_URL";
pub const GEMINI_TIMEOUT_VAR: &str = "LEISCOPE_GEMINI_TIMEOUT_MS";
pub const GLEIF_BASE_URL_VAR: &str = "LEISCOPE_GLEIF_BASE_URL";
pub const GLEIF_TIMEOUT_VAR: &str = "LEISCOPE_GLEIF_TIMEOUT_MS";
pub const PAGE_SIZE_VAR: &str = "LEISCOPE_PAGE_SIZE";

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_GEMINI_TIMEOUT_MS: u64 = 60_000;
pub const DEFAULT_GLEIF_BASE_URL: &str = "https://api.gleif.org/api/v1";
pub const DEFAULT_GLEIF_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Configuration errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var} environment variable not set")]
    MissingApiKey { var: &'static str },

    #[error("{var} must be a positive integer, got '{value}'")]
    InvalidNumber { var: &'static str, value: String },
}

/// Runtime settings for the registry and verifier adapters.
#[derive(Clone, PartialEq, Eq)]
pub struct LeiscopeConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_ms: u64,
    pub gleif_base_url: String,
    pub gleif_timeout_ms: u64,
    pub page_size: usize,
}

impl Default for LeiscopeConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: String::from(DEFAULT_GEMINI_MODEL),
            gemini_base_url: String::from(DEFAULT_GEMINI_BASE_URL),
            gemini_timeout_ms: DEFAULT_GEMINI_TIMEOUT_MS,
            gleif_base_url: String::from(DEFAULT_GLEIF_BASE_URL),
            gleif_timeout_ms: DEFAULT_GLEIF_TIMEOUT_MS,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl LeiscopeConfig {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for unset
    /// or blank values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();

        Ok(Self {
            gemini_api_key: read(API_KEY_VAR),
            gemini_model: read(GEMINI_MODEL_VAR).unwrap_or(defaults.gemini_model),
            gemini_base_url: read(GEMINI_BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.gemini_base_url),
            gemini_timeout_ms: parse_positive(GEMINI_TIMEOUT_VAR, read(GEMINI_TIMEOUT_VAR))?
                .unwrap_or(defaults.gemini_timeout_ms),
            gleif_base_url: read(GLEIF_BASE_URL_VAR)
                .map(|url| url.trim_end_matches('/').to_owned())
                .unwrap_or(defaults.gleif_base_url),
            gleif_timeout_ms: parse_positive(GLEIF_TIMEOUT_VAR, read(GLEIF_TIMEOUT_VAR))?
                .unwrap_or(defaults.gleif_timeout_ms),
            page_size: parse_positive(PAGE_SIZE_VAR, read(PAGE_SIZE_VAR))?
                .map(|size| size as usize)
                .unwrap_or(defaults.page_size),
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.gemini_api_key = Some(api_key.into());
        self
    }

    /// The verifier credential, or an error naming the variable to set.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.gemini_api_key
            .as_deref()
            .ok_or(ConfigError::MissingApiKey { var: API_KEY_VAR })
    }
}

impl Debug for LeiscopeConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LeiscopeConfig")
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "***"),
            )
            .field("gemini_model", &self.gemini_model)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_timeout_ms", &self.gemini_timeout_ms)
            .field("gleif_base_url", &self.gleif_base_url)
            .field("gleif_timeout_ms", &self.gleif_timeout_ms)
            .field("page_size", &self.page_size)
            .finish()
    }
}

fn parse_positive(var: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(raw) => match raw.parse::<u64>() {
            Ok(parsed) if parsed > 0 => Ok(Some(parsed)),
            _ => Err(ConfigError::InvalidNumber { var, value: raw }),
        },
    }
}
