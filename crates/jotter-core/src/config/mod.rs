//! Client configuration.
//!
//! Provides the `ClientConfig` struct shared by the auth client, the notes API
//! client and the autosave editor. The CLI persists one of these per profile.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::CategoryId;
use crate::util::{is_http_url, normalize_text_option};

pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000/api";
pub const DEFAULT_AUTOSAVE_DELAY_MS: u64 = 1000;
pub const DEFAULT_CATEGORY_ID: i64 = 1;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

const ENV_API_URL: &str = "JOTTER_API_URL";
const ENV_AUTOSAVE_DELAY_MS: &str = "JOTTER_AUTOSAVE_DELAY_MS";
const ENV_DEFAULT_CATEGORY_ID: &str = "JOTTER_DEFAULT_CATEGORY_ID";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the notes API, including the `/api` prefix
    pub api_base_url: String,
    /// Quiet period before an edit is saved
    pub autosave_delay_ms: u64,
    /// Category used when a note is saved without one
    pub default_category_id: i64,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            autosave_delay_ms: DEFAULT_AUTOSAVE_DELAY_MS,
            default_category_id: DEFAULT_CATEGORY_ID,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Defaults overlaid with `JOTTER_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::default().with_overrides(
            std::env::var(ENV_API_URL).ok(),
            std::env::var(ENV_AUTOSAVE_DELAY_MS).ok(),
            std::env::var(ENV_DEFAULT_CATEGORY_ID).ok(),
        )
    }

    /// Apply raw override values on top of this config, validating each.
    pub fn with_overrides(
        mut self,
        api_base_url: Option<String>,
        autosave_delay_ms: Option<String>,
        default_category_id: Option<String>,
    ) -> Result<Self> {
        if let Some(url) = normalize_text_option(api_base_url) {
            self.api_base_url = normalize_api_base_url(&url)?;
        }
        if let Some(raw) = normalize_text_option(autosave_delay_ms) {
            self.autosave_delay_ms = raw.parse().map_err(|_| {
                Error::Config(format!("autosave delay must be milliseconds, got '{raw}'"))
            })?;
        }
        if let Some(raw) = normalize_text_option(default_category_id) {
            let id: i64 = raw.parse().map_err(|_| {
                Error::Config(format!("default category must be an integer, got '{raw}'"))
            })?;
            if id <= 0 {
                return Err(Error::Config(
                    "default category must be a positive id".to_string(),
                ));
            }
            self.default_category_id = id;
        }
        Ok(self)
    }

    pub const fn autosave_delay(&self) -> Duration {
        Duration::from_millis(self.autosave_delay_ms)
    }

    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub const fn default_category(&self) -> CategoryId {
        CategoryId::new(self.default_category_id)
    }
}

/// Trim an API base URL, require an http(s) scheme and drop trailing slashes.
pub fn normalize_api_base_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(Error::Config("API base URL must not be empty".to_string()));
    }
    if !is_http_url(trimmed) {
        return Err(Error::Config(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}
