//! Typed configuration
//!
//! Strongly-typed settings loaded once at startup from a JSON5 file and
//! immutable thereafter. Only unrecoverable misconfiguration (a zero
//! refresh interval) fails the load; anything suspicious but workable is
//! logged and resolved.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;
use crate::responder::{GroupPolicy, ResponderSettings};

/// Default refresh interval: one minute
pub const DEFAULT_REFRESH_INTERVAL_MS: u64 = 60_000;

/// Configuration errors. All fatal to initialization, none recoverable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("refreshIntervalMs must be greater than zero")]
    InvalidRefreshInterval,
}

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// First source row is a header and never data
    #[serde(default = "default_true")]
    pub has_header: bool,

    /// Match keywords without case folding
    #[serde(default)]
    pub case_sensitive: bool,

    /// Fallback reply when nothing matches
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_reply: Option<String>,

    /// Milliseconds between keyword table refreshes
    #[serde(default = "default_refresh_interval_ms")]
    pub refresh_interval_ms: u64,

    /// Group response policy
    #[serde(default)]
    pub group_policy: GroupPolicy,

    /// Initially allow-listed group IDs
    #[serde(default)]
    pub allowed_group_ids: Vec<String>,

    /// Published-CSV spreadsheet URL for the keyword source
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub sheet_csv_url: Option<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_true() -> bool {
    true
}

fn default_refresh_interval_ms() -> u64 {
    DEFAULT_REFRESH_INTERVAL_MS
}

impl Default for Config {
    fn default() -> Self {
        Self {
            has_header: true,
            case_sensitive: false,
            default_reply: None,
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL_MS,
            group_policy: GroupPolicy::default(),
            allowed_group_ids: Vec::new(),
            sheet_csv_url: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Config {
    /// Load and validate a JSON5 config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config: Config =
            json5::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration. Only hard errors fail the load;
    /// suspicious-but-workable settings surface via [`Config::warnings`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh_interval_ms == 0 {
            return Err(ConfigError::InvalidRefreshInterval);
        }
        Ok(())
    }

    /// Non-fatal findings worth surfacing to the operator. Kept separate
    /// from [`Config::validate`] so the caller can emit them once logging
    /// is actually installed; load happens before the subscriber exists.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.group_policy.active_toggles() > 1 {
            if let Some(mode) = self.group_policy.mode() {
                warnings.push(format!(
                    "{} group policy modes set; fixed precedence resolves to {:?}",
                    self.group_policy.active_toggles(),
                    mode
                ));
            }
        }

        warnings
    }

    /// Log every pending warning. Call after the tracing subscriber is up.
    pub fn log_warnings(&self) {
        for warning in self.warnings() {
            tracing::warn!("{}", warning);
        }
    }

    /// Settings slice consumed by the responder engine
    pub fn responder_settings(&self) -> ResponderSettings {
        ResponderSettings {
            has_header: self.has_header,
            case_sensitive: self.case_sensitive,
            default_reply: self.default_reply.clone(),
            policy: self.group_policy.clone(),
            allowed_group_ids: self.allowed_group_ids.clone(),
        }
    }
}
