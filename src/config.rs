// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
use serde::Deserialize;

/// Prefix for environment variables read by [`Config::from_env`]
pub const ENV_PREFIX: &str = "IAC_POLICY_";

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Log level (default: warn)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Log format: "json" or "pretty" (default: pretty)
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Variables are uppercase with the `IAC_POLICY_` prefix, e.g.
    /// `IAC_POLICY_LOG_LEVEL=debug`.
    pub fn from_env() -> Result<Self, envy::Error> {
        envy::prefixed(ENV_PREFIX).from_env()
    }

    pub fn json_logs(&self) -> bool {
        self.log_format == "json"
    }
}
