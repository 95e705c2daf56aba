//! # Configuration
//!
//! Layered configuration for embedding governance tasks in a host engine:
//!
//! 1. Built-in defaults (environment-aware log level)
//! 2. `governance.toml` in the working directory, or an explicit file
//! 3. Environment variables prefixed `GOVERNANCE__`, with `__` between
//!    nesting levels, e.g. `GOVERNANCE__LOGGING__LEVEL=warn`
//!
//! The deployment environment itself comes from `GOVERNANCE_ENV` (falling back
//! to `APP_ENV`) unless a file or `GOVERNANCE__ENVIRONMENT` sets it.

use crate::workflow::AttributionPolicy;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_FILE: &str = "governance.toml";
const ENV_PREFIX: &str = "GOVERNANCE";
const ENV_SEPARATOR: &str = "__";

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigurationError>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, e.g. `info` or `governance_core=debug,warn`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    pub with_target: bool,
}

impl LoggingConfig {
    pub fn for_environment(environment: &str) -> Self {
        Self {
            level: default_log_level(environment).to_string(),
            json: false,
            with_target: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::for_environment(&detect_environment())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GovernanceConfig {
    pub environment: String,
    pub attribution_policy: AttributionPolicy,
    pub logging: LoggingConfig,
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        let environment = detect_environment();
        Self {
            logging: LoggingConfig::for_environment(&environment),
            environment,
            attribution_policy: AttributionPolicy::default(),
        }
    }
}

impl GovernanceConfig {
    /// Defaults, then `governance.toml` if present, then `GOVERNANCE__*` variables
    pub fn load() -> ConfigResult<Self> {
        let file = Path::new(DEFAULT_CONFIG_FILE)
            .exists()
            .then(|| File::with_name(DEFAULT_CONFIG_FILE).required(false));
        Self::load_with(file, Self::environment_source())
    }

    /// Defaults, then the given file (which must exist), then `GOVERNANCE__*` variables
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        Self::load_with(
            Some(File::from(path.as_ref()).required(true)),
            Self::environment_source(),
        )
    }

    pub(crate) fn environment_source() -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
    }

    pub(crate) fn load_with(
        file: Option<File<config::FileSourceFile, config::FileFormat>>,
        environment: Environment,
    ) -> ConfigResult<Self> {
        let mut builder = Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        let merged = builder.add_source(environment).build()?;

        // Log level defaults depend on the environment the layers settled on
        let environment = merged
            .get_string("environment")
            .unwrap_or_else(|_| detect_environment());
        let defaults = LoggingConfig::for_environment(&environment);

        let config: Self = Config::builder()
            .set_default("environment", environment.clone())?
            .set_default(
                "attribution_policy",
                AttributionPolicy::default().to_string(),
            )?
            .set_default("logging.level", defaults.level)?
            .set_default("logging.json", defaults.json)?
            .set_default("logging.with_target", defaults.with_target)?
            .add_source(merged)
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Environment-only configuration without file or layering support
    pub fn from_env() -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("GOVERNANCE_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(json) = std::env::var("GOVERNANCE_LOG_JSON") {
            config.logging.json = json.parse().map_err(|e| ConfigurationError::Invalid {
                field: "logging.json".to_string(),
                reason: format!("{e}"),
            })?;
        }

        if let Ok(policy) = std::env::var("GOVERNANCE_ATTRIBUTION_POLICY") {
            config.attribution_policy = serde_json::from_value(serde_json::Value::String(
                policy.clone(),
            ))
            .map_err(|_| ConfigurationError::Invalid {
                field: "attribution_policy".to_string(),
                reason: format!("unknown policy {policy:?}"),
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.environment.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                field: "environment".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.logging.level.trim().is_empty() {
            return Err(ConfigurationError::Invalid {
                field: "logging.level".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        EnvFilter::try_new(&self.logging.level).map_err(|e| ConfigurationError::Invalid {
            field: "logging.level".to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Get current environment from environment variables
fn detect_environment() -> String {
    std::env::var("GOVERNANCE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn default_log_level(environment: &str) -> &'static str {
    match environment {
        "production" => "info",
        _ => "debug",
    }
}
