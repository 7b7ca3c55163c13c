use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Prefix for environment overrides, e.g. `PATTERNS_LIFECYCLE__DECAY_FACTOR`.
pub const ENV_PREFIX: &str = "PATTERNS_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid min_occurrences: {0}. Must be at least 1")]
    InvalidMinOccurrences(usize),

    #[error("Invalid {name}: {value}. Must be between 0.0 and 1.0")]
    InvalidFraction { name: &'static str, value: f64 },

    #[error("Invalid {name}: {value}. Must be strictly between 0.0 and 1.0")]
    InvalidOpenFraction { name: &'static str, value: f64 },

    #[error("Invalid stable_window_days: {0}. Must be a non-negative, representable number of days")]
    InvalidStableWindow(i64),

    #[error("Invalid max_oscillations: {0}. Must be at least 1")]
    InvalidMaxOscillations(u32),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .patterns/config.yaml (project config)
    /// 3. .patterns/local.yaml (project local overrides, optional)
    /// 4. Environment variables (PATTERNS_* prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(".patterns/config.yaml"))
            .merge(Yaml::file(".patterns/local.yaml"))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let lifecycle = &config.lifecycle;

        if lifecycle.min_occurrences == 0 {
            return Err(ConfigError::InvalidMinOccurrences(lifecycle.min_occurrences));
        }

        for (name, value) in [
            (
                "transform_similarity_threshold",
                lifecycle.transform_similarity_threshold,
            ),
            ("max_reintroduction_rate", lifecycle.max_reintroduction_rate),
            ("tool_version_stability", lifecycle.tool_version_stability),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidFraction { name, value });
            }
        }

        // Decay must shrink the score and the floor must be reachable.
        for (name, value) in [
            ("decay_factor", lifecycle.decay_factor),
            ("min_score_threshold", lifecycle.min_score_threshold),
        ] {
            if value <= 0.0 || value >= 1.0 || value.is_nan() {
                return Err(ConfigError::InvalidOpenFraction { name, value });
            }
        }

        if lifecycle.stable_window_days < 0
            || chrono::Duration::try_days(lifecycle.stable_window_days).is_none()
        {
            return Err(ConfigError::InvalidStableWindow(lifecycle.stable_window_days));
        }

        if lifecycle.max_oscillations == 0 {
            return Err(ConfigError::InvalidMaxOscillations(lifecycle.max_oscillations));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }
}
