use serde::{Deserialize, Serialize};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Promotion, stabilization and decay thresholds
    #[serde(default)]
    pub lifecycle: LifecycleConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Thresholds driving the pattern lifecycle.
///
/// Read once at startup and handed to the reducer; tune per deployment
/// without code changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LifecycleConfig {
    /// Confirmed pairs required before validation
    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    /// Minimum mean pairwise diff similarity (0.0-1.0)
    #[serde(default = "default_transform_similarity_threshold")]
    pub transform_similarity_threshold: f64,

    /// Reintroduced/confirmed ratio must stay strictly below this (0.0-1.0)
    #[serde(default = "default_max_reintroduction_rate")]
    pub max_reintroduction_rate: f64,

    /// Minimum majority share of tool versions (0.0-1.0)
    #[serde(default = "default_tool_version_stability")]
    pub tool_version_stability: f64,

    /// Days a promoted pattern must hold before it is stable
    #[serde(default = "default_stable_window_days")]
    pub stable_window_days: i64,

    /// Multiplier applied per decay step (0.0-1.0 exclusive)
    #[serde(default = "default_decay_factor")]
    pub decay_factor: f64,

    /// Score below which a decaying pattern is deprecated
    #[serde(default = "default_min_score_threshold")]
    pub min_score_threshold: f64,

    /// Reintroductions that force deprecation
    #[serde(default = "default_max_oscillations")]
    pub max_oscillations: u32,
}

const fn default_min_occurrences() -> usize {
    3
}

const fn default_transform_similarity_threshold() -> f64 {
    0.85
}

const fn default_max_reintroduction_rate() -> f64 {
    0.20
}

const fn default_tool_version_stability() -> f64 {
    0.80
}

const fn default_stable_window_days() -> i64 {
    30
}

const fn default_decay_factor() -> f64 {
    0.90
}

const fn default_min_score_threshold() -> f64 {
    0.10
}

const fn default_max_oscillations() -> u32 {
    3
}

impl Default for LifecycleConfig {
    fn default() -> Self {
        Self {
            min_occurrences: default_min_occurrences(),
            transform_similarity_threshold: default_transform_similarity_threshold(),
            max_reintroduction_rate: default_max_reintroduction_rate(),
            tool_version_stability: default_tool_version_stability(),
            stable_window_days: default_stable_window_days(),
            decay_factor: default_decay_factor(),
            min_score_threshold: default_min_score_threshold(),
            max_oscillations: default_max_oscillations(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated JSON log files; stderr only when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
