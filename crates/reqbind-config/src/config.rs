//! Configuration schema.

use reqbind_core::{
    DecodeOptions, EmptyPathParam, ErrorResponder, ErrorResponseLevel, DEFAULT_MAX_BODY_BYTES,
};
use reqbind_telemetry::LogConfig;
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Log format.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON formatted logs (production).
    #[default]
    Json,
    /// Human-readable pretty format (development).
    Pretty,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log filter directive (trace, debug, info, warn, error or per target).
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include ANSI color codes in output.
    #[serde(default)]
    pub ansi_enabled: bool,

    /// Include source file and line in logs.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            ansi_enabled: false,
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts to the settings consumed by `reqbind_telemetry::init_logging`.
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            json_format: self.format == LogFormat::Json,
            span_events: false,
            file_line_info: self.include_location,
            include_target: true,
            ansi: self.ansi_enabled,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_body_bytes() -> usize {
    DEFAULT_MAX_BODY_BYTES
}

/// Binder configuration.
///
/// ```toml
/// error_response_level = "info"     # quiet | info | detailed
/// empty_path_param = "coerce"       # coerce | skip
/// max_body_bytes = 1048576
///
/// [logging]
/// level = "info"
/// format = "json"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BindConfig {
    /// Verbosity of error response bodies.
    #[serde(default)]
    pub error_response_level: ErrorResponseLevel,

    /// Treatment of missing or empty path parameters.
    #[serde(default)]
    pub empty_path_param: EmptyPathParam,

    /// Largest JSON body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for BindConfig {
    fn default() -> Self {
        Self {
            error_response_level: ErrorResponseLevel::default(),
            empty_path_param: EmptyPathParam::default(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            logging: LoggingConfig::default(),
        }
    }
}

impl BindConfig {
    /// Preset for local development: detailed errors, pretty debug logs.
    #[must_use]
    pub fn development() -> Self {
        Self {
            error_response_level: ErrorResponseLevel::Detailed,
            logging: LoggingConfig {
                level: "debug".to_string(),
                format: LogFormat::Pretty,
                ansi_enabled: true,
                include_location: true,
                ..LoggingConfig::default()
            },
            ..Self::default()
        }
    }

    /// Preset for production: client-facing messages only, JSON logs.
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Checks the configuration for invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "max_body_bytes",
                "must be greater than zero",
            ));
        }

        if self.logging.enabled {
            reqbind_telemetry::create_env_filter(&self.logging.level)
                .map_err(|e| ConfigError::invalid_value("logging.level", e.to_string()))?;
        }

        Ok(())
    }

    /// Options for the decode entry points.
    #[must_use]
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            empty_path_param: self.empty_path_param,
            max_body_bytes: self.max_body_bytes,
        }
    }

    /// Error responder at the configured level.
    #[must_use]
    pub fn responder(&self) -> ErrorResponder {
        ErrorResponder::new(self.error_response_level)
    }
}
