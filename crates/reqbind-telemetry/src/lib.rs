//! Logging setup for reqbind.
//!
//! The binder itself only emits `tracing` events. This crate installs a
//! subscriber for them: JSON lines in production, pretty output during
//! development, filtered through an [`EnvFilter`](tracing_subscriber::EnvFilter).
//!
//! # Events
//!
//! | Level | Target | When |
//! |-------|--------|------|
//! | `trace` | `reqbind_core::schema` | a destination schema was analyzed |
//! | `debug` | `reqbind_core::decode` | decode started or finished |
//! | `debug` | `reqbind_core::fill` | a field was skipped |
//! | `warn` | `reqbind_core::decode` | decode failed |
//! | `error` | `reqbind_core::decode` | a fault was caught during fill |
//!
//! # Example
//!
//! ```rust,no_run
//! use reqbind_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!("logging ready");
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
