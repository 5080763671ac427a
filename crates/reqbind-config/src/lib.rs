//! Typed configuration for reqbind.
//!
//! [`BindConfig`] gathers the tunables of the binder and its logging:
//!
//! - `error_response_level`: how much an error response reveals
//! - `empty_path_param`: whether a missing path parameter is coerced or skipped
//! - `max_body_bytes`: largest JSON body that will be parsed
//! - `logging`: subscriber settings handed to `reqbind-telemetry`
//!
//! Strict validation applies: unknown fields are rejected.
//!
//! # Example
//!
//! ```no_run
//! use reqbind_config::ConfigLoader;
//!
//! # fn main() -> Result<(), reqbind_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_dotenv()?
//!     .with_optional_file("reqbind.toml")?
//!     .with_env_prefix("REQBIND")
//!     .load()?;
//!
//! let options = config.decode_options();
//! let responder = config.responder();
//! # let _ = (options, responder);
//! # Ok(())
//! # }
//! ```
//!
//! # Environment Variable Overrides
//!
//! - `REQBIND__ERROR_RESPONSE_LEVEL=detailed`
//! - `REQBIND__EMPTY_PATH_PARAM=skip`
//! - `REQBIND__MAX_BODY_BYTES=65536`
//! - `REQBIND__LOGGING__LEVEL=reqbind_core=debug`
//! - `REQBIND__LOGGING__FORMAT=pretty`
//! - `REQBIND__LOGGING__ENABLED=false`

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;

pub use config::{BindConfig, LogFormat, LoggingConfig};
pub use error::ConfigError;
pub use loader::ConfigLoader;
