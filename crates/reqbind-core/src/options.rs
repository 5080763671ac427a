//! Tunables for decoding and error responses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maximum body size accepted for JSON binding (1 MB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// How a missing or empty path parameter is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyPathParam {
    /// Coerce the empty string: `String` fields become `""`, other kinds fail.
    #[default]
    Coerce,
    /// Leave the field untouched.
    Skip,
}

impl FromStr for EmptyPathParam {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coerce" => Ok(Self::Coerce),
            "skip" => Ok(Self::Skip),
            other => Err(format!("expected 'coerce' or 'skip', got '{other}'")),
        }
    }
}

/// Options for a decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Treatment of missing or empty path parameters.
    pub empty_path_param: EmptyPathParam,
    /// Largest body, in bytes, that will be parsed as JSON.
    pub max_body_bytes: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            empty_path_param: EmptyPathParam::Coerce,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// How much detail error responses expose.
///
/// The numeric levels follow the usual logging convention where a lower
/// number means more output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorResponseLevel {
    /// Every error is reported as `Bad request`.
    Quiet,
    /// Request errors show their message; internal errors are masked.
    #[default]
    Info,
    /// The message and its full cause chain are shown.
    Detailed,
}

impl ErrorResponseLevel {
    /// Returns the numeric level (4, 0 or -4).
    #[must_use]
    pub const fn as_i8(self) -> i8 {
        match self {
            Self::Quiet => 4,
            Self::Info => 0,
            Self::Detailed => -4,
        }
    }
}

impl fmt::Display for ErrorResponseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Quiet => write!(f, "quiet"),
            Self::Info => write!(f, "info"),
            Self::Detailed => write!(f, "detailed"),
        }
    }
}

impl FromStr for ErrorResponseLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quiet" => Ok(Self::Quiet),
            "info" => Ok(Self::Info),
            "detailed" => Ok(Self::Detailed),
            other => Err(format!(
                "expected 'quiet', 'info' or 'detailed', got '{other}'"
            )),
        }
    }
}
