//! Binding error types.
//!
//! This module provides the [`BindError`] taxonomy used by every failure path
//! of the binder. Each error carries a human-readable message, an HTTP status
//! code and an optional wrapped cause.
//!
//! # Error Kinds
//!
//! | Kind | Status | Client-facing |
//! |------|--------|---------------|
//! | [`ErrorKind::NotARecord`] | 400 | no |
//! | [`ErrorKind::InvalidDestination`] | 400 | no |
//! | [`ErrorKind::BadRequest`] | 400 | yes |
//! | [`ErrorKind::TypeMismatch`] | 400 | yes |
//! | [`ErrorKind::MalformedBody`] | 400 | yes |
//! | [`ErrorKind::PayloadTooLarge`] | 413 | yes |
//! | [`ErrorKind::Fault`] | 400 | no |
//!
//! Client-facing kinds describe a problem with the incoming request. The
//! others describe a problem with the destination or the binder itself and
//! are masked by the responder unless detailed responses are enabled.

use crate::{Kind, Source};
use http::StatusCode;
use std::fmt;
use thiserror::Error;

/// Result type alias using [`BindError`].
pub type BindResult<T> = Result<T, BindError>;

/// Boxed lower-level cause carried by a [`BindError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Classification of a binding failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The destination is not a record type the binder knows how to fill.
    NotARecord,
    /// A field in the schema cannot be targeted (for example, bound twice).
    InvalidDestination,
    /// A raw path or query value could not be coerced to the field's kind.
    BadRequest,
    /// A JSON body value has a type that does not convert to the field's kind.
    TypeMismatch,
    /// The request body is not a well-formed JSON object.
    MalformedBody,
    /// The request body exceeds the configured size limit.
    PayloadTooLarge,
    /// An unexpected fault escaped field accessor code.
    Fault,
}

impl ErrorKind {
    /// Returns the default HTTP status code for this kind.
    #[must_use]
    pub const fn default_status_code(&self) -> StatusCode {
        match self {
            Self::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            Self::NotARecord
            | Self::InvalidDestination
            | Self::BadRequest
            | Self::TypeMismatch
            | Self::MalformedBody
            | Self::Fault => StatusCode::BAD_REQUEST,
        }
    }

    /// Returns `true` if the error was caused by the request content rather
    /// than by the destination or the binder.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::BadRequest | Self::TypeMismatch | Self::MalformedBody | Self::PayloadTooLarge
        )
    }

    /// Returns a machine-readable code for logs.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotARecord => "NOT_A_RECORD",
            Self::InvalidDestination => "INVALID_DESTINATION",
            Self::BadRequest => "BAD_REQUEST",
            Self::TypeMismatch => "TYPE_MISMATCH",
            Self::MalformedBody => "MALFORMED_BODY",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::Fault => "FAULT",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.error_code())
    }
}

/// Error returned by every binding operation.
///
/// Immutable once constructed: it is created at the failure site and
/// propagated unchanged up to the responder.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{BindError, ErrorKind, Kind};
/// use http::StatusCode;
///
/// let err = BindError::coercion_failed("NotInt", Kind::Int);
/// assert_eq!(err.kind(), ErrorKind::BadRequest);
/// assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
/// assert_eq!(err.to_string(), "failed to convert NotInt to int");
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct BindError {
    kind: ErrorKind,
    message: String,
    status: StatusCode,
    field: Option<String>,
    bind_source: Option<Source>,
    #[source]
    cause: Option<BoxError>,
}

impl BindError {
    fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: kind.default_status_code(),
            field: None,
            bind_source: None,
            cause: None,
        }
    }

    /// Creates an error for a destination that is not a known record type.
    #[must_use]
    pub fn not_a_record(type_name: &str) -> Self {
        Self::new(
            ErrorKind::NotARecord,
            format!("destination must be a record type, got {type_name}"),
        )
    }

    /// Creates an error for a schema field that cannot be targeted.
    #[must_use]
    pub fn invalid_destination(field: impl Into<String>, details: impl fmt::Display) -> Self {
        let field = field.into();
        let mut err = Self::new(
            ErrorKind::InvalidDestination,
            format!("invalid destination: field '{field}' {details}"),
        );
        err.field = Some(field);
        err
    }

    /// Creates a generic bad request error.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Creates an error for a raw value that failed coercion.
    #[must_use]
    pub fn coercion_failed(raw: &str, kind: Kind) -> Self {
        Self::new(
            ErrorKind::BadRequest,
            format!("failed to convert {raw} to {kind}"),
        )
    }

    /// Creates an error for a JSON value whose type does not fit the field.
    #[must_use]
    pub fn type_mismatch(field: impl Into<String>, found: &serde_json::Value, kind: Kind) -> Self {
        let mut err = Self::new(
            ErrorKind::TypeMismatch,
            format!("failed to convert {found} to {kind}"),
        );
        err.field = Some(field.into());
        err.bind_source = Some(Source::Json);
        err
    }

    /// Creates an error for a body that is not a JSON object.
    #[must_use]
    pub fn malformed_body(cause: impl Into<BoxError>) -> Self {
        let mut err = Self::new(ErrorKind::MalformedBody, "malformed JSON body");
        err.bind_source = Some(Source::Json);
        err.cause = Some(cause.into());
        err
    }

    /// Creates an error for a body larger than the configured limit.
    #[must_use]
    pub fn payload_too_large(max_size: usize, actual_size: usize) -> Self {
        let mut err = Self::new(
            ErrorKind::PayloadTooLarge,
            format!("payload too large: max {max_size} bytes, got {actual_size} bytes"),
        );
        err.bind_source = Some(Source::Json);
        err
    }

    /// Creates the opaque error reported when accessor code panics.
    #[must_use]
    pub fn fault(details: impl Into<String>) -> Self {
        let details: String = details.into();
        Self::new(ErrorKind::Fault, "Bad request").with_cause(details)
    }

    /// Wraps an error that is not part of the taxonomy.
    #[must_use]
    pub fn from_foreign(err: &(dyn std::error::Error + 'static)) -> Self {
        Self::bad_request("bad request").with_cause(err.to_string())
    }

    /// Attaches a lower-level cause.
    #[must_use]
    pub fn with_cause(mut self, cause: impl Into<BoxError>) -> Self {
        self.cause = Some(cause.into());
        self
    }

    /// Overrides the HTTP status code.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    /// Records the field and source group the failure happened in.
    #[must_use]
    pub(crate) fn at(mut self, source: Source, field: &str) -> Self {
        self.bind_source = Some(source);
        self.field = Some(field.to_owned());
        self
    }

    /// Returns the error kind.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        self.status
    }

    /// Returns the destination field name if applicable.
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the source group the failure happened in, if any.
    #[must_use]
    pub fn bind_source(&self) -> Option<Source> {
        self.bind_source
    }

    /// Returns the wrapped lower-level cause, if any.
    #[must_use]
    pub fn cause(&self) -> Option<&(dyn std::error::Error + Send + Sync + 'static)> {
        self.cause.as_deref()
    }
}
