//! Error responses.
//!
//! The [`ErrorResponder`] turns an error into exactly one status line and one
//! JSON body of the form `{"message": "..."}`. How much of the error is
//! revealed depends on its [`ErrorResponseLevel`]:
//!
//! | Level | Client errors | Internal errors |
//! |-------|---------------|-----------------|
//! | `Quiet` | `Bad request` | `Bad request` |
//! | `Info` | message | `bad request` |
//! | `Detailed` | message and causes | message and causes |
//!
//! A caught fault always reads `Bad request` below `Detailed`.

use crate::{BindError, ErrorKind, ErrorResponseLevel};
use bytes::Bytes;
use http::header::{self, HeaderValue};
use http::{Response, StatusCode};
use serde::{Deserialize, Serialize};
use std::error::Error;

const QUIET_MESSAGE: &str = "Bad request";
const MASKED_MESSAGE: &str = "bad request";

/// JSON body written for an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub message: String,
}

/// Destination for an error response.
pub trait ResponseSink {
    /// Sets the response status.
    fn set_status(&mut self, status: StatusCode);

    /// Sets the content type of the body.
    fn set_content_type(&mut self, content_type: HeaderValue);

    /// Writes the response body.
    fn write_body(&mut self, body: Bytes);
}

impl ResponseSink for Response<Bytes> {
    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn set_content_type(&mut self, content_type: HeaderValue) {
        self.headers_mut().insert(header::CONTENT_TYPE, content_type);
    }

    fn write_body(&mut self, body: Bytes) {
        *self.body_mut() = body;
    }
}

/// Writes errors as JSON responses at a fixed verbosity.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{BindError, ErrorResponder, ErrorResponseLevel, Kind};
/// use http::StatusCode;
///
/// let err = BindError::coercion_failed("NotInt", Kind::Int);
///
/// let response = ErrorResponder::new(ErrorResponseLevel::Info).response(&err);
/// assert_eq!(response.status(), StatusCode::BAD_REQUEST);
/// assert_eq!(&response.body()[..], br#"{"message":"failed to convert NotInt to int"}"#);
///
/// let quiet = ErrorResponder::new(ErrorResponseLevel::Quiet).response(&err);
/// assert_eq!(&quiet.body()[..], br#"{"message":"Bad request"}"#);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ErrorResponder {
    level: ErrorResponseLevel,
}

impl ErrorResponder {
    /// Creates a responder with the given level.
    #[must_use]
    pub const fn new(level: ErrorResponseLevel) -> Self {
        Self { level }
    }

    /// Returns the configured level.
    #[must_use]
    pub const fn level(&self) -> ErrorResponseLevel {
        self.level
    }

    /// Builds the body for a taxonomy error.
    #[must_use]
    pub fn body_for(&self, err: &BindError) -> ErrorBody {
        let message = match self.level {
            ErrorResponseLevel::Quiet => QUIET_MESSAGE.to_owned(),
            ErrorResponseLevel::Info if err.kind() == ErrorKind::Fault => QUIET_MESSAGE.to_owned(),
            ErrorResponseLevel::Info if err.kind().is_client_error() => err.message().to_owned(),
            ErrorResponseLevel::Info => MASKED_MESSAGE.to_owned(),
            ErrorResponseLevel::Detailed => with_causes(err),
        };
        ErrorBody { message }
    }

    /// Writes `err` to `sink`.
    ///
    /// Errors outside the taxonomy are wrapped as a bad request first.
    pub fn send<S>(&self, sink: &mut S, err: &(dyn Error + 'static))
    where
        S: ResponseSink + ?Sized,
    {
        match err.downcast_ref::<BindError>() {
            Some(bind_err) => self.send_bind_error(sink, bind_err),
            None => self.send_bind_error(sink, &BindError::from_foreign(err)),
        }
    }

    fn send_bind_error<S>(&self, sink: &mut S, err: &BindError)
    where
        S: ResponseSink + ?Sized,
    {
        let body = self.body_for(err);
        let bytes = serde_json::to_vec(&body)
            .unwrap_or_else(|_| format!(r#"{{"message":"{QUIET_MESSAGE}"}}"#).into_bytes());

        sink.set_status(err.status_code());
        sink.set_content_type(HeaderValue::from_static("application/json"));
        sink.write_body(Bytes::from(bytes));
    }

    /// Builds a complete HTTP response for `err`.
    #[must_use]
    pub fn response(&self, err: &(dyn Error + 'static)) -> Response<Bytes> {
        let mut response = Response::new(Bytes::new());
        self.send(&mut response, err);
        response
    }
}

fn with_causes(err: &BindError) -> String {
    let mut message = err.message().to_owned();
    let mut cause = err.source();
    while let Some(inner) = cause {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        cause = inner.source();
    }
    message
}

/// Writes `err` to `sink` at the default [`ErrorResponseLevel::Info`] level.
pub fn send_error<S>(sink: &mut S, err: &(dyn Error + 'static))
where
    S: ResponseSink + ?Sized,
{
    ErrorResponder::default().send(sink, err);
}

/// Builds an HTTP response for `err` at the default level.
#[must_use]
pub fn error_response(err: &(dyn Error + 'static)) -> Response<Bytes> {
    ErrorResponder::default().response(err)
}
