//! Request access for the binder.
//!
//! The binder never talks to a server directly. It reads through the
//! [`RequestParts`] trait, which exposes the three components a destination
//! can bind from: named path parameters, query parameters and the body.
//! [`BindContext`] is the owned implementation; `http::Request<Bytes>` is
//! supported directly when the router stores [`Params`] in its extensions.

use crate::Params;
use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use std::borrow::Cow;
use tracing::debug;

/// Read access to the parts of an HTTP request a destination binds from.
pub trait RequestParts {
    /// Returns the value of a named path parameter.
    fn path_param(&self, name: &str) -> Option<&str>;

    /// Returns the raw query string, without the leading `?`.
    fn query_string(&self) -> Option<&str>;

    /// Returns the first value of a query parameter, percent-decoded.
    ///
    /// Parses the whole query string on every call. Parse it once with
    /// [`QueryParams::parse`] when looking up several names.
    fn query_param(&self, name: &str) -> Option<Cow<'_, str>> {
        QueryParams::parse(self.query_string()).take_first(name)
    }

    /// Takes the request body. The body is consumed: later calls return `None`.
    fn take_body(&mut self) -> Option<Bytes>;
}

/// Percent-decoded query pairs, in request order.
///
/// A query string that cannot be decoded yields no pairs, so every query
/// field counts as absent.
///
/// # Example
///
/// ```rust
/// use reqbind_core::QueryParams;
///
/// let query = QueryParams::parse(Some("tag=a&tag=b&name=Hello+World"));
/// assert_eq!(query.get("tag"), Some("a"));
/// assert_eq!(query.get("name"), Some("Hello World"));
/// assert_eq!(query.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams<'a> {
    pairs: Vec<(Cow<'a, str>, Cow<'a, str>)>,
}

impl<'a> QueryParams<'a> {
    /// Decodes a raw query string.
    #[must_use]
    pub fn parse(query: Option<&'a str>) -> Self {
        let Some(query) = query else {
            return Self::default();
        };
        match serde_urlencoded::from_str(query) {
            Ok(pairs) => Self { pairs },
            Err(e) => {
                debug!(error = %e, "undecodable query string, treating as empty");
                Self::default()
            }
        }
    }

    /// Returns the first value for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value.as_ref()))
    }

    fn take_first(self, name: &str) -> Option<Cow<'a, str>> {
        self.pairs
            .into_iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Returns the number of pairs, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns `true` if there are no pairs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Owned request data for a single decode call.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{BindContext, Params, RequestParts};
/// use http::{HeaderMap, Method, Uri};
/// use bytes::Bytes;
///
/// let mut params = Params::new();
/// params.push("id", "1");
///
/// let mut ctx = BindContext::new(
///     Method::POST,
///     Uri::from_static("/users/1?firstName=John"),
///     HeaderMap::new(),
///     Some(Bytes::from_static(br#"{"lastName":"Doe"}"#)),
///     params,
/// );
///
/// assert_eq!(ctx.path_param("id"), Some("1"));
/// assert_eq!(ctx.query_param("firstName").as_deref(), Some("John"));
/// assert!(ctx.take_body().is_some());
/// assert!(ctx.take_body().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BindContext {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    path_params: Params,
}

impl BindContext {
    /// Creates a new bind context.
    #[must_use]
    pub fn new(
        method: Method,
        uri: Uri,
        headers: HeaderMap,
        body: Option<Bytes>,
        path_params: Params,
    ) -> Self {
        Self {
            method,
            uri,
            headers,
            body,
            path_params,
        }
    }

    /// Creates a context from an `http::Request`.
    ///
    /// Path parameters are read from the request extensions; an empty body
    /// counts as no body.
    #[must_use]
    pub fn from_request(req: http::Request<Bytes>) -> Self {
        let (mut parts, body) = req.into_parts();
        let path_params = parts.extensions.remove::<Params>().unwrap_or_default();
        Self {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body: (!body.is_empty()).then_some(body),
            path_params,
        }
    }

    /// Returns the HTTP method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Returns the request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the path parameters.
    #[must_use]
    pub fn path_params(&self) -> &Params {
        &self.path_params
    }

    /// Returns true if the body has not been taken and is present.
    #[must_use]
    pub fn has_body(&self) -> bool {
        self.body.is_some()
    }
}

impl RequestParts for BindContext {
    fn path_param(&self, name: &str) -> Option<&str> {
        self.path_params.get(name)
    }

    fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    fn take_body(&mut self) -> Option<Bytes> {
        self.body.take()
    }
}

impl RequestParts for http::Request<Bytes> {
    fn path_param(&self, name: &str) -> Option<&str> {
        self.extensions().get::<Params>()?.get(name)
    }

    fn query_string(&self) -> Option<&str> {
        self.uri().query()
    }

    fn take_body(&mut self) -> Option<Bytes> {
        let body = std::mem::take(self.body_mut());
        (!body.is_empty()).then_some(body)
    }
}

/// Builder for constructing a [`BindContext`].
///
/// Method defaults to `GET` and the URI to `/`.
#[derive(Debug, Default)]
pub struct BindContextBuilder {
    inner: BindContext,
}

impl BindContextBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.inner.method = method;
        self
    }

    /// Sets the URI.
    #[must_use]
    pub fn uri(mut self, uri: Uri) -> Self {
        self.inner.uri = uri;
        self
    }

    /// Adds a single header. Invalid names or values are ignored.
    #[must_use]
    pub fn header(mut self, name: &str, value: &str) -> Self {
        if let (Ok(name), Ok(value)) = (
            http::HeaderName::from_bytes(name.as_bytes()),
            http::HeaderValue::from_str(value),
        ) {
            self.inner.headers.insert(name, value);
        }
        self
    }

    /// Sets the body.
    #[must_use]
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.inner.body = Some(body.into());
        self
    }

    /// Sets the body to the JSON encoding of `value`.
    #[must_use]
    pub fn json_body(self, value: &serde_json::Value) -> Self {
        self.body(value.to_string())
    }

    /// Adds a single path parameter.
    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.path_params.push(name, value);
        self
    }

    /// Builds the context.
    #[must_use]
    pub fn build(self) -> BindContext {
        self.inner
    }
}
