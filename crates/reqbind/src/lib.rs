//! # Reqbind
//!
//! **Declarative request binding for HTTP handlers**
//!
//! Annotate a record with the request component each field comes from and
//! let [`decode`] fill it:
//!
//! ```rust
//! use reqbind::prelude::*;
//! use http::Uri;
//!
//! #[derive(Debug, Default, Bind)]
//! struct UpdateUser {
//!     #[bind(path = "id")]
//!     id: i64,
//!     #[bind(query = "firstName")]
//!     first_name: String,
//!     #[bind(json = "lastName")]
//!     last_name: String,
//! }
//!
//! let mut ctx = BindContextBuilder::new()
//!     .uri(Uri::from_static("/users/1?firstName=John"))
//!     .path_param("id", "1")
//!     .body(r#"{"id": 999, "firstName": "xdd", "lastName": "Doe"}"#)
//!     .build();
//!
//! let mut user = UpdateUser::default();
//! decode(&mut ctx, &mut user).unwrap();
//!
//! assert_eq!(user.id, 1);
//! assert_eq!(user.first_name, "John");
//! assert_eq!(user.last_name, "Doe");
//! ```
//!
//! ## Binding rules
//!
//! ```text
//! path group ──► query group ──► json group
//!  missing: ""     missing: skip    no body: skip group
//!                                   missing key: skip
//! ```
//!
//! The first failure stops the decode. Errors carry an HTTP status and can be
//! written straight to a response with [`send_error`] or an
//! [`ErrorResponder`] built from [`config::BindConfig`].

#![doc(html_root_url = "https://docs.rs/reqbind/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Core types live at the crate root so derived code can name `::reqbind::Bind`.
pub use reqbind_core::*;

// Re-export the derive macro
pub use reqbind_macros::Bind;

// Re-export configuration types
pub use reqbind_config as config;

// Re-export logging setup
pub use reqbind_telemetry as telemetry;

/// Prelude module for convenient imports.
///
/// ```rust
/// use reqbind::prelude::*;
/// ```
pub mod prelude {
    pub use reqbind_core::{
        decode, decode_with, error_response, send_error, Bind, BindContext, BindContextBuilder,
        BindError, BindResult, DecodeOptions, EmptyPathParam, ErrorKind, ErrorResponder,
        ErrorResponseLevel, Registry, RequestParts,
    };

    pub use reqbind_macros::Bind;

    pub use reqbind_config::{BindConfig, ConfigLoader};
}
