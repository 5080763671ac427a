//! # Reqbind Core
//!
//! Binds the path parameters, query parameters and JSON body of an HTTP
//! request into a typed record.
//!
//! - [`StructSchema`] - Per-type table of bindable fields, grouped by source
//! - [`decode`] - Fills a record from a request in the order path, query, json
//! - [`Registry`] - Decodes into type-erased destinations
//! - [`BindError`] - Error taxonomy with HTTP status codes
//! - [`ErrorResponder`] - Writes errors as JSON at a chosen verbosity
//!
//! Records usually implement [`Bind`] through `#[derive(Bind)]` from the
//! `reqbind` crate, but the schema can also be written by hand:
//!
//! ```rust
//! use reqbind_core::{decode, Annotations, Bind, BindContextBuilder, SchemaBuilder, StructSchema};
//! use http::Uri;
//!
//! #[derive(Default)]
//! struct GetUser {
//!     id: u64,
//!     verbose: bool,
//! }
//!
//! impl Bind for GetUser {
//!     fn schema() -> StructSchema<Self> {
//!         SchemaBuilder::<Self>::new()
//!             .field("id", Annotations::new().path("id"), |d| &mut d.id)
//!             .field("verbose", Annotations::new().query("verbose"), |d| &mut d.verbose)
//!             .build()
//!     }
//! }
//!
//! let mut ctx = BindContextBuilder::new()
//!     .uri(Uri::from_static("/users/7?verbose=t"))
//!     .path_param("id", "7")
//!     .build();
//!
//! let mut req = GetUser::default();
//! decode(&mut ctx, &mut req).unwrap();
//! assert_eq!(req.id, 7);
//! assert!(req.verbose);
//! ```

#![doc(html_root_url = "https://docs.rs/reqbind-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod coerce;
mod context;
mod decode;
mod error;
mod fill;
mod options;
mod params;
mod response;
mod schema;

pub use coerce::{coerce, Bindable, Kind, Value};
pub use context::{BindContext, BindContextBuilder, QueryParams, RequestParts};
pub use decode::{decode, decode_with, decode_with_schema, Registry};
pub use error::{BindError, BindResult, BoxError, ErrorKind};
pub use fill::fill;
pub use options::{DecodeOptions, EmptyPathParam, ErrorResponseLevel, DEFAULT_MAX_BODY_BYTES};
pub use params::Params;
pub use response::{error_response, send_error, ErrorBody, ErrorResponder, ResponseSink};
pub use schema::{
    analyze, Annotations, Bind, FieldAccess, FieldSchema, SchemaBuilder, Source, StructSchema,
    Unassignable, IGNORE,
};
