//! Decode entry points.
//!
//! [`decode`] is the main operation: it analyzes the destination type, fills
//! it from the request and reports failures as [`BindError`]s. Every
//! modelled failure is a typed error. Panics escaping field accessor code are
//! caught here and reported as [`ErrorKind::Fault`](crate::ErrorKind::Fault).
//!
//! [`Registry`] serves callers that only hold a `&mut dyn Any`: schemas are
//! built once when a type is registered, and destinations of any other type
//! are rejected with [`ErrorKind::NotARecord`](crate::ErrorKind::NotARecord)
//! before anything is read or written.

use crate::schema::{analyze, Bind, StructSchema};
use crate::{fill, BindError, BindResult, DecodeOptions, RequestParts};
use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Decodes a request into `dest` with default options.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{decode, Annotations, Bind, BindContextBuilder, SchemaBuilder, StructSchema};
/// use http::Uri;
///
/// #[derive(Debug, Default)]
/// struct ListUsers {
///     page: u32,
/// }
///
/// impl Bind for ListUsers {
///     fn schema() -> StructSchema<Self> {
///         SchemaBuilder::<Self>::new()
///             .field("page", Annotations::new().query("page"), |d| &mut d.page)
///             .build()
///     }
/// }
///
/// let mut ctx = BindContextBuilder::new()
///     .uri(Uri::from_static("/users?page=3"))
///     .build();
///
/// let mut dest = ListUsers::default();
/// decode(&mut ctx, &mut dest).unwrap();
/// assert_eq!(dest.page, 3);
/// ```
pub fn decode<T, R>(req: &mut R, dest: &mut T) -> BindResult<()>
where
    T: Bind,
    R: RequestParts + ?Sized,
{
    decode_with(req, dest, &DecodeOptions::default())
}

/// Decodes a request into `dest` with explicit options.
///
/// The schema is derived afresh on every call.
pub fn decode_with<T, R>(req: &mut R, dest: &mut T, options: &DecodeOptions) -> BindResult<()>
where
    T: Bind,
    R: RequestParts + ?Sized,
{
    let schema = analyze::<T>();
    decode_with_schema(req, &schema, dest, options)
}

/// Decodes a request into `dest` using a prebuilt schema.
pub fn decode_with_schema<T, R>(
    req: &mut R,
    schema: &StructSchema<T>,
    dest: &mut T,
    options: &DecodeOptions,
) -> BindResult<()>
where
    R: RequestParts + ?Sized,
{
    schema.validate()?;

    debug!(
        type_name = schema.type_name(),
        path = schema.path().len(),
        query = schema.query().len(),
        json = schema.json().len(),
        "decoding request"
    );

    let result = panic::catch_unwind(AssertUnwindSafe(|| fill(req, schema, dest, options)))
        .unwrap_or_else(|payload| {
            let details = panic_message(payload.as_ref());
            error!(type_name = schema.type_name(), panic = %details, "fault while filling destination");
            Err(BindError::fault(details))
        });

    match &result {
        Ok(()) => debug!(type_name = schema.type_name(), "request decoded"),
        Err(err) => warn!(
            type_name = schema.type_name(),
            kind = %err.kind(),
            field = err.field(),
            error = %err,
            "request decode failed"
        ),
    }
    result
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_owned())
}

trait ErasedBinder: Send + Sync {
    fn decode(
        &self,
        req: &mut dyn RequestParts,
        dest: &mut dyn Any,
        options: &DecodeOptions,
    ) -> BindResult<()>;

    fn type_name(&self) -> &'static str;
}

struct TypedBinder<T> {
    schema: StructSchema<T>,
}

impl<T: Bind> ErasedBinder for TypedBinder<T> {
    fn decode(
        &self,
        req: &mut dyn RequestParts,
        dest: &mut dyn Any,
        options: &DecodeOptions,
    ) -> BindResult<()> {
        let dest = dest
            .downcast_mut::<T>()
            .ok_or_else(|| BindError::not_a_record(self.schema.type_name()))?;
        decode_with_schema(req, &self.schema, dest, options)
    }

    fn type_name(&self) -> &'static str {
        self.schema.type_name()
    }
}

/// Schemas registered ahead of time, for type-erased destinations.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{Annotations, Bind, BindContextBuilder, ErrorKind, Registry, SchemaBuilder, StructSchema};
///
/// #[derive(Default)]
/// struct GetUser {
///     id: i64,
/// }
///
/// impl Bind for GetUser {
///     fn schema() -> StructSchema<Self> {
///         SchemaBuilder::<Self>::new()
///             .field("id", Annotations::new().path("id"), |d| &mut d.id)
///             .build()
///     }
/// }
///
/// let mut registry = Registry::new();
/// registry.register::<GetUser>().unwrap();
///
/// let mut ctx = BindContextBuilder::new().path_param("id", "7").build();
/// let mut user = GetUser::default();
/// registry.decode(&mut ctx, &mut user).unwrap();
/// assert_eq!(user.id, 7);
///
/// let mut not_a_record = 0_i32;
/// let err = registry.decode(&mut ctx, &mut not_a_record).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::NotARecord);
/// ```
#[derive(Default)]
pub struct Registry {
    binders: HashMap<TypeId, Box<dyn ErasedBinder>>,
    options: DecodeOptions,
}

impl Registry {
    /// Creates an empty registry with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty registry with the given options.
    #[must_use]
    pub fn with_options(options: DecodeOptions) -> Self {
        Self {
            binders: HashMap::new(),
            options,
        }
    }

    /// Builds and validates the schema of `T` and stores it.
    ///
    /// Registering a type twice replaces the earlier schema.
    pub fn register<T: Bind>(&mut self) -> BindResult<&mut Self> {
        let schema = analyze::<T>();
        schema.validate()?;
        debug!(type_name = schema.type_name(), fields = schema.len(), "registered destination");
        self.binders
            .insert(TypeId::of::<T>(), Box::new(TypedBinder { schema }));
        Ok(self)
    }

    /// Returns true if `T` has been registered.
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.binders.contains_key(&TypeId::of::<T>())
    }

    /// Returns the names of all registered types.
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.binders.values().map(|binder| binder.type_name())
    }

    /// Returns the options used by [`Registry::decode`].
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decodes a request into a type-erased destination.
    ///
    /// Fails with `NotARecord`, leaving `dest` untouched, when the
    /// destination's type was never registered.
    pub fn decode(&self, req: &mut dyn RequestParts, dest: &mut dyn Any) -> BindResult<()> {
        let type_id = (*dest).type_id();
        let binder = self
            .binders
            .get(&type_id)
            .ok_or_else(|| BindError::not_a_record("an unregistered type"))?;
        binder.decode(req, dest, &self.options)
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("types", &self.type_names().collect::<Vec<_>>())
            .field("options", &self.options)
            .finish()
    }
}
