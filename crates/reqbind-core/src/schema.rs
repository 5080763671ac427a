//! Destination schemas.
//!
//! A [`StructSchema`] describes how to fill one record type: which fields are
//! bound, where each one reads from, and how to reach it. Schemas are usually
//! generated by `#[derive(Bind)]`, but can be assembled by hand with
//! [`SchemaBuilder`].
//!
//! # Classification
//!
//! Each field is classified into exactly one [`Source`] group by inspecting
//! its annotations in the fixed order path, query, json. The first annotation
//! that is present, non-empty and not [`IGNORE`] wins. A field with no usable
//! annotation is left out of the schema entirely.
//!
//! ```rust
//! use reqbind_core::{Annotations, Source};
//!
//! let ann = Annotations::new().path("-").query("page").json("page");
//! assert_eq!(ann.classify(), Some((Source::Query, "page")));
//!
//! assert_eq!(Annotations::new().json("-").classify(), None);
//! ```

use crate::{BindError, BindResult, Bindable, Kind, Value};
use serde_json::Value as Json;
use std::collections::HashSet;
use std::fmt;

/// Annotation value meaning "not bound by this source".
pub const IGNORE: &str = "-";

/// Request component a field reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    /// Named path parameter (e.g. `/users/{id}`)
    Path,
    /// Query string parameter
    Query,
    /// Top-level key of a JSON object body
    Json,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path => write!(f, "path"),
            Self::Query => write!(f, "query"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Per-field source annotations, as written in `#[bind(...)]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Annotations<'a> {
    path: Option<&'a str>,
    query: Option<&'a str>,
    json: Option<&'a str>,
}

impl<'a> Annotations<'a> {
    /// Creates an empty annotation set.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            path: None,
            query: None,
            json: None,
        }
    }

    /// Sets the path parameter key.
    #[must_use]
    pub const fn path(mut self, key: &'a str) -> Self {
        self.path = Some(key);
        self
    }

    /// Sets the query parameter key.
    #[must_use]
    pub const fn query(mut self, key: &'a str) -> Self {
        self.query = Some(key);
        self
    }

    /// Sets the JSON body key.
    #[must_use]
    pub const fn json(mut self, key: &'a str) -> Self {
        self.json = Some(key);
        self
    }

    /// Returns the source group and external key this field binds to.
    #[must_use]
    pub fn classify(&self) -> Option<(Source, &'a str)> {
        [
            (Source::Path, self.path),
            (Source::Query, self.query),
            (Source::Json, self.json),
        ]
        .into_iter()
        .find_map(|(source, key)| match key {
            Some(key) if !key.is_empty() && key != IGNORE => Some((source, key)),
            _ => None,
        })
    }
}

/// Marker error: a value did not fit the field it was assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unassignable;

/// Typed write access to one field of `T`.
pub trait FieldAccess<T>: Send + Sync {
    /// Primitive kind of the field.
    fn kind(&self) -> Kind;

    /// Stores a coerced path or query value.
    fn assign(&self, dest: &mut T, value: Value) -> Result<(), Unassignable>;

    /// Stores a decoded JSON body value.
    fn assign_json(&self, dest: &mut T, value: &Json) -> Result<(), Unassignable>;
}

struct Accessor<T, F> {
    get: fn(&mut T) -> &mut F,
}

impl<T, F: Bindable> FieldAccess<T> for Accessor<T, F> {
    fn kind(&self) -> Kind {
        F::KIND
    }

    fn assign(&self, dest: &mut T, value: Value) -> Result<(), Unassignable> {
        *(self.get)(dest) = F::from_value(value).ok_or(Unassignable)?;
        Ok(())
    }

    fn assign_json(&self, dest: &mut T, value: &Json) -> Result<(), Unassignable> {
        *(self.get)(dest) = F::from_json(value).ok_or(Unassignable)?;
        Ok(())
    }
}

/// Schema of one bound field.
pub struct FieldSchema<T> {
    name: &'static str,
    key: String,
    source: Source,
    access: Box<dyn FieldAccess<T>>,
}

impl<T> FieldSchema<T> {
    /// Returns the field identifier.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the external key read from the request.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the source group.
    #[must_use]
    pub fn source(&self) -> Source {
        self.source
    }

    /// Returns the primitive kind.
    #[must_use]
    pub fn kind(&self) -> Kind {
        self.access.kind()
    }

    pub(crate) fn access(&self) -> &dyn FieldAccess<T> {
        self.access.as_ref()
    }
}

impl<T> fmt::Debug for FieldSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldSchema")
            .field("name", &self.name)
            .field("key", &self.key)
            .field("source", &self.source)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Schema of a destination record: one ordered field list per source group.
pub struct StructSchema<T> {
    type_name: &'static str,
    path: Vec<FieldSchema<T>>,
    query: Vec<FieldSchema<T>>,
    json: Vec<FieldSchema<T>>,
}

impl<T> StructSchema<T> {
    /// Returns the destination type name.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Fields bound to path parameters, in declaration order.
    #[must_use]
    pub fn path(&self) -> &[FieldSchema<T>] {
        &self.path
    }

    /// Fields bound to query parameters, in declaration order.
    #[must_use]
    pub fn query(&self) -> &[FieldSchema<T>] {
        &self.query
    }

    /// Fields bound to JSON body keys, in declaration order.
    #[must_use]
    pub fn json(&self) -> &[FieldSchema<T>] {
        &self.json
    }

    /// Returns the fields of one source group.
    #[must_use]
    pub fn group(&self, source: Source) -> &[FieldSchema<T>] {
        match source {
            Source::Path => &self.path,
            Source::Query => &self.query,
            Source::Json => &self.json,
        }
    }

    /// Iterates over all bound fields, path group first.
    pub fn fields(&self) -> impl Iterator<Item = &FieldSchema<T>> {
        self.path.iter().chain(&self.query).chain(&self.json)
    }

    /// Returns the number of bound fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.path.len() + self.query.len() + self.json.len()
    }

    /// Returns true if no field is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Checks that every field appears in at most one group, once.
    pub fn validate(&self) -> BindResult<()> {
        let mut seen = HashSet::with_capacity(self.len());
        for field in self.fields() {
            if !seen.insert(field.name) {
                return Err(BindError::invalid_destination(
                    field.name,
                    "is bound more than once",
                ));
            }
        }
        Ok(())
    }
}

impl<T> fmt::Debug for StructSchema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StructSchema")
            .field("type_name", &self.type_name)
            .field("path", &self.path)
            .field("query", &self.query)
            .field("json", &self.json)
            .finish()
    }
}

/// Builder for a [`StructSchema`].
///
/// # Example
///
/// ```rust
/// use reqbind_core::{Annotations, SchemaBuilder, Source};
///
/// #[derive(Default)]
/// struct GetUser {
///     id: i64,
///     verbose: bool,
/// }
///
/// let schema = SchemaBuilder::<GetUser>::new()
///     .field("id", Annotations::new().path("id"), |d| &mut d.id)
///     .field("verbose", Annotations::new().query("verbose"), |d| &mut d.verbose)
///     .build();
///
/// assert_eq!(schema.path()[0].key(), "id");
/// assert_eq!(schema.query()[0].source(), Source::Query);
/// ```
pub struct SchemaBuilder<T> {
    schema: StructSchema<T>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Creates a builder with no bound fields.
    #[must_use]
    pub fn new() -> Self {
        Self {
            schema: StructSchema {
                type_name: std::any::type_name::<T>(),
                path: Vec::new(),
                query: Vec::new(),
                json: Vec::new(),
            },
        }
    }

    /// Adds a field, classifying it by its annotations.
    ///
    /// Fields whose annotations are all absent or ignored are dropped.
    #[must_use]
    pub fn field<F: Bindable + 'static>(
        mut self,
        name: &'static str,
        annotations: Annotations<'_>,
        get: fn(&mut T) -> &mut F,
    ) -> Self {
        let Some((source, key)) = annotations.classify() else {
            return self;
        };

        let field = FieldSchema {
            name,
            key: key.to_owned(),
            source,
            access: Box::new(Accessor { get }),
        };

        match source {
            Source::Path => self.schema.path.push(field),
            Source::Query => self.schema.query.push(field),
            Source::Json => self.schema.json.push(field),
        }
        self
    }

    /// Finishes the schema.
    #[must_use]
    pub fn build(self) -> StructSchema<T> {
        self.schema
    }
}

impl<T: 'static> Default for SchemaBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A record type the binder can fill.
///
/// Usually derived with `#[derive(Bind)]`. The schema is rebuilt on every
/// call, so implementations should be cheap and free of side effects.
pub trait Bind: Sized + 'static {
    /// Returns the schema describing how to fill this type.
    fn schema() -> StructSchema<Self>;
}

/// Derives the schema of a destination type.
///
/// Deterministic: the same type always yields the same classification and
/// the same order within each group.
#[must_use]
pub fn analyze<T: Bind>() -> StructSchema<T> {
    let schema = T::schema();
    tracing::trace!(
        type_name = schema.type_name(),
        path = schema.path().len(),
        query = schema.query().len(),
        json = schema.json().len(),
        "analyzed destination schema"
    );
    schema
}
