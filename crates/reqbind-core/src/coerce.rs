//! String-to-primitive coercion.
//!
//! Path and query values arrive as raw strings. [`coerce`] turns them into a
//! [`Value`] of the field's [`Kind`], and [`Bindable`] narrows that value into
//! the concrete Rust field type. JSON body values skip the string step and are
//! converted directly by [`Bindable::from_json`].

use crate::{BindError, BindResult};
use serde_json::Value as Json;
use std::fmt;

/// Primitive kind of a bindable field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// UTF-8 text, bound verbatim.
    String,
    /// Signed integer, parsed base-10 in the 64-bit range.
    Int,
    /// Unsigned integer, parsed base-10 in the 64-bit range.
    Uint,
    /// Boolean (`1`, `t`, `T`, `TRUE`, `true`, `True` and their false forms).
    Bool,
    /// 64-bit floating point.
    Float,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Uint => "uint",
            Self::Bool => "bool",
            Self::Float => "float",
        })
    }
}

/// A coerced value, wide enough to hold any field of its kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A string value.
    Str(String),
    /// A signed integer value.
    Int(i64),
    /// An unsigned integer value.
    Uint(u64),
    /// A boolean value.
    Bool(bool),
    /// A floating point value.
    Float(f64),
}

/// Coerces a raw string into a value of the given kind.
///
/// Every failure yields the same [`ErrorKind::BadRequest`](crate::ErrorKind::BadRequest)
/// error, distinguished only by its message.
///
/// # Example
///
/// ```rust
/// use reqbind_core::{coerce, Kind, Value};
///
/// assert_eq!(coerce(Kind::Int, "42").unwrap(), Value::Int(42));
/// assert_eq!(coerce(Kind::Bool, "T").unwrap(), Value::Bool(true));
/// assert!(coerce(Kind::Float, "abc").is_err());
/// ```
pub fn coerce(kind: Kind, raw: &str) -> BindResult<Value> {
    let value = match kind {
        Kind::String => Some(Value::Str(raw.to_owned())),
        Kind::Int => raw.parse().ok().map(Value::Int),
        Kind::Uint => raw.parse().ok().map(Value::Uint),
        Kind::Bool => parse_bool(raw).map(Value::Bool),
        Kind::Float => raw.parse().ok().map(Value::Float),
    };
    value.ok_or_else(|| BindError::coercion_failed(raw, kind))
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// A Rust type that can be the target of a bound field.
///
/// Implemented for `String`, the signed and unsigned integer types, `bool`,
/// `f32`, `f64` and `Option` of any of those. Other field types are rejected
/// at compile time.
pub trait Bindable: Sized {
    /// The primitive kind raw strings are coerced to for this type.
    const KIND: Kind;

    /// Narrows a coerced value into this type, `None` if it does not fit.
    fn from_value(value: Value) -> Option<Self>;

    /// Converts a decoded JSON value into this type, `None` if its JSON type
    /// does not convert.
    fn from_json(value: &Json) -> Option<Self>;
}

impl Bindable for String {
    const KIND: Kind = Kind::String;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    fn from_json(value: &Json) -> Option<Self> {
        value.as_str().map(str::to_owned)
    }
}

impl Bindable for bool {
    const KIND: Kind = Kind::Bool;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    fn from_json(value: &Json) -> Option<Self> {
        value.as_bool()
    }
}

impl Bindable for f64 {
    const KIND: Kind = Kind::Float;

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f),
            _ => None,
        }
    }

    fn from_json(value: &Json) -> Option<Self> {
        value.as_f64()
    }
}

impl Bindable for f32 {
    const KIND: Kind = Kind::Float;

    #[allow(clippy::cast_possible_truncation)]
    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Float(f) => Some(f as f32),
            _ => None,
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn from_json(value: &Json) -> Option<Self> {
        value.as_f64().map(|f| f as f32)
    }
}

// JSON numbers with a zero fraction (`1.0`) count as integers.
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn json_i64(value: &Json) -> Option<i64> {
    value.as_i64().or_else(|| {
        let f = value.as_f64()?;
        (f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64).then(|| f as i64)
    })
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn json_u64(value: &Json) -> Option<u64> {
    value.as_u64().or_else(|| {
        let f = value.as_f64()?;
        (f.fract() == 0.0 && f >= 0.0 && f < u64::MAX as f64).then(|| f as u64)
    })
}

macro_rules! impl_bindable_int {
    ($kind:ident, $variant:ident, $json:ident: $($ty:ty),*) => {
        $(
            impl Bindable for $ty {
                const KIND: Kind = Kind::$kind;

                fn from_value(value: Value) -> Option<Self> {
                    match value {
                        Value::$variant(v) => Self::try_from(v).ok(),
                        _ => None,
                    }
                }

                fn from_json(value: &Json) -> Option<Self> {
                    $json(value).and_then(|v| Self::try_from(v).ok())
                }
            }
        )*
    };
}

impl_bindable_int!(Int, Int, json_i64: i8, i16, i32, i64, isize);
impl_bindable_int!(Uint, Uint, json_u64: u8, u16, u32, u64, usize);

impl<T: Bindable> Bindable for Option<T> {
    const KIND: Kind = T::KIND;

    fn from_value(value: Value) -> Option<Self> {
        T::from_value(value).map(Some)
    }

    fn from_json(value: &Json) -> Option<Self> {
        if value.is_null() {
            Some(None)
        } else {
            T::from_json(value).map(Some)
        }
    }
}
