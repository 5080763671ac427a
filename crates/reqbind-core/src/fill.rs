//! The fill engine.
//!
//! Populates a destination from a request in the fixed group order path,
//! query, json. A failure stops the fill immediately; fields already written
//! keep their new values.

use crate::schema::{FieldSchema, StructSchema, Unassignable};
use crate::{
    coerce, BindError, BindResult, DecodeOptions, EmptyPathParam, QueryParams, RequestParts,
};
use serde_json::{Map, Value as Json};
use tracing::debug;

/// Fills `dest` from `req` according to `schema`.
///
/// * Path fields: a missing parameter is coerced as `""` unless
///   [`EmptyPathParam::Skip`] is set.
/// * Query fields: a missing or empty parameter leaves the field untouched.
/// * Json fields: no body skips the whole group; a missing key leaves the
///   field untouched. The body is parsed once, even when no field reads it.
pub fn fill<T, R>(
    req: &mut R,
    schema: &StructSchema<T>,
    dest: &mut T,
    options: &DecodeOptions,
) -> BindResult<()>
where
    R: RequestParts + ?Sized,
{
    fill_path(req, schema, dest, options)?;
    fill_query(req, schema, dest)?;
    fill_json(req, schema, dest, options)
}

fn fill_path<T, R>(
    req: &R,
    schema: &StructSchema<T>,
    dest: &mut T,
    options: &DecodeOptions,
) -> BindResult<()>
where
    R: RequestParts + ?Sized,
{
    for field in schema.path() {
        let raw = req.path_param(field.key()).unwrap_or_default();
        if raw.is_empty() && options.empty_path_param == EmptyPathParam::Skip {
            debug!(field = field.name(), key = field.key(), "skipping empty path parameter");
            continue;
        }
        store(field, dest, raw)?;
    }
    Ok(())
}

fn fill_query<T, R>(req: &R, schema: &StructSchema<T>, dest: &mut T) -> BindResult<()>
where
    R: RequestParts + ?Sized,
{
    if schema.query().is_empty() {
        return Ok(());
    }
    let query = QueryParams::parse(req.query_string());
    for field in schema.query() {
        match query.get(field.key()) {
            Some(raw) if !raw.is_empty() => store(field, dest, raw)?,
            _ => debug!(field = field.name(), key = field.key(), "query parameter absent"),
        }
    }
    Ok(())
}

fn fill_json<T, R>(
    req: &mut R,
    schema: &StructSchema<T>,
    dest: &mut T,
    options: &DecodeOptions,
) -> BindResult<()>
where
    R: RequestParts + ?Sized,
{
    let Some(body) = req.take_body().filter(|body| !body.is_empty()) else {
        debug!("no request body, skipping json fields");
        return Ok(());
    };

    if body.len() > options.max_body_bytes {
        return Err(BindError::payload_too_large(options.max_body_bytes, body.len()));
    }

    // `null` decodes to no object: every key is absent
    let object: Option<Map<String, Json>> =
        serde_json::from_slice(&body).map_err(BindError::malformed_body)?;
    let Some(object) = object else {
        debug!("null request body, json fields absent");
        return Ok(());
    };

    for field in schema.json() {
        let Some(value) = object.get(field.key()) else {
            debug!(field = field.name(), key = field.key(), "json key absent");
            continue;
        };
        field
            .access()
            .assign_json(dest, value)
            .map_err(|Unassignable| BindError::type_mismatch(field.name(), value, field.kind()))?;
    }
    Ok(())
}

fn store<T>(field: &FieldSchema<T>, dest: &mut T, raw: &str) -> BindResult<()> {
    let value = coerce(field.kind(), raw).map_err(|e| e.at(field.source(), field.name()))?;
    field.access().assign(dest, value).map_err(|Unassignable| {
        BindError::coercion_failed(raw, field.kind()).at(field.source(), field.name())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Annotations, BindContextBuilder, ErrorKind, SchemaBuilder, Source};
    use http::{StatusCode, Uri};
    use serde_json::json;

    #[derive(Debug, Default, PartialEq)]
    struct User {
        id: i64,
        first_name: String,
        last_name: String,
        age: Option<u8>,
    }

    fn schema() -> StructSchema<User> {
        SchemaBuilder::<User>::new()
            .field("id", Annotations::new().path("id"), |d| &mut d.id)
            .field("first_name", Annotations::new().query("firstName"), |d| {
                &mut d.first_name
            })
            .field("last_name", Annotations::new().json("lastName"), |d| {
                &mut d.last_name
            })
            .field("age", Annotations::new().query("age"), |d| &mut d.age)
            .build()
    }

    fn run(ctx: &mut crate::BindContext, options: &DecodeOptions) -> (User, BindResult<()>) {
        let mut user = User::default();
        let result = fill(ctx, &schema(), &mut user, options);
        (user, result)
    }

    #[test]
    fn test_fills_all_groups() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/users/1?firstName=John&age=30"))
            .path_param("id", "1")
            .json_body(&json!({"id": 999, "firstName": "xdd", "lastName": "Doe"}))
            .build();

        let (user, result) = run(&mut ctx, &DecodeOptions::default());
        result.unwrap();
        assert_eq!(
            user,
            User {
                id: 1,
                first_name: "John".into(),
                last_name: "Doe".into(),
                age: Some(30),
            }
        );
    }

    #[test]
    fn test_missing_query_and_json_are_skipped() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/users/1?firstName="))
            .path_param("id", "1")
            .json_body(&json!({}))
            .build();

        let (user, result) = run(&mut ctx, &DecodeOptions::default());
        result.unwrap();
        assert_eq!(user.first_name, "");
        assert_eq!(user.last_name, "");
        assert_eq!(user.age, None);
    }

    #[test]
    fn test_no_body_skips_json_group() {
        let mut ctx = BindContextBuilder::new().path_param("id", "5").build();

        let (user, result) = run(&mut ctx, &DecodeOptions::default());
        result.unwrap();
        assert_eq!(user.id, 5);
    }

    #[test]
    fn test_missing_path_param_is_coerced_by_default() {
        let mut ctx = BindContextBuilder::new().build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.to_string(), "failed to convert  to int");
        assert_eq!(err.bind_source(), Some(Source::Path));
    }

    #[test]
    fn test_missing_path_param_can_be_skipped() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/?firstName=Ann"))
            .build();
        let options = DecodeOptions {
            empty_path_param: EmptyPathParam::Skip,
            ..DecodeOptions::default()
        };

        let (user, result) = run(&mut ctx, &options);
        result.unwrap();
        assert_eq!(user.id, 0);
        assert_eq!(user.first_name, "Ann");
    }

    #[test]
    fn test_coercion_failure_aborts_after_partial_mutation() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/?firstName=John&age=old"))
            .path_param("id", "1")
            .json_body(&json!({"lastName": "Doe"}))
            .build();

        let (user, result) = run(&mut ctx, &DecodeOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "failed to convert old to uint");
        assert_eq!(err.field(), Some("age"));
        // earlier fields keep their values, later groups never ran
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn test_out_of_range_query_value() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/?age=300"))
            .path_param("id", "1")
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::BadRequest);
        assert_eq!(err.to_string(), "failed to convert 300 to uint");
    }

    #[test]
    fn test_json_type_mismatch() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .json_body(&json!({"lastName": 1}))
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TypeMismatch);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "failed to convert 1 to string");
    }

    #[test]
    fn test_malformed_body() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .body("{not json")
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedBody);
    }

    #[test]
    fn test_non_object_body_is_malformed() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .body("[1, 2, 3]")
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedBody);
    }

    #[test]
    fn test_null_body_leaves_json_fields_untouched() {
        let mut ctx = BindContextBuilder::new()
            .uri(Uri::from_static("/?firstName=John"))
            .path_param("id", "1")
            .body("null")
            .build();

        let (user, result) = run(&mut ctx, &DecodeOptions::default());
        result.unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.first_name, "John");
        assert_eq!(user.last_name, "");
    }

    #[test]
    fn test_scalar_body_is_malformed() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .body("\"Doe\"")
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        assert_eq!(result.unwrap_err().kind(), ErrorKind::MalformedBody);
    }

    #[test]
    fn test_body_size_limit() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .json_body(&json!({"lastName": "a rather long last name"}))
            .build();
        let options = DecodeOptions {
            max_body_bytes: 8,
            ..DecodeOptions::default()
        };

        let (_, result) = run(&mut ctx, &options);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[test]
    fn test_body_is_consumed() {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .json_body(&json!({"lastName": "Doe"}))
            .build();

        let (_, result) = run(&mut ctx, &DecodeOptions::default());
        result.unwrap();
        assert!(!ctx.has_body());
    }
}
