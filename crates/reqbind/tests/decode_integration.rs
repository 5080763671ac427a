//! End-to-end decoding through the derive macro.

use bytes::Bytes;
use http::{Method, Request, Uri};
use proptest::prelude::*;
use reqbind::prelude::*;
use reqbind::{analyze, Params, Source};
use serde_json::json;

#[derive(Debug, Default, PartialEq, Bind)]
struct UpdateUser {
    #[bind(path = "id")]
    id: i64,
    #[bind(query = "firstName")]
    first_name: String,
    #[bind(json = "lastName")]
    last_name: String,
}

#[derive(Debug, Default, PartialEq, Bind)]
struct Everything {
    #[bind(path = "i8")]
    small: i8,
    #[bind(path = "u16")]
    unsigned: u16,
    #[bind(query = "u")]
    big: u64,
    #[bind(query = "flag")]
    flag: bool,
    #[bind(query = "ratio")]
    ratio: f32,
    #[bind(query = "page")]
    page: Option<u32>,
    #[bind(json = "score")]
    score: f64,
    #[bind(json = "nickname")]
    nickname: Option<String>,
    #[bind(json = "type")]
    r#type: String,
    #[bind(json = "-")]
    ignored: String,
    untagged: String,
}

fn update_user_request(id: &str) -> BindContext {
    BindContextBuilder::new()
        .method(Method::PUT)
        .uri(Uri::from_static("/users/1?firstName=John"))
        .path_param("id", id)
        .json_body(&json!({"id": 999, "firstName": "xdd", "lastName": "Doe"}))
        .build()
}

#[test]
fn test_scenario_all_sources() {
    let mut ctx = update_user_request("1");
    let mut user = UpdateUser::default();

    decode(&mut ctx, &mut user).unwrap();

    assert_eq!(
        user,
        UpdateUser {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
        }
    );
}

#[test]
fn test_null_body_binds_no_json_fields() {
    let mut ctx = BindContextBuilder::new()
        .uri(Uri::from_static("/users/1?firstName=John"))
        .path_param("id", "1")
        .body("null")
        .build();
    let mut user = UpdateUser {
        last_name: "Smith".to_string(),
        ..UpdateUser::default()
    };

    decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.first_name, "John");
    assert_eq!(user.last_name, "Smith");
}

#[test]
fn test_scenario_path_not_an_int() {
    let mut ctx = update_user_request("NotInt");
    let mut user = UpdateUser::default();

    let err = decode(&mut ctx, &mut user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.to_string(), "failed to convert NotInt to int");
    assert_eq!(err.field(), Some("id"));
    assert_eq!(err.bind_source(), Some(Source::Path));
}

#[test]
fn test_every_supported_kind() {
    let mut ctx = BindContextBuilder::new()
        .uri(Uri::from_static(
            "/?u=18446744073709551615&flag=True&ratio=0.5&page=3",
        ))
        .path_param("i8", "-128")
        .path_param("u16", "65535")
        .json_body(&json!({
            "score": 7,
            "nickname": null,
            "type": "admin",
            "ignored": "nope",
            "untagged": "nope",
        }))
        .build();

    let mut dest = Everything {
        nickname: Some("stale".to_string()),
        ..Everything::default()
    };
    decode(&mut ctx, &mut dest).unwrap();

    assert_eq!(dest.small, i8::MIN);
    assert_eq!(dest.unsigned, u16::MAX);
    assert_eq!(dest.big, u64::MAX);
    assert!(dest.flag);
    assert!((dest.ratio - 0.5).abs() < f32::EPSILON);
    assert_eq!(dest.page, Some(3));
    assert!((dest.score - 7.0).abs() < f64::EPSILON);
    assert_eq!(dest.nickname, None);
    assert_eq!(dest.r#type, "admin");
    assert_eq!(dest.ignored, "");
    assert_eq!(dest.untagged, "");
}

#[test]
fn test_narrow_int_overflow_is_rejected() {
    let mut ctx = BindContextBuilder::new()
        .path_param("i8", "128")
        .path_param("u16", "1")
        .build();

    let err = decode(&mut ctx, &mut Everything::default()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::BadRequest);
    assert_eq!(err.to_string(), "failed to convert 128 to int");
}

#[test]
fn test_schema_shape_from_derive() {
    let schema = analyze::<Everything>();
    let path: Vec<_> = schema.path().iter().map(|f| f.name()).collect();
    let query: Vec<_> = schema.query().iter().map(|f| f.name()).collect();
    let json: Vec<_> = schema.json().iter().map(|f| f.key()).collect();

    assert_eq!(path, ["small", "unsigned"]);
    assert_eq!(query, ["big", "flag", "ratio", "page"]);
    assert_eq!(json, ["score", "nickname", "type"]);
    assert!(schema.validate().is_ok());
}

// A value supplied through the wrong component never reaches the field.

#[test]
fn test_json_field_ignores_query_value() {
    let mut ctx = BindContextBuilder::new()
        .uri(Uri::from_static("/?lastName=Smith"))
        .path_param("id", "1")
        .build();
    let mut user = UpdateUser::default();

    decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.last_name, "");
}

#[test]
fn test_query_field_ignores_body_value() {
    let mut ctx = BindContextBuilder::new()
        .path_param("id", "1")
        .json_body(&json!({"firstName": "John"}))
        .build();
    let mut user = UpdateUser::default();

    decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.first_name, "");
}

#[test]
fn test_path_field_ignores_query_and_body() {
    let mut ctx = BindContextBuilder::new()
        .uri(Uri::from_static("/?id=5"))
        .path_param("id", "1")
        .json_body(&json!({"id": 7}))
        .build();
    let mut user = UpdateUser::default();

    decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.id, 1);
}

#[test]
fn test_wrong_json_type() {
    let mut ctx = BindContextBuilder::new()
        .path_param("id", "1")
        .json_body(&json!({"lastName": ["Doe"]}))
        .build();
    let mut user = UpdateUser::default();

    let err = decode(&mut ctx, &mut user).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    assert_eq!(err.field(), Some("last_name"));
}

#[test]
fn test_decode_from_http_request() {
    let mut params = Params::new();
    params.push("id", "42");

    let mut req = Request::builder()
        .method(Method::PATCH)
        .uri("/users/42?firstName=Ada%20L")
        .extension(params)
        .body(Bytes::from_static(br#"{"lastName":"Lovelace"}"#))
        .unwrap();

    let mut user = UpdateUser::default();
    decode(&mut req, &mut user).unwrap();

    assert_eq!(user.id, 42);
    assert_eq!(user.first_name, "Ada L");
    assert_eq!(user.last_name, "Lovelace");
    assert!(req.body().is_empty());
}

#[test]
fn test_bind_context_from_http_request() {
    let mut params = Params::new();
    params.push("id", "3");

    let req = Request::builder()
        .uri("/users/3?firstName=Grace")
        .extension(params)
        .body(Bytes::new())
        .unwrap();

    let mut ctx = BindContext::from_request(req);
    assert!(!ctx.has_body());

    let mut user = UpdateUser::default();
    decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.id, 3);
    assert_eq!(user.first_name, "Grace");
}

#[test]
fn test_registry_with_derived_types() {
    let mut registry = Registry::new();
    registry
        .register::<UpdateUser>()
        .unwrap()
        .register::<Everything>()
        .unwrap();
    assert!(registry.contains::<UpdateUser>());

    let mut ctx = update_user_request("9");
    let mut user = UpdateUser::default();
    registry.decode(&mut ctx, &mut user).unwrap();
    assert_eq!(user.id, 9);
}

#[test]
fn test_non_record_destination_is_untouched() {
    let registry = Registry::new();
    let mut ctx = update_user_request("1");
    let mut dest = String::from("unchanged");

    let err = registry.decode(&mut ctx, &mut dest).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotARecord);
    assert_eq!(dest, "unchanged");
    assert!(ctx.has_body());
}

proptest! {
    #[test]
    fn prop_path_has_priority(path_id in any::<i64>(), other in any::<i64>()) {
        let uri: Uri = format!("/?id={other}").parse().unwrap();
        let mut ctx = BindContextBuilder::new()
            .uri(uri)
            .path_param("id", path_id.to_string())
            .json_body(&json!({"id": other}))
            .build();
        let mut user = UpdateUser::default();

        decode(&mut ctx, &mut user).unwrap();
        prop_assert_eq!(user.id, path_id);
    }

    #[test]
    fn prop_absent_keys_keep_zero_values(id in any::<i64>()) {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", id.to_string())
            .json_body(&json!({}))
            .build();
        let mut user = UpdateUser::default();

        decode(&mut ctx, &mut user).unwrap();
        prop_assert_eq!(user.first_name, "");
        prop_assert_eq!(user.last_name, "");
    }

    #[test]
    fn prop_non_string_last_name_aborts(n in any::<i64>()) {
        let mut ctx = BindContextBuilder::new()
            .path_param("id", "1")
            .json_body(&json!({"lastName": n}))
            .build();
        let mut user = UpdateUser::default();

        let err = decode(&mut ctx, &mut user).unwrap_err();
        prop_assert_eq!(err.kind(), ErrorKind::TypeMismatch);
    }

    #[test]
    fn prop_analysis_is_deterministic(_round in 0u8..8) {
        let first: Vec<_> = analyze::<Everything>()
            .fields()
            .map(|f| (f.name(), f.source()))
            .collect();
        let second: Vec<_> = analyze::<Everything>()
            .fields()
            .map(|f| (f.name(), f.source()))
            .collect();
        prop_assert_eq!(first, second);
    }
}
