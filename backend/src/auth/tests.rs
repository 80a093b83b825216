use super::*;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use jsonwebtoken::{EncodingKey, Header, encode};
use std::env;

const SECRET: &str = "supersecretjwtsecretforunittesting123";

fn set_env_vars() {
    unsafe {
        env::set_var("JWT_SECRET", SECRET);
    }
}

fn token(sub: &str, role: &str, exp: usize, secret: &str) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn parts_with(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/");
    if let Some(value) = authorization {
        builder = builder.header(axum::http::header::AUTHORIZATION, value);
    }
    let (parts, _) = builder.body(()).unwrap().into_parts();
    parts
}

#[test]
fn test_validate_jwt_success() {
    let token = token("7", "user", 9999999999, SECRET);

    let claims = validate_jwt(&token, SECRET).expect("Valid token should pass");
    assert_eq!(claims.sub, "7");
    assert_eq!(claims.email.as_deref(), Some("test@example.com"));
}

#[test]
fn test_validate_jwt_expired() {
    let token = token("7", "user", 1, SECRET);
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let token = token("7", "user", 9999999999, "wrongsecret");
    assert!(validate_jwt(&token, SECRET).is_err());
}

#[test]
fn test_non_numeric_subject_is_rejected() {
    let claims = Claims {
        sub: "123e4567-e89b-12d3-a456-426614174000".to_string(),
        role: "user".to_string(),
        email: None,
        exp: 9999999999,
    };
    assert!(auth_user_from_claims(claims).is_err());
}

#[tokio::test]
async fn test_extractor_requires_bearer_header() {
    set_env_vars();

    let mut parts = parts_with(None);
    let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

    let mut parts = parts_with(Some("Basic abc"));
    let err = AuthUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_extractor_builds_auth_user() {
    set_env_vars();
    let header = format!("Bearer {}", token("7", "user", 9999999999, SECRET));

    let mut parts = parts_with(Some(&header));
    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();

    assert_eq!(user.user_id, 7);
    assert!(!user.is_admin());
}

#[tokio::test]
async fn test_admin_extractor_forbids_regular_users() {
    set_env_vars();

    let header = format!("Bearer {}", token("7", "user", 9999999999, SECRET));
    let mut parts = parts_with(Some(&header));
    let err = AdminUser::from_request_parts(&mut parts, &()).await.unwrap_err();
    assert_eq!(err.into_response().status(), StatusCode::FORBIDDEN);

    let header = format!("Bearer {}", token("1", ADMIN_ROLE, 9999999999, SECRET));
    let mut parts = parts_with(Some(&header));
    let AdminUser(admin) = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(admin.user_id, 1);
}
