use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use jsonwebtoken::{Algorithm, Header, encode};
use serde_json::Value;
use tower::ServiceExt; // for `oneshot`

use todo_tracker::{
    auth::{
        Claims,
        jwt::{JwtKeys, encode_token, make_access_claims, now_unix},
    },
    routes::app,
    test_helpers::{bearer_for, memory_state},
};

async fn get_todos(authorization: Option<String>) -> (StatusCode, Value) {
    let state = memory_state();
    let mut builder = Request::builder().uri("/todos");
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }
    let response = app(state)
        .oneshot(builder.body(Body::empty()).expect("request"))
        .await
        .expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json"))
}

#[tokio::test]
async fn missing_header_is_401() {
    let (status, body) = get_todos(None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Missing/invalid Authorization header");
}

#[tokio::test]
async fn non_bearer_scheme_is_401() {
    let (status, _) = get_todos(Some("Basic dXNlcjpwYXNz".to_string())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_401() {
    let foreign = JwtKeys::from_secret(b"not-the-server-secret");
    let token = encode_token(&foreign, &make_access_claims("intruder", 600)).expect("token");

    let (status, body) = get_todos(Some(format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(
        body["message"]
            .as_str()
            .is_some_and(|message| message.starts_with("Invalid or expired token"))
    );
}

#[tokio::test]
async fn expired_token_is_401() {
    let state = memory_state();
    let iat = now_unix().saturating_sub(7200);
    let claims = Claims {
        sub: "late".to_string(),
        iat,
        exp: iat + 60,
    };
    let token = encode(&Header::new(Algorithm::HS256), &claims, &state.jwt.enc).expect("token");

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/todos")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_todo_route_requires_a_token() {
    let state = memory_state();
    let router = app(state);

    for (method, uri) in [
        ("GET", "/todos"),
        ("POST", "/todos"),
        ("PUT", "/todos/1/completed"),
        ("DELETE", "/todos/1"),
    ] {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"name":"x"}"#))
            .expect("request");
        let response = router.clone().oneshot(request).await.expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNAUTHORIZED,
            "{method} {uri} should require a token"
        );
    }
}

#[tokio::test]
async fn valid_token_is_accepted() {
    let state = memory_state();
    let bearer = bearer_for(&state, "reader");

    let response = app(state)
        .oneshot(
            Request::builder()
                .uri("/todos")
                .header(header::AUTHORIZATION, bearer)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
}
