//! Gateway integration tests: the axum router driven end to end against a
//! mocked identity provider.

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pordego::api::{router, GatewayConfig};
use pordego::cli::globals::GlobalArgs;
use pordego::provider::ProviderClient;
use secrecy::SecretString;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FRONTEND_URL: &str = "http://localhost:5173";

fn provider_user() -> Value {
    json!({
        "id": "user-1",
        "email": "alice@example.com",
        "created_at": "2024-05-01T12:00:00Z",
        "user_metadata": { "full_name": "Alice" }
    })
}

fn provider_session() -> Value {
    json!({
        "access_token": "jwt-access",
        "refresh_token": "jwt-refresh",
        "token_type": "bearer",
        "expires_in": 3600,
        "user": provider_user()
    })
}

fn gateway(mock: &MockServer) -> Result<Router> {
    let mut globals = GlobalArgs::new(mock.uri());
    globals.set_key(SecretString::from("service-key".to_string()));

    let provider = Arc::new(ProviderClient::new(&globals)?);
    let config = Arc::new(GatewayConfig::new(FRONTEND_URL.to_string()));

    router(provider, config)
}

fn post_json(uri: &str, body: Value) -> Result<Request<Body>> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body)?))
        .context("failed to build request")
}

async fn body_json(response: axum::response::Response) -> Result<Value> {
    let bytes = response.into_body().collect().await?.to_bytes();
    serde_json::from_slice(&bytes).context("response body is not JSON")
}

#[tokio::test]
async fn signup_creates_a_user_and_returns_a_session() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .and(body_partial_json(json!({
            "email": "alice@example.com",
            "email_confirm": true,
            "user_metadata": { "full_name": "Alice" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .expect(1)
        .mount(&mock)
        .await;

    Mock::given(method("POST"))
        .and(path("/rest/users"))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&mock)
        .await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_session()))
        .expect(1)
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signup",
        json!({ "email": "alice@example.com", "password": "hunter22", "name": "Alice" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(
        body["message"].as_str(),
        Some("User created successfully")
    );
    assert_eq!(body["user"]["id"].as_str(), Some("user-1"));
    assert_eq!(body["session"]["access_token"].as_str(), Some("jwt-access"));
    Ok(())
}

#[tokio::test]
async fn signup_survives_profile_write_and_signin_failures() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_user()))
        .mount(&mock)
        .await;

    // Profile write fails; the request must still report success.
    Mock::given(method("POST"))
        .and(path("/rest/users"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "boom" })))
        .mount(&mock)
        .await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error_description": "Email not confirmed" })),
        )
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signup",
        json!({ "email": "alice@example.com", "password": "hunter22", "name": "Alice" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = body_json(response).await?;
    assert_eq!(
        body["message"].as_str(),
        Some("User created, please sign in")
    );
    assert!(body.get("session").is_none());
    Ok(())
}

#[tokio::test]
async fn signup_passes_provider_rejection_through_as_400() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/admin/users"))
        .respond_with(
            ResponseTemplate::new(422)
                .set_body_json(json!({ "msg": "User already registered" })),
        )
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signup",
        json!({ "email": "alice@example.com", "password": "hunter22", "name": "Alice" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await?;
    assert_eq!(body["error"].as_str(), Some("User already registered"));
    Ok(())
}

#[tokio::test]
async fn signup_rejects_invalid_input_before_calling_the_provider() -> Result<()> {
    let mock = MockServer::start().await;
    let app = gateway(&mock)?;

    let request = post_json(
        "/api/auth/signup",
        json!({ "email": "not-an-email", "password": "hunter22", "name": "Alice" }),
    )?;
    let response = app.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["error"].as_str(), Some("Invalid email address"));

    // Whitespace-only fields are missing fields.
    let request = post_json(
        "/api/auth/signup",
        json!({ "email": " ", "password": " ", "name": " " }),
    )?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // No provider mock was mounted; reaching it would have failed the test
    // with a 500 instead of the 400s above.
    Ok(())
}

#[tokio::test]
async fn missing_payload_is_a_400() -> Result<()> {
    let mock = MockServer::start().await;
    let app = gateway(&mock)?;

    let request = Request::builder()
        .method("POST")
        .uri("/api/auth/signin")
        .body(Body::empty())?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await?;
    assert_eq!(body["error"].as_str(), Some("Missing payload"));
    Ok(())
}

#[tokio::test]
async fn signin_returns_the_provider_session() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .and(query_param("grant_type", "password"))
        .and(body_partial_json(json!({ "email": "alice@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(provider_session()))
        .expect(1)
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signin",
        json!({ "email": "alice@example.com", "password": "hunter22" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["message"].as_str(), Some("Login successful"));
    assert_eq!(body["user"]["email"].as_str(), Some("alice@example.com"));
    assert_eq!(body["session"]["refresh_token"].as_str(), Some("jwt-refresh"));
    Ok(())
}

#[tokio::test]
async fn signin_rejection_is_a_401_with_the_provider_message() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({ "error_description": "Invalid login credentials" })),
        )
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signin",
        json!({ "email": "alice@example.com", "password": "wrong" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = body_json(response).await?;
    assert_eq!(body["error"].as_str(), Some("Invalid login credentials"));
    Ok(())
}

#[tokio::test]
async fn malformed_provider_response_is_an_opaque_500() -> Result<()> {
    let mock = MockServer::start().await;

    // 200 without an access_token.
    Mock::given(method("POST"))
        .and(path("/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/signin",
        json!({ "email": "alice@example.com", "password": "hunter22" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await?;
    assert_eq!(body["error"].as_str(), Some("Internal Server Error"));
    Ok(())
}

#[tokio::test]
async fn forgot_password_dispatches_a_reset_email() -> Result<()> {
    let mock = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/recover"))
        .and(query_param(
            "redirect_to",
            "http://localhost:5173/reset-password",
        ))
        .and(body_partial_json(json!({ "email": "alice@example.com" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&mock)
        .await;

    let app = gateway(&mock)?;
    let request = post_json(
        "/api/auth/forgot-password",
        json!({ "email": "alice@example.com" }),
    )?;

    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    assert_eq!(body["message"].as_str(), Some("Password reset email sent"));
    Ok(())
}

#[tokio::test]
async fn forgot_password_requires_a_plausible_email() -> Result<()> {
    let mock = MockServer::start().await;
    let app = gateway(&mock)?;

    let request = post_json("/api/auth/forgot-password", json!({ "email": "nope" }))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn google_returns_the_consent_url_without_touching_the_network() -> Result<()> {
    let mock = MockServer::start().await;
    let app = gateway(&mock)?;

    let request = post_json("/api/auth/google", json!({}))?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await?;
    let url = body["url"].as_str().context("missing url")?;
    assert!(url.starts_with(&format!("{}/authorize?provider=google", mock.uri())));
    assert!(url.contains("redirect_to="));
    Ok(())
}

#[tokio::test]
async fn health_reports_name_version_and_build() -> Result<()> {
    let mock = MockServer::start().await;
    let app = gateway(&mock)?;

    let request = Request::builder().uri("/health").body(Body::empty())?;
    let response = app.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);

    let x_app = response
        .headers()
        .get("X-App")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(x_app.starts_with("pordego:"));

    let body = body_json(response).await?;
    assert_eq!(body["name"].as_str(), Some("pordego"));
    Ok(())
}
