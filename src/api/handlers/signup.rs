use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, response::Response, Json,
};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::{bad_request, provider_error_response, valid_email};
use crate::api::handlers::types::{ErrorResponse, SignupRequest, SignupResponse};
use crate::provider::IdentityProvider;

#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created", body = SignupResponse, content_type = "application/json"),
        (status = 400, description = "Invalid input or provider rejection", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn signup(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    payload: Option<Json<SignupRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return bad_request("Missing payload");
    };

    let email = payload.email.trim();
    let password = payload.password.trim();
    let name = payload.name.trim();

    if email.is_empty() || password.is_empty() || name.is_empty() {
        return bad_request("Missing email, password or name");
    }

    if !valid_email(email) {
        return bad_request("Invalid email address");
    }

    debug!("Signup attempt for: {email}");

    let user = match provider.create_user(email, password, name).await {
        Ok(user) => user,
        Err(err) => return provider_error_response(&err, StatusCode::BAD_REQUEST),
    };

    // Secondary profile write; the account already exists, so a failure here
    // is logged and the request still reports success.
    if let Err(err) = provider.upsert_profile(&user).await {
        warn!("Profile write after signup failed for {}: {err}", user.id);
    }

    // Immediate sign-in for a smoother first session; falling back to a
    // created-but-signed-out response if the provider declines.
    match provider.sign_in_with_password(email, password).await {
        Ok(session) => (
            StatusCode::CREATED,
            Json(SignupResponse {
                message: "User created successfully".to_string(),
                user,
                session: Some(session),
            }),
        )
            .into_response(),
        Err(err) => {
            warn!("Post-signup sign-in failed for {email}: {err}");
            (
                StatusCode::CREATED,
                Json(SignupResponse {
                    message: "User created, please sign in".to_string(),
                    user,
                    session: None,
                }),
            )
                .into_response()
        }
    }
}
