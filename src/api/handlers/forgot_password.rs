use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, response::Response, Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{bad_request, provider_error_response, valid_email};
use crate::api::handlers::types::{ErrorResponse, ForgotPasswordRequest, MessageResponse};
use crate::api::GatewayConfig;
use crate::provider::IdentityProvider;

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset email dispatched", body = MessageResponse, content_type = "application/json"),
        (status = 400, description = "Invalid input or provider rejection", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, config, payload))]
pub async fn forgot_password(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
    payload: Option<Json<ForgotPasswordRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return bad_request("Missing payload");
    };

    let email = payload.email.trim();

    if email.is_empty() || !valid_email(email) {
        return bad_request("Invalid email address");
    }

    match provider
        .send_password_reset(email, config.reset_redirect_url())
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Password reset email sent".to_string(),
            }),
        )
            .into_response(),
        Err(err) => provider_error_response(&err, StatusCode::BAD_REQUEST),
    }
}
