use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, response::Response, Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::{bad_request, provider_error_response};
use crate::api::handlers::types::{ErrorResponse, SigninRequest, SigninResponse};
use crate::provider::IdentityProvider;

#[utoipa::path(
    post,
    path = "/api/auth/signin",
    request_body = SigninRequest,
    responses(
        (status = 200, description = "Login successful", body = SigninResponse, content_type = "application/json"),
        (status = 401, description = "Provider rejected the credentials", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, payload))]
pub async fn signin(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    payload: Option<Json<SigninRequest>>,
) -> Response {
    let Some(Json(payload)) = payload else {
        return bad_request("Missing payload");
    };

    let email = payload.email.trim();
    let password = payload.password.trim();

    if email.is_empty() || password.is_empty() {
        return bad_request("Missing email or password");
    }

    match provider.sign_in_with_password(email, password).await {
        Ok(session) => {
            let user = session.user.clone();
            (
                StatusCode::OK,
                Json(SigninResponse {
                    message: "Login successful".to_string(),
                    user,
                    session,
                }),
            )
                .into_response()
        }
        Err(err) => provider_error_response(&err, StatusCode::UNAUTHORIZED),
    }
}
