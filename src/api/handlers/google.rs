use axum::{
    extract::Extension, http::StatusCode, response::IntoResponse, response::Response, Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::provider_error_response;
use crate::api::handlers::types::{ErrorResponse, OAuthUrlResponse};
use crate::api::GatewayConfig;
use crate::provider::IdentityProvider;

#[utoipa::path(
    post,
    path = "/api/auth/google",
    responses(
        (status = 200, description = "OAuth consent URL", body = OAuthUrlResponse, content_type = "application/json"),
        (status = 400, description = "Provider rejection", body = ErrorResponse),
        (status = 500, description = "Unexpected failure", body = ErrorResponse),
    ),
    tag = "auth"
)]
#[instrument(skip(provider, config))]
pub async fn google(
    Extension(provider): Extension<Arc<dyn IdentityProvider>>,
    Extension(config): Extension<Arc<GatewayConfig>>,
) -> Response {
    match provider.oauth_redirect_url("google", config.oauth_redirect_url()) {
        Ok(url) => (
            StatusCode::OK,
            Json(OAuthUrlResponse {
                url: url.to_string(),
            }),
        )
            .into_response(),
        Err(err) => provider_error_response(&err, StatusCode::BAD_REQUEST),
    }
}
