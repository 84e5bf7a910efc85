pub mod health;
pub use self::health::health;

pub mod signup;
pub use self::signup::signup;

pub mod signin;
pub use self::signin::signin;

pub mod forgot_password;
pub use self::forgot_password::forgot_password;

pub mod google;
pub use self::google::google;

pub mod types;

// common functions for the handlers
use crate::provider::ProviderError;
use axum::{http::StatusCode, response::IntoResponse, Json};
use regex::Regex;
use tracing::error;
use types::ErrorResponse;

pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// 400 with a field-level message.
pub(crate) fn bad_request(message: &str) -> axum::response::Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Map a provider error to the caller-facing response.
///
/// Rejections surface the provider's message verbatim under `rejected_status`;
/// anything else becomes an opaque 500 with the detail kept in the logs.
pub(crate) fn provider_error_response(
    err: &ProviderError,
    rejected_status: StatusCode,
) -> axum::response::Response {
    match err {
        ProviderError::Rejected { message, .. } => (
            rejected_status,
            Json(ErrorResponse {
                error: message.clone(),
            }),
        )
            .into_response(),
        other => {
            error!("Identity provider call failed: {other}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal Server Error".to_string(),
                }),
            )
                .into_response()
        }
    }
}
