use crate::api::handlers;
use crate::api::handlers::types::{
    ErrorResponse, ForgotPasswordRequest, MessageResponse, OAuthUrlResponse, SigninRequest,
    SigninResponse, SignupRequest, SignupResponse,
};
use crate::provider::{Session, User};
use utoipa::OpenApi;

/// OpenAPI document for the gateway, served next to the Swagger UI.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "pordego",
        description = "Authentication gateway for a managed identity provider"
    ),
    paths(
        handlers::health::health,
        handlers::signup::signup,
        handlers::signin::signin,
        handlers::forgot_password::forgot_password,
        handlers::google::google,
    ),
    components(schemas(
        SignupRequest,
        SignupResponse,
        SigninRequest,
        SigninResponse,
        ForgotPasswordRequest,
        MessageResponse,
        OAuthUrlResponse,
        ErrorResponse,
        Session,
        User,
    )),
    tags(
        (name = "auth", description = "Signup, sign-in, password reset and OAuth initiation"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
