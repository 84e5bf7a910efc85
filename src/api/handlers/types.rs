//! Request/response types for the gateway endpoints.

use crate::provider::{Session, User};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SignupResponse {
    pub message: String,
    pub user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SigninRequest {
    pub email: String,
    pub password: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct SigninResponse {
    pub message: String,
    pub user: User,
    pub session: Session,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct MessageResponse {
    pub message: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OAuthUrlResponse {
    pub url: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};
    use chrono::Utc;

    #[test]
    fn signup_request_round_trips() -> Result<()> {
        let request = SignupRequest {
            email: "alice@example.com".to_string(),
            password: "hunter22".to_string(),
            name: "Alice".to_string(),
        };
        let value = serde_json::to_value(&request)?;
        let email = value
            .get("email")
            .and_then(serde_json::Value::as_str)
            .context("missing email")?;
        assert_eq!(email, "alice@example.com");
        let decoded: SignupRequest = serde_json::from_value(value)?;
        assert_eq!(decoded.name, "Alice");
        Ok(())
    }

    #[test]
    fn signup_response_omits_absent_session() -> Result<()> {
        let response = SignupResponse {
            message: "User created, please sign in".to_string(),
            user: User {
                id: "u1".to_string(),
                email: "alice@example.com".to_string(),
                created_at: Utc::now(),
                display_name: Some("Alice".to_string()),
            },
            session: None,
        };
        let value = serde_json::to_value(&response)?;
        assert!(value.get("session").is_none());
        Ok(())
    }

    #[test]
    fn error_response_shape() -> Result<()> {
        let value = serde_json::to_value(ErrorResponse {
            error: "Invalid login credentials".to_string(),
        })?;
        assert_eq!(
            value.get("error").and_then(serde_json::Value::as_str),
            Some("Invalid login credentials")
        );
        Ok(())
    }
}
