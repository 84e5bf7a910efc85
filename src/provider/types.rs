//! Identity artifacts consumed from the provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Provider-owned user; the id is opaque to this crate.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct User {
    pub id: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Opaque authenticated-identity artifact issued by the provider.
///
/// Held only transiently; the provider owns its lifecycle.
#[derive(ToSchema, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{Context, Result};

    #[test]
    fn user_serializes_without_empty_display_name() -> Result<()> {
        let user = User {
            id: "4f1c".to_string(),
            email: "alice@example.com".to_string(),
            created_at: Utc::now(),
            display_name: None,
        };
        let value = serde_json::to_value(&user)?;
        assert!(value.get("display_name").is_none());
        assert_eq!(
            value.get("email").and_then(serde_json::Value::as_str),
            Some("alice@example.com")
        );
        Ok(())
    }

    #[test]
    fn session_round_trips_with_rfc3339_created_at() -> Result<()> {
        let raw = serde_json::json!({
            "access_token": "at",
            "refresh_token": "rt",
            "token_type": "bearer",
            "expires_in": 3600,
            "user": {
                "id": "u1",
                "email": "bob@example.com",
                "created_at": "2024-05-01T12:00:00Z",
                "display_name": "Bob"
            }
        });
        let session: Session = serde_json::from_value(raw)?;
        assert_eq!(session.user.display_name.as_deref(), Some("Bob"));
        let created = session.user.created_at.to_rfc3339();
        assert!(created.starts_with("2024-05-01T12:00:00"), "{created}");

        let value = serde_json::to_value(&session)?;
        let token = value
            .get("access_token")
            .and_then(serde_json::Value::as_str)
            .context("missing access_token")?;
        assert_eq!(token, "at");
        Ok(())
    }
}
