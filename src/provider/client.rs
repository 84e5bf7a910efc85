//! HTTP client for a GoTrue-compatible identity provider.
//!
//! The client holds the most recent session and fans every transition out to
//! `on_session_change` subscribers in order, so the reconciliation layer sees
//! the same event stream the provider SDKs expose.

use crate::api::APP_USER_AGENT;
use crate::cli::globals::GlobalArgs;
use crate::provider::{IdentityProvider, ProviderError, Session, SessionEvents, User};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde_json::{json, Value};
use std::sync::Mutex;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, instrument};
use url::Url;

pub struct ProviderClient {
    http: Client,
    base_url: String,
    rest_url: String,
    service_key: SecretString,
    session: RwLock<Option<Session>>,
    subscribers: Mutex<Vec<mpsc::UnboundedSender<Option<Session>>>>,
}

impl ProviderClient {
    /// Build a client from the CLI globals.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(globals: &GlobalArgs) -> Result<Self> {
        let http = Client::builder().user_agent(APP_USER_AGENT).build()?;

        Ok(Self {
            http,
            base_url: globals.provider_url.trim_end_matches('/').to_string(),
            rest_url: globals.provider_rest_url.trim_end_matches('/').to_string(),
            service_key: globals.provider_key.clone(),
            session: RwLock::new(None),
            subscribers: Mutex::new(Vec::new()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Replace the held session and notify subscribers in FIFO order.
    async fn store_session(&self, session: Option<Session>) {
        {
            let mut slot = self.session.write().await;
            *slot = session.clone();
        }
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.retain(|tx| tx.send(session.clone()).is_ok());
        }
    }

    async fn rejected(url: &str, response: Response) -> ProviderError {
        let status = response.status();
        let message = match response.json::<Value>().await {
            Ok(body) => provider_message(&body)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed"))
                .to_string(),
            Err(_) => status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string(),
        };

        debug!("{url} - {status}, {message}");

        ProviderError::Rejected {
            status: status.as_u16(),
            message,
        }
    }
}

/// Providers are inconsistent about the error field name.
fn provider_message(body: &Value) -> Option<&str> {
    ["msg", "message", "error_description", "error"]
        .iter()
        .find_map(|key| body[key].as_str())
}

fn user_from_value(value: &Value) -> Result<User, ProviderError> {
    let id = value["id"]
        .as_str()
        .ok_or_else(|| ProviderError::Malformed("no user id in response".to_string()))?;

    let email = value["email"]
        .as_str()
        .ok_or_else(|| ProviderError::Malformed("no email in response".to_string()))?;

    let created_at = value["created_at"]
        .as_str()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
        .ok_or_else(|| ProviderError::Malformed("no created_at in response".to_string()))?;

    let display_name = value["user_metadata"]["full_name"]
        .as_str()
        .map(ToString::to_string);

    Ok(User {
        id: id.to_string(),
        email: email.to_string(),
        created_at,
        display_name,
    })
}

fn session_from_value(value: &Value) -> Result<Session, ProviderError> {
    let access_token = value["access_token"]
        .as_str()
        .ok_or_else(|| ProviderError::Malformed("no access_token in response".to_string()))?;

    Ok(Session {
        access_token: access_token.to_string(),
        refresh_token: value["refresh_token"].as_str().map(ToString::to_string),
        token_type: value["token_type"].as_str().map(ToString::to_string),
        expires_in: value["expires_in"].as_u64(),
        user: user_from_value(&value["user"])?,
    })
}

#[async_trait]
impl IdentityProvider for ProviderClient {
    #[instrument(skip(self, password))]
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ProviderError> {
        let url = self.endpoint("/admin/users");

        // email_confirm skips the verification mail, matching the admin flow.
        let payload = json!({
            "email": email,
            "password": password,
            "email_confirm": true,
            "user_metadata": { "full_name": name },
        });

        let response = self
            .http
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(&url, response).await);
        }

        let body: Value = response.json().await?;
        user_from_value(&body)
    }

    #[instrument(skip(self, password))]
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError> {
        let url = self.endpoint("/token?grant_type=password");

        let payload = json!({ "email": email, "password": password });

        let response = self
            .http
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(&url, response).await);
        }

        let body: Value = response.json().await?;
        let session = session_from_value(&body)?;

        self.store_session(Some(session.clone())).await;

        Ok(session)
    }

    async fn get_session(&self) -> Result<Option<Session>, ProviderError> {
        Ok(self.session.read().await.clone())
    }

    fn on_session_change(&self) -> SessionEvents {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(tx);
        }
        SessionEvents::new(rx)
    }

    #[instrument(skip(self))]
    async fn sign_out(&self) -> Result<(), ProviderError> {
        let held = self.session.write().await.take();

        // The local session is gone either way; subscribers observe the
        // sign-out even if the revocation call below fails.
        self.store_session(None).await;

        let Some(session) = held else {
            return Ok(());
        };

        let url = self.endpoint("/logout");
        let response = self
            .http
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(&session.access_token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(&url, response).await);
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn send_password_reset(
        &self,
        email: &str,
        redirect_to: &str,
    ) -> Result<(), ProviderError> {
        let url = self.endpoint("/recover");

        let response = self
            .http
            .post(&url)
            .query(&[("redirect_to", redirect_to)])
            .header("apikey", self.service_key.expose_secret())
            .json(&json!({ "email": email }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(&url, response).await);
        }

        Ok(())
    }

    fn oauth_redirect_url(&self, provider: &str, redirect_to: &str) -> Result<Url, ProviderError> {
        Url::parse_with_params(
            &self.endpoint("/authorize"),
            [("provider", provider), ("redirect_to", redirect_to)],
        )
        .map_err(|err| ProviderError::Malformed(format!("invalid authorize URL: {err}")))
    }

    #[instrument(skip(self, user), fields(user_id = %user.id))]
    async fn upsert_profile(&self, user: &User) -> Result<(), ProviderError> {
        let url = format!("{}/users", self.rest_url);

        let payload = json!({
            "id": user.id,
            "email": user.email,
            "display_name": user.display_name,
            "created_at": user.created_at.to_rfc3339(),
            "user_uid": user.id,
        });

        let response = self
            .http
            .post(&url)
            .header("apikey", self.service_key.expose_secret())
            .bearer_auth(self.service_key.expose_secret())
            .header("Prefer", "resolution=merge-duplicates")
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::rejected(&url, response).await);
        }

        Ok(())
    }

    async fn set_session(&self, session: Session) -> Result<(), ProviderError> {
        self.store_session(Some(session)).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn globals() -> GlobalArgs {
        let mut globals = GlobalArgs::new("https://id.example.com/auth/v1/".to_string());
        globals.set_key(SecretString::from("service-key".to_string()));
        globals
    }

    #[test]
    fn oauth_redirect_url_carries_provider_and_redirect() {
        let client = ProviderClient::new(&globals()).expect("client");
        let url = client
            .oauth_redirect_url("google", "http://localhost:5173/dashboard")
            .expect("url");

        assert!(url.as_str().starts_with(
            "https://id.example.com/auth/v1/authorize?provider=google&redirect_to="
        ));
    }

    #[test]
    fn provider_message_prefers_msg_field() {
        let body = json!({ "msg": "boom", "error": "other" });
        assert_eq!(provider_message(&body), Some("boom"));
        let body = json!({ "error_description": "nope" });
        assert_eq!(provider_message(&body), Some("nope"));
        assert_eq!(provider_message(&json!({})), None);
    }

    #[test]
    fn user_from_value_requires_created_at() {
        let missing = json!({ "id": "u1", "email": "a@b.c" });
        assert!(matches!(
            user_from_value(&missing),
            Err(ProviderError::Malformed(_))
        ));

        let ok = json!({
            "id": "u1",
            "email": "a@b.c",
            "created_at": "2024-05-01T12:00:00Z",
            "user_metadata": { "full_name": "Ada" }
        });
        let user = user_from_value(&ok).expect("user");
        assert_eq!(user.display_name.as_deref(), Some("Ada"));
    }

    #[tokio::test]
    async fn session_transitions_reach_subscribers_in_order() {
        let client = ProviderClient::new(&globals()).expect("client");
        let mut events = client.on_session_change();

        let session = Session {
            access_token: "at".to_string(),
            refresh_token: None,
            token_type: None,
            expires_in: None,
            user: User {
                id: "u1".to_string(),
                email: "a@b.c".to_string(),
                created_at: Utc::now(),
                display_name: None,
            },
        };

        client.set_session(session.clone()).await.expect("set");
        client.store_session(None).await;

        assert_eq!(events.next().await, Some(Some(session)));
        assert_eq!(events.next().await, Some(None));
        assert_eq!(client.get_session().await.expect("get"), None);
    }
}
