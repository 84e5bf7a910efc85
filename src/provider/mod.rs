//! Injected interface to the managed identity provider.
//!
//! All identity state, password hashing, token issuance, and session
//! validation live behind this seam; the gateway and the session store only
//! ever talk to [`IdentityProvider`], so tests can substitute a fake.

pub mod client;
pub mod types;

pub use client::ProviderClient;
pub use types::{Session, User};

use async_trait::async_trait;
use std::fmt;
use tokio::sync::mpsc;
use url::Url;

/// Errors from the identity provider seam.
#[derive(Clone, Debug)]
pub enum ProviderError {
    /// The provider refused the operation; the message is passed through verbatim.
    Rejected { status: u16, message: String },
    /// The request never completed (connect, timeout, TLS, ...).
    Transport(String),
    /// The provider answered but the body was missing expected fields.
    Malformed(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { status, message } => {
                write!(formatter, "Provider rejected request ({status}): {message}")
            }
            Self::Transport(message) => write!(formatter, "Provider unreachable: {message}"),
            Self::Malformed(message) => write!(formatter, "Malformed provider response: {message}"),
        }
    }
}

impl std::error::Error for ProviderError {}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Cancellable subscription to session transitions.
///
/// Events are delivered first-in-first-out, one at a time; each event carries
/// the candidate session (`Some`) or a sign-out (`None`). Dropping the handle
/// unsubscribes.
#[derive(Debug)]
pub struct SessionEvents {
    rx: mpsc::UnboundedReceiver<Option<Session>>,
}

impl SessionEvents {
    #[must_use]
    pub fn new(rx: mpsc::UnboundedReceiver<Option<Session>>) -> Self {
        Self { rx }
    }

    /// Next session transition, `None` once the provider side is gone.
    pub async fn next(&mut self) -> Option<Option<Session>> {
        self.rx.recv().await
    }
}

/// Capability set of the managed identity provider.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create a user through the admin API, email pre-confirmed.
    async fn create_user(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, ProviderError>;

    /// Exchange credentials for a session.
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, ProviderError>;

    /// Currently held session, if any.
    async fn get_session(&self) -> Result<Option<Session>, ProviderError>;

    /// Subscribe to session transitions.
    fn on_session_change(&self) -> SessionEvents;

    /// Clear the held session, revoking it provider-side when possible.
    async fn sign_out(&self) -> Result<(), ProviderError>;

    /// Dispatch a password-reset email linking back to `redirect_to`.
    async fn send_password_reset(&self, email: &str, redirect_to: &str)
        -> Result<(), ProviderError>;

    /// URL for an OAuth consent flow; pure construction, no network call.
    fn oauth_redirect_url(&self, provider: &str, redirect_to: &str) -> Result<Url, ProviderError>;

    /// Best-effort secondary profile write after account creation.
    async fn upsert_profile(&self, user: &User) -> Result<(), ProviderError>;

    /// Adopt a session issued elsewhere (e.g. returned by the gateway).
    async fn set_session(&self, session: Session) -> Result<(), ProviderError>;
}
