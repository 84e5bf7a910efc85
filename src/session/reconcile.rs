//! Session reconciliation: turns provider session-change events plus the
//! stored intent into the authoritative auth state.
//!
//! The interesting case is a sign-in that silently provisioned a brand-new
//! account (some provider configurations create a missing account instead of
//! failing the credential exchange). The provider exposes no "was just
//! created" flag on the sign-in path, so account age stands in for it: a
//! session younger than [`NEW_ACCOUNT_THRESHOLD_MS`] under a `SignIn` intent
//! is rejected and signed out. Known limitation: a legitimate new user who
//! returns through the sign-in form within the threshold of signing up is
//! misclassified.

use crate::provider::{IdentityProvider, ProviderError, Session, SessionEvents};
use crate::session::intent::{Intent, IntentStore};
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, warn};

/// Sessions younger than this under a `SignIn` intent are treated as
/// spuriously created accounts.
pub const NEW_ACCOUNT_THRESHOLD_MS: i64 = 60_000;

/// User-facing message for a sign-in that auto-created an account.
pub const SIGNIN_ON_FRESH_ACCOUNT: &str =
    "Account does not exist. Please use Sign Up to create an account.";

/// Authoritative auth state, recomputed per event and never merged.
#[derive(Clone, Debug, PartialEq)]
pub enum AuthState {
    /// No event has resolved yet.
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

/// Reconciliation state machine over the provider's event stream.
///
/// Constructor-injected provider and intent store, explicit lifecycle:
/// [`init`](Self::init) subscribes and reconciles the current session,
/// [`run`](Self::run) consumes events one at a time, dropping the returned
/// subscription disposes it. Each event is processed to completion before the
/// next is observed.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    intent: Arc<dyn IntentStore>,
    state: AuthState,
    error: Option<String>,
}

impl SessionStore {
    #[must_use]
    pub fn new(provider: Arc<dyn IdentityProvider>, intent: Arc<dyn IntentStore>) -> Self {
        Self {
            provider,
            intent,
            state: AuthState::Loading,
            error: None,
        }
    }

    /// Subscribe to session changes and reconcile the current session as the
    /// first event.
    ///
    /// The subscription is taken before the session fetch so a transition
    /// racing the fetch is still observed; whichever write lands later wins.
    ///
    /// # Errors
    /// Returns an error if the initial session fetch fails.
    pub async fn init(&mut self) -> Result<SessionEvents, ProviderError> {
        let events = self.provider.on_session_change();
        let session = self.provider.get_session().await?;
        self.apply(session).await;
        Ok(events)
    }

    /// Consume session events until the subscription closes.
    pub async fn run(&mut self, events: &mut SessionEvents) {
        while let Some(event) = events.next().await {
            self.apply(event).await;
        }
    }

    /// Reconcile one session-change event.
    pub async fn apply(&mut self, session: Option<Session>) {
        self.error = None;

        let Some(session) = session else {
            self.state = AuthState::Unauthenticated;
            return;
        };

        // Read-then-clear in one synchronous step; a consumed intent must
        // never influence a later, unrelated event.
        match self.intent.get() {
            Some(Intent::SignIn) => {
                self.intent.clear();

                let age_ms = Utc::now()
                    .signed_duration_since(session.user.created_at)
                    .num_milliseconds();

                if age_ms < NEW_ACCOUNT_THRESHOLD_MS {
                    debug!(
                        user_id = %session.user.id,
                        age_ms, "Sign-in resolved to a freshly created account, rejecting"
                    );

                    // Sign-out failures are not special; the UI must not be
                    // left looking authenticated.
                    if let Err(err) = self.provider.sign_out().await {
                        warn!("Sign-out after rejected sign-in failed: {err}");
                    }

                    self.state = AuthState::Unauthenticated;
                    self.error = Some(SIGNIN_ON_FRESH_ACCOUNT.to_string());
                    return;
                }

                self.state = AuthState::Authenticated(session);
            }
            Some(Intent::SignUp) => {
                self.intent.clear();
                self.state = AuthState::Authenticated(session);
            }
            None => {
                self.state = AuthState::Authenticated(session);
            }
        }
    }

    #[must_use]
    pub fn state(&self) -> &AuthState {
        &self.state
    }

    /// Transient error message from the last reconciliation, if any.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True until the first event has resolved.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.state, AuthState::Loading)
    }
}
