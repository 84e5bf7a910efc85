//! Client-side session state: the persisted auth intent and the
//! reconciliation state machine that turns provider session-change events
//! into the application's authoritative auth state.

pub mod intent;
pub mod reconcile;

pub use intent::{FileIntentStore, Intent, IntentStore, MemoryIntentStore};
pub use reconcile::{AuthState, SessionStore, NEW_ACCOUNT_THRESHOLD_MS, SIGNIN_ON_FRESH_ACCOUNT};
