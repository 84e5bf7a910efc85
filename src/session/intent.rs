//! Persisted auth intent, a single slot recording whether the user invoked
//! "sign in" or "sign up" before control left for a redirect-based flow.
//!
//! The slot has no TTL; it is cleared explicitly when reconciliation consumes
//! it. An abandoned redirect flow therefore leaves a stale value behind until
//! the next auth event, matching the behavior of the original storage key.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

/// Storage key/file name for the intent slot.
pub const INTENT_KEY: &str = "auth_intent";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    SignIn,
    SignUp,
}

impl Intent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signin",
            Self::SignUp => "signup",
        }
    }

    /// Parse the stored string form, `None` for anything unrecognized.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "signin" => Some(Self::SignIn),
            "signup" => Some(Self::SignUp),
            _ => None,
        }
    }
}

/// A single durable slot holding at most one [`Intent`].
///
/// `set` overwrites, `get` is side-effect free, `clear` is idempotent.
pub trait IntentStore: Send + Sync {
    fn set(&self, intent: Intent);
    fn get(&self) -> Option<Intent>;
    fn clear(&self);
}

/// In-process intent slot, used by tests and flows without a redirect hop.
#[derive(Debug, Default)]
pub struct MemoryIntentStore {
    slot: Mutex<Option<Intent>>,
}

impl MemoryIntentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IntentStore for MemoryIntentStore {
    fn set(&self, intent: Intent) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(intent);
        }
    }

    fn get(&self) -> Option<Intent> {
        self.slot.lock().ok().and_then(|slot| *slot)
    }

    fn clear(&self) {
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

/// File-backed intent slot surviving process restarts, the counterpart of the
/// browser storage key used by redirect-based OAuth flows.
#[derive(Debug)]
pub struct FileIntentStore {
    path: PathBuf,
}

impl FileIntentStore {
    /// Store the intent under `dir/auth_intent`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(INTENT_KEY),
        }
    }
}

impl IntentStore for FileIntentStore {
    fn set(&self, intent: Intent) {
        if let Err(err) = fs::write(&self.path, intent.as_str()) {
            warn!("Failed to persist intent to {}: {err}", self.path.display());
        }
    }

    fn get(&self) -> Option<Intent> {
        match fs::read_to_string(&self.path) {
            Ok(value) => Intent::parse(&value),
            Err(err) if err.kind() == ErrorKind::NotFound => None,
            Err(err) => {
                warn!("Failed to read intent from {}: {err}", self.path.display());
                None
            }
        }
    }

    fn clear(&self) {
        if let Err(err) = fs::remove_file(&self.path) {
            if err.kind() != ErrorKind::NotFound {
                warn!("Failed to clear intent at {}: {err}", self.path.display());
            }
        }
    }
}
