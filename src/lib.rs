//! # Pordego
//!
//! A thin authentication gateway in front of a managed identity provider.
//! The gateway validates and forwards signup, sign-in, password-reset, and
//! OAuth-initiation requests; the provider owns all identity state, password
//! hashing, and token issuance.
//!
//! The crate also ships the client-side session layer: a persisted auth
//! intent slot and the reconciliation state machine that decides, per
//! provider session-change event, whether a fresh session belongs to a
//! genuine sign-in or to an account the provider silently auto-created.

pub mod api;
pub mod cli;
pub mod provider;
pub mod session;
