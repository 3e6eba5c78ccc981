//! # Credential Verification
//!
//! Every place that stores or checks a password goes through
//! [`CredentialVerifier`]: registration, login and password reset.
//!
//! The default [`PlaintextCredentials`] stores and compares passwords as
//! opaque text. This is a known weakness kept for compatibility with
//! existing accounts; switching to a hashing verifier means migrating the
//! stored values in the same release.

use std::fmt::Debug;

/// Turns a password into its stored form and checks attempts against it.
pub trait CredentialVerifier: Debug + Send + Sync {
    /// Value to persist for a newly chosen password.
    fn prepare(&self, password: &str) -> String;

    /// Whether `attempt` matches the `stored` value.
    fn verify(&self, attempt: &str, stored: &str) -> bool;
}

/// Stores passwords verbatim and compares with string equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlaintextCredentials;

impl CredentialVerifier for PlaintextCredentials {
    fn prepare(&self, password: &str) -> String {
        password.to_string()
    }

    fn verify(&self, attempt: &str, stored: &str) -> bool {
        attempt == stored
    }
}
