//! # Password Reset Tokens
//!
//! Short-lived, single-attempt tokens held in process memory.
//!
//! ## Token Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  issue(email, now)                                                     │
//! │     └── tokens[email] = { token: uuid v4, expires_at: now + ttl }      │
//! │         (any previous token for that email is overwritten)             │
//! │                                                                         │
//! │  consume(email, token, now)                                            │
//! │     ├── no entry                     → false                           │
//! │     ├── entry removed (always)                                         │
//! │     ├── token mismatch               → false                           │
//! │     ├── now >= expires_at            → false                           │
//! │     └── otherwise                    → true                            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Token and expiry live in one record behind one lock, so an `issue` and a
//! `consume` for the same email can never interleave half-way.
//!
//! Tokens do not survive a restart.

use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use uuid::Uuid;

use crate::RESET_TOKEN_TTL_MINUTES;

#[derive(Debug, Clone)]
struct ResetToken {
    token: String,
    expires_at: DateTime<Utc>,
}

/// In-memory registry of outstanding reset tokens, at most one per email.
#[derive(Debug)]
pub struct ResetTokenRegistry {
    ttl: Duration,
    tokens: Mutex<HashMap<String, ResetToken>>,
}

impl Default for ResetTokenRegistry {
    fn default() -> Self {
        Self::new(Duration::minutes(RESET_TOKEN_TTL_MINUTES))
    }
}

impl ResetTokenRegistry {
    /// Creates an empty registry whose tokens live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        ResetTokenRegistry {
            ttl,
            tokens: Mutex::new(HashMap::new()),
        }
    }

    /// Token lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issues a fresh token for `email`, replacing any outstanding one.
    ///
    /// The caller is responsible for checking that the account exists.
    pub fn issue(&self, email: &str, now: DateTime<Utc>) -> String {
        let token = Uuid::new_v4().to_string();
        let record = ResetToken {
            token: token.clone(),
            expires_at: now + self.ttl,
        };
        self.lock().insert(email.to_string(), record);
        token
    }

    /// Checks and discards the token for `email`.
    ///
    /// Returns `true` only for a matching, unexpired token. The stored token
    /// is removed on every attempt, so a wrong guess burns it.
    pub fn consume(&self, email: &str, token: &str, now: DateTime<Utc>) -> bool {
        match self.lock().remove(email) {
            Some(record) => record.token == token && now < record.expires_at,
            None => false,
        }
    }

    /// Number of emails with an outstanding token.
    pub fn outstanding(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, ResetToken>> {
        // The map holds no invariant a panicking holder could break.
        self.tokens.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
