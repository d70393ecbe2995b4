//! Session state definitions
//!
//! A [`Session`] is owned exclusively by the session manager and handed to the
//! query engine read-only. There is no ambient global session value: callers
//! construct one client, and that client threads its session through every
//! request.

use serde::{Deserialize, Serialize};

/// Default AJAX rollout marker before a real value is parsed from the
/// homepage config
const INITIAL_ROLLOUT_VALUE: u64 = 1;

/// Lifecycle states of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// No token established
    Anonymous,
    /// A login round-trip is in flight
    Authenticating,
    /// A CSRF token is established and usable
    Authenticated,
    /// Session bootstrap failed fatally; absorbing state
    Failed,
}

/// Mutable authentication state threaded through every request.
///
/// Invariant: `authenticated()` holds exactly when `csrf_token` is set, and
/// `user_id` is only meaningful while authenticated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Anti-forgery token required on authenticated calls
    pub csrf_token: Option<String>,
    /// Viewer id of the logged-in user
    pub user_id: Option<String>,
    /// Rollout marker echoed in the AJAX header on every request
    pub rollout_value: u64,
    /// Current lifecycle state
    pub state: SessionState,
}

impl Session {
    /// Create an empty, anonymous session
    pub fn new() -> Self {
        Self {
            csrf_token: None,
            user_id: None,
            rollout_value: INITIAL_ROLLOUT_VALUE,
            state: SessionState::Anonymous,
        }
    }

    /// Whether a CSRF token is currently established
    pub fn authenticated(&self) -> bool {
        self.csrf_token.is_some()
    }

    /// Token value for the current call, if any
    pub fn csrf_token(&self) -> Option<&str> {
        self.csrf_token.as_deref()
    }

    /// Reset to the empty anonymous state
    pub fn reset(&mut self) {
        *self = Session::new();
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
