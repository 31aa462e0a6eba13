//! Session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Read by route guards and the dashboard header; written by the login
//! flow, the one-shot session check, and auth-change notifications.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::net::types::User;

/// The current user plus the initial-check loading flag.
///
/// `loading` starts true and is set false exactly once, when the one-shot
/// session check on dashboard mount resolves — on both the signed-in and
/// the redirect path.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}

impl SessionState {
    /// Record the outcome of the one-shot session check.
    pub fn resolve(&mut self, user: Option<User>) {
        self.user = user;
        self.loading = false;
    }

    pub fn is_authenticated(&self) -> bool {
        !self.loading && self.user.is_some()
    }
}
