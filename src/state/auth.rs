#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::net::types::User;

/// Authentication state for the storefront session.
///
/// `loading` starts true and clears once `/api/auth/me` resolves, so the
/// chat toggle guard can tell "not signed in" from "still checking".
#[derive(Clone, Debug)]
pub struct AuthState {
    pub user: Option<User>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self { user: None, loading: true }
    }
}
