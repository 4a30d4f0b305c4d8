//! Port exposing who is using the marketplace right now.

use crate::domain::UserId;

/// Source of the signed-in user's identity.
///
/// Returns `None` for anonymous visitors.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityProvider: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Identity provider for visitors who are not signed in.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnonymousIdentity;

impl IdentityProvider for AnonymousIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        None
    }
}

/// Identity provider pinned to one user, e.g. from a CLI flag or a session
/// resolved elsewhere.
#[derive(Debug, Clone)]
pub struct FixedIdentity(UserId);

impl FixedIdentity {
    pub const fn new(user_id: UserId) -> Self {
        Self(user_id)
    }
}

impl IdentityProvider for FixedIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        Some(self.0.clone())
    }
}
