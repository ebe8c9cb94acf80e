//! Player identity seam.
//!
//! The tracker asks an [`IdentityProvider`] who is playing; leaderboard submission
//! needs the bearer token. Anything unauthenticated plays as the guest profile.

use std::sync::{Arc, RwLock};

pub trait IdentityProvider: Send + Sync {
    fn is_authenticated(&self) -> bool;
    /// Token for authenticated API calls, `None` for guests.
    fn bearer_token(&self) -> Option<String>;
    /// Display name of the signed-in player, `None` for guests.
    fn username(&self) -> Option<String>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GuestIdentity;

impl IdentityProvider for GuestIdentity {
    fn is_authenticated(&self) -> bool {
        false
    }

    fn bearer_token(&self) -> Option<String> {
        None
    }

    fn username(&self) -> Option<String> {
        None
    }
}

/// Fixed identity, e.g. from `--user` on the command line. A missing token still
/// names the profile but keeps the player unauthenticated for leaderboard purposes.
#[derive(Debug, Clone)]
pub struct StaticIdentity {
    username: String,
    token: Option<String>,
}

impl StaticIdentity {
    pub fn new(username: impl Into<String>, token: Option<String>) -> Self {
        Self {
            username: username.into(),
            token,
        }
    }
}

impl IdentityProvider for StaticIdentity {
    fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    fn bearer_token(&self) -> Option<String> {
        self.token.clone()
    }

    fn username(&self) -> Option<String> {
        Some(self.username.clone())
    }
}

#[derive(Debug, Clone)]
struct Credentials {
    username: String,
    token: String,
}

/// Identity that can change while the game runs (sign-in / sign-out callbacks).
/// Clones share state.
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity {
    inner: Arc<RwLock<Option<Credentials>>>,
}

impl SharedIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sign_in(&self, username: impl Into<String>, token: impl Into<String>) {
        let mut guard = self.inner.write().unwrap_or_else(|e| e.into_inner());
        *guard = Some(Credentials {
            username: username.into(),
            token: token.into(),
        });
    }

    pub fn sign_out(&self) {
        *self.inner.write().unwrap_or_else(|e| e.into_inner()) = None;
    }

    fn read<T>(&self, f: impl FnOnce(&Credentials) -> T) -> Option<T> {
        self.inner
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .as_ref()
            .map(f)
    }
}

impl IdentityProvider for SharedIdentity {
    fn is_authenticated(&self) -> bool {
        self.read(|_| ()).is_some()
    }

    fn bearer_token(&self) -> Option<String> {
        self.read(|c| c.token.clone())
    }

    fn username(&self) -> Option<String> {
        self.read(|c| c.username.clone())
    }
}
