//! Session token storage.
//!
//! Sessions are issued by the managed auth provider; this service only maps
//! an opaque token to the profile it belongs to.

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

/// Lookup of session tokens.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Profile id owning `token`, or `None` for unknown tokens.
    async fn profile_for_token(&self, token: &str) -> Option<Uuid>;
}

/// Concurrent in-memory session table.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    tokens: DashMap<String, Uuid>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a session token.
    pub fn insert(&self, token: impl Into<String>, profile_id: Uuid) {
        self.tokens.insert(token.into(), profile_id);
    }

    /// Revoke a token. Returns true if it existed.
    pub fn revoke(&self, token: &str) -> bool {
        self.tokens.remove(token).is_some()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn profile_for_token(&self, token: &str) -> Option<Uuid> {
        self.tokens.get(token).map(|r| *r.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_lifecycle() {
        let store = InMemorySessionStore::new();
        let id = Uuid::new_v4();

        assert!(store.profile_for_token("abc").await.is_none());

        store.insert("abc", id);
        assert_eq!(store.profile_for_token("abc").await, Some(id));
        assert_eq!(store.len(), 1);

        assert!(store.revoke("abc"));
        assert!(!store.revoke("abc"));
        assert!(store.profile_for_token("abc").await.is_none());
    }
}
