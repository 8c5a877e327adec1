use crate::auth::ports::{AuthSession, UserId};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Capability through which a completed sign-in becomes durable and
/// observable to the rest of the application. Passed into the callback flow
/// per request rather than reached for ambiently.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
#[async_trait]
pub trait SessionSink: Send + Sync {
    async fn set_session(&self, session: AuthSession);
}

/// In-memory session registry, keyed by user id.
#[derive(Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<UserId, AuthSession>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, user_id: &UserId) -> Option<AuthSession> {
        self.sessions.read().await.get(user_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionSink for InMemorySessionStore {
    async fn set_session(&self, session: AuthSession) {
        self.sessions
            .write()
            .await
            .insert(session.user_id.clone(), session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(user: &str) -> AuthSession {
        AuthSession {
            user_id: UserId(user.to_string()),
            email: format!("{user}@example.com"),
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_at: None,
        }
    }

    #[tokio::test]
    async fn registered_session_is_observable() {
        let store = InMemorySessionStore::new();
        store.set_session(session("ada")).await;

        let found = store.get(&UserId("ada".to_string())).await.unwrap();
        assert_eq!(found.email, "ada@example.com");
    }

    #[tokio::test]
    async fn re_registration_replaces_the_session() {
        let store = InMemorySessionStore::new();
        store.set_session(session("ada")).await;

        let mut refreshed = session("ada");
        refreshed.access_token = "at-2".to_string();
        store.set_session(refreshed).await;

        assert_eq!(store.len().await, 1);
        let found = store.get(&UserId("ada".to_string())).await.unwrap();
        assert_eq!(found.access_token, "at-2");
    }
}
