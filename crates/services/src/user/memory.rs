use super::{DirectoryError, UserDirectory};
use crate::auth::ports::{NewUser, UserId, UserRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// In-memory user directory.
///
/// The bundled default backend; the `UserDirectory` port is the seam for a
/// real store. Uniqueness is keyed on the external user id, so a repeated
/// creation for the same identity returns the existing record unchanged.
#[derive(Default)]
pub struct InMemoryUserDirectory {
    records: RwLock<HashMap<UserId, UserRecord>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DirectoryError> {
        let mut records = self.records.write().await;

        if let Some(existing) = records.get(&user.user_id) {
            debug!(user_id = %user.user_id, "Create for existing identity, returning current record");
            return Ok(existing.clone());
        }

        let record = UserRecord {
            user_id: user.user_id.clone(),
            email: user.email,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            is_sso: user.is_sso,
        };
        records.insert(user.user_id, record.clone());
        Ok(record)
    }
}
