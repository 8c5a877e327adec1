use crate::auth::ports::UserId;
use crate::cookies::CookieTransport;
use async_trait::async_trait;
use cookie::{Cookie, SameSite};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct OrganizationId(pub Uuid);

impl From<Uuid> for OrganizationId {
    fn from(uuid: Uuid) -> Self {
        OrganizationId(uuid)
    }
}

impl std::fmt::Display for OrganizationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The tenant context attached to a session after login. Computed fresh per
/// request; never cached by the callback flow.
#[derive(Debug, Clone, PartialEq)]
pub struct OrganizationSelection {
    pub organization_id: OrganizationId,
}

#[derive(Debug, thiserror::Error)]
pub enum OrganizationError {
    #[error("organization not found")]
    NotFound,

    #[error("internal error: {0}")]
    InternalError(String),
}

/// Resolves which organization a signed-in user is operating in.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
#[async_trait]
pub trait OrganizationContext: Send + Sync {
    /// Resolve the caller's selected organization. May consult request
    /// cookies, which is why the transport is passed in.
    async fn selected_organization(
        &self,
        user_id: &UserId,
        cookies: &CookieTransport,
    ) -> Result<OrganizationSelection, OrganizationError>;

    /// Cookie persisting the selection on the client.
    fn selection_cookie(&self, organization_id: &OrganizationId) -> Cookie<'static>;
}

/// Selection state with three tiers: an explicit request cookie wins, then
/// the stored per-user selection, then the user's personal organization.
pub struct StoredOrganizationContext {
    cookie_name: String,
    selections: RwLock<HashMap<UserId, OrganizationId>>,
}

impl StoredOrganizationContext {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            selections: RwLock::new(HashMap::new()),
        }
    }

    /// Persist a user's organization choice
    pub async fn select(&self, user_id: UserId, organization_id: OrganizationId) {
        self.selections.write().await.insert(user_id, organization_id);
    }

    /// Stable per-user default, derived from the external identity
    fn personal_organization(user_id: &UserId) -> OrganizationId {
        OrganizationId(Uuid::new_v5(&Uuid::NAMESPACE_OID, user_id.0.as_bytes()))
    }
}

#[async_trait]
impl OrganizationContext for StoredOrganizationContext {
    async fn selected_organization(
        &self,
        user_id: &UserId,
        cookies: &CookieTransport,
    ) -> Result<OrganizationSelection, OrganizationError> {
        if let Some(raw) = cookies.get(&self.cookie_name) {
            if let Ok(id) = Uuid::parse_str(raw) {
                return Ok(OrganizationSelection {
                    organization_id: OrganizationId(id),
                });
            }
        }

        let stored = self.selections.read().await.get(user_id).cloned();
        let organization_id = stored.unwrap_or_else(|| Self::personal_organization(user_id));
        Ok(OrganizationSelection { organization_id })
    }

    fn selection_cookie(&self, organization_id: &OrganizationId) -> Cookie<'static> {
        Cookie::build((self.cookie_name.clone(), organization_id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }
}
