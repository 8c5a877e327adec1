use crate::cookies::CookieTransport;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable external identity assigned by the identity provider
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct UserId(pub String);

impl From<String> for UserId {
    fn from(id: String) -> Self {
        UserId(id)
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Session established by a successful code exchange.
///
/// Built once per exchange, immutable afterwards. Persistence is the session
/// sink's job, not the callback flow's.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: String,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Raw session object as the provider returns it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSession {
    pub access_token: String,
    pub refresh_token: String,
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: ProviderUser,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub user_metadata: ProviderUserMetadata,
}

/// Identity claims the provider forwards from the upstream IdP
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProviderUserMetadata {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub given_name: Option<String>,
    #[serde(default)]
    pub family_name: Option<String>,
}

/// Account record held by the user directory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserRecord {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_sso: bool,
}

/// Creation payload for a first-time SSO account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_id: UserId,
    pub email: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub is_sso: bool,
}

/// Outcome of trading an authorization code for a session.
///
/// The provider reports failures in-band rather than faulting; `Empty`
/// covers the no-session/no-error edge (e.g. an already-consumed code).
#[derive(Debug, Clone)]
pub enum CodeExchange {
    Session(ProviderSession),
    Error(ExchangeError),
    Empty,
}

#[derive(Debug, Clone)]
pub struct ExchangeError {
    pub message: String,
}

/// The callback flow's only externally observable output besides user
/// creation: a redirect with cookies, or an inline error payload.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseDirective {
    Redirect {
        location: String,
        cookies: Vec<String>,
    },
    Error {
        message: String,
    },
}

/// Client trading an authorization code for a provider session.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
#[async_trait]
pub trait SessionExchangeClient: Send + Sync {
    /// Exchange `code` for a session. Auth cookies are read from and written
    /// to the request-scoped transport.
    async fn exchange_code(&self, code: &str, cookies: &mut CookieTransport) -> CodeExchange;
}
