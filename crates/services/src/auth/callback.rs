use super::mappers::{derive_names, map_auth_session};
use super::ports::{
    AuthSession, CodeExchange, NewUser, ProviderSession, ResponseDirective, SessionExchangeClient,
};
use crate::cookies::CookieTransport;
use crate::http::safe_redirect;
use crate::organization::{OrganizationContext, OrganizationError};
use crate::session::SessionSink;
use crate::user::{username_from_email, DirectoryError, UserDirectory};
use std::sync::Arc;
use tracing::{debug, info};

/// Where a completed sign-in lands
const POST_LOGIN_PATH: &str = "/assets";
const DEFAULT_NEXT: &str = "/";

/// Fatal callback failures.
///
/// User-recoverable conditions (missing code, provider rejection) are
/// encoded in `ResponseDirective::Error` instead; anything here terminates
/// the request and is left to the host's error boundary.
#[derive(Debug, thiserror::Error)]
pub enum CallbackError {
    #[error("user lookup failed: {0}")]
    Lookup(#[source] DirectoryError),

    #[error("user provisioning failed: {0}")]
    Provisioning(#[source] DirectoryError),

    #[error("organization resolution failed: {0}")]
    Organization(#[from] OrganizationError),
}

/// Query parameters of the callback request
#[derive(Debug, Default, Clone)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Orchestrates the completion of a third-party sign-in: code exchange,
/// first-login provisioning, organization resolution, session registration,
/// response shaping.
pub struct CallbackService {
    exchange: Arc<dyn SessionExchangeClient>,
    directory: Arc<dyn UserDirectory>,
    organizations: Arc<dyn OrganizationContext>,
}

impl CallbackService {
    pub fn new(
        exchange: Arc<dyn SessionExchangeClient>,
        directory: Arc<dyn UserDirectory>,
        organizations: Arc<dyn OrganizationContext>,
    ) -> Self {
        Self {
            exchange,
            directory,
            organizations,
        }
    }

    /// Complete a sign-in. Produces exactly one directive per invocation
    /// and, as a side effect, creates at most one user record.
    ///
    /// The session sink is a request-scoped capability supplied by the
    /// caller, not a constructor dependency.
    pub async fn complete_login(
        &self,
        params: CallbackParams,
        cookie_header: Option<&str>,
        sessions: &dyn SessionSink,
    ) -> Result<ResponseDirective, CallbackError> {
        let Some(code) = params.code.filter(|code| !code.is_empty()) else {
            return Ok(ResponseDirective::Error {
                message: "Authorization code missing.".to_string(),
            });
        };
        let next = params.next.unwrap_or_else(|| DEFAULT_NEXT.to_string());

        let mut cookies = CookieTransport::from_header(cookie_header);

        match self.exchange.exchange_code(&code, &mut cookies).await {
            CodeExchange::Session(session) => {
                let auth_session = map_auth_session(&session);
                self.provision_if_absent(&session, &auth_session).await?;

                let selection = self
                    .organizations
                    .selected_organization(&auth_session.user_id, &cookies)
                    .await?;

                sessions.set_session(auth_session.clone()).await;
                info!(user_id = %auth_session.user_id, "Sign-in completed");

                let mut response_cookies = cookies.into_set_cookie_headers();
                response_cookies.push(
                    self.organizations
                        .selection_cookie(&selection.organization_id)
                        .encoded()
                        .to_string(),
                );

                Ok(ResponseDirective::Redirect {
                    location: safe_redirect(POST_LOGIN_PATH, DEFAULT_NEXT),
                    cookies: response_cookies,
                })
            }
            CodeExchange::Empty => {
                debug!("Code exchange yielded neither session nor error");
                Ok(ResponseDirective::Redirect {
                    location: safe_redirect(&next, DEFAULT_NEXT),
                    cookies: cookies.into_set_cookie_headers(),
                })
            }
            CodeExchange::Error(error) => Ok(ResponseDirective::Error {
                message: error.message,
            }),
        }
    }

    /// At-most-once provisioning: create the account only when the lookup
    /// finds nothing. Subsequent callbacks for the same identity find the
    /// record and skip creation.
    async fn provision_if_absent(
        &self,
        session: &ProviderSession,
        auth_session: &AuthSession,
    ) -> Result<(), CallbackError> {
        let existing = self
            .directory
            .get_user_by_id(&auth_session.user_id)
            .await
            .map_err(CallbackError::Lookup)?;
        if existing.is_some() {
            return Ok(());
        }

        let (first_name, last_name) = derive_names(&session.user.user_metadata);
        let user = NewUser {
            user_id: auth_session.user_id.clone(),
            email: auth_session.email.clone(),
            username: username_from_email(&auth_session.email),
            first_name,
            last_name,
            is_sso: true,
        };

        info!(user_id = %user.user_id, "Provisioning first-time SSO account");
        self.directory
            .create_user(user)
            .await
            .map_err(CallbackError::Provisioning)?;
        Ok(())
    }
}
