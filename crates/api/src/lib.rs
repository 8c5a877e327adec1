pub mod routes;
pub mod server;

use crate::routes::auth::{oauth2_callback, AuthCallbackState};
use crate::routes::health::healthz;
use axum::{routing::get, Router};
use config::ApiConfig;
use services::auth::{CallbackService, HttpSessionExchangeClient};
use services::organization::StoredOrganizationContext;
use services::session::{InMemorySessionStore, SessionSink};
use services::user::InMemoryUserDirectory;
use std::sync::Arc;

/// Service wiring for the sign-in flow
#[derive(Clone)]
pub struct AuthComponents {
    pub callback: Arc<CallbackService>,
    pub sessions: Arc<dyn SessionSink>,
}

/// Construct the production collaborators and the orchestrator over them
pub fn init_auth_services(config: &ApiConfig) -> AuthComponents {
    tracing::info!(
        provider = %config.auth.provider.url,
        "Setting up session exchange client"
    );
    let exchange = Arc::new(HttpSessionExchangeClient::new(&config.auth));
    let directory = Arc::new(InMemoryUserDirectory::new());
    let organizations = Arc::new(StoredOrganizationContext::new(
        config.auth.cookies.organization.clone(),
    ));

    AuthComponents {
        callback: Arc::new(CallbackService::new(exchange, directory, organizations)),
        sessions: Arc::new(InMemorySessionStore::new()),
    }
}

/// Build the complete application router
pub fn build_app(auth_components: AuthComponents) -> Router {
    let callback_state = AuthCallbackState {
        callback: auth_components.callback,
        sessions: auth_components.sessions,
    };

    Router::new()
        .route("/oauth2/callback", get(oauth2_callback))
        .with_state(callback_state)
        .route("/healthz", get(healthz))
}
