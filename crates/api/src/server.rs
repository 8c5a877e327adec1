//! Process-wide application handle.
//!
//! The router is constructed exactly once per process and reused for every
//! request; the `OnceCell` guard keeps concurrent first calls race-free.

use crate::{build_app, init_auth_services};
use axum::Router;
use config::ApiConfig;
use tokio::sync::OnceCell;

static APP: OnceCell<Router> = OnceCell::const_new();

/// Resolve the shared application router, building it on first use.
pub async fn app(config: &ApiConfig) -> Router {
    APP.get_or_init(|| async { build_app(init_auth_services(config)) })
        .await
        .clone()
}
