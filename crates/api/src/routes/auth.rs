use axum::{
    extract::{Query, State},
    http::{
        header::{COOKIE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use services::auth::{CallbackParams, CallbackService, ResponseDirective};
use services::session::SessionSink;
use std::sync::Arc;
use tracing::{debug, error};

#[derive(Clone)]
pub struct AuthCallbackState {
    pub callback: Arc<CallbackService>,
    pub sessions: Arc<dyn SessionSink>,
}

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub next: Option<String>,
}

/// Complete the OAuth2 sign-in flow.
///
/// Produces either a redirect into the application, carrying the session
/// and organization cookies, or an inline error payload the view layer
/// renders. Fatal collaborator failures become a 500.
pub async fn oauth2_callback(
    State(state): State<AuthCallbackState>,
    Query(query): Query<CallbackQuery>,
    headers: HeaderMap,
) -> Response {
    debug!("OAuth2 callback received");

    let cookie_header = headers.get(COOKIE).and_then(|value| value.to_str().ok());
    let params = CallbackParams {
        code: query.code,
        next: query.next,
    };

    match state
        .callback
        .complete_login(params, cookie_header, state.sessions.as_ref())
        .await
    {
        Ok(directive) => directive_response(directive),
        Err(e) => {
            error!("Sign-in completion failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "internal_server_error",
                    "error_description": format!("Sign-in failed: {}", e)
                })),
            )
                .into_response()
        }
    }
}

/// Shape a directive into an HTTP response
fn directive_response(directive: ResponseDirective) -> Response {
    match directive {
        ResponseDirective::Redirect { location, cookies } => {
            let mut response = (StatusCode::FOUND, [(LOCATION, location)]).into_response();
            let headers = response.headers_mut();
            for value in cookies {
                match HeaderValue::from_str(&value) {
                    Ok(value) => {
                        headers.append(SET_COOKIE, value);
                    }
                    Err(e) => error!("Dropping unencodable cookie: {}", e),
                }
            }
            response
        }
        ResponseDirective::Error { message } => {
            Json(serde_json::json!({ "error": { "message": message } })).into_response()
        }
    }
}
