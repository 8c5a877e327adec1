use super::ports::{CodeExchange, ExchangeError, ProviderSession, SessionExchangeClient};
use crate::cookies::CookieTransport;
use async_trait::async_trait;
use config::AuthConfig;
use cookie::{Cookie, SameSite};
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

/// Session exchange client speaking the provider's token endpoint.
///
/// All failures, provider rejections and transport faults alike, are
/// reported in-band through `CodeExchange::Error`; the callback flow treats
/// them as user-recoverable.
pub struct HttpSessionExchangeClient {
    token_url: String,
    publishable_key: String,
    session_cookie: String,
    verifier_cookie: String,
    http_client: Client,
}

impl HttpSessionExchangeClient {
    pub fn new(auth: &AuthConfig) -> Self {
        Self {
            token_url: format!(
                "{}/auth/v1/token?grant_type=pkce",
                auth.provider.url.trim_end_matches('/')
            ),
            publishable_key: auth.provider.publishable_key.clone(),
            session_cookie: auth.cookies.session.clone(),
            verifier_cookie: auth.cookies.verifier.clone(),
            http_client: Client::new(),
        }
    }

    async fn request_session(
        &self,
        code: &str,
        verifier: Option<&str>,
    ) -> Result<ProviderSession, ExchangeError> {
        debug!("Exchanging authorization code for session");

        let response = self
            .http_client
            .post(&self.token_url)
            .header("apikey", &self.publishable_key)
            .json(&json!({ "auth_code": code, "code_verifier": verifier }))
            .send()
            .await
            .map_err(|e| ExchangeError {
                message: format!("Token exchange failed: {}", e),
            })?;

        let status = response.status();
        if !status.is_success() {
            let failure: ProviderFailure = response.json().await.unwrap_or_default();
            debug!("Provider rejected code exchange with status {}", status);
            return Err(ExchangeError {
                message: failure.message(),
            });
        }

        response.json::<ProviderSession>().await.map_err(|e| ExchangeError {
            message: format!("Failed to parse provider session: {}", e),
        })
    }

    fn session_cookie_for(&self, session: &ProviderSession) -> Cookie<'static> {
        let value = serde_json::to_string(session).unwrap_or_default();
        Cookie::build((self.session_cookie.clone(), value))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build()
    }

    fn removal_cookie(name: String) -> Cookie<'static> {
        let mut cookie = Cookie::build((name, "")).path("/").build();
        cookie.make_removal();
        cookie
    }
}

#[async_trait]
impl SessionExchangeClient for HttpSessionExchangeClient {
    async fn exchange_code(&self, code: &str, cookies: &mut CookieTransport) -> CodeExchange {
        let verifier = cookies.get(&self.verifier_cookie).map(str::to_string);

        match self.request_session(code, verifier.as_deref()).await {
            Ok(session) => {
                // Persist the refreshed session and retire the verifier
                cookies.set(self.session_cookie_for(&session));
                cookies.set(Self::removal_cookie(self.verifier_cookie.clone()));
                CodeExchange::Session(session)
            }
            Err(error) => CodeExchange::Error(error),
        }
    }
}

/// Error body shapes the provider is known to emit
#[derive(Debug, Default, Deserialize)]
struct ProviderFailure {
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ProviderFailure {
    fn message(&self) -> String {
        self.error_description
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| "Code exchange rejected by provider.".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{CookieConfig, ProviderConfig};
    use httpmock::prelude::*;

    fn client_for(url: String) -> HttpSessionExchangeClient {
        HttpSessionExchangeClient::new(&AuthConfig {
            provider: ProviderConfig {
                url,
                publishable_key: "pk_test".to_string(),
            },
            cookies: CookieConfig::default(),
        })
    }

    #[tokio::test]
    async fn successful_exchange_writes_session_cookie() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/auth/v1/token")
                .query_param("grant_type", "pkce")
                .header("apikey", "pk_test");
            then.status(200).json_body(serde_json::json!({
                "access_token": "at-1",
                "refresh_token": "rt-1",
                "expires_at": 1735689600i64,
                "user": { "id": "user-1", "email": "ada@example.com" }
            }));
        });

        let client = client_for(server.base_url());
        let mut cookies = CookieTransport::from_header(Some("trove-auth-code-verifier=v123"));
        let outcome = client.exchange_code("code-1", &mut cookies).await;

        mock.assert();
        match outcome {
            CodeExchange::Session(session) => {
                assert_eq!(session.user.email, "ada@example.com");
                assert_eq!(session.user.id, "user-1");
            }
            other => panic!("expected a session, got {:?}", other),
        }
        assert!(cookies
            .set_cookie_headers()
            .iter()
            .any(|c| c.starts_with("trove-auth-session=")));
        // Verifier cookie is cleared once consumed
        assert!(cookies
            .set_cookie_headers()
            .iter()
            .any(|c| c.starts_with("trove-auth-code-verifier=")));
    }

    #[tokio::test]
    async fn provider_rejection_is_in_band() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/auth/v1/token");
            then.status(400)
                .json_body(serde_json::json!({ "error_description": "Code has expired" }));
        });

        let client = client_for(server.base_url());
        let mut cookies = CookieTransport::from_header(None);
        let outcome = client.exchange_code("stale", &mut cookies).await;

        match outcome {
            CodeExchange::Error(error) => assert_eq!(error.message, "Code has expired"),
            other => panic!("expected an error, got {:?}", other),
        }
        assert!(cookies.set_cookie_headers().is_empty());
    }

    #[tokio::test]
    async fn transport_failure_is_in_band() {
        // Nothing listens on this port
        let client = client_for("http://127.0.0.1:9".to_string());
        let mut cookies = CookieTransport::from_header(None);

        match client.exchange_code("code-1", &mut cookies).await {
            CodeExchange::Error(error) => {
                assert!(error.message.starts_with("Token exchange failed"))
            }
            other => panic!("expected an error, got {:?}", other),
        }
    }
}
