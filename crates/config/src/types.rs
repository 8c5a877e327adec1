use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

/// Logging Configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// One of "json", "compact", "pretty"
    #[serde(default = "default_log_format")]
    pub format: String,
    /// Module-specific log level overrides
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            modules: HashMap::new(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub provider: ProviderConfig,
    #[serde(default)]
    pub cookies: CookieConfig,
}

/// Identity provider the callback exchanges authorization codes against
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of the provider project, e.g. https://xyz.provider.co
    pub url: String,
    /// Publishable (anon) API key sent with every provider request
    pub publishable_key: String,
}

/// Cookie names used by the sign-in flow
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CookieConfig {
    /// Cookie carrying the serialized auth session
    #[serde(default = "default_session_cookie")]
    pub session: String,
    /// Cookie carrying the PKCE code verifier between redirect legs
    #[serde(default = "default_verifier_cookie")]
    pub verifier: String,
    /// Cookie carrying the user's selected organization id
    #[serde(default = "default_organization_cookie")]
    pub organization: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            session: default_session_cookie(),
            verifier: default_verifier_cookie(),
            organization: default_organization_cookie(),
        }
    }
}

fn default_session_cookie() -> String {
    "trove-auth-session".to_string()
}

fn default_verifier_cookie() -> String {
    "trove-auth-code-verifier".to_string()
}

fn default_organization_cookie() -> String {
    "selected-organization-id".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 3000);
    }

    #[test]
    fn cookie_defaults() {
        let cookies = CookieConfig::default();
        assert_eq!(cookies.session, "trove-auth-session");
        assert_eq!(cookies.verifier, "trove-auth-code-verifier");
        assert_eq!(cookies.organization, "selected-organization-id");
    }
}
