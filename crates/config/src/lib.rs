// Configuration for the Trove API: the typed config structs, YAML
// deserialization, and the startup search paths. Living in its own crate
// keeps file I/O out of the services layer.

use std::path::Path;
use thiserror::Error;

pub mod types;

pub use types::*;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found. Tried paths: {paths}")]
    FileNotFound { paths: String },

    #[error("Failed to read configuration file: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {source}")]
    ParseError {
        #[from]
        source: serde_yaml::Error,
    },
}

impl ApiConfig {
    /// Parse a YAML configuration file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: ApiConfig = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load from the first search path that exists
    pub fn load() -> Result<Self, ConfigError> {
        const SEARCH_PATHS: [&str; 2] = ["config/config.yaml", "config.yaml"];

        match SEARCH_PATHS.iter().find(|path| Path::new(path).exists()) {
            Some(path) => Self::load_from_file(path),
            None => Err(ConfigError::FileNotFound {
                paths: SEARCH_PATHS.join(", "),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_from_yaml_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
server:
  host: 127.0.0.1
  port: 8080
logging:
  level: debug
  format: compact
auth:
  provider:
    url: https://auth.example.com
    publishable_key: pk_test_123
"#
        )
        .unwrap();

        let config = ApiConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.auth.provider.url, "https://auth.example.com");
        // Cookie names fall back to defaults when the section is omitted
        assert_eq!(config.auth.cookies.organization, "selected-organization-id");
    }

    #[test]
    fn missing_file_is_descriptive() {
        let err = ApiConfig::load_from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }
}
