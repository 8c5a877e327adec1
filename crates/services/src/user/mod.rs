mod memory;

pub use memory::InMemoryUserDirectory;

use crate::auth::ports::{NewUser, UserId, UserRecord};
use async_trait::async_trait;
use sha2::{Digest, Sha256};

#[derive(Debug, thiserror::Error)]
pub enum DirectoryError {
    #[error("user directory unavailable: {0}")]
    Unavailable(String),

    #[error("internal error: {0}")]
    InternalError(String),
}

/// Account storage consumed by the callback flow.
#[cfg_attr(any(test, feature = "test-mocks"), mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Look up an account by its external identity. Absence is data, not a
    /// fault; only infrastructure failures surface as errors.
    async fn get_user_by_id(&self, id: &UserId) -> Result<Option<UserRecord>, DirectoryError>;

    /// Create an account. Two concurrent callbacks for the same never-seen
    /// identity may both call this; creating an identity that already exists
    /// must be a no-op returning the existing record.
    async fn create_user(&self, user: NewUser) -> Result<UserRecord, DirectoryError>;
}

/// Derive a unique username from an email address.
///
/// Deterministic: the same email always yields the same username. The digest
/// suffix keeps distinct emails with identical local parts apart.
pub fn username_from_email(email: &str) -> String {
    let normalized = email.trim().to_ascii_lowercase();
    let local = normalized.split('@').next().unwrap_or_default();

    let slug: String = local
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let slug = if slug.is_empty() {
        "user".to_string()
    } else {
        slug
    };

    let digest = Sha256::digest(normalized.as_bytes());
    format!("{}-{}", slug, hex::encode(&digest[..3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn username_derivation_is_deterministic() {
        let first = username_from_email("ada.lovelace@example.com");
        let second = username_from_email("ada.lovelace@example.com");
        assert_eq!(first, second);
    }

    #[test]
    fn username_normalizes_case_and_whitespace() {
        assert_eq!(
            username_from_email("Ada.Lovelace@Example.com"),
            username_from_email("  ada.lovelace@example.com  ")
        );
    }

    #[test]
    fn username_sanitizes_local_part() {
        let username = username_from_email("ada+test.lovelace@example.com");
        assert!(username.starts_with("ada-test-lovelace-"));
    }

    #[test]
    fn same_local_part_different_domain_diverges() {
        assert_ne!(
            username_from_email("ada@example.com"),
            username_from_email("ada@example.org")
        );
    }

    #[test]
    fn degenerate_email_still_yields_a_username() {
        let username = username_from_email("@example.com");
        assert!(username.starts_with("user-"));
    }
}
