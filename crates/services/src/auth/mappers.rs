use super::ports::{AuthSession, ProviderSession, ProviderUserMetadata, UserId};
use chrono::{DateTime, Utc};

/// Map the provider's raw session object into the application session.
pub fn map_auth_session(session: &ProviderSession) -> AuthSession {
    AuthSession {
        user_id: UserId(session.user.id.clone()),
        email: session.user.email.clone(),
        access_token: session.access_token.clone(),
        refresh_token: session.refresh_token.clone(),
        expires_at: session
            .expires_at
            .and_then(|ts| DateTime::<Utc>::from_timestamp(ts, 0)),
    }
}

/// Derive first/last name from provider metadata.
///
/// Fallback chain: split of the full name, then the explicit given/family
/// fields, then nothing.
pub fn derive_names(metadata: &ProviderUserMetadata) -> (Option<String>, Option<String>) {
    let full_name = metadata.full_name.as_deref().unwrap_or("");
    let mut parts = full_name.split_whitespace();

    let first_name = parts
        .next()
        .map(str::to_string)
        .or_else(|| metadata.given_name.clone());

    let rest: Vec<&str> = parts.collect();
    let last_name = if rest.is_empty() {
        metadata.family_name.clone()
    } else {
        Some(rest.join(" "))
    };

    (
        first_name.filter(|name| !name.is_empty()),
        last_name.filter(|name| !name.is_empty()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ports::ProviderUser;

    fn metadata(
        full_name: Option<&str>,
        given_name: Option<&str>,
        family_name: Option<&str>,
    ) -> ProviderUserMetadata {
        ProviderUserMetadata {
            full_name: full_name.map(str::to_string),
            given_name: given_name.map(str::to_string),
            family_name: family_name.map(str::to_string),
        }
    }

    #[test]
    fn session_mapping_preserves_identity() {
        let session = ProviderSession {
            access_token: "at-1".to_string(),
            refresh_token: "rt-1".to_string(),
            expires_at: Some(1_735_689_600),
            user: ProviderUser {
                id: "user-1".to_string(),
                email: "ada@example.com".to_string(),
                user_metadata: ProviderUserMetadata::default(),
            },
        };

        let auth_session = map_auth_session(&session);
        assert_eq!(auth_session.user_id, UserId("user-1".to_string()));
        assert_eq!(auth_session.email, "ada@example.com");
        assert_eq!(auth_session.access_token, "at-1");
        assert!(auth_session.expires_at.is_some());
    }

    #[test]
    fn full_name_splits_into_first_and_rest() {
        let (first, last) = derive_names(&metadata(Some("Ada King Lovelace"), None, None));
        assert_eq!(first.as_deref(), Some("Ada"));
        assert_eq!(last.as_deref(), Some("King Lovelace"));
    }

    #[test]
    fn single_word_full_name_falls_back_to_family_field() {
        let (first, last) = derive_names(&metadata(Some("Ada"), None, Some("Lovelace")));
        assert_eq!(first.as_deref(), Some("Ada"));
        assert_eq!(last.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn missing_full_name_uses_explicit_fields() {
        let (first, last) = derive_names(&metadata(None, Some("Ada"), Some("Lovelace")));
        assert_eq!(first.as_deref(), Some("Ada"));
        assert_eq!(last.as_deref(), Some("Lovelace"));
    }

    #[test]
    fn empty_metadata_yields_nothing() {
        let (first, last) = derive_names(&metadata(None, None, None));
        assert!(first.is_none());
        assert!(last.is_none());

        let (first, last) = derive_names(&metadata(Some(""), Some(""), None));
        assert!(first.is_none());
        assert!(last.is_none());
    }
}
