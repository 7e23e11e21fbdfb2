//! URL construction for the invite API and the application routes.

use orgjoin_config::RouteConfig;
use urlencoding::encode;

use crate::error::{InviteError, InviteResult};
use crate::types::InviteKey;

#[derive(Debug, Clone)]
pub struct InviteEndpoints {
    base_url: String,
}

impl InviteEndpoints {
    pub fn new(base_url: &str) -> InviteResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
            return Err(InviteError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url: trimmed.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Shared by token validation (GET) and joining (POST).
    pub fn join(&self, key: &InviteKey) -> String {
        format!(
            "{}/organizations/{}/members/join?token={}",
            self.base_url,
            encode(&key.slug),
            encode(&key.token)
        )
    }

    pub fn invite(&self, slug: &str, invite_id: i64) -> String {
        format!(
            "{}/organizations/{}/members/invite?invited_id={}",
            self.base_url,
            encode(slug),
            invite_id
        )
    }
}

/// Where the sign-in affordance points, and the join URL it resumes at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignInLink {
    pub href: String,
    pub return_to: String,
}

pub fn sign_in_link(routes: &RouteConfig, key: &InviteKey) -> SignInLink {
    let return_to = format!(
        "{}?token={}&slug={}",
        routes.join_path,
        encode(&key.token),
        encode(&key.slug)
    );
    let href = format!("{}?next={}", routes.sign_in_path, encode(&return_to));
    SignInLink { href, return_to }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_endpoint_embeds_slug_and_token() {
        let endpoints = InviteEndpoints::new("https://api.example.com/platform/").unwrap();
        let key = InviteKey::new("acme", "tok-123");
        assert_eq!(
            endpoints.join(&key),
            "https://api.example.com/platform/organizations/acme/members/join?token=tok-123"
        );
    }

    #[test]
    fn invite_endpoint_addresses_invite_id() {
        let endpoints = InviteEndpoints::new("https://api.example.com").unwrap();
        assert_eq!(
            endpoints.invite("acme", 42),
            "https://api.example.com/organizations/acme/members/invite?invited_id=42"
        );
    }

    #[test]
    fn reserved_characters_are_percent_encoded() {
        let endpoints = InviteEndpoints::new("https://api.example.com").unwrap();
        let key = InviteKey::new("acme", "a&b=c");
        assert!(endpoints.join(&key).ends_with("?token=a%26b%3Dc"));
    }

    #[test]
    fn relative_base_url_is_rejected() {
        let error = InviteEndpoints::new("/platform").unwrap_err();
        assert!(matches!(error, InviteError::InvalidBaseUrl(_)));
    }

    #[test]
    fn sign_in_link_returns_to_join_page() {
        let link = sign_in_link(&RouteConfig::default(), &InviteKey::new("acme", "tok"));
        assert_eq!(link.return_to, "/join?token=tok&slug=acme");
        assert_eq!(link.href, "/?next=%2Fjoin%3Ftoken%3Dtok%26slug%3Dacme");
    }
}
