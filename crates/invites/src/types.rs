//! Wire and route types shared by the controller and its views.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Validation result for one invite token, as returned by the platform API.
///
/// Flags missing from the payload decode as `false`; an empty organization
/// name decodes as absent.
///
/// ```
/// use orgjoin_invites::TokenInfo;
///
/// let info: TokenInfo = serde_json::from_str(
///     r#"{"organization_name":"Acme","email_match":true,"authorized_user":true,"invite_id":42}"#,
/// )
/// .unwrap();
/// assert_eq!(info.organization_name.as_deref(), Some("Acme"));
/// assert!(!info.token_does_not_exist);
/// assert_eq!(info.invite_id, Some(42));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub organization_name: Option<String>,
    #[serde(default)]
    pub token_does_not_exist: bool,
    #[serde(default)]
    pub email_match: bool,
    #[serde(default)]
    pub authorized_user: bool,
    #[serde(default)]
    pub expired_token: bool,
    #[serde(default)]
    pub invite_id: Option<i64>,
}

impl TokenInfo {
    /// Organization name, only when the viewer's email matches the invite.
    pub fn display_organization(&self) -> Option<&str> {
        if self.email_match {
            self.organization_name.as_deref()
        } else {
            None
        }
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|name| !name.is_empty()))
}

/// The (slug, token) identity a resolution is keyed by.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InviteKey {
    pub slug: String,
    pub token: String,
}

impl InviteKey {
    pub fn new(slug: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            token: token.into(),
        }
    }
}

/// Query parameters of the hosting join page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteQuery {
    pub slug: Option<String>,
    pub token: Option<String>,
    pub extra: BTreeMap<String, String>,
}

impl RouteQuery {
    pub fn new(slug: Option<&str>, token: Option<&str>) -> Self {
        Self {
            slug: slug.map(str::to_owned),
            token: token.map(str::to_owned),
            extra: BTreeMap::new(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            let key = key.into();
            let value = value.into();
            match key.as_str() {
                "slug" => query.slug = Some(value),
                "token" => query.token = Some(value),
                _ => {
                    query.extra.insert(key, value);
                }
            }
        }
        query
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Both parameters present and non-empty.
    pub fn invite_key(&self) -> Option<InviteKey> {
        let slug = self.slug.as_deref().filter(|slug| !slug.is_empty())?;
        let token = self.token.as_deref().filter(|token| !token.is_empty())?;
        Some(InviteKey::new(slug, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_organization_name_is_absent() {
        let info: TokenInfo =
            serde_json::from_str(r#"{"organization_name":"","email_match":true}"#).unwrap();
        assert!(info.organization_name.is_none());
    }

    #[test]
    fn null_organization_name_is_absent() {
        let info: TokenInfo = serde_json::from_str(r#"{"organization_name":null}"#).unwrap();
        assert!(info.organization_name.is_none());
    }

    #[test]
    fn display_organization_requires_email_match() {
        let info = TokenInfo {
            organization_name: Some("Acme".into()),
            email_match: false,
            ..TokenInfo::default()
        };
        assert_eq!(info.display_organization(), None);
    }

    #[test]
    fn route_without_token_has_no_key() {
        assert!(RouteQuery::new(Some("acme"), None).invite_key().is_none());
        assert!(RouteQuery::new(Some("acme"), Some("")).invite_key().is_none());
        assert!(RouteQuery::new(None, Some("abc")).invite_key().is_none());
    }

    #[test]
    fn from_pairs_separates_unrelated_parameters() {
        let query = RouteQuery::from_pairs([("slug", "acme"), ("token", "abc"), ("utm", "mail")]);
        assert_eq!(query.invite_key(), Some(InviteKey::new("acme", "abc")));
        assert_eq!(query.extra.get("utm").map(String::as_str), Some("mail"));
    }
}
