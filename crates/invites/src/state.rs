//! Display state derivation.

use crate::types::TokenInfo;

pub const INVALID_TOKEN_MESSAGE: &str = "The invite token is invalid. Try copying and pasting the link from the invite email, or ask the organization owner to invite you again.";
pub const EMAIL_MISMATCH_MESSAGE: &str =
    "The email address does not match. Are you signed in with right GitHub account?";
pub const EXPIRED_TOKEN_MESSAGE: &str =
    "The invite token has expired. Please request a new one from the organization owner.";

/// The mutually exclusive outcomes of resolving an invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionState {
    Loading,
    Invalid,
    EmailMismatch,
    Expired,
    NeedsAuth,
    Actionable,
}

impl ResolutionState {
    /// Flags in the payload are not mutually exclusive, so the checks run in a
    /// fixed order: existence, email, expiry, authentication.
    ///
    /// ```
    /// use orgjoin_invites::{ResolutionState, TokenInfo};
    ///
    /// let info = TokenInfo {
    ///     token_does_not_exist: true,
    ///     expired_token: true,
    ///     ..TokenInfo::default()
    /// };
    /// assert_eq!(ResolutionState::derive(Some(&info)), ResolutionState::Invalid);
    /// assert_eq!(ResolutionState::derive(None), ResolutionState::Loading);
    /// ```
    pub fn derive(info: Option<&TokenInfo>) -> Self {
        let Some(info) = info else {
            return Self::Loading;
        };

        if info.token_does_not_exist {
            Self::Invalid
        } else if !info.email_match {
            Self::EmailMismatch
        } else if info.expired_token {
            Self::Expired
        } else if !info.authorized_user {
            Self::NeedsAuth
        } else {
            Self::Actionable
        }
    }

    pub fn is_actionable(self) -> bool {
        matches!(self, Self::Actionable)
    }

    pub fn error_message(self) -> Option<&'static str> {
        match self {
            Self::Invalid => Some(INVALID_TOKEN_MESSAGE),
            Self::EmailMismatch => Some(EMAIL_MISMATCH_MESSAGE),
            Self::Expired => Some(EXPIRED_TOKEN_MESSAGE),
            Self::Loading | Self::NeedsAuth | Self::Actionable => None,
        }
    }
}

/// Header line; names the organization only when the viewer's email matches.
pub fn greeting(info: Option<&TokenInfo>) -> String {
    match info.and_then(TokenInfo::display_organization) {
        Some(name) => format!("Join {name}"),
        None => "Join a new organization".to_string(),
    }
}
