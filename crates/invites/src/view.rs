//! Text view model of the join page.

use orgjoin_config::RouteConfig;

use crate::endpoints::{sign_in_link, SignInLink};
use crate::state::{greeting, ResolutionState};
use crate::types::{InviteKey, TokenInfo};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Controls {
    None,
    SignIn(SignInLink),
    JoinOrDecline { submitting: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InviteView {
    pub state: ResolutionState,
    pub greeting: String,
    pub invitation: Option<String>,
    pub banner: Option<&'static str>,
    pub controls: Controls,
}

impl InviteView {
    /// `key` is the identity `info` was resolved for.
    pub fn compose(
        info: Option<&TokenInfo>,
        key: Option<&InviteKey>,
        submitting: bool,
        routes: &RouteConfig,
        product_name: &str,
    ) -> Self {
        let state = ResolutionState::derive(info);

        let invitation = match info {
            Some(info) if info.token_does_not_exist => None,
            _ => {
                let target = info
                    .and_then(TokenInfo::display_organization)
                    .map(|name| format!("{name}'s organization"))
                    .unwrap_or_else(|| "a new organization".to_string());
                Some(format!(
                    "You have been invited to join {target} at {product_name}."
                ))
            }
        };

        let controls = match (state, key) {
            (ResolutionState::Actionable, _) => Controls::JoinOrDecline { submitting },
            (ResolutionState::NeedsAuth, Some(key)) => Controls::SignIn(sign_in_link(routes, key)),
            _ => Controls::None,
        };

        Self {
            state,
            greeting: greeting(info),
            invitation,
            banner: state.error_message(),
            controls,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{EXPIRED_TOKEN_MESSAGE, INVALID_TOKEN_MESSAGE};

    fn acme() -> TokenInfo {
        TokenInfo {
            organization_name: Some("Acme".into()),
            token_does_not_exist: false,
            email_match: true,
            authorized_user: true,
            expired_token: false,
            invite_id: Some(42),
        }
    }

    fn compose(info: Option<&TokenInfo>) -> InviteView {
        let key = InviteKey::new("acme", "tok");
        InviteView::compose(info, Some(&key), false, &RouteConfig::default(), "Supabase")
    }

    #[test]
    fn loading_view_has_generic_copy_and_no_controls() {
        let view = compose(None);
        assert_eq!(view.state, ResolutionState::Loading);
        assert_eq!(view.greeting, "Join a new organization");
        assert_eq!(
            view.invitation.as_deref(),
            Some("You have been invited to join a new organization at Supabase.")
        );
        assert_eq!(view.banner, None);
        assert_eq!(view.controls, Controls::None);
    }

    #[test]
    fn invalid_token_hides_invitation_line() {
        let info = TokenInfo {
            token_does_not_exist: true,
            ..acme()
        };
        let view = compose(Some(&info));
        assert_eq!(view.invitation, None);
        assert_eq!(view.banner, Some(INVALID_TOKEN_MESSAGE));
        assert_eq!(view.controls, Controls::None);
    }

    #[test]
    fn actionable_view_names_organization() {
        let view = compose(Some(&acme()));
        assert_eq!(view.greeting, "Join Acme");
        assert_eq!(
            view.invitation.as_deref(),
            Some("You have been invited to join Acme's organization at Supabase.")
        );
        assert_eq!(view.controls, Controls::JoinOrDecline { submitting: false });
    }

    #[test]
    fn expired_view_shows_banner_only() {
        let info = TokenInfo {
            expired_token: true,
            ..acme()
        };
        let view = compose(Some(&info));
        assert_eq!(view.banner, Some(EXPIRED_TOKEN_MESSAGE));
        assert_eq!(view.controls, Controls::None);
    }

    #[test]
    fn unauthenticated_view_links_to_sign_in() {
        let info = TokenInfo {
            authorized_user: false,
            ..acme()
        };
        let view = compose(Some(&info));
        match view.controls {
            Controls::SignIn(link) => assert_eq!(link.return_to, "/join?token=tok&slug=acme"),
            other => panic!("expected sign-in controls, got {other:?}"),
        }
        assert_eq!(view.banner, None);
    }
}
