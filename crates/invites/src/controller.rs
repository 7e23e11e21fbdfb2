//! The invite resolution state machine.
//!
//! A controller belongs to one mounted join page. It resolves the route's
//! (slug, token) identity once, derives the display state from the result,
//! and runs the join/decline mutations. State sits behind a mutex that is
//! never held across an `.await`.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

use orgjoin_config::{AppConfig, RouteConfig};

use crate::endpoints::InviteEndpoints;
use crate::error::{InviteError, InviteResult};
use crate::ports::{
    HttpClient, HttpMethod, HttpRequest, Navigator, NotificationCategory, Notifier,
    SessionProvider,
};
use crate::state::ResolutionState;
use crate::types::{InviteKey, RouteQuery, TokenInfo};
use crate::view::InviteView;

#[derive(Clone)]
pub struct Collaborators {
    pub http: Arc<dyn HttpClient>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub session: Arc<dyn SessionProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum FetchPhase {
    NotStarted,
    Fetching(InviteKey),
    Loaded { key: InviteKey, info: TokenInfo },
}

impl FetchPhase {
    fn key(&self) -> Option<&InviteKey> {
        match self {
            Self::NotStarted => None,
            Self::Fetching(key) | Self::Loaded { key, .. } => Some(key),
        }
    }

    fn info(&self) -> Option<&TokenInfo> {
        match self {
            Self::Loaded { info, .. } => Some(info),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct ControllerState {
    phase: FetchPhase,
    submitting: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InviteAction {
    Join,
    Decline,
}

impl InviteAction {
    fn failure_prefix(self) -> &'static str {
        match self {
            Self::Join => "Failed to join organization",
            Self::Decline => "Failed to decline invitation",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    NotActionable(ResolutionState),
    AlreadySubmitting,
    MissingInviteId,
}

/// What a join or decline attempt ended in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Navigated { path: String },
    Failed { message: String },
    Ignored(IgnoredReason),
}

pub struct InviteResolutionController {
    endpoints: InviteEndpoints,
    routes: RouteConfig,
    product_name: String,
    collaborators: Collaborators,
    state: Mutex<ControllerState>,
}

impl InviteResolutionController {
    pub fn new(config: &AppConfig, collaborators: Collaborators) -> InviteResult<Self> {
        Ok(Self {
            endpoints: InviteEndpoints::new(&config.api.base_url)?,
            routes: config.routes.clone(),
            product_name: config.ui.product_name.clone(),
            collaborators,
            state: Mutex::new(ControllerState {
                phase: FetchPhase::NotStarted,
                submitting: false,
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, ControllerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> ResolutionState {
        ResolutionState::derive(self.lock().phase.info())
    }

    pub fn token_info(&self) -> Option<TokenInfo> {
        self.lock().phase.info().cloned()
    }

    pub fn is_loaded(&self) -> bool {
        self.lock().phase.info().is_some()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().submitting
    }

    pub fn view(&self) -> InviteView {
        let state = self.lock();
        InviteView::compose(
            state.phase.info(),
            state.phase.key(),
            state.submitting,
            &self.routes,
            &self.product_name,
        )
    }

    /// Validate the route's invite token, at most once per (slug, token).
    ///
    /// A route without a token leaves the controller in `Loading`. Failures
    /// are logged and also leave it in `Loading`.
    pub async fn resolve(&self, route: &RouteQuery) -> ResolutionState {
        let Some(key) = route.invite_key() else {
            debug!("route carries no invite token, skipping resolution");
            return self.state();
        };

        {
            let mut state = self.lock();
            if state.phase.key() == Some(&key) {
                debug!(slug = %key.slug, "invite already resolving or resolved");
                return ResolutionState::derive(state.phase.info());
            }
            state.phase = FetchPhase::Fetching(key.clone());
        }

        let result = self.fetch_token_info(&key).await;

        let mut state = self.lock();
        if state.phase != FetchPhase::Fetching(key.clone()) {
            debug!(slug = %key.slug, "discarding validation result for a superseded route");
            return ResolutionState::derive(state.phase.info());
        }

        match result {
            Ok(info) => {
                let resolved = ResolutionState::derive(Some(&info));
                info!(slug = %key.slug, state = ?resolved, "invite token resolved");
                state.phase = FetchPhase::Loaded { key, info };
                resolved
            }
            Err(err) => {
                error!(slug = %key.slug, error = %err, "failed to validate invite token");
                state.phase = FetchPhase::NotStarted;
                ResolutionState::Loading
            }
        }
    }

    async fn fetch_token_info(&self, key: &InviteKey) -> InviteResult<TokenInfo> {
        let response = self
            .collaborators
            .http
            .request(self.build_request(HttpMethod::Get, self.endpoints.join(key), None))
            .await?;

        if let Some(message) = response.failure_message() {
            return Err(InviteError::rejected(response.status, message));
        }

        Ok(serde_json::from_value(response.body)?)
    }

    /// Join the organization. Navigates to the post-join path on success.
    pub async fn accept(&self) -> ActionOutcome {
        let key = match self.begin(InviteAction::Join, |key, _| Ok(key.clone())) {
            Ok(key) => key,
            Err(reason) => return ActionOutcome::Ignored(reason),
        };

        let request = self.build_request(
            HttpMethod::Post,
            self.endpoints.join(&key),
            Some(json!({})),
        );
        let path = self.routes.post_join_path.clone();
        self.submit(InviteAction::Join, request, path).await
    }

    /// Decline the invitation. Navigates to the post-decline path on success.
    pub async fn decline(&self) -> ActionOutcome {
        let claim = self.begin(InviteAction::Decline, |key, info| {
            info.invite_id
                .map(|invite_id| (key.slug.clone(), invite_id))
                .ok_or(IgnoredReason::MissingInviteId)
        });
        let (slug, invite_id) = match claim {
            Ok(claim) => claim,
            Err(reason) => return ActionOutcome::Ignored(reason),
        };

        let request = self.build_request(
            HttpMethod::Delete,
            self.endpoints.invite(&slug, invite_id),
            Some(json!({})),
        );
        let path = self.routes.post_decline_path.clone();
        self.submit(InviteAction::Decline, request, path).await
    }

    /// Claims the submitting flag if an action may run right now.
    fn begin<T>(
        &self,
        action: InviteAction,
        claim: impl FnOnce(&InviteKey, &TokenInfo) -> Result<T, IgnoredReason>,
    ) -> Result<T, IgnoredReason> {
        let mut state = self.lock();

        if state.submitting {
            debug!(?action, "action already in flight");
            return Err(IgnoredReason::AlreadySubmitting);
        }

        let FetchPhase::Loaded { key, info } = &state.phase else {
            debug!(?action, "invite not resolved yet");
            return Err(IgnoredReason::NotActionable(ResolutionState::Loading));
        };

        let resolved = ResolutionState::derive(Some(info));
        if !resolved.is_actionable() {
            debug!(?action, state = ?resolved, "invite is not actionable");
            return Err(IgnoredReason::NotActionable(resolved));
        }

        let claimed = claim(key, info).map_err(|reason| {
            warn!(?action, ?reason, "invite action cannot run");
            reason
        })?;
        state.submitting = true;
        Ok(claimed)
    }

    async fn submit(&self, action: InviteAction, request: HttpRequest, path: String) -> ActionOutcome {
        let result = match self.collaborators.http.request(request).await {
            Ok(response) => match response.failure_message() {
                Some(message) => Err(message),
                None => Ok(()),
            },
            Err(err) => Err(err.to_string()),
        };

        self.lock().submitting = false;

        match result {
            Ok(()) => {
                info!(?action, path = %path, "invite action succeeded");
                self.collaborators.navigator.navigate(&path);
                ActionOutcome::Navigated { path }
            }
            Err(reason) => {
                warn!(?action, reason = %reason, "invite action failed");
                let message = format!("{}: {}", action.failure_prefix(), reason);
                self.collaborators
                    .notifier
                    .notify(NotificationCategory::Error, &message);
                ActionOutcome::Failed { message }
            }
        }
    }

    fn build_request(&self, method: HttpMethod, url: String, body: Option<Value>) -> HttpRequest {
        HttpRequest {
            method,
            url,
            body,
            bearer_token: self.collaborators.session.access_token(),
        }
    }
}
