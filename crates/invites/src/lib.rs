//! # orgjoin invites
//!
//! Client-side resolution of organization invite links. A join link carries
//! an organization slug and an invite token; [`InviteResolutionController`]
//! validates the token against the platform API, derives one
//! [`ResolutionState`] from the answer, and runs the join/decline actions.
//!
//! The HTTP client, notification display, navigation, and session are
//! injected through the traits in [`ports`]. [`ReqwestHttpClient`] is the
//! production HTTP client.

pub mod controller;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod ports;
pub mod state;
pub mod types;
pub mod view;

pub use controller::{ActionOutcome, Collaborators, IgnoredReason, InviteResolutionController};
pub use endpoints::{sign_in_link, InviteEndpoints, SignInLink};
pub use error::{InviteError, InviteResult};
pub use http::ReqwestHttpClient;
pub use ports::{
    HttpClient, HttpMethod, HttpRequest, HttpResponse, Navigator, NotificationCategory, Notifier,
    SessionProvider, StaticSession,
};
pub use state::{greeting, ResolutionState};
pub use types::{InviteKey, RouteQuery, TokenInfo};
pub use view::{Controls, InviteView};
