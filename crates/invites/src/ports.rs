//! Collaborators the controller is handed at construction time.

use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::InviteResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Delete,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<Value>,
    pub bearer_token: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// `None` when the call succeeded; otherwise the best message the server
    /// gave, falling back to the status code.
    pub fn failure_message(&self) -> Option<String> {
        let error = self.body.get("error").filter(|error| !error.is_null());

        if error.is_none() && self.is_success() {
            return None;
        }

        let message = match error {
            Some(Value::Object(details)) => details
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned),
            Some(Value::String(message)) => Some(message.clone()),
            _ => None,
        }
        .or_else(|| {
            self.body
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_owned)
        })
        .or_else(|| match &self.body {
            Value::String(text) if !text.trim().is_empty() => Some(text.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| format!("request failed with status {}", self.status));

        Some(message)
    }
}

#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn request(&self, request: HttpRequest) -> InviteResult<HttpResponse>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationCategory {
    Error,
    Success,
    Info,
}

pub trait Notifier: Send + Sync {
    fn notify(&self, category: NotificationCategory, message: &str);
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Credentials of the signed-in viewer, attached to every API call.
pub trait SessionProvider: Send + Sync {
    fn access_token(&self) -> Option<String>;
}

/// Session backed by a fixed token, e.g. one read from configuration.
#[derive(Debug, Clone, Default)]
pub struct StaticSession {
    token: Option<String>,
}

impl StaticSession {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: token.filter(|token| !token.is_empty()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl SessionProvider for StaticSession {
    fn access_token(&self) -> Option<String> {
        self.token.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_without_error_has_no_failure() {
        let response = HttpResponse::new(200, json!({ "id": 1 }));
        assert_eq!(response.failure_message(), None);
    }

    #[test]
    fn error_body_wins_even_on_success_status() {
        let response = HttpResponse::new(200, json!({ "error": { "message": "seat limit reached" } }));
        assert_eq!(response.failure_message().as_deref(), Some("seat limit reached"));
    }

    #[test]
    fn null_error_is_not_a_failure() {
        let response = HttpResponse::new(201, json!({ "error": null }));
        assert_eq!(response.failure_message(), None);
    }

    #[test]
    fn plain_string_error_and_top_level_message_are_accepted() {
        let response = HttpResponse::new(400, json!({ "error": "bad token" }));
        assert_eq!(response.failure_message().as_deref(), Some("bad token"));

        let response = HttpResponse::new(403, json!({ "message": "forbidden" }));
        assert_eq!(response.failure_message().as_deref(), Some("forbidden"));
    }

    #[test]
    fn status_only_failure_names_the_status() {
        let response = HttpResponse::new(502, Value::Null);
        assert_eq!(
            response.failure_message().as_deref(),
            Some("request failed with status 502")
        );
    }

    #[test]
    fn static_session_drops_empty_tokens() {
        assert_eq!(StaticSession::new(Some(String::new())).access_token(), None);
        assert_eq!(
            StaticSession::new(Some("abc".into())).access_token().as_deref(),
            Some("abc")
        );
    }
}
