//! Hosted backend client.
//!
//! Talks to a backend that exposes auth endpoints under `/auth/v1` and table
//! endpoints under `/rest/v1`. Every request carries the anonymous key; once a
//! user signs in their access token replaces it as the bearer token.

use std::{
    fmt,
    sync::{PoisonError, RwLock},
};

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tokio::sync::watch;
use zeroize::Zeroizing;

use crate::auth::User;

mod auth;
mod catalog;
mod errors;
mod orders;
mod rows;

pub use errors::BackendError;

/// Connection settings for the hosted backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Project URL, e.g. `"https://example.supabase.co"`.
    pub url: String,

    /// Public anonymous API key.
    pub anon_key: String,
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

struct AuthSession {
    access_token: Zeroizing<String>,
    user: User,
}

/// HTTP client implementing the auth, catalog and order collaborators.
pub struct RestBackend {
    config: BackendConfig,
    http: Client,
    session: RwLock<Option<AuthSession>>,
    changes: watch::Sender<Option<User>>,
}

impl fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestBackend")
            .field("config", &self.config)
            .field("signed_in", &self.current_session_user().is_some())
            .finish_non_exhaustive()
    }
}

impl RestBackend {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: BackendConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            session: RwLock::new(None),
            changes: watch::Sender::new(None),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let bearer = self
            .session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map_or_else(
                || self.config.anon_key.clone(),
                |session| session.access_token.as_str().to_string(),
            );

        self.http
            .request(method, self.endpoint(path))
            .header("apikey", &self.config.anon_key)
            .bearer_auth(bearer)
    }

    fn current_session_user(&self) -> Option<User> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.user.clone())
    }

    fn access_token(&self) -> Option<Zeroizing<String>> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    fn start_session(&self, access_token: String, user: User) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(AuthSession {
            access_token: Zeroizing::new(access_token),
            user: user.clone(),
        });

        self.changes.send_replace(Some(user));
    }

    fn end_session(&self) {
        self.session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        self.changes.send_replace(None);
    }
}

/// Pass successful responses through; turn anything else into a
/// [`BackendError::Status`] carrying the backend's message.
async fn check(response: Response) -> Result<Response, BackendError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();

    Err(BackendError::Status {
        status,
        message: error_message(status, &body),
    })
}

/// Pull a human readable message out of an error body.
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            ["error_description", "msg", "message", "error"]
                .into_iter()
                .find_map(|key| value.get(key)?.as_str().map(str::to_string))
        })
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend(url: &str) -> RestBackend {
        RestBackend::new(BackendConfig {
            url: url.to_string(),
            anon_key: "anon".to_string(),
        })
    }

    #[test]
    fn endpoint_joins_without_double_slashes() {
        let backend = backend("https://example.test/");

        assert_eq!(
            backend.endpoint("/rest/v1/restaurants"),
            "https://example.test/rest/v1/restaurants"
        );
    }

    #[test]
    fn error_message_prefers_description() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#;

        assert_eq!(
            error_message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );
    }

    #[test]
    fn error_message_reads_postgrest_errors() {
        let body = r#"{"code":"42501","message":"permission denied for table orders"}"#;

        assert_eq!(
            error_message(StatusCode::FORBIDDEN, body),
            "permission denied for table orders"
        );
    }

    #[test]
    fn error_message_falls_back_to_status() {
        assert_eq!(error_message(StatusCode::BAD_GATEWAY, ""), "Bad Gateway");
    }

    #[test]
    fn debug_output_hides_keys() {
        let output = format!("{:?}", backend("https://example.test"));

        assert!(!output.contains("anon"));
    }
}
