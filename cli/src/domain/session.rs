//! Session context — credentials in, authenticated session out.
//!
//! Pure types only; the token exchange itself lives in
//! `application::services::auth`.

use std::collections::BTreeMap;
use std::fmt;

use jobprobe_common::headers;

/// Request headers, kept ordered so diagnostics and tests are deterministic.
pub type Headers = BTreeMap<String, String>;

/// Default platform base URL when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost";

/// Username/password pair used for the token exchange.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// JSON body for `POST oauth2/tokens`.
    #[must_use]
    pub fn token_request_body(&self) -> String {
        serde_json::json!({
            "username": self.username,
            "password": self.password,
            "grant_type": "password",
        })
        .to_string()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Authenticated context shared read-only by every call of a run.
#[derive(Clone)]
pub struct Session {
    token: Option<String>,
    base_url: String,
    resource_id: String,
}

impl Session {
    /// Build a session. `token` is `None` when authentication was logically
    /// rejected; authenticated calls then go out without a token and fail
    /// on the platform side.
    pub fn new(
        token: Option<String>,
        base_url: impl Into<String>,
        resource_id: impl Into<String>,
    ) -> Self {
        Self {
            token,
            base_url: base_url.into(),
            resource_id: resource_id.into(),
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Identifier of the compute resource under test; empty when unset.
    #[must_use]
    pub fn resource_id(&self) -> &str {
        &self.resource_id
    }

    /// Headers for an authenticated request without a body.
    #[must_use]
    pub fn auth_headers(&self) -> Headers {
        let mut h = Headers::new();
        if let Some(token) = &self.token {
            h.insert(headers::TOKEN.to_string(), token.clone());
        }
        h
    }

    /// Headers for an authenticated request with a JSON body.
    #[must_use]
    pub fn json_headers(&self) -> Headers {
        let mut h = self.auth_headers();
        h.insert(headers::CONTENT_TYPE.to_string(), headers::JSON.to_string());
        h
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .field("base_url", &self.base_url)
            .field("resource_id", &self.resource_id)
            .finish()
    }
}

/// Headers for an unauthenticated JSON request (the token exchange).
#[must_use]
pub fn anonymous_json_headers() -> Headers {
    let mut h = Headers::new();
    h.insert(headers::CONTENT_TYPE.to_string(), headers::JSON.to_string());
    h
}
