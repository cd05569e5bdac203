//! HTTP infrastructure — implements `Transport` with a blocking `ureq` agent.
//!
//! Any status of 300 or above becomes a `RequestFailure` carrying the status
//! code and body. Redirects are not followed.

use std::io::Read;
use std::time::Duration;

use anyhow::{Context, Result};
use jobprobe_common::paths::API_VERSION;

use crate::application::ports::{ApiRequest, Payload, ResponseShape, Transport};
use crate::domain::RequestFailure;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const USER_AGENT: &str = concat!("jobprobe/", env!("CARGO_PKG_VERSION"));

/// Production `Transport` speaking to `{base_url}/v3/`.
pub struct UreqTransport {
    agent: ureq::Agent,
    base_url: String,
}

impl UreqTransport {
    pub fn new(base_url: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .redirects(0)
            .timeout_connect(CONNECT_TIMEOUT)
            .user_agent(USER_AGENT)
            .build();
        Self {
            agent,
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URL for an API path relative to the versioned root.
    #[must_use]
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/{API_VERSION}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Transport for UreqTransport {
    fn request(&self, request: &ApiRequest<'_>, shape: ResponseShape) -> Result<Payload> {
        let url = self.url_for(request.path);
        let method = request.method.as_str();
        tracing::debug!(%method, %url, "sending request");

        let mut req = self.agent.request(method, &url);
        for (name, value) in request.headers {
            req = req.set(name, value);
        }
        let result = if request.method.sends_body() {
            let body = request.body.unwrap_or("");
            if body.is_empty() {
                req = req.set("Content-Length", "0");
            }
            req.send_string(body)
        } else {
            req.call()
        };

        let response = match result {
            Ok(response) => response,
            Err(ureq::Error::Status(status, response)) => {
                let body = response.into_string().unwrap_or_default();
                tracing::debug!(%method, %url, status, "request failed");
                return Err(RequestFailure { status, body }.into());
            }
            Err(err @ ureq::Error::Transport(_)) => {
                return Err(anyhow::Error::new(err).context(format!("{method} {url}")));
            }
        };

        let status = response.status();
        if status >= 300 {
            let body = response.into_string().unwrap_or_default();
            tracing::debug!(%method, %url, status, "request failed");
            return Err(RequestFailure { status, body }.into());
        }

        match shape {
            ResponseShape::Text => {
                let text = response
                    .into_string()
                    .with_context(|| format!("reading response from {method} {url}"))?;
                Ok(Payload::Text(text))
            }
            ResponseShape::Stream => {
                let reader: Box<dyn Read + Send> = Box::new(response.into_reader());
                Ok(Payload::Stream(reader))
            }
        }
    }
}
