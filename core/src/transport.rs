//! The I/O seam between the sans-IO client and the network.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Executes one `HttpRequest` and returns the raw response.
///
/// Implementations must hand back 4xx/5xx responses as data so that
/// `BoardClient` stays the only place that interprets status codes.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by `ureq`.
///
/// Every call builds its own agent, so no connection outlives the request
/// that opened it. There are no retries and no timeouts beyond ureq's
/// defaults.
#[derive(Debug, Default, Clone, Copy)]
pub struct UreqTransport;

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();

        debug!(method = ?request.method, url = %request.url, "sending request");
        let result = match request.method {
            HttpMethod::Get => decorate(agent.get(&request.url), request).call(),
            HttpMethod::Post => decorate(agent.post(&request.url), request).send_empty(),
            HttpMethod::Put => decorate(agent.put(&request.url), request).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        debug!(status, url = %request.url, "received response");

        Ok(HttpResponse { status, body })
    }
}

fn decorate<B>(mut builder: ureq::RequestBuilder<B>, request: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (key, value) in &request.query {
        builder = builder.query(key, value);
    }
    for (key, value) in &request.headers {
        builder = builder.header(key.as_str(), value.as_str());
    }
    builder
}
