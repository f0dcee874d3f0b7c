//! One-shot HTTP executor.
//!
//! # Design
//! Exactly one request/response exchange per call: no retries, no backoff,
//! no client-side timeout — retry policy belongs to the caller. ureq's
//! status-as-error behavior is disabled so 4xx/5xx responses come back as
//! data for the parse layer to interpret; only connectivity failures (or a
//! body that cannot be read) surface here, normalized to
//! `ApiError::Transport` at this single point.

use tracing::debug;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

fn apply_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

/// Execute an `HttpRequest` and return the raw `HttpResponse`.
pub fn execute(request: &HttpRequest) -> Result<HttpResponse, ApiError> {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    debug!(method = ?request.method, url = %request.url, "executing request");

    let result = match (&request.method, &request.body) {
        (HttpMethod::Get, _) => apply_headers(agent.get(&request.url), &request.headers).call(),
        (HttpMethod::Delete, None) => {
            apply_headers(agent.delete(&request.url), &request.headers).call()
        }
        (HttpMethod::Delete, Some(body)) => {
            apply_headers(agent.delete(&request.url), &request.headers)
                .force_send_body()
                .send(body.as_bytes())
        }
        (HttpMethod::Post, Some(body)) => {
            apply_headers(agent.post(&request.url), &request.headers).send(body.as_bytes())
        }
        (HttpMethod::Post, None) => {
            apply_headers(agent.post(&request.url), &request.headers).send_empty()
        }
        (HttpMethod::Patch, Some(body)) => {
            apply_headers(agent.patch(&request.url), &request.headers).send(body.as_bytes())
        }
        (HttpMethod::Patch, None) => {
            apply_headers(agent.patch(&request.url), &request.headers).send_empty()
        }
    };

    let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;
    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .read_to_string()
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    debug!(status, "received response");

    Ok(HttpResponse {
        status,
        headers: Vec::new(),
        body,
    })
}
