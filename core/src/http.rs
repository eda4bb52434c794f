//! HTTP transport for JSON-RPC envelopes.
//!
//! # Design
//! Requests and responses are plain data. `RequestManager` builds an
//! `HttpRequest`, a `Transport` executes it and hands back an
//! `HttpResponse`, and `read_json` turns that into a JSON body or a
//! `TransportError`. The trait is the seam tests use to script server
//! answers without a network.
//!
//! Every call to the API is a POST, so there is no method field.

use std::time::Duration;

use serde_json::Value;
use tracing::trace;

use crate::error::TransportError;

/// A JSON-RPC POST described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Endpoint URL without the query string.
    pub url: String,
    /// Query parameters, encoded by the transport.
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A 200 response carrying `body` as JSON.
    pub fn json(body: &Value) -> Self {
        Self {
            status: 200,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Value of cookie `name` from any `Set-Cookie` header.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|(k, _)| k.eq_ignore_ascii_case("set-cookie"))
            .flat_map(|(_, v)| v.split(';'))
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Executes one request. Implementations must not retry.
pub trait Transport: Send + Sync {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a `ureq` agent.
///
/// Status codes are returned as data; `read_json` decides what counts as
/// a failure.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(crate::config::ClientConfig::default().timeout)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.agent.post(&request.url);
        for (key, value) in &request.query {
            builder = builder.query(key, value);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let mut response = builder.send(request.body.as_bytes())?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response.body_mut().read_to_string()?;
        trace!(status, bytes = body.len(), "response received");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Check the status and parse the body as a JSON object.
///
/// A JSON-RPC response is always an object; any other JSON value is an
/// invalid body.
pub fn read_json(response: &HttpResponse) -> Result<Value, TransportError> {
    if !(200..300).contains(&response.status) {
        return Err(TransportError::Status {
            status: response.status,
            body: response.body.clone(),
        });
    }
    let body: Value = serde_json::from_str(&response.body).map_err(|e| TransportError::InvalidBody(e.to_string()))?;
    if !body.is_object() {
        return Err(TransportError::InvalidBody(format!("expected a JSON object, got {body}")));
    }
    Ok(body)
}
