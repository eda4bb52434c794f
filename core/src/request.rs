//! JSON-RPC request building and response classification.
//!
//! # Design
//! `RequestManager` is the only holder of the session token. `call` never
//! raises on an error envelope; it hands the classified envelope back and
//! leaves the decision to the caller. `login` is the single operation that
//! changes the stored session.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::debug;
use uuid::Uuid;

use crate::config::{ClientConfig, Credentials};
use crate::envelope::ResponseEnvelope;
use crate::error::{DecodeError, TransportError, UntisError};
use crate::http::{read_json, HttpRequest, HttpResponse, Transport};
use crate::method::Method;

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "JSESSIONID";

/// What the server told us about the logged in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionInfo {
    pub session_id: String,
    pub person_type: Option<i64>,
    pub person_id: Option<i64>,
    pub klasse_id: Option<i64>,
}

impl SessionInfo {
    /// Read the session from an `authenticate` result, falling back to the
    /// session cookie when the result does not carry the id.
    fn from_login(result: &Value, response: &HttpResponse) -> Result<Self, DecodeError> {
        let session_id = result
            .get("sessionId")
            .and_then(Value::as_str)
            .or_else(|| response.cookie(SESSION_COOKIE))
            .ok_or_else(|| DecodeError::MissingField("sessionId".to_string()))?;
        Ok(Self {
            session_id: session_id.to_string(),
            person_type: result.get("personType").and_then(Value::as_i64),
            person_id: result.get("personId").and_then(Value::as_i64),
            klasse_id: result.get("klasseId").and_then(Value::as_i64),
        })
    }
}

/// Sends JSON-RPC calls for one server and school.
pub struct RequestManager {
    transport: Arc<dyn Transport>,
    url: String,
    school_name: String,
    user_agent: String,
    session: Option<SessionInfo>,
}

impl RequestManager {
    pub fn new(transport: Arc<dyn Transport>, credentials: &Credentials, config: &ClientConfig) -> Self {
        Self {
            transport,
            url: config.endpoint_url(credentials),
            school_name: credentials.school_name().to_string(),
            user_agent: credentials.user_agent().to_string(),
            session: None,
        }
    }

    pub fn session(&self) -> Option<&SessionInfo> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Build the HTTP request for `method`. `Null` params are sent as `{}`.
    pub fn build_request(&self, method: &str, params: Value) -> HttpRequest {
        let params = if params.is_null() { json!({}) } else { params };
        let body = json!({
            "id": Uuid::new_v4().to_string(),
            "method": method,
            "params": params,
            "jsonrpc": "2.0",
        });

        let mut headers = vec![("content-type".to_string(), "application/json".to_string())];
        if !self.user_agent.is_empty() {
            headers.push(("user-agent".to_string(), self.user_agent.clone()));
        }
        if let Some(session) = &self.session {
            headers.push((
                "cookie".to_string(),
                format!("{SESSION_COOKIE}={}", session.session_id),
            ));
        }

        HttpRequest {
            url: self.url.clone(),
            query: vec![("school".to_string(), self.school_name.clone())],
            headers,
            body: body.to_string(),
        }
    }

    fn send(&self, method: &str, params: Value) -> Result<(HttpResponse, ResponseEnvelope), TransportError> {
        debug!(method, "sending JSON-RPC call");
        let request = self.build_request(method, params);
        let response = self.transport.execute(&request)?;
        let envelope = ResponseEnvelope::classify(&read_json(&response)?);
        if let ResponseEnvelope::Error { message, code } = &envelope {
            debug!(method, code, reason = message.as_str(), "server returned error envelope");
        }
        Ok((response, envelope))
    }

    /// Issue `method` and classify the answer.
    pub fn call(&self, method: &str, params: Value) -> Result<ResponseEnvelope, TransportError> {
        self.send(method, params).map(|(_, envelope)| envelope)
    }

    /// Authenticate and, on success, store the new session.
    ///
    /// An error envelope is returned as is and leaves the stored session
    /// untouched.
    pub fn login(&mut self, user: &str, password: &str, client: &str) -> Result<ResponseEnvelope, UntisError> {
        let params = json!({
            "user": user,
            "password": password,
            "client": client,
        });
        let (response, envelope) = self.send(Method::Login.wire_name(), params)?;
        if let ResponseEnvelope::Success(result) = &envelope {
            self.session = Some(SessionInfo::from_login(result, &response)?);
        }
        Ok(envelope)
    }
}

impl fmt::Debug for RequestManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestManager")
            .field("url", &self.url)
            .field("school_name", &self.school_name)
            .field("authenticated", &self.session.is_some())
            .finish()
    }
}
