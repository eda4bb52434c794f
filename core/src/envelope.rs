//! The JSON-RPC success/error wrapper.

use serde_json::Value;

use crate::error::UntisError;

/// Outcome of one JSON-RPC call as reported by the server.
///
/// `RequestManager` only classifies; turning an `Error` into a Rust error
/// is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseEnvelope {
    /// The `result` member, or `Null` when the server sent none.
    Success(Value),
    Error { message: String, code: Option<i64> },
}

impl ResponseEnvelope {
    /// Classify a response body.
    ///
    /// Any `error` member wins over `result`. An `error` without a string
    /// `message` is reported with its JSON text as the message.
    pub fn classify(body: &Value) -> Self {
        match body.get("error") {
            Some(error) if !error.is_null() => {
                let message = match error.get("message").and_then(Value::as_str) {
                    Some(m) => m.to_string(),
                    None => error.to_string(),
                };
                ResponseEnvelope::Error {
                    message,
                    code: error.get("code").and_then(Value::as_i64),
                }
            }
            _ => ResponseEnvelope::Success(body.get("result").cloned().unwrap_or(Value::Null)),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResponseEnvelope::Error { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            ResponseEnvelope::Error { message, .. } => Some(message),
            ResponseEnvelope::Success(_) => None,
        }
    }

    pub fn error_code(&self) -> Option<i64> {
        match self {
            ResponseEnvelope::Error { code, .. } => *code,
            ResponseEnvelope::Success(_) => None,
        }
    }

    pub fn raw_result(&self) -> Option<&Value> {
        match self {
            ResponseEnvelope::Success(result) => Some(result),
            ResponseEnvelope::Error { .. } => None,
        }
    }

    /// The result, or `UntisError::Api` carrying the server's message.
    pub fn into_result(self) -> Result<Value, UntisError> {
        match self {
            ResponseEnvelope::Success(result) => Ok(result),
            ResponseEnvelope::Error { message, code } => Err(UntisError::Api { message, code }),
        }
    }
}
