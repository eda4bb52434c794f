//! Error types for the WebUntis client.
//!
//! # Design
//! Each layer owns one enum. `TransportError` covers everything between
//! handing a request to the network and holding a JSON body; `DecodeError`
//! covers a JSON body that does not have the expected shape. `UntisError`
//! is what `Session` returns and adds the server-reported failures.
//!
//! Nothing here is retried. The only recovery the client offers is an
//! explicit `Session::refresh`.

use chrono::NaiveDate;
use thiserror::Error;

/// Failure to complete an HTTP round trip or to read its body as JSON.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the response could not be read.
    #[error("request failed: {0}")]
    Request(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body is not valid JSON.
    #[error("response body is not JSON: {0}")]
    InvalidBody(String),
}

impl From<ureq::Error> for TransportError {
    fn from(e: ureq::Error) -> Self {
        TransportError::Request(e.to_string())
    }
}

/// A JSON payload did not match the shape a record expects.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("expected a JSON object for {0}")]
    NotAnObject(&'static str),

    #[error("missing field `{0}`")]
    MissingField(String),

    #[error("field `{field}` is not a {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// Not an eight digit `yyyyMMdd` value, or not a real calendar day.
    #[error("invalid date `{0}`")]
    InvalidDate(String),

    /// Neither the `HHmm` nor the `Hmm` reading yields a valid time.
    #[error("invalid time `{0}`")]
    InvalidTime(String),

    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

/// Errors returned by `Session` operations.
#[derive(Debug, Error)]
pub enum UntisError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server answered with an error envelope. The message is the
    /// server's, verbatim.
    #[error("server error: {message}")]
    Api { message: String, code: Option<i64> },

    /// The `authenticate` call was answered with an error envelope, either
    /// on first login or during `refresh`.
    #[error("login failed: {message}")]
    LoginFailure { message: String },

    #[error("malformed response: {0}")]
    Decode(#[from] DecodeError),

    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),
}

impl UntisError {
    /// True for every failure reported by the server itself, login failures
    /// included.
    pub fn is_api_error(&self) -> bool {
        matches!(self, UntisError::Api { .. } | UntisError::LoginFailure { .. })
    }

    /// True when re-authenticating might help.
    pub fn is_login_failure(&self) -> bool {
        matches!(self, UntisError::LoginFailure { .. })
    }
}
