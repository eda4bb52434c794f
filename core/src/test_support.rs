//! In-memory transport replaying canned responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse, Transport};

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    /// Answers each request with the next body, as a 200 response.
    pub fn new(bodies: Vec<Value>) -> Arc<Self> {
        Self::with_responses(bodies.iter().map(HttpResponse::json).collect())
    }

    pub fn with_responses(responses: Vec<HttpResponse>) -> Arc<Self> {
        Self::with_results(responses.into_iter().map(Ok).collect())
    }

    pub fn with_results(results: Vec<Result<HttpResponse, TransportError>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(results.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// JSON-RPC method of every request sent so far.
    pub fn methods(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| {
                let body: Value = serde_json::from_str(&r.body).unwrap();
                body["method"].as_str().unwrap().to_string()
            })
            .collect()
    }

    /// Params of the `n`th request.
    pub fn params(&self, n: usize) -> Value {
        let body: Value = serde_json::from_str(&self.requests()[n].body).unwrap();
        body["params"].clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Request("no scripted response left".to_string())))
    }
}
