//! Scripted transport for tests and offline development.
//!
//! Replays queued responses in order and records every request it is sent,
//! so tests can assert on exactly what went over the wire (and how often).

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

use super::error::TransportError;
use super::{OutboundRequest, ResponseBody, Transport};

/// Transport that answers from a queue of canned results.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<ResponseBody, TransportError>>>,
    sent: Mutex<Vec<OutboundRequest>>,
}

impl ScriptedTransport {
    /// A transport with nothing queued. Every send fails with status 503.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response body.
    pub fn push_body(&self, body: impl Into<String>) -> &Self {
        self.push(Ok(ResponseBody::new(body)))
    }

    /// Queue a non-success status.
    pub fn push_status(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Err(TransportError::Status {
            status,
            body: body.into(),
        }))
    }

    /// Queue an arbitrary result.
    pub fn push(&self, result: Result<ResponseBody, TransportError>) -> &Self {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(result);
        self
    }

    /// Requests received so far, oldest first.
    pub fn sent(&self) -> Vec<OutboundRequest> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far.
    pub fn call_count(&self) -> usize {
        self.sent.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Number of queued results not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Transport for ScriptedTransport {
    async fn send(&self, request: &OutboundRequest) -> Result<ResponseBody, TransportError> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request.clone());

        self.responses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Status {
                    status: 503,
                    body: "no scripted response".to_string(),
                })
            })
    }
}
